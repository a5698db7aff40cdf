use std::collections::HashMap;

use chrono::Utc;

use stockbook_core::{
    CategoryId, Cents, EntityLookup, ProductId, StockError, StockResult, SupplierId, WarehouseId,
    line_total,
};

use crate::entities::{Category, ContactInfo, NewCategory, NewProduct, Product, Supplier, Warehouse};

/// Keyed stores for the entities the stock core references.
///
/// Lookups are hash-map indexed by id. Warehouse registration order is
/// preserved: the first-registered warehouse is the auto-provisioning target
/// for receipts of products that have no stock location anywhere.
#[derive(Debug, Default)]
pub struct EntityRegistry {
    products: HashMap<ProductId, Product>,
    suppliers: HashMap<SupplierId, Supplier>,
    categories: HashMap<CategoryId, Category>,
    warehouses: HashMap<WarehouseId, Warehouse>,
    warehouse_order: Vec<WarehouseId>,
}

impl EntityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_product(&mut self, spec: NewProduct) -> StockResult<&Product> {
        if self.products.contains_key(&spec.id) {
            return Err(StockError::duplicate_id(spec.id.as_str()));
        }
        if spec.name.trim().is_empty() {
            return Err(StockError::validation("product name cannot be empty"));
        }
        if spec.unit_price < 0 {
            return Err(StockError::invalid_quantity(
                "unit price cannot be negative",
            ));
        }
        if let Some(supplier_id) = &spec.supplier_id {
            if !self.suppliers.contains_key(supplier_id) {
                return Err(StockError::not_found(format!("supplier {supplier_id}")));
            }
        }
        if let Some(category_id) = &spec.category_id {
            if !self.categories.contains_key(category_id) {
                return Err(StockError::not_found(format!("category {category_id}")));
            }
        }

        let now = Utc::now();
        let id = spec.id.clone();
        let product = Product {
            id: spec.id,
            name: spec.name,
            sku: spec.sku,
            category_id: spec.category_id,
            supplier_id: spec.supplier_id,
            unit_price: spec.unit_price,
            reorder_threshold: spec.reorder_threshold,
            max_threshold: spec.max_threshold,
            created_at: now,
            updated_at: now,
        };
        Ok(self.products.entry(id).or_insert(product))
    }

    /// Update the current unit price snapshot for a product.
    pub fn set_unit_price(&mut self, id: &ProductId, unit_price: Cents) -> StockResult<()> {
        if unit_price < 0 {
            return Err(StockError::invalid_quantity(
                "unit price cannot be negative",
            ));
        }
        let product = self
            .products
            .get_mut(id)
            .ok_or_else(|| StockError::not_found(format!("product {id}")))?;
        product.unit_price = unit_price;
        product.updated_at = Utc::now();
        Ok(())
    }

    pub fn add_supplier(
        &mut self,
        id: impl Into<SupplierId>,
        name: impl Into<String>,
        contact: ContactInfo,
    ) -> StockResult<&Supplier> {
        let id = id.into();
        let name = name.into();
        if self.suppliers.contains_key(&id) {
            return Err(StockError::duplicate_id(id.as_str()));
        }
        if name.trim().is_empty() {
            return Err(StockError::validation("supplier name cannot be empty"));
        }
        let supplier = Supplier {
            id: id.clone(),
            name,
            contact,
        };
        Ok(self.suppliers.entry(id).or_insert(supplier))
    }

    pub fn add_category(&mut self, spec: NewCategory) -> StockResult<&Category> {
        if self.categories.contains_key(&spec.id) {
            return Err(StockError::duplicate_id(spec.id.as_str()));
        }
        if spec.name.trim().is_empty() {
            return Err(StockError::validation("category name cannot be empty"));
        }
        if let Some(parent_id) = &spec.parent_id {
            if !self.categories.contains_key(parent_id) {
                return Err(StockError::not_found(format!("category {parent_id}")));
            }
        }
        let id = spec.id.clone();
        let category = Category {
            id: spec.id,
            name: spec.name,
            description: spec.description,
            parent_id: spec.parent_id,
        };
        Ok(self.categories.entry(id).or_insert(category))
    }

    pub fn add_warehouse(
        &mut self,
        id: impl Into<WarehouseId>,
        name: impl Into<String>,
        address: Option<String>,
    ) -> StockResult<&Warehouse> {
        let id = id.into();
        let name = name.into();
        if self.warehouses.contains_key(&id) {
            return Err(StockError::duplicate_id(id.as_str()));
        }
        if name.trim().is_empty() {
            return Err(StockError::validation("warehouse name cannot be empty"));
        }
        self.warehouse_order.push(id.clone());
        let warehouse = Warehouse {
            id: id.clone(),
            name,
            address,
        };
        Ok(self.warehouses.entry(id).or_insert(warehouse))
    }

    pub fn product(&self, id: &ProductId) -> Option<&Product> {
        self.products.get(id)
    }

    pub fn supplier(&self, id: &SupplierId) -> Option<&Supplier> {
        self.suppliers.get(id)
    }

    pub fn category(&self, id: &CategoryId) -> Option<&Category> {
        self.categories.get(id)
    }

    pub fn warehouse(&self, id: &WarehouseId) -> Option<&Warehouse> {
        self.warehouses.get(id)
    }

    pub fn products_by_supplier(&self, supplier_id: &SupplierId) -> Vec<&Product> {
        self.products
            .values()
            .filter(|p| p.supplier_id.as_ref() == Some(supplier_id))
            .collect()
    }

    pub fn products_by_category(&self, category_id: &CategoryId) -> Vec<&Product> {
        self.products
            .values()
            .filter(|p| p.category_id.as_ref() == Some(category_id))
            .collect()
    }

    /// Case-insensitive substring search over id, name, and SKU.
    pub fn search_products(&self, keyword: &str) -> Vec<&Product> {
        let keyword = keyword.to_lowercase();
        self.products
            .values()
            .filter(|p| {
                p.id.as_str().to_lowercase().contains(&keyword)
                    || p.name.to_lowercase().contains(&keyword)
                    || p.sku.to_lowercase().contains(&keyword)
            })
            .collect()
    }

    /// Products whose current stock (as reported by `stock_of`) is at or
    /// below their reorder threshold. Products without a threshold are
    /// never reported.
    pub fn low_stock_products<F>(&self, stock_of: F) -> Vec<&Product>
    where
        F: Fn(&ProductId) -> i64,
    {
        self.products
            .values()
            .filter(|p| match p.reorder_threshold {
                Some(threshold) => stock_of(&p.id) <= threshold,
                None => false,
            })
            .collect()
    }

    /// Total value of stock on hand at current catalog prices: Σ unit price
    /// × stock (as reported by `stock_of`) across all products.
    pub fn inventory_value<F>(&self, stock_of: F) -> Cents
    where
        F: Fn(&ProductId) -> i64,
    {
        self.products
            .values()
            .map(|p| line_total(stock_of(&p.id), p.unit_price))
            .sum()
    }

    /// Whether any category nests under the given one.
    pub fn has_child_categories(&self, id: &CategoryId) -> bool {
        self.categories
            .values()
            .any(|c| c.parent_id.as_ref() == Some(id))
    }

    /// Remove a product. Callers must first check nothing references it;
    /// the engine enforces that guard.
    pub fn remove_product(&mut self, id: &ProductId) -> StockResult<Product> {
        self.products
            .remove(id)
            .ok_or_else(|| StockError::not_found(format!("product {id}")))
    }

    pub fn remove_supplier(&mut self, id: &SupplierId) -> StockResult<Supplier> {
        self.suppliers
            .remove(id)
            .ok_or_else(|| StockError::not_found(format!("supplier {id}")))
    }

    pub fn remove_category(&mut self, id: &CategoryId) -> StockResult<Category> {
        self.categories
            .remove(id)
            .ok_or_else(|| StockError::not_found(format!("category {id}")))
    }

    pub fn remove_warehouse(&mut self, id: &WarehouseId) -> StockResult<Warehouse> {
        let warehouse = self
            .warehouses
            .remove(id)
            .ok_or_else(|| StockError::not_found(format!("warehouse {id}")))?;
        self.warehouse_order.retain(|w| w != id);
        Ok(warehouse)
    }
}

impl EntityLookup for EntityRegistry {
    fn product_exists(&self, id: &ProductId) -> bool {
        self.products.contains_key(id)
    }

    fn supplier_exists(&self, id: &SupplierId) -> bool {
        self.suppliers.contains_key(id)
    }

    fn warehouse_exists(&self, id: &WarehouseId) -> bool {
        self.warehouses.contains_key(id)
    }

    fn unit_price(&self, id: &ProductId) -> Option<Cents> {
        self.products.get(id).map(|p| p.unit_price)
    }

    fn first_warehouse(&self) -> Option<WarehouseId> {
        self.warehouse_order.first().cloned()
    }
}
