use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockbook_core::{CategoryId, Cents, ProductId, SupplierId, WarehouseId};

/// Contact information for a supplier.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactInfo {
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

/// A catalog product. Referenced, never owned, by the stock core.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub sku: String,
    pub category_id: Option<CategoryId>,
    pub supplier_id: Option<SupplierId>,
    /// Current unit price in the smallest currency unit.
    pub unit_price: Cents,
    /// Stock level at or below which the product should be reordered.
    pub reorder_threshold: Option<i64>,
    /// Upper bound the stock level should not exceed.
    pub max_threshold: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Attributes for a product being registered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewProduct {
    pub id: ProductId,
    pub name: String,
    pub sku: String,
    pub category_id: Option<CategoryId>,
    pub supplier_id: Option<SupplierId>,
    pub unit_price: Cents,
    pub reorder_threshold: Option<i64>,
    pub max_threshold: Option<i64>,
}

impl NewProduct {
    /// Minimal product spec; optional attributes default to absent.
    pub fn new(
        id: impl Into<ProductId>,
        name: impl Into<String>,
        sku: impl Into<String>,
        unit_price: Cents,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            sku: sku.into(),
            category_id: None,
            supplier_id: None,
            unit_price,
            reorder_threshold: None,
            max_threshold: None,
        }
    }

    pub fn with_supplier(mut self, supplier_id: impl Into<SupplierId>) -> Self {
        self.supplier_id = Some(supplier_id.into());
        self
    }

    pub fn with_category(mut self, category_id: impl Into<CategoryId>) -> Self {
        self.category_id = Some(category_id.into());
        self
    }

    pub fn with_reorder_threshold(mut self, threshold: i64) -> Self {
        self.reorder_threshold = Some(threshold);
        self
    }

    pub fn with_max_threshold(mut self, threshold: i64) -> Self {
        self.max_threshold = Some(threshold);
        self
    }
}

/// A supplier of products.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Supplier {
    pub id: SupplierId,
    pub name: String,
    pub contact: ContactInfo,
}

/// A product category; categories may nest via `parent_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub description: Option<String>,
    pub parent_id: Option<CategoryId>,
}

/// Attributes for a category being registered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCategory {
    pub id: CategoryId,
    pub name: String,
    pub description: Option<String>,
    pub parent_id: Option<CategoryId>,
}

impl NewCategory {
    pub fn new(id: impl Into<CategoryId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: None,
            parent_id: None,
        }
    }

    pub fn with_parent(mut self, parent_id: impl Into<CategoryId>) -> Self {
        self.parent_id = Some(parent_id.into());
        self
    }
}

/// A physical warehouse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Warehouse {
    pub id: WarehouseId,
    pub name: String,
    pub address: Option<String>,
}
