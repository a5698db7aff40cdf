use tracing::info;

use stockbook_core::{
    CategoryId, Cents, LocationId, ProductId, StockError, StockResult, SupplierId, WarehouseId,
};
use stockbook_ledger::{HistoryFilter, StockLedger, StockRecord};
use stockbook_locations::{
    MovementContext, NewLocation, StockLocation, StockLocationIndex,
};
use stockbook_purchasing::{
    NewPurchaseOrder, PurchaseOrder, PurchaseOrderId, PurchaseOrderStatus, PurchaseOrderWorkflow,
    ReceiptItem,
};
use stockbook_registry::{
    Category, ContactInfo, EntityRegistry, NewCategory, NewProduct, Product, Supplier, Warehouse,
};
use stockbook_transactions::{
    NewTransaction, Transaction, TransactionId, TransactionProcessor,
};

use crate::config::EngineConfig;

/// The assembled inventory engine: entity registry, append-only ledger, live
/// location index, purchase-order workflow, and transaction processor behind
/// one facade.
///
/// Every mutating operation takes `&mut self`, so each one runs to completion
/// before the next starts; the components' validate-then-write discipline
/// makes a failed operation leave no partial state behind.
#[derive(Debug, Default)]
pub struct InventorySystem {
    config: EngineConfig,
    registry: EntityRegistry,
    ledger: StockLedger,
    locations: StockLocationIndex,
    purchasing: PurchaseOrderWorkflow,
    transactions: TransactionProcessor,
}

impl InventorySystem {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    // --- entity registration ---

    pub fn add_product(&mut self, spec: NewProduct) -> StockResult<&Product> {
        let id = spec.id.clone();
        let product = self.registry.add_product(spec)?;
        info!(product = %id, "product registered");
        Ok(product)
    }

    pub fn set_unit_price(&mut self, id: &ProductId, unit_price: Cents) -> StockResult<()> {
        self.registry.set_unit_price(id, unit_price)?;
        info!(product = %id, unit_price, "unit price updated");
        Ok(())
    }

    pub fn add_supplier(
        &mut self,
        id: impl Into<SupplierId>,
        name: impl Into<String>,
        contact: ContactInfo,
    ) -> StockResult<&Supplier> {
        let supplier = self.registry.add_supplier(id, name, contact)?;
        info!(supplier = %supplier.id, "supplier registered");
        Ok(supplier)
    }

    pub fn add_category(&mut self, spec: NewCategory) -> StockResult<&Category> {
        let category = self.registry.add_category(spec)?;
        info!(category = %category.id, "category registered");
        Ok(category)
    }

    pub fn add_warehouse(
        &mut self,
        id: impl Into<WarehouseId>,
        name: impl Into<String>,
        address: Option<String>,
    ) -> StockResult<&Warehouse> {
        let warehouse = self.registry.add_warehouse(id, name, address)?;
        info!(warehouse = %warehouse.id, "warehouse registered");
        Ok(warehouse)
    }

    // --- entity removal, guarded ---

    /// Remove a product. Refused while any stock location holds it or any
    /// open purchase order references it; ledger history is always retained.
    pub fn remove_product(&mut self, id: &ProductId) -> StockResult<Product> {
        if self.locations.has_locations_for(id) {
            return Err(StockError::invalid_state(format!(
                "product {id} still has stock locations"
            )));
        }
        if self.purchasing.has_open_orders_for(id) {
            return Err(StockError::invalid_state(format!(
                "product {id} is referenced by an open purchase order"
            )));
        }
        let product = self.registry.remove_product(id)?;
        info!(product = %id, "product removed");
        Ok(product)
    }

    /// Remove a supplier. Refused while products or open orders reference it.
    pub fn remove_supplier(&mut self, id: &SupplierId) -> StockResult<Supplier> {
        if !self.registry.products_by_supplier(id).is_empty() {
            return Err(StockError::invalid_state(format!(
                "supplier {id} still has products assigned"
            )));
        }
        if self.purchasing.has_open_orders_with(id) {
            return Err(StockError::invalid_state(format!(
                "supplier {id} has open purchase orders"
            )));
        }
        let supplier = self.registry.remove_supplier(id)?;
        info!(supplier = %id, "supplier removed");
        Ok(supplier)
    }

    /// Remove a category. Refused while products or child categories
    /// reference it.
    pub fn remove_category(&mut self, id: &CategoryId) -> StockResult<Category> {
        if !self.registry.products_by_category(id).is_empty() {
            return Err(StockError::invalid_state(format!(
                "category {id} still has products assigned"
            )));
        }
        if self.registry.has_child_categories(id) {
            return Err(StockError::invalid_state(format!(
                "category {id} still has child categories"
            )));
        }
        let category = self.registry.remove_category(id)?;
        info!(category = %id, "category removed");
        Ok(category)
    }

    /// Remove a warehouse. Refused while any stock location lives in it.
    pub fn remove_warehouse(&mut self, id: &WarehouseId) -> StockResult<Warehouse> {
        if self.locations.has_locations_in(id) {
            return Err(StockError::invalid_state(format!(
                "warehouse {id} still contains stock locations"
            )));
        }
        let warehouse = self.registry.remove_warehouse(id)?;
        info!(warehouse = %id, "warehouse removed");
        Ok(warehouse)
    }

    // --- stock locations ---

    pub fn add_location(&mut self, spec: NewLocation) -> StockResult<&StockLocation> {
        let id = spec.id.clone();
        let location = self
            .locations
            .add_location(&self.registry, &mut self.ledger, spec)?;
        info!(location = %id, quantity = location.quantity(), "stock location added");
        Ok(location)
    }

    /// Set a location's quantity directly; the matching stock-in/stock-out
    /// ledger record is written in the same call.
    pub fn set_location_quantity(
        &mut self,
        id: &LocationId,
        new_quantity: i64,
    ) -> StockResult<()> {
        self.locations.update_quantity(
            &self.registry,
            &mut self.ledger,
            id,
            new_quantity,
            MovementContext::default(),
        )?;
        info!(location = %id, new_quantity, "location quantity set");
        Ok(())
    }

    pub fn remove_location(&mut self, id: &LocationId) -> StockResult<StockLocation> {
        let location = self.locations.remove_location(id)?;
        info!(location = %id, "stock location removed");
        Ok(location)
    }

    /// Move stock between two locations of the same product.
    pub fn transfer_stock(
        &mut self,
        from: &LocationId,
        to: &LocationId,
        quantity: i64,
    ) -> StockResult<()> {
        self.locations
            .transfer(&self.registry, &mut self.ledger, from, to, quantity)?;
        info!(%from, %to, quantity, "stock transferred");
        Ok(())
    }

    // --- purchase orders ---

    pub fn create_purchase_order(&mut self, spec: NewPurchaseOrder) -> StockResult<&PurchaseOrder> {
        let id = spec.id.clone();
        let order = self.purchasing.create_purchase_order(&self.registry, spec)?;
        info!(order = %id, total = order.total_cost(), "purchase order created");
        Ok(order)
    }

    pub fn update_order_status(
        &mut self,
        id: &PurchaseOrderId,
        status: PurchaseOrderStatus,
        notes: Option<String>,
    ) -> StockResult<()> {
        self.purchasing.update_status(
            &self.registry,
            &mut self.ledger,
            &mut self.locations,
            self.config.provisioning,
            id,
            status,
            None,
            notes,
        )?;
        info!(order = %id, %status, "purchase order status updated");
        Ok(())
    }

    /// Receive an order with explicit delivered quantities instead of the
    /// ordered ones.
    pub fn receive_order_items(
        &mut self,
        id: &PurchaseOrderId,
        items: Vec<ReceiptItem>,
        notes: Option<String>,
    ) -> StockResult<()> {
        self.purchasing.update_status(
            &self.registry,
            &mut self.ledger,
            &mut self.locations,
            self.config.provisioning,
            id,
            PurchaseOrderStatus::Received,
            Some(items),
            notes,
        )?;
        info!(order = %id, "purchase order received");
        Ok(())
    }

    // --- transactions ---

    pub fn create_transaction(&mut self, spec: NewTransaction) -> StockResult<&Transaction> {
        let id = spec.id.clone();
        let transaction_type = spec.transaction_type;
        let transaction = self.transactions.create_transaction(
            &self.registry,
            &mut self.ledger,
            &mut self.locations,
            self.config.provisioning,
            spec,
        )?;
        info!(
            transaction = %id,
            %transaction_type,
            total = transaction.total(),
            "transaction processed"
        );
        Ok(transaction)
    }

    // --- read surface ---

    pub fn registry(&self) -> &EntityRegistry {
        &self.registry
    }

    pub fn purchase_order(&self, id: &PurchaseOrderId) -> Option<&PurchaseOrder> {
        self.purchasing.purchase_order(id)
    }

    pub fn orders_for_supplier(&self, supplier_id: &SupplierId) -> Vec<&PurchaseOrder> {
        self.purchasing.orders_for_supplier(supplier_id)
    }

    pub fn transaction(&self, id: &TransactionId) -> Option<&Transaction> {
        self.transactions.transaction(id)
    }

    pub fn transactions(&self) -> impl Iterator<Item = &Transaction> {
        self.transactions.transactions()
    }

    pub fn location(&self, id: &LocationId) -> Option<&StockLocation> {
        self.locations.location(id)
    }

    /// Live stock for a product, optionally narrowed to one warehouse.
    pub fn current_stock(&self, product_id: &ProductId, warehouse_id: Option<&WarehouseId>) -> i64 {
        self.locations.current_stock(product_id, warehouse_id)
    }

    /// Movement history for a product, filtered and in insertion order.
    pub fn stock_history(
        &self,
        product_id: &ProductId,
        filter: &HistoryFilter,
    ) -> Vec<&StockRecord> {
        self.ledger.history(product_id, filter)
    }

    /// Total value of stock on hand: catalog unit prices times live stock,
    /// summed over every product.
    pub fn inventory_value(&self) -> Cents {
        self.registry
            .inventory_value(|id| self.locations.current_stock(id, None))
    }

    /// Products at or below their reorder threshold, judged against live
    /// stock across all warehouses.
    pub fn low_stock_products(&self) -> Vec<&Product> {
        self.registry
            .low_stock_products(|id| self.locations.current_stock(id, None))
    }

    /// Locations at or under their per-bin minimum.
    pub fn below_minimum_locations(&self) -> Vec<&StockLocation> {
        self.locations.below_minimum()
    }

    /// Whether live stock agrees with the ledger's net quantity for a
    /// product. Holds after every operation; exposed for audits and tests.
    pub fn stock_matches_ledger(&self, product_id: &ProductId) -> bool {
        self.locations.current_stock(product_id, None) == self.ledger.net_quantity(product_id)
    }
}
