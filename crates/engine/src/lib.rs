//! `stockbook-engine`: the assembled inventory system.
//!
//! Wires the entity registry, stock ledger, location index, purchase-order
//! workflow, and transaction processor into one [`InventorySystem`] facade,
//! and owns the ambient concerns the domain crates stay free of: config and
//! tracing. Hosts embed this crate and drive it through the facade.

pub mod config;
pub mod system;
pub mod telemetry;

pub use config::EngineConfig;
pub use system::InventorySystem;

pub use stockbook_core::{
    CategoryId, Cents, CustomerId, LocationId, ProductId, ReferenceId, StockError, StockResult,
    SupplierId, WarehouseId,
};
pub use stockbook_ledger::{Direction, HistoryFilter, MovementType, StockRecord};
pub use stockbook_locations::{
    BinCoordinates, NewLocation, ProvisioningPolicy, StockLocation,
};
pub use stockbook_purchasing::{
    NewOrderItem, NewPurchaseOrder, PurchaseOrder, PurchaseOrderId, PurchaseOrderStatus,
    ReceiptItem,
};
pub use stockbook_registry::{ContactInfo, NewCategory, NewProduct, Product};
pub use stockbook_transactions::{
    NewTransaction, NewTransactionItem, Transaction, TransactionId, TransactionType,
};
