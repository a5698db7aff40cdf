//! `stockbook-purchasing`: purchase orders and their lifecycle.
//!
//! An order moves Draft → Approved → Ordered → Shipped → Received →
//! Completed, with cancellation possible until goods ship. The transition
//! into `Received` is where purchased stock lands in the location index and
//! the ledger, atomically for the whole order. Pure domain logic; no IO.

pub mod order;
pub mod status;
pub mod workflow;

pub use order::{
    NewOrderItem, NewPurchaseOrder, OrderItem, PurchaseOrder, PurchaseOrderId, ReceiptItem,
};
pub use status::PurchaseOrderStatus;
pub use workflow::PurchaseOrderWorkflow;
