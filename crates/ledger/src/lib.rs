//! `stockbook-ledger`: append-only, per-product log of stock movements.
//!
//! The ledger is the source of truth for audit and reconciliation: entries
//! are never mutated or removed, which is what makes the conservation
//! invariant (live stock == inbound − outbound since creation) checkable.
//! Pure domain logic; no IO.

pub mod ledger;
pub mod record;

pub use ledger::{HistoryFilter, StockLedger};
pub use record::{Direction, MovementType, NewMovement, StockRecord};
