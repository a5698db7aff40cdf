//! `stockbook-locations`: per-(warehouse, product, bin) quantity records.
//!
//! The location index is the only place quantity is stored "live". Every
//! quantity change writes a ledger record in the same call; that pairing is
//! what keeps live stock and the ledger in agreement. Pure domain logic; no
//! IO.

pub mod index;
pub mod location;
pub mod policy;

pub use index::{MovementContext, NewLocation, ReceiptTarget, StockLocationIndex};
pub use location::{BinCoordinates, StockLocation};
pub use policy::ProvisioningPolicy;
