//! `stockbook-core`: shared foundation for the stock engine.
//!
//! This crate contains **pure domain** primitives (no infrastructure
//! concerns): typed identifiers, the error model, money units, and the
//! collaborator lookup seam consumed by the stock components.

pub mod error;
pub mod id;
pub mod lookup;
pub mod money;

pub use error::{StockError, StockResult};
pub use id::{
    CategoryId, CustomerId, LocationId, ProductId, ReferenceId, SupplierId, WarehouseId,
};
pub use lookup::EntityLookup;
pub use money::{Cents, line_total};
