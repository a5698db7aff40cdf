//! `stockbook-registry`: keyed stores for products, suppliers, categories,
//! and warehouses.
//!
//! The registry is a collaborator of the stock core: the core only consumes
//! existence checks and price lookups through
//! [`stockbook_core::EntityLookup`]. Referential deletion guards (blocking
//! removal of entities that stock or open orders still reference) live in the
//! engine crate, which is the only place that can see locations and orders.

pub mod entities;
pub mod registry;

pub use entities::{Category, ContactInfo, NewCategory, NewProduct, Product, Supplier, Warehouse};
pub use registry::EntityRegistry;
