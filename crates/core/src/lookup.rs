//! Collaborator seam consumed by the stock components.

use crate::id::{ProductId, SupplierId, WarehouseId};
use crate::money::Cents;

/// Read-only surface the entity registry exposes to the core.
///
/// The ledger, location index, purchase-order workflow, and transaction
/// processor only ever consume existence checks and price lookups; entity
/// CRUD stays on the registry side of this seam.
pub trait EntityLookup {
    fn product_exists(&self, id: &ProductId) -> bool;

    fn supplier_exists(&self, id: &SupplierId) -> bool;

    fn warehouse_exists(&self, id: &WarehouseId) -> bool;

    /// Current unit price snapshot; `None` when the product is unknown.
    fn unit_price(&self, id: &ProductId) -> Option<Cents>;

    /// The first-registered warehouse, used as the auto-provisioning target
    /// when stock arrives for a product with no location anywhere.
    fn first_warehouse(&self) -> Option<WarehouseId>;
}
