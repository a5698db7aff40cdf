use serde::{Deserialize, Serialize};

use stockbook_core::{LocationId, ProductId, WarehouseId};

/// Physical coordinates of a bin within a warehouse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BinCoordinates {
    pub zone: String,
    pub aisle: String,
    pub shelf: String,
    pub bin: String,
}

impl BinCoordinates {
    pub fn new(
        zone: impl Into<String>,
        aisle: impl Into<String>,
        shelf: impl Into<String>,
        bin: impl Into<String>,
    ) -> Self {
        Self {
            zone: zone.into(),
            aisle: aisle.into(),
            shelf: shelf.into(),
            bin: bin.into(),
        }
    }

    /// Placeholder coordinates for auto-provisioned locations.
    pub fn unassigned() -> Self {
        Self::new("RECEIVING", "0", "0", "0")
    }
}

/// One bin's worth of a single product.
///
/// Quantity is mutated only through [`crate::StockLocationIndex`], which
/// writes the matching ledger record in the same call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockLocation {
    id: LocationId,
    warehouse_id: WarehouseId,
    product_id: ProductId,
    coordinates: BinCoordinates,
    quantity: i64,
    min_quantity: Option<i64>,
    max_quantity: Option<i64>,
}

impl StockLocation {
    pub(crate) fn new(
        id: LocationId,
        warehouse_id: WarehouseId,
        product_id: ProductId,
        coordinates: BinCoordinates,
        quantity: i64,
        min_quantity: Option<i64>,
        max_quantity: Option<i64>,
    ) -> Self {
        Self {
            id,
            warehouse_id,
            product_id,
            coordinates,
            quantity,
            min_quantity,
            max_quantity,
        }
    }

    pub fn id(&self) -> &LocationId {
        &self.id
    }

    pub fn warehouse_id(&self) -> &WarehouseId {
        &self.warehouse_id
    }

    pub fn product_id(&self) -> &ProductId {
        &self.product_id
    }

    pub fn coordinates(&self) -> &BinCoordinates {
        &self.coordinates
    }

    pub fn quantity(&self) -> i64 {
        self.quantity
    }

    pub fn min_quantity(&self) -> Option<i64> {
        self.min_quantity
    }

    pub fn max_quantity(&self) -> Option<i64> {
        self.max_quantity
    }

    /// At or under the configured minimum.
    pub fn is_below_minimum(&self) -> bool {
        matches!(self.min_quantity, Some(min) if self.quantity <= min)
    }

    pub(crate) fn set_quantity(&mut self, quantity: i64) {
        self.quantity = quantity;
    }
}
