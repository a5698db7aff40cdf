use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockbook_core::{LocationId, ProductId, ReferenceId, WarehouseId};

/// Why a stock record exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MovementType {
    /// Starting quantity recorded when a location is created.
    Initial,
    /// Goods received against a purchase order.
    Purchase,
    /// Goods deducted by a sale transaction.
    Sale,
    /// Goods returned by a customer.
    Return,
    /// Untagged increase through a direct quantity update.
    StockIn,
    /// Untagged decrease through a direct quantity update.
    StockOut,
    /// Administrative correction recorded by an outer layer.
    Adjustment,
    /// One leg of a location-to-location transfer.
    Transfer,
}

/// Whether a movement adds to or draws from stock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Inbound,
    Outbound,
}

impl MovementType {
    /// Direction implied by the movement type. `Transfer` and `Adjustment`
    /// can go either way, so their direction is caller-supplied.
    pub fn implied_direction(self) -> Option<Direction> {
        match self {
            MovementType::Initial
            | MovementType::Purchase
            | MovementType::Return
            | MovementType::StockIn => Some(Direction::Inbound),
            MovementType::Sale | MovementType::StockOut => Some(Direction::Outbound),
            MovementType::Adjustment | MovementType::Transfer => None,
        }
    }
}

/// One immutable stock movement. Grouped per product inside the ledger;
/// never mutated or removed after append.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockRecord {
    pub product_id: ProductId,
    /// Always positive; `direction` carries the sign.
    pub quantity: i64,
    pub movement_type: MovementType,
    pub direction: Direction,
    pub warehouse_id: WarehouseId,
    pub location_id: Option<LocationId>,
    /// Transaction or purchase-order id that caused this movement.
    pub reference_id: Option<ReferenceId>,
    pub notes: Option<String>,
    pub timestamp: DateTime<Utc>,
}

/// A movement about to be appended; the ledger stamps the timestamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMovement {
    pub product_id: ProductId,
    pub quantity: i64,
    pub movement_type: MovementType,
    /// Required for `Transfer` and `Adjustment`, implied otherwise.
    pub direction: Option<Direction>,
    pub warehouse_id: WarehouseId,
    pub location_id: Option<LocationId>,
    pub reference_id: Option<ReferenceId>,
    pub notes: Option<String>,
}

impl NewMovement {
    pub fn new(
        product_id: impl Into<ProductId>,
        quantity: i64,
        movement_type: MovementType,
        warehouse_id: impl Into<WarehouseId>,
    ) -> Self {
        Self {
            product_id: product_id.into(),
            quantity,
            movement_type,
            direction: None,
            warehouse_id: warehouse_id.into(),
            location_id: None,
            reference_id: None,
            notes: None,
        }
    }

    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = Some(direction);
        self
    }

    pub fn at_location(mut self, location_id: impl Into<LocationId>) -> Self {
        self.location_id = Some(location_id.into());
        self
    }

    pub fn with_reference(mut self, reference_id: impl Into<ReferenceId>) -> Self {
        self.reference_id = Some(reference_id.into());
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}
