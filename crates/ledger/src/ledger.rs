use std::collections::HashMap;

use chrono::{DateTime, Utc};

use stockbook_core::{EntityLookup, ProductId, StockError, StockResult, WarehouseId};

use crate::record::{Direction, MovementType, NewMovement, StockRecord};

/// Filter for ledger history reads. All fields are optional; an empty filter
/// matches every record for the product.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HistoryFilter {
    pub movement_type: Option<MovementType>,
    pub warehouse_id: Option<WarehouseId>,
    pub since: Option<DateTime<Utc>>,
    pub until: Option<DateTime<Utc>>,
}

impl HistoryFilter {
    pub fn with_movement_type(mut self, movement_type: MovementType) -> Self {
        self.movement_type = Some(movement_type);
        self
    }

    pub fn in_warehouse(mut self, warehouse_id: impl Into<WarehouseId>) -> Self {
        self.warehouse_id = Some(warehouse_id.into());
        self
    }

    pub fn between(mut self, since: DateTime<Utc>, until: DateTime<Utc>) -> Self {
        self.since = Some(since);
        self.until = Some(until);
        self
    }

    fn matches(&self, record: &StockRecord) -> bool {
        if let Some(movement_type) = self.movement_type {
            if record.movement_type != movement_type {
                return false;
            }
        }
        if let Some(warehouse_id) = &self.warehouse_id {
            if &record.warehouse_id != warehouse_id {
                return false;
            }
        }
        if let Some(since) = self.since {
            if record.timestamp < since {
                return false;
            }
        }
        if let Some(until) = self.until {
            if record.timestamp > until {
                return false;
            }
        }
        true
    }
}

/// Append-only log of stock movements, grouped per product in insertion
/// order.
#[derive(Debug, Default)]
pub struct StockLedger {
    records: HashMap<ProductId, Vec<StockRecord>>,
}

impl StockLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one immutable record with a generated timestamp.
    ///
    /// Fails with no mutation when the product is unknown, the quantity is
    /// not positive, or the supplied direction contradicts the movement
    /// type.
    pub fn record(
        &mut self,
        lookup: &impl EntityLookup,
        movement: NewMovement,
    ) -> StockResult<&StockRecord> {
        if movement.quantity <= 0 {
            return Err(StockError::invalid_quantity(
                "movement quantity must be positive",
            ));
        }
        if !lookup.product_exists(&movement.product_id) {
            return Err(StockError::not_found(format!(
                "product {}",
                movement.product_id
            )));
        }

        let direction = match (movement.movement_type.implied_direction(), movement.direction)
        {
            (Some(implied), None) => implied,
            (Some(implied), Some(given)) if implied == given => implied,
            (Some(_), Some(_)) => {
                return Err(StockError::validation(
                    "direction contradicts movement type",
                ));
            }
            (None, Some(given)) => given,
            (None, None) => {
                return Err(StockError::validation(
                    "transfer and adjustment movements must specify a direction",
                ));
            }
        };

        let record = StockRecord {
            product_id: movement.product_id.clone(),
            quantity: movement.quantity,
            movement_type: movement.movement_type,
            direction,
            warehouse_id: movement.warehouse_id,
            location_id: movement.location_id,
            reference_id: movement.reference_id,
            notes: movement.notes,
            timestamp: Utc::now(),
        };

        let entries = self.records.entry(movement.product_id).or_default();
        entries.push(record);
        let newest = entries.len() - 1;
        Ok(&entries[newest])
    }

    /// Matching records for a product, in insertion order. Pure read.
    pub fn history(&self, product_id: &ProductId, filter: &HistoryFilter) -> Vec<&StockRecord> {
        self.records
            .get(product_id)
            .map(|entries| entries.iter().filter(|r| filter.matches(r)).collect())
            .unwrap_or_default()
    }

    /// Net ledger quantity for a product: Σ inbound − Σ outbound since
    /// creation. Equal to live stock whenever the conservation invariant
    /// holds.
    pub fn net_quantity(&self, product_id: &ProductId) -> i64 {
        self.records
            .get(product_id)
            .map(|entries| {
                entries
                    .iter()
                    .map(|r| match r.direction {
                        Direction::Inbound => r.quantity,
                        Direction::Outbound => -r.quantity,
                    })
                    .sum()
            })
            .unwrap_or(0)
    }

    /// Number of records for a product.
    pub fn record_count(&self, product_id: &ProductId) -> usize {
        self.records.get(product_id).map(Vec::len).unwrap_or(0)
    }
}
