use std::collections::HashMap;

use stockbook_core::{
    EntityLookup, LocationId, ProductId, ReferenceId, StockError, StockResult, WarehouseId,
};
use stockbook_ledger::{Direction, MovementType, NewMovement, StockLedger};

use crate::location::{BinCoordinates, StockLocation};
use crate::policy::ProvisioningPolicy;

/// Attributes for a location being created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLocation {
    pub id: LocationId,
    pub warehouse_id: WarehouseId,
    pub product_id: ProductId,
    pub coordinates: BinCoordinates,
    pub quantity: i64,
    pub min_quantity: Option<i64>,
    pub max_quantity: Option<i64>,
}

impl NewLocation {
    pub fn new(
        id: impl Into<LocationId>,
        warehouse_id: impl Into<WarehouseId>,
        product_id: impl Into<ProductId>,
        coordinates: BinCoordinates,
        quantity: i64,
    ) -> Self {
        Self {
            id: id.into(),
            warehouse_id: warehouse_id.into(),
            product_id: product_id.into(),
            coordinates,
            quantity,
            min_quantity: None,
            max_quantity: None,
        }
    }

    pub fn with_min_quantity(mut self, min_quantity: i64) -> Self {
        self.min_quantity = Some(min_quantity);
        self
    }

    pub fn with_max_quantity(mut self, max_quantity: i64) -> Self {
        self.max_quantity = Some(max_quantity);
        self
    }
}

/// How the matching ledger record for a quantity change is tagged.
///
/// Without a tag, increases are recorded as `StockIn` and decreases as
/// `StockOut`; purchase-order receipts, sales, and returns override the
/// movement type and attach the causing id.
#[derive(Debug, Clone, Default)]
pub struct MovementContext {
    pub movement_type: Option<MovementType>,
    pub reference_id: Option<ReferenceId>,
    pub notes: Option<String>,
}

impl MovementContext {
    pub fn tagged(movement_type: MovementType) -> Self {
        Self {
            movement_type: Some(movement_type),
            ..Self::default()
        }
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

/// Where an incoming quantity for a product will land.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReceiptTarget {
    /// First existing location for the product, in insertion order.
    Existing(LocationId),
    /// No location exists anywhere; a placeholder will be synthesized in
    /// this warehouse.
    Provision(WarehouseId),
}

/// Live per-bin quantities, indexed by location id with a secondary
/// product → locations index in insertion order.
///
/// The insertion-ordered secondary index is load-bearing: it fixes the
/// allocation order for sales and the first-match tie-break for receipts.
#[derive(Debug, Default)]
pub struct StockLocationIndex {
    locations: HashMap<LocationId, StockLocation>,
    by_product: HashMap<ProductId, Vec<LocationId>>,
}

impl StockLocationIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a location and, when its starting quantity is positive, emit
    /// the matching `Initial` ledger record.
    pub fn add_location(
        &mut self,
        lookup: &impl EntityLookup,
        ledger: &mut StockLedger,
        spec: NewLocation,
    ) -> StockResult<&StockLocation> {
        if self.locations.contains_key(&spec.id) {
            return Err(StockError::duplicate_id(spec.id.as_str()));
        }
        if !lookup.warehouse_exists(&spec.warehouse_id) {
            return Err(StockError::not_found(format!(
                "warehouse {}",
                spec.warehouse_id
            )));
        }
        if !lookup.product_exists(&spec.product_id) {
            return Err(StockError::not_found(format!("product {}", spec.product_id)));
        }
        if spec.quantity < 0 {
            return Err(StockError::invalid_quantity(
                "starting quantity cannot be negative",
            ));
        }
        if let (Some(min), Some(max)) = (spec.min_quantity, spec.max_quantity) {
            if min > max {
                return Err(StockError::validation(
                    "min quantity cannot exceed max quantity",
                ));
            }
        }

        if spec.quantity > 0 {
            ledger.record(
                lookup,
                NewMovement::new(
                    spec.product_id.clone(),
                    spec.quantity,
                    MovementType::Initial,
                    spec.warehouse_id.clone(),
                )
                .at_location(spec.id.clone()),
            )?;
        }

        let location = StockLocation::new(
            spec.id.clone(),
            spec.warehouse_id,
            spec.product_id.clone(),
            spec.coordinates,
            spec.quantity,
            spec.min_quantity,
            spec.max_quantity,
        );
        self.by_product
            .entry(spec.product_id)
            .or_default()
            .push(spec.id.clone());
        Ok(self.locations.entry(spec.id).or_insert(location))
    }

    /// Set a location's quantity and emit the matching ledger record.
    ///
    /// delta > 0 records an inbound movement, delta < 0 an outbound movement
    /// of |delta|, delta = 0 is a no-op with no ledger entry.
    pub fn update_quantity(
        &mut self,
        lookup: &impl EntityLookup,
        ledger: &mut StockLedger,
        id: &LocationId,
        new_quantity: i64,
        ctx: MovementContext,
    ) -> StockResult<()> {
        if new_quantity < 0 {
            return Err(StockError::invalid_quantity(
                "location quantity cannot be negative",
            ));
        }
        let location = self
            .locations
            .get(id)
            .ok_or_else(|| StockError::not_found(format!("location {id}")))?;

        let delta = new_quantity - location.quantity();
        if delta == 0 {
            return Ok(());
        }
        let direction = if delta > 0 {
            Direction::Inbound
        } else {
            Direction::Outbound
        };
        let movement_type = ctx.movement_type.unwrap_or(match direction {
            Direction::Inbound => MovementType::StockIn,
            Direction::Outbound => MovementType::StockOut,
        });
        if let Some(implied) = movement_type.implied_direction() {
            if implied != direction {
                return Err(StockError::validation(
                    "movement type contradicts the quantity delta",
                ));
            }
        }

        let mut movement = NewMovement::new(
            location.product_id().clone(),
            delta.abs(),
            movement_type,
            location.warehouse_id().clone(),
        )
        .at_location(id.clone());
        if movement_type.implied_direction().is_none() {
            movement = movement.with_direction(direction);
        }
        if let Some(reference_id) = ctx.reference_id {
            movement = movement.with_reference(reference_id);
        }
        if let Some(notes) = ctx.notes {
            movement = movement.with_notes(notes);
        }
        ledger.record(lookup, movement)?;

        if let Some(location) = self.locations.get_mut(id) {
            location.set_quantity(new_quantity);
        }
        Ok(())
    }

    /// Delete a location. Stock may never be silently discarded, so this
    /// fails unless the quantity is exactly 0.
    pub fn remove_location(&mut self, id: &LocationId) -> StockResult<StockLocation> {
        let location = self
            .locations
            .get(id)
            .ok_or_else(|| StockError::not_found(format!("location {id}")))?;
        if location.quantity() != 0 {
            return Err(StockError::invalid_state(format!(
                "location {id} still holds {} units",
                location.quantity()
            )));
        }
        let product_id = location.product_id().clone();
        if let Some(ids) = self.by_product.get_mut(&product_id) {
            ids.retain(|l| l != id);
            if ids.is_empty() {
                self.by_product.remove(&product_id);
            }
        }
        self.locations
            .remove(id)
            .ok_or_else(|| StockError::not_found(format!("location {id}")))
    }

    pub fn location(&self, id: &LocationId) -> Option<&StockLocation> {
        self.locations.get(id)
    }

    /// Locations holding a product, in insertion order.
    pub fn locations_for_product(
        &self,
        product_id: &ProductId,
    ) -> impl Iterator<Item = &StockLocation> {
        self.by_product
            .get(product_id)
            .into_iter()
            .flatten()
            .filter_map(|id| self.locations.get(id))
    }

    /// Sum of matching locations' quantities.
    pub fn current_stock(&self, product_id: &ProductId, warehouse_id: Option<&WarehouseId>) -> i64 {
        self.locations_for_product(product_id)
            .filter(|l| warehouse_id.is_none_or(|w| l.warehouse_id() == w))
            .map(StockLocation::quantity)
            .sum()
    }

    pub fn has_locations_for(&self, product_id: &ProductId) -> bool {
        self.by_product.contains_key(product_id)
    }

    pub fn has_locations_in(&self, warehouse_id: &WarehouseId) -> bool {
        self.locations.values().any(|l| l.warehouse_id() == warehouse_id)
    }

    /// Locations at or under their minimum quantity.
    pub fn below_minimum(&self) -> Vec<&StockLocation> {
        self.locations
            .values()
            .filter(|l| l.is_below_minimum())
            .collect()
    }

    /// Resolve where an incoming quantity for a product will land, without
    /// mutating anything. Used to pre-validate all-or-nothing receipts.
    pub fn plan_receipt(
        &self,
        lookup: &impl EntityLookup,
        policy: ProvisioningPolicy,
        product_id: &ProductId,
    ) -> StockResult<ReceiptTarget> {
        if let Some(id) = self.by_product.get(product_id).and_then(|ids| ids.first()) {
            return Ok(ReceiptTarget::Existing(id.clone()));
        }
        match policy {
            ProvisioningPolicy::AutoProvision => lookup
                .first_warehouse()
                .map(ReceiptTarget::Provision)
                .ok_or_else(|| {
                    StockError::not_found("no warehouse registered for auto-provisioning")
                }),
            ProvisioningPolicy::Reject => Err(StockError::invalid_state(format!(
                "no stock location exists for product {product_id}"
            ))),
        }
    }

    /// Land an incoming quantity on a planned target, synthesizing the
    /// placeholder location first when the plan calls for it.
    pub fn apply_receipt(
        &mut self,
        lookup: &impl EntityLookup,
        ledger: &mut StockLedger,
        target: ReceiptTarget,
        product_id: &ProductId,
        quantity: i64,
        ctx: MovementContext,
    ) -> StockResult<LocationId> {
        if quantity <= 0 {
            return Err(StockError::invalid_quantity(
                "received quantity must be positive",
            ));
        }
        let location_id = match target {
            ReceiptTarget::Existing(id) => {
                let location = self
                    .locations
                    .get(&id)
                    .ok_or_else(|| StockError::not_found(format!("location {id}")))?;
                if location.product_id() != product_id {
                    return Err(StockError::validation(format!(
                        "location {id} does not hold product {product_id}"
                    )));
                }
                id
            }
            ReceiptTarget::Provision(warehouse_id) => {
                let id = LocationId::generate();
                self.add_location(
                    lookup,
                    ledger,
                    NewLocation::new(
                        id.clone(),
                        warehouse_id,
                        product_id.clone(),
                        BinCoordinates::unassigned(),
                        0,
                    ),
                )?;
                id
            }
        };

        let current = self
            .locations
            .get(&location_id)
            .ok_or_else(|| StockError::not_found(format!("location {location_id}")))?
            .quantity();
        let new_quantity = current.checked_add(quantity).ok_or_else(|| {
            StockError::invalid_quantity(format!(
                "received quantity overflows location {location_id}"
            ))
        })?;
        self.update_quantity(lookup, ledger, &location_id, new_quantity, ctx)?;
        Ok(location_id)
    }

    /// Move quantity between two locations of the same product, emitting a
    /// paired outbound/inbound `Transfer` ledger record. Net stock for the
    /// product is unchanged.
    pub fn transfer(
        &mut self,
        lookup: &impl EntityLookup,
        ledger: &mut StockLedger,
        from: &LocationId,
        to: &LocationId,
        quantity: i64,
    ) -> StockResult<()> {
        if quantity <= 0 {
            return Err(StockError::invalid_quantity(
                "transfer quantity must be positive",
            ));
        }
        if from == to {
            return Err(StockError::validation(
                "cannot transfer a location onto itself",
            ));
        }
        let source = self
            .locations
            .get(from)
            .ok_or_else(|| StockError::not_found(format!("location {from}")))?;
        let target = self
            .locations
            .get(to)
            .ok_or_else(|| StockError::not_found(format!("location {to}")))?;
        if source.product_id() != target.product_id() {
            return Err(StockError::validation(
                "transfer requires both locations to hold the same product",
            ));
        }
        if source.quantity() < quantity {
            return Err(StockError::insufficient_stock(
                source.product_id().as_str(),
                quantity,
                source.quantity(),
            ));
        }

        let product_id = source.product_id().clone();
        let source_quantity = source.quantity();
        let target_quantity = target.quantity();
        let source_warehouse = source.warehouse_id().clone();
        let target_warehouse = target.warehouse_id().clone();

        ledger.record(
            lookup,
            NewMovement::new(
                product_id.clone(),
                quantity,
                MovementType::Transfer,
                source_warehouse,
            )
            .with_direction(Direction::Outbound)
            .at_location(from.clone())
            .with_notes(format!("transfer to {to}")),
        )?;
        ledger.record(
            lookup,
            NewMovement::new(product_id, quantity, MovementType::Transfer, target_warehouse)
                .with_direction(Direction::Inbound)
                .at_location(to.clone())
                .with_notes(format!("transfer from {from}")),
        )?;

        if let Some(source) = self.locations.get_mut(from) {
            source.set_quantity(source_quantity - quantity);
        }
        if let Some(target) = self.locations.get_mut(to) {
            target.set_quantity(target_quantity + quantity);
        }
        Ok(())
    }
}
