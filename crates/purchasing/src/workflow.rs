use std::collections::HashMap;

use stockbook_core::{EntityLookup, ProductId, ReferenceId, StockError, StockResult, SupplierId};
use stockbook_ledger::{MovementType, StockLedger};
use stockbook_locations::{MovementContext, ProvisioningPolicy, ReceiptTarget, StockLocationIndex};

use crate::order::{
    NewPurchaseOrder, OrderItem, PurchaseOrder, PurchaseOrderId, ReceiptItem,
};
use crate::status::PurchaseOrderStatus;

/// Purchase orders and their status transitions, in creation order.
///
/// The workflow owns the transition table. Stock lands exactly once, on the
/// transition into `Received`: every line is pre-validated against the
/// location index before anything is written, so a receipt either lands in
/// full or not at all.
#[derive(Debug, Default)]
pub struct PurchaseOrderWorkflow {
    orders: HashMap<PurchaseOrderId, PurchaseOrder>,
    sequence: Vec<PurchaseOrderId>,
}

impl PurchaseOrderWorkflow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an order in `Draft`. Unit prices without an explicit override
    /// are snapshotted from the catalog at this moment.
    pub fn create_purchase_order(
        &mut self,
        lookup: &impl EntityLookup,
        spec: NewPurchaseOrder,
    ) -> StockResult<&PurchaseOrder> {
        if self.orders.contains_key(&spec.id) {
            return Err(StockError::duplicate_id(spec.id.as_str()));
        }
        if !lookup.supplier_exists(&spec.supplier_id) {
            return Err(StockError::not_found(format!(
                "supplier {}",
                spec.supplier_id
            )));
        }
        if spec.items.is_empty() {
            return Err(StockError::validation(
                "purchase order must have at least one item",
            ));
        }

        let mut items = Vec::with_capacity(spec.items.len());
        for item in spec.items {
            if !lookup.product_exists(&item.product_id) {
                return Err(StockError::not_found(format!(
                    "product {}",
                    item.product_id
                )));
            }
            if item.quantity <= 0 {
                return Err(StockError::invalid_quantity(format!(
                    "order quantity for product {} must be positive",
                    item.product_id
                )));
            }
            let unit_price = match item.unit_price {
                Some(price) => price,
                None => lookup.unit_price(&item.product_id).ok_or_else(|| {
                    StockError::not_found(format!("product {}", item.product_id))
                })?,
            };
            if unit_price <= 0 {
                return Err(StockError::invalid_quantity(format!(
                    "order unit price for product {} must be positive",
                    item.product_id
                )));
            }
            items.push(OrderItem {
                product_id: item.product_id,
                quantity: item.quantity,
                unit_price,
            });
        }

        let id = spec.id.clone();
        let order = PurchaseOrder::new(
            spec.id,
            spec.supplier_id,
            items,
            spec.expected_delivery_date,
            spec.notes,
        );
        self.sequence.push(id.clone());
        Ok(self.orders.entry(id).or_insert(order))
    }

    /// Move an order to a new status.
    ///
    /// On the transition to `Received`, `received_items` overrides the
    /// ordered quantities with what actually arrived; `None` receives the
    /// order in full. `notes` replaces the order's notes and, on a receipt,
    /// becomes the ledger note for the landed stock. Fails without mutation
    /// when the order is unknown, already terminal, the transition is not in
    /// the table, or any received line cannot land under the provisioning
    /// policy.
    pub fn update_status(
        &mut self,
        lookup: &impl EntityLookup,
        ledger: &mut StockLedger,
        index: &mut StockLocationIndex,
        policy: ProvisioningPolicy,
        id: &PurchaseOrderId,
        next: PurchaseOrderStatus,
        received_items: Option<Vec<ReceiptItem>>,
        notes: Option<String>,
    ) -> StockResult<()> {
        let order = self
            .orders
            .get(id)
            .ok_or_else(|| StockError::not_found(format!("purchase order {id}")))?;
        let current = order.status();
        if current.is_terminal() {
            return Err(StockError::invalid_state(format!(
                "purchase order {id} is {current} and accepts no further changes"
            )));
        }
        if !current.can_transition_to(next) {
            return Err(StockError::invalid_state(format!(
                "cannot move purchase order {id} from {current} to {next}"
            )));
        }
        if received_items.is_some() && next != PurchaseOrderStatus::Received {
            return Err(StockError::validation(
                "received items are only accepted on the transition to received",
            ));
        }

        if next == PurchaseOrderStatus::Received {
            self.receive_goods(lookup, ledger, index, policy, id, received_items, notes.as_deref())?;
        }
        if let Some(order) = self.orders.get_mut(id) {
            order.set_status(next);
            if let Some(notes) = notes {
                order.set_notes(notes);
            }
        }
        Ok(())
    }

    /// Land the delivery in stock, all or nothing.
    ///
    /// Lines are aggregated per product so a delivery listing the same
    /// product twice produces a single ledger record. Every target is
    /// resolved before the first write.
    fn receive_goods(
        &mut self,
        lookup: &impl EntityLookup,
        ledger: &mut StockLedger,
        index: &mut StockLocationIndex,
        policy: ProvisioningPolicy,
        id: &PurchaseOrderId,
        received_items: Option<Vec<ReceiptItem>>,
        notes: Option<&str>,
    ) -> StockResult<()> {
        let order = self
            .orders
            .get(id)
            .ok_or_else(|| StockError::not_found(format!("purchase order {id}")))?;

        let mut demand: Vec<(ProductId, i64)> = Vec::new();
        match received_items {
            Some(received) => {
                if received.is_empty() {
                    return Err(StockError::validation(
                        "received items cannot be empty",
                    ));
                }
                for item in received {
                    if !order.references_product(&item.product_id) {
                        return Err(StockError::validation(format!(
                            "product {} is not on purchase order {id}",
                            item.product_id
                        )));
                    }
                    if item.quantity <= 0 {
                        return Err(StockError::invalid_quantity(format!(
                            "received quantity for product {} must be positive",
                            item.product_id
                        )));
                    }
                    match demand.iter_mut().find(|(p, _)| p == &item.product_id) {
                        Some((_, quantity)) => *quantity += item.quantity,
                        None => demand.push((item.product_id, item.quantity)),
                    }
                }
            }
            None => {
                for item in order.items() {
                    match demand.iter_mut().find(|(p, _)| p == &item.product_id) {
                        Some((_, quantity)) => *quantity += item.quantity,
                        None => demand.push((item.product_id.clone(), item.quantity)),
                    }
                }
            }
        }

        let mut planned: Vec<(ProductId, i64, ReceiptTarget)> = Vec::with_capacity(demand.len());
        for (product_id, quantity) in demand {
            let target = index.plan_receipt(lookup, policy, &product_id)?;
            planned.push((product_id, quantity, target));
        }

        let note = notes
            .map(str::to_owned)
            .unwrap_or_else(|| format!("Received from PO: {id}"));
        for (product_id, quantity, target) in planned {
            index.apply_receipt(
                lookup,
                ledger,
                target,
                &product_id,
                quantity,
                MovementContext::tagged(MovementType::Purchase)
                    .with_reference(ReferenceId::new(id.as_str()))
                    .with_notes(note.clone()),
            )?;
        }

        if let Some(order) = self.orders.get_mut(id) {
            order.mark_received();
        }
        Ok(())
    }

    pub fn purchase_order(&self, id: &PurchaseOrderId) -> Option<&PurchaseOrder> {
        self.orders.get(id)
    }

    /// All orders in creation order.
    pub fn purchase_orders(&self) -> impl Iterator<Item = &PurchaseOrder> {
        self.sequence.iter().filter_map(|id| self.orders.get(id))
    }

    /// Orders for one supplier, in creation order.
    pub fn orders_for_supplier(&self, supplier_id: &SupplierId) -> Vec<&PurchaseOrder> {
        self.purchase_orders()
            .filter(|o| o.supplier_id() == supplier_id)
            .collect()
    }

    /// Whether any non-terminal order still references the product. Used to
    /// guard product deletion.
    pub fn has_open_orders_for(&self, product_id: &ProductId) -> bool {
        self.orders
            .values()
            .any(|o| !o.status().is_terminal() && o.references_product(product_id))
    }

    /// Whether any non-terminal order is placed with the supplier. Used to
    /// guard supplier deletion.
    pub fn has_open_orders_with(&self, supplier_id: &SupplierId) -> bool {
        self.orders
            .values()
            .any(|o| !o.status().is_terminal() && o.supplier_id() == supplier_id)
    }
}
