use std::collections::HashMap;

use stockbook_core::{
    CustomerId, EntityLookup, LocationId, ProductId, ReferenceId, StockError, StockResult,
};
use stockbook_ledger::{MovementType, StockLedger};
use stockbook_locations::{MovementContext, ProvisioningPolicy, ReceiptTarget, StockLocationIndex};

use crate::transaction::{
    NewTransaction, Transaction, TransactionId, TransactionItem, TransactionType,
};

/// Processes sales, returns, and adjustments against live stock.
///
/// Every transaction is all-or-nothing: validation and planning run over the
/// whole item list before the first write, so a failing line leaves stock,
/// ledger, and the transaction log untouched.
#[derive(Debug, Default)]
pub struct TransactionProcessor {
    transactions: HashMap<TransactionId, Transaction>,
    sequence: Vec<TransactionId>,
}

impl TransactionProcessor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create_transaction(
        &mut self,
        lookup: &impl EntityLookup,
        ledger: &mut StockLedger,
        index: &mut StockLocationIndex,
        policy: ProvisioningPolicy,
        spec: NewTransaction,
    ) -> StockResult<&Transaction> {
        if self.transactions.contains_key(&spec.id) {
            return Err(StockError::duplicate_id(spec.id.as_str()));
        }
        if spec.items.is_empty() {
            return Err(StockError::validation(
                "transaction must have at least one item",
            ));
        }

        let mut items = Vec::with_capacity(spec.items.len());
        for item in &spec.items {
            if !lookup.product_exists(&item.product_id) {
                return Err(StockError::not_found(format!(
                    "product {}",
                    item.product_id
                )));
            }
            if item.quantity <= 0 {
                return Err(StockError::invalid_quantity(format!(
                    "transaction quantity for product {} must be positive",
                    item.product_id
                )));
            }
            let unit_price = lookup.unit_price(&item.product_id).ok_or_else(|| {
                StockError::not_found(format!("product {}", item.product_id))
            })?;
            items.push(TransactionItem {
                product_id: item.product_id.clone(),
                quantity: item.quantity,
                unit_price,
            });
        }

        // Demand per product, first-seen order. Duplicate lines for the same
        // product are validated and moved as one cumulative quantity.
        let mut demand: Vec<(ProductId, i64)> = Vec::new();
        for item in &items {
            match demand.iter_mut().find(|(p, _)| p == &item.product_id) {
                Some((_, quantity)) => *quantity += item.quantity,
                None => demand.push((item.product_id.clone(), item.quantity)),
            }
        }

        let reference = ReferenceId::new(spec.id.as_str());
        match spec.transaction_type {
            TransactionType::Sale => {
                Self::process_sale(lookup, ledger, index, &demand, &reference)?
            }
            TransactionType::Return => {
                Self::process_return(lookup, ledger, index, policy, &demand, &reference)?
            }
            TransactionType::Adjustment => {}
        }

        let transaction = Transaction::new(
            spec.id.clone(),
            spec.transaction_type,
            spec.customer_id,
            items,
            spec.notes,
        );
        self.sequence.push(spec.id.clone());
        Ok(self.transactions.entry(spec.id).or_insert(transaction))
    }

    /// Drain demand greedily across each product's locations in insertion
    /// order. The whole sale is checked against total stock first.
    fn process_sale(
        lookup: &impl EntityLookup,
        ledger: &mut StockLedger,
        index: &mut StockLocationIndex,
        demand: &[(ProductId, i64)],
        reference: &ReferenceId,
    ) -> StockResult<()> {
        for (product_id, quantity) in demand {
            let available = index.current_stock(product_id, None);
            if available < *quantity {
                return Err(StockError::insufficient_stock(
                    product_id.as_str(),
                    *quantity,
                    available,
                ));
            }
        }

        // Availability is proven; plan the drain, then write it out.
        let mut plan: Vec<(LocationId, i64)> = Vec::new();
        for (product_id, quantity) in demand {
            let mut remaining = *quantity;
            for location in index.locations_for_product(product_id) {
                if remaining == 0 {
                    break;
                }
                let take = remaining.min(location.quantity());
                if take == 0 {
                    continue;
                }
                plan.push((location.id().clone(), location.quantity() - take));
                remaining -= take;
            }
        }

        for (location_id, new_quantity) in plan {
            index.update_quantity(
                lookup,
                ledger,
                &location_id,
                new_quantity,
                MovementContext::tagged(MovementType::Sale).with_reference(reference.clone()),
            )?;
        }
        Ok(())
    }

    /// Land returned goods like a receipt: first location per product, or an
    /// auto-provisioned one under the default policy.
    fn process_return(
        lookup: &impl EntityLookup,
        ledger: &mut StockLedger,
        index: &mut StockLocationIndex,
        policy: ProvisioningPolicy,
        demand: &[(ProductId, i64)],
        reference: &ReferenceId,
    ) -> StockResult<()> {
        let mut planned: Vec<(&ProductId, i64, ReceiptTarget)> = Vec::with_capacity(demand.len());
        for (product_id, quantity) in demand {
            let target = index.plan_receipt(lookup, policy, product_id)?;
            planned.push((product_id, *quantity, target));
        }

        for (product_id, quantity, target) in planned {
            index.apply_receipt(
                lookup,
                ledger,
                target,
                product_id,
                quantity,
                MovementContext::tagged(MovementType::Return).with_reference(reference.clone()),
            )?;
        }
        Ok(())
    }

    pub fn transaction(&self, id: &TransactionId) -> Option<&Transaction> {
        self.transactions.get(id)
    }

    /// All transactions in creation order.
    pub fn transactions(&self) -> impl Iterator<Item = &Transaction> {
        self.sequence.iter().filter_map(|id| self.transactions.get(id))
    }

    /// Transactions for one customer, in creation order.
    pub fn transactions_for_customer(&self, customer_id: &CustomerId) -> Vec<&Transaction> {
        self.transactions()
            .filter(|t| t.customer_id() == Some(customer_id))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transaction::NewTransactionItem;
    use proptest::prelude::*;
    use stockbook_core::WarehouseId;
    use stockbook_ledger::{Direction, HistoryFilter};
    use stockbook_locations::{BinCoordinates, NewLocation};
    use stockbook_registry::{EntityRegistry, NewProduct};

    fn catalog() -> EntityRegistry {
        let mut registry = EntityRegistry::new();
        registry.add_warehouse("W1", "Main", None).unwrap();
        registry.add_warehouse("W2", "Annex", None).unwrap();
        registry
            .add_product(NewProduct::new("P1", "Widget", "WID-1", 200))
            .unwrap();
        registry
            .add_product(NewProduct::new("P2", "Gadget", "GAD-1", 500))
            .unwrap();
        registry
    }

    fn stocked_index(
        catalog: &EntityRegistry,
        ledger: &mut StockLedger,
        quantities: &[(&str, &str, &str, i64)],
    ) -> StockLocationIndex {
        let mut index = StockLocationIndex::new();
        for (location, warehouse, product, quantity) in quantities {
            index
                .add_location(
                    catalog,
                    ledger,
                    NewLocation::new(
                        *location,
                        *warehouse,
                        *product,
                        BinCoordinates::new("A", "1", "1", "1"),
                        *quantity,
                    ),
                )
                .unwrap();
        }
        index
    }

    fn p1() -> ProductId {
        ProductId::new("P1")
    }

    fn sale(id: &str, items: &[(&str, i64)]) -> NewTransaction {
        items.iter().fold(
            NewTransaction::new(id, TransactionType::Sale),
            |spec, (product, quantity)| {
                spec.with_item(NewTransactionItem::new(*product, *quantity))
            },
        )
    }

    #[test]
    fn sale_drains_locations_in_insertion_order() {
        let catalog = catalog();
        let mut ledger = StockLedger::new();
        let mut index = stocked_index(
            &catalog,
            &mut ledger,
            &[("L1", "W1", "P1", 30), ("L2", "W2", "P1", 50)],
        );
        let mut processor = TransactionProcessor::new();

        let transaction = processor
            .create_transaction(
                &catalog,
                &mut ledger,
                &mut index,
                ProvisioningPolicy::AutoProvision,
                sale("T1", &[("P1", 45)]).for_customer("C1"),
            )
            .unwrap();
        assert_eq!(transaction.total(), 45 * 200);

        // L1 drains to zero, the remainder comes out of L2.
        assert_eq!(index.location(&LocationId::new("L1")).unwrap().quantity(), 0);
        assert_eq!(index.location(&LocationId::new("L2")).unwrap().quantity(), 35);
        assert_eq!(index.current_stock(&p1(), None), 35);
        assert_eq!(ledger.net_quantity(&p1()), 35);

        let sales = ledger.history(
            &p1(),
            &HistoryFilter::default().with_movement_type(MovementType::Sale),
        );
        assert_eq!(sales.len(), 2);
        assert_eq!(sales[0].quantity, 30);
        assert_eq!(sales[1].quantity, 15);
        assert!(sales.iter().all(|r| r.direction == Direction::Outbound));
        assert!(
            sales
                .iter()
                .all(|r| r.reference_id == Some(ReferenceId::new("T1")))
        );
    }

    #[test]
    fn sale_fails_whole_when_any_product_is_short() {
        let catalog = catalog();
        let mut ledger = StockLedger::new();
        let mut index = stocked_index(
            &catalog,
            &mut ledger,
            &[("L1", "W1", "P1", 100), ("L2", "W1", "P2", 3)],
        );
        let mut processor = TransactionProcessor::new();

        let err = processor
            .create_transaction(
                &catalog,
                &mut ledger,
                &mut index,
                ProvisioningPolicy::AutoProvision,
                sale("T1", &[("P1", 10), ("P2", 5)]),
            )
            .unwrap_err();
        assert_eq!(
            err,
            StockError::insufficient_stock("P2", 5, 3)
        );

        // Nothing moved, nothing logged, nothing recorded.
        assert_eq!(index.current_stock(&p1(), None), 100);
        assert_eq!(index.current_stock(&ProductId::new("P2"), None), 3);
        assert!(
            ledger
                .history(
                    &p1(),
                    &HistoryFilter::default().with_movement_type(MovementType::Sale)
                )
                .is_empty()
        );
        assert!(processor.transaction(&TransactionId::new("T1")).is_none());
    }

    #[test]
    fn duplicate_sale_lines_are_checked_cumulatively() {
        let catalog = catalog();
        let mut ledger = StockLedger::new();
        let mut index = stocked_index(&catalog, &mut ledger, &[("L1", "W1", "P1", 10)]);
        let mut processor = TransactionProcessor::new();

        // 7 + 7 exceeds the 10 on hand even though each line alone fits.
        let err = processor
            .create_transaction(
                &catalog,
                &mut ledger,
                &mut index,
                ProvisioningPolicy::AutoProvision,
                sale("T1", &[("P1", 7), ("P1", 7)]),
            )
            .unwrap_err();
        assert_eq!(err, StockError::insufficient_stock("P1", 14, 10));
        assert_eq!(index.current_stock(&p1(), None), 10);
    }

    #[test]
    fn sale_of_exact_stock_leaves_zero() {
        let catalog = catalog();
        let mut ledger = StockLedger::new();
        let mut index = stocked_index(&catalog, &mut ledger, &[("L1", "W1", "P1", 10)]);
        let mut processor = TransactionProcessor::new();

        processor
            .create_transaction(
                &catalog,
                &mut ledger,
                &mut index,
                ProvisioningPolicy::AutoProvision,
                sale("T1", &[("P1", 10)]),
            )
            .unwrap();
        assert_eq!(index.current_stock(&p1(), None), 0);
        assert_eq!(ledger.net_quantity(&p1()), 0);
    }

    #[test]
    fn return_lands_in_first_existing_location() {
        let catalog = catalog();
        let mut ledger = StockLedger::new();
        let mut index = stocked_index(
            &catalog,
            &mut ledger,
            &[("L1", "W1", "P1", 5), ("L2", "W2", "P1", 5)],
        );
        let mut processor = TransactionProcessor::new();

        processor
            .create_transaction(
                &catalog,
                &mut ledger,
                &mut index,
                ProvisioningPolicy::AutoProvision,
                NewTransaction::new("T1", TransactionType::Return)
                    .with_item(NewTransactionItem::new("P1", 3))
                    .for_customer("C1"),
            )
            .unwrap();

        assert_eq!(index.location(&LocationId::new("L1")).unwrap().quantity(), 8);
        assert_eq!(index.location(&LocationId::new("L2")).unwrap().quantity(), 5);

        let returns = ledger.history(
            &p1(),
            &HistoryFilter::default().with_movement_type(MovementType::Return),
        );
        assert_eq!(returns.len(), 1);
        assert_eq!(returns[0].direction, Direction::Inbound);
        assert_eq!(returns[0].reference_id, Some(ReferenceId::new("T1")));
    }

    #[test]
    fn return_auto_provisions_unstocked_product() {
        let catalog = catalog();
        let mut ledger = StockLedger::new();
        let mut index = StockLocationIndex::new();
        let mut processor = TransactionProcessor::new();

        processor
            .create_transaction(
                &catalog,
                &mut ledger,
                &mut index,
                ProvisioningPolicy::AutoProvision,
                NewTransaction::new("T1", TransactionType::Return)
                    .with_item(NewTransactionItem::new("P1", 3)),
            )
            .unwrap();

        assert_eq!(index.current_stock(&p1(), Some(&WarehouseId::new("W1"))), 3);
    }

    #[test]
    fn return_is_all_or_nothing_under_reject_policy() {
        let catalog = catalog();
        let mut ledger = StockLedger::new();
        let mut index = stocked_index(&catalog, &mut ledger, &[("L1", "W1", "P1", 5)]);
        let mut processor = TransactionProcessor::new();

        // P2 has no location; under Reject the whole return must fail.
        let err = processor
            .create_transaction(
                &catalog,
                &mut ledger,
                &mut index,
                ProvisioningPolicy::Reject,
                NewTransaction::new("T1", TransactionType::Return)
                    .with_item(NewTransactionItem::new("P1", 3))
                    .with_item(NewTransactionItem::new("P2", 1)),
            )
            .unwrap_err();
        assert!(matches!(err, StockError::InvalidState(_)));
        assert_eq!(index.current_stock(&p1(), None), 5);
        assert!(processor.transaction(&TransactionId::new("T1")).is_none());
    }

    #[test]
    fn adjustment_moves_no_stock_but_is_recorded() {
        let catalog = catalog();
        let mut ledger = StockLedger::new();
        let mut index = stocked_index(&catalog, &mut ledger, &[("L1", "W1", "P1", 5)]);
        let mut processor = TransactionProcessor::new();

        let transaction = processor
            .create_transaction(
                &catalog,
                &mut ledger,
                &mut index,
                ProvisioningPolicy::AutoProvision,
                NewTransaction::new("T1", TransactionType::Adjustment)
                    .with_item(NewTransactionItem::new("P1", 2))
                    .with_notes("cycle count correction pending"),
            )
            .unwrap();
        assert_eq!(transaction.total(), 2 * 200);
        assert_eq!(transaction.notes(), Some("cycle count correction pending"));

        assert_eq!(index.current_stock(&p1(), None), 5);
        // Only the Initial record from stocking exists.
        assert_eq!(ledger.record_count(&p1()), 1);
    }

    #[test]
    fn create_rejects_bad_input() {
        let catalog = catalog();
        let mut ledger = StockLedger::new();
        let mut index = stocked_index(&catalog, &mut ledger, &[("L1", "W1", "P1", 50)]);
        let mut processor = TransactionProcessor::new();
        processor
            .create_transaction(
                &catalog,
                &mut ledger,
                &mut index,
                ProvisioningPolicy::AutoProvision,
                sale("T1", &[("P1", 1)]),
            )
            .unwrap();

        let err = processor
            .create_transaction(
                &catalog,
                &mut ledger,
                &mut index,
                ProvisioningPolicy::AutoProvision,
                sale("T1", &[("P1", 1)]),
            )
            .unwrap_err();
        assert_eq!(err, StockError::duplicate_id("T1"));

        let err = processor
            .create_transaction(
                &catalog,
                &mut ledger,
                &mut index,
                ProvisioningPolicy::AutoProvision,
                NewTransaction::new("T2", TransactionType::Sale),
            )
            .unwrap_err();
        assert!(matches!(err, StockError::Validation(_)));

        let err = processor
            .create_transaction(
                &catalog,
                &mut ledger,
                &mut index,
                ProvisioningPolicy::AutoProvision,
                sale("T2", &[("P9", 1)]),
            )
            .unwrap_err();
        assert!(matches!(err, StockError::NotFound(_)));

        let err = processor
            .create_transaction(
                &catalog,
                &mut ledger,
                &mut index,
                ProvisioningPolicy::AutoProvision,
                sale("T2", &[("P1", 0)]),
            )
            .unwrap_err();
        assert!(matches!(err, StockError::InvalidQuantity(_)));
    }

    #[test]
    fn totals_use_price_at_processing_time() {
        let mut catalog = catalog();
        let mut ledger = StockLedger::new();
        let mut index = stocked_index(&catalog, &mut ledger, &[("L1", "W1", "P1", 50)]);
        let mut processor = TransactionProcessor::new();

        processor
            .create_transaction(
                &catalog,
                &mut ledger,
                &mut index,
                ProvisioningPolicy::AutoProvision,
                sale("T1", &[("P1", 2)]),
            )
            .unwrap();
        catalog.set_unit_price(&p1(), 1_000).unwrap();
        processor
            .create_transaction(
                &catalog,
                &mut ledger,
                &mut index,
                ProvisioningPolicy::AutoProvision,
                sale("T2", &[("P1", 2)]),
            )
            .unwrap();

        assert_eq!(
            processor.transaction(&TransactionId::new("T1")).unwrap().total(),
            2 * 200
        );
        assert_eq!(
            processor.transaction(&TransactionId::new("T2")).unwrap().total(),
            2 * 1_000
        );
    }

    #[test]
    fn transactions_iterate_in_creation_order() {
        let catalog = catalog();
        let mut ledger = StockLedger::new();
        let mut index = stocked_index(&catalog, &mut ledger, &[("L1", "W1", "P1", 50)]);
        let mut processor = TransactionProcessor::new();

        for (id, quantity) in [("T1", 1), ("T2", 2), ("T3", 3)] {
            processor
                .create_transaction(
                    &catalog,
                    &mut ledger,
                    &mut index,
                    ProvisioningPolicy::AutoProvision,
                    sale(id, &[("P1", quantity)]).for_customer("C1"),
                )
                .unwrap();
        }

        let ids: Vec<_> = processor.transactions().map(|t| t.id().as_str()).collect();
        assert_eq!(ids, ["T1", "T2", "T3"]);
        assert_eq!(
            processor
                .transactions_for_customer(&CustomerId::new("C1"))
                .len(),
            3
        );
    }

    proptest! {
        /// Property: any mix of successful sales and returns keeps live
        /// stock equal to the ledger's net quantity.
        #[test]
        fn stock_and_ledger_stay_in_agreement(
            ops in prop::collection::vec((1i64..50, prop::bool::ANY), 1..30)
        ) {
            let catalog = catalog();
            let mut ledger = StockLedger::new();
            let mut index = stocked_index(&catalog, &mut ledger, &[("L1", "W1", "P1", 1_000)]);
            let mut processor = TransactionProcessor::new();

            for (n, (quantity, is_sale)) in ops.into_iter().enumerate() {
                let transaction_type = if is_sale {
                    TransactionType::Sale
                } else {
                    TransactionType::Return
                };
                let result = processor.create_transaction(
                    &catalog,
                    &mut ledger,
                    &mut index,
                    ProvisioningPolicy::AutoProvision,
                    NewTransaction::new(format!("T{n}"), transaction_type)
                        .with_item(NewTransactionItem::new("P1", quantity)),
                );
                // A sale may run out of stock; rejected or not, live stock
                // and the ledger must agree.
                if let Err(err) = result {
                    prop_assert!(
                        matches!(err, StockError::InsufficientStock { .. }),
                        "expected InsufficientStock, got {err:?}"
                    );
                }
                prop_assert_eq!(
                    index.current_stock(&p1(), None),
                    ledger.net_quantity(&p1())
                );
            }
        }
    }
}
