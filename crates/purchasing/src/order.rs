use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockbook_core::{Cents, ProductId, SupplierId, line_total};

use crate::status::PurchaseOrderStatus;

stockbook_core::string_id!(
    /// Identifier of a purchase order.
    PurchaseOrderId
);

/// One product line on a purchase order. The unit price is snapshotted at
/// order creation; later catalog price changes do not rewrite placed orders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    pub product_id: ProductId,
    pub quantity: i64,
    pub unit_price: Cents,
}

impl OrderItem {
    pub fn line_total(&self) -> Cents {
        line_total(self.quantity, self.unit_price)
    }
}

/// One product line on an order being created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrderItem {
    pub product_id: ProductId,
    pub quantity: i64,
    /// Explicit unit price; when absent, the catalog price at creation
    /// time is snapshotted instead.
    pub unit_price: Option<Cents>,
}

impl NewOrderItem {
    pub fn new(product_id: impl Into<ProductId>, quantity: i64) -> Self {
        Self {
            product_id: product_id.into(),
            quantity,
            unit_price: None,
        }
    }

    pub fn at_price(mut self, unit_price: Cents) -> Self {
        self.unit_price = Some(unit_price);
        self
    }
}

/// Quantity of one product confirmed on a delivery. Used when the goods
/// that arrive differ from what was ordered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceiptItem {
    pub product_id: ProductId,
    pub quantity: i64,
}

impl ReceiptItem {
    pub fn new(product_id: impl Into<ProductId>, quantity: i64) -> Self {
        Self {
            product_id: product_id.into(),
            quantity,
        }
    }
}

/// Attributes for a purchase order being created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPurchaseOrder {
    pub id: PurchaseOrderId,
    pub supplier_id: SupplierId,
    pub items: Vec<NewOrderItem>,
    pub expected_delivery_date: Option<DateTime<Utc>>,
    pub notes: Option<String>,
}

impl NewPurchaseOrder {
    pub fn new(id: impl Into<PurchaseOrderId>, supplier_id: impl Into<SupplierId>) -> Self {
        Self {
            id: id.into(),
            supplier_id: supplier_id.into(),
            items: Vec::new(),
            expected_delivery_date: None,
            notes: None,
        }
    }

    pub fn with_item(mut self, item: NewOrderItem) -> Self {
        self.items.push(item);
        self
    }

    pub fn expected_by(mut self, date: DateTime<Utc>) -> Self {
        self.expected_delivery_date = Some(date);
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}

/// A purchase order placed with a supplier.
///
/// Status changes go through [`crate::PurchaseOrderWorkflow`], which enforces
/// the transition table and lands the goods on the `Received` step. Items are
/// fixed once the order is created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseOrder {
    id: PurchaseOrderId,
    supplier_id: SupplierId,
    items: Vec<OrderItem>,
    status: PurchaseOrderStatus,
    expected_delivery_date: Option<DateTime<Utc>>,
    notes: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    received_at: Option<DateTime<Utc>>,
}

impl PurchaseOrder {
    pub(crate) fn new(
        id: PurchaseOrderId,
        supplier_id: SupplierId,
        items: Vec<OrderItem>,
        expected_delivery_date: Option<DateTime<Utc>>,
        notes: Option<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id,
            supplier_id,
            items,
            status: PurchaseOrderStatus::Draft,
            expected_delivery_date,
            notes,
            created_at: now,
            updated_at: now,
            received_at: None,
        }
    }

    pub fn id(&self) -> &PurchaseOrderId {
        &self.id
    }

    pub fn supplier_id(&self) -> &SupplierId {
        &self.supplier_id
    }

    pub fn items(&self) -> &[OrderItem] {
        &self.items
    }

    pub fn status(&self) -> PurchaseOrderStatus {
        self.status
    }

    pub fn expected_delivery_date(&self) -> Option<DateTime<Utc>> {
        self.expected_delivery_date
    }

    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// When the goods landed in stock; `None` until the order reaches
    /// `Received`.
    pub fn received_at(&self) -> Option<DateTime<Utc>> {
        self.received_at
    }

    /// Sum of the line totals at snapshotted prices.
    pub fn total_cost(&self) -> Cents {
        self.items.iter().map(OrderItem::line_total).sum()
    }

    pub fn references_product(&self, product_id: &ProductId) -> bool {
        self.items.iter().any(|i| &i.product_id == product_id)
    }

    pub(crate) fn set_status(&mut self, status: PurchaseOrderStatus) {
        self.status = status;
        self.updated_at = Utc::now();
    }

    pub(crate) fn set_notes(&mut self, notes: String) {
        self.notes = Some(notes);
        self.updated_at = Utc::now();
    }

    pub(crate) fn mark_received(&mut self) {
        self.received_at = Some(Utc::now());
    }
}
