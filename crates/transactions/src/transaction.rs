use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockbook_core::{Cents, CustomerId, ProductId, line_total};

stockbook_core::string_id!(
    /// Identifier of a stock transaction.
    TransactionId
);

/// What a transaction does to stock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    /// Outbound: allocated greedily across the product's locations.
    Sale,
    /// Inbound: lands like a receipt, auto-provisioning if needed.
    Return,
    /// Validated and priced, but moves no stock. A marker for manual
    /// corrections done through direct location updates.
    Adjustment,
}

impl core::fmt::Display for TransactionType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let s = match self {
            Self::Sale => "sale",
            Self::Return => "return",
            Self::Adjustment => "adjustment",
        };
        f.write_str(s)
    }
}

/// One product line on a recorded transaction, priced at the catalog price
/// in effect when the transaction was processed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionItem {
    pub product_id: ProductId,
    pub quantity: i64,
    pub unit_price: Cents,
}

impl TransactionItem {
    pub fn line_total(&self) -> Cents {
        line_total(self.quantity, self.unit_price)
    }
}

/// One product line on a transaction being created. Prices always come from
/// the catalog at processing time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTransactionItem {
    pub product_id: ProductId,
    pub quantity: i64,
}

impl NewTransactionItem {
    pub fn new(product_id: impl Into<ProductId>, quantity: i64) -> Self {
        Self {
            product_id: product_id.into(),
            quantity,
        }
    }
}

/// Attributes for a transaction being created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTransaction {
    pub id: TransactionId,
    pub transaction_type: TransactionType,
    pub customer_id: Option<CustomerId>,
    pub items: Vec<NewTransactionItem>,
    pub notes: Option<String>,
}

impl NewTransaction {
    pub fn new(id: impl Into<TransactionId>, transaction_type: TransactionType) -> Self {
        Self {
            id: id.into(),
            transaction_type,
            customer_id: None,
            items: Vec::new(),
            notes: None,
        }
    }

    pub fn with_item(mut self, item: NewTransactionItem) -> Self {
        self.items.push(item);
        self
    }

    pub fn for_customer(mut self, customer_id: impl Into<CustomerId>) -> Self {
        self.customer_id = Some(customer_id.into());
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}

/// An immutable record of a processed transaction. The stock effects live in
/// the ledger and the location index; this is the business-level receipt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    id: TransactionId,
    transaction_type: TransactionType,
    customer_id: Option<CustomerId>,
    items: Vec<TransactionItem>,
    total: Cents,
    notes: Option<String>,
    created_at: DateTime<Utc>,
}

impl Transaction {
    pub(crate) fn new(
        id: TransactionId,
        transaction_type: TransactionType,
        customer_id: Option<CustomerId>,
        items: Vec<TransactionItem>,
        notes: Option<String>,
    ) -> Self {
        let total = items.iter().map(TransactionItem::line_total).sum();
        Self {
            id,
            transaction_type,
            customer_id,
            items,
            total,
            notes,
            created_at: Utc::now(),
        }
    }

    pub fn id(&self) -> &TransactionId {
        &self.id
    }

    pub fn transaction_type(&self) -> TransactionType {
        self.transaction_type
    }

    pub fn customer_id(&self) -> Option<&CustomerId> {
        self.customer_id.as_ref()
    }

    pub fn items(&self) -> &[TransactionItem] {
        &self.items
    }

    /// Sum of line totals at processing-time prices.
    pub fn total(&self) -> Cents {
        self.total
    }

    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
