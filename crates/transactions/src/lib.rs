//! `stockbook-transactions`: sales, returns, and adjustment markers.
//!
//! The processor turns business transactions into stock movements: sales
//! drain the location index greedily, returns land like receipts, and
//! adjustments record intent without moving stock. Each transaction is
//! all-or-nothing. Pure domain logic; no IO.

pub mod processor;
pub mod transaction;

pub use processor::TransactionProcessor;
pub use transaction::{
    NewTransaction, NewTransactionItem, Transaction, TransactionId, TransactionItem,
    TransactionType,
};
