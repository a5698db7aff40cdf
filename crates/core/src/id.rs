//! Strongly-typed identifiers used across the stock domain.
//!
//! Identifiers are caller-chosen strings ("P1", "WH-MAIN", "PO-2024-0001"),
//! wrapped in newtypes so a product id can never be passed where a warehouse
//! id is expected. `generate()` mints a fresh UUIDv7-backed id for entities
//! the engine synthesizes itself (auto-provisioned stock locations).

use core::str::FromStr;

use crate::error::StockError;

/// Define a string-backed identifier newtype.
#[macro_export]
macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord,
            ::serde::Serialize, ::serde::Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wrap a caller-chosen identifier.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Mint a fresh identifier (UUIDv7, time-ordered).
            pub fn generate() -> Self {
                Self(::uuid::Uuid::now_v7().to_string())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                core::fmt::Display::fmt(&self.0, f)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_owned())
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }
    };
}

string_id!(
    /// Identifier of a product (collaborator-owned).
    ProductId
);
string_id!(
    /// Identifier of a supplier.
    SupplierId
);
string_id!(
    /// Identifier of a product category.
    CategoryId
);
string_id!(
    /// Identifier of a physical warehouse.
    WarehouseId
);
string_id!(
    /// Identifier of a stock location (one bin within a warehouse).
    LocationId
);
string_id!(
    /// Identifier of a customer on sale/return transactions.
    CustomerId
);
string_id!(
    /// Cross-reference from a ledger record to the transaction or purchase
    /// order that caused it.
    ReferenceId
);

macro_rules! impl_id_from_str {
    ($($t:ty => $name:literal),* $(,)?) => {
        $(
            impl FromStr for $t {
                type Err = StockError;

                fn from_str(s: &str) -> Result<Self, Self::Err> {
                    if s.trim().is_empty() {
                        return Err(StockError::validation(concat!(
                            $name,
                            " cannot be empty"
                        )));
                    }
                    Ok(Self::new(s))
                }
            }
        )*
    };
}

impl_id_from_str!(
    ProductId => "ProductId",
    SupplierId => "SupplierId",
    CategoryId => "CategoryId",
    WarehouseId => "WarehouseId",
    LocationId => "LocationId",
    CustomerId => "CustomerId",
    ReferenceId => "ReferenceId",
);
