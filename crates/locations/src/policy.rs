use serde::{Deserialize, Serialize};

/// What to do when stock arrives (purchase-order receipt or customer return)
/// for a product that has no stock location anywhere.
///
/// The default synthesizes a location in the first-registered warehouse so a
/// receipt never blocks on warehouse layout; callers that want strict layout
/// discipline can reject instead.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProvisioningPolicy {
    /// Synthesize a location in the first-registered warehouse with
    /// placeholder coordinates.
    #[default]
    AutoProvision,
    /// Fail the whole operation.
    Reject,
}
