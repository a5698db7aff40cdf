use serde::{Deserialize, Serialize};

/// Lifecycle of a purchase order.
///
/// The happy path is a straight chain; cancellation is possible up to the
/// point goods are on the way. `Completed` and `Cancelled` accept no further
/// transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PurchaseOrderStatus {
    Draft,
    Approved,
    Ordered,
    Shipped,
    Received,
    Completed,
    Cancelled,
}

impl PurchaseOrderStatus {
    /// States reachable in one step from this one.
    pub fn allowed_transitions(self) -> &'static [PurchaseOrderStatus] {
        use PurchaseOrderStatus::*;
        match self {
            Draft => &[Approved, Cancelled],
            Approved => &[Ordered, Cancelled],
            Ordered => &[Shipped, Cancelled],
            Shipped => &[Received],
            Received => &[Completed],
            Completed | Cancelled => &[],
        }
    }

    pub fn can_transition_to(self, next: PurchaseOrderStatus) -> bool {
        self.allowed_transitions().contains(&next)
    }

    pub fn is_terminal(self) -> bool {
        self.allowed_transitions().is_empty()
    }
}

impl core::fmt::Display for PurchaseOrderStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let s = match self {
            Self::Draft => "draft",
            Self::Approved => "approved",
            Self::Ordered => "ordered",
            Self::Shipped => "shipped",
            Self::Received => "received",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        };
        f.write_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::PurchaseOrderStatus::{self, *};
    use proptest::prelude::*;

    const ALL: [PurchaseOrderStatus; 7] =
        [Draft, Approved, Ordered, Shipped, Received, Completed, Cancelled];

    #[test]
    fn happy_path_is_a_chain() {
        assert!(Draft.can_transition_to(Approved));
        assert!(Approved.can_transition_to(Ordered));
        assert!(Ordered.can_transition_to(Shipped));
        assert!(Shipped.can_transition_to(Received));
        assert!(Received.can_transition_to(Completed));
    }

    #[test]
    fn cancellation_stops_once_goods_ship() {
        assert!(Draft.can_transition_to(Cancelled));
        assert!(Approved.can_transition_to(Cancelled));
        assert!(Ordered.can_transition_to(Cancelled));
        assert!(!Shipped.can_transition_to(Cancelled));
        assert!(!Received.can_transition_to(Cancelled));
    }

    #[test]
    fn no_skipping_ahead() {
        assert!(!Draft.can_transition_to(Ordered));
        assert!(!Draft.can_transition_to(Received));
        assert!(!Approved.can_transition_to(Received));
        assert!(!Ordered.can_transition_to(Received));
    }

    #[test]
    fn terminal_states_accept_nothing() {
        for next in ALL {
            assert!(!Completed.can_transition_to(next));
            assert!(!Cancelled.can_transition_to(next));
        }
        assert!(Completed.is_terminal());
        assert!(Cancelled.is_terminal());
        assert!(!Shipped.is_terminal());
    }

    proptest! {
        /// Property: no state transitions to itself, and every allowed
        /// target differs from the source.
        #[test]
        fn transitions_never_self_loop(index in 0usize..7) {
            let status = ALL[index];
            prop_assert!(!status.can_transition_to(status));
            for next in status.allowed_transitions() {
                prop_assert_ne!(*next, status);
            }
        }
    }
}
