//! Money units.
//!
//! All monetary amounts are carried in the smallest currency unit (e.g.
//! cents) as signed integers. Prices are snapshotted at transaction time and
//! never versioned.

/// Amount in the smallest currency unit.
pub type Cents = i64;

/// Total for a line of `quantity` units priced at `unit_price`.
pub fn line_total(quantity: i64, unit_price: Cents) -> Cents {
    quantity.saturating_mul(unit_price)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_total_multiplies() {
        assert_eq!(line_total(50, 200), 10_000);
        assert_eq!(line_total(0, 200), 0);
    }
}
