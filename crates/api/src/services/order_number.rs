//! Human-facing order number generation.
//!
//! Numbers look like `ORD-482913`: a fixed prefix plus six digits drawn
//! uniformly from `[100000, 999999]`. The generator itself performs no
//! uniqueness check; the database enforces uniqueness and
//! [`OrderService`](super::orders::OrderService) retries on a collision.

use rand::Rng;

/// Prefix carried by every order number.
pub const ORDER_NUMBER_PREFIX: &str = "ORD-";

/// Generate a fresh candidate order number.
#[must_use]
pub fn generate() -> String {
    let number: u32 = rand::rng().random_range(100_000..1_000_000);
    format!("{ORDER_NUMBER_PREFIX}{number}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_number_format() {
        for _ in 0..100 {
            let number = generate();
            let digits = number
                .strip_prefix(ORDER_NUMBER_PREFIX)
                .expect("missing prefix");
            assert_eq!(digits.len(), 6);
            let value: u32 = digits.parse().expect("not numeric");
            assert!((100_000..=999_999).contains(&value));
        }
    }
}
