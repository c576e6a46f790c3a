//! Minimum-order-quantity arithmetic.
//!
//! Cart quantities are positive multiples of the product's MOQ. A MOQ of 0
//! is treated as 1 everywhere.

/// Round `requested` up to the next multiple of `moq`, never below `moq`.
pub fn normalize_quantity(requested: u32, moq: u32) -> u32 {
    let moq = moq.max(1);
    if requested <= moq {
        return moq;
    }
    match requested.div_ceil(moq).checked_mul(moq) {
        Some(q) => q,
        None => (u32::MAX / moq) * moq,
    }
}

/// One MOQ step up. Saturates at the largest multiple that fits.
pub fn step_up(quantity: u32, moq: u32) -> u32 {
    let moq = moq.max(1);
    let current = normalize_quantity(quantity, moq);
    current.checked_add(moq).unwrap_or(current)
}

/// One MOQ step down, or `None` when that would drop below `moq` and the
/// line should be removed instead.
pub fn step_down(quantity: u32, moq: u32) -> Option<u32> {
    let moq = moq.max(1);
    quantity.checked_sub(moq).filter(|q| *q >= moq)
}

/// Positive multiple of `moq`.
pub fn is_valid_quantity(quantity: u32, moq: u32) -> bool {
    let moq = moq.max(1);
    quantity >= moq && quantity % moq == 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_normalize() {
        assert_eq!(normalize_quantity(0, 6), 6);
        assert_eq!(normalize_quantity(1, 6), 6);
        assert_eq!(normalize_quantity(6, 6), 6);
        assert_eq!(normalize_quantity(7, 6), 12);
        assert_eq!(normalize_quantity(12, 6), 12);
        assert_eq!(normalize_quantity(5, 0), 5);
        assert_eq!(normalize_quantity(0, 0), 1);
    }

    #[test]
    fn test_normalize_near_max() {
        let q = normalize_quantity(u32::MAX, 7);
        assert!(is_valid_quantity(q, 7));
    }

    #[test]
    fn test_steps() {
        assert_eq!(step_up(6, 6), 12);
        assert_eq!(step_down(12, 6), Some(6));
        assert_eq!(step_down(6, 6), None);
        assert_eq!(step_down(3, 1), Some(2));
        assert_eq!(step_down(1, 1), None);
    }

    #[test]
    fn test_validity() {
        assert!(is_valid_quantity(12, 6));
        assert!(!is_valid_quantity(0, 6));
        assert!(!is_valid_quantity(9, 6));
        assert!(is_valid_quantity(1, 0));
    }

    proptest! {
        #[test]
        fn normalized_is_smallest_valid_at_or_above(requested in 0u32..100_000, moq in 1u32..500) {
            let q = normalize_quantity(requested, moq);
            prop_assert!(is_valid_quantity(q, moq));
            prop_assert!(q >= requested);
            prop_assert!(q < requested.max(moq) + moq);
        }

        #[test]
        fn steps_stay_on_the_grid(k in 1u32..1000, moq in 1u32..500) {
            let q = k * moq;
            prop_assert!(is_valid_quantity(step_up(q, moq), moq));
            match step_down(q, moq) {
                Some(d) => prop_assert!(is_valid_quantity(d, moq) && d == q - moq),
                None => prop_assert_eq!(q, moq),
            }
        }
    }
}
