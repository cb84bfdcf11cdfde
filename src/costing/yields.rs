use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::errors::ServiceError;

/// Computes the yield percentage from an As-Purchased / Edible-Portion
/// weight pair: `(ep / ap) * 100`.
///
/// The AP weight must be positive. EP weights above the AP weight are
/// accepted and produce a percentage over 100; downstream consumers treat
/// those as suspect data, not errors.
pub fn compute_yield(ap_weight: Decimal, ep_weight: Decimal) -> Result<Decimal, ServiceError> {
    if ap_weight <= Decimal::ZERO {
        return Err(ServiceError::InvalidInput(format!(
            "ap_weight must be greater than zero, got {}",
            ap_weight
        )));
    }

    Ok(ep_weight / ap_weight * dec!(100))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn yield_matches_ratio() {
        assert_eq!(
            compute_yield(dec!(1000), dec!(750)).unwrap(),
            dec!(75.00).normalize()
        );
        assert_eq!(compute_yield(dec!(4), dec!(3)).unwrap(), dec!(75));
    }

    #[test]
    fn equal_weights_yield_one_hundred() {
        assert_eq!(compute_yield(dec!(2.5), dec!(2.5)).unwrap(), dec!(100));
    }

    #[test]
    fn zero_ep_weight_is_zero_yield() {
        assert_eq!(compute_yield(dec!(10), Decimal::ZERO).unwrap(), dec!(0));
    }

    #[test]
    fn ep_above_ap_is_accepted() {
        // Data-entry error, flagged downstream but not rejected here
        assert_eq!(compute_yield(dec!(100), dec!(110)).unwrap(), dec!(110));
    }

    #[test]
    fn non_positive_ap_weight_is_rejected() {
        assert!(matches!(
            compute_yield(Decimal::ZERO, dec!(5)),
            Err(ServiceError::InvalidInput(_))
        ));
        assert!(matches!(
            compute_yield(dec!(-1), dec!(5)),
            Err(ServiceError::InvalidInput(_))
        ));
    }
}
