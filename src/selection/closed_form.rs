//! Closed-form strategies
//!
//! Inputs where the answer follows directly from the totals, with no search.

use num_traits::ToPrimitive;

use crate::selection::{CardIndices, SelectionError};

/// Nothing to redeem: there are no cards, or every card is empty.
pub fn zero_sum() -> CardIndices {
    CardIndices::new()
}

/// The cards cannot cover the price even together, so redeem every one.
///
/// Leaving any card out only adds to the cash shortfall.
pub fn sum_insufficient(cards: usize) -> CardIndices {
    (0..cards).collect()
}

/// Every card has the same denomination and together they exceed the price.
///
/// Redeem enough cards to stay just under the price, plus one more if the
/// balance burnt by that extra card is no larger than the cash it saves.
///
/// # Errors
///
/// Returns [`SelectionError::InvariantViolation`] if `denomination` is not positive.
pub fn equal_denomination(
    price: i64,
    denomination: i64,
    cards: usize,
) -> Result<CardIndices, SelectionError> {
    if denomination <= 0 {
        return Err(SelectionError::InvariantViolation {
            message: "equal denominations must be positive",
        });
    }

    let whole = price / denomination;
    let need_to_pay = price - whole * denomination;
    let burnt = denomination - need_to_pay;

    let count = if burnt <= need_to_pay { whole + 1 } else { whole };
    let count = count.to_usize().unwrap_or(cards).min(cards);

    Ok((0..count).collect())
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn zero_sum_selects_nothing() {
        assert!(zero_sum().is_empty());
    }

    #[test]
    fn sum_insufficient_selects_everything_in_order() {
        assert_eq!(sum_insufficient(3).as_slice(), &[0, 1, 2]);
        assert!(sum_insufficient(0).is_empty());
    }

    #[test]
    fn keeps_shortfall_when_burn_is_larger() -> TestResult {
        // 1 card: short 1000; 2 cards: burn 3000
        assert_eq!(equal_denomination(5000, 4000, 2)?.as_slice(), &[0]);

        Ok(())
    }

    #[test]
    fn burns_when_burn_is_smaller() -> TestResult {
        // 1 card: short 2000; 2 cards: burn 1000
        assert_eq!(equal_denomination(5000, 3000, 2)?.as_slice(), &[0, 1]);

        Ok(())
    }

    #[test]
    fn ties_favour_burning() -> TestResult {
        assert_eq!(equal_denomination(3000, 2000, 2)?.as_slice(), &[0, 1]);

        Ok(())
    }

    #[test]
    fn price_below_one_card_may_select_nothing() -> TestResult {
        // 0 cards: short 200; 1 card: burn 300
        assert!(equal_denomination(200, 500, 2)?.is_empty());

        Ok(())
    }

    #[test]
    fn exact_multiple_selects_exact_count() -> TestResult {
        assert_eq!(equal_denomination(1000, 500, 4)?.as_slice(), &[0, 1]);

        Ok(())
    }

    #[test]
    fn non_positive_denomination_is_rejected() {
        assert!(matches!(
            equal_denomination(100, 0, 2),
            Err(SelectionError::InvariantViolation { .. })
        ));
    }
}
