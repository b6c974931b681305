//! Combination search
//!
//! General case: at least two distinct denominations and a balance above the
//! price. The search first finds the best redemption that does not exceed the
//! price (the shortfall candidate), then extends the table one step at a time
//! past the price to find the smallest overshoot (the burn candidate), and
//! keeps whichever loses less. Equal losses favour burning.
//!
//! See <https://en.wikipedia.org/wiki/Knapsack_problem>.

use rustc_hash::FxHashSet;

use crate::selection::{
    CardIndices, SelectionError,
    knapsack::{
        fill::fill,
        table::{Cell, SubsetSumTable},
    },
    observer::SelectionObserver,
};

pub mod fill;
pub mod table;

/// Find the minimal-loss combination for `price`.
///
/// Callers must have ruled out the closed-form cases: the denominations sum to
/// more than `price` and are not all equal.
///
/// # Errors
///
/// - [`SelectionError::TableTooLarge`]: the initial table would exceed `max_cells`.
///   Extension columns over the limit end the burn search instead.
/// - [`SelectionError::Overflow`]: a column target does not fit in `i64`.
/// - [`SelectionError::InvariantViolation`]: the input broke the preconditions above.
pub fn search(
    price: i64,
    denominations: &[i64],
    max_cells: Option<usize>,
    observer: &mut dyn SelectionObserver,
) -> Result<CardIndices, SelectionError> {
    let gcd = greatest_common_divisor(denominations);

    if gcd <= 0 {
        return Err(SelectionError::InvariantViolation {
            message: "combination search needs at least one positive denomination",
        });
    }

    observer.on_gcd(gcd);

    let mut table = SubsetSumTable::new(price, gcd, denominations, max_cells)?;
    fill(&mut table, 0)?;

    observer.on_table_filled(&table);

    let shortfall = table
        .bottom(table.price_column())
        .cloned()
        .ok_or(SelectionError::InvariantViolation {
            message: "price column missing from table",
        })?;

    let need_to_pay = price - shortfall.sum();
    let shortfall_indices = shortfall.combination().to_indices();

    observer.on_shortfall(need_to_pay, &shortfall_indices);

    if need_to_pay == 0 {
        return Ok(shortfall_indices);
    }

    match find_burn(&mut table, need_to_pay, observer)? {
        Some(burn) if (1..=need_to_pay).contains(&(burn.sum() - price)) => {
            Ok(burn.combination().to_indices())
        }
        _ => Ok(shortfall_indices),
    }
}

/// Extend the table past the price until a column's best sum overshoots it.
///
/// Stops without a result once the column target reaches `price + need_to_pay`,
/// since a larger burn can never beat the known shortfall, or once another
/// column would exceed the table limit.
fn find_burn(
    table: &mut SubsetSumTable,
    need_to_pay: i64,
    observer: &mut dyn SelectionObserver,
) -> Result<Option<Cell>, SelectionError> {
    let price = table.price();
    let limit = price
        .checked_add(need_to_pay)
        .ok_or(SelectionError::Overflow)?;

    let mut target = price;

    loop {
        target = target
            .checked_add(table.gcd())
            .ok_or(SelectionError::Overflow)?;

        let column = match table.push_column(target) {
            Ok(column) => column,
            Err(SelectionError::TableTooLarge { columns, limit, .. }) => {
                tracing::debug!(columns, limit, "table limit reached during burn search");

                return Ok(None);
            }
            Err(err) => return Err(err),
        };
        fill(table, column)?;

        let bottom = table
            .bottom(column)
            .cloned()
            .ok_or(SelectionError::InvariantViolation {
                message: "extension column missing from table",
            })?;

        observer.on_burn_column(target, bottom.sum());

        if bottom.sum() > price {
            let indices = bottom.combination().to_indices();
            observer.on_burn(bottom.sum() - price, &indices);

            return Ok(Some(bottom));
        }

        if target >= limit {
            return Ok(None);
        }
    }
}

/// Greatest common divisor of the distinct denominations.
///
/// Returns 0 when every denomination is 0 or there are none.
pub fn greatest_common_divisor(denominations: &[i64]) -> i64 {
    let mut seen = FxHashSet::default();
    let mut result = 0;

    for &denomination in denominations {
        if !seen.insert(denomination) {
            continue;
        }

        result = euclid(result, denomination);

        if result == 1 {
            break;
        }
    }

    result
}

fn euclid(a: i64, b: i64) -> i64 {
    let (mut a, mut b) = (a, b);

    while b != 0 {
        (a, b) = (b, a % b);
    }

    a
}
