//! Table filler
//!
//! 0/1 knapsack "take or skip" recurrence over the quantized table. A cell holds
//! the best sum not exceeding its column target using the cards on its row and
//! the rows above it.

use crate::selection::{
    SelectionError,
    knapsack::table::{Cell, Combination, SubsetSumTable},
};

/// Fill every row of columns `start_column..` in place.
///
/// Columns before `start_column` must already be filled; they are read as
/// free-space cells but never written.
///
/// # Errors
///
/// Returns [`SelectionError::InvariantViolation`] if a free-space lookup lands
/// outside the filled region.
pub fn fill(table: &mut SubsetSumTable, start_column: usize) -> Result<(), SelectionError> {
    for row in 0..table.rows_len() {
        for column in start_column..table.columns_len() {
            if let Some(cell) = next_cell(table, row, column)? {
                table.set_cell(row, column, cell)?;
            }
        }
    }

    Ok(())
}

/// Compute the cell at (`row`, `column`), or `None` to leave it empty.
fn next_cell(
    table: &SubsetSumTable,
    row: usize,
    column: usize,
) -> Result<Option<Cell>, SelectionError> {
    let target = table
        .target(column)
        .ok_or(SelectionError::InvariantViolation {
            message: "column missing from table",
        })?;

    let denomination = table
        .denomination(row)
        .ok_or(SelectionError::InvariantViolation {
            message: "row missing from table",
        })?;

    let above = match row.checked_sub(1) {
        Some(previous) => table.cell(previous, column),
        None => None,
    };

    let above_sum = above.map_or(0, Cell::sum);

    let mut candidate_sum = if denomination > 0 && denomination <= target {
        denomination
    } else {
        0
    };

    let mut free_space: Option<&Cell> = None;

    if candidate_sum > 0
        && target - candidate_sum > 0
        && let Some(previous) = row.checked_sub(1)
    {
        let Some(free_column) = table.column_for(target - candidate_sum) else {
            return Err(SelectionError::InvariantViolation {
                message: "free-space column not yet filled",
            });
        };

        let cell = table
            .cell(previous, free_column)
            .ok_or(SelectionError::InvariantViolation {
                message: "free-space cell missing from table",
            })?;

        candidate_sum += cell.sum();
        free_space = Some(cell);
    }

    if above_sum == 0 && candidate_sum == 0 {
        return Ok(None);
    }

    if above_sum > candidate_sum {
        return Ok(above.cloned());
    }

    // Ties take this row's card.
    let combination = free_space
        .map_or_else(Combination::empty, |cell| cell.combination().clone())
        .prepend(row);

    Ok(Some(Cell::new(candidate_sum, combination)))
}
