//! Quantized subset-sum table

use std::{fmt, rc::Rc};

use num_traits::ToPrimitive;
use tabled::{builder::Builder, settings::Style};

use crate::selection::{CardIndices, SelectionError};

/// One node of a persistent list of table rows.
#[derive(Debug)]
struct Link {
    row: usize,
    next: Option<Rc<Link>>,
}

/// A set of cards, identified by their table rows, reachable from a cell.
///
/// Combinations are immutable. Extending one prepends a single node and shares
/// the existing tail, so every cell that reuses a free-space combination points
/// at the same nodes.
#[derive(Debug, Clone, Default)]
pub struct Combination {
    head: Option<Rc<Link>>,
    len: usize,
}

impl Combination {
    /// The empty combination.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Returns a new combination with `row` in front of this one.
    #[must_use]
    pub fn prepend(&self, row: usize) -> Self {
        Self {
            head: Some(Rc::new(Link {
                row,
                next: self.head.clone(),
            })),
            len: self.len + 1,
        }
    }

    /// Number of cards in the combination.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the combination holds no cards.
    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    /// Iterate over rows, most recently prepended first.
    pub fn rows(&self) -> impl Iterator<Item = usize> + '_ {
        let mut next = self.head.as_deref();

        std::iter::from_fn(move || {
            let link = next?;
            next = link.next.as_deref();

            Some(link.row)
        })
    }

    /// Rows of the combination in input order.
    pub fn to_indices(&self) -> CardIndices {
        let mut indices: CardIndices = self.rows().collect();
        indices.sort_unstable();

        indices
    }
}

impl Drop for Combination {
    // Unlink iteratively so long chains do not recurse on drop.
    fn drop(&mut self) {
        let mut next = self.head.take();

        while let Some(link) = next {
            match Rc::try_unwrap(link) {
                Ok(mut link) => next = link.next.take(),
                Err(_) => break,
            }
        }
    }
}

/// Best redemption sum not exceeding a column target, plus the cards giving it.
#[derive(Debug, Clone, Default)]
pub struct Cell {
    sum: i64,
    combination: Combination,
}

impl Cell {
    /// Create a cell. `sum` must be the total of the combination's denominations.
    pub fn new(sum: i64, combination: Combination) -> Self {
        Self { sum, combination }
    }

    /// Achieved redemption sum in minor units.
    pub fn sum(&self) -> i64 {
        self.sum
    }

    /// Cards achieving the sum.
    pub fn combination(&self) -> &Combination {
        &self.combination
    }
}

/// Grid of cells indexed by (card row, target column).
///
/// Columns `0, gcd, 2 * gcd, ..` up to the price form the initial grid, with the
/// last initial column pinned to the price. Extension columns may be appended
/// after the price; nothing is ever inserted before existing columns.
///
/// Cells are stored column-major so that appending a column only appends cells.
#[derive(Debug)]
pub struct SubsetSumTable {
    price: i64,
    gcd: i64,
    /// Number of whole `gcd` steps in the price
    steps: usize,
    /// Number of columns in the initial grid, including the pinned price column
    grid_columns: usize,
    max_cells: Option<usize>,
    rows: Vec<i64>,
    columns: Vec<i64>,
    cells: Vec<Cell>,
}

impl SubsetSumTable {
    /// Build the initial table for `price`, one row per denomination.
    ///
    /// # Errors
    ///
    /// - [`SelectionError::InvariantViolation`]: `gcd` is not positive or `price` is negative.
    /// - [`SelectionError::TableTooLarge`]: the table would hold more than `max_cells`
    ///   cells.
    pub fn new(
        price: i64,
        gcd: i64,
        denominations: &[i64],
        max_cells: Option<usize>,
    ) -> Result<Self, SelectionError> {
        if gcd <= 0 || price < 0 {
            return Err(SelectionError::InvariantViolation {
                message: "table requires a positive step and a non-negative price",
            });
        }

        let steps = (price / gcd)
            .to_usize()
            .ok_or(SelectionError::InvariantViolation {
                message: "step count does not fit in usize",
            })?;

        let pinned = price % gcd != 0;
        let grid_columns = steps + 1 + usize::from(pinned);

        check_size(denominations.len(), grid_columns, max_cells)?;

        let mut columns: Vec<i64> = Vec::with_capacity(grid_columns);
        let mut target = 0;

        for _ in 0..=steps {
            columns.push(target);
            target = target.saturating_add(gcd);
        }

        if pinned {
            columns.push(price);
        }

        let mut cells = Vec::new();
        cells.resize_with(denominations.len() * grid_columns, Cell::default);

        Ok(Self {
            price,
            gcd,
            steps,
            grid_columns,
            max_cells,
            rows: denominations.to_vec(),
            columns,
            cells,
        })
    }

    /// Purchase price in minor units.
    pub fn price(&self) -> i64 {
        self.price
    }

    /// Quantization step.
    pub fn gcd(&self) -> i64 {
        self.gcd
    }

    /// Number of rows (one per card).
    pub fn rows_len(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns, including any extension columns.
    pub fn columns_len(&self) -> usize {
        self.columns.len()
    }

    /// Index of the column pinned to the price.
    pub fn price_column(&self) -> usize {
        self.grid_columns - 1
    }

    /// Target price of a column.
    pub fn target(&self, column: usize) -> Option<i64> {
        self.columns.get(column).copied()
    }

    /// Denomination of the card on a row.
    pub fn denomination(&self, row: usize) -> Option<i64> {
        self.rows.get(row).copied()
    }

    /// Get the cell at (`row`, `column`).
    pub fn cell(&self, row: usize, column: usize) -> Option<&Cell> {
        self.cells.get(self.offset(row, column)?)
    }

    /// Get the cell on the last row of a column.
    pub fn bottom(&self, column: usize) -> Option<&Cell> {
        self.cell(self.rows.len().checked_sub(1)?, column)
    }

    /// Replace the cell at (`row`, `column`).
    ///
    /// # Errors
    ///
    /// Returns [`SelectionError::InvariantViolation`] if the position is outside the table.
    pub fn set_cell(
        &mut self,
        row: usize,
        column: usize,
        cell: Cell,
    ) -> Result<(), SelectionError> {
        let slot = self
            .offset(row, column)
            .and_then(|offset| self.cells.get_mut(offset))
            .ok_or(SelectionError::InvariantViolation {
                message: "cell position outside the table",
            })?;

        *slot = cell;

        Ok(())
    }

    /// Append an empty column after the existing ones and return its index.
    ///
    /// # Errors
    ///
    /// - [`SelectionError::InvariantViolation`]: `target` does not exceed the last target.
    /// - [`SelectionError::TableTooLarge`]: the extra column would exceed the cell limit.
    pub fn push_column(&mut self, target: i64) -> Result<usize, SelectionError> {
        if self.columns.last().is_some_and(|&last| target <= last) {
            return Err(SelectionError::InvariantViolation {
                message: "column targets must be strictly increasing",
            });
        }

        check_size(self.rows.len(), self.columns.len() + 1, self.max_cells)?;

        self.columns.push(target);
        self.cells
            .resize_with(self.cells.len() + self.rows.len(), Cell::default);

        Ok(self.columns.len() - 1)
    }

    /// Column holding the best sum not exceeding `capacity`.
    ///
    /// Every achievable sum is a multiple of the step, so the answer for `capacity`
    /// equals the answer for `capacity / gcd` whole steps. Extension column `j`
    /// covers `steps + j` whole steps.
    pub fn column_for(&self, capacity: i64) -> Option<usize> {
        let whole = (capacity / self.gcd).to_usize()?;

        let column = if whole <= self.steps {
            whole
        } else {
            self.price_column() + (whole - self.steps)
        };

        (column < self.columns.len()).then_some(column)
    }

    fn offset(&self, row: usize, column: usize) -> Option<usize> {
        (row < self.rows.len() && column < self.columns.len())
            .then(|| column * self.rows.len() + row)
    }
}

fn check_size(rows: usize, columns: usize, limit: Option<usize>) -> Result<(), SelectionError> {
    let Some(limit) = limit else {
        return Ok(());
    };

    match rows.checked_mul(columns) {
        Some(cells) if cells <= limit => Ok(()),
        _ => Err(SelectionError::TableTooLarge {
            rows,
            columns,
            limit,
        }),
    }
}

impl fmt::Display for SubsetSumTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut builder = Builder::default();

        let targets = self.columns.iter().map(ToString::to_string);

        builder.push_record(std::iter::once(String::new()).chain(targets));

        for (row, denomination) in self.rows.iter().enumerate() {
            let sums = (0..self.columns.len()).map(|column| {
                self.cell(row, column)
                    .map_or_else(String::new, |cell| cell.sum().to_string())
            });

            builder.push_record(std::iter::once(denomination.to_string()).chain(sums));
        }

        let mut table = builder.build();
        table.with(Style::markdown());

        write!(f, "{table}")
    }
}
