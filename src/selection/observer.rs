//! Selection Observer

use tracing::{debug, trace};

use crate::selection::{Strategy, knapsack::table::SubsetSumTable};

/// Observer trait for following a selection as it is made.
///
/// Callbacks fire at the decision points of a selection: which strategy was
/// picked, the quantization step, the filled search table, the best shortfall,
/// each column searched for a burn, and the final choice. Observers are passive;
/// they cannot change the outcome.
///
/// Only [`on_strategy`](SelectionObserver::on_strategy) and
/// [`on_selected`](SelectionObserver::on_selected) fire for every selection. The
/// rest only fire on the combination search path and default to no-ops.
pub trait SelectionObserver {
    /// Called once the input has been classified.
    ///
    /// # Parameters
    ///
    /// - `strategy`: The strategy that will produce the selection
    /// - `total_minor`: Sum of all card denominations in minor units
    fn on_strategy(&mut self, strategy: Strategy, total_minor: i64);

    /// Called when the quantization step has been computed.
    fn on_gcd(&mut self, _gcd: i64) {}

    /// Called after the initial table (up to the price) has been filled.
    fn on_table_filled(&mut self, _table: &SubsetSumTable) {}

    /// Called with the best combination that does not exceed the price.
    ///
    /// # Parameters
    ///
    /// - `need_to_pay`: Cash still owed if this combination is redeemed
    /// - `indices`: Input indices of the combination
    fn on_shortfall(&mut self, _need_to_pay: i64, _indices: &[usize]) {}

    /// Called after each extension column past the price has been filled.
    ///
    /// # Parameters
    ///
    /// - `target`: Target price of the new column
    /// - `achieved`: Best sum not exceeding the target
    fn on_burn_column(&mut self, _target: i64, _achieved: i64) {}

    /// Called when the first combination overshooting the price is found.
    ///
    /// # Parameters
    ///
    /// - `burnt`: Balance forfeited if this combination is redeemed
    /// - `indices`: Input indices of the combination
    fn on_burn(&mut self, _burnt: i64, _indices: &[usize]) {}

    /// Called with the final selection.
    ///
    /// # Parameters
    ///
    /// - `indices`: Input indices of the selected cards, in input order
    /// - `redeemed_minor`: Sum of the selected denominations in minor units
    fn on_selected(&mut self, indices: &[usize], redeemed_minor: i64);
}

/// No-op observer for unobserved selections.
#[derive(Debug, Default)]
pub struct NoopObserver;

impl SelectionObserver for NoopObserver {
    fn on_strategy(&mut self, _: Strategy, _: i64) {}

    fn on_selected(&mut self, _: &[usize], _: i64) {}
}

/// Observer that reports every decision point as a `tracing` event.
///
/// The filled table is rendered at `TRACE` level only.
#[derive(Debug, Default)]
pub struct TracingObserver;

impl SelectionObserver for TracingObserver {
    fn on_strategy(&mut self, strategy: Strategy, total_minor: i64) {
        debug!(%strategy, total_minor, "strategy selected");
    }

    fn on_gcd(&mut self, gcd: i64) {
        debug!(gcd, "quantization step computed");
    }

    fn on_table_filled(&mut self, table: &SubsetSumTable) {
        debug!(
            rows = table.rows_len(),
            columns = table.columns_len(),
            "table filled"
        );
        trace!("\n{table}");
    }

    fn on_shortfall(&mut self, need_to_pay: i64, indices: &[usize]) {
        debug!(need_to_pay, ?indices, "best shortfall found");
    }

    fn on_burn_column(&mut self, target: i64, achieved: i64) {
        trace!(target, achieved, "burn column filled");
    }

    fn on_burn(&mut self, burnt: i64, indices: &[usize]) {
        debug!(burnt, ?indices, "smallest burn found");
    }

    fn on_selected(&mut self, indices: &[usize], redeemed_minor: i64) {
        debug!(?indices, redeemed_minor, "cards selected");
    }
}
