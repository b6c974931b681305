//! Gift Card Selection Example
//!
//! This example loads a wallet fixture and selects the cards to redeem
//! against a purchase price.
//!
//! Use `-p` to set the purchase price in major units
//! Use `-f` to load a fixture set by name
//! Use `-n` to limit the number of cards taken from the wallet
//! Use `-t` to print the filled search table
//! Use `--trace` to print selection events to stderr

use std::{io, io::Write, time::Instant};

use anyhow::Result;
use clap::Parser;
use humanize_duration::{Truncate, prelude::DurationExt};
use rusty_money::Money;

use redeem::{
    fixtures::{Fixture, wallets::parse_minor_units},
    receipt::Receipt,
    selection::{
        CardSelector, Strategy,
        knapsack::table::SubsetSumTable,
        observer::{SelectionObserver, TracingObserver},
    },
    utils::ExampleSelectArgs,
};

/// Forwards to [`TracingObserver`] and keeps a rendering of the filled table.
#[derive(Debug, Default)]
struct TableCapture {
    inner: TracingObserver,
    table: Option<String>,
}

impl SelectionObserver for TableCapture {
    fn on_strategy(&mut self, strategy: Strategy, total_minor: i64) {
        self.inner.on_strategy(strategy, total_minor);
    }

    fn on_gcd(&mut self, gcd: i64) {
        self.inner.on_gcd(gcd);
    }

    fn on_table_filled(&mut self, table: &SubsetSumTable) {
        self.inner.on_table_filled(table);
        self.table = Some(table.to_string());
    }

    fn on_shortfall(&mut self, need_to_pay: i64, indices: &[usize]) {
        self.inner.on_shortfall(need_to_pay, indices);
    }

    fn on_burn_column(&mut self, target: i64, achieved: i64) {
        self.inner.on_burn_column(target, achieved);
    }

    fn on_burn(&mut self, burnt: i64, indices: &[usize]) {
        self.inner.on_burn(burnt, indices);
    }

    fn on_selected(&mut self, indices: &[usize], redeemed_minor: i64) {
        self.inner.on_selected(indices, redeemed_minor);
    }
}

/// Gift Card Selection Example
pub fn main() -> Result<()> {
    let args = ExampleSelectArgs::parse();

    if args.trace {
        tracing_subscriber::fmt()
            .with_env_filter("redeem=trace")
            .with_writer(io::stderr)
            .init();
    }

    let fixture = Fixture::from_set(&args.fixture)?;
    let wallet = fixture.wallet(args.n)?;
    let price = Money::from_minor(parse_minor_units(&args.price)?, fixture.currency()?);

    let mut observer = TableCapture::default();

    let start = Instant::now();

    let selection =
        CardSelector::new().select_with_observer(&price, wallet.cards(), &mut observer)?;

    let elapsed = start.elapsed();

    let stdout = io::stdout();
    let mut handle = stdout.lock();

    if args.table {
        match observer.table.as_deref() {
            Some(table) => writeln!(handle, "\n{table}")?,
            None => writeln!(
                handle,
                "\nNo search table: {} strategy",
                selection.strategy()
            )?,
        }
    }

    Receipt::from_selection(selection).write_to(
        &mut handle,
        wallet.cards(),
        fixture.card_meta_map(),
    )?;

    writeln!(
        handle,
        " {} ({}s)",
        elapsed.human(Truncate::Nano),
        elapsed.as_secs_f32()
    )?;

    Ok(())
}
