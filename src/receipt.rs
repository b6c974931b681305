//! Receipt

use std::io;

use decimal_percentage::Percentage;
use rust_decimal::{Decimal, prelude::FromPrimitive};
use rusty_money::{Money, MoneyError, iso::Currency};
use slotmap::SlotMap;
use tabled::{
    builder::Builder,
    settings::{
        Alignment, Color, Style,
        object::{Columns, Rows},
    },
};
use thiserror::Error;

use crate::{
    cards::{Card, CardKey, CardMeta},
    selection::{Outcome, Selection, Strategy},
};

/// Errors that can occur when writing a receipt.
#[derive(Debug, Error)]
pub enum ReceiptError {
    /// Wrapper for money errors.
    #[error(transparent)]
    Money(#[from] MoneyError),

    /// Error finding a card in the card metadata.
    #[error("Missing card")]
    MissingCard(CardKey),

    /// IO error
    #[error("IO error")]
    IO,
}

/// Redemption receipt for a selection.
#[derive(Debug, Clone)]
pub struct Receipt<'a> {
    selection: Selection<'a>,
}

impl<'a> Receipt<'a> {
    /// Build a receipt from a selection.
    pub fn from_selection(selection: Selection<'a>) -> Self {
        Self { selection }
    }

    /// The selection on the receipt.
    pub fn selection(&self) -> &Selection<'a> {
        &self.selection
    }

    /// Money lost as a fraction of the purchase price.
    ///
    /// A zero price with a non-zero loss counts as a whole loss.
    pub fn loss_percent(&self) -> Percentage {
        let loss_minor = self.selection.loss().to_minor_units();
        let price_minor = self.selection.price().to_minor_units();

        if loss_minor == 0 {
            return Percentage::from(0.0);
        }

        if price_minor == 0 {
            return Percentage::from(1.0);
        }

        let loss_dec = Decimal::from_i64(loss_minor).unwrap_or(Decimal::ZERO);
        let price_dec = Decimal::from_i64(price_minor).unwrap_or(Decimal::ONE);

        Percentage::from(loss_dec / price_dec)
    }

    /// Writes the receipt, one row per card in the wallet.
    ///
    /// # Errors
    ///
    /// Returns an error if a card has no metadata or the receipt cannot be written.
    pub fn write_to(
        &self,
        mut out: impl io::Write,
        cards: &[Card<'_>],
        card_meta: &SlotMap<CardKey, CardMeta>,
    ) -> Result<(), ReceiptError> {
        let mut builder = Builder::default();

        builder.push_record(["", "Card", "Denomination", "Redeemed"]);

        let mut redeemed_rows = Vec::new();

        for (idx, card) in cards.iter().enumerate() {
            let label = card_meta
                .get(card.key())
                .ok_or(ReceiptError::MissingCard(card.key()))?
                .label
                .clone();

            let redeemed = self.selection.contains(idx);

            if redeemed {
                redeemed_rows.push(idx + 1);
            }

            builder.push_record([
                format!("#{:<3}", idx + 1),
                label,
                format!("{}", card.denomination()),
                if redeemed { "yes" } else { "" }.to_string(),
            ]);
        }

        let mut table = builder.build();

        table.with(Style::rounded());
        table.modify(Rows::first(), Color::BOLD);
        table.modify(Columns::new(2..3), Alignment::right());

        for row in redeemed_rows {
            table.modify(Rows::one(row), Color::FG_GREEN);
        }

        writeln!(out, "\n{table}").map_err(|_err| ReceiptError::IO)?;

        self.write_summary(&mut out)
    }

    fn write_summary(&self, out: &mut impl io::Write) -> Result<(), ReceiptError> {
        let selection = &self.selection;
        let percent_points = percent_points_from_fractional_percentage(self.loss_percent());

        let (loss_label, loss_value) = match selection.outcome() {
            Outcome::Exact => ("Loss:", zero_like(selection.price()).to_string()),
            Outcome::Shortfall(amount) => (
                "Cash to pay:",
                format!("({percent_points:.2}%) {amount}"),
            ),
            Outcome::Burn(amount) => ("Burnt:", format!("({percent_points:.2}%) {amount}")),
        };

        let lines = [
            ("Price:", selection.price().to_string()),
            ("Redeemed:", selection.redeemed().to_string()),
            (loss_label, loss_value),
            ("Strategy:", strategy_label(selection.strategy()).to_string()),
        ];

        let label_width = lines
            .iter()
            .map(|(label, _)| label.len())
            .max()
            .unwrap_or(0);

        let value_width = lines
            .iter()
            .map(|(_, value)| value.len())
            .max()
            .unwrap_or(0);

        for (label, value) in lines {
            writeln!(out, " {label:<label_width$}  {value:>value_width$}")
                .map_err(|_err| ReceiptError::IO)?;
        }

        writeln!(out).map_err(|_err| ReceiptError::IO)
    }
}

fn zero_like(money: Money<'_, Currency>) -> Money<'_, Currency> {
    Money::from_minor(0, money.currency())
}

fn strategy_label(strategy: Strategy) -> &'static str {
    match strategy {
        Strategy::ZeroSum => "nothing to redeem",
        Strategy::SumInsufficient => "all cards",
        Strategy::EqualDenomination => "equal denominations",
        Strategy::CombinationSearch => "combination search",
    }
}

/// Converts a fractional percentage to percent points for display.
fn percent_points_from_fractional_percentage(percentage: Percentage) -> Decimal {
    // `Percentage` is a fraction (e.g. 0.25), so multiply by 100 to print percent points.
    let hundred = Decimal::from_i64(100).unwrap_or(Decimal::ZERO);

    ((percentage * Decimal::ONE) * hundred).round_dp(2)
}
