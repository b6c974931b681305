//! Wallet Fixtures

use rust_decimal::{Decimal, prelude::ToPrimitive};
use rusty_money::iso::{Currency, EUR, GBP, RUB, USD};
use serde::Deserialize;

use crate::fixtures::FixtureError;

/// Wallet in YAML
#[derive(Debug, Deserialize)]
pub struct WalletFixture {
    /// ISO currency code shared by every card (e.g., "GBP")
    pub currency: String,

    /// Cards in redemption order
    pub cards: Vec<CardFixture>,
}

/// Card Fixture
#[derive(Debug, Deserialize)]
pub struct CardFixture {
    /// Card label
    pub label: String,

    /// Card denomination in major units (e.g., "50.00")
    pub denomination: String,
}

/// Parse an ISO currency code.
///
/// # Errors
///
/// Returns [`FixtureError::UnknownCurrency`] if the code is not supported.
pub fn parse_currency(code: &str) -> Result<&'static Currency, FixtureError> {
    match code.trim() {
        "GBP" => Ok(GBP),
        "USD" => Ok(USD),
        "EUR" => Ok(EUR),
        "RUB" => Ok(RUB),
        other => Err(FixtureError::UnknownCurrency(other.to_string())),
    }
}

/// Parse a major-unit amount (e.g., "49.99") into minor units.
///
/// # Errors
///
/// Returns [`FixtureError::InvalidAmount`] if the string is not a decimal
/// number or does not fit in minor units.
pub fn parse_minor_units(s: &str) -> Result<i64, FixtureError> {
    let amount = s
        .trim()
        .parse::<Decimal>()
        .map_err(|_err| FixtureError::InvalidAmount(s.to_string()))?;

    amount
        .checked_mul(Decimal::new(100, 0))
        .and_then(|value| value.round_dp(0).to_i64())
        .ok_or_else(|| FixtureError::InvalidAmount(s.to_string()))
}
