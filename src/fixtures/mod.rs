//! Fixtures
//!
//! Wallet fixture sets live in `<base>/wallets/<name>.yml`.

use std::{fs, path::PathBuf};

use rusty_money::{Money, iso::Currency};
use slotmap::SlotMap;
use thiserror::Error;

use crate::{
    cards::{Card, CardKey, CardMeta},
    fixtures::wallets::{WalletFixture, parse_currency, parse_minor_units},
    wallet::{Wallet, WalletError},
};

pub mod wallets;

/// Fixture Parsing Errors
#[derive(Debug, Error)]
pub enum FixtureError {
    /// IO error reading fixture files
    #[error("Failed to read fixture file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Invalid amount format
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    /// Unknown currency code
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),

    /// Currency differs from the one already loaded
    #[error("Currency mismatch: expected {0}, found {1}")]
    CurrencyMismatch(String, String),

    /// No wallet loaded yet
    #[error("No wallet loaded yet; currency unknown")]
    NoCurrency,

    /// Not enough cards in fixture
    #[error("Not enough cards in fixture, available: {available}, requested: {requested}")]
    NotEnoughCards {
        /// Number of cards defined in the fixture
        available: usize,
        /// Number of cards requested
        requested: usize,
    },

    /// Wallet creation error
    #[error("Failed to create wallet: {0}")]
    Wallet(#[from] WalletError),
}

/// Fixture
#[derive(Debug)]
pub struct Fixture<'a> {
    /// Base path for fixture files
    base_path: PathBuf,

    /// Card labels, keyed by the key carried on each card
    card_meta: SlotMap<CardKey, CardMeta>,

    /// Pre-built cards, in file order
    cards: Vec<Card<'a>>,

    /// Currency for the fixture set
    currency: Option<&'static Currency>,
}

impl<'a> Fixture<'a> {
    /// Create a new empty fixture with default base path
    pub fn new() -> Self {
        Self::with_base_path("./fixtures")
    }

    /// Create a new empty fixture with custom base path
    pub fn with_base_path(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
            card_meta: SlotMap::with_key(),
            cards: Vec::new(),
            currency: None,
        }
    }

    /// Load cards from a YAML wallet fixture file, appending to any already loaded.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, an amount or
    /// currency is invalid, or the currency differs from earlier loads.
    pub fn load_wallet(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let file_path = self.base_path.join("wallets").join(format!("{name}.yml"));
        let contents = fs::read_to_string(&file_path)?;
        let fixture: WalletFixture = serde_norway::from_str(&contents)?;

        let currency = parse_currency(&fixture.currency)?;

        if let Some(existing_currency) = self.currency {
            if existing_currency != currency {
                return Err(FixtureError::CurrencyMismatch(
                    existing_currency.iso_alpha_code.to_string(),
                    currency.iso_alpha_code.to_string(),
                ));
            }
        } else {
            self.currency = Some(currency);
        }

        for card_fixture in fixture.cards {
            let minor_units = parse_minor_units(&card_fixture.denomination)?;

            let key = self.card_meta.insert(CardMeta {
                label: card_fixture.label,
            });

            self.cards
                .push(Card::with_key(key, Money::from_minor(minor_units, currency)));
        }

        Ok(self)
    }

    /// Load a named wallet fixture set
    ///
    /// # Errors
    ///
    /// Returns an error if the wallet fixture cannot be loaded.
    pub fn from_set(name: &str) -> Result<Self, FixtureError> {
        let mut fixture = Self::new();

        fixture.load_wallet(name)?;

        Ok(fixture)
    }

    /// Get all cards
    pub fn cards(&self) -> &[Card<'a>] {
        &self.cards
    }

    /// Get a card label by key
    pub fn label(&self, key: CardKey) -> Option<&str> {
        self.card_meta.get(key).map(|meta| meta.label.as_str())
    }

    /// Create a wallet from the first `n` loaded cards, or all of them.
    ///
    /// # Errors
    ///
    /// Returns an error if nothing has been loaded or fewer than `n` cards exist.
    pub fn wallet(&self, n: Option<usize>) -> Result<Wallet<'a>, FixtureError> {
        let currency = self.currency.ok_or(FixtureError::NoCurrency)?;

        if let Some(n) = n
            && n > self.cards.len()
        {
            return Err(FixtureError::NotEnoughCards {
                requested: n,
                available: self.cards.len(),
            });
        }

        let cards: Vec<Card<'a>> = self
            .cards
            .iter()
            .take(n.unwrap_or(self.cards.len()))
            .copied()
            .collect();

        Ok(Wallet::with_cards(cards, currency)?)
    }

    /// Get the currency
    ///
    /// # Errors
    ///
    /// Returns an error if no wallet has been loaded yet.
    pub fn currency(&self) -> Result<&'static Currency, FixtureError> {
        self.currency.ok_or(FixtureError::NoCurrency)
    }

    /// Get the card metadata `SlotMap`
    pub fn card_meta_map(&self) -> &SlotMap<CardKey, CardMeta> {
        &self.card_meta
    }
}

impl Default for Fixture<'_> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::{fs, path::Path};

    use rusty_money::iso::GBP;
    use testresult::TestResult;

    use super::*;

    fn write_wallet(base: &Path, name: &str, contents: &str) -> TestResult {
        let dir = base.join("wallets");

        fs::create_dir_all(&dir)?;
        fs::write(dir.join(format!("{name}.yml")), contents)?;

        Ok(())
    }

    #[test]
    fn fixture_from_set_loads_cards_and_labels() -> TestResult {
        let fixture = Fixture::from_set("birthday")?;

        assert_eq!(fixture.cards().len(), 4);
        assert_eq!(fixture.currency()?, GBP);

        let Some(first) = fixture.cards().first() else {
            panic!("birthday fixture has no cards");
        };

        assert_eq!(fixture.label(first.key()), Some("Grandma"));
        assert_eq!(first.minor_units(), 5000);

        Ok(())
    }

    #[test]
    fn fixture_wallet_takes_first_n_cards() -> TestResult {
        let fixture = Fixture::from_set("birthday")?;
        let wallet = fixture.wallet(Some(2))?;

        assert_eq!(wallet.len(), 2);
        assert_eq!(wallet.currency(), GBP);

        Ok(())
    }

    #[test]
    fn fixture_wallet_rejects_request_for_too_many_cards() -> TestResult {
        let fixture = Fixture::from_set("birthday")?;

        assert!(matches!(
            fixture.wallet(Some(10)),
            Err(FixtureError::NotEnoughCards {
                requested: 10,
                available: 4
            })
        ));

        Ok(())
    }

    #[test]
    fn fixture_no_currency_returns_error() {
        let fixture = Fixture::new();

        assert!(matches!(fixture.currency(), Err(FixtureError::NoCurrency)));
        assert!(matches!(fixture.wallet(None), Err(FixtureError::NoCurrency)));
    }

    #[test]
    fn fixture_missing_file_returns_io_error() -> TestResult {
        let dir = tempfile::tempdir()?;
        let mut fixture = Fixture::with_base_path(dir.path());

        assert!(matches!(
            fixture.load_wallet("missing"),
            Err(FixtureError::Io(_))
        ));

        Ok(())
    }

    #[test]
    fn fixture_load_wallet_rejects_currency_mismatch() -> TestResult {
        let dir = tempfile::tempdir()?;

        write_wallet(
            dir.path(),
            "usd_set",
            "currency: USD\ncards:\n  - label: A\n    denomination: \"10.00\"\n",
        )?;

        write_wallet(
            dir.path(),
            "gbp_set",
            "currency: GBP\ncards:\n  - label: B\n    denomination: \"10.00\"\n",
        )?;

        let mut fixture = Fixture::with_base_path(dir.path());

        fixture.load_wallet("usd_set")?;

        assert!(matches!(
            fixture.load_wallet("gbp_set"),
            Err(FixtureError::CurrencyMismatch(_, _))
        ));

        Ok(())
    }

    #[test]
    fn fixture_load_wallet_rejects_invalid_amount() -> TestResult {
        let dir = tempfile::tempdir()?;

        write_wallet(
            dir.path(),
            "broken",
            "currency: EUR\ncards:\n  - label: A\n    denomination: lots\n",
        )?;

        let mut fixture = Fixture::with_base_path(dir.path());

        assert!(matches!(
            fixture.load_wallet("broken"),
            Err(FixtureError::InvalidAmount(_))
        ));

        Ok(())
    }

    #[test]
    fn fixture_load_wallet_rejects_malformed_yaml() -> TestResult {
        let dir = tempfile::tempdir()?;

        write_wallet(dir.path(), "malformed", "currency: [GBP\n")?;

        let mut fixture = Fixture::with_base_path(dir.path());

        assert!(matches!(
            fixture.load_wallet("malformed"),
            Err(FixtureError::Yaml(_))
        ));

        Ok(())
    }

    #[test]
    fn fixture_meta_map_is_exposed() -> TestResult {
        let fixture = Fixture::from_set("birthday")?;

        assert_eq!(fixture.card_meta_map().len(), 4);

        Ok(())
    }

    #[test]
    fn fixture_default_matches_new() {
        let fixture = Fixture::default();

        assert_eq!(fixture.base_path, PathBuf::from("./fixtures"));
        assert!(fixture.cards.is_empty());
    }
}
