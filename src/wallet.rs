//! Wallet

use rusty_money::{Money, MoneyError, iso::Currency};
use thiserror::Error;

use crate::cards::{Card, first_currency_mismatch};

/// Errors related to wallet construction.
#[derive(Debug, Error)]
pub enum WalletError {
    /// A card's currency differs from the wallet currency (index, card currency, wallet currency).
    #[error("Card {0} has currency {1}, but wallet has currency {2}")]
    CurrencyMismatch(usize, &'static str, &'static str),
}

/// An ordered collection of gift cards held in a single currency.
#[derive(Debug)]
pub struct Wallet<'a> {
    cards: Vec<Card<'a>>,
    currency: &'static Currency,
}

impl<'a> Wallet<'a> {
    /// Create a new, empty wallet.
    pub fn new(currency: &'static Currency) -> Self {
        Wallet {
            cards: Vec::new(),
            currency,
        }
    }

    /// Create a new wallet with the given cards.
    ///
    /// # Errors
    ///
    /// Returns a `WalletError` if any card is held in a different currency.
    pub fn with_cards(
        cards: impl Into<Vec<Card<'a>>>,
        currency: &'static Currency,
    ) -> Result<Self, WalletError> {
        let cards = cards.into();

        if let Some((i, card_currency)) = first_currency_mismatch(&cards, currency) {
            return Err(WalletError::CurrencyMismatch(
                i,
                card_currency,
                currency.iso_alpha_code,
            ));
        }

        Ok(Wallet { cards, currency })
    }

    /// Total balance across all cards.
    ///
    /// # Errors
    ///
    /// Returns a `MoneyError` if the money arithmetic fails.
    pub fn balance(&self) -> Result<Money<'a, Currency>, MoneyError> {
        self.cards
            .iter()
            .try_fold(Money::from_minor(0, self.currency), |acc, card| {
                acc.add(*card.denomination())
            })
    }

    /// Get the cards in the wallet, in the order they were added.
    pub fn cards(&self) -> &[Card<'a>] {
        &self.cards
    }

    /// Iterate over the cards in the wallet.
    pub fn iter(&self) -> impl Iterator<Item = &Card<'a>> {
        self.cards.iter()
    }

    /// Get the number of cards in the wallet.
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// Check if the wallet is empty.
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Get the currency of the wallet.
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }
}
