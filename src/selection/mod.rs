//! Gift card selection
//!
//! Picks the cards to redeem against a purchase so that the customer loses as
//! little as possible, where a loss is either cash still owed (the cards fall
//! short of the price) or balance burnt (the cards overshoot it and the excess
//! is forfeited).

use std::{cmp::Ordering, fmt};

use rusty_money::{Money, MoneyError, iso::Currency};
use smallvec::SmallVec;
use thiserror::Error;

use crate::{
    cards::{Card, denominations, first_currency_mismatch},
    selection::observer::{NoopObserver, SelectionObserver},
    wallet::Wallet,
};

pub mod closed_form;
pub mod knapsack;
pub mod observer;

/// Input indices of selected cards, in input order.
pub type CardIndices = SmallVec<[usize; 10]>;

/// Selection Errors
#[derive(Debug, Error)]
pub enum SelectionError {
    /// The purchase price is negative.
    #[error("purchase price must not be negative, got {0} minor units")]
    NegativePrice(i64),

    /// A card has a negative denomination.
    #[error("card {index} has a negative denomination of {minor_units} minor units")]
    NegativeDenomination {
        /// Input index of the card
        index: usize,
        /// Denomination in minor units
        minor_units: i64,
    },

    /// A card's currency differs from the price currency (index, card currency, price currency).
    #[error("Card {0} has currency {1}, but the price is in {2}")]
    CurrencyMismatch(usize, &'static str, &'static str),

    /// Summing denominations or extending the table overflowed.
    #[error("card amounts overflow the supported range")]
    Overflow,

    /// The initial search table would exceed the configured cell limit.
    #[error("search table of {rows} x {columns} cells exceeds the limit of {limit}")]
    TableTooLarge {
        /// Number of rows (cards)
        rows: usize,
        /// Number of columns (target prices)
        columns: usize,
        /// Configured maximum number of cells
        limit: usize,
    },

    /// Internal selection invariant was violated (this is a bug).
    #[error("selection invariant violated: {message}")]
    InvariantViolation {
        /// What invariant was violated
        message: &'static str,
    },

    /// Wrapped money arithmetic or currency mismatch error.
    #[error(transparent)]
    Money(#[from] MoneyError),
}

/// How a selection was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strategy {
    /// No cards, or every card is empty.
    ZeroSum,

    /// All cards together do not exceed the price.
    SumInsufficient,

    /// Every card has the same denomination.
    EqualDenomination,

    /// Bounded subset-sum search over the table.
    CombinationSearch,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Strategy::ZeroSum => "zero-sum",
            Strategy::SumInsufficient => "sum-insufficient",
            Strategy::EqualDenomination => "equal-denomination",
            Strategy::CombinationSearch => "combination-search",
        })
    }
}

/// What redeeming a selection costs the customer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Outcome<'a> {
    /// The selected cards cover the price exactly.
    Exact,

    /// Cash the customer still pays.
    Shortfall(Money<'a, Currency>),

    /// Card balance forfeited.
    Burn(Money<'a, Currency>),
}

/// Tuning knobs for a [`CardSelector`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SelectorOptions {
    /// Maximum number of cells the search table may hold, unbounded when `None`.
    ///
    /// An initial table over the limit is an error. Once the best shortfall is
    /// known, an extension column over the limit ends the burn search and the
    /// shortfall is kept.
    pub max_table_cells: Option<usize>,
}

/// Result of selecting cards for a purchase.
#[derive(Debug, Clone)]
pub struct Selection<'a> {
    strategy: Strategy,
    indices: CardIndices,
    cards: SmallVec<[Card<'a>; 10]>,
    price: Money<'a, Currency>,
    redeemed: Money<'a, Currency>,
    outcome: Outcome<'a>,
}

impl<'a> Selection<'a> {
    /// Strategy that produced the selection.
    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    /// Input indices of the selected cards, in input order.
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    /// Selected cards, in input order.
    pub fn cards(&self) -> &[Card<'a>] {
        &self.cards
    }

    /// Whether the card at input index `index` is redeemed.
    pub fn contains(&self, index: usize) -> bool {
        self.indices.binary_search(&index).is_ok()
    }

    /// Whether nothing should be redeemed.
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Purchase price the selection was made for.
    pub fn price(&self) -> Money<'a, Currency> {
        self.price
    }

    /// Sum of the selected denominations.
    pub fn redeemed(&self) -> Money<'a, Currency> {
        self.redeemed
    }

    /// Cost of redeeming the selection.
    pub fn outcome(&self) -> Outcome<'a> {
        self.outcome
    }

    /// Money lost: the shortfall or the burnt balance, zero on an exact match.
    pub fn loss(&self) -> Money<'a, Currency> {
        match self.outcome {
            Outcome::Exact => Money::from_minor(0, self.price.currency()),
            Outcome::Shortfall(amount) | Outcome::Burn(amount) => amount,
        }
    }
}

/// Selects gift cards for purchases.
///
/// The selector holds only its options; every call builds and owns its own
/// search state, so one selector can serve any number of threads.
#[derive(Debug, Clone, Default)]
pub struct CardSelector {
    options: SelectorOptions,
}

impl CardSelector {
    /// Create a selector with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a selector with the given options.
    pub fn with_options(options: SelectorOptions) -> Self {
        Self { options }
    }

    /// Options in use.
    pub fn options(&self) -> &SelectorOptions {
        &self.options
    }

    /// Select the cards to redeem against `price`.
    ///
    /// # Errors
    ///
    /// Returns a [`SelectionError`] if the price or a denomination is negative,
    /// a card is in a different currency from the price, or the initial search
    /// table would exceed a configured limit.
    pub fn select<'a>(
        &self,
        price: &Money<'a, Currency>,
        cards: &[Card<'a>],
    ) -> Result<Selection<'a>, SelectionError> {
        self.select_with_observer(price, cards, &mut NoopObserver)
    }

    /// Select the cards in a wallet to redeem against `price`.
    ///
    /// # Errors
    ///
    /// See [`CardSelector::select`].
    pub fn select_wallet<'a>(
        &self,
        price: &Money<'a, Currency>,
        wallet: &Wallet<'a>,
    ) -> Result<Selection<'a>, SelectionError> {
        self.select(price, wallet.cards())
    }

    /// Select cards with an observer following the decision points.
    ///
    /// # Errors
    ///
    /// See [`CardSelector::select`].
    #[tracing::instrument(
        level = "debug",
        skip_all,
        fields(price = %price, cards = cards.len())
    )]
    pub fn select_with_observer<'a>(
        &self,
        price: &Money<'a, Currency>,
        cards: &[Card<'a>],
        observer: &mut dyn SelectionObserver,
    ) -> Result<Selection<'a>, SelectionError> {
        let currency = price.currency();

        if let Some((i, card_currency)) = first_currency_mismatch(cards, currency) {
            return Err(SelectionError::CurrencyMismatch(
                i,
                card_currency,
                currency.iso_alpha_code,
            ));
        }

        let (strategy, indices) =
            self.select_indices(price.to_minor_units(), &denominations(cards), observer)?;

        let selected: SmallVec<[Card<'a>; 10]> = indices
            .iter()
            .map(|&i| {
                cards
                    .get(i)
                    .copied()
                    .ok_or(SelectionError::InvariantViolation {
                        message: "selected index outside the card list",
                    })
            })
            .collect::<Result<_, _>>()?;

        let redeemed = selected
            .iter()
            .try_fold(Money::from_minor(0, currency), |acc, card| {
                acc.add(*card.denomination())
            })?;

        let outcome = outcome(*price, redeemed)?;

        Ok(Selection {
            strategy,
            indices,
            cards: selected,
            price: *price,
            redeemed,
            outcome,
        })
    }

    /// Select cards by denomination in minor units.
    ///
    /// Returns the strategy used and the input indices of the selected cards in
    /// input order.
    ///
    /// # Errors
    ///
    /// Returns a [`SelectionError`] if the price or a denomination is negative,
    /// the denominations overflow, or the initial search table would exceed a
    /// configured limit.
    pub fn select_indices(
        &self,
        price: i64,
        denominations: &[i64],
        observer: &mut dyn SelectionObserver,
    ) -> Result<(Strategy, CardIndices), SelectionError> {
        let total = validate(price, denominations)?;
        let strategy = classify_total(price, total, denominations);

        observer.on_strategy(strategy, total);

        let indices = match strategy {
            Strategy::ZeroSum => closed_form::zero_sum(),
            Strategy::SumInsufficient => closed_form::sum_insufficient(denominations.len()),
            Strategy::EqualDenomination => {
                let Some(&denomination) = denominations.first() else {
                    return Err(SelectionError::InvariantViolation {
                        message: "equal-denomination strategy needs at least one card",
                    });
                };

                closed_form::equal_denomination(price, denomination, denominations.len())?
            }
            Strategy::CombinationSearch => knapsack::search(
                price,
                denominations,
                self.options.max_table_cells,
                observer,
            )?,
        };

        let redeemed = indices
            .iter()
            .filter_map(|&i| denominations.get(i))
            .sum();

        observer.on_selected(&indices, redeemed);

        Ok((strategy, indices))
    }
}

/// Select the cards to redeem against `price` with default options.
///
/// # Errors
///
/// See [`CardSelector::select`].
pub fn select_cards<'a>(
    price: &Money<'a, Currency>,
    cards: &[Card<'a>],
) -> Result<Selection<'a>, SelectionError> {
    CardSelector::new().select(price, cards)
}

/// Decide which strategy handles the given price and denominations.
///
/// # Errors
///
/// Returns a [`SelectionError`] if the price or a denomination is negative or
/// the denominations overflow.
pub fn classify(price: i64, denominations: &[i64]) -> Result<Strategy, SelectionError> {
    let total = validate(price, denominations)?;

    Ok(classify_total(price, total, denominations))
}

/// Check the inputs are non-negative and return the sum of denominations.
fn validate(price: i64, denominations: &[i64]) -> Result<i64, SelectionError> {
    if price < 0 {
        return Err(SelectionError::NegativePrice(price));
    }

    denominations
        .iter()
        .enumerate()
        .try_fold(0_i64, |total, (index, &minor_units)| {
            if minor_units < 0 {
                return Err(SelectionError::NegativeDenomination { index, minor_units });
            }

            total
                .checked_add(minor_units)
                .ok_or(SelectionError::Overflow)
        })
}

fn classify_total(price: i64, total: i64, denominations: &[i64]) -> Strategy {
    let all_equal = denominations
        .split_first()
        .is_none_or(|(first, rest)| rest.iter().all(|d| d == first));

    if total == 0 {
        Strategy::ZeroSum
    } else if total <= price {
        Strategy::SumInsufficient
    } else if all_equal {
        Strategy::EqualDenomination
    } else {
        Strategy::CombinationSearch
    }
}

fn outcome<'a>(
    price: Money<'a, Currency>,
    redeemed: Money<'a, Currency>,
) -> Result<Outcome<'a>, MoneyError> {
    let price_minor = price.to_minor_units();
    let redeemed_minor = redeemed.to_minor_units();

    Ok(match redeemed_minor.cmp(&price_minor) {
        Ordering::Equal => Outcome::Exact,
        Ordering::Less => Outcome::Shortfall(price.sub(redeemed)?),
        Ordering::Greater => Outcome::Burn(redeemed.sub(price)?),
    })
}
