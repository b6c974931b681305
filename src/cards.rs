//! Cards

use rusty_money::{Money, iso::Currency};
use slotmap::new_key_type;

new_key_type! {
    /// Card Key
    pub struct CardKey;
}

/// Display metadata for a card, stored outside the card itself.
#[derive(Debug, Clone, Default)]
pub struct CardMeta {
    /// Card label shown on receipts
    pub label: String,
}

/// A stored-value gift card with a fixed denomination.
///
/// Cards are never partially redeemed: a selection either uses the whole
/// denomination or leaves the card untouched.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Card<'a> {
    key: CardKey,
    denomination: Money<'a, Currency>,
}

impl<'a> Card<'a> {
    /// Creates a new card with the given denomination and a default key.
    pub fn new(denomination: Money<'a, Currency>) -> Self {
        Self::with_key(CardKey::default(), denomination)
    }

    /// Creates a new card with the given key and denomination.
    pub fn with_key(key: CardKey, denomination: Money<'a, Currency>) -> Self {
        Self { key, denomination }
    }

    /// Returns the key of the card
    pub fn key(&self) -> CardKey {
        self.key
    }

    /// Returns the denomination of the card
    pub fn denomination(&self) -> &Money<'a, Currency> {
        &self.denomination
    }

    /// Returns the denomination in minor units
    pub fn minor_units(&self) -> i64 {
        self.denomination.to_minor_units()
    }
}

/// Returns the denominations of the given cards in minor units, in input order.
pub fn denominations(cards: &[Card<'_>]) -> Vec<i64> {
    cards.iter().map(Card::minor_units).collect()
}

/// Finds the first card not held in `currency`.
///
/// Returns the card's input index and its currency code.
pub fn first_currency_mismatch(
    cards: &[Card<'_>],
    currency: &Currency,
) -> Option<(usize, &'static str)> {
    cards.iter().enumerate().find_map(|(i, card)| {
        let card_currency = card.denomination().currency();

        (card_currency != currency).then_some((i, card_currency.iso_alpha_code))
    })
}

#[cfg(test)]
mod tests {
    use rusty_money::iso;
    use slotmap::SlotMap;

    use super::*;

    #[test]
    fn accessors_return_values_from_constructor() {
        let mut keys = SlotMap::<CardKey, CardMeta>::with_key();
        let key = keys.insert(CardMeta {
            label: "Birthday".to_string(),
        });

        let card = Card::with_key(key, Money::from_minor(5000, iso::GBP));

        assert_eq!(card.key(), key);
        assert_eq!(card.denomination(), &Money::from_minor(5000, iso::GBP));
        assert_eq!(card.minor_units(), 5000);
    }

    #[test]
    fn denominations_preserve_input_order() {
        let cards = [
            Card::new(Money::from_minor(300, iso::USD)),
            Card::new(Money::from_minor(100, iso::USD)),
            Card::new(Money::from_minor(200, iso::USD)),
        ];

        assert_eq!(denominations(&cards), vec![300, 100, 200]);
    }

    #[test]
    fn first_currency_mismatch_reports_first_offending_card() {
        let cards = [
            Card::new(Money::from_minor(100, iso::GBP)),
            Card::new(Money::from_minor(100, iso::USD)),
            Card::new(Money::from_minor(100, iso::EUR)),
        ];

        assert_eq!(first_currency_mismatch(&cards, iso::GBP), Some((1, "USD")));
        assert_eq!(
            first_currency_mismatch(&[Card::new(Money::from_minor(100, iso::GBP))], iso::GBP),
            None
        );
        assert_eq!(first_currency_mismatch(&[], iso::GBP), None);
    }
}
