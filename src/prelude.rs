//! Redeem prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    cards::{Card, CardKey, CardMeta},
    fixtures::{Fixture, FixtureError},
    receipt::{Receipt, ReceiptError},
    selection::{
        CardIndices, CardSelector, Outcome, Selection, SelectionError, SelectorOptions, Strategy,
        classify,
        observer::{NoopObserver, SelectionObserver, TracingObserver},
        select_cards,
    },
    wallet::{Wallet, WalletError},
};
