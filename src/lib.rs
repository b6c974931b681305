//! Redeem
//!
//! Redeem picks which gift cards to redeem against a purchase so the customer
//! loses as little as possible, either in cash still owed or in card balance
//! burnt past the price.

pub mod cards;
pub mod fixtures;
pub mod prelude;
pub mod receipt;
pub mod selection;
pub mod utils;
pub mod wallet;
