//! Technical indicators computed from closing-price history

mod rsi;

pub use rsi::{Rsi, RsiValue, DEFAULT_RSI_WINDOW};
