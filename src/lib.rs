//! Crypto Ledger Library
//!
//! Imports transactions and prices from exchanges, banks and price data sets,
//! reconciles the legs of each transfer and values everything in one target
//! symbol for daily reporting.

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod persistence;
