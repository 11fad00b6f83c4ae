//! Exchange-rate lookup over HTTP.
//!
//! This crate is the only place that talks to the rate API; everything else
//! sees the [`kasse_core::currency::RateProvider`] trait.

pub mod client;

pub use client::ExchangeRateClient;
