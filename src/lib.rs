//! btc-forecast: next-day Bitcoin price forecast dashboard
//!
//! This library provides the core components for:
//! - Spot quotes and daily history for BTC and gold from CoinGecko
//! - News retrieval from NewsAPI
//! - VADER news sentiment scoring
//! - RSI over daily closes
//! - Feature assembly and model inference from a JSON artifact
//! - Buy/hold/sell classification at ±2%
//! - Dashboard rendering to text, JSON and HTML, served over HTTP
//! - Structured logging and Prometheus metrics

pub mod cli;
pub mod config;
pub mod dashboard;
pub mod decision;
pub mod error;
pub mod features;
pub mod http;
pub mod indicator;
pub mod market;
pub mod model;
pub mod news;
pub mod pipeline;
pub mod sentiment;
pub mod server;
pub mod telemetry;
