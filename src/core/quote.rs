//! Quote abstractions and core types

use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// A single trading day's closing price. Series handed to the resolver are
/// deduplicated by date and sorted ascending; `close` is always positive
/// because providers drop rows that fail that check.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailyQuote {
    pub date: NaiveDate,
    pub close: f64,
}

impl DailyQuote {
    pub fn new(date: NaiveDate, close: f64) -> Self {
        Self { date, close }
    }
}

/// The two known historical-price feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    Stooq,
    AlphaVantage,
}

impl ProviderKind {
    /// Maps a target's declared provider preference onto a known feed.
    /// Anything unrecognized (or absent) falls back to the default, Stooq.
    pub fn normalize(preference: Option<&str>) -> Self {
        match preference.map(str::trim) {
            Some(s) if s.eq_ignore_ascii_case("alphavantage") => ProviderKind::AlphaVantage,
            _ => ProviderKind::Stooq,
        }
    }
}

impl Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProviderKind::Stooq => write!(f, "stooq"),
            ProviderKind::AlphaVantage => write!(f, "alphavantage"),
        }
    }
}

/// Outcome of resolving one target: the six-month percent change and the
/// feed that actually supplied the series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PerformanceResult {
    pub value: f64,
    pub source: ProviderKind,
}

/// Contract shared by both feed clients.
///
/// `Ok(None)` means the feed answered but had no usable series for the
/// symbol (empty symbol, fewer than 2 points, throttling). `Err` is reserved
/// for transport failures and is never swallowed at this layer.
#[async_trait]
pub trait QuoteProvider: Send + Sync {
    async fn fetch_daily(&self, symbol: &str) -> Result<Option<Vec<DailyQuote>>>;
}
