use crate::core::{DailyQuote, QuoteProvider};
use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Deserialize;
use std::collections::HashMap;
use tracing::{debug, instrument, warn};

/// Client for the Alpha Vantage daily-adjusted JSON feed.
///
/// The free tier throttles aggressively; throttling arrives as a well-formed
/// 200 response carrying a `Note` string instead of the series, and is
/// reported as no-data rather than a failure.
pub struct AlphaVantageProvider {
    base_url: String,
    api_key: String,
}

impl AlphaVantageProvider {
    pub fn new(base_url: &str, api_key: &str) -> Self {
        AlphaVantageProvider {
            base_url: base_url.to_string(),
            api_key: api_key.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct AlphaVantageResponse {
    #[serde(rename = "Time Series (Daily)")]
    series: Option<HashMap<String, AlphaVantageBar>>,
    #[serde(rename = "Note")]
    note: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AlphaVantageBar {
    #[serde(rename = "5. adjusted close")]
    adjusted_close: Option<String>,
    #[serde(rename = "4. close")]
    close: Option<String>,
    #[serde(rename = "close")]
    bare_close: Option<String>,
}

impl AlphaVantageBar {
    fn close_value(&self) -> Option<f64> {
        self.adjusted_close
            .as_deref()
            .or(self.close.as_deref())
            .or(self.bare_close.as_deref())
            .and_then(|s| s.trim().parse().ok())
    }
}

fn parse_series(series: HashMap<String, AlphaVantageBar>) -> Vec<DailyQuote> {
    let mut quotes: Vec<DailyQuote> = series
        .into_iter()
        .filter_map(|(date, bar)| {
            let date = NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d").ok()?;
            let close = bar.close_value()?;
            (close > 0.0).then_some(DailyQuote::new(date, close))
        })
        .collect();

    quotes.sort_by_key(|q| q.date);
    quotes.dedup_by_key(|q| q.date);
    quotes
}

#[async_trait]
impl QuoteProvider for AlphaVantageProvider {
    #[instrument(name = "AlphaVantageFetch", skip(self), fields(symbol = %symbol))]
    async fn fetch_daily(&self, symbol: &str) -> Result<Option<Vec<DailyQuote>>> {
        if symbol.trim().is_empty() {
            debug!("Empty symbol, skipping network call");
            return Ok(None);
        }

        let url = format!(
            "{}/query?function=TIME_SERIES_DAILY_ADJUSTED&symbol={}&outputsize=full&apikey={}",
            self.base_url, symbol, self.api_key
        );
        debug!("Requesting daily history from {}/query for {}", self.base_url, symbol);

        let client = reqwest::Client::builder().user_agent("sixmo/1.0").build()?;
        let response = client
            .get(&url)
            .send()
            .await
            .map_err(|e| anyhow!("Request error: {} for symbol: {}", e, symbol))?;

        if !response.status().is_success() {
            return Err(anyhow!(
                "HTTP error: {} for symbol: {}",
                response.status(),
                symbol
            ));
        }

        let body = response
            .text()
            .await
            .with_context(|| format!("Failed to read response body for symbol: {symbol}"))?;

        let data: AlphaVantageResponse = serde_json::from_str(&body)
            .with_context(|| format!("Failed to parse Alpha Vantage response for {symbol}"))?;

        let Some(series) = data.series else {
            if let Some(note) = data.note {
                warn!("Alpha Vantage throttled request for {}: {}", symbol, note);
            } else {
                debug!("No daily series in Alpha Vantage response for {}", symbol);
            }
            return Ok(None);
        };

        let quotes = parse_series(series);
        if quotes.len() < 2 {
            debug!(
                "Alpha Vantage returned {} usable rows for {}, not enough for a change figure",
                quotes.len(),
                symbol
            );
            return Ok(None);
        }

        debug!("Parsed {} daily quotes for {}", quotes.len(), symbol);
        Ok(Some(quotes))
    }
}
