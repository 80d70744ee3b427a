use crate::core::{DailyQuote, QuoteProvider};
use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use chrono::NaiveDate;
use tracing::{debug, instrument};

/// Client for the Stooq daily-history CSV feed.
///
/// Response is `Date,Open,High,Low,Close,Volume` rows after a header line;
/// only date and close are consumed. Symbols follow Stooq's namespace,
/// e.g. a lowercase `aapl.us` for US equities.
pub struct StooqProvider {
    base_url: String,
}

impl StooqProvider {
    pub fn new(base_url: &str) -> Self {
        StooqProvider {
            base_url: base_url.to_string(),
        }
    }
}

fn parse_csv_series(body: &str) -> Vec<DailyQuote> {
    let mut quotes: Vec<DailyQuote> = body
        .lines()
        .filter_map(|line| {
            let mut cols = line.split(',');
            let date = cols.next()?;
            let close = cols.nth(3)?;

            // The header row and malformed rows fall out here.
            let date = NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d").ok()?;
            let close: f64 = close.trim().parse().ok()?;
            (close > 0.0).then_some(DailyQuote::new(date, close))
        })
        .collect();

    quotes.sort_by_key(|q| q.date);
    quotes.dedup_by_key(|q| q.date);
    quotes
}

#[async_trait]
impl QuoteProvider for StooqProvider {
    #[instrument(name = "StooqFetch", skip(self), fields(symbol = %symbol))]
    async fn fetch_daily(&self, symbol: &str) -> Result<Option<Vec<DailyQuote>>> {
        if symbol.trim().is_empty() {
            debug!("Empty symbol, skipping network call");
            return Ok(None);
        }

        let url = format!("{}/q/d/l/?s={}&i=d", self.base_url, symbol);
        debug!("Requesting daily history from {}", url);

        let client = reqwest::Client::builder().user_agent("sixmo/1.0").build()?;
        let response = client
            .get(&url)
            .send()
            .await
            .map_err(|e| anyhow!("Request error: {} for symbol: {} URL: {}", e, symbol, url))?;

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
            .with_context(|| format!("Failed to read CSV body for symbol: {symbol}"))?;

        let quotes = parse_csv_series(&body);
        if quotes.len() < 2 {
            debug!(
                "Stooq returned {} usable rows for {}, not enough for a change figure",
                quotes.len(),
                symbol
            );
            return Ok(None);
        }

        debug!("Parsed {} daily quotes for {}", quotes.len(), symbol);
        Ok(Some(quotes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn create_stooq_mock_server(
        symbol: &str,
        mock_response: &str,
        status_code: u16,
    ) -> MockServer {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/q/d/l/"))
            .and(query_param("s", symbol))
            .and(query_param("i", "d"))
            .respond_with(ResponseTemplate::new(status_code).set_body_string(mock_response))
            .mount(&mock_server)
            .await;
        mock_server
    }

    #[tokio::test]
    async fn test_successful_csv_fetch() {
        let mock_response = "Date,Open,High,Low,Close,Volume\n\
                             2024-01-02,184.35,186.40,183.92,185.64,82488700\n\
                             2024-01-03,183.22,185.88,183.43,184.25,58414500\n\
                             2024-01-04,182.15,183.09,180.88,181.91,71983600\n";
        let mock_server = create_stooq_mock_server("aapl.us", mock_response, 200).await;

        let provider = StooqProvider::new(&mock_server.uri());
        let quotes = provider.fetch_daily("aapl.us").await.unwrap().unwrap();

        assert_eq!(quotes.len(), 3);
        assert_eq!(
            quotes[0].date,
            NaiveDate::from_ymd_opt(2024, 1, 2).unwrap()
        );
        assert_eq!(quotes[0].close, 185.64);
        assert_eq!(quotes[2].close, 181.91);
    }

    #[tokio::test]
    async fn test_malformed_and_nonpositive_rows_are_dropped() {
        let mock_response = "Date,Open,High,Low,Close,Volume\n\
                             2024-01-02,1,1,1,185.64,100\n\
                             not-a-date,1,1,1,50.0,100\n\
                             2024-01-03,1,1,1,abc,100\n\
                             2024-01-04,1,1,1,0,100\n\
                             2024-01-05,1,1,1,-3.5,100\n\
                             2024-01-08,1,1,1,181.91,100\n\
                             2024-01-02,1,1,1,999.0,100\n";
        let mock_server = create_stooq_mock_server("aapl.us", mock_response, 200).await;

        let provider = StooqProvider::new(&mock_server.uri());
        let quotes = provider.fetch_daily("aapl.us").await.unwrap().unwrap();

        // Only the two well-formed positive rows survive; the duplicate
        // 2024-01-02 row dedups down to the first occurrence after sorting.
        assert_eq!(quotes.len(), 2);
        assert_eq!(quotes[0].close, 185.64);
        assert_eq!(quotes[1].close, 181.91);
    }

    #[tokio::test]
    async fn test_single_row_is_no_result() {
        let mock_response = "Date,Open,High,Low,Close,Volume\n\
                             2024-01-02,1,1,1,185.64,100\n";
        let mock_server = create_stooq_mock_server("aapl.us", mock_response, 200).await;

        let provider = StooqProvider::new(&mock_server.uri());
        let result = provider.fetch_daily("aapl.us").await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_http_error_propagates() {
        let mock_server = create_stooq_mock_server("aapl.us", "", 500).await;

        let provider = StooqProvider::new(&mock_server.uri());
        let result = provider.fetch_daily("aapl.us").await;
        assert!(result.is_err());
        assert_eq!(
            result.unwrap_err().to_string(),
            "HTTP error: 500 Internal Server Error for symbol: aapl.us"
        );
    }

    #[tokio::test]
    async fn test_empty_symbol_makes_no_request() {
        let mock_server = MockServer::start().await;

        let provider = StooqProvider::new(&mock_server.uri());
        let result = provider.fetch_daily("  ").await.unwrap();
        assert!(result.is_none());
        assert!(mock_server.received_requests().await.unwrap().is_empty());
    }
}
