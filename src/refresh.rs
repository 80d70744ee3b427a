//! Refresh coordinator: resolves every configured target and persists the
//! outcome, skipping over tickers whose providers failed outright.

use crate::config::{AppConfig, InvestmentTarget};
use crate::core::{InvestmentRecord, QuoteProvider, RecordStore};
use crate::providers::util::with_retry;
use crate::providers::{alphavantage::AlphaVantageProvider, stooq::StooqProvider};
use crate::resolve::resolve_performance;
use crate::store::FjallStore;
use crate::ui;
use anyhow::Result;
use chrono::Utc;
use futures::future::join_all;
use tracing::{debug, warn};

/// Per-target retry budget for transient transport failures.
const RETRIES: usize = 1;
const RETRY_DELAY_MS: u64 = 500;

#[derive(Debug, Default)]
pub struct RefreshSummary {
    pub refreshed: usize,
    pub no_data: usize,
    pub skipped: Vec<String>,
}

enum TargetOutcome {
    Refreshed,
    NoData,
    Skipped(String),
}

async fn refresh_target(
    target: &InvestmentTarget,
    stooq: &dyn QuoteProvider,
    alphavantage: &dyn QuoteProvider,
    store: &dyn RecordStore,
) -> TargetOutcome {
    let resolved = with_retry(
        || resolve_performance(target, stooq, alphavantage),
        RETRIES,
        RETRY_DELAY_MS,
    )
    .await;

    let performance = match resolved {
        Ok(performance) => performance,
        Err(e) => {
            // Leave any previously persisted figure untouched and move on.
            warn!("Skipping {}: {}", target.ticker, e);
            return TargetOutcome::Skipped(target.ticker.clone());
        }
    };

    let record = InvestmentRecord {
        ticker: target.ticker.clone(),
        label: target.label.clone(),
        order: target.order,
        perf_6m_percent: performance.map(|p| p.value),
        source: performance.map(|p| p.source),
        last_fetched: Some(Utc::now()),
    };

    if let Err(e) = store.put(&record).await {
        warn!("Failed to persist record for {}: {}", target.ticker, e);
        return TargetOutcome::Skipped(target.ticker.clone());
    }

    match performance {
        Some(p) => {
            debug!("{}: {:.2}% via {}", target.ticker, p.value, p.source);
            TargetOutcome::Refreshed
        }
        None => {
            debug!("{}: no usable series from either feed", target.ticker);
            TargetOutcome::NoData
        }
    }
}

/// Resolves all targets concurrently and persists one record per ticker.
/// A provider failure on one ticker never aborts the batch.
pub async fn refresh_all(
    targets: &[InvestmentTarget],
    stooq: &dyn QuoteProvider,
    alphavantage: &dyn QuoteProvider,
    store: &dyn RecordStore,
) -> Result<RefreshSummary> {
    let pb = ui::new_progress_bar(targets.len() as u64, true);
    pb.set_message("Refreshing investments...");

    let futures = targets.iter().map(|target| {
        let pb_clone = pb.clone();
        async move {
            let outcome = refresh_target(target, stooq, alphavantage, store).await;
            pb_clone.inc(1);
            outcome
        }
    });

    let outcomes = join_all(futures).await;
    pb.finish_and_clear();

    let mut summary = RefreshSummary::default();
    for outcome in outcomes {
        match outcome {
            TargetOutcome::Refreshed => summary.refreshed += 1,
            TargetOutcome::NoData => summary.no_data += 1,
            TargetOutcome::Skipped(ticker) => summary.skipped.push(ticker),
        }
    }
    Ok(summary)
}

pub async fn run(config_path: Option<&str>) -> Result<()> {
    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };

    if config.investments.is_empty() {
        println!("No investments configured. Add some with `sixmo setup`.");
        return Ok(());
    }

    let stooq = StooqProvider::new(config.stooq_base_url());
    let alphavantage = AlphaVantageProvider::new(
        config.alphavantage_base_url(),
        config.alphavantage_api_key(),
    );
    let store = FjallStore::open(&AppConfig::default_data_path()?)?;

    let summary = refresh_all(&config.investments, &stooq, &alphavantage, &store).await?;

    println!(
        "{} {} refreshed, {} without data",
        ui::style_text("Done:", ui::StyleType::TotalLabel),
        summary.refreshed,
        summary.no_data
    );
    if !summary.skipped.is_empty() {
        println!(
            "{} {}",
            ui::style_text("Skipped:", ui::StyleType::Error),
            summary.skipped.join(", ")
        );
    }
    println!(
        "{}",
        ui::style_text("Run `sixmo show` to see the results.", ui::StyleType::Subtle)
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{DailyQuote, ProviderKind};
    use crate::store::MemoryStore;
    use anyhow::anyhow;
    use async_trait::async_trait;
    use chrono::NaiveDate;

    /// Routes scripted responses per symbol; unknown symbols fail hard.
    struct ScriptedProvider {
        series: Vec<(String, Option<Vec<DailyQuote>>)>,
    }

    #[async_trait]
    impl QuoteProvider for ScriptedProvider {
        async fn fetch_daily(&self, symbol: &str) -> Result<Option<Vec<DailyQuote>>> {
            match self.series.iter().find(|(s, _)| s == symbol) {
                Some((_, series)) => Ok(series.clone()),
                None => Err(anyhow!("HTTP error: 500 for symbol: {symbol}")),
            }
        }
    }

    fn target(ticker: &str) -> InvestmentTarget {
        InvestmentTarget {
            ticker: ticker.to_string(),
            label: None,
            provider: None,
            provider_symbol: None,
            order: None,
        }
    }

    fn series(first: f64, last: f64) -> Vec<DailyQuote> {
        vec![
            DailyQuote::new(NaiveDate::from_ymd_opt(2023, 6, 1).unwrap(), first),
            DailyQuote::new(NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(), last),
        ]
    }

    #[tokio::test]
    async fn test_failed_ticker_is_skipped_without_aborting_batch() {
        let stooq = ScriptedProvider {
            series: vec![
                ("aapl.us".to_string(), Some(series(180.0, 210.0))),
                // msft.us missing -> transport error on both tries
                ("idle.us".to_string(), None),
            ],
        };
        let alphavantage = ScriptedProvider {
            series: vec![
                ("MSFT".to_string(), Some(series(100.0, 90.0))),
                ("IDLE".to_string(), None),
            ],
        };
        let store = MemoryStore::new();

        let targets = vec![target("AAPL"), target("MSFT"), target("IDLE")];
        let summary = refresh_all(&targets, &stooq, &alphavantage, &store)
            .await
            .unwrap();

        // MSFT's primary feed errors, so it is skipped even though the
        // alternate feed had data; IDLE has no data anywhere.
        assert_eq!(summary.refreshed, 1);
        assert_eq!(summary.no_data, 1);
        assert_eq!(summary.skipped, vec!["MSFT".to_string()]);

        let aapl = store.get("AAPL").await.unwrap().unwrap();
        assert_eq!(aapl.perf_6m_percent, Some(16.67));
        assert_eq!(aapl.source, Some(ProviderKind::Stooq));
        assert!(aapl.last_fetched.is_some());

        // Skipped ticker leaves no record behind.
        assert!(store.get("MSFT").await.unwrap().is_none());

        // No-data ticker still gets a timestamped record without a figure.
        let idle = store.get("IDLE").await.unwrap().unwrap();
        assert!(idle.perf_6m_percent.is_none());
        assert!(idle.last_fetched.is_some());
    }

    #[tokio::test]
    async fn test_skipped_ticker_keeps_previous_record() {
        let stooq = ScriptedProvider { series: vec![] };
        let alphavantage = ScriptedProvider { series: vec![] };
        let store = MemoryStore::new();

        let previous = InvestmentRecord {
            ticker: "AAPL".to_string(),
            label: None,
            order: None,
            perf_6m_percent: Some(5.0),
            source: Some(ProviderKind::Stooq),
            last_fetched: None,
        };
        store.put(&previous).await.unwrap();

        let summary = refresh_all(&[target("AAPL")], &stooq, &alphavantage, &store)
            .await
            .unwrap();
        assert_eq!(summary.skipped, vec!["AAPL".to_string()]);
        assert_eq!(store.get("AAPL").await.unwrap().unwrap(), previous);
    }
}
