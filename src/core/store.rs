//! Persistence contract for per-ticker performance records.

use crate::core::quote::ProviderKind;
use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The persisted per-ticker row: display metadata plus the latest resolved
/// six-month figure. `perf_6m_percent` stays `None` when neither feed had a
/// usable series in the last refresh.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvestmentRecord {
    pub ticker: String,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub order: Option<i64>,
    #[serde(default)]
    pub perf_6m_percent: Option<f64>,
    #[serde(default)]
    pub source: Option<ProviderKind>,
    #[serde(default)]
    pub last_fetched: Option<DateTime<Utc>>,
}

#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn get(&self, ticker: &str) -> Result<Option<InvestmentRecord>>;
    async fn put(&self, record: &InvestmentRecord) -> Result<()>;
    async fn list(&self) -> Result<Vec<InvestmentRecord>>;
    async fn remove(&self, ticker: &str) -> Result<()>;
}
