use crate::core::store::{InvestmentRecord, RecordStore};
use anyhow::{Context, Result};
use async_trait::async_trait;
use fjall::{Keyspace, PartitionCreateOptions, PartitionHandle};
use std::path::Path;
use tracing::debug;

/// Persistent record store backed by a fjall keyspace. Keys are ticker
/// bytes, values serde_json-encoded records.
pub struct FjallStore {
    _keyspace: Keyspace,
    records: PartitionHandle,
}

impl FjallStore {
    pub fn open(path: &Path) -> Result<Self> {
        std::fs::create_dir_all(path)
            .with_context(|| format!("Failed to create data directory: {}", path.display()))?;

        let keyspace = fjall::Config::new(path)
            .open()
            .with_context(|| format!("Failed to open record store at {}", path.display()))?;
        let records = keyspace
            .open_partition("records", PartitionCreateOptions::default())
            .context("Failed to open records partition")?;

        Ok(Self {
            _keyspace: keyspace,
            records,
        })
    }
}

#[async_trait]
impl RecordStore for FjallStore {
    async fn get(&self, ticker: &str) -> Result<Option<InvestmentRecord>> {
        match self.records.get(ticker.as_bytes())? {
            Some(bytes) => {
                let record = serde_json::from_slice(&bytes)
                    .with_context(|| format!("Corrupt record for ticker: {ticker}"))?;
                Ok(Some(record))
            }
            None => Ok(None),
        }
    }

    async fn put(&self, record: &InvestmentRecord) -> Result<()> {
        let bytes = serde_json::to_vec(record)?;
        self.records.insert(record.ticker.as_bytes(), bytes)?;
        debug!("Stored record for {}", record.ticker);
        Ok(())
    }

    async fn list(&self) -> Result<Vec<InvestmentRecord>> {
        let mut records = Vec::new();
        for entry in self.records.iter() {
            let (key, value) = entry?;
            let record: InvestmentRecord = serde_json::from_slice(&value).with_context(|| {
                format!(
                    "Corrupt record for ticker: {}",
                    String::from_utf8_lossy(&key)
                )
            })?;
            records.push(record);
        }
        Ok(records)
    }

    async fn remove(&self, ticker: &str) -> Result<()> {
        self.records.remove(ticker.as_bytes())?;
        Ok(())
    }
}
