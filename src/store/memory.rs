use crate::core::store::{InvestmentRecord, RecordStore};
use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::Mutex;

/// In-memory record store, used by tests.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<HashMap<String, InvestmentRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn get(&self, ticker: &str) -> Result<Option<InvestmentRecord>> {
        Ok(self.inner.lock().await.get(ticker).cloned())
    }

    async fn put(&self, record: &InvestmentRecord) -> Result<()> {
        self.inner
            .lock()
            .await
            .insert(record.ticker.clone(), record.clone());
        Ok(())
    }

    async fn list(&self) -> Result<Vec<InvestmentRecord>> {
        Ok(self.inner.lock().await.values().cloned().collect())
    }

    async fn remove(&self, ticker: &str) -> Result<()> {
        self.inner.lock().await.remove(ticker);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(ticker: &str) -> InvestmentRecord {
        InvestmentRecord {
            ticker: ticker.to_string(),
            label: None,
            order: None,
            perf_6m_percent: Some(1.0),
            source: None,
            last_fetched: None,
        }
    }

    #[tokio::test]
    async fn test_memory_store_roundtrip() {
        let store = MemoryStore::new();

        assert!(store.get("AAPL").await.unwrap().is_none());
        store.put(&record("AAPL")).await.unwrap();
        assert_eq!(store.get("AAPL").await.unwrap().unwrap().ticker, "AAPL");

        store.put(&record("MSFT")).await.unwrap();
        assert_eq!(store.list().await.unwrap().len(), 2);

        store.remove("AAPL").await.unwrap();
        assert!(store.get("AAPL").await.unwrap().is_none());
    }
}
