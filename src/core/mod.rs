//! Core business logic abstractions

pub mod log;
pub mod performance;
pub mod quote;
pub mod store;

// Re-export main types for cleaner imports
pub use performance::six_month_change;
pub use quote::{DailyQuote, PerformanceResult, ProviderKind, QuoteProvider};
pub use store::{InvestmentRecord, RecordStore};
