//! Provider fallback orchestration for a single investment target.

use crate::config::InvestmentTarget;
use crate::core::{PerformanceResult, ProviderKind, QuoteProvider, six_month_change};
use anyhow::Result;
use tracing::debug;

/// Symbol in Stooq's namespace: the configured override lowercased, or the
/// ticker lowercased with the `.us` suffix Stooq uses for US equities.
pub fn stooq_symbol(target: &InvestmentTarget) -> String {
    target
        .provider_symbol
        .as_ref()
        .map(|s| s.to_lowercase())
        .unwrap_or_else(|| format!("{}.us", target.ticker.to_lowercase()))
}

/// Symbol in Alpha Vantage's namespace: the configured override as-is, or
/// the bare ticker.
pub fn alphavantage_symbol(target: &InvestmentTarget) -> String {
    target
        .provider_symbol
        .clone()
        .unwrap_or_else(|| target.ticker.clone())
}

/// Resolves a six-month performance figure for one target, trying the
/// preferred feed first and the alternate feed when the first yields no
/// usable series. The result carries the feed that actually supplied it.
///
/// Transport failures are not caught here; they propagate so the refresh
/// coordinator can apply its own per-ticker continuation policy.
pub async fn resolve_performance(
    target: &InvestmentTarget,
    stooq: &dyn QuoteProvider,
    alphavantage: &dyn QuoteProvider,
) -> Result<Option<PerformanceResult>> {
    let stooq_attempt = (stooq, ProviderKind::Stooq, stooq_symbol(target));
    let alpha_attempt = (
        alphavantage,
        ProviderKind::AlphaVantage,
        alphavantage_symbol(target),
    );

    let attempts = match ProviderKind::normalize(target.provider.as_deref()) {
        ProviderKind::AlphaVantage => [alpha_attempt, stooq_attempt],
        ProviderKind::Stooq => [stooq_attempt, alpha_attempt],
    };

    for (provider, kind, symbol) in attempts {
        if let Some(quotes) = provider.fetch_daily(&symbol).await? {
            if let Some(value) = six_month_change(&quotes) {
                return Ok(Some(PerformanceResult {
                    value,
                    source: kind,
                }));
            }
            debug!(
                "{} series for {} too sparse for a change figure, trying next feed",
                kind, target.ticker
            );
        } else {
            debug!("No usable series from {} for {}", kind, target.ticker);
        }
    }

    Ok(None)
}
