//! Six-month performance resolution over a daily quote series.

use crate::core::quote::DailyQuote;
use chrono::Duration;

/// Trailing window anchoring the performance calculation, roughly six months.
const WINDOW_DAYS: i64 = 182;

/// Reduces an ascending quote series into a single percent-change figure
/// anchored at the trading day nearest to (and not after) 182 days before
/// the latest observation.
///
/// The backward scan finds the closest trading day at or before the target
/// date, which is the right anchor when markets were closed exactly 182 days
/// prior. When the whole series sits inside the window, the oldest quote is
/// used instead so short histories still yield a best-effort answer.
///
/// Returns `None` when the series has fewer than 2 points, when either
/// endpoint has a nonpositive close, or when the result is not finite.
pub fn six_month_change(quotes: &[DailyQuote]) -> Option<f64> {
    if quotes.len() < 2 {
        return None;
    }

    let latest = quotes.last()?;
    let target_date = latest.date - Duration::days(WINDOW_DAYS);

    let reference = quotes[..quotes.len() - 1]
        .iter()
        .rev()
        .find(|q| q.date <= target_date)
        .or_else(|| quotes.first())?;

    if reference.close <= 0.0 || latest.close <= 0.0 {
        return None;
    }

    let percent = (latest.close - reference.close) / reference.close * 100.0;
    let percent = (percent * 100.0).round() / 100.0;
    percent.is_finite().then_some(percent)
}
