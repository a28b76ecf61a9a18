//! Naive price-delta calculation for matched listings.

/// Signed price difference between the sell-side and buy-side listings,
/// rounded to two decimals. Zero when either price is missing.
pub fn compute_profit(source_price: Option<f64>, candidate_price: Option<f64>) -> f64 {
    match (source_price, candidate_price) {
        (Some(source), Some(candidate)) => round_cents(source - candidate),
        _ => 0.0,
    }
}

fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
