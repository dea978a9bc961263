//! Percentage arithmetic shared by the readers and the aggregator.

/// Percentage of `num` over `den`, rounded to the nearest tenth.
///
/// A zero denominator yields `0.0`. The result is clamped into `[0, 100]` so
/// a reader handing over `num > den` cannot push a percentage out of range.
///
/// ```
/// use covstat::coverage::percent;
///
/// assert_eq!(percent(1, 3), 33.3);
/// assert_eq!(percent(0, 0), 0.0);
/// ```
pub fn percent(num: u64, den: u64) -> f64 {
    if den == 0 {
        return 0.0;
    }
    let ratio = num as f64 / den as f64;
    ((ratio * 1000.0).round() / 10.0).clamp(0.0, 100.0)
}
