//! Centered moving-average smoothing.

/// Smooth `series` with a centered moving average of `span` samples.
///
/// A span of one or less returns a copy. Near the edges only the in-range
/// neighbours are averaged; there is no padding.
pub fn smooth(series: &[f64], span: usize) -> Vec<f64> {
    if span <= 1 {
        return series.to_vec();
    }

    let half = span / 2;
    (0..series.len())
        .map(|i| {
            let lo = i.saturating_sub(half);
            let hi = (i + half).min(series.len() - 1);
            let window = &series[lo..=hi];
            window.iter().sum::<f64>() / window.len().max(1) as f64
        })
        .collect()
}
