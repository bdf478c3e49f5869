//! Threshold and debounce detection of loudness transitions.

/// Find timestamps where the level changes by at least `threshold_db`
/// between consecutive windows.
///
/// Rises and falls both count. A candidate is dropped when it falls within
/// `min_gap_sec` of the previously accepted moment. `times` and `levels` are
/// read pairwise up to the shorter length. The threshold is not validated
/// here; a non-positive threshold fires on every window.
pub fn detect(times: &[f64], levels: &[f64], threshold_db: f64, min_gap_sec: f64) -> Vec<f64> {
    let len = times.len().min(levels.len());
    let mut moments = Vec::new();
    let mut last_accepted = f64::NEG_INFINITY;

    for i in 1..len {
        let delta = levels[i] - levels[i - 1];
        if delta.abs() < threshold_db {
            continue;
        }

        let t = times[i];
        if t - last_accepted >= min_gap_sec {
            moments.push(t);
            last_accepted = t;
        }
    }

    moments
}
