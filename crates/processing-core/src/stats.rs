//! Summary statistics over per-frame signals.
//!
//! Missing frames appear as `NaN` and are skipped, so a signal with a few
//! lost detections still has a meaningful center.

/// Median of the non-`NaN` values, or `None` if there are none.
///
/// Even-length inputs average the two middle values.
pub fn median(values: &[f64]) -> Option<f64> {
    let mut sorted: Vec<f64> = values.iter().copied().filter(|v| !v.is_nan()).collect();
    if sorted.is_empty() {
        return None;
    }
    sorted.sort_by(f64::total_cmp);

    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}

/// Arithmetic mean of the non-`NaN` values, or `None` if there are none.
pub fn mean(values: &[f64]) -> Option<f64> {
    let (sum, count) = values
        .iter()
        .filter(|v| !v.is_nan())
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    (count > 0).then(|| sum / count as f64)
}

/// Median absolute deviation taken about the mean: `median(|x - mean(x)|)`.
///
/// This differs from the textbook MAD, which centers on the median.
pub fn mad_about_mean(values: &[f64]) -> Option<f64> {
    let center = mean(values)?;
    let deviations: Vec<f64> = values.iter().map(|v| (v - center).abs()).collect();
    median(&deviations)
}

/// Indices whose value lies strictly outside `center ± threshold`.
///
/// `NaN` values never fall outside the band. Indices are ascending.
pub fn outside_band(values: &[f64], center: f64, threshold: f64) -> Vec<usize> {
    let low = center - threshold;
    let high = center + threshold;
    values
        .iter()
        .enumerate()
        .filter(|&(_, &v)| v < low || v > high)
        .map(|(i, _)| i)
        .collect()
}

/// Round to the nearest integer, ties to even.
pub fn round_half_even(value: f64) -> f64 {
    let rounded = value.round();
    if (value - value.trunc()).abs() == 0.5 {
        2.0 * (value / 2.0).round()
    } else {
        rounded
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_median_odd_even_and_nan() {
        assert_eq!(median(&[3.0, 1.0, 2.0]), Some(2.0));
        assert_eq!(median(&[4.0, 1.0, 3.0, 2.0]), Some(2.5));
        assert_eq!(median(&[f64::NAN, 5.0, 1.0]), Some(3.0));
        assert_eq!(median(&[f64::NAN]), None);
        assert_eq!(median(&[]), None);
    }

    #[test]
    fn test_mean_skips_nan() {
        assert_eq!(mean(&[1.0, f64::NAN, 3.0]), Some(2.0));
        assert_eq!(mean(&[]), None);
    }

    #[test]
    fn test_mad_is_centered_on_mean() {
        // mean = 4, deviations = [3, 2, 1, 6] -> median 2.5.
        // A median-centered MAD would give median(|x - 2.5|) = 1.0.
        let values = [1.0, 2.0, 3.0, 10.0];
        assert_eq!(mad_about_mean(&values), Some(2.5));
    }

    #[test]
    fn test_outside_band_is_strict() {
        let values = [5.0, 7.0, 3.0, 7.5, f64::NAN, 2.0];
        assert_eq!(outside_band(&values, 5.0, 2.0), vec![3, 5]);
    }

    #[test]
    fn test_round_half_even() {
        assert_eq!(round_half_even(12.5), 12.0);
        assert_eq!(round_half_even(13.5), 14.0);
        assert_eq!(round_half_even(33.333), 33.0);
        assert_eq!(round_half_even(66.7), 67.0);
    }
}
