use tracing::debug;

use super::{InferenceError, TestOutcome, rank::Ranking, standard_normal_upper};

const WILCOXON: &str = "Wilcoxon signed-rank test";

/// Largest number of differences for which the exact distribution is used.
const EXACT_MAX_SIZE: usize = 50;

/// Two-sided Wilcoxon signed-rank test of `sample - popmean`.
///
/// Zero differences are discarded before ranking. The statistic is
/// `min(W+, W-)`, the smaller of the positive and negative rank sums. The
/// exact null distribution is used for at most 50 differences when no
/// difference was zero and no absolute differences tie; otherwise the normal
/// approximation with tie correction.
///
/// Fails with [`InferenceError::ConstantInput`] when every difference is zero.
///
/// # Examples
///
/// ```
/// # use hypotest_stats::inference::wilcoxon::signed_rank;
/// let outcome = signed_rank(&[1.0, 2.0, 3.0, 4.0, 5.0], 0.0).unwrap();
/// assert_eq!(outcome.statistic, 0.0);
/// assert!((outcome.p_value - 0.0625).abs() < 1e-12);
/// ```
#[expect(clippy::cast_precision_loss)]
pub fn signed_rank(sample: &[f64], popmean: f64) -> Result<TestOutcome, InferenceError> {
    InferenceError::require_len(WILCOXON, sample, 1)?;

    let differences = sample
        .iter()
        .map(|v| v - popmean)
        .filter(|d| *d != 0.0)
        .collect::<Vec<_>>();
    if differences.is_empty() {
        return Err(InferenceError::ConstantInput { test: WILCOXON });
    }
    let had_zeros = differences.len() < sample.len();

    let magnitudes = differences.iter().map(|d| d.abs()).collect::<Vec<_>>();
    let ranking = Ranking::new(&magnitudes);
    let (plus, minus) = differences.iter().zip(&ranking.ranks).fold(
        (0.0_f64, 0.0_f64),
        |(plus, minus), (d, &rank)| {
            if *d > 0.0 {
                (plus + rank, minus)
            } else {
                (plus, minus + rank)
            }
        },
    );
    let statistic = f64::min(plus, minus);

    let n = differences.len();
    let exact = n <= EXACT_MAX_SIZE && !had_zeros && !ranking.has_ties();
    debug!(n, exact, "Wilcoxon signed-rank method");

    let p_value = if exact {
        2.0 * exact_lower_tail(n, statistic)
    } else {
        let n = n as f64;
        let mean = n * (n + 1.0) / 4.0;
        let variance = n * (n + 1.0) * (2.0 * n + 1.0) / 24.0 - ranking.tie_term() / 48.0;
        let z = (statistic - mean) / variance.sqrt();
        2.0 * standard_normal_upper(z.abs())
    };
    Ok(TestOutcome::new(statistic, p_value))
}

/// `P(W <= w)` for the signed-rank statistic of `n` untied, non-zero differences.
#[expect(
    clippy::cast_precision_loss,
    clippy::cast_sign_loss,
    clippy::cast_possible_truncation
)]
fn exact_lower_tail(n: usize, w: f64) -> f64 {
    let max_sum = n * (n + 1) / 2;
    // counts[s] = number of subsets of {1..=n} whose sum is s
    let mut counts = vec![0.0; max_sum + 1];
    counts[0] = 1.0;
    for k in 1..=n {
        for s in (k..=max_sum).rev() {
            counts[s] += counts[s - k];
        }
    }
    let end = (w.floor().max(0.0) as usize).min(max_sum);
    let total = 2.0_f64.powi(i32::try_from(n).unwrap_or(i32::MAX));
    counts[..=end].iter().sum::<f64>() / total
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    #[test]
    fn test_exact_mixed_signs() {
        // Differences -2, -1, 1.5, 3, 4.5 rank as 3, 1, 2, 4, 5: W- = 4, W+ = 11
        let outcome = signed_rank(&[3.0, 4.0, 6.5, 8.0, 9.5], 5.0).unwrap();
        assert_eq!(outcome.statistic, 4.0);
        // 7 of the 32 sign assignments give W <= 4
        assert_abs_diff_eq!(outcome.p_value, 2.0 * 7.0 / 32.0, epsilon = 1e-12);
    }

    #[test]
    fn test_approximation_with_zero_and_ties() {
        let sample = [1.0, 2.0, 2.0, 3.0, -1.0, 4.0, 5.0, 5.0, 0.0];
        let outcome = signed_rank(&sample, 0.0).unwrap();
        assert_eq!(outcome.statistic, 1.5);
        assert_abs_diff_eq!(outcome.p_value, 0.020_394_840_183_375_9, epsilon = 1e-9);
    }

    #[test]
    fn test_all_differences_zero() {
        let err = signed_rank(&[5.0, 5.0, 5.0], 5.0).unwrap_err();
        assert_eq!(err, InferenceError::ConstantInput { test: WILCOXON });
    }

    #[test]
    fn test_empty_sample() {
        assert!(matches!(
            signed_rank(&[], 0.0).unwrap_err(),
            InferenceError::InsufficientData { .. }
        ));
    }

    #[test]
    fn test_exact_distribution_total() {
        assert_abs_diff_eq!(exact_lower_tail(6, 21.0), 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(exact_lower_tail(6, 0.0), 1.0 / 64.0, epsilon = 1e-12);
    }
}
