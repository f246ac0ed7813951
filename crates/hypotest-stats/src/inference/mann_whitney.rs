use tracing::debug;

use super::{InferenceError, TestOutcome, rank::Ranking, standard_normal_upper};

const MANN_WHITNEY: &str = "Mann-Whitney U test";

/// Samples at or below this size (on either side) use the exact null distribution.
const EXACT_MAX_SIZE: usize = 8;

/// Two-sided Mann-Whitney U test of two independent samples.
///
/// The reported statistic is `U` of the first sample,
/// `R1 - n1 (n1 + 1) / 2`. The p-value comes from the exact distribution of
/// `U` when either sample has at most 8 values and there are no ties;
/// otherwise from the normal approximation with tie and continuity
/// correction.
///
/// # Examples
///
/// ```
/// # use hypotest_stats::inference::mann_whitney::mann_whitney_u;
/// let outcome = mann_whitney_u(&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0]).unwrap();
/// assert_eq!(outcome.statistic, 0.0);
/// assert!((outcome.p_value - 0.1).abs() < 1e-12);
/// ```
#[expect(clippy::cast_precision_loss)]
pub fn mann_whitney_u(first: &[f64], second: &[f64]) -> Result<TestOutcome, InferenceError> {
    InferenceError::require_len(MANN_WHITNEY, first, 1)?;
    InferenceError::require_len(MANN_WHITNEY, second, 1)?;

    let (n1, n2) = (first.len(), second.len());
    let pooled = first.iter().chain(second).copied().collect::<Vec<_>>();
    let ranking = Ranking::new(&pooled);

    let rank_sum = ranking.ranks[..n1].iter().sum::<f64>();
    let u1 = rank_sum - (n1 * (n1 + 1)) as f64 / 2.0;
    let u2 = (n1 * n2) as f64 - u1;
    let u = u1.max(u2);

    let exact = n1.min(n2) <= EXACT_MAX_SIZE && !ranking.has_ties();
    debug!(n1, n2, exact, "Mann-Whitney U method");

    let p_value = if exact {
        2.0 * exact_upper_tail(n1, n2, u)
    } else {
        asymptotic_p_value(n1, n2, u, ranking.tie_term())
    };
    Ok(TestOutcome::new(u1, p_value))
}

#[expect(clippy::cast_precision_loss)]
fn asymptotic_p_value(n1: usize, n2: usize, u: f64, tie_term: f64) -> f64 {
    let (n1, n2) = (n1 as f64, n2 as f64);
    let n = n1 + n2;
    let mu = n1 * n2 / 2.0;
    let sigma = (n1 * n2 / 12.0 * ((n + 1.0) - tie_term / (n * (n - 1.0)))).sqrt();
    if sigma <= 0.0 || sigma.is_nan() {
        // Every pooled value tied: U sits exactly at its mean
        return 1.0;
    }
    let z = (u - mu - 0.5) / sigma;
    2.0 * standard_normal_upper(z)
}

/// `P(U >= u)` under the null hypothesis, from the exact distribution.
#[expect(
    clippy::cast_precision_loss,
    clippy::cast_sign_loss,
    clippy::cast_possible_truncation
)]
fn exact_upper_tail(n1: usize, n2: usize, u: f64) -> f64 {
    let counts = u_frequencies(n1, n2);
    let total = counts.iter().sum::<f64>();
    let start = (u.ceil().max(0.0) as usize).min(counts.len());
    counts[start..].iter().sum::<f64>() / total
}

/// Number of rank arrangements producing each value of `U`, for `U = 0..=n1*n2`.
///
/// These are the coefficients of the Gaussian binomial coefficient
/// `prod_{i=1..m} (1 - q^(n+i)) / (1 - q^i)` with `m = min(n1, n2)` and
/// `n = max(n1, n2)`.
fn u_frequencies(n1: usize, n2: usize) -> Vec<f64> {
    let (m, n) = (n1.min(n2), n1.max(n2));
    let max_u = m * n;
    let mut counts = vec![0.0; max_u + 1];
    counts[0] = 1.0;
    for i in 1..=m {
        let shift = n + i;
        for u in (shift..=max_u).rev() {
            counts[u] -= counts[u - shift];
        }
        for u in i..=max_u {
            counts[u] += counts[u - i];
        }
    }
    counts
}
