//! Student's t-tests for one sample, two independent samples and paired samples.

use tracing::debug;

use crate::descriptive::{mean, sample_variance};

use super::{InferenceError, TestOutcome, is_constant, students_t_two_sided};

const ONE_SAMPLE: &str = "one-sample t-test";
const INDEPENDENT: &str = "independent two-sample t-test";
const PAIRED: &str = "paired t-test";

/// Tests whether the mean of `sample` equals `popmean`.
///
/// The statistic is `(mean - popmean) / (s / sqrt(n))` with `n - 1` degrees
/// of freedom.
///
/// # Examples
///
/// ```
/// # use hypotest_stats::inference::ttest;
/// let outcome = ttest::one_sample(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0], 5.0).unwrap();
/// assert_eq!(outcome.statistic, 0.0);
/// assert_eq!(outcome.p_value, 1.0);
/// ```
pub fn one_sample(sample: &[f64], popmean: f64) -> Result<TestOutcome, InferenceError> {
    one_sample_with(ONE_SAMPLE, sample, popmean)
}

#[expect(clippy::cast_precision_loss)]
fn one_sample_with(
    test: &'static str,
    sample: &[f64],
    popmean: f64,
) -> Result<TestOutcome, InferenceError> {
    InferenceError::require_len(test, sample, 2)?;
    if is_constant(sample) {
        return Ok(TestOutcome::degenerate(sample[0] - popmean));
    }

    let n = sample.len() as f64;
    let variance = sample_variance(sample).unwrap_or(0.0);
    let t = (mean(sample) - popmean) / (variance / n).sqrt();
    let p_value = students_t_two_sided(t, n - 1.0)?;
    Ok(TestOutcome::new(t, p_value))
}

/// Tests whether two independent samples share the same mean.
///
/// With `equal_var` the pooled-variance Student test is used; otherwise
/// Welch's test with Welch-Satterthwaite degrees of freedom.
#[expect(clippy::cast_precision_loss)]
pub fn independent(
    first: &[f64],
    second: &[f64],
    equal_var: bool,
) -> Result<TestOutcome, InferenceError> {
    InferenceError::require_len(INDEPENDENT, first, 2)?;
    InferenceError::require_len(INDEPENDENT, second, 2)?;
    if is_constant(first) && is_constant(second) {
        return Ok(TestOutcome::degenerate(first[0] - second[0]));
    }

    let (n1, n2) = (first.len() as f64, second.len() as f64);
    let v1 = sample_variance(first).unwrap_or(0.0);
    let v2 = sample_variance(second).unwrap_or(0.0);
    let (std_err, df) = if equal_var {
        let df = n1 + n2 - 2.0;
        let pooled = ((n1 - 1.0) * v1 + (n2 - 1.0) * v2) / df;
        ((pooled * (1.0 / n1 + 1.0 / n2)).sqrt(), df)
    } else {
        let (a, b) = (v1 / n1, v2 / n2);
        let df = (a + b).powi(2) / (a.powi(2) / (n1 - 1.0) + b.powi(2) / (n2 - 1.0));
        ((a + b).sqrt(), df)
    };
    debug!(equal_var, df, "independent t-test degrees of freedom");

    let t = (mean(first) - mean(second)) / std_err;
    let p_value = students_t_two_sided(t, df)?;
    Ok(TestOutcome::new(t, p_value))
}

/// Tests whether the mean of the pairwise differences `first - second` is zero.
pub fn paired(first: &[f64], second: &[f64]) -> Result<TestOutcome, InferenceError> {
    if first.len() != second.len() {
        return Err(InferenceError::InputShape {
            test: PAIRED,
            left: first.len(),
            right: second.len(),
        });
    }
    let differences = first
        .iter()
        .zip(second)
        .map(|(a, b)| a - b)
        .collect::<Vec<_>>();
    one_sample_with(PAIRED, &differences, 0.0)
}
