//! Hypothesis tests.
//!
//! Every routine returns a [`TestOutcome`] holding the test statistic and a
//! two-sided p-value in `[0, 1]`. Reference distributions come from `statrs`.
//!
//! When a test's dispersion term is zero the usual formula divides by zero.
//! Instead of propagating `NaN`, such outcomes are resolved by the effect
//! term: no effect gives a statistic of `0` with `p = 1`, any effect gives an
//! infinite statistic with `p = 0`.

use serde::Serialize;
use statrs::distribution::{ChiSquared, ContinuousCDF, FisherSnedecor, Normal, StudentsT};

pub mod anova;
pub mod kruskal;
pub mod mann_whitney;
pub mod rank;
pub mod shapiro;
pub mod ttest;
pub mod wilcoxon;

/// Statistic and p-value produced by a hypothesis test.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TestOutcome {
    pub statistic: f64,
    pub p_value: f64,
}

impl TestOutcome {
    /// Creates an outcome, clamping the p-value into `[0, 1]`.
    #[must_use]
    pub fn new(statistic: f64, p_value: f64) -> Self {
        Self {
            statistic,
            p_value: p_value.clamp(0.0, 1.0),
        }
    }

    /// Outcome of a test whose dispersion term is zero.
    ///
    /// `effect` is the numerator of the statistic (a mean difference, a
    /// between-group spread, ...).
    #[must_use]
    pub fn degenerate(effect: f64) -> Self {
        if effect == 0.0 {
            Self::new(0.0, 1.0)
        } else {
            Self::new(f64::INFINITY.copysign(effect), 0.0)
        }
    }
}

#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum InferenceError {
    #[display("{test} needs at least {required} values, got {actual}")]
    InsufficientData {
        test: &'static str,
        required: usize,
        actual: usize,
    },
    #[display("{test} is undefined for constant input")]
    ConstantInput { test: &'static str },
    #[display("{test} needs samples of equal length, got {left} and {right}")]
    InputShape {
        test: &'static str,
        left: usize,
        right: usize,
    },
    #[display("{test} needs at least 2 groups, got {actual}")]
    InsufficientGroups { test: &'static str, actual: usize },
    #[display("invalid {distribution} distribution parameters: {message}")]
    Distribution {
        distribution: &'static str,
        message: String,
    },
}

impl InferenceError {
    pub(crate) fn require_len(
        test: &'static str,
        values: &[f64],
        required: usize,
    ) -> Result<(), Self> {
        if values.len() < required {
            return Err(Self::InsufficientData {
                test,
                required,
                actual: values.len(),
            });
        }
        Ok(())
    }

    pub(crate) fn require_groups(test: &'static str, actual: usize) -> Result<(), Self> {
        if actual < 2 {
            return Err(Self::InsufficientGroups { test, actual });
        }
        Ok(())
    }

    fn distribution<E>(distribution: &'static str, err: &E) -> Self
    where
        E: std::fmt::Display,
    {
        Self::Distribution {
            distribution,
            message: err.to_string(),
        }
    }
}

/// Whether every value equals the first one. Empty slices count as constant.
#[expect(clippy::float_cmp)]
pub(crate) fn is_constant(values: &[f64]) -> bool {
    values.windows(2).all(|w| w[0] == w[1])
}

/// Two-sided p-value of a t statistic with `df` degrees of freedom.
pub(crate) fn students_t_two_sided(t: f64, df: f64) -> Result<f64, InferenceError> {
    if t.is_infinite() {
        return Ok(0.0);
    }
    let dist =
        StudentsT::new(0.0, 1.0, df).map_err(|e| InferenceError::distribution("Student's t", &e))?;
    Ok(2.0 * dist.sf(t.abs()))
}

/// Upper-tail p-value of an F statistic.
pub(crate) fn fisher_snedecor_upper(f: f64, df1: f64, df2: f64) -> Result<f64, InferenceError> {
    if f.is_infinite() {
        return Ok(0.0);
    }
    let dist =
        FisherSnedecor::new(df1, df2).map_err(|e| InferenceError::distribution("F", &e))?;
    Ok(dist.sf(f))
}

/// Upper-tail p-value of a chi-squared statistic.
pub(crate) fn chi_squared_upper(x: f64, df: f64) -> Result<f64, InferenceError> {
    let dist = ChiSquared::new(df).map_err(|e| InferenceError::distribution("chi-squared", &e))?;
    Ok(dist.sf(x))
}

/// Upper-tail probability of the standard normal distribution.
pub(crate) fn standard_normal_upper(z: f64) -> f64 {
    Normal::standard().sf(z)
}

/// Inverse CDF of the standard normal distribution.
pub(crate) fn standard_normal_quantile(p: f64) -> f64 {
    Normal::standard().inverse_cdf(p)
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    #[test]
    fn test_degenerate_outcomes() {
        assert_eq!(TestOutcome::degenerate(0.0), TestOutcome::new(0.0, 1.0));
        let up = TestOutcome::degenerate(2.0);
        assert_eq!(up.statistic, f64::INFINITY);
        assert_eq!(up.p_value, 0.0);
        assert_eq!(TestOutcome::degenerate(-1.0).statistic, f64::NEG_INFINITY);
    }

    #[test]
    fn test_p_value_clamped() {
        assert_eq!(TestOutcome::new(1.0, 1.2).p_value, 1.0);
        assert_eq!(TestOutcome::new(1.0, -1e-18).p_value, 0.0);
    }

    #[test]
    fn test_students_t_closed_form_df2() {
        // For df = 2 the survival function is 1/2 - t / (2 sqrt(2 + t^2))
        let t = 1.5_f64;
        let expected = 2.0 * (0.5 - t / (2.0 * (2.0 + t * t).sqrt()));
        assert_abs_diff_eq!(students_t_two_sided(t, 2.0).unwrap(), expected, epsilon = 1e-9);
        assert_abs_diff_eq!(students_t_two_sided(-t, 2.0).unwrap(), expected, epsilon = 1e-9);
    }

    #[test]
    fn test_chi_squared_closed_form_df2() {
        // For df = 2 the survival function is exp(-x / 2)
        assert_abs_diff_eq!(chi_squared_upper(3.0, 2.0).unwrap(), (-1.5_f64).exp(), epsilon = 1e-9);
    }

    #[test]
    fn test_invalid_distribution_parameters() {
        let err = students_t_two_sided(1.0, 0.0).unwrap_err();
        assert!(matches!(err, InferenceError::Distribution { .. }));
    }

    #[test]
    fn test_is_constant() {
        assert!(is_constant(&[]));
        assert!(is_constant(&[3.0, 3.0]));
        assert!(!is_constant(&[3.0, 3.5]));
    }
}
