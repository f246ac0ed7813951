//! Diagnostic gate: chooses between parametric and non-parametric tests.
//!
//! The gate runs a Shapiro-Wilk normality test on the primary column and a
//! median-centered Levene test comparing it with independent comparison
//! columns. Parametric tests are offered only if neither check rejects its
//! null hypothesis at [`SIGNIFICANCE_LEVEL`].

use hypotest_stats::inference::{TestOutcome, anova, shapiro};
use serde::Serialize;
use tracing::{info, warn};

use crate::{dataset::Dataset, error::AnalysisError};

/// Fixed significance level shared by the gate and the verdict.
pub const SIGNIFICANCE_LEVEL: f64 = 0.05;

/// Which family of tests the data qualifies for.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display, derive_more::IsVariant, Serialize,
)]
pub enum TestCategory {
    #[display("Parametric")]
    Parametric,
    #[display("Non-parametric")]
    NonParametric,
}

/// Results of the diagnostic checks.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Diagnosis {
    pub normality: TestOutcome,
    /// `None` when no comparison column was supplied.
    pub variance: Option<TestOutcome>,
    pub category: TestCategory,
}

impl Diagnosis {
    #[must_use]
    pub fn is_normal(&self) -> bool {
        self.normality.p_value > SIGNIFICANCE_LEVEL
    }

    /// Whether the variance check passed or was not assessed.
    #[must_use]
    pub fn has_equal_variance(&self) -> bool {
        self.variance
            .is_none_or(|outcome| outcome.p_value > SIGNIFICANCE_LEVEL)
    }
}

/// Runs the diagnostic checks on raw values.
///
/// `against` holds the independent columns the primary column's spread is
/// compared with. With none, the variance check is skipped.
///
/// # Examples
///
/// ```
/// use hypotest_core::gate::{TestCategory, diagnose};
///
/// let primary = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
/// let other = [3.0, 5.0, 5.0, 6.0, 6.0, 7.0, 8.0, 10.0];
/// let diagnosis = diagnose(&primary, &[&other]).unwrap();
/// assert_eq!(diagnosis.category, TestCategory::Parametric);
/// ```
pub fn diagnose(primary: &[f64], against: &[&[f64]]) -> Result<Diagnosis, AnalysisError> {
    let normality = shapiro::shapiro_wilk(primary)?;

    let variance = if against.is_empty() {
        warn!("no comparison column supplied; variance homogeneity not assessed");
        None
    } else {
        let groups = std::iter::once(primary)
            .chain(against.iter().copied())
            .collect::<Vec<_>>();
        Some(anova::levene(&groups)?)
    };

    let category = if normality.p_value > SIGNIFICANCE_LEVEL
        && variance.is_none_or(|outcome| outcome.p_value > SIGNIFICANCE_LEVEL)
    {
        TestCategory::Parametric
    } else {
        TestCategory::NonParametric
    };
    info!(
        p_normal = normality.p_value,
        p_var = variance.map(|outcome| outcome.p_value),
        %category,
        "diagnosis complete"
    );

    Ok(Diagnosis {
        normality,
        variance,
        category,
    })
}

/// Runs the diagnostic checks on named dataset columns.
pub fn diagnose_columns<S>(
    dataset: &Dataset,
    primary: &str,
    against: &[S],
) -> Result<Diagnosis, AnalysisError>
where
    S: AsRef<str>,
{
    let primary = dataset.column(primary)?;
    let against = dataset.columns_by_name(against)?;
    let against = against.iter().map(|c| c.values()).collect::<Vec<_>>();
    diagnose(primary.values(), &against)
}
