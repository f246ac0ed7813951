//! Test dispatcher: runs a [`TestRequest`] and wraps the outcome.

use hypotest_stats::inference::{
    TestOutcome, anova, kruskal, mann_whitney, ttest, wilcoxon,
};
use serde::Serialize;
use tracing::{debug, info};

use crate::{
    dataset::Dataset,
    error::AnalysisError,
    gate::{SIGNIFICANCE_LEVEL, TestCategory},
    request::{TestName, TestRequest},
};

/// Plain-language reading of a p-value at the fixed significance level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::IsVariant)]
pub enum Verdict {
    #[display("null hypothesis rejected")]
    Rejected,
    #[display("null hypothesis not rejected")]
    NotRejected,
}

/// Statistic, p-value and verdict of one executed test.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TestResult {
    test: TestName,
    statistic: f64,
    p_value: f64,
    reject_null: bool,
}

impl TestResult {
    #[must_use]
    pub fn new(test: TestName, outcome: TestOutcome) -> Self {
        Self {
            test,
            statistic: outcome.statistic,
            p_value: outcome.p_value,
            reject_null: outcome.p_value < SIGNIFICANCE_LEVEL,
        }
    }

    #[must_use]
    pub fn test(&self) -> TestName {
        self.test
    }

    #[must_use]
    pub fn statistic(&self) -> f64 {
        self.statistic
    }

    #[must_use]
    pub fn p_value(&self) -> f64 {
        self.p_value
    }

    #[must_use]
    pub fn reject_null(&self) -> bool {
        self.reject_null
    }

    #[must_use]
    pub fn verdict(&self) -> Verdict {
        if self.reject_null {
            Verdict::Rejected
        } else {
            Verdict::NotRejected
        }
    }
}

/// Runs `request` against `dataset`.
///
/// The requested test must be offered for `category`; otherwise the request
/// fails with [`AnalysisError::TestNotOffered`] before any column is read.
///
/// The paired t-test only uses rows where both columns are observed; the
/// other tests use every observed value of each column.
///
/// # Examples
///
/// ```
/// use hypotest_core::{
///     dataset::Dataset, dispatch::dispatch, gate::TestCategory, request::TestRequest,
/// };
///
/// let dataset = Dataset::from_csv_reader("x\n2\n4\n4\n4\n5\n5\n7\n9\n".as_bytes(), b',', true).unwrap();
/// let request = TestRequest::OneSampleT { column: "x".into(), popmean: 5.0 };
/// let result = dispatch(&dataset, TestCategory::Parametric, &request).unwrap();
/// assert_eq!(result.p_value(), 1.0);
/// assert!(!result.reject_null());
/// ```
pub fn dispatch(
    dataset: &Dataset,
    category: TestCategory,
    request: &TestRequest,
) -> Result<TestResult, AnalysisError> {
    let test = request.name();
    if test.category() != category {
        return Err(AnalysisError::TestNotOffered { test, category });
    }

    let values = |name: &str| dataset.column(name).map(|c| c.values());
    let groups = |names: &[String]| {
        dataset
            .columns_by_name(names)
            .map(|columns| columns.into_iter().map(|c| c.values()).collect::<Vec<_>>())
    };

    let outcome = match request {
        TestRequest::OneSampleT { column, popmean } => ttest::one_sample(values(column)?, *popmean)?,
        TestRequest::IndependentT {
            first,
            second,
            equal_var,
        } => ttest::independent(values(first)?, values(second)?, *equal_var)?,
        TestRequest::PairedT { first, second } => {
            let first = dataset.column(first)?;
            let second = dataset.column(second)?;
            let (before, after) = first.paired_with(second);
            debug!(
                first = first.name(),
                second = second.name(),
                pairs = before.len(),
                dropped = first.len().max(second.len()) - before.len(),
                "paired complete rows"
            );
            ttest::paired(&before, &after)?
        }
        TestRequest::Anova { groups: names } => anova::one_way(&groups(names)?)?,
        TestRequest::MannWhitneyU { first, second } => {
            mann_whitney::mann_whitney_u(values(first)?, values(second)?)?
        }
        TestRequest::Wilcoxon { column, popmean } => {
            wilcoxon::signed_rank(values(column)?, *popmean)?
        }
        TestRequest::KruskalWallis { groups: names } => kruskal::kruskal_wallis(&groups(names)?)?,
    };

    let result = TestResult::new(test, outcome);
    info!(
        %test,
        statistic = result.statistic,
        p_value = result.p_value,
        reject_null = result.reject_null,
        "test complete"
    );
    Ok(result)
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use hypotest_stats::inference::InferenceError;

    use super::*;

    fn dataset() -> Dataset {
        let input = "\
a,b,c,constant,short
1,4,2,3,1
2,5,4,3,
3,6,6,3,
,7,,3,
";
        Dataset::from_csv_reader(input.as_bytes(), b',', true).unwrap()
    }

    fn run(category: TestCategory, request: &TestRequest) -> Result<TestResult, AnalysisError> {
        dispatch(&dataset(), category, request)
    }

    #[test]
    fn test_one_sample_t() {
        let request = TestRequest::OneSampleT {
            column: "a".into(),
            popmean: 0.0,
        };
        let result = run(TestCategory::Parametric, &request).unwrap();
        assert_eq!(result.test(), TestName::OneSampleT);
        assert_abs_diff_eq!(result.statistic(), 3.464_101_615_137_754, epsilon = 1e-12);
        assert_abs_diff_eq!(result.p_value(), 0.074_179_900_227_448_5, epsilon = 1e-9);
        assert!(!result.reject_null());
        assert_eq!(result.verdict(), Verdict::NotRejected);
    }

    #[test]
    fn test_constant_column_against_its_value() {
        let request = TestRequest::OneSampleT {
            column: "constant".into(),
            popmean: 3.0,
        };
        let result = run(TestCategory::Parametric, &request).unwrap();
        assert_eq!(result.statistic(), 0.0);
        assert_eq!(result.p_value(), 1.0);
        assert!(!result.reject_null());
    }

    #[test]
    fn test_independent_t_uses_columns_of_different_length() {
        let request = TestRequest::IndependentT {
            first: "a".into(),
            second: "c".into(),
            equal_var: true,
        };
        let result = run(TestCategory::Parametric, &request).unwrap();
        // [1, 2, 3] vs [2, 4, 6]
        assert!(result.statistic() < 0.0);
        assert!((0.0..=1.0).contains(&result.p_value()));
    }

    #[test]
    fn test_paired_t_uses_complete_rows() {
        let request = TestRequest::PairedT {
            first: "a".into(),
            second: "b".into(),
        };
        // rows 1..=3: [1, 2, 3] vs [4, 5, 6], every difference is -3
        let result = run(TestCategory::Parametric, &request).unwrap();
        assert_eq!(result.statistic(), f64::NEG_INFINITY);
        assert_eq!(result.p_value(), 0.0);
        assert!(result.reject_null());
    }

    #[test]
    fn test_paired_t_keeps_rows_aligned_across_missing_cells() {
        let input = "a,b\n1,1.5\n100,\n3,3.5\n,104\n5,5.5\n";
        let dataset = Dataset::from_csv_reader(input.as_bytes(), b',', true).unwrap();
        let request = TestRequest::PairedT {
            first: "a".into(),
            second: "b".into(),
        };
        let result = dispatch(&dataset, TestCategory::Parametric, &request).unwrap();
        assert_eq!(result.statistic(), f64::NEG_INFINITY);
        assert_eq!(result.p_value(), 0.0);
        assert!(result.reject_null());
    }

    #[test]
    fn test_paired_t_without_common_rows() {
        let input = "a,b\n1,\n2,\n,3\n,4\n";
        let dataset = Dataset::from_csv_reader(input.as_bytes(), b',', true).unwrap();
        let request = TestRequest::PairedT {
            first: "a".into(),
            second: "b".into(),
        };
        let err = dispatch(&dataset, TestCategory::Parametric, &request).unwrap_err();
        assert!(matches!(
            err,
            AnalysisError::Inference(InferenceError::InsufficientData { actual: 0, .. })
        ));
    }

    #[test]
    fn test_nan_spellings_do_not_reach_the_tests() {
        // `NAN` is a missing cell; `inf` is rejected before any test runs.
        let dataset = Dataset::from_manual_text("1 5\n2 6\nNAN 7\n4 9\n3 8").unwrap();
        let request = TestRequest::OneSampleT {
            column: "Column_1".into(),
            popmean: 0.0,
        };
        let result = dispatch(&dataset, TestCategory::Parametric, &request).unwrap();
        // [1, 2, 4, 3]
        assert_abs_diff_eq!(result.statistic(), 3.872_983_346_207_417, epsilon = 1e-12);
        assert!(result.p_value().is_finite());

        let request = TestRequest::PairedT {
            first: "Column_1".into(),
            second: "Column_2".into(),
        };
        // rows 1, 2, 4, 5: differences [-4, -4, -5, -5]
        let result = dispatch(&dataset, TestCategory::Parametric, &request).unwrap();
        assert_abs_diff_eq!(result.statistic(), -15.588_457_268_119_896, epsilon = 1e-9);

        assert!(Dataset::from_manual_text("1 5\n2 6\ninf 7\n4 9").is_err());
    }

    #[test]
    fn test_anova_rejects_single_group() {
        let request = TestRequest::Anova {
            groups: vec!["a".into()],
        };
        let err = run(TestCategory::Parametric, &request).unwrap_err();
        assert!(matches!(
            err,
            AnalysisError::Inference(InferenceError::InsufficientGroups { actual: 1, .. })
        ));
    }

    #[test]
    fn test_kruskal_wallis_rejects_single_group() {
        let request = TestRequest::KruskalWallis {
            groups: vec!["b".into()],
        };
        let err = run(TestCategory::NonParametric, &request).unwrap_err();
        assert!(matches!(
            err,
            AnalysisError::Inference(InferenceError::InsufficientGroups { actual: 1, .. })
        ));
    }

    #[test]
    fn test_kruskal_wallis_two_groups() {
        let request = TestRequest::KruskalWallis {
            groups: vec!["a".into(), "b".into()],
        };
        // [1, 2, 3] vs [4, 5, 6, 7]: H = 4.5
        let result = run(TestCategory::NonParametric, &request).unwrap();
        assert_abs_diff_eq!(result.statistic(), 4.5, epsilon = 1e-12);
        assert!(result.reject_null());
        assert_eq!(result.verdict().to_string(), "null hypothesis rejected");
    }

    #[test]
    fn test_mann_whitney_and_wilcoxon() {
        let request = TestRequest::MannWhitneyU {
            first: "a".into(),
            second: "b".into(),
        };
        let result = run(TestCategory::NonParametric, &request).unwrap();
        assert_eq!(result.statistic(), 0.0);

        let request = TestRequest::Wilcoxon {
            column: "short".into(),
            popmean: 1.0,
        };
        let err = run(TestCategory::NonParametric, &request).unwrap_err();
        assert!(matches!(
            err,
            AnalysisError::Inference(InferenceError::ConstantInput { .. })
        ));
    }

    #[test]
    fn test_test_must_match_category() {
        let request = TestRequest::Wilcoxon {
            column: "a".into(),
            popmean: 0.0,
        };
        let err = run(TestCategory::Parametric, &request).unwrap_err();
        assert!(matches!(
            err,
            AnalysisError::TestNotOffered {
                test: TestName::Wilcoxon,
                category: TestCategory::Parametric,
            }
        ));
    }

    #[test]
    fn test_unknown_column() {
        let request = TestRequest::MannWhitneyU {
            first: "a".into(),
            second: "z".into(),
        };
        let err = run(TestCategory::NonParametric, &request).unwrap_err();
        assert!(matches!(err, AnalysisError::UnknownColumn { name } if name == "z"));
    }

    #[test]
    fn test_reject_null_boundary() {
        let at_level = TestResult::new(TestName::Anova, TestOutcome::new(1.0, 0.05));
        assert!(!at_level.reject_null());
        let below = TestResult::new(TestName::Anova, TestOutcome::new(1.0, 0.049_999));
        assert!(below.reject_null());
        assert!(below.verdict().is_rejected());
    }

    #[test]
    fn test_repeated_request_is_deterministic() {
        let dataset = dataset();
        let request = TestRequest::Anova {
            groups: vec!["a".into(), "b".into(), "c".into()],
        };
        let first = dispatch(&dataset, TestCategory::Parametric, &request).unwrap();
        let second = dispatch(&dataset, TestCategory::Parametric, &request).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_serialize_result() {
        let result = TestResult::new(TestName::PairedT, TestOutcome::new(-2.5, 0.01));
        let json = serde_json::to_value(result).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "test": "paired-t",
                "statistic": -2.5,
                "p_value": 0.01,
                "reject_null": true,
            })
        );
    }
}
