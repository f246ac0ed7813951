//! One-way analysis of variance and Levene's test for equal variances.

use crate::descriptive::{mean, median, sum_of_squares};

use super::{InferenceError, TestOutcome, fisher_snedecor_upper, is_constant};

const ANOVA: &str = "one-way ANOVA";
const LEVENE: &str = "Levene test";

/// Tests whether all groups share the same mean.
///
/// The statistic is `F = (SSB / (k - 1)) / (SSW / (N - k))`.
///
/// # Examples
///
/// ```
/// # use hypotest_stats::inference::anova;
/// let outcome = anova::one_way(&[&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0], &[2.0, 4.0, 9.0]]).unwrap();
/// assert!((outcome.statistic - 1.8).abs() < 1e-12);
/// assert!((outcome.p_value - 0.244_140_625).abs() < 1e-9);
/// ```
pub fn one_way<G>(groups: &[G]) -> Result<TestOutcome, InferenceError>
where
    G: AsRef<[f64]>,
{
    f_oneway(ANOVA, groups)
}

/// Tests whether all groups share the same variance.
///
/// Uses absolute deviations from each group's median (the Brown-Forsythe
/// variant), then runs a one-way ANOVA on those deviations.
pub fn levene<G>(groups: &[G]) -> Result<TestOutcome, InferenceError>
where
    G: AsRef<[f64]>,
{
    InferenceError::require_groups(LEVENE, groups.len())?;
    let deviations = groups
        .iter()
        .map(|group| {
            let group = group.as_ref();
            let center = median(group).ok_or(InferenceError::InsufficientData {
                test: LEVENE,
                required: 1,
                actual: 0,
            })?;
            Ok(group.iter().map(|v| (v - center).abs()).collect::<Vec<_>>())
        })
        .collect::<Result<Vec<_>, InferenceError>>()?;
    f_oneway(LEVENE, &deviations)
}

#[expect(clippy::cast_precision_loss)]
fn f_oneway<G>(test: &'static str, groups: &[G]) -> Result<TestOutcome, InferenceError>
where
    G: AsRef<[f64]>,
{
    InferenceError::require_groups(test, groups.len())?;
    for group in groups {
        InferenceError::require_len(test, group.as_ref(), 1)?;
    }
    let k = groups.len();
    let total = groups.iter().map(|g| g.as_ref().len()).sum::<usize>();
    if total <= k {
        return Err(InferenceError::InsufficientData {
            test,
            required: k + 1,
            actual: total,
        });
    }

    if groups.iter().all(|g| is_constant(g.as_ref())) {
        let first = groups[0].as_ref()[0];
        let spread = groups
            .iter()
            .map(|g| (g.as_ref()[0] - first).abs())
            .fold(0.0, f64::max);
        return Ok(TestOutcome::degenerate(spread));
    }

    let grand_mean = groups
        .iter()
        .flat_map(|g| g.as_ref().iter())
        .sum::<f64>()
        / total as f64;
    let between = groups
        .iter()
        .map(|g| {
            let g = g.as_ref();
            g.len() as f64 * (mean(g) - grand_mean).powi(2)
        })
        .sum::<f64>();
    let within = groups
        .iter()
        .map(|g| sum_of_squares(g.as_ref()))
        .sum::<f64>();

    let df_between = (k - 1) as f64;
    let df_within = (total - k) as f64;
    let f = (between / df_between) / (within / df_within);
    let p_value = fisher_snedecor_upper(f, df_between, df_within)?;
    Ok(TestOutcome::new(f, p_value))
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;
    use crate::inference::ttest;

    #[test]
    fn test_two_groups_match_pooled_t_test() {
        let a = [1.0, 2.0, 3.0];
        let b = [4.0, 5.0, 6.0];
        let anova = one_way(&[a, b]).unwrap();
        let t = ttest::independent(&a, &b, true).unwrap();
        assert_abs_diff_eq!(anova.statistic, 13.5, epsilon = 1e-9);
        assert_abs_diff_eq!(anova.statistic, t.statistic.powi(2), epsilon = 1e-9);
        assert_abs_diff_eq!(anova.p_value, t.p_value, epsilon = 1e-9);
    }

    #[test]
    fn test_single_group_rejected() {
        let err = one_way(&[[1.0, 2.0, 3.0]]).unwrap_err();
        assert_eq!(
            err,
            InferenceError::InsufficientGroups {
                test: ANOVA,
                actual: 1
            }
        );
        let none: [&[f64]; 0] = [];
        assert!(matches!(
            one_way(&none).unwrap_err(),
            InferenceError::InsufficientGroups { actual: 0, .. }
        ));
    }

    #[test]
    fn test_empty_group_rejected() {
        let groups: [&[f64]; 2] = [&[1.0, 2.0], &[]];
        assert!(matches!(
            one_way(&groups).unwrap_err(),
            InferenceError::InsufficientData { .. }
        ));
    }

    #[test]
    fn test_constant_groups() {
        assert_eq!(
            one_way(&[[2.0, 2.0], [2.0, 2.0]]).unwrap(),
            TestOutcome::new(0.0, 1.0)
        );
        let apart = one_way(&[[2.0, 2.0], [3.0, 3.0]]).unwrap();
        assert_eq!(apart.statistic, f64::INFINITY);
        assert_eq!(apart.p_value, 0.0);
    }

    #[test]
    fn test_levene() {
        let outcome = levene(&[
            vec![1.0, 2.0, 3.0, 4.0, 5.0],
            vec![2.0, 4.0, 6.0, 8.0, 10.0],
        ])
        .unwrap();
        assert_abs_diff_eq!(outcome.statistic, 2.057_142_857_142_857, epsilon = 1e-9);
        assert_abs_diff_eq!(outcome.p_value, 0.189_403_661_093_321, epsilon = 1e-8);
    }

    #[test]
    fn test_levene_sample_against_itself() {
        let sample = [1.0, 3.0, 4.0, 8.0, 9.0];
        let outcome = levene(&[sample, sample]).unwrap();
        assert_abs_diff_eq!(outcome.statistic, 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(outcome.p_value, 1.0, epsilon = 1e-9);
    }
}
