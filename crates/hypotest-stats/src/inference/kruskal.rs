use super::{InferenceError, TestOutcome, chi_squared_upper, rank::Ranking};

const KRUSKAL: &str = "Kruskal-Wallis test";

/// Kruskal-Wallis H test: do all groups come from the same distribution?
///
/// Ranks are taken over the pooled sample, ties receive average ranks and
/// `H` is divided by the tie correction `1 - sum(t^3 - t) / (N^3 - N)`. The
/// p-value uses the chi-squared distribution with `k - 1` degrees of freedom.
///
/// Fails with [`InferenceError::ConstantInput`] when every value is identical.
#[expect(clippy::cast_precision_loss)]
pub fn kruskal_wallis<G>(groups: &[G]) -> Result<TestOutcome, InferenceError>
where
    G: AsRef<[f64]>,
{
    InferenceError::require_groups(KRUSKAL, groups.len())?;
    for group in groups {
        InferenceError::require_len(KRUSKAL, group.as_ref(), 1)?;
    }

    let pooled = groups
        .iter()
        .flat_map(|g| g.as_ref().iter().copied())
        .collect::<Vec<_>>();
    let ranking = Ranking::new(&pooled);
    let n = pooled.len() as f64;

    let correction = 1.0 - ranking.tie_term() / (n.powi(3) - n);
    if correction <= 0.0 {
        return Err(InferenceError::ConstantInput { test: KRUSKAL });
    }

    let mut offset = 0;
    let mut weighted = 0.0;
    for group in groups {
        let len = group.as_ref().len();
        let rank_sum = ranking.ranks[offset..offset + len].iter().sum::<f64>();
        weighted += rank_sum.powi(2) / len as f64;
        offset += len;
    }

    let h = (12.0 / (n * (n + 1.0)) * weighted - 3.0 * (n + 1.0)) / correction;
    let p_value = chi_squared_upper(h, (groups.len() - 1) as f64)?;
    Ok(TestOutcome::new(h, p_value))
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    #[test]
    fn test_two_separated_groups() {
        let outcome = kruskal_wallis(&[[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]]).unwrap();
        assert_abs_diff_eq!(outcome.statistic, 27.0 / 7.0, epsilon = 1e-9);
        assert_abs_diff_eq!(outcome.p_value, 0.049_534_613_435_626_7, epsilon = 1e-8);
    }

    #[test]
    fn test_tied_groups() {
        let groups: [&[f64]; 3] = [&[1.0, 2.0, 2.0, 3.0], &[3.0, 4.0, 5.0], &[5.0, 6.0, 7.0, 7.0]];
        let outcome = kruskal_wallis(&groups).unwrap();
        assert_abs_diff_eq!(outcome.statistic, 8.4375, epsilon = 1e-9);
        assert_abs_diff_eq!(outcome.p_value, (-8.4375_f64 / 2.0).exp(), epsilon = 1e-9);
    }

    #[test]
    fn test_fewer_than_two_groups() {
        let err = kruskal_wallis(&[[1.0, 2.0]]).unwrap_err();
        assert_eq!(
            err,
            InferenceError::InsufficientGroups {
                test: KRUSKAL,
                actual: 1
            }
        );
    }

    #[test]
    fn test_all_identical() {
        let err = kruskal_wallis(&[[4.0, 4.0], [4.0, 4.0]]).unwrap_err();
        assert_eq!(err, InferenceError::ConstantInput { test: KRUSKAL });
    }
}
