//! Test selection: which test to run and on which columns.

use std::str::FromStr;

use serde::Serialize;

use crate::{error::AnalysisError, gate::TestCategory};

/// The hypothesis tests the dispatcher can run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum TestName {
    OneSampleT,
    IndependentT,
    PairedT,
    Anova,
    #[serde(rename = "mann-whitney")]
    MannWhitneyU,
    Wilcoxon,
    KruskalWallis,
}

impl TestName {
    pub const ALL: [Self; 7] = [
        Self::OneSampleT,
        Self::IndependentT,
        Self::PairedT,
        Self::Anova,
        Self::MannWhitneyU,
        Self::Wilcoxon,
        Self::KruskalWallis,
    ];

    /// The category in which this test is offered.
    #[must_use]
    pub fn category(self) -> TestCategory {
        match self {
            Self::OneSampleT | Self::IndependentT | Self::PairedT | Self::Anova => {
                TestCategory::Parametric
            }
            Self::MannWhitneyU | Self::Wilcoxon | Self::KruskalWallis => {
                TestCategory::NonParametric
            }
        }
    }

    /// Short command-line identifier.
    #[must_use]
    pub fn id(self) -> &'static str {
        match self {
            Self::OneSampleT => "one-sample-t",
            Self::IndependentT => "independent-t",
            Self::PairedT => "paired-t",
            Self::Anova => "anova",
            Self::MannWhitneyU => "mann-whitney",
            Self::Wilcoxon => "wilcoxon",
            Self::KruskalWallis => "kruskal-wallis",
        }
    }

    /// Human-readable label.
    ///
    /// The one place user-facing names live: `Display` prints it and
    /// `FromStr` accepts it.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::OneSampleT => "One-sample t-test",
            Self::IndependentT => "Independent two-sample t-test",
            Self::PairedT => "Paired t-test",
            Self::Anova => "ANOVA",
            Self::MannWhitneyU => "Mann-Whitney U Test",
            Self::Wilcoxon => "Wilcoxon Test",
            Self::KruskalWallis => "Kruskal-Wallis Test",
        }
    }

    /// Tests offered for `category`, in display order.
    pub fn offered_in(category: TestCategory) -> impl Iterator<Item = Self> {
        Self::ALL
            .into_iter()
            .filter(move |name| name.category() == category)
    }
}

// Written by hand so `label()` stays usable as a `&'static str`.
impl std::fmt::Display for TestName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("unknown test '{name}'")]
pub struct UnknownTestName {
    pub name: String,
}

impl FromStr for TestName {
    type Err = UnknownTestName;

    /// Accepts either the identifier or the label, ignoring case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|name| name.id().eq_ignore_ascii_case(s) || name.label().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownTestName { name: s.to_owned() })
    }
}

/// A fully specified test request.
///
/// Each variant carries exactly the columns and parameters its test reads.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "test", rename_all = "kebab-case")]
pub enum TestRequest {
    OneSampleT {
        column: String,
        popmean: f64,
    },
    IndependentT {
        first: String,
        second: String,
        equal_var: bool,
    },
    PairedT {
        first: String,
        second: String,
    },
    Anova {
        groups: Vec<String>,
    },
    #[serde(rename = "mann-whitney")]
    MannWhitneyU {
        first: String,
        second: String,
    },
    Wilcoxon {
        column: String,
        popmean: f64,
    },
    KruskalWallis {
        groups: Vec<String>,
    },
}

/// User choices from which a [`TestRequest`] is assembled.
#[derive(Debug, Clone, Default)]
pub struct Selection<'a> {
    pub primary: &'a str,
    pub second: Option<&'a str>,
    pub groups: &'a [String],
    pub comparison_value: Option<f64>,
    pub equal_var: bool,
}

impl TestRequest {
    #[must_use]
    pub fn name(&self) -> TestName {
        match self {
            Self::OneSampleT { .. } => TestName::OneSampleT,
            Self::IndependentT { .. } => TestName::IndependentT,
            Self::PairedT { .. } => TestName::PairedT,
            Self::Anova { .. } => TestName::Anova,
            Self::MannWhitneyU { .. } => TestName::MannWhitneyU,
            Self::Wilcoxon { .. } => TestName::Wilcoxon,
            Self::KruskalWallis { .. } => TestName::KruskalWallis,
        }
    }

    /// Whether `column` is one of the columns this request reads.
    #[must_use]
    pub fn uses_column(&self, column: &str) -> bool {
        match self {
            Self::OneSampleT { column: c, .. } | Self::Wilcoxon { column: c, .. } => c == column,
            Self::IndependentT { first, second, .. }
            | Self::PairedT { first, second }
            | Self::MannWhitneyU { first, second } => first == column || second == column,
            Self::Anova { groups } | Self::KruskalWallis { groups } => {
                groups.iter().any(|g| g == column)
            }
        }
    }

    /// Builds the request for `name` from the user's selection.
    ///
    /// One-sample tests use the primary column, two-sample tests pair it
    /// with `second`, and group tests read `groups` (which should list the
    /// primary column too). Fails with
    /// [`AnalysisError::MissingSelection`] when a required piece is absent.
    ///
    /// # Examples
    ///
    /// ```
    /// use hypotest_core::request::{Selection, TestName, TestRequest};
    ///
    /// let selection = Selection {
    ///     primary: "score",
    ///     comparison_value: Some(5.0),
    ///     ..Selection::default()
    /// };
    /// let request = TestRequest::from_selection(TestName::OneSampleT, &selection).unwrap();
    /// assert_eq!(
    ///     request,
    ///     TestRequest::OneSampleT { column: "score".into(), popmean: 5.0 }
    /// );
    /// ```
    pub fn from_selection(name: TestName, selection: &Selection<'_>) -> Result<Self, AnalysisError> {
        let missing = |what| AnalysisError::MissingSelection { test: name, what };
        let column = || selection.primary.to_owned();
        let popmean = || selection.comparison_value.ok_or_else(|| missing("a comparison value"));
        let pair = || {
            selection
                .second
                .map(|second| (selection.primary.to_owned(), second.to_owned()))
                .ok_or_else(|| missing("a second column"))
        };
        let groups = || {
            if selection.groups.is_empty() {
                Err(missing("group columns"))
            } else {
                Ok(selection.groups.to_vec())
            }
        };

        let request = match name {
            TestName::OneSampleT => Self::OneSampleT {
                column: column(),
                popmean: popmean()?,
            },
            TestName::IndependentT => {
                let (first, second) = pair()?;
                Self::IndependentT {
                    first,
                    second,
                    equal_var: selection.equal_var,
                }
            }
            TestName::PairedT => {
                let (first, second) = pair()?;
                Self::PairedT { first, second }
            }
            TestName::Anova => Self::Anova { groups: groups()? },
            TestName::MannWhitneyU => {
                let (first, second) = pair()?;
                Self::MannWhitneyU { first, second }
            }
            TestName::Wilcoxon => Self::Wilcoxon {
                column: column(),
                popmean: popmean()?,
            },
            TestName::KruskalWallis => Self::KruskalWallis { groups: groups()? },
        };
        Ok(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ids_and_labels() {
        for name in TestName::ALL {
            assert_eq!(name.id().parse::<TestName>().unwrap(), name);
            assert_eq!(name.label().parse::<TestName>().unwrap(), name);
        }
        assert_eq!(
            "mann-whitney u test".parse::<TestName>().unwrap(),
            TestName::MannWhitneyU
        );
        assert_eq!("  ANOVA ".parse::<TestName>().unwrap(), TestName::Anova);
    }

    #[test]
    fn test_display_is_label() {
        for name in TestName::ALL {
            assert_eq!(name.to_string(), name.label());
        }
    }

    #[test]
    fn test_parse_unknown() {
        let err = "chi-square".parse::<TestName>().unwrap_err();
        assert_eq!(err.to_string(), "unknown test 'chi-square'");
    }

    #[test]
    fn test_offered_in_partitions_tests() {
        let parametric = TestName::offered_in(TestCategory::Parametric).collect::<Vec<_>>();
        let non_parametric = TestName::offered_in(TestCategory::NonParametric).collect::<Vec<_>>();
        assert_eq!(
            parametric,
            [
                TestName::OneSampleT,
                TestName::IndependentT,
                TestName::PairedT,
                TestName::Anova
            ]
        );
        assert_eq!(
            non_parametric,
            [
                TestName::MannWhitneyU,
                TestName::Wilcoxon,
                TestName::KruskalWallis
            ]
        );
    }

    #[test]
    fn test_from_selection_two_sample() {
        let selection = Selection {
            primary: "before",
            second: Some("after"),
            equal_var: false,
            ..Selection::default()
        };
        let request = TestRequest::from_selection(TestName::IndependentT, &selection).unwrap();
        assert_eq!(
            request,
            TestRequest::IndependentT {
                first: "before".into(),
                second: "after".into(),
                equal_var: false,
            }
        );
        assert_eq!(request.name(), TestName::IndependentT);
    }

    #[test]
    fn test_from_selection_groups() {
        let groups = vec!["a".to_owned(), "b".to_owned(), "c".to_owned()];
        let selection = Selection {
            primary: "a",
            groups: &groups,
            ..Selection::default()
        };
        let request = TestRequest::from_selection(TestName::KruskalWallis, &selection).unwrap();
        assert_eq!(request, TestRequest::KruskalWallis { groups });
    }

    #[test]
    fn test_from_selection_missing_inputs() {
        let selection = Selection {
            primary: "x",
            ..Selection::default()
        };
        for (name, what) in [
            (TestName::OneSampleT, "a comparison value"),
            (TestName::Wilcoxon, "a comparison value"),
            (TestName::PairedT, "a second column"),
            (TestName::MannWhitneyU, "a second column"),
            (TestName::Anova, "group columns"),
        ] {
            let err = TestRequest::from_selection(name, &selection).unwrap_err();
            assert!(
                matches!(err, AnalysisError::MissingSelection { test, what: w } if test == name && w == what)
            );
        }
    }

    #[test]
    fn test_serialize_request() {
        let request = TestRequest::Wilcoxon {
            column: "x".into(),
            popmean: 1.5,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "test": "wilcoxon", "column": "x", "popmean": 1.5 })
        );
    }
}
