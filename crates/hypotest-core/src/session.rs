use crate::{
    dataset::Dataset,
    dispatch::{TestResult, dispatch},
    error::AnalysisError,
    gate::{Diagnosis, diagnose_columns},
    request::{Selection, TestName, TestRequest},
};

#[derive(Debug, Clone, Copy, PartialEq, derive_more::IsVariant)]
pub enum AnalysisState {
    AwaitingInput,
    Computed(TestResult),
}

/// One analysis of a dataset: the diagnosis of a primary column and the
/// most recent test result.
///
/// # Examples
///
/// ```
/// use hypotest_core::{
///     dataset::Dataset,
///     request::{Selection, TestName},
///     session::AnalysisSession,
/// };
///
/// let dataset = Dataset::from_manual_text("2\n4\n4\n4\n5\n5\n7\n9").unwrap();
/// let mut session = AnalysisSession::new(dataset, "Column_1", &[] as &[&str]).unwrap();
/// assert!(session.state().is_awaiting_input());
///
/// let selection = Selection {
///     primary: "Column_1",
///     comparison_value: Some(5.0),
///     ..Selection::default()
/// };
/// let result = session.submit_selection(TestName::OneSampleT, &selection).unwrap();
/// assert!(!result.reject_null());
/// assert!(session.state().is_computed());
/// ```
#[derive(Debug, Clone)]
pub struct AnalysisSession {
    dataset: Dataset,
    primary: String,
    diagnosis: Diagnosis,
    state: AnalysisState,
}

impl AnalysisSession {
    /// Diagnoses `primary` (against the `against` columns) and starts a
    /// session awaiting a test request.
    pub fn new<S>(dataset: Dataset, primary: &str, against: &[S]) -> Result<Self, AnalysisError>
    where
        S: AsRef<str>,
    {
        let diagnosis = diagnose_columns(&dataset, primary, against)?;
        Ok(Self {
            dataset,
            primary: primary.to_owned(),
            diagnosis,
            state: AnalysisState::AwaitingInput,
        })
    }

    #[must_use]
    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    #[must_use]
    pub fn primary(&self) -> &str {
        &self.primary
    }

    #[must_use]
    pub fn diagnosis(&self) -> &Diagnosis {
        &self.diagnosis
    }

    #[must_use]
    pub fn state(&self) -> &AnalysisState {
        &self.state
    }

    /// Tests selectable under the diagnosed category.
    pub fn offered_tests(&self) -> impl Iterator<Item = TestName> {
        TestName::offered_in(self.diagnosis.category)
    }

    /// Runs `request`. A failure leaves the session awaiting input.
    ///
    /// The request must read the diagnosed primary column; the diagnosis says
    /// nothing about other columns.
    pub fn submit(&mut self, request: &TestRequest) -> Result<TestResult, AnalysisError> {
        self.state = AnalysisState::AwaitingInput;
        if !request.uses_column(&self.primary) {
            return Err(AnalysisError::NotDiagnosed {
                test: request.name(),
                column: self.primary.clone(),
            });
        }
        let result = dispatch(&self.dataset, self.diagnosis.category, request)?;
        self.state = AnalysisState::Computed(result);
        Ok(result)
    }

    /// Builds the request for `name` from `selection` and runs it.
    pub fn submit_selection(
        &mut self,
        name: TestName,
        selection: &Selection<'_>,
    ) -> Result<TestResult, AnalysisError> {
        self.state = AnalysisState::AwaitingInput;
        let request = TestRequest::from_selection(name, selection)?;
        self.submit(&request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gate::TestCategory;

    fn session() -> AnalysisSession {
        let dataset = Dataset::from_csv_reader(
            "x,y\n1,4\n2,5\n3,6\n4,7\n5,9\n".as_bytes(),
            b',',
            true,
        )
        .unwrap();
        AnalysisSession::new(dataset, "x", &["y"]).unwrap()
    }

    #[test]
    fn test_offered_tests_follow_diagnosis() {
        let session = session();
        assert_eq!(session.diagnosis().category, TestCategory::Parametric);
        assert_eq!(session.offered_tests().count(), 4);
        assert!(session.offered_tests().all(|t| t.category().is_parametric()));
    }

    #[test]
    fn test_failed_submission_returns_to_awaiting_input() {
        let mut session = session();
        let ok = TestRequest::PairedT {
            first: "x".into(),
            second: "y".into(),
        };
        let result = session.submit(&ok).unwrap();
        assert_eq!(session.state(), &AnalysisState::Computed(result));

        let bad = TestRequest::MannWhitneyU {
            first: "x".into(),
            second: "y".into(),
        };
        assert!(matches!(
            session.submit(&bad).unwrap_err(),
            AnalysisError::TestNotOffered { .. }
        ));
        assert!(session.state().is_awaiting_input());

        let again = session.submit(&ok).unwrap();
        assert_eq!(again, result);
    }

    #[test]
    fn test_missing_selection() {
        let mut session = session();
        let selection = Selection {
            primary: "x",
            ..Selection::default()
        };
        let err = session
            .submit_selection(TestName::IndependentT, &selection)
            .unwrap_err();
        assert!(matches!(err, AnalysisError::MissingSelection { .. }));
        assert!(session.state().is_awaiting_input());
    }

    #[test]
    fn test_request_must_use_diagnosed_column() {
        let mut session = session();
        let selection = Selection {
            primary: "y",
            comparison_value: Some(0.0),
            ..Selection::default()
        };
        let err = session
            .submit_selection(TestName::OneSampleT, &selection)
            .unwrap_err();
        assert!(matches!(
            &err,
            AnalysisError::NotDiagnosed { test: TestName::OneSampleT, column } if column == "x"
        ));
        assert_eq!(
            err.to_string(),
            "One-sample t-test must include the diagnosed column 'x'"
        );
        assert!(session.state().is_awaiting_input());

        let groups = TestRequest::Anova {
            groups: vec!["y".into(), "y".into()],
        };
        assert!(matches!(
            session.submit(&groups).unwrap_err(),
            AnalysisError::NotDiagnosed { .. }
        ));

        let groups = TestRequest::Anova {
            groups: vec!["y".into(), "x".into()],
        };
        assert!(session.submit(&groups).is_ok());
        let second = TestRequest::IndependentT {
            first: "y".into(),
            second: "x".into(),
            equal_var: true,
        };
        assert!(session.submit(&second).is_ok());
    }

    #[test]
    fn test_unknown_primary_column() {
        let dataset = Dataset::from_manual_text("1 2\n3 4\n5 7").unwrap();
        let err = AnalysisSession::new(dataset, "Column_9", &[] as &[&str]).unwrap_err();
        assert!(matches!(err, AnalysisError::UnknownColumn { .. }));
    }
}
