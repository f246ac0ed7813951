use hypotest_stats::inference::InferenceError;

use crate::{dataset::ParseError, gate::TestCategory, request::TestName};

/// Errors surfaced to the user by the analysis core.
///
/// None of them are fatal: the user can correct the input or the selection
/// and submit again.
#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum AnalysisError {
    #[display("unknown column '{name}'")]
    UnknownColumn { name: String },
    #[display("{test} needs {what}")]
    MissingSelection { test: TestName, what: &'static str },
    #[display("{test} must include the diagnosed column '{column}'")]
    NotDiagnosed { test: TestName, column: String },
    #[display("{test} is not offered for {category} data")]
    TestNotOffered {
        test: TestName,
        category: TestCategory,
    },
    #[display("{_0}")]
    Inference(#[error(not(source))] InferenceError),
    #[display("{_0}")]
    Parse(#[error(not(source))] ParseError),
}

impl From<InferenceError> for AnalysisError {
    fn from(err: InferenceError) -> Self {
        Self::Inference(err)
    }
}

impl From<ParseError> for AnalysisError {
    fn from(err: ParseError) -> Self {
        Self::Parse(err)
    }
}
