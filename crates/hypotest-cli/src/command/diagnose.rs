use clap::Args;
use hypotest_core::{
    gate::{Diagnosis, diagnose_columns},
    request::TestName,
};
use serde::Serialize;

use crate::{
    render,
    util::{InputArg, Output, OutputArg},
};

#[derive(Debug, Clone, Args)]
pub(crate) struct DiagnoseArg {
    #[clap(flatten)]
    pub input: InputArg,

    /// Column to check for normality
    #[arg(long)]
    pub column: String,

    /// Independent columns to compare the column's spread with (comma-separated)
    #[arg(long, value_delimiter = ',')]
    pub against: Vec<String>,

    #[clap(flatten)]
    pub output: OutputArg,
}

#[derive(Debug, Serialize)]
struct DiagnosisReport<'a> {
    column: &'a str,
    diagnosis: Diagnosis,
    offered_tests: Vec<TestName>,
}

pub(crate) fn run(arg: &DiagnoseArg) -> anyhow::Result<()> {
    let dataset = arg.input.load()?;
    let diagnosis = diagnose_columns(&dataset, &arg.column, &arg.against)?;

    if arg.output.wants_json() {
        let report = DiagnosisReport {
            column: &arg.column,
            diagnosis,
            offered_tests: TestName::offered_in(diagnosis.category).collect(),
        };
        return Output::save_json(&report, arg.output.output.clone());
    }

    let report = render::DiagnosisReport {
        column: &arg.column,
        diagnosis: &diagnosis,
    };
    print!("{report}");
    Ok(())
}
