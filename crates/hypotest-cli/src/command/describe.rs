use clap::Args;
use hypotest_stats::summary::ColumnSummary;
use serde::Serialize;

use crate::{
    render,
    util::{InputArg, Output, OutputArg},
};

#[derive(Debug, Clone, Args)]
pub(crate) struct DescribeArg {
    #[clap(flatten)]
    pub input: InputArg,

    /// Columns to summarize (comma-separated, default: all)
    #[arg(long, value_delimiter = ',')]
    pub columns: Vec<String>,

    /// Number of histogram bins (default: Sturges' rule)
    #[arg(long)]
    pub bins: Option<usize>,

    #[clap(flatten)]
    pub output: OutputArg,
}

#[derive(Debug, Serialize)]
struct ColumnReport<'a> {
    column: &'a str,
    /// `None` for a column without observed values
    summary: Option<ColumnSummary>,
}

pub(crate) fn run(arg: &DescribeArg) -> anyhow::Result<()> {
    let dataset = arg.input.load()?;
    let columns = if arg.columns.is_empty() {
        dataset.columns().iter().collect()
    } else {
        dataset.columns_by_name(&arg.columns)?
    };

    let reports = columns
        .iter()
        .map(|column| ColumnReport {
            column: column.name(),
            summary: ColumnSummary::new(column.values().iter().copied(), arg.bins),
        })
        .collect::<Vec<_>>();

    if arg.output.wants_json() {
        return Output::save_json(&reports, arg.output.output.clone());
    }

    let table = reports
        .iter()
        .map(|report| (report.column, report.summary.clone()))
        .collect::<Vec<_>>();
    print!("{}", render::DescribeTable(&table));
    for report in &reports {
        let Some(summary) = &report.summary else {
            continue;
        };
        println!();
        println!("Distribution of '{}'", report.column);
        print!("{}", render::Distribution(summary));
    }
    Ok(())
}
