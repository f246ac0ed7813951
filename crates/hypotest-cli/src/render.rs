//! Plain-text rendering of summaries, diagnoses and test results.
//!
//! Each view is a small wrapper whose `Display` impl writes the text.

use std::fmt;

use hypotest_core::{dispatch::TestResult, gate::Diagnosis, request::TestName};
use hypotest_stats::summary::ColumnSummary;

const HISTOGRAM_BAR_WIDTH: u64 = 40;

/// The "describe" table: one row per statistic, one column per data column.
pub(crate) struct DescribeTable<'a>(pub &'a [(&'a str, Option<ColumnSummary>)]);

impl fmt::Display for DescribeTable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const LABEL_WIDTH: usize = 8;
        const VALUE_WIDTH: usize = 14;

        #[expect(clippy::cast_precision_loss)]
        let rows: [(&str, fn(&ColumnSummary) -> Option<f64>); 8] = [
            ("count", |s| Some(s.stats.count as f64)),
            ("mean", |s| Some(s.stats.mean)),
            ("std", |s| Some(s.stats.std_dev)),
            ("min", |s| Some(s.stats.min)),
            ("25%", |s| s.percentiles.get(25.0)),
            ("50%", |s| s.percentiles.get(50.0)),
            ("75%", |s| s.percentiles.get(75.0)),
            ("max", |s| Some(s.stats.max)),
        ];

        write!(f, "{:<LABEL_WIDTH$}", "")?;
        for (name, _) in self.0 {
            write!(f, " {name:>VALUE_WIDTH$}")?;
        }
        writeln!(f)?;
        for (label, extract) in rows {
            write!(f, "{label:<LABEL_WIDTH$}")?;
            for (_, summary) in self.0 {
                let value = match summary {
                    Some(summary) => extract(summary),
                    None if label == "count" => Some(0.0),
                    None => None,
                };
                match value {
                    Some(v) if v.is_finite() => write!(f, " {v:>VALUE_WIDTH$.4}")?,
                    _ => write!(f, " {:>VALUE_WIDTH$}", "N/A")?,
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Horizontal text bars, one line per bin, scaled to the fullest bin.
///
/// When the density estimate exists, each line ends with the bin's expected
/// count under it and a `*` marks that count on the bar scale.
pub(crate) struct Distribution<'a>(pub &'a ColumnSummary);

impl fmt::Display for Distribution<'_> {
    #[expect(
        clippy::cast_precision_loss,
        clippy::cast_sign_loss,
        clippy::cast_possible_truncation
    )]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let histogram = &self.0.histogram;
        let max_count = histogram.max_count().max(1);
        for (idx, bin) in histogram.bins.iter().enumerate() {
            let width = bin.count * HISTOGRAM_BAR_WIDTH / max_count;
            let mut bar = "#".repeat(usize::try_from(width).unwrap_or(0));
            let expected = self.0.kde_counts.as_ref().and_then(|counts| counts.get(idx));
            if let Some(&expected) = expected {
                let mark = (expected * HISTOGRAM_BAR_WIDTH as f64 / max_count as f64).round();
                let mark = (mark.max(0.0) as usize).min(HISTOGRAM_BAR_WIDTH as usize);
                if bar.len() <= mark {
                    bar.extend(std::iter::repeat_n(' ', mark - bar.len()));
                    bar.push('*');
                } else {
                    bar.replace_range(mark..=mark, "*");
                }
            }
            write!(
                f,
                "  [{:>10.4}, {:>10.4}) {:>6} ",
                bin.range.start, bin.range.end, bin.count
            )?;
            match expected {
                Some(expected) => {
                    let width = HISTOGRAM_BAR_WIDTH as usize + 1;
                    writeln!(f, "{bar:<width$} kde {expected:.2}")?;
                }
                None => writeln!(f, "{bar}")?,
            }
        }
        Ok(())
    }
}

/// Gate output for one column: both diagnostic tests and the offered tests.
pub(crate) struct DiagnosisReport<'a> {
    pub column: &'a str,
    pub diagnosis: &'a Diagnosis,
}

impl fmt::Display for DiagnosisReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Self { column, diagnosis } = self;
        writeln!(f, "Diagnostics for '{column}'")?;
        writeln!(
            f,
            "  Shapiro-Wilk: W = {:.4}, p = {:.4}",
            diagnosis.normality.statistic, diagnosis.normality.p_value
        )?;
        match diagnosis.variance {
            Some(levene) => writeln!(
                f,
                "  Levene:       W = {:.4}, p = {:.4}",
                levene.statistic, levene.p_value
            )?,
            None => writeln!(f, "  Levene:       not assessed (no comparison column)")?,
        }
        writeln!(f, "  Category:     {}", diagnosis.category)?;
        writeln!(f, "  Offered tests:")?;
        for name in TestName::offered_in(diagnosis.category) {
            writeln!(f, "    {:<16} {}", name.id(), name.label())?;
        }
        Ok(())
    }
}

pub(crate) struct ResultReport<'a>(pub &'a TestResult);

impl fmt::Display for ResultReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let result = self.0;
        writeln!(f, "{}", result.test())?;
        writeln!(f, "  Statistic: {}", Fixed(result.statistic()))?;
        writeln!(f, "  p-value:   {}", Fixed(result.p_value()))?;
        writeln!(f, "  Result:    {}", result.verdict())
    }
}

/// Four-decimal formatting that keeps infinities readable.
struct Fixed(f64);

impl fmt::Display for Fixed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_infinite() {
            f.write_str(if self.0 > 0.0 { "inf" } else { "-inf" })
        } else {
            write!(f, "{:.4}", self.0)
        }
    }
}
