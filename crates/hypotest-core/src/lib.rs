//! Hypothesis test selection and execution
//!
//! This crate turns a [`Dataset`](dataset::Dataset) and a user's column
//! choices into a [`TestResult`](dispatch::TestResult).
//!
//! # Workflow
//!
//! 1. **Parse input** ([`dataset`]): CSV files or pasted text become named numeric columns
//! 2. **Diagnose** ([`gate`]): Shapiro-Wilk and Levene tests choose the
//!    [`Parametric`](gate::TestCategory::Parametric) or
//!    [`NonParametric`](gate::TestCategory::NonParametric) category
//! 3. **Request** ([`request`]): pick a test offered in that category and the columns it reads
//! 4. **Dispatch** ([`dispatch`]): run the test, compare the p-value against 0.05
//!
//! [`session::AnalysisSession`] bundles these steps for one dataset.
//!
//! # Examples
//!
//! ```
//! use hypotest_core::{
//!     dataset::Dataset,
//!     dispatch::dispatch,
//!     gate::diagnose_columns,
//!     request::TestRequest,
//! };
//!
//! let input = "before,after\n12.1,12.9\n11.4,12.0\n13.0,13.2\n12.7,13.5\n11.9,12.8\n";
//! let dataset = Dataset::from_csv_reader(input.as_bytes(), b',', true)?;
//!
//! let diagnosis = diagnose_columns(&dataset, "before", &["after"])?;
//! let request = TestRequest::PairedT {
//!     first: "before".into(),
//!     second: "after".into(),
//! };
//! let result = dispatch(&dataset, diagnosis.category, &request)?;
//! println!("t = {:.3}, p = {:.4}: {}", result.statistic(), result.p_value(), result.verdict());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod dataset;
pub mod dispatch;
pub mod error;
pub mod gate;
pub mod request;
pub mod session;
