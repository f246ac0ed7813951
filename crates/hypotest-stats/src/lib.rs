//! Statistical routines for the hypotest project.
//!
//! This crate provides the numerical layer the analysis core delegates to:
//!
//! - **Descriptive statistics**: count, mean, median, sample variance and standard deviation
//! - **Percentiles**: linearly interpolated percentile values
//! - **Histogram generation**: equal-width frequency distributions
//! - **Kernel density estimation**: Gaussian kernels with Scott's bandwidth
//! - **Column summaries**: descriptive statistics, quartiles, a histogram and its density overlay
//! - **Inference**: t-tests, one-way ANOVA, Levene, Shapiro-Wilk, Mann-Whitney U,
//!   Wilcoxon signed-rank and Kruskal-Wallis tests
//!
//! # Modules
//!
//! - [`descriptive`]: Descriptive statistics for summarizing datasets
//! - [`percentiles`]: Percentile computation and storage
//! - [`histogram`]: Histogram construction for visualizing data distributions
//! - [`kde`]: Smoothed density estimate drawn over histograms
//! - [`summary`]: Column summary combining the above
//! - [`inference`]: Hypothesis tests returning a statistic and a p-value
//!
//! # Examples
//!
//! ## Computing descriptive statistics
//!
//! ```
//! use hypotest_stats::descriptive::DescriptiveStats;
//!
//! let values = [1.0, 2.0, 3.0, 4.0, 5.0];
//! let stats = DescriptiveStats::new(values).unwrap();
//! assert_eq!(stats.mean, 3.0);
//! ```
//!
//! ## Summarizing a column
//!
//! ```
//! use hypotest_stats::summary::ColumnSummary;
//!
//! let values = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0];
//! let summary = ColumnSummary::new(values, None).unwrap();
//! assert_eq!(summary.percentiles.get(25.0), Some(3.25));
//! ```
//!
//! ## Running a hypothesis test
//!
//! ```
//! use hypotest_stats::inference::ttest;
//!
//! let outcome = ttest::independent(&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0], true).unwrap();
//! assert!(outcome.p_value < 0.05);
//! ```

pub mod descriptive;
pub mod histogram;
pub mod inference;
pub mod kde;
pub mod percentiles;
pub mod summary;
