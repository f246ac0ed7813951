use serde::Serialize;

use crate::{
    descriptive::DescriptiveStats, histogram::Histogram, kde::GaussianKde, percentiles::Percentiles,
};

/// Percentile points shown in a column summary.
pub const SUMMARY_PERCENTILES: [f64; 3] = [25.0, 50.0, 75.0];

/// Summary of a single column: the "describe" table plus a distribution
/// histogram with a smoothed density overlay.
///
/// # Examples
///
/// ```
/// use hypotest_stats::summary::ColumnSummary;
///
/// let values = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0];
/// let summary = ColumnSummary::new(values, None).unwrap();
///
/// assert_eq!(summary.stats.mean, 5.5);
/// assert_eq!(summary.percentiles.get(50.0), Some(5.5));
/// assert_eq!(summary.histogram.bins.len(), 5);
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct ColumnSummary {
    /// Count, central tendency and dispersion.
    pub stats: DescriptiveStats,
    /// Quartiles ([`SUMMARY_PERCENTILES`]).
    pub percentiles: Percentiles,
    /// Distribution of values across equal-width bins.
    pub histogram: Histogram,
    /// Expected count of each histogram bin under a Gaussian kernel density
    /// estimate; `None` without at least two distinct values.
    pub kde_counts: Option<Vec<f64>>,
}

impl ColumnSummary {
    /// Summarizes unsorted values.
    ///
    /// `hist_num_bins` of `None` lets the histogram choose its bin count.
    ///
    /// # Returns
    ///
    /// * `Some(ColumnSummary)` - if the column contains at least one value
    /// * `None` - if the column is empty
    #[must_use]
    pub fn new<I>(values: I, hist_num_bins: Option<usize>) -> Option<Self>
    where
        I: IntoIterator<Item = f64>,
    {
        let mut sorted = values.into_iter().collect::<Vec<_>>();
        sorted.sort_by(f64::total_cmp);
        Self::from_sorted(&sorted, hist_num_bins)
    }

    /// Summarizes pre-sorted values.
    ///
    /// # Panics
    ///
    /// Panics in debug mode if `sorted_values` is not sorted in ascending order.
    #[must_use]
    pub fn from_sorted(sorted_values: &[f64], hist_num_bins: Option<usize>) -> Option<Self> {
        debug_assert!(
            sorted_values.is_sorted_by(|a, b| a <= b),
            "values must be sorted in ascending order"
        );

        let stats = DescriptiveStats::from_sorted(sorted_values)?;
        let percentiles = Percentiles::from_sorted(sorted_values, &SUMMARY_PERCENTILES);
        let histogram = Histogram::from_sorted(sorted_values, hist_num_bins);
        #[expect(clippy::cast_precision_loss)]
        let kde_counts = GaussianKde::new(sorted_values).map(|kde| {
            let n = sorted_values.len() as f64;
            histogram
                .bins
                .iter()
                .map(|bin| kde.mass(bin.range.start, bin.range.end) * n)
                .collect()
        });

        Some(Self {
            stats,
            percentiles,
            histogram,
            kde_counts,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_column() {
        assert!(ColumnSummary::new(Vec::new(), None).is_none());
    }

    #[test]
    fn test_histogram_counts_every_value() {
        let summary = ColumnSummary::new([9.0, 2.0, 5.0, 4.0, 4.0], Some(2)).unwrap();
        let total = summary.histogram.bins.iter().map(|b| b.count).sum::<u64>();
        assert_eq!(total, 5);
        assert_eq!(summary.stats.count, 5);
        assert_eq!(summary.percentiles.get(50.0), Some(4.0));
    }

    #[test]
    fn test_kde_counts_follow_bins() {
        let summary = ColumnSummary::new([1.0, 2.0, 3.0, 4.0, 5.0], Some(2)).unwrap();
        let counts = summary.kde_counts.unwrap();
        assert_eq!(counts.len(), 2);
        // Kernel mass spills past [min, max], so the bins hold less than n
        assert!(counts.iter().sum::<f64>() < 5.0);
        assert!((counts[0] - counts[1]).abs() < 1e-9);
        assert!((counts[0] - 5.0 * 0.352_685_390_767_246_4).abs() < 1e-9);
    }

    #[test]
    fn test_kde_undefined_for_constant_column() {
        let summary = ColumnSummary::new([3.0; 4], None).unwrap();
        assert!(summary.kde_counts.is_none());
        assert_eq!(summary.histogram.bins.len(), 1);
    }
}
