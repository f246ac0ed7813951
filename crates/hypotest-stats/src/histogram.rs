use std::ops::Range;

use serde::Serialize;

/// A histogram representation of a column's distribution.
///
/// The data range `[min, max]` is split into equal-width bins. The last bin is
/// widened by one ULP so that the maximum value falls inside it.
#[derive(Debug, Clone, Serialize)]
pub struct Histogram {
    /// The bins comprising the histogram, in ascending order.
    pub bins: Vec<HistogramBin>,
}

/// A single bin in a histogram.
#[derive(Debug, Clone, Serialize)]
pub struct HistogramBin {
    /// The range of values covered by this bin (inclusive start, exclusive end).
    pub range: Range<f64>,
    /// The number of values that fall within this bin's range.
    pub count: u64,
}

impl Histogram {
    /// Creates a histogram from unsorted values.
    ///
    /// # Arguments
    ///
    /// * `values` - The data points to create the histogram from.
    /// * `num_bins` - The number of bins. `None` picks the count with [`sturges_bins`].
    ///
    /// # Examples
    ///
    /// ```
    /// # use hypotest_stats::histogram::Histogram;
    /// let values = [5.0, 2.0, 8.0, 1.0, 9.0, 3.0, 7.0, 4.0, 6.0, 10.0];
    /// let histogram = Histogram::new(values, Some(3));
    /// assert_eq!(histogram.bins.len(), 3);
    /// assert_eq!(histogram.bins.iter().map(|b| b.count).sum::<u64>(), 10);
    /// ```
    #[must_use]
    pub fn new<I>(values: I, num_bins: Option<usize>) -> Self
    where
        I: IntoIterator<Item = f64>,
    {
        let mut sorted = values.into_iter().collect::<Vec<_>>();
        sorted.sort_by(f64::total_cmp);
        Self::from_sorted(&sorted, num_bins)
    }

    /// Creates a histogram from pre-sorted values.
    ///
    /// # Panics
    ///
    /// Panics if `sorted_values` is not sorted in ascending order.
    #[expect(
        clippy::cast_precision_loss,
        clippy::cast_sign_loss,
        clippy::cast_possible_truncation
    )]
    #[must_use]
    pub fn from_sorted(sorted_values: &[f64], num_bins: Option<usize>) -> Self {
        assert!(
            sorted_values.is_sorted_by(|a, b| a <= b),
            "values must be sorted in ascending order"
        );

        let (Some(&min), Some(&max)) = (sorted_values.first(), sorted_values.last()) else {
            return Self { bins: vec![] };
        };
        let num_bins = num_bins.unwrap_or_else(|| sturges_bins(sorted_values.len()));
        if num_bins == 0 {
            return Self { bins: vec![] };
        }

        // A constant column gets one unit-wide bin centred on the value
        if max - min <= f64::EPSILON * min.abs().max(1.0) {
            return Self {
                bins: vec![HistogramBin {
                    range: (min - 0.5)..(min + 0.5),
                    count: sorted_values.len() as u64,
                }],
            };
        }

        let width = (max - min) / num_bins as f64;
        let mut bins = (0..num_bins)
            .map(|idx| {
                // Recompute edges from the index to avoid accumulating rounding error
                let start = min + width * idx as f64;
                let end = if idx == num_bins - 1 {
                    max.next_up()
                } else {
                    min + width * (idx + 1) as f64
                };
                HistogramBin {
                    range: start..end,
                    count: 0,
                }
            })
            .collect::<Vec<_>>();

        for &val in sorted_values {
            let idx = (((val - min) / width).floor() as usize).min(num_bins - 1);
            bins[idx].count += 1;
        }

        Self { bins }
    }

    /// The largest bin count, used to scale text renderings.
    #[must_use]
    pub fn max_count(&self) -> u64 {
        self.bins.iter().map(|bin| bin.count).max().unwrap_or(0)
    }
}

/// Number of bins suggested by Sturges' rule: `ceil(log2(n)) + 1`.
///
/// ```
/// # use hypotest_stats::histogram::sturges_bins;
/// assert_eq!(sturges_bins(8), 4);
/// assert_eq!(sturges_bins(100), 8);
/// assert_eq!(sturges_bins(1), 1);
/// ```
#[expect(
    clippy::cast_precision_loss,
    clippy::cast_sign_loss,
    clippy::cast_possible_truncation
)]
#[must_use]
pub fn sturges_bins(n: usize) -> usize {
    if n == 0 {
        return 0;
    }
    (n as f64).log2().ceil() as usize + 1
}
