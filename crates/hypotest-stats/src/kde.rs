use statrs::distribution::{Continuous, ContinuousCDF, Normal};

use crate::descriptive::sample_variance;

/// Gaussian kernel density estimate with Scott's bandwidth.
///
/// The kernel standard deviation is `s * n^(-1/5)`, where `s` is the sample
/// standard deviation (`n - 1` denominator).
///
/// # Examples
///
/// ```
/// use hypotest_stats::kde::GaussianKde;
///
/// let kde = GaussianKde::new(&[1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
/// assert!(kde.density(3.0) > kde.density(0.0));
/// assert!(GaussianKde::new(&[2.0, 2.0, 2.0]).is_none());
/// ```
#[derive(Debug, Clone)]
pub struct GaussianKde {
    samples: Vec<f64>,
    bandwidth: f64,
    kernel: Normal,
}

impl GaussianKde {
    /// Fits the estimate to `values`.
    ///
    /// # Returns
    ///
    /// * `Some(GaussianKde)` - if there are at least two values with nonzero spread
    /// * `None` - otherwise
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn new(values: &[f64]) -> Option<Self> {
        let std_dev = sample_variance(values)?.sqrt();
        if std_dev <= 0.0 {
            return None;
        }
        let bandwidth = std_dev * (values.len() as f64).powf(-0.2);
        Some(Self {
            samples: values.to_vec(),
            bandwidth,
            kernel: Normal::standard(),
        })
    }

    #[must_use]
    pub fn bandwidth(&self) -> f64 {
        self.bandwidth
    }

    /// Estimated probability density at `x`.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn density(&self, x: f64) -> f64 {
        let sum = self
            .samples
            .iter()
            .map(|sample| self.kernel.pdf((x - sample) / self.bandwidth))
            .sum::<f64>();
        sum / (self.samples.len() as f64 * self.bandwidth)
    }

    /// Estimated probability of a value falling in `[start, end)`.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn mass(&self, start: f64, end: f64) -> f64 {
        let cdf = |x: f64, sample: f64| self.kernel.cdf((x - sample) / self.bandwidth);
        let sum = self
            .samples
            .iter()
            .map(|&sample| cdf(end, sample) - cdf(start, sample))
            .sum::<f64>();
        sum / self.samples.len() as f64
    }
}
