//! Shapiro-Wilk test for normality.
//!
//! Coefficients and the p-value transformation follow Royston's
//! approximation (Applied Statistics algorithm AS R94), which is valid for
//! `3 <= n <= 5000`.

use std::f64::consts::FRAC_1_SQRT_2;

use tracing::warn;

use super::{InferenceError, TestOutcome, standard_normal_quantile, standard_normal_upper};

const SHAPIRO_WILK: &str = "Shapiro-Wilk test";

/// Above this size the p-value approximation loses accuracy.
pub const MAX_ACCURATE_SIZE: usize = 5000;

const C1: [f64; 6] = [0.0, 0.221_157, -0.147_981, -2.071_19, 4.434_685, -2.706_056];
const C2: [f64; 6] = [0.0, 0.042_981, -0.293_762, -1.752_461, 5.682_633, -3.582_633];
const C3: [f64; 4] = [0.544, -0.399_78, 0.025_054, -6.714e-4];
const C4: [f64; 4] = [1.3822, -0.778_57, 0.062_767, -0.002_032_2];
const C5: [f64; 4] = [-1.5861, -0.310_82, -0.083_751, 0.003_891_5];
const C6: [f64; 3] = [-0.4803, -0.082_676, 0.003_030_2];
const G: [f64; 2] = [-2.273, 0.459];

/// Shapiro-Wilk test: was `sample` drawn from a normal distribution?
///
/// The statistic `W` lies in `(0, 1]`; small values (and small p-values)
/// indicate departure from normality.
///
/// Fails with [`InferenceError::InsufficientData`] for fewer than 3 values
/// and with [`InferenceError::ConstantInput`] when all values are equal.
///
/// # Examples
///
/// ```
/// # use hypotest_stats::inference::shapiro::shapiro_wilk;
/// let outcome = shapiro_wilk(&[148.0, 154.0, 158.0, 160.0, 161.0, 162.0, 166.0, 170.0, 182.0, 195.0, 236.0]).unwrap();
/// assert!((outcome.statistic - 0.788_81).abs() < 1e-4);
/// assert!(outcome.p_value < 0.01);
/// ```
#[expect(clippy::cast_precision_loss)]
pub fn shapiro_wilk(sample: &[f64]) -> Result<TestOutcome, InferenceError> {
    InferenceError::require_len(SHAPIRO_WILK, sample, 3)?;
    let n = sample.len();
    if n > MAX_ACCURATE_SIZE {
        warn!(n, "Shapiro-Wilk p-value may be inaccurate for more than {MAX_ACCURATE_SIZE} values");
    }

    let mut sorted = sample.to_vec();
    sorted.sort_by(f64::total_cmp);
    let range = sorted[n - 1] - sorted[0];
    if range <= f64::EPSILON * sorted[0].abs().max(1.0) {
        return Err(InferenceError::ConstantInput { test: SHAPIRO_WILK });
    }

    let coefficients = coefficients(n);
    let mean = sorted.iter().sum::<f64>() / n as f64;
    let ssq = sorted.iter().map(|v| (v - mean).powi(2)).sum::<f64>();
    let b = coefficients
        .iter()
        .enumerate()
        .map(|(i, a)| a * (sorted[n - 1 - i] - sorted[i]))
        .sum::<f64>();
    let w = (b * b / ssq).min(1.0);

    Ok(TestOutcome::new(w, p_value(w, n)))
}

/// Antisymmetric weights `a_1..a_{n/2}` applied to `x_(n+1-i) - x_(i)`.
#[expect(clippy::cast_precision_loss)]
fn coefficients(n: usize) -> Vec<f64> {
    if n == 3 {
        return vec![FRAC_1_SQRT_2];
    }

    let half = n / 2;
    let an = n as f64;
    let m = (1..=half)
        .map(|i| standard_normal_quantile((i as f64 - 0.375) / (an + 0.25)))
        .collect::<Vec<_>>();
    let summ2 = 2.0 * m.iter().map(|v| v * v).sum::<f64>();
    let ssumm2 = summ2.sqrt();
    let rsn = 1.0 / an.sqrt();

    let mut a = vec![0.0; half];
    a[0] = poly(&C1, rsn) - m[0] / ssumm2;
    let (first_free, fac) = if n > 5 {
        a[1] = poly(&C2, rsn) - m[1] / ssumm2;
        let fac = ((summ2 - 2.0 * m[0].powi(2) - 2.0 * m[1].powi(2))
            / (1.0 - 2.0 * a[0].powi(2) - 2.0 * a[1].powi(2)))
        .sqrt();
        (2, fac)
    } else {
        let fac = ((summ2 - 2.0 * m[0].powi(2)) / (1.0 - 2.0 * a[0].powi(2))).sqrt();
        (1, fac)
    };
    for (ai, mi) in a.iter_mut().zip(&m).skip(first_free) {
        *ai = -mi / fac;
    }
    a
}

#[expect(clippy::cast_precision_loss)]
fn p_value(w: f64, n: usize) -> f64 {
    if n == 3 {
        // Exact distribution for three observations
        let pi6 = 6.0 / std::f64::consts::PI;
        let stqr = std::f64::consts::FRAC_PI_3;
        return (pi6 * (w.sqrt().asin() - stqr)).max(0.0);
    }

    let an = n as f64;
    let mut w1 = (1.0 - w).ln();
    let (m, s) = if n <= 11 {
        let gamma = poly(&G, an);
        if w1 >= gamma {
            return 0.0;
        }
        w1 = -(gamma - w1).ln();
        (poly(&C3, an), poly(&C4, an).exp())
    } else {
        let ln_n = an.ln();
        (poly(&C5, ln_n), poly(&C6, ln_n).exp())
    };
    standard_normal_upper((w1 - m) / s)
}

/// Evaluates `c[0] + c[1] x + c[2] x^2 + ...`.
fn poly(c: &[f64], x: f64) -> f64 {
    c.iter().rev().fold(0.0, |acc, coef| acc * x + coef)
}
