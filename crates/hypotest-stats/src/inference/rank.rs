/// Ranks of a sample, with tied values sharing the average of their ranks.
#[derive(Debug, Clone)]
pub struct Ranking {
    /// One-based rank of each value, in input order.
    pub ranks: Vec<f64>,
    /// Sizes of the tie groups (only groups of two or more values).
    pub tie_sizes: Vec<usize>,
}

impl Ranking {
    /// Ranks `values`, averaging the ranks of ties.
    ///
    /// # Examples
    ///
    /// ```
    /// # use hypotest_stats::inference::rank::Ranking;
    /// let ranking = Ranking::new(&[10.0, 30.0, 20.0, 20.0]);
    /// assert_eq!(ranking.ranks, vec![1.0, 4.0, 2.5, 2.5]);
    /// assert_eq!(ranking.tie_sizes, vec![2]);
    /// ```
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn new(values: &[f64]) -> Self {
        let n = values.len();
        let mut order = (0..n).collect::<Vec<_>>();
        order.sort_by(|&a, &b| values[a].total_cmp(&values[b]));

        let mut ranks = vec![0.0; n];
        let mut tie_sizes = vec![];
        let mut start = 0;
        while start < n {
            let mut end = start + 1;
            while end < n && values[order[end]].total_cmp(&values[order[start]]).is_eq() {
                end += 1;
            }
            // Positions start..end hold ranks start+1..=end
            let average = (start + end + 1) as f64 / 2.0;
            for &idx in &order[start..end] {
                ranks[idx] = average;
            }
            if end - start > 1 {
                tie_sizes.push(end - start);
            }
            start = end;
        }

        Self { ranks, tie_sizes }
    }

    #[must_use]
    pub fn has_ties(&self) -> bool {
        !self.tie_sizes.is_empty()
    }

    /// Tie correction term `sum(t^3 - t)` over all tie groups.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn tie_term(&self) -> f64 {
        self.tie_sizes
            .iter()
            .map(|&t| {
                let t = t as f64;
                t * t * t - t
            })
            .sum()
    }
}
