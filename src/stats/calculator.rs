//! Statistics Calculator Module
//! The one statistic the pipeline owes its consumers: a least-squares line.

/// First-degree polynomial fitted to paired observations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearTrend {
    pub slope: f64,
    pub intercept: f64,
}

impl LinearTrend {
    /// Least-squares fit of y on x.
    ///
    /// Returns `None` when the inputs cannot support a line: fewer than two
    /// points, mismatched lengths, or zero variance in x.
    pub fn fit(xs: &[f64], ys: &[f64]) -> Option<Self> {
        if xs.len() != ys.len() || xs.len() < 2 {
            return None;
        }

        let n = xs.len() as f64;
        let mean_x = xs.iter().sum::<f64>() / n;
        let mean_y = ys.iter().sum::<f64>() / n;

        let sxx: f64 = xs.iter().map(|x| (x - mean_x).powi(2)).sum();
        if sxx == 0.0 {
            return None;
        }
        let sxy: f64 = xs
            .iter()
            .zip(ys)
            .map(|(x, y)| (x - mean_x) * (y - mean_y))
            .sum();

        let slope = sxy / sxx;
        Some(Self {
            slope,
            intercept: mean_y - slope * mean_x,
        })
    }

    pub fn predict(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recovers_an_exact_line() {
        let xs = [0.0, 1.0, 2.0, 3.0];
        let ys = [1.0, 3.0, 5.0, 7.0];

        let trend = LinearTrend::fit(&xs, &ys).unwrap();
        assert!((trend.slope - 2.0).abs() < 1e-12);
        assert!((trend.intercept - 1.0).abs() < 1e-12);
        assert!((trend.predict(10.0) - 21.0).abs() < 1e-12);
    }

    #[test]
    fn fits_noisy_points_between_the_extremes() {
        let xs = [0.0, 1.0, 2.0];
        let ys = [0.0, 1.2, 1.8];

        let trend = LinearTrend::fit(&xs, &ys).unwrap();
        assert!(trend.slope > 0.0);
        assert!((trend.predict(1.0) - 1.0).abs() < 0.2);
    }

    #[test]
    fn degenerate_inputs_yield_no_trend() {
        assert!(LinearTrend::fit(&[], &[]).is_none());
        assert!(LinearTrend::fit(&[1.0], &[2.0]).is_none());
        assert!(LinearTrend::fit(&[1.0, 2.0], &[2.0]).is_none());
        assert!(LinearTrend::fit(&[3.0, 3.0], &[1.0, 2.0]).is_none());
    }
}
