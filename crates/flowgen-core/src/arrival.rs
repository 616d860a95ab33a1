//! Exponential inter-arrival times.

use rand::prelude::*;

use crate::units::Nanosecs;

/// Draws gaps between consecutive sends of a host from an exponential distribution.
#[derive(Debug, Clone)]
pub struct ExponentialProcess {
    rng: StdRng,
}

impl ExponentialProcess {
    /// Creates a process whose generator is seeded with `seed`.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Draws one gap with the given mean, by inverting the exponential CDF.
    pub fn draw(&mut self, mean: f64) -> f64 {
        let u = self.rng.gen::<f64>();
        -(1.0 - u).ln() * mean
    }

    /// Draws one gap with the given mean (in nanoseconds), truncated to whole nanoseconds.
    pub fn draw_gap(&mut self, mean: f64) -> Nanosecs {
        Nanosecs::new(self.draw(mean) as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draws_are_non_negative() {
        let mut process = ExponentialProcess::new(0);
        assert!((0..10_000).all(|_| process.draw(1_600.0) >= 0.0));
    }

    #[test]
    fn draws_have_the_requested_mean() {
        let mut process = ExponentialProcess::new(3);
        let n = 200_000;
        let mean = (0..n).map(|_| process.draw(250.0)).sum::<f64>() / n as f64;
        assert!((mean - 250.0).abs() < 5.0, "mean = {mean}");
    }

    #[test]
    fn gaps_truncate_draws() {
        let mut a = ExponentialProcess::new(11);
        let mut b = ExponentialProcess::new(11);
        for _ in 0..1_000 {
            let raw = a.draw(1e4);
            assert_eq!(b.draw_gap(1e4), Nanosecs::new(raw.floor() as u64));
        }
    }

    #[test]
    fn zero_mean_gives_zero_gaps() {
        let mut process = ExponentialProcess::new(0);
        assert!((0..100).all(|_| process.draw_gap(0.0) == Nanosecs::ZERO));
    }
}
