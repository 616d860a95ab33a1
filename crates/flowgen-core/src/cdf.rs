//! Piecewise-linear CDFs and inverse-transform sampling of flow sizes.
//!
//! A [`Cdf`] is a list of `(value, percentile)` control points. Values between control points are
//! linearly interpolated, so a CDF with a handful of points describes a continuous distribution.
//! [`CdfSampler`] pairs a validated CDF with its own seeded generator.

use itertools::Itertools;
use rand::prelude::*;

/// A single control point of a CDF. `percentile` is in `[0, 100]`.
#[derive(Debug, Clone, Copy, PartialEq, derive_new::new, serde::Serialize, serde::Deserialize)]
pub struct CdfPoint {
    pub value: f64,
    pub percentile: f64,
}

impl From<(f64, f64)> for CdfPoint {
    fn from((value, percentile): (f64, f64)) -> Self {
        Self { value, percentile }
    }
}

/// A validated piecewise-linear CDF.
///
/// Correctness properties, checked by [`Cdf::new`]:
///
/// - The first percentile is 0
/// - The last percentile is 100
/// - Values and percentiles are both strictly increasing
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct Cdf {
    points: Vec<CdfPoint>,
}

impl Cdf {
    /// Validates `points` and builds a CDF from them.
    pub fn new(points: Vec<CdfPoint>) -> Result<Self, CdfError> {
        check(&points)?;
        Ok(Self { points })
    }

    /// Returns true iff `points` would make a valid CDF.
    pub fn is_valid(points: &[CdfPoint]) -> bool {
        check(points).is_ok()
    }

    pub fn points(&self) -> &[CdfPoint] {
        &self.points
    }

    /// The first control point.
    pub fn first(&self) -> CdfPoint {
        self.points[0]
    }

    /// The last control point.
    pub fn last(&self) -> CdfPoint {
        self.points[self.points.len() - 1]
    }

    fn segments(&self) -> impl Iterator<Item = (CdfPoint, CdfPoint)> + '_ {
        self.points.iter().copied().tuple_windows()
    }

    /// The mean of the distribution, i.e. the trapezoidal integral of value over the percentile
    /// axis, normalized by 100.
    pub fn mean(&self) -> f64 {
        let total = self
            .segments()
            .map(|(lo, hi)| (lo.value + hi.value) / 2.0 * (hi.percentile - lo.percentile))
            .sum::<f64>();
        total / 100.0
    }

    /// Returns the value at `percentile`. The first segment whose upper percentile is at least
    /// `percentile` is used, so `value_at(0.0)` is the first value.
    ///
    /// Returns `None` above the last percentile or for NaN.
    pub fn value_at(&self, percentile: f64) -> Option<f64> {
        self.segments()
            .find(|(_, hi)| percentile <= hi.percentile)
            .map(|(lo, hi)| {
                lo.value
                    + (hi.value - lo.value) / (hi.percentile - lo.percentile)
                        * (percentile - lo.percentile)
            })
    }

    /// Returns the percentile of `value`, the inverse of [`Cdf::value_at`].
    ///
    /// Returns `None` if `value` is negative or greater than the last value.
    pub fn percentile_of(&self, value: f64) -> Option<f64> {
        if value < 0.0 || value > self.last().value {
            return None;
        }
        self.segments()
            .find(|(_, hi)| value <= hi.value)
            .map(|(lo, hi)| {
                lo.percentile
                    + (hi.percentile - lo.percentile) / (hi.value - lo.value) * (value - lo.value)
            })
    }

    /// The cumulative trapezoidal integral of value from percentile 0 up to `percentile`,
    /// normalized by 100. `integral_to(100.0)` equals [`Cdf::mean`] up to rounding.
    pub fn integral_to(&self, percentile: f64) -> f64 {
        let mut total = 0.0;
        for (lo, hi) in self.segments() {
            let (x0, y0) = (lo.value, lo.percentile);
            let (x1, y1) = (hi.value, hi.percentile);
            if percentile <= y1 {
                total += 0.5 * (x0 + x0 + (x1 - x0) / (y1 - y0) * (percentile - y0))
                    * (percentile - y0)
                    / 100.0;
                break;
            }
            total += 0.5 * (x1 + x0) * (y1 - y0) / 100.0;
        }
        total
    }
}

fn check(points: &[CdfPoint]) -> Result<(), CdfError> {
    let (first, last) = match (points.first(), points.last()) {
        (Some(first), Some(last)) => (first, last),
        _ => return Err(CdfError::Empty),
    };
    if first.percentile != 0.0 {
        return Err(CdfError::FirstPercentile {
            got: first.percentile,
        });
    }
    if last.percentile != 100.0 {
        return Err(CdfError::LastPercentile {
            got: last.percentile,
        });
    }
    for (i, (prev, cur)) in points.iter().tuple_windows().enumerate() {
        // Written so that NaNs are rejected too.
        if !(cur.percentile > prev.percentile && cur.value > prev.value) {
            return Err(CdfError::NotIncreasing { index: i + 1 });
        }
    }
    Ok(())
}

/// Draws a percentile uniformly from `[0, 100)` and maps it through the CDF.
impl Distribution<f64> for Cdf {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        let percentile = rng.gen::<f64>() * 100.0;
        // Every percentile below 100 falls into some segment of a valid CDF.
        self.value_at(percentile).unwrap_or(self.last().value)
    }
}

/// A CDF together with the generator used to sample from it.
#[derive(Debug, Clone)]
pub struct CdfSampler {
    cdf: Cdf,
    rng: StdRng,
}

impl CdfSampler {
    /// Creates a sampler whose generator is seeded with `seed`.
    pub fn new(cdf: Cdf, seed: u64) -> Self {
        Self {
            cdf,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn cdf(&self) -> &Cdf {
        &self.cdf
    }

    /// Draws one value from the distribution.
    pub fn draw(&mut self) -> f64 {
        self.cdf.sample(&mut self.rng)
    }
}

/// A list of points that does not form a valid CDF.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CdfError {
    /// No points at all.
    #[error("CDF has no points")]
    Empty,

    /// The first percentile is not 0.
    #[error("first percentile must be 0 (got {got})")]
    FirstPercentile {
        /// The offending percentile.
        got: f64,
    },

    /// The last percentile is not 100.
    #[error("last percentile must be 100 (got {got})")]
    LastPercentile {
        /// The offending percentile.
        got: f64,
    },

    /// A point does not strictly increase over its predecessor.
    #[error("point {index} does not strictly increase in both value and percentile")]
    NotIncreasing {
        /// Index of the offending point.
        index: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cdf(points: &[(f64, f64)]) -> Cdf {
        Cdf::new(points.iter().copied().map(CdfPoint::from).collect()).unwrap()
    }

    fn points(points: &[(f64, f64)]) -> Vec<CdfPoint> {
        points.iter().copied().map(CdfPoint::from).collect()
    }

    #[test]
    fn mean_of_symmetric_cdf() {
        let cdf = cdf(&[(0.0, 0.0), (10.0, 50.0), (20.0, 100.0)]);
        assert_eq!(cdf.mean(), 10.0);
    }

    #[test]
    fn mean_of_skewed_cdf() {
        let linear = cdf(&[(0.0, 0.0), (100.0, 50.0), (200.0, 100.0)]);
        assert_eq!(linear.mean(), 100.0);
        let heavy_tail = cdf(&[(1.0, 0.0), (3.0, 90.0), (103.0, 100.0)]);
        // (1 + 3) / 2 * 90 + (3 + 103) / 2 * 10, over 100
        assert!((heavy_tail.mean() - 7.1).abs() < 1e-12);
    }

    #[test]
    fn value_at_interpolates() {
        let cdf = cdf(&[(0.0, 0.0), (10.0, 50.0), (20.0, 100.0)]);
        assert_eq!(cdf.value_at(0.0), Some(0.0));
        assert_eq!(cdf.value_at(25.0), Some(5.0));
        assert_eq!(cdf.value_at(50.0), Some(10.0));
        assert_eq!(cdf.value_at(75.0), Some(15.0));
        assert_eq!(cdf.value_at(100.0), Some(20.0));
        assert_eq!(cdf.value_at(100.5), None);
        assert_eq!(cdf.value_at(f64::NAN), None);
    }

    #[test]
    fn value_at_zero_is_first_value() {
        let cdf = cdf(&[(64.0, 0.0), (1_000.0, 30.0), (50_000.0, 100.0)]);
        assert_eq!(cdf.value_at(0.0), Some(64.0));
    }

    #[test]
    fn percentile_of_inverts_value_at() {
        let cdf = cdf(&[
            (6.0, 0.0),
            (6_000.0, 15.0),
            (13_000.0, 20.0),
            (19_000.0, 30.0),
            (200_000.0, 60.0),
            (1_000_000.0, 80.0),
            (30_000_000.0, 100.0),
        ]);
        for i in 1..1000 {
            let u = i as f64 / 10.0;
            let value = cdf.value_at(u).unwrap();
            let back = cdf.percentile_of(value).unwrap();
            assert!((back - u).abs() < 1e-9, "u = {u}, got {back}");
        }
    }

    #[test]
    fn percentile_of_out_of_range() {
        let cdf = cdf(&[(0.0, 0.0), (10.0, 50.0), (20.0, 100.0)]);
        assert_eq!(cdf.percentile_of(-0.1), None);
        assert_eq!(cdf.percentile_of(20.1), None);
        assert_eq!(cdf.percentile_of(20.0), Some(100.0));
        assert_eq!(cdf.percentile_of(0.0), Some(0.0));
    }

    #[test]
    fn integral_to_accumulates() {
        let cdf = cdf(&[(0.0, 0.0), (10.0, 50.0), (20.0, 100.0)]);
        assert_eq!(cdf.integral_to(0.0), 0.0);
        // 0.5 * (0 + 10) * 50 / 100
        assert_eq!(cdf.integral_to(50.0), 2.5);
        // 2.5 + 0.5 * (10 + 15) * 25 / 100
        assert!((cdf.integral_to(75.0) - 5.625).abs() < 1e-12);
        assert_eq!(cdf.integral_to(100.0), cdf.mean());
        assert_eq!(cdf.integral_to(150.0), cdf.mean());
    }

    #[test]
    fn integral_to_full_range_matches_mean() {
        let cdf = cdf(&[(1.0, 0.0), (3.0, 90.0), (103.0, 100.0)]);
        assert!((cdf.integral_to(100.0) - cdf.mean()).abs() < 1e-12);
    }

    #[test]
    fn validation_rejects_bad_endpoints() {
        assert_eq!(Cdf::new(vec![]), Err(CdfError::Empty));
        assert_eq!(
            Cdf::new(points(&[(0.0, 1.0), (10.0, 100.0)])),
            Err(CdfError::FirstPercentile { got: 1.0 })
        );
        assert_eq!(
            Cdf::new(points(&[(0.0, 0.0), (10.0, 99.0)])),
            Err(CdfError::LastPercentile { got: 99.0 })
        );
        assert!(!Cdf::is_valid(&points(&[(0.0, 0.0)])));
    }

    #[test]
    fn validation_rejects_non_increasing_points() {
        assert_eq!(
            Cdf::new(points(&[(0.0, 0.0), (10.0, 50.0), (10.0, 100.0)])),
            Err(CdfError::NotIncreasing { index: 2 })
        );
        assert_eq!(
            Cdf::new(points(&[(0.0, 0.0), (10.0, 50.0), (5.0, 100.0)])),
            Err(CdfError::NotIncreasing { index: 2 })
        );
        assert_eq!(
            Cdf::new(points(&[(0.0, 0.0), (10.0, 0.0), (20.0, 100.0)])),
            Err(CdfError::NotIncreasing { index: 1 })
        );
        assert!(!Cdf::is_valid(&points(&[(0.0, 0.0), (f64::NAN, 50.0), (20.0, 100.0)])));
        assert!(Cdf::is_valid(&points(&[(0.0, 0.0), (20.0, 100.0)])));
    }

    #[test]
    fn draws_stay_within_bounds() {
        let cdf = cdf(&[(100.0, 0.0), (200.0, 50.0), (1_000.0, 100.0)]);
        let mut sampler = CdfSampler::new(cdf, 7);
        for _ in 0..10_000 {
            let v = sampler.draw();
            assert!((100.0..1_000.0).contains(&v), "{v}");
        }
    }

    #[test]
    fn draws_follow_the_distribution() {
        let cdf = cdf(&[(0.0, 0.0), (100.0, 50.0), (200.0, 100.0)]);
        let mut sampler = CdfSampler::new(cdf, 0);
        let n = 100_000;
        let draws = (0..n).map(|_| sampler.draw()).collect::<Vec<_>>();
        let mean = draws.iter().sum::<f64>() / n as f64;
        assert!((mean - 100.0).abs() < 2.0, "mean = {mean}");
        let below_median = draws.iter().filter(|&&v| v <= 100.0).count();
        let frac = below_median as f64 / n as f64;
        assert!((frac - 0.5).abs() < 0.01, "frac = {frac}");
    }

    #[test]
    fn same_seed_same_draws() {
        let cdf = cdf(&[(0.0, 0.0), (100.0, 50.0), (200.0, 100.0)]);
        let mut a = CdfSampler::new(cdf.clone(), 42);
        let mut b = CdfSampler::new(cdf, 42);
        for _ in 0..100 {
            assert_eq!(a.draw(), b.draw());
        }
    }
}
