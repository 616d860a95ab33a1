//! Unit types for time, sizes and rates.

use std::num::ParseIntError;
use std::str::FromStr;

macro_rules! unit {
    ($name: ident, $suffix: literal) => {
        #[derive(
            Debug,
            Default,
            Copy,
            Clone,
            PartialOrd,
            Ord,
            PartialEq,
            Eq,
            Hash,
            derive_more::Add,
            derive_more::Sub,
            derive_more::AddAssign,
            derive_more::SubAssign,
            derive_more::Sum,
            serde::Serialize,
            serde::Deserialize,
        )]
        pub struct $name(u64);

        impl $name {
            pub const ZERO: $name = Self::new(0);
            pub const ONE: $name = Self::new(1);

            pub const fn new(value: u64) -> Self {
                Self(value)
            }

            pub fn into_f64(self) -> f64 {
                self.0 as f64
            }

            pub fn saturating_add(self, other: Self) -> Self {
                Self(self.0.saturating_add(other.0))
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}{}", self.0, $suffix)
            }
        }
    };
}

unit!(Nanosecs, "ns");
unit!(Bytes, "B");
unit!(BitsPerSec, "bps");

impl Nanosecs {
    pub const fn from_secs(secs: u64) -> Self {
        Self(secs * 1_000_000_000)
    }

    /// Converts fractional seconds into nanoseconds, truncating anything below one nanosecond.
    /// Negative and NaN inputs map to zero.
    pub fn from_secs_f64(secs: f64) -> Self {
        Self((secs * 1e9) as u64)
    }
}

// Both accept the bare integer as well as the suffixed form written by `Display`.
impl FromStr for Nanosecs {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.strip_suffix("ns").unwrap_or(s).parse().map(Self)
    }
}

impl FromStr for Bytes {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.strip_suffix('B').unwrap_or(s).parse().map(Self)
    }
}

/// Parses a link bandwidth. A trailing `G`, `M` or `K` scales the number by 1e9, 1e6 or 1e3;
/// a bare number is taken as bits per second. Fractional results are rounded to the nearest bit
/// per second.
impl FromStr for BitsPerSec {
    type Err = ParseBandwidthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (num, scale) = match s.chars().last() {
            Some('G') => (&s[..s.len() - 1], 1e9),
            Some('M') => (&s[..s.len() - 1], 1e6),
            Some('K') => (&s[..s.len() - 1], 1e3),
            _ => (s, 1.0),
        };
        let err = || ParseBandwidthError(s.to_owned());
        let bps = num.trim().parse::<f64>().map_err(|_| err())? * scale;
        if !bps.is_finite() || bps < 0.0 {
            return Err(err());
        }
        Ok(Self(bps.round() as u64))
    }
}

/// The bandwidth string has no recognized numeric or suffix form.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("bandwidth format incorrect: {0:?} (expected a number with an optional G/M/K suffix)")]
pub struct ParseBandwidthError(pub String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bandwidth_suffixes() {
        assert_eq!("10G".parse(), Ok(BitsPerSec::new(10_000_000_000)));
        assert_eq!("2.5G".parse(), Ok(BitsPerSec::new(2_500_000_000)));
        assert_eq!("100M".parse(), Ok(BitsPerSec::new(100_000_000)));
        assert_eq!("64K".parse(), Ok(BitsPerSec::new(64_000)));
        assert_eq!("12345".parse(), Ok(BitsPerSec::new(12_345)));
        assert_eq!("1.5".parse(), Ok(BitsPerSec::new(2)));
        assert_eq!("0.4K".parse(), Ok(BitsPerSec::new(400)));
    }

    #[test]
    fn bandwidth_rejects_garbage() {
        for s in ["", "G", "10T", "ten", "10GG", "-1G", "infG", "NaN"] {
            assert!(s.parse::<BitsPerSec>().is_err(), "{s:?} should not parse");
        }
    }

    #[test]
    fn suffixed_display_parses_back() {
        assert_eq!(Nanosecs::new(1_000).to_string(), "1000ns");
        assert_eq!(Bytes::new(42).to_string(), "42B");
        assert_eq!("1000ns".parse(), Ok(Nanosecs::new(1_000)));
        assert_eq!("42B".parse(), Ok(Bytes::new(42)));
        assert_eq!("42".parse(), Ok(Bytes::new(42)));
        assert!("42KB".parse::<Bytes>().is_err());
    }

    #[test]
    fn fractional_seconds_truncate() {
        assert_eq!(Nanosecs::from_secs_f64(0.0), Nanosecs::ZERO);
        assert_eq!(Nanosecs::from_secs_f64(0.5), Nanosecs::new(500_000_000));
        assert_eq!(Nanosecs::from_secs_f64(10.0), Nanosecs::from_secs(10));
    }
}
