//! Nanosecond-resolution timestamps.

use std::fmt;
use std::str::FromStr;

const NANOS_PER_SEC: i128 = 1_000_000_000;

/// A point in time as signed nanoseconds since the Unix epoch.
///
/// Stored as an `i128` so that any `(seconds, nanoseconds)` pair reported by
/// `stat` (with `i64` seconds) is represented exactly.
///
/// The textual form is `SECONDS.NANOSECONDS`, where `SECONDS` is the floor of
/// the time in seconds (negative before the epoch) and `NANOSECONDS` is the
/// non-negative remainder, always nine digits.
///
/// # Examples
///
/// ```
/// use metatar_core::types::NanoTime;
///
/// let t: NanoTime = "1700000000.123456789".parse().unwrap();
/// assert_eq!(t.as_nanos(), 1_700_000_000_123_456_789);
/// assert_eq!(t.to_string(), "1700000000.123456789");
///
/// let before_epoch = NanoTime::from_nanos(-500_000_000);
/// assert_eq!(before_epoch.to_string(), "-1.500000000");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct NanoTime(i128);

impl NanoTime {
    /// Creates a timestamp from a raw nanosecond count.
    #[must_use]
    pub const fn from_nanos(nanos: i128) -> Self {
        Self(nanos)
    }

    /// Creates a timestamp from the `(seconds, nanoseconds)` pair `stat`
    /// reports.
    #[must_use]
    pub fn from_parts(secs: i64, nanos: i64) -> Self {
        Self(i128::from(secs) * NANOS_PER_SEC + i128::from(nanos))
    }

    /// Returns the nanosecond count since the epoch.
    #[must_use]
    pub const fn as_nanos(self) -> i128 {
        self.0
    }

    /// Whole seconds, rounded toward negative infinity.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn seconds(self) -> i64 {
        self.0.div_euclid(NANOS_PER_SEC) as i64
    }

    /// Sub-second part, always in `0..1_000_000_000`.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn subsec_nanos(self) -> u32 {
        self.0.rem_euclid(NANOS_PER_SEC) as u32
    }

    /// Signed difference `self - earlier`, in nanoseconds.
    #[must_use]
    pub const fn nanos_since(self, earlier: Self) -> i128 {
        self.0 - earlier.0
    }
}

impl fmt::Display for NanoTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let secs = self.0.div_euclid(NANOS_PER_SEC);
        let nanos = self.0.rem_euclid(NANOS_PER_SEC);
        write!(f, "{secs}.{nanos:09}")
    }
}

/// Error returned when parsing a [`NanoTime`] fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseNanoTimeError(String);

impl fmt::Display for ParseNanoTimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid timestamp '{}'", self.0)
    }
}

impl std::error::Error for ParseNanoTimeError {}

impl FromStr for NanoTime {
    type Err = ParseNanoTimeError;

    /// Parses `SECONDS[.FRACTION]`.
    ///
    /// The value is `SECONDS * 1e9 + FRACTION`, with `FRACTION` read as up to
    /// nine decimal digits and right-padded with zeros.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseNanoTimeError(s.to_string());

        let (secs, frac) = match s.split_once('.') {
            Some((secs, frac)) => (secs, Some(frac)),
            None => (s, None),
        };

        let secs: i64 = secs.parse().map_err(|_| err())?;

        let nanos = match frac {
            None => 0,
            Some(frac) => {
                if frac.is_empty() || frac.len() > 9 || !frac.bytes().all(|b| b.is_ascii_digit()) {
                    return Err(err());
                }
                let digits: i128 = frac.parse().map_err(|_| err())?;
                #[allow(clippy::cast_possible_truncation)]
                let scale = 10_i128.pow(9 - frac.len() as u32);
                digits * scale
            }
        };

        Ok(Self(i128::from(secs) * NANOS_PER_SEC + nanos))
    }
}

/// Renders a signed nanosecond difference as seconds with an explicit sign,
/// e.g. `+3.000000000` or `-0.250000000`.
///
/// # Examples
///
/// ```
/// use metatar_core::types::format_signed_seconds;
///
/// assert_eq!(format_signed_seconds(3_000_000_000), "+3.000000000");
/// assert_eq!(format_signed_seconds(-250_000_000), "-0.250000000");
/// ```
#[must_use]
pub fn format_signed_seconds(diff_nanos: i128) -> String {
    let sign = if diff_nanos < 0 { '-' } else { '+' };
    let magnitude = diff_nanos.unsigned_abs();
    let secs = magnitude / 1_000_000_000;
    let nanos = magnitude % 1_000_000_000;
    format!("{sign}{secs}.{nanos:09}")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_display_pads_nanoseconds() {
        let t = NanoTime::from_parts(1_700_000_000, 42);
        assert_eq!(t.to_string(), "1700000000.000000042");
    }

    #[test]
    fn test_parse_exact() {
        let t: NanoTime = "1700000000.123456789".parse().unwrap();
        assert_eq!(t.as_nanos(), 1_700_000_000_123_456_789);
        assert_eq!(t.seconds(), 1_700_000_000);
        assert_eq!(t.subsec_nanos(), 123_456_789);
    }

    #[test]
    fn test_parse_short_fraction() {
        let t: NanoTime = "12.5".parse().unwrap();
        assert_eq!(t.as_nanos(), 12_500_000_000);
    }

    #[test]
    fn test_parse_without_fraction() {
        let t: NanoTime = "12".parse().unwrap();
        assert_eq!(t.as_nanos(), 12_000_000_000);
    }

    #[test]
    fn test_negative_round_trip() {
        let t = NanoTime::from_nanos(-1);
        assert_eq!(t.to_string(), "-1.999999999");
        assert_eq!(t.to_string().parse::<NanoTime>().unwrap(), t);
    }

    #[test]
    fn test_extreme_seconds_round_trip() {
        for secs in [i64::MIN, i64::MAX] {
            let t = NanoTime::from_parts(secs, 999_999_999);
            assert_eq!(t.to_string().parse::<NanoTime>().unwrap(), t);
        }
    }

    #[test]
    fn test_parse_rejects_garbage() {
        for bad in ["", ".", "1.", "abc", "1.2.3", "1.1234567890", "1.-5", "1.+5", " 1.5"] {
            assert!(bad.parse::<NanoTime>().is_err(), "accepted {bad:?}");
        }
    }

    #[test]
    fn test_signed_seconds() {
        assert_eq!(format_signed_seconds(0), "+0.000000000");
        assert_eq!(format_signed_seconds(1), "+0.000000001");
        assert_eq!(format_signed_seconds(-1_500_000_000), "-1.500000000");
    }

    #[test]
    fn test_nanos_since() {
        let a = NanoTime::from_parts(10, 0);
        let b = NanoTime::from_parts(7, 500_000_000);
        assert_eq!(a.nanos_since(b), 2_500_000_000);
        assert_eq!(b.nanos_since(a), -2_500_000_000);
    }
}
