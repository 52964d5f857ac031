//! Encoding of manifest fields into pax extended-header records.
//!
//! Every manifest entry carries three private pax records next to its
//! zero-length body:
//!
//! | key             | value                              |
//! |-----------------|------------------------------------|
//! | `METATAR.size`  | `<size>` or `<size>,<hex digest>`  |
//! | `METATAR.atime` | `SECONDS.NANOSECONDS`              |
//! | `METATAR.mtime` | `SECONDS.NANOSECONDS`              |
//!
//! The `METATAR.` namespace keeps generic tar readers from reinterpreting
//! the values; a standard `size` record would change the body length.
//!
//! # Examples
//!
//! ```
//! use metatar_core::codec::ExtendedFields;
//! use metatar_core::types::NanoTime;
//!
//! let fields = ExtendedFields {
//!     size: 5,
//!     digest: Some("ab".repeat(32)),
//!     atime: NanoTime::from_parts(1_700_000_000, 1),
//!     mtime: NanoTime::from_parts(1_700_000_000, 123_456_789),
//! };
//!
//! let records = fields.encode();
//! let decoded = ExtendedFields::decode(
//!     "file.txt".as_ref(),
//!     records.iter().map(|(k, v)| (*k, v.as_bytes())),
//! )
//! .unwrap();
//! assert_eq!(decoded, fields);
//! ```

use crate::ManifestError;
use crate::Result;
use crate::types::NanoTime;
use std::path::Path;

/// Pax key for the combined size/digest field.
pub const SIZE_KEY: &str = "METATAR.size";
/// Pax key for the access time.
pub const ATIME_KEY: &str = "METATAR.atime";
/// Pax key for the modification time.
pub const MTIME_KEY: &str = "METATAR.mtime";

/// The out-of-band fields a manifest stores per entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtendedFields {
    /// Logical size of the original object.
    pub size: u64,
    /// Content digest, only for regular files.
    pub digest: Option<String>,
    /// Access time.
    pub atime: NanoTime,
    /// Modification time.
    pub mtime: NanoTime,
}

impl ExtendedFields {
    /// Encodes the fields as `(key, value)` pax records.
    #[must_use]
    pub fn encode(&self) -> Vec<(&'static str, String)> {
        vec![
            (SIZE_KEY, encode_size_digest(self.size, self.digest.as_deref())),
            (ATIME_KEY, self.atime.to_string()),
            (MTIME_KEY, self.mtime.to_string()),
        ]
    }

    /// Decodes the fields from an entry's pax records.
    ///
    /// Records with other keys are ignored. `path` names the entry in error
    /// messages only.
    ///
    /// # Errors
    ///
    /// Returns [`ManifestError::MalformedEntry`] if any of the three records
    /// is absent or cannot be parsed.
    pub fn decode<'a, I>(path: &Path, records: I) -> Result<Self>
    where
        I: IntoIterator<Item = (&'a str, &'a [u8])>,
    {
        let mut size_field = None;
        let mut atime = None;
        let mut mtime = None;

        for (key, value) in records {
            match key {
                SIZE_KEY => size_field = Some(value_str(path, key, value)?),
                ATIME_KEY => atime = Some(decode_time(path, key, value)?),
                MTIME_KEY => mtime = Some(decode_time(path, key, value)?),
                _ => {}
            }
        }

        let size_field =
            size_field.ok_or_else(|| ManifestError::malformed(path, format!("missing {SIZE_KEY}")))?;
        let (size, digest) = decode_size_digest(path, size_field)?;
        let atime = atime.ok_or_else(|| ManifestError::malformed(path, format!("missing {ATIME_KEY}")))?;
        let mtime = mtime.ok_or_else(|| ManifestError::malformed(path, format!("missing {MTIME_KEY}")))?;

        Ok(Self {
            size,
            digest,
            atime,
            mtime,
        })
    }
}

/// Packs size and optional digest as `"<size>"` or `"<size>,<digest>"`.
#[must_use]
pub fn encode_size_digest(size: u64, digest: Option<&str>) -> String {
    match digest {
        Some(digest) => format!("{size},{digest}"),
        None => size.to_string(),
    }
}

/// Splits a size/digest field on its first comma.
///
/// A field without a comma has no digest. An empty or non-hex digest is
/// rejected rather than treated as absent.
pub fn decode_size_digest(path: &Path, field: &str) -> Result<(u64, Option<String>)> {
    let (size, digest) = match field.split_once(',') {
        Some((size, digest)) => (size, Some(digest)),
        None => (field, None),
    };

    let size = size
        .parse::<u64>()
        .map_err(|_| ManifestError::malformed(path, format!("invalid size '{size}' in {SIZE_KEY}")))?;

    let digest = match digest {
        None => None,
        Some(d) if !d.is_empty() && d.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f')) => {
            Some(d.to_string())
        }
        Some(d) => {
            return Err(ManifestError::malformed(
                path,
                format!("invalid digest '{d}' in {SIZE_KEY}"),
            ));
        }
    };

    Ok((size, digest))
}

fn value_str<'a>(path: &Path, key: &str, value: &'a [u8]) -> Result<&'a str> {
    std::str::from_utf8(value)
        .map_err(|_| ManifestError::malformed(path, format!("{key} is not valid UTF-8")))
}

fn decode_time(path: &Path, key: &str, value: &[u8]) -> Result<NanoTime> {
    let text = value_str(path, key, value)?;
    text.parse()
        .map_err(|e| ManifestError::malformed(path, format!("{key}: {e}")))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn decode(records: &[(&str, &str)]) -> Result<ExtendedFields> {
        ExtendedFields::decode(
            Path::new("entry"),
            records.iter().map(|(k, v)| (*k, v.as_bytes())),
        )
    }

    #[test]
    fn test_size_without_digest() {
        assert_eq!(encode_size_digest(42, None), "42");
        let (size, digest) = decode_size_digest(Path::new("d"), "42").unwrap();
        assert_eq!(size, 42);
        assert!(digest.is_none());
    }

    #[test]
    fn test_size_with_digest_splits_on_first_comma() {
        let digest = "0123456789abcdef".repeat(4);
        let field = encode_size_digest(7, Some(&digest));
        assert_eq!(field, format!("7,{digest}"));

        let (size, decoded) = decode_size_digest(Path::new("f"), &field).unwrap();
        assert_eq!(size, 7);
        assert_eq!(decoded.as_deref(), Some(digest.as_str()));
    }

    #[test]
    fn test_empty_digest_rejected() {
        let err = decode_size_digest(Path::new("f"), "7,").unwrap_err();
        assert!(err.is_malformed());
    }

    #[test]
    fn test_second_comma_rejected() {
        assert!(decode_size_digest(Path::new("f"), "7,ab,cd").is_err());
    }

    #[test]
    fn test_bad_size_rejected() {
        assert!(decode_size_digest(Path::new("f"), "-1").is_err());
        assert!(decode_size_digest(Path::new("f"), "").is_err());
        assert!(decode_size_digest(Path::new("f"), ",abcd").is_err());
    }

    #[test]
    fn test_decode_full_record_set() {
        let fields = decode(&[
            ("path", "ignored"),
            (SIZE_KEY, "3,abc123"),
            (ATIME_KEY, "1700000000.000000001"),
            (MTIME_KEY, "1700000000.123456789"),
        ])
        .unwrap();

        assert_eq!(fields.size, 3);
        assert_eq!(fields.digest.as_deref(), Some("abc123"));
        assert_eq!(fields.atime.as_nanos(), 1_700_000_000_000_000_001);
        assert_eq!(fields.mtime.as_nanos(), 1_700_000_000_123_456_789);
    }

    #[test]
    fn test_missing_size_is_malformed() {
        let err = decode(&[(ATIME_KEY, "1.0"), (MTIME_KEY, "1.0")]).unwrap_err();
        assert!(err.is_malformed());
        assert!(err.to_string().contains(SIZE_KEY));
    }

    #[test]
    fn test_missing_time_is_malformed() {
        let err = decode(&[(SIZE_KEY, "0"), (ATIME_KEY, "1.0")]).unwrap_err();
        assert!(err.to_string().contains(MTIME_KEY));
    }

    #[test]
    fn test_bad_time_is_malformed() {
        let err = decode(&[(SIZE_KEY, "0"), (ATIME_KEY, "soon"), (MTIME_KEY, "1.0")]).unwrap_err();
        assert!(err.is_malformed());
    }

    #[test]
    fn test_encode_keys_and_order() {
        let fields = ExtendedFields {
            size: 0,
            digest: None,
            atime: NanoTime::from_parts(1, 2),
            mtime: NanoTime::from_parts(3, 4),
        };
        let records = fields.encode();
        assert_eq!(
            records,
            vec![
                (SIZE_KEY, "0".to_string()),
                (ATIME_KEY, "1.000000002".to_string()),
                (MTIME_KEY, "3.000000004".to_string()),
            ]
        );
    }
}
