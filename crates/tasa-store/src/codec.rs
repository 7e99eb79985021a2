//! On-disk representation of a series.
//!
//! A series file is a single JSON object mapping period keys to numbers,
//! written in chronological order with two-space indentation and a trailing
//! newline.

use std::borrow::Cow;
use std::collections::HashSet;
use std::fmt;
use std::path::Path;

use serde::de::{self, Deserialize, Deserializer, MapAccess, Visitor};
use serde::Serialize;
use serde_json::Value;
use serde_json::ser::{PrettyFormatter, Serializer};
use tasa_types::{Granularity, PeriodKey, TimeSeries};

use crate::{Result, StoreError};

/// Serializes entries in chronological order rather than string order.
struct Chronological<'a>(&'a TimeSeries);

impl Serialize for Chronological<'_> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_map(self.0.iter())
    }
}

/// File entries in document order. Deserializing fails on a repeated key
/// instead of letting the last occurrence win.
struct RawEntries(Vec<(String, Value)>);

impl<'de> Deserialize<'de> for RawEntries {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct EntriesVisitor;

        impl<'de> Visitor<'de> for EntriesVisitor {
            type Value = RawEntries;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an object mapping period keys to numbers")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> std::result::Result<RawEntries, A::Error> {
                let mut seen = HashSet::new();
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((key, value)) = map.next_entry::<String, Value>()? {
                    if !seen.insert(key.clone()) {
                        return Err(de::Error::custom(format_args!("key '{key}' appears more than once")));
                    }
                    entries.push((key, value));
                }
                Ok(RawEntries(entries))
            }
        }

        deserializer.deserialize_map(EntriesVisitor)
    }
}

/// Encodes a series to its canonical file contents.
///
/// # Errors
///
/// Returns [`StoreError::Serialize`] if a value is NaN or infinite.
pub fn encode(series: &TimeSeries, path: &Path) -> Result<String> {
    if let Some((key, value)) = series.iter().find(|(_, v)| !v.is_finite()) {
        return Err(StoreError::Serialize {
            path: path.to_path_buf(),
            reason: format!("value for '{key}' is {value}"),
        });
    }

    let mut buf = Vec::with_capacity(series.len() * 24 + 4);
    let mut ser = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"  "));
    Chronological(series)
        .serialize(&mut ser)
        .map_err(|e| StoreError::Serialize {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
    buf.push(b'\n');

    String::from_utf8(buf).map_err(|e| StoreError::Serialize {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

/// Decodes file contents into a series of the given granularity.
///
/// # Errors
///
/// Returns [`StoreError::Malformed`] for invalid JSON, non-numeric values,
/// keys that do not parse under `granularity`, a key repeated verbatim, or
/// two spellings of one key.
pub fn decode(text: &str, granularity: Granularity, path: &Path) -> Result<TimeSeries> {
    let malformed = |reason: String| StoreError::Malformed {
        path: path.to_path_buf(),
        reason,
    };

    let RawEntries(raw) = serde_json::from_str(text).map_err(|e| malformed(e.to_string()))?;

    let mut series = TimeSeries::new();
    for (raw_key, value) in raw {
        let key = PeriodKey::parse(&raw_key, granularity)
            .map_err(|e| malformed(format!("key '{raw_key}': {e}")))?;
        let value = value
            .as_f64()
            .ok_or_else(|| malformed(format!("value for '{raw_key}' is not a number: {value}")))?;
        if series.insert(key, value).is_some() {
            return Err(malformed(format!("key '{raw_key}' duplicates '{key}'")));
        }
    }
    Ok(series)
}

/// Removes commas that directly precede a closing `}` or `]`, ignoring
/// whitespace in between and anything inside string literals.
///
/// Returns the input unchanged (borrowed) when there is nothing to strip.
#[must_use]
pub fn strip_trailing_commas(text: &str) -> Cow<'_, str> {
    let bytes = text.as_bytes();
    let mut drop = Vec::new();
    let mut in_string = false;
    let mut escaped = false;

    for (i, &b) in bytes.iter().enumerate() {
        if in_string {
            match b {
                _ if escaped => escaped = false,
                b'\\' => escaped = true,
                b'"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match b {
            b'"' => in_string = true,
            b',' => {
                let next = bytes[i + 1..].iter().find(|c| !c.is_ascii_whitespace());
                if matches!(next, Some(b'}' | b']')) {
                    drop.push(i);
                }
            }
            _ => {}
        }
    }

    if drop.is_empty() {
        return Cow::Borrowed(text);
    }

    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    for i in drop {
        out.push_str(&text[last..i]);
        last = i + 1;
    }
    out.push_str(&text[last..]);
    Cow::Owned(out)
}
