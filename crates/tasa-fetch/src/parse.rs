//! Number, date and month normalization for Argentine publisher formats.

use chrono::NaiveDate;
use tasa_types::{ParseError, PeriodKey, month_from_name};

/// Parses a number written with `.` thousands separators and a `,` decimal
/// mark (`163.299,84`, `607,6799`, `317.800`).
///
/// Currency and percent signs and surrounding whitespace are ignored. A
/// point is always read as a thousands separator.
///
/// # Errors
///
/// Returns [`ParseError::Number`] if nothing numeric remains.
pub fn parse_decimal(s: &str) -> Result<f64, ParseError> {
    let cleaned: String = s
        .trim()
        .trim_start_matches('$')
        .trim_end_matches('%')
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '.')
        .map(|c| if c == ',' { '.' } else { c })
        .collect();

    let valid = !cleaned.is_empty()
        && cleaned.bytes().any(|b| b.is_ascii_digit())
        && cleaned
            .bytes()
            .enumerate()
            .all(|(i, b)| b.is_ascii_digit() || b == b'.' || (i == 0 && b == b'-'));
    if !valid {
        return Err(ParseError::Number(s.trim().to_string()));
    }
    cleaned
        .parse()
        .map_err(|_| ParseError::Number(s.trim().to_string()))
}

/// Parses a `DD/MM/YYYY` date.
///
/// # Errors
///
/// Returns [`ParseError::Date`] if `s` is not a valid date in that format.
pub fn parse_dmy(s: &str) -> Result<NaiveDate, ParseError> {
    NaiveDate::parse_from_str(s.trim(), "%d/%m/%Y").map_err(|_| ParseError::Date(s.trim().to_string()))
}

/// Parses a month and four-digit year written in Spanish: `Mayo/2025`,
/// `Junio 2025`, `julio de 2025`, `setiembre-2024`.
///
/// # Errors
///
/// Returns [`ParseError::Month`] for an unknown month name and
/// [`ParseError::Date`] when no four-digit year follows it.
pub fn parse_month_year(s: &str) -> Result<PeriodKey, ParseError> {
    let mut parts = s
        .split(|c: char| c == '/' || c == '-' || c.is_whitespace())
        .filter(|p| !p.is_empty() && !p.eq_ignore_ascii_case("de"));

    let name = parts.next().ok_or_else(|| ParseError::Month(s.trim().to_string()))?;
    let month = month_from_name(name).ok_or_else(|| ParseError::Month(name.to_string()))?;
    let year = parts
        .next()
        .filter(|y| y.len() == 4)
        .and_then(|y| y.parse::<i32>().ok())
        .ok_or_else(|| ParseError::Date(s.trim().to_string()))?;

    Ok(PeriodKey::month(year, month)?)
}

/// Finds the first `digits,digits%` in `text` and returns its value.
///
/// Whitespace between the number and `%` is allowed.
#[must_use]
pub fn find_percent(text: &str) -> Option<f64> {
    let bytes = text.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if !bytes[i].is_ascii_digit() {
            i += 1;
            continue;
        }
        let start = i;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        if bytes.get(i) != Some(&b',') {
            continue;
        }
        let comma = i;
        i += 1;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        if i == comma + 1 {
            continue;
        }
        let end = i;
        let mut j = i;
        while j < bytes.len() && bytes[j] == b' ' {
            j += 1;
        }
        if bytes.get(j) == Some(&b'%') {
            return parse_decimal(&text[start..end]).ok();
        }
    }
    None
}

/// Finds the first `DD/MM/YYYY` date after `marker` in `text`.
#[must_use]
pub fn find_date_after(text: &str, marker: &str) -> Option<NaiveDate> {
    let start = text.find(marker)? + marker.len();
    text[start..]
        .split_whitespace()
        .take(4)
        .find_map(|word| {
            let word = word.trim_matches(|c: char| !c.is_ascii_digit() && c != '/');
            parse_dmy(word).ok()
        })
}

/// Finds the first `<month name> <YYYY>` pair in `text`, scanning words.
#[must_use]
pub fn find_month_year(text: &str) -> Option<(PeriodKey, usize)> {
    let mut offset = 0;
    let words: Vec<(usize, &str)> = text
        .split_inclusive(char::is_whitespace)
        .map(|w| {
            let at = offset;
            offset += w.len();
            (at, w.trim())
        })
        .collect();

    words.windows(2).find_map(|pair| {
        let (at, name) = pair[0];
        let (_, year) = pair[1];
        let name = name.trim_matches(|c: char| !c.is_alphabetic());
        let year = year.trim_matches(|c: char| !c.is_ascii_digit());
        month_from_name(name)?;
        if year.len() != 4 {
            return None;
        }
        parse_month_year(&format!("{name} {year}"))
            .ok()
            .map(|key| (key, at))
    })
}
