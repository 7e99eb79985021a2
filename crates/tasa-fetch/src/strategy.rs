//! Ordered fallback parsing.
//!
//! Publishers change their markup without notice. Each provider lists the
//! ways it knows to find its value, most specific first; the first strategy
//! that yields a value wins.

use tasa_types::ParseError;
use tracing::{debug, trace};

/// A named way of extracting `T` from an input, usually the page body.
pub struct Strategy<T, I: ?Sized = str> {
    /// Name reported in logs and in [`ParseError::NotFound`].
    pub name: &'static str,
    /// The extraction function.
    pub run: fn(&I) -> Option<T>,
}

impl<T, I: ?Sized> Strategy<T, I> {
    /// Creates a new strategy.
    #[must_use]
    pub const fn new(name: &'static str, run: fn(&I) -> Option<T>) -> Self {
        Self { name, run }
    }
}

impl<T, I: ?Sized> Clone for Strategy<T, I> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T, I: ?Sized> Copy for Strategy<T, I> {}

impl<T, I: ?Sized> std::fmt::Debug for Strategy<T, I> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Strategy").field("name", &self.name).finish()
    }
}

/// Runs `strategies` in order against `input`, returning the first value.
///
/// # Errors
///
/// Returns [`ParseError::NotFound`] naming every strategy tried when none
/// matches.
pub fn first_match<T, I: ?Sized>(
    provider: &str,
    expected: &str,
    input: &I,
    strategies: &[Strategy<T, I>],
) -> Result<T, ParseError> {
    for (i, strategy) in strategies.iter().enumerate() {
        if let Some(value) = (strategy.run)(input) {
            if i > 0 {
                debug!(provider, strategy = strategy.name, "matched with fallback strategy");
            } else {
                trace!(provider, strategy = strategy.name, "matched");
            }
            return Ok(value);
        }
        debug!(provider, strategy = strategy.name, "strategy found nothing");
    }
    Err(ParseError::NotFound {
        provider: provider.to_string(),
        expected: expected.to_string(),
        tried: strategies.iter().map(|s| s.name.to_string()).collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn digits(s: &str) -> Option<u32> {
        s.split_whitespace().find_map(|w| w.parse().ok())
    }

    fn length(s: &str) -> Option<u32> {
        u32::try_from(s.len()).ok().filter(|n| *n > 0)
    }

    #[test]
    fn test_first_strategy_wins() {
        let strategies = [Strategy::new("digits", digits), Strategy::new("length", length)];
        assert_eq!(first_match("test", "a number", "a 42 b", &strategies), Ok(42));
    }

    #[test]
    fn test_falls_back_in_order() {
        let strategies = [Strategy::new("digits", digits), Strategy::new("length", length)];
        assert_eq!(first_match("test", "a number", "abc", &strategies), Ok(3));
    }

    #[test]
    fn test_not_found_lists_strategies() {
        let strategies = [Strategy::new("digits", digits), Strategy::new("length", length)];
        let err = first_match("test", "a number", "", &strategies).unwrap_err();
        assert_eq!(
            err,
            ParseError::NotFound {
                provider: "test".to_string(),
                expected: "a number".to_string(),
                tried: vec!["digits".to_string(), "length".to_string()],
            }
        );
        assert_eq!(
            err.to_string(),
            "test: could not find a number (tried: digits, length)"
        );
    }
}
