//! Multiplicity bounds and their textual grammar.
//!
//! ```text
//! n          → 0..unbounded
//! <lo>..n    → lo..unbounded
//! <lo>..<hi> → lo..hi
//! <k>        → k..k
//! ```

use std::fmt;

use crate::SchemaError;

/// Upper bound of a multiplicity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UpperBound {
    /// At most this many values.
    Bounded(u32),
    /// Any number of values.
    Unbounded,
}

impl UpperBound {
    /// Returns `true` if `count` does not exceed the bound.
    #[must_use]
    pub fn admits(self, count: usize) -> bool {
        match self {
            UpperBound::Bounded(max) => count <= max as usize,
            UpperBound::Unbounded => true,
        }
    }
}

impl fmt::Display for UpperBound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UpperBound::Bounded(max) => write!(f, "{max}"),
            UpperBound::Unbounded => f.write_str("n"),
        }
    }
}

/// A `(lower, upper)` cardinality bound on a property's value count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Multiplicity {
    /// Minimum number of values.
    pub lower: u32,
    /// Maximum number of values.
    pub upper: UpperBound,
}

impl Multiplicity {
    /// `0..1`, assumed for properties that declare no multiplicity.
    pub const OPTIONAL: Multiplicity = Multiplicity {
        lower: 0,
        upper: UpperBound::Bounded(1),
    };

    /// Creates a multiplicity from its bounds.
    #[must_use]
    pub const fn new(lower: u32, upper: UpperBound) -> Self {
        Self { lower, upper }
    }

    /// List-valued properties have an upper bound of two or more.
    #[must_use]
    pub fn is_list(&self) -> bool {
        match self.upper {
            UpperBound::Bounded(max) => max >= 2,
            UpperBound::Unbounded => true,
        }
    }

    /// Returns `true` if `count` values satisfy both bounds.
    #[must_use]
    pub fn admits(&self, count: usize) -> bool {
        count >= self.lower as usize && self.upper.admits(count)
    }
}

impl fmt::Display for Multiplicity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.lower, self.upper)
    }
}

/// Parses a multiplicity expression.
///
/// # Errors
///
/// Returns [`SchemaError::Compile`] for any text outside the grammar and for
/// ranges whose lower bound exceeds the upper bound.
pub fn parse_multiplicity(text: &str) -> Result<Multiplicity, SchemaError> {
    let text = text.trim();
    let malformed = || SchemaError::compile(format!("malformed multiplicity `{text}`"));
    if text == "n" {
        return Ok(Multiplicity::new(0, UpperBound::Unbounded));
    }
    if let Some((lo, hi)) = text.split_once("..") {
        let lower = parse_bound(lo).ok_or_else(malformed)?;
        let upper = if hi == "n" {
            UpperBound::Unbounded
        } else {
            UpperBound::Bounded(parse_bound(hi).ok_or_else(malformed)?)
        };
        if !upper.admits(lower as usize) {
            return Err(SchemaError::compile(format!(
                "multiplicity `{text}` has a lower bound above its upper bound"
            )));
        }
        return Ok(Multiplicity::new(lower, upper));
    }
    let exact = parse_bound(text).ok_or_else(malformed)?;
    Ok(Multiplicity::new(exact, UpperBound::Bounded(exact)))
}

fn parse_bound(digits: &str) -> Option<u32> {
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grammar_table() {
        let cases = [
            ("1", 1, UpperBound::Bounded(1)),
            ("0..1", 0, UpperBound::Bounded(1)),
            ("1..1", 1, UpperBound::Bounded(1)),
            ("0..n", 0, UpperBound::Unbounded),
            ("1..n", 1, UpperBound::Unbounded),
            ("2..5", 2, UpperBound::Bounded(5)),
            ("n", 0, UpperBound::Unbounded),
        ];
        for (text, lower, upper) in cases {
            let parsed = parse_multiplicity(text);
            assert!(
                matches!(parsed, Ok(m) if m == Multiplicity::new(lower, upper)),
                "{text} parsed as {parsed:?}"
            );
        }
    }

    #[test]
    fn rejects_forms_outside_the_grammar() {
        for text in ["", "*", "0..*", "..1", "1..", "a", "-1", "1..2..3", "5..2", "N"] {
            assert!(
                matches!(parse_multiplicity(text), Err(SchemaError::Compile(_))),
                "{text} should be rejected"
            );
        }
    }

    #[test]
    fn list_valued_iff_upper_at_least_two() {
        assert!(!Multiplicity::OPTIONAL.is_list());
        assert!(!Multiplicity::new(1, UpperBound::Bounded(1)).is_list());
        assert!(Multiplicity::new(0, UpperBound::Bounded(2)).is_list());
        assert!(Multiplicity::new(0, UpperBound::Unbounded).is_list());
    }

    #[test]
    fn admits_counts_within_bounds() {
        let m = Multiplicity::new(2, UpperBound::Bounded(5));
        assert!(!m.admits(1));
        assert!(m.admits(2));
        assert!(m.admits(5));
        assert!(!m.admits(6));
        assert_eq!(m.to_string(), "2..5");
    }
}
