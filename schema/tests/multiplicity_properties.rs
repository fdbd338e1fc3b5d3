//! Property-based tests for the multiplicity grammar.

use cimrdf_schema::{parse_multiplicity, Multiplicity, UpperBound};
use proptest::prelude::*;

// =============================================================================
// Accepted forms
// =============================================================================

proptest! {
    /// "<k>" is exactly k.
    #[test]
    fn prop_single_integer_is_exact(k in 0u32..10_000) {
        let parsed = parse_multiplicity(&k.to_string()).ok();
        prop_assert_eq!(parsed, Some(Multiplicity::new(k, UpperBound::Bounded(k))));
    }

    /// "<lo>..<hi>" with lo <= hi keeps both bounds.
    #[test]
    fn prop_bounded_range(lo in 0u32..1_000, span in 0u32..1_000) {
        let hi = lo + span;
        let parsed = parse_multiplicity(&format!("{lo}..{hi}")).ok();
        prop_assert_eq!(parsed, Some(Multiplicity::new(lo, UpperBound::Bounded(hi))));
    }

    /// "<lo>..n" is unbounded above.
    #[test]
    fn prop_unbounded_range(lo in 0u32..1_000) {
        let parsed = parse_multiplicity(&format!("{lo}..n")).ok();
        prop_assert_eq!(parsed, Some(Multiplicity::new(lo, UpperBound::Unbounded)));
        prop_assert!(parsed.is_some_and(|m| m.is_list()));
    }

    /// Display output parses back to the same bounds.
    #[test]
    fn prop_display_is_parseable(lo in 0u32..100, span in 0u32..100, unbounded: bool) {
        let upper = if unbounded { UpperBound::Unbounded } else { UpperBound::Bounded(lo + span) };
        let m = Multiplicity::new(lo, upper);
        prop_assert_eq!(parse_multiplicity(&m.to_string()).ok(), Some(m));
    }
}

// =============================================================================
// Rejected forms
// =============================================================================

proptest! {
    /// Inverted ranges are compile errors.
    #[test]
    fn prop_inverted_range_rejected(hi in 0u32..1_000, gap in 1u32..1_000) {
        let lo = hi + gap;
        let text = format!("{lo}..{hi}");
        prop_assert!(parse_multiplicity(&text).is_err());
    }

    /// Anything containing a character outside digits, '.', and 'n' is rejected.
    #[test]
    fn prop_foreign_characters_rejected(text in "[0-9]{0,2}[*a-mo-zA-Z+-][0-9.]{0,3}") {
        prop_assert!(parse_multiplicity(&text).is_err());
    }

    /// Upper bound 2 or more is list-valued, 1 or less is scalar.
    #[test]
    fn prop_list_iff_upper_at_least_two(hi in 0u32..10) {
        let m = Multiplicity::new(0, UpperBound::Bounded(hi));
        prop_assert_eq!(m.is_list(), hi >= 2);
    }
}
