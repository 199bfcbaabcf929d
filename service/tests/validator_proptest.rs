//! Property-based tests for validator bounds
//!
//! These tests generate random bounds and values to check that validators
//! accept exactly the values inside their inclusive ranges.

use metamodel_introspect::validator::{LengthValidator, NumberValidator, StringValidator, Validator};
use metamodel_core::ast::ValidatorAst;
use proptest::prelude::*;
use serde_json::json;

/// Generate an ordered pair of finite bounds
fn arb_bounds() -> impl Strategy<Value = (f64, f64)> {
    (-1.0e6..1.0e6_f64, -1.0e6..1.0e6_f64).prop_map(|(a, b)| if a <= b { (a, b) } else { (b, a) })
}

proptest! {
    #[test]
    fn number_validator_accepts_exactly_the_range(
        (lower, upper) in arb_bounds(),
        value in -2.0e6..2.0e6_f64,
    ) {
        let validator = NumberValidator::new(Some(lower), Some(upper)).expect("ordered bounds");
        let inside = lower <= value && value <= upper;
        prop_assert_eq!(validator.validate("n", &json!(value)).is_ok(), inside);
    }

    #[test]
    fn number_validator_rejects_inverted_bounds((lower, upper) in arb_bounds()) {
        prop_assume!(lower < upper);
        prop_assert!(NumberValidator::new(Some(upper), Some(lower)).is_err());
    }

    #[test]
    fn open_bound_is_unbounded(lower in -1.0e6..1.0e6_f64, above in 0.0..1.0e9_f64) {
        let validator = NumberValidator::new(Some(lower), None).expect("lower bound only");
        prop_assert!(validator.validate("n", &json!(lower + above)).is_ok());
    }

    #[test]
    fn length_validator_counts_characters(
        min in 0_i64..20,
        span in 0_i64..20,
        text in "\\PC{0,50}",
    ) {
        let max = min + span;
        let validator = LengthValidator::new(Some(min), Some(max)).expect("ordered lengths");
        let length = i64::try_from(text.chars().count()).expect("short string");
        let inside = min <= length && length <= max;
        prop_assert_eq!(validator.validate("s", &json!(text)).is_ok(), inside);
    }

    #[test]
    fn anchored_pattern_accepts_only_the_literal(word in "[a-z]{1,12}", other in "[a-z]{1,12}") {
        let validator = StringValidator::new(&format!("^{word}$"), "u").expect("literal pattern");
        prop_assert!(validator.validate("w", &json!(word.clone())).is_ok());
        prop_assert_eq!(validator.validate("w", &json!(other.clone())).is_ok(), word == other);
    }

    #[test]
    fn inferred_validator_matches_explicit(lower in -1000_i64..1000, span in 0_i64..1000) {
        let inferred: ValidatorAst = serde_json::from_value(json!({ "lower": lower, "upper": lower + span }))
            .expect("validator spec");
        let explicit: ValidatorAst = serde_json::from_value(json!({
            "$class": "concerto.metamodel@1.0.0.DoubleDomainValidator",
            "lower": lower,
            "upper": lower + span
        }))
        .expect("validator spec");
        prop_assert_eq!(
            Validator::from_spec(&inferred).expect("inferred"),
            Validator::from_spec(&explicit).expect("explicit")
        );
    }
}
