//! Utility panel: character counting and body-mass index.
//!
//! Everything here is a pure function of its inputs.

use crate::error::UtilityError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UtilityMode {
    CharCount,
    Bmi,
}

impl UtilityMode {
    pub fn from_wire(s: &str) -> Result<Self, UtilityError> {
        match s {
            "chars" => Ok(UtilityMode::CharCount),
            "bmi" => Ok(UtilityMode::Bmi),
            other => Err(UtilityError::UnknownMode(other.to_string())),
        }
    }

    pub fn wire(&self) -> &'static str {
        match self {
            UtilityMode::CharCount => "chars",
            UtilityMode::Bmi => "bmi",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            UtilityMode::CharCount => "character count",
            UtilityMode::Bmi => "BMI",
        }
    }
}

/// Inputs for one execution. Only the active mode's fields exist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UtilityRequest {
    CharCount { text: String },
    Bmi { height: String, weight: String },
}

impl UtilityRequest {
    pub fn mode(&self) -> UtilityMode {
        match self {
            UtilityRequest::CharCount { .. } => UtilityMode::CharCount,
            UtilityRequest::Bmi { .. } => UtilityMode::Bmi,
        }
    }
}

/// Body-mass index, already rounded to one decimal place.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bmi(pub f64);

impl std::fmt::Display for Bmi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.1}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum UtilityOutcome {
    CharCount(usize),
    Bmi(Bmi),
}

impl UtilityOutcome {
    /// The bare value as displayed.
    pub fn value(&self) -> String {
        match self {
            UtilityOutcome::CharCount(n) => n.to_string(),
            UtilityOutcome::Bmi(b) => b.to_string(),
        }
    }
}

impl std::fmt::Display for UtilityOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UtilityOutcome::CharCount(n) => write!(f, "Character count: {n}"),
            UtilityOutcome::Bmi(b) => write!(f, "BMI: {b}"),
        }
    }
}

/// Number of Unicode scalar values in `text`.
pub fn count_characters(text: &str) -> Result<usize, UtilityError> {
    if text.is_empty() {
        return Err(UtilityError::EmptyText);
    }
    Ok(text.chars().count())
}

fn parse_whole(raw: &str, field: &'static str) -> Result<i64, UtilityError> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| UtilityError::NotANumber { field })
}

/// `weight_kg / (height_cm / 100)^2`, rounded half away from zero to one decimal.
pub fn compute_bmi(height: &str, weight: &str) -> Result<Bmi, UtilityError> {
    if height.is_empty() || weight.is_empty() {
        return Err(UtilityError::MissingFields);
    }
    let height_cm = parse_whole(height, "Height")?;
    let weight_kg = parse_whole(weight, "Weight")?;
    if height_cm == 0 {
        return Err(UtilityError::ZeroHeight);
    }

    let meters = height_cm as f64 / 100.0;
    let raw = weight_kg as f64 / (meters * meters);
    Ok(Bmi((raw * 10.0).round() / 10.0))
}

pub fn run(request: &UtilityRequest) -> Result<UtilityOutcome, UtilityError> {
    match request {
        UtilityRequest::CharCount { text } => count_characters(text).map(UtilityOutcome::CharCount),
        UtilityRequest::Bmi { height, weight } => compute_bmi(height, weight).map(UtilityOutcome::Bmi),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;

    #[test]
    fn test_count_hello() {
        assert_eq!(count_characters("hello"), Ok(5));
    }

    #[test]
    fn test_count_empty_is_error() {
        assert_eq!(count_characters(""), Err(UtilityError::EmptyText));
    }

    #[rstest]
    #[case("こんにちは", 5)]
    #[case("naïve", 5)]
    #[case("🦀", 1)]
    #[case(" ", 1)]
    fn test_count_is_scalar_values(#[case] input: &str, #[case] expected: usize) {
        assert_eq!(count_characters(input), Ok(expected));
    }

    #[test]
    fn test_bmi_reference_value() {
        let bmi = compute_bmi("170", "65").unwrap();
        assert_eq!(bmi.to_string(), "22.5");
    }

    #[rstest]
    #[case("", "60")]
    #[case("170", "")]
    #[case("", "")]
    fn test_bmi_missing_fields(#[case] h: &str, #[case] w: &str) {
        assert_eq!(compute_bmi(h, w), Err(UtilityError::MissingFields));
    }

    #[rstest]
    #[case("abc", "60", "Height")]
    #[case("170", "sixty", "Weight")]
    #[case("170.5", "60", "Height")]
    #[case(" ", "60", "Height")]
    fn test_bmi_non_numeric(#[case] h: &str, #[case] w: &str, #[case] field: &'static str) {
        assert_eq!(compute_bmi(h, w), Err(UtilityError::NotANumber { field }));
    }

    #[test]
    fn test_bmi_zero_height_is_validation_error() {
        assert_eq!(compute_bmi("0", "60"), Err(UtilityError::ZeroHeight));
    }

    #[test]
    fn test_bmi_tolerates_surrounding_whitespace() {
        assert_eq!(compute_bmi(" 170 ", "65\n").unwrap().to_string(), "22.5");
    }

    #[test]
    fn test_bmi_always_one_decimal() {
        // 100 / 2.0^2 = 25 exactly
        assert_eq!(compute_bmi("200", "100").unwrap().to_string(), "25.0");
    }

    #[rstest]
    // 1 / 2.0^2 = 0.25 -> 2.5 tenths, away from zero gives 0.3 (half-even would give 0.2)
    #[case("200", "1", "0.3")]
    // 3 / 2.0^2 = 0.75 -> 7.5 tenths, rounds up to 0.8 (truncation would give 0.7)
    #[case("200", "3", "0.8")]
    // -1 / 2.0^2 = -0.25 -> away from zero is -0.3
    #[case("200", "-1", "-0.3")]
    fn test_bmi_half_rounds_away_from_zero(#[case] h: &str, #[case] w: &str, #[case] shown: &str) {
        assert_eq!(compute_bmi(h, w).unwrap().to_string(), shown);
    }

    #[test]
    fn test_bmi_negative_height_is_not_bounded() {
        // (-1.7)^2 == 1.7^2, so only zero is guarded
        assert_eq!(compute_bmi("-170", "65").unwrap().to_string(), "22.5");
    }

    #[test]
    fn test_mode_wire_roundtrip() {
        for mode in [UtilityMode::CharCount, UtilityMode::Bmi] {
            assert_eq!(UtilityMode::from_wire(mode.wire()), Ok(mode));
        }
        assert!(matches!(UtilityMode::from_wire("bogus"), Err(UtilityError::UnknownMode(_))));
    }

    #[test]
    fn test_run_dispatches_by_mode() {
        let chars = UtilityRequest::CharCount { text: "hello".into() };
        assert_eq!(chars.mode(), UtilityMode::CharCount);
        assert_eq!(run(&chars).unwrap().to_string(), "Character count: 5");

        let bmi = UtilityRequest::Bmi { height: "170".into(), weight: "65".into() };
        assert_eq!(bmi.mode(), UtilityMode::Bmi);
        assert_eq!(run(&bmi).unwrap().value(), "22.5");
    }

    proptest! {
        #[test]
        fn prop_count_matches_chars(s in "\\PC{1,64}") {
            prop_assert_eq!(count_characters(&s).unwrap(), s.chars().count());
        }

        #[test]
        fn prop_bmi_is_idempotent(h in 1i64..300, w in 1i64..500) {
            let (hs, ws) = (h.to_string(), w.to_string());
            prop_assert_eq!(compute_bmi(&hs, &ws), compute_bmi(&hs, &ws));
        }

        #[test]
        fn prop_bmi_has_one_decimal(h in 1i64..300, w in 0i64..500) {
            let shown = compute_bmi(&h.to_string(), &w.to_string()).unwrap().to_string();
            let decimals = shown.split('.').nth(1).map(str::len);
            prop_assert_eq!(decimals, Some(1));
        }
    }
}
