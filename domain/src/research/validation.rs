//! Response validation for stage records.
//!
//! Turning service output into a record is a two-step, `Result`-returning
//! operation:
//!
//! 1. [`extract_json_object`] finds exactly one JSON object in the text
//!    It tries the whole text, then a fenced ` ```json ` block, then the
//!    outermost `{...}`, then the first `{` that opens a complete object.
//! 2. [`parse_record`] deserializes it into the stage's typed record and
//!    checks the record's own rules through [`Validate`].
//!
//! A [`ValidationFailure`] is an ordinary return value. The pipeline answers
//! it with the stage's fallback record, it never escalates.

use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::BTreeMap;
use thiserror::Error;

/// Why a service response could not become a stage record
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationFailure {
    #[error("response contains no JSON object")]
    NoJsonObject,

    #[error("response is not valid JSON: {0}")]
    MalformedJson(String),

    #[error("response does not match the {record} schema: {detail}")]
    SchemaMismatch { record: &'static str, detail: String },

    #[error("{record}.{field} {problem}")]
    InvalidField {
        record: &'static str,
        field: &'static str,
        problem: String,
    },
}

impl ValidationFailure {
    pub fn invalid_field(
        record: &'static str,
        field: &'static str,
        problem: impl Into<String>,
    ) -> Self {
        ValidationFailure::InvalidField {
            record,
            field,
            problem: problem.into(),
        }
    }
}

/// Schema rules a record checks after deserialization
pub trait Validate {
    /// Record name used in failure messages
    const RECORD: &'static str;

    fn validate(&self) -> Result<(), ValidationFailure>;
}

/// Find the single JSON object carried by a service response.
pub fn extract_json_object(raw: &str) -> Result<Value, ValidationFailure> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ValidationFailure::NoJsonObject);
    }

    // 1. The whole response
    if let Ok(value) = serde_json::from_str::<Value>(trimmed) {
        return as_object(value);
    }

    // 2. A fenced code block; when it isn't JSON, keep looking
    let mut failure = None;
    if let Some(block) = fenced_block(trimmed) {
        match serde_json::from_str::<Value>(&block) {
            Ok(value) if value.is_object() => return Ok(value),
            Ok(_) => failure = Some(ValidationFailure::NoJsonObject),
            Err(e) => failure = Some(ValidationFailure::MalformedJson(e.to_string())),
        }
    }

    // 3. The outermost brace span
    if let Some(start) = trimmed.find('{')
        && let Some(end) = trimmed.rfind('}')
        && end > start
    {
        match serde_json::from_str::<Value>(&trimmed[start..=end]) {
            Ok(value) => return as_object(value),
            Err(e) => {
                failure.get_or_insert(ValidationFailure::MalformedJson(e.to_string()));
            }
        }
    }

    // 4. The first brace that opens a complete object
    if let Some(value) = first_embedded_object(trimmed) {
        return Ok(value);
    }

    Err(failure.unwrap_or(ValidationFailure::NoJsonObject))
}

/// First `{` in `text` that starts a well-formed JSON object, ignoring
/// whatever follows it.
fn first_embedded_object(text: &str) -> Option<Value> {
    text.match_indices('{').find_map(|(start, _)| {
        serde_json::Deserializer::from_str(&text[start..])
            .into_iter::<Value>()
            .next()
            .and_then(Result::ok)
            .filter(Value::is_object)
    })
}

fn as_object(value: Value) -> Result<Value, ValidationFailure> {
    if value.is_object() {
        Ok(value)
    } else {
        Err(ValidationFailure::NoJsonObject)
    }
}

/// Contents of the first ` ``` ` / ` ```json ` block, if any
fn fenced_block(text: &str) -> Option<String> {
    let mut in_block = false;
    let mut block = String::new();

    for line in text.lines() {
        let marker = line.trim();
        if !in_block && (marker == "```" || marker.eq_ignore_ascii_case("```json")) {
            in_block = true;
            block.clear();
        } else if in_block && marker == "```" {
            return Some(block);
        } else if in_block {
            block.push_str(line);
            block.push('\n');
        }
    }

    None
}

/// Parse and validate a record of type `T` from raw service output.
pub fn parse_record<T>(raw: &str) -> Result<T, ValidationFailure>
where
    T: DeserializeOwned + Validate,
{
    let value = extract_json_object(raw)?;
    let record: T =
        serde_json::from_value(value).map_err(|e| ValidationFailure::SchemaMismatch {
            record: T::RECORD,
            detail: e.to_string(),
        })?;
    record.validate()?;
    Ok(record)
}

pub(crate) fn require_text(
    record: &'static str,
    field: &'static str,
    value: &str,
) -> Result<(), ValidationFailure> {
    if value.trim().is_empty() {
        return Err(ValidationFailure::invalid_field(record, field, "must not be blank"));
    }
    Ok(())
}

pub(crate) fn require_list(
    record: &'static str,
    field: &'static str,
    items: &[String],
) -> Result<(), ValidationFailure> {
    if items.is_empty() {
        return Err(ValidationFailure::invalid_field(record, field, "must not be empty"));
    }
    check_entries(record, field, items)
}

/// A list the service may leave empty ("none apply"); entries must still be
/// non-blank.
pub(crate) fn check_entries(
    record: &'static str,
    field: &'static str,
    items: &[String],
) -> Result<(), ValidationFailure> {
    if items.iter().any(|item| item.trim().is_empty()) {
        return Err(ValidationFailure::invalid_field(
            record,
            field,
            "must not contain blank entries",
        ));
    }
    Ok(())
}

pub(crate) fn require_amount(
    record: &'static str,
    field: &'static str,
    amount: f64,
) -> Result<(), ValidationFailure> {
    if !amount.is_finite() || amount < 0.0 {
        return Err(ValidationFailure::invalid_field(
            record,
            field,
            format!("must be a non-negative number, got {}", amount),
        ));
    }
    Ok(())
}

pub(crate) fn require_amounts(
    record: &'static str,
    field: &'static str,
    amounts: &BTreeMap<String, f64>,
) -> Result<(), ValidationFailure> {
    if amounts.is_empty() {
        return Err(ValidationFailure::invalid_field(record, field, "must not be empty"));
    }
    for amount in amounts.values() {
        require_amount(record, field, *amount)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::research::records::{Level, MarketAnalysis, Recommendation};

    const MARKET_JSON: &str = r#"{
        "location": "Austin, TX",
        "competition_level": "medium",
        "target_customers": ["Office workers", "Students"],
        "peak_hours": ["11:30 AM - 1:30 PM"],
        "seasonal_factors": ["SXSW crowds"],
        "market_size_estimate": "500 daily customers",
        "competition_analysis": [
            {"name": "Taco Truck", "type": "Mexican", "location": "Downtown",
             "strengths": "Loyal fans", "weaknesses": "Slow lines"}
        ],
        "opportunities": ["Corporate catering"],
        "challenges": ["Summer heat"]
    }"#;

    #[test]
    fn test_extract_raw_json() {
        let value = extract_json_object(MARKET_JSON).unwrap();
        assert_eq!(value["location"], "Austin, TX");
    }

    #[test]
    fn test_extract_fenced_json() {
        let response = format!("Here is my analysis:\n```json\n{}\n```\nThanks!", MARKET_JSON);
        let value = extract_json_object(&response).unwrap();
        assert_eq!(value["competition_level"], "medium");
    }

    #[test]
    fn test_extract_embedded_braces() {
        let response = format!("Sure! {} Let me know if you need more.", MARKET_JSON);
        assert!(extract_json_object(&response).is_ok());
    }

    #[test]
    fn test_extract_rejects_non_objects() {
        assert_eq!(extract_json_object(""), Err(ValidationFailure::NoJsonObject));
        assert_eq!(
            extract_json_object("no structure here"),
            Err(ValidationFailure::NoJsonObject)
        );
        assert_eq!(extract_json_object("[1, 2, 3]"), Err(ValidationFailure::NoJsonObject));
        assert!(matches!(
            extract_json_object("result: { \"location\": }"),
            Err(ValidationFailure::MalformedJson(_))
        ));
    }

    #[test]
    fn test_non_json_fence_falls_through_to_object() {
        let response = format!(
            "Steps I followed:\n```\n1. look at {{competitors}}\n2. estimate demand\n```\nResult: {}",
            MARKET_JSON
        );
        let value = extract_json_object(&response).unwrap();
        assert_eq!(value["location"], "Austin, TX");

        let response = "```\nnot json\n```\nand nothing else";
        assert!(matches!(
            extract_json_object(response),
            Err(ValidationFailure::MalformedJson(_))
        ));
    }

    #[test]
    fn test_parse_record_normalizes_level() {
        let market: MarketAnalysis = parse_record(MARKET_JSON).unwrap();
        assert_eq!(market.competition_level, Level::Medium);
        assert_eq!(market.competition_analysis[0].cuisine, "Mexican");
    }

    #[test]
    fn test_missing_field_is_schema_mismatch() {
        let mut value: Value = serde_json::from_str(MARKET_JSON).unwrap();
        value.as_object_mut().unwrap().remove("peak_hours");
        let err = parse_record::<MarketAnalysis>(&value.to_string()).unwrap_err();
        assert!(matches!(
            err,
            ValidationFailure::SchemaMismatch { record: "market_analysis", .. }
        ));
    }

    #[test]
    fn test_nested_malformation_fails_whole_record() {
        let mut value: Value = serde_json::from_str(MARKET_JSON).unwrap();
        value["competition_analysis"][0]
            .as_object_mut()
            .unwrap()
            .remove("weaknesses");
        assert!(parse_record::<MarketAnalysis>(&value.to_string()).is_err());
    }

    #[test]
    fn test_empty_required_list_is_invalid_field() {
        let mut value: Value = serde_json::from_str(MARKET_JSON).unwrap();
        value["opportunities"] = serde_json::json!([]);
        let err = parse_record::<MarketAnalysis>(&value.to_string()).unwrap_err();
        assert_eq!(err.to_string(), "market_analysis.opportunities must not be empty");
    }

    #[test]
    fn test_unknown_recommendation_kind() {
        let json = r#"{
            "recommendation": "maybe",
            "confidence_level": "High",
            "key_strengths": ["a"], "key_risks": ["b"], "success_factors": ["c"],
            "next_steps": ["d"], "timeline_recommendation": "soon",
            "alternative_suggestions": ["e"]
        }"#;
        assert!(matches!(
            parse_record::<Recommendation>(json),
            Err(ValidationFailure::SchemaMismatch { .. })
        ));
    }

    #[test]
    fn test_negative_amount_rejected() {
        let mut amounts = BTreeMap::new();
        amounts.insert("truck".to_string(), -5.0);
        assert!(require_amounts("financial_analysis", "startup_costs", &amounts).is_err());
        assert!(require_amount("financial_analysis", "funding_requirements", f64::NAN).is_err());
        assert!(require_amount("financial_analysis", "funding_requirements", 0.0).is_ok());
    }
}
