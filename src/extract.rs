//! Structured output extraction
//!
//! Models asked for JSON often wrap it in prose or markdown fences. The
//! [`BracketScanExtractor`] recovers the payload by slicing from the first
//! opening bracket to the last closing bracket (inclusive) and parsing that
//! slice.
//!
//! Known limitation: the payload must be the outermost bracketed region of
//! the response. A stray `[`/`]` (or `{`/`}`) in the surrounding prose, or
//! several JSON blocks in one response, make the slice invalid and the call
//! fails with `ExtractionError`; nothing tries to disambiguate. Callers that
//! need a stricter parser can supply their own [`StructuredExtractor`].

use serde_json::Value;

use crate::error::StudyError;

/// Recover a JSON value embedded in free-text model output.
pub trait StructuredExtractor: Send + Sync {
    /// Extract a JSON array.
    fn extract_array(&self, raw: &str) -> Result<Value, StudyError>;

    /// Extract a JSON object.
    fn extract_object(&self, raw: &str) -> Result<Value, StudyError>;
}

/// First-opening-to-last-closing bracket scan.
#[derive(Debug, Clone, Copy, Default)]
pub struct BracketScanExtractor;

impl StructuredExtractor for BracketScanExtractor {
    fn extract_array(&self, raw: &str) -> Result<Value, StudyError> {
        extract_json_array(raw)
    }

    fn extract_object(&self, raw: &str) -> Result<Value, StudyError> {
        extract_json_object(raw)
    }
}

/// Extract the JSON array spanning the first `[` to the last `]` of `raw`.
pub fn extract_json_array(raw: &str) -> Result<Value, StudyError> {
    let value = scan(raw, '[', ']')?;
    if !value.is_array() {
        return Err(StudyError::extraction("expected a JSON array", raw));
    }
    Ok(value)
}

/// Extract the JSON object spanning the first `{` to the last `}` of `raw`.
pub fn extract_json_object(raw: &str) -> Result<Value, StudyError> {
    let value = scan(raw, '{', '}')?;
    if !value.is_object() {
        return Err(StudyError::extraction("expected a JSON object", raw));
    }
    Ok(value)
}

fn scan(raw: &str, open: char, close: char) -> Result<Value, StudyError> {
    let (Some(start), Some(end)) = (raw.find(open), raw.rfind(close)) else {
        return Err(StudyError::extraction(
            format!("no '{open}'...'{close}' pair found"),
            raw,
        ));
    };
    if end < start {
        return Err(StudyError::extraction(
            format!("last '{close}' precedes first '{open}'"),
            raw,
        ));
    }

    let slice = &raw[start..=end];
    serde_json::from_str(slice).map_err(|e| {
        tracing::debug!(error = %e, "bracketed region is not valid JSON");
        StudyError::extraction(format!("bracketed region is not valid JSON: {e}"), raw)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn extracts_fenced_array() {
        let raw = "Here you go:\n```json\n[{\"question\":\"Q1\",\"answer\":\"A1\"}]\n```";
        assert_eq!(
            extract_json_array(raw).unwrap(),
            json!([{"question": "Q1", "answer": "A1"}])
        );
    }

    #[test]
    fn no_brackets_is_an_extraction_error() {
        let err = extract_json_array("no brackets here").unwrap_err();
        assert!(matches!(err, StudyError::ExtractionError { .. }));
        assert_eq!(err.raw_text(), Some("no brackets here"));
    }

    #[test]
    fn reversed_brackets_are_rejected() {
        let err = extract_json_array("] then [").unwrap_err();
        assert!(matches!(err, StudyError::ExtractionError { .. }));
    }

    #[test]
    fn invalid_slice_is_an_extraction_error() {
        let err = extract_json_array("[1, 2,, 3]").unwrap_err();
        assert!(matches!(err, StudyError::ExtractionError { .. }));
    }

    #[test]
    fn stray_bracket_in_prose_breaks_the_scan() {
        // Documented limitation: the slice runs from the stray '[' onwards.
        let raw = "See [1] for details: [{\"question\":\"Q\",\"answer\":\"A\"}]";
        assert!(extract_json_array(raw).is_err());
    }

    #[test]
    fn extracts_object_from_prose() {
        let raw = "Sure! {\"isCorrect\": true, \"score\": 1, \"explanation\": \"ok\"} Hope that helps.";
        assert_eq!(
            extract_json_object(raw).unwrap(),
            json!({"isCorrect": true, "score": 1, "explanation": "ok"})
        );
    }

    #[test]
    fn nested_array_keeps_outermost_region() {
        let raw = "```\n[[1, 2], [3]]\n```";
        assert_eq!(extract_json_array(raw).unwrap(), json!([[1, 2], [3]]));
    }

    #[test]
    fn extractor_trait_delegates() {
        let extractor = BracketScanExtractor;
        assert!(extractor.extract_array("x [1] y").unwrap().is_array());
        assert!(extractor.extract_object("x {\"a\":1} y").unwrap().is_object());
    }
}
