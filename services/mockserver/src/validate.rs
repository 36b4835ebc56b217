//! Request-body field checks applied before decoding.
use crate::logic::LogicError;
use serde_json::{Map, Value};

/// Accepted top-level fields of one request body.
#[derive(Debug, Clone, Copy, Default)]
pub struct FieldSpec {
    pub required: &'static [&'static str],
    pub optional: &'static [&'static str],
    /// Accepted but stripped before decoding.
    pub ignored: &'static [&'static str],
    /// Reject fields that are in none of the lists above.
    pub reject_unknown: bool,
}

impl FieldSpec {
    fn knows(&self, field: &str) -> bool {
        self.required.contains(&field)
            || self.optional.contains(&field)
            || self.ignored.contains(&field)
    }
}

/// Check `body` against `spec` and return the object with ignored fields
/// removed.
pub fn validate_body(body: Value, spec: &FieldSpec) -> Result<Map<String, Value>, LogicError> {
    let Value::Object(mut fields) = body else {
        return Err(LogicError::Validation(
            "request body must be a JSON object".to_string(),
        ));
    };
    let missing: Vec<&str> = spec
        .required
        .iter()
        .copied()
        .filter(|field| !fields.contains_key(*field))
        .collect();
    if !missing.is_empty() {
        return Err(LogicError::Validation(format!(
            "missing required fields: {}",
            missing.join(", ")
        )));
    }
    if spec.reject_unknown {
        let mut unknown: Vec<&str> = fields
            .keys()
            .map(String::as_str)
            .filter(|field| !spec.knows(field))
            .collect();
        if !unknown.is_empty() {
            unknown.sort_unstable();
            return Err(LogicError::Validation(format!(
                "unknown fields: {}",
                unknown.join(", ")
            )));
        }
    }
    for field in spec.ignored {
        fields.remove(*field);
    }
    Ok(fields)
}
