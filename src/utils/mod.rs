//! Field validation shared by the transfer objects.

use serde_json::{json, Value};

/// Types that can report field-level validation failures.
///
/// Each failure is a `{"field": .., "error": ..}` object; an empty vec means
/// the value is acceptable.
pub trait Validate {
    fn validate(&self) -> Vec<Value>;
}

/// Collects failures for one payload.
#[derive(Debug, Default)]
pub struct Checks {
    failures: Vec<Value>,
}

impl Checks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Non-blank text of at most `max` characters.
    pub fn required_text(mut self, field: &str, value: &str, max: usize) -> Self {
        if value.trim().is_empty() {
            self.failures
                .push(json!({ "field": field, "error": "required" }));
        } else if value.chars().count() > max {
            self.failures
                .push(json!({ "field": field, "error": "too_long", "max": max }));
        }
        self
    }

    /// Absent, or at most `max` characters.
    pub fn optional_text(mut self, field: &str, value: Option<&str>, max: usize) -> Self {
        if let Some(value) = value {
            if value.chars().count() > max {
                self.failures
                    .push(json!({ "field": field, "error": "too_long", "max": max }));
            }
        }
        self
    }

    pub fn range(mut self, field: &str, value: i64, min: i64, max: i64) -> Self {
        if value < min || value > max {
            self.failures.push(
                json!({ "field": field, "error": "out_of_range", "min": min, "max": max }),
            );
        }
        self
    }

    /// Absent, or a usable row id.
    pub fn optional_id(mut self, field: &str, value: Option<i64>) -> Self {
        if matches!(value, Some(id) if id < 1) {
            self.failures
                .push(json!({ "field": field, "error": "invalid_id" }));
        }
        self
    }

    pub fn finish(self) -> Vec<Value> {
        self.failures
    }
}
