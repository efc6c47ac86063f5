//! Product form validation against the embedded JSON schema
//!
//! Runs before any create or update call so malformed input is rejected
//! without a round trip to the inventory service.

use miette::Diagnostic;
use thiserror::Error;

use crate::entities::ProductForm;
use crate::schema::registry::{SchemaRegistry, PRODUCT_FORM};

/// A single rejected field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// Field name, or empty for the form as a whole
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.field.is_empty() {
            write!(f, "{}", self.message)
        } else {
            write!(f, "{}: {}", self.field, self.message)
        }
    }
}

/// Form input rejected before submission
#[derive(Debug, Error, Diagnostic)]
#[error("invalid product form ({} problem(s)): {}", .violations.len(), summarize(.violations))]
#[diagnostic(
    code(invman::validation),
    help("name and category must be non-blank; price and stock must not be negative")
)]
pub struct ValidationFailure {
    violations: Vec<Violation>,
}

fn summarize(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

impl ValidationFailure {
    pub fn new(violations: Vec<Violation>) -> Self {
        Self { violations }
    }

    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    pub fn violation_count(&self) -> usize {
        self.violations.len()
    }

    /// Whether a specific field was rejected
    pub fn has_field(&self, field: &str) -> bool {
        self.violations.iter().any(|v| v.field == field)
    }
}

/// Validates product forms against `schemas/product-form.schema.json`
pub struct FormValidator {
    validator: Option<jsonschema::Validator>,
}

impl FormValidator {
    pub fn new() -> Self {
        let registry = SchemaRegistry::new();
        let validator = registry
            .get(PRODUCT_FORM)
            .and_then(|source| serde_json::from_str::<serde_json::Value>(source).ok())
            .and_then(|schema| match jsonschema::validator_for(&schema) {
                Ok(v) => Some(v),
                Err(e) => {
                    tracing::error!(error = %e, "product form schema does not compile");
                    None
                }
            });
        Self { validator }
    }

    /// Check a form; every violated field is reported, not just the first
    pub fn validate(&self, form: &ProductForm) -> Result<(), ValidationFailure> {
        let Some(validator) = &self.validator else {
            return Err(ValidationFailure::new(vec![Violation {
                field: String::new(),
                message: "product form schema is unavailable".to_string(),
            }]));
        };

        let instance = serde_json::to_value(form).map_err(|e| {
            ValidationFailure::new(vec![Violation {
                field: String::new(),
                message: e.to_string(),
            }])
        })?;

        let violations: Vec<Violation> = validator
            .iter_errors(&instance)
            .map(|error| Violation {
                field: error
                    .instance_path
                    .to_string()
                    .trim_start_matches('/')
                    .to_string(),
                message: error.to_string(),
            })
            .collect();

        if violations.is_empty() {
            Ok(())
        } else {
            tracing::warn!(count = violations.len(), "product form rejected");
            Err(ValidationFailure::new(violations))
        }
    }
}

impl Default for FormValidator {
    fn default() -> Self {
        Self::new()
    }
}
