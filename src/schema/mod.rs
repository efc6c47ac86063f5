//! JSON schemas for request bodies and the validator built on them

pub mod registry;
pub mod validator;

pub use registry::SchemaRegistry;
pub use validator::{FormValidator, ValidationFailure, Violation};
