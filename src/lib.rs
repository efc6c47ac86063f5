//! invman: command-line client for a product inventory service
//!
//! Lists, filters, sorts and pages through products held by a REST
//! inventory service, and creates, edits and deletes them.

pub mod cli;
pub mod core;
pub mod entities;
pub mod schema;
