//! # sympo-schema
//!
//! JSON Schema generation and validation for the documents exchanged by the
//! proceedings pipeline.
//!
//! This crate provides:
//! - `SchemaRegistry`: every document schema, keyed by name
//! - Validation of raw JSON text or values against a named schema
//! - Schema export for external tooling (`sympo schema` command, editor plugins)
//!
//! Types are defined in `sympo-core` with `#[derive(JsonSchema)]`; this crate
//! only collects and applies their schemas.

pub mod error;
pub mod registry;

pub use error::SchemaError;
pub use registry::SchemaRegistry;
