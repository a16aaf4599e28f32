//! Well-known failure codes.
//!
//! Handlers are free to use any code; these are the ones the built-in
//! stages emit.

/// Emitted by the validation stage when input fails to parse.
pub const VALIDATION_ERROR: &str = "VALIDATION_ERROR";

/// Emitted by the masking and panic-guard stages.
pub const INTERNAL_ERROR: &str = "INTERNAL_ERROR";

/// Conventional code for missing or invalid credentials.
pub const UNAUTHORIZED: &str = "UNAUTHORIZED";
