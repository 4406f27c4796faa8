//! Domain layer constants

// ============================================================================
// REGISTRATION CONSTANTS
// ============================================================================

/// Names owned by the registry's management API.
///
/// A dynamic registration under one of these identifiers is rejected because
/// the generated accessors would shadow the management operations.
pub const RESERVED_SERVICE_NAMES: &[&str] = &["configure", "factories", "clear"];

/// Pattern every dynamically registered identifier must match
pub const SERVICE_IDENTIFIER_PATTERN: &str = r"^[A-Za-z_][A-Za-z0-9_]*$";

/// Number of positional values a dynamic registration call must carry
pub const REGISTRATION_ARITY: usize = 1;
