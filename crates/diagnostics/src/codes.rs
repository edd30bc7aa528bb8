//! Diagnostic ID constants.
//!
//! Use these instead of string literals to get compile-time typo detection
//! and IDE autocomplete. Every code listed here has an entry in
//! [`crate::explain`].

/// A line calls `BinaryOut` but matches no known instruction pattern.
pub const UNRECOGNIZED_INSTRUCTION: &str = "TKS1001";

/// A numeric-looking argument could not be decoded as decimal or `0x` hex.
pub const INVALID_NUMERIC_ARGUMENT: &str = "TKS1002";

/// The feed-and-cut trailer was recognised and skipped.
pub const TRAILER_SKIPPED: &str = "TKS1003";

/// No element could be recovered from the input.
pub const NO_ELEMENTS: &str = "TKS1004";

/// A known opcode was written without its operand byte.
pub const INCOMPLETE_INSTRUCTION: &str = "TKS1005";

/// All known diagnostic codes, in numeric order.
pub const ALL: &[&str] = &[
    UNRECOGNIZED_INSTRUCTION,
    INVALID_NUMERIC_ARGUMENT,
    TRAILER_SKIPPED,
    NO_ELEMENTS,
    INCOMPLETE_INSTRUCTION,
];
