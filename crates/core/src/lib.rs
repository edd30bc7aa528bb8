//! Ticket script core library.
//!
//! Translates between a ticket layout (an ordered list of text, image and
//! spacing elements) and the host-language instruction script that drives
//! the ticket printer. [`generate_script`] goes one way, [`parse_script`] the
//! other; both run the same [`PrinterState`] transitions so that parsing a
//! generated script recovers the layout.

#![warn(missing_docs)]

/// Ticket element model.
pub mod model;
/// `{name}` placeholder helpers.
pub mod placeholder;
/// Script vocabulary, lexer, generator and parser.
pub mod script;
/// Printer state machine shared by both directions.
pub mod state;

// ── Convenience re-exports ──────────────────────────────────────────────────
// Flat imports for the most common entry points. The full module paths
// remain available for less common types.

// Model
pub use model::{Alignment, ElementKind, ElementType, FontSize, TicketElement, strip_ids};

// Generator
pub use script::emit::{Script, ScriptLine, generate_script, render_instruction};

// Parser
pub use script::parser::{ParseResult, parse_elements, parse_script};

// Instructions
pub use script::instruction::{Instruction, StringLiteral};

// State
pub use state::PrinterState;

// Diagnostics (re-exported from the diagnostics crate)
pub use script::diag::{Diagnostic, Severity, Span, codes, explain};

// Serialization helpers
pub use script::dump::to_pretty_json;
