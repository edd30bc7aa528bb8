/// Recursive-descent reader for one call expression.
pub mod call;
/// Re-exports from the diagnostics crate.
pub mod diag;
/// JSON serialization helpers for element sequences.
pub mod dump;
/// Script generator: elements to instruction lines.
pub mod emit;
/// The instruction vocabulary shared by generator and parser.
pub mod instruction;
/// Script lexer: one line into borrowed tokens.
pub mod lexer;
/// Opcode bytes and operand encodings.
pub mod opcode;
/// Script parser: instruction lines back to elements.
pub mod parser;
/// Line recognizers tried in priority order.
pub mod pattern;
