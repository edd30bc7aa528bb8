use serde::Serialize;
use tracing::{debug, trace};

use super::diag::{Diagnostic, Span, codes};
use super::instruction::Instruction;
use super::pattern::{CALL_NAME, LineMatch, match_line};
use crate::model::TicketElement;
use crate::state::PrinterState;

/// Shorthand for building a `BTreeMap<String, String>` context from key-value pairs.
macro_rules! ctx {
    ($($k:expr => $v:expr),+ $(,)?) => {
        std::collections::BTreeMap::from([$(($k.into(), $v.into())),+])
    };
}

/// Result of parsing a script.
#[derive(Debug, Clone, Serialize)]
pub struct ParseResult {
    /// Recovered elements, in line order, each with a fresh id.
    pub elements: Vec<TicketElement>,
    /// Notes on lines that produced nothing (never fatal).
    pub diagnostics: Vec<Diagnostic>,
}

impl ParseResult {
    /// Whether nothing was recognised. Callers treat this as a failed import.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

// ─── Public API ─────────────────────────────────────────────────────────────

/// Parse a script into elements, with diagnostics for skipped lines.
///
/// Never fails: lines that do not decode are skipped.
pub fn parse_script(input: &str) -> ParseResult {
    let mut state = PrinterState::for_decoding();
    let mut elements = Vec::new();
    let mut diagnostics = Vec::new();

    let mut offset = 0usize;
    for (idx, raw) in input.split('\n').enumerate() {
        let line_start = offset;
        offset += raw.len() + 1;
        let line_no = idx + 1;
        let span = Span::new(line_start, line_start + raw.len());

        let Some(code) = instruction_text(raw) else {
            continue;
        };
        if !code.contains(CALL_NAME) {
            trace!(line = line_no, "not an instruction line, skipped");
            continue;
        }

        match match_line(code) {
            LineMatch::Instruction(Instruction::FeedAndCut(_)) => {
                diagnostics.push(
                    Diagnostic::info(
                        codes::TRAILER_SKIPPED,
                        "feed-and-cut trailer skipped",
                        Some(span),
                    )
                    .with_context(ctx!("line" => line_no.to_string())),
                );
            }
            LineMatch::Instruction(instr) => {
                state.apply(&instr);
                debug!(line = line_no, ?instr, "decoded");
                elements.extend(state.element_for(&instr));
            }
            LineMatch::Incomplete(opcode) => {
                diagnostics.push(
                    Diagnostic::warn(
                        codes::INCOMPLETE_INSTRUCTION,
                        format!("{opcode} is missing its operand byte"),
                        Some(span),
                    )
                    .with_context(ctx!("line" => line_no.to_string(), "opcode" => opcode)),
                );
            }
            LineMatch::InvalidNumber(token) => {
                diagnostics.push(
                    Diagnostic::warn(
                        codes::INVALID_NUMERIC_ARGUMENT,
                        format!("'{token}' is not a decimal or 0x-hex integer"),
                        Some(span),
                    )
                    .with_context(ctx!("line" => line_no.to_string(), "token" => token)),
                );
            }
            LineMatch::Unrecognized(bytes) => {
                let mut context = ctx!("line" => line_no.to_string());
                if let Some(bytes) = bytes {
                    let joined = bytes
                        .iter()
                        .map(u32::to_string)
                        .collect::<Vec<_>>()
                        .join(",");
                    context.insert("bytes".to_string(), joined);
                }
                diagnostics.push(
                    Diagnostic::info(
                        codes::UNRECOGNIZED_INSTRUCTION,
                        "unrecognized instruction, line ignored",
                        Some(span),
                    )
                    .with_context(context),
                );
            }
        }
    }

    if elements.is_empty() {
        diagnostics.push(Diagnostic::info(
            codes::NO_ELEMENTS,
            "no ticket elements recognised",
            None,
        ));
    }

    debug!(
        elements = elements.len(),
        diagnostics = diagnostics.len(),
        "parsed script"
    );
    ParseResult {
        elements,
        diagnostics,
    }
}

/// Parse a script and keep only the elements.
pub fn parse_elements(input: &str) -> Vec<TicketElement> {
    parse_script(input).elements
}

/// The code part of a raw line: trimmed, with any `//` comment cut off.
/// `None` for blank and comment-only lines.
///
/// The cut happens at the first `//` even inside a string literal.
fn instruction_text(raw: &str) -> Option<&str> {
    let line = raw.trim();
    if line.is_empty() || line.starts_with("//") {
        return None;
    }
    let code = match line.find("//") {
        Some(at) => line[..at].trim_end(),
        None => line,
    };
    (!code.is_empty()).then_some(code)
}
