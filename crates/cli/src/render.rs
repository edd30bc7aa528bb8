//! Terminal and JSON output for parser diagnostics.
//!
//! Spanned diagnostics become ariadne reports underlining the offending
//! `BinaryOut` line, labelled with what the parser saw there: the opcode
//! missing an operand, the bad numeric token, or the bytes that decoded to
//! nothing. The empty-result note has no span and prints as one line.

use std::io::{self, IsTerminal};

use ariadne::{Color, Config, Fmt, Label, Report, ReportKind, Source};
use ticket_script_diagnostics::{Diagnostic, Severity, codes};

// ── Output format ───────────────────────────────────────────────────────

/// How command results and diagnostics are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Format {
    /// Coloured, source-annotated output (ariadne).
    Pretty,
    /// Machine-readable JSON.
    Json,
}

impl Format {
    /// The explicit `--output` choice, else pretty on a terminal and JSON
    /// when piped.
    pub(crate) fn resolve_or_detect(explicit: Option<&str>) -> Self {
        match explicit {
            Some("json") => Format::Json,
            Some("pretty") => Format::Pretty,
            _ if io::stdout().is_terminal() => Format::Pretty,
            _ => Format::Json,
        }
    }
}

// ── Labels ──────────────────────────────────────────────────────────────

/// The parser only warns or notes; anything that is not a warning reads as
/// a note.
fn is_warning(diag: &Diagnostic) -> bool {
    diag.severity == Severity::Warn
}

fn context<'d>(diag: &'d Diagnostic, key: &str) -> Option<&'d str> {
    diag.context.as_ref()?.get(key).map(String::as_str)
}

/// Label for the underlined line, phrased from the parser's context.
fn line_label(diag: &Diagnostic) -> String {
    match diag.id.as_ref() {
        codes::INCOMPLETE_INSTRUCTION => match context(diag, "opcode") {
            Some(op) => format!("`{op}` needs one more byte"),
            None => diag.message.clone(),
        },
        codes::INVALID_NUMERIC_ARGUMENT => match context(diag, "token") {
            Some(tok) => format!("`{tok}` is not a byte value"),
            None => diag.message.clone(),
        },
        codes::UNRECOGNIZED_INSTRUCTION => match context(diag, "bytes") {
            Some(bytes) => format!("bytes [{bytes}] match no instruction"),
            None => "arguments are not a known instruction shape".to_string(),
        },
        codes::TRAILER_SKIPPED => "printed by the generator after the last element".to_string(),
        _ => diag.message.clone(),
    }
}

// ── Rendering ───────────────────────────────────────────────────────────

fn render_pretty(source: &str, filename: &str, diagnostics: &[Diagnostic]) {
    let mut cache = (filename, Source::from(source));

    for diag in diagnostics {
        let (kind, color) = if is_warning(diag) {
            (ReportKind::Warning, Color::Yellow)
        } else {
            (ReportKind::Advice, Color::Blue)
        };

        let Some(span) = diag.span else {
            let tag = if is_warning(diag) { "warning" } else { "note" };
            eprintln!("{tag}[{}]: {}", diag.id, diag.message);
            if let Some(help) = diag.explain() {
                eprintln!("  = help: {help}");
            }
            continue;
        };

        let start = span.start.min(source.len());
        let end = span.end.min(source.len()).max(start);
        let mut report = Report::build(kind, (filename, start..end))
            .with_config(Config::default())
            .with_code(diag.id.as_ref())
            .with_message(&diag.message)
            .with_label(
                Label::new((filename, start..end))
                    .with_message(line_label(diag))
                    .with_color(color),
            );
        // Only warnings carry the long explanation.
        if is_warning(diag)
            && let Some(help) = diag.explain()
        {
            report = report.with_help(help);
        }
        report.finish().eprint(&mut cache).ok();
    }
}

/// Write diagnostics: ariadne reports to stderr, or a JSON array to stdout.
pub(crate) fn render_diagnostics(
    source: &str,
    filename: &str,
    diagnostics: &[Diagnostic],
    format: Format,
) {
    match format {
        Format::Pretty => render_pretty(source, filename, diagnostics),
        Format::Json => {
            let json = serde_json::to_string_pretty(diagnostics)
                .expect("Diagnostic serialization cannot fail");
            println!("{json}");
        }
    }
}

/// Print `N warnings, M notes` to stderr; nothing when there are none.
pub(crate) fn print_summary(diagnostics: &[Diagnostic]) {
    let warnings = diagnostics.iter().filter(|d| is_warning(d)).count();
    let notes = diagnostics.len() - warnings;

    let mut parts = Vec::new();
    if warnings > 0 {
        let s = if warnings == 1 { "" } else { "s" };
        parts.push(format!("{}", format!("{warnings} warning{s}").fg(Color::Yellow)));
    }
    if notes > 0 {
        let s = if notes == 1 { "" } else { "s" };
        parts.push(format!("{}", format!("{notes} note{s}").fg(Color::Blue)));
    }
    if !parts.is_empty() {
        eprintln!("{}", parts.join(", "));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use ticket_script_diagnostics::Span;

    fn diag(id: &'static str, severity: Severity, ctx: &[(&str, &str)]) -> Diagnostic {
        let context: BTreeMap<String, String> = ctx
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Diagnostic::new(id, severity, "message", Some(Span::new(0, 1))).with_context(context)
    }

    #[test]
    fn incomplete_label_names_the_opcode() {
        let d = diag(
            codes::INCOMPLETE_INSTRUCTION,
            Severity::Warn,
            &[("line", "3"), ("opcode", "ESC a")],
        );
        assert_eq!(line_label(&d), "`ESC a` needs one more byte");
    }

    #[test]
    fn unrecognized_label_shows_decoded_bytes() {
        let d = diag(
            codes::UNRECOGNIZED_INSTRUCTION,
            Severity::Info,
            &[("line", "7"), ("bytes", "0x1B,0x70")],
        );
        assert_eq!(line_label(&d), "bytes [0x1B,0x70] match no instruction");
        let d = diag(codes::UNRECOGNIZED_INSTRUCTION, Severity::Info, &[("line", "7")]);
        assert_eq!(line_label(&d), "arguments are not a known instruction shape");
    }

    #[test]
    fn invalid_number_label_quotes_the_token() {
        let d = diag(
            codes::INVALID_NUMERIC_ARGUMENT,
            Severity::Warn,
            &[("line", "1"), ("token", "1O")],
        );
        assert_eq!(line_label(&d), "`1O` is not a byte value");
    }

    #[test]
    fn only_warn_counts_as_warning() {
        assert!(is_warning(&diag(codes::INCOMPLETE_INSTRUCTION, Severity::Warn, &[])));
        assert!(!is_warning(&diag(codes::TRAILER_SKIPPED, Severity::Info, &[])));
    }
}
