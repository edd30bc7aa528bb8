pub use ticket_script_diagnostics::{Diagnostic, Severity, Span, codes, explain};
