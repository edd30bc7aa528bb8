//! Shared test helpers for `ticket_script_core` integration tests.

#![allow(unreachable_pub)]

use ticket_script_core::{ParseResult, TicketElement, generate_script, parse_elements, strip_ids};

// ─── Parse-result helpers ────────────────────────────────────────────────────

/// Collect diagnostic codes from a parse result.
#[allow(dead_code)]
pub fn extract_diag_codes(result: &ParseResult) -> Vec<String> {
    result
        .diagnostics
        .iter()
        .map(|d| d.id.to_string())
        .collect()
}

/// Generate, parse back, and return the recovered elements.
#[allow(dead_code)]
pub fn round_trip(elements: &[TicketElement]) -> Vec<TicketElement> {
    parse_elements(&generate_script(elements).text())
}

/// Assert that a layout survives generate → parse, ids aside.
#[allow(dead_code)]
pub fn assert_round_trip(elements: &[TicketElement]) {
    let back = round_trip(elements);
    assert_eq!(
        strip_ids(&back),
        strip_ids(elements),
        "layout did not survive a round trip:\n{}",
        generate_script(elements)
    );
}

/// Wrap element lines in the standard preamble and trailer.
#[allow(dead_code)]
pub fn framed(body: &str) -> String {
    format!(
        "Encoding BIG5 = Encoding.GetEncoding(\"big5\");\n\n\
         BinaryOut(0x1B, 0x40);  // 重置出票機\n\
         BinaryOut(0x1B, 0x02);  // 整頁模式\n\n\
         {body}\n\n\
         BinaryOut(0x1B, 0x4A, 88, 0x1D, 0x56, 0); // 切紙"
    )
}
