//! Golden script tests.
//!
//! The framing and per-instruction line text is consumed verbatim by the host
//! program, so any change in generated output must be reviewed.
//!
//! To regenerate golden files after intentional changes:
//!
//! ```sh
//! UPDATE_GOLDEN=1 cargo test -p ticket_script_core golden
//! ```

mod common;

use std::path::PathBuf;
use ticket_script_core::{Alignment, FontSize, TicketElement, generate_script, parse_elements, strip_ids};

fn golden_dir() -> PathBuf {
    let mut p = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    p.push("tests");
    p.push("golden");
    p
}

/// Compare `actual` against a golden file.
///
/// * If `UPDATE_GOLDEN` env var is set, writes (or overwrites) the golden file.
/// * Otherwise, reads the golden file and asserts equality.
fn assert_golden(name: &str, actual: &str) {
    let path = golden_dir().join(format!("{}.txt", name));

    if std::env::var("UPDATE_GOLDEN")
        .ok()
        .filter(|v| !v.is_empty() && v != "0" && v != "false")
        .is_some()
    {
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, format!("{actual}\n")).unwrap();
        eprintln!("Updated golden file: {}", path.display());
        return;
    }

    let expected = std::fs::read_to_string(&path).unwrap_or_else(|_| {
        panic!(
            "Golden file not found: {}\nRun with UPDATE_GOLDEN=1 to create it.",
            path.display()
        )
    });
    assert_eq!(
        actual.trim(),
        expected.replace("\r\n", "\n").trim(),
        "Snapshot mismatch for '{}'. Run with UPDATE_GOLDEN=1 to update.",
        name
    );
}

fn recycling_ticket() -> Vec<TicketElement> {
    vec![
        TicketElement::image("logo.bin").with_align(Alignment::Center),
        TicketElement::spacing(-170).with_align(Alignment::Center),
        TicketElement::text("北斗鎮公所")
            .with_align(Alignment::Center)
            .with_bold(true)
            .with_size(FontSize::Large),
        TicketElement::text("資源回收兌換券").with_align(Alignment::Center),
        TicketElement::spacing(30),
        TicketElement::text("數量: {num}").with_bold(true),
        TicketElement::text("日期: {date}").with_align(Alignment::Right),
    ]
}

// ─── Snapshot Tests ─────────────────────────────────────────────────────────

#[test]
fn golden_recycling_ticket() {
    assert_golden(
        "recycling_ticket",
        &generate_script(&recycling_ticket()).text(),
    );
}

#[test]
fn golden_script_parses_to_its_layout() {
    let script = std::fs::read_to_string(golden_dir().join("recycling_ticket.txt")).unwrap();
    assert_eq!(
        strip_ids(&parse_elements(&script)),
        strip_ids(&recycling_ticket())
    );
}
