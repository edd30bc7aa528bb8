//! Script generator: element sequence → instruction lines.
//!
//! Each element is lowered to [`Instruction`]s against a fresh
//! [`PrinterState`], so only the state changes an element actually needs
//! are written. Rendering an instruction to its line text is a separate,
//! table-like step ([`render_instruction`]).

use serde::Serialize;
use tracing::debug;

use super::instruction::{Instruction, StringLiteral};
use super::opcode::{
    self, ALIGN, BOLD, CHAR_SIZE, CUT, ESC, FEED, GS, PAGE_MODE, RESET, RETRACT, TRAILER_CUT_MODE,
    TRAILER_FEED,
};
use super::pattern::{CALL_NAME, FILE_READER, PATH_JOIN, TEXT_ENCODER};
use crate::model::{Alignment, ElementKind, FontSize, TicketElement, image_load_name};
use crate::state::PrinterState;

/// Folder expression the host program resolves image names against.
pub const IMAGE_FOLDER: &str = "GlobalVariable.TicketLogoFolder";

// ── Output types ────────────────────────────────────────────────────────

/// One line of generated script.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScriptLine {
    /// Line text, without a trailing newline.
    pub text: String,
    /// Id of the element that produced the line; `None` for framing lines.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub element_id: Option<String>,
}

/// A generated script.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Script {
    /// Lines in output order.
    pub lines: Vec<ScriptLine>,
}

impl Script {
    /// Lines joined with `\n`.
    pub fn text(&self) -> String {
        let mut out = String::new();
        for (i, line) in self.lines.iter().enumerate() {
            if i > 0 {
                out.push('\n');
            }
            out.push_str(&line.text);
        }
        out
    }

    /// Lines produced by the element with `id`.
    pub fn lines_for<'s>(&'s self, id: &'s str) -> impl Iterator<Item = &'s ScriptLine> + 's {
        self.lines
            .iter()
            .filter(move |l| l.element_id.as_deref() == Some(id))
    }
}

impl std::fmt::Display for Script {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.text())
    }
}

// ── Public API ──────────────────────────────────────────────────────────

/// Generate the script for an element sequence.
///
/// Total and deterministic: every call starts from a fresh printer state.
pub fn generate_script(elements: &[TicketElement]) -> Script {
    let mut w = Writer {
        state: PrinterState::for_encoding(),
        lines: Vec::new(),
    };

    w.push_framing(Instruction::SelectCharset);
    w.blank();
    w.push_framing(Instruction::Reset);
    w.push_framing(Instruction::PageMode);
    w.blank();

    for el in elements {
        lower_element(&mut w, el);
    }

    w.blank();
    w.push_framing(Instruction::FeedAndCut(TRAILER_FEED));

    debug!(
        elements = elements.len(),
        lines = w.lines.len(),
        "generated script"
    );
    Script { lines: w.lines }
}

/// Render one instruction as a script line.
pub fn render_instruction(instr: &Instruction) -> String {
    let h = opcode::hex;
    match instr {
        Instruction::SelectCharset => {
            "Encoding BIG5 = Encoding.GetEncoding(\"big5\");".to_string()
        }
        Instruction::Reset => format!("{CALL_NAME}({}, {});  // 重置出票機", h(ESC), h(RESET)),
        Instruction::PageMode => {
            format!("{CALL_NAME}({}, {});  // 整頁模式", h(ESC), h(PAGE_MODE))
        }
        Instruction::SetAlignment(a) => format!(
            "{CALL_NAME}({}, {}, {});  // {}",
            h(ESC),
            h(ALIGN),
            h(opcode::alignment_byte(*a)),
            alignment_label(*a)
        ),
        Instruction::SetBold(on) => format!(
            "{CALL_NAME}({}, {}, {}); //{}",
            h(ESC),
            h(BOLD),
            h(opcode::bold_byte(*on)),
            if *on { "加粗" } else { "取消加粗" }
        ),
        Instruction::SetFontSize(size) => {
            let line = format!(
                "{CALL_NAME}({}, {}, {});",
                h(GS),
                h(CHAR_SIZE),
                h(opcode::font_size_byte(*size))
            );
            match size {
                FontSize::Normal => format!("{line} //文字大小恢復"),
                FontSize::Large => line,
            }
        }
        Instruction::Feed(n) => format!("{CALL_NAME}({}, {}, {n});", h(ESC), h(FEED)),
        Instruction::Retract(n) => format!(
            "{CALL_NAME}({}, {}, {n});   // 重新對齊圖框起始位置 (Overlay)",
            h(ESC),
            h(RETRACT)
        ),
        Instruction::Text {
            literal,
            size: Some(size),
        } => format!(
            "{CALL_NAME}({}, {}, {}, {}({}));",
            h(GS),
            h(CHAR_SIZE),
            h(opcode::font_size_byte(*size)),
            TEXT_ENCODER,
            literal.render()
        ),
        Instruction::Text {
            literal,
            size: None,
        } => format!("{CALL_NAME}({TEXT_ENCODER}({}));", literal.render()),
        Instruction::LoadImage { file_name } => format!(
            "{CALL_NAME}({FILE_READER}({PATH_JOIN}({IMAGE_FOLDER}, \"{file_name}\")));  // 載入圖片"
        ),
        Instruction::FeedAndCut(n) => format!(
            "{CALL_NAME}({}, {}, {n}, {}, {}, {TRAILER_CUT_MODE}); // 切紙",
            h(ESC),
            h(FEED),
            h(GS),
            h(CUT)
        ),
    }
}

fn alignment_label(a: Alignment) -> &'static str {
    match a {
        Alignment::Left => "文字置左",
        Alignment::Center => "文字置中",
        Alignment::Right => "文字置右",
    }
}

// ── Lowering ────────────────────────────────────────────────────────────

struct Writer {
    state: PrinterState,
    lines: Vec<ScriptLine>,
}

impl Writer {
    fn push(&mut self, instr: Instruction, id: &str) {
        self.state.apply(&instr);
        self.lines.push(ScriptLine {
            text: render_instruction(&instr),
            element_id: Some(id.to_string()),
        });
    }

    fn push_opt(&mut self, instr: Option<Instruction>, id: &str) {
        if let Some(instr) = instr {
            self.push(instr, id);
        }
    }

    /// Framing lines leave the encoder state alone: the reset in the
    /// preamble must not make the first element's alignment look known.
    fn push_framing(&mut self, instr: Instruction) {
        self.lines.push(ScriptLine {
            text: render_instruction(&instr),
            element_id: None,
        });
    }

    fn blank(&mut self) {
        self.lines.push(ScriptLine {
            text: String::new(),
            element_id: None,
        });
    }
}

fn lower_element(w: &mut Writer, el: &TicketElement) {
    let id = el.id.as_str();
    // An overlay moves the print head back; re-send the alignment so the
    // overprinted content starts from a known position.
    let align = w.state.align_instruction(el.align, el.is_overlay());
    w.push_opt(align, id);

    match &el.kind {
        ElementKind::Spacing { spacing_height } => {
            let h = *spacing_height;
            if h > 0 {
                w.push(Instruction::Feed(h.unsigned_abs()), id);
            } else if h < 0 {
                w.push(Instruction::Retract(h.unsigned_abs()), id);
            }
        }
        ElementKind::Image { variable_name, .. } => {
            let file_name = image_load_name(variable_name.as_deref()).to_string();
            w.push(Instruction::LoadImage { file_name }, id);
        }
        ElementKind::Text { content } => {
            let literal = StringLiteral::from_content(content);
            match el.size {
                FontSize::Large => {
                    let bold = w.state.bold_instruction(el.is_bold);
                    w.push_opt(bold, id);
                    w.push(
                        Instruction::Text {
                            literal,
                            size: Some(FontSize::Large),
                        },
                        id,
                    );
                }
                FontSize::Normal => {
                    let reset = w.state.size_reset_instruction(FontSize::Normal);
                    w.push_opt(reset, id);
                    let bold = w.state.bold_instruction(el.is_bold);
                    w.push_opt(bold, id);
                    w.push(
                        Instruction::Text {
                            literal,
                            size: None,
                        },
                        id,
                    );
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::FALLBACK_IMAGE_NAME;

    #[test]
    fn empty_layout_is_framing_only() {
        let script = generate_script(&[]);
        assert_eq!(
            script.text(),
            "Encoding BIG5 = Encoding.GetEncoding(\"big5\");\n\
             \n\
             BinaryOut(0x1B, 0x40);  // 重置出票機\n\
             BinaryOut(0x1B, 0x02);  // 整頁模式\n\
             \n\
             \n\
             BinaryOut(0x1B, 0x4A, 88, 0x1D, 0x56, 0); // 切紙"
        );
        assert!(script.lines.iter().all(|l| l.element_id.is_none()));
    }

    #[test]
    fn large_bold_centered_text() {
        let el = TicketElement::text("北斗鎮公所")
            .with_align(Alignment::Center)
            .with_bold(true)
            .with_size(FontSize::Large);
        let script = generate_script(std::slice::from_ref(&el));
        let lines: Vec<&str> = script.lines_for(&el.id).map(|l| l.text.as_str()).collect();
        assert_eq!(
            lines,
            vec![
                "BinaryOut(0x1B, 0x61, 0x01);  // 文字置中",
                "BinaryOut(0x1B, 0x45, 0x01); //加粗",
                "BinaryOut(0x1D, 0x21, 0x01, BIG5.GetBytes(\"北斗鎮公所\"));",
            ]
        );
    }

    #[test]
    fn normal_after_large_resets_size_before_bold() {
        let a = TicketElement::text("A").with_size(FontSize::Large);
        let b = TicketElement::text("B").with_bold(true);
        let script = generate_script(&[a, b.clone()]);
        let lines: Vec<&str> = script.lines_for(&b.id).map(|l| l.text.as_str()).collect();
        assert_eq!(
            lines,
            vec![
                "BinaryOut(0x1D, 0x21, 0x00); //文字大小恢復",
                "BinaryOut(0x1B, 0x45, 0x01); //加粗",
                "BinaryOut(BIG5.GetBytes(\"B\"));",
            ]
        );
    }

    #[test]
    fn overlay_forces_alignment() {
        let el = TicketElement::spacing(-170);
        let script = generate_script(std::slice::from_ref(&el));
        let lines: Vec<&str> = script.lines_for(&el.id).map(|l| l.text.as_str()).collect();
        assert_eq!(
            lines,
            vec![
                "BinaryOut(0x1B, 0x61, 0x00);  // 文字置左",
                "BinaryOut(0x1B, 0x4B, 170);   // 重新對齊圖框起始位置 (Overlay)",
            ]
        );
    }

    #[test]
    fn zero_spacing_emits_only_alignment() {
        let el = TicketElement::spacing(0);
        let script = generate_script(std::slice::from_ref(&el));
        assert_eq!(script.lines_for(&el.id).count(), 1);
    }

    #[test]
    fn left_aligned_first_element_is_aligned() {
        let el = TicketElement::text("hello");
        let script = generate_script(std::slice::from_ref(&el));
        let lines: Vec<&str> = script.lines_for(&el.id).map(|l| l.text.as_str()).collect();
        assert_eq!(
            lines,
            vec![
                "BinaryOut(0x1B, 0x61, 0x00);  // 文字置左",
                "BinaryOut(BIG5.GetBytes(\"hello\"));",
            ]
        );
    }

    #[test]
    fn image_without_name_loads_fallback() {
        let el = TicketElement::new(ElementKind::Image {
            content: String::new(),
            variable_name: Some(String::new()),
        });
        let script = generate_script(std::slice::from_ref(&el));
        let last = script.lines_for(&el.id).last().unwrap();
        assert!(last.text.contains(&format!("\"{FALLBACK_IMAGE_NAME}\"")));
    }

    #[test]
    fn unchanged_state_is_not_repeated() {
        let a = TicketElement::text("a");
        let b = TicketElement::text("b");
        let script = generate_script(&[a, b.clone()]);
        let lines: Vec<&str> = script.lines_for(&b.id).map(|l| l.text.as_str()).collect();
        assert_eq!(lines, vec!["BinaryOut(BIG5.GetBytes(\"b\"));"]);
    }

    #[test]
    fn image_line() {
        let el = TicketElement::image("logo.bin").with_align(Alignment::Right);
        let script = generate_script(std::slice::from_ref(&el));
        let last = script.lines_for(&el.id).last().unwrap();
        assert_eq!(
            last.text,
            "BinaryOut(File.ReadAllBytes(Path.Combine(GlobalVariable.TicketLogoFolder, \"logo.bin\")));  // 載入圖片"
        );
    }

    #[test]
    fn generation_is_deterministic() {
        let els = vec![
            TicketElement::text("{num}").with_size(FontSize::Large),
            TicketElement::spacing(30),
        ];
        assert_eq!(generate_script(&els), generate_script(&els));
    }
}
