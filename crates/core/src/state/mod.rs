//! Printer state shared by the generator and the parser.
//!
//! Both directions run the same transition function ([`PrinterState::apply`])
//! over the same [`Instruction`] values. That shared table is what makes
//! `parse(generate(x))` recover `x`.

use crate::model::{Alignment, ElementKind, FontSize, TicketElement};
use crate::script::instruction::Instruction;

/// What the next printed content will look like unless changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrinterState {
    /// Current alignment. `None` until the generator has emitted one, so the
    /// first element always gets an explicit alignment line.
    pub alignment: Option<Alignment>,
    /// Emphasis on.
    pub bold: bool,
    /// Current character size.
    pub font_size: FontSize,
}

impl PrinterState {
    /// State after `ESC @`, as the parser assumes it.
    pub fn for_decoding() -> Self {
        Self {
            alignment: Some(Alignment::Left),
            bold: false,
            font_size: FontSize::Normal,
        }
    }

    /// Generator start state: alignment unknown.
    pub fn for_encoding() -> Self {
        Self {
            alignment: None,
            ..Self::for_decoding()
        }
    }

    /// Current alignment, left when none has been set.
    pub fn alignment(&self) -> Alignment {
        self.alignment.unwrap_or_default()
    }

    /// Apply one instruction's effect on the carried state.
    pub fn apply(&mut self, instr: &Instruction) {
        match instr {
            Instruction::Reset => *self = Self::for_decoding(),
            Instruction::SetAlignment(a) => self.alignment = Some(*a),
            Instruction::SetBold(b) => self.bold = *b,
            Instruction::SetFontSize(s)
            | Instruction::Text {
                size: Some(s), ..
            } => self.font_size = *s,
            Instruction::SelectCharset
            | Instruction::PageMode
            | Instruction::Feed(_)
            | Instruction::Retract(_)
            | Instruction::Text { size: None, .. }
            | Instruction::LoadImage { .. }
            | Instruction::FeedAndCut(_) => {}
        }
    }

    // ── Encoding side ───────────────────────────────────────────────────

    /// Alignment instruction needed to reach `target`, if any. `force`
    /// emits it even when already aligned.
    pub fn align_instruction(&self, target: Alignment, force: bool) -> Option<Instruction> {
        (force || self.alignment != Some(target)).then_some(Instruction::SetAlignment(target))
    }

    /// Emphasis toggle needed to reach `target`, if any.
    pub fn bold_instruction(&self, target: bool) -> Option<Instruction> {
        (self.bold != target).then_some(Instruction::SetBold(target))
    }

    /// Size reset needed before normal-size text, if the state is large.
    pub fn size_reset_instruction(&self, target: FontSize) -> Option<Instruction> {
        (target == FontSize::Normal && self.font_size == FontSize::Large)
            .then_some(Instruction::SetFontSize(FontSize::Normal))
    }

    // ── Decoding side ───────────────────────────────────────────────────

    /// The element an instruction produces, styled from the current state.
    /// Call after [`apply`](Self::apply) so a combined size-and-text line
    /// carries its own size.
    pub fn element_for(&self, instr: &Instruction) -> Option<TicketElement> {
        let kind = match instr {
            Instruction::Feed(n) => ElementKind::Spacing {
                spacing_height: i32::try_from(*n).unwrap_or(i32::MAX),
            },
            Instruction::Retract(n) => ElementKind::Spacing {
                spacing_height: i32::try_from(*n).map_or(i32::MIN, |n| -n),
            },
            Instruction::Text { literal, .. } => ElementKind::Text {
                content: literal.content(),
            },
            Instruction::LoadImage { file_name } => ElementKind::Image {
                content: String::new(),
                variable_name: Some(file_name.clone()),
            },
            _ => return None,
        };
        Some(
            TicketElement::new(kind)
                .with_align(self.alignment())
                .with_bold(self.bold)
                .with_size(self.font_size),
        )
    }
}

impl Default for PrinterState {
    fn default() -> Self {
        Self::for_decoding()
    }
}
