//! Byte-level vocabulary: opcode constants, operand encodings, and the
//! numeric-argument decoder.
//!
//! Everything that maps a byte pattern to a meaning lives here, so the
//! generator and parser cannot disagree about it.

use super::instruction::Instruction;
use crate::model::{Alignment, FontSize};

/// ESC prefix.
pub const ESC: u32 = 0x1B;
/// GS prefix.
pub const GS: u32 = 0x1D;

/// `ESC @`
pub const RESET: u32 = 0x40;
/// `ESC STX`
pub const PAGE_MODE: u32 = 0x02;
/// `ESC a n`
pub const ALIGN: u32 = 0x61;
/// `ESC E n`
pub const BOLD: u32 = 0x45;
/// `ESC J n`
pub const FEED: u32 = 0x4A;
/// `ESC K n` (vendor extension: reverse feed)
pub const RETRACT: u32 = 0x4B;
/// `GS ! n`
pub const CHAR_SIZE: u32 = 0x21;
/// `GS V m`
pub const CUT: u32 = 0x56;

/// Dots fed before the final cut.
pub const TRAILER_FEED: u32 = 88;
/// Cut mode emitted with the trailer.
pub const TRAILER_CUT_MODE: u32 = 0;

/// Operand byte for an alignment.
pub fn alignment_byte(alignment: Alignment) -> u32 {
    match alignment {
        Alignment::Left => 0,
        Alignment::Center => 1,
        Alignment::Right => 2,
    }
}

/// Alignment for an operand byte; accepts both binary (`1`) and ASCII
/// (`'1'` = 49) forms. Anything unrecognized is left.
pub fn alignment_from_byte(n: u32) -> Alignment {
    match n {
        1 | 49 => Alignment::Center,
        2 | 50 => Alignment::Right,
        _ => Alignment::Left,
    }
}

/// Operand byte for emphasis on/off.
pub fn bold_byte(bold: bool) -> u32 {
    u32::from(bold)
}

/// Emphasis for an operand byte (`1` or `'1'` is on).
pub fn bold_from_byte(n: u32) -> bool {
    matches!(n, 1 | 49)
}

/// Operand byte for a character size.
pub fn font_size_byte(size: FontSize) -> u32 {
    match size {
        FontSize::Normal => 0x00,
        FontSize::Large => 0x01,
    }
}

/// Character size for an operand byte. `0x11` (double width and height)
/// also counts as large; that reading has not been checked on hardware.
pub fn font_size_from_byte(n: u32) -> FontSize {
    match n {
        0x01 | 0x11 => FontSize::Large,
        _ => FontSize::Normal,
    }
}

/// Why a numeric byte list did not decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeError {
    /// A known opcode without its operand byte.
    Incomplete(&'static str),
    /// Not a known opcode.
    Unknown,
}

/// Decode a `BinaryOut` call whose arguments are all integers.
///
/// Opcodes are keyed on the first two bytes; bytes after the operand are
/// ignored except for the feed-and-cut signature.
pub fn decode(bytes: &[u32]) -> Result<Instruction, DecodeError> {
    let operand = |name| bytes.get(2).copied().ok_or(DecodeError::Incomplete(name));
    match bytes {
        [ESC, ALIGN, ..] => Ok(Instruction::SetAlignment(alignment_from_byte(operand(
            "ESC a",
        )?))),
        [ESC, BOLD, ..] => Ok(Instruction::SetBold(bold_from_byte(operand("ESC E")?))),
        [ESC, FEED, n, GS, CUT, ..] => Ok(Instruction::FeedAndCut(*n)),
        [ESC, FEED, ..] => Ok(Instruction::Feed(operand("ESC J")?)),
        [ESC, RETRACT, ..] => Ok(Instruction::Retract(operand("ESC K")?)),
        [ESC, RESET, ..] => Ok(Instruction::Reset),
        [ESC, PAGE_MODE, ..] => Ok(Instruction::PageMode),
        [GS, CHAR_SIZE, ..] => Ok(Instruction::SetFontSize(font_size_from_byte(operand(
            "GS !",
        )?))),
        _ => Err(DecodeError::Unknown),
    }
}

/// Parse one integer token: `0x`-prefixed hexadecimal or plain decimal.
pub fn parse_int_token(token: &str) -> Option<u32> {
    let t = token.trim();
    match t.strip_prefix("0x").or_else(|| t.strip_prefix("0X")) {
        Some(hex) => u32::from_str_radix(hex, 16).ok(),
        None => t.parse().ok(),
    }
}

/// Format an opcode byte the way generated scripts write it (`0x1B`).
pub fn hex(byte: u32) -> String {
    format!("0x{byte:02X}")
}
