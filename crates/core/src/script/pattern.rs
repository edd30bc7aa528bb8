//! Line recognizers: map one script line to an [`Instruction`].
//!
//! Recognizers are tried in a fixed order. A purely numeric call is decoded
//! by opcode; otherwise the line is matched against the size-plus-text, the
//! plain text, and the image shapes.

use super::call::{Call, Expr, find_call};
use super::instruction::{Instruction, StringLiteral};
use super::opcode::{self, CHAR_SIZE, DecodeError, GS};
use crate::model::FALLBACK_IMAGE_NAME;

/// Name of the emitting call on every instruction line.
pub const CALL_NAME: &str = "BinaryOut";
/// Callee that encodes a string literal to printer bytes.
pub const TEXT_ENCODER: &str = "BIG5.GetBytes";
/// Callee that reads an image file.
pub const FILE_READER: &str = "File.ReadAllBytes";
/// Callee that joins the image folder and file name.
pub const PATH_JOIN: &str = "Path.Combine";

/// Outcome of matching one line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineMatch {
    /// The line decoded to an instruction.
    Instruction(Instruction),
    /// A known opcode missing its operand; carries the opcode name.
    Incomplete(&'static str),
    /// A numeric argument that is neither decimal nor `0x` hex.
    InvalidNumber(String),
    /// Nothing matched. Carries the numeric bytes when the call was numeric.
    Unrecognized(Option<Vec<u32>>),
}

/// Match one comment-free, trimmed line that mentions [`CALL_NAME`].
pub fn match_line(line: &str) -> LineMatch {
    let Some(call) = find_call(line, CALL_NAME) else {
        // Malformed call; a file read anywhere on the line still reads as
        // an image with the default name.
        if line.contains(FILE_READER) {
            return LineMatch::Instruction(Instruction::LoadImage {
                file_name: FALLBACK_IMAGE_NAME.to_string(),
            });
        }
        return LineMatch::Unrecognized(None);
    };

    if let Some(m) = match_numeric(&call) {
        return m;
    }
    if let Some(instr) = match_sized_text(&call)
        .or_else(|| match_plain_text(&call))
        .or_else(|| match_image(&call))
    {
        return LineMatch::Instruction(instr);
    }
    LineMatch::Unrecognized(None)
}

/// All arguments bare words: decode as opcode bytes.
fn match_numeric(call: &Call<'_>) -> Option<LineMatch> {
    if call.args.is_empty() {
        return None;
    }
    let words: Vec<&str> = call
        .args
        .iter()
        .map(Expr::as_word)
        .collect::<Option<_>>()?;
    let mut bytes = Vec::with_capacity(words.len());
    for w in words {
        match opcode::parse_int_token(w) {
            Some(n) => bytes.push(n),
            None => return Some(LineMatch::InvalidNumber(w.to_string())),
        }
    }
    Some(match opcode::decode(&bytes) {
        Ok(instr) => LineMatch::Instruction(instr),
        Err(DecodeError::Incomplete(name)) => LineMatch::Incomplete(name),
        Err(DecodeError::Unknown) => LineMatch::Unrecognized(Some(bytes)),
    })
}

/// `BinaryOut(0x1D, 0x21, n, BIG5.GetBytes("..."))`
fn match_sized_text(call: &Call<'_>) -> Option<Instruction> {
    let [a, b, n, text] = call.args.as_slice() else {
        return None;
    };
    let byte = |e: &Expr<'_>| e.as_word().and_then(opcode::parse_int_token);
    if byte(a)? != GS || byte(b)? != CHAR_SIZE {
        return None;
    }
    let size = opcode::font_size_from_byte(byte(n)?);
    Some(Instruction::Text {
        literal: encoded_literal(text)?,
        size: Some(size),
    })
}

/// `BinaryOut(BIG5.GetBytes("..."))`
fn match_plain_text(call: &Call<'_>) -> Option<Instruction> {
    let [text] = call.args.as_slice() else {
        return None;
    };
    Some(Instruction::Text {
        literal: encoded_literal(text)?,
        size: None,
    })
}

/// `BinaryOut(File.ReadAllBytes(Path.Combine(folder, "name")))`
fn match_image(call: &Call<'_>) -> Option<Instruction> {
    let reader = call
        .args
        .iter()
        .filter_map(Expr::as_call)
        .find_map(|c| c.find(FILE_READER))?;
    let file_name = reader
        .find(PATH_JOIN)
        .filter(|join| join.args.len() >= 2)
        .and_then(|join| match join.args.last() {
            Some(Expr::Str { body, .. }) if !body.is_empty() => Some(body.to_string()),
            _ => None,
        })
        .unwrap_or_else(|| FALLBACK_IMAGE_NAME.to_string());
    Some(Instruction::LoadImage { file_name })
}

/// The literal inside a `BIG5.GetBytes("...")` call with exactly one argument.
fn encoded_literal(expr: &Expr<'_>) -> Option<StringLiteral> {
    let call = expr.as_call().filter(|c| c.is(TEXT_ENCODER))?;
    match call.args.as_slice() {
        [Expr::Str { body, interpolated }] => Some(StringLiteral::from_script(body, *interpolated)),
        _ => None,
    }
}
