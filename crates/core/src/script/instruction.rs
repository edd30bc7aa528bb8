use crate::model::{Alignment, FontSize};
use crate::placeholder::contains_placeholder;

/// One printer instruction, as written on one script line.
///
/// This is the vocabulary shared by the generator (which renders it) and the
/// parser (which decodes it); the printer state machine applies it in both
/// directions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Instruction {
    /// Host-side text encoding declaration (`Encoding BIG5 = ...`).
    SelectCharset,
    /// `ESC @`: re-initialize the printer.
    Reset,
    /// `ESC STX`: enter page mode.
    PageMode,
    /// `ESC a n`.
    SetAlignment(Alignment),
    /// `ESC E n`.
    SetBold(bool),
    /// `GS ! n` without text.
    SetFontSize(FontSize),
    /// `ESC J n`: feed paper forward by `n` dots.
    Feed(u32),
    /// `ESC K n`: retract by `n` dots so the next element overprints.
    Retract(u32),
    /// Encoded text, optionally preceded on the same line by `GS ! n`.
    Text {
        /// The string literal as it appears in the script.
        literal: StringLiteral,
        /// Character size set together with the text, if any.
        size: Option<FontSize>,
    },
    /// Raw bytes read from an image file.
    LoadImage {
        /// File name inside the host's logo folder.
        file_name: String,
    },
    /// `ESC J n` followed by `GS V 0`: final feed and cut.
    FeedAndCut(u32),
}

/// A string literal in script form: newlines escaped as backslash-n, marked
/// `$` when it carries placeholders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StringLiteral {
    /// Text between the quotes, escapes left as written.
    pub body: String,
    /// Written as `$"..."`.
    pub interpolated: bool,
}

impl StringLiteral {
    /// Build the literal for a piece of element content.
    ///
    /// Only newlines are escaped. Content that already holds a two-character
    /// backslash-n reads back as a newline.
    pub fn from_content(content: &str) -> Self {
        let body = content.replace('\n', "\\n");
        let interpolated = contains_placeholder(&body);
        Self { body, interpolated }
    }

    /// A literal exactly as found between the quotes of a script line.
    pub fn from_script(body: &str, interpolated: bool) -> Self {
        Self {
            body: body.to_string(),
            interpolated,
        }
    }

    /// Element content with backslash-n turned back into newlines.
    pub fn content(&self) -> String {
        self.body.replace("\\n", "\n")
    }

    /// The literal as written in the script, quotes included.
    pub fn render(&self) -> String {
        if self.interpolated {
            format!("$\"{}\"", self.body)
        } else {
            format!("\"{}\"", self.body)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn newline_is_escaped_and_restored() {
        let lit = StringLiteral::from_content("a\nb");
        assert_eq!(lit.body, "a\\nb");
        assert_eq!(lit.render(), "\"a\\nb\"");
        assert_eq!(lit.content(), "a\nb");
    }

    #[test]
    fn placeholder_marks_interpolated() {
        let lit = StringLiteral::from_content("數量: {num}");
        assert!(lit.interpolated);
        assert_eq!(lit.render(), "$\"數量: {num}\"");
    }

    #[test]
    fn authored_backslash_n_reads_back_as_newline() {
        let lit = StringLiteral::from_content(r"C:\new");
        assert_eq!(lit.content(), "C:\new");
    }
}
