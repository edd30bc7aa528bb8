/// Classification of a script lexer token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokKind {
    /// Identifier or integer: a run of ASCII alphanumerics and `_`.
    Word,
    /// A `"..."` string literal, quotes included.
    Str,
    /// A `$"..."` interpolated string literal, `$` and quotes included.
    InterpStr,
    /// `(`
    LParen,
    /// `)`
    RParen,
    /// `,`
    Comma,
    /// `.`
    Dot,
    /// `;`
    Semicolon,
    /// Anything else, including an unterminated string.
    Other,
}

/// A token that borrows its text directly from the source line.
///
/// `text` is always exactly `&input[start..end]`.
#[derive(Debug, Clone, Copy)]
pub struct Token<'a> {
    /// The classification of this token.
    pub kind: TokKind,
    /// Borrowed slice of the source line.
    pub text: &'a str,
    /// Byte offset of the first character.
    pub start: usize,
    /// Byte offset one past the last character.
    pub end: usize,
}

impl<'a> Token<'a> {
    /// Body of a string token, without `$` and quotes.
    pub fn string_body(&self) -> Option<&'a str> {
        let text = self.text;
        match self.kind {
            TokKind::Str => Some(&text[1..text.len() - 1]),
            TokKind::InterpStr => Some(&text[2..text.len() - 1]),
            _ => None,
        }
    }
}

/// Tokenize one script line. Whitespace is dropped.
///
/// A string literal ends at the first `"` not preceded by a backslash. Escapes
/// are kept as written.
pub fn tokenize(input: &str) -> Vec<Token<'_>> {
    let mut toks = Vec::new();
    let b = input.as_bytes();
    let mut i = 0usize;
    while i < b.len() {
        let start = i;
        let c = b[i];
        let kind = match c {
            c if c.is_ascii_whitespace() => {
                i += 1;
                continue;
            }
            b'(' => {
                i += 1;
                TokKind::LParen
            }
            b')' => {
                i += 1;
                TokKind::RParen
            }
            b',' => {
                i += 1;
                TokKind::Comma
            }
            b'.' => {
                i += 1;
                TokKind::Dot
            }
            b';' => {
                i += 1;
                TokKind::Semicolon
            }
            b'"' => string_token(b, i + 1, &mut i, TokKind::Str),
            b'$' if b.get(i + 1) == Some(&b'"') => {
                string_token(b, i + 2, &mut i, TokKind::InterpStr)
            }
            c if is_word_byte(c) => {
                while i < b.len() && is_word_byte(b[i]) {
                    i += 1;
                }
                TokKind::Word
            }
            _ => {
                // Advance a whole UTF-8 scalar so slices stay on char boundaries.
                i += input[i..].chars().next().map_or(1, char::len_utf8);
                TokKind::Other
            }
        };
        toks.push(Token {
            kind,
            text: &input[start..i],
            start,
            end: i,
        });
    }
    toks
}

fn is_word_byte(c: u8) -> bool {
    c.is_ascii_alphanumeric() || c == b'_'
}

/// Scan a string body starting at `from`, stepping over backslash escapes.
/// On a missing closing quote the rest of the line becomes one `Other` token.
fn string_token(b: &[u8], from: usize, cursor: &mut usize, kind: TokKind) -> TokKind {
    let mut j = from;
    while j < b.len() {
        match b[j] {
            b'\\' => j += 2,
            b'"' => {
                *cursor = j + 1;
                return kind;
            }
            _ => j += 1,
        }
    }
    *cursor = b.len();
    TokKind::Other
}
