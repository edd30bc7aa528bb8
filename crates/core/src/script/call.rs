//! Recursive-descent reader for the single call expression on a script line.
//!
//! The grammar is the small subset of C# the generator writes:
//!
//! ```text
//! expr  := STR | path [ '(' args ')' ]
//! path  := WORD ( '.' WORD )*
//! args  := [ expr ( ',' expr )* ]
//! ```

use super::lexer::{TokKind, Token, tokenize};

/// Nesting bound; deeper input is treated as unparseable.
const MAX_DEPTH: usize = 64;

/// A call argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr<'a> {
    /// A bare identifier or integer token.
    Word(&'a str),
    /// A dotted path such as `GlobalVariable.TicketLogoFolder`.
    Path(Vec<&'a str>),
    /// A string literal.
    Str {
        /// Text between the quotes.
        body: &'a str,
        /// Written as `$"..."`.
        interpolated: bool,
    },
    /// A nested call.
    Call(Call<'a>),
}

impl<'a> Expr<'a> {
    /// The call, if this argument is one.
    pub fn as_call(&self) -> Option<&Call<'a>> {
        match self {
            Expr::Call(c) => Some(c),
            _ => None,
        }
    }

    /// The word text, if this argument is a bare word.
    pub fn as_word(&self) -> Option<&'a str> {
        match self {
            Expr::Word(w) => Some(w),
            _ => None,
        }
    }
}

/// A parsed call: dotted callee plus arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call<'a> {
    /// Callee path segments (`["BIG5", "GetBytes"]`).
    pub callee: Vec<&'a str>,
    /// Arguments in order.
    pub args: Vec<Expr<'a>>,
}

impl Call<'_> {
    /// Whether the callee is `name` (a dotted path), ignoring ASCII case.
    pub fn is(&self, name: &str) -> bool {
        let mut want = name.split('.');
        let mut have = self.callee.iter();
        loop {
            match (want.next(), have.next()) {
                (None, None) => return true,
                (Some(w), Some(h)) if w.eq_ignore_ascii_case(h) => {}
                _ => return false,
            }
        }
    }

    /// Depth-first search for a nested call to `name`, including `self`.
    pub fn find(&self, name: &str) -> Option<&Self> {
        if self.is(name) {
            return Some(self);
        }
        self.args
            .iter()
            .filter_map(Expr::as_call)
            .find_map(|c| c.find(name))
    }
}

/// Locate `name(` on the line and parse that call. Text before the callee
/// (an assignment, say) and after its closing parenthesis is ignored.
///
/// Returns `None` when the call is absent or malformed.
pub fn find_call<'a>(line: &'a str, name: &str) -> Option<Call<'a>> {
    let toks = tokenize(line);
    let at = toks.windows(2).position(|w| {
        w[0].kind == TokKind::Word
            && w[0].text.eq_ignore_ascii_case(name)
            && w[1].kind == TokKind::LParen
    })?;
    let mut p = Parser { toks: &toks, pos: at };
    match p.expr(0)? {
        Expr::Call(call) => Some(call),
        _ => None,
    }
}

struct Parser<'t, 'a> {
    toks: &'t [Token<'a>],
    pos: usize,
}

impl<'a> Parser<'_, 'a> {
    fn peek(&self) -> Option<TokKind> {
        self.toks.get(self.pos).map(|t| t.kind)
    }

    fn bump(&mut self) -> Option<Token<'a>> {
        let t = self.toks.get(self.pos).copied()?;
        self.pos += 1;
        Some(t)
    }

    fn eat(&mut self, kind: TokKind) -> bool {
        if self.peek() == Some(kind) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expr(&mut self, depth: usize) -> Option<Expr<'a>> {
        if depth > MAX_DEPTH {
            return None;
        }
        let first = self.bump()?;
        match first.kind {
            TokKind::Str | TokKind::InterpStr => Some(Expr::Str {
                body: first.string_body()?,
                interpolated: first.kind == TokKind::InterpStr,
            }),
            TokKind::Word => {
                let mut path = vec![first.text];
                while self.eat(TokKind::Dot) {
                    let seg = self.bump()?;
                    if seg.kind != TokKind::Word {
                        return None;
                    }
                    path.push(seg.text);
                }
                if self.eat(TokKind::LParen) {
                    let args = self.args(depth)?;
                    Some(Expr::Call(Call { callee: path, args }))
                } else if path.len() == 1 {
                    Some(Expr::Word(first.text))
                } else {
                    Some(Expr::Path(path))
                }
            }
            _ => None,
        }
    }

    /// Arguments after the opening parenthesis, through the closing one.
    fn args(&mut self, depth: usize) -> Option<Vec<Expr<'a>>> {
        let mut args = Vec::new();
        if self.eat(TokKind::RParen) {
            return Some(args);
        }
        loop {
            args.push(self.expr(depth + 1)?);
            if self.eat(TokKind::Comma) {
                continue;
            }
            return self.eat(TokKind::RParen).then_some(args);
        }
    }
}
