//! FSM Lexer (§4.3): a deterministic finite-state machine over the
//! [`RuneStream`](crate::rune::RuneStream), lazily producing a sequence
//! of typed [`Lexeme`]s.

use crate::rune::RuneStream;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Initial,
    Number,
    HexOrBin,
    HexNumber,
    BinNumber,
    LabelRef,
    Instr,
    Label,
    CommentStart,
    CommentMl,
    CommentMlClosing,
    CommentSl,
}

fn state_name(state: State) -> &'static str {
    use State::*;
    match state {
        Initial => "INITIAL",
        Number => "NUMBER",
        HexOrBin => "HEX_OR_BIN",
        HexNumber => "HEX_NUMBER",
        BinNumber => "BIN_NUMBER",
        LabelRef => "LABELREF",
        Instr => "INSTR",
        Label => "LABEL",
        CommentStart => "COMMENT_START",
        CommentMl => "COMMENT_ML",
        CommentMlClosing => "COMMENT_ML_CLOSING",
        CommentSl => "COMMENT_SL",
    }
}

fn kind_for_state(state: State) -> Option<LexemeKind> {
    use State::*;
    match state {
        Number | HexOrBin | HexNumber | BinNumber => Some(LexemeKind::Integer),
        LabelRef => Some(LexemeKind::LabelRef),
        Instr => Some(LexemeKind::Instruction),
        Label => Some(LexemeKind::Label),
        CommentMlClosing | CommentSl => Some(LexemeKind::Comment),
        _ => None,
    }
}

fn is_ws(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\r' | '\n')
}

fn is_digit(c: char) -> bool {
    c.is_ascii_digit()
}

fn is_hex_digit(c: char) -> bool {
    c.is_ascii_hexdigit()
}

fn is_bin_digit(c: char) -> bool {
    c == '0' || c == '1'
}

fn is_ident_start(c: char) -> bool {
    c == '_' || c.is_ascii_alphabetic()
}

fn is_ident_cont(c: char) -> bool {
    is_ident_start(c) || is_digit(c)
}

/// The kind of a lexeme, determined by the FSM state it was yielded from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LexemeKind {
    Instruction,
    Integer,
    Label,
    LabelRef,
    Comment,
}

/// A tagged value `{kind, literal_text}` (§3), plus the 1-based source
/// line its first character appeared on (used to build the source map).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lexeme {
    pub kind: LexemeKind,
    pub text: String,
    pub line: u32,
}

/// An unexpected character, or an unexpected end of input, for the
/// lexer's current state (§7 "Lexical error").
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexError {
    pub state: &'static str,
    /// `None` when the input ended mid-token rather than hitting an
    /// illegal character (e.g. an unterminated block comment).
    pub character: Option<char>,
}

impl fmt::Display for LexError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.character {
            Some(c) => write!(
                f,
                "could not determine next state from '{}' at {}",
                c, self.state
            ),
            None => write!(f, "unexpected end of input while in state {}", self.state),
        }
    }
}

impl std::error::Error for LexError {}

/// Lazy producer of lexemes: `has_next()`/`next()`, single-slot outbox.
pub struct Lexer<'a> {
    runes: RuneStream<'a>,
    state: State,
    buf: String,
    outbox: Option<Lexeme>,
    ready: bool,
    exhausted: bool,
    closed: bool,
    line: u32,
    lexeme_start_line: u32,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Result<Self, LexError> {
        let mut lexer = Lexer {
            runes: RuneStream::new(source),
            state: State::Initial,
            buf: String::new(),
            outbox: None,
            ready: false,
            exhausted: false,
            closed: false,
            line: 1,
            lexeme_start_line: 1,
        };
        lexer.walk()?;
        Ok(lexer)
    }

    pub fn has_next(&self) -> bool {
        !self.closed
    }

    pub fn next(&mut self) -> Result<Lexeme, LexError> {
        let current = self
            .outbox
            .take()
            .expect("next() called with no lexeme ready");
        self.ready = false;
        self.walk()?;
        Ok(current)
    }

    fn walk(&mut self) -> Result<(), LexError> {
        if self.exhausted {
            self.closed = true;
            return Ok(());
        }

        while self.runes.has_next() {
            let next = self.runes.next();
            if next == '\n' {
                self.line += 1;
            }
            self.state = self.step(next)?;
            if self.ready {
                return Ok(());
            }
        }

        // End of input: yield the final pending lexeme, if any, then close.
        if !self.buf.is_empty() {
            if self.comment_in_progress() {
                return Err(self.unexpected_eof());
            }
            self.emit();
            self.exhausted = true;
            return Ok(());
        }

        self.closed = true;
        Ok(())
    }

    /// True while inside a comment that has not yet seen its terminator
    /// (`COMMENT_START`/`COMMENT_ML` have no terminator in the buffer at
    /// all yet; `COMMENT_ML_CLOSING` has seen `*` but not the `/` after
    /// it). Reaching end of input in any of these means the comment was
    /// left open.
    fn comment_in_progress(&self) -> bool {
        matches!(
            self.state,
            State::CommentStart | State::CommentMl | State::CommentMlClosing
        )
    }

    fn unexpected_eof(&self) -> LexError {
        LexError {
            state: state_name(self.state),
            character: None,
        }
    }

    fn emit(&mut self) {
        let kind = kind_for_state(self.state).expect("yield from a non-terminal state");
        self.outbox = Some(Lexeme {
            kind,
            text: std::mem::take(&mut self.buf),
            line: self.lexeme_start_line,
        });
        self.ready = true;
    }

    /// Pushes the first character of a new token and records the line it
    /// started on.
    fn start_token(&mut self, c: char) {
        self.lexeme_start_line = self.line;
        self.buf.push(c);
    }

    /// Shared tail for the states whose table row reads "whitespace / `&`
    /// / `/` → yield, handle new char": yield the pending lexeme under
    /// the *current* state, then reclassify `c` as the start of whatever
    /// comes next.
    fn yield_then(&mut self, c: char) -> State {
        self.emit();
        match c {
            '&' => {
                self.start_token(c);
                State::LabelRef
            }
            '/' => {
                self.start_token(c);
                State::CommentStart
            }
            _ => State::Initial,
        }
    }

    fn illegal(&self, c: char) -> LexError {
        LexError {
            state: state_name(self.state),
            character: Some(c),
        }
    }

    fn step(&mut self, c: char) -> Result<State, LexError> {
        use State::*;
        match self.state {
            Initial => {
                if c == '0' {
                    self.start_token(c);
                    Ok(HexOrBin)
                } else if is_digit(c) {
                    self.start_token(c);
                    Ok(Number)
                } else if c == '-' {
                    self.start_token(c);
                    Ok(Number)
                } else if c == '&' {
                    self.start_token(c);
                    Ok(LabelRef)
                } else if is_ident_start(c) {
                    self.start_token(c);
                    Ok(Instr)
                } else if c == '/' {
                    self.start_token(c);
                    Ok(CommentStart)
                } else if is_ws(c) {
                    Ok(Initial)
                } else {
                    Err(self.illegal(c))
                }
            }
            Number => {
                if is_digit(c) || c == 'b' || c == 'x' {
                    self.buf.push(c);
                    Ok(Number)
                } else if is_ws(c) || c == '&' || c == '/' {
                    Ok(self.yield_then(c))
                } else {
                    Err(self.illegal(c))
                }
            }
            HexOrBin => {
                if c == 'x' {
                    self.buf.push(c);
                    Ok(HexNumber)
                } else if c == 'b' {
                    self.buf.push(c);
                    Ok(BinNumber)
                } else if is_ws(c) || c == '&' || c == '/' {
                    Ok(self.yield_then(c))
                } else {
                    Err(self.illegal(c))
                }
            }
            HexNumber => {
                if is_hex_digit(c) {
                    self.buf.push(c);
                    Ok(HexNumber)
                } else if is_ws(c) || c == '&' || c == '/' {
                    Ok(self.yield_then(c))
                } else {
                    Err(self.illegal(c))
                }
            }
            BinNumber => {
                if is_bin_digit(c) {
                    self.buf.push(c);
                    Ok(BinNumber)
                } else if is_ws(c) || c == '&' || c == '/' {
                    Ok(self.yield_then(c))
                } else {
                    Err(self.illegal(c))
                }
            }
            LabelRef => {
                if is_ident_cont(c) {
                    self.buf.push(c);
                    Ok(LabelRef)
                } else if is_ws(c) || c == '&' || c == '/' {
                    Ok(self.yield_then(c))
                } else {
                    Err(self.illegal(c))
                }
            }
            Instr => {
                if is_ident_cont(c) {
                    self.buf.push(c);
                    Ok(Instr)
                } else if c == ':' {
                    self.buf.push(c);
                    self.state = Label;
                    self.emit();
                    Ok(Initial)
                } else if is_ws(c) || c == '&' || c == '/' {
                    Ok(self.yield_then(c))
                } else {
                    Err(self.illegal(c))
                }
            }
            Label => {
                if is_ws(c) {
                    self.emit();
                    Ok(Initial)
                } else {
                    Err(self.illegal(c))
                }
            }
            CommentStart => {
                if c == '/' {
                    self.buf.push(c);
                    Ok(CommentSl)
                } else if c == '*' {
                    self.buf.push(c);
                    Ok(CommentMl)
                } else {
                    Err(self.illegal(c))
                }
            }
            CommentSl => {
                if c == '\n' || c == '\r' {
                    self.emit();
                    Ok(Initial)
                } else {
                    self.buf.push(c);
                    Ok(CommentSl)
                }
            }
            CommentMl => {
                if c == '*' {
                    self.buf.push(c);
                    Ok(CommentMlClosing)
                } else {
                    self.buf.push(c);
                    Ok(CommentMl)
                }
            }
            CommentMlClosing => {
                if c == '/' {
                    self.buf.push(c);
                    self.emit();
                    Ok(Initial)
                } else if c == '*' {
                    self.buf.push(c);
                    Ok(CommentMlClosing)
                } else {
                    self.buf.push(c);
                    Ok(CommentMl)
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex_all(source: &str) -> Vec<Lexeme> {
        let mut lexer = Lexer::new(source).unwrap();
        let mut out = Vec::new();
        while lexer.has_next() {
            out.push(lexer.next().unwrap());
        }
        out
    }

    fn text(kind: LexemeKind, text: &str, line: u32) -> Lexeme {
        Lexeme {
            kind,
            text: text.to_string(),
            line,
        }
    }

    #[test]
    fn lexes_instruction_and_whitespace() {
        let lexemes = lex_all("add in");
        assert_eq!(
            lexemes,
            vec![
                text(LexemeKind::Instruction, "add", 1),
                text(LexemeKind::Instruction, "in", 1),
            ]
        );
    }

    #[test]
    fn lexes_decimal_hex_and_binary_integers() {
        let lexemes = lex_all("5 0xFF 0b101 0");
        assert_eq!(
            lexemes,
            vec![
                text(LexemeKind::Integer, "5", 1),
                text(LexemeKind::Integer, "0xFF", 1),
                text(LexemeKind::Integer, "0b101", 1),
                text(LexemeKind::Integer, "0", 1),
            ]
        );
    }

    #[test]
    fn lexes_a_leading_minus_as_part_of_the_integer() {
        let lexemes = lex_all("-1 -42");
        assert_eq!(
            lexemes,
            vec![
                text(LexemeKind::Integer, "-1", 1),
                text(LexemeKind::Integer, "-42", 1),
            ]
        );
    }

    #[test]
    fn lexes_label_definition_and_reference() {
        let lexemes = lex_all("a: &a");
        assert_eq!(
            lexemes,
            vec![
                text(LexemeKind::Label, "a:", 1),
                text(LexemeKind::LabelRef, "&a", 1),
            ]
        );
    }

    #[test]
    fn lexes_line_and_block_comments() {
        let lexemes = lex_all("// hi\n/* block */ add");
        assert_eq!(
            lexemes,
            vec![
                text(LexemeKind::Comment, "// hi", 1),
                text(LexemeKind::Comment, "/* block */", 2),
                text(LexemeKind::Instruction, "add", 2),
            ]
        );
    }

    #[test]
    fn final_pending_lexeme_is_yielded_at_end_of_input() {
        let lexemes = lex_all("add");
        assert_eq!(lexemes, vec![text(LexemeKind::Instruction, "add", 1)]);
    }

    #[test]
    fn compiles_whether_or_not_source_ends_with_whitespace() {
        assert_eq!(lex_all("add"), lex_all("add "));
    }

    #[test]
    fn illegal_character_is_a_lex_error() {
        let mut lexer = Lexer::new("@").unwrap();
        let err = lexer.next();
        assert!(err.is_err());
    }

    #[test]
    fn unterminated_block_comment_is_a_lex_error_not_a_panic() {
        assert!(Lexer::new("/* never closed").is_err());
    }

    #[test]
    fn block_comment_ending_in_a_lone_star_is_a_lex_error() {
        // The trailing `*` looks like the start of `*/` but EOF arrives
        // before the closing `/` does; it must not be accepted as done.
        assert!(Lexer::new("/* almost *").is_err());
    }

    #[test]
    fn lone_slash_at_eof_is_a_lex_error() {
        let mut lexer = Lexer::new("add /").unwrap();
        assert_eq!(lexer.next().unwrap().text, "add");
        assert!(lexer.next().is_err());
    }

    #[test]
    fn properly_closed_block_comment_still_lexes() {
        let lexemes = lex_all("/* fine */");
        assert_eq!(lexemes, vec![text(LexemeKind::Comment, "/* fine */", 1)]);
    }

    #[test]
    fn unterminated_line_comment_at_eof_is_accepted() {
        let lexemes = lex_all("// trailing, no newline");
        assert_eq!(
            lexemes,
            vec![text(LexemeKind::Comment, "// trailing, no newline", 1)]
        );
    }
}
