//! Lexer producing shape tokens with their trivia already attached.
//!
//! Leading trivia is everything between the previous token's trailing trivia
//! and the token. Trailing trivia runs up to and including the first newline,
//! so a comment at the end of a line stays with the token before it.

mod cursor;

use cursor::Cursor;
use sprig_errors::{DiagnosticCode, SyntaxDiagnostic};
pub use sprig_yellow::SyntaxKind;
use sprig_yellow::SyntaxKind::*;
use sprig_yellow::{ShapeListBuilder, ShapeNode, TokenValue, factory};
use text_size::{TextRange, TextSize};

/// A token shape and the offset its full span starts at.
#[derive(Clone, Debug)]
pub struct LexedToken {
    pub shape: ShapeNode,
    pub start: TextSize,
}

impl LexedToken {
    #[inline]
    pub fn kind(&self) -> SyntaxKind {
        self.shape.kind()
    }

    #[inline]
    pub fn full_width(&self) -> TextSize {
        self.shape.full_width()
    }

    #[inline]
    pub fn end(&self) -> TextSize {
        self.start + self.full_width()
    }
}

pub struct Tokenizer<'a> {
    text: &'a str,
    cursor: Cursor<'a>,
    trivia: ShapeListBuilder,
    diagnostics: Vec<SyntaxDiagnostic>,
    /// Absolute start of the token text being lexed.
    token_start: TextSize,
    /// Width of the leading trivia of the token being lexed.
    lead: TextSize,
}

impl<'a> Tokenizer<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            text,
            cursor: Cursor::new(text),
            trivia: ShapeListBuilder::with_capacity(4),
            diagnostics: Vec::new(),
            token_start: TextSize::new(0),
            lead: TextSize::new(0),
        }
    }

    /// Offset of the next character to be read.
    pub fn offset(&self) -> TextSize {
        TextSize::of(self.text) - self.cursor.remaining()
    }

    /// Lexes the token whose full span starts at `offset`. The result depends
    /// only on the text from `offset` on.
    #[track_caller]
    pub fn lex_at(&mut self, offset: TextSize) -> LexedToken {
        let start = usize::from(offset);
        assert!(self.text.is_char_boundary(start), "cannot lex at {offset:?}");

        self.cursor = Cursor::new(&self.text[start..]);
        self.next_token()
    }

    pub fn next_token(&mut self) -> LexedToken {
        let start = self.offset();
        self.trivia(false);
        let leading = self.trivia.take_list();

        self.token_start = self.offset();
        self.lead = self.token_start - start;
        let (kind, value) = self.token();
        let text = self.token_text();

        self.trivia(true);
        let trailing = self.trivia.take_list();

        let mut shape = factory::token(kind, leading, text, value, trailing);
        if !self.diagnostics.is_empty() {
            shape = shape.set_diagnostics(std::mem::take(&mut self.diagnostics));
        }
        LexedToken { shape, start }
    }

    fn token_text(&self) -> &'a str {
        let text: &'a str = self.text;
        &text[TextRange::new(self.token_start, self.offset())]
    }

    /// Records a diagnostic at `range` within the current token's text.
    fn error(&mut self, code: DiagnosticCode, range: TextRange, message: String) {
        let range = range + self.lead;
        self.diagnostics.push(SyntaxDiagnostic::new(code, range, message));
    }

    fn trivia(&mut self, trailing: bool) {
        loop {
            if self.cursor.is_eof() {
                return;
            }

            let start = self.offset();
            let mut unterminated = false;
            let kind = match self.cursor.peek() {
                '\n' | '\r' => {
                    if self.cursor.advance() == '\r' {
                        self.cursor.eat('\n');
                    }
                    NEWLINE
                }
                '/' if self.cursor.second() == '/' => {
                    self.cursor.advance_while(|c| !is_newline(c));
                    LINE_COMMENT
                }
                '/' if self.cursor.second() == '*' => {
                    unterminated = !self.block_comment();
                    BLOCK_COMMENT
                }
                c if is_whitespace(c) => {
                    self.cursor.advance_while(is_whitespace);
                    WHITESPACE
                }
                _ => return,
            };

            let text = &self.text[TextRange::new(start, self.offset())];
            let piece = if unterminated {
                let range = TextRange::at(TextSize::new(0), TextSize::new(2));
                let message = "unterminated multi-line comment";
                let diagnostic =
                    SyntaxDiagnostic::new(DiagnosticCode::UnterminatedComment, range, message);
                factory::trivia_with_diagnostics(kind, text, vec![diagnostic])
            } else {
                factory::trivia(kind, text)
            };
            self.trivia.push(piece);

            if trailing && kind == NEWLINE {
                return;
            }
        }
    }

    /// Consumes a `/* */` comment; `false` if the input ends first.
    fn block_comment(&mut self) -> bool {
        self.cursor.advance();
        self.cursor.advance();

        while !self.cursor.is_eof() {
            if self.cursor.peek() == '*' && self.cursor.second() == '/' {
                self.cursor.advance();
                self.cursor.advance();
                return true;
            }
            self.cursor.advance();
        }
        false
    }

    fn token(&mut self) -> (SyntaxKind, Option<TokenValue>) {
        if self.cursor.is_eof() {
            return (EOF, None);
        }

        let kind = match self.cursor.advance() {
            '(' => LEFT_PAREN,
            ')' => RIGHT_PAREN,
            '{' => LEFT_BRACE,
            '}' => RIGHT_BRACE,
            ',' => COMMA,
            ';' => SEMICOLON,
            '+' => PLUS,
            '-' => MINUS,
            '*' => STAR,
            '/' => SLASH,
            '%' => PERCENT,
            '~' => TILDE,
            '^' => CARET,
            '=' => self.either('=', EQ_EQ, EQ),
            '!' => self.either('=', BANG_EQ, BANG),
            '<' => self.either('=', LT_EQ, LT),
            '>' => self.either('=', GT_EQ, GT),
            '&' => self.either('&', AMP_AMP, AMP),
            '|' => self.either('|', PIPE_PIPE, PIPE),
            first @ '0'..='9' => return self.number(first),
            '"' => return self.string(),
            c if is_name_start(c) => return self.name(),
            c => {
                let range = TextRange::at(TextSize::new(0), TextSize::of(c));
                let message = format!("unknown character '{c}'");
                self.error(DiagnosticCode::BadCharacter, range, message);
                BAD_TOKEN
            }
        };

        (kind, None)
    }

    fn either(&mut self, next: char, long: SyntaxKind, short: SyntaxKind) -> SyntaxKind {
        if self.cursor.eat(next) { long } else { short }
    }

    fn name(&mut self) -> (SyntaxKind, Option<TokenValue>) {
        self.cursor.advance_while(is_name_continue);

        match SyntaxKind::from_keyword(self.token_text()) {
            Some(TRUE_KW) => (TRUE_KW, Some(TokenValue::Bool(true))),
            Some(FALSE_KW) => (FALSE_KW, Some(TokenValue::Bool(false))),
            Some(keyword) => (keyword, None),
            None => (NAME, None),
        }
    }

    fn number(&mut self, first: char) -> (SyntaxKind, Option<TokenValue>) {
        let radix = match self.cursor.peek() {
            'x' | 'X' if first == '0' => 16,
            'b' | 'B' if first == '0' => 2,
            _ => 10,
        };
        if radix != 10 {
            self.cursor.advance();
        }
        self.cursor.advance_while(|c| c == '_' || c.is_digit(if radix == 16 { 16 } else { 10 }));

        let text = self.token_text();
        let digits: String =
            text[if radix == 10 { 0 } else { 2 }..].chars().filter(|&c| c != '_').collect();

        match i64::from_str_radix(&digits, radix) {
            Ok(value) => (NUMBER, Some(TokenValue::Int(value))),
            Err(_) => {
                let range = TextRange::up_to(TextSize::of(text));
                let message = format!("'{text}' is not a valid 'int'");
                self.error(DiagnosticCode::InvalidType, range, message);
                (NUMBER, None)
            }
        }
    }

    fn string(&mut self) -> (SyntaxKind, Option<TokenValue>) {
        let mut value = String::new();

        loop {
            if self.cursor.is_eof() || is_newline(self.cursor.peek()) {
                let range = TextRange::at(TextSize::new(0), TextSize::new(1));
                let message = "unterminated string literal".to_owned();
                self.error(DiagnosticCode::UnterminatedString, range, message);
                break;
            }

            match self.cursor.advance() {
                '"' => break,
                '\\' => {
                    if self.cursor.is_eof() || is_newline(self.cursor.peek()) {
                        value.push('\\');
                        continue;
                    }
                    match self.cursor.advance() {
                        'n' => value.push('\n'),
                        't' => value.push('\t'),
                        'r' => value.push('\r'),
                        '\\' => value.push('\\'),
                        '"' => value.push('"'),
                        other => {
                            value.push('\\');
                            value.push(other);
                        }
                    }
                }
                c => value.push(c),
            }
        }

        (STRING, Some(TokenValue::Str(value.into())))
    }
}

fn is_newline(c: char) -> bool {
    matches!(c, '\n' | '\r')
}

fn is_whitespace(c: char) -> bool {
    c.is_whitespace() && !is_newline(c)
}

fn is_name_start(c: char) -> bool {
    c == '_' || c.is_alphabetic()
}

fn is_name_continue(c: char) -> bool {
    c == '_' || c.is_alphanumeric()
}
