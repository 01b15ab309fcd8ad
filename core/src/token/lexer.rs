use super::{LexError, Position, Token, TokenKind};

#[inline]
fn is_space_char(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\r' | '\u{feff}')
}

#[inline]
fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

#[inline]
fn is_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Cursor snapshot taken at the start of a token.
#[derive(Debug, Clone, Copy)]
struct Mark {
    idx: usize,
    offset: usize,
    line: u32,
    column: u32,
}

/// Single forward scan over the source. `idx` walks `chars`, `offset` tracks the
/// matching byte offset so spans can index the original `&str`.
pub struct Tokenizer<'a> {
    chars: Vec<char>,
    idx: usize,
    offset: usize,
    line: u32,
    column: u32,
    /// Byte offset of the first character of the current line.
    line_start: usize,
    tokens: Vec<Token>,
    input: &'a str,
}

impl<'a> Tokenizer<'a> {
    pub fn tokenize(s: &str) -> Result<Vec<Token>, LexError> {
        let mut t = Tokenizer::new(s);
        t.run()?;
        Ok(t.finish())
    }

    /// Like [`Tokenizer::tokenize`] but keeps the tokens scanned before a fatal error.
    /// The returned sequence is always terminated by `Eof`.
    pub fn tokenize_lossy(s: &str) -> (Vec<Token>, Option<LexError>) {
        let mut t = Tokenizer::new(s);
        let err = t.run().err();
        (t.finish(), err)
    }

    pub fn new(input: &'a str) -> Self {
        let chars: Vec<char> = input.chars().collect();
        Self {
            chars,
            idx: 0,
            offset: 0,
            line: 1,
            column: 1,
            line_start: 0,
            tokens: Vec::with_capacity(input.len() / 3),
            input,
        }
    }

    pub fn current_position(&self) -> Position {
        Position::new(self.line, self.column, self.offset)
    }

    fn finish(mut self) -> Vec<Token> {
        let mark = self.mark();
        self.push(TokenKind::Eof, mark);
        tracing::debug!(tokens = self.tokens.len(), bytes = self.input.len(), "tokenized");
        self.tokens
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.idx).copied()
    }

    fn peek_next(&self) -> Option<char> {
        self.chars.get(self.idx + 1).copied()
    }

    fn mark(&self) -> Mark {
        Mark {
            idx: self.idx,
            offset: self.offset,
            line: self.line,
            column: self.column,
        }
    }

    fn advance_char(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.idx += 1;
        self.offset += c.len_utf8();
        if c == '\n' {
            self.line += 1;
            self.column = 1;
            self.line_start = self.offset;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn expect(&mut self, c: char) -> bool {
        if self.peek() == Some(c) {
            self.advance_char();
            true
        } else {
            false
        }
    }

    fn push(&mut self, kind: TokenKind, start: Mark) {
        let text = self.input[start.offset..self.offset].to_string();
        self.tokens.push(Token {
            kind,
            text,
            line: start.line,
            column: start.column,
            end_line: self.line,
            end_column: self.column,
            start: start.offset,
            end: self.offset,
        });
    }

    fn run(&mut self) -> Result<(), LexError> {
        while let Some(c) = self.peek() {
            let start = self.mark();
            match c {
                c if is_space_char(c) => {
                    self.advance_char();
                }
                '\n' => {
                    self.advance_char();
                    self.push(TokenKind::Newline, start);
                }
                ';' => self.scan_comment(start),
                '#' => self.scan_directive(start),
                '"' => self.scan_string(start)?,
                '0'..='9' => self.scan_number(start),
                c if is_ident_start(c) => self.scan_identifier(start),
                _ => self.scan_symbol(start),
            }
        }
        Ok(())
    }

    fn scan_comment(&mut self, start: Mark) {
        while let Some(c) = self.peek() {
            if c == '\n' {
                break;
            }
            self.advance_char();
        }
        self.push(TokenKind::Comment, start);
    }

    fn scan_directive(&mut self, start: Mark) {
        self.advance_char(); // '#'
        while self.peek().is_some_and(is_ident_continue) {
            self.advance_char();
        }
        self.push(TokenKind::Directive, start);
    }

    fn scan_string(&mut self, start: Mark) -> Result<(), LexError> {
        self.advance_char(); // opening quote
        loop {
            match self.advance_char() {
                Some('"') => break,
                Some(_) => {}
                None => {
                    let position = Position::new(start.line, start.column, start.offset);
                    return Err(LexError::unterminated_string(position));
                }
            }
        }
        self.push(TokenKind::String, start);
        Ok(())
    }

    fn scan_number(&mut self, start: Mark) {
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.advance_char();
        }
        if self.peek() == Some('.') && self.peek_next().is_some_and(|c| c.is_ascii_digit()) {
            self.advance_char();
            while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                self.advance_char();
            }
        }
        // Hex only directly after a leading `0`.
        if self.idx == start.idx + 1 && self.chars[start.idx] == '0' && self.peek() == Some('x') {
            self.advance_char();
            while self.peek().is_some_and(|c| c.is_ascii_hexdigit()) {
                self.advance_char();
            }
        }
        self.push(TokenKind::Number, start);
    }

    fn scan_identifier(&mut self, start: Mark) {
        while self.peek().is_some_and(is_ident_continue) {
            self.advance_char();
        }
        let text = &self.input[start.offset..self.offset];
        let lower = text.to_ascii_lowercase();
        let kind = if lower == "mod" {
            TokenKind::Modulo
        } else if let Some(keyword) = TokenKind::keyword(&lower) {
            keyword
        } else if text.starts_with("A_") {
            TokenKind::BuiltinVar
        } else {
            TokenKind::Identifier
        };
        self.push(kind, start);
    }

    fn scan_symbol(&mut self, start: Mark) {
        let Some(c) = self.advance_char() else {
            return;
        };
        let kind = match c {
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            '{' => TokenKind::LBrace,
            '}' => TokenKind::RBrace,
            '[' => TokenKind::LBracket,
            ']' => TokenKind::RBracket,
            ',' => TokenKind::Comma,
            '.' => TokenKind::Dot,
            '?' => TokenKind::Question,
            '&' => TokenKind::Ampersand,
            '|' => TokenKind::Pipe,
            '+' => TokenKind::Plus,
            '-' => TokenKind::Minus,
            '/' => TokenKind::Divide,
            '=' => TokenKind::Equals,
            '*' => {
                if self.expect('*') {
                    TokenKind::Power
                } else {
                    TokenKind::Multiply
                }
            }
            ':' => {
                if self.expect('=') {
                    TokenKind::Assign
                } else if self.expect(':') {
                    self.push_hotkey(start);
                    return;
                } else {
                    TokenKind::Colon
                }
            }
            '!' => {
                if self.expect('=') {
                    TokenKind::NotEquals
                } else if self.expect('~') {
                    TokenKind::NotMatch
                } else {
                    // Hotkey modifier, not an operator.
                    TokenKind::Identifier
                }
            }
            '~' => {
                if self.expect('=') {
                    TokenKind::Match
                } else {
                    TokenKind::Identifier
                }
            }
            '<' => {
                if self.expect('=') {
                    TokenKind::LessEqual
                } else {
                    TokenKind::Less
                }
            }
            '>' => {
                if self.expect('=') {
                    TokenKind::GreaterEqual
                } else {
                    TokenKind::Greater
                }
            }
            _ => TokenKind::Identifier,
        };
        self.push(kind, start);
    }

    /// `::` was just consumed at `colon`. Everything already emitted on this line is
    /// the trigger: replace it with one `Hotkey` token running from the first
    /// non-blank character of the line through the second colon.
    fn push_hotkey(&mut self, colon: Mark) {
        let line_start = self.line_start;
        while self.tokens.last().is_some_and(|t| t.start >= line_start) {
            self.tokens.pop();
        }
        // A multi-line string may end on this line; never reach back into it.
        let floor = self.tokens.last().map_or(line_start, |t| t.end.max(line_start));

        let prefix = &self.input[floor..colon.offset];
        let lead = prefix.len() - prefix.trim_start_matches(is_space_char).len();
        let start = floor + lead;
        let trigger = self.input[start..colon.offset].trim_end_matches(is_space_char);

        let column = self.input[line_start..start].chars().count() as u32 + 1;
        self.tokens.push(Token {
            kind: TokenKind::Hotkey,
            text: format!("{}::", trigger),
            line: self.line,
            column,
            end_line: self.line,
            end_column: self.column,
            start,
            end: self.offset,
        });
    }
}
