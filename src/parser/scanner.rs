//! Backtrackable cursor over the source text.
//!
//! The scanner is the only owner of an input position. The block pass drives
//! it a line at a time (`next_line`, `find_next_nonspace`, `advance_offset`),
//! the inline pass a token at a time (`scan`, `rescan`). Both styles share one
//! [`ScannerState`], so `try_parse` and `look_ahead` work for either.

const TAB_STOP: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token {
    EndOfFile,
    NewLine,
    /// Run of spaces and tabs.
    Whitespace,
    /// Run of characters that cannot start any inline construct.
    Text,
    Asterisk,
    Underscore,
    Tilde,
    Backtick,
    Backslash,
    OpenBracket,
    CloseBracket,
    Exclamation,
    LessThan,
    Ampersand,
    OpenBrace,
    CloseBrace,

    // Only produced by `rescan`.
    DelimiterRun,
    BacktickString,
    EscapedChar,
    HardBreak,
    CharacterEntity,
    Autolink,
    HtmlTag,
}

impl Token {
    fn for_char(c: char) -> Option<Token> {
        Some(match c {
            '*' => Token::Asterisk,
            '_' => Token::Underscore,
            '~' => Token::Tilde,
            '`' => Token::Backtick,
            '\\' => Token::Backslash,
            '[' => Token::OpenBracket,
            ']' => Token::CloseBracket,
            '!' => Token::Exclamation,
            '<' => Token::LessThan,
            '&' => Token::Ampersand,
            '{' => Token::OpenBrace,
            '}' => Token::CloseBrace,
            _ => return None,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScannerState {
    pos: usize,
    line_number: usize,
    line_start: usize,
    line_end: usize,
    column: usize,
    partially_consumed_tab: bool,
    next_nonspace: usize,
    next_nonspace_column: usize,
    indent: usize,
    blank: bool,
    token: Token,
    token_start: usize,
}

pub struct Scanner<'a> {
    text: &'a str,
    state: ScannerState,
}

impl<'a> Scanner<'a> {
    pub fn new(text: &'a str) -> Self {
        let mut scanner = Self {
            text,
            state: ScannerState {
                pos: 0,
                line_number: 1,
                line_start: 0,
                line_end: 0,
                column: 0,
                partially_consumed_tab: false,
                next_nonspace: 0,
                next_nonspace_column: 0,
                indent: 0,
                blank: false,
                token: Token::EndOfFile,
                token_start: 0,
            },
        };
        scanner.state.line_end = scanner.find_line_end(0);
        scanner
    }

    pub fn text(&self) -> &'a str {
        self.text
    }

    // ---- snapshots ----

    pub fn state(&self) -> ScannerState {
        self.state
    }

    pub fn set_state(&mut self, state: ScannerState) {
        self.state = state;
    }

    /// Run `f`; if it returns `None`, restore the position from before the call.
    pub fn try_parse<T>(&mut self, f: impl FnOnce(&mut Self) -> Option<T>) -> Option<T> {
        let saved = self.state;
        let result = f(self);
        if result.is_none() {
            self.state = saved;
        }
        result
    }

    /// Run `f` and always restore the position afterwards.
    pub fn look_ahead<T>(&mut self, f: impl FnOnce(&mut Self) -> T) -> T {
        let saved = self.state;
        let result = f(self);
        self.state = saved;
        result
    }

    // ---- lines ----

    fn find_line_end(&self, from: usize) -> usize {
        self.text[from..]
            .find(['\n', '\r'])
            .map_or(self.text.len(), |i| from + i)
    }

    /// Whether there is any line to process at all.
    pub fn has_lines(&self) -> bool {
        !self.text.is_empty()
    }

    pub fn line_number(&self) -> usize {
        self.state.line_number
    }

    pub fn line_end(&self) -> usize {
        self.state.line_end
    }

    /// Length of the line ending after the current line, 0 at the end of the text.
    pub fn line_ending_len(&self) -> usize {
        match &self.text.as_bytes()[self.state.line_end..] {
            [b'\r', b'\n', ..] => 2,
            [b'\n' | b'\r', ..] => 1,
            _ => 0,
        }
    }

    /// The current line without its line ending.
    pub fn current_line(&self) -> &'a str {
        &self.text[self.state.line_start..self.state.line_end]
    }

    /// Move to the start of the next line. Returns `false` when there is none;
    /// a final line ending does not start an empty last line.
    pub fn next_line(&mut self) -> bool {
        let mut next = self.state.line_end;
        let bytes = self.text.as_bytes();
        match bytes.get(next) {
            Some(b'\r') if bytes.get(next + 1) == Some(&b'\n') => next += 2,
            Some(_) => next += 1,
            None => return false,
        }
        if next >= self.text.len() {
            return false;
        }
        let line_end = self.find_line_end(next);
        self.state = ScannerState {
            pos: next,
            line_number: self.state.line_number + 1,
            line_start: next,
            line_end,
            column: 0,
            partially_consumed_tab: false,
            next_nonspace: next,
            next_nonspace_column: 0,
            indent: 0,
            blank: false,
            token: Token::EndOfFile,
            token_start: next,
        };
        true
    }

    /// Byte offset of the cursor in the whole text.
    pub fn pos(&self) -> usize {
        self.state.pos
    }

    pub fn column(&self) -> usize {
        self.state.column
    }

    pub fn partially_consumed_tab(&self) -> bool {
        self.state.partially_consumed_tab
    }

    pub fn next_nonspace(&self) -> usize {
        self.state.next_nonspace
    }

    /// Columns of whitespace between the cursor and the next non-space character.
    pub fn indent(&self) -> usize {
        self.state.indent
    }

    pub fn is_indented(&self) -> bool {
        self.state.indent >= TAB_STOP
    }

    /// Whether the rest of the line is empty or whitespace.
    pub fn is_blank(&self) -> bool {
        self.state.blank
    }

    /// Character under the cursor, `None` at the end of the line.
    pub fn peek(&self) -> Option<char> {
        self.text[self.state.pos..self.state.line_end].chars().next()
    }

    /// First non-space character of the rest of the line.
    pub fn peek_nonspace(&self) -> Option<char> {
        self.text[self.state.next_nonspace..self.state.line_end]
            .chars()
            .next()
    }

    /// The line from the cursor to its end.
    pub fn rest_of_line(&self) -> &'a str {
        &self.text[self.state.pos..self.state.line_end]
    }

    /// The line from the next non-space character to its end.
    pub fn rest_from_nonspace(&self) -> &'a str {
        &self.text[self.state.next_nonspace..self.state.line_end]
    }

    pub fn find_next_nonspace(&mut self) {
        let mut i = self.state.pos;
        let mut cols = self.state.column;
        let bytes = self.text.as_bytes();
        while i < self.state.line_end {
            match bytes[i] {
                b' ' => {
                    i += 1;
                    cols += 1;
                }
                b'\t' => {
                    i += 1;
                    cols += TAB_STOP - (cols % TAB_STOP);
                }
                _ => break,
            }
        }
        self.state.blank = i == self.state.line_end;
        self.state.next_nonspace = i;
        self.state.next_nonspace_column = cols;
        self.state.indent = cols - self.state.column;
    }

    pub fn advance_next_nonspace(&mut self) {
        self.state.pos = self.state.next_nonspace;
        self.state.column = self.state.next_nonspace_column;
        self.state.partially_consumed_tab = false;
    }

    /// Advance by `count` characters, or by `count` columns when `columns` is
    /// set, in which case a tab may be consumed only partially.
    pub fn advance_offset(&mut self, mut count: usize, columns: bool) {
        while count > 0 {
            let Some(c) = self.peek() else {
                break;
            };
            if c == '\t' {
                let chars_to_tab = TAB_STOP - (self.state.column % TAB_STOP);
                if columns {
                    self.state.partially_consumed_tab = chars_to_tab > count;
                    let chars_to_advance = chars_to_tab.min(count);
                    self.state.column += chars_to_advance;
                    if !self.state.partially_consumed_tab {
                        self.state.pos += 1;
                    }
                    count -= chars_to_advance;
                } else {
                    self.state.partially_consumed_tab = false;
                    self.state.column += chars_to_tab;
                    self.state.pos += 1;
                    count -= 1;
                }
            } else {
                self.state.partially_consumed_tab = false;
                self.state.pos += c.len_utf8();
                self.state.column += 1;
                count -= 1;
            }
        }
    }

    /// Consume the remainder of the current line.
    pub fn advance_to_line_end(&mut self) {
        let rest = self.rest_of_line().chars().count();
        self.advance_offset(rest, false);
    }

    // ---- tokens ----

    pub fn token(&self) -> Token {
        self.state.token
    }

    pub fn token_start(&self) -> usize {
        self.state.token_start
    }

    pub fn token_end(&self) -> usize {
        self.state.pos
    }

    pub fn token_text(&self) -> &'a str {
        &self.text[self.state.token_start..self.state.pos]
    }

    /// Everything after the current token.
    pub fn remaining(&self) -> &'a str {
        &self.text[self.state.pos..]
    }

    pub fn char_before(&self, offset: usize) -> Option<char> {
        self.text[..offset].chars().next_back()
    }

    pub fn char_at(&self, offset: usize) -> Option<char> {
        self.text.get(offset..).and_then(|s| s.chars().next())
    }

    /// Move past `len` bytes of `remaining()`, keeping line bookkeeping intact.
    pub fn bump(&mut self, len: usize) {
        let end = (self.state.pos + len).min(self.text.len());
        for (i, b) in self.text.as_bytes()[self.state.pos..end].iter().enumerate() {
            if *b == b'\n' {
                self.state.line_number += 1;
                self.state.line_start = self.state.pos + i + 1;
            }
        }
        self.state.pos = end;
        if self.state.line_start > self.state.line_end {
            self.state.line_end = self.find_line_end(self.state.line_start);
        }
    }

    /// Move past `len` bytes of `remaining()` and return them.
    pub fn consume(&mut self, len: usize) -> &'a str {
        let start = self.state.pos;
        self.bump(len);
        &self.text[start..self.state.pos]
    }

    /// Consume `c` if it comes next.
    pub fn eat(&mut self, c: char) -> bool {
        if self.char_at(self.state.pos) == Some(c) {
            self.bump(c.len_utf8());
            true
        } else {
            false
        }
    }

    /// Consume characters while `f` holds and return them.
    pub fn eat_while(&mut self, f: impl Fn(char) -> bool) -> &'a str {
        let rest = self.remaining();
        let len = rest.find(|c: char| !f(c)).unwrap_or(rest.len());
        self.consume(len)
    }

    /// Advance to the next token.
    pub fn scan(&mut self) -> Token {
        let start = self.state.pos;
        self.state.token_start = start;
        let rest = &self.text[start..];
        let Some(first) = rest.chars().next() else {
            self.state.token = Token::EndOfFile;
            return Token::EndOfFile;
        };

        let (token, len) = match first {
            '\n' => (Token::NewLine, 1),
            '\r' if rest.as_bytes().get(1) == Some(&b'\n') => (Token::NewLine, 2),
            '\r' => (Token::NewLine, 1),
            ' ' | '\t' => {
                let len = rest
                    .find(|c: char| c != ' ' && c != '\t')
                    .unwrap_or(rest.len());
                (Token::Whitespace, len)
            }
            c => match Token::for_char(c) {
                Some(token) => (token, 1),
                None => {
                    let len = rest
                        .find(|c: char| {
                            matches!(c, ' ' | '\t' | '\n' | '\r') || Token::for_char(c).is_some()
                        })
                        .unwrap_or(rest.len());
                    (Token::Text, len)
                }
            },
        };

        self.bump(len);
        self.state.token_start = start;
        self.state.token = token;
        token
    }

    /// Reinterpret the input at the current token's start. The recognizer sees
    /// the text from there on and returns the token it found with its length;
    /// on `None` nothing changes.
    pub fn rescan(&mut self, recognizer: impl FnOnce(&'a str) -> Option<(Token, usize)>) -> Option<Token> {
        let start = self.state.token_start;
        let (token, len) = recognizer(&self.text[start..])?;
        let current_len = self.state.pos - start;
        if len >= current_len {
            self.bump(len - current_len);
        } else {
            self.state.pos = start + len;
        }
        self.state.token = token;
        Some(token)
    }
}
