//! RC-file color extraction.
//!
//! Themes written in the legacy RC format either declare a
//! `gtk-color-scheme` string or only set per-state style colors such as
//! `bg[NORMAL] = "#ededed"`. [`extract_scheme`] scans RC text and returns a
//! scheme string suitable for [`decode`](crate::scheme::decode), built from
//! the declared scheme when there is one and from the first `fg[NORMAL]`,
//! `bg[NORMAL]` and `bg[SELECTED]` assignments otherwise.

use std::fs;
use std::path::Path;

use blsettings_types::error::Result;

use crate::scheme::{DecodedScheme, SchemeColor, decode};

/// A single RC token.
#[derive(Debug, Clone, PartialEq)]
pub enum RcToken {
    /// Identifier or keyword: `style`, `bg`, `gtk-color-scheme`.
    Ident(String),
    /// Quoted string, escapes resolved.
    String(String),
    /// Any number; integers are read as floats.
    Number(f64),
    /// `[`.
    LeftBracket,
    /// `]`.
    RightBracket,
    /// `{`.
    LeftCurly,
    /// `}`.
    RightCurly,
    /// `=`.
    Equals,
    /// `,`.
    Comma,
    /// Any other single character.
    Other(char),
    /// End-of-input sentinel.
    Eof,
}

/// Streaming tokenizer over RC source text.
pub struct RcScanner {
    input: Vec<char>,
    pos: usize,
}

impl RcScanner {
    pub fn new(input: &str) -> Self {
        Self {
            input: input.chars().collect(),
            pos: 0,
        }
    }

    /// Consume the entire input, including the trailing `Eof`.
    pub fn tokenize(&mut self) -> Vec<RcToken> {
        let mut tokens = Vec::new();
        loop {
            let tok = self.next_token();
            let is_eof = tok == RcToken::Eof;
            tokens.push(tok);
            if is_eof {
                break;
            }
        }
        tokens
    }

    fn peek(&self) -> Option<char> {
        self.input.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.input.get(self.pos + offset).copied()
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.peek();
        if ch.is_some() {
            self.pos += 1;
        }
        ch
    }

    /// Skip whitespace, `#` line comments and `/* */` block comments.
    fn skip_trivia(&mut self) {
        loop {
            match (self.peek(), self.peek_at(1)) {
                (Some(ch), _) if ch.is_whitespace() => {
                    self.advance();
                },
                (Some('#'), _) => {
                    while let Some(ch) = self.advance() {
                        if ch == '\n' {
                            break;
                        }
                    }
                },
                (Some('/'), Some('*')) => {
                    self.pos += 2;
                    while self.peek().is_some() {
                        if self.peek() == Some('*') && self.peek_at(1) == Some('/') {
                            self.pos += 2;
                            break;
                        }
                        self.advance();
                    }
                },
                _ => break,
            }
        }
    }

    fn is_ident_start(ch: char) -> bool {
        ch.is_ascii_alphabetic() || ch == '_'
    }

    fn is_ident_char(ch: char) -> bool {
        ch.is_ascii_alphanumeric() || ch == '_' || ch == '-'
    }

    fn starts_number(&self) -> bool {
        let digit_at = |offset| matches!(self.peek_at(offset), Some(d) if d.is_ascii_digit());
        match self.peek() {
            Some(ch) if ch.is_ascii_digit() => true,
            Some('.') => digit_at(1),
            Some('-') => digit_at(1) || (self.peek_at(1) == Some('.') && digit_at(2)),
            _ => false,
        }
    }

    fn consume_number(&mut self) -> f64 {
        let mut s = String::new();
        if self.peek() == Some('-') {
            s.push('-');
            self.advance();
        }
        let mut seen_dot = false;
        while let Some(ch) = self.peek() {
            if ch.is_ascii_digit() {
                s.push(ch);
            } else if ch == '.' && !seen_dot {
                seen_dot = true;
                s.push(ch);
            } else {
                break;
            }
            self.advance();
        }
        s.parse::<f64>().unwrap_or(0.0)
    }

    fn consume_string(&mut self, quote: char) -> String {
        self.advance(); // opening quote
        let mut s = String::new();
        while let Some(ch) = self.advance() {
            if ch == quote {
                break;
            }
            // Single-quoted strings are raw.
            if ch == '\\' && quote == '"' {
                match self.advance() {
                    Some('n') => s.push('\n'),
                    Some('t') => s.push('\t'),
                    Some(other) => s.push(other),
                    None => break,
                }
            } else {
                s.push(ch);
            }
        }
        s
    }

    pub fn next_token(&mut self) -> RcToken {
        self.skip_trivia();

        let Some(ch) = self.peek() else {
            return RcToken::Eof;
        };

        if ch == '"' || ch == '\'' {
            return RcToken::String(self.consume_string(ch));
        }

        if self.starts_number() {
            return RcToken::Number(self.consume_number());
        }

        if Self::is_ident_start(ch) {
            let mut ident = String::new();
            while let Some(c) = self.peek() {
                if !Self::is_ident_char(c) {
                    break;
                }
                ident.push(c);
                self.advance();
            }
            return RcToken::Ident(ident);
        }

        self.advance();
        match ch {
            '[' => RcToken::LeftBracket,
            ']' => RcToken::RightBracket,
            '{' => RcToken::LeftCurly,
            '}' => RcToken::RightCurly,
            '=' => RcToken::Equals,
            ',' => RcToken::Comma,
            other => RcToken::Other(other),
        }
    }
}

/// Slots already known while scanning.
#[derive(Debug, Default)]
struct Seen {
    fg: bool,
    bg: bool,
    selected_bg: bool,
}

impl Seen {
    fn complete(&self) -> bool {
        self.fg && self.bg && self.selected_bg
    }

    fn mark(&mut self, which: SchemeColor) {
        match which {
            SchemeColor::Foreground => self.fg = true,
            SchemeColor::Background => self.bg = true,
            SchemeColor::SelectedBackground => self.selected_bg = true,
        }
    }

    fn has(&self, which: SchemeColor) -> bool {
        match which {
            SchemeColor::Foreground => self.fg,
            SchemeColor::Background => self.bg,
            SchemeColor::SelectedBackground => self.selected_bg,
        }
    }

    /// Slots named anywhere in a scheme string.
    fn from_scheme(scheme: &str) -> Self {
        let mut seen = Self::default();
        for entry in scheme.split([';', '\n']) {
            if let Some((key, _)) = entry.split_once(':')
                && let Some(which) = SchemeColor::from_key(key.trim())
            {
                seen.mark(which);
            }
        }
        seen
    }
}

fn is_scheme_symbol(name: &str) -> bool {
    name == "gtk-color-scheme" || name == "gtk_color_scheme"
}

/// Read `[STATE] = value` after a `fg`/`bg` keyword.
///
/// Returns the state name and the color text, where `{ r, g, b }` float
/// triples are rendered as `#rrggbb`. `None` when the tokens do not form an
/// assignment with a usable value.
fn read_state_assignment(scanner: &mut RcScanner) -> Option<(String, String)> {
    if scanner.next_token() != RcToken::LeftBracket {
        return None;
    }
    let RcToken::Ident(state) = scanner.next_token() else {
        return None;
    };
    if scanner.next_token() != RcToken::RightBracket || scanner.next_token() != RcToken::Equals {
        return None;
    }
    match scanner.next_token() {
        RcToken::String(s) => Some((state, s)),
        RcToken::LeftCurly => {
            let mut hex = String::from("#");
            loop {
                match scanner.next_token() {
                    RcToken::RightCurly | RcToken::Eof => break,
                    RcToken::Number(f) => {
                        let component = (f * 255.0).clamp(0.0, 255.0) as u8;
                        hex.push_str(&format!("{component:02x}"));
                    },
                    _ => {},
                }
            }
            Some((state, hex))
        },
        _ => None,
    }
}

/// Extract a scheme string from RC source text.
pub fn extract_scheme(source: &str) -> String {
    let mut scanner = RcScanner::new(source);
    let mut scheme = String::new();
    let mut fallback = String::new();
    let mut seen = Seen::default();

    loop {
        let token = scanner.next_token();
        match token {
            RcToken::Eof => break,
            RcToken::Ident(ref name) if is_scheme_symbol(name) => {
                if scanner.next_token() == RcToken::Equals
                    && let RcToken::String(value) = scanner.next_token()
                {
                    scheme.push('\n');
                    scheme.push_str(&value);
                    seen = Seen::from_scheme(&scheme);
                }
            },
            RcToken::Ident(ref name) if scheme.is_empty() && (name == "bg" || name == "fg") => {
                let Some((state, color)) = read_state_assignment(&mut scanner) else {
                    continue;
                };
                let which = match (name.as_str(), state.as_str()) {
                    ("bg", "SELECTED") => SchemeColor::SelectedBackground,
                    ("bg", "NORMAL") => SchemeColor::Background,
                    ("fg", "NORMAL") => SchemeColor::Foreground,
                    _ => continue,
                };
                if !seen.has(which) {
                    fallback.push('\n');
                    fallback.push_str(which.key());
                    fallback.push(':');
                    fallback.push_str(&color);
                    seen.mark(which);
                }
            },
            _ => {},
        }

        if seen.complete() {
            break;
        }
    }

    if scheme.is_empty() { fallback } else { scheme }
}

/// Extract a scheme string from a single RC file.
pub fn extract_scheme_from_file(path: &Path) -> Result<String> {
    let source = fs::read_to_string(path).inspect_err(|e| {
        log::warn!("Could not open file \"{}\": {e}", path.display());
    })?;
    Ok(extract_scheme(&source))
}

/// Extract and decode the colors of RC source text.
pub fn decode_rc(source: &str) -> DecodedScheme {
    decode(&extract_scheme(source))
}
