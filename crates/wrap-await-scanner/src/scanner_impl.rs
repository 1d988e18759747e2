//! Scanner implementation.
//!
//! The scanner works on byte offsets into an `Arc<str>`. It is driven by the
//! parser one token at a time; the two places where JavaScript's lexical
//! grammar depends on syntactic context (a `/` that starts a regular
//! expression, and a `}` that continues a template literal) are handled by
//! the parser calling [`ScannerState::re_scan_slash_token`] and
//! [`ScannerState::re_scan_template_token`].

use crate::SyntaxKind;
use crate::char_codes::{
    is_decimal_digit, is_digit_in_radix, is_identifier_part, is_identifier_start, is_line_break,
    is_white_space_single_line,
};
use std::sync::Arc;
use wrap_await_common::diagnostics::{ParseDiagnostic, diagnostic_codes};

/// Punctuators, longest first so that a prefix scan finds the longest match.
const PUNCTUATORS: &[(&str, SyntaxKind)] = &[
    (">>>=", SyntaxKind::GreaterThanGreaterThanGreaterThanEqualsToken),
    ("...", SyntaxKind::DotDotDotToken),
    ("===", SyntaxKind::EqualsEqualsEqualsToken),
    ("!==", SyntaxKind::ExclamationEqualsEqualsToken),
    ("**=", SyntaxKind::AsteriskAsteriskEqualsToken),
    ("<<=", SyntaxKind::LessThanLessThanEqualsToken),
    (">>=", SyntaxKind::GreaterThanGreaterThanEqualsToken),
    (">>>", SyntaxKind::GreaterThanGreaterThanGreaterThanToken),
    ("&&=", SyntaxKind::AmpersandAmpersandEqualsToken),
    ("||=", SyntaxKind::BarBarEqualsToken),
    ("??=", SyntaxKind::QuestionQuestionEqualsToken),
    ("=>", SyntaxKind::EqualsGreaterThanToken),
    ("==", SyntaxKind::EqualsEqualsToken),
    ("!=", SyntaxKind::ExclamationEqualsToken),
    ("<=", SyntaxKind::LessThanEqualsToken),
    (">=", SyntaxKind::GreaterThanEqualsToken),
    ("**", SyntaxKind::AsteriskAsteriskToken),
    ("++", SyntaxKind::PlusPlusToken),
    ("--", SyntaxKind::MinusMinusToken),
    ("<<", SyntaxKind::LessThanLessThanToken),
    (">>", SyntaxKind::GreaterThanGreaterThanToken),
    ("&&", SyntaxKind::AmpersandAmpersandToken),
    ("||", SyntaxKind::BarBarToken),
    ("??", SyntaxKind::QuestionQuestionToken),
    ("+=", SyntaxKind::PlusEqualsToken),
    ("-=", SyntaxKind::MinusEqualsToken),
    ("*=", SyntaxKind::AsteriskEqualsToken),
    ("/=", SyntaxKind::SlashEqualsToken),
    ("%=", SyntaxKind::PercentEqualsToken),
    ("&=", SyntaxKind::AmpersandEqualsToken),
    ("|=", SyntaxKind::BarEqualsToken),
    ("^=", SyntaxKind::CaretEqualsToken),
    ("{", SyntaxKind::OpenBraceToken),
    ("}", SyntaxKind::CloseBraceToken),
    ("(", SyntaxKind::OpenParenToken),
    (")", SyntaxKind::CloseParenToken),
    ("[", SyntaxKind::OpenBracketToken),
    ("]", SyntaxKind::CloseBracketToken),
    (".", SyntaxKind::DotToken),
    (";", SyntaxKind::SemicolonToken),
    (",", SyntaxKind::CommaToken),
    ("<", SyntaxKind::LessThanToken),
    (">", SyntaxKind::GreaterThanToken),
    ("+", SyntaxKind::PlusToken),
    ("-", SyntaxKind::MinusToken),
    ("*", SyntaxKind::AsteriskToken),
    ("/", SyntaxKind::SlashToken),
    ("%", SyntaxKind::PercentToken),
    ("&", SyntaxKind::AmpersandToken),
    ("|", SyntaxKind::BarToken),
    ("^", SyntaxKind::CaretToken),
    ("!", SyntaxKind::ExclamationToken),
    ("~", SyntaxKind::TildeToken),
    ("?", SyntaxKind::QuestionToken),
    (":", SyntaxKind::ColonToken),
    ("=", SyntaxKind::EqualsToken),
];

/// Saved scanner position for speculative lookahead.
#[derive(Clone, Copy, Debug)]
pub struct ScannerSnapshot {
    pos: usize,
    token_start: usize,
    token: SyntaxKind,
    preceding_line_break: bool,
    scanned_any_token: bool,
    diagnostics_len: usize,
}

/// Tokenizer state machine over a single source text.
pub struct ScannerState {
    text: Arc<str>,
    /// Scan position; equals the end of the current token after `scan`.
    pos: usize,
    token_start: usize,
    token: SyntaxKind,
    preceding_line_break: bool,
    scanned_any_token: bool,
    diagnostics: Vec<ParseDiagnostic>,
}

impl ScannerState {
    pub fn new(text: impl Into<Arc<str>>) -> ScannerState {
        ScannerState {
            text: text.into(),
            pos: 0,
            token_start: 0,
            token: SyntaxKind::Unknown,
            preceding_line_break: false,
            scanned_any_token: false,
            diagnostics: Vec::new(),
        }
    }

    pub fn source_text(&self) -> &str {
        &self.text
    }

    pub fn source_text_arc(&self) -> Arc<str> {
        Arc::clone(&self.text)
    }

    #[inline]
    pub fn token(&self) -> SyntaxKind {
        self.token
    }

    /// Start offset of the current token (after leading trivia).
    #[inline]
    pub fn token_pos(&self) -> u32 {
        self.token_start as u32
    }

    /// End offset (exclusive) of the current token.
    #[inline]
    pub fn token_end(&self) -> u32 {
        self.pos as u32
    }

    pub fn token_text(&self) -> &str {
        &self.text[self.token_start..self.pos]
    }

    /// Whether a line terminator appeared between the previous token and the
    /// current one. Drives automatic semicolon insertion.
    #[inline]
    pub fn has_preceding_line_break(&self) -> bool {
        self.preceding_line_break
    }

    pub fn scanner_diagnostics(&self) -> &[ParseDiagnostic] {
        &self.diagnostics
    }

    pub fn save_state(&self) -> ScannerSnapshot {
        ScannerSnapshot {
            pos: self.pos,
            token_start: self.token_start,
            token: self.token,
            preceding_line_break: self.preceding_line_break,
            scanned_any_token: self.scanned_any_token,
            diagnostics_len: self.diagnostics.len(),
        }
    }

    /// Rewind to a snapshot, discarding diagnostics reported after it.
    pub fn restore_state(&mut self, snapshot: ScannerSnapshot) {
        self.pos = snapshot.pos;
        self.token_start = snapshot.token_start;
        self.token = snapshot.token;
        self.preceding_line_break = snapshot.preceding_line_break;
        self.scanned_any_token = snapshot.scanned_any_token;
        self.diagnostics.truncate(snapshot.diagnostics_len);
    }

    #[inline]
    fn char_at(&self, pos: usize) -> Option<char> {
        self.text.get(pos..).and_then(|rest| rest.chars().next())
    }

    #[inline]
    fn rest(&self) -> &str {
        &self.text[self.pos..]
    }

    fn error(&mut self, start: usize, length: usize, message: &str, code: u32) {
        self.diagnostics.push(ParseDiagnostic::new(
            start as u32,
            length as u32,
            message,
            code,
        ));
    }

    // =========================================================================
    // Main scan loop
    // =========================================================================

    /// Scan the next token, skipping whitespace and comments.
    pub fn scan(&mut self) -> SyntaxKind {
        self.preceding_line_break = false;
        self.token = self.scan_token();
        self.scanned_any_token = true;
        self.token
    }

    fn scan_token(&mut self) -> SyntaxKind {
        loop {
            self.token_start = self.pos;
            let Some(ch) = self.char_at(self.pos) else {
                return SyntaxKind::EndOfFileToken;
            };

            if is_line_break(ch) {
                self.preceding_line_break = true;
                self.pos += ch.len_utf8();
                continue;
            }
            if is_white_space_single_line(ch) {
                self.pos += ch.len_utf8();
                continue;
            }

            match ch {
                '/' if self.rest().starts_with("//") => {
                    self.skip_line_comment();
                    continue;
                }
                '/' if self.rest().starts_with("/*") => {
                    self.skip_block_comment();
                    continue;
                }
                // HTML-like comments are part of the script goal grammar
                '<' if self.rest().starts_with("<!--") => {
                    self.skip_line_comment();
                    continue;
                }
                '-' if self.rest().starts_with("-->")
                    && (self.preceding_line_break || !self.scanned_any_token) =>
                {
                    self.skip_line_comment();
                    continue;
                }
                '`' => {
                    self.pos += 1;
                    return self.scan_template_continuation(true);
                }
                '"' | '\'' => return self.scan_string(ch),
                '#' => return self.scan_private_identifier(),
                '.' if self.char_at(self.pos + 1).is_some_and(is_decimal_digit) => {
                    return self.scan_number();
                }
                // `a?.5:b` is a conditional, not optional chaining
                '?' if self.rest().starts_with("?.")
                    && !self.char_at(self.pos + 2).is_some_and(is_decimal_digit) =>
                {
                    self.pos += 2;
                    return SyntaxKind::QuestionDotToken;
                }
                c if is_decimal_digit(c) => return self.scan_number(),
                c if is_identifier_start(c) || c == '\\' => return self.scan_identifier(),
                _ => {}
            }

            if let Some(kind) = self.scan_punctuation() {
                return kind;
            }

            self.error(
                self.pos,
                ch.len_utf8(),
                "Invalid character.",
                diagnostic_codes::INVALID_CHARACTER,
            );
            self.pos += ch.len_utf8();
            return SyntaxKind::Unknown;
        }
    }

    fn scan_punctuation(&mut self) -> Option<SyntaxKind> {
        let rest = self.rest();
        let (text, kind) = PUNCTUATORS
            .iter()
            .find(|(text, _)| rest.starts_with(text))?;
        self.pos += text.len();
        Some(*kind)
    }

    // =========================================================================
    // Trivia
    // =========================================================================

    /// Skip to (not past) the next line terminator.
    fn skip_line_comment(&mut self) {
        let bytes = &self.text.as_bytes()[self.pos..];
        let mut offset = 0;
        loop {
            let Some(found) = memchr::memchr3(b'\n', b'\r', 0xE2, &bytes[offset..]) else {
                self.pos = self.text.len();
                return;
            };
            let at = offset + found;
            // 0xE2 leads U+2028/U+2029 but also many other characters
            if bytes[at] == 0xE2
                && !(bytes.get(at + 1) == Some(&0x80)
                    && matches!(bytes.get(at + 2), Some(0xA8) | Some(0xA9)))
            {
                offset = at + 1;
                continue;
            }
            self.pos += at;
            return;
        }
    }

    fn skip_block_comment(&mut self) {
        let body_start = self.pos + 2;
        let bytes = self.text.as_bytes();
        match memchr::memmem::find(&bytes[body_start..], b"*/") {
            Some(len) => {
                let body = &bytes[body_start..body_start + len];
                if memchr::memchr2(b'\n', b'\r', body).is_some()
                    || (memchr::memchr(0xE2, body).is_some()
                        && self.text[body_start..body_start + len]
                            .contains(['\u{2028}', '\u{2029}']))
                {
                    self.preceding_line_break = true;
                }
                self.pos = body_start + len + 2;
            }
            None => {
                self.error(
                    self.pos,
                    2,
                    "'*/' expected.",
                    diagnostic_codes::ASTERISK_SLASH_EXPECTED,
                );
                self.pos = self.text.len();
            }
        }
    }

    // =========================================================================
    // Names
    // =========================================================================

    fn scan_identifier(&mut self) -> SyntaxKind {
        let start = self.pos;
        let mut has_escape = false;
        loop {
            match self.char_at(self.pos) {
                Some('\\') => {
                    if !self.scan_unicode_escape() {
                        self.error(
                            self.pos,
                            1,
                            "Invalid character.",
                            diagnostic_codes::INVALID_CHARACTER,
                        );
                        self.pos += 1;
                        return SyntaxKind::Unknown;
                    }
                    has_escape = true;
                }
                Some(c) if is_identifier_part(c) => self.pos += c.len_utf8(),
                _ => break,
            }
        }
        // Escaped keywords never act as keywords
        if has_escape {
            return SyntaxKind::Identifier;
        }
        SyntaxKind::keyword_from_text(&self.text[start..self.pos]).unwrap_or(SyntaxKind::Identifier)
    }

    /// Consume `\uXXXX` or `\u{X...}` at the current position.
    fn scan_unicode_escape(&mut self) -> bool {
        let rest = self.rest();
        let Some(after_u) = rest.strip_prefix("\\u") else {
            return false;
        };
        if let Some(braced) = after_u.strip_prefix('{') {
            let digits = braced
                .chars()
                .take_while(|c| c.is_ascii_hexdigit())
                .count();
            if digits == 0 || !braced[digits..].starts_with('}') {
                return false;
            }
            self.pos += 3 + digits + 1;
            return true;
        }
        let digits = after_u
            .chars()
            .take(4)
            .take_while(|c| c.is_ascii_hexdigit())
            .count();
        if digits != 4 {
            return false;
        }
        self.pos += 6;
        true
    }

    fn scan_private_identifier(&mut self) -> SyntaxKind {
        let start = self.pos;
        self.pos += 1;
        match self.char_at(self.pos) {
            Some(c) if is_identifier_start(c) || c == '\\' => {
                if self.scan_identifier() == SyntaxKind::Unknown {
                    return SyntaxKind::Unknown;
                }
                SyntaxKind::PrivateIdentifier
            }
            _ => {
                self.error(
                    start,
                    1,
                    "Invalid character.",
                    diagnostic_codes::INVALID_CHARACTER,
                );
                SyntaxKind::Unknown
            }
        }
    }

    // =========================================================================
    // Literals
    // =========================================================================

    fn scan_digits(&mut self, radix: u32) -> bool {
        let mut any = false;
        loop {
            match self.char_at(self.pos) {
                Some(c) if is_digit_in_radix(c, radix) => {
                    any = true;
                    self.pos += 1;
                }
                Some('_')
                    if any
                        && self
                            .char_at(self.pos + 1)
                            .is_some_and(|c| is_digit_in_radix(c, radix)) =>
                {
                    self.pos += 1;
                }
                _ => return any,
            }
        }
    }

    fn scan_number(&mut self) -> SyntaxKind {
        let start = self.pos;
        let mut kind = SyntaxKind::NumericLiteral;
        let rest = self.rest();
        let radix = if rest.starts_with("0x") || rest.starts_with("0X") {
            16
        } else if rest.starts_with("0o") || rest.starts_with("0O") {
            8
        } else if rest.starts_with("0b") || rest.starts_with("0B") {
            2
        } else {
            10
        };

        if radix != 10 {
            self.pos += 2;
            if !self.scan_digits(radix) {
                let (message, code) = if radix == 16 {
                    (
                        "Hexadecimal digit expected.",
                        diagnostic_codes::HEXADECIMAL_DIGIT_EXPECTED,
                    )
                } else {
                    ("Digit expected.", diagnostic_codes::DIGIT_EXPECTED)
                };
                self.error(self.pos, 0, message, code);
            }
            if self.char_at(self.pos) == Some('n') {
                self.pos += 1;
                kind = SyntaxKind::BigIntLiteral;
            }
        } else {
            if self.char_at(self.pos) == Some('.') {
                self.pos += 1;
                self.scan_digits(10);
            } else {
                self.scan_digits(10);
                match self.char_at(self.pos) {
                    Some('.') => {
                        self.pos += 1;
                        self.scan_digits(10);
                    }
                    Some('n') => {
                        self.pos += 1;
                        kind = SyntaxKind::BigIntLiteral;
                    }
                    _ => {}
                }
            }
            if kind == SyntaxKind::NumericLiteral && matches!(self.char_at(self.pos), Some('e' | 'E'))
            {
                self.pos += 1;
                if matches!(self.char_at(self.pos), Some('+' | '-')) {
                    self.pos += 1;
                }
                if !self.scan_digits(10) {
                    self.error(
                        self.pos,
                        0,
                        "Digit expected.",
                        diagnostic_codes::DIGIT_EXPECTED,
                    );
                }
            }
        }

        if self
            .char_at(self.pos)
            .is_some_and(|c| is_identifier_start(c) || c == '\\')
        {
            self.error(
                start,
                self.pos - start,
                "An identifier or keyword cannot immediately follow a numeric literal.",
                diagnostic_codes::IDENTIFIER_CANNOT_FOLLOW_NUMERIC_LITERAL,
            );
        }
        kind
    }

    fn scan_string(&mut self, quote: char) -> SyntaxKind {
        let start = self.pos;
        self.pos += 1;
        loop {
            match self.char_at(self.pos) {
                None | Some('\n' | '\r') => {
                    self.error(
                        start,
                        self.pos - start,
                        "Unterminated string literal.",
                        diagnostic_codes::UNTERMINATED_STRING_LITERAL,
                    );
                    break;
                }
                Some(c) if c == quote => {
                    self.pos += 1;
                    break;
                }
                Some('\\') => {
                    self.pos += 1;
                    if self.rest().starts_with("\r\n") {
                        self.pos += 2;
                    } else if let Some(escaped) = self.char_at(self.pos) {
                        self.pos += escaped.len_utf8();
                    }
                }
                Some(c) => self.pos += c.len_utf8(),
            }
        }
        SyntaxKind::StringLiteral
    }

    /// Scan template characters after a backtick (`head == true`) or after the
    /// `}` closing a substitution.
    fn scan_template_continuation(&mut self, head: bool) -> SyntaxKind {
        let (complete, substitution) = if head {
            (
                SyntaxKind::NoSubstitutionTemplateLiteral,
                SyntaxKind::TemplateHead,
            )
        } else {
            (SyntaxKind::TemplateTail, SyntaxKind::TemplateMiddle)
        };
        loop {
            match self.char_at(self.pos) {
                None => {
                    self.error(
                        self.token_start,
                        self.pos - self.token_start,
                        "Unterminated template literal.",
                        diagnostic_codes::UNTERMINATED_TEMPLATE_LITERAL,
                    );
                    return complete;
                }
                Some('`') => {
                    self.pos += 1;
                    return complete;
                }
                Some('$') if self.rest().starts_with("${") => {
                    self.pos += 2;
                    return substitution;
                }
                Some('\\') => {
                    self.pos += 1;
                    if let Some(escaped) = self.char_at(self.pos) {
                        self.pos += escaped.len_utf8();
                    }
                }
                Some(c) => self.pos += c.len_utf8(),
            }
        }
    }

    // =========================================================================
    // Context-dependent rescans
    // =========================================================================

    /// Re-scan a `/` or `/=` token as a regular expression literal.
    pub fn re_scan_slash_token(&mut self) -> SyntaxKind {
        if !matches!(self.token, SyntaxKind::SlashToken | SyntaxKind::SlashEqualsToken) {
            return self.token;
        }
        self.pos = self.token_start + 1;
        let mut in_class = false;
        loop {
            match self.char_at(self.pos) {
                None => {
                    self.unterminated_regex();
                    break;
                }
                Some(c) if is_line_break(c) => {
                    self.unterminated_regex();
                    break;
                }
                Some('\\') => {
                    self.pos += 1;
                    if let Some(escaped) = self.char_at(self.pos)
                        && !is_line_break(escaped)
                    {
                        self.pos += escaped.len_utf8();
                    }
                }
                Some('[') => {
                    in_class = true;
                    self.pos += 1;
                }
                Some(']') => {
                    in_class = false;
                    self.pos += 1;
                }
                Some('/') if !in_class => {
                    self.pos += 1;
                    break;
                }
                Some(c) => self.pos += c.len_utf8(),
            }
        }
        while let Some(flag) = self.char_at(self.pos)
            && is_identifier_part(flag)
        {
            self.pos += flag.len_utf8();
        }
        self.token = SyntaxKind::RegularExpressionLiteral;
        self.token
    }

    fn unterminated_regex(&mut self) {
        self.error(
            self.token_start,
            self.pos - self.token_start,
            "Unterminated regular expression literal.",
            diagnostic_codes::UNTERMINATED_REGULAR_EXPRESSION_LITERAL,
        );
    }

    /// Re-scan a `}` token as the continuation of a template literal.
    pub fn re_scan_template_token(&mut self) -> SyntaxKind {
        if self.token != SyntaxKind::CloseBraceToken {
            return self.token;
        }
        self.pos = self.token_start + 1;
        self.token = self.scan_template_continuation(false);
        self.token
    }
}
