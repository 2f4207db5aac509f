//! Scanning driver for Tally expressions.
//!
//! The scanner consumes the raw text exactly once and drives a
//! [`TreeBuilder`](crate::parser::TreeBuilder) through paired begin/end calls in
//! well-nested source order. It deliberately applies **no** operator precedence:
//! operators are emitted as childless sibling nodes in scan order, and the regrouping
//! pass reshapes the run afterwards. Function and modifier names are resolved through
//! the builder's fragment table; the fragment's parse handle takes over from there.
//!
//! Handles:
//! - data references `#{a.b}`, variables `V{name}`, named values `[name]`
//! - literals: integers, decimal/scientific numbers, quoted strings, `true`/`false`,
//!   `null` (dates only where a fragment asks for a date argument)
//! - operators, including the word spellings `and`, `or`, `not`
//! - whitespace collection when position tracking is requested

use std::iter::Peekable;
use std::str::CharIndices;

use crate::ast::{NodeKind, Span, WhitespaceToken};
use crate::diagnostics::ParseError;
use crate::parser::TreeBuilder;

/// Scan `input`, driving `builder` through begin/end calls for every recognized
/// construct. Returns the whitespace tokens that were skipped (empty unless
/// `track_positions` is set).
pub fn scan(
    input: &str,
    builder: &mut TreeBuilder,
    track_positions: bool,
) -> Result<Vec<WhitespaceToken>, ParseError> {
    let mut scanner = Scanner::new(input, track_positions);
    scanner.skip_ws();
    if !scanner.is_at_end() {
        scanner.expression(builder)?;
        scanner.skip_ws();
        let found = scanner.peek();
        if found.is_some() {
            return Err(scanner.unexpected("end of expression", found));
        }
    }
    Ok(scanner.whitespace)
}

/// Scanner state over one expression.
pub struct Scanner<'a> {
    source: &'a str,
    chars: Peekable<CharIndices<'a>>,
    current_pos: usize,
    track: bool,
    whitespace: Vec<WhitespaceToken>,
    /// Start offset of the name token (or leading `.`) of the fragment being invoked.
    fragment_start: usize,
}

impl<'a> Scanner<'a> {
    fn new(source: &'a str, track: bool) -> Self {
        Self {
            source,
            chars: source.char_indices().peekable(),
            current_pos: 0,
            track,
            whitespace: Vec::new(),
            fragment_start: 0,
        }
    }

    // ========================================================================
    // Core character handling
    // ========================================================================

    fn is_at_end(&mut self) -> bool {
        self.chars.peek().is_none()
    }

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().map(|(_, c)| *c)
    }

    fn peek_second(&self) -> Option<char> {
        self.source[self.current_pos..].chars().nth(1)
    }

    fn advance(&mut self) -> Option<char> {
        if let Some((pos, c)) = self.chars.next() {
            self.current_pos = pos + c.len_utf8();
            Some(c)
        } else {
            None
        }
    }

    fn match_char(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect_char(&mut self, expected: char) -> Result<(), ParseError> {
        if self.match_char(expected) {
            Ok(())
        } else {
            let found = self.peek();
            Err(self.unexpected(&format!("'{expected}'"), found))
        }
    }

    /// Consume `word` if it is next and ends at an identifier boundary.
    fn match_word(&mut self, word: &str) -> bool {
        let rest = &self.source[self.current_pos..];
        if !rest.starts_with(word) {
            return false;
        }
        let boundary = rest[word.len()..]
            .chars()
            .next()
            .is_none_or(|c| !(c.is_ascii_alphanumeric() || c == '_'));
        if !boundary {
            return false;
        }
        for _ in 0..word.len() {
            self.advance();
        }
        true
    }

    fn skip_ws(&mut self) {
        let start = self.current_pos;
        while matches!(self.peek(), Some(c) if c.is_whitespace()) {
            self.advance();
        }
        if self.track && self.current_pos > start {
            self.whitespace.push(WhitespaceToken {
                span: Span::new(start, self.current_pos),
                text: self.source[start..self.current_pos].to_string(),
            });
        }
    }

    fn unexpected(&mut self, expected: &str, found: Option<char>) -> ParseError {
        let (message, len) = match found {
            Some(c) => (format!("expected {expected}, found '{c}'"), c.len_utf8()),
            None => (format!("expected {expected}, found end of input"), 0),
        };
        ParseError::syntax(message, Span::new(self.current_pos, self.current_pos + len))
    }

    // ========================================================================
    // Positions exposed to fragments
    // ========================================================================

    /// Current byte offset.
    pub fn pos(&self) -> usize {
        self.current_pos
    }

    /// Start offset of the fragment currently being invoked.
    pub fn fragment_start(&self) -> usize {
        self.fragment_start
    }

    // ========================================================================
    // Expression grammar
    // ========================================================================

    /// Parse one expression at the builder's current level: operands and operators are
    /// emitted as a flat sibling run, to be reshaped by the regrouping pass.
    pub fn expression(&mut self, builder: &mut TreeBuilder) -> Result<(), ParseError> {
        self.operand(builder)?;
        loop {
            self.skip_ws();
            let Some((spelling, start)) = self.binary_operator()? else {
                break;
            };
            builder.begin_node(NodeKind::BinaryOperator, start, spelling, None)?;
            builder.end_node(NodeKind::BinaryOperator, self.current_pos)?;
            self.operand(builder)?;
        }
        Ok(())
    }

    /// One operand: any number of prefix operators (emitted as childless siblings),
    /// a primary, then trailing modifier invocations.
    fn operand(&mut self, builder: &mut TreeBuilder) -> Result<(), ParseError> {
        self.skip_ws();
        let start = self.current_pos;
        match self.peek() {
            Some(c @ ('+' | '-' | '!')) => {
                self.advance();
                builder.begin_node(NodeKind::UnaryOperator, start, c.to_string(), None)?;
                builder.end_node(NodeKind::UnaryOperator, self.current_pos)?;
                return self.operand(builder);
            }
            Some(c) if c.is_ascii_alphabetic() && self.match_word("not") => {
                builder.begin_node(NodeKind::UnaryOperator, start, "not", None)?;
                builder.end_node(NodeKind::UnaryOperator, self.current_pos)?;
                return self.operand(builder);
            }
            _ => {}
        }
        self.primary(builder)?;
        self.modifiers(builder)
    }

    fn primary(&mut self, builder: &mut TreeBuilder) -> Result<(), ParseError> {
        let start = self.current_pos;
        match self.peek() {
            Some('(') => {
                self.advance();
                builder.begin_node(NodeKind::Grouping, start, "", None)?;
                self.expression(builder)?;
                self.skip_ws();
                self.expect_char(')')?;
                builder.end_node(NodeKind::Grouping, self.current_pos)
            }
            Some('#') => self.data_reference(builder),
            Some('[') => self.named_value(builder),
            Some('\'' | '"') => self.string_literal(builder),
            Some(c) if c.is_ascii_digit() => self.number(builder),
            Some(c) if c.is_ascii_alphabetic() || c == '_' => self.word(builder),
            found => Err(self.unexpected("expression", found)),
        }
    }

    /// `#{seg.seg…}`: composite data reference with one identifier child per segment.
    fn data_reference(&mut self, builder: &mut TreeBuilder) -> Result<(), ParseError> {
        let start = self.current_pos;
        self.advance(); // '#'
        self.expect_char('{')?;
        let mut segments: Vec<(String, usize, usize)> = Vec::new();
        loop {
            let (name, seg_start) = self.ident("data reference path segment")?;
            segments.push((name, seg_start, self.current_pos));
            if !self.match_char('.') {
                break;
            }
        }
        self.expect_char('}')?;

        let path = segments
            .iter()
            .map(|(name, _, _)| name.as_str())
            .collect::<Vec<_>>()
            .join(".");
        builder.begin_node(NodeKind::DataReference, start, path, None)?;
        for (name, seg_start, seg_end) in segments {
            builder.begin_node(NodeKind::Identifier, seg_start, name, None)?;
            builder.end_node(NodeKind::Identifier, seg_end)?;
        }
        builder.end_node(NodeKind::DataReference, self.current_pos)
    }

    /// `[name]`: named value leaf.
    fn named_value(&mut self, builder: &mut TreeBuilder) -> Result<(), ParseError> {
        let start = self.current_pos;
        self.advance(); // '['
        let (name, _) = self.ident("named value")?;
        self.expect_char(']')?;
        builder.begin_node(NodeKind::NamedValue, start, name, None)?;
        builder.end_node(NodeKind::NamedValue, self.current_pos)
    }

    /// Single- or double-quoted string literal. Backslash escapes the next character;
    /// escape sequences are kept verbatim in the raw value.
    fn string_literal(&mut self, builder: &mut TreeBuilder) -> Result<(), ParseError> {
        let start = self.current_pos;
        let Some(quote) = self.advance() else {
            return Err(self.unexpected("string literal", None));
        };
        let content_start = self.current_pos;
        loop {
            match self.advance() {
                None => {
                    return Err(ParseError::syntax(
                        "unterminated string literal",
                        Span::new(start, self.current_pos),
                    ));
                }
                Some('\\') => {
                    self.advance();
                }
                Some(c) if c == quote => break,
                Some(_) => {}
            }
        }
        let content_end = self.current_pos - quote.len_utf8();
        let raw = self.source[content_start..content_end].to_string();
        builder.begin_node(NodeKind::String, start, raw, None)?;
        builder.end_node(NodeKind::String, self.current_pos)
    }

    /// Integer or decimal/scientific number. A `.` only continues the number when a
    /// digit follows, so `1.periodOffset(…)` still scans as an integer plus modifier.
    fn number(&mut self, builder: &mut TreeBuilder) -> Result<(), ParseError> {
        let start = self.current_pos;
        let mut integral = true;
        while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
            self.advance();
        }
        if self.peek() == Some('.') && matches!(self.peek_second(), Some(c) if c.is_ascii_digit()) {
            integral = false;
            self.advance(); // '.'
            while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
                self.advance();
            }
        }
        if matches!(self.peek(), Some('e' | 'E')) {
            let exponent = match self.peek_second() {
                Some(c) if c.is_ascii_digit() => true,
                Some('+' | '-') => self.source[self.current_pos..]
                    .chars()
                    .nth(2)
                    .is_some_and(|c| c.is_ascii_digit()),
                _ => false,
            };
            if exponent {
                integral = false;
                self.advance(); // 'e'
                if matches!(self.peek(), Some('+' | '-')) {
                    self.advance();
                }
                while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
                    self.advance();
                }
            }
        }
        let raw = self.source[start..self.current_pos].to_string();
        let kind = if integral { NodeKind::Integer } else { NodeKind::Number };
        builder.begin_node(kind, start, raw, None)?;
        builder.end_node(kind, self.current_pos)
    }

    /// Identifier-led constructs: boolean/null literals, `V{…}` variables, and
    /// function fragments.
    fn word(&mut self, builder: &mut TreeBuilder) -> Result<(), ParseError> {
        let (word, start) = self.ident("expression")?;
        match word.as_str() {
            "true" | "false" => {
                builder.begin_node(NodeKind::Boolean, start, word, None)?;
                builder.end_node(NodeKind::Boolean, self.current_pos)
            }
            "null" => {
                builder.begin_node(NodeKind::Null, start, word, None)?;
                builder.end_node(NodeKind::Null, self.current_pos)
            }
            "V" if self.peek() == Some('{') => {
                self.advance(); // '{'
                let (name, name_start) = self.ident("variable name")?;
                let name_end = self.current_pos;
                self.expect_char('}')?;
                builder.begin_node(NodeKind::Variable, start, name.clone(), None)?;
                builder.begin_node(NodeKind::Identifier, name_start, name, None)?;
                builder.end_node(NodeKind::Identifier, name_end)?;
                builder.end_node(NodeKind::Variable, self.current_pos)
            }
            _ if self.peek() == Some('(') => {
                let Some(fragment) = builder.fragment(&word) else {
                    return Err(ParseError::UnknownFunction {
                        name: word,
                        at: Some(crate::diagnostics::to_source_span(Span::new(start, self.current_pos))),
                    });
                };
                tracing::trace!(name = %word, "dispatching function fragment");
                self.fragment_start = start;
                fragment.parse(self, builder)
            }
            _ => Err(ParseError::syntax(
                format!("unexpected identifier '{word}'"),
                Span::new(start, self.current_pos),
            )),
        }
    }

    /// Zero or more `.name…` modifier invocations after an operand. Each fragment
    /// emits its modifier node as a sibling; relocation happens in the propagation
    /// pass, not here.
    fn modifiers(&mut self, builder: &mut TreeBuilder) -> Result<(), ParseError> {
        loop {
            self.skip_ws();
            if self.peek() != Some('.') {
                return Ok(());
            }
            let dot = self.current_pos;
            self.advance();
            let (name, name_start) = self.ident("modifier name")?;
            let Some(fragment) = builder.fragment(&name) else {
                return Err(ParseError::UnknownModifier {
                    name,
                    at: Some(crate::diagnostics::to_source_span(Span::new(
                        name_start,
                        self.current_pos,
                    ))),
                });
            };
            tracing::trace!(name = %name, "dispatching modifier fragment");
            self.fragment_start = dot;
            fragment.parse(self, builder)?;
        }
    }

    fn ident(&mut self, what: &str) -> Result<(String, usize), ParseError> {
        let start = self.current_pos;
        match self.peek() {
            Some(c) if c.is_ascii_alphabetic() || c == '_' => {
                self.advance();
            }
            found => return Err(self.unexpected(what, found)),
        }
        while matches!(self.peek(), Some(c) if c.is_ascii_alphanumeric() || c == '_') {
            self.advance();
        }
        Ok((self.source[start..self.current_pos].to_string(), start))
    }

    /// Recognize an infix operator after an operand, if one is next.
    fn binary_operator(&mut self) -> Result<Option<(String, usize)>, ParseError> {
        let start = self.current_pos;
        let result = match self.peek() {
            Some(c @ ('^' | '*' | '/' | '%' | '+' | '-')) => {
                self.advance();
                Some(c.to_string())
            }
            Some('<') => {
                self.advance();
                Some(if self.match_char('=') { "<=" } else { "<" }.to_string())
            }
            Some('>') => {
                self.advance();
                Some(if self.match_char('=') { ">=" } else { ">" }.to_string())
            }
            Some('=') => {
                self.advance();
                if self.match_char('=') {
                    Some("==".to_string())
                } else {
                    let found = self.peek();
                    return Err(self.unexpected("'=='", found));
                }
            }
            Some('!') => {
                self.advance();
                if self.match_char('=') {
                    Some("!=".to_string())
                } else {
                    let found = self.peek();
                    return Err(self.unexpected("'!='", found));
                }
            }
            Some('&') => {
                self.advance();
                if self.match_char('&') {
                    Some("&&".to_string())
                } else {
                    let found = self.peek();
                    return Err(self.unexpected("'&&'", found));
                }
            }
            Some('|') => {
                self.advance();
                if self.match_char('|') {
                    Some("||".to_string())
                } else {
                    let found = self.peek();
                    return Err(self.unexpected("'||'", found));
                }
            }
            Some(c) if c.is_ascii_alphabetic() => {
                if self.match_word("and") {
                    Some("and".to_string())
                } else if self.match_word("or") {
                    Some("or".to_string())
                } else {
                    None
                }
            }
            _ => None,
        };
        Ok(result.map(|spelling| (spelling, start)))
    }

    // ========================================================================
    // Argument helpers invoked by fragments
    // ========================================================================

    /// `( expr, … )`: one argument node per expression, arity checked against
    /// `min`..=`max` (`max == None` means unbounded).
    pub fn function_arguments(
        &mut self,
        builder: &mut TreeBuilder,
        name: &str,
        min: usize,
        max: Option<usize>,
    ) -> Result<(), ParseError> {
        self.expect_char('(')?;
        let mut count = 0usize;
        self.skip_ws();
        if self.peek() != Some(')') {
            loop {
                self.skip_ws();
                let arg_start = self.current_pos;
                builder.begin_node(NodeKind::Argument, arg_start, count.to_string(), None)?;
                self.expression(builder)?;
                builder.end_node(NodeKind::Argument, self.current_pos)?;
                count += 1;
                self.skip_ws();
                if !self.match_char(',') {
                    break;
                }
            }
        }
        self.expect_char(')')?;
        if count < min {
            return Err(ParseError::syntax(
                format!("function '{name}' expects at least {min} argument(s), found {count}"),
                Span::new(self.fragment_start, self.current_pos),
            ));
        }
        if let Some(max) = max {
            if count > max {
                return Err(ParseError::syntax(
                    format!("function '{name}' expects at most {max} argument(s), found {count}"),
                    Span::new(self.fragment_start, self.current_pos),
                ));
            }
        }
        Ok(())
    }

    /// `( IDENT )`: single identifier argument.
    pub fn identifier_argument(&mut self, builder: &mut TreeBuilder) -> Result<(), ParseError> {
        self.expect_char('(')?;
        self.skip_ws();
        let arg_start = self.current_pos;
        builder.begin_node(NodeKind::Argument, arg_start, "0", None)?;
        let (name, name_start) = self.ident("identifier argument")?;
        builder.begin_node(NodeKind::Identifier, name_start, name, None)?;
        builder.end_node(NodeKind::Identifier, self.current_pos)?;
        builder.end_node(NodeKind::Argument, self.current_pos)?;
        self.skip_ws();
        self.expect_char(')')
    }

    /// `( [+-]?digits )`: single integer argument.
    pub fn integer_argument(&mut self, builder: &mut TreeBuilder) -> Result<(), ParseError> {
        self.expect_char('(')?;
        self.skip_ws();
        let arg_start = self.current_pos;
        builder.begin_node(NodeKind::Argument, arg_start, "0", None)?;
        let int_start = self.current_pos;
        if matches!(self.peek(), Some('+' | '-')) {
            self.advance();
        }
        if !matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
            let found = self.peek();
            return Err(self.unexpected("integer argument", found));
        }
        while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
            self.advance();
        }
        let raw = self.source[int_start..self.current_pos].to_string();
        builder.begin_node(NodeKind::Integer, int_start, raw, None)?;
        builder.end_node(NodeKind::Integer, self.current_pos)?;
        builder.end_node(NodeKind::Argument, self.current_pos)?;
        self.skip_ws();
        self.expect_char(')')
    }

    /// `( yyyy-mm-dd )`: single date argument. Dates are only recognized here, never
    /// in a general expression where they would be ambiguous with subtraction.
    pub fn date_argument(&mut self, builder: &mut TreeBuilder) -> Result<(), ParseError> {
        self.expect_char('(')?;
        self.skip_ws();
        let arg_start = self.current_pos;
        builder.begin_node(NodeKind::Argument, arg_start, "0", None)?;
        let date_start = self.current_pos;
        self.digits_exact(4)?;
        self.expect_char('-')?;
        self.digits_exact(2)?;
        self.expect_char('-')?;
        self.digits_exact(2)?;
        let raw = self.source[date_start..self.current_pos].to_string();
        builder.begin_node(NodeKind::Date, date_start, raw, None)?;
        builder.end_node(NodeKind::Date, self.current_pos)?;
        builder.end_node(NodeKind::Argument, self.current_pos)?;
        self.skip_ws();
        self.expect_char(')')
    }

    /// Optional empty argument list: consumes `()` when present, nothing otherwise.
    pub fn no_arguments(&mut self) -> Result<(), ParseError> {
        if self.match_char('(') {
            self.skip_ws();
            self.expect_char(')')?;
        }
        Ok(())
    }

    fn digits_exact(&mut self, count: usize) -> Result<(), ParseError> {
        for _ in 0..count {
            if !matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
                let found = self.peek();
                return Err(self.unexpected("date literal (yyyy-mm-dd)", found));
            }
            self.advance();
        }
        Ok(())
    }
}
