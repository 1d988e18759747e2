//! Parser state: token cursor, context flags, diagnostics and node helpers.
//!
//! `ParserState` is a recursive descent parser over a [`ScannerState`]. The
//! grammar methods live in sibling modules (`state_statements`,
//! `state_expressions`, `state_statements_class_members`); this module holds
//! the shared machinery they build on.

use super::base::{NodeIndex, NodeList};
use super::flags::ContextFlags;
use super::node::{NodeArena, NodeData};
use std::sync::Arc;
use tracing::{debug, trace};
use wrap_await_common::diagnostics::{ParseDiagnostic, diagnostic_codes, format_message};
use wrap_await_common::limits::{MAX_PARSE_DEPTH, NODES_PER_SOURCE_BYTE_DIVISOR};
use wrap_await_scanner::{ScannerSnapshot, ScannerState, SyntaxKind};

/// Result of a grammar method. The first error aborts the parse.
pub type ParseResult<T> = Result<T, ParseDiagnostic>;

/// Saved parser position for speculative lookahead.
#[derive(Clone, Copy, Debug)]
pub(crate) struct ParserSnapshot {
    scanner: ScannerSnapshot,
    current_token: SyntaxKind,
    prev_token_end: u32,
}

/// Recursive descent parser for JavaScript scripts.
pub struct ParserState {
    pub(crate) scanner: ScannerState,
    pub(crate) arena: NodeArena,
    pub(crate) context_flags: ContextFlags,
    pub(crate) recursion_depth: u32,
    current_token: SyntaxKind,
    /// End of the most recently consumed token; the end of a node being
    /// finished.
    prev_token_end: u32,
}

impl ParserState {
    pub fn new(text: impl Into<Arc<str>>) -> ParserState {
        let scanner = ScannerState::new(text);
        let text = scanner.source_text_arc();
        let capacity = text.len() / NODES_PER_SOURCE_BYTE_DIVISOR + 16;
        ParserState {
            scanner,
            arena: NodeArena::with_capacity(text, capacity),
            context_flags: ContextFlags::empty(),
            recursion_depth: 0,
            current_token: SyntaxKind::Unknown,
            prev_token_end: 0,
        }
    }

    /// Consume the parser and hand over the tree.
    pub fn into_arena(self) -> NodeArena {
        self.arena
    }

    pub fn get_arena(&self) -> &NodeArena {
        &self.arena
    }

    /// Parse the whole text as a script and return the `SourceFile` node.
    ///
    /// Scanner diagnostics take precedence over the parser error they cause:
    /// an unterminated string is reported as such, not as the `';' expected`
    /// that follows it.
    #[tracing::instrument(level = "debug", skip(self), fields(len = self.scanner.source_text().len()))]
    pub fn parse_source_file(&mut self) -> ParseResult<NodeIndex> {
        let result = self.parse_source_file_inner();
        let scanner_error = self
            .scanner
            .scanner_diagnostics()
            .iter()
            .min_by_key(|diag| diag.start)
            .cloned();
        let result = match (result, scanner_error) {
            (Ok(_), Some(diag)) => Err(diag),
            (Err(err), Some(diag)) if diag.start <= err.start => Err(diag),
            (result, _) => result,
        };
        match &result {
            Ok(_) => debug!(nodes = self.arena.len(), "[parser] parsed source file"),
            Err(diag) => debug!(
                code = diag.code,
                start = diag.start,
                "[parser] parse failed: {}",
                diag.message
            ),
        }
        result
    }

    fn parse_source_file_inner(&mut self) -> ParseResult<NodeIndex> {
        self.next_token();
        let statements = self.parse_statement_list(|p| p.is_token(SyntaxKind::EndOfFileToken))?;
        let end = self.scanner.source_text().len() as u32;
        Ok(self
            .arena
            .add(0, end, NodeData::SourceFile { statements }))
    }

    // =========================================================================
    // Token cursor
    // =========================================================================

    #[inline]
    pub(crate) fn token(&self) -> SyntaxKind {
        self.current_token
    }

    #[inline]
    pub(crate) fn is_token(&self, kind: SyntaxKind) -> bool {
        self.current_token == kind
    }

    #[inline]
    pub(crate) fn token_pos(&self) -> u32 {
        self.scanner.token_pos()
    }

    #[inline]
    pub(crate) fn token_end(&self) -> u32 {
        self.scanner.token_end()
    }

    pub(crate) fn token_text(&self) -> &str {
        self.scanner.token_text()
    }

    #[inline]
    pub(crate) fn has_preceding_line_break(&self) -> bool {
        self.scanner.has_preceding_line_break()
    }

    pub(crate) fn next_token(&mut self) -> SyntaxKind {
        self.prev_token_end = self.scanner.token_end();
        self.current_token = self.scanner.scan();
        trace!(token = ?self.current_token, pos = self.token_pos(), "[parser] token");
        self.current_token
    }

    /// Re-scan the current `/` or `/=` as a regular expression literal.
    pub(crate) fn re_scan_slash_token(&mut self) -> SyntaxKind {
        self.current_token = self.scanner.re_scan_slash_token();
        self.current_token
    }

    /// Re-scan the current `}` as a template continuation.
    pub(crate) fn re_scan_template_token(&mut self) -> SyntaxKind {
        self.current_token = self.scanner.re_scan_template_token();
        self.current_token
    }

    pub(crate) fn parse_optional(&mut self, kind: SyntaxKind) -> bool {
        if self.is_token(kind) {
            self.next_token();
            true
        } else {
            false
        }
    }

    pub(crate) fn parse_expected(&mut self, kind: SyntaxKind) -> ParseResult<()> {
        if self.parse_optional(kind) {
            return Ok(());
        }
        Err(self.error_at_current_token(
            &format_message("'{0}' expected.", &[kind.text()]),
            diagnostic_codes::EXPECTED,
        ))
    }

    pub(crate) fn snapshot(&self) -> ParserSnapshot {
        ParserSnapshot {
            scanner: self.scanner.save_state(),
            current_token: self.current_token,
            prev_token_end: self.prev_token_end,
        }
    }

    pub(crate) fn restore(&mut self, snapshot: ParserSnapshot) {
        self.scanner.restore_state(snapshot.scanner);
        self.current_token = snapshot.current_token;
        self.prev_token_end = snapshot.prev_token_end;
    }

    /// Run `f` speculatively and rewind the token cursor afterwards.
    pub(crate) fn look_ahead<T>(&mut self, f: impl FnOnce(&mut ParserState) -> T) -> T {
        let snapshot = self.snapshot();
        let result = f(self);
        self.restore(snapshot);
        result
    }

    /// The kind of the token after the current one, and whether a line break
    /// separates them.
    pub(crate) fn peek(&mut self) -> (SyntaxKind, bool) {
        self.look_ahead(|p| {
            let kind = p.next_token();
            (kind, p.has_preceding_line_break())
        })
    }

    // =========================================================================
    // Automatic semicolon insertion
    // =========================================================================

    /// A statement may end here: explicit `;`, a `}`, end of input, or a
    /// line break before the current token.
    pub(crate) fn can_parse_semicolon(&self) -> bool {
        matches!(
            self.token(),
            SyntaxKind::SemicolonToken | SyntaxKind::CloseBraceToken | SyntaxKind::EndOfFileToken
        ) || self.has_preceding_line_break()
    }

    pub(crate) fn parse_semicolon(&mut self) -> ParseResult<()> {
        if self.parse_optional(SyntaxKind::SemicolonToken) {
            return Ok(());
        }
        if self.can_parse_semicolon() {
            return Ok(());
        }
        Err(self.error_at_current_token("';' expected.", diagnostic_codes::EXPECTED))
    }

    // =========================================================================
    // Context
    // =========================================================================

    #[inline]
    pub(crate) fn in_async_context(&self) -> bool {
        self.context_flags.contains(ContextFlags::ASYNC)
    }

    #[inline]
    pub(crate) fn in_generator_context(&self) -> bool {
        self.context_flags.contains(ContextFlags::GENERATOR)
    }

    #[inline]
    pub(crate) fn in_disallow_in_context(&self) -> bool {
        self.context_flags.contains(ContextFlags::DISALLOW_IN)
    }

    #[inline]
    pub(crate) fn in_static_block_context(&self) -> bool {
        self.context_flags.contains(ContextFlags::STATIC_BLOCK)
    }

    /// Run `f` with `set` added to and `clear` removed from the context
    /// flags, restoring them afterwards.
    pub(crate) fn with_context<T>(
        &mut self,
        set: ContextFlags,
        clear: ContextFlags,
        f: impl FnOnce(&mut ParserState) -> ParseResult<T>,
    ) -> ParseResult<T> {
        let saved = self.context_flags;
        self.context_flags.remove(clear);
        self.context_flags.insert(set);
        let result = f(self);
        self.context_flags = saved;
        result
    }

    /// Flags for the body of a function with the given modifiers.
    pub(crate) fn function_body_context(is_async: bool, is_generator: bool) -> (ContextFlags, ContextFlags) {
        let mut set = ContextFlags::IN_FUNCTION;
        if is_async {
            set |= ContextFlags::ASYNC;
        }
        if is_generator {
            set |= ContextFlags::GENERATOR;
        }
        let clear = ContextFlags::ASYNC
            | ContextFlags::GENERATOR
            | ContextFlags::DISALLOW_IN
            | ContextFlags::STATIC_BLOCK;
        (set, clear)
    }

    /// Guard one level of grammar recursion.
    pub(crate) fn with_depth<T>(
        &mut self,
        f: impl FnOnce(&mut ParserState) -> ParseResult<T>,
    ) -> ParseResult<T> {
        if self.recursion_depth >= MAX_PARSE_DEPTH {
            debug!(depth = self.recursion_depth, "[parser] nesting limit reached");
            return Err(self.error_at_current_token(
                "Expression or statement is nested too deeply.",
                diagnostic_codes::NESTING_TOO_DEEP,
            ));
        }
        self.recursion_depth += 1;
        let result = f(self);
        self.recursion_depth -= 1;
        result
    }

    // =========================================================================
    // Identifiers
    // =========================================================================

    /// Whether the current token can be used as a binding or reference
    /// identifier in the current context.
    pub(crate) fn is_identifier(&self) -> bool {
        match self.token() {
            SyntaxKind::Identifier => true,
            SyntaxKind::AwaitKeyword => !self.in_async_context() && !self.in_static_block_context(),
            SyntaxKind::YieldKeyword => !self.in_generator_context(),
            kind => kind.is_contextual_keyword(),
        }
    }

    pub(crate) fn parse_identifier(&mut self) -> ParseResult<NodeIndex> {
        if !self.is_identifier() {
            return Err(self.error_identifier_expected());
        }
        Ok(self.make_identifier())
    }

    /// Any identifier or keyword, as in a property name after `.`.
    pub(crate) fn parse_identifier_name(&mut self) -> ParseResult<NodeIndex> {
        if !self.token().is_identifier_or_keyword() {
            return Err(self.error_identifier_expected());
        }
        Ok(self.make_identifier())
    }

    /// Create an `Identifier` node from the current token and advance.
    pub(crate) fn make_identifier(&mut self) -> NodeIndex {
        let pos = self.token_pos();
        let escaped_text = self.token_text().to_string();
        self.next_token();
        self.finish_node(pos, NodeData::Identifier { escaped_text })
    }

    pub(crate) fn make_private_identifier(&mut self) -> NodeIndex {
        let pos = self.token_pos();
        let escaped_text = self.token_text().to_string();
        self.next_token();
        self.finish_node(pos, NodeData::PrivateIdentifier { escaped_text })
    }

    // =========================================================================
    // Nodes
    // =========================================================================

    /// Add a node spanning from `pos` to the end of the last consumed token.
    #[inline]
    pub(crate) fn finish_node(&mut self, pos: u32, data: NodeData) -> NodeIndex {
        self.arena.add(pos, self.prev_token_end, data)
    }

    pub(crate) fn make_node_list(&self, nodes: Vec<NodeIndex>) -> NodeList {
        NodeList::from_vec(nodes)
    }

    pub(crate) fn node_pos(&self, index: NodeIndex) -> u32 {
        self.arena.get(index).map_or(0, |node| node.pos)
    }

    pub(crate) fn node_end(&self, index: NodeIndex) -> u32 {
        self.arena.get(index).map_or(0, |node| node.end)
    }

    // =========================================================================
    // Diagnostics
    // =========================================================================

    pub(crate) fn error_at_current_token(&self, message: &str, code: u32) -> ParseDiagnostic {
        let start = self.token_pos();
        let length = self.token_end().saturating_sub(start);
        ParseDiagnostic::new(start, length, message, code)
    }

    pub(crate) fn error_at_node(&self, index: NodeIndex, message: &str, code: u32) -> ParseDiagnostic {
        let start = self.node_pos(index);
        let length = self.node_end(index).saturating_sub(start);
        ParseDiagnostic::new(start, length, message, code)
    }

    pub(crate) fn error_unexpected_token(&self) -> ParseDiagnostic {
        if self.is_token(SyntaxKind::EndOfFileToken) {
            return self.error_at_current_token(
                "Unexpected end of input.",
                diagnostic_codes::UNEXPECTED_TOKEN,
            );
        }
        self.error_at_current_token("Unexpected token.", diagnostic_codes::UNEXPECTED_TOKEN)
    }

    pub(crate) fn error_identifier_expected(&self) -> ParseDiagnostic {
        if self.is_token(SyntaxKind::AwaitKeyword) {
            return self.error_at_current_token(
                "Identifier expected. 'await' is a reserved word that cannot be used here.",
                diagnostic_codes::IDENTIFIER_EXPECTED,
            );
        }
        self.error_at_current_token("Identifier expected.", diagnostic_codes::IDENTIFIER_EXPECTED)
    }

    pub(crate) fn error_expression_expected(&self) -> ParseDiagnostic {
        if self.is_token(SyntaxKind::EndOfFileToken) {
            return self.error_unexpected_token();
        }
        self.error_at_current_token("Expression expected.", diagnostic_codes::EXPRESSION_EXPECTED)
    }
}
