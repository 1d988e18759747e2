//! Parser state - expression parsing methods
//!
//! Precedence climbing for binary operators; everything above that is one
//! method per grammar level. Arrow functions are recognised three ways:
//! `x =>` and `async x =>` by one token of lookahead, `(...) =>` by
//! reinterpreting a parenthesised expression list, and `async (...) =>` by
//! reinterpreting a call to `async`.

use super::base::{NodeIndex, NodeList};
use super::flags::ContextFlags;
use super::node::NodeData;
use super::state::{ParseResult, ParserState};
use super::state_statements_class_members::MemberOwner;
use wrap_await_common::diagnostics::diagnostic_codes;
use wrap_await_scanner::SyntaxKind;

impl ParserState {
    // =========================================================================
    // Comma and assignment
    // =========================================================================

    /// Parse an expression (comma operator included).
    pub(crate) fn parse_expression(&mut self) -> ParseResult<NodeIndex> {
        let mut left = self.parse_assignment_expression()?;
        while self.is_token(SyntaxKind::CommaToken) {
            self.next_token();
            let right = self.parse_assignment_expression()?;
            left = self.make_binary(left, SyntaxKind::CommaToken, right);
        }
        Ok(left)
    }

    fn make_binary(&mut self, left: NodeIndex, operator: SyntaxKind, right: NodeIndex) -> NodeIndex {
        let pos = self.node_pos(left);
        self.finish_node(
            pos,
            NodeData::BinaryExpression {
                left,
                operator,
                right,
            },
        )
    }

    pub(crate) fn parse_assignment_expression(&mut self) -> ParseResult<NodeIndex> {
        self.with_depth(|p| p.parse_assignment_expression_inner())
    }

    fn parse_assignment_expression_inner(&mut self) -> ParseResult<NodeIndex> {
        if self.is_token(SyntaxKind::YieldKeyword) && self.in_generator_context() {
            return self.parse_yield_expression();
        }
        if let Some(arrow) = self.try_parse_simple_arrow_function()? {
            return Ok(arrow);
        }

        let left = self.parse_conditional_expression()?;
        if self.is_arrow_function(left) {
            return Ok(left);
        }
        let operator = self.token();
        if !operator.is_assignment_operator() {
            return Ok(left);
        }
        self.check_assignment_target(left, operator == SyntaxKind::EqualsToken)?;
        self.next_token();
        let right = self.parse_assignment_expression()?;
        Ok(self.make_binary(left, operator, right))
    }

    /// Reject assignment to anything that is not a reference or, for plain
    /// `=` and `for-in/of` heads, a destructuring pattern.
    pub(crate) fn check_assignment_target(
        &self,
        target: NodeIndex,
        allow_pattern: bool,
    ) -> ParseResult<()> {
        let valid = match self.arena.data(target) {
            Some(NodeData::Identifier { .. }) => true,
            Some(NodeData::PropertyAccessExpression { question_dot, .. })
            | Some(NodeData::ElementAccessExpression { question_dot, .. }) => {
                !*question_dot && !self.is_in_optional_chain(target)
            }
            Some(NodeData::ObjectLiteralExpression { .. })
            | Some(NodeData::ArrayLiteralExpression { .. }) => allow_pattern,
            Some(NodeData::ParenthesizedExpression { expression }) => {
                return self.check_assignment_target(*expression, false);
            }
            _ => false,
        };
        if valid {
            Ok(())
        } else {
            Err(self.error_at_node(
                target,
                "The left-hand side of an assignment expression must be a variable or a property access.",
                diagnostic_codes::INVALID_DESTRUCTURING_TARGET,
            ))
        }
    }

    /// Whether a member access continues an optional chain (`a?.b.c`).
    fn is_in_optional_chain(&self, node: NodeIndex) -> bool {
        let mut current = node;
        loop {
            match self.arena.data(current) {
                Some(NodeData::PropertyAccessExpression {
                    expression,
                    question_dot,
                    ..
                })
                | Some(NodeData::ElementAccessExpression {
                    expression,
                    question_dot,
                    ..
                })
                | Some(NodeData::CallExpression {
                    expression,
                    question_dot,
                    ..
                }) => {
                    if *question_dot {
                        return true;
                    }
                    current = *expression;
                }
                _ => return false,
            }
        }
    }

    fn parse_yield_expression(&mut self) -> ParseResult<NodeIndex> {
        let pos = self.token_pos();
        self.next_token();
        let mut asterisk = false;
        let mut expression = NodeIndex::NONE;
        if !self.has_preceding_line_break() {
            asterisk = self.parse_optional(SyntaxKind::AsteriskToken);
            if asterisk || self.is_start_of_expression() {
                expression = self.parse_assignment_expression()?;
            }
        }
        Ok(self.finish_node(
            pos,
            NodeData::YieldExpression {
                asterisk,
                expression,
            },
        ))
    }

    pub(crate) fn is_start_of_expression(&self) -> bool {
        match self.token() {
            SyntaxKind::CloseParenToken
            | SyntaxKind::CloseBracketToken
            | SyntaxKind::CloseBraceToken
            | SyntaxKind::CommaToken
            | SyntaxKind::SemicolonToken
            | SyntaxKind::ColonToken
            | SyntaxKind::EndOfFileToken
            | SyntaxKind::EqualsGreaterThanToken
            | SyntaxKind::QuestionToken
            | SyntaxKind::InKeyword
            | SyntaxKind::InstanceOfKeyword => false,
            kind => {
                kind.is_identifier_or_keyword()
                    || kind.is_literal()
                    || matches!(
                        kind,
                        SyntaxKind::OpenParenToken
                            | SyntaxKind::OpenBracketToken
                            | SyntaxKind::OpenBraceToken
                            | SyntaxKind::PlusToken
                            | SyntaxKind::MinusToken
                            | SyntaxKind::ExclamationToken
                            | SyntaxKind::TildeToken
                            | SyntaxKind::PlusPlusToken
                            | SyntaxKind::MinusMinusToken
                            | SyntaxKind::SlashToken
                            | SyntaxKind::SlashEqualsToken
                            | SyntaxKind::TemplateHead
                            | SyntaxKind::PrivateIdentifier
                    )
            }
        }
    }

    // =========================================================================
    // Arrow functions
    // =========================================================================

    pub(crate) fn is_arrow_function(&self, node: NodeIndex) -> bool {
        matches!(self.arena.data(node), Some(NodeData::ArrowFunction { .. }))
    }

    /// `x => ...` and `async x => ...`.
    fn try_parse_simple_arrow_function(&mut self) -> ParseResult<Option<NodeIndex>> {
        if self.is_token(SyntaxKind::AsyncKeyword) {
            let is_async_arrow = self.look_ahead(|p| {
                p.next_token();
                if p.has_preceding_line_break() || !p.is_identifier_in_async_parameter() {
                    return false;
                }
                p.next_token();
                p.is_token(SyntaxKind::EqualsGreaterThanToken) && !p.has_preceding_line_break()
            });
            if is_async_arrow {
                let pos = self.token_pos();
                self.next_token();
                let parameter = self.parse_simple_arrow_parameter()?;
                return self
                    .parse_arrow_function_rest(pos, true, NodeList::from_vec(vec![parameter]))
                    .map(Some);
            }
        }
        if self.is_identifier() {
            let (next, line_break) = self.peek();
            if next == SyntaxKind::EqualsGreaterThanToken && !line_break {
                let pos = self.token_pos();
                let parameter = self.parse_simple_arrow_parameter()?;
                return self
                    .parse_arrow_function_rest(pos, false, NodeList::from_vec(vec![parameter]))
                    .map(Some);
            }
        }
        Ok(None)
    }

    /// `await` cannot name an async arrow's parameter.
    fn is_identifier_in_async_parameter(&self) -> bool {
        self.is_identifier() && !self.is_token(SyntaxKind::AwaitKeyword)
    }

    fn parse_simple_arrow_parameter(&mut self) -> ParseResult<NodeIndex> {
        let pos = self.token_pos();
        let name = self.parse_identifier()?;
        Ok(self.finish_node(
            pos,
            NodeData::Parameter {
                dot_dot_dot: false,
                name,
                initializer: NodeIndex::NONE,
            },
        ))
    }

    /// `=> body` with the parameters already parsed.
    fn parse_arrow_function_rest(
        &mut self,
        pos: u32,
        is_async: bool,
        parameters: NodeList,
    ) -> ParseResult<NodeIndex> {
        if self.has_preceding_line_break() {
            return Err(self.error_at_current_token(
                "Line terminator not permitted before arrow.",
                diagnostic_codes::LINE_BREAK_NOT_PERMITTED_HERE,
            ));
        }
        self.parse_expected(SyntaxKind::EqualsGreaterThanToken)?;
        let (set, mut clear) = Self::function_body_context(is_async, false);
        // A concise body keeps the surrounding `in` restriction
        clear.remove(ContextFlags::DISALLOW_IN);
        let body = self.with_context(set, clear, |p| {
            if p.is_token(SyntaxKind::OpenBraceToken) {
                p.with_context(ContextFlags::empty(), ContextFlags::DISALLOW_IN, |p| {
                    p.parse_block()
                })
            } else {
                p.parse_assignment_expression()
            }
        })?;
        Ok(self.finish_node(
            pos,
            NodeData::ArrowFunction {
                is_async,
                parameters,
                body,
            },
        ))
    }

    /// Turn the items of `( ... )` or `async( ... )` into arrow parameters.
    fn convert_to_parameters(&mut self, items: &[NodeIndex]) -> ParseResult<NodeList> {
        let mut parameters = Vec::with_capacity(items.len());
        for (i, &item) in items.iter().enumerate() {
            let pos = self.node_pos(item);
            let end = self.node_end(item);
            let (dot_dot_dot, name, initializer) = match self.arena.data(item) {
                Some(NodeData::SpreadElement { expression }) if i + 1 == items.len() => {
                    (true, *expression, NodeIndex::NONE)
                }
                Some(NodeData::BinaryExpression {
                    left,
                    operator: SyntaxKind::EqualsToken,
                    right,
                }) => (false, *left, *right),
                _ => (false, item, NodeIndex::NONE),
            };
            if !matches!(
                self.arena.data(name),
                Some(
                    NodeData::Identifier { .. }
                        | NodeData::ObjectLiteralExpression { .. }
                        | NodeData::ArrayLiteralExpression { .. }
                        | NodeData::ObjectBindingPattern { .. }
                        | NodeData::ArrayBindingPattern { .. }
                )
            ) {
                return Err(self.error_at_node(
                    item,
                    "Invalid parameter in arrow function.",
                    diagnostic_codes::INVALID_DESTRUCTURING_TARGET,
                ));
            }
            parameters.push(self.arena.add(
                pos,
                end,
                NodeData::Parameter {
                    dot_dot_dot,
                    name,
                    initializer,
                },
            ));
        }
        Ok(self.make_node_list(parameters))
    }

    // =========================================================================
    // Conditional and binary
    // =========================================================================

    fn parse_conditional_expression(&mut self) -> ParseResult<NodeIndex> {
        let condition = self.parse_binary_expression(0)?;
        if self.is_arrow_function(condition) || !self.is_token(SyntaxKind::QuestionToken) {
            return Ok(condition);
        }
        self.next_token();
        let when_true = self.with_context(ContextFlags::empty(), ContextFlags::DISALLOW_IN, |p| {
            p.parse_assignment_expression()
        })?;
        self.parse_expected(SyntaxKind::ColonToken)?;
        let when_false = self.parse_assignment_expression()?;
        let pos = self.node_pos(condition);
        Ok(self.finish_node(
            pos,
            NodeData::ConditionalExpression {
                condition,
                when_true,
                when_false,
            },
        ))
    }

    /// Precedence climbing over operators binding tighter than `min_precedence`.
    fn parse_binary_expression(&mut self, min_precedence: u8) -> ParseResult<NodeIndex> {
        let mut left = self.parse_unary_expression()?;
        loop {
            if self.is_arrow_function(left) {
                return Ok(left);
            }
            let operator = self.token();
            if operator == SyntaxKind::InKeyword && self.in_disallow_in_context() {
                break;
            }
            let precedence = operator.binary_precedence();
            if precedence == 0 {
                break;
            }
            let right_associative = operator == SyntaxKind::AsteriskAsteriskToken;
            let binds = if right_associative {
                precedence >= min_precedence
            } else {
                precedence > min_precedence
            };
            if !binds {
                break;
            }
            if right_associative
                && matches!(
                    self.arena.data(left),
                    Some(
                        NodeData::PrefixUnaryExpression { .. } | NodeData::AwaitExpression { .. }
                    )
                )
            {
                return Err(self.error_at_node(
                    left,
                    "An unary expression is not allowed in the left-hand side of an exponentiation expression.",
                    diagnostic_codes::UNEXPECTED_TOKEN,
                ));
            }
            self.next_token();
            let right = self.parse_binary_expression(precedence)?;
            left = self.make_binary(left, operator, right);
        }
        Ok(left)
    }

    // =========================================================================
    // Unary and postfix
    // =========================================================================

    fn parse_unary_expression(&mut self) -> ParseResult<NodeIndex> {
        self.with_depth(|p| p.parse_unary_expression_inner())
    }

    fn parse_unary_expression_inner(&mut self) -> ParseResult<NodeIndex> {
        let pos = self.token_pos();
        match self.token() {
            operator @ (SyntaxKind::PlusToken
            | SyntaxKind::MinusToken
            | SyntaxKind::ExclamationToken
            | SyntaxKind::TildeToken
            | SyntaxKind::TypeOfKeyword
            | SyntaxKind::VoidKeyword
            | SyntaxKind::DeleteKeyword) => {
                self.next_token();
                let operand = self.parse_unary_expression()?;
                Ok(self.finish_node(pos, NodeData::PrefixUnaryExpression { operator, operand }))
            }
            operator @ (SyntaxKind::PlusPlusToken | SyntaxKind::MinusMinusToken) => {
                self.next_token();
                let operand = self.parse_unary_expression()?;
                self.check_assignment_target(operand, false)?;
                Ok(self.finish_node(pos, NodeData::PrefixUnaryExpression { operator, operand }))
            }
            SyntaxKind::AwaitKeyword if self.in_async_context() => {
                self.next_token();
                let expression = self.parse_unary_expression()?;
                Ok(self.finish_node(pos, NodeData::AwaitExpression { expression }))
            }
            SyntaxKind::AwaitKeyword if self.in_static_block_context() => Err(self
                .error_at_current_token(
                    "'await' is not allowed in class static blocks.",
                    diagnostic_codes::UNEXPECTED_TOKEN,
                )),
            _ => {
                let operand = self.parse_left_hand_side_expression()?;
                if matches!(
                    self.token(),
                    SyntaxKind::PlusPlusToken | SyntaxKind::MinusMinusToken
                ) && !self.has_preceding_line_break()
                    && !self.is_arrow_function(operand)
                {
                    self.check_assignment_target(operand, false)?;
                    let operator = self.token();
                    self.next_token();
                    return Ok(self.finish_node(
                        pos,
                        NodeData::PostfixUnaryExpression { operand, operator },
                    ));
                }
                Ok(operand)
            }
        }
    }

    // =========================================================================
    // Left-hand side: member access, calls, new
    // =========================================================================

    pub(crate) fn parse_left_hand_side_expression(&mut self) -> ParseResult<NodeIndex> {
        let pos = self.token_pos();
        let expression = match self.token() {
            SyntaxKind::NewKeyword => self.parse_new_expression()?,
            SyntaxKind::SuperKeyword => self.parse_keyword_node(),
            SyntaxKind::ImportKeyword => self.parse_import_expression()?,
            _ => self.parse_primary_expression()?,
        };
        self.parse_member_and_call_suffixes(pos, expression, true)
    }

    fn parse_keyword_node(&mut self) -> NodeIndex {
        let pos = self.token_pos();
        let kind = self.token();
        self.next_token();
        self.finish_node(pos, NodeData::Keyword { kind })
    }

    /// `import(...)` callee or `import.meta`.
    fn parse_import_expression(&mut self) -> ParseResult<NodeIndex> {
        let pos = self.token_pos();
        match self.peek().0 {
            SyntaxKind::OpenParenToken => Ok(self.parse_keyword_node()),
            SyntaxKind::DotToken => {
                self.next_token();
                self.next_token();
                let name = self.parse_identifier_name()?;
                Ok(self.finish_node(
                    pos,
                    NodeData::MetaProperty {
                        keyword: SyntaxKind::ImportKeyword,
                        name,
                    },
                ))
            }
            _ => Err(self.error_unexpected_token()),
        }
    }

    /// `new.target`, `new C`, `new C(args)`, `new new C()()`.
    fn parse_new_expression(&mut self) -> ParseResult<NodeIndex> {
        let pos = self.token_pos();
        self.next_token();
        if self.parse_optional(SyntaxKind::DotToken) {
            let name = self.parse_identifier_name()?;
            return Ok(self.finish_node(
                pos,
                NodeData::MetaProperty {
                    keyword: SyntaxKind::NewKeyword,
                    name,
                },
            ));
        }
        let callee_pos = self.token_pos();
        let callee = if self.is_token(SyntaxKind::NewKeyword) {
            self.parse_new_expression()?
        } else {
            self.parse_primary_expression()?
        };
        let expression = self.parse_member_and_call_suffixes(callee_pos, callee, false)?;
        let arguments = if self.is_token(SyntaxKind::OpenParenToken) {
            Some(self.parse_arguments()?)
        } else {
            None
        };
        Ok(self.finish_node(
            pos,
            NodeData::NewExpression {
                expression,
                arguments,
            },
        ))
    }

    /// `.name`, `?.name`, `[expr]`, `(args)` and tagged templates.
    fn parse_member_and_call_suffixes(
        &mut self,
        pos: u32,
        mut expression: NodeIndex,
        allow_calls: bool,
    ) -> ParseResult<NodeIndex> {
        loop {
            if self.is_arrow_function(expression) {
                return Ok(expression);
            }
            match self.token() {
                SyntaxKind::DotToken => {
                    self.next_token();
                    let name = self.parse_member_name()?;
                    expression = self.finish_node(
                        pos,
                        NodeData::PropertyAccessExpression {
                            expression,
                            question_dot: false,
                            name,
                        },
                    );
                }
                SyntaxKind::QuestionDotToken if allow_calls => {
                    self.next_token();
                    expression = match self.token() {
                        SyntaxKind::OpenParenToken => {
                            let arguments = self.parse_arguments()?;
                            self.finish_node(
                                pos,
                                NodeData::CallExpression {
                                    expression,
                                    question_dot: true,
                                    arguments,
                                },
                            )
                        }
                        SyntaxKind::OpenBracketToken => {
                            let argument = self.parse_element_access_argument()?;
                            self.finish_node(
                                pos,
                                NodeData::ElementAccessExpression {
                                    expression,
                                    question_dot: true,
                                    argument,
                                },
                            )
                        }
                        _ => {
                            let name = self.parse_member_name()?;
                            self.finish_node(
                                pos,
                                NodeData::PropertyAccessExpression {
                                    expression,
                                    question_dot: true,
                                    name,
                                },
                            )
                        }
                    };
                }
                SyntaxKind::OpenBracketToken => {
                    let argument = self.parse_element_access_argument()?;
                    expression = self.finish_node(
                        pos,
                        NodeData::ElementAccessExpression {
                            expression,
                            question_dot: false,
                            argument,
                        },
                    );
                }
                SyntaxKind::OpenParenToken if allow_calls => {
                    let is_async_callee = self.is_async_identifier(expression)
                        && self.node_pos(expression) == pos
                        && !self.has_preceding_line_break();
                    let arguments = self.parse_arguments()?;
                    if is_async_callee
                        && self.is_token(SyntaxKind::EqualsGreaterThanToken)
                        && !self.has_preceding_line_break()
                    {
                        let parameters = self.convert_to_parameters(&arguments.nodes)?;
                        return self.parse_arrow_function_rest(pos, true, parameters);
                    }
                    expression = self.finish_node(
                        pos,
                        NodeData::CallExpression {
                            expression,
                            question_dot: false,
                            arguments,
                        },
                    );
                }
                SyntaxKind::NoSubstitutionTemplateLiteral | SyntaxKind::TemplateHead => {
                    if self.is_in_optional_chain(expression) {
                        return Err(self.error_at_current_token(
                            "Tagged template expressions are not permitted in an optional chain.",
                            diagnostic_codes::UNEXPECTED_TOKEN,
                        ));
                    }
                    let template = self.parse_template()?;
                    expression = self.finish_node(
                        pos,
                        NodeData::TaggedTemplateExpression {
                            tag: expression,
                            template,
                        },
                    );
                }
                _ => return Ok(expression),
            }
        }
    }

    fn is_async_identifier(&self, node: NodeIndex) -> bool {
        self.arena.identifier_text(node) == Some("async")
    }

    fn parse_member_name(&mut self) -> ParseResult<NodeIndex> {
        if self.is_token(SyntaxKind::PrivateIdentifier) {
            return Ok(self.make_private_identifier());
        }
        self.parse_identifier_name()
    }

    fn parse_element_access_argument(&mut self) -> ParseResult<NodeIndex> {
        self.parse_expected(SyntaxKind::OpenBracketToken)?;
        let argument = self.with_context(ContextFlags::empty(), ContextFlags::DISALLOW_IN, |p| {
            p.parse_expression()
        })?;
        self.parse_expected(SyntaxKind::CloseBracketToken)?;
        Ok(argument)
    }

    /// `(a, ...b,)`
    fn parse_arguments(&mut self) -> ParseResult<NodeList> {
        self.parse_expected(SyntaxKind::OpenParenToken)?;
        let arguments = self.with_context(ContextFlags::empty(), ContextFlags::DISALLOW_IN, |p| {
            let mut arguments = Vec::new();
            while !p.is_token(SyntaxKind::CloseParenToken) {
                arguments.push(p.parse_spread_or_assignment_expression()?);
                if !p.parse_optional(SyntaxKind::CommaToken) {
                    break;
                }
            }
            Ok(arguments)
        })?;
        self.parse_expected(SyntaxKind::CloseParenToken)?;
        Ok(self.make_node_list(arguments))
    }

    fn parse_spread_or_assignment_expression(&mut self) -> ParseResult<NodeIndex> {
        if self.is_token(SyntaxKind::DotDotDotToken) {
            let pos = self.token_pos();
            self.next_token();
            let expression = self.parse_assignment_expression()?;
            return Ok(self.finish_node(pos, NodeData::SpreadElement { expression }));
        }
        self.parse_assignment_expression()
    }

    // =========================================================================
    // Primary expressions
    // =========================================================================

    fn parse_primary_expression(&mut self) -> ParseResult<NodeIndex> {
        let pos = self.token_pos();
        match self.token() {
            SyntaxKind::AsyncKeyword if self.look_ahead_is_async_function() => {
                self.next_token();
                self.parse_function_expression(pos, true)
            }
            _ if self.is_identifier() => Ok(self.make_identifier()),
            SyntaxKind::ThisKeyword
            | SyntaxKind::NullKeyword
            | SyntaxKind::TrueKeyword
            | SyntaxKind::FalseKeyword => Ok(self.parse_keyword_node()),
            SyntaxKind::NumericLiteral
            | SyntaxKind::BigIntLiteral
            | SyntaxKind::StringLiteral
            | SyntaxKind::NoSubstitutionTemplateLiteral => Ok(self.parse_literal()),
            SyntaxKind::TemplateHead => self.parse_template(),
            SyntaxKind::SlashToken | SyntaxKind::SlashEqualsToken => {
                self.re_scan_slash_token();
                Ok(self.parse_literal())
            }
            SyntaxKind::OpenParenToken => self.parse_parenthesized_or_arrow(),
            SyntaxKind::OpenBracketToken => self.parse_array_literal(),
            SyntaxKind::OpenBraceToken => self.parse_object_literal(),
            SyntaxKind::FunctionKeyword => self.parse_function_expression(pos, false),
            SyntaxKind::ClassKeyword => self.parse_class_expression(),
            // `#x in obj`
            SyntaxKind::PrivateIdentifier if self.peek().0 == SyntaxKind::InKeyword => {
                Ok(self.make_private_identifier())
            }
            _ => Err(self.error_expression_expected()),
        }
    }

    /// Literal node for the current token.
    pub(crate) fn parse_literal(&mut self) -> NodeIndex {
        let pos = self.token_pos();
        let kind = self.token();
        self.next_token();
        self.finish_node(pos, NodeData::Literal { kind })
    }

    /// Template literal starting at the current `NoSubstitutionTemplateLiteral`
    /// or `TemplateHead`.
    fn parse_template(&mut self) -> ParseResult<NodeIndex> {
        if self.is_token(SyntaxKind::NoSubstitutionTemplateLiteral) {
            return Ok(self.parse_literal());
        }
        let pos = self.token_pos();
        let head = self.parse_literal();
        let mut spans = Vec::new();
        loop {
            let span_pos = self.token_pos();
            let expression = self.with_context(ContextFlags::empty(), ContextFlags::DISALLOW_IN, |p| {
                p.parse_expression()
            })?;
            if !self.is_token(SyntaxKind::CloseBraceToken) {
                return Err(self.error_at_current_token("'}' expected.", diagnostic_codes::EXPECTED));
            }
            let kind = self.re_scan_template_token();
            let literal = self.parse_literal();
            spans.push(self.finish_node(span_pos, NodeData::TemplateSpan { expression, literal }));
            if kind == SyntaxKind::TemplateTail {
                break;
            }
        }
        let spans = self.make_node_list(spans);
        Ok(self.finish_node(pos, NodeData::TemplateExpression { head, spans }))
    }

    /// `( ... )`: a parenthesised expression, or the parameter list of an
    /// arrow function when `=>` follows.
    fn parse_parenthesized_or_arrow(&mut self) -> ParseResult<NodeIndex> {
        let pos = self.token_pos();
        self.next_token();

        let mut items = Vec::new();
        let mut trailing_comma = false;
        let mut has_rest = false;
        self.with_context(ContextFlags::empty(), ContextFlags::DISALLOW_IN, |p| {
            while !p.is_token(SyntaxKind::CloseParenToken) {
                if p.is_token(SyntaxKind::DotDotDotToken) {
                    let rest_pos = p.token_pos();
                    p.next_token();
                    let name = p.parse_binding_name()?;
                    items.push(p.finish_node(rest_pos, NodeData::SpreadElement { expression: name }));
                    has_rest = true;
                    break;
                }
                items.push(p.parse_assignment_expression()?);
                trailing_comma = false;
                if !p.parse_optional(SyntaxKind::CommaToken) {
                    break;
                }
                trailing_comma = true;
            }
            Ok(())
        })?;
        self.parse_expected(SyntaxKind::CloseParenToken)?;

        if self.is_token(SyntaxKind::EqualsGreaterThanToken) && !self.has_preceding_line_break() {
            let parameters = self.convert_to_parameters(&items)?;
            return self.parse_arrow_function_rest(pos, false, parameters);
        }
        if items.is_empty() || has_rest || trailing_comma {
            return Err(self.error_at_current_token("'=>' expected.", diagnostic_codes::EXPECTED));
        }

        let mut expression = items[0];
        for &item in &items[1..] {
            expression = self.make_binary_spanning(expression, SyntaxKind::CommaToken, item);
        }
        Ok(self.finish_node(pos, NodeData::ParenthesizedExpression { expression }))
    }

    /// Binary node ending at `right` rather than at the last consumed token.
    fn make_binary_spanning(&mut self, left: NodeIndex, operator: SyntaxKind, right: NodeIndex) -> NodeIndex {
        let pos = self.node_pos(left);
        let end = self.node_end(right);
        self.arena.add(
            pos,
            end,
            NodeData::BinaryExpression {
                left,
                operator,
                right,
            },
        )
    }

    fn parse_array_literal(&mut self) -> ParseResult<NodeIndex> {
        let pos = self.token_pos();
        self.next_token();
        let elements = self.with_context(ContextFlags::empty(), ContextFlags::DISALLOW_IN, |p| {
            let mut elements = Vec::new();
            while !p.is_token(SyntaxKind::CloseBracketToken) {
                if p.is_token(SyntaxKind::CommaToken) {
                    let hole = p.token_pos();
                    elements.push(p.arena.add(hole, hole, NodeData::OmittedExpression));
                    p.next_token();
                    continue;
                }
                elements.push(p.parse_spread_or_assignment_expression()?);
                if !p.parse_optional(SyntaxKind::CommaToken) {
                    break;
                }
            }
            Ok(elements)
        })?;
        self.parse_expected(SyntaxKind::CloseBracketToken)?;
        let elements = self.make_node_list(elements);
        Ok(self.finish_node(pos, NodeData::ArrayLiteralExpression { elements }))
    }

    fn parse_object_literal(&mut self) -> ParseResult<NodeIndex> {
        let pos = self.token_pos();
        self.next_token();
        let properties = self.with_context(ContextFlags::empty(), ContextFlags::DISALLOW_IN, |p| {
            let mut properties = Vec::new();
            while !p.is_token(SyntaxKind::CloseBraceToken) {
                let property_pos = p.token_pos();
                let property = if p.parse_optional(SyntaxKind::DotDotDotToken) {
                    let expression = p.parse_assignment_expression()?;
                    p.finish_node(property_pos, NodeData::SpreadAssignment { expression })
                } else {
                    p.parse_property_like_member(property_pos, MemberOwner::ObjectLiteral)?
                };
                properties.push(property);
                if !p.parse_optional(SyntaxKind::CommaToken) {
                    break;
                }
            }
            Ok(properties)
        })?;
        self.parse_expected(SyntaxKind::CloseBraceToken)?;
        let properties = self.make_node_list(properties);
        Ok(self.finish_node(pos, NodeData::ObjectLiteralExpression { properties }))
    }
}
