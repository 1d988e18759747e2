//! Parser state - statement and declaration parsing methods

use super::base::{NodeIndex, NodeList};
use super::flags::ContextFlags;
use super::node::{NodeData, VariableKind};
use super::state::{ParseResult, ParserState};
use wrap_await_common::diagnostics::diagnostic_codes;
use wrap_await_scanner::SyntaxKind;

impl ParserState {
    // =========================================================================
    // Statement lists
    // =========================================================================

    /// Parse statements until `is_end` reports the terminator (not consumed).
    pub(crate) fn parse_statement_list(
        &mut self,
        is_end: impl Fn(&ParserState) -> bool,
    ) -> ParseResult<NodeList> {
        let mut statements = Vec::new();
        while !is_end(self) {
            if self.is_token(SyntaxKind::EndOfFileToken) {
                return Err(self.error_at_current_token("'}' expected.", diagnostic_codes::EXPECTED));
            }
            statements.push(self.parse_statement()?);
        }
        Ok(self.make_node_list(statements))
    }

    /// Parse a statement
    pub(crate) fn parse_statement(&mut self) -> ParseResult<NodeIndex> {
        self.with_depth(|p| p.parse_statement_inner())
    }

    fn parse_statement_inner(&mut self) -> ParseResult<NodeIndex> {
        match self.token() {
            SyntaxKind::OpenBraceToken => self.parse_block(),
            SyntaxKind::SemicolonToken => self.parse_empty_statement(),
            SyntaxKind::VarKeyword => self.parse_variable_statement(VariableKind::Var),
            SyntaxKind::ConstKeyword => self.parse_variable_statement(VariableKind::Const),
            SyntaxKind::LetKeyword if self.look_ahead_is_let_declaration() => {
                self.parse_variable_statement(VariableKind::Let)
            }
            SyntaxKind::FunctionKeyword => {
                let pos = self.token_pos();
                self.parse_function_declaration(pos, false)
            }
            SyntaxKind::AsyncKeyword if self.look_ahead_is_async_function() => {
                let pos = self.token_pos();
                self.next_token();
                self.parse_function_declaration(pos, true)
            }
            SyntaxKind::ClassKeyword => self.parse_class_declaration(),
            SyntaxKind::IfKeyword => self.parse_if_statement(),
            SyntaxKind::ForKeyword => self.parse_for_statement(),
            SyntaxKind::WhileKeyword => self.parse_while_statement(),
            SyntaxKind::DoKeyword => self.parse_do_statement(),
            SyntaxKind::ReturnKeyword => self.parse_return_statement(),
            SyntaxKind::BreakKeyword | SyntaxKind::ContinueKeyword => {
                self.parse_break_or_continue_statement()
            }
            SyntaxKind::ThrowKeyword => self.parse_throw_statement(),
            SyntaxKind::TryKeyword => self.parse_try_statement(),
            SyntaxKind::SwitchKeyword => self.parse_switch_statement(),
            SyntaxKind::WithKeyword => self.parse_with_statement(),
            SyntaxKind::DebuggerKeyword => self.parse_debugger_statement(),
            SyntaxKind::ExportKeyword => Err(self.error_at_current_token(
                "Modifiers cannot appear here.",
                diagnostic_codes::DECLARATION_OR_STATEMENT_EXPECTED,
            )),
            SyntaxKind::ImportKeyword
                if !matches!(
                    self.peek().0,
                    SyntaxKind::OpenParenToken | SyntaxKind::DotToken
                ) =>
            {
                Err(self.error_at_current_token(
                    "Cannot use import statement outside a module.",
                    diagnostic_codes::DECLARATION_OR_STATEMENT_EXPECTED,
                ))
            }
            _ if self.is_identifier() && self.peek().0 == SyntaxKind::ColonToken => {
                self.parse_labeled_statement()
            }
            _ => self.parse_expression_statement(),
        }
    }

    /// `let` starts a declaration when followed by a binding name or pattern.
    fn look_ahead_is_let_declaration(&mut self) -> bool {
        let (next, _) = self.peek();
        matches!(
            next,
            SyntaxKind::Identifier | SyntaxKind::OpenBracketToken | SyntaxKind::OpenBraceToken
        ) || next.is_contextual_keyword()
    }

    /// `async function` on one line.
    pub(crate) fn look_ahead_is_async_function(&mut self) -> bool {
        let (next, line_break) = self.peek();
        next == SyntaxKind::FunctionKeyword && !line_break
    }

    pub(crate) fn parse_block(&mut self) -> ParseResult<NodeIndex> {
        let pos = self.token_pos();
        self.parse_expected(SyntaxKind::OpenBraceToken)?;
        let statements = self.parse_statement_list(|p| p.is_token(SyntaxKind::CloseBraceToken))?;
        self.parse_expected(SyntaxKind::CloseBraceToken)?;
        Ok(self.finish_node(pos, NodeData::Block { statements }))
    }

    fn parse_empty_statement(&mut self) -> ParseResult<NodeIndex> {
        let pos = self.token_pos();
        self.next_token();
        Ok(self.finish_node(pos, NodeData::EmptyStatement))
    }

    fn parse_expression_statement(&mut self) -> ParseResult<NodeIndex> {
        let pos = self.token_pos();
        let expression = self.parse_expression()?;
        self.parse_semicolon()?;
        Ok(self.finish_node(pos, NodeData::ExpressionStatement { expression }))
    }

    fn parse_labeled_statement(&mut self) -> ParseResult<NodeIndex> {
        let pos = self.token_pos();
        let label = self.parse_identifier()?;
        self.parse_expected(SyntaxKind::ColonToken)?;
        let statement = self.parse_statement()?;
        Ok(self.finish_node(pos, NodeData::LabeledStatement { label, statement }))
    }

    // =========================================================================
    // Variable declarations
    // =========================================================================

    fn parse_variable_statement(&mut self, kind: VariableKind) -> ParseResult<NodeIndex> {
        let pos = self.token_pos();
        let declaration_list = self.parse_variable_declaration_list(kind)?;
        self.check_declaration_initializers(declaration_list)?;
        self.parse_semicolon()?;
        Ok(self.finish_node(pos, NodeData::VariableStatement { declaration_list }))
    }

    /// `var a = 1, [b] = c` without the trailing semicolon. Initializer
    /// requirements are checked by the caller, since `for-in`/`for-of` heads
    /// have none.
    pub(crate) fn parse_variable_declaration_list(
        &mut self,
        kind: VariableKind,
    ) -> ParseResult<NodeIndex> {
        let pos = self.token_pos();
        self.next_token();
        let mut declarations = Vec::new();
        loop {
            declarations.push(self.parse_variable_declaration()?);
            if !self.parse_optional(SyntaxKind::CommaToken) {
                break;
            }
        }
        let declarations = self.make_node_list(declarations);
        Ok(self.finish_node(
            pos,
            NodeData::VariableDeclarationList { kind, declarations },
        ))
    }

    fn parse_variable_declaration(&mut self) -> ParseResult<NodeIndex> {
        let pos = self.token_pos();
        let name = self.parse_binding_name()?;
        let initializer = if self.parse_optional(SyntaxKind::EqualsToken) {
            self.parse_assignment_expression()?
        } else {
            NodeIndex::NONE
        };
        Ok(self.finish_node(pos, NodeData::VariableDeclaration { name, initializer }))
    }

    /// Destructuring declarations and `const` need an initializer outside of
    /// `for-in`/`for-of` heads.
    pub(crate) fn check_declaration_initializers(&self, list: NodeIndex) -> ParseResult<()> {
        let Some(NodeData::VariableDeclarationList { kind, declarations }) = self.arena.data(list)
        else {
            return Ok(());
        };
        for declaration in declarations.iter() {
            let Some(NodeData::VariableDeclaration { name, initializer }) =
                self.arena.data(declaration)
            else {
                continue;
            };
            if initializer.is_some() {
                continue;
            }
            if *kind == VariableKind::Const {
                return Err(self.error_at_node(
                    declaration,
                    "'const' declarations must be initialized.",
                    diagnostic_codes::EXPECTED,
                ));
            }
            if !self.arena.is_identifier(*name) {
                return Err(self.error_at_node(
                    declaration,
                    "A destructuring declaration must have an initializer.",
                    diagnostic_codes::EXPECTED,
                ));
            }
        }
        Ok(())
    }

    // =========================================================================
    // Binding patterns
    // =========================================================================

    /// Identifier, `{...}` or `[...]` in a binding position.
    pub(crate) fn parse_binding_name(&mut self) -> ParseResult<NodeIndex> {
        match self.token() {
            SyntaxKind::OpenBraceToken => self.with_depth(|p| p.parse_object_binding_pattern()),
            SyntaxKind::OpenBracketToken => self.with_depth(|p| p.parse_array_binding_pattern()),
            _ => self.parse_identifier(),
        }
    }

    fn parse_object_binding_pattern(&mut self) -> ParseResult<NodeIndex> {
        let pos = self.token_pos();
        self.parse_expected(SyntaxKind::OpenBraceToken)?;
        let mut elements = Vec::new();
        while !self.is_token(SyntaxKind::CloseBraceToken) {
            let element_pos = self.token_pos();
            let element = if self.parse_optional(SyntaxKind::DotDotDotToken) {
                let name = self.parse_identifier()?;
                self.finish_node(
                    element_pos,
                    NodeData::BindingElement {
                        dot_dot_dot: true,
                        property_name: NodeIndex::NONE,
                        name,
                        initializer: NodeIndex::NONE,
                    },
                )
            } else {
                let is_shorthand_candidate = self.is_identifier();
                let key = self.parse_property_name()?;
                let (property_name, name) = if self.parse_optional(SyntaxKind::ColonToken) {
                    (key, self.parse_binding_name()?)
                } else if is_shorthand_candidate {
                    (NodeIndex::NONE, key)
                } else {
                    return Err(self.error_at_current_token(
                        "':' expected.",
                        diagnostic_codes::EXPECTED,
                    ));
                };
                let initializer = self.parse_binding_initializer()?;
                self.finish_node(
                    element_pos,
                    NodeData::BindingElement {
                        dot_dot_dot: false,
                        property_name,
                        name,
                        initializer,
                    },
                )
            };
            elements.push(element);
            if !self.parse_optional(SyntaxKind::CommaToken) {
                break;
            }
        }
        self.parse_expected(SyntaxKind::CloseBraceToken)?;
        let elements = self.make_node_list(elements);
        Ok(self.finish_node(pos, NodeData::ObjectBindingPattern { elements }))
    }

    fn parse_array_binding_pattern(&mut self) -> ParseResult<NodeIndex> {
        let pos = self.token_pos();
        self.parse_expected(SyntaxKind::OpenBracketToken)?;
        let mut elements = Vec::new();
        while !self.is_token(SyntaxKind::CloseBracketToken) {
            if self.is_token(SyntaxKind::CommaToken) {
                let hole = self.token_pos();
                elements.push(self.arena.add(hole, hole, NodeData::OmittedExpression));
                self.next_token();
                continue;
            }
            let element_pos = self.token_pos();
            let dot_dot_dot = self.parse_optional(SyntaxKind::DotDotDotToken);
            let name = self.parse_binding_name()?;
            let initializer = if dot_dot_dot {
                NodeIndex::NONE
            } else {
                self.parse_binding_initializer()?
            };
            elements.push(self.finish_node(
                element_pos,
                NodeData::BindingElement {
                    dot_dot_dot,
                    property_name: NodeIndex::NONE,
                    name,
                    initializer,
                },
            ));
            if !self.parse_optional(SyntaxKind::CommaToken) {
                break;
            }
        }
        self.parse_expected(SyntaxKind::CloseBracketToken)?;
        let elements = self.make_node_list(elements);
        Ok(self.finish_node(pos, NodeData::ArrayBindingPattern { elements }))
    }

    fn parse_binding_initializer(&mut self) -> ParseResult<NodeIndex> {
        if self.parse_optional(SyntaxKind::EqualsToken) {
            self.with_context(ContextFlags::empty(), ContextFlags::DISALLOW_IN, |p| {
                p.parse_assignment_expression()
            })
        } else {
            Ok(NodeIndex::NONE)
        }
    }

    // =========================================================================
    // Control flow
    // =========================================================================

    fn parse_parenthesized_condition(&mut self) -> ParseResult<NodeIndex> {
        self.parse_expected(SyntaxKind::OpenParenToken)?;
        let condition = self.with_context(ContextFlags::empty(), ContextFlags::DISALLOW_IN, |p| {
            p.parse_expression()
        })?;
        self.parse_expected(SyntaxKind::CloseParenToken)?;
        Ok(condition)
    }

    fn parse_if_statement(&mut self) -> ParseResult<NodeIndex> {
        let pos = self.token_pos();
        self.next_token();
        let condition = self.parse_parenthesized_condition()?;
        let then_statement = self.parse_statement()?;
        let else_statement = if self.parse_optional(SyntaxKind::ElseKeyword) {
            self.parse_statement()?
        } else {
            NodeIndex::NONE
        };
        Ok(self.finish_node(
            pos,
            NodeData::IfStatement {
                condition,
                then_statement,
                else_statement,
            },
        ))
    }

    fn parse_while_statement(&mut self) -> ParseResult<NodeIndex> {
        let pos = self.token_pos();
        self.next_token();
        let condition = self.parse_parenthesized_condition()?;
        let statement = self.parse_statement()?;
        Ok(self.finish_node(
            pos,
            NodeData::WhileStatement {
                condition,
                statement,
            },
        ))
    }

    fn parse_do_statement(&mut self) -> ParseResult<NodeIndex> {
        let pos = self.token_pos();
        self.next_token();
        let statement = self.parse_statement()?;
        self.parse_expected(SyntaxKind::WhileKeyword)?;
        let condition = self.parse_parenthesized_condition()?;
        // A semicolon is always inserted after `do ... while (...)`
        self.parse_optional(SyntaxKind::SemicolonToken);
        Ok(self.finish_node(
            pos,
            NodeData::DoStatement {
                statement,
                condition,
            },
        ))
    }

    /// `for (;;)`, `for (x in o)`, `for (x of it)` and `for await (x of it)`.
    fn parse_for_statement(&mut self) -> ParseResult<NodeIndex> {
        let pos = self.token_pos();
        self.next_token();
        let await_modifier = self.in_async_context() && self.parse_optional(SyntaxKind::AwaitKeyword);
        self.parse_expected(SyntaxKind::OpenParenToken)?;

        let initializer = self.with_context(ContextFlags::DISALLOW_IN, ContextFlags::empty(), |p| {
            match p.token() {
                SyntaxKind::SemicolonToken => Ok(NodeIndex::NONE),
                SyntaxKind::VarKeyword => p.parse_variable_declaration_list(VariableKind::Var),
                SyntaxKind::ConstKeyword => p.parse_variable_declaration_list(VariableKind::Const),
                SyntaxKind::LetKeyword if p.look_ahead_is_let_declaration() => {
                    p.parse_variable_declaration_list(VariableKind::Let)
                }
                _ => p.parse_expression(),
            }
        })?;
        let is_declaration = matches!(
            self.arena.data(initializer),
            Some(NodeData::VariableDeclarationList { .. })
        );

        let node = if self.is_token(SyntaxKind::OfKeyword) && initializer.is_some() {
            self.check_for_in_of_head(initializer, is_declaration)?;
            self.next_token();
            let expression = self.with_context(ContextFlags::empty(), ContextFlags::DISALLOW_IN, |p| {
                p.parse_assignment_expression()
            })?;
            self.parse_expected(SyntaxKind::CloseParenToken)?;
            let statement = self.parse_statement()?;
            NodeData::ForOfStatement {
                await_modifier,
                initializer,
                expression,
                statement,
            }
        } else if await_modifier {
            return Err(self.error_at_current_token("'of' expected.", diagnostic_codes::EXPECTED));
        } else if self.is_token(SyntaxKind::InKeyword) && initializer.is_some() {
            self.check_for_in_of_head(initializer, is_declaration)?;
            self.next_token();
            let expression = self.with_context(ContextFlags::empty(), ContextFlags::DISALLOW_IN, |p| {
                p.parse_expression()
            })?;
            self.parse_expected(SyntaxKind::CloseParenToken)?;
            let statement = self.parse_statement()?;
            NodeData::ForInStatement {
                initializer,
                expression,
                statement,
            }
        } else {
            if is_declaration {
                self.check_declaration_initializers(initializer)?;
            }
            self.parse_expected(SyntaxKind::SemicolonToken)?;
            let condition = if self.is_token(SyntaxKind::SemicolonToken) {
                NodeIndex::NONE
            } else {
                self.with_context(ContextFlags::empty(), ContextFlags::DISALLOW_IN, |p| {
                    p.parse_expression()
                })?
            };
            self.parse_expected(SyntaxKind::SemicolonToken)?;
            let incrementor = if self.is_token(SyntaxKind::CloseParenToken) {
                NodeIndex::NONE
            } else {
                self.with_context(ContextFlags::empty(), ContextFlags::DISALLOW_IN, |p| {
                    p.parse_expression()
                })?
            };
            self.parse_expected(SyntaxKind::CloseParenToken)?;
            let statement = self.parse_statement()?;
            NodeData::ForStatement {
                initializer,
                condition,
                incrementor,
                statement,
            }
        };
        Ok(self.finish_node(pos, node))
    }

    /// A `for-in`/`for-of` head declares exactly one binding without an
    /// initializer, or is an assignment target.
    fn check_for_in_of_head(&self, initializer: NodeIndex, is_declaration: bool) -> ParseResult<()> {
        if !is_declaration {
            return self.check_assignment_target(initializer, true);
        }
        let Some(NodeData::VariableDeclarationList { declarations, .. }) =
            self.arena.data(initializer)
        else {
            return Ok(());
        };
        if declarations.len() != 1 {
            return Err(self.error_at_node(
                initializer,
                "Only a single variable declaration is allowed in a 'for...in' or 'for...of' statement.",
                diagnostic_codes::EXPECTED,
            ));
        }
        for declaration in declarations.iter() {
            if let Some(NodeData::VariableDeclaration { initializer, .. }) =
                self.arena.data(declaration)
                && initializer.is_some()
            {
                return Err(self.error_at_node(
                    declaration,
                    "The variable declaration of a 'for...in' or 'for...of' statement cannot have an initializer.",
                    diagnostic_codes::EXPECTED,
                ));
            }
        }
        Ok(())
    }

    fn parse_return_statement(&mut self) -> ParseResult<NodeIndex> {
        if !self.context_flags.contains(ContextFlags::IN_FUNCTION) {
            return Err(self.error_at_current_token(
                "A 'return' statement can only be used within a function body.",
                diagnostic_codes::DECLARATION_OR_STATEMENT_EXPECTED,
            ));
        }
        let pos = self.token_pos();
        self.next_token();
        let expression = if self.can_parse_semicolon() {
            NodeIndex::NONE
        } else {
            self.parse_expression()?
        };
        self.parse_semicolon()?;
        Ok(self.finish_node(pos, NodeData::ReturnStatement { expression }))
    }

    fn parse_break_or_continue_statement(&mut self) -> ParseResult<NodeIndex> {
        let pos = self.token_pos();
        let is_break = self.is_token(SyntaxKind::BreakKeyword);
        self.next_token();
        let label = if !self.can_parse_semicolon() && self.is_identifier() {
            self.parse_identifier()?
        } else {
            NodeIndex::NONE
        };
        self.parse_semicolon()?;
        let data = if is_break {
            NodeData::BreakStatement { label }
        } else {
            NodeData::ContinueStatement { label }
        };
        Ok(self.finish_node(pos, data))
    }

    fn parse_throw_statement(&mut self) -> ParseResult<NodeIndex> {
        let pos = self.token_pos();
        self.next_token();
        if self.has_preceding_line_break() {
            return Err(self.error_at_current_token(
                "Line break not permitted here.",
                diagnostic_codes::LINE_BREAK_NOT_PERMITTED_HERE,
            ));
        }
        let expression = self.parse_expression()?;
        self.parse_semicolon()?;
        Ok(self.finish_node(pos, NodeData::ThrowStatement { expression }))
    }

    fn parse_try_statement(&mut self) -> ParseResult<NodeIndex> {
        let pos = self.token_pos();
        self.next_token();
        let try_block = self.parse_block()?;

        let catch_clause = if self.is_token(SyntaxKind::CatchKeyword) {
            let catch_pos = self.token_pos();
            self.next_token();
            let variable = if self.parse_optional(SyntaxKind::OpenParenToken) {
                let variable = self.parse_binding_name()?;
                self.parse_expected(SyntaxKind::CloseParenToken)?;
                variable
            } else {
                NodeIndex::NONE
            };
            let block = self.parse_block()?;
            self.finish_node(catch_pos, NodeData::CatchClause { variable, block })
        } else {
            NodeIndex::NONE
        };

        let finally_block = if self.parse_optional(SyntaxKind::FinallyKeyword) {
            self.parse_block()?
        } else {
            NodeIndex::NONE
        };

        if catch_clause.is_none() && finally_block.is_none() {
            return Err(self.error_at_current_token(
                "'catch' or 'finally' expected.",
                diagnostic_codes::EXPECTED,
            ));
        }
        Ok(self.finish_node(
            pos,
            NodeData::TryStatement {
                try_block,
                catch_clause,
                finally_block,
            },
        ))
    }

    fn parse_switch_statement(&mut self) -> ParseResult<NodeIndex> {
        let pos = self.token_pos();
        self.next_token();
        let expression = self.parse_parenthesized_condition()?;
        self.parse_expected(SyntaxKind::OpenBraceToken)?;

        let mut clauses = Vec::new();
        let mut seen_default = false;
        let is_clause_end = |p: &ParserState| {
            matches!(
                p.token(),
                SyntaxKind::CaseKeyword | SyntaxKind::DefaultKeyword | SyntaxKind::CloseBraceToken
            )
        };
        while !self.is_token(SyntaxKind::CloseBraceToken) {
            let clause_pos = self.token_pos();
            match self.token() {
                SyntaxKind::CaseKeyword => {
                    self.next_token();
                    let expression = self.with_context(
                        ContextFlags::empty(),
                        ContextFlags::DISALLOW_IN,
                        |p| p.parse_expression(),
                    )?;
                    self.parse_expected(SyntaxKind::ColonToken)?;
                    let statements = self.parse_statement_list(is_clause_end)?;
                    clauses.push(self.finish_node(
                        clause_pos,
                        NodeData::CaseClause {
                            expression,
                            statements,
                        },
                    ));
                }
                SyntaxKind::DefaultKeyword if !seen_default => {
                    seen_default = true;
                    self.next_token();
                    self.parse_expected(SyntaxKind::ColonToken)?;
                    let statements = self.parse_statement_list(is_clause_end)?;
                    clauses.push(self.finish_node(clause_pos, NodeData::DefaultClause { statements }));
                }
                SyntaxKind::EndOfFileToken => {
                    return Err(self.error_at_current_token("'}' expected.", diagnostic_codes::EXPECTED));
                }
                _ => {
                    return Err(self.error_at_current_token(
                        "'case' or 'default' expected.",
                        diagnostic_codes::EXPECTED,
                    ));
                }
            }
        }
        self.parse_expected(SyntaxKind::CloseBraceToken)?;
        let clauses = self.make_node_list(clauses);
        Ok(self.finish_node(
            pos,
            NodeData::SwitchStatement {
                expression,
                clauses,
            },
        ))
    }

    fn parse_with_statement(&mut self) -> ParseResult<NodeIndex> {
        let pos = self.token_pos();
        self.next_token();
        let expression = self.parse_parenthesized_condition()?;
        let statement = self.parse_statement()?;
        Ok(self.finish_node(
            pos,
            NodeData::WithStatement {
                expression,
                statement,
            },
        ))
    }

    fn parse_debugger_statement(&mut self) -> ParseResult<NodeIndex> {
        let pos = self.token_pos();
        self.next_token();
        self.parse_semicolon()?;
        Ok(self.finish_node(pos, NodeData::DebuggerStatement))
    }
}
