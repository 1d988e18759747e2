//! Parser state - functions, classes, and members shared by classes and
//! object literals.

use super::base::{NodeIndex, NodeList};
use super::flags::ContextFlags;
use super::node::{ClassData, FunctionData, MethodData, MethodKind, NodeData};
use super::state::{ParseResult, ParserState};
use wrap_await_common::diagnostics::diagnostic_codes;
use wrap_await_scanner::SyntaxKind;

/// Where a property-like member is being parsed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum MemberOwner {
    ObjectLiteral,
    Class { is_static: bool },
}

impl ParserState {
    // =========================================================================
    // Functions
    // =========================================================================

    /// `function f() {}` with the cursor on `function` (`async` already
    /// consumed when `is_async`).
    pub(crate) fn parse_function_declaration(
        &mut self,
        pos: u32,
        is_async: bool,
    ) -> ParseResult<NodeIndex> {
        self.parse_expected(SyntaxKind::FunctionKeyword)?;
        let is_generator = self.parse_optional(SyntaxKind::AsteriskToken);
        let name = self.parse_identifier()?;
        let (parameters, body) = self.parse_function_signature_and_body(is_async, is_generator)?;
        Ok(self.finish_node(
            pos,
            NodeData::FunctionDeclaration(FunctionData {
                name,
                is_async,
                is_generator,
                parameters,
                body,
            }),
        ))
    }

    pub(crate) fn parse_function_expression(
        &mut self,
        pos: u32,
        is_async: bool,
    ) -> ParseResult<NodeIndex> {
        self.parse_expected(SyntaxKind::FunctionKeyword)?;
        let is_generator = self.parse_optional(SyntaxKind::AsteriskToken);
        let (set, clear) = Self::function_body_context(is_async, is_generator);
        // A function expression's own name is bound inside it
        let name = if self.is_token(SyntaxKind::OpenParenToken) {
            NodeIndex::NONE
        } else {
            self.with_context(set, clear, |p| p.parse_identifier())?
        };
        let (parameters, body) = self.parse_function_signature_and_body(is_async, is_generator)?;
        Ok(self.finish_node(
            pos,
            NodeData::FunctionExpression(FunctionData {
                name,
                is_async,
                is_generator,
                parameters,
                body,
            }),
        ))
    }

    /// Parameter list and block body, both in the function's own context.
    pub(crate) fn parse_function_signature_and_body(
        &mut self,
        is_async: bool,
        is_generator: bool,
    ) -> ParseResult<(NodeList, NodeIndex)> {
        let (set, clear) = Self::function_body_context(is_async, is_generator);
        self.with_context(set, clear, |p| {
            let parameters = p.parse_parameters()?;
            let body = p.parse_block()?;
            Ok((parameters, body))
        })
    }

    /// `(a, b = 1, [c], ...rest)`
    fn parse_parameters(&mut self) -> ParseResult<NodeList> {
        self.parse_expected(SyntaxKind::OpenParenToken)?;
        let mut parameters = Vec::new();
        while !self.is_token(SyntaxKind::CloseParenToken) {
            let pos = self.token_pos();
            let dot_dot_dot = self.parse_optional(SyntaxKind::DotDotDotToken);
            let name = self.parse_binding_name()?;
            let initializer = if !dot_dot_dot && self.parse_optional(SyntaxKind::EqualsToken) {
                self.parse_assignment_expression()?
            } else {
                NodeIndex::NONE
            };
            parameters.push(self.finish_node(
                pos,
                NodeData::Parameter {
                    dot_dot_dot,
                    name,
                    initializer,
                },
            ));
            if dot_dot_dot {
                if !self.is_token(SyntaxKind::CloseParenToken) {
                    return Err(self.error_at_current_token(
                        "A rest parameter must be last in a parameter list.",
                        diagnostic_codes::EXPECTED,
                    ));
                }
                break;
            }
            if !self.parse_optional(SyntaxKind::CommaToken) {
                break;
            }
        }
        self.parse_expected(SyntaxKind::CloseParenToken)?;
        Ok(self.make_node_list(parameters))
    }

    // =========================================================================
    // Classes
    // =========================================================================

    pub(crate) fn parse_class_declaration(&mut self) -> ParseResult<NodeIndex> {
        let pos = self.token_pos();
        self.next_token();
        let name = self.parse_identifier()?;
        let class = self.parse_class_tail(name)?;
        Ok(self.finish_node(pos, NodeData::ClassDeclaration(class)))
    }

    pub(crate) fn parse_class_expression(&mut self) -> ParseResult<NodeIndex> {
        let pos = self.token_pos();
        self.next_token();
        let name = if self.is_identifier() && !self.is_token(SyntaxKind::ExtendsKeyword) {
            self.parse_identifier()?
        } else {
            NodeIndex::NONE
        };
        let class = self.parse_class_tail(name)?;
        Ok(self.finish_node(pos, NodeData::ClassExpression(class)))
    }

    /// Heritage clause and class body.
    fn parse_class_tail(&mut self, name: NodeIndex) -> ParseResult<ClassData> {
        let heritage = if self.parse_optional(SyntaxKind::ExtendsKeyword) {
            self.parse_left_hand_side_expression()?
        } else {
            NodeIndex::NONE
        };
        self.parse_expected(SyntaxKind::OpenBraceToken)?;
        let mut members = Vec::new();
        while !self.is_token(SyntaxKind::CloseBraceToken) {
            if self.parse_optional(SyntaxKind::SemicolonToken) {
                continue;
            }
            if self.is_token(SyntaxKind::EndOfFileToken) {
                return Err(self.error_at_current_token("'}' expected.", diagnostic_codes::EXPECTED));
            }
            members.push(self.parse_class_member()?);
        }
        self.parse_expected(SyntaxKind::CloseBraceToken)?;
        Ok(ClassData {
            name,
            heritage,
            members: self.make_node_list(members),
        })
    }

    fn parse_class_member(&mut self) -> ParseResult<NodeIndex> {
        let pos = self.token_pos();
        let is_static = self.is_token(SyntaxKind::StaticKeyword) && self.look_ahead_is_modifier();
        if is_static {
            self.next_token();
            if self.is_token(SyntaxKind::OpenBraceToken) {
                let body = self.with_context(
                    ContextFlags::STATIC_BLOCK,
                    ContextFlags::ASYNC
                        | ContextFlags::GENERATOR
                        | ContextFlags::IN_FUNCTION
                        | ContextFlags::DISALLOW_IN,
                    |p| p.parse_block(),
                )?;
                return Ok(self.finish_node(pos, NodeData::ClassStaticBlockDeclaration { body }));
            }
        }
        self.parse_property_like_member(pos, MemberOwner::Class { is_static })
    }

    /// `static`, `async`, `get` and `set` act as modifiers unless the member
    /// is named by them (`static() {}`, `get = 1`, `async;`).
    fn look_ahead_is_modifier(&mut self) -> bool {
        let (next, line_break) = self.peek();
        if self.is_token(SyntaxKind::AsyncKeyword) && line_break {
            return false;
        }
        !matches!(
            next,
            SyntaxKind::OpenParenToken
                | SyntaxKind::EqualsToken
                | SyntaxKind::SemicolonToken
                | SyntaxKind::CloseBraceToken
                | SyntaxKind::ColonToken
                | SyntaxKind::CommaToken
                | SyntaxKind::EndOfFileToken
        )
    }

    // =========================================================================
    // Members
    // =========================================================================

    /// Methods, accessors and fields in classes; methods, accessors and
    /// property assignments in object literals.
    pub(crate) fn parse_property_like_member(
        &mut self,
        pos: u32,
        owner: MemberOwner,
    ) -> ParseResult<NodeIndex> {
        let is_async = self.is_token(SyntaxKind::AsyncKeyword) && self.look_ahead_is_modifier();
        if is_async {
            self.next_token();
        }
        let is_generator = self.parse_optional(SyntaxKind::AsteriskToken);
        let mut kind = MethodKind::Method;
        if !is_async
            && !is_generator
            && matches!(self.token(), SyntaxKind::GetKeyword | SyntaxKind::SetKeyword)
            && self.look_ahead_is_modifier()
        {
            kind = if self.is_token(SyntaxKind::GetKeyword) {
                MethodKind::Getter
            } else {
                MethodKind::Setter
            };
            self.next_token();
        }
        let has_modifiers = is_async || is_generator || kind != MethodKind::Method;

        let is_shorthand_candidate = !has_modifiers && self.is_identifier();
        let name = self.parse_property_name_in(owner)?;

        if self.is_token(SyntaxKind::OpenParenToken) {
            let is_static = matches!(owner, MemberOwner::Class { is_static: true });
            if matches!(owner, MemberOwner::Class { is_static: false })
                && kind == MethodKind::Method
                && self.is_constructor_name(name)
            {
                kind = MethodKind::Constructor;
            }
            let (parameters, body) = self.parse_function_signature_and_body(is_async, is_generator)?;
            return Ok(self.finish_node(
                pos,
                NodeData::MethodDeclaration(MethodData {
                    kind,
                    is_static,
                    is_async,
                    is_generator,
                    name,
                    parameters,
                    body,
                }),
            ));
        }
        if has_modifiers {
            return Err(self.error_at_current_token("'(' expected.", diagnostic_codes::EXPECTED));
        }

        match owner {
            MemberOwner::Class { is_static } => {
                let initializer = if self.parse_optional(SyntaxKind::EqualsToken) {
                    self.with_context(
                        ContextFlags::empty(),
                        ContextFlags::ASYNC
                            | ContextFlags::GENERATOR
                            | ContextFlags::IN_FUNCTION
                            | ContextFlags::DISALLOW_IN,
                        |p| p.parse_assignment_expression(),
                    )?
                } else {
                    NodeIndex::NONE
                };
                self.parse_semicolon()?;
                Ok(self.finish_node(
                    pos,
                    NodeData::PropertyDeclaration {
                        is_static,
                        name,
                        initializer,
                    },
                ))
            }
            MemberOwner::ObjectLiteral => {
                if self.parse_optional(SyntaxKind::ColonToken) {
                    let initializer = self.parse_assignment_expression()?;
                    return Ok(self.finish_node(pos, NodeData::PropertyAssignment { name, initializer }));
                }
                if !is_shorthand_candidate {
                    return Err(self.error_at_current_token("':' expected.", diagnostic_codes::EXPECTED));
                }
                // `{ a = 1 }` is only valid once the literal becomes a
                // destructuring target
                let object_assignment_initializer = if self.parse_optional(SyntaxKind::EqualsToken) {
                    self.parse_assignment_expression()?
                } else {
                    NodeIndex::NONE
                };
                Ok(self.finish_node(
                    pos,
                    NodeData::ShorthandPropertyAssignment {
                        name,
                        object_assignment_initializer,
                    },
                ))
            }
        }
    }

    fn is_constructor_name(&self, name: NodeIndex) -> bool {
        match self.arena.data(name) {
            Some(NodeData::Identifier { escaped_text }) => escaped_text == "constructor",
            Some(NodeData::Literal {
                kind: SyntaxKind::StringLiteral,
            }) => matches!(self.arena.node_text(name), "'constructor'" | "\"constructor\""),
            _ => false,
        }
    }

    /// Property name in an object literal or binding pattern.
    pub(crate) fn parse_property_name(&mut self) -> ParseResult<NodeIndex> {
        self.parse_property_name_in(MemberOwner::ObjectLiteral)
    }

    /// Identifier or keyword, string or numeric literal, computed name, or
    /// (in classes) a private name.
    fn parse_property_name_in(&mut self, owner: MemberOwner) -> ParseResult<NodeIndex> {
        match self.token() {
            SyntaxKind::StringLiteral | SyntaxKind::NumericLiteral | SyntaxKind::BigIntLiteral => {
                Ok(self.parse_literal())
            }
            SyntaxKind::OpenBracketToken => {
                let pos = self.token_pos();
                self.next_token();
                let expression = self.with_context(
                    ContextFlags::empty(),
                    ContextFlags::DISALLOW_IN,
                    |p| p.parse_assignment_expression(),
                )?;
                self.parse_expected(SyntaxKind::CloseBracketToken)?;
                Ok(self.finish_node(pos, NodeData::ComputedPropertyName { expression }))
            }
            SyntaxKind::PrivateIdentifier if matches!(owner, MemberOwner::Class { .. }) => {
                Ok(self.make_private_identifier())
            }
            _ => self.parse_identifier_name(),
        }
    }
}
