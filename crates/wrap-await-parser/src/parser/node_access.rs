//! Read access to the arena: lookups, parents, children, source text.

use super::base::NodeIndex;
use super::node::{ClassData, FunctionData, Node, NodeArena, NodeData};
use smallvec::SmallVec;

/// Child lists are short for almost every node kind.
pub type ChildIndices = SmallVec<[NodeIndex; 8]>;

impl NodeData {
    /// Direct children in source order. Absent optional children are
    /// omitted.
    pub fn children(&self) -> ChildIndices {
        let mut out = ChildIndices::new();
        let mut push = |index: NodeIndex| {
            if index.is_some() {
                out.push(index);
            }
        };
        match self {
            NodeData::SourceFile { statements }
            | NodeData::Block { statements }
            | NodeData::DefaultClause { statements } => statements.iter().for_each(&mut push),
            NodeData::ExpressionStatement { expression }
            | NodeData::ReturnStatement { expression }
            | NodeData::ThrowStatement { expression }
            | NodeData::SpreadAssignment { expression }
            | NodeData::SpreadElement { expression }
            | NodeData::ComputedPropertyName { expression }
            | NodeData::ParenthesizedExpression { expression }
            | NodeData::AwaitExpression { expression }
            | NodeData::YieldExpression { expression, .. } => push(*expression),
            NodeData::VariableStatement { declaration_list } => push(*declaration_list),
            NodeData::VariableDeclarationList { declarations, .. } => {
                declarations.iter().for_each(&mut push)
            }
            NodeData::VariableDeclaration { name, initializer }
            | NodeData::PropertyAssignment { name, initializer }
            | NodeData::PropertyDeclaration {
                name, initializer, ..
            }
            | NodeData::Parameter {
                name, initializer, ..
            } => {
                push(*name);
                push(*initializer);
            }
            NodeData::ShorthandPropertyAssignment {
                name,
                object_assignment_initializer,
            } => {
                push(*name);
                push(*object_assignment_initializer);
            }
            NodeData::FunctionDeclaration(func) | NodeData::FunctionExpression(func) => {
                function_children(func, &mut push)
            }
            NodeData::ClassDeclaration(class) | NodeData::ClassExpression(class) => {
                class_children(class, &mut push)
            }
            NodeData::MethodDeclaration(method) => {
                push(method.name);
                method.parameters.iter().for_each(&mut push);
                push(method.body);
            }
            NodeData::IfStatement {
                condition,
                then_statement,
                else_statement,
            } => {
                push(*condition);
                push(*then_statement);
                push(*else_statement);
            }
            NodeData::ForStatement {
                initializer,
                condition,
                incrementor,
                statement,
            } => {
                push(*initializer);
                push(*condition);
                push(*incrementor);
                push(*statement);
            }
            NodeData::ForInStatement {
                initializer,
                expression,
                statement,
            }
            | NodeData::ForOfStatement {
                initializer,
                expression,
                statement,
                ..
            } => {
                push(*initializer);
                push(*expression);
                push(*statement);
            }
            NodeData::WhileStatement {
                condition,
                statement,
            } => {
                push(*condition);
                push(*statement);
            }
            NodeData::DoStatement {
                statement,
                condition,
            } => {
                push(*statement);
                push(*condition);
            }
            NodeData::BreakStatement { label } | NodeData::ContinueStatement { label } => {
                push(*label)
            }
            NodeData::TryStatement {
                try_block,
                catch_clause,
                finally_block,
            } => {
                push(*try_block);
                push(*catch_clause);
                push(*finally_block);
            }
            NodeData::CatchClause { variable, block } => {
                push(*variable);
                push(*block);
            }
            NodeData::SwitchStatement {
                expression,
                clauses,
            } => {
                push(*expression);
                clauses.iter().for_each(&mut push);
            }
            NodeData::CaseClause {
                expression,
                statements,
            } => {
                push(*expression);
                statements.iter().for_each(&mut push);
            }
            NodeData::LabeledStatement { label, statement } => {
                push(*label);
                push(*statement);
            }
            NodeData::WithStatement {
                expression,
                statement,
            } => {
                push(*expression);
                push(*statement);
            }
            NodeData::TemplateExpression { head, spans } => {
                push(*head);
                spans.iter().for_each(&mut push);
            }
            NodeData::TemplateSpan {
                expression,
                literal,
            } => {
                push(*expression);
                push(*literal);
            }
            NodeData::TaggedTemplateExpression { tag, template } => {
                push(*tag);
                push(*template);
            }
            NodeData::ArrayLiteralExpression { elements }
            | NodeData::ObjectBindingPattern { elements }
            | NodeData::ArrayBindingPattern { elements } => elements.iter().for_each(&mut push),
            NodeData::ObjectLiteralExpression { properties } => {
                properties.iter().for_each(&mut push)
            }
            NodeData::ArrowFunction {
                parameters, body, ..
            } => {
                parameters.iter().for_each(&mut push);
                push(*body);
            }
            NodeData::ClassStaticBlockDeclaration { body } => push(*body),
            NodeData::PropertyAccessExpression {
                expression, name, ..
            } => {
                push(*expression);
                push(*name);
            }
            NodeData::ElementAccessExpression {
                expression,
                argument,
                ..
            } => {
                push(*expression);
                push(*argument);
            }
            NodeData::CallExpression {
                expression,
                arguments,
                ..
            } => {
                push(*expression);
                arguments.iter().for_each(&mut push);
            }
            NodeData::NewExpression {
                expression,
                arguments,
            } => {
                push(*expression);
                if let Some(arguments) = arguments {
                    arguments.iter().for_each(&mut push);
                }
            }
            NodeData::MetaProperty { name, .. } => push(*name),
            NodeData::PrefixUnaryExpression { operand, .. }
            | NodeData::PostfixUnaryExpression { operand, .. } => push(*operand),
            NodeData::BinaryExpression { left, right, .. } => {
                push(*left);
                push(*right);
            }
            NodeData::ConditionalExpression {
                condition,
                when_true,
                when_false,
            } => {
                push(*condition);
                push(*when_true);
                push(*when_false);
            }
            NodeData::BindingElement {
                property_name,
                name,
                initializer,
                ..
            } => {
                push(*property_name);
                push(*name);
                push(*initializer);
            }
            NodeData::EmptyStatement
            | NodeData::DebuggerStatement
            | NodeData::Identifier { .. }
            | NodeData::PrivateIdentifier { .. }
            | NodeData::Keyword { .. }
            | NodeData::Literal { .. }
            | NodeData::OmittedExpression => {}
        }
        out
    }

    /// Short name of the node kind, for logs and test messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            NodeData::SourceFile { .. } => "SourceFile",
            NodeData::Block { .. } => "Block",
            NodeData::EmptyStatement => "EmptyStatement",
            NodeData::ExpressionStatement { .. } => "ExpressionStatement",
            NodeData::VariableStatement { .. } => "VariableStatement",
            NodeData::VariableDeclarationList { .. } => "VariableDeclarationList",
            NodeData::VariableDeclaration { .. } => "VariableDeclaration",
            NodeData::FunctionDeclaration(_) => "FunctionDeclaration",
            NodeData::ClassDeclaration(_) => "ClassDeclaration",
            NodeData::IfStatement { .. } => "IfStatement",
            NodeData::ForStatement { .. } => "ForStatement",
            NodeData::ForInStatement { .. } => "ForInStatement",
            NodeData::ForOfStatement { .. } => "ForOfStatement",
            NodeData::WhileStatement { .. } => "WhileStatement",
            NodeData::DoStatement { .. } => "DoStatement",
            NodeData::ReturnStatement { .. } => "ReturnStatement",
            NodeData::BreakStatement { .. } => "BreakStatement",
            NodeData::ContinueStatement { .. } => "ContinueStatement",
            NodeData::ThrowStatement { .. } => "ThrowStatement",
            NodeData::TryStatement { .. } => "TryStatement",
            NodeData::CatchClause { .. } => "CatchClause",
            NodeData::SwitchStatement { .. } => "SwitchStatement",
            NodeData::CaseClause { .. } => "CaseClause",
            NodeData::DefaultClause { .. } => "DefaultClause",
            NodeData::LabeledStatement { .. } => "LabeledStatement",
            NodeData::WithStatement { .. } => "WithStatement",
            NodeData::DebuggerStatement => "DebuggerStatement",
            NodeData::Identifier { .. } => "Identifier",
            NodeData::PrivateIdentifier { .. } => "PrivateIdentifier",
            NodeData::Keyword { .. } => "Keyword",
            NodeData::Literal { .. } => "Literal",
            NodeData::TemplateExpression { .. } => "TemplateExpression",
            NodeData::TemplateSpan { .. } => "TemplateSpan",
            NodeData::TaggedTemplateExpression { .. } => "TaggedTemplateExpression",
            NodeData::ArrayLiteralExpression { .. } => "ArrayLiteralExpression",
            NodeData::OmittedExpression => "OmittedExpression",
            NodeData::ObjectLiteralExpression { .. } => "ObjectLiteralExpression",
            NodeData::PropertyAssignment { .. } => "PropertyAssignment",
            NodeData::ShorthandPropertyAssignment { .. } => "ShorthandPropertyAssignment",
            NodeData::SpreadAssignment { .. } => "SpreadAssignment",
            NodeData::SpreadElement { .. } => "SpreadElement",
            NodeData::ComputedPropertyName { .. } => "ComputedPropertyName",
            NodeData::MethodDeclaration(_) => "MethodDeclaration",
            NodeData::FunctionExpression(_) => "FunctionExpression",
            NodeData::ArrowFunction { .. } => "ArrowFunction",
            NodeData::ClassExpression(_) => "ClassExpression",
            NodeData::Parameter { .. } => "Parameter",
            NodeData::PropertyDeclaration { .. } => "PropertyDeclaration",
            NodeData::ClassStaticBlockDeclaration { .. } => "ClassStaticBlockDeclaration",
            NodeData::ParenthesizedExpression { .. } => "ParenthesizedExpression",
            NodeData::PropertyAccessExpression { .. } => "PropertyAccessExpression",
            NodeData::ElementAccessExpression { .. } => "ElementAccessExpression",
            NodeData::CallExpression { .. } => "CallExpression",
            NodeData::NewExpression { .. } => "NewExpression",
            NodeData::MetaProperty { .. } => "MetaProperty",
            NodeData::PrefixUnaryExpression { .. } => "PrefixUnaryExpression",
            NodeData::PostfixUnaryExpression { .. } => "PostfixUnaryExpression",
            NodeData::AwaitExpression { .. } => "AwaitExpression",
            NodeData::YieldExpression { .. } => "YieldExpression",
            NodeData::BinaryExpression { .. } => "BinaryExpression",
            NodeData::ConditionalExpression { .. } => "ConditionalExpression",
            NodeData::ObjectBindingPattern { .. } => "ObjectBindingPattern",
            NodeData::ArrayBindingPattern { .. } => "ArrayBindingPattern",
            NodeData::BindingElement { .. } => "BindingElement",
        }
    }
}

fn function_children(func: &FunctionData, push: &mut impl FnMut(NodeIndex)) {
    push(func.name);
    func.parameters.iter().for_each(&mut *push);
    push(func.body);
}

fn class_children(class: &ClassData, push: &mut impl FnMut(NodeIndex)) {
    push(class.name);
    push(class.heritage);
    class.members.iter().for_each(&mut *push);
}

impl NodeArena {
    #[inline]
    pub fn get(&self, index: NodeIndex) -> Option<&Node> {
        self.nodes.get(index.0 as usize)
    }

    #[inline]
    pub fn data(&self, index: NodeIndex) -> Option<&NodeData> {
        self.get(index).map(|node| &node.data)
    }

    /// Parent of a node; `NONE` for the root and for unknown indices.
    #[inline]
    pub fn get_parent(&self, index: NodeIndex) -> NodeIndex {
        self.extended_info
            .get(index.0 as usize)
            .map_or(NodeIndex::NONE, |info| info.parent)
    }

    pub fn get_children(&self, index: NodeIndex) -> ChildIndices {
        self.data(index)
            .map(NodeData::children)
            .unwrap_or_default()
    }

    pub fn kind_name(&self, index: NodeIndex) -> &'static str {
        self.data(index).map_or("<none>", NodeData::kind_name)
    }

    /// Source text covered by a node.
    pub fn node_text(&self, index: NodeIndex) -> &str {
        self.get(index)
            .and_then(|node| {
                self.source_text()
                    .get(node.pos as usize..node.end as usize)
            })
            .unwrap_or("")
    }

    /// Text of an identifier node (escapes preserved).
    pub fn identifier_text(&self, index: NodeIndex) -> Option<&str> {
        match self.data(index)? {
            NodeData::Identifier { escaped_text } => Some(escaped_text),
            _ => None,
        }
    }

    pub fn is_identifier(&self, index: NodeIndex) -> bool {
        matches!(self.data(index), Some(NodeData::Identifier { .. }))
    }

    pub fn is_block(&self, index: NodeIndex) -> bool {
        matches!(self.data(index), Some(NodeData::Block { .. }))
    }

    pub fn is_source_file(&self, index: NodeIndex) -> bool {
        matches!(self.data(index), Some(NodeData::SourceFile { .. }))
    }

    /// Whether the node's children include a plain statement list, so a
    /// statement placed there can be replaced by several statements.
    pub fn is_statement_list_container(&self, index: NodeIndex) -> bool {
        matches!(
            self.data(index),
            Some(
                NodeData::SourceFile { .. }
                    | NodeData::Block { .. }
                    | NodeData::CaseClause { .. }
                    | NodeData::DefaultClause { .. }
            )
        )
    }

    pub fn function_data(&self, index: NodeIndex) -> Option<&FunctionData> {
        match self.data(index)? {
            NodeData::FunctionDeclaration(func) | NodeData::FunctionExpression(func) => Some(func),
            _ => None,
        }
    }

    pub fn class_data(&self, index: NodeIndex) -> Option<&ClassData> {
        match self.data(index)? {
            NodeData::ClassDeclaration(class) | NodeData::ClassExpression(class) => Some(class),
            _ => None,
        }
    }
}
