//! Arena syntax tree.
//!
//! Every node lives in a single `Vec<Node>` owned by the [`NodeArena`] and is
//! addressed by a [`NodeIndex`]. Nodes carry byte offsets into the parsed text
//! (`pos` is the start of the node's first token, `end` the end of its last
//! token) and a kind-tagged [`NodeData`] payload whose children are indices.
//!
//! Parent links are kept in a side table (`extended_info`) that is filled in
//! when a parent node is added, so the tree can be walked upwards without the
//! nodes themselves referencing each other.

use super::base::{NodeIndex, NodeList};
use serde::Serialize;
use std::sync::Arc;
use wrap_await_scanner::SyntaxKind;

/// A single syntax tree node.
#[derive(Clone, Debug, Serialize)]
pub struct Node {
    /// Start offset of the node's first token.
    pub pos: u32,
    /// End offset (exclusive) of the node's last token.
    pub end: u32,
    pub data: NodeData,
}

/// Side-table entry for a node.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct ExtendedNodeInfo {
    pub parent: NodeIndex,
}

impl Default for ExtendedNodeInfo {
    fn default() -> Self {
        ExtendedNodeInfo {
            parent: NodeIndex::NONE,
        }
    }
}

/// `var`, `let` or `const`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum VariableKind {
    Var,
    Let,
    Const,
}

impl VariableKind {
    pub fn keyword(self) -> &'static str {
        match self {
            VariableKind::Var => "var",
            VariableKind::Let => "let",
            VariableKind::Const => "const",
        }
    }
}

/// Which flavour of method a `MethodDeclaration` is.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum MethodKind {
    Method,
    Getter,
    Setter,
    Constructor,
}

/// Function declarations and function expressions.
#[derive(Clone, Debug, Serialize)]
pub struct FunctionData {
    pub name: NodeIndex,
    pub is_async: bool,
    pub is_generator: bool,
    pub parameters: NodeList,
    pub body: NodeIndex,
}

/// Class declarations and class expressions.
#[derive(Clone, Debug, Serialize)]
pub struct ClassData {
    pub name: NodeIndex,
    /// The `extends` expression, or `NONE`.
    pub heritage: NodeIndex,
    pub members: NodeList,
}

/// Methods, accessors and constructors, in object literals and classes.
#[derive(Clone, Debug, Serialize)]
pub struct MethodData {
    pub kind: MethodKind,
    pub is_static: bool,
    pub is_async: bool,
    pub is_generator: bool,
    /// Identifier, string/numeric literal, private name or computed name.
    pub name: NodeIndex,
    pub parameters: NodeList,
    pub body: NodeIndex,
}

/// Kind-specific node payload.
///
/// Variant names follow the ESTree/TypeScript vocabulary so that they read
/// naturally next to the grammar.
#[derive(Clone, Debug, Serialize)]
pub enum NodeData {
    SourceFile {
        statements: NodeList,
    },

    // Statements
    Block {
        statements: NodeList,
    },
    EmptyStatement,
    ExpressionStatement {
        expression: NodeIndex,
    },
    VariableStatement {
        declaration_list: NodeIndex,
    },
    VariableDeclarationList {
        kind: VariableKind,
        declarations: NodeList,
    },
    VariableDeclaration {
        name: NodeIndex,
        initializer: NodeIndex,
    },
    FunctionDeclaration(FunctionData),
    ClassDeclaration(ClassData),
    IfStatement {
        condition: NodeIndex,
        then_statement: NodeIndex,
        else_statement: NodeIndex,
    },
    ForStatement {
        initializer: NodeIndex,
        condition: NodeIndex,
        incrementor: NodeIndex,
        statement: NodeIndex,
    },
    ForInStatement {
        initializer: NodeIndex,
        expression: NodeIndex,
        statement: NodeIndex,
    },
    ForOfStatement {
        await_modifier: bool,
        initializer: NodeIndex,
        expression: NodeIndex,
        statement: NodeIndex,
    },
    WhileStatement {
        condition: NodeIndex,
        statement: NodeIndex,
    },
    DoStatement {
        statement: NodeIndex,
        condition: NodeIndex,
    },
    ReturnStatement {
        expression: NodeIndex,
    },
    BreakStatement {
        label: NodeIndex,
    },
    ContinueStatement {
        label: NodeIndex,
    },
    ThrowStatement {
        expression: NodeIndex,
    },
    TryStatement {
        try_block: NodeIndex,
        catch_clause: NodeIndex,
        finally_block: NodeIndex,
    },
    CatchClause {
        /// Binding identifier or pattern, or `NONE` for `catch {}`.
        variable: NodeIndex,
        block: NodeIndex,
    },
    SwitchStatement {
        expression: NodeIndex,
        clauses: NodeList,
    },
    CaseClause {
        expression: NodeIndex,
        statements: NodeList,
    },
    DefaultClause {
        statements: NodeList,
    },
    LabeledStatement {
        label: NodeIndex,
        statement: NodeIndex,
    },
    WithStatement {
        expression: NodeIndex,
        statement: NodeIndex,
    },
    DebuggerStatement,

    // Names and literals
    Identifier {
        escaped_text: String,
    },
    PrivateIdentifier {
        escaped_text: String,
    },
    /// `this`, `super`, `null`, `true`, `false`, and the `import` callee of
    /// a dynamic import.
    Keyword {
        kind: SyntaxKind,
    },
    /// Numeric, BigInt, string, regular expression and no-substitution
    /// template literals. The text is the node's source span.
    Literal {
        kind: SyntaxKind,
    },
    TemplateExpression {
        head: NodeIndex,
        spans: NodeList,
    },
    TemplateSpan {
        expression: NodeIndex,
        /// `TemplateMiddle` or `TemplateTail` literal.
        literal: NodeIndex,
    },
    TaggedTemplateExpression {
        tag: NodeIndex,
        template: NodeIndex,
    },

    // Object and array literals
    ArrayLiteralExpression {
        elements: NodeList,
    },
    OmittedExpression,
    ObjectLiteralExpression {
        properties: NodeList,
    },
    PropertyAssignment {
        name: NodeIndex,
        initializer: NodeIndex,
    },
    ShorthandPropertyAssignment {
        name: NodeIndex,
        /// `= value` in a destructuring assignment target.
        object_assignment_initializer: NodeIndex,
    },
    SpreadAssignment {
        expression: NodeIndex,
    },
    SpreadElement {
        expression: NodeIndex,
    },
    ComputedPropertyName {
        expression: NodeIndex,
    },
    MethodDeclaration(MethodData),

    // Functions and classes
    FunctionExpression(FunctionData),
    ArrowFunction {
        is_async: bool,
        parameters: NodeList,
        /// A `Block` or a concise-body expression.
        body: NodeIndex,
    },
    ClassExpression(ClassData),
    Parameter {
        dot_dot_dot: bool,
        name: NodeIndex,
        initializer: NodeIndex,
    },
    PropertyDeclaration {
        is_static: bool,
        name: NodeIndex,
        initializer: NodeIndex,
    },
    ClassStaticBlockDeclaration {
        body: NodeIndex,
    },

    // Expressions
    ParenthesizedExpression {
        expression: NodeIndex,
    },
    PropertyAccessExpression {
        expression: NodeIndex,
        question_dot: bool,
        name: NodeIndex,
    },
    ElementAccessExpression {
        expression: NodeIndex,
        question_dot: bool,
        argument: NodeIndex,
    },
    CallExpression {
        expression: NodeIndex,
        question_dot: bool,
        arguments: NodeList,
    },
    NewExpression {
        expression: NodeIndex,
        /// `None` for `new C` without an argument list.
        arguments: Option<NodeList>,
    },
    /// `new.target` and `import.meta`.
    MetaProperty {
        keyword: SyntaxKind,
        name: NodeIndex,
    },
    /// Prefix operators, including `typeof`, `void` and `delete`.
    PrefixUnaryExpression {
        operator: SyntaxKind,
        operand: NodeIndex,
    },
    PostfixUnaryExpression {
        operand: NodeIndex,
        operator: SyntaxKind,
    },
    AwaitExpression {
        expression: NodeIndex,
    },
    YieldExpression {
        asterisk: bool,
        expression: NodeIndex,
    },
    /// Binary operators, assignments and the comma operator.
    BinaryExpression {
        left: NodeIndex,
        operator: SyntaxKind,
        right: NodeIndex,
    },
    ConditionalExpression {
        condition: NodeIndex,
        when_true: NodeIndex,
        when_false: NodeIndex,
    },

    // Binding patterns
    ObjectBindingPattern {
        elements: NodeList,
    },
    ArrayBindingPattern {
        elements: NodeList,
    },
    BindingElement {
        dot_dot_dot: bool,
        /// `key` in `{ key: name }`, or `NONE`.
        property_name: NodeIndex,
        name: NodeIndex,
        initializer: NodeIndex,
    },
}

/// Owner of all nodes produced by one parse.
#[derive(Debug)]
pub struct NodeArena {
    pub nodes: Vec<Node>,
    pub extended_info: Vec<ExtendedNodeInfo>,
    text: Arc<str>,
}

impl NodeArena {
    /// Create an empty arena for the given source text.
    pub fn new(text: Arc<str>) -> NodeArena {
        NodeArena {
            nodes: Vec::new(),
            extended_info: Vec::new(),
            text,
        }
    }

    /// Create an arena with room for `capacity` nodes.
    pub fn with_capacity(text: Arc<str>, capacity: usize) -> NodeArena {
        NodeArena {
            nodes: Vec::with_capacity(capacity),
            extended_info: Vec::with_capacity(capacity),
            text,
        }
    }

    /// Add a node and claim its children.
    pub fn add(&mut self, pos: u32, end: u32, data: NodeData) -> NodeIndex {
        let index = NodeIndex(self.nodes.len() as u32);
        for child in data.children() {
            if let Some(info) = self.extended_info.get_mut(child.0 as usize) {
                info.parent = index;
            }
        }
        self.nodes.push(Node { pos, end, data });
        self.extended_info.push(ExtendedNodeInfo::default());
        index
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The text the nodes' offsets refer to.
    pub fn source_text(&self) -> &str {
        &self.text
    }

    pub fn source_text_arc(&self) -> Arc<str> {
        Arc::clone(&self.text)
    }
}
