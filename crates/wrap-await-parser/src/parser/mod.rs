//! Recursive descent parser producing an arena syntax tree.

pub mod base;
pub use base::{NodeIndex, NodeList};

pub mod flags;
pub use flags::ContextFlags;

pub mod node;
pub use node::{
    ClassData, ExtendedNodeInfo, FunctionData, MethodData, MethodKind, Node, NodeArena, NodeData,
    VariableKind,
};

pub mod node_access;
pub use node_access::ChildIndices;

pub mod state;
pub use state::{ParseResult, ParserState};

mod state_expressions;
mod state_statements;
mod state_statements_class_members;
