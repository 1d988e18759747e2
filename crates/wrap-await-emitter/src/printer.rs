//! Source printer.
//!
//! The printer reproduces the parsed text byte for byte, except where a node
//! carries a [`TransformDirective`]. For those nodes it writes the directive's
//! output instead of the node's source range. Directive output reuses the
//! source of the node's children through [`Printer::emit_span`], so a
//! directive nested inside a replaced range (a qualified binding inside a
//! rewritten declaration, say) is still applied.

use crate::source_writer::SourceWriter;
use crate::transform_context::{TransformContext, TransformDirective};
use std::borrow::Cow;
use tracing::{debug, trace};
use wrap_await_parser::{NodeArena, NodeData, NodeIndex, NodeList};

/// How rehoisted assignment targets are spelled.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum BindingTarget {
    /// Bare names, assigned in whatever scope runs the wrapper.
    #[default]
    Ambient,
    /// Properties of a caller-supplied scope object, e.g. `globalThis.__scope`.
    Object { path: String },
}

impl BindingTarget {
    pub fn spell<'n>(&self, name: &'n str) -> Cow<'n, str> {
        match self {
            BindingTarget::Ambient => Cow::Borrowed(name),
            BindingTarget::Object { path } => Cow::Owned(format!("{path}.{name}")),
        }
    }
}

/// Source range of a directive node.
#[derive(Clone, Copy, Debug)]
struct DirectiveSpan {
    pos: u32,
    end: u32,
    node: NodeIndex,
}

pub struct Printer<'a> {
    arena: &'a NodeArena,
    transforms: &'a TransformContext,
    target: BindingTarget,
    writer: SourceWriter,
    /// Directive spans by start ascending, then end descending, so that an
    /// enclosing directive comes before the directives nested in it. Parents
    /// are added to the arena after their children, so equal spans order by
    /// node index descending.
    spans: Vec<DirectiveSpan>,
}

impl<'a> Printer<'a> {
    pub fn new(arena: &'a NodeArena, transforms: &'a TransformContext) -> Self {
        let mut spans: Vec<DirectiveSpan> = transforms
            .nodes()
            .filter_map(|node| {
                arena.get(node).map(|n| DirectiveSpan {
                    pos: n.pos,
                    end: n.end,
                    node,
                })
            })
            .collect();
        spans.sort_by(|a, b| {
            a.pos
                .cmp(&b.pos)
                .then(b.end.cmp(&a.end))
                .then(b.node.cmp(&a.node))
        });
        Printer {
            arena,
            transforms,
            target: BindingTarget::Ambient,
            writer: SourceWriter::with_capacity(arena.source_text().len() + spans.len() * 16),
            spans,
        }
    }

    pub fn with_binding_target(mut self, target: BindingTarget) -> Self {
        self.target = target;
        self
    }

    /// Print the tree rooted at `root` with every directive applied.
    pub fn print(mut self, root: NodeIndex) -> String {
        debug!(directives = self.spans.len(), "[printer] printing");
        let Some(node) = self.arena.get(root) else {
            return String::new();
        };
        let (pos, end) = (node.pos, node.end);
        self.emit_span(pos, end, NodeIndex::NONE);
        self.writer.finish()
    }

    // =========================================================================
    // Splicing
    // =========================================================================

    /// Copy `start..end` from the source, substituting directive output for
    /// every outermost directive node inside the range other than `skip`.
    pub fn emit_span(&mut self, start: u32, end: u32, skip: NodeIndex) {
        let mut cursor = start;
        let mut i = self.spans.partition_point(|span| span.pos < start);
        while let Some(&span) = self.spans.get(i) {
            i += 1;
            if span.pos >= end {
                break;
            }
            if span.node == skip || span.end > end || span.pos < cursor {
                continue;
            }
            self.write_source(cursor, span.pos);
            self.emit_directive(span.node);
            cursor = span.end;
        }
        self.write_source(cursor, end);
    }

    fn emit_node(&mut self, node: NodeIndex, skip: NodeIndex) {
        if let Some(n) = self.arena.get(node) {
            let (pos, end) = (n.pos, n.end);
            self.emit_span(pos, end, skip);
        }
    }

    fn write_source(&mut self, start: u32, end: u32) {
        let text = self.arena.source_text();
        if let Some(slice) = safe_slice(text, start, end) {
            self.writer.write(slice);
        }
    }

    // =========================================================================
    // Directives
    // =========================================================================

    fn emit_directive(&mut self, node: NodeIndex) {
        let transforms = self.transforms;
        let Some(directive) = transforms.get(node) else {
            return self.emit_node(node, node);
        };
        trace!(node = node.0, directive = directive.kind_name(), "[printer] directive");
        match directive {
            TransformDirective::AssignFunction => {
                let name = self.arena.function_data(node).map(|f| f.name);
                self.emit_named_assignment(node, name.unwrap_or(NodeIndex::NONE));
            }
            TransformDirective::AssignClass => {
                let name = self.arena.class_data(node).map(|c| c.name);
                self.emit_named_assignment(node, name.unwrap_or(NodeIndex::NONE));
            }
            TransformDirective::AssignDeclarations {
                declarations,
                wrap_in_block,
            } => self.emit_assign_declarations(declarations, *wrap_in_block),
            TransformDirective::AssignForHead {
                declarations,
                in_for_in_of,
            } => self.emit_assign_for_head(node, declarations, *in_for_in_of),
            TransformDirective::QualifyBinding => {
                let arena = self.arena;
                let name = arena.identifier_text(node).unwrap_or_default();
                let spelled = self.target.spell(name).into_owned();
                self.writer.write(&spelled);
            }
            TransformDirective::QualifyShorthand { name, initializer } => {
                let arena = self.arena;
                let text = arena.identifier_text(*name).unwrap_or_default();
                let spelled = self.target.spell(text).into_owned();
                self.writer.write(text);
                self.writer.write(": ");
                self.writer.write(&spelled);
                if initializer.is_some() {
                    self.writer.write(" = ");
                    self.emit_node(*initializer, NodeIndex::NONE);
                }
            }
            TransformDirective::ReturnCompletion => {
                self.writer.write("return ");
                self.emit_node(node, node);
            }
        }
    }

    /// `void (<name> = <node source>);`
    fn emit_named_assignment(&mut self, node: NodeIndex, name: NodeIndex) {
        let arena = self.arena;
        let Some(name_text) = arena.identifier_text(name) else {
            return self.emit_node(node, node);
        };
        let spelled = self.target.spell(name_text).into_owned();
        self.writer.write("void (");
        self.writer.write(&spelled);
        self.writer.write(" = ");
        self.emit_node(node, node);
        self.writer.write(");");
    }

    fn emit_assign_declarations(&mut self, declarations: &NodeList, wrap_in_block: bool) {
        if wrap_in_block {
            self.writer.write("{ ");
        }
        for (i, declaration) in declarations.iter().enumerate() {
            if i > 0 {
                self.writer.write_space();
            }
            self.writer.write("void (");
            self.emit_declarator_assignment(declaration);
            self.writer.write(");");
        }
        if wrap_in_block {
            self.writer.write(" }");
        }
    }

    fn emit_assign_for_head(&mut self, list: NodeIndex, declarations: &NodeList, in_for_in_of: bool) {
        let arena = self.arena;
        if in_for_in_of {
            if let Some(declaration) = declarations.first()
                && let Some(NodeData::VariableDeclaration { name, .. }) = arena.data(declaration)
            {
                // `for (async of xs)` and `for (let of xs)` do not parse
                let parenthesize = self.target == BindingTarget::Ambient
                    && matches!(
                        arena.data(arena.get_parent(list)),
                        Some(NodeData::ForOfStatement { .. })
                    )
                    && matches!(arena.identifier_text(*name), Some("async" | "let"));
                if parenthesize {
                    self.writer.write("(");
                }
                self.emit_node(*name, NodeIndex::NONE);
                if parenthesize {
                    self.writer.write(")");
                }
            }
            return;
        }
        for (i, declaration) in declarations.iter().enumerate() {
            if i > 0 {
                self.writer.write(", ");
            }
            self.emit_declarator_assignment(declaration);
        }
    }

    /// `<target> = <initializer or undefined>`
    fn emit_declarator_assignment(&mut self, declaration: NodeIndex) {
        let arena = self.arena;
        let Some(NodeData::VariableDeclaration { name, initializer }) = arena.data(declaration)
        else {
            return;
        };
        self.emit_node(*name, NodeIndex::NONE);
        self.writer.write(" = ");
        if initializer.is_some() {
            self.emit_node(*initializer, NodeIndex::NONE);
        } else {
            self.writer.write("undefined");
        }
    }
}

/// `text[start..end]`, or `None` when the range is out of bounds or splits a
/// character.
fn safe_slice(text: &str, start: u32, end: u32) -> Option<&str> {
    let (start, end) = (start as usize, end as usize);
    if start >= end {
        return None;
    }
    text.get(start..end)
}

/// Print `root` with `transforms` applied and targets spelled per `target`.
pub fn print_with_transforms(
    arena: &NodeArena,
    root: NodeIndex,
    transforms: &TransformContext,
    target: BindingTarget,
) -> String {
    Printer::new(arena, transforms)
        .with_binding_target(target)
        .print(root)
}
