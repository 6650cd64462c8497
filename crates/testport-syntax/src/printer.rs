//! Render a syntax tree to text and record the byte span of every node.
//!
//! Layout is deterministic: declarations and statements of indented blocks
//! go on their own lines (4-space indent), attribute lists of a declaration
//! each on their own line, inline blocks as `{ a; b; }`.
//!
//! Trivia handling depends on context:
//!
//! - **Line context** (members, statements of indented blocks, attribute
//!   lists of declarations): a leading comment becomes its own indented line,
//!   a leading end-of-line becomes a blank line, leading whitespace is
//!   dropped. Trailing whitespace and comments stay on the line.
//! - **Inline context** (expressions, names, arguments): trivia is written
//!   verbatim.
//!
//! Node spans never include the node's own trivia.

use std::collections::BTreeMap;

use testport_core::Span;

use crate::tree::{ArgumentName, BlockLayout, Node, NodeId, NodeKind, SyntaxTree, Trivia};

const INDENT: &str = "    ";

/// Rendered text plus the span of every node.
#[derive(Debug, Clone, Default)]
pub struct Rendered {
    pub text: String,
    pub spans: BTreeMap<NodeId, Span>,
}

impl Rendered {
    pub fn span(&self, id: NodeId) -> Option<Span> {
        self.spans.get(&id).copied()
    }

    /// Text covered by a node, without its trivia.
    pub fn node_text(&self, id: NodeId) -> Option<&str> {
        self.span(id)?.slice(&self.text)
    }
}

/// Render a whole tree.
pub fn render(tree: &SyntaxTree) -> Rendered {
    let mut printer = Printer::default();
    printer.line_item(tree.root());
    printer.finish()
}

/// Render a single node (declarations in line context, anything else inline),
/// without a trailing newline.
pub fn render_node(node: &Node) -> String {
    let mut printer = Printer::default();
    if is_line_kind(&node.kind) {
        printer.line_item(node);
        if printer.out.ends_with('\n') {
            printer.out.pop();
        }
    } else {
        printer.inline(node);
    }
    printer.out
}

fn is_line_kind(kind: &NodeKind) -> bool {
    matches!(
        kind,
        NodeKind::CompilationUnit { .. }
            | NodeKind::UsingDirective { .. }
            | NodeKind::Namespace { .. }
            | NodeKind::TypeDeclaration { .. }
            | NodeKind::MethodDeclaration { .. }
            | NodeKind::ConstructorDeclaration { .. }
    )
}

#[derive(Default)]
struct Printer {
    out: String,
    spans: BTreeMap<NodeId, Span>,
    indent: usize,
}

impl Printer {
    fn finish(self) -> Rendered {
        Rendered {
            text: self.out,
            spans: self.spans,
        }
    }

    fn pos(&self) -> u64 {
        self.out.len() as u64
    }

    fn record(&mut self, id: NodeId, start: u64) {
        let end = self.pos();
        self.spans.insert(id, Span::new(start, end));
    }

    fn write(&mut self, text: &str) {
        self.out.push_str(text);
    }

    fn write_indent(&mut self) {
        for _ in 0..self.indent {
            self.out.push_str(INDENT);
        }
    }

    // ------------------------------------------------------------------
    // Trivia
    // ------------------------------------------------------------------

    /// Leading trivia in line context. Must be called at the start of a line.
    fn leading_lines(&mut self, trivia: &[Trivia]) {
        for t in trivia {
            match t {
                Trivia::Comment(text) => {
                    self.write_indent();
                    self.write(text);
                    self.write("\n");
                }
                Trivia::EndOfLine => self.write("\n"),
                Trivia::Whitespace(_) => {}
            }
        }
    }

    /// Trailing trivia in line context: stays on the current line.
    fn trailing_on_line(&mut self, trivia: &[Trivia]) {
        for t in trivia {
            match t {
                Trivia::Whitespace(text) | Trivia::Comment(text) => self.write(text),
                Trivia::EndOfLine => {}
            }
        }
    }

    fn verbatim(&mut self, trivia: &[Trivia]) {
        for t in trivia {
            match t {
                Trivia::Whitespace(text) | Trivia::Comment(text) => self.write(text),
                Trivia::EndOfLine => self.write("\n"),
            }
        }
    }

    // ------------------------------------------------------------------
    // Line context
    // ------------------------------------------------------------------

    /// Render a node on its own line(s), followed by a newline.
    fn line_item(&mut self, node: &Node) {
        self.leading_lines(&node.leading);
        match &node.kind {
            NodeKind::CompilationUnit { members } => {
                let start = self.pos();
                for member in members {
                    self.line_item(member);
                }
                self.record(node.id, start);
                // the unit has no line of its own
                return;
            }
            NodeKind::TypeDeclaration {
                attribute_lists, ..
            }
            | NodeKind::MethodDeclaration {
                attribute_lists, ..
            }
            | NodeKind::ConstructorDeclaration {
                attribute_lists, ..
            } => {
                let start = self.attribute_lines(attribute_lists);
                self.declaration_rest(node);
                self.record(node.id, start);
            }
            _ => {
                self.write_indent();
                let start = self.pos();
                self.line_core(node);
                self.record(node.id, start);
            }
        }
        self.trailing_on_line(&node.trailing);
        self.write("\n");
    }

    /// Attribute lists of a declaration, one per line. Leaves the cursor
    /// indented on the declaration's header line and returns where the
    /// declaration starts.
    fn attribute_lines(&mut self, lists: &[Node]) -> u64 {
        let mut start = None;
        for list in lists {
            self.leading_lines(&list.leading);
            self.write_indent();
            let list_start = self.pos();
            if start.is_none() {
                start = Some(list_start);
            }
            self.inline_core(list);
            self.record(list.id, list_start);
            self.trailing_on_line(&list.trailing);
            self.write("\n");
        }
        self.write_indent();
        let header = self.pos();
        start.unwrap_or(header)
    }

    fn modifiers(&mut self, modifiers: &[String]) {
        for modifier in modifiers {
            self.write(modifier);
            self.write(" ");
        }
    }

    fn parameter_list(&mut self, parameters: &[Node]) {
        self.write("(");
        self.comma_separated(parameters);
        self.write(")");
    }

    fn declaration_rest(&mut self, node: &Node) {
        match &node.kind {
            NodeKind::TypeDeclaration {
                modifiers,
                keyword,
                identifier,
                base_types,
                members,
                ..
            } => {
                self.modifiers(modifiers);
                self.write(keyword.as_str());
                self.write(" ");
                self.write(identifier);
                if !base_types.is_empty() {
                    self.write(" : ");
                    self.comma_separated(base_types);
                }
                self.write("\n");
                self.write_indent();
                self.write("{\n");
                self.indent += 1;
                for member in members {
                    self.line_item(member);
                }
                self.indent -= 1;
                self.write_indent();
                self.write("}");
            }
            NodeKind::MethodDeclaration {
                modifiers,
                return_type,
                identifier,
                parameters,
                body,
                expression_body,
                ..
            } => {
                self.modifiers(modifiers);
                self.inline(return_type);
                self.write(" ");
                self.write(identifier);
                self.parameter_list(parameters);
                match (body, expression_body) {
                    (Some(body), _) => self.member_body(body),
                    (None, Some(expression)) => {
                        self.write(" => ");
                        self.inline(expression);
                        self.write(";");
                    }
                    (None, None) => self.write(";"),
                }
            }
            NodeKind::ConstructorDeclaration {
                modifiers,
                identifier,
                parameters,
                body,
                ..
            } => {
                self.modifiers(modifiers);
                self.write(identifier);
                self.parameter_list(parameters);
                self.member_body(body);
            }
            _ => self.line_core(node),
        }
    }

    /// Body block of a method or constructor.
    fn member_body(&mut self, body: &Node) {
        match &body.kind {
            NodeKind::Block {
                statements,
                layout: BlockLayout::Indented,
            } => {
                self.write("\n");
                self.write_indent();
                let start = self.pos();
                self.indented_block(statements);
                self.record(body.id, start);
            }
            _ => {
                self.write(" ");
                self.inline(body);
            }
        }
    }

    /// `{`, one statement per line, `}`; cursor starts after the indent.
    fn indented_block(&mut self, statements: &[Node]) {
        self.write("{\n");
        self.indent += 1;
        for statement in statements {
            self.line_item(statement);
        }
        self.indent -= 1;
        self.write_indent();
        self.write("}");
    }

    /// Text of a node in line context, after the indent.
    fn line_core(&mut self, node: &Node) {
        match &node.kind {
            NodeKind::UsingDirective { alias, name } => {
                self.write("using ");
                if let Some(alias) = alias {
                    self.write(alias);
                    self.write(" = ");
                }
                self.inline(name);
                self.write(";");
            }
            NodeKind::Namespace { name, members } => {
                self.write("namespace ");
                self.inline(name);
                self.write("\n");
                self.write_indent();
                self.write("{\n");
                self.indent += 1;
                for member in members {
                    self.line_item(member);
                }
                self.indent -= 1;
                self.write_indent();
                self.write("}");
            }
            NodeKind::Block { statements, .. } => self.indented_block(statements),
            NodeKind::TypeDeclaration { .. }
            | NodeKind::MethodDeclaration { .. }
            | NodeKind::ConstructorDeclaration { .. } => self.declaration_rest(node),
            _ => self.inline_core(node),
        }
    }

    // ------------------------------------------------------------------
    // Inline context
    // ------------------------------------------------------------------

    fn inline(&mut self, node: &Node) {
        self.verbatim(&node.leading);
        let start = self.pos();
        self.inline_core(node);
        self.record(node.id, start);
        self.verbatim(&node.trailing);
    }

    fn comma_separated(&mut self, nodes: &[Node]) {
        for (i, node) in nodes.iter().enumerate() {
            if i > 0 {
                self.write(", ");
            }
            self.inline(node);
        }
    }

    fn inline_core(&mut self, node: &Node) {
        match &node.kind {
            NodeKind::IdentifierName { identifier } => self.write(identifier),
            NodeKind::GenericName {
                identifier,
                type_arguments,
            } => {
                self.write(identifier);
                self.write("<");
                self.comma_separated(type_arguments);
                self.write(">");
            }
            NodeKind::QualifiedName { left, right } => {
                self.inline(left);
                self.write(".");
                self.inline(right);
            }
            NodeKind::MemberAccess { expression, name } => {
                self.inline(expression);
                self.write(".");
                self.inline(name);
            }
            NodeKind::Invocation {
                expression,
                arguments,
            } => {
                self.inline(expression);
                self.write("(");
                self.comma_separated(arguments);
                self.write(")");
            }
            NodeKind::Argument { name, expression } => {
                if let Some(name) = name {
                    self.write(name);
                    self.write(": ");
                }
                self.inline(expression);
            }
            NodeKind::ObjectCreation {
                type_name,
                arguments,
            } => {
                self.write("new ");
                self.inline(type_name);
                self.write("(");
                self.comma_separated(arguments);
                self.write(")");
            }
            NodeKind::Opaque { text } => self.write(text),
            NodeKind::AttributeList { target, attributes } => {
                self.write("[");
                if let Some(target) = target {
                    self.write(target);
                    self.write(": ");
                }
                self.comma_separated(attributes);
                self.write("]");
            }
            NodeKind::Attribute { name, arguments } => {
                self.inline(name);
                if let Some(arguments) = arguments {
                    self.write("(");
                    self.comma_separated(arguments);
                    self.write(")");
                }
            }
            NodeKind::AttributeArgument { name, expression } => {
                match name {
                    Some(ArgumentName::Equals(name)) => {
                        self.write(name);
                        self.write(" = ");
                    }
                    Some(ArgumentName::Colon(name)) => {
                        self.write(name);
                        self.write(": ");
                    }
                    None => {}
                }
                self.inline(expression);
            }
            NodeKind::Parameter {
                type_name,
                identifier,
            } => {
                self.inline(type_name);
                self.write(" ");
                self.write(identifier);
            }
            NodeKind::ExpressionStatement { expression } => {
                self.inline(expression);
                self.write(";");
            }
            NodeKind::ThrowStatement { expression } => {
                self.write("throw");
                if let Some(expression) = expression {
                    self.write(" ");
                    self.inline(expression);
                }
                self.write(";");
            }
            NodeKind::Block { statements, .. } => {
                self.write("{ ");
                for statement in statements {
                    self.inline(statement);
                    self.write(" ");
                }
                self.write("}");
            }
            NodeKind::CompilationUnit { .. }
            | NodeKind::UsingDirective { .. }
            | NodeKind::Namespace { .. }
            | NodeKind::TypeDeclaration { .. }
            | NodeKind::MethodDeclaration { .. }
            | NodeKind::ConstructorDeclaration { .. } => self.line_core(node),
        }
    }
}
