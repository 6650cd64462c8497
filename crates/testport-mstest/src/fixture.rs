//! Builders for compiled units in tests and demos.
//!
//! Hosts normally hand the engine a serialized [`Compilation`]. The
//! builders here assemble one in code instead, with metadata for the
//! MSTest and xUnit types the rules know about:
//!
//! ```
//! use testport_mstest::fixture::UnitBuilder;
//!
//! let mut unit = UnitBuilder::new();
//! unit.document("Tests.cs", |d| {
//!     d.using_mstest();
//!     d.class("Test", &["TestClass"], |c| {
//!         c.method("Run", &["TestMethod"], |b| {
//!             b.call("Assert", "IsTrue", &["false"]);
//!         });
//!     });
//! });
//! let compilation = unit.build();
//! assert_eq!(
//!     compilation.documents[0].text(),
//!     "using Microsoft.VisualStudio.TestTools.UnitTesting;\n\
//!      [TestClass]\n\
//!      public class Test\n\
//!      {\n    \
//!          [TestMethod]\n    \
//!          public void Run() { Assert.IsTrue(false); }\n\
//!      }\n"
//! );
//! ```
//!
//! Argument and attribute strings are split on top-level commas, so
//! `"TestClass, Sample"` is one attribute list holding two attributes. An
//! argument of the form `name: expr` becomes a named argument and, inside
//! attributes, `Name = expr` becomes a property initializer. Everything else
//! is kept as opaque expression text.

use testport_syntax::semantic::{MetadataTable, TypeDefinition};
use testport_syntax::tree::{ArgumentName, BlockLayout, Trivia};
use testport_syntax::{Compilation, Node, NodeId, NodeKind, SyntaxGenerator, SyntaxTree};
use tracing::warn;

use crate::catalog::{MSTEST_NAMESPACE, XUNIT_NAMESPACE};

// ============================================================================
// Metadata
// ============================================================================

fn mstest(name: &str) -> String {
    format!("{MSTEST_NAMESPACE}.{name}")
}

fn xunit(name: &str) -> String {
    format!("{XUNIT_NAMESPACE}.{name}")
}

/// Platform types every unit references.
pub fn platform_types() -> Vec<TypeDefinition> {
    vec![
        TypeDefinition::class("System.Object"),
        TypeDefinition::class("System.Attribute"),
        TypeDefinition::class("System.Exception").with_constructor(&[]).with_constructor(&["message"]),
        TypeDefinition::class("System.InvalidOperationException")
            .with_base("System.Exception")
            .with_constructor(&[])
            .with_constructor(&["message"]),
        TypeDefinition::interface("System.IDisposable"),
    ]
}

/// The MSTest surface the rules recognize.
pub fn mstest_types() -> Vec<TypeDefinition> {
    let attribute = |name: &str| TypeDefinition::class(mstest(name)).with_base("System.Attribute");
    vec![
        TypeDefinition::class(mstest("Assert")),
        TypeDefinition::class(mstest("StringAssert")),
        TypeDefinition::class(mstest("CollectionAssert")),
        TypeDefinition::interface(mstest("ITestDataSource")),
        attribute("TestClassAttribute").with_constructor(&[]),
        attribute("TestMethodAttribute")
            .with_constructor(&[])
            .with_constructor(&["displayName"]),
        TypeDefinition::class(mstest("DataTestMethodAttribute"))
            .with_base(mstest("TestMethodAttribute"))
            .with_constructor(&[])
            .with_constructor(&["displayName"]),
        attribute("DataRowAttribute")
            .implementing(mstest("ITestDataSource"))
            .with_constructor(&["data1"])
            .with_constructor(&["data1", "moreData"]),
        attribute("DynamicDataAttribute")
            .implementing(mstest("ITestDataSource"))
            .with_constructor(&["dynamicDataSourceName"])
            .with_constructor(&["dynamicDataSourceName", "dynamicDataSourceType"])
            .with_constructor(&[
                "dynamicDataSourceName",
                "dynamicDataDeclaringType",
                "dynamicDataSourceType",
            ]),
        attribute("AssemblyInitializeAttribute").with_constructor(&[]),
        attribute("AssemblyCleanupAttribute").with_constructor(&[]),
        attribute("ClassInitializeAttribute")
            .with_constructor(&[])
            .with_constructor(&["inheritanceBehavior"]),
        attribute("ClassCleanupAttribute")
            .with_constructor(&[])
            .with_constructor(&["inheritanceBehavior"]),
        attribute("TestInitializeAttribute").with_constructor(&[]),
        attribute("TestCleanupAttribute").with_constructor(&[]),
        attribute("ClassCleanupExecutionAttribute")
            .with_constructor(&[])
            .with_constructor(&["cleanupBehavior"]),
        attribute("ParallelizeAttribute").with_constructor(&[]),
        TypeDefinition::class(mstest("UnitTestAssertException"))
            .with_base("System.Exception")
            .with_constructor(&[])
            .with_constructor(&["msg"]),
        TypeDefinition::class(mstest("AssertFailedException"))
            .with_base(mstest("UnitTestAssertException"))
            .with_constructor(&[])
            .with_constructor(&["msg"]),
        TypeDefinition::class(mstest("AssertInconclusiveException"))
            .with_base(mstest("UnitTestAssertException"))
            .with_constructor(&[])
            .with_constructor(&["msg"]),
    ]
}

/// The xUnit surface the rewrites target.
pub fn xunit_types() -> Vec<TypeDefinition> {
    let attribute = |name: &str| TypeDefinition::class(xunit(name)).with_base("System.Attribute");
    vec![
        TypeDefinition::class(xunit("Assert")),
        attribute("FactAttribute").with_constructor(&[]),
        TypeDefinition::class(xunit("TheoryAttribute"))
            .with_base(xunit("FactAttribute"))
            .with_constructor(&[]),
        attribute("InlineDataAttribute").with_constructor(&["data"]),
        attribute("MemberDataAttribute").with_constructor(&["memberName", "parameters"]),
    ]
}

// ============================================================================
// Unit
// ============================================================================

/// Builds a [`Compilation`] document by document.
#[derive(Debug)]
pub struct UnitBuilder {
    definitions: Vec<TypeDefinition>,
    documents: Vec<(String, Node)>,
}

impl Default for UnitBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl UnitBuilder {
    /// A unit referencing the platform, MSTest and xUnit.
    pub fn new() -> Self {
        let mut definitions = platform_types();
        definitions.extend(mstest_types());
        definitions.extend(xunit_types());
        UnitBuilder {
            definitions,
            documents: Vec::new(),
        }
    }

    /// A unit that does not reference xUnit (yet).
    pub fn without_xunit() -> Self {
        let mut definitions = platform_types();
        definitions.extend(mstest_types());
        UnitBuilder {
            definitions,
            documents: Vec::new(),
        }
    }

    /// Add a type of the unit itself (a user attribute, an exception...).
    pub fn define(&mut self, definition: TypeDefinition) -> &mut Self {
        self.definitions.push(definition);
        self
    }

    pub fn document(&mut self, path: &str, build: impl FnOnce(&mut DocumentBuilder)) -> &mut Self {
        let mut document = DocumentBuilder {
            generator: SyntaxGenerator::default(),
            members: Vec::new(),
        };
        build(&mut document);
        let root = document.generator.compilation_unit(document.members);
        self.documents.push((path.to_string(), root));
        self
    }

    /// Bind every document against the unit's metadata.
    ///
    /// Builders never produce duplicate ids or type names; a broken
    /// document or definition is logged and left out.
    pub fn build(&self) -> Compilation {
        let mut metadata = MetadataTable::new();
        for definition in &self.definitions {
            if let Err(error) = metadata.add(definition.clone()) {
                warn!(%error, "skipping type definition");
            }
        }
        let mut compilation = Compilation::new(metadata);
        for (path, root) in &self.documents {
            match SyntaxTree::new(root.clone()) {
                Ok(tree) => {
                    compilation.add_source(path.clone(), tree);
                }
                Err(error) => warn!(%error, path = %path, "skipping document"),
            }
        }
        compilation
    }
}

// ============================================================================
// Documents and types
// ============================================================================

pub struct DocumentBuilder {
    generator: SyntaxGenerator,
    members: Vec<Node>,
}

impl DocumentBuilder {
    pub fn generator(&mut self) -> &mut SyntaxGenerator {
        &mut self.generator
    }

    pub fn using(&mut self, namespace: &str) -> &mut Self {
        let node = self.generator.using_directive(namespace);
        self.members.push(node);
        self
    }

    pub fn using_mstest(&mut self) -> &mut Self {
        self.using(MSTEST_NAMESPACE)
    }

    pub fn using_xunit(&mut self) -> &mut Self {
        self.using(XUNIT_NAMESPACE)
    }

    pub fn using_alias(&mut self, alias: &str, target: &str) -> &mut Self {
        let node = self.generator.using_alias(alias, target);
        self.members.push(node);
        self
    }

    /// `[assembly: Name(args)]`.
    pub fn assembly_attribute(&mut self, attribute: &str) -> NodeId {
        let attribute = parse_attribute(&mut self.generator, attribute);
        let id = attribute.id;
        let mut list = self.generator.attribute_list(vec![attribute]);
        if let NodeKind::AttributeList { target, .. } = &mut list.kind {
            *target = Some("assembly".to_string());
        }
        self.members.push(list);
        id
    }

    /// `public class Name` with the given attributes.
    pub fn class(&mut self, name: &str, attributes: &[&str], build: impl FnOnce(&mut ClassBuilder)) -> NodeId {
        self.class_with_bases(name, attributes, &[], build)
    }

    pub fn class_with_bases(
        &mut self,
        name: &str,
        attributes: &[&str],
        bases: &[&str],
        build: impl FnOnce(&mut ClassBuilder),
    ) -> NodeId {
        let class = build_class(&mut self.generator, name, attributes, bases, build);
        let id = class.id;
        self.members.push(class);
        id
    }

    /// `namespace Name { ... }` holding the classes built by `build`.
    pub fn namespace(&mut self, name: &str, build: impl FnOnce(&mut DocumentBuilder)) -> NodeId {
        let mut inner = DocumentBuilder {
            generator: self.generator.clone(),
            members: Vec::new(),
        };
        build(&mut inner);
        self.generator = inner.generator;
        let namespace = self.generator.namespace(name, inner.members);
        let id = namespace.id;
        self.members.push(namespace);
        id
    }

    /// Top-level statements.
    pub fn statements(&mut self, build: impl FnOnce(&mut BlockBuilder)) -> &mut Self {
        let mut block = BlockBuilder {
            generator: &mut self.generator,
            statements: Vec::new(),
        };
        build(&mut block);
        let statements = block.statements;
        self.members.extend(statements);
        self
    }

    pub fn push(&mut self, node: Node) -> &mut Self {
        self.members.push(node);
        self
    }
}

fn build_class(
    generator: &mut SyntaxGenerator,
    name: &str,
    attributes: &[&str],
    bases: &[&str],
    build: impl FnOnce(&mut ClassBuilder),
) -> Node {
    let attribute_lists = attribute_lists(generator, attributes);
    let base_types: Vec<Node> = bases.iter().map(|b| generator.qualified_name(b)).collect();
    let mut class = ClassBuilder {
        generator: &mut *generator,
        name: name.to_string(),
        members: Vec::new(),
    };
    build(&mut class);
    let members = class.members;
    let mut node = generator.class_declaration(name, attribute_lists, members);
    if let NodeKind::TypeDeclaration {
        modifiers,
        base_types: bases,
        ..
    } = &mut node.kind
    {
        *modifiers = vec!["public".to_string()];
        *bases = base_types;
    }
    node
}

pub struct ClassBuilder<'g> {
    generator: &'g mut SyntaxGenerator,
    name: String,
    members: Vec<Node>,
}

impl ClassBuilder<'_> {
    pub fn generator(&mut self) -> &mut SyntaxGenerator {
        &mut *self.generator
    }

    /// `public void Name() { ... }` on one line.
    pub fn method(
        &mut self,
        name: &str,
        attributes: &[&str],
        body: impl FnOnce(&mut BlockBuilder),
    ) -> MethodHandle<'_> {
        self.method_with_layout(name, attributes, BlockLayout::Inline, body)
    }

    /// Like [`method`](Self::method), with the braces on their own lines.
    pub fn indented_method(
        &mut self,
        name: &str,
        attributes: &[&str],
        body: impl FnOnce(&mut BlockBuilder),
    ) -> MethodHandle<'_> {
        self.method_with_layout(name, attributes, BlockLayout::Indented, body)
    }

    fn method_with_layout(
        &mut self,
        name: &str,
        attributes: &[&str],
        layout: BlockLayout,
        body: impl FnOnce(&mut BlockBuilder),
    ) -> MethodHandle<'_> {
        let lists = attribute_lists(self.generator, attributes);
        let mut block = BlockBuilder {
            generator: &mut *self.generator,
            statements: Vec::new(),
        };
        body(&mut block);
        let statements = block.statements;
        let body = self.generator.block(statements, layout);
        let return_type = self.generator.opaque("void");
        let method = self.generator.method_declaration(
            lists,
            &["public"],
            return_type,
            name,
            Vec::new(),
            Some(body),
            None,
        );
        self.push_member(method)
    }

    /// `public void Name() => expression;`
    pub fn expression_method(&mut self, name: &str, attributes: &[&str], expression: &str) -> MethodHandle<'_> {
        let lists = attribute_lists(self.generator, attributes);
        let return_type = self.generator.opaque("void");
        let expression = self.generator.opaque(expression);
        let method = self.generator.method_declaration(
            lists,
            &["public"],
            return_type,
            name,
            Vec::new(),
            None,
            Some(expression),
        );
        self.push_member(method)
    }

    /// `public TypeName() { ... }`
    pub fn constructor(&mut self, body: impl FnOnce(&mut BlockBuilder)) -> MethodHandle<'_> {
        let mut block = BlockBuilder {
            generator: &mut *self.generator,
            statements: Vec::new(),
        };
        body(&mut block);
        let statements = block.statements;
        let body = self.generator.block(statements, BlockLayout::Inline);
        let name = self.name.clone();
        let constructor = self
            .generator
            .constructor_declaration(Vec::new(), &["public"], name, body);
        self.push_member(constructor)
    }

    /// A nested `public class`.
    pub fn class(&mut self, name: &str, attributes: &[&str], build: impl FnOnce(&mut ClassBuilder)) -> NodeId {
        let class = build_class(self.generator, name, attributes, &[], build);
        self.push_member(class).id()
    }

    fn push_member(&mut self, node: Node) -> MethodHandle<'_> {
        self.members.push(node);
        let index = self.members.len() - 1;
        MethodHandle {
            node: &mut self.members[index],
            generator: &mut *self.generator,
        }
    }
}

/// Adjusts a member just added to a class.
pub struct MethodHandle<'a> {
    node: &'a mut Node,
    generator: &'a mut SyntaxGenerator,
}

impl MethodHandle<'_> {
    pub fn id(&self) -> NodeId {
        self.node.id
    }

    /// Add a `//` comment line above the member.
    pub fn comment(self, text: &str) -> Self {
        self.node.leading.push(Trivia::Comment(text.to_string()));
        self
    }

    /// Replace the parameter list; each entry is `Type name`.
    pub fn parameters(self, parameters: &[&str]) -> Self {
        let nodes = parameters
            .iter()
            .map(|text| parse_parameter(self.generator, text))
            .collect();
        if let NodeKind::MethodDeclaration { parameters: p, .. }
        | NodeKind::ConstructorDeclaration { parameters: p, .. } = &mut self.node.kind
        {
            *p = nodes;
        }
        self
    }

    pub fn modifiers(self, modifiers: &[&str]) -> Self {
        if let NodeKind::MethodDeclaration { modifiers: m, .. }
        | NodeKind::ConstructorDeclaration { modifiers: m, .. } = &mut self.node.kind
        {
            *m = modifiers.iter().map(|s| s.to_string()).collect();
        }
        self
    }

    /// Leading trivia of the first attribute list.
    pub fn comment_on_attributes(self, text: &str) -> Self {
        if let NodeKind::MethodDeclaration {
            attribute_lists, ..
        } = &mut self.node.kind
        {
            if let Some(first) = attribute_lists.first_mut() {
                first.leading.push(Trivia::Comment(text.to_string()));
            }
        }
        self
    }
}

// ============================================================================
// Statements
// ============================================================================

pub struct BlockBuilder<'g> {
    generator: &'g mut SyntaxGenerator,
    statements: Vec<Node>,
}

impl BlockBuilder<'_> {
    pub fn generator(&mut self) -> &mut SyntaxGenerator {
        &mut *self.generator
    }

    /// `Receiver.Method(args);`, returning the invocation's id.
    pub fn call(&mut self, receiver: &str, method: &str, arguments: &[&str]) -> NodeId {
        let invocation = self.invocation(receiver, method, &[], arguments);
        self.expression(invocation)
    }

    /// `Receiver.Method<T..>(args);`
    pub fn generic_call(
        &mut self,
        receiver: &str,
        method: &str,
        type_arguments: &[&str],
        arguments: &[&str],
    ) -> NodeId {
        let invocation = self.invocation(receiver, method, type_arguments, arguments);
        self.expression(invocation)
    }

    /// Build an invocation without adding it.
    pub fn invocation(
        &mut self,
        receiver: &str,
        method: &str,
        type_arguments: &[&str],
        arguments: &[&str],
    ) -> Node {
        let receiver = self.generator.qualified_name(receiver);
        let name = if type_arguments.is_empty() {
            self.generator.identifier_name(method)
        } else {
            let type_arguments = type_arguments
                .iter()
                .map(|t| self.generator.qualified_name(t))
                .collect();
            self.generator.generic_name(method, type_arguments)
        };
        let callee = self.generator.member_access(receiver, name);
        let arguments = split_top_level(&arguments.join(", "))
            .into_iter()
            .map(|argument| self.argument(argument))
            .collect();
        self.generator.invocation(callee, arguments)
    }

    fn argument(&mut self, text: &str) -> Node {
        match split_named(text, ':') {
            Some((name, expression)) => {
                let expression = self.generator.opaque(expression);
                self.generator.named_argument(name, expression)
            }
            None => {
                let expression = self.generator.opaque(text);
                self.generator.argument(expression)
            }
        }
    }

    /// Add `expression;`, returning the expression's id.
    pub fn expression(&mut self, expression: Node) -> NodeId {
        let id = expression.id;
        let statement = self.generator.expression_statement(expression);
        self.statements.push(statement);
        id
    }

    /// `throw new Type(args);`, returning the statement's id.
    pub fn throw_new(&mut self, type_name: &str, arguments: &[&str]) -> NodeId {
        let type_name = self.generator.qualified_name(type_name);
        let arguments = split_top_level(&arguments.join(", "))
            .into_iter()
            .map(|argument| self.argument(argument))
            .collect();
        let creation = self.generator.object_creation(type_name, arguments);
        let statement = self.generator.throw_statement(Some(creation));
        let id = statement.id;
        self.statements.push(statement);
        id
    }

    /// `throw;`
    pub fn rethrow(&mut self) -> NodeId {
        let statement = self.generator.throw_statement(None);
        let id = statement.id;
        self.statements.push(statement);
        id
    }

    /// A statement kept as text, terminator included.
    pub fn raw(&mut self, text: &str) -> NodeId {
        let statement = self.generator.opaque(text);
        let id = statement.id;
        self.statements.push(statement);
        id
    }

    pub fn push(&mut self, statement: Node) -> NodeId {
        let id = statement.id;
        self.statements.push(statement);
        id
    }
}

// ============================================================================
// Attribute strings
// ============================================================================

/// One list per string; `"A, B(1)"` is a single list of two attributes.
fn attribute_lists(generator: &mut SyntaxGenerator, attributes: &[&str]) -> Vec<Node> {
    attributes
        .iter()
        .map(|text| {
            let attributes = split_top_level(text)
                .into_iter()
                .map(|attribute| parse_attribute(generator, attribute))
                .collect();
            generator.attribute_list(attributes)
        })
        .collect()
}

/// `Type name`
fn parse_parameter(generator: &mut SyntaxGenerator, text: &str) -> Node {
    let text = text.trim();
    let (type_name, identifier) = text.rsplit_once(' ').unwrap_or(("object", text));
    let type_name = generator.opaque(type_name.trim());
    generator.parameter(type_name, identifier)
}

/// `Name`, `Name()` or `Name(arg, Prop = value)`.
fn parse_attribute(generator: &mut SyntaxGenerator, text: &str) -> Node {
    let text = text.trim();
    let (name, arguments) = match text.split_once('(') {
        Some((name, rest)) => {
            let inner = rest.strip_suffix(')').unwrap_or(rest);
            let arguments = split_top_level(inner)
                .into_iter()
                .map(|argument| attribute_argument(generator, argument))
                .collect();
            (name.trim(), Some(arguments))
        }
        None => (text, None),
    };
    let name = generator.qualified_name(name);
    generator.attribute(name, arguments)
}

fn attribute_argument(generator: &mut SyntaxGenerator, text: &str) -> Node {
    if let Some((name, expression)) = split_named(text, '=') {
        let expression = generator.opaque(expression);
        return generator.attribute_argument(Some(ArgumentName::Equals(name.to_string())), expression);
    }
    if let Some((name, expression)) = split_named(text, ':') {
        let expression = generator.opaque(expression);
        return generator.attribute_argument(Some(ArgumentName::Colon(name.to_string())), expression);
    }
    let expression = generator.opaque(text);
    generator.attribute_argument(None, expression)
}

/// `ident <sep> rest`, where the separator is not part of `==` or `::`.
fn split_named(text: &str, separator: char) -> Option<(&str, &str)> {
    let (name, rest) = text.split_once(separator)?;
    let name = name.trim();
    if name.is_empty()
        || !name.chars().all(|c| c.is_alphanumeric() || c == '_')
        || rest.starts_with(separator)
    {
        return None;
    }
    Some((name, rest.trim()))
}

/// Split on commas outside quotes and brackets; empty input yields nothing.
fn split_top_level(text: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut escaped = false;
    let mut start = 0;
    for (i, c) in text.char_indices() {
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '"' | '\'' => quote = Some(c),
            '(' | '[' | '{' => depth += 1,
            ')' | ']' | '}' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                parts.push(text[start..i].trim());
                start = i + 1;
            }
            _ => {}
        }
    }
    let last = text[start..].trim();
    if !last.is_empty() || !parts.is_empty() {
        parts.push(last);
    }
    parts
}
