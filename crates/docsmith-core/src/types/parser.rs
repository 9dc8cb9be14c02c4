//! Type list parser
//!
//! Grammar:
//!
//! ```text
//! type_list  := type (',' type)*
//! type       := token ('<' type_list '>' | '<(' type_list ')>' | '{' type_list '=>' type_list '}')?
//! token      := any run of characters other than < > ( ) { } = ,
//! ```
//!
//! The input is scanned once, left to right, with an explicit stack of open
//! structural contexts.

use crate::registry::Registry;
use crate::slug::slugify_path;

use super::{is_literal_name, is_method_reference_name, ParseError, TypeNode, TypeNodeKind};

/// Parse a type list without resolving names against a registry
pub fn parse_types(input: &str) -> Result<Vec<TypeNode>, ParseError> {
    TypeParser::new().parse(input)
}

/// Parser for type lists, optionally resolving names against a registry
#[derive(Debug, Clone)]
pub struct TypeParser<'r> {
    registry: Option<&'r Registry>,
    base_path: String,
}

impl Default for TypeParser<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'r> TypeParser<'r> {
    /// Create a parser that leaves every node unresolved
    pub fn new() -> Self {
        Self {
            registry: None,
            base_path: "/".to_string(),
        }
    }

    /// Create a parser that resolves class and module names against `registry`
    pub fn with_registry(registry: &'r Registry) -> Self {
        Self {
            registry: Some(registry),
            ..Self::new()
        }
    }

    /// Set the prefix of resolved paths (default `/`)
    #[must_use]
    pub fn base_path(mut self, base_path: impl Into<String>) -> Self {
        self.base_path = base_path.into();
        self
    }

    /// Parse a type list.
    ///
    /// Empty or whitespace-only input yields an empty list.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] naming the offending character and its
    /// offset if the input is not a well-formed type list. No partial
    /// result is produced.
    pub fn parse(&self, input: &str) -> Result<Vec<TypeNode>, ParseError> {
        if input.trim().is_empty() {
            return Ok(Vec::new());
        }
        let result = Scanner::new(self, input).run();
        if let Err(err) = &result {
            tracing::trace!(input, %err, "rejected type list");
        }
        result
    }

    fn resolve(&self, name: &str) -> Option<String> {
        if is_literal_name(name) || is_method_reference_name(name) {
            return None;
        }
        let entity = self.registry?.find_definition(name)?;
        Some(format!(
            "{}{}",
            self.base_path,
            slugify_path(&entity.qualified_path())
        ))
    }

    fn leaf(&self, name: &str) -> TypeNode {
        TypeNode::basic(name).with_path(self.resolve(name))
    }
}

/// What an open context is collecting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Frame {
    Root,
    Parameterized { ordered: bool },
    Keys,
    Values,
}

#[derive(Debug)]
struct Context {
    frame: Frame,
    name: String,
    items: Vec<TypeNode>,
    keys: Vec<TypeNode>,
}

impl Context {
    fn new(frame: Frame, name: String) -> Self {
        Self {
            frame,
            name,
            items: Vec::new(),
            keys: Vec::new(),
        }
    }
}

/// A composite whose terminator has been consumed. It becomes a finished
/// node at the next separator, terminator or end of input.
#[derive(Debug)]
struct Closed {
    name: String,
    kind: TypeNodeKind,
}

struct Scanner<'p, 'r> {
    parser: &'p TypeParser<'r>,
    chars: Vec<char>,
    pos: usize,
    stack: Vec<Context>,
    buffer: String,
    closed: Option<Closed>,
}

impl<'p, 'r> Scanner<'p, 'r> {
    fn new(parser: &'p TypeParser<'r>, input: &str) -> Self {
        Self {
            parser,
            chars: input.chars().collect(),
            pos: 0,
            stack: vec![Context::new(Frame::Root, String::new())],
            buffer: String::new(),
            closed: None,
        }
    }

    fn run(mut self) -> Result<Vec<TypeNode>, ParseError> {
        while let Some(&c) = self.chars.get(self.pos) {
            match c {
                '<' => self.open_parameterized()?,
                '>' => self.close_parameterized()?,
                '(' => {
                    return Err(ParseError::misplaced(
                        c,
                        "must start an order-dependent list",
                        self.pos,
                    ))
                }
                ')' => self.close_ordered()?,
                '{' => self.open_key_value()?,
                '}' => self.close_key_value()?,
                '=' => self.separate_keys()?,
                ',' => {
                    self.push_item(c)?;
                    self.pos += 1;
                }
                _ => {
                    self.accumulate(c)?;
                    self.pos += 1;
                }
            }
        }
        self.finish()
    }

    fn top(&self) -> Frame {
        self.stack.last().map_or(Frame::Root, |ctx| ctx.frame)
    }

    fn top_mut(&mut self) -> &mut Context {
        let last = self.stack.len() - 1;
        &mut self.stack[last]
    }

    fn next_is(&self, expected: char) -> bool {
        self.chars.get(self.pos + 1) == Some(&expected)
    }

    fn accumulate(&mut self, c: char) -> Result<(), ParseError> {
        if self.closed.is_some() {
            if c.is_whitespace() {
                return Ok(());
            }
            return Err(ParseError::misplaced(
                c,
                "must be separated from the preceding type by \",\"",
                self.pos,
            ));
        }
        self.buffer.push(c);
        Ok(())
    }

    /// Take the pending token as the name of a structural type
    fn take_name(&mut self, opener: char) -> Result<String, ParseError> {
        let name = self.buffer.trim();
        if self.closed.is_some() || name.is_empty() {
            return Err(ParseError::misplaced(
                opener,
                "must follow a token name",
                self.pos,
            ));
        }
        let name = name.to_string();
        self.buffer.clear();
        Ok(name)
    }

    /// Finish the pending token or closed composite, if there is one
    fn take_node(&mut self) -> Option<TypeNode> {
        if let Some(closed) = self.closed.take() {
            self.buffer.clear();
            return Some(TypeNode {
                resolved_path: self.parser.resolve(&closed.name),
                name: closed.name,
                kind: closed.kind,
            });
        }

        let name = self.buffer.trim();
        if name.is_empty() {
            return None;
        }
        let node = self.parser.leaf(name);
        self.buffer.clear();
        Some(node)
    }

    /// Finish the pending type and append it to the innermost context
    fn push_item(&mut self, delimiter: char) -> Result<(), ParseError> {
        let node = self
            .take_node()
            .ok_or_else(|| ParseError::misplaced(delimiter, "must follow a type name", self.pos))?;
        self.top_mut().items.push(node);
        Ok(())
    }

    fn open_parameterized(&mut self) -> Result<(), ParseError> {
        let name = self.take_name('<')?;
        let ordered = self.next_is('(');
        self.stack
            .push(Context::new(Frame::Parameterized { ordered }, name));
        self.pos += if ordered { 2 } else { 1 };
        Ok(())
    }

    fn close_parameterized(&mut self) -> Result<(), ParseError> {
        if self.top() != (Frame::Parameterized { ordered: false }) {
            return Err(ParseError::misplaced(
                '>',
                "must terminate a parameterized type",
                self.pos,
            ));
        }
        self.push_item('>')?;
        self.close(|ctx| TypeNodeKind::Parameterized {
            items: ctx.items,
            ordered: false,
        });
        self.pos += 1;
        Ok(())
    }

    fn close_ordered(&mut self) -> Result<(), ParseError> {
        if self.top() != (Frame::Parameterized { ordered: true }) || !self.next_is('>') {
            return Err(ParseError::misplaced(
                ')',
                "must terminate an order-dependent list",
                self.pos,
            ));
        }
        self.push_item(')')?;
        self.close(|ctx| TypeNodeKind::Parameterized {
            items: ctx.items,
            ordered: true,
        });
        self.pos += 2;
        Ok(())
    }

    fn open_key_value(&mut self) -> Result<(), ParseError> {
        let name = self.take_name('{')?;
        self.stack.push(Context::new(Frame::Keys, name));
        self.pos += 1;
        Ok(())
    }

    fn separate_keys(&mut self) -> Result<(), ParseError> {
        if self.top() != Frame::Keys || !self.next_is('>') {
            return Err(ParseError::misplaced(
                '=',
                "must separate hash keys and values",
                self.pos,
            ));
        }
        self.push_item('=')?;
        let ctx = self.top_mut();
        ctx.keys = std::mem::take(&mut ctx.items);
        ctx.frame = Frame::Values;
        self.pos += 2;
        Ok(())
    }

    fn close_key_value(&mut self) -> Result<(), ParseError> {
        match self.top() {
            Frame::Keys => Err(ParseError::unterminated("key-value", "=>", self.pos)),
            Frame::Values => {
                self.push_item('}')?;
                self.close(|ctx| TypeNodeKind::KeyValue {
                    keys: ctx.keys,
                    values: ctx.items,
                });
                self.pos += 1;
                Ok(())
            }
            _ => Err(ParseError::misplaced(
                '}',
                "must terminate a key-value type",
                self.pos,
            )),
        }
    }

    /// Pop the innermost context and hold it as a closed composite
    fn close(&mut self, build: impl FnOnce(Context) -> TypeNodeKind) {
        if let Some(ctx) = self.stack.pop() {
            let name = ctx.name.clone();
            self.closed = Some(Closed {
                name,
                kind: build(ctx),
            });
        }
    }

    fn finish(mut self) -> Result<Vec<TypeNode>, ParseError> {
        let end = self.chars.len();
        let (kind, terminator) = match self.top() {
            Frame::Root => ("", ""),
            Frame::Parameterized { ordered: false } => ("parameterized", ">"),
            Frame::Parameterized { ordered: true } => ("parameterized", ")>"),
            Frame::Keys => ("key-value", "=>"),
            Frame::Values => ("key-value", "}"),
        };
        if !kind.is_empty() {
            return Err(ParseError::unterminated(kind, terminator, end));
        }

        match self.take_node() {
            Some(node) => self.top_mut().items.push(node),
            None => {
                return Err(ParseError::new(
                    "type list must not end with \",\"",
                    end,
                ))
            }
        }

        let root = self.stack.pop().map(|ctx| ctx.items).unwrap_or_default();
        Ok(root)
    }
}
