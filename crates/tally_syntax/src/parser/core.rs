/// Builder core: state machine and begin/end operations.
///
/// This chunk defines the [`TreeBuilder`] type, its customization methods, and the
/// begin/end-node stack discipline.
///
/// ## Notes
/// - A node is attached to its parent when it is *closed*, not when it is opened.
///   Sibling begin/end pairs are sequential, so child order still equals parse order,
///   and every node has exactly one owner at all times (the stack while open, the
///   parent afterwards).
/// - This file is `include!`'d into `crate::parser`.

/// Ceiling on concurrently open nodes. Deeper input is rejected rather than risking
/// call-stack exhaustion in the scanner and the passes.
pub const MAX_NESTING_DEPTH: usize = 512;

/// Stateful tree builder the scanning driver calls into.
///
/// One builder performs one parse: customization (`with_fragments`, `with_factory`,
/// `with_tracking`) must happen before [`TreeBuilder::parse`] consumes the builder.
pub struct TreeBuilder {
    fragments: FragmentTable,
    factories: NodeFactories,
    /// Currently open nodes, innermost last.
    stack: Vec<Node>,
    /// The synthetic root once it has been closed.
    root: Option<Node>,
    track: bool,
}

impl TreeBuilder {
    /// Create a builder seeded with `fragments` and the default factory table.
    pub fn new(fragments: Vec<Fragment>) -> Self {
        Self {
            fragments: FragmentTable::new(fragments),
            factories: NodeFactories::default(),
            stack: Vec::new(),
            root: None,
            track: false,
        }
    }

    /// Register additional fragments (later names win).
    pub fn with_fragments(mut self, fragments: Vec<Fragment>) -> Self {
        for fragment in fragments {
            self.fragments.add(fragment);
        }
        self
    }

    /// Override the factory for one node kind. Only this builder's table is touched;
    /// the shared default table is never mutated.
    pub fn with_factory(mut self, kind: NodeKind, constructor: NodeConstructor) -> Self {
        self.factories.register(kind, constructor);
        self
    }

    /// Request source-position and whitespace tracking.
    pub fn with_tracking(mut self, track: bool) -> Self {
        self.track = track;
        self
    }

    /// Look up a fragment by name. Absence is reported to the caller (the driver), not
    /// treated as a parse failure here.
    pub fn fragment(&self, name: &str) -> Option<Arc<Fragment>> {
        self.fragments.get(name)
    }

    /// Open a node of `kind` with the given raw value, stamped with `start` when
    /// tracking. The constructor is the per-call override if given, else this
    /// builder's registered factory for `kind`.
    ///
    /// The first call of a parse synthesizes the implicit grouping root so begin/end
    /// always have a receiver.
    pub fn begin_node(
        &mut self,
        kind: NodeKind,
        start: usize,
        raw_value: impl Into<String>,
        factory: Option<NodeConstructor>,
    ) -> Result<(), ParseError> {
        if self.stack.len() >= MAX_NESTING_DEPTH {
            return Err(ParseError::NestingTooDeep {
                limit: MAX_NESTING_DEPTH,
            });
        }
        let raw_value = raw_value.into();
        let mut node = match factory {
            Some(constructor) => constructor(kind, raw_value),
            None => self.factories.create(kind, raw_value)?,
        };
        if self.track {
            node.set_start(start);
        }

        if let Some(open) = self.stack.last() {
            if !open.kind.is_composite() {
                return Err(ParseError::UnbalancedNesting {
                    message: format!("cannot open a {} node inside leaf node {}", kind, open.kind),
                });
            }
        } else {
            if self.root.is_some() {
                return Err(ParseError::UnbalancedNesting {
                    message: format!("begin of {} after the root was already closed", kind),
                });
            }
            let mut root = self.factories.create(NodeKind::Grouping, String::new())?;
            if self.track {
                root.set_start(start);
            }
            self.stack.push(root);
        }
        self.stack.push(node);
        Ok(())
    }

    /// Close the innermost open node, stamping `end` when tracking, and attach it to
    /// its parent (or record it as the root).
    ///
    /// `kind` must match the node being closed; a mismatch means the driver's begin and
    /// end calls went out of step and fails loudly instead of being tolerated.
    pub fn end_node(&mut self, kind: NodeKind, end: usize) -> Result<(), ParseError> {
        let Some(mut node) = self.stack.pop() else {
            return Err(ParseError::UnbalancedNesting {
                message: format!("end of {} with no node open", kind),
            });
        };
        if node.kind != kind {
            return Err(ParseError::KindMismatch {
                expected: kind,
                found: node.kind,
            });
        }
        if self.track {
            node.set_end(end);
        }
        match self.stack.last_mut() {
            Some(parent) => parent.add_child(node),
            None => self.root = Some(node),
        }
        Ok(())
    }

    /// Finish the parse after the driver has returned: close the synthetic root if the
    /// driver left it open, and hand the raw tree out.
    fn finish(&mut self, end: usize) -> Result<Node, ParseError> {
        if self.stack.len() > 1 {
            return Err(ParseError::UnbalancedNesting {
                message: format!("{} node(s) left open when input ended", self.stack.len() - 1),
            });
        }
        if let Some(mut root) = self.stack.pop() {
            if self.track {
                root.set_end(end);
            }
            self.root = Some(root);
        }
        self.root.take().ok_or(ParseError::EmptyExpression)
    }

    /// Run a full parse with this builder: drive the scanner over `expression`, attach
    /// whitespace when tracking, then apply modifier propagation and operator
    /// regrouping.
    pub fn parse(mut self, expression: &str) -> Result<Node, ParseError> {
        let track = self.track;
        let whitespace = scanner::scan(expression, &mut self, track)?;
        let mut root = self.finish(expression.len())?;
        if track {
            ast::attach_whitespace(&mut root, whitespace);
        }
        let root = passes::modifiers::propagate(root)?;
        passes::operators::regroup(root)
    }
}
