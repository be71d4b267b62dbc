//! Rendering context for the AsciiDoc renderer.

use super::strategy::RenderStrategy;
use mdadoc_core::ListKind;

/// A container the renderer is currently inside.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) enum Scope {
    /// A list item of the given kind.
    List(ListKind),
    /// A quote block.
    Quote,
    /// An admonition's example block.
    Admonition,
}

/// Tracks nesting while blocks are rendered.
pub(super) struct Context<'a> {
    pub strategy: &'a RenderStrategy,
    stack: Vec<Scope>,
}

impl<'a> Context<'a> {
    pub fn new(strategy: &'a RenderStrategy) -> Self {
        Self {
            strategy,
            stack: Vec::new(),
        }
    }

    /// Enters a new scope by pushing it onto the stack.
    pub fn enter(&mut self, scope: Scope) {
        self.stack.push(scope);
    }

    /// Exits the current scope by popping from the stack.
    pub fn exit(&mut self) -> Option<Scope> {
        self.stack.pop()
    }

    /// Returns true when rendering inside any container.
    pub fn is_nested(&self) -> bool {
        !self.stack.is_empty()
    }

    /// Number of enclosing lists with the same marker style as `kind`.
    pub fn list_depth(&self, kind: ListKind) -> usize {
        let ordered = matches!(kind, ListKind::Ordered { .. });
        self.stack
            .iter()
            .filter(|scope| match scope {
                Scope::List(ListKind::Ordered { .. }) => ordered,
                Scope::List(ListKind::Unordered) => !ordered,
                _ => false,
            })
            .count()
    }

    /// Number of enclosing scopes equal to `scope`.
    pub fn depth_of(&self, scope: Scope) -> usize {
        self.stack.iter().filter(|&&entry| entry == scope).count()
    }
}
