//! Nested block scopes and the names first bound in each.
//!
//! JavaScript needs a declaration for every name a block assigns, but the
//! names are only known once the whole block has been walked. Each open
//! block gets a [`Scope`]; assignments register their targets in the
//! innermost one, and the block reads the final set back when it closes.

/// Names first bound inside one block, in first-seen order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scope {
    id: String,
    declared: Vec<String>,
}

impl Scope {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            declared: Vec::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Register `name`. Returns `false` if it was already registered.
    pub fn declare(&mut self, name: &str) -> bool {
        if self.declared.iter().any(|n| n == name) {
            return false;
        }
        self.declared.push(name.to_string());
        true
    }

    pub fn declared(&self) -> &[String] {
        &self.declared
    }

    pub fn into_declared(self) -> Vec<String> {
        self.declared
    }
}

/// Stack of open scopes. The root scope is created with the stack and is
/// never popped.
#[derive(Debug, Clone)]
pub struct ScopeStack {
    scopes: Vec<Scope>,
}

impl ScopeStack {
    pub const ROOT: &'static str = "root";

    pub fn new() -> Self {
        Self {
            scopes: vec![Scope::new(Self::ROOT)],
        }
    }

    pub fn push(&mut self, id: impl Into<String>) {
        self.scopes.push(Scope::new(id));
    }

    /// Close the innermost scope. Returns `None` when only the root is open.
    pub fn pop(&mut self) -> Option<Scope> {
        if self.scopes.len() > 1 {
            self.scopes.pop()
        } else {
            None
        }
    }

    /// Register `name` in the innermost open scope.
    pub fn declare(&mut self, name: &str) -> bool {
        self.current_mut().declare(name)
    }

    pub fn current(&self) -> &Scope {
        // The root is never popped, so the stack is never empty.
        &self.scopes[self.scopes.len() - 1]
    }

    fn current_mut(&mut self) -> &mut Scope {
        let last = self.scopes.len() - 1;
        &mut self.scopes[last]
    }

    pub fn root(&self) -> &Scope {
        &self.scopes[0]
    }

    /// Number of open scopes, root included.
    pub fn depth(&self) -> usize {
        self.scopes.len()
    }
}

impl Default for ScopeStack {
    fn default() -> Self {
        Self::new()
    }
}
