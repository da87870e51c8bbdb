//! JavaScript writer for source trees.
//!
//! A single [`EmitContext`] is created per translation request. It owns the
//! indentation depth, the scope stack used for declaration hoisting, and
//! the path to the node being emitted; nothing is shared between requests.
//!
//! Dispatch is an exhaustive `match` over node kinds in [`EmitContext::stmt`]
//! and [`EmitContext::expr`]. Kinds without a translation rule fail with
//! [`CodegenError::UnsupportedConstruct`]; no placeholder text is ever
//! emitted in place of code.

mod block;
mod expr;
mod stmt;

use crate::ast::{Expr, Module, Stmt};
use crate::config::CodegenConfig;
use crate::error::{CodegenError, NodePath, PathSegment};
use crate::scope::ScopeStack;
use crate::traits::Writer;
use block::BlockBody;
use tracing::debug;

/// Static instance of the JavaScript writer, using the default config.
pub static JAVASCRIPT_WRITER: JavaScriptWriterImpl = JavaScriptWriterImpl;

/// JavaScript writer implementing the Writer trait.
pub struct JavaScriptWriterImpl;

impl Writer for JavaScriptWriterImpl {
    fn language(&self) -> &'static str {
        "javascript"
    }

    fn extension(&self) -> &'static str {
        "js"
    }

    fn write(&self, module: &Module) -> Result<String, CodegenError> {
        JavaScriptWriter::emit(module)
    }
}

/// Emits source trees as JavaScript.
#[derive(Debug, Clone, Default)]
pub struct JavaScriptWriter {
    config: CodegenConfig,
}

impl JavaScriptWriter {
    pub fn new(config: CodegenConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CodegenConfig {
        &self.config
    }

    /// Emit a module with the default configuration.
    pub fn emit(module: &Module) -> Result<String, CodegenError> {
        Self::default().write_module(module)
    }

    /// Emit a module. Names assigned at module level are declared on the
    /// first line.
    pub fn write_module(&self, module: &Module) -> Result<String, CodegenError> {
        debug!(statements = module.body.len(), "writing module");
        let mut cx = EmitContext::new(&self.config);
        let statements = cx.statements("body", &module.body)?;
        Ok(cx.render_root(statements))
    }

    /// Emit one top-level statement in its own context, preceded by the
    /// declaration of the names it assigns.
    pub fn write_stmt(&self, stmt: &Stmt) -> Result<String, CodegenError> {
        let mut cx = EmitContext::new(&self.config);
        let text = cx.stmt(stmt)?;
        Ok(cx.render_root(vec![text]))
    }

    /// Emit a single expression.
    pub fn write_expr(&self, expr: &Expr) -> Result<String, CodegenError> {
        EmitContext::new(&self.config).expr(expr)
    }
}

/// Mutable state of one translation request.
pub(crate) struct EmitContext<'c> {
    config: &'c CodegenConfig,
    /// Depth of the statements currently being emitted.
    indent: usize,
    scopes: ScopeStack,
    path: NodePath,
    /// Number of nodes between the root and the current one.
    nesting: usize,
    /// Number of enclosing `except` handler bodies.
    handler_depth: usize,
    /// `try/else` statements seen so far, for unique flag names.
    else_flags: usize,
}

impl<'c> EmitContext<'c> {
    fn new(config: &'c CodegenConfig) -> Self {
        Self {
            config,
            indent: 0,
            scopes: ScopeStack::new(),
            path: NodePath::new(),
            nesting: 0,
            handler_depth: 0,
            else_flags: 0,
        }
    }

    /// Run `f` on a child node reached through `segment`.
    ///
    /// Keeps the node path current for error reporting and enforces the
    /// configured nesting limit.
    fn descend<T>(
        &mut self,
        segment: impl Into<PathSegment>,
        f: impl FnOnce(&mut Self) -> Result<T, CodegenError>,
    ) -> Result<T, CodegenError> {
        let segment = segment.into();
        if let Some(limit) = self.config.max_depth {
            if self.nesting >= limit {
                let mut path = self.path.clone();
                path.push(segment);
                debug!(%path, limit, "nesting limit reached");
                return Err(CodegenError::DepthExceeded { limit, path });
            }
        }
        self.path.push(segment);
        self.nesting += 1;
        let result = f(self);
        self.nesting -= 1;
        self.path.pop();
        result
    }

    fn child_expr(
        &mut self,
        segment: impl Into<PathSegment>,
        expr: &Expr,
    ) -> Result<String, CodegenError> {
        self.descend(segment, |cx| cx.expr(expr))
    }

    /// Run `f` one indentation level deeper.
    fn indented<T>(&mut self, f: impl FnOnce(&mut Self) -> T) -> T {
        self.indent += 1;
        let result = f(self);
        self.indent -= 1;
        result
    }

    fn indentation(&self, depth: usize) -> String {
        self.config.indentation(depth)
    }

    fn unsupported(&self, kind: &str, reason: impl Into<String>) -> CodegenError {
        let reason = reason.into();
        debug!(kind, path = %self.path, %reason, "unsupported construct");
        CodegenError::UnsupportedConstruct {
            kind: kind.to_string(),
            reason,
            path: self.path.clone(),
        }
    }

    fn malformed(&self, kind: &str, reason: impl Into<String>) -> CodegenError {
        let reason = reason.into();
        debug!(kind, path = %self.path, %reason, "malformed node");
        CodegenError::MalformedNode {
            kind: kind.to_string(),
            reason,
            path: self.path.clone(),
        }
    }

    /// Lay out top-level statements under the root scope's declaration.
    fn render_root(&self, statements: Vec<String>) -> String {
        let declared = self.scopes.root().declared().to_vec();
        self.render_bare(&BlockBody::new(declared, statements))
    }
}
