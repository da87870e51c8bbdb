//! Python syntax trees to JavaScript source text.
//!
//! `pytojs` takes a parsed Python module (the tree the Python `ast` module
//! produces, as typed values or as JSON) and writes equivalent JavaScript.
//! The translation is syntax-directed: each node kind has one rule, and
//! Python semantics JavaScript lacks are delegated to a small runtime
//! contract (see [`runtime`]).
//!
//! # Architecture
//!
//! ```text
//! JSON / builders        Tree             Output
//! ───────────────    ─────────────    ──────────────
//! Module::from_json ─┐
//!                    ├─> Module ──────> JavaScriptWriter ─> String
//! Stmt / Expr ctors ─┘   (ast.rs)       (output/javascript)
//! ```
//!
//! # Example
//!
//! ```
//! use pytojs::{BinOperator, Expr, JavaScriptWriter, Module, Stmt};
//!
//! let module = Module::new(vec![Stmt::assign(
//!     Expr::name("x"),
//!     Expr::binary(Expr::int(1), BinOperator::Add, Expr::int(2)),
//! )]);
//! let js = JavaScriptWriter::emit(&module).unwrap();
//! assert_eq!(js, "var x;\nx = (1 + 2);\n");
//! ```
//!
//! # Declarations
//!
//! Python binds a name by assigning it; JavaScript wants a declaration.
//! Every block collects the names its own statements assign and opens with
//! a single `var` line listing them in first-seen order. Names assigned in
//! a nested block are declared by that block.
//!
//! # Failure
//!
//! Constructs without a translation rule fail with
//! [`CodegenError::UnsupportedConstruct`] naming the node kind and its
//! [`NodePath`]. Partial output is never returned.

pub mod ast;
pub mod config;
pub mod error;
pub mod output;
pub mod runtime;
pub mod scope;
pub mod traits;

// Re-exports: tree types
pub use ast::{
    Arg, Arguments, BinOperator, BoolOperator, CmpOperator, Comprehension, ExceptHandler, Expr,
    Keyword, Literal, Module, Stmt, UnaryOperator, UnknownNode,
};

// Re-exports: configuration and errors
pub use config::{CodegenConfig, ConfigError, KeywordArguments};
pub use error::{CodegenError, NodePath, PathSegment, ReadError};

// Re-exports: writers
pub use output::{JAVASCRIPT_WRITER, JavaScriptWriter, JavaScriptWriterImpl};
pub use scope::{Scope, ScopeStack};
pub use traits::Writer;
