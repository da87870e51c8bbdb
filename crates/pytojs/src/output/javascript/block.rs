//! Block emission and declaration hoisting.
//!
//! A block is emitted in two phases. First every statement is translated
//! with a fresh scope open, so assignments can register the names they
//! bind. Then the scope is closed and the block is laid out from the
//! collected pieces: optional prelude, one `var` line for the registered
//! names (omitted when there are none), the statements, optional epilogue.

use super::EmitContext;
use crate::ast::Stmt;
use crate::error::CodegenError;
use tracing::debug;

/// Nesting charged for entering a block, on top of the node that owns it.
/// A block level costs several stack frames more than an expression level.
pub(super) const BLOCK_WEIGHT: usize = 4;

/// Collected contents of a block, ready to be laid out.
#[derive(Debug, Default)]
pub(super) struct BlockBody {
    pub declared: Vec<String>,
    pub prelude: Option<String>,
    pub statements: Vec<String>,
    pub epilogue: Option<String>,
}

/// Extra lines injected around a block's statements.
#[derive(Debug, Default)]
pub(super) struct BlockFrame {
    /// Placed before the declaration line.
    pub prelude: Option<String>,
    /// Placed after the last statement.
    pub epilogue: Option<String>,
}

impl BlockFrame {
    pub fn prelude(line: String) -> Self {
        Self {
            prelude: Some(line),
            epilogue: None,
        }
    }

    pub fn epilogue(line: String) -> Self {
        Self {
            prelude: None,
            epilogue: Some(line),
        }
    }
}

impl BlockBody {
    pub fn new(declared: Vec<String>, statements: Vec<String>) -> Self {
        Self {
            declared,
            statements,
            ..Self::default()
        }
    }

    fn declaration(&self) -> Option<String> {
        if self.declared.is_empty() {
            None
        } else {
            Some(format!("var {};", self.declared.join(", ")))
        }
    }

    /// Write one line per piece, each prefixed with `indentation`.
    ///
    /// Statement texts carry their own indentation after the first line.
    fn write_lines(&self, out: &mut String, indentation: &str) {
        let declaration = self.declaration();
        let lines = self
            .prelude
            .iter()
            .chain(declaration.iter())
            .chain(self.statements.iter())
            .chain(self.epilogue.iter());
        for line in lines {
            out.push_str(indentation);
            out.push_str(line);
            out.push('\n');
        }
    }
}

impl EmitContext<'_> {
    /// Translate `body` in order, one text per statement, at the current
    /// indentation depth.
    pub(super) fn statements(
        &mut self,
        field: &'static str,
        body: &[Stmt],
    ) -> Result<Vec<String>, CodegenError> {
        body.iter()
            .enumerate()
            .map(|(i, stmt)| self.descend((field, i), |cx| cx.stmt(stmt)))
            .collect()
    }

    /// Emit `body` as a braced block one level deeper than the current
    /// statement, under a new scope named `scope`.
    ///
    /// The returned text starts at `{` and ends at the closing `}`, which is
    /// indented to the current depth.
    pub(super) fn emit_block(
        &mut self,
        scope: impl Into<String>,
        field: &'static str,
        body: &[Stmt],
        frame: BlockFrame,
    ) -> Result<String, CodegenError> {
        self.scopes.push(scope);
        self.nesting += BLOCK_WEIGHT;
        let statements = self.indented(|cx| cx.statements(field, body));
        self.nesting -= BLOCK_WEIGHT;
        let closed = self.scopes.pop();
        let statements = statements?;

        let declared = match closed {
            Some(scope) => {
                debug!(scope = scope.id(), declared = ?scope.declared(), "hoisting block declarations");
                scope.into_declared()
            }
            None => Vec::new(),
        };
        let block = BlockBody {
            declared,
            prelude: frame.prelude,
            statements,
            epilogue: frame.epilogue,
        };
        Ok(self.render_braced(&block))
    }

    /// Lay out `block` between braces, its lines one level deeper than the
    /// current depth.
    pub(super) fn render_braced(&self, block: &BlockBody) -> String {
        let mut out = String::from("{\n");
        block.write_lines(&mut out, &self.indentation(self.indent + 1));
        out.push_str(&self.indentation(self.indent));
        out.push('}');
        out
    }

    /// Lay out `block` without braces at the current depth.
    pub(super) fn render_bare(&self, block: &BlockBody) -> String {
        let mut out = String::new();
        block.write_lines(&mut out, &self.indentation(self.indent));
        out
    }
}

#[cfg(test)]
mod tests {
    use crate::ast::{BinOperator, Expr, Module, Stmt};
    use crate::output::JavaScriptWriter;

    fn emit(body: Vec<Stmt>) -> String {
        JavaScriptWriter::emit(&Module::new(body)).unwrap()
    }

    #[test]
    fn test_no_declaration_without_assignments() {
        let js = emit(vec![Stmt::while_loop(
            Expr::name("running"),
            vec![Stmt::expr(Expr::call(Expr::name("tick"), vec![]))],
        )]);
        assert_eq!(js, "while (running) {\n  tick();\n}\n");
    }

    #[test]
    fn test_declarations_in_first_seen_order() {
        let js = emit(vec![Stmt::function_def(
            "f",
            Default::default(),
            vec![
                Stmt::assign(Expr::name("b"), Expr::int(1)),
                Stmt::assign(Expr::name("a"), Expr::int(2)),
                Stmt::assign(Expr::name("b"), Expr::int(3)),
            ],
        )]);
        assert_eq!(
            js,
            "function f() {\n  var b, a;\n  b = 1;\n  a = 2;\n  b = 3;\n}\n"
        );
    }

    #[test]
    fn test_inner_names_do_not_leak() {
        let js = emit(vec![
            Stmt::assign(Expr::name("total"), Expr::int(0)),
            Stmt::for_loop(
                Expr::name("n"),
                Expr::name("items"),
                vec![
                    Stmt::assign(
                        Expr::name("sq"),
                        Expr::binary(Expr::name("n"), BinOperator::Mult, Expr::name("n")),
                    ),
                    Stmt::aug_assign(Expr::name("total"), BinOperator::Add, Expr::name("sq")),
                ],
            ),
        ]);
        assert_eq!(
            js,
            "var total;\n\
             total = 0;\n\
             for (var n of items) {\n  var sq;\n  sq = (n * n);\n  total += sq;\n}\n"
        );
    }

    #[test]
    fn test_nested_blocks_indent() {
        let js = emit(vec![Stmt::if_stmt(
            Expr::name("a"),
            vec![Stmt::if_stmt(
                Expr::name("b"),
                vec![Stmt::assign(Expr::name("c"), Expr::int(1))],
                vec![],
            )],
            vec![],
        )]);
        assert_eq!(
            js,
            "if (a) {\n  if (b) {\n    var c;\n    c = 1;\n  }\n}\n"
        );
    }
}
