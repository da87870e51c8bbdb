//! Statement translation rules.
//!
//! A statement's text has no indentation on its first line; any further
//! lines (nested blocks, closing braces) carry absolute indentation for the
//! depth they were emitted at. Simple statements end with `;`, compound
//! ones with their closing `}`.

use super::EmitContext;
use super::block::{BLOCK_WEIGHT, BlockBody, BlockFrame};
use super::expr::infix_operator;
use crate::ast::{Arguments, ExceptHandler, Expr, Literal, Stmt};
use crate::error::CodegenError;
use crate::runtime::{self, ERROR_BINDING};
use tracing::trace;

impl EmitContext<'_> {
    /// Translate one statement.
    pub(super) fn stmt(&mut self, stmt: &Stmt) -> Result<String, CodegenError> {
        trace!(kind = stmt.kind(), path = %self.path, "stmt");
        match stmt {
            Stmt::Expr { value } => Ok(format!("{};", self.child_expr("value", value)?)),

            Stmt::Assign { targets, value } => self.assign(targets, value),

            Stmt::AugAssign { target, op, value } => {
                let Some(infix) = infix_operator(*op) else {
                    return Err(self.unsupported(
                        stmt.kind(),
                        format!("augmented `{op:?}` has no infix form"),
                    ));
                };
                let target = self.child_expr("target", target)?;
                let value = self.child_expr("value", value)?;
                Ok(format!("{target} {infix}= {value};"))
            }

            Stmt::If { test, body, orelse } => {
                let test = self.child_expr("test", test)?;
                let body = self.emit_block("if", "body", body, BlockFrame::default())?;
                let mut out = format!("if ({test}) {body}");
                if !orelse.is_empty() {
                    let orelse = self.emit_block("else", "orelse", orelse, BlockFrame::default())?;
                    out.push_str(" else ");
                    out.push_str(&orelse);
                }
                Ok(out)
            }

            Stmt::While { test, body, orelse } => {
                if !orelse.is_empty() {
                    return Err(self.unsupported(stmt.kind(), "loop `else` clause"));
                }
                let test = self.child_expr("test", test)?;
                let body = self.emit_block("while", "body", body, BlockFrame::default())?;
                Ok(format!("while ({test}) {body}"))
            }

            Stmt::For {
                target,
                iter,
                body,
                orelse,
            } => {
                if !orelse.is_empty() {
                    return Err(self.unsupported(stmt.kind(), "loop `else` clause"));
                }
                let target = self.descend("target", |cx| cx.loop_target(target))?;
                let iter = self.child_expr("iter", iter)?;
                let body = self.emit_block("for", "body", body, BlockFrame::default())?;
                Ok(format!("for ({target} of {iter}) {body}"))
            }

            Stmt::Break => Ok("break;".to_string()),

            Stmt::Continue => Ok("continue;".to_string()),

            Stmt::Pass => Ok("// pass".to_string()),

            Stmt::FunctionDef {
                name,
                args,
                body,
                decorator_list,
            } => {
                let (params, body) = self.function_parts(name, args, body, decorator_list)?;
                Ok(format!("function {name}({params}) {body}"))
            }

            Stmt::ClassDef {
                name,
                bases,
                keywords,
                body,
                decorator_list,
            } => {
                if !decorator_list.is_empty() {
                    return Err(self.unsupported(stmt.kind(), "class decorators"));
                }
                if !keywords.is_empty() {
                    return Err(self.unsupported(stmt.kind(), "class keywords such as `metaclass`"));
                }
                self.class_def(name, bases, body)
            }

            Stmt::Return { value } => match value {
                Some(value) => Ok(format!("return {};", self.child_expr("value", value)?)),
                None => Ok("return;".to_string()),
            },

            Stmt::Delete { targets } => {
                if targets.is_empty() {
                    return Err(self.malformed(stmt.kind(), "no targets"));
                }
                let mut rendered = Vec::with_capacity(targets.len());
                for (i, target) in targets.iter().enumerate() {
                    rendered.push(self.child_expr(("targets", i), target)?);
                }
                Ok(format!("delete {};", rendered.join(", ")))
            }

            Stmt::Raise { exc, cause } => {
                if cause.is_some() {
                    return Err(self.unsupported(stmt.kind(), "exception chaining with `from`"));
                }
                match exc {
                    Some(exc) => Ok(format!("throw new {};", self.child_expr("exc", exc)?)),
                    None if self.handler_depth > 0 => Ok(format!("throw {ERROR_BINDING};")),
                    None => Err(self.unsupported(
                        stmt.kind(),
                        "bare `raise` outside of an exception handler",
                    )),
                }
            }

            Stmt::Try {
                body,
                handlers,
                orelse,
                finalbody,
            } => self.try_stmt(body, handlers, orelse, finalbody),

            Stmt::AnnAssign { .. }
            | Stmt::With { .. }
            | Stmt::Import { .. }
            | Stmt::ImportFrom { .. }
            | Stmt::Global { .. }
            | Stmt::Nonlocal { .. }
            | Stmt::Assert { .. } => {
                Err(self.unsupported(stmt.kind(), "no translation rule for this statement"))
            }

            Stmt::Unrecognized(_) => Err(self.unsupported(stmt.kind(), "unknown statement kind")),
        }
    }

    /// `t0 = t1 = ... = value`, registering every bound name.
    fn assign(&mut self, targets: &[Expr], value: &Expr) -> Result<String, CodegenError> {
        if targets.is_empty() {
            return Err(self.malformed("Assign", "no targets"));
        }
        let mut parts = Vec::with_capacity(targets.len() + 1);
        for (i, target) in targets.iter().enumerate() {
            parts.push(self.descend(("targets", i), |cx| {
                cx.bind_target(target)?;
                cx.expr(target)
            })?);
        }
        parts.push(self.child_expr("value", value)?);
        Ok(format!("{};", parts.join(" = ")))
    }

    /// Register the names `target` binds in the innermost scope. Tuple and
    /// list targets become array destructuring, so each element binds.
    fn bind_target(&mut self, target: &Expr) -> Result<(), CodegenError> {
        match target {
            Expr::Name { id } => {
                self.scopes.declare(id);
                Ok(())
            }
            Expr::Tuple { elts } | Expr::List { elts } => {
                for (i, elt) in elts.iter().enumerate() {
                    self.descend(("elts", i), |cx| cx.bind_target(elt))?;
                }
                Ok(())
            }
            Expr::Attribute { .. } | Expr::Subscript { .. } => Ok(()),
            Expr::Starred { .. } => Err(self.unsupported(target.kind(), "starred assignment")),
            _ => Err(self.malformed(target.kind(), "not an assignment target")),
        }
    }

    /// `for` header binding. A target made only of names is declared by the
    /// header itself. A target that also stores into attributes or
    /// subscripts cannot carry `var`, so its names are hoisted instead.
    fn loop_target(&mut self, target: &Expr) -> Result<String, CodegenError> {
        if binds_only_names(target) {
            return Ok(format!("var {}", self.expr(target)?));
        }
        self.bind_target(target)?;
        self.expr(target)
    }

    /// Parameter list and body block shared by functions and methods.
    fn function_parts(
        &mut self,
        name: &str,
        args: &Arguments,
        body: &[Stmt],
        decorator_list: &[Expr],
    ) -> Result<(String, String), CodegenError> {
        if !decorator_list.is_empty() {
            return Err(self.unsupported("FunctionDef", "decorators"));
        }
        let params = self.descend("args", |cx| cx.parameters(args))?;

        // A bare `raise` in a nested function has no handler error to re-raise.
        let handler_depth = std::mem::take(&mut self.handler_depth);
        let body = self.emit_block(
            format!("function {name}"),
            "body",
            body,
            BlockFrame::default(),
        );
        self.handler_depth = handler_depth;
        Ok((params, body?))
    }

    /// Defaults align with the tail of the positional parameters; a `*args`
    /// parameter becomes a rest parameter.
    fn parameters(&mut self, args: &Arguments) -> Result<String, CodegenError> {
        if !args.kwonlyargs.is_empty() {
            return Err(self.unsupported("arguments", "keyword-only parameters"));
        }
        if args.kwarg.is_some() {
            return Err(self.unsupported("arguments", "`**` parameter"));
        }

        let positional: Vec<_> = args.posonlyargs.iter().chain(&args.args).collect();
        if args.defaults.len() > positional.len() {
            return Err(self.malformed("arguments", "more defaults than parameters"));
        }
        let (required, defaulted) = positional.split_at(positional.len() - args.defaults.len());

        let mut params: Vec<String> = required.iter().map(|arg| arg.arg.clone()).collect();
        for (i, (arg, default)) in defaulted.iter().zip(&args.defaults).enumerate() {
            let default = self.child_expr(("defaults", i), default)?;
            params.push(format!("{}={default}", arg.arg));
        }
        if let Some(vararg) = &args.vararg {
            params.push(format!("...{}", vararg.arg));
        }
        Ok(params.join(", "))
    }

    /// `class Name [extends Base] { members }`. Class-level assignments
    /// become fields, so the class scope is discarded without a
    /// declaration line.
    fn class_def(
        &mut self,
        name: &str,
        bases: &[Expr],
        body: &[Stmt],
    ) -> Result<String, CodegenError> {
        let header = match bases {
            [] => format!("class {name}"),
            [base] => format!("class {name} extends {}", self.child_expr(("bases", 0), base)?),
            _ => return Err(self.unsupported("ClassDef", "multiple inheritance")),
        };

        self.scopes.push(format!("class {name}"));
        self.nesting += BLOCK_WEIGHT;
        let members = self.indented(|cx| {
            let mut members = Vec::with_capacity(body.len());
            for (i, member) in body.iter().enumerate() {
                members.push(cx.descend(("body", i), |cx| cx.class_member(member))?);
            }
            Ok::<_, CodegenError>(members)
        });
        self.nesting -= BLOCK_WEIGHT;
        self.scopes.pop();

        let block = BlockBody::new(Vec::new(), members?);
        Ok(format!("{header} {}", self.render_braced(&block)))
    }

    fn class_member(&mut self, member: &Stmt) -> Result<String, CodegenError> {
        match member {
            Stmt::FunctionDef {
                name,
                args,
                body,
                decorator_list,
            } => {
                let (params, body) = self.function_parts(name, args, body, decorator_list)?;
                let method = if name == "__init__" { "constructor" } else { name };
                Ok(format!("{method}({params}) {body}"))
            }
            Stmt::Assign { targets, .. } if matches!(targets.as_slice(), [Expr::Name { .. }]) => {
                self.stmt(member)
            }
            Stmt::Pass => self.stmt(member),
            Stmt::Expr {
                value:
                    Expr::Constant {
                        value: Literal::Str(doc),
                    },
            } => Ok(self.doc_comment(doc)),
            _ => Err(self.unsupported(member.kind(), "not valid as a class member")),
        }
    }

    /// Docstring as `//` comment lines.
    fn doc_comment(&self, doc: &str) -> String {
        let separator = format!("\n{}", self.indentation(self.indent));
        doc.trim()
            .lines()
            .map(|line| {
                let line = line.trim();
                if line.is_empty() {
                    "//".to_string()
                } else {
                    format!("// {line}")
                }
            })
            .collect::<Vec<_>>()
            .join(&separator)
    }

    fn try_stmt(
        &mut self,
        body: &[Stmt],
        handlers: &[ExceptHandler],
        orelse: &[Stmt],
        finalbody: &[Stmt],
    ) -> Result<String, CodegenError> {
        if handlers.is_empty() && finalbody.is_empty() {
            return Err(self.malformed("Try", "needs an except or finally clause"));
        }
        if handlers.is_empty() && !orelse.is_empty() {
            return Err(self.malformed("Try", "`else` clause without an except clause"));
        }

        if orelse.is_empty() {
            let body = self.emit_block("try", "body", body, BlockFrame::default())?;
            let mut out = format!("try {body}");
            if !handlers.is_empty() {
                let catch = self.handlers(handlers)?;
                out.push_str(&format!(" catch ({ERROR_BINDING}) {catch}"));
            }
            if !finalbody.is_empty() {
                let finally = self.finally_block(finalbody)?;
                out.push_str(&format!(" finally {finally}"));
            }
            return Ok(out);
        }

        // The else body runs only when the try body ran to completion,
        // recorded in a flag declared by the enclosing block.
        let flag = runtime::else_flag(self.else_flags);
        self.else_flags += 1;
        self.scopes.declare(&flag);
        let reset = format!("{flag} = false;\n{}", self.indentation(self.indent));

        if finalbody.is_empty() {
            let guarded = self.guarded_try(body, handlers, orelse, &flag)?;
            return Ok(format!("{reset}{guarded}"));
        }

        // The else body must finish before the finally body starts.
        let guarded = self.indented(|cx| cx.guarded_try(body, handlers, orelse, &flag))?;
        let outer = self.render_braced(&BlockBody::new(Vec::new(), vec![guarded]));
        let finally = self.finally_block(finalbody)?;
        Ok(format!("{reset}try {outer} finally {finally}"))
    }

    /// try/catch whose body sets `flag` on completion, followed by the else
    /// body guarded on that flag.
    fn guarded_try(
        &mut self,
        body: &[Stmt],
        handlers: &[ExceptHandler],
        orelse: &[Stmt],
        flag: &str,
    ) -> Result<String, CodegenError> {
        let body = self.emit_block(
            "try",
            "body",
            body,
            BlockFrame::epilogue(format!("{flag} = true;")),
        )?;
        let catch = self.handlers(handlers)?;
        let orelse = self.emit_block("else", "orelse", orelse, BlockFrame::default())?;
        Ok(format!(
            "try {body} catch ({ERROR_BINDING}) {catch}\n{}if ({flag}) {orelse}",
            self.indentation(self.indent)
        ))
    }

    fn finally_block(&mut self, finalbody: &[Stmt]) -> Result<String, CodegenError> {
        self.emit_block("finally", "finalbody", finalbody, BlockFrame::default())
    }

    /// Body of the `catch` clause. A lone catch-all handler is the clause
    /// body itself; otherwise the handlers form an `if`/`else` chain on the
    /// error binding and errors no handler matches are re-thrown.
    fn handlers(&mut self, handlers: &[ExceptHandler]) -> Result<String, CodegenError> {
        if let [handler] = handlers {
            if handler.exception.is_none() {
                return self.descend(("handlers", 0), |cx| cx.handler_body(handler));
            }
        }
        let chain = self.indented(|cx| cx.handler_chain(handlers))?;
        Ok(self.render_braced(&BlockBody::new(Vec::new(), vec![chain])))
    }

    fn handler_chain(&mut self, handlers: &[ExceptHandler]) -> Result<String, CodegenError> {
        let mut out = String::new();
        let mut catch_all = false;
        for (i, handler) in handlers.iter().enumerate() {
            let clause = self.descend(("handlers", i), |cx| {
                if catch_all {
                    return Err(cx.malformed("ExceptHandler", "default except clause must be last"));
                }
                let body = match &handler.exception {
                    Some(exception) => {
                        let guard = cx.descend("type", |cx| cx.exception_guard(exception))?;
                        format!("if ({guard}) {}", cx.handler_body(handler)?)
                    }
                    None => cx.handler_body(handler)?,
                };
                Ok(body)
            })?;
            if i > 0 {
                out.push_str(" else ");
            }
            out.push_str(&clause);
            catch_all |= handler.exception.is_none();
        }
        if !catch_all {
            let rethrow = BlockBody::new(Vec::new(), vec![format!("throw {ERROR_BINDING};")]);
            out.push_str(" else ");
            out.push_str(&self.render_braced(&rethrow));
        }
        Ok(out)
    }

    /// `instanceof` test against the handler's type, or a disjunction of
    /// tests for a tuple of types.
    fn exception_guard(&mut self, exception: &Expr) -> Result<String, CodegenError> {
        let Expr::Tuple { elts } = exception else {
            return Ok(format!("{ERROR_BINDING} instanceof {}", self.expr(exception)?));
        };
        if elts.is_empty() {
            return Err(self.malformed("Tuple", "empty tuple of exception types"));
        }
        let mut checks = Vec::with_capacity(elts.len());
        for (i, elt) in elts.iter().enumerate() {
            let class = self.child_expr(("elts", i), elt)?;
            checks.push(format!("{ERROR_BINDING} instanceof {class}"));
        }
        Ok(checks.join(" || "))
    }

    /// Handler block, opening with `var <name> = <error binding>;` when
    /// the handler binds a name.
    fn handler_body(&mut self, handler: &ExceptHandler) -> Result<String, CodegenError> {
        let frame = match &handler.name {
            Some(name) => BlockFrame::prelude(format!("var {name} = {ERROR_BINDING};")),
            None => BlockFrame::default(),
        };
        self.handler_depth += 1;
        let body = self.emit_block("except", "body", &handler.body, frame);
        self.handler_depth -= 1;
        body
    }
}

fn binds_only_names(target: &Expr) -> bool {
    match target {
        Expr::Name { .. } => true,
        Expr::Tuple { elts } | Expr::List { elts } => elts.iter().all(binds_only_names),
        _ => false,
    }
}
