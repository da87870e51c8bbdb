//! Expression translation rules.

use super::EmitContext;
use crate::ast::{
    BinOperator, BoolOperator, CmpOperator, Comprehension, Expr, Keyword, Literal, UnaryOperator,
};
use crate::config::KeywordArguments;
use crate::error::CodegenError;
use crate::runtime;
use tracing::trace;

impl EmitContext<'_> {
    /// Translate an expression to inline JavaScript.
    pub(super) fn expr(&mut self, expr: &Expr) -> Result<String, CodegenError> {
        trace!(kind = expr.kind(), path = %self.path, "expr");
        match expr {
            Expr::Constant { value } => Ok(literal(value)),

            Expr::Name { id } => Ok(id.clone()),

            Expr::Attribute { value, attr } => {
                let object = self.child_expr("value", value)?;
                Ok(format!("{object}.{attr}"))
            }

            Expr::BinOp { left, op, right } => self.binary(left, *op, right),

            Expr::UnaryOp { op, operand } => {
                let operand = self.child_expr("operand", operand)?;
                Ok(format!("{}({operand})", unary_operator(*op)))
            }

            Expr::BoolOp { op, values } => {
                if values.len() < 2 {
                    return Err(self.malformed(expr.kind(), "needs at least two operands"));
                }
                let separator = match op {
                    BoolOperator::And => " && ",
                    BoolOperator::Or => " || ",
                };
                let operands = self.expr_list("values", values)?;
                Ok(format!("({})", operands.join(separator)))
            }

            Expr::Compare {
                left,
                ops,
                comparators,
            } => self.compare(left, ops, comparators),

            // Tuples have no distinct JavaScript type.
            Expr::List { elts } | Expr::Tuple { elts } => {
                Ok(format!("[{}]", self.expr_list("elts", elts)?.join(", ")))
            }

            Expr::Dict { keys, values } => self.dict(keys, values),

            Expr::Subscript { value, slice } => self.subscript(value, slice),

            Expr::Slice { .. } => Err(self.malformed(expr.kind(), "slice outside of a subscript")),

            Expr::Call {
                func,
                args,
                keywords,
            } => self.call(func, args, keywords),

            Expr::ListComp { elt, generators } => self.list_comp(elt, generators),

            Expr::DictComp { .. } => Err(self.unsupported(
                expr.kind(),
                "dict comprehensions have no JavaScript equivalent",
            )),

            Expr::SetComp { .. }
            | Expr::GeneratorExp { .. }
            | Expr::Lambda { .. }
            | Expr::IfExp { .. }
            | Expr::Set { .. }
            | Expr::Await { .. }
            | Expr::Yield { .. }
            | Expr::YieldFrom { .. }
            | Expr::JoinedStr { .. }
            | Expr::FormattedValue { .. }
            | Expr::NamedExpr { .. } => {
                Err(self.unsupported(expr.kind(), "no translation rule for this expression"))
            }

            Expr::Starred { .. } => Err(self.unsupported(expr.kind(), "argument unpacking")),

            Expr::Unrecognized(_) => {
                Err(self.unsupported(expr.kind(), "unknown expression kind"))
            }
        }
    }

    fn expr_list(
        &mut self,
        field: &'static str,
        exprs: &[Expr],
    ) -> Result<Vec<String>, CodegenError> {
        exprs
            .iter()
            .enumerate()
            .map(|(i, e)| self.child_expr((field, i), e))
            .collect()
    }

    fn binary(
        &mut self,
        left: &Expr,
        op: BinOperator,
        right: &Expr,
    ) -> Result<String, CodegenError> {
        if op == BinOperator::MatMult {
            return Err(self.unsupported("BinOp", "matrix multiplication"));
        }
        let left = self.child_expr("left", left)?;
        let right = self.child_expr("right", right)?;
        Ok(match infix_operator(op) {
            Some(infix) => format!("({left} {infix} {right})"),
            None if op == BinOperator::Pow => runtime::power(&left, &right),
            None => runtime::floor_division(&left, &right),
        })
    }

    /// Comparison chains are flattened as written: `a < b < c` becomes
    /// `a < b < c`, which JavaScript evaluates as `(a < b) < c`.
    fn compare(
        &mut self,
        left: &Expr,
        ops: &[CmpOperator],
        comparators: &[Expr],
    ) -> Result<String, CodegenError> {
        if ops.is_empty() || ops.len() != comparators.len() {
            return Err(self.malformed(
                "Compare",
                format!(
                    "{} operators for {} comparators",
                    ops.len(),
                    comparators.len()
                ),
            ));
        }

        if let ([op @ (CmpOperator::In | CmpOperator::NotIn)], [haystack]) = (ops, comparators) {
            let needle = self.child_expr("left", left)?;
            let haystack = self.child_expr(("comparators", 0), haystack)?;
            let test = runtime::membership_test(&needle, &haystack);
            return Ok(match op {
                CmpOperator::NotIn => format!("!{test}"),
                _ => test,
            });
        }

        let mut out = self.child_expr("left", left)?;
        for (i, (op, comparator)) in ops.iter().zip(comparators).enumerate() {
            let Some(operator) = compare_operator(*op) else {
                return Err(
                    self.unsupported("Compare", "membership test inside a comparison chain")
                );
            };
            let comparator = self.child_expr(("comparators", i), comparator)?;
            out.push(' ');
            out.push_str(operator);
            out.push(' ');
            out.push_str(&comparator);
        }
        Ok(out)
    }

    /// One `key: value` pair per line, one level deeper than the line
    /// holding the opening brace.
    fn dict(&mut self, keys: &[Option<Expr>], values: &[Expr]) -> Result<String, CodegenError> {
        if keys.len() != values.len() {
            return Err(self.malformed(
                "Dict",
                format!("{} keys for {} values", keys.len(), values.len()),
            ));
        }
        if keys.is_empty() {
            return Ok("{}".to_string());
        }

        let pairs = self.indented(|cx| {
            let indentation = cx.indentation(cx.indent);
            keys.iter()
                .zip(values)
                .enumerate()
                .map(|(i, (key, value))| {
                    let Some(key) = key else {
                        return cx.descend(("values", i), |cx| {
                            Err(cx.unsupported("Dict", "dictionary unpacking"))
                        });
                    };
                    let key = cx.child_expr(("keys", i), key)?;
                    let value = cx.child_expr(("values", i), value)?;
                    Ok(format!("{indentation}{key}: {value}"))
                })
                .collect::<Result<Vec<_>, CodegenError>>()
        })?;

        Ok(format!(
            "{{\n{}\n{}}}",
            pairs.join(",\n"),
            self.indentation(self.indent)
        ))
    }

    fn subscript(&mut self, value: &Expr, slice: &Expr) -> Result<String, CodegenError> {
        let target = self.child_expr("value", value)?;
        match slice {
            Expr::Slice { lower, upper, step } => self.descend("slice", |cx| {
                cx.slice(
                    &target,
                    lower.as_deref(),
                    upper.as_deref(),
                    step.as_deref(),
                )
            }),
            index => {
                let index = self.child_expr("slice", index)?;
                Ok(format!("{target}[{index}]"))
            }
        }
    }

    /// Read-only slicing through `.slice(lower, upper[, step])`. A missing
    /// lower bound is `0`; a missing upper bound is left out, or passed as
    /// `undefined` when a step follows.
    fn slice(
        &mut self,
        target: &str,
        lower: Option<&Expr>,
        upper: Option<&Expr>,
        step: Option<&Expr>,
    ) -> Result<String, CodegenError> {
        if lower.is_none() && upper.is_none() && step.is_none() {
            return Err(self.malformed("Slice", "slice has no bounds"));
        }

        let mut args = vec![match lower {
            Some(lower) => self.child_expr("lower", lower)?,
            None => "0".to_string(),
        }];
        match (upper, step) {
            (Some(upper), _) => args.push(self.child_expr("upper", upper)?),
            (None, Some(_)) => args.push("undefined".to_string()),
            (None, None) => {}
        }
        if let Some(step) = step {
            args.push(self.child_expr("step", step)?);
        }
        Ok(format!("{target}.slice({})", args.join(", ")))
    }

    fn call(
        &mut self,
        func: &Expr,
        args: &[Expr],
        keywords: &[Keyword],
    ) -> Result<String, CodegenError> {
        let callee = self.child_expr("func", func)?;
        let mut rendered = self.expr_list("args", args)?;

        let mut options = Vec::new();
        for (i, keyword) in keywords.iter().enumerate() {
            let pair = self.descend(("keywords", i), |cx| {
                let Some(name) = &keyword.arg else {
                    return Err(cx.unsupported("keyword", "keyword argument unpacking"));
                };
                if cx.config.keyword_arguments == KeywordArguments::Reject {
                    return Err(cx.unsupported("keyword", "named arguments are disabled"));
                }
                let value = cx.child_expr("value", &keyword.value)?;
                Ok((name.as_str(), value))
            })?;
            match self.config.keyword_arguments {
                KeywordArguments::OptionsObject => options.push(format!("{}: {}", pair.0, pair.1)),
                _ => rendered.push(format!("{}={}", pair.0, pair.1)),
            }
        }
        if !options.is_empty() {
            rendered.push(format!("{{{}}}", options.join(", ")));
        }

        Ok(format!("{callee}({})", rendered.join(", ")))
    }

    /// `[for (target of iter) if (cond) elt]`
    fn list_comp(
        &mut self,
        elt: &Expr,
        generators: &[Comprehension],
    ) -> Result<String, CodegenError> {
        let generator = match generators {
            [] => return Err(self.malformed("ListComp", "comprehension has no generator")),
            [generator] => generator,
            _ => {
                return Err(self.unsupported("ListComp", "more than one generator clause"));
            }
        };

        let clause = self.descend(("generators", 0), |cx| {
            if generator.is_async {
                return Err(cx.unsupported("comprehension", "asynchronous generator clause"));
            }
            let target = cx.child_expr("target", &generator.target)?;
            let iter = cx.child_expr("iter", &generator.iter)?;
            let mut clause = format!("for ({target} of {iter})");
            for (i, condition) in generator.ifs.iter().enumerate() {
                let condition = cx.child_expr(("ifs", i), condition)?;
                clause.push_str(&format!(" if ({condition})"));
            }
            Ok(clause)
        })?;
        let element = self.child_expr("elt", elt)?;
        Ok(format!("[{clause} {element}]"))
    }
}

/// Literal text. Strings are quoted with their contents copied verbatim;
/// no escaping is applied.
fn literal(value: &Literal) -> String {
    match value {
        Literal::None => "null".to_string(),
        Literal::Bool(true) => "true".to_string(),
        Literal::Bool(false) => "false".to_string(),
        Literal::Int(n) => n.to_string(),
        Literal::Float(f) if f.is_nan() => "NaN".to_string(),
        Literal::Float(f) if f.is_infinite() && *f > 0.0 => "Infinity".to_string(),
        Literal::Float(f) if f.is_infinite() => "-Infinity".to_string(),
        Literal::Float(f) => format!("{f:?}"),
        Literal::Str(s) => format!("\"{s}\""),
    }
}

/// Infix text for operators that map 1:1. `None` for power, floor division
/// and matrix multiplication.
pub(super) fn infix_operator(op: BinOperator) -> Option<&'static str> {
    Some(match op {
        BinOperator::Add => "+",
        BinOperator::Sub => "-",
        BinOperator::Mult => "*",
        BinOperator::Div => "/",
        BinOperator::Mod => "%",
        BinOperator::LShift => "<<",
        BinOperator::RShift => ">>",
        BinOperator::BitOr => "|",
        BinOperator::BitXor => "^",
        BinOperator::BitAnd => "&",
        BinOperator::Pow | BinOperator::FloorDiv | BinOperator::MatMult => return None,
    })
}

fn unary_operator(op: UnaryOperator) -> &'static str {
    match op {
        UnaryOperator::Invert => "~",
        UnaryOperator::Not => "!",
        UnaryOperator::UAdd => "+",
        UnaryOperator::USub => "-",
    }
}

/// Infix text for comparisons; `None` for membership tests, which need
/// the runtime helper.
fn compare_operator(op: CmpOperator) -> Option<&'static str> {
    Some(match op {
        CmpOperator::Eq => "==",
        CmpOperator::NotEq => "!=",
        CmpOperator::Lt => "<",
        CmpOperator::LtE => "<=",
        CmpOperator::Gt => ">",
        CmpOperator::GtE => ">=",
        CmpOperator::Is => "===",
        CmpOperator::IsNot => "!==",
        CmpOperator::In | CmpOperator::NotIn => return None,
    })
}

#[cfg(test)]
mod tests {
    use crate::ast::*;
    use crate::config::{CodegenConfig, KeywordArguments};
    use crate::error::CodegenError;
    use crate::output::JavaScriptWriter;

    fn js(expr: Expr) -> String {
        JavaScriptWriter::default().write_expr(&expr).unwrap()
    }

    fn js_err(expr: Expr) -> CodegenError {
        JavaScriptWriter::default().write_expr(&expr).unwrap_err()
    }

    #[test]
    fn test_literals() {
        assert_eq!(js(Expr::int(42)), "42");
        assert_eq!(js(Expr::int(-7)), "-7");
        assert_eq!(js(Expr::float(2.5)), "2.5");
        assert_eq!(js(Expr::float(3.0)), "3.0");
        assert_eq!(js(Expr::bool(true)), "true");
        assert_eq!(js(Expr::bool(false)), "false");
        assert_eq!(js(Expr::none()), "null");
    }

    #[test]
    fn test_string_copied_verbatim() {
        assert_eq!(js(Expr::string("hello")), "\"hello\"");
        assert_eq!(js(Expr::string(r"a\nb")), r#""a\nb""#);
    }

    #[test]
    fn test_arithmetic_is_parenthesized() {
        let expr = Expr::binary(
            Expr::binary(Expr::name("a"), BinOperator::Add, Expr::name("b")),
            BinOperator::Mult,
            Expr::name("c"),
        );
        assert_eq!(js(expr), "((a + b) * c)");
        assert_eq!(
            js(Expr::binary(Expr::name("m"), BinOperator::BitXor, Expr::int(1))),
            "(m ^ 1)"
        );
    }

    #[test]
    fn test_power_and_floor_division() {
        assert_eq!(
            js(Expr::binary(Expr::name("a"), BinOperator::Pow, Expr::name("b"))),
            "Math.pow(a, b)"
        );
        assert_eq!(
            js(Expr::binary(Expr::name("a"), BinOperator::FloorDiv, Expr::name("b"))),
            "Math.floor(a / b)"
        );
    }

    #[test]
    fn test_matmul_is_unsupported() {
        let err = js_err(Expr::binary(Expr::name("a"), BinOperator::MatMult, Expr::name("b")));
        assert_eq!(err.kind(), Some("BinOp"));
    }

    #[test]
    fn test_unary_and_boolean() {
        assert_eq!(js(Expr::unary(UnaryOperator::USub, Expr::name("x"))), "-(x)");
        assert_eq!(js(Expr::unary(UnaryOperator::Not, Expr::name("x"))), "!(x)");
        assert_eq!(js(Expr::unary(UnaryOperator::Invert, Expr::name("x"))), "~(x)");
        assert_eq!(
            js(Expr::bool_op(
                BoolOperator::Or,
                vec![
                    Expr::bool_op(BoolOperator::And, vec![Expr::name("a"), Expr::name("b")]),
                    Expr::name("c"),
                ],
            )),
            "((a && b) || c)"
        );
    }

    #[test]
    fn test_comparisons() {
        assert_eq!(
            js(Expr::compare(Expr::name("a"), CmpOperator::LtE, Expr::int(3))),
            "a <= 3"
        );
        assert_eq!(
            js(Expr::compare(Expr::name("a"), CmpOperator::IsNot, Expr::none())),
            "a !== null"
        );
        assert_eq!(
            js(Expr::compare_chain(
                Expr::int(0),
                vec![CmpOperator::Lt, CmpOperator::Lt],
                vec![Expr::name("x"), Expr::int(10)],
            )),
            "0 < x < 10"
        );
    }

    #[test]
    fn test_membership() {
        assert_eq!(
            js(Expr::compare(Expr::name("x"), CmpOperator::In, Expr::name("y"))),
            "$$In$$(x, y)"
        );
        assert_eq!(
            js(Expr::compare(Expr::name("x"), CmpOperator::NotIn, Expr::name("y"))),
            "!$$In$$(x, y)"
        );
    }

    #[test]
    fn test_membership_in_chain_is_unsupported() {
        let err = js_err(Expr::compare_chain(
            Expr::name("a"),
            vec![CmpOperator::Lt, CmpOperator::In],
            vec![Expr::name("b"), Expr::name("c")],
        ));
        assert!(matches!(err, CodegenError::UnsupportedConstruct { .. }));
        assert_eq!(err.kind(), Some("Compare"));
    }

    #[test]
    fn test_mismatched_compare_is_malformed() {
        let err = js_err(Expr::compare_chain(
            Expr::name("a"),
            vec![CmpOperator::Lt],
            vec![],
        ));
        assert!(matches!(err, CodegenError::MalformedNode { .. }));
        assert_eq!(err.kind(), Some("Compare"));
    }

    #[test]
    fn test_containers() {
        assert_eq!(js(Expr::list(vec![Expr::int(1), Expr::int(2)])), "[1, 2]");
        assert_eq!(js(Expr::tuple(vec![Expr::name("a"), Expr::name("b")])), "[a, b]");
        assert_eq!(js(Expr::list(vec![])), "[]");
        assert_eq!(js(Expr::dict(vec![])), "{}");
        assert_eq!(
            js(Expr::dict(vec![
                (Expr::string("a"), Expr::int(1)),
                (Expr::string("b"), Expr::int(2)),
            ])),
            "{\n  \"a\": 1,\n  \"b\": 2\n}"
        );
    }

    #[test]
    fn test_nested_dict_indents_each_level() {
        let inner = Expr::dict(vec![(Expr::string("k"), Expr::bool(true))]);
        assert_eq!(
            js(Expr::dict(vec![(Expr::string("outer"), inner)])),
            "{\n  \"outer\": {\n    \"k\": true\n  }\n}"
        );
    }

    #[test]
    fn test_dict_unpacking_is_unsupported() {
        let err = js_err(Expr::Dict {
            keys: vec![None],
            values: vec![Expr::name("other")],
        });
        assert_eq!(err.kind(), Some("Dict"));
        assert_eq!(err.path().to_string(), "values[0]");
    }

    #[test]
    fn test_subscript_and_slice() {
        assert_eq!(js(Expr::subscript(Expr::name("a"), Expr::int(0))), "a[0]");
        assert_eq!(
            js(Expr::subscript(
                Expr::name("a"),
                Expr::slice(Some(Expr::int(1)), Some(Expr::int(3)), None),
            )),
            "a.slice(1, 3)"
        );
        assert_eq!(
            js(Expr::subscript(
                Expr::name("a"),
                Expr::slice(Some(Expr::int(1)), Some(Expr::int(9)), Some(Expr::int(2))),
            )),
            "a.slice(1, 9, 2)"
        );
        assert_eq!(
            js(Expr::subscript(Expr::name("a"), Expr::slice(None, Some(Expr::int(2)), None))),
            "a.slice(0, 2)"
        );
        assert_eq!(
            js(Expr::subscript(Expr::name("a"), Expr::slice(Some(Expr::int(2)), None, None))),
            "a.slice(2)"
        );
        assert_eq!(
            js(Expr::subscript(
                Expr::name("a"),
                Expr::slice(None, None, Some(Expr::int(-1))),
            )),
            "a.slice(0, undefined, -1)"
        );
    }

    #[test]
    fn test_unbounded_slice_is_malformed() {
        let err = js_err(Expr::subscript(Expr::name("a"), Expr::slice(None, None, None)));
        assert!(matches!(err, CodegenError::MalformedNode { .. }));
        assert_eq!(err.kind(), Some("Slice"));
        assert_eq!(err.path().to_string(), "slice");
    }

    #[test]
    fn test_calls() {
        assert_eq!(
            js(Expr::call(
                Expr::attribute(Expr::name("console"), "log"),
                vec![Expr::string("hi"), Expr::int(1)],
            )),
            "console.log(\"hi\", 1)"
        );
        assert_eq!(
            js(Expr::call_with_keywords(
                Expr::name("f"),
                vec![Expr::int(1)],
                vec![Keyword::new("c", Expr::int(3)), Keyword::new("d", Expr::name("Error"))],
            )),
            "f(1, c=3, d=Error)"
        );
    }

    #[test]
    fn test_keyword_argument_policies() {
        let call = Expr::call_with_keywords(
            Expr::name("f"),
            vec![Expr::int(1)],
            vec![Keyword::new("a", Expr::int(2)), Keyword::new("b", Expr::int(3))],
        );

        let options = JavaScriptWriter::new(CodegenConfig {
            keyword_arguments: KeywordArguments::OptionsObject,
            ..CodegenConfig::default()
        });
        assert_eq!(options.write_expr(&call).unwrap(), "f(1, {a: 2, b: 3})");

        let reject = JavaScriptWriter::new(CodegenConfig {
            keyword_arguments: KeywordArguments::Reject,
            ..CodegenConfig::default()
        });
        let err = reject.write_expr(&call).unwrap_err();
        assert_eq!(err.kind(), Some("keyword"));
        assert_eq!(err.path().to_string(), "keywords[0]");
    }

    #[test]
    fn test_keyword_unpacking_is_unsupported() {
        let err = js_err(Expr::call_with_keywords(
            Expr::name("f"),
            vec![],
            vec![Keyword {
                arg: None,
                value: Expr::name("opts"),
            }],
        ));
        assert_eq!(err.kind(), Some("keyword"));
    }

    #[test]
    fn test_list_comprehension() {
        let comp = Expr::list_comp(
            Expr::binary(Expr::name("x"), BinOperator::Mult, Expr::int(2)),
            vec![Comprehension::new(
                Expr::name("x"),
                Expr::name("xs"),
                vec![Expr::compare(Expr::name("x"), CmpOperator::Gt, Expr::int(0))],
            )],
        );
        assert_eq!(js(comp), "[for (x of xs) if (x > 0) (x * 2)]");
    }

    #[test]
    fn test_multiple_generators_are_unsupported() {
        let comp = Expr::list_comp(
            Expr::name("x"),
            vec![
                Comprehension::new(Expr::name("row"), Expr::name("grid"), vec![]),
                Comprehension::new(Expr::name("x"), Expr::name("row"), vec![]),
            ],
        );
        let err = js_err(comp);
        assert!(matches!(err, CodegenError::UnsupportedConstruct { .. }));
        assert_eq!(err.kind(), Some("ListComp"));
    }

    #[test]
    fn test_dict_comprehension_is_unsupported() {
        let comp = Expr::DictComp {
            key: Box::new(Expr::name("k")),
            value: Box::new(Expr::name("v")),
            generators: vec![Comprehension::new(
                Expr::tuple(vec![Expr::name("k"), Expr::name("v")]),
                Expr::name("pairs"),
                vec![],
            )],
        };
        assert_eq!(js_err(comp).kind(), Some("DictComp"));
    }

    #[test]
    fn test_unhandled_kinds_fail() {
        let err = js_err(Expr::IfExp {
            test: Box::new(Expr::name("c")),
            body: Box::new(Expr::int(1)),
            orelse: Box::new(Expr::int(2)),
        });
        assert!(matches!(err, CodegenError::UnsupportedConstruct { .. }));
        assert_eq!(err.kind(), Some("IfExp"));

        let err = js_err(Expr::call(
            Expr::name("f"),
            vec![Expr::Unrecognized(UnknownNode::new("TemplateStr"))],
        ));
        assert_eq!(err.kind(), Some("TemplateStr"));
        assert_eq!(err.path().to_string(), "args[0]");
    }
}
