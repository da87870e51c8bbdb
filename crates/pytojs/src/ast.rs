//! Source tree consumed by the code generator.
//!
//! The node set mirrors the abstract grammar of the source language closely
//! enough that a front-end can hand over its tree without reshaping it. The
//! interchange form is JSON, internally tagged by node class:
//!
//! ```json
//! {"kind": "Assign",
//!  "targets": [{"kind": "Name", "id": "x"}],
//!  "value": {"kind": "Constant", "value": 1}}
//! ```
//!
//! Every kind the schema knows is a variant here, including kinds the
//! JavaScript writer has no rule for. Those are matched explicitly by the
//! writer and rejected, so a new variant cannot be added without deciding
//! how it is translated. Tags the schema does not know at all decode to
//! `Unrecognized`, keeping the tag so errors can name it.

use serde::de::{self, DeserializeOwned};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::ReadError;

/// A whole source module.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Module {
    #[serde(default)]
    pub body: Vec<Stmt>,
}

impl Module {
    pub fn new(body: Vec<Stmt>) -> Self {
        Self { body }
    }

    /// Decode a module from its JSON interchange form.
    pub fn from_json(source: &str) -> Result<Self, ReadError> {
        decode(source)
    }
}

/// Statement nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum Stmt {
    /// Expression evaluated for its side effects.
    Expr { value: Expr },

    /// `a = b = value`
    Assign { targets: Vec<Expr>, value: Expr },

    /// `target op= value`
    AugAssign {
        target: Expr,
        op: BinOperator,
        value: Expr,
    },

    /// `target: annotation = value`
    AnnAssign {
        target: Expr,
        annotation: Expr,
        value: Option<Expr>,
    },

    If {
        test: Expr,
        body: Vec<Stmt>,
        #[serde(default)]
        orelse: Vec<Stmt>,
    },

    While {
        test: Expr,
        body: Vec<Stmt>,
        #[serde(default)]
        orelse: Vec<Stmt>,
    },

    For {
        target: Expr,
        iter: Expr,
        body: Vec<Stmt>,
        #[serde(default)]
        orelse: Vec<Stmt>,
    },

    Break,
    Continue,
    Pass,

    FunctionDef {
        name: String,
        args: Arguments,
        body: Vec<Stmt>,
        #[serde(default)]
        decorator_list: Vec<Expr>,
    },

    ClassDef {
        name: String,
        #[serde(default)]
        bases: Vec<Expr>,
        #[serde(default)]
        keywords: Vec<Keyword>,
        body: Vec<Stmt>,
        #[serde(default)]
        decorator_list: Vec<Expr>,
    },

    Return { value: Option<Expr> },

    Delete { targets: Vec<Expr> },

    Raise {
        exc: Option<Expr>,
        cause: Option<Expr>,
    },

    Try {
        body: Vec<Stmt>,
        #[serde(default)]
        handlers: Vec<ExceptHandler>,
        #[serde(default)]
        orelse: Vec<Stmt>,
        #[serde(default)]
        finalbody: Vec<Stmt>,
    },

    With { items: Vec<WithItem>, body: Vec<Stmt> },

    Import { names: Vec<Alias> },

    ImportFrom {
        module: Option<String>,
        names: Vec<Alias>,
        #[serde(default)]
        level: u32,
    },

    Global { names: Vec<String> },

    Nonlocal { names: Vec<String> },

    Assert { test: Expr, msg: Option<Expr> },

    /// Any statement tag the schema does not know.
    #[serde(untagged)]
    Unrecognized(UnknownNode),
}

/// Expression nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum Expr {
    Constant { value: Literal },

    Name { id: String },

    /// `value.attr`
    Attribute { value: Box<Expr>, attr: String },

    BinOp {
        left: Box<Expr>,
        op: BinOperator,
        right: Box<Expr>,
    },

    UnaryOp {
        op: UnaryOperator,
        operand: Box<Expr>,
    },

    BoolOp { op: BoolOperator, values: Vec<Expr> },

    /// `left op0 c0 op1 c1 ...`
    Compare {
        left: Box<Expr>,
        ops: Vec<CmpOperator>,
        comparators: Vec<Expr>,
    },

    List { elts: Vec<Expr> },

    Tuple { elts: Vec<Expr> },

    /// A `None` key marks a `**mapping` entry.
    Dict {
        keys: Vec<Option<Expr>>,
        values: Vec<Expr>,
    },

    /// `value[slice]`, where `slice` is either an index expression or a
    /// `Slice` node.
    Subscript { value: Box<Expr>, slice: Box<Expr> },

    /// `lower:upper:step`; only meaningful as a subscript's slice.
    Slice {
        lower: Option<Box<Expr>>,
        upper: Option<Box<Expr>>,
        step: Option<Box<Expr>>,
    },

    Call {
        func: Box<Expr>,
        #[serde(default)]
        args: Vec<Expr>,
        #[serde(default)]
        keywords: Vec<Keyword>,
    },

    ListComp {
        elt: Box<Expr>,
        generators: Vec<Comprehension>,
    },

    DictComp {
        key: Box<Expr>,
        value: Box<Expr>,
        generators: Vec<Comprehension>,
    },

    SetComp {
        elt: Box<Expr>,
        generators: Vec<Comprehension>,
    },

    GeneratorExp {
        elt: Box<Expr>,
        generators: Vec<Comprehension>,
    },

    Lambda { args: Box<Arguments>, body: Box<Expr> },

    IfExp {
        test: Box<Expr>,
        body: Box<Expr>,
        orelse: Box<Expr>,
    },

    Set { elts: Vec<Expr> },

    Starred { value: Box<Expr> },

    Await { value: Box<Expr> },

    Yield { value: Option<Box<Expr>> },

    YieldFrom { value: Box<Expr> },

    /// f-string
    JoinedStr { values: Vec<Expr> },

    FormattedValue { value: Box<Expr> },

    /// `target := value`
    NamedExpr { target: Box<Expr>, value: Box<Expr> },

    /// Any expression tag the schema does not know.
    #[serde(untagged)]
    Unrecognized(UnknownNode),
}

/// A node whose `kind` tag names no known node class.
///
/// Only the tag is kept. A known tag never decodes to this, so a known
/// node with bad fields is still a decoding error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnknownNode {
    pub kind: String,
}

impl UnknownNode {
    pub fn new(kind: impl Into<String>) -> Self {
        Self { kind: kind.into() }
    }
}

impl<'de> Deserialize<'de> for UnknownNode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        struct Tagged {
            kind: String,
        }

        let Tagged { kind } = Tagged::deserialize(deserializer)?;
        if Stmt::KINDS.contains(&kind.as_str()) || Expr::KINDS.contains(&kind.as_str()) {
            return Err(de::Error::custom(format!("invalid `{kind}` node")));
        }
        Ok(Self { kind })
    }
}

/// Scalar payload of a `Constant` node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Literal {
    None,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BinOperator {
    Add,
    Sub,
    Mult,
    MatMult,
    Div,
    Mod,
    Pow,
    LShift,
    RShift,
    BitOr,
    BitXor,
    BitAnd,
    FloorDiv,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnaryOperator {
    Invert,
    Not,
    UAdd,
    USub,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BoolOperator {
    And,
    Or,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CmpOperator {
    Eq,
    NotEq,
    Lt,
    LtE,
    Gt,
    GtE,
    Is,
    IsNot,
    In,
    NotIn,
}

/// Parameter list of a function definition.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Arguments {
    pub posonlyargs: Vec<Arg>,
    pub args: Vec<Arg>,
    pub vararg: Option<Arg>,
    pub kwonlyargs: Vec<Arg>,
    pub kw_defaults: Vec<Option<Expr>>,
    pub kwarg: Option<Arg>,
    /// Defaults for the trailing positional parameters.
    pub defaults: Vec<Expr>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Arg {
    pub arg: String,
}

/// `arg=value` at a call site; `arg` is `None` for `**mapping`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Keyword {
    pub arg: Option<String>,
    pub value: Expr,
}

/// One `for target in iter if ...` clause of a comprehension.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comprehension {
    pub target: Expr,
    pub iter: Expr,
    #[serde(default)]
    pub ifs: Vec<Expr>,
    #[serde(default)]
    pub is_async: bool,
}

/// `except <type> as <name>: body`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExceptHandler {
    #[serde(rename = "type")]
    pub exception: Option<Expr>,
    pub name: Option<String>,
    pub body: Vec<Stmt>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WithItem {
    pub context_expr: Expr,
    pub optional_vars: Option<Expr>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alias {
    pub name: String,
    pub asname: Option<String>,
}

impl Stmt {
    /// Every statement tag the schema defines.
    pub const KINDS: &'static [&'static str] = &[
        "Expr",
        "Assign",
        "AugAssign",
        "AnnAssign",
        "If",
        "While",
        "For",
        "Break",
        "Continue",
        "Pass",
        "FunctionDef",
        "ClassDef",
        "Return",
        "Delete",
        "Raise",
        "Try",
        "With",
        "Import",
        "ImportFrom",
        "Global",
        "Nonlocal",
        "Assert",
    ];

    /// Node class name, as used in the interchange tag.
    pub fn kind(&self) -> &str {
        match self {
            Stmt::Expr { .. } => "Expr",
            Stmt::Assign { .. } => "Assign",
            Stmt::AugAssign { .. } => "AugAssign",
            Stmt::AnnAssign { .. } => "AnnAssign",
            Stmt::If { .. } => "If",
            Stmt::While { .. } => "While",
            Stmt::For { .. } => "For",
            Stmt::Break => "Break",
            Stmt::Continue => "Continue",
            Stmt::Pass => "Pass",
            Stmt::FunctionDef { .. } => "FunctionDef",
            Stmt::ClassDef { .. } => "ClassDef",
            Stmt::Return { .. } => "Return",
            Stmt::Delete { .. } => "Delete",
            Stmt::Raise { .. } => "Raise",
            Stmt::Try { .. } => "Try",
            Stmt::With { .. } => "With",
            Stmt::Import { .. } => "Import",
            Stmt::ImportFrom { .. } => "ImportFrom",
            Stmt::Global { .. } => "Global",
            Stmt::Nonlocal { .. } => "Nonlocal",
            Stmt::Assert { .. } => "Assert",
            Stmt::Unrecognized(node) => &node.kind,
        }
    }

    /// Decode a single statement from its JSON interchange form.
    pub fn from_json(source: &str) -> Result<Self, ReadError> {
        decode(source)
    }

    // Builders

    pub fn expr(value: Expr) -> Self {
        Stmt::Expr { value }
    }

    pub fn assign(target: Expr, value: Expr) -> Self {
        Stmt::Assign {
            targets: vec![target],
            value,
        }
    }

    /// `t0 = t1 = ... = value`
    pub fn assign_chain(targets: Vec<Expr>, value: Expr) -> Self {
        Stmt::Assign { targets, value }
    }

    pub fn aug_assign(target: Expr, op: BinOperator, value: Expr) -> Self {
        Stmt::AugAssign { target, op, value }
    }

    pub fn if_stmt(test: Expr, body: Vec<Stmt>, orelse: Vec<Stmt>) -> Self {
        Stmt::If { test, body, orelse }
    }

    pub fn while_loop(test: Expr, body: Vec<Stmt>) -> Self {
        Stmt::While {
            test,
            body,
            orelse: Vec::new(),
        }
    }

    pub fn for_loop(target: Expr, iter: Expr, body: Vec<Stmt>) -> Self {
        Stmt::For {
            target,
            iter,
            body,
            orelse: Vec::new(),
        }
    }

    pub fn function_def(name: impl Into<String>, args: Arguments, body: Vec<Stmt>) -> Self {
        Stmt::FunctionDef {
            name: name.into(),
            args,
            body,
            decorator_list: Vec::new(),
        }
    }

    pub fn class_def(name: impl Into<String>, bases: Vec<Expr>, body: Vec<Stmt>) -> Self {
        Stmt::ClassDef {
            name: name.into(),
            bases,
            keywords: Vec::new(),
            body,
            decorator_list: Vec::new(),
        }
    }

    pub fn return_stmt(value: Option<Expr>) -> Self {
        Stmt::Return { value }
    }

    pub fn delete(targets: Vec<Expr>) -> Self {
        Stmt::Delete { targets }
    }

    pub fn raise(exc: Option<Expr>) -> Self {
        Stmt::Raise { exc, cause: None }
    }

    pub fn try_stmt(
        body: Vec<Stmt>,
        handlers: Vec<ExceptHandler>,
        orelse: Vec<Stmt>,
        finalbody: Vec<Stmt>,
    ) -> Self {
        Stmt::Try {
            body,
            handlers,
            orelse,
            finalbody,
        }
    }
}

impl Expr {
    /// Every expression tag the schema defines.
    pub const KINDS: &'static [&'static str] = &[
        "Constant",
        "Name",
        "Attribute",
        "BinOp",
        "UnaryOp",
        "BoolOp",
        "Compare",
        "List",
        "Tuple",
        "Dict",
        "Subscript",
        "Slice",
        "Call",
        "ListComp",
        "DictComp",
        "SetComp",
        "GeneratorExp",
        "Lambda",
        "IfExp",
        "Set",
        "Starred",
        "Await",
        "Yield",
        "YieldFrom",
        "JoinedStr",
        "FormattedValue",
        "NamedExpr",
    ];

    /// Node class name, as used in the interchange tag.
    pub fn kind(&self) -> &str {
        match self {
            Expr::Constant { .. } => "Constant",
            Expr::Name { .. } => "Name",
            Expr::Attribute { .. } => "Attribute",
            Expr::BinOp { .. } => "BinOp",
            Expr::UnaryOp { .. } => "UnaryOp",
            Expr::BoolOp { .. } => "BoolOp",
            Expr::Compare { .. } => "Compare",
            Expr::List { .. } => "List",
            Expr::Tuple { .. } => "Tuple",
            Expr::Dict { .. } => "Dict",
            Expr::Subscript { .. } => "Subscript",
            Expr::Slice { .. } => "Slice",
            Expr::Call { .. } => "Call",
            Expr::ListComp { .. } => "ListComp",
            Expr::DictComp { .. } => "DictComp",
            Expr::SetComp { .. } => "SetComp",
            Expr::GeneratorExp { .. } => "GeneratorExp",
            Expr::Lambda { .. } => "Lambda",
            Expr::IfExp { .. } => "IfExp",
            Expr::Set { .. } => "Set",
            Expr::Starred { .. } => "Starred",
            Expr::Await { .. } => "Await",
            Expr::Yield { .. } => "Yield",
            Expr::YieldFrom { .. } => "YieldFrom",
            Expr::JoinedStr { .. } => "JoinedStr",
            Expr::FormattedValue { .. } => "FormattedValue",
            Expr::NamedExpr { .. } => "NamedExpr",
            Expr::Unrecognized(node) => &node.kind,
        }
    }

    /// Decode a single expression from its JSON interchange form.
    pub fn from_json(source: &str) -> Result<Self, ReadError> {
        decode(source)
    }

    // Builders

    pub fn int(value: i64) -> Self {
        Expr::Constant {
            value: Literal::Int(value),
        }
    }

    pub fn float(value: f64) -> Self {
        Expr::Constant {
            value: Literal::Float(value),
        }
    }

    pub fn string(value: impl Into<String>) -> Self {
        Expr::Constant {
            value: Literal::Str(value.into()),
        }
    }

    pub fn bool(value: bool) -> Self {
        Expr::Constant {
            value: Literal::Bool(value),
        }
    }

    pub fn none() -> Self {
        Expr::Constant {
            value: Literal::None,
        }
    }

    pub fn name(id: impl Into<String>) -> Self {
        Expr::Name { id: id.into() }
    }

    pub fn attribute(value: Expr, attr: impl Into<String>) -> Self {
        Expr::Attribute {
            value: Box::new(value),
            attr: attr.into(),
        }
    }

    pub fn binary(left: Expr, op: BinOperator, right: Expr) -> Self {
        Expr::BinOp {
            left: Box::new(left),
            op,
            right: Box::new(right),
        }
    }

    pub fn unary(op: UnaryOperator, operand: Expr) -> Self {
        Expr::UnaryOp {
            op,
            operand: Box::new(operand),
        }
    }

    pub fn bool_op(op: BoolOperator, values: Vec<Expr>) -> Self {
        Expr::BoolOp { op, values }
    }

    /// Single-operator comparison.
    pub fn compare(left: Expr, op: CmpOperator, right: Expr) -> Self {
        Expr::Compare {
            left: Box::new(left),
            ops: vec![op],
            comparators: vec![right],
        }
    }

    pub fn compare_chain(left: Expr, ops: Vec<CmpOperator>, comparators: Vec<Expr>) -> Self {
        Expr::Compare {
            left: Box::new(left),
            ops,
            comparators,
        }
    }

    pub fn list(elts: Vec<Expr>) -> Self {
        Expr::List { elts }
    }

    pub fn tuple(elts: Vec<Expr>) -> Self {
        Expr::Tuple { elts }
    }

    pub fn dict(pairs: Vec<(Expr, Expr)>) -> Self {
        let (keys, values) = pairs.into_iter().map(|(k, v)| (Some(k), v)).unzip();
        Expr::Dict { keys, values }
    }

    pub fn subscript(value: Expr, index: Expr) -> Self {
        Expr::Subscript {
            value: Box::new(value),
            slice: Box::new(index),
        }
    }

    pub fn slice(lower: Option<Expr>, upper: Option<Expr>, step: Option<Expr>) -> Self {
        Expr::Slice {
            lower: lower.map(Box::new),
            upper: upper.map(Box::new),
            step: step.map(Box::new),
        }
    }

    pub fn call(func: Expr, args: Vec<Expr>) -> Self {
        Expr::Call {
            func: Box::new(func),
            args,
            keywords: Vec::new(),
        }
    }

    pub fn call_with_keywords(func: Expr, args: Vec<Expr>, keywords: Vec<Keyword>) -> Self {
        Expr::Call {
            func: Box::new(func),
            args,
            keywords,
        }
    }

    pub fn list_comp(elt: Expr, generators: Vec<Comprehension>) -> Self {
        Expr::ListComp {
            elt: Box::new(elt),
            generators,
        }
    }
}

impl Arguments {
    /// Plain positional parameters, no defaults.
    pub fn positional<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            args: names.into_iter().map(Arg::new).collect(),
            ..Self::default()
        }
    }

    pub fn with_defaults(mut self, defaults: Vec<Expr>) -> Self {
        self.defaults = defaults;
        self
    }

    pub fn with_vararg(mut self, name: impl Into<String>) -> Self {
        self.vararg = Some(Arg::new(name));
        self
    }
}

impl Arg {
    pub fn new(arg: impl Into<String>) -> Self {
        Self { arg: arg.into() }
    }
}

impl Keyword {
    pub fn new(arg: impl Into<String>, value: Expr) -> Self {
        Self {
            arg: Some(arg.into()),
            value,
        }
    }
}

impl Comprehension {
    pub fn new(target: Expr, iter: Expr, ifs: Vec<Expr>) -> Self {
        Self {
            target,
            iter,
            ifs,
            is_async: false,
        }
    }
}

impl ExceptHandler {
    pub fn new(exception: Option<Expr>, name: Option<&str>, body: Vec<Stmt>) -> Self {
        Self {
            exception,
            name: name.map(str::to_string),
            body,
        }
    }
}

/// Decode `source`, first rejecting integer literals outside the `i64`
/// range. serde_json reads those as floats, which would round them.
fn decode<T: DeserializeOwned>(source: &str) -> Result<T, ReadError> {
    if let Some(literal) = out_of_range_integer(source) {
        return Err(ReadError::IntegerOutOfRange(literal.to_string()));
    }
    Ok(serde_json::from_str(source)?)
}

/// First integer token outside string literals that does not fit in `i64`.
fn out_of_range_integer(source: &str) -> Option<&str> {
    let bytes = source.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'"' => {
                i += 1;
                while i < bytes.len() && bytes[i] != b'"' {
                    if bytes[i] == b'\\' {
                        i += 1;
                    }
                    i += 1;
                }
                i += 1;
            }
            b'-' | b'0'..=b'9' => {
                let start = i;
                while i < bytes.len()
                    && matches!(bytes[i], b'0'..=b'9' | b'-' | b'+' | b'.' | b'e' | b'E')
                {
                    i += 1;
                }
                let token = &source[start..i];
                let digits = token.strip_prefix('-').unwrap_or(token);
                let integer = !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit());
                if integer && token.parse::<i64>().is_err() {
                    return Some(token);
                }
            }
            _ => i += 1,
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_assignment() {
        let stmt = Stmt::from_json(
            r#"{"kind": "Assign",
                "targets": [{"kind": "Name", "id": "x"}],
                "value": {"kind": "Constant", "value": 1}}"#,
        )
        .unwrap();
        assert_eq!(stmt, Stmt::assign(Expr::name("x"), Expr::int(1)));
    }

    #[test]
    fn test_decode_literals() {
        let cases = [
            ("null", Literal::None),
            ("true", Literal::Bool(true)),
            ("42", Literal::Int(42)),
            ("2.5", Literal::Float(2.5)),
            (r#""hi""#, Literal::Str("hi".into())),
        ];
        for (json, expected) in cases {
            let expr =
                Expr::from_json(&format!(r#"{{"kind": "Constant", "value": {json}}}"#)).unwrap();
            assert_eq!(expr, Expr::Constant { value: expected });
        }
    }

    #[test]
    fn test_unknown_kind_decodes_to_unrecognized() {
        let expr = Expr::from_json(r#"{"kind": "TemplateStr", "values": []}"#).unwrap();
        assert_eq!(expr, Expr::Unrecognized(UnknownNode::new("TemplateStr")));
        assert_eq!(expr.kind(), "TemplateStr");

        let stmt = Stmt::from_json(r#"{"kind": "Match", "subject": null}"#).unwrap();
        assert_eq!(stmt, Stmt::Unrecognized(UnknownNode::new("Match")));
        assert_eq!(stmt.kind(), "Match");
    }

    #[test]
    fn test_known_kind_with_bad_fields_is_an_error() {
        assert!(Stmt::from_json(r#"{"kind": "Assign"}"#).is_err());
        assert!(Expr::from_json(r#"{"kind": "Name", "id": 3}"#).is_err());
    }

    #[test]
    fn test_unknown_node_keeps_its_tag_when_encoded() {
        let stmt = Stmt::Unrecognized(UnknownNode::new("TypeAlias"));
        assert_eq!(
            serde_json::to_string(&stmt).unwrap(),
            r#"{"kind":"TypeAlias"}"#
        );
    }

    #[test]
    fn test_kind_lists_match_kind_names() {
        for kind in Stmt::KINDS {
            let stmt = Stmt::from_json(&format!(r#"{{"kind": "{kind}"}}"#));
            assert!(!matches!(stmt, Ok(Stmt::Unrecognized(_))), "{kind}");
        }
        assert!(Stmt::KINDS.contains(&Stmt::Pass.kind()));
        assert!(Expr::KINDS.contains(&Expr::int(1).kind()));
    }

    #[test]
    fn test_integer_literals_at_the_i64_edge() {
        let max = Expr::from_json(r#"{"kind": "Constant", "value": 9223372036854775807}"#);
        assert_eq!(max.unwrap(), Expr::int(i64::MAX));
        let min = Expr::from_json(r#"{"kind": "Constant", "value": -9223372036854775808}"#);
        assert_eq!(min.unwrap(), Expr::int(i64::MIN));

        for literal in ["9223372036854775808", "18446744073709551616", "-9223372036854775809"] {
            let err = Expr::from_json(&format!(r#"{{"kind": "Constant", "value": {literal}}}"#))
                .unwrap_err();
            assert!(
                matches!(&err, ReadError::IntegerOutOfRange(text) if text == literal),
                "{literal}: {err}"
            );
        }
    }

    #[test]
    fn test_digits_inside_strings_and_floats_are_not_integers() {
        let expr = Expr::from_json(
            r#"{"kind": "Call", "func": {"kind": "Name", "id": "f"},
                "args": [{"kind": "Constant", "value": "18446744073709551616 \" 99999999999999999999"},
                         {"kind": "Constant", "value": 1.8e19}]}"#,
        )
        .unwrap();
        assert_eq!(
            expr,
            Expr::call(
                Expr::name("f"),
                vec![
                    Expr::string("18446744073709551616 \" 99999999999999999999"),
                    Expr::float(1.8e19),
                ],
            )
        );
    }

    #[test]
    fn test_optional_fields_default() {
        let stmt = Stmt::from_json(
            r#"{"kind": "If", "test": {"kind": "Name", "id": "x"}, "body": [{"kind": "Pass"}]}"#,
        )
        .unwrap();
        assert_eq!(stmt, Stmt::if_stmt(Expr::name("x"), vec![Stmt::Pass], vec![]));
    }

    #[test]
    fn test_except_handler_type_field() {
        let handler: ExceptHandler = serde_json::from_str(
            r#"{"type": {"kind": "Name", "id": "KeyError"}, "name": "e", "body": []}"#,
        )
        .unwrap();
        assert_eq!(handler.exception, Some(Expr::name("KeyError")));
        assert_eq!(handler.name.as_deref(), Some("e"));
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(Expr::int(1).kind(), "Constant");
        assert_eq!(Stmt::Pass.kind(), "Pass");
        assert_eq!(
            Expr::list_comp(Expr::name("x"), vec![]).kind(),
            "ListComp"
        );
    }
}
