//! Names the generated program expects its environment to provide.
//!
//! The writer does not implement any of these; it only emits calls in the
//! shapes below:
//!
//! - `$$In$$(needle, haystack)`: membership test, truthy when `needle` is
//!   contained in `haystack`.
//! - `Math.pow(base, exponent)` and `Math.floor(value)`.
//!
//! The error binding is not a helper but a reserved identifier: every
//! translated `catch` clause binds the caught value to it, and handler
//! bodies alias it to the source-level name.

/// Two-argument membership test function.
pub const MEMBERSHIP_HELPER: &str = "$$In$$";

/// Namespace exposing `pow` and `floor`.
pub const MATH_NAMESPACE: &str = "Math";

/// Identifier bound by every generated `catch` clause.
pub const ERROR_BINDING: &str = "$$py_error$$";

/// `needle in haystack`
pub fn membership_test(needle: &str, haystack: &str) -> String {
    format!("{MEMBERSHIP_HELPER}({needle}, {haystack})")
}

/// `base ** exponent`
pub fn power(base: &str, exponent: &str) -> String {
    format!("{MATH_NAMESPACE}.pow({base}, {exponent})")
}

/// `left // right`
pub fn floor_division(left: &str, right: &str) -> String {
    format!("{MATH_NAMESPACE}.floor({left} / {right})")
}

/// Completion flag guarding the `else` clause of the `index`-th `try`
/// statement in a translation.
pub(crate) fn else_flag(index: usize) -> String {
    format!("$$py_else_{index}$$")
}
