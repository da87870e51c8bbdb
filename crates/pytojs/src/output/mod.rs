//! Output writers - emit source trees as target code.

pub mod javascript;

pub use javascript::{JAVASCRIPT_WRITER, JavaScriptWriter, JavaScriptWriterImpl};
