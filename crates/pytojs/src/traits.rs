//! Traits for target-language writers.

use crate::ast::Module;
use crate::error::CodegenError;

/// A writer emits a source tree as code in a target language.
pub trait Writer: Send + Sync {
    /// Language identifier (e.g., "javascript").
    fn language(&self) -> &'static str;

    /// File extension for output (e.g., "js").
    fn extension(&self) -> &'static str;

    /// Emit the tree as source code.
    fn write(&self, module: &Module) -> Result<String, CodegenError>;
}
