pub mod ast;
pub mod catalog;
mod codegen;
mod fallback;
pub mod options;
pub mod result;
mod rewrites;
mod scope;
mod translator;
mod util;

pub use translator::TRANSPARENT_IDENTIFIER_PREFIX;

use crate::{options::MapConventions, result::Result};
use serde::{Deserialize, Serialize};

/// The outcome of compiling one map expression: the emitted pipeline text,
/// whether translation succeeded, and the diagnostic from the last attempted
/// fallback strategy when it did not. Immutable once returned; the compiler
/// holds no state across calls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationResult {
    pub code: String,
    pub success: bool,
    pub diagnostic: Option<String>,
}

/// Compiles a map expression into pipeline text, degrading through the
/// fallback strategies as needed. Always returns a `TranslationResult`; on
/// exhaustion it carries `success = false` and the last strategy's
/// diagnostic.
pub fn compile_map(map: ast::Expression, conventions: &MapConventions) -> TranslationResult {
    // rewrite identity accesses, build stages, and emit text, retrying with
    // progressively simplified trees on failure
    fallback::translate_with_fallback(map, conventions)
}

/// Compiles a map expression, surfacing exhaustion as a hard error so
/// callers reject index-definition creation atomically.
pub fn translate_map(
    map: ast::Expression,
    conventions: &MapConventions,
) -> Result<TranslationResult> {
    let translation = compile_map(map, conventions);
    if !translation.success {
        return Err(result::Error::CompilationFailed(
            translation.diagnostic.unwrap_or_default(),
        ));
    }
    Ok(translation)
}
