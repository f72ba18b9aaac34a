use crate::{ast, options::MapConventions};
use thiserror::Error;

mod identity;
pub use identity::IdentityRewritePass;

#[cfg(test)]
mod test;

pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during rewrite passes
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum Error {
    #[error("parameter '{0}' shadows a name already in scope, so root references cannot be resolved unambiguously")]
    AmbiguousRootReference(String),
}

/// A fallible transformation that can be applied to a map expression
pub trait Pass {
    fn apply(&self, map: ast::Expression, conventions: &MapConventions) -> Result<ast::Expression>;
}

/// Rewrite the provided map expression by applying rewrite passes. Runs
/// before stage building.
pub fn rewrite_map(map: ast::Expression, conventions: &MapConventions) -> Result<ast::Expression> {
    let passes: Vec<&dyn Pass> = vec![&IdentityRewritePass];

    let mut rewritten = map;
    for pass in passes {
        rewritten = pass.apply(rewritten, conventions)?;
    }
    Ok(rewritten)
}
