use crate::{
    ast, codegen, options::MapConventions, rewrites, translator, util, TranslationResult,
};
use thiserror::Error;
use tracing::{debug, warn};

mod strategies;
use strategies::{ElideUnsupportedStrategy, FaithfulStrategy, PassThroughProjectionStrategy};


pub type Result<T> = std::result::Result<T, Error>;

/// Errors a single strategy attempt can fail with. All of them are
/// recoverable inside the controller: they advance to the next strategy and
/// only the last attempt's error escapes, as the final diagnostic.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum Error {
    #[error("unsupported construct: {0}")]
    UnsupportedConstruct(#[from] translator::Error),
    #[error("ambiguous root reference: {0}")]
    AmbiguousRootReference(#[from] rewrites::Error),
    #[error("{0}")]
    RecursionLimit(#[from] util::Error),
    #[error("codegen error: {0}")]
    Codegen(#[from] codegen::Error),
}

/// A single attempt policy in the fallback sequence. Strategies simplify the
/// input tree before the common rewrite/translate/emit pipeline runs on it.
pub trait Strategy {
    fn name(&self) -> &'static str;
    fn simplify(&self, map: ast::Expression) -> Result<ast::Expression>;
}

/// Translates a map expression, trying each strategy in order from most
/// faithful to most aggressive and returning the first success. Developer
/// authored map expressions are loosely constrained, so index creation
/// degrades gracefully instead of hard-failing on constructs that can be
/// reasonably approximated.
pub fn translate_with_fallback(
    map: ast::Expression,
    conventions: &MapConventions,
) -> TranslationResult {
    let strategies: Vec<&dyn Strategy> = vec![
        &FaithfulStrategy,
        &ElideUnsupportedStrategy,
        &PassThroughProjectionStrategy,
    ];

    let mut last_error = None;
    for strategy in strategies {
        debug!(strategy = strategy.name(), "attempting map translation");
        match try_strategy(strategy, map.clone(), conventions) {
            Ok(code) => {
                return TranslationResult {
                    code,
                    success: true,
                    diagnostic: None,
                }
            }
            Err(e) => {
                warn!(strategy = strategy.name(), error = %e, "strategy failed");
                last_error = Some(e);
            }
        }
    }

    TranslationResult {
        code: String::new(),
        success: false,
        diagnostic: last_error.map(|e| e.to_string()),
    }
}

fn try_strategy(
    strategy: &dyn Strategy,
    map: ast::Expression,
    conventions: &MapConventions,
) -> Result<String> {
    let map = strategy.simplify(map)?;
    // Each strategy re-checks its own, possibly simplified, input, so a
    // later strategy may succeed past the depth that failed an earlier one.
    util::check_depth(&map, util::MAX_EXPRESSION_DEPTH)?;
    let map = rewrites::rewrite_map(map, conventions)?;
    let stages = translator::translate_stages(map)?;
    Ok(codegen::generate_pipeline(
        &conventions.root_source_token,
        &stages,
    )?)
}
