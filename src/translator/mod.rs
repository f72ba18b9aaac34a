use crate::ast::Expression;
use thiserror::Error;

mod stages;
pub(crate) use stages::is_supported_call;


pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum Error {
    #[error("map expression must be a lambda over the document sequence")]
    NotAMapLambda,
    #[error("pipeline must be rooted in the map parameter '{0}'")]
    ChainNotRootedInSource(String),
    #[error("cannot classify method '{0}' as a pipeline operator")]
    UnknownOperator(String),
    #[error("operator '{0}' expects lambda arguments")]
    NonLambdaArgument(String),
    #[error("operator '{0}' has an unsupported argument shape")]
    UnsupportedShape(String),
    #[error("map expression contains no pipeline operators")]
    EmptyPipeline,
}

/// The prefix synthetic transparent-identifier names are generated under.
pub const TRANSPARENT_IDENTIFIER_PREFIX: &str = "__h__TransparentIdentifier";

/// One classified operator application in the compiled pipeline.
#[derive(PartialEq, Debug, Clone)]
pub enum Stage {
    Unary(UnaryStage),
    Flatten(FlattenStage),
}

/// A stage with a single one-parameter lambda, `.Op(param => body)`.
#[derive(PartialEq, Debug, Clone)]
pub struct UnaryStage {
    pub operator: String,
    pub param: String,
    pub body: Expression,
}

/// A two-lambda flattening stage,
/// `.Op(param => collection, (param, child_param) => result)`.
#[derive(PartialEq, Debug, Clone)]
pub struct FlattenStage {
    pub operator: String,
    pub param: String,
    pub collection: Expression,
    pub result_params: (String, String),
    pub result_body: Expression,
}

/// Walks the outer method-call chain of a (rewritten) map lambda and
/// classifies each call into one Stage, synthesizing transparent-identifier
/// names for binding stages. All state is local to the call.
pub fn translate_stages(map: Expression) -> Result<Vec<Stage>> {
    stages::StageTranslator::new(&map).translate(map)
}
