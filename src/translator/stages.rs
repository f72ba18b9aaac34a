use crate::{
    ast::{visitor::Visitor, Expression, LambdaExpr, MethodCallExpr},
    translator::{
        Error, FlattenStage, Result, Stage, UnaryStage, TRANSPARENT_IDENTIFIER_PREFIX,
    },
    util,
};
use std::collections::BTreeSet;

const KNOWN_OPERATORS: &[&str] = &[
    "Select",
    "SelectMany",
    "Where",
    "OrderBy",
    "OrderByDescending",
    "ThenBy",
    "ThenByDescending",
    "GroupBy",
];

/// Operators that pass the current element through unchanged, so a
/// transparent binding stays active across them.
const PASSTHROUGH_OPERATORS: &[&str] = &[
    "Where",
    "OrderBy",
    "OrderByDescending",
    "ThenBy",
    "ThenByDescending",
];

/// Whether a chain call has a shape the translator can classify as a stage.
/// The elision fallback strategy uses this to decide which calls to drop.
pub(crate) fn is_supported_call(method: &str, args: &[Expression]) -> bool {
    if !KNOWN_OPERATORS.contains(&method) {
        return false;
    }
    match args {
        [Expression::Lambda(l)] => l.params.len() == 1,
        [Expression::Lambda(c), Expression::Lambda(r)] => {
            method == "SelectMany" && c.params.len() == 1 && r.params.len() == 2
        }
        _ => false,
    }
}

/// The binding kind of the current sequence element between stages.
enum ElementBinding {
    Normal,
    Transparent(String),
}

pub(crate) struct StageTranslator {
    // Every name already present in the source tree plus every synthetic
    // name allocated so far; consulted so generated names never collide.
    used_names: BTreeSet<String>,
}

impl StageTranslator {
    pub(crate) fn new(map: &Expression) -> Self {
        StageTranslator {
            used_names: util::collect_parameter_names(map),
        }
    }

    pub(crate) fn translate(mut self, map: Expression) -> Result<Vec<Stage>> {
        let Expression::Lambda(LambdaExpr { params, body }) = map else {
            return Err(Error::NotAMapLambda);
        };
        if params.len() != 1 {
            return Err(Error::NotAMapLambda);
        }
        let source_param = params[0].clone();

        let calls = unroll_chain(*body, &source_param)?;
        if calls.is_empty() {
            return Err(Error::EmptyPipeline);
        }

        let mut stages = Vec::with_capacity(calls.len());
        let mut element = ElementBinding::Normal;
        for (method, args) in calls {
            let (stage, introduces_binding) = self.build_stage(method, args, &element)?;
            element = if introduces_binding {
                ElementBinding::Transparent(self.allocate_synthetic_name())
            } else if matches!(&stage, Stage::Unary(u) if PASSTHROUGH_OPERATORS.contains(&u.operator.as_str()))
            {
                element
            } else {
                ElementBinding::Normal
            };
            stages.push(stage);
        }
        Ok(stages)
    }

    /// Classifies one chain call into a Stage, renaming its lambda
    /// parameters to the active synthetic name when the incoming element is
    /// a transparent binding. Returns the stage and whether it introduces a
    /// new transparent binding for downstream stages.
    fn build_stage(
        &mut self,
        method: String,
        mut args: Vec<Expression>,
        element: &ElementBinding,
    ) -> Result<(Stage, bool)> {
        if !KNOWN_OPERATORS.contains(&method.as_str()) {
            return Err(Error::UnknownOperator(method));
        }

        if args.len() == 1 {
            let lambda = match args.pop() {
                Some(Expression::Lambda(l)) => l,
                _ => return Err(Error::NonLambdaArgument(method)),
            };
            if lambda.params.len() != 1 {
                return Err(Error::UnsupportedShape(method));
            }
            // Detected before renaming, while the body's self-named wrap
            // fields still match the parameter name.
            let introduces_binding =
                method == "Select" && is_transparent_wrap(&lambda.params, &lambda.body);
            let (param, body) =
                self.apply_element_rename(lambda.params[0].clone(), *lambda.body, element);
            return Ok((
                Stage::Unary(UnaryStage {
                    operator: method,
                    param,
                    body,
                }),
                introduces_binding,
            ));
        }

        if method == "SelectMany" && args.len() == 2 {
            let (collection, result) = match (args.remove(0), args.remove(0)) {
                (Expression::Lambda(c), Expression::Lambda(r)) => (c, r),
                _ => return Err(Error::NonLambdaArgument(method)),
            };
            if collection.params.len() != 1 || result.params.len() != 2 {
                return Err(Error::UnsupportedShape(method));
            }
            let introduces_binding = is_transparent_wrap(&result.params, &result.body);
            let (param, collection_body) =
                self.apply_element_rename(collection.params[0].clone(), *collection.body, element);
            let (result_first, result_body) =
                self.apply_element_rename(result.params[0].clone(), *result.body, element);
            let child_param = result.params[1].clone();
            return Ok((
                Stage::Flatten(FlattenStage {
                    operator: method,
                    param,
                    collection: collection_body,
                    result_params: (result_first, child_param),
                    result_body,
                }),
                introduces_binding,
            ));
        }

        Err(Error::UnsupportedShape(method))
    }

    /// When the incoming element is a transparent binding, the stage's
    /// parameter and every reference to it route through the synthetic name.
    fn apply_element_rename(
        &self,
        param: String,
        body: Expression,
        element: &ElementBinding,
    ) -> (String, Expression) {
        match element {
            ElementBinding::Transparent(synthetic) => {
                let mut visitor = RenameParameterVisitor {
                    from: &param,
                    to: synthetic,
                };
                let body = visitor.visit_expression(body);
                (synthetic.clone(), body)
            }
            ElementBinding::Normal => (param, body),
        }
    }

    /// Picks the smallest integer suffix whose name is not already used in
    /// this compilation, which keeps generated names reproducible and
    /// collision-free.
    fn allocate_synthetic_name(&mut self) -> String {
        let mut n = 0usize;
        loop {
            let candidate = format!("{TRANSPARENT_IDENTIFIER_PREFIX}{n}");
            if !self.used_names.contains(&candidate) {
                self.used_names.insert(candidate.clone());
                return candidate;
            }
            n += 1;
        }
    }
}

fn unroll_chain(body: Expression, source_param: &str) -> Result<Vec<(String, Vec<Expression>)>> {
    let mut calls = vec![];
    let mut current = body;
    loop {
        match current {
            Expression::Parameter(ref p) if p == source_param => break,
            Expression::MethodCall(MethodCallExpr {
                receiver,
                method,
                args,
            }) => {
                calls.push((method, args));
                current = *receiver;
            }
            _ => return Err(Error::ChainNotRootedInSource(source_param.to_string())),
        }
    }
    calls.reverse();
    Ok(calls)
}

/// The shape query-syntax intermediate bindings compile into: an object that
/// wraps at least one lambda parameter under its own name.
fn is_transparent_wrap(params: &[String], body: &Expression) -> bool {
    let Expression::NewObject(fields) = body else {
        return false;
    };
    fields.iter().any(|f| {
        matches!(&f.value, Expression::Parameter(p) if *p == f.name && params.contains(p))
    })
}

struct RenameParameterVisitor<'a> {
    from: &'a str,
    to: &'a str,
}

impl Visitor for RenameParameterVisitor<'_> {
    fn visit_expression(&mut self, node: Expression) -> Expression {
        match node {
            Expression::Parameter(p) if p == self.from => {
                Expression::Parameter(self.to.to_string())
            }
            // A nested lambda that rebinds the name shadows it; stop there.
            Expression::Lambda(l) if l.params.iter().any(|p| p == self.from) => {
                Expression::Lambda(l)
            }
            other => other.walk(self),
        }
    }
}
