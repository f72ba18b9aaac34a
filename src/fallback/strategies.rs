use crate::{
    ast::{Expression, LambdaExpr, MethodCallExpr},
    fallback::{Result, Strategy},
    translator,
};

/// Strategy 1: translate the tree exactly as written.
pub struct FaithfulStrategy;

impl Strategy for FaithfulStrategy {
    fn name(&self) -> &'static str {
        "faithful"
    }

    fn simplify(&self, map: Expression) -> Result<Expression> {
        Ok(map)
    }
}

/// Strategy 2: drop outer-chain calls the translator cannot classify,
/// splicing each offending call out of the chain by replacing it with its
/// receiver. The translation then fails on its own terms if nothing
/// classifiable remains.
pub struct ElideUnsupportedStrategy;

impl Strategy for ElideUnsupportedStrategy {
    fn name(&self) -> &'static str {
        "elide-unsupported"
    }

    fn simplify(&self, map: Expression) -> Result<Expression> {
        match map {
            Expression::Lambda(LambdaExpr { params, body }) => {
                Ok(Expression::Lambda(LambdaExpr {
                    params,
                    body: Box::new(elide_chain(*body)),
                }))
            }
            other => Ok(other),
        }
    }
}

/// Iteratively rebuilds the outer call chain, keeping only supported calls.
fn elide_chain(body: Expression) -> Expression {
    // Unroll the chain spine without recursion, then rebuild it from the
    // root keeping the supported calls in their original order.
    let mut calls = vec![];
    let mut current = body;
    loop {
        match current {
            Expression::MethodCall(MethodCallExpr {
                receiver,
                method,
                args,
            }) => {
                calls.push((method, args));
                current = *receiver;
            }
            other => {
                current = other;
                break;
            }
        }
    }

    let mut rebuilt = current;
    for (method, args) in calls.into_iter().rev() {
        if translator::is_supported_call(&method, &args) {
            rebuilt = Expression::MethodCall(MethodCallExpr {
                receiver: Box::new(rebuilt),
                method,
                args,
            });
        }
    }
    rebuilt
}

/// Strategy 3: degrade to the simplest pass-through projection. Requires
/// only that the tree is a lambda over the document sequence; anything less
/// has no compilable form at all.
pub struct PassThroughProjectionStrategy;

impl Strategy for PassThroughProjectionStrategy {
    fn name(&self) -> &'static str {
        "pass-through-projection"
    }

    fn simplify(&self, map: Expression) -> Result<Expression> {
        match map {
            Expression::Lambda(LambdaExpr { params, .. }) if params.len() == 1 => {
                let source = params[0].clone();
                let body = Expression::call(
                    Expression::parameter(source),
                    "Select",
                    vec![Expression::lambda(vec!["doc"], Expression::parameter("doc"))],
                );
                Ok(Expression::Lambda(LambdaExpr {
                    params,
                    body: Box::new(body),
                }))
            }
            // Not a map lambda; pass it through so the translator reports it
            // and the final diagnostic names the real problem.
            other => Ok(other),
        }
    }
}
