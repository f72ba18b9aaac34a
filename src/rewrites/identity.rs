use crate::{
    ast::{Expression, LambdaExpr, MemberAccessExpr, MethodCallExpr, ObjectField},
    options::MapConventions,
    rewrites::{Error, Pass, Result},
    scope::{Binding, Scope},
};

/// Rewrites member accesses on the identity property of the root document
/// element into the reserved internal field name. Only accesses that resolve
/// through the scope stack to the original outer sequence element are
/// rewritten: a flattened child introduced by a `SelectMany`-style operator
/// is not a stored document and its identity member is left untouched, as is
/// any access reached by navigating into a nested object. Transparent
/// identifier bindings carry root-ness forward, so `ti.n.Id` is rewritten
/// when the carried `n` is the root element.
pub struct IdentityRewritePass;

impl Pass for IdentityRewritePass {
    fn apply(&self, map: Expression, conventions: &MapConventions) -> Result<Expression> {
        match map {
            Expression::Lambda(LambdaExpr { params, body }) if params.len() == 1 => {
                let mut rewriter = IdentityRewriter { conventions };
                let source_param = params[0].clone();
                let (body, _) = rewriter.rewrite_chain(*body, &source_param)?;
                Ok(Expression::Lambda(LambdaExpr {
                    params,
                    body: Box::new(body),
                }))
            }
            // Trees that are not a single-parameter lambda carry no root
            // element to rewrite; the stage translator rejects them.
            other => Ok(other),
        }
    }
}

struct IdentityRewriter<'a> {
    conventions: &'a MapConventions,
}

impl IdentityRewriter<'_> {
    /// Walks the outer operator chain bottom-up, tracking the binding kind of
    /// the current sequence element, and rewrites each operator's lambda
    /// bodies under the scope that operator opens. Returns the rewritten node
    /// together with the element binding of the sequence it denotes.
    fn rewrite_chain(
        &mut self,
        expr: Expression,
        source_param: &str,
    ) -> Result<(Expression, Binding)> {
        match expr {
            Expression::Parameter(ref p) if p == source_param => Ok((expr, Binding::Root)),
            Expression::MethodCall(MethodCallExpr {
                receiver,
                method,
                args,
            }) => {
                let (receiver, element) = self.rewrite_chain(*receiver, source_param)?;
                let (args, out_element) = self.rewrite_call_args(&method, args, &element)?;
                Ok((
                    Expression::MethodCall(MethodCallExpr {
                        receiver: Box::new(receiver),
                        method,
                        args,
                    }),
                    out_element,
                ))
            }
            other => {
                // Not part of a recognizable chain; rewrite conservatively
                // with nothing in scope.
                let mut scope = Scope::new();
                Ok((self.rewrite_expr(other, &mut scope)?, Binding::Plain))
            }
        }
    }

    fn rewrite_call_args(
        &mut self,
        method: &str,
        args: Vec<Expression>,
        element: &Binding,
    ) -> Result<(Vec<Expression>, Binding)> {
        // Flattening form: collection selector over the current element,
        // then a result selector over (current element, flattened child).
        // The flattened child becomes the new root of the scope downstream
        // but is never an identity-rewrite target.
        if method == "SelectMany" && args.len() == 2 {
            let mut args = args.into_iter();
            let collection =
                self.rewrite_operator_lambda(args.next().unwrap(), &[element.clone()])?;
            let result = args.next().unwrap();
            let out_element = result_element_of(&result, element);
            let result =
                self.rewrite_operator_lambda(result, &[element.clone(), Binding::Plain])?;
            return Ok((vec![collection, result], out_element));
        }

        match method {
            // Projecting operators replace the element with their body's
            // shape.
            "Select" | "GroupBy" | "SelectMany" => {
                let out_element = args
                    .first()
                    .map(|a| result_element_of(a, element))
                    .unwrap_or(Binding::Plain);
                let args = args
                    .into_iter()
                    .map(|a| self.rewrite_operator_lambda(a, &[element.clone()]))
                    .collect::<Result<Vec<_>>>()?;
                let out_element = if method == "SelectMany" {
                    // Single-lambda flattening yields the child element.
                    Binding::Plain
                } else {
                    out_element
                };
                Ok((args, out_element))
            }
            // Non-projecting operators pass the element through unchanged.
            "Where" | "OrderBy" | "OrderByDescending" | "ThenBy" | "ThenByDescending" => {
                let args = args
                    .into_iter()
                    .map(|a| self.rewrite_operator_lambda(a, &[element.clone()]))
                    .collect::<Result<Vec<_>>>()?;
                Ok((args, element.clone()))
            }
            // Unknown operators still get their bodies rewritten so a later
            // elision strategy works over a consistently rewritten tree, but
            // nothing is assumed about their element shape.
            _ => {
                let args = args
                    .into_iter()
                    .map(|a| self.rewrite_operator_lambda(a, &[element.clone()]))
                    .collect::<Result<Vec<_>>>()?;
                Ok((args, Binding::Plain))
            }
        }
    }

    /// Rewrites one operator argument. Lambda arguments open a fresh scope
    /// binding their parameters positionally to `param_bindings`; any other
    /// argument is rewritten with nothing in scope.
    fn rewrite_operator_lambda(
        &mut self,
        arg: Expression,
        param_bindings: &[Binding],
    ) -> Result<Expression> {
        match arg {
            Expression::Lambda(LambdaExpr { params, body }) => {
                let mut scope = Scope::new();
                for (i, p) in params.iter().enumerate() {
                    let binding = param_bindings.get(i).cloned().unwrap_or(Binding::Plain);
                    scope.push(p.clone(), binding);
                }
                let body = self.rewrite_expr(*body, &mut scope)?;
                Ok(Expression::Lambda(LambdaExpr {
                    params,
                    body: Box::new(body),
                }))
            }
            other => {
                let mut scope = Scope::new();
                self.rewrite_expr(other, &mut scope)
            }
        }
    }

    fn rewrite_expr(&mut self, expr: Expression, scope: &mut Scope) -> Result<Expression> {
        match expr {
            Expression::MemberAccess(MemberAccessExpr { target, name }) => {
                let target = self.rewrite_expr(*target, scope)?;
                let name = if name == self.conventions.identity_member_name
                    && resolves_to_root(&target, scope)
                {
                    self.conventions.internal_field_name.clone()
                } else {
                    name
                };
                Ok(Expression::MemberAccess(MemberAccessExpr {
                    target: Box::new(target),
                    name,
                }))
            }
            Expression::Lambda(LambdaExpr { params, body }) => {
                for p in &params {
                    if scope.contains(p) {
                        return Err(Error::AmbiguousRootReference(p.clone()));
                    }
                }
                let mark = scope.len();
                for p in &params {
                    scope.push(p.clone(), Binding::Plain);
                }
                let body = self.rewrite_expr(*body, scope)?;
                scope.truncate(mark);
                Ok(Expression::Lambda(LambdaExpr {
                    params,
                    body: Box::new(body),
                }))
            }
            Expression::MethodCall(MethodCallExpr {
                receiver,
                method,
                args,
            }) => {
                let receiver = self.rewrite_expr(*receiver, scope)?;
                let args = args
                    .into_iter()
                    .map(|a| self.rewrite_expr(a, scope))
                    .collect::<Result<Vec<_>>>()?;
                Ok(Expression::MethodCall(MethodCallExpr {
                    receiver: Box::new(receiver),
                    method,
                    args,
                }))
            }
            Expression::NewObject(fields) => Ok(Expression::NewObject(
                fields
                    .into_iter()
                    .map(|f| {
                        Ok(ObjectField {
                            name: f.name,
                            value: self.rewrite_expr(f.value, scope)?,
                        })
                    })
                    .collect::<Result<Vec<_>>>()?,
            )),
            Expression::ArrayLiteral(elements) => Ok(Expression::ArrayLiteral(
                elements
                    .into_iter()
                    .map(|e| self.rewrite_expr(e, scope))
                    .collect::<Result<Vec<_>>>()?,
            )),
            Expression::Parameter(_) | Expression::Constant(_) => Ok(expr),
        }
    }
}

/// Resolves the binding an expression denotes, if any: a parameter resolves
/// through the scope stack, and a member access resolves through a
/// transparent binding's carried names. Anything else (including a member of
/// a plain or root binding) denotes a nested value, never the root.
fn binding_of<'a>(expr: &Expression, scope: &'a Scope) -> Option<&'a Binding> {
    match expr {
        Expression::Parameter(p) => scope.get(p),
        Expression::MemberAccess(m) => binding_of(&m.target, scope)?.member(&m.name),
        _ => None,
    }
}

fn resolves_to_root(expr: &Expression, scope: &Scope) -> bool {
    matches!(binding_of(expr, scope), Some(Binding::Root))
}

/// Computes the element binding a projecting operator's lambda produces. A
/// body that wraps a lambda parameter under its own name (the shape
/// query-syntax `let` and multi-`from` clauses compile into) produces a
/// transparent binding carrying each self-named parameter's binding forward.
fn result_element_of(arg: &Expression, element: &Binding) -> Binding {
    let Expression::Lambda(LambdaExpr { params, body }) = arg else {
        return Binding::Plain;
    };
    let Expression::NewObject(fields) = body.as_ref() else {
        return Binding::Plain;
    };
    let binding_for = |name: &str, value: &Expression| -> Binding {
        match value {
            Expression::Parameter(p) if p == name && params.contains(p) => {
                if params.first() == Some(p) {
                    element.clone()
                } else {
                    Binding::Plain
                }
            }
            _ => Binding::Plain,
        }
    };
    let is_wrap = fields.iter().any(|f| {
        matches!(&f.value, Expression::Parameter(p) if *p == f.name && params.contains(p))
    });
    if !is_wrap || fields.is_empty() {
        return Binding::Plain;
    }
    Binding::Transparent(
        fields
            .iter()
            .map(|f| (f.name.clone(), binding_for(&f.name, &f.value)))
            .collect(),
    )
}
