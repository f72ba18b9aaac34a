use crate::ast::Expression;
use std::collections::BTreeSet;
use thiserror::Error;

/// The deepest expression tree any pass will recurse into. Pathologically
/// nested trees are rejected up front instead of risking unbounded stack
/// growth in the recursive passes.
pub const MAX_EXPRESSION_DEPTH: usize = 512;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum Error {
    #[error("expression nesting exceeds the supported depth of {limit}")]
    RecursionLimitExceeded { limit: usize },
}

/// Checks that no path through the tree is deeper than `limit`. Uses an
/// explicit work stack so the check itself cannot overflow.
pub fn check_depth(expr: &Expression, limit: usize) -> Result<()> {
    let mut stack = vec![(expr, 1usize)];
    while let Some((node, depth)) = stack.pop() {
        if depth > limit {
            return Err(Error::RecursionLimitExceeded { limit });
        }
        match node {
            Expression::Lambda(l) => stack.push((l.body.as_ref(), depth + 1)),
            Expression::MemberAccess(m) => stack.push((m.target.as_ref(), depth + 1)),
            Expression::MethodCall(c) => {
                stack.push((c.receiver.as_ref(), depth + 1));
                for a in &c.args {
                    stack.push((a, depth + 1));
                }
            }
            Expression::NewObject(fields) => {
                for f in fields {
                    stack.push((&f.value, depth + 1));
                }
            }
            Expression::ArrayLiteral(elements) => {
                for e in elements {
                    stack.push((e, depth + 1));
                }
            }
            Expression::Parameter(_) | Expression::Constant(_) => {}
        }
    }
    Ok(())
}

/// Collects every parameter name bound or referenced anywhere in the tree.
/// Synthetic-name allocation consults this set so generated names never
/// collide with names the source already uses.
pub fn collect_parameter_names(expr: &Expression) -> BTreeSet<String> {
    let mut names = BTreeSet::new();
    let mut stack = vec![expr];
    while let Some(node) = stack.pop() {
        match node {
            Expression::Lambda(l) => {
                names.extend(l.params.iter().cloned());
                stack.push(l.body.as_ref());
            }
            Expression::MemberAccess(m) => stack.push(m.target.as_ref()),
            Expression::MethodCall(c) => {
                stack.push(c.receiver.as_ref());
                stack.extend(c.args.iter());
            }
            Expression::NewObject(fields) => stack.extend(fields.iter().map(|f| &f.value)),
            Expression::ArrayLiteral(elements) => stack.extend(elements.iter()),
            Expression::Parameter(p) => {
                names.insert(p.clone());
            }
            Expression::Constant(_) => {}
        }
    }
    names
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::ast::Expression;

    fn nested_member_chain(depth: usize) -> Expression {
        let mut expr = Expression::parameter("doc");
        for _ in 0..depth {
            expr = Expression::member(expr, "Parent");
        }
        expr
    }

    #[test]
    fn depth_within_limit_is_accepted() {
        let expr = nested_member_chain(MAX_EXPRESSION_DEPTH - 1);
        assert_eq!(Ok(()), check_depth(&expr, MAX_EXPRESSION_DEPTH));
    }

    #[test]
    fn depth_beyond_limit_is_rejected() {
        let expr = nested_member_chain(MAX_EXPRESSION_DEPTH + 10);
        assert_eq!(
            Err(Error::RecursionLimitExceeded {
                limit: MAX_EXPRESSION_DEPTH
            }),
            check_depth(&expr, MAX_EXPRESSION_DEPTH)
        );
    }

    #[test]
    fn collects_bound_and_referenced_names() {
        let expr = Expression::lambda(
            vec!["nests"],
            Expression::call(
                Expression::parameter("nests"),
                "Select",
                vec![Expression::lambda(
                    vec!["n"],
                    Expression::member(Expression::parameter("n"), "Id"),
                )],
            ),
        );
        let names = collect_parameter_names(&expr);
        assert!(names.contains("nests"));
        assert!(names.contains("n"));
    }
}
