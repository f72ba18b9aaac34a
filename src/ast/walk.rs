use crate::ast::{visitor::Visitor, *};

impl Expression {
    pub fn walk<V>(self, visitor: &mut V) -> Self
    where
        V: Visitor,
    {
        match self {
            Expression::Lambda(l) => Expression::Lambda(visitor.visit_lambda_expr(l)),
            Expression::MemberAccess(m) => {
                Expression::MemberAccess(visitor.visit_member_access_expr(m))
            }
            Expression::MethodCall(c) => Expression::MethodCall(visitor.visit_method_call_expr(c)),
            Expression::NewObject(fields) => Expression::NewObject(
                fields
                    .into_iter()
                    .map(|f| visitor.visit_object_field(f))
                    .collect(),
            ),
            Expression::ArrayLiteral(elements) => Expression::ArrayLiteral(
                elements
                    .into_iter()
                    .map(|e| visitor.visit_expression(e))
                    .collect(),
            ),
            Expression::Parameter(p) => Expression::Parameter(p),
            Expression::Constant(v) => Expression::Constant(visitor.visit_literal_value(v)),
        }
    }
}

impl LambdaExpr {
    pub fn walk<V>(self, visitor: &mut V) -> Self
    where
        V: Visitor,
    {
        LambdaExpr {
            params: self.params,
            body: Box::new(visitor.visit_expression(*self.body)),
        }
    }
}

impl MemberAccessExpr {
    pub fn walk<V>(self, visitor: &mut V) -> Self
    where
        V: Visitor,
    {
        MemberAccessExpr {
            target: Box::new(visitor.visit_expression(*self.target)),
            name: self.name,
        }
    }
}

impl MethodCallExpr {
    pub fn walk<V>(self, visitor: &mut V) -> Self
    where
        V: Visitor,
    {
        MethodCallExpr {
            receiver: Box::new(visitor.visit_expression(*self.receiver)),
            method: self.method,
            args: self
                .args
                .into_iter()
                .map(|a| visitor.visit_expression(a))
                .collect(),
        }
    }
}

impl ObjectField {
    pub fn walk<V>(self, visitor: &mut V) -> Self
    where
        V: Visitor,
    {
        ObjectField {
            name: self.name,
            value: visitor.visit_expression(self.value),
        }
    }
}

impl LiteralValue {
    pub fn walk<V>(self, _visitor: &mut V) -> Self
    where
        V: Visitor,
    {
        self
    }
}
