use crate::ast;

/// A visitor over the expression tree. Every method defaults to walking the
/// node, so implementations only override the nodes they care about.
pub trait Visitor: Sized {
    fn visit_expression(&mut self, node: ast::Expression) -> ast::Expression {
        node.walk(self)
    }
    fn visit_lambda_expr(&mut self, node: ast::LambdaExpr) -> ast::LambdaExpr {
        node.walk(self)
    }
    fn visit_member_access_expr(&mut self, node: ast::MemberAccessExpr) -> ast::MemberAccessExpr {
        node.walk(self)
    }
    fn visit_method_call_expr(&mut self, node: ast::MethodCallExpr) -> ast::MethodCallExpr {
        node.walk(self)
    }
    fn visit_object_field(&mut self, node: ast::ObjectField) -> ast::ObjectField {
        node.walk(self)
    }
    fn visit_literal_value(&mut self, node: ast::LiteralValue) -> ast::LiteralValue {
        node.walk(self)
    }
}
