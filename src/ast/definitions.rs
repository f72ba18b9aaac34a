/// Builds an ordered list of [`ObjectField`]s for a `NewObject` expression.
#[macro_export]
macro_rules! fields {
	($($key:expr => $val:expr),* $(,)?) => {
		vec![
			$($crate::ast::ObjectField {
                            name: $key.to_string(),
                            value: $val,
                        },)*
		]
	};
}

#[derive(PartialEq, Debug, Clone)]
pub enum Expression {
    Lambda(LambdaExpr),
    MemberAccess(MemberAccessExpr),
    MethodCall(MethodCallExpr),
    NewObject(Vec<ObjectField>),
    ArrayLiteral(Vec<Expression>),
    Parameter(String),
    Constant(LiteralValue),
}

#[derive(PartialEq, Debug, Clone)]
pub struct LambdaExpr {
    pub params: Vec<String>,
    pub body: Box<Expression>,
}

#[derive(PartialEq, Debug, Clone)]
pub struct MemberAccessExpr {
    pub target: Box<Expression>,
    pub name: String,
}

#[derive(PartialEq, Debug, Clone)]
pub struct MethodCallExpr {
    pub receiver: Box<Expression>,
    pub method: String,
    pub args: Vec<Expression>,
}

#[derive(PartialEq, Debug, Clone)]
pub struct ObjectField {
    pub name: String,
    pub value: Expression,
}

#[derive(PartialEq, Debug, Clone)]
pub enum LiteralValue {
    Null,
    Boolean(bool),
    Integer(i32),
    Long(i64),
    // Doubles carry their source rendering so emission never depends on
    // float formatting.
    Double(String),
    String(String),
}

impl Expression {
    pub fn parameter(name: impl Into<String>) -> Expression {
        Expression::Parameter(name.into())
    }

    pub fn member(target: Expression, name: impl Into<String>) -> Expression {
        Expression::MemberAccess(MemberAccessExpr {
            target: Box::new(target),
            name: name.into(),
        })
    }

    pub fn call(
        receiver: Expression,
        method: impl Into<String>,
        args: Vec<Expression>,
    ) -> Expression {
        Expression::MethodCall(MethodCallExpr {
            receiver: Box::new(receiver),
            method: method.into(),
            args,
        })
    }

    pub fn lambda<P: Into<String>>(params: Vec<P>, body: Expression) -> Expression {
        Expression::Lambda(LambdaExpr {
            params: params.into_iter().map(Into::into).collect(),
            body: Box::new(body),
        })
    }

    pub fn object(fields: Vec<ObjectField>) -> Expression {
        Expression::NewObject(fields)
    }

    pub fn array(elements: Vec<Expression>) -> Expression {
        Expression::ArrayLiteral(elements)
    }
}
