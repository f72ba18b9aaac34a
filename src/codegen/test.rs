use crate::{
    ast::{Expression, LiteralValue},
    codegen::{generate_pipeline, Error},
    fields,
    translator::{FlattenStage, Stage, UnaryStage},
};

fn n() -> Expression {
    Expression::parameter("n")
}

fn select_stage(body: Expression) -> Stage {
    Stage::Unary(UnaryStage {
        operator: "Select".to_string(),
        param: "n".to_string(),
        body,
    })
}

#[test]
fn renders_unary_stage() {
    let stages = vec![select_stage(Expression::object(fields! {
        "Id" => Expression::member(n(), "__document_id"),
    }))];
    assert_eq!(
        Ok("docs\n\t.Select(n => new {Id = n.__document_id})".to_string()),
        generate_pipeline("docs", &stages)
    );
}

#[test]
fn renders_flatten_stage() {
    let stages = vec![Stage::Flatten(FlattenStage {
        operator: "SelectMany".to_string(),
        param: "n".to_string(),
        collection: Expression::member(n(), "Children"),
        result_params: ("n".to_string(), "c".to_string()),
        result_body: Expression::object(fields! {
            "Id" => Expression::member(Expression::parameter("c"), "Id"),
        }),
    })];
    assert_eq!(
        Ok("docs\n\t.SelectMany(n => n.Children, (n, c) => new {Id = c.Id})".to_string()),
        generate_pipeline("docs", &stages)
    );
}

#[test]
fn renders_object_members_in_declared_order() {
    let stages = vec![select_stage(Expression::object(fields! {
        "Zeta" => Expression::member(n(), "Zeta"),
        "Alpha" => Expression::member(n(), "Alpha"),
    }))];
    assert_eq!(
        Ok("docs\n\t.Select(n => new {Zeta = n.Zeta, Alpha = n.Alpha})".to_string()),
        generate_pipeline("docs", &stages)
    );
}

#[test]
fn renders_empty_object() {
    let stages = vec![select_stage(Expression::object(vec![]))];
    assert_eq!(
        Ok("docs\n\t.Select(n => new {})".to_string()),
        generate_pipeline("docs", &stages)
    );
}

#[test]
fn renders_array_literal() {
    let stages = vec![select_stage(Expression::array(vec![
        Expression::object(fields! { "Id" => Expression::member(n(), "Id") }),
        Expression::object(fields! { "Id" => Expression::member(n(), "Id") }),
    ]))];
    assert_eq!(
        Ok("docs\n\t.Select(n => new []{new {Id = n.Id}, new {Id = n.Id}})".to_string()),
        generate_pipeline("docs", &stages)
    );
}

#[test]
fn renders_nested_call_with_inner_lambda() {
    let stages = vec![select_stage(Expression::call(
        Expression::member(n(), "Children"),
        "Select",
        vec![Expression::lambda(
            vec!["c"],
            Expression::member(Expression::parameter("c"), "Name"),
        )],
    ))];
    assert_eq!(
        Ok("docs\n\t.Select(n => n.Children.Select(c => c.Name))".to_string()),
        generate_pipeline("docs", &stages)
    );
}

#[test]
fn renders_literals() {
    let stages = vec![select_stage(Expression::object(fields! {
        "A" => Expression::Constant(LiteralValue::Integer(1)),
        "B" => Expression::Constant(LiteralValue::Long(2)),
        "C" => Expression::Constant(LiteralValue::Double("1.5".to_string())),
        "D" => Expression::Constant(LiteralValue::Boolean(true)),
        "E" => Expression::Constant(LiteralValue::Null),
        "F" => Expression::Constant(LiteralValue::String("x\"y".to_string())),
    }))];
    assert_eq!(
        Ok(concat!(
            "docs\n\t.Select(n => new {A = 1, B = 2L, C = 1.5, ",
            "D = true, E = null, F = \"x\\\"y\"})"
        )
        .to_string()),
        generate_pipeline("docs", &stages)
    );
}

#[test]
fn rejects_invalid_identifier() {
    let stages = vec![select_stage(Expression::parameter("not an ident"))];
    assert_eq!(
        Err(Error::InvalidIdentifier("not an ident".to_string())),
        generate_pipeline("docs", &stages)
    );
}

#[test]
fn emission_is_repeatable() {
    let stages = vec![select_stage(Expression::object(fields! {
        "Id" => Expression::member(n(), "__document_id"),
        "Name" => Expression::member(n(), "Name"),
    }))];
    let first = generate_pipeline("docs", &stages).unwrap();
    for _ in 0..10 {
        assert_eq!(first, generate_pipeline("docs", &stages).unwrap());
    }
}
