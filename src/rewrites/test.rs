use crate::{
    ast::Expression,
    fields,
    options::MapConventions,
    rewrites::{Error, IdentityRewritePass, Pass, Result},
};

macro_rules! test_rewrite {
    ($func_name:ident, expected = $expected:expr, input = $input:expr,) => {
        #[test]
        fn $func_name() {
            let conventions = MapConventions::default();
            let expected: Result<Expression> = $expected;
            let actual = IdentityRewritePass.apply($input, &conventions);
            assert_eq!(expected, actual);
        }
    };
}

fn n() -> Expression {
    Expression::parameter("n")
}

/// `nests => nests.Select(n => body)`
fn select_map(body: Expression) -> Expression {
    Expression::lambda(
        vec!["nests"],
        Expression::call(
            Expression::parameter("nests"),
            "Select",
            vec![Expression::lambda(vec!["n"], body)],
        ),
    )
}

/// `nests => nests.SelectMany(n => n.Children, (n, c) => body)`
fn select_many_map(body: Expression) -> Expression {
    Expression::lambda(
        vec!["nests"],
        Expression::call(
            Expression::parameter("nests"),
            "SelectMany",
            vec![
                Expression::lambda(vec!["n"], Expression::member(n(), "Children")),
                Expression::lambda(vec!["n", "c"], body),
            ],
        ),
    )
}

test_rewrite!(
    rewrites_identity_on_root,
    expected = Ok(select_map(Expression::object(fields! {
        "Id" => Expression::member(n(), "__document_id"),
    }))),
    input = select_map(Expression::object(fields! {
        "Id" => Expression::member(n(), "Id"),
    })),
);

test_rewrite!(
    leaves_flattened_child_identity_untouched,
    expected = Ok(select_many_map(Expression::object(fields! {
        "Id" => Expression::member(Expression::parameter("c"), "Id"),
    }))),
    input = select_many_map(Expression::object(fields! {
        "Id" => Expression::member(Expression::parameter("c"), "Id"),
    })),
);

test_rewrite!(
    rewrites_outer_reference_downstream_of_flattening,
    expected = Ok(select_many_map(Expression::object(fields! {
        "Id" => Expression::member(Expression::parameter("c"), "Id"),
        "Id2" => Expression::member(n(), "__document_id"),
    }))),
    input = select_many_map(Expression::object(fields! {
        "Id" => Expression::member(Expression::parameter("c"), "Id"),
        "Id2" => Expression::member(n(), "Id"),
    })),
);

test_rewrite!(
    leaves_nested_object_identity_untouched,
    expected = Ok(select_map(Expression::object(fields! {
        "Id" => Expression::member(Expression::member(n(), "Parent"), "Id"),
    }))),
    input = select_map(Expression::object(fields! {
        "Id" => Expression::member(Expression::member(n(), "Parent"), "Id"),
    })),
);

test_rewrite!(
    leaves_inner_lambda_parameter_untouched,
    expected = Ok(select_map(Expression::call(
        Expression::member(n(), "Children"),
        "Select",
        vec![Expression::lambda(
            vec!["c"],
            Expression::member(Expression::parameter("c"), "Id"),
        )],
    ))),
    input = select_map(Expression::call(
        Expression::member(n(), "Children"),
        "Select",
        vec![Expression::lambda(
            vec!["c"],
            Expression::member(Expression::parameter("c"), "Id"),
        )],
    )),
);

test_rewrite!(
    shadowing_parameter_is_ambiguous,
    expected = Err(Error::AmbiguousRootReference("n".to_string())),
    input = select_map(Expression::call(
        Expression::member(n(), "Children"),
        "Select",
        vec![Expression::lambda(vec!["n"], Expression::member(n(), "Id"))],
    )),
);

#[test]
fn root_survives_where_and_order_by() {
    let conventions = MapConventions::default();
    let chain = Expression::call(
        Expression::call(
            Expression::parameter("nests"),
            "Where",
            vec![Expression::lambda(vec!["n"], Expression::member(n(), "Active"))],
        ),
        "Select",
        vec![Expression::lambda(
            vec!["n"],
            Expression::object(fields! { "Id" => Expression::member(n(), "Id") }),
        )],
    );
    let input = Expression::lambda(vec!["nests"], chain);

    let expected_chain = Expression::call(
        Expression::call(
            Expression::parameter("nests"),
            "Where",
            vec![Expression::lambda(vec!["n"], Expression::member(n(), "Active"))],
        ),
        "Select",
        vec![Expression::lambda(
            vec!["n"],
            Expression::object(fields! { "Id" => Expression::member(n(), "__document_id") }),
        )],
    );
    let expected = Expression::lambda(vec!["nests"], expected_chain);

    assert_eq!(Ok(expected), IdentityRewritePass.apply(input, &conventions));
}

#[test]
fn transparent_identifier_carries_root_forward() {
    let conventions = MapConventions::default();
    let ti = || Expression::parameter("ti0");
    let wrap = Expression::lambda(
        vec!["n"],
        Expression::object(fields! {
            "n" => n(),
            "tags" => Expression::member(n(), "Tags"),
        }),
    );
    let input = Expression::lambda(
        vec!["nests"],
        Expression::call(
            Expression::call(Expression::parameter("nests"), "Select", vec![wrap.clone()]),
            "SelectMany",
            vec![
                Expression::lambda(vec!["ti0"], Expression::member(ti(), "tags")),
                Expression::lambda(
                    vec!["ti0", "t"],
                    Expression::object(fields! {
                        "Tag" => Expression::parameter("t"),
                        "Id2" => Expression::member(Expression::member(ti(), "n"), "Id"),
                    }),
                ),
            ],
        ),
    );

    let expected = Expression::lambda(
        vec!["nests"],
        Expression::call(
            Expression::call(Expression::parameter("nests"), "Select", vec![wrap]),
            "SelectMany",
            vec![
                Expression::lambda(vec!["ti0"], Expression::member(ti(), "tags")),
                Expression::lambda(
                    vec!["ti0", "t"],
                    Expression::object(fields! {
                        "Tag" => Expression::parameter("t"),
                        "Id2" => Expression::member(Expression::member(ti(), "n"), "__document_id"),
                    }),
                ),
            ],
        ),
    );

    assert_eq!(Ok(expected), IdentityRewritePass.apply(input, &conventions));
}
