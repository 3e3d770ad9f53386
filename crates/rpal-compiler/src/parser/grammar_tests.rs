use indoc::indoc;

use super::parse;

fn dump(source: &str) -> String {
    parse(source)
        .expect("source should parse")
        .dump()
        .trim_end()
        .to_string()
}

fn error(source: &str) -> String {
    parse(source).expect_err("source should not parse").message
}

#[test]
fn let_binding() {
    insta::assert_snapshot!(dump("let x = 5 in Print (x + 3)"), @r"
    let
    .=
    ..<ID:x>
    ..<INT:5>
    .gamma
    ..<ID:Print>
    ..+
    ...<ID:x>
    ...<INT:3>
    ");
}

#[test]
fn lambda_with_several_parameters() {
    insta::assert_snapshot!(dump("fn x y . x + y"), @r"
    lambda
    .<ID:x>
    .<ID:y>
    .+
    ..<ID:x>
    ..<ID:y>
    ");
}

#[test]
fn where_clause() {
    insta::assert_snapshot!(dump("a + 1 where a = 2"), @r"
    where
    .+
    ..<ID:a>
    ..<INT:1>
    .=
    ..<ID:a>
    ..<INT:2>
    ");
}

#[test]
fn tuples_and_aug() {
    insta::assert_snapshot!(dump("1, 2 aug 3, 4"), @r"
    tau
    .<INT:1>
    .aug
    ..<INT:2>
    ..<INT:3>
    .<INT:4>
    ");
}

#[test]
fn conditional() {
    insta::assert_snapshot!(dump("b -> 1 | 2"), @r"
    ->
    .<ID:b>
    .<INT:1>
    .<INT:2>
    ");
}

#[test]
fn conditionals_nest_to_the_right() {
    insta::assert_snapshot!(dump("a -> 1 | b -> 2 | 3"), @r"
    ->
    .<ID:a>
    .<INT:1>
    .->
    ..<ID:b>
    ..<INT:2>
    ..<INT:3>
    ");
}

#[test]
fn symbolic_comparisons_normalize_to_keyword_forms() {
    insta::assert_snapshot!(dump("x > 1"), @r"
    gr
    .<ID:x>
    .<INT:1>
    ");
    insta::assert_snapshot!(dump("x <= y"), @r"
    le
    .<ID:x>
    .<ID:y>
    ");
}

#[test]
fn boolean_connective_precedence() {
    insta::assert_snapshot!(dump("not a & b or c"), @r"
    or
    .&
    ..not
    ...<ID:a>
    ..<ID:b>
    .<ID:c>
    ");
}

#[test]
fn arithmetic_precedence_and_unary_minus() {
    insta::assert_snapshot!(dump("-x + y * z ** 2"), @r"
    +
    .neg
    ..<ID:x>
    .*
    ..<ID:y>
    ..**
    ...<ID:z>
    ...<INT:2>
    ");
}

#[test]
fn exponentiation_is_right_associative() {
    insta::assert_snapshot!(dump("2 ** 3 ** 4"), @r"
    **
    .<INT:2>
    .**
    ..<INT:3>
    ..<INT:4>
    ");
}

#[test]
fn application_is_left_associative() {
    insta::assert_snapshot!(dump("f x y"), @r"
    gamma
    .gamma
    ..<ID:f>
    ..<ID:x>
    .<ID:y>
    ");
}

#[test]
fn at_selection_keeps_arity_three() {
    insta::assert_snapshot!(dump("a @ f b"), @r"
    @
    .<ID:a>
    .<ID:f>
    .<ID:b>
    ");
}

#[test]
fn function_form() {
    insta::assert_snapshot!(dump("let f x y = x in f"), @r"
    let
    .function_form
    ..<ID:f>
    ..<ID:x>
    ..<ID:y>
    ..<ID:x>
    .<ID:f>
    ");
}

#[test]
fn function_form_with_tuple_parameter() {
    insta::assert_snapshot!(dump("let f (x, y) = x in f"), @r"
    let
    .function_form
    ..<ID:f>
    ..,
    ...<ID:x>
    ...<ID:y>
    ..<ID:x>
    .<ID:f>
    ");
}

#[test]
fn function_form_with_empty_parameter_list() {
    insta::assert_snapshot!(dump("let f () = 1 in f"), @r"
    let
    .function_form
    ..<ID:f>
    ..()
    ..<INT:1>
    .<ID:f>
    ");
}

#[test]
fn variable_list_binding() {
    insta::assert_snapshot!(dump("let x, y = p in x"), @r"
    let
    .=
    ..,
    ...<ID:x>
    ...<ID:y>
    ..<ID:p>
    .<ID:x>
    ");
}

#[test]
fn simultaneous_definitions() {
    insta::assert_snapshot!(dump("let x = 1 and y = 2 in x"), @r"
    let
    .and
    ..=
    ...<ID:x>
    ...<INT:1>
    ..=
    ...<ID:y>
    ...<INT:2>
    .<ID:x>
    ");
}

#[test]
fn within_definition() {
    insta::assert_snapshot!(dump("let x = 1 within y = x in y"), @r"
    let
    .within
    ..=
    ...<ID:x>
    ...<INT:1>
    ..=
    ...<ID:y>
    ...<ID:x>
    .<ID:y>
    ");
}

#[test]
fn recursive_definition() {
    insta::assert_snapshot!(dump("let rec f n = n in f"), @r"
    let
    .rec
    ..function_form
    ...<ID:f>
    ...<ID:n>
    ...<ID:n>
    .<ID:f>
    ");
}

#[test]
fn literal_leaves() {
    insta::assert_snapshot!(dump("Print ('hi', true, false, nil, dummy)"), @r"
    gamma
    .<ID:Print>
    .tau
    ..<STR:'hi'>
    ..<TRUE:true>
    ..<FALSE:false>
    ..<NIL:nil>
    ..<DUMMY:dummy>
    ");
}

#[test]
fn multi_line_programs_parse() {
    let source = indoc! {"
        let Is_Odd N =
            (N / 2) * 2 eq N -> 'Even'
            | 'Odd'
        in
        Print (Is_Odd (-8))
    "};
    insta::assert_snapshot!(dump(source), @r"
    let
    .function_form
    ..<ID:Is_Odd>
    ..<ID:N>
    ..->
    ...eq
    ....*
    ...../
    ......<ID:N>
    ......<INT:2>
    .....<INT:2>
    ....<ID:N>
    ...<STR:'Even'>
    ...<STR:'Odd'>
    .gamma
    ..<ID:Print>
    ..gamma
    ...<ID:Is_Odd>
    ...neg
    ....<INT:8>
    ");
}

// ----------------------------------------------------------------------
// Errors
// ----------------------------------------------------------------------

#[test]
fn missing_in_after_let() {
    let message = error("let x = 5");
    assert!(message.contains("expected `in`"), "{message}");
}

#[test]
fn missing_pipe_in_conditional() {
    let message = error("b -> 1");
    assert!(message.contains("expected `|`"), "{message}");
}

#[test]
fn empty_fn_parameter_list() {
    let message = error("fn . x");
    assert!(
        message.contains("at least one parameter after `fn`"),
        "{message}"
    );
}

#[test]
fn missing_close_paren() {
    let message = error("(x");
    assert!(message.contains("expected `)`"), "{message}");
}

#[test]
fn missing_equals_in_definition() {
    let message = error("let f x 5 in f");
    assert!(message.contains("expected `=`"), "{message}");
}

#[test]
fn trailing_tokens_are_rejected() {
    let message = error("x y z )");
    assert!(message.contains("unexpected `)`"), "{message}");
}

#[test]
fn empty_input_is_rejected() {
    let message = error("");
    assert!(message.contains("expected an expression"), "{message}");
}

#[test]
fn deep_nesting_hits_the_recursion_limit() {
    let source = format!("{}x{}", "(".repeat(600), ")".repeat(600));
    let message = error(&source);
    assert!(message.contains("nested too deeply"), "{message}");
}
