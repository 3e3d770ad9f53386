use indoc::indoc;

use rpal_compiler::compile;

use super::error::RuntimeError;
use super::evaluate;
use super::value::Value;

fn run(source: &str) -> (Value, String) {
    let program = compile(source).expect("source should compile");
    let mut out = Vec::new();
    let value = evaluate(&program, &mut out).expect("program should run");
    (value, String::from_utf8(out).expect("output is UTF-8"))
}

fn output(source: &str) -> String {
    run(source).1
}

fn run_err(source: &str) -> RuntimeError {
    let program = compile(source).expect("source should compile");
    evaluate(&program, &mut Vec::new()).expect_err("program should fail")
}

// ----------------------------------------------------------------------
// End-to-end scenarios
// ----------------------------------------------------------------------

#[test]
fn let_binding_with_arithmetic() {
    assert_eq!(output("let x = 5 in Print (x + 3)"), "8\n");
}

#[test]
fn recursive_factorial() {
    assert_eq!(
        output("let rec f n = n eq 0 -> 1 | n * f (n-1) in Print (f 5)"),
        "120\n"
    );
}

#[test]
fn tuple_sum_with_where_and_rec() {
    let source = indoc! {"
        let Sum(A) = Psum (A, Order A)
            where rec Psum (T,N) = N eq 0 -> 0 | Psum(T, N-1) + T N
        in Print (Sum (1,2,3,4,5))
    "};
    assert_eq!(output(source), "15\n");
}

#[test]
fn even_odd_with_strings() {
    assert_eq!(
        output("let Is_Odd N = (N/2)*2 eq N -> 'Even' | 'Odd' in Print (Is_Odd (-8))"),
        "Even\n"
    );
}

#[test]
fn aug_on_a_non_tuple_forms_a_pair() {
    assert_eq!(output("Print ('hello' aug 'world')"), "(hello, world)\n");
}

#[test]
fn simultaneous_definitions_bind_pairwise() {
    assert_eq!(output("let x = 1 and y = 2 in Print (x + y)"), "3\n");
}

// ----------------------------------------------------------------------
// Laws
// ----------------------------------------------------------------------

#[test]
fn curried_and_multi_parameter_lambdas_agree() {
    assert_eq!(output("Print ((fn x y . x + y) 2 3)"), "5\n");
    assert_eq!(output("Print (((fn x . fn y . x + y) 2) 3)"), "5\n");
}

#[test]
fn conditionals_evaluate_exactly_one_branch() {
    // The untaken branch would divide by zero.
    assert_eq!(output("Print (1 eq 1 -> 11 | 1/0)"), "11\n");
    assert_eq!(output("Print (1 eq 2 -> 1/0 | 22)"), "22\n");
}

#[test]
fn fixed_point_unfolds_on_demand() {
    let source = indoc! {"
        let rec fib n = n ls 2 -> n | fib (n-1) + fib (n-2)
        in Print (fib 10)
    "};
    assert_eq!(output(source), "55\n");
}

#[test]
fn tuple_order_and_null() {
    assert_eq!(output("Print (Order (1,2,3))"), "3\n");
    assert_eq!(output("Print (Order nil)"), "0\n");
    assert_eq!(output("Print (Null nil)"), "true\n");
    assert_eq!(output("Print (Null (nil aug 1))"), "false\n");
}

// ----------------------------------------------------------------------
// Operators and values
// ----------------------------------------------------------------------

#[test]
fn exponentiation_is_right_associative_at_runtime() {
    assert_eq!(output("Print (2 ** 3 ** 2)"), "512\n");
}

#[test]
fn division_truncates_toward_zero() {
    assert_eq!(output("Print (-8 / 2, 7 / 2)"), "(-4, 3)\n");
}

#[test]
fn boolean_connectives() {
    assert_eq!(output("Print (not (1 eq 2) & (false or true))"), "true\n");
}

#[test]
fn unary_minus_binds_the_first_term() {
    assert_eq!(output("Print (- 5 + 10)"), "5\n");
}

#[test]
fn string_equality_and_inequality() {
    assert_eq!(output("Print ('a' eq 'a', 'a' ne 'b')"), "(true, true)\n");
}

#[test]
fn tuple_selection_is_one_based() {
    assert_eq!(output("let t = (10, 20, 30) in Print (t 1, t 3)"), "(10, 30)\n");
}

#[test]
fn nested_tuples_print_recursively() {
    assert_eq!(output("Print ((1, 2), 3)"), "((1, 2), 3)\n");
}

#[test]
fn closures_capture_their_defining_scope() {
    assert_eq!(
        output("let add x = fn y . x + y in Print (add 2 3)"),
        "5\n"
    );
}

#[test]
fn definitions_unwind_cleanly_inside_operands() {
    assert_eq!(
        output("Print ((let x = 1 in x) + (let y = 2 in y))"),
        "3\n"
    );
}

#[test]
fn empty_parameter_list_ignores_the_argument() {
    assert_eq!(output("let f () = 7 in Print (f dummy)"), "7\n");
}

#[test]
fn lambda_closures_print_their_shape() {
    assert_eq!(output("Print (fn x . x)"), "[lambda closure: x: 1]\n");
}

#[test]
fn programs_without_print_produce_no_output() {
    let (value, printed) = run("40 + 2");
    assert_eq!(value, Value::Int(42));
    assert_eq!(printed, "");
}

#[test]
fn the_result_of_print_is_dummy() {
    let (value, printed) = run("Print 1");
    assert_eq!(value, Value::Dummy);
    assert_eq!(printed, "1\n");
}

#[test]
fn string_escapes_decode_before_printing() {
    assert_eq!(output(r"Print 'a\tb\nc'"), "a\tb\nc\n");
}

// ----------------------------------------------------------------------
// String primitives
// ----------------------------------------------------------------------

#[test]
fn stem_and_stern_split_a_string() {
    assert_eq!(output("Print (Stem 'abc', Stern 'abc')"), "(a, bc)\n");
}

#[test]
fn conc_is_curried() {
    assert_eq!(output("Print (Conc 'foo' 'bar')"), "foobar\n");
    assert_eq!(output("let p = Conc 'x' in Print (p 'y', p 'z')"), "(xy, xz)\n");
}

#[test]
fn itos_renders_integers() {
    assert_eq!(output("Print (Conc (ItoS 42) '!')"), "42!\n");
}

#[test]
fn type_predicates() {
    assert_eq!(
        output("Print (Isinteger 1, Isstring 1, Istruthvalue true, Isdummy dummy)"),
        "(true, false, true, true)\n"
    );
    assert_eq!(
        output("Print (Isfunction Print, Istuple nil, Istuple (1, 2), Istuple 3)"),
        "(true, true, true, false)\n"
    );
}

// ----------------------------------------------------------------------
// Runtime errors
// ----------------------------------------------------------------------

#[test]
fn unbound_identifier_aborts() {
    assert!(matches!(
        run_err("Print missing"),
        RuntimeError::UnboundIdentifier(name) if name == "missing"
    ));
}

#[test]
fn division_by_zero_aborts() {
    assert!(matches!(run_err("1 / 0"), RuntimeError::DivisionByZero));
}

#[test]
fn applying_a_non_function_aborts() {
    assert!(matches!(run_err("5 5"), RuntimeError::NotCallable("integer")));
}

#[test]
fn tuple_selection_out_of_range_aborts() {
    assert!(matches!(
        run_err("let t = (1, 2) in t 5"),
        RuntimeError::TupleIndexOutOfRange { index: 5, order: 2 }
    ));
}

#[test]
fn negative_exponent_aborts() {
    assert!(matches!(
        run_err("2 ** (0 - 1)"),
        RuntimeError::NegativeExponent
    ));
}

#[test]
fn ill_typed_operands_abort() {
    assert!(matches!(
        run_err("1 + 'one'"),
        RuntimeError::TypeMismatch { .. }
    ));
    assert!(matches!(
        run_err("Order 5"),
        RuntimeError::TypeMismatch { .. }
    ));
    assert!(matches!(
        run_err("1 gr 'two'"),
        RuntimeError::TypeMismatch { .. }
    ));
}

#[test]
fn tuple_parameter_arity_must_match() {
    assert!(matches!(
        run_err("let f (x, y) = x in f (1, 2, 3)"),
        RuntimeError::TupleArityMismatch {
            expected: 2,
            found: 3
        }
    ));
}

#[test]
fn ill_typed_conditions_abort() {
    assert!(matches!(
        run_err("1 -> 2 | 3"),
        RuntimeError::TypeMismatch { op: "->", .. }
    ));
}
