use crate::ops::{BinaryOp, ControlOp, DeltaId, Literal, UnaryOp};
use crate::program::Program;

#[test]
fn alloc_assigns_sequential_indices() {
    let mut program = Program::new();
    assert_eq!(program.alloc(), DeltaId(0));
    assert_eq!(program.alloc(), DeltaId(1));
    assert_eq!(program.alloc(), DeltaId(2));
    assert_eq!(program.len(), 3);
}

#[test]
fn dump_renders_one_block_per_line() {
    let mut program = Program::new();
    let entry = program.alloc();
    let body = program.alloc();

    program.block_mut(entry).push(ControlOp::Gamma);
    program.block_mut(entry).push(ControlOp::Lambda {
        params: vec!["x".to_string()],
        body,
    });
    program.block_mut(entry).push(ControlOp::Lit(Literal::Int(5)));

    program.block_mut(body).push(ControlOp::Binary(BinaryOp::Add));
    program.block_mut(body).push(ControlOp::Lit(Literal::Int(3)));
    program.block_mut(body).push(ControlOp::Name("x".to_string()));

    assert_eq!(
        program.dump(),
        "delta 0: gamma lambda{x.1} 5\ndelta 1: + 3 x\n"
    );
}

#[test]
fn symbol_display_spellings() {
    let cases: Vec<(ControlOp, &str)> = vec![
        (ControlOp::Lit(Literal::Str("hi".to_string())), "'hi'"),
        (ControlOp::Lit(Literal::Bool(true)), "true"),
        (ControlOp::Lit(Literal::Nil), "nil"),
        (ControlOp::Lit(Literal::Dummy), "dummy"),
        (ControlOp::Name("Print".to_string()), "Print"),
        (ControlOp::Beta, "beta"),
        (ControlOp::Delta(DeltaId(4)), "delta(4)"),
        (ControlOp::Tau(3), "tau(3)"),
        (ControlOp::Ystar, "<Y*>"),
        (ControlOp::Unary(UnaryOp::Neg), "neg"),
        (ControlOp::Unary(UnaryOp::Not), "not"),
        (ControlOp::Binary(BinaryOp::Pow), "**"),
        (ControlOp::Binary(BinaryOp::Aug), "aug"),
        (ControlOp::Binary(BinaryOp::And), "&"),
        (ControlOp::Binary(BinaryOp::Gr), "gr"),
    ];

    for (op, expected) in cases {
        assert_eq!(op.to_string(), expected);
    }
}

#[test]
fn symbols_serialize_for_tooling() {
    insta::assert_yaml_snapshot!(
        vec![
            ControlOp::Gamma,
            ControlOp::Tau(2),
            ControlOp::Delta(DeltaId(1)),
        ],
        @r"
    - Gamma
    - Tau: 2
    - Delta: 1
    "
    );
}

#[test]
fn lambda_with_tuple_params_lists_all_names() {
    let op = ControlOp::Lambda {
        params: vec!["x".to_string(), "y".to_string()],
        body: DeltaId(2),
    };
    assert_eq!(op.to_string(), "lambda{x,y.2}");

    let nullary = ControlOp::Lambda {
        params: vec![],
        body: DeltaId(1),
    };
    assert_eq!(nullary.to_string(), "lambda{.1}");
}
