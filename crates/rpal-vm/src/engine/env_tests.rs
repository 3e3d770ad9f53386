use super::env::EnvTree;
use super::value::Value;

#[test]
fn primitive_environment_holds_the_builtins() {
    let (tree, root) = EnvTree::with_primitives();
    for name in [
        "Print",
        "Isinteger",
        "Isstring",
        "Istruthvalue",
        "Isfunction",
        "Istuple",
        "Isdummy",
        "Order",
        "Null",
        "Stem",
        "Stern",
        "Conc",
        "ItoS",
    ] {
        assert!(
            matches!(tree.lookup(root, name), Some(Value::Builtin(_))),
            "{name} should be bound in E(0)"
        );
    }
}

#[test]
fn lookup_chases_parents() {
    let (mut tree, root) = EnvTree::with_primitives();
    let outer = tree.push(root);
    tree.bind(outer, "x".to_string(), Value::Int(1));
    let inner = tree.push(outer);
    tree.bind(inner, "y".to_string(), Value::Int(2));

    assert_eq!(tree.lookup(inner, "y"), Some(Value::Int(2)));
    assert_eq!(tree.lookup(inner, "x"), Some(Value::Int(1)));
    assert_eq!(tree.lookup(outer, "y"), None);
}

#[test]
fn inner_bindings_shadow_outer_ones() {
    let (mut tree, root) = EnvTree::with_primitives();
    let outer = tree.push(root);
    tree.bind(outer, "x".to_string(), Value::Int(1));
    let inner = tree.push(outer);
    tree.bind(inner, "x".to_string(), Value::Int(99));

    assert_eq!(tree.lookup(inner, "x"), Some(Value::Int(99)));
    assert_eq!(tree.lookup(outer, "x"), Some(Value::Int(1)));
}

#[test]
fn removal_does_not_disturb_bindings() {
    let (mut tree, root) = EnvTree::with_primitives();
    let env = tree.push(root);
    tree.bind(env, "x".to_string(), Value::Int(7));

    tree.mark_removed(env);
    assert!(tree.is_removed(env));
    // Closures created under `env` still resolve through it.
    assert_eq!(tree.lookup(env, "x"), Some(Value::Int(7)));
}
