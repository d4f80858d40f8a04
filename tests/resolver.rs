use rlox::ast::{Expr, ExprId, Stmt};
use rlox::diagnostics::Diagnostics;
use rlox::interpreter::Interpreter;
use rlox::parser::Parser;
use rlox::resolver::Resolver;
use rlox::scanner;

/// Parse and resolve `source`, returning the statements alongside the
/// interpreter whose distance table was populated.
fn resolve_program(source: &str) -> (Vec<Stmt>, Interpreter, Vec<String>) {
    let mut diagnostics = Diagnostics::new();
    let tokens = scanner::scan(source.as_bytes(), &mut diagnostics);
    let statements = Parser::new(&tokens, &mut diagnostics).parse();
    assert!(
        diagnostics.is_empty(),
        "parse diagnostics: {:?}",
        diagnostics.iter().map(|e| e.to_string()).collect::<Vec<_>>()
    );

    let mut interpreter = Interpreter::new();
    Resolver::new(&mut interpreter, &mut diagnostics).resolve(&statements);

    let rendered = diagnostics.iter().map(|e| e.to_string()).collect();
    (statements, interpreter, rendered)
}

/// Collect every variable and assignment occurrence, in source order, as
/// `(lexeme, id)` pairs.
fn occurrences(statements: &[Stmt]) -> Vec<(String, ExprId)> {
    let mut found = Vec::new();
    for stmt in statements {
        collect_stmt(stmt, &mut found);
    }
    found
}

fn collect_stmt(stmt: &Stmt, found: &mut Vec<(String, ExprId)>) {
    match stmt {
        Stmt::Expression(expr) | Stmt::Print(expr) => collect_expr(expr, found),

        Stmt::Var { initializer, .. } => {
            if let Some(expr) = initializer {
                collect_expr(expr, found);
            }
        }

        Stmt::Block(statements) => {
            for s in statements {
                collect_stmt(s, found);
            }
        }

        Stmt::If {
            condition,
            then_branch,
            else_branch,
        } => {
            collect_expr(condition, found);
            collect_stmt(then_branch, found);
            if let Some(eb) = else_branch.as_deref() {
                collect_stmt(eb, found);
            }
        }

        Stmt::While { condition, body } => {
            collect_expr(condition, found);
            collect_stmt(body, found);
        }

        Stmt::Function(declaration) => {
            for s in &declaration.body {
                collect_stmt(s, found);
            }
        }

        Stmt::Return { value, .. } => {
            if let Some(expr) = value {
                collect_expr(expr, found);
            }
        }
    }
}

fn collect_expr(expr: &Expr, found: &mut Vec<(String, ExprId)>) {
    match expr {
        Expr::Literal(_) => {}

        Expr::Grouping(inner) => collect_expr(inner, found),

        Expr::Unary { right, .. } => collect_expr(right, found),

        Expr::Binary { left, right, .. } | Expr::Logical { left, right, .. } => {
            collect_expr(left, found);
            collect_expr(right, found);
        }

        Expr::Variable { id, name } => found.push((name.lexeme.clone(), *id)),

        Expr::Assign { id, name, value } => {
            collect_expr(value, found);
            found.push((name.lexeme.clone(), *id));
        }

        Expr::Call {
            callee, arguments, ..
        } => {
            collect_expr(callee, found);
            for argument in arguments {
                collect_expr(argument, found);
            }
        }
    }
}

/// Resolved depth of the `index`-th occurrence of `name`, in source order.
fn depth_of(
    statements: &[Stmt],
    interpreter: &Interpreter,
    name: &str,
    index: usize,
) -> Option<usize> {
    let id = occurrences(statements)
        .into_iter()
        .filter(|(lexeme, _)| lexeme == name)
        .map(|(_, id)| id)
        .nth(index)
        .unwrap_or_else(|| panic!("no occurrence #{} of '{}'", index, name));

    interpreter.resolved_depth(id)
}

#[test]
fn reading_a_local_in_its_own_initializer_is_reported() {
    let (_, _, diagnostics) = resolve_program("{ var a = a; }");

    assert_eq!(diagnostics.len(), 1);
    assert!(diagnostics[0].contains("Cannot read local variable in its own initializer."));
}

#[test]
fn global_initializer_may_reference_the_same_name() {
    // Top level is not a pushed scope, so the shadowing rule does not apply.
    let (_, _, diagnostics) = resolve_program("var a = a;");
    assert!(diagnostics.is_empty());
}

#[test]
fn redeclaring_in_the_same_scope_is_reported() {
    let (_, _, diagnostics) = resolve_program("{ var a = 1; var a = 2; }");

    assert_eq!(diagnostics.len(), 1);
    assert!(diagnostics[0].contains("Variable with this name already declared in this scope."));
}

#[test]
fn redeclaring_at_top_level_is_allowed() {
    let (_, _, diagnostics) = resolve_program("var a = 1; var a = 2;");
    assert!(diagnostics.is_empty());
}

#[test]
fn top_level_return_is_reported() {
    let (_, _, diagnostics) = resolve_program("return 1;");

    assert_eq!(diagnostics.len(), 1);
    assert!(diagnostics[0].contains("Cannot return from top-level code."));
}

#[test]
fn return_inside_a_function_is_allowed() {
    let (_, _, diagnostics) = resolve_program("fun f() { return 1; }");
    assert!(diagnostics.is_empty());
}

#[test]
fn resolution_never_stops_at_the_first_fault() {
    let source = "return 1; { var a = 1; var a = 2; }";
    let (_, _, diagnostics) = resolve_program(source);

    assert_eq!(diagnostics.len(), 2);
}

#[test]
fn distances_count_scope_hops() {
    let source = r#"
        {
            var a = 1;
            {
                var b = 2;
                fun f() {
                    print a + b;
                }
            }
        }
    "#;
    let (statements, interpreter, diagnostics) = resolve_program(source);
    assert!(diagnostics.is_empty());

    // From inside f's body: function scope, then b's block, then a's block.
    assert_eq!(depth_of(&statements, &interpreter, "a", 0), Some(2));
    assert_eq!(depth_of(&statements, &interpreter, "b", 0), Some(1));
}

#[test]
fn globals_get_no_distance_entry() {
    let source = "var g = 1; { print g; }";
    let (statements, interpreter, diagnostics) = resolve_program(source);
    assert!(diagnostics.is_empty());

    assert_eq!(depth_of(&statements, &interpreter, "g", 0), None);
}

#[test]
fn each_occurrence_resolves_independently() {
    // The first print precedes the shadowing declaration and must bind to the
    // outer variable; the second binds to the inner one.
    let source = r#"
        {
            var a = "outer";
            {
                print a;
                var a = "inner";
                print a;
            }
        }
    "#;
    let (statements, interpreter, diagnostics) = resolve_program(source);
    assert!(diagnostics.is_empty());

    assert_eq!(depth_of(&statements, &interpreter, "a", 0), Some(1));
    assert_eq!(depth_of(&statements, &interpreter, "a", 1), Some(0));
}

#[test]
fn parameters_resolve_at_the_function_scope() {
    let source = "fun id(x) { return x; }";
    let (statements, interpreter, diagnostics) = resolve_program(source);
    assert!(diagnostics.is_empty());

    assert_eq!(depth_of(&statements, &interpreter, "x", 0), Some(0));
}
