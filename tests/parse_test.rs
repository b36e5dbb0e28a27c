use templecode::lang::{ast::*, classify, parse_expression, parse_statement};
use templecode::lang::{Ident, Operator, Route, Vocabulary};

fn statement(s: &str) -> Statement {
    match parse_statement(s, &Vocabulary::new()) {
        Ok(statement) => statement,
        Err(error) => panic!("{}: {}", s, error),
    }
}

fn route(s: &str) -> Route {
    classify(s, &Vocabulary::new())
}

#[test]
fn test_let_foo_eq_bar() {
    let answer = Statement::Let(
        Variable::Unary(Ident::new("TER")),
        Expression::Var(Ident::new("BAR")),
    );
    assert_eq!(statement("LET ter = bar"), answer);
    assert_eq!(statement("ter = bar"), answer);
}

#[test]
fn test_expression_shape() {
    let answer = Expression::Binary(
        Operator::Plus,
        Box::new(Expression::Integer(1)),
        Box::new(Expression::Binary(
            Operator::Multiply,
            Box::new(Expression::Integer(2)),
            Box::new(Expression::Var(Ident::new("X"))),
        )),
    );
    assert_eq!(parse_expression("1 + 2 * x").ok(), Some(answer));
}

#[test]
fn test_goto_targets() {
    assert_eq!(statement("GOTO 100"), Statement::Goto(Target::Line(100)));
}

#[test]
fn test_malformed_is_error() {
    assert!(parse_statement("PRINT (1 + ", &Vocabulary::new()).is_err());
}

#[test]
fn test_routing_pins_keyword_precedence() {
    assert_eq!(route("HOME = 5"), Route::Logo);
    assert_eq!(route("X = 5"), Route::Basic);
    assert_eq!(route("C:X = 5"), Route::Pilot);
}

#[test]
fn test_defined_procedures_route_to_logo() {
    let mut vocabulary = Vocabulary::new();
    assert_eq!(classify("SPIRAL 5", &vocabulary), Route::Basic);
    vocabulary.define("spiral");
    assert_eq!(classify("SPIRAL 5", &vocabulary), Route::Logo);
}
