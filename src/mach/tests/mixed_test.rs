use super::*;
use crate::lang::Category;
use crate::mach::Val;

#[test]
fn test_three_heritages_share_variables() {
    let source = "\
LET N = 3
T:N is *N*
REPEAT N [FORWARD 10]
PRINT TURTLE_Y";
    assert_eq!(run(source), "N is 3\n30\n");
}

#[test]
fn test_pilot_compute_feeds_basic() {
    assert_eq!(run("C:X = 6 * 7\nPRINT X"), "42\n");
}

#[test]
fn test_logo_procedure_draws_closed_square() {
    let mut rt = Runtime::new(config());
    let r = rt.execute("TO SQ :S\nREPEAT 4 [FORWARD :S RIGHT 90]\nEND\nSQ 50");
    assert!(r.is_ok());
    let t = rt.turtle();
    assert!(t.x.abs() < 1e-6 && t.y.abs() < 1e-6);
    assert!(t.heading.abs() < 1e-6);
}

#[test]
fn test_home_assignment_routes_to_logo() {
    let mut rt = Runtime::new(config());
    let r = rt.execute("HOME = 5\nHOME2 = 5");
    assert_eq!(r.errors.len(), 1);
    assert_eq!(r.errors[0].category, Category::Syntax);
    assert_eq!(rt.variable("HOME"), None);
    assert_eq!(rt.variable("HOME2"), Some(Val::Integer(5)));
}

#[test]
fn test_graphics_from_pilot() {
    let mut rt = Runtime::new(config());
    rt.execute("G:FORWARD 20\nG:RIGHT 90");
    assert!((rt.turtle().y - 20.0).abs() < 1e-9);
    assert!((rt.turtle().heading - 90.0).abs() < 1e-9);
}

#[test]
fn test_conditional_pilot_jump() {
    let mut rt = Runtime::new(config());
    rt.push_input("blue");
    let source = "\
A:
M:red
JY:*warm
T:cool
E:
*warm
T:warm";
    assert_eq!(rt.execute(source).output, vec!["cool"]);
}
