mod common;
use common::*;

#[test]
fn test_arithmetic() {
    assert_eq!(exec("PRINT 2 + 3 * 4; \" \"; (2 + 3) * 4; \" \"; 2 ^ 10"), "14 20 1024\n");
    assert_eq!(exec("PRINT 7 / 2; \" \"; 7 \\ 2; \" \"; 7 MOD 3"), "3.5 3 1\n");
}

#[test]
fn test_extreme_numbers_print_with_exponent() {
    assert_eq!(exec("PRINT 10 ^ 20"), "1e+20\n");
    assert_eq!(exec("PRINT 1 / 2 ^ 20"), "9.5367431640625e-07\n");
    assert_eq!(exec("PRINT 1 / 4"), "0.25\n");
}

#[test]
fn test_comparisons_and_logic() {
    assert_eq!(exec("PRINT (1 < 2) AND (2 < 3); \" \"; (1 > 2) OR 0; \" \"; NOT 0"), "1 0 1\n");
    assert_eq!(exec("IF \"abc\" < \"abd\" THEN PRINT \"less\""), "less\n");
}

#[test]
fn test_string_functions() {
    let source = "\
S$ = \"Hello World\"
PRINT LEFT$(S$, 5); \"|\"; RIGHT$(S$, 5); \"|\"; MID$(S$, 7, 3)
PRINT LEN(S$); \" \"; INSTR(S$, \"World\"); \" \"; UCASE$(\"ab\"); LCASE$(\"CD\")
PRINT CHR$(65); ASC(\"a\"); \" \"; VAL(\"12\") + 1; \" \"; STR$(3) + \"x\"";
    assert_eq!(exec(source), "Hello|World|Wor\n11 7 ABcd\nA97 13 3x\n");
}

#[test]
fn test_math_functions() {
    let source = "PRINT ABS(-2); \" \"; SQR(16); \" \"; SGN(-5); \" \"; ROUND(2.567, 2); \" \"; MAX(3, 9, 4); \" \"; MIN(3, 9, 4)";
    assert_eq!(exec(source), "2 4 -1 2.57 9 3\n");
    assert_eq!(exec("PRINT CEIL(1.2); \" \"; INT(PI * 100)"), "2 314\n");
}

#[test]
fn test_string_concatenation_with_numbers() {
    assert_eq!(exec("A$ = \"n=\" + 5\nPRINT A$"), "n=5\n");
}

#[test]
fn test_random_is_seeded() {
    let a = exec("PRINT RND(1); RND(1)");
    let b = exec("PRINT RND(1); RND(1)");
    assert_eq!(a, b);
    assert_eq!(exec("X = RND\nPRINT X >= 0 AND X < 1"), "1\n");
}

#[test]
fn test_type_mismatch() {
    let out = exec("A = \"x\" * 2");
    assert!(out.starts_with("?TYPE MISMATCH IN 1"));
}
