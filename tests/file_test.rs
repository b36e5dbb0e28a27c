mod common;
use common::*;

fn scratch(name: &str) -> String {
    let mut path = std::env::temp_dir();
    path.push(format!("templecode-it-{}-{}", std::process::id(), name));
    path.to_string_lossy().replace('\\', "/")
}

#[test]
fn test_open_write_read_lines() {
    let path = scratch("lines.txt");
    let source = format!(
        "\
OPEN \"{0}\" FOR OUTPUT AS #1
WRITELINE #1, \"first\"
WRITELINE #1, \"second\"
CLOSE #1
OPEN \"{0}\" FOR INPUT AS #2
READLINE #2, A$
READLINE #2, B$
READLINE #2, C$
PRINT A$; \"/\"; B$; \"/\"; C$; \"/\"; EOF
CLOSE #2",
        path
    );
    assert_eq!(exec(&source), "first/second//1\n");
    std::fs::remove_file(&path).unwrap();
}

#[test]
fn test_whole_file_helpers() {
    let path = scratch("whole.txt");
    let source = format!(
        "\
WRITEFILE \"{0}\", \"one\"
APPENDFILE \"{0}\", \"two\"
READFILE \"{0}\", T$
PRINT T$",
        path
    );
    assert_eq!(exec(&source), "one\ntwo\n");
    std::fs::remove_file(&path).unwrap();
}

#[test]
fn test_missing_file_reads_empty() {
    let path = scratch("missing.txt");
    let source = format!("READFILE \"{}\", T$\nPRINT \"[\"; T$; \"]\"", path);
    assert_eq!(exec(&source), "[]\n");
}

#[test]
fn test_bad_file_number() {
    let out = exec("READLINE #9, A$");
    assert!(out.starts_with("?BAD FILE NUMBER"));
}
