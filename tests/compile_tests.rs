use std::fs;
use std::path::Path;

use teeny::{CompileError, Options};

fn demo(name: &str) -> String {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("demos").join(name);
    fs::read_to_string(path).expect("Failed to read demo file")
}

#[test]
fn test_squares_demo() {
    let output = teeny::compile(&demo("squares.teeny"), &Options::default())
        .expect("Compilation failed");

    assert!(output.starts_with("#include <stdio.h>\nchar *title;\nint i;\nint main(void){\n"));
    assert!(output.contains("title = \"squares\";\n"));
    assert!(output.contains("for(i = 1; i < 10; i++){\n"));
    assert!(output.contains("printf(\"%d\\n\", (int)(i*i));\n"));
    assert!(output.contains("if(i%2==0){\n"));
    assert!(output.contains("}else if(i==5){\n"));
    assert!(output.contains("}else{\nprintf(\"  odd\\n\");\n}\n}\n"));
    assert!(output.ends_with("return 0;\n}\n"));
}

#[test]
fn test_guess_demo() {
    let output = teeny::compile(&demo("guess.teeny"), &Options::default())
        .expect("Compilation failed");

    assert!(output.contains("int secret;\nfloat guess;\n"));
    assert!(output.contains("ask:;\nif(0 == scanf(\"%f\", &guess)){\n"));
    assert!(output.contains("if(guess==secret){\ngoto done;\n}\n"));
    assert!(output.contains("goto ask;\ndone:;\n"));
}

#[test]
fn test_countdown_needs_legacy_dialect() {
    let source = demo("countdown.teeny");

    let err = teeny::compile(&source, &Options::default()).unwrap_err();
    assert!(matches!(err, CompileError::Syntax(_)));
    assert_eq!(err.to_string(), "Error: Invalid statement at LET (IDENT)");

    let output = teeny::compile(&source, &Options::legacy()).expect("Compilation failed");
    assert!(output.contains("while(n>0){\nprintf(\"%.2f\\n\", (float)(n));\nn = n-1;\n}\n"));
}

#[test]
fn test_compile_file_writes_output() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("hello.teeny");
    let output = dir.path().join("out.c");
    fs::write(&input, "PRINT \"Hello\"\n").unwrap();

    teeny::compile_file(&input, &output, &Options::default()).unwrap();

    let c = fs::read_to_string(&output).unwrap();
    assert_eq!(
        c,
        "#include <stdio.h>\nint main(void){\nprintf(\"Hello\\n\");\nreturn 0;\n}\n"
    );
}

#[test]
fn test_failed_compile_keeps_previous_output() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("bad.teeny");
    let output = dir.path().join("out.c");
    fs::write(&output, "previous").unwrap();
    fs::write(&input, "GOTO nowhere\n").unwrap();

    let err = teeny::compile_file(&input, &output, &Options::default()).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Error: Attempting to GOTO undeclared label: nowhere"
    );
    assert_eq!(fs::read_to_string(&output).unwrap(), "previous");
    // no stray temporary files either
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 2);
}

#[test]
fn test_missing_input_file() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("missing.teeny");
    let output = dir.path().join("out.c");

    let err = teeny::compile_file(&input, &output, &Options::default()).unwrap_err();
    assert!(matches!(err, CompileError::Io { .. }));
    assert!(!output.exists());
}

#[test]
fn test_compilations_do_not_share_state() {
    let options = Options::default();
    teeny::compile("LETI x = 1\nLABEL a", &options).unwrap();
    // x and a are unknown to a fresh run
    assert!(teeny::compile("PRINT x", &options).is_err());
    assert!(teeny::compile("LETI x = 2\nLABEL a", &options).is_ok());
}
