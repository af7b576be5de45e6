//! End-to-end tests driving the translator the way a user would: through
//! [`driver::run`] against real files on disk, and through [`parse`] +
//! [`CodeGen`] directly for the command-level scenarios from the spec.

use std::fs;
use std::path::PathBuf;

use tempfile::tempdir;
use vm_translator::cli::Cli;
use vm_translator::{driver, parse, CodeGen};

fn cli(src: PathBuf, out: PathBuf, boot: bool) -> Cli {
    Cli { src, out, boot }
}

#[test]
fn translates_a_single_file() {
    let dir = tempdir().unwrap();
    let src = dir.path().join("Demo.vm");
    fs::write(&src, "push constant 7\npush constant 8\nadd\n").unwrap();
    let out = dir.path().join("out.asm");

    driver::run(&cli(src, out.clone(), false)).unwrap();

    let asm = fs::read_to_string(&out).unwrap();
    assert!(asm.contains("// --- push constant 7 ---"));
    assert!(asm.contains("@7\nD=A\n@SP\nA=M\nM=D\n@SP\nM=M+1\n"));
    assert!(asm.contains("// --- add ---"));
    assert!(asm.ends_with("A=A-1\nM=M+D\n"));
}

#[test]
fn translates_a_directory_preserving_static_isolation_and_call_counters() {
    let dir = tempdir().unwrap();
    fs::write(
        dir.path().join("Foo.vm"),
        "push static 0\ncall Helper.run 0\n",
    )
    .unwrap();
    fs::write(
        dir.path().join("Bar.vm"),
        "push static 0\ncall Helper.run 0\n",
    )
    .unwrap();
    let out = dir.path().join("out.asm");

    driver::run(&cli(dir.path().to_path_buf(), out.clone(), false)).unwrap();

    let asm = fs::read_to_string(&out).unwrap();
    // Each file's static slot 0 gets its own label: isolation per file_prefix.
    assert!(asm.contains("@Foo.0"));
    assert!(asm.contains("@Bar.0"));
    // The callee's return-label counter is shared across files in one run.
    assert!(asm.contains("(Helper.run$ret.1)"));
    assert!(asm.contains("(Helper.run$ret.2)"));
}

#[test]
fn boot_flag_prepends_sp_init_and_sys_init_call() {
    let dir = tempdir().unwrap();
    let src = dir.path().join("Main.vm");
    fs::write(&src, "function Main.main 0\nreturn\n").unwrap();
    let out = dir.path().join("out.asm");

    driver::run(&cli(src, out.clone(), true)).unwrap();

    let asm = fs::read_to_string(&out).unwrap();
    assert!(asm.starts_with("@256\nD=A\n@SP\nM=D\n"));
    let boot_end = asm.find("(Sys.init$ret.1)").expect("bootstrap return label");
    let main_start = asm.find("(Main.main)").expect("function label");
    assert!(boot_end < main_start, "bootstrap must precede translated files");
}

#[test]
fn rejects_non_vm_single_file_input() {
    let dir = tempdir().unwrap();
    let src = dir.path().join("Demo.txt");
    fs::write(&src, "push constant 1\n").unwrap();
    let out = dir.path().join("out.asm");

    let err = driver::run(&cli(src, out, false)).unwrap_err();
    assert!(err.to_string().contains(".vm"));
}

#[test]
fn parser_error_aborts_the_whole_run_with_no_output_written() {
    let dir = tempdir().unwrap();
    let src = dir.path().join("Bad.vm");
    fs::write(&src, "push constant 1\nbogus 2 3 4\n").unwrap();
    let out = dir.path().join("out.asm");

    assert!(driver::run(&cli(src, out.clone(), false)).is_err());
    assert!(!out.exists());
}

#[test]
fn eq_gt_lt_counters_increment_independently_across_a_stream() {
    let lines: Vec<String> = "push constant 5\npush constant 3\neq\npush constant 1\ngt\neq\nlt"
        .lines()
        .map(str::to_string)
        .collect();
    let filename = PathBuf::from("Demo.vm");
    let parsed = parse(&lines, &filename).unwrap();

    let mut gen = CodeGen::new();
    gen.begin_file("Demo");
    let asm: String = parsed
        .iter()
        .map(|line| gen.emit(line).unwrap())
        .collect();

    assert!(asm.contains("(EQ1)"));
    assert!(asm.contains("(GT1)"));
    assert!(asm.contains("(EQ2)"));
    assert!(asm.contains("(LT1)"));
}

#[test]
fn full_call_and_return_round_trip_matches_spec_scenario() {
    let lines: Vec<String> = "function Mult.mult 0\ncall Mult.mult 0\nreturn"
        .lines()
        .map(str::to_string)
        .collect();
    let filename = PathBuf::from("Demo.vm");
    let parsed = parse(&lines, &filename).unwrap();

    let mut gen = CodeGen::new();
    gen.begin_file("Demo");
    let asm: String = parsed
        .iter()
        .map(|line| gen.emit(line).unwrap())
        .collect();

    assert!(asm.contains("(Mult.mult)"));
    assert!(asm.contains("@Mult.mult\n0;JMP\n(Mult.mult$ret.1)\n"));
    assert!(asm.contains("@LCL\nD=M\n@R13\nM=D\n"));
    assert!(asm.contains("@R14\nA=M\n0;JMP\n"));
}

#[test]
fn emitted_output_contains_only_trace_comments_labels_and_instructions() {
    let lines: Vec<String> = "push constant 7\npush constant 8\nadd\nlabel DONE\ngoto DONE"
        .lines()
        .map(str::to_string)
        .collect();
    let filename = PathBuf::from("Demo.vm");
    let parsed = parse(&lines, &filename).unwrap();

    let mut gen = CodeGen::new();
    gen.begin_file("Demo");
    let asm: String = parsed
        .iter()
        .map(|line| gen.emit(line).unwrap())
        .collect();

    for line in asm.lines() {
        let is_comment = line.starts_with("// ---");
        let is_label = line.starts_with('(') && line.ends_with(')');
        let is_address = line.starts_with('@');
        let is_c_instruction = line.contains('=') || line.contains(';');
        assert!(
            is_comment || is_label || is_address || is_c_instruction,
            "unexpected output line: {line:?}"
        );
    }
}
