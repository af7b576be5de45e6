//! Orchestrates a full translation run: resolve input sources, parse each
//! file, generate code against one shared [`CodeGen`], and write the result
//! only once every file has translated cleanly.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use log::{error, info};

use crate::cli::Cli;
use crate::utils::code_writer::CodeGen;
use crate::utils::parser;

/// Runs the translator end to end for the given CLI arguments.
///
/// `anyhow::Result` is used here, and only here: every function below this
/// one returns a typed error ([`crate::error::ParserError`] or
/// [`crate::error::TranslatorError`]) so callers can match on the kind of
/// failure. This top-level driver is the boundary where those typed errors
/// are flattened into a single reportable chain.
pub fn run(cli: &Cli) -> Result<()> {
    let sources = resolve_sources(&cli.src)?;
    if sources.is_empty() {
        bail!("no .vm files found under {}", cli.src.display());
    }

    info!("translating {} file(s)", sources.len());

    let mut gen = CodeGen::new();
    let mut output = String::new();

    if cli.boot {
        output.push_str(&gen.bootstrap());
    }

    for path in &sources {
        translate_file(&mut gen, path, &mut output)
            .with_context(|| format!("translating {}", path.display()))?;
    }

    fs::write(&cli.out, output)
        .with_context(|| format!("writing output to {}", cli.out.display()))?;

    info!("wrote {}", cli.out.display());
    Ok(())
}

/// Translates one `.vm` file, appending generated assembly to `output`.
/// Nothing is appended unless the entire file parses and generates cleanly.
fn translate_file(gen: &mut CodeGen, path: &Path, output: &mut String) -> Result<()> {
    let file_prefix = file_prefix(path)?;
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    let lines: Vec<String> = text.lines().map(str::to_string).collect();

    let parsed = parser::parse(&lines, path).map_err(|err| {
        error!("{err}");
        err
    })?;

    gen.begin_file(&file_prefix);
    let mut file_output = String::new();
    for line in &parsed {
        let asm = gen.emit(line).map_err(|err| {
            error!("{}:{}: {err}", path.display(), line.line_no);
            err
        })?;
        file_output.push_str(&asm);
    }

    output.push_str(&file_output);
    Ok(())
}

/// Resolves `src` into a sorted-by-directory-order list of `.vm` files: the
/// path itself if it is a single `.vm` file, or every top-level `.vm` file
/// directly inside it if it is a directory.
fn resolve_sources(src: &Path) -> Result<Vec<PathBuf>> {
    if src.is_dir() {
        let mut files = Vec::new();
        for entry in fs::read_dir(src).with_context(|| format!("reading directory {}", src.display()))? {
            let entry = entry?;
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) == Some("vm") {
                files.push(path);
            }
        }
        Ok(files)
    } else {
        if src.extension().and_then(|e| e.to_str()) != Some("vm") {
            bail!("input file must end in '.vm': {}", src.display());
        }
        Ok(vec![src.to_path_buf()])
    }
}

/// The label prefix for static variables: the file's stem, e.g. `Foo` for `Foo.vm`.
fn file_prefix(path: &Path) -> Result<String> {
    path.file_stem()
        .and_then(|s| s.to_str())
        .map(str::to_string)
        .with_context(|| format!("{} has no usable file stem", path.display()))
}
