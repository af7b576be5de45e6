//! Lexical normalization and parsing of VM source text into [`ParsedLine`]s.

use crate::error::{ParserError, ParserErrorKind};
use crate::prelude::{ArithmeticOp, Command, ParsedLine, Segment};
use std::path::Path;

/// Strips a trailing `//` comment and surrounding whitespace from one source line.
///
/// Returns `None` for lines that normalize to nothing (blank lines, full-line
/// comments) so the caller can drop them while still advancing the line counter.
fn normalize_line(line: &str) -> Option<&str> {
    let without_comment = match line.find("//") {
        Some(pos) => &line[..pos],
        None => line,
    };
    let trimmed = without_comment.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}

/// Tokenizes and validates every non-empty line of a VM source file, producing a
/// typed command stream or the first [`ParserError`] encountered.
///
/// `filename` is only used to annotate errors; `lines` is the raw source text
/// split by line, 1-based line numbers are assigned in iteration order.
pub fn parse(lines: &[String], filename: &Path) -> Result<Vec<ParsedLine>, ParserError> {
    let mut commands = Vec::new();
    for (idx, raw_line) in lines.iter().enumerate() {
        let line_no = idx + 1;
        let Some(normalized) = normalize_line(raw_line) else {
            continue;
        };
        let command = parse_command(normalized, line_no, filename)?;
        commands.push(ParsedLine {
            command,
            line_no,
            raw: normalized.to_string(),
        });
    }
    Ok(commands)
}

fn parse_command(line: &str, line_no: usize, filename: &Path) -> Result<Command, ParserError> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    match tokens.as_slice() {
        [single] => parse_nullary(single, line_no, filename, line),
        [keyword, name] => parse_branch(keyword, name, line_no, filename, line),
        [keyword, arg1, arg2] => parse_ternary(keyword, arg1, arg2, line_no, filename, line),
        _ => Err(err(
            ParserErrorKind::UnrecognizedCommand,
            line,
            line_no,
            filename,
        )),
    }
}

fn parse_nullary(
    token: &str,
    line_no: usize,
    filename: &Path,
    raw: &str,
) -> Result<Command, ParserError> {
    if token == "return" {
        return Ok(Command::Return);
    }
    if let Some(op) = ArithmeticOp::parse(token) {
        return Ok(Command::Arithmetic(op));
    }
    Err(err(
        ParserErrorKind::UnrecognizedCommand,
        raw,
        line_no,
        filename,
    ))
}

fn parse_branch(
    keyword: &str,
    name: &str,
    line_no: usize,
    filename: &Path,
    raw: &str,
) -> Result<Command, ParserError> {
    match keyword {
        "label" => Ok(Command::Label(name.to_string())),
        "goto" => Ok(Command::Goto(name.to_string())),
        "if-goto" => Ok(Command::IfGoto(name.to_string())),
        _ => Err(err(
            ParserErrorKind::UnrecognizedCommand,
            raw,
            line_no,
            filename,
        )),
    }
}

fn parse_ternary(
    keyword: &str,
    arg1: &str,
    arg2: &str,
    line_no: usize,
    filename: &Path,
    raw: &str,
) -> Result<Command, ParserError> {
    match keyword {
        "push" | "pop" => {
            let segment = Segment::parse(arg1).ok_or_else(|| {
                err(
                    ParserErrorKind::UnrecognizedMemorySegment(arg1.to_string()),
                    raw,
                    line_no,
                    filename,
                )
            })?;
            if keyword == "pop" && segment == Segment::Constant {
                return Err(err(
                    ParserErrorKind::UnrecognizedMemorySegment(arg1.to_string()),
                    raw,
                    line_no,
                    filename,
                ));
            }
            let offset = parse_offset(arg2, raw, line_no, filename)?;
            if keyword == "push" {
                Ok(Command::Push { segment, offset })
            } else {
                Ok(Command::Pop { segment, offset })
            }
        }
        "function" => {
            let n_locals = parse_offset(arg2, raw, line_no, filename)?;
            Ok(Command::Function {
                name: arg1.to_string(),
                n_locals,
            })
        }
        "call" => {
            let n_args = parse_offset(arg2, raw, line_no, filename)?;
            Ok(Command::Call {
                name: arg1.to_string(),
                n_args,
            })
        }
        _ => Err(err(
            ParserErrorKind::UnrecognizedCommand,
            raw,
            line_no,
            filename,
        )),
    }
}

/// Parses a non-negative decimal integer, the only numeric form the VM grammar allows.
fn parse_offset(text: &str, raw: &str, line_no: usize, filename: &Path) -> Result<u16, ParserError> {
    if text.is_empty() || !text.chars().all(|c| c.is_ascii_digit()) {
        return Err(err(
            ParserErrorKind::IllegalOffset(text.to_string()),
            raw,
            line_no,
            filename,
        ));
    }
    text.parse::<u16>().map_err(|_| {
        err(
            ParserErrorKind::IllegalOffset(text.to_string()),
            raw,
            line_no,
            filename,
        )
    })
}

fn err(kind: ParserErrorKind, raw: &str, line_no: usize, filename: &Path) -> ParserError {
    ParserError {
        kind,
        raw: raw.to_string(),
        line_no,
        filename: filename.display().to_string(),
    }
}
