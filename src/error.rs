/// The kinds of problems the [`Parser`](crate::utils::parser::Parser) can find in a raw source
/// line before it ever reaches code generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParserErrorKind {
    UnrecognizedCommand,
    UnrecognizedMemorySegment(String),
    IllegalOffset(String),
    EmptyInput,
}

impl std::fmt::Display for ParserErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParserErrorKind::UnrecognizedCommand => write!(f, "unrecognized command"),
            ParserErrorKind::UnrecognizedMemorySegment(seg) => {
                write!(f, "unrecognized memory segment '{seg}'")
            }
            ParserErrorKind::IllegalOffset(text) => write!(f, "illegal offset '{text}'"),
            ParserErrorKind::EmptyInput => write!(f, "no source commands provided"),
        }
    }
}

/// Raised while tokenizing and validating a VM command.
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
#[error("{filename}:{line_no}: {kind} (in '{raw}')")]
pub struct ParserError {
    pub kind: ParserErrorKind,
    pub raw: String,
    pub line_no: usize,
    /// The source file's display path, already rendered at construction time:
    /// `PathBuf`/`Path` have no `Display` impl, so `thiserror`'s derive needs
    /// a plain `String` here rather than the raw field.
    pub filename: String,
}

/// Raised during code generation when a parsed command violates a semantic constraint
/// the grammar did not catch.
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum TranslatorError {
    #[error("segment '{0}' is not valid here")]
    InvalidSegment(String),
    #[error("cannot pop to the constant segment")]
    CannotPopToConstant,
    #[error("temp offset {0} is out of range (0..=7)")]
    TempOutOfRange(u16),
    #[error("pointer offset {0} is out of range (0 or 1)")]
    PointerOutOfRange(u16),
    #[error("scratch register R{0} is out of range (R13..=R15)")]
    ScratchRegisterOutOfRange(u16),
}
