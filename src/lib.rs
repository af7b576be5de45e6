//! A translator from a stack-oriented VM language into Hack-style target
//! assembly: lexical normalization and parsing ([`utils::parser`]), code
//! generation ([`utils::code_writer`]), and the driver that ties them
//! together for a whole run ([`driver`]).

pub mod cli;
pub mod driver;
pub mod error;
pub mod prelude;
pub mod utils;

pub use error::{ParserError, ParserErrorKind, TranslatorError};
pub use prelude::{ArithmeticOp, Command, ParsedLine, Segment};
pub use utils::code_writer::{CodeGen, TranslationUnitState};
pub use utils::parser::parse;
