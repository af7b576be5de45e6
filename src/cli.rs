//! Command-line surface for the translator binary.

use std::path::PathBuf;

use clap::Parser;

/// Translates a `.vm` file, or every `.vm` file in a directory, into Hack-style
/// target assembly.
#[derive(Parser, Debug)]
#[command(name = "vm_translator")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Translate stack-oriented VM source into target assembly", long_about = None)]
pub struct Cli {
    /// A single `.vm` file, or a directory containing one or more `.vm` files.
    #[arg(long)]
    pub src: PathBuf,

    /// Where to write the combined assembly output.
    #[arg(long, short, default_value = "out.asm")]
    pub out: PathBuf,

    /// Prepend the bootstrap sequence that initializes `SP` and calls `Sys.init`.
    #[arg(long)]
    pub boot: bool,
}
