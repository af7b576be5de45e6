//! Translates parsed VM [`Command`]s into target-assembly text.
//!
//! [`CodeGen`] owns the [`TranslationUnitState`] for an entire run: the current
//! file prefix, the current function (for label scoping), the comparison-label
//! counters, the per-callee call counters, and the static-variable label map.
//! Everything except `file_prefix` persists across files in a single run so
//! that every emitted label stays globally unique in the combined output.

use crate::error::TranslatorError;
use crate::prelude::{ArithmeticOp, Command, ParsedLine, Segment};
use std::collections::HashMap;

/// The number of words saved on the stack for a call frame: return address
/// plus the four caller segment pointers.
const CALL_FRAME_SIZE: u16 = 5;

/// Per-run state mutated as commands are translated. See §3 of the spec for
/// the invariants this struct is responsible for upholding.
#[derive(Debug, Default)]
pub struct TranslationUnitState {
    pub file_prefix: String,
    pub current_function: String,
    eq_count: u32,
    gt_count: u32,
    lt_count: u32,
    call_counts: HashMap<String, u32>,
    static_labels: HashMap<String, String>,
}

impl TranslationUnitState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Called when the driver begins translating a new input file. Only the
    /// static-label prefix resets; everything else is run-scoped.
    pub fn begin_file(&mut self, file_prefix: &str) {
        self.file_prefix = file_prefix.to_string();
    }
}

/// Generates Hack-style target assembly for one translation run.
pub struct CodeGen {
    state: TranslationUnitState,
}

impl CodeGen {
    pub fn new() -> Self {
        CodeGen {
            state: TranslationUnitState::new(),
        }
    }

    pub fn begin_file(&mut self, file_prefix: &str) {
        self.state.begin_file(file_prefix);
    }

    /// Translates one parsed command, prepending the `// --- <source> ---`
    /// trace comment the parser/codegen boundary always emits.
    pub fn emit(&mut self, parsed: &ParsedLine) -> Result<String, TranslatorError> {
        let body = match &parsed.command {
            Command::Arithmetic(op) => self.arithmetic(*op),
            Command::Push { segment, offset } => self.push(*segment, *offset)?,
            Command::Pop { segment, offset } => self.pop(*segment, *offset)?,
            Command::Label(name) => self.label(name),
            Command::Goto(name) => self.goto(name),
            Command::IfGoto(name) => self.if_goto(name),
            Command::Function { name, n_locals } => self.function(name, *n_locals),
            Command::Call { name, n_args } => self.call(name, *n_args),
            Command::Return => self.ret(),
        };
        Ok(format!("// --- {} ---\n{body}", parsed.raw))
    }

    /// The bootstrap prologue: initializes `SP` to 256 then falls through to a
    /// synthetic `call Sys.init 0`, built with the same call-emission logic
    /// used for ordinary calls.
    pub fn bootstrap(&mut self) -> String {
        let init = "@256\nD=A\n@SP\nM=D\n".to_string();
        format!("{init}{}", self.call("Sys.init", 0))
    }

    // --- push-D / pop-to-D building blocks -------------------------------

    fn push_d_epilogue() -> &'static str {
        "@SP\nA=M\nM=D\n@SP\nM=M+1\n"
    }

    fn pop_to_d_prologue() -> &'static str {
        "@SP\nAM=M-1\nD=M\n"
    }

    // --- push / pop --------------------------------------------------------

    fn push(&mut self, segment: Segment, offset: u16) -> Result<String, TranslatorError> {
        let load_d = match segment {
            Segment::Constant => format!("@{offset}\nD=A\n"),
            Segment::Static => {
                let label = self.static_label(offset);
                format!("@{label}\nD=M\n")
            }
            Segment::Temp => {
                let addr = temp_address(offset)?;
                format!("@{addr}\nD=M\n")
            }
            Segment::Pointer => {
                let symbol = pointer_symbol(offset)?;
                format!("@{symbol}\nD=M\n")
            }
            Segment::Local | Segment::Argument | Segment::This | Segment::That => {
                let symbol = segment.pointer_symbol().expect("segment has a pointer");
                format!("@{symbol}\nD=M\n@{offset}\nA=D+A\nD=M\n")
            }
        };
        Ok(format!("{load_d}{}", Self::push_d_epilogue()))
    }

    fn pop(&mut self, segment: Segment, offset: u16) -> Result<String, TranslatorError> {
        match segment {
            Segment::Constant => Err(TranslatorError::CannotPopToConstant),
            Segment::Temp => {
                let addr = temp_address(offset)?;
                Ok(format!("{}@{addr}\nM=D\n", Self::pop_to_d_prologue()))
            }
            Segment::Static => {
                let label = self.static_label(offset);
                Ok(format!("{}@{label}\nM=D\n", Self::pop_to_d_prologue()))
            }
            Segment::Pointer => {
                let symbol = pointer_symbol(offset)?;
                Ok(format!("{}@{symbol}\nM=D\n", Self::pop_to_d_prologue()))
            }
            Segment::Local | Segment::Argument | Segment::This | Segment::That => {
                let symbol = segment.pointer_symbol().expect("segment has a pointer");
                let body = match offset {
                    0 => format!("{}@{symbol}\nA=M\nM=D\n", Self::pop_to_d_prologue()),
                    1 => format!("{}@{symbol}\nA=M+1\nM=D\n", Self::pop_to_d_prologue()),
                    k => format!(
                        "@{symbol}\nD=M\n@{k}\nD=D+A\n@R13\nM=D\n{}@R13\nA=M\nM=D\n",
                        Self::pop_to_d_prologue()
                    ),
                };
                Ok(body)
            }
        }
    }

    fn static_label(&mut self, offset: u16) -> String {
        let key = format!("{}.{offset}", self.state.file_prefix);
        self.state
            .static_labels
            .entry(key.clone())
            .or_insert(key)
            .clone()
    }

    // --- arithmetic & logical ------------------------------------------------

    fn arithmetic(&mut self, op: ArithmeticOp) -> String {
        match op {
            ArithmeticOp::Add => format!("{}A=A-1\nM=M+D\n", Self::pop_to_d_prologue()),
            ArithmeticOp::Sub => format!("{}A=A-1\nM=M-D\n", Self::pop_to_d_prologue()),
            ArithmeticOp::And => format!("{}A=A-1\nM=M&D\n", Self::pop_to_d_prologue()),
            ArithmeticOp::Or => format!("{}A=A-1\nM=M|D\n", Self::pop_to_d_prologue()),
            ArithmeticOp::Neg => "@SP\nA=M-1\nM=-M\n".to_string(),
            ArithmeticOp::Not => "@SP\nA=M-1\nM=!M\n".to_string(),
            ArithmeticOp::Eq => {
                self.state.eq_count += 1;
                self.comparison(&format!("EQ{}", self.state.eq_count), "JEQ")
            }
            ArithmeticOp::Gt => {
                self.state.gt_count += 1;
                self.comparison(&format!("GT{}", self.state.gt_count), "JGT")
            }
            ArithmeticOp::Lt => {
                self.state.lt_count += 1;
                self.comparison(&format!("LT{}", self.state.lt_count), "JLT")
            }
        }
    }

    /// The shared skeleton behind `eq`, `gt` and `lt`: compare, jump to the
    /// true branch on `condition`, and merge back with the boolean result on
    /// top of the stack.
    fn comparison(&self, label: &str, condition: &str) -> String {
        format!(
            "{prologue}A=A-1\nD=M-D\n@{label}\nD;{condition}\nD=0\n@{label}_END\n0;JMP\n({label})\nD=-1\n({label}_END)\n@SP\nA=M-1\nM=D\n",
            prologue = Self::pop_to_d_prologue()
        )
    }

    // --- branching -----------------------------------------------------------

    fn scoped_label(&self, name: &str) -> String {
        if self.state.current_function.is_empty() {
            format!("${name}")
        } else {
            format!("{}${name}", self.state.current_function)
        }
    }

    fn label(&self, name: &str) -> String {
        format!("({})\n", self.scoped_label(name))
    }

    fn goto(&self, name: &str) -> String {
        format!("@{}\n0;JMP\n", self.scoped_label(name))
    }

    fn if_goto(&self, name: &str) -> String {
        format!(
            "{}@{}\nD;JNE\n",
            Self::pop_to_d_prologue(),
            self.scoped_label(name)
        )
    }

    // --- function / call / return --------------------------------------------

    fn function(&mut self, name: &str, n_locals: u16) -> String {
        self.state.current_function = name.to_string();
        let mut body = format!("({name})\n");
        let push_zero = format!("@0\nD=A\n{}", Self::push_d_epilogue());
        for _ in 0..n_locals {
            body.push_str(&push_zero);
        }
        body
    }

    fn call(&mut self, name: &str, n_args: u16) -> String {
        let k = {
            let count = self.state.call_counts.entry(name.to_string()).or_insert(0);
            *count += 1;
            *count
        };
        let return_label = format!("{name}$ret.{k}");

        let mut body = format!("@{return_label}\nD=A\n{}", Self::push_d_epilogue());
        for segment in ["LCL", "ARG", "THIS", "THAT"] {
            body.push_str(&format!("@{segment}\nD=M\n{}", Self::push_d_epilogue()));
        }
        body.push_str(&format!(
            "@SP\nD=M\n@{CALL_FRAME_SIZE}\nD=D-A\n@{n_args}\nD=D-A\n@ARG\nM=D\n"
        ));
        body.push_str("@SP\nD=M\n@LCL\nM=D\n");
        body.push_str(&format!("@{name}\n0;JMP\n({return_label})\n"));
        body
    }

    fn ret(&self) -> String {
        let mut body = String::new();
        body.push_str("@LCL\nD=M\n@R13\nM=D\n");
        body.push_str("@R13\nD=M\n@5\nA=D-A\nD=M\n@R14\nM=D\n");
        body.push_str(&format!("{}@ARG\nA=M\nM=D\n", Self::pop_to_d_prologue()));
        body.push_str("@ARG\nD=M+1\n@SP\nM=D\n");
        for (offset, symbol) in [(1, "THAT"), (2, "THIS"), (3, "ARG"), (4, "LCL")] {
            body.push_str(&format!(
                "@R13\nD=M\n@{offset}\nA=D-A\nD=M\n@{symbol}\nM=D\n"
            ));
        }
        body.push_str("@R14\nA=M\n0;JMP\n");
        body
    }
}

impl Default for CodeGen {
    fn default() -> Self {
        Self::new()
    }
}

fn temp_address(offset: u16) -> Result<u16, TranslatorError> {
    if offset > 7 {
        return Err(TranslatorError::TempOutOfRange(offset));
    }
    Ok(5 + offset)
}

fn pointer_symbol(offset: u16) -> Result<&'static str, TranslatorError> {
    match offset {
        0 => Ok("THIS"),
        1 => Ok("THAT"),
        other => Err(TranslatorError::PointerOutOfRange(other)),
    }
}
