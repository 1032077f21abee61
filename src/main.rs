use std::{fs, path::PathBuf};

use anyhow::Context;
use clap::Parser;
use log::debug;

use crate::{
    error::AsmError,
    parsing::{parse, Instruction, Line},
    symbols::SymbolTable,
};

mod code;
mod error;
mod parsing;
mod symbols;

/// Hack machine-language assembler
#[derive(Parser)]
#[command(about)]
struct Args {
    /// Input .asm file; output lands next to it with a .hack extension
    input: PathBuf,
}

fn asm_to_bin(asm_src: &str) -> Result<String, AsmError> {
    let lines = parse(asm_src).map_err(|e| AsmError::Parse(e.to_string()))?;
    let mut symbol_table = SymbolTable::new();

    // pass 1: keep the word-producing instructions, discard comments and
    // blanks, bind each label to the address of the instruction after it
    let mut instructions = Vec::new();
    let mut labels = 0usize;
    for line in lines {
        match line {
            Line::Label(l) => {
                let address = instructions.len() as u16;
                if let Some(first) = symbol_table.define_label(l.symbol.clone(), address) {
                    return Err(AsmError::DuplicateLabel {
                        label: l.symbol,
                        first,
                    });
                }
                labels += 1;
            }
            Line::A(inst) => instructions.push(Instruction::A(inst)),
            Line::C(inst) => instructions.push(Instruction::C(inst)),
            Line::Comment | Line::Empty => {}
        }
    }
    debug!("pass 1: {} instructions, {labels} labels", instructions.len());

    // pass 2: one 16-bit word per instruction; A-instructions may
    // allocate variable slots as a side effect
    let mut bin = String::with_capacity(instructions.len() * 17);
    for inst in instructions {
        match inst {
            Instruction::A(a) => bin.push_str(&a.to_binary(&mut symbol_table)),
            Instruction::C(c) => bin.push_str(&c.to_binary()),
        }
        bin.push('\n');
    }
    debug!(
        "pass 2: {} variables allocated",
        symbol_table.variables_allocated()
    );
    Ok(bin)
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let asm_src = fs::read_to_string(&args.input)
        .with_context(|| format!("reading {}", args.input.display()))?;
    let asm_bin = asm_to_bin(&asm_src)?;

    let out_path = args.input.with_extension("hack");
    fs::write(&out_path, asm_bin).with_context(|| format!("writing {}", out_path.display()))?;
    Ok(())
}
