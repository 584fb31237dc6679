use std::fs;
use std::path::{Path, PathBuf};

use ansi_term::Colour;
use anyhow::{Context, Result};
use clap::Parser;

use soft8086::{
    disassemble, execute, MemoryRegion, RegisterFile, WordRegister, PRINTABLE_REGISTERS,
};

/// 1 MiB of addressable memory, the full 20 bit bus.
const MEMORY_SIZE_POW2: u32 = 20;

/// 8086 binary simulator
/// Loads raw machine code images at address 0, executes the decoded
/// instructions and prints an execution trace followed by the final
/// register state.
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct CommandLineArguments {
    /// Machine code image files, executed one after the other
    #[arg(required = true)]
    programs: Vec<PathBuf>,

    /// Print the decoded listing instead of executing
    #[arg(short, long)]
    disassemble: bool,

    /// Write the final memory content to "memory.dump" after each run
    #[arg(long)]
    dump: bool,
}

fn print_err(message: String) {
    println!("{}", Colour::Red.paint(message));
}

fn print_registers(registers: &RegisterFile) {
    println!("Final registers:");
    for register in PRINTABLE_REGISTERS {
        let value = registers.read_word(register);
        if value == 0 {
            continue;
        }
        println!("  {}: 0x{:04x} ({})", register, value, value);
    }
    if registers.read_word(WordRegister::Flags) != 0 {
        println!("  flags: {}", registers.flags());
    }
}

fn run_program(program: &PathBuf, parameters: &CommandLineArguments) -> Result<()> {
    let image = fs::read(program)
        .with_context(|| format!("could not read program image {}", program.display()))?;

    let mut memory = MemoryRegion::allocate(MEMORY_SIZE_POW2);
    let byte_count = memory.load(0, &image);
    if byte_count < image.len() {
        print_err(format!(
            "image {} is larger than memory, truncated to {} bytes",
            program.display(),
            byte_count
        ));
    }

    if parameters.disassemble {
        for instruction in disassemble(0, byte_count, &memory)? {
            println!("{}", instruction);
        }
        return Ok(());
    }

    let mut registers = RegisterFile::new();
    let log_lines = execute(&mut memory, &mut registers, byte_count)?;
    for log_line in &log_lines {
        println!("{}", log_line);
    }
    println!();
    print_registers(&registers);

    if parameters.dump {
        memory
            .save(Path::new("memory.dump"))
            .context("could not write memory.dump")?;
    }

    Ok(())
}

fn main() -> Result<()> {
    let parameters = CommandLineArguments::parse();
    let mut failures = 0;

    for program in &parameters.programs {
        println!("--- {} ---", program.display());
        if let Err(error) = run_program(program, &parameters) {
            print_err(format!("{:#}", error));
            failures += 1;
        }
        println!();
    }

    if failures > 0 {
        anyhow::bail!("{} program(s) failed", failures);
    }

    Ok(())
}
