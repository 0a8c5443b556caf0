use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use pcvm::cpu::CpuError;
use pcvm::display::DisplayConfig;
use pcvm::vm::{RunResult, Vm, VmConfig, VmError};

/// A real-mode x86 interpreter with a text-mode BIOS and display bridge.
///
/// The flags here are a convenience wrapper around the library; they are
/// not part of the interpreter's contract.
#[derive(Parser, Debug)]
#[command(name = "pcvm", version, about)]
struct Args {
    /// Flat binary to load before running (e.g. a boot sector image).
    program: Option<PathBuf>,

    /// Linear address to load the program at.
    #[arg(long, value_parser = parse_hex_or_dec, default_value = "0x7C00")]
    load_addr: u32,

    /// Integer pixel scale for each 8x16 glyph cell.
    #[arg(long, default_value_t = 2)]
    scale: usize,

    /// Run without opening a display window.
    #[arg(long)]
    headless: bool,
}

fn parse_hex_or_dec(s: &str) -> Result<u32, std::num::ParseIntError> {
    match s.strip_prefix("0x") {
        Some(hex) => u32::from_str_radix(hex, 16),
        None => s.parse(),
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    let config = VmConfig {
        program: args.program,
        load_addr: args.load_addr,
        headless: args.headless,
        display: DisplayConfig {
            scale: args.scale,
            ..DisplayConfig::default()
        },
    };

    let mut vm = match Vm::new(config) {
        Ok(vm) => vm,
        Err(err) => {
            eprintln!("failed to start: {err}");
            return ExitCode::FAILURE;
        }
    };

    match vm.run() {
        Ok(RunResult::Halted) => ExitCode::SUCCESS,
        Ok(RunResult::Quit) => ExitCode::SUCCESS,
        Err(VmError::Cpu(CpuError::InvalidOpcode { opcode, cs, ip })) => {
            println!("Unknown opcode 0x{opcode:02X} at CS:IP={cs:04X}:{ip:04X}");
            ExitCode::FAILURE
        }
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}
