//! Intel 8080 emulator binary.
//!
//! Runs a CP/M program to completion, an arcade ROM headless for a fixed
//! number of frames, or a few instructions of either with a state dump.
//! Set `RUST_LOG` for diagnostics.

use std::fs;
use std::path::{Path, PathBuf};
use std::process;
use std::time::Instant;

use clap::{Parser, Subcommand};
use emu_8080::{Machine, MachineConfig, Result};
use emu_core::Observable;
use intel_8080::Mode;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "emu-8080", version, about = "Intel 8080 emulator")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run a CP/M .COM program, printing its console output.
    Program {
        /// Program image, loaded at 0100h.
        file: PathBuf,

        /// Stop after this many instructions if the program has not exited.
        #[arg(long, default_value_t = 10_000_000_000)]
        max_instructions: u64,
    },
    /// Run an arcade ROM headless.
    Arcade {
        /// ROM image, loaded at 0000h.
        file: PathBuf,

        #[arg(long, default_value_t = 600)]
        frames: u32,

        /// CPU cycles between the mid-screen and end-of-screen interrupts.
        #[arg(long, default_value_t = MachineConfig::arcade().cycles_per_interrupt)]
        cycles_per_interrupt: u32,
    },
    /// Execute a few instructions and print the requested state.
    Step {
        /// Program or ROM image, loaded at the mode's start address.
        file: PathBuf,

        /// `arcade` or `console`.
        #[arg(long, default_value_t = Mode::Arcade)]
        mode: Mode,

        #[arg(long, default_value_t = 1)]
        instructions: u64,

        /// State paths to print, e.g. `cpu.hl` or `memory.0x2400`.
        #[arg(long = "show", default_values = ["cpu.pc", "cpu.sp", "cpu.psw", "cpu.cycles"])]
        show: Vec<String>,
    },
}

fn read_image(path: &Path) -> Result<Vec<u8>> {
    let image = fs::read(path)?;
    info!("read {} bytes from {}", image.len(), path.display());
    Ok(image)
}

fn run_program(file: &Path, max_instructions: u64) -> Result<()> {
    let mut machine = Machine::new(MachineConfig::console());
    machine.load(&read_image(file)?)?;

    let start = Instant::now();
    let instructions = machine.run_until_halt(max_instructions);
    let elapsed = start.elapsed();

    println!();
    if !machine.is_halted() {
        info!("stopped after {max_instructions} instructions without exiting");
    }
    report(instructions, machine.clock_count(), elapsed.as_secs_f64());
    Ok(())
}

fn run_arcade(file: &Path, frames: u32, cycles_per_interrupt: u32) -> Result<()> {
    let config = MachineConfig {
        cycles_per_interrupt,
        ..MachineConfig::arcade()
    };
    let mut machine = Machine::new(config);
    machine.load(&read_image(file)?)?;

    let start = Instant::now();
    for frame in 0..frames {
        machine.run_frame();
        if machine.is_halted() {
            info!("CPU halted in frame {frame}");
            break;
        }
    }
    let elapsed = start.elapsed();

    let lit = machine.vram().iter().map(|b| b.count_ones()).sum::<u32>();
    info!("{lit} pixels lit, output ports {:02X?}", machine.output_ports());
    report(
        machine.instruction_count(),
        machine.clock_count(),
        elapsed.as_secs_f64(),
    );
    Ok(())
}

fn run_step(file: &Path, mode: Mode, instructions: u64, show: &[String]) -> Result<()> {
    let mut machine = Machine::new(MachineConfig::for_mode(mode));
    machine.load(&read_image(file)?)?;
    let executed = machine.run_until_halt(instructions);
    info!("{mode}: executed {executed} instructions");

    for path in show {
        match machine.query(path) {
            Some(value) => println!("{path} = {value}"),
            None => println!("{path} = ?"),
        }
    }
    Ok(())
}

#[allow(clippy::cast_precision_loss)]
fn report(instructions: u64, cycles: u64, seconds: f64) {
    info!(
        "{instructions} instructions, {cycles} cycles in {seconds:.2}s ({:.1} MIPS)",
        instructions as f64 / seconds.max(f64::EPSILON) / 1_000_000.0
    );
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Command::Program {
            file,
            max_instructions,
        } => run_program(&file, max_instructions),
        Command::Arcade {
            file,
            frames,
            cycles_per_interrupt,
        } => run_arcade(&file, frames, cycles_per_interrupt),
        Command::Step {
            file,
            mode,
            instructions,
            show,
        } => run_step(&file, mode, instructions, &show),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}
