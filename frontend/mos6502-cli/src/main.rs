mod bus;
mod config;

use crate::bus::MainBus;
use crate::config::{CliConfig, ImageConfig};
use anyhow::Context;
use clap::Parser;
use env_logger::Env;
use mos6502_emu::{CpuError, CpuVariant, Mos6502, Mos6502Config};
use std::fmt::{Display, Formatter};
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Parser)]
struct Args {
    /// TOML config file; command-line options override its values
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,

    /// Binary image to load into RAM, as PATH@ADDRESS with the address in hex. May be repeated
    #[arg(long = "image", short = 'i')]
    images: Vec<ImageConfig>,

    /// CPU variant
    #[arg(long, value_enum)]
    variant: Option<CpuVariant>,

    /// Value (hex) to write to the RESET vector at $FFFC before reset
    #[arg(long, value_parser = config::parse_hex_u16)]
    reset_vector: Option<u16>,

    /// Maximum number of steps to run; 0 for no limit
    #[arg(long)]
    max_steps: Option<u64>,

    /// Stop when an instruction leaves PC unchanged (e.g. JMP to itself)
    #[arg(long)]
    stop_on_self_jump: Option<bool>,

    /// Log the CPU state after every step at trace level
    #[arg(long)]
    trace: bool,
}

impl Args {
    fn apply_overrides(self, config: &mut CliConfig) {
        config.images.extend(self.images);

        if let Some(variant) = self.variant {
            config.variant = variant;
        }
        if let Some(reset_vector) = self.reset_vector {
            config.reset_vector = Some(reset_vector);
        }
        if let Some(max_steps) = self.max_steps {
            config.max_steps = max_steps;
        }
        if let Some(stop_on_self_jump) = self.stop_on_self_jump {
            config.stop_on_self_jump = stop_on_self_jump;
        }
        config.trace |= self.trace;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StopReason {
    StepLimit,
    SelfJump(u16),
    IllegalOpcode { opcode: u8, pc: u16 },
}

impl Display for StopReason {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::StepLimit => write!(f, "step limit reached"),
            Self::SelfJump(pc) => write!(f, "trapped at ${pc:04X}"),
            Self::IllegalOpcode { opcode, pc } => {
                write!(f, "illegal opcode ${opcode:02X} at ${pc:04X}")
            }
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => CliConfig::from_file(path)?,
        None => CliConfig::default(),
    };
    args.apply_overrides(&mut config);

    log::info!("Running with CPU variant {}", config.variant);

    run(&config)
}

fn run(config: &CliConfig) -> anyhow::Result<()> {
    let mut bus = MainBus::new();
    bus.reset();

    for image in &config.images {
        let data = fs::read(&image.path)
            .with_context(|| format!("Unable to read image '{}'", image.path.display()))?;
        bus.load(image.load_address, &data)
            .with_context(|| format!("Unable to load image '{}'", image.path.display()))?;

        log::info!(
            "Loaded {} bytes from '{}' at ${:04X}",
            data.len(),
            image.path.display(),
            image.load_address
        );
    }

    if let Some(reset_vector) = config.reset_vector {
        bus.set_reset_vector(reset_vector);
    }

    let mut cpu = Mos6502::new(Mos6502Config { variant: config.variant });
    let mut total_cycles = u64::from(cpu.reset(&mut bus)?);
    log::info!("{cpu}");

    let mut steps: u64 = 0;
    let stop_reason = loop {
        if config.max_steps != 0 && steps >= config.max_steps {
            break StopReason::StepLimit;
        }

        let pc = cpu.pc();
        match cpu.step(&mut bus) {
            Ok(cycles) => total_cycles += u64::from(cycles),
            Err(CpuError::IllegalOpcode { opcode, pc }) => {
                break StopReason::IllegalOpcode { opcode, pc };
            }
            Err(CpuError::Bus(err)) => match err {},
        }
        steps += 1;

        if config.trace {
            log::trace!("{cpu}");
        }

        if config.stop_on_self_jump && cpu.pc() == pc {
            break StopReason::SelfJump(pc);
        }
    };

    log::info!("Stopped after {steps} steps ({total_cycles} cycles): {stop_reason}");
    log::info!("{cpu}");

    if let StopReason::IllegalOpcode { opcode, pc } = stop_reason {
        anyhow::bail!("CPU halted on illegal opcode ${opcode:02X} at ${pc:04X}");
    }

    Ok(())
}
