use anyhow::Context;
use clap::Parser;
use env_logger::Env;
use mos6502_emu::bus::BusInterface;
use mos6502_emu::{CpuError, CpuRegisters, CpuVariant, Mos6502, Mos6502Config, StatusFlags, opcodes};
use serde::Deserialize;
use std::convert::Infallible;
use std::fs::File;
use std::io::BufReader;
use std::mem;
use std::path::PathBuf;

// (address, value, "read" | "write"), matching the test files' cycle records
type BusCycle = (u16, u8, &'static str);

struct Bus {
    ram: Vec<u8>,
    addresses_written: Vec<u16>,
    cycles: Vec<BusCycle>,
}

impl Bus {
    fn new() -> Self {
        Self { ram: vec![0; 64 * 1024], addresses_written: Vec::new(), cycles: Vec::new() }
    }

    fn clear(&mut self) {
        for address in mem::take(&mut self.addresses_written) {
            self.ram[address as usize] = 0;
        }
        self.cycles.clear();
    }

    fn load(&mut self, ram: &[(u16, u8)]) {
        for &(address, value) in ram {
            self.ram[address as usize] = value;
            self.addresses_written.push(address);
        }
    }
}

impl BusInterface for Bus {
    type Error = Infallible;

    #[inline]
    fn read(&mut self, address: u16) -> Result<u8, Self::Error> {
        let value = self.ram[address as usize];
        self.cycles.push((address, value, "read"));
        Ok(value)
    }

    #[inline]
    fn write(&mut self, address: u16, value: u8) -> Result<(), Self::Error> {
        self.ram[address as usize] = value;
        self.addresses_written.push(address);
        self.cycles.push((address, value, "write"));
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
struct SystemState {
    pc: u16,
    s: u8,
    a: u8,
    x: u8,
    y: u8,
    p: u8,
    ram: Vec<(u16, u8)>,
}

#[derive(Debug, Clone, Deserialize)]
struct TestDescription {
    name: String,
    initial: SystemState,
    #[serde(rename = "final")]
    final_: SystemState,
    cycles: Vec<(u16, u8, String)>,
}

#[derive(Debug, Parser)]
struct Args {
    /// Directory containing one JSON test file per opcode (00.json through ff.json)
    #[arg(long, short = 'd')]
    dir_path: PathBuf,

    /// CPU variant to test
    #[arg(long, value_enum, default_value_t)]
    variant: CpuVariant,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let config = Mos6502Config { variant: args.variant };
    let mut bus = Bus::new();

    log::info!("Running tests in '{}' against {}", args.dir_path.display(), args.variant);

    let mut total_tests = 0;
    let mut total_failures = 0;
    for opcode in 0x00..=0xFF {
        if opcodes::lookup(opcode).instruction().is_none() {
            // Undocumented opcodes halt the CPU; nothing to compare against
            continue;
        }

        let file_path = args.dir_path.join(format!("{opcode:02x}.json"));
        let file = File::open(&file_path)
            .with_context(|| format!("Unable to open '{}'", file_path.display()))?;
        let tests: Vec<TestDescription> = serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("Unable to parse '{}'", file_path.display()))?;

        let mut failures = 0;
        let test_count = tests.len();
        for test in tests {
            bus.clear();
            bus.load(&test.initial.ram);

            let mut cpu = Mos6502::new(config);
            cpu.set_registers(CpuRegisters {
                accumulator: test.initial.a,
                x: test.initial.x,
                y: test.initial.y,
                status: StatusFlags::from_byte(test.initial.p),
                pc: test.initial.pc,
                sp: test.initial.s,
            });

            let cycles = match cpu.step(&mut bus) {
                Ok(cycles) => cycles,
                Err(CpuError::IllegalOpcode { opcode, pc }) => {
                    anyhow::bail!("Documented opcode {opcode:02X} at {pc:04X} reported as illegal")
                }
                Err(CpuError::Bus(err)) => match err {},
            };

            if check_state(&cpu, &bus, &test.final_, &test.cycles, cycles) {
                failures += 1;
                log::debug!("Above failures in '{}'", test.name);
            }
        }

        if failures != 0 {
            log::error!("Failed {failures} out of {test_count} tests for opcode {opcode:02X}");
        }

        total_tests += test_count;
        total_failures += failures;
    }

    log::info!("Passed {} out of {total_tests} tests", total_tests - total_failures);

    Ok(())
}

fn check_state(
    cpu: &Mos6502,
    bus: &Bus,
    final_state: &SystemState,
    cycles: &[(u16, u8, String)],
    actual_cycles: u32,
) -> bool {
    let mut errors = false;

    for &(address, expected_value) in &final_state.ram {
        let actual_value = bus.ram[address as usize];
        if expected_value != actual_value {
            errors = true;
            log::debug!(
                "RAM[{address:04X}]: expected={expected_value:02X}, actual={actual_value:02X}"
            );
        }
    }

    // The B flag only exists in pushed copies of P
    let registers = cpu.registers();
    errors |= check_register("A", final_state.a, registers.accumulator);
    errors |= check_register("X", final_state.x, registers.x);
    errors |= check_register("Y", final_state.y, registers.y);
    errors |= check_register("S", final_state.s, registers.sp);
    errors |= check_register("P", final_state.p | 0x10, cpu.status() | 0x10);

    if final_state.pc != registers.pc {
        log::debug!("PC: expected={:04X} actual={:04X}", final_state.pc, registers.pc);
        errors = true;
    }

    if cycles.len() != actual_cycles as usize {
        log::debug!(
            "Cycle count does not match: expected={}, actual={actual_cycles}",
            cycles.len()
        );
        log::debug!("  Expected bus activity: {cycles:?}");
        log::debug!("  Actual bus activity: {:?}", bus.cycles);
        errors = true;
    }

    errors
}

fn check_register(name: &str, expected: u8, actual: u8) -> bool {
    if expected != actual {
        log::debug!("{name}: expected={expected:02X}, actual={actual:02X}");
        true
    } else {
        false
    }
}
