//! Top-level state machine wiring memory, CPU, BIOS, and the optional
//! display together, and alternating instruction steps with display polls
//! the way a single-threaded cooperative loop would: the CPU never blocks
//! on host I/O, and the display is only consulted between instructions.

use std::path::PathBuf;

use thiserror::Error;
use tracing::{info, warn};

use crate::bios::Bios;
use crate::cpu::{Cpu, CpuError, StepOutcome};
use crate::display::{Display, DisplayConfig, DisplayError, PollResult};
use crate::loader::{self, LoaderError};
use crate::memory::Memory;

/// Address range the BIOS ROM occupies and is sealed read-only at boot.
const BIOS_ROM_ADDR: u32 = 0xF0000;
const BIOS_ROM_LEN: usize = 0x10000;

/// How many CPU steps run between display polls/presents. Matches roughly
/// one host frame's worth of instructions without pinning a cycle-accurate
/// rate, which is explicitly out of scope.
const STEPS_PER_FRAME: u32 = 2000;

#[derive(Debug, Error)]
pub enum VmError {
    #[error(transparent)]
    Cpu(#[from] CpuError),
    #[error(transparent)]
    Loader(#[from] LoaderError),
    #[error(transparent)]
    Display(#[from] DisplayError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunResult {
    Halted,
    Quit,
}

pub struct VmConfig {
    pub program: Option<PathBuf>,
    pub load_addr: u32,
    pub headless: bool,
    pub display: DisplayConfig,
}

impl Default for VmConfig {
    fn default() -> Self {
        VmConfig {
            program: None,
            load_addr: 0x7C00,
            headless: false,
            display: DisplayConfig::default(),
        }
    }
}

pub struct Vm {
    pub memory: Memory,
    pub cpu: Cpu,
    pub bios: Bios,
    display: Option<Display>,
}

impl Vm {
    pub fn new(config: VmConfig) -> Result<Self, VmError> {
        let mut memory = Memory::new();
        memory.set_readonly(BIOS_ROM_ADDR, BIOS_ROM_LEN, true);

        let cpu = Cpu::new();
        let bios = Bios::new();

        if let Some(path) = &config.program {
            // The BIOS ROM region is sealed first; a program loaded on top
            // of it would otherwise load cleanly and then silently fail to
            // execute, since writes there are discarded.
            memory.set_readonly(BIOS_ROM_ADDR, BIOS_ROM_LEN, false);
            let n = loader::load(path, config.load_addr, &mut memory)?;
            memory.set_readonly(BIOS_ROM_ADDR, BIOS_ROM_LEN, true);
            info!(bytes = n, addr = format!("{:05x}", config.load_addr), "loaded program");
        }

        let display = if config.headless {
            None
        } else {
            Some(Display::new(config.display)?)
        };

        Ok(Vm { memory, cpu, bios, display })
    }

    /// Executes a single instruction.
    pub fn step(&mut self) -> Result<StepOutcome, CpuError> {
        self.cpu.step(&mut self.memory, &mut self.bios)
    }

    /// Runs until halt or the display reports a quit request. With no
    /// display attached, runs to halt unconditionally.
    pub fn run(&mut self) -> Result<RunResult, VmError> {
        loop {
            for _ in 0..STEPS_PER_FRAME {
                match self.step()? {
                    StepOutcome::Continue => {}
                    StepOutcome::Halted => {
                        info!("cpu halted");
                        return Ok(RunResult::Halted);
                    }
                }
            }

            if let Some(display) = &mut self.display {
                if display.poll_input(&mut self.bios) == PollResult::Quit {
                    warn!("display requested quit");
                    return Ok(RunResult::Quit);
                }
                display.present(&self.memory)?;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn headless_vm_runs_a_halting_program_to_completion() {
        let mut tmp = std::env::temp_dir();
        tmp.push("pcvm_vm_test_halt.bin");
        std::fs::write(&tmp, [0xB4u8, 0x0E, 0xB0, b'H', 0xCD, 0x10, 0xF4]).unwrap();

        let mut vm = Vm::new(VmConfig {
            program: Some(tmp.clone()),
            headless: true,
            ..VmConfig::default()
        })
        .unwrap();

        let result = vm.run().unwrap();
        assert_eq!(result, RunResult::Halted);
        assert_eq!(vm.memory.dump(0xB8000, 2), vec![b'H', 0x07]);

        std::fs::remove_file(&tmp).ok();
    }

    #[test]
    fn bios_rom_region_stays_read_only_across_a_program_load() {
        let mut tmp = std::env::temp_dir();
        tmp.push("pcvm_vm_test_rom.bin");
        std::fs::write(&tmp, [0xF4u8]).unwrap();

        let vm = Vm::new(VmConfig {
            program: Some(tmp.clone()),
            headless: true,
            ..VmConfig::default()
        })
        .unwrap();
        assert!(vm.memory.is_readonly(BIOS_ROM_ADDR));

        std::fs::remove_file(&tmp).ok();
    }
}
