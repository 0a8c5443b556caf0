//! Whole-VM integration tests for the end-to-end scenarios the unit tests
//! don't already cover in isolation: these run actual CPU-executed byte
//! sequences through a headless `Vm` rather than calling module internals
//! directly.

use std::io::Write;

use pcvm::cpu::StepOutcome;
use pcvm::vm::{RunResult, Vm, VmConfig};

fn write_program(name: &str, bytes: &[u8]) -> std::path::PathBuf {
    let mut path = std::env::temp_dir();
    path.push(name);
    std::fs::File::create(&path).unwrap().write_all(bytes).unwrap();
    path
}

#[test]
fn teletype_prints_hi_at_the_top_left_of_the_text_buffer() {
    let path = write_program(
        "pcvm_scenario_teletype_hi.bin",
        &[0xB4, 0x0E, 0xB0, b'H', 0xCD, 0x10, 0xB0, b'i', 0xCD, 0x10, 0xF4],
    );
    let mut vm = Vm::new(VmConfig {
        program: Some(path.clone()),
        headless: true,
        ..VmConfig::default()
    })
    .unwrap();

    assert_eq!(vm.run().unwrap(), RunResult::Halted);
    assert_eq!(vm.memory.dump(0xB8000, 4), vec![b'H', 0x07, b'i', 0x07]);
    assert_eq!((vm.bios.cursor_x, vm.bios.cursor_y), (2, 0));

    std::fs::remove_file(&path).ok();
}

#[test]
fn add_overflow_sets_of_without_carry() {
    // MOV AL,0x7F; ADD AL,0x01; HLT
    let path = write_program("pcvm_scenario_add_overflow.bin", &[0xB0, 0x7F, 0x04, 0x01, 0xF4]);
    let mut vm = Vm::new(VmConfig {
        program: Some(path.clone()),
        headless: true,
        ..VmConfig::default()
    })
    .unwrap();

    assert_eq!(vm.run().unwrap(), RunResult::Halted);
    assert_eq!(vm.cpu.regs.al(), 0x80);
    use pcvm::flags::Flags;
    assert!(!vm.cpu.regs.flags.contains(Flags::CF));
    assert!(vm.cpu.regs.flags.contains(Flags::OF));
    assert!(vm.cpu.regs.flags.contains(Flags::SF));
    assert!(!vm.cpu.regs.flags.contains(Flags::ZF));

    std::fs::remove_file(&path).ok();
}

#[test]
fn subtract_borrow_sets_carry_and_sign() {
    // MOV AL,0x00; SUB AL,0x01; HLT
    let path = write_program("pcvm_scenario_sub_borrow.bin", &[0xB0, 0x00, 0x2C, 0x01, 0xF4]);
    let mut vm = Vm::new(VmConfig {
        program: Some(path.clone()),
        headless: true,
        ..VmConfig::default()
    })
    .unwrap();

    assert_eq!(vm.run().unwrap(), RunResult::Halted);
    assert_eq!(vm.cpu.regs.al(), 0xFF);
    use pcvm::flags::Flags;
    assert!(vm.cpu.regs.flags.contains(Flags::CF));
    assert!(vm.cpu.regs.flags.contains(Flags::SF));
    assert!(!vm.cpu.regs.flags.contains(Flags::ZF));

    std::fs::remove_file(&path).ok();
}

#[test]
fn loop_counts_a_register_down_to_zero() {
    // MOV CX,3; loop: DEC CX is implicit in LOOP; LOOP loop (rel -2); HLT
    let path = write_program("pcvm_scenario_loop.bin", &[0xB9, 0x03, 0x00, 0xE2, 0xFE, 0xF4]);
    let mut vm = Vm::new(VmConfig {
        program: Some(path.clone()),
        headless: true,
        ..VmConfig::default()
    })
    .unwrap();

    assert_eq!(vm.run().unwrap(), RunResult::Halted);
    assert_eq!(vm.cpu.regs.cx(), 0);

    std::fs::remove_file(&path).ok();
}

#[test]
fn boot_sector_convention_lands_execution_at_0x7c00() {
    let path = write_program("pcvm_scenario_boot.bin", &[0xF4]);
    let vm = Vm::new(VmConfig {
        program: Some(path.clone()),
        headless: true,
        ..VmConfig::default()
    })
    .unwrap();
    assert_eq!(vm.cpu.regs.ip, 0x7C00);
    assert_eq!(vm.cpu.regs.cs(), 0);

    std::fs::remove_file(&path).ok();
}

#[test]
fn keyboard_echo_round_trips_through_int16_and_int21() {
    // AH=01h; INT 16h (peek) -- not consumed, then AH=00h; INT 16h (dequeue).
    let path = write_program(
        "pcvm_scenario_kbd_echo.bin",
        &[0xB4, 0x01, 0xCD, 0x16, 0xB4, 0x00, 0xCD, 0x16, 0xF4],
    );
    let mut vm = Vm::new(VmConfig {
        program: Some(path.clone()),
        headless: true,
        ..VmConfig::default()
    })
    .unwrap();
    vm.bios.inject(0x1E, b'a');

    assert_eq!(vm.run().unwrap(), RunResult::Halted);
    assert_eq!(vm.cpu.regs.ax(), 0x1E61);

    std::fs::remove_file(&path).ok();
}

#[test]
fn invalid_opcode_surfaces_the_faulting_address_without_halting_state() {
    let path = write_program("pcvm_scenario_invalid_opcode.bin", &[0xF1]);
    let mut vm = Vm::new(VmConfig {
        program: Some(path.clone()),
        headless: true,
        ..VmConfig::default()
    })
    .unwrap();

    let err = vm.step().unwrap_err();
    match err {
        pcvm::cpu::CpuError::InvalidOpcode { opcode, cs, ip } => {
            assert_eq!(opcode, 0xF1);
            assert_eq!(cs, 0);
            assert_eq!(ip, 0x7C00);
        }
        other => panic!("expected InvalidOpcode, got {other:?}"),
    }

    std::fs::remove_file(&path).ok();
}

#[test]
fn single_step_outcomes_distinguish_continue_from_halted() {
    let path = write_program("pcvm_scenario_step_outcome.bin", &[0x90, 0xF4]);
    let mut vm = Vm::new(VmConfig {
        program: Some(path.clone()),
        headless: true,
        ..VmConfig::default()
    })
    .unwrap();

    assert_eq!(vm.step().unwrap(), StepOutcome::Continue);
    assert_eq!(vm.step().unwrap(), StepOutcome::Halted);

    std::fs::remove_file(&path).ok();
}
