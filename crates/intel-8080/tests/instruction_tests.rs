//! Program-level tests for the 8080.
//!
//! Each test loads a short program, runs it until HLT and checks the
//! resulting machine state.

use std::io;

use emu_core::{Cpu, Observable, Value};
use intel_8080::{I8080, MemoryMap, Mode, cpm};

/// Run CPU until it halts, return instruction count.
fn run_until_halt<W: io::Write>(cpu: &mut I8080<W>, memory: &mut MemoryMap) -> u64 {
    let mut count = 0;
    while !cpu.is_halted() && count < 10_000 {
        cpu.clock(memory);
        count += 1;
    }
    count
}

fn arcade(program: &[u8]) -> (I8080<io::Sink>, MemoryMap) {
    let mut memory = MemoryMap::new(Mode::Arcade);
    memory.load(program, 0x0000);
    (I8080::with_console(Mode::Arcade, io::sink()), memory)
}

fn console(program: &[u8]) -> (I8080<Vec<u8>>, MemoryMap) {
    let mut memory = MemoryMap::new(Mode::Console);
    cpm::install_vectors(&mut memory);
    memory.load(program, cpm::TPA_START);
    (I8080::with_console(Mode::Console, Vec::new()), memory)
}

#[test]
fn test_nop_hlt() {
    let (mut cpu, mut memory) = arcade(&[0x00, 0x76]);
    assert_eq!(run_until_halt(&mut cpu, &mut memory), 2);
    assert_eq!(cpu.pc(), 0x0002);
    assert_eq!(cpu.clock_count(), 4 + 7);
}

#[test]
fn test_countdown_loop() {
    let (mut cpu, mut memory) = arcade(&[
        0x06, 0x05,       // MVI B,5
        0x05,             // loop: DCR B
        0xC2, 0x02, 0x00, // JNZ loop
        0x76,             // HLT
    ]);
    run_until_halt(&mut cpu, &mut memory);

    assert_eq!(cpu.registers().b(), 0);
    assert!(cpu.flags().zero);
    // MVI, 5 x (DCR + JNZ), HLT
    assert_eq!(cpu.instruction_count(), 1 + 10 + 1);
    assert_eq!(cpu.clock_count(), 7 + 5 * (5 + 10) + 7);
}

#[test]
fn test_call_and_return() {
    let (mut cpu, mut memory) = arcade(&[
        0x31, 0x00, 0x24, // LXI SP,2400h
        0xCD, 0x08, 0x00, // CALL 0008h
        0x76,             // HLT
        0x00,
        0x3E, 0x42,       // MVI A,42h
        0xC9,             // RET
    ]);
    run_until_halt(&mut cpu, &mut memory);

    assert_eq!(cpu.registers().a, 0x42);
    assert_eq!(cpu.pc(), 0x0007);
    assert_eq!(cpu.sp(), 0x2400);
    assert_eq!(memory.read_word(0x23FE), 0x0006);
}

#[test]
fn test_push_pop_pairs() {
    let (mut cpu, mut memory) = arcade(&[
        0x31, 0x00, 0x24, // LXI SP,2400h
        0x01, 0x34, 0x12, // LXI B,1234h
        0x11, 0x78, 0x56, // LXI D,5678h
        0xC5,             // PUSH B
        0xD5,             // PUSH D
        0xC1,             // POP B
        0xD1,             // POP D
        0x76,             // HLT
    ]);
    run_until_halt(&mut cpu, &mut memory);

    assert_eq!(cpu.registers().bc.get(), 0x5678);
    assert_eq!(cpu.registers().de.get(), 0x1234);
    assert_eq!(cpu.sp(), 0x2400);
}

#[test]
fn test_rom_is_write_protected() {
    let (mut cpu, mut memory) = arcade(&[
        0x3E, 0x99,       // MVI A,99h
        0x32, 0x10, 0x00, // STA 0010h
        0x32, 0x00, 0x20, // STA 2000h
        0x76,             // HLT
    ]);
    memory.load(&[0x11], 0x0010);
    run_until_halt(&mut cpu, &mut memory);

    assert_eq!(memory.read_byte(0x0010), 0x11);
    assert_eq!(memory.read_byte(0x2000), 0x99);
}

#[test]
fn test_mirror_through_cpu() {
    let (mut cpu, mut memory) = arcade(&[
        0x21, 0x00, 0x21, // LXI H,2100h
        0x36, 0x42,       // MVI M,42h
        0x3A, 0x00, 0x41, // LDA 4100h
        0x21, 0x01, 0x41, // LXI H,4101h
        0x36, 0x24,       // MVI M,24h
        0x76,             // HLT
    ]);
    run_until_halt(&mut cpu, &mut memory);

    assert_eq!(cpu.registers().a, 0x42);
    assert_eq!(memory.read_byte(0x2101), 0x24);
}

#[test]
fn test_shift_peripheral() {
    let (mut cpu, mut memory) = arcade(&[
        0x3E, 0xAA, // MVI A,AAh
        0xD3, 0x04, // OUT 4
        0x3E, 0x55, // MVI A,55h
        0xD3, 0x04, // OUT 4
        0x3E, 0x04, // MVI A,4
        0xD3, 0x02, // OUT 2
        0xDB, 0x03, // IN 3
        0x76,       // HLT
    ]);
    run_until_halt(&mut cpu, &mut memory);

    assert_eq!(cpu.registers().a, 0x5A);
    assert_eq!(cpu.query("shift.value"), Some(Value::U16(0x55AA)));
    assert_eq!(cpu.query("shift.offset"), Some(Value::U8(4)));
}

#[test]
fn test_input_port_from_host() {
    let (mut cpu, mut memory) = arcade(&[0xDB, 0x01, 0x76]); // IN 1; HLT
    cpu.ports_mut().input_mut()[1] |= 0x04;
    run_until_halt(&mut cpu, &mut memory);
    assert_eq!(cpu.registers().a, 0b0000_1100);
}

#[test]
fn test_output_port_latch() {
    let (mut cpu, mut memory) = arcade(&[0x3E, 0x21, 0xD3, 0x03, 0x76]); // MVI A; OUT 3; HLT
    run_until_halt(&mut cpu, &mut memory);
    assert_eq!(cpu.ports().output()[3], 0x21);
}

#[test]
fn test_unknown_opcode_keeps_running() {
    let (mut cpu, mut memory) = arcade(&[0xCB, 0xED, 0x3E, 0x07, 0x76]);
    cpu.clock(&mut memory);
    assert!(!cpu.is_halted());
    assert_eq!(cpu.instruction_count(), 1);

    run_until_halt(&mut cpu, &mut memory);
    assert_eq!(cpu.registers().a, 0x07);
    assert_eq!(cpu.instruction_count(), 4);
}

#[test]
fn test_interrupt_service_routine() {
    let mut program = vec![0u8; 0x20];
    program[..8].copy_from_slice(&[
        0x31, 0x00, 0x24, // LXI SP,2400h
        0xFB,             // EI
        0x00,             // loop: NOP
        0xC3, 0x04, 0x00, // JMP loop
    ]);
    // RST 1 handler at 0008h
    program[0x08..0x0C].copy_from_slice(&[
        0x3C, // INR A
        0xFB, // EI
        0xC9, // RET
        0x00,
    ]);
    let (mut cpu, mut memory) = arcade(&program);

    for _ in 0..3 {
        cpu.clock(&mut memory);
    }
    assert!(cpu.interrupts_enabled());
    let resume = cpu.pc();

    assert!(cpu.interrupt(&mut memory, 0));
    assert_eq!(cpu.pc(), 0x0008);
    assert!(!cpu.interrupts_enabled());

    for _ in 0..3 {
        cpu.clock(&mut memory);
    }
    assert_eq!(cpu.registers().a, 1);
    assert_eq!(cpu.pc(), resume);
    assert!(cpu.interrupts_enabled());
}

#[test]
fn test_cpu_trait_stepping() {
    let (mut cpu, mut memory) = arcade(&[0x01, 0x34, 0x12, 0x76]);
    let cpu: &mut dyn Cpu<MemoryMap> = &mut cpu;
    assert_eq!(cpu.step(&mut memory), 10);
    assert_eq!(cpu.pc(), 0x0003);
    assert_eq!(cpu.step(&mut memory), 7);
    assert!(cpu.is_halted());
    assert_eq!(cpu.step(&mut memory), 0);
}

#[test]
fn test_console_prints_and_exits() {
    let mut program = vec![
        0x11, 0x0E, 0x01, // LXI D,message
        0x0E, 0x09,       // MVI C,9
        0xCD, 0x05, 0x00, // CALL BDOS
        0x1E, 0x21,       // MVI E,'!'
        0x0E, 0x02,       // MVI C,2
        0xCD, 0x05, 0x00, // CALL BDOS
        0xC3, 0x00, 0x00, // JMP 0
    ];
    // Message follows the code at 0112h; patch its address.
    let message = cpm::TPA_START + u16::try_from(program.len()).expect("short program");
    program[1..3].copy_from_slice(&message.to_le_bytes());
    program.extend_from_slice(b"HELLO, 8080$");

    let (mut cpu, mut memory) = console(&program);
    cpu.set_registers(intel_8080::Registers {
        pc: cpm::TPA_START,
        sp: 0xF000,
        ..cpu.registers()
    });
    run_until_halt(&mut cpu, &mut memory);

    assert!(cpu.is_halted());
    assert_eq!(cpu.pc(), 0x0000);
    assert_eq!(cpu.into_console(), b"HELLO, 8080!");
}

#[test]
fn test_console_halt_costs_nothing() {
    let (mut cpu, mut memory) = console(&[0xC3, 0x00, 0x00]); // JMP 0
    cpu.clock(&mut memory);
    let cycles = cpu.clock_count();
    let instructions = cpu.instruction_count();

    assert_eq!(cpu.clock(&mut memory), 0);
    assert!(cpu.is_halted());
    assert_eq!(cpu.clock_count(), cycles);
    assert_eq!(cpu.instruction_count(), instructions);
}

#[test]
fn test_reset_counters() {
    let (mut cpu, mut memory) = arcade(&[0x00, 0x00, 0x76]);
    run_until_halt(&mut cpu, &mut memory);
    assert_eq!(cpu.query("instructions"), Some(Value::U64(3)));
    cpu.reset_counters();
    assert_eq!(cpu.query("instructions"), Some(Value::U64(0)));
    assert_eq!(cpu.query("cycles"), Some(Value::U64(0)));
}
