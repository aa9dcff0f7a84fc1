//! End-to-end scenarios driving the complete system through the
//! public [`GameBoy`] surface.

use dotmatrix::{
    gb::GameBoy,
    pad::PadKey,
    test::{build_test, rom_with_code, rom_with_header, TestOptions},
};

#[test]
fn test_xor_clear() {
    let mut game_boy = build_test(TestOptions::default());
    game_boy.load_rom(&rom_with_code(&[0xaf]), None).unwrap();

    let cycles = game_boy.clock().unwrap();
    assert_eq!(cycles, 4);

    let cpu = game_boy.cpu_i();
    assert_eq!(cpu.a, 0x00);
    assert_eq!(cpu.pc(), 0x0101);
    assert!(cpu.zero());
    assert!(!cpu.sub());
    assert!(!cpu.half_carry());
    assert!(!cpu.carry());
}

#[test]
fn test_relative_loop() {
    // LD B, 3; DEC B; JR NZ, -3 decrements B three times before
    // falling through, for a total of 52 cycles
    let mut game_boy = build_test(TestOptions::default());
    game_boy
        .load_rom(&rom_with_code(&[0x06, 0x03, 0x05, 0x20, 0xfd]), None)
        .unwrap();

    let cycles = game_boy.step_to(0x0105).unwrap();
    assert_eq!(game_boy.cpu_i().b, 0x00);
    assert_eq!(cycles, 52);
}

#[test]
fn test_vblank_fires_once_per_frame() {
    // EI; LD A, 0x01; LD [0xFFFF], A; JR -2, with the V-Blank
    // handler spinning in place at 0x0040
    let mut rom = rom_with_code(&[0xfb, 0x3e, 0x01, 0xea, 0xff, 0xff, 0x18, 0xfe]);
    rom[0x0040] = 0x18;
    rom[0x0041] = 0xfe;

    let mut game_boy = build_test(TestOptions::default());
    game_boy.load_rom(&rom, None).unwrap();

    // releases the stale V-Blank flag left by the boot register file
    game_boy.write_memory(0xff0f, 0x00);

    game_boy.run_frame().unwrap();

    // the interrupt was taken, execution sits in the 0x0040 handler
    let pc = game_boy.cpu_i().pc();
    assert!((0x0040..=0x0042).contains(&pc));
    assert!(!game_boy.cpu_i().ime());
    assert!(game_boy.frame_ready());
}

#[test]
fn test_timer_overflow_reload() {
    let mut game_boy = build_test(TestOptions::default());
    game_boy.load_rom_empty().unwrap();

    game_boy.write_memory(0xff0f, 0x00);
    game_boy.write_memory(0xff06, 0xf0);
    game_boy.write_memory(0xff05, 0xfe);
    game_boy.write_memory(0xff07, 0x05);

    // 32 cycles at 16 cycles per increment overflow the counter
    game_boy.clocks(8).unwrap();

    assert_eq!(game_boy.read_memory(0xff05), 0xf0);
    assert_eq!(game_boy.read_memory(0xff0f) & 0x04, 0x04);
}

#[test]
fn test_joypad_edge_interrupt() {
    let mut game_boy = build_test(TestOptions::default());
    game_boy.load_rom_empty().unwrap();

    game_boy.write_memory(0xff0f, 0x00);
    game_boy.write_memory(0xff00, 0x20);

    game_boy.key_press(PadKey::Right);
    assert_eq!(game_boy.read_memory(0xff00) & 0x01, 0x00);
    assert_eq!(game_boy.read_memory(0xff0f) & 0x10, 0x10);

    // releasing the key must not raise a new interrupt
    game_boy.write_memory(0xff0f, 0x00);
    game_boy.key_lift(PadKey::Right);
    assert_eq!(game_boy.read_memory(0xff00) & 0x01, 0x01);
    assert_eq!(game_boy.read_memory(0xff0f) & 0x10, 0x00);
}

#[test]
fn test_mbc1_bank_substitution() {
    // 1 MB cartridge (64 banks), every bank stamped with its index
    let mut rom = rom_with_header(0x01, 0x05, 0x00);
    for bank in 0..64usize {
        rom[bank * 0x4000] = bank as u8;
    }

    let mut game_boy = build_test(TestOptions::default());
    game_boy.load_rom(&rom, None).unwrap();

    game_boy.write_memory(0x2000, 0x20);
    assert_eq!(game_boy.read_memory(0x4000), 0x21);
}

#[test]
fn test_lcdc_disable_resets_ppu() {
    let mut game_boy = build_test(TestOptions::default());
    game_boy.load_rom_empty().unwrap();

    // runs until the middle of a visible frame
    game_boy.clocks_cycles(20000).unwrap();
    assert!(game_boy.ppu_ly() > 0);

    game_boy.write_memory(0xff40, 0x00);
    assert_eq!(game_boy.read_memory(0xff44), 0x00);
    assert_eq!(game_boy.read_memory(0xff41) & 0x03, 0x02);
}

#[test]
fn test_echo_ram_is_aliased() {
    let mut game_boy = build_test(TestOptions::default());
    game_boy.load_rom_empty().unwrap();

    game_boy.write_memory(0xc123, 0x42);
    assert_eq!(game_boy.read_memory(0xe123), 0x42);

    game_boy.write_memory(0xe123, 0x24);
    assert_eq!(game_boy.read_memory(0xc123), 0x24);
}

#[test]
fn test_dma_copies_into_oam() {
    let mut game_boy = build_test(TestOptions::default());
    game_boy.load_rom_empty().unwrap();

    for index in 0..160u16 {
        game_boy.write_memory(0xc000 + index, (index as u8) ^ 0x5a);
    }
    game_boy.write_memory(0xff46, 0xc0);

    for index in 0..160u16 {
        assert_eq!(
            game_boy.read_memory(0xfe00 + index),
            game_boy.read_memory(0xc000 + index)
        );
    }
}

#[test]
fn test_illegal_opcode_aborts_frame() {
    let mut game_boy = build_test(TestOptions::default());
    game_boy.load_rom(&rom_with_code(&[0xd3]), None).unwrap();

    let result = game_boy.run_frame();
    assert!(result.is_err());
}

#[test]
fn test_frame_cycle_sum() {
    let mut game_boy = build_test(TestOptions::default());
    game_boy.load_rom_empty().unwrap();

    // over many frames the carried cycles keep every frame within
    // one instruction of the nominal budget
    let mut carry = 0u32;
    for _ in 0..4 {
        let total = game_boy.run_frame().unwrap();
        assert!(total >= GameBoy::FRAME_CYCLES);
        assert!(total - carry <= GameBoy::FRAME_CYCLES + 24);
        carry = total - GameBoy::FRAME_CYCLES;
    }
}
