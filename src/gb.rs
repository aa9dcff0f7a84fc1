//! Game Boy emulation entrypoint and associated functions and structures.
//!
//! Most of the meaningful publicly available functions and structures to build
//! a working emulator should be present here.
//!
//! # Examples
//!
//! Creates a simple [`GameBoy`] instance, loads an empty cartridge and runs
//! a complete frame worth of emulation.
//!
//! ```rust
//! use dotmatrix::gb::GameBoy;
//! let mut game_boy = GameBoy::new();
//! game_boy.load_rom_empty().unwrap();
//! game_boy.boot();
//! let cycles = game_boy.run_frame().unwrap();
//! println!("Ran {} cycles", cycles);
//! ```

use dotmatrix_common::{error::Error, util::read_file};

use crate::{
    cpu::Cpu,
    mmu::Mmu,
    pad::{Pad, PadKey},
    ppu::{Ppu, PpuMode, FRAME_BUFFER_SIZE},
    rom::Cartridge,
    timer::Timer,
};

#[cfg(feature = "wasm")]
use wasm_bindgen::prelude::*;

/// Configuration of the orchestration switches, consulted by the
/// [`GameBoy`] front type whenever cycles are fanned out to the
/// individual components.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct GameBoyConfig {
    /// If the PPU is enabled, it will be clocked.
    ppu_enabled: bool,

    /// If the timer is enabled, it will be clocked.
    timer_enabled: bool,

    /// The frequency at which the emulator is being driven, a hint
    /// for hosts that pace emulation themselves.
    clock_freq: u32,
}

impl GameBoyConfig {
    pub fn ppu_enabled(&self) -> bool {
        self.ppu_enabled
    }

    pub fn set_ppu_enabled(&mut self, value: bool) {
        self.ppu_enabled = value;
    }

    pub fn timer_enabled(&self) -> bool {
        self.timer_enabled
    }

    pub fn set_timer_enabled(&mut self, value: bool) {
        self.timer_enabled = value;
    }

    pub fn clock_freq(&self) -> u32 {
        self.clock_freq
    }

    pub fn set_clock_freq(&mut self, value: u32) {
        self.clock_freq = value;
    }
}

impl Default for GameBoyConfig {
    fn default() -> Self {
        Self {
            ppu_enabled: true,
            timer_enabled: true,
            clock_freq: GameBoy::CPU_FREQ,
        }
    }
}

/// Aggregation structure allowing the bundling of all the memory
/// mapped components of a Game Boy into a single element.
#[derive(Default)]
pub struct Components {
    pub ppu: Ppu,
    pub pad: Pad,
    pub timer: Timer,
}

/// Snapshot of the CPU and PPU registers, to be used for
/// introspection by debuggers and front-ends.
pub struct Registers {
    pub pc: u16,
    pub sp: u16,
    pub a: u8,
    pub b: u8,
    pub c: u8,
    pub d: u8,
    pub e: u8,
    pub h: u8,
    pub l: u8,
    pub scy: u8,
    pub scx: u8,
    pub wy: u8,
    pub wx: u8,
    pub ly: u8,
    pub lyc: u8,
}

/// Top level structure that abstracts the usage of the
/// Game Boy system under the dotmatrix emulator.
///
/// Should serve as the main entry-point API.
#[cfg_attr(feature = "wasm", wasm_bindgen)]
pub struct GameBoy {
    /// Reference to the Game Boy CPU component to be used as the
    /// main element of the system, when clocked the amount of
    /// cycles from it drives the rest of the components.
    cpu: Cpu,

    /// The configuration of the orchestration switches for the
    /// current emulator instance.
    config: GameBoyConfig,

    /// Cycles carried over from the last `run_frame()` call, the
    /// final instruction of a frame may overshoot the frame budget
    /// and the excess is accounted to the next frame.
    frame_cycles: u32,
}

impl GameBoy {
    /// The logic frequency of the Game Boy CPU in Hz.
    pub const CPU_FREQ: u32 = 4194304;

    /// The visual frequency (refresh rate) of the Game Boy,
    /// close to 60 Hz.
    pub const VISUAL_FREQ: f32 = 59.7275;

    /// The cycles taken to run a complete frame loop in the
    /// Game Boy's PPU (in CPU cycles).
    pub const FRAME_CYCLES: u32 = 70224;

    pub fn new() -> Self {
        let components = Components {
            ppu: Ppu::default(),
            pad: Pad::default(),
            timer: Timer::default(),
        };
        let mmu = Mmu::new(components);
        let cpu = Cpu::new(mmu);

        Self {
            cpu,
            config: GameBoyConfig::default(),
            frame_cycles: 0,
        }
    }

    pub fn reset(&mut self) {
        self.mmu().reset();
        self.cpu.reset();
        self.frame_cycles = 0;
    }

    /// Checks if the provided data is loadable as a cartridge
    /// image for the current system.
    pub fn verify_rom(data: &[u8]) -> bool {
        Cartridge::from_data(data).is_ok()
    }

    /// Jumps the machine to the post boot state, skipping the boot
    /// sequence so that execution starts at the cartridge entry
    /// point (0x0100).
    pub fn boot(&mut self) {
        self.cpu.boot();
    }

    /// Advances the clock of the system by one operation, executing
    /// one CPU instruction (or interrupt dispatch) and then pulling
    /// every other component forward by the same amount of cycles.
    ///
    /// The amount of cycles consumed by the CPU is returned.
    pub fn clock(&mut self) -> Result<u16, Error> {
        let cycles = self.cpu.clock()? as u16;
        self.clock_devices(cycles);
        Ok(cycles)
    }

    /// Equivalent to `clock()` but allows the execution of multiple
    /// clock operations in a single call.
    pub fn clocks(&mut self, count: usize) -> Result<u64, Error> {
        let mut cycles = 0_u64;
        for _ in 0..count {
            cycles += self.clock()? as u64;
        }
        Ok(cycles)
    }

    /// Clocks the emulator until the limit of cycles that has been
    /// provided and returns the amount of cycles that have been
    /// clocked.
    pub fn clocks_cycles(&mut self, limit: usize) -> Result<u64, Error> {
        let mut cycles = 0_u64;
        while cycles < limit as u64 {
            cycles += self.clock()? as u64;
        }
        Ok(cycles)
    }

    /// Runs the emulation loop for one complete frame worth of
    /// cycles (70 224), the final instruction may overshoot the
    /// budget and the excess rolls over into the next frame.
    ///
    /// A fatal CPU condition aborts the frame and bubbles up.
    pub fn run_frame(&mut self) -> Result<u32, Error> {
        let mut total = self.frame_cycles;
        while total < Self::FRAME_CYCLES {
            total += self.clock()? as u32;
        }
        self.frame_cycles = total - Self::FRAME_CYCLES;
        Ok(total)
    }

    /// Clocks the system until the PPU finishes the frame currently
    /// in drawing, returning the number of cycles consumed.
    pub fn next_frame(&mut self) -> Result<u32, Error> {
        let mut cycles = 0u32;
        let current_frame = self.ppu().frame_index();
        while self.ppu().frame_index() == current_frame {
            cycles += self.clock()? as u32;
        }
        Ok(cycles)
    }

    /// Clocks the system until the PC (Program Counter) reaches the
    /// provided address, useful for stepping tests.
    pub fn step_to(&mut self, addr: u16) -> Result<u32, Error> {
        let mut cycles = 0u32;
        while self.cpu_i().pc() != addr {
            cycles += self.clock()? as u32;
        }
        Ok(cycles)
    }

    #[inline(always)]
    fn clock_devices(&mut self, cycles: u16) {
        if self.config.ppu_enabled {
            self.ppu().clock(cycles);
        }
        if self.config.timer_enabled {
            self.timer().clock(cycles);
        }
    }

    pub fn key_press(&mut self, key: PadKey) {
        self.pad().key_press(key);
    }

    pub fn key_lift(&mut self, key: PadKey) {
        self.pad().key_lift(key);
    }

    pub fn ppu_ly(&mut self) -> u8 {
        self.ppu().ly()
    }

    pub fn ppu_mode(&mut self) -> PpuMode {
        self.ppu().mode()
    }

    pub fn ppu_frame(&mut self) -> u16 {
        self.ppu().frame_index()
    }

    /// A read-only view over the 160x144 RGBA frame buffer, the
    /// presentation layer copies it out and calls `ack_frame()`.
    pub fn frame_buffer(&self) -> &[u8; FRAME_BUFFER_SIZE] {
        self.ppu_i().frame_buffer()
    }

    pub fn frame_buffer_eager(&self) -> Vec<u8> {
        self.frame_buffer().to_vec()
    }

    #[inline(always)]
    pub fn frame_ready(&self) -> bool {
        self.ppu_i().frame_ready()
    }

    #[inline(always)]
    pub fn ack_frame(&mut self) {
        self.ppu().ack_frame();
    }

    pub fn registers(&self) -> Registers {
        let ppu = self.ppu_i();
        let (scy, scx, wy, wx, ly, lyc) = (
            ppu.read(0xff42),
            ppu.read(0xff43),
            ppu.read(0xff4a),
            ppu.read(0xff4b),
            ppu.ly(),
            ppu.lyc(),
        );
        Registers {
            pc: self.cpu.pc,
            sp: self.cpu.sp,
            a: self.cpu.a,
            b: self.cpu.b,
            c: self.cpu.c,
            d: self.cpu.d,
            e: self.cpu.e,
            h: self.cpu.h,
            l: self.cpu.l,
            scy,
            scx,
            wy,
            wx,
            ly,
            lyc,
        }
    }

    pub fn load_cartridge(&mut self, rom: Cartridge) -> Result<&mut Cartridge, Error> {
        self.mmu().set_rom(rom);
        Ok(self.mmu().rom())
    }

    pub fn load_rom(
        &mut self,
        data: &[u8],
        ram_data: Option<&[u8]>,
    ) -> Result<&mut Cartridge, Error> {
        let mut rom = Cartridge::from_data(data)?;
        if let Some(ram_data) = ram_data {
            rom.set_ram_data(ram_data)
        }
        self.load_cartridge(rom)
    }

    pub fn load_rom_file(
        &mut self,
        path: &str,
        ram_path: Option<&str>,
    ) -> Result<&mut Cartridge, Error> {
        let data = read_file(path)?;
        match ram_path {
            Some(ram_path) => {
                let ram_data = read_file(ram_path)?;
                self.load_rom(&data, Some(&ram_data))
            }
            None => self.load_rom(&data, None),
        }
    }

    pub fn load_rom_empty(&mut self) -> Result<&mut Cartridge, Error> {
        let data = [0u8; 32 * 1024];
        self.load_rom(&data, None)
    }

    pub fn read_memory(&self, addr: u16) -> u8 {
        self.mmu_i().read(addr)
    }

    pub fn write_memory(&mut self, addr: u16, value: u8) {
        self.mmu().write(addr, value);
    }

    pub fn cpu(&mut self) -> &mut Cpu {
        &mut self.cpu
    }

    pub fn cpu_i(&self) -> &Cpu {
        &self.cpu
    }

    pub fn mmu(&mut self) -> &mut Mmu {
        self.cpu.mmu()
    }

    pub fn mmu_i(&self) -> &Mmu {
        self.cpu.mmu_i()
    }

    pub fn ppu(&mut self) -> &mut Ppu {
        self.cpu.mmu().ppu()
    }

    pub fn ppu_i(&self) -> &Ppu {
        self.cpu.mmu_i().ppu_i()
    }

    pub fn pad(&mut self) -> &mut Pad {
        self.cpu.mmu().pad()
    }

    pub fn pad_i(&self) -> &Pad {
        self.cpu.mmu_i().pad_i()
    }

    pub fn timer(&mut self) -> &mut Timer {
        self.cpu.mmu().timer()
    }

    pub fn timer_i(&self) -> &Timer {
        self.cpu.mmu_i().timer_i()
    }

    pub fn rom(&mut self) -> &mut Cartridge {
        self.mmu().rom()
    }

    pub fn rom_i(&self) -> &Cartridge {
        self.mmu_i().rom_i()
    }

    pub fn ppu_enabled(&self) -> bool {
        self.config.ppu_enabled
    }

    pub fn set_ppu_enabled(&mut self, value: bool) {
        self.config.ppu_enabled = value;
    }

    pub fn timer_enabled(&self) -> bool {
        self.config.timer_enabled
    }

    pub fn set_timer_enabled(&mut self, value: bool) {
        self.config.timer_enabled = value;
    }

    pub fn clock_freq(&self) -> u32 {
        self.config.clock_freq
    }

    pub fn set_clock_freq(&mut self, value: u32) {
        self.config.clock_freq = value;
    }

    pub fn clock_freq_s(&self) -> String {
        format!("{:.02} Mhz", self.clock_freq() as f32 / 1000.0 / 1000.0)
    }

    pub fn display_width(&self) -> usize {
        crate::ppu::DISPLAY_WIDTH
    }

    pub fn display_height(&self) -> usize {
        crate::ppu::DISPLAY_HEIGHT
    }
}

impl Default for GameBoy {
    fn default() -> Self {
        Self::new()
    }
}
