use std::time::Instant;

use rand::RngCore;
use tinyvec::ArrayVec;

use crate::{
    definitions::{cpu, display, memory},
    opcode::{self, Opcode, Operation, Step},
    settings::{Quirks, Settings},
    timer::Timer,
    ProcessError, RomError,
};

use super::screen::{Frame, Screen};

/// A side effect of a single tick, for the host to act on.
#[derive(Debug, Clone, PartialEq)]
pub enum Signal {
    /// The framebuffer changed, the payload is a defensive copy of it.
    Draw(Frame),
    /// The tone shall start playing.
    SoundOn,
    /// The tone shall stop playing.
    SoundOff,
}

/// The ChipSet struct represents the current state of the system, it
/// contains all the structures needed for emulating an instant of the
/// Chip-8 machine (or its Super-CHIP extension).
///
/// The whole machine is driven by repeated [`tick`](ChipSet::tick) calls
/// from a single host loop; nothing in here blocks or spawns.
pub struct ChipSet {
    /// - `0x000-0x04F` - the built in `4x5` pixel font set (`0-F`)
    /// - `0x050-0x0B3` - the built in `8x10` pixel font set (`0-9`)
    /// - `0x200-0xFFF` - program rom and work ram
    pub(super) memory: Vec<u8>,
    /// `8-bit` data registers named `V0` to `VF`. The `VF` register doubles
    /// as a flag: the carry on additions, the "no borrow" on subtractions
    /// and the collision marker on draws.
    pub(super) registers: [u8; cpu::register::SIZE],
    /// The special address register called index `I`, practically twelve
    /// bits wide.
    pub(super) index_register: u16,
    /// The address of the next instruction to be executed from memory,
    /// always stepped by two.
    pub(super) program_counter: usize,
    /// The return addresses of active subroutine calls. The original
    /// interpreter allowed 12 levels of nesting, here we allow 16.
    pub(super) stack: ArrayVec<[u16; cpu::stack::SIZE]>,
    /// Counts down at 60 hertz until it reaches 0; games use it for event
    /// timing.
    pub(super) delay_timer: u8,
    /// Counts down at 60 hertz until it reaches 0; while it is nonzero the
    /// host keeps the tone playing.
    pub(super) sound_timer: u8,
    /// The monochrome framebuffer.
    pub(super) screen: Screen,
    /// The persistent Super-CHIP flag storage, surviving program swaps
    /// within the same machine instance.
    pub(super) rpl: [u8; cpu::rpl::SIZE],
    /// The most recently observed pressed hex key, not a multi-key set.
    pub(super) current_key: Option<u8>,
    /// The behavioural switches, immutable after construction.
    pub(super) quirks: Quirks,
    /// The Super-CHIP extension gate.
    pub(super) superchip: bool,
    /// Set once `0x00FD` ran; every later tick is a no-op.
    pub(super) exited: bool,
    /// Gates how often a batch of instructions runs.
    instruction_timer: Timer,
    /// Gates the countdown registers and the tone decay.
    sixty_hertz_timer: Timer,
    /// How many cycles run per instruction clock signal.
    instructions_per_tick: usize,
    /// This stores the random number generator used by the chipset. It is
    /// stored in the chipset so tests can swap in a deterministic one.
    pub(super) rng: Box<dyn RngCore + Send>,
    /// Diagnostic count of silently ignored opcodes.
    pub(super) unknown_opcodes: u64,
}

impl ChipSet {
    /// Will create a new chipset object with both clocks anchored at `now`.
    pub fn new(settings: Settings, now: Instant) -> Self {
        // initialize all the memory with 0
        let mut ram = vec![0; memory::SIZE];

        // load both fonts into the reserved low region
        ram[display::fontset::LOCATION..display::fontset::LOCATION + display::fontset::FONTSET.len()]
            .copy_from_slice(&display::fontset::FONTSET);
        ram[display::fontset::LARGE_LOCATION
            ..display::fontset::LARGE_LOCATION + display::fontset::LARGE_FONTSET.len()]
            .copy_from_slice(&display::fontset::LARGE_FONTSET);

        Self {
            memory: ram,
            registers: [0; cpu::register::SIZE],
            index_register: 0,
            program_counter: cpu::PROGRAM_COUNTER,
            stack: ArrayVec::new(),
            delay_timer: 0,
            sound_timer: 0,
            screen: Screen::new(settings.superchip),
            rpl: [0; cpu::rpl::SIZE],
            current_key: None,
            quirks: settings.quirks,
            superchip: settings.superchip,
            exited: false,
            instruction_timer: Timer::from_rate(settings.instructions_per_second, now),
            sixty_hertz_timer: Timer::from_rate(crate::definitions::timer::HERTZ, now),
            instructions_per_tick: settings.instructions_per_tick.max(1),
            rng: Box::new(rand::rngs::OsRng),
            unknown_opcodes: 0,
        }
    }

    /// Copies the program image into ram at `0x200` and rewinds the program
    /// counter onto it.
    ///
    /// May be called repeatedly against the same machine to swap programs;
    /// the RPL flags, the countdown registers and the framebuffer keep
    /// their state across loads.
    pub fn load(&mut self, program: &[u8]) -> Result<(), RomError> {
        let fit = memory::SIZE - cpu::PROGRAM_COUNTER;
        if program.len() > fit {
            return Err(RomError::TooLarge {
                have: program.len(),
                fit,
            });
        }

        self.memory[cpu::PROGRAM_COUNTER..cpu::PROGRAM_COUNTER + program.len()]
            .copy_from_slice(program);
        self.program_counter = cpu::PROGRAM_COUNTER;
        Ok(())
    }

    /// Drives both clock domains forward to `now`.
    ///
    /// When the instruction clock is ready a batch of fetch-decode-execute
    /// cycles runs; when the 60Hz clock is ready the countdown registers
    /// decrement. The returned signals are everything the host has to act
    /// on for this tick, in the order they happened.
    pub fn tick(&mut self, now: Instant) -> Result<Vec<Signal>, ProcessError> {
        let mut signals = Vec::new();
        if self.exited {
            return Ok(signals);
        }

        // poll both detectors up front, so a long instruction batch can not
        // starve the countdown clock
        let instructions_ready = self.instruction_timer.update(now);
        let sixty_hertz_ready = self.sixty_hertz_timer.update(now);

        if instructions_ready {
            for _ in 0..self.instructions_per_tick {
                match self.next()? {
                    Operation::None => {}
                    Operation::Draw => signals.push(Signal::Draw(self.screen.snapshot())),
                    Operation::SoundOn => signals.push(Signal::SoundOn),
                    Operation::Exit => {
                        self.exited = true;
                        break;
                    }
                }
            }
        }

        if sixty_hertz_ready {
            if self.delay_timer > 0 {
                self.delay_timer -= 1;
            }
            if self.sound_timer > 0 {
                self.sound_timer -= 1;
                if self.sound_timer == 0 {
                    signals.push(Signal::SoundOff);
                }
            }
        }

        Ok(signals)
    }

    /// Will advance the program by a single fetch-decode-execute cycle,
    /// regardless of the instruction clock.
    pub fn next(&mut self) -> Result<Operation, ProcessError> {
        let opcode = opcode::fetch(&self.memory, self.program_counter)?;
        // the program counter moves past the opcode before execution, so
        // jump and call targets overwrite this pre-advance
        self.program_counter += memory::opcodes::SIZE;

        let operation = self.execute(opcode)?;

        // running off the end of ram is the only intrinsic fault of the
        // machine, there is no halt instruction in the base opcode set
        if self.program_counter > memory::SIZE - memory::opcodes::SIZE {
            return Err(ProcessError::OutOfMemory(self.program_counter));
        }

        Ok(operation)
    }

    /// Will write the externally sampled pressed key, or `None` when no key
    /// is down. Expected once per tick from the keyboard adapter.
    pub fn set_key(&mut self, key: Option<u8>) {
        self.current_key = key;
    }

    /// Will push the return pointer onto the call stack.
    pub(super) fn push_stack(&mut self, pointer: u16) -> Result<(), ProcessError> {
        match self.stack.try_push(pointer) {
            None => Ok(()),
            Some(_) => Err(crate::StackError::Full.into()),
        }
    }

    /// Will pop the last return pointer off the call stack.
    pub(super) fn pop_stack(&mut self) -> Result<u16, ProcessError> {
        self.stack
            .pop()
            .ok_or_else(|| crate::StackError::Empty.into())
    }

    /// Moves the program counter as the executed opcode requested.
    pub(super) fn step(&mut self, step: Step) {
        self.program_counter = step.apply(self.program_counter);
    }

    /// Checked ram read for the memory-indexed opcodes.
    pub(super) fn read_memory(&self, address: usize) -> Result<u8, ProcessError> {
        self.memory
            .get(address)
            .copied()
            .ok_or(ProcessError::MemoryAccess { address })
    }

    /// Checked ram write for the memory-indexed opcodes.
    pub(super) fn write_memory(&mut self, address: usize, value: u8) -> Result<(), ProcessError> {
        match self.memory.get_mut(address) {
            Some(cell) => {
                *cell = value;
                Ok(())
            }
            None => Err(ProcessError::MemoryAccess { address }),
        }
    }

    /// will return the general purpose registers
    pub fn registers(&self) -> &[u8] {
        &self.registers
    }

    /// will return the whole addressable ram
    pub fn memory(&self) -> &[u8] {
        &self.memory
    }

    /// will return the index register
    pub fn index_register(&self) -> u16 {
        self.index_register
    }

    /// will return the program counter
    pub fn program_counter(&self) -> usize {
        self.program_counter
    }

    /// will return the delay timer
    pub fn delay_timer(&self) -> u8 {
        self.delay_timer
    }

    /// will return the sound timer
    pub fn sound_timer(&self) -> u8 {
        self.sound_timer
    }

    /// will return the persistent RPL flags
    pub fn rpl_flags(&self) -> &[u8] {
        &self.rpl
    }

    /// will return a copy of the current framebuffer
    pub fn frame(&self) -> Frame {
        self.screen.snapshot()
    }

    /// reports if the hi-res display mode is active
    pub fn extended_mode(&self) -> bool {
        self.screen.is_extended()
    }

    /// reports if the interpreter shut itself down via `0x00FD`
    pub fn has_exited(&self) -> bool {
        self.exited
    }

    /// will return the most recently sampled key
    pub fn current_key(&self) -> Option<u8> {
        self.current_key
    }

    /// how many opcodes were silently ignored as unrecognized
    pub fn unknown_opcode_count(&self) -> u64 {
        self.unknown_opcodes
    }

    /// Notes an unrecognized opcode.
    ///
    /// Unknown operation classes and sub-opcodes fall through without an
    /// error to stay compatible with programs relying on that, but they
    /// are logged and counted for diagnostics.
    pub(super) fn unknown_opcode(&mut self, opcode: Opcode) {
        log::warn!("ignoring unrecognized opcode {:#06X}", opcode);
        self.unknown_opcodes += 1;
    }
}

impl std::fmt::Debug for ChipSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChipSet")
            .field("registers", &self.registers)
            .field("index_register", &self.index_register)
            .field("program_counter", &self.program_counter)
            .field("stack", &self.stack)
            .field("delay_timer", &self.delay_timer)
            .field("sound_timer", &self.sound_timer)
            .field("superchip", &self.superchip)
            .field("exited", &self.exited)
            .finish()
    }
}
