use thiserror::Error;

use crate::opcode::Opcode;

/// The errors that can stop the fetch-decode-execute cycle.
///
/// All of these are deterministic functions of the program bytes and the
/// machine state, so a failing program will fail identically on every run
/// (given the same rng seed for `CXNN`).
#[derive(Error, Debug, PartialEq, Eq, Clone, Copy)]
pub enum ProcessError {
    #[error("Invalid opcode state '{0}'.")]
    Opcode(#[from] OpcodeError),
    #[error("Invalid stack state '{0}'.")]
    Stack(#[from] StackError),
    #[error("Program counter {0:#06X} ran past the end of memory.")]
    OutOfMemory(usize),
    #[error("Memory access at {address:#06X} is outside of the address space.")]
    MemoryAccess { address: usize },
    #[error("The reported key {0:#04X} is not a hex key.")]
    KeyOutOfRange(u8),
    #[error("Register index {0:#03X} is too large for the RPL flag storage.")]
    RplOutOfRange(usize),
    #[error("Opcode {0:#06X} requires the Super-CHIP extension to be enabled.")]
    SuperChipRequired(Opcode),
}

#[derive(Error, Debug, PartialEq, Eq, Clone, Copy)]
pub enum OpcodeError {
    #[error("There can not be an opcode at {pointer}, if the memory len is {len}.")]
    MemoryInvalid { pointer: usize, len: usize },
}

#[derive(Error, Debug, PartialEq, Eq, Clone, Copy)]
pub enum StackError {
    #[error("Stack is full!")]
    Full,
    #[error("Stack is empty!")]
    Empty,
}

/// The errors that can happen while loading a program image.
#[derive(Error, Debug, PartialEq, Eq, Clone, Copy)]
pub enum RomError {
    #[error("A program of {have} bytes does not fit into the {fit} bytes of free ram.")]
    TooLarge { have: usize, fit: usize },
}
