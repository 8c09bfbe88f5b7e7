//! An interpreter core for the chip8 virtual machine and its Super-CHIP
//! extension.
//!
//! The [`chip8::ChipSet`] owns the whole machine state and is driven by a
//! host loop through [`chip8::ChipSet::tick`]; the [`Runner`] wires it up to
//! the device traits in [`devices`]. The core never blocks, spawns or reads
//! the wall clock itself, every tick receives the current time as an
//! explicit argument.
pub mod chip8;
pub mod definitions;
pub mod devices;
pub mod opcode;
pub mod settings;
pub mod timer;
mod error;

// reexporting for convinience
mod runner;
pub use error::*;
pub use runner::*;
