//! The full implementation of the chip8 virtual machine, from the chipset
//! state over the opcode handlers to the framebuffer.
mod chipset;
mod opcodes;
mod screen;

/// reexport chipset structs and data for simpler usage
pub use chipset::*;
pub use screen::Frame;
