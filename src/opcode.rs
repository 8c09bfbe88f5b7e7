//! Opcode abstractions, field extraction and constants.
use crate::{definitions::memory, OpcodeError};

/// the base mask used for generating all the other sub masks
pub(crate) const OPCODE_MASK_FFFF: u16 = u16::MAX;

/// the mask for the first four bits
pub(crate) const OPCODE_MASK_F000: u16 = OPCODE_MASK_FFFF << 12;

/// the mask for the last twelve bits
pub(crate) const OPCODE_MASK_0FFF: u16 = OPCODE_MASK_FFFF ^ OPCODE_MASK_F000;

/// the mask for the last eight bits
pub(crate) const OPCODE_MASK_00FF: u16 = OPCODE_MASK_FFFF >> 8;

/// the mask for the last four bits
pub(crate) const OPCODE_MASK_000F: u16 = OPCODE_MASK_FFFF >> 12;

/// the size of a single byte in bits
const BYTE_SIZE: u16 = 0x8;

/// A wrapper type for u16 to make it clear what is meant to be used.
///
/// Opcodes are stored big-endian in ram, two bytes each.
pub type Opcode = u16;

/// Will read the opcode at `pointer` out of `data`.
///
/// The two bytes at `pointer` and `pointer + 1` make up the big-endian
/// instruction word, so the read fails if `pointer + 1` falls outside of
/// the given memory.
pub fn fetch(data: &[u8], pointer: usize) -> Result<Opcode, OpcodeError> {
    if pointer + 1 < data.len() {
        Ok(Opcode::from_be_bytes([data[pointer], data[pointer + 1]]))
    } else {
        Err(OpcodeError::MemoryInvalid {
            pointer,
            len: data.len(),
        })
    }
}

/// These are special traits used to filter out information from opcodes.
///
/// The opcode families are written down as `TXYN` / `TXNN` / `TNNN`, where
/// `T` is the operation class, `X` and `Y` are register indexes, and the
/// `N` groups are immediate constants.
pub trait OpcodeTrait {
    /// The operation class, the top nibble moved down to `0x0..=0xF`.
    fn t(&self) -> usize;

    /// The `NNN` address operand, the low twelve bits.
    fn nnn(&self) -> usize;

    /// The `X` register index and the `NN` immediate constant.
    fn xnn(&self) -> (usize, u8);

    /// The `X` and `Y` register indexes and the `N` sub-opcode selector.
    fn xyn(&self) -> (usize, usize, usize);

    /// The `X` and `Y` register indexes.
    fn xy(&self) -> (usize, usize);

    /// The `X` register index.
    fn x(&self) -> usize;

    /// The `NN` immediate constant, the low byte.
    fn nn(&self) -> u8;

    /// The `N` last nibble.
    fn n(&self) -> usize;
}

impl OpcodeTrait for Opcode {
    fn t(&self) -> usize {
        ((self & OPCODE_MASK_F000) >> (3 * 4)) as usize
    }

    fn nnn(&self) -> usize {
        (self & OPCODE_MASK_0FFF) as usize
    }

    fn xnn(&self) -> (usize, u8) {
        (self.x(), self.nn())
    }

    fn xyn(&self) -> (usize, usize, usize) {
        let (x, y) = self.xy();
        (x, y, self.n())
    }

    fn xy(&self) -> (usize, usize) {
        const NIBBLE: u16 = BYTE_SIZE / 2;
        let y = ((self >> NIBBLE) & OPCODE_MASK_000F) as usize;
        (self.x(), y)
    }

    fn x(&self) -> usize {
        ((self >> BYTE_SIZE) & OPCODE_MASK_000F) as usize
    }

    fn nn(&self) -> u8 {
        (self & OPCODE_MASK_00FF) as u8
    }

    fn n(&self) -> usize {
        (self & OPCODE_MASK_000F) as usize
    }
}

/// Represents the program counter adjustment an opcode handler requests.
///
/// The program counter has already moved past the executing opcode by the
/// time a handler runs, so the common case is [`Step::Stay`](Step::Stay).
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Step {
    /// Leave the already advanced program counter where it is.
    Stay,
    /// Skip over the next opcode (conditional skips).
    Skip,
    /// Move back onto the executing opcode, so it runs again on the
    /// next cycle (the key wait busy loop).
    Rewind,
    /// Move the program counter to the given location.
    Jump(usize),
}

impl Step {
    /// Will return a Skip if the condition is true.
    #[inline]
    pub fn cond(cond: bool) -> Self {
        if cond {
            Step::Skip
        } else {
            Step::Stay
        }
    }

    /// Maps the step to the new program counter location.
    #[inline]
    pub fn apply(&self, program_counter: usize) -> usize {
        match *self {
            Step::Stay => program_counter,
            Step::Skip => program_counter + memory::opcodes::SIZE,
            Step::Rewind => program_counter - memory::opcodes::SIZE,
            Step::Jump(pointer) => pointer,
        }
    }
}

/// Represents a side effect an executed opcode asks the caller to handle.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Operation {
    /// If no action has to be taken.
    None,
    /// The framebuffer changed and shall be presented again.
    Draw,
    /// The sound timer got set to a nonzero value, the tone shall start.
    SoundOn,
    /// The interpreter shut itself down (`0x00FD`).
    Exit,
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE_OPCODE: Opcode = 0x1EDA;

    #[test]
    fn test_extractors() {
        assert_eq!(BASE_OPCODE.t(), 0x1);
        assert_eq!(BASE_OPCODE.nnn(), 0xEDA);
        assert_eq!(BASE_OPCODE.xnn(), (0xE, 0xDA));
        assert_eq!(BASE_OPCODE.xyn(), (0xE, 0xD, 0xA));
        assert_eq!(BASE_OPCODE.xy(), (0xE, 0xD));
        assert_eq!(BASE_OPCODE.x(), 0xE);
        assert_eq!(BASE_OPCODE.nn(), 0xDA);
        assert_eq!(BASE_OPCODE.n(), 0xA);
    }

    #[test]
    fn test_fetch() {
        const OPCODES: [Opcode; 2] = [0x00EE, 0x1EDA];
        const SPLIT_OPCODE: [u8; 4] = [0x00, 0xEE, 0x1E, 0xDA];

        for (i, val) in OPCODES.iter().enumerate() {
            let opcode = fetch(&SPLIT_OPCODE, i * 2).expect("This will work.");
            assert_eq!(opcode, *val);
        }
    }

    #[test]
    fn test_fetch_out_of_bounds() {
        const SPLIT_OPCODE: [u8; 4] = [0x00, 0xEE, 0x1E, 0xDA];
        let pointer = 3;
        let err = OpcodeError::MemoryInvalid {
            pointer,
            len: SPLIT_OPCODE.len(),
        };
        assert_eq!(Err(err), fetch(&SPLIT_OPCODE, pointer));
    }

    #[test]
    fn test_step() {
        assert_eq!(Step::Stay, Step::cond(false));
        assert_eq!(Step::Skip, Step::cond(true));

        let pc = 0x0204;
        assert_eq!(Step::Stay.apply(pc), 0x0204);
        assert_eq!(Step::Skip.apply(pc), 0x0206);
        assert_eq!(Step::Rewind.apply(pc), 0x0202);
        assert_eq!(Step::Jump(0x0400).apply(pc), 0x0400);
    }
}
