//! Construction parameters of the virtual machine.
use crate::definitions::cpu;

/// The named behavioural switches reproducing divergent interpreter
/// conventions for the same opcode bytes.
///
/// All three are independent and immutable for the lifetime of a chipset.
/// See <https://github.com/Diesel-Net/kiwi-8/issues/9> for the history of
/// these divergences.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Quirks {
    /// `FX55`/`FX65` advance the index register by `X` after the transfer.
    pub load_store: bool,
    /// `8XY6`/`8XYE` shift `VX` itself instead of moving a shifted `VY`
    /// into `VX`.
    pub shift: bool,
    /// `BXNN` jumps to `VX + XNN` instead of `V0 + NNN`.
    pub jump: bool,
}

/// The full construction configuration of a chipset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settings {
    /// How many instructions per second the instruction clock allows,
    /// `0` meaning unthrottled (one batch on every tick).
    pub instructions_per_second: u32,
    /// How many fetch-decode-execute cycles run per ready signal of the
    /// instruction clock, `0` behaving like `1`.
    pub instructions_per_tick: usize,
    /// Enables the Super-CHIP extension set (hi-res display, scrolls,
    /// RPL flags, large font, exit).
    pub superchip: bool,
    /// The behavioural switches.
    pub quirks: Quirks,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            instructions_per_second: cpu::HERTZ,
            instructions_per_tick: 1,
            superchip: false,
            quirks: Quirks::default(),
        }
    }
}

impl Settings {
    /// A default configuration with the Super-CHIP extension turned on.
    pub fn superchip() -> Self {
        Self {
            superchip: true,
            ..Self::default()
        }
    }
}
