//! The shared constants of the virtual machine.

pub mod memory {
    /// The size of the addressable ram
    pub const SIZE: usize = 0x1000; // 4096

    /// opcode information
    pub mod opcodes {
        /// The step used for calculating the program counter increments
        pub const SIZE: usize = 2;
    }
}

/// The definitions for the cpu
pub mod cpu {
    /// The offset at which programs are loaded and started
    pub const PROGRAM_COUNTER: usize = 0x0200;
    /// The default amount of instructions run per second
    pub const HERTZ: u32 = 500;

    /// The definitions needed for the register
    pub(crate) mod register {
        /// The size of the chip set registers
        pub const SIZE: usize = 16;
        /// The last entry of the registers, doubling as the flag register
        pub const LAST: usize = SIZE - 1;
    }

    /// The stack definitions
    pub(crate) mod stack {
        /// The count of nesting entries
        pub const SIZE: usize = 16;
    }

    /// The persistent RPL flag storage (Super-CHIP)
    pub(crate) mod rpl {
        /// The count of persistent flag slots
        pub const SIZE: usize = 8;
    }
}

/// The timer definitions
pub mod timer {
    /// The amount of hertz the countdown clocks run at
    pub const HERTZ: u32 = 60;
    /// The countdown clock interval in milliseconds
    pub const INTERVAL: u64 = 1000 / HERTZ as u64;
}

/// The display definitions
pub mod display {
    /// The amount of pixels width in the base resolution
    pub const WIDTH: usize = 64;
    /// The amount of pixels height in the base resolution
    pub const HEIGHT: usize = 32;

    /// The extended (hi-res) resolution used by the Super-CHIP
    pub mod extended {
        /// The amount of pixels width
        pub const WIDTH: usize = 128;
        /// The amount of pixels height
        pub const HEIGHT: usize = 64;
    }

    /// The fontset information
    pub mod fontset {
        /// The location of the beginning of the small font in memory
        pub const LOCATION: usize = 0x0;
        /// The amount of bytes a single small glyph takes up
        pub const STRIDE: usize = 5;
        /// The `4x5` glyphs for the digits `0-F`
        pub const FONTSET: [u8; 80] = [
            0xF0, 0x90, 0x90, 0x90, 0xF0, // 0
            0x20, 0x60, 0x20, 0x20, 0x70, // 1
            0xF0, 0x10, 0xF0, 0x80, 0xF0, // 2
            0xF0, 0x10, 0xF0, 0x10, 0xF0, // 3
            0x90, 0x90, 0xF0, 0x10, 0x10, // 4
            0xF0, 0x80, 0xF0, 0x10, 0xF0, // 5
            0xF0, 0x80, 0xF0, 0x90, 0xF0, // 6
            0xF0, 0x10, 0x20, 0x40, 0x40, // 7
            0xF0, 0x90, 0xF0, 0x90, 0xF0, // 8
            0xF0, 0x90, 0xF0, 0x10, 0xF0, // 9
            0xF0, 0x90, 0xF0, 0x90, 0x90, // A
            0xE0, 0x90, 0xE0, 0x90, 0xE0, // B
            0xF0, 0x80, 0x80, 0x80, 0xF0, // C
            0xE0, 0x90, 0x90, 0x90, 0xE0, // D
            0xF0, 0x80, 0xF0, 0x80, 0xF0, // E
            0xF0, 0x80, 0xF0, 0x80, 0x80, // F
        ];

        /// The location of the beginning of the large font in memory
        pub const LARGE_LOCATION: usize = 0x50;
        /// The amount of bytes a single large glyph takes up
        pub const LARGE_STRIDE: usize = 10;
        /// The `8x10` glyphs for the digits `0-9` used by the Super-CHIP
        pub const LARGE_FONTSET: [u8; 100] = [
            0x3C, 0x7E, 0xC3, 0xC3, 0xC3, 0xC3, 0xC3, 0xC3, 0x7E, 0x3C, // 0
            0x3C, 0x18, 0x18, 0x18, 0x18, 0x18, 0x18, 0x58, 0x38, 0x18, // 1
            0xFF, 0xFF, 0x60, 0x30, 0x18, 0x0C, 0x06, 0xC3, 0x7F, 0x3E, // 2
            0x3C, 0x7E, 0xC3, 0x03, 0x0E, 0x0E, 0x03, 0xC3, 0x7E, 0x3C, // 3
            0x06, 0x06, 0xFF, 0xFF, 0xC6, 0x66, 0x36, 0x1E, 0x0E, 0x06, // 4
            0x3C, 0x7E, 0xC3, 0x03, 0xFE, 0xFC, 0xC0, 0xC0, 0xFF, 0xFF, // 5
            0x3C, 0x7E, 0xC3, 0xC3, 0xFE, 0xFC, 0xC0, 0xC0, 0x7C, 0x3E, // 6
            0x60, 0x60, 0x60, 0x30, 0x18, 0x0C, 0x06, 0x03, 0xFF, 0xFF, // 7
            0x3C, 0x7E, 0xC3, 0xC3, 0x7E, 0x7E, 0xC3, 0xC3, 0x7E, 0x3C, // 8
            0x7C, 0x3E, 0x03, 0x03, 0x3F, 0x7F, 0xC3, 0xC3, 0x7E, 0x3C, // 9
        ];
    }
}

/// The definitions needed for correct keyboard handling.
pub mod keyboard {
    /// all the different keyboard entries
    pub const SIZE: usize = 16;
    /// The hex keypad layout requested by the chipset
    pub const LAYOUT: [[u8; 4]; 4] = [
        [0x1, 0x2, 0x3, 0xC],
        [0x4, 0x5, 0x6, 0xD],
        [0x7, 0x8, 0x9, 0xE],
        [0xA, 0x0, 0xB, 0xF],
    ];
}
