//! The fetch-decode-execute handlers, grouped by opcode family.
use rand::RngCore;

use crate::{
    definitions::{cpu, display::fontset},
    opcode::{Opcode, OpcodeTrait, Operation, Step},
    ProcessError,
};

use super::chipset::ChipSet;

impl ChipSet {
    /// Dispatches a fetched opcode onto its family handler and applies the
    /// requested program counter step afterwards.
    pub(super) fn execute(&mut self, opcode: Opcode) -> Result<Operation, ProcessError> {
        log::trace!("executing opcode {:#06X}", opcode);

        let mut operation = Operation::None;
        let mut step_op = |(step, op): (Step, Operation)| {
            operation = op;
            step
        };

        let step = match opcode.t() {
            0x0 => self.zero(opcode).map(&mut step_op)?,
            0x1 => {
                // 1NNN
                // Jumps to address NNN.
                Step::Jump(opcode.nnn())
            }
            0x2 => {
                // 2NNN
                // Calls the subroutine at NNN, remembering the already
                // advanced program counter as the return address.
                self.push_stack(self.program_counter as u16)?;
                Step::Jump(opcode.nnn())
            }
            0x3 => {
                // 3XNN
                // Skips the next instruction if VX equals NN.
                let (x, nn) = opcode.xnn();
                Step::cond(self.registers[x] == nn)
            }
            0x4 => {
                // 4XNN
                // Skips the next instruction if VX doesn't equal NN.
                let (x, nn) = opcode.xnn();
                Step::cond(self.registers[x] != nn)
            }
            0x5 => {
                // 5XY0
                // Skips the next instruction if VX equals VY.
                match opcode.xyn() {
                    (x, y, 0) => Step::cond(self.registers[x] == self.registers[y]),
                    _ => {
                        self.unknown_opcode(opcode);
                        Step::Stay
                    }
                }
            }
            0x6 => {
                // 6XNN
                // Sets VX to NN.
                let (x, nn) = opcode.xnn();
                self.registers[x] = nn;
                Step::Stay
            }
            0x7 => {
                // 7XNN
                // Adds NN to VX. (Carry flag is not changed)
                let (x, nn) = opcode.xnn();
                self.registers[x] = self.registers[x].wrapping_add(nn);
                Step::Stay
            }
            0x8 => self.eight(opcode)?,
            0x9 => {
                // 9XY0
                // Skips the next instruction if VX doesn't equal VY.
                match opcode.xyn() {
                    (x, y, 0) => Step::cond(self.registers[x] != self.registers[y]),
                    _ => {
                        self.unknown_opcode(opcode);
                        Step::Stay
                    }
                }
            }
            0xA => {
                // ANNN
                // Sets I to the address NNN.
                self.index_register = opcode.nnn() as u16;
                Step::Stay
            }
            0xB => {
                // BNNN / BXNN
                // Jumps to the address NNN plus V0, or plus VX with the
                // jump quirk enabled.
                let base = if self.quirks.jump {
                    self.registers[opcode.x()]
                } else {
                    self.registers[0]
                };
                Step::Jump(base as usize + opcode.nnn())
            }
            0xC => {
                // CXNN
                // Sets VX to a random byte masked with NN.
                let (x, nn) = opcode.xnn();
                // using a fill_bytes call here, as the RngCore trait does
                // not support a direct random u8
                let mut rand: [u8; 1] = [0];
                self.rng.fill_bytes(&mut rand);
                self.registers[x] = nn & rand[0];
                Step::Stay
            }
            0xD => self.d(opcode).map(&mut step_op)?,
            0xE => self.e(opcode)?,
            0xF => self.f(opcode).map(&mut step_op)?,
            _ => {
                self.unknown_opcode(opcode);
                Step::Stay
            }
        };

        self.step(step);
        Ok(operation)
    }

    /// The `0x0TTT` family: display control, subroutine return and the
    /// Super-CHIP scroll and mode opcodes.
    fn zero(&mut self, opcode: Opcode) -> Result<(Step, Operation), ProcessError> {
        let res = match opcode {
            0x00E0 => {
                // 00E0
                // clear display
                self.screen.clear();
                (Step::Stay, Operation::Draw)
            }
            0x00EE => {
                // 00EE
                // Return from sub routine => pop from stack
                let pointer = self.pop_stack()?;
                (Step::Jump(pointer as usize), Operation::None)
            }
            0x00FB => {
                // 00FB
                // Scroll the display right by 4 physical columns, which in
                // low-res mode amounts to 2 logical pixels.
                self.require_superchip(opcode)?;
                self.screen.scroll_right(4);
                (Step::Stay, Operation::Draw)
            }
            0x00FC => {
                // 00FC
                // Scroll the display left by 4 physical columns, which in
                // low-res mode amounts to 2 logical pixels.
                self.require_superchip(opcode)?;
                self.screen.scroll_left(4);
                (Step::Stay, Operation::Draw)
            }
            0x00FD => {
                // 00FD
                // Exit the interpreter.
                self.require_superchip(opcode)?;
                (Step::Stay, Operation::Exit)
            }
            0x00FE => {
                // 00FE
                // Disable the hi-res display mode, losing the image.
                self.require_superchip(opcode)?;
                self.screen.set_extended(false);
                (Step::Stay, Operation::Draw)
            }
            0x00FF => {
                // 00FF
                // Enable the hi-res display mode, losing the image.
                self.require_superchip(opcode)?;
                self.screen.set_extended(true);
                (Step::Stay, Operation::Draw)
            }
            _ if opcode & 0xFFF0 == 0x00C0 => {
                // 00CN
                // Scroll the display down by N physical rows, which in
                // low-res mode amounts to N/2 logical pixels.
                self.require_superchip(opcode)?;
                self.screen.scroll_down(opcode.n());
                (Step::Stay, Operation::Draw)
            }
            _ => {
                self.unknown_opcode(opcode);
                (Step::Stay, Operation::None)
            }
        };
        Ok(res)
    }

    /// The `8XYN` ALU family.
    ///
    /// - `8XY0` - `Vx=Vy`
    /// - `8XY1` - `Vx=Vx|Vy`
    /// - `8XY2` - `Vx=Vx&Vy`
    /// - `8XY3` - `Vx=Vx^Vy`
    /// - `8XY4` - `Vx+=Vy`, `VF` holds the carry
    /// - `8XY5` - `Vx-=Vy`, `VF` holds "no borrow" (`Vx >= Vy`)
    /// - `8XY6` - shift right, `VF` holds the shifted out bit
    /// - `8XY7` - `Vx=Vy-Vx`, `VF` holds "no borrow" (`Vy >= Vx`)
    /// - `8XYE` - shift left, `VF` holds the shifted out bit
    ///
    /// The shifts take `VY` as their source, or `VX` itself when the shift
    /// quirk is enabled; the result always lands in `VX`. The flag write
    /// happens after the result write, so `VF` as destination ends up
    /// holding the flag.
    fn eight(&mut self, opcode: Opcode) -> Result<Step, ProcessError> {
        let (x, y, n) = opcode.xyn();
        match n {
            0x0 => self.registers[x] = self.registers[y],
            0x1 => self.registers[x] |= self.registers[y],
            0x2 => self.registers[x] &= self.registers[y],
            0x3 => self.registers[x] ^= self.registers[y],
            0x4 => {
                let (res, carried) = self.registers[x].overflowing_add(self.registers[y]);
                self.registers[x] = res;
                self.registers[cpu::register::LAST] = carried as u8;
            }
            0x5 => {
                let (vx, vy) = (self.registers[x], self.registers[y]);
                self.registers[x] = vx.wrapping_sub(vy);
                self.registers[cpu::register::LAST] = (vx >= vy) as u8;
            }
            0x6 => {
                let src = self.shift_source(x, y);
                self.registers[x] = src >> 1;
                self.registers[cpu::register::LAST] = src & 1;
            }
            0x7 => {
                let (vx, vy) = (self.registers[x], self.registers[y]);
                self.registers[x] = vy.wrapping_sub(vx);
                self.registers[cpu::register::LAST] = (vy >= vx) as u8;
            }
            0xE => {
                let src = self.shift_source(x, y);
                self.registers[x] = src << 1;
                self.registers[cpu::register::LAST] = src >> 7;
            }
            _ => self.unknown_opcode(opcode),
        }
        Ok(Step::Stay)
    }

    /// The register a shift opcode reads from, quirk dependent.
    fn shift_source(&self, x: usize, y: usize) -> u8 {
        if self.quirks.shift {
            self.registers[x]
        } else {
            self.registers[y]
        }
    }

    /// `DXYN` - draws an `N` rows tall sprite from the index register at
    /// `(VX, VY)`, XORing it into the framebuffer.
    ///
    /// The origin wraps at the active resolution, pixels beyond the edge
    /// are clipped. `VF` is set when any lit pixel gets cleared. In hi-res
    /// mode a height of 0 draws a `16x16` sprite of two bytes per row.
    fn d(&mut self, opcode: Opcode) -> Result<(Step, Operation), ProcessError> {
        let (x, y, n) = opcode.xyn();

        let width = self.screen.logical_width();
        let height = self.screen.logical_height();

        let wide = self.superchip && self.screen.is_extended() && n == 0;
        let rows = if wide { 16 } else { n };
        let columns = if wide { 16 } else { 8 };

        let origin_x = self.registers[x] as usize % width;
        let origin_y = self.registers[y] as usize % height;
        let index = self.index_register as usize;

        self.registers[cpu::register::LAST] = 0;

        for row in 0..rows {
            let py = origin_y + row;
            if py >= height {
                break;
            }

            let bits = if wide {
                let hi = self.read_memory(index + 2 * row)? as u16;
                let lo = self.read_memory(index + 2 * row + 1)? as u16;
                hi << 8 | lo
            } else {
                self.read_memory(index + row)? as u16
            };

            for column in 0..columns {
                let px = origin_x + column;
                if px >= width {
                    break;
                }

                if bits & (1u16 << (columns - 1 - column)) == 0 {
                    continue;
                }

                if self.screen.flip(px, py) {
                    self.registers[cpu::register::LAST] = 1;
                }
            }
        }

        Ok((Step::Stay, Operation::Draw))
    }

    /// The `EXTT` key skip family.
    ///
    /// - `EX9E` - skip if the hex key in `VX` is the pressed one
    /// - `EXA1` - skip if the hex key in `VX` is not the pressed one
    fn e(&mut self, opcode: Opcode) -> Result<Step, ProcessError> {
        let (x, nn) = opcode.xnn();
        let pressed = self.current_key == Some(self.registers[x] & 0x0F);
        let step = match nn {
            0x9E => Step::cond(pressed),
            0xA1 => Step::cond(!pressed),
            _ => {
                self.unknown_opcode(opcode);
                Step::Stay
            }
        };
        Ok(step)
    }

    /// The `FXTT` family: timers, key wait, index arithmetic, fonts, BCD,
    /// register transfer and the Super-CHIP RPL flags.
    fn f(&mut self, opcode: Opcode) -> Result<(Step, Operation), ProcessError> {
        let (x, nn) = opcode.xnn();
        let mut operation = Operation::None;
        let mut step = Step::Stay;
        match nn {
            0x07 => {
                // FX07
                // Sets VX to the value of the delay timer.
                self.registers[x] = self.delay_timer;
            }
            0x0A => {
                // FX0A
                // Waits for a key press and stores it in VX. Without a key
                // the program counter rewinds onto this opcode, so the
                // wait is a busy loop across ticks, never a blocking read.
                match self.current_key {
                    None => step = Step::Rewind,
                    Some(key) if key > 0xF => return Err(ProcessError::KeyOutOfRange(key)),
                    Some(key) => self.registers[x] = key,
                }
            }
            0x15 => {
                // FX15
                // Sets the delay timer to VX.
                self.delay_timer = self.registers[x];
            }
            0x18 => {
                // FX18
                // Sets the sound timer to VX and starts the tone.
                self.sound_timer = self.registers[x];
                if self.sound_timer > 0 {
                    operation = Operation::SoundOn;
                }
            }
            0x1E => {
                // FX1E
                // Adds VX to I. VF is not affected.
                self.index_register = self.index_register.wrapping_add(self.registers[x] as u16);
            }
            0x29 => {
                // FX29
                // Sets I to the small glyph for the low nibble of VX.
                let glyph = (self.registers[x] & 0x0F) as usize;
                self.index_register = (fontset::LOCATION + fontset::STRIDE * glyph) as u16;
            }
            0x30 => {
                // FX30
                // Sets I to the large glyph for the low nibble of VX.
                self.require_superchip(opcode)?;
                let glyph = (self.registers[x] & 0x0F) as usize;
                self.index_register =
                    (fontset::LARGE_LOCATION + fontset::LARGE_STRIDE * glyph) as u16;
            }
            0x33 => {
                // FX33
                // Stores the binary-coded decimal representation of VX at
                // I (hundreds), I+1 (tens) and I+2 (ones).
                let pointer = self.index_register as usize;
                let value = self.registers[x];
                self.write_memory(pointer, value / 100)?;
                self.write_memory(pointer + 1, value / 10 % 10)?;
                self.write_memory(pointer + 2, value % 10)?;
            }
            0x55 => {
                // FX55
                // Stores V0 to VX (including VX) in memory starting at I.
                let pointer = self.index_register as usize;
                for offset in 0..=x {
                    self.write_memory(pointer + offset, self.registers[offset])?;
                }
                if self.quirks.load_store {
                    self.index_register = self.index_register.wrapping_add(x as u16);
                }
            }
            0x65 => {
                // FX65
                // Fills V0 to VX (including VX) from memory starting at I.
                let pointer = self.index_register as usize;
                for offset in 0..=x {
                    self.registers[offset] = self.read_memory(pointer + offset)?;
                }
                if self.quirks.load_store {
                    self.index_register = self.index_register.wrapping_add(x as u16);
                }
            }
            0x75 => {
                // FX75
                // Stores V0 to VX in the persistent RPL flags (X <= 7).
                self.require_superchip(opcode)?;
                if x >= cpu::rpl::SIZE {
                    return Err(ProcessError::RplOutOfRange(x));
                }
                self.rpl[..=x].copy_from_slice(&self.registers[..=x]);
            }
            0x85 => {
                // FX85
                // Restores V0 to VX from the persistent RPL flags (X <= 7).
                self.require_superchip(opcode)?;
                if x >= cpu::rpl::SIZE {
                    return Err(ProcessError::RplOutOfRange(x));
                }
                self.registers[..=x].copy_from_slice(&self.rpl[..=x]);
            }
            _ => self.unknown_opcode(opcode),
        }
        Ok((step, operation))
    }

    fn require_superchip(&self, opcode: Opcode) -> Result<(), ProcessError> {
        if self.superchip {
            Ok(())
        } else {
            Err(ProcessError::SuperChipRequired(opcode))
        }
    }
}
