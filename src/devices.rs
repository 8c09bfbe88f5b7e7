//! The traits a host implements to hook the machine up to real hardware.
use crate::chip8::Frame;

#[cfg_attr(test, mockall::automock)]
/// The trait responsible for the display based code
pub trait DisplayCommands {
    /// Will render the given framebuffer snapshot.
    fn draw(&mut self, frame: &Frame);
}

#[cfg_attr(test, mockall::automock)]
/// The trait responsible for the tone output
pub trait SoundCommands {
    /// Will start playing the tone.
    fn sound_on(&mut self);
    /// Will stop playing the tone.
    fn sound_off(&mut self);
}

#[cfg_attr(test, mockall::automock)]
/// The trait responsible for reading the keyboard data
///
/// Input is done with a hex keyboard that has 16 keys ranging `0-F`. The
/// host reports the currently held key as the character of its physical
/// binding, [`map_key`] then translates it onto the hex pad.
pub trait KeyboardCommands {
    /// The currently held key, or `None` when nothing is pressed.
    fn pressed_key(&self) -> Option<char>;
}

/// Maps a physical key onto the hex pad.
///
/// The left hand block of a QWERTY keyboard covers the pad:
///
/// ```text
/// 1 2 3 4        1 2 3 C
/// Q W E R   =>   4 5 6 D
/// A S D F        7 8 9 E
/// Z X C V        A 0 B F
/// ```
pub fn map_key(key: char) -> Option<u8> {
    let mapped = match key.to_ascii_uppercase() {
        '1' => 0x1,
        '2' => 0x2,
        '3' => 0x3,
        '4' => 0xC,
        'Q' => 0x4,
        'W' => 0x5,
        'E' => 0x6,
        'R' => 0xD,
        'A' => 0x7,
        'S' => 0x8,
        'D' => 0x9,
        'F' => 0xE,
        'Z' => 0xA,
        'X' => 0x0,
        'C' => 0xB,
        'V' => 0xF,
        _ => return None,
    };
    Some(mapped)
}
