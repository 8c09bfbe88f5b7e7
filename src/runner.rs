use std::time::Instant;

use crate::{
    chip8::{ChipSet, Signal},
    devices::{map_key, DisplayCommands, KeyboardCommands, SoundCommands},
    settings::Settings,
    ProcessError, RomError,
};

/// Wires a chipset up to the host devices and drives it tick by tick.
///
/// The host owns the loop: it calls [`frame`](Runner::frame) as often as it
/// likes (typically once per rendered frame) and the internal clocks decide
/// what actually runs. All device callbacks happen inside that call, on the
/// callers thread.
pub struct Runner<D, S, K> {
    chip: ChipSet,
    display: D,
    sound: S,
    keyboard: K,
}

impl<D, S, K> Runner<D, S, K>
where
    D: DisplayCommands,
    S: SoundCommands,
    K: KeyboardCommands,
{
    /// Will create a runner with a fresh chipset anchored at `now`.
    pub fn new(settings: Settings, now: Instant, display: D, sound: S, keyboard: K) -> Self {
        Self {
            chip: ChipSet::new(settings, now),
            display,
            sound,
            keyboard,
        }
    }

    /// Copies the program image into the machine, see [`ChipSet::load`].
    pub fn load(&mut self, program: &[u8]) -> Result<(), RomError> {
        self.chip.load(program)
    }

    /// Samples the keyboard, advances the machine to `now` and forwards
    /// every resulting signal onto the matching device.
    pub fn frame(&mut self, now: Instant) -> Result<(), ProcessError> {
        let key = self.keyboard.pressed_key().and_then(map_key);
        self.chip.set_key(key);

        for signal in self.chip.tick(now)? {
            match signal {
                Signal::Draw(frame) => self.display.draw(&frame),
                Signal::SoundOn => self.sound.sound_on(),
                Signal::SoundOff => self.sound.sound_off(),
            }
        }
        Ok(())
    }

    /// The machine state, for inspection.
    pub fn chip(&self) -> &ChipSet {
        &self.chip
    }

    /// The machine state, for direct manipulation.
    pub fn chip_mut(&mut self) -> &mut ChipSet {
        &mut self.chip
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::devices::{MockDisplayCommands, MockKeyboardCommands, MockSoundCommands};

    fn unthrottled() -> Settings {
        Settings {
            instructions_per_second: 0,
            ..Settings::default()
        }
    }

    #[test]
    fn test_draw_signal_reaches_display() {
        let mut display = MockDisplayCommands::new();
        display.expect_draw().times(1).return_const(());

        let sound = MockSoundCommands::new();

        let mut keyboard = MockKeyboardCommands::new();
        keyboard.expect_pressed_key().returning(|| None);

        let now = Instant::now();
        let mut runner = Runner::new(unthrottled(), now, display, sound, keyboard);
        // 00E0 - clear display
        runner.load(&[0x00, 0xE0]).expect("rom fits");
        runner.frame(now).expect("tick runs");
    }

    #[test]
    fn test_sound_signal_reaches_sound_device() {
        let display = MockDisplayCommands::new();

        let mut sound = MockSoundCommands::new();
        sound.expect_sound_on().times(1).return_const(());

        let mut keyboard = MockKeyboardCommands::new();
        keyboard.expect_pressed_key().returning(|| None);

        let now = Instant::now();
        let mut runner = Runner::new(unthrottled(), now, display, sound, keyboard);
        // 610A - V1 = 10, F118 - sound timer = V1
        runner.load(&[0x61, 0x0A, 0xF1, 0x18]).expect("rom fits");
        runner.frame(now).expect("tick runs");
        runner.frame(now).expect("tick runs");
    }

    #[test]
    fn test_keyboard_sampling_maps_onto_hex_pad() {
        let display = MockDisplayCommands::new();
        let sound = MockSoundCommands::new();

        let mut keyboard = MockKeyboardCommands::new();
        keyboard.expect_pressed_key().returning(|| Some('w'));

        let now = Instant::now();
        let mut runner = Runner::new(unthrottled(), now, display, sound, keyboard);
        runner.load(&[0x00, 0x00]).expect("rom fits");
        runner.frame(now).expect("tick runs");

        assert_eq!(runner.chip().current_key(), Some(0x5));
    }
}
