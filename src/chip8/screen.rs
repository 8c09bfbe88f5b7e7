//! The monochrome framebuffer with the blit helpers and scroll routines.
use crate::definitions::display;

/// An immutable snapshot of the framebuffer handed out to the host.
///
/// The pixels are a defensive copy, never the live buffer, so a consumer may
/// keep a frame around for as long as it wants without affecting later
/// emulation steps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    width: usize,
    height: usize,
    pixels: Vec<bool>,
}

impl Frame {
    /// The width of the frame in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// The height of the frame in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// The state of a single pixel.
    pub fn get(&self, x: usize, y: usize) -> bool {
        self.pixels[y * self.width + x]
    }

    /// The raw row-major pixels.
    pub fn as_slice(&self) -> &[bool] {
        &self.pixels
    }

    /// The amount of lit pixels.
    pub fn count_set(&self) -> usize {
        self.pixels.iter().filter(|p| **p).count()
    }
}

/// The live framebuffer owned by the chipset.
///
/// The physical buffer is `64x32` for the base chip and `128x64` with the
/// Super-CHIP extension. In the extended low-res mode every logical `64x32`
/// pixel maps onto a `2x2` physical block, so the physical buffer always
/// matches what a Super-CHIP host renders.
#[derive(Debug, Clone)]
pub(crate) struct Screen {
    /// row-major physical pixels
    pixels: Vec<bool>,
    /// physical width
    width: usize,
    /// physical height
    height: usize,
    /// hi-res mode is active (Super-CHIP only)
    extended: bool,
    /// the physical buffer is the large Super-CHIP one
    superchip: bool,
}

impl Screen {
    pub(crate) fn new(superchip: bool) -> Self {
        let (width, height) = if superchip {
            (display::extended::WIDTH, display::extended::HEIGHT)
        } else {
            (display::WIDTH, display::HEIGHT)
        };

        Self {
            pixels: vec![false; width * height],
            width,
            height,
            extended: false,
            superchip,
        }
    }

    /// The side length of the physical block a logical pixel maps to.
    fn scale(&self) -> usize {
        if self.superchip && !self.extended {
            2
        } else {
            1
        }
    }

    /// The drawable width as seen by the running program.
    pub(crate) fn logical_width(&self) -> usize {
        self.width / self.scale()
    }

    /// The drawable height as seen by the running program.
    pub(crate) fn logical_height(&self) -> usize {
        self.height / self.scale()
    }

    pub(crate) fn is_extended(&self) -> bool {
        self.extended
    }

    /// Switches between hi-res and low-res mode, losing the old image.
    pub(crate) fn set_extended(&mut self, on: bool) {
        self.extended = on;
        self.clear();
    }

    pub(crate) fn clear(&mut self) {
        for pixel in self.pixels.iter_mut() {
            *pixel = false;
        }
    }

    /// The state of a logical pixel.
    pub(crate) fn is_set(&self, x: usize, y: usize) -> bool {
        let scale = self.scale();
        self.pixels[y * scale * self.width + x * scale]
    }

    /// XORs a sprite bit into the logical pixel at `(x, y)`.
    ///
    /// Returns whether the pixel was lit before, which is the collision
    /// information the draw opcode folds into the flag register.
    pub(crate) fn flip(&mut self, x: usize, y: usize) -> bool {
        let scale = self.scale();
        let (px, py) = (x * scale, y * scale);
        let was = self.pixels[py * self.width + px];

        for dy in 0..scale {
            for dx in 0..scale {
                self.pixels[(py + dy) * self.width + px + dx] = !was;
            }
        }

        was
    }

    /// Moves all rows down by `rows` physical rows, blanking the top.
    pub(crate) fn scroll_down(&mut self, rows: usize) {
        let rows = rows.min(self.height);
        let keep = (self.height - rows) * self.width;
        self.pixels.copy_within(0..keep, rows * self.width);
        for pixel in self.pixels[..rows * self.width].iter_mut() {
            *pixel = false;
        }
    }

    /// Moves every row right by `amount` physical columns, blanking the
    /// vacated left edge.
    pub(crate) fn scroll_right(&mut self, amount: usize) {
        let amount = amount.min(self.width);
        for y in 0..self.height {
            let row = &mut self.pixels[y * self.width..(y + 1) * self.width];
            row.copy_within(0..self.width - amount, amount);
            for pixel in row[..amount].iter_mut() {
                *pixel = false;
            }
        }
    }

    /// Moves every row left by `amount` physical columns, blanking the
    /// vacated right edge.
    pub(crate) fn scroll_left(&mut self, amount: usize) {
        let amount = amount.min(self.width);
        for y in 0..self.height {
            let row = &mut self.pixels[y * self.width..(y + 1) * self.width];
            row.copy_within(amount.., 0);
            for pixel in row[self.width - amount..].iter_mut() {
                *pixel = false;
            }
        }
    }

    /// Copies the physical buffer out into a frame for the host.
    pub(crate) fn snapshot(&self) -> Frame {
        Frame {
            width: self.width,
            height: self.height,
            pixels: self.pixels.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_resolution() {
        let screen = Screen::new(false);
        assert_eq!(screen.logical_width(), 64);
        assert_eq!(screen.logical_height(), 32);

        let frame = screen.snapshot();
        assert_eq!(frame.width(), 64);
        assert_eq!(frame.height(), 32);
        assert_eq!(frame.count_set(), 0);
    }

    #[test]
    fn test_superchip_resolutions() {
        let mut screen = Screen::new(true);
        // low-res by default, but backed by the large buffer
        assert_eq!(screen.logical_width(), 64);
        assert_eq!(screen.logical_height(), 32);
        assert_eq!(screen.snapshot().width(), 128);

        screen.set_extended(true);
        assert_eq!(screen.logical_width(), 128);
        assert_eq!(screen.logical_height(), 64);
    }

    #[test]
    fn test_flip_round_trip() {
        let mut screen = Screen::new(false);
        assert!(!screen.flip(10, 10));
        assert!(screen.is_set(10, 10));
        // the second flip reports the collision and clears the pixel
        assert!(screen.flip(10, 10));
        assert!(!screen.is_set(10, 10));
    }

    #[test]
    fn test_flip_low_res_block() {
        let mut screen = Screen::new(true);
        screen.flip(3, 2);

        let frame = screen.snapshot();
        // one logical pixel lights a 2x2 physical block
        assert_eq!(frame.count_set(), 4);
        for (x, y) in [(6, 4), (7, 4), (6, 5), (7, 5)] {
            assert!(frame.get(x, y), "({}, {}) should be lit", x, y);
        }
    }

    #[test]
    fn test_mode_switch_clears() {
        let mut screen = Screen::new(true);
        screen.flip(1, 1);
        screen.set_extended(true);
        assert_eq!(screen.snapshot().count_set(), 0);
    }

    #[test]
    fn test_scroll_down() {
        let mut screen = Screen::new(true);
        screen.set_extended(true);
        screen.flip(5, 0);

        screen.scroll_down(3);
        assert!(!screen.is_set(5, 0));
        assert!(screen.is_set(5, 3));
    }

    #[test]
    fn test_scroll_right_left() {
        let mut screen = Screen::new(true);
        screen.set_extended(true);
        screen.flip(10, 7);

        screen.scroll_right(4);
        assert!(!screen.is_set(10, 7));
        assert!(screen.is_set(14, 7));

        screen.scroll_left(4);
        assert!(screen.is_set(10, 7));
        assert!(!screen.is_set(14, 7));
    }

    #[test]
    fn test_scroll_drops_edge_pixels() {
        let mut screen = Screen::new(true);
        screen.set_extended(true);
        screen.flip(127, 0);
        screen.scroll_right(4);
        // fell off the right edge, nothing left behind
        assert_eq!(screen.snapshot().count_set(), 0);
    }
}
