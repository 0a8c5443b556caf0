//! The host-facing half of the text-mode bridge: blits the 80x25 cell
//! grid at 0xB8000 to a `minifb` window and feeds keypresses back into
//! the BIOS keyboard ring. Scoped to reading and rendering what's already
//! in memory; it never retains its own copy of the text buffer between
//! frames; the memory image is the only source of truth.

use minifb::{Key, Window, WindowOptions};
use thiserror::Error;

use crate::bios::Bios;
use crate::font;
use crate::keymap;
use crate::memory::Memory;

const COLS: usize = 80;
const ROWS: usize = 25;
const GLYPH_W: usize = 8;
const GLYPH_H: usize = 16;
const TEXT_BUFFER_ADDR: u32 = 0xB8000;

const CGA_PALETTE: [u32; 16] = [
    0x000000, 0x0000AA, 0x00AA00, 0x00AAAA, 0xAA0000, 0xAA00AA, 0xAA5500, 0xAAAAAA, 0x555555,
    0x5555FF, 0x55FF55, 0x55FFFF, 0xFF5555, 0xFF55FF, 0xFFFF55, 0xFFFFFF,
];

#[derive(Debug, Error)]
pub enum DisplayError {
    #[error("failed to open display window: {0}")]
    Init(String),
    #[error("failed to present frame: {0}")]
    Present(String),
}

pub struct DisplayConfig {
    pub scale: usize,
    pub title: String,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        DisplayConfig {
            scale: 1,
            title: "pcvm".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollResult {
    Continue,
    Quit,
}

pub struct Display {
    window: Window,
    buffer: Vec<u32>,
    scale: usize,
    width: usize,
    height: usize,
}

impl Display {
    pub fn new(config: DisplayConfig) -> Result<Self, DisplayError> {
        let width = COLS * GLYPH_W * config.scale;
        let height = ROWS * GLYPH_H * config.scale;
        let window = Window::new(&config.title, width, height, WindowOptions::default())
            .map_err(|e| DisplayError::Init(e.to_string()))?;
        Ok(Display {
            window,
            buffer: vec![0; width * height],
            scale: config.scale,
            width,
            height,
        })
    }

    pub fn is_open(&self) -> bool {
        self.window.is_open()
    }

    /// Scans the 80x25 text region and blits each cell's glyph, scaled by
    /// the configured integer factor. No framebuffer is persisted between
    /// calls beyond the pixel buffer handed to `minifb` itself.
    pub fn present(&mut self, mem: &Memory) -> Result<(), DisplayError> {
        let cells = mem.raw_ptr(TEXT_BUFFER_ADDR, COLS * ROWS * 2);
        for row in 0..ROWS {
            for col in 0..COLS {
                let idx = (row * COLS + col) * 2;
                let ch = cells[idx];
                let attr = cells[idx + 1];
                self.blit_cell(row, col, ch, attr);
            }
        }
        self.window
            .update_with_buffer(&self.buffer, self.width, self.height)
            .map_err(|e| DisplayError::Present(e.to_string()))
    }

    fn blit_cell(&mut self, row: usize, col: usize, ch: u8, attr: u8) {
        let fg = CGA_PALETTE[(attr & 0x0F) as usize];
        let bg = CGA_PALETTE[((attr >> 4) & 0x0F) as usize];
        let glyph = font::glyph(ch);
        for gy in 0..GLYPH_H {
            let bits = glyph[gy];
            for gx in 0..GLYPH_W {
                let color = if bits & (0x80 >> gx) != 0 { fg } else { bg };
                let px = col * GLYPH_W + gx;
                let py = row * GLYPH_H + gy;
                for sy in 0..self.scale {
                    let y = py * self.scale + sy;
                    let row_start = y * self.width;
                    for sx in 0..self.scale {
                        let x = px * self.scale + sx;
                        self.buffer[row_start + x] = color;
                    }
                }
            }
        }
    }

    /// Checks window-close/Escape for quit, and forwards any pressed keys
    /// into the BIOS keyboard ring along with a snapshot of shift state.
    /// `bios` is borrowed only for the duration of this call; `Display`
    /// never stores a reference to it.
    pub fn poll_input(&mut self, bios: &mut Bios) -> PollResult {
        if !self.window.is_open() || self.window.is_key_down(Key::Escape) {
            return PollResult::Quit;
        }
        let shift = self.window.is_key_down(Key::LeftShift) || self.window.is_key_down(Key::RightShift);
        let ctrl = self.window.is_key_down(Key::LeftCtrl) || self.window.is_key_down(Key::RightCtrl);
        let alt = self.window.is_key_down(Key::LeftAlt) || self.window.is_key_down(Key::RightAlt);
        bios.set_shift_flags(keymap::shift_flags(shift, ctrl, alt));

        for key in self.window.get_keys_pressed(minifb::KeyRepeat::No) {
            if let Some((scancode, ascii)) = keymap::translate(key, shift) {
                bios.inject(scancode, ascii);
            }
        }
        PollResult::Continue
    }
}
