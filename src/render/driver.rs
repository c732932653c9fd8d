//! Crossterm terminal backend.
//!
//! The `Driver` wraps a buffered stdout writer and implements [`Surface`]:
//! color pairs are emulated on top of the 256-color palette and each glyph
//! is queued as a move/color/print triple, sent on [`Surface::present`].
//!
//! Terminal modes (raw input, alternate screen, mouse capture, hidden
//! cursor) are switched on by [`Driver::enter`] and always switched back:
//! explicitly through [`Driver::restore`], on drop, and from the panic hook
//! installed by [`install_panic_hook`].

use std::io::{self, BufWriter, Stdout, Write};
use std::panic;

use crossterm::{
    cursor,
    event::{DisableMouseCapture, EnableMouseCapture},
    execute, queue,
    style::{Color, Colors, Print, ResetColor, SetColors},
    terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen},
};

use super::color::{rgb_to_ansi256, Rgb};
use super::surface::{ColorPairs, PairId, Surface, DEFAULT_PAIR};
use crate::geometry::Size;

// ---------------------------------------------------------------------------
// Driver
// ---------------------------------------------------------------------------

/// Terminal output backend using crossterm.
///
/// The driver does NOT switch terminal modes on creation; call
/// [`enter`](Self::enter) explicitly.
pub struct Driver {
    writer: BufWriter<Stdout>,
    pairs: ColorPairs,
    size: Size,
    active: bool,
}

impl Driver {
    /// Create a new driver wrapping stdout.
    ///
    /// Falls back to 80x24 when the terminal size cannot be queried.
    pub fn new(max_pairs: PairId) -> io::Result<Self> {
        let (width, height) = Self::terminal_size().unwrap_or((80, 24));
        Ok(Self {
            writer: BufWriter::new(io::stdout()),
            pairs: ColorPairs::new(max_pairs),
            size: Size::new(i32::from(width), i32::from(height)),
            active: false,
        })
    }

    /// Get the terminal size (columns, rows) via crossterm.
    pub fn terminal_size() -> io::Result<(u16, u16)> {
        terminal::size()
    }

    /// Enable raw mode, the alternate screen and mouse capture; hide the cursor.
    pub fn enter(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        self.active = true;
        execute!(
            self.writer,
            EnterAlternateScreen,
            EnableMouseCapture,
            cursor::Hide,
            Clear(ClearType::All)
        )?;
        tracing::debug!(width = self.size.width, height = self.size.height, "terminal entered");
        Ok(())
    }

    /// Undo everything [`enter`](Self::enter) did. Idempotent.
    pub fn restore(&mut self) -> io::Result<()> {
        if !self.active {
            return Ok(());
        }
        self.active = false;
        self.writer.flush()?;
        restore_terminal(&mut self.writer)?;
        tracing::debug!("terminal restored");
        Ok(())
    }

    /// Whether terminal modes are currently switched on.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Record a new terminal size.
    pub fn resize(&mut self, width: u16, height: u16) {
        self.size = Size::new(i32::from(width), i32::from(height));
    }
}

impl Surface for Driver {
    fn size(&self) -> Size {
        self.size
    }

    fn color_pair(&mut self, fg: Rgb, bg: Rgb) -> PairId {
        self.pairs.resolve(fg, bg)
    }

    fn put(&mut self, x: i32, y: i32, ch: char, pair: PairId) -> io::Result<()> {
        if !self.size.contains(x, y) {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("cell ({x}, {y}) outside terminal"),
            ));
        }
        let (fg, bg) = self
            .pairs
            .colors(pair)
            .or_else(|| self.pairs.colors(DEFAULT_PAIR))
            .unwrap_or((Rgb::WHITE, Rgb::BLACK));
        queue!(
            self.writer,
            cursor::MoveTo(x as u16, y as u16),
            SetColors(Colors::new(
                Color::AnsiValue(rgb_to_ansi256(fg)),
                Color::AnsiValue(rgb_to_ansi256(bg)),
            )),
            Print(ch)
        )
    }

    fn present(&mut self) -> io::Result<()> {
        queue!(self.writer, ResetColor)?;
        self.writer.flush()
    }
}

impl Drop for Driver {
    fn drop(&mut self) {
        if let Err(err) = self.restore() {
            tracing::warn!(%err, "failed to restore terminal");
        }
    }
}

/// Switch terminal modes back to normal on `writer`.
pub fn restore_terminal(writer: &mut impl Write) -> io::Result<()> {
    execute!(writer, ResetColor, DisableMouseCapture, cursor::Show, LeaveAlternateScreen)?;
    terminal::disable_raw_mode()
}

/// Chain a panic hook that restores the terminal before the previous hook
/// reports the panic.
pub fn install_panic_hook() {
    let previous = panic::take_hook();
    panic::set_hook(Box::new(move |info| {
        let _ = restore_terminal(&mut io::stdout());
        previous(info);
    }));
}

// ===========================================================================
// Tests
// ===========================================================================
