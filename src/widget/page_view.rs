//! Paints the drawing surface into the terminal with half blocks.
//!
//! Each cell shows two logical pixels stacked vertically: the upper one as
//! the foreground of `▀`, the lower one as the background.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Color,
    widgets::Widget,
};

use crate::surface::Surface;

const UPPER_HALF_BLOCK: &str = "\u{2580}";

pub struct PageView<'a> {
    surface: &'a Surface,
    scroll: u16,
}

impl<'a> PageView<'a> {
    pub fn new(surface: &'a Surface) -> Self {
        Self { surface, scroll: 0 }
    }

    /// Skip this many rows from the top of the page
    pub fn scroll(mut self, rows: u16) -> Self {
        self.scroll = rows;
        self
    }

    /// Terminal rows the whole page needs
    pub fn rows_needed(surface: &Surface) -> u16 {
        surface
            .logical_dimensions()
            .map(|(_, h)| u16::try_from(h.div_ceil(2)).unwrap_or(u16::MAX))
            .unwrap_or(0)
    }

    /// Largest useful scroll offset for a viewport of `height` rows
    pub fn max_scroll(surface: &Surface, height: u16) -> u16 {
        Self::rows_needed(surface).saturating_sub(height)
    }
}

impl Widget for PageView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let Some((width, _)) = self.surface.logical_dimensions() else {
            return;
        };

        let width = u16::try_from(width).unwrap_or(u16::MAX).min(area.width);
        let x_offset = (area.width - width) / 2;

        for row in 0..area.height {
            let top_y = (u32::from(self.scroll) + u32::from(row)) * 2;
            for column in 0..width {
                let Some(top) = self.surface.sample(u32::from(column), top_y) else {
                    continue;
                };
                let bottom = self.surface.sample(u32::from(column), top_y + 1);

                let position = (area.x + x_offset + column, area.y + row);
                if let Some(cell) = buf.cell_mut(position) {
                    cell.set_symbol(UPPER_HALF_BLOCK)
                        .set_fg(Color::Rgb(top[0], top[1], top[2]));
                    match bottom {
                        Some(bottom) => cell.set_bg(Color::Rgb(bottom[0], bottom[1], bottom[2])),
                        None => cell.set_bg(Color::Reset),
                    };
                }
            }
        }
    }
}
