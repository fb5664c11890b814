//! Region-based selective redraw over a character grid.
//!
//! The surface keeps one persistent cell buffer for the whole screen. `draw` repaints a single
//! region into that buffer and clears its dirty bit; `flush` ships the cells of every region
//! painted since the last flush to the sink and flushes the sink once.

use std::io;

use ratatui::backend::Backend;
use ratatui::buffer::{Buffer, Cell};
use ratatui::layout::{Position, Rect, Size};
use ratatui::text::Line;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(in crate::tui_shell) enum Region {
    Header,
    List,
    Detail,
    Status,
}

impl Region {
    pub(in crate::tui_shell) const ALL: [Region; 4] =
        [Region::Header, Region::List, Region::Detail, Region::Status];

    fn index(self) -> usize {
        match self {
            Region::Header => 0,
            Region::List => 1,
            Region::Detail => 2,
            Region::Status => 3,
        }
    }
}

const HEADER_ROWS: u16 = 2;
const STATUS_ROWS: u16 = 2;
const MIN_LIST_WIDTH: u16 = 24;
const ELLIPSIS: &str = "…";

/// Anything that can show a grid of cells.
pub(in crate::tui_shell) trait GridSink {
    fn size(&self) -> io::Result<Size>;
    fn put<'a>(&mut self, cells: Vec<(u16, u16, &'a Cell)>) -> io::Result<()>;
    fn set_cursor(&mut self, at: Option<Position>) -> io::Result<()>;
    fn flush(&mut self) -> io::Result<()>;
}

/// Adapts a ratatui backend (crossterm in production, `TestBackend` in tests).
pub(in crate::tui_shell) struct BackendSink<B: Backend>(pub(in crate::tui_shell) B);

impl<B: Backend> GridSink for BackendSink<B> {
    fn size(&self) -> io::Result<Size> {
        self.0.size()
    }

    fn put<'a>(&mut self, cells: Vec<(u16, u16, &'a Cell)>) -> io::Result<()> {
        self.0.draw(cells.into_iter())
    }

    fn set_cursor(&mut self, at: Option<Position>) -> io::Result<()> {
        match at {
            Some(pos) => {
                self.0.set_cursor_position(pos)?;
                self.0.show_cursor()
            }
            None => self.0.hide_cursor(),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        Backend::flush(&mut self.0)
    }
}

pub(in crate::tui_shell) struct RenderSurface {
    size: Size,
    overlay: bool,
    areas: [Rect; 4],
    dirty: [bool; 4],
    painted: [bool; 4],
    cursor: Option<Position>,
    buffer: Buffer,
}

impl RenderSurface {
    /// Every region starts dirty so the first pass paints the whole screen.
    pub(in crate::tui_shell) fn new(size: Size) -> Self {
        let mut surface = Self {
            size,
            overlay: false,
            areas: [Rect::default(); 4],
            dirty: [true; 4],
            painted: [false; 4],
            cursor: None,
            buffer: Buffer::empty(Rect::new(0, 0, size.width, size.height)),
        };
        surface.layout();
        surface
    }

    fn layout(&mut self) {
        let Size { width, height } = self.size;
        let header_h = HEADER_ROWS.min(height);
        let status_h = STATUS_ROWS.min(height - header_h);
        let body_h = height - header_h - status_h;
        let body_y = header_h;

        let list_w = if self.overlay {
            0
        } else {
            (width / 3).max(MIN_LIST_WIDTH).min(width / 2)
        };

        self.areas[Region::Header.index()] = Rect::new(0, 0, width, header_h);
        self.areas[Region::List.index()] = Rect::new(0, body_y, list_w, body_h);
        self.areas[Region::Detail.index()] =
            Rect::new(list_w, body_y, width - list_w, body_h);
        self.areas[Region::Status.index()] =
            Rect::new(0, body_y + body_h, width, status_h);
    }

    pub(in crate::tui_shell) fn size(&self) -> Size {
        self.size
    }

    pub(in crate::tui_shell) fn area(&self, region: Region) -> Rect {
        self.areas[region.index()]
    }

    /// New extents always invalidate every region.
    pub(in crate::tui_shell) fn resize(&mut self, size: Size) {
        self.size = size;
        self.buffer = Buffer::empty(Rect::new(0, 0, size.width, size.height));
        self.layout();
        self.mark_all_dirty();
    }

    /// Lets the detail region take the whole body (used by full-screen overlays).
    pub(in crate::tui_shell) fn set_overlay(&mut self, overlay: bool) {
        if self.overlay == overlay {
            return;
        }
        self.overlay = overlay;
        self.layout();
        self.mark_dirty(Region::List);
        self.mark_dirty(Region::Detail);
    }

    pub(in crate::tui_shell) fn overlay(&self) -> bool {
        self.overlay
    }

    pub(in crate::tui_shell) fn mark_dirty(&mut self, region: Region) {
        self.dirty[region.index()] = true;
    }

    pub(in crate::tui_shell) fn mark_all_dirty(&mut self) {
        self.dirty = [true; 4];
    }

    pub(in crate::tui_shell) fn is_dirty(&self, region: Region) -> bool {
        self.dirty[region.index()]
    }

    pub(in crate::tui_shell) fn any_dirty(&self) -> bool {
        self.dirty.iter().any(|d| *d)
    }

    pub(in crate::tui_shell) fn dirty_regions(&self) -> Vec<Region> {
        Region::ALL
            .into_iter()
            .filter(|r| self.is_dirty(*r))
            .collect()
    }

    /// Cursor position to show after the next flush, relative to the screen.
    pub(in crate::tui_shell) fn set_cursor(&mut self, at: Option<Position>) {
        self.cursor = at.filter(|p| p.x < self.size.width && p.y < self.size.height);
    }

    /// Repaints `region` with `lines`, one per row. Rows past the region are dropped and
    /// lines wider than the region end in an ellipsis.
    pub(in crate::tui_shell) fn draw(&mut self, region: Region, lines: Vec<Line<'_>>) {
        let area = self.area(region);
        self.dirty[region.index()] = false;
        self.painted[region.index()] = true;

        for y in area.top()..area.bottom() {
            for x in area.left()..area.right() {
                if let Some(cell) = self.buffer.cell_mut((x, y)) {
                    cell.reset();
                }
            }
        }
        if area.is_empty() {
            return;
        }

        for (row, line) in lines.iter().take(area.height as usize).enumerate() {
            let y = area.y + row as u16;
            self.buffer.set_line(area.x, y, line, area.width);
            if line.width() > area.width as usize
                && let Some(cell) = self.buffer.cell_mut((area.right() - 1, y))
            {
                cell.set_symbol(ELLIPSIS);
            }
        }
    }

    /// Writes every region painted since the last flush, then flushes the sink once.
    /// Returns whether anything was sent.
    pub(in crate::tui_shell) fn flush<S: GridSink>(&mut self, sink: &mut S) -> io::Result<bool> {
        if !self.painted.iter().any(|p| *p) {
            return Ok(false);
        }
        let mut cells = Vec::new();
        for region in Region::ALL {
            if !std::mem::take(&mut self.painted[region.index()]) {
                continue;
            }
            let area = self.area(region);
            for y in area.top()..area.bottom() {
                for x in area.left()..area.right() {
                    if let Some(cell) = self.buffer.cell((x, y)) {
                        cells.push((x, y, cell));
                    }
                }
            }
        }
        sink.put(cells)?;
        sink.set_cursor(self.cursor)?;
        sink.flush()?;
        Ok(true)
    }

    #[cfg(test)]
    pub(in crate::tui_shell) fn row_text(&self, y: u16) -> String {
        (0..self.size.width)
            .filter_map(|x| self.buffer.cell((x, y)).map(|c| c.symbol().to_string()))
            .collect()
    }
}

#[cfg(test)]
#[path = "../tests/tui_shell/surface_tests.rs"]
mod tests;
