use pretty_assertions::assert_eq;
use ratatui::backend::TestBackend;

use super::*;

#[derive(Default)]
struct RecordingSink {
    size: Size,
    cells_put: usize,
    flushes: usize,
    cursor: Option<Position>,
}

impl GridSink for RecordingSink {
    fn size(&self) -> io::Result<Size> {
        Ok(self.size)
    }

    fn put<'a>(&mut self, cells: Vec<(u16, u16, &'a Cell)>) -> io::Result<()> {
        for (x, y, _) in &cells {
            assert!(*x < self.size.width && *y < self.size.height);
        }
        self.cells_put += cells.len();
        Ok(())
    }

    fn set_cursor(&mut self, at: Option<Position>) -> io::Result<()> {
        self.cursor = at;
        Ok(())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.flushes += 1;
        Ok(())
    }
}

fn sink(width: u16, height: u16) -> RecordingSink {
    RecordingSink {
        size: Size::new(width, height),
        ..RecordingSink::default()
    }
}

#[test]
fn starts_fully_dirty_and_redraw_clears_bits() {
    let mut surface = RenderSurface::new(Size::new(80, 24));
    assert_eq!(surface.dirty_regions(), Region::ALL.to_vec());

    for region in Region::ALL {
        surface.draw(region, vec![Line::from("x")]);
    }
    assert!(!surface.any_dirty());
}

#[test]
fn one_flush_per_pass_regardless_of_region_count() -> io::Result<()> {
    let mut surface = RenderSurface::new(Size::new(80, 24));
    let mut out = sink(80, 24);
    for region in Region::ALL {
        surface.draw(region, vec![Line::from("hello")]);
    }
    assert!(surface.flush(&mut out)?);
    assert_eq!(out.flushes, 1);
    assert_eq!(out.cells_put, 80 * 24);

    // Nothing painted since: no flush at all.
    assert!(!surface.flush(&mut out)?);
    assert_eq!(out.flushes, 1);
    Ok(())
}

#[test]
fn only_painted_regions_are_sent() -> io::Result<()> {
    let mut surface = RenderSurface::new(Size::new(80, 24));
    let mut out = sink(80, 24);
    for region in Region::ALL {
        surface.draw(region, vec![]);
    }
    surface.flush(&mut out)?;

    surface.mark_dirty(Region::Detail);
    assert_eq!(surface.dirty_regions(), vec![Region::Detail]);
    surface.draw(Region::Detail, vec![Line::from("detail")]);
    out.cells_put = 0;
    surface.flush(&mut out)?;

    let detail = surface.area(Region::Detail);
    assert_eq!(out.cells_put, detail.area() as usize);
    assert_eq!(out.flushes, 2);
    Ok(())
}

#[test]
fn overflowing_lines_are_clipped_with_ellipsis() {
    let mut surface = RenderSurface::new(Size::new(40, 10));
    let list = surface.area(Region::List);
    let long = "a".repeat(list.width as usize + 10);
    surface.draw(
        Region::List,
        (0..20).map(|i| Line::from(format!("{} {}", i, long))).collect(),
    );

    let row = surface.row_text(list.y);
    let visible: String = row.chars().take(list.width as usize).collect();
    assert!(visible.ends_with('…'), "{:?}", visible);
    // Detail region untouched by the list's overflow.
    assert_eq!(
        row.chars().nth(list.width as usize),
        Some(' '),
        "{:?}",
        row
    );
}

#[test]
fn resize_recomputes_layout_and_marks_everything() {
    let mut surface = RenderSurface::new(Size::new(80, 24));
    for region in Region::ALL {
        surface.draw(region, vec![]);
    }
    surface.resize(Size::new(120, 40));

    assert_eq!(surface.dirty_regions(), Region::ALL.to_vec());
    let status = surface.area(Region::Status);
    assert_eq!(status.bottom(), 40);
    assert_eq!(
        surface.area(Region::List).width + surface.area(Region::Detail).width,
        120
    );
}

#[test]
fn tiny_terminal_does_not_panic() -> io::Result<()> {
    for (w, h) in [(0, 0), (1, 1), (5, 3), (30, 4)] {
        let mut surface = RenderSurface::new(Size::new(w, h));
        let mut out = sink(w, h);
        for region in Region::ALL {
            surface.draw(region, vec![Line::from("some long enough text"); 5]);
        }
        surface.set_cursor(Some(Position::new(10, 10)));
        surface.flush(&mut out)?;
    }
    Ok(())
}

#[test]
fn overlay_gives_detail_the_whole_body() {
    let mut surface = RenderSurface::new(Size::new(80, 24));
    for region in Region::ALL {
        surface.draw(region, vec![]);
    }
    surface.set_overlay(true);
    assert_eq!(surface.area(Region::List).width, 0);
    assert_eq!(surface.area(Region::Detail).width, 80);
    assert_eq!(surface.dirty_regions(), vec![Region::List, Region::Detail]);
}

#[test]
fn backend_sink_shows_drawn_text() -> io::Result<()> {
    let mut out = BackendSink(TestBackend::new(60, 12));
    let mut surface = RenderSurface::new(out.size()?);
    surface.draw(Region::Header, vec![Line::from("conjecture")]);
    surface.flush(&mut out)?;

    let first_row: String = (0..10)
        .map(|x| out.0.buffer()[(x, 0)].symbol().to_string())
        .collect();
    assert_eq!(first_row, "conjecture");
    Ok(())
}
