use pretty_assertions::assert_eq;
use ratatui::layout::Size;

use super::*;

fn clean_surface() -> RenderSurface {
    let mut surface = RenderSurface::new(Size::new(80, 24));
    for region in Region::ALL {
        surface.draw(region, vec![]);
    }
    surface
}

fn bounds() -> Bounds {
    Bounds {
        list_len: 5,
        detail_len: 40,
        list_page: 3,
        detail_page: 10,
    }
}

#[test]
fn focus_switch_marks_header_list_detail() {
    let mut surface = clean_surface();
    let mut focus = FocusState::default();

    focus.apply(Nav::FocusRight, bounds(), &mut surface);
    assert_eq!(focus.pane, Pane::Detail);
    assert_eq!(
        surface.dirty_regions(),
        vec![Region::Header, Region::List, Region::Detail]
    );

    let mut surface = clean_surface();
    focus.apply(Nav::FocusLeft, bounds(), &mut surface);
    assert_eq!(focus.pane, Pane::List);
    assert_eq!(
        surface.dirty_regions(),
        vec![Region::Header, Region::List, Region::Detail]
    );
}

#[test]
fn redundant_focus_move_is_silent() {
    let mut surface = clean_surface();
    let mut focus = FocusState::default();
    focus.apply(Nav::FocusLeft, bounds(), &mut surface);
    assert_eq!(focus, FocusState::default());
    assert!(!surface.any_dirty());
}

#[test]
fn list_moves_wrap_and_reset_detail_scroll() {
    let mut surface = clean_surface();
    let mut focus = FocusState {
        detail_scroll_offset: 7,
        ..FocusState::default()
    };

    focus.apply(Nav::Up, bounds(), &mut surface);
    assert_eq!(focus.selected_index, 4);
    assert_eq!(focus.detail_scroll_offset, 0);
    assert_eq!(focus.list_scroll_offset, 2);
    assert_eq!(surface.dirty_regions(), vec![Region::List, Region::Detail]);

    focus.apply(Nav::Down, bounds(), &mut surface);
    assert_eq!(focus.selected_index, 0);
    assert_eq!(focus.list_scroll_offset, 0);
}

#[test]
fn detail_moves_clamp_and_keep_selection() {
    let mut surface = clean_surface();
    let mut focus = FocusState {
        pane: Pane::Detail,
        selected_index: 2,
        ..FocusState::default()
    };

    focus.apply(Nav::Up, bounds(), &mut surface);
    assert_eq!(focus.detail_scroll_offset, 0);
    for _ in 0..100 {
        focus.apply(Nav::Down, bounds(), &mut surface);
    }
    assert_eq!(focus.detail_scroll_offset, 30);
    assert_eq!(focus.selected_index, 2);
    assert_eq!(surface.dirty_regions(), vec![Region::Detail]);
}

#[test]
fn paging_scrolls_the_focused_pane() {
    let mut surface = clean_surface();
    let mut focus = FocusState::default();

    focus.apply(Nav::PageDown, bounds(), &mut surface);
    assert_eq!(focus.selected_index, 3);
    focus.apply(Nav::PageDown, bounds(), &mut surface);
    assert_eq!(focus.selected_index, 4);
    focus.apply(Nav::PageUp, bounds(), &mut surface);
    assert_eq!(focus.selected_index, 1);

    focus.apply(Nav::FocusRight, bounds(), &mut surface);
    focus.apply(Nav::PageDown, bounds(), &mut surface);
    focus.apply(Nav::PageDown, bounds(), &mut surface);
    assert_eq!(focus.detail_scroll_offset, 20);
    focus.apply(Nav::PageDown, bounds(), &mut surface);
    focus.apply(Nav::PageDown, bounds(), &mut surface);
    assert_eq!(focus.detail_scroll_offset, 30);
    assert_eq!(focus.selected_index, 1);
}

#[test]
fn empty_list_ignores_navigation() {
    let mut surface = clean_surface();
    let mut focus = FocusState::default();
    let empty = Bounds::default();
    focus.apply(Nav::Down, empty, &mut surface);
    focus.apply(Nav::PageDown, empty, &mut surface);
    assert_eq!(focus, FocusState::default());
    assert!(!surface.any_dirty());
}

#[test]
fn clamp_follows_shrinking_content() {
    let mut focus = FocusState {
        pane: Pane::Detail,
        selected_index: 9,
        list_scroll_offset: 8,
        detail_scroll_offset: 35,
    };
    focus.clamp(Bounds {
        list_len: 3,
        detail_len: 12,
        list_page: 3,
        detail_page: 10,
    });
    assert_eq!(focus.selected_index, 2);
    assert_eq!(focus.list_scroll_offset, 0);
    assert_eq!(focus.detail_scroll_offset, 2);
    assert_eq!(focus.pane, Pane::Detail);
}
