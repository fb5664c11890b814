use super::surface::{Region, RenderSurface};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(in crate::tui_shell) enum Pane {
    #[default]
    List,
    Detail,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(in crate::tui_shell) enum Nav {
    FocusLeft,
    FocusRight,
    Up,
    Down,
    PageUp,
    PageDown,
}

/// Content extents the controller measured for the current frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(in crate::tui_shell) struct Bounds {
    pub(in crate::tui_shell) list_len: usize,
    pub(in crate::tui_shell) detail_len: usize,
    pub(in crate::tui_shell) list_page: usize,
    pub(in crate::tui_shell) detail_page: usize,
}

impl Bounds {
    fn max_detail_offset(&self) -> usize {
        self.detail_len.saturating_sub(self.detail_page.max(1))
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(in crate::tui_shell) struct FocusState {
    pub(in crate::tui_shell) pane: Pane,
    pub(in crate::tui_shell) selected_index: usize,
    pub(in crate::tui_shell) list_scroll_offset: usize,
    pub(in crate::tui_shell) detail_scroll_offset: usize,
}

impl FocusState {
    pub(in crate::tui_shell) fn apply(
        &mut self,
        nav: Nav,
        bounds: Bounds,
        surface: &mut RenderSurface,
    ) {
        match (self.pane, nav) {
            (Pane::List, Nav::FocusRight) => {
                self.pane = Pane::Detail;
                mark_focus_change(surface);
            }
            (Pane::Detail, Nav::FocusLeft) => {
                self.pane = Pane::List;
                mark_focus_change(surface);
            }
            (Pane::List, Nav::FocusLeft) | (Pane::Detail, Nav::FocusRight) => {}

            (Pane::List, Nav::Up | Nav::Down) => {
                if bounds.list_len == 0 {
                    return;
                }
                let n = bounds.list_len;
                let cur = self.selected_index.min(n - 1);
                self.selected_index = if nav == Nav::Up {
                    (cur + n - 1) % n
                } else {
                    (cur + 1) % n
                };
                self.after_list_move(bounds, surface);
            }
            (Pane::List, Nav::PageUp | Nav::PageDown) => {
                if bounds.list_len == 0 {
                    return;
                }
                let page = bounds.list_page.max(1);
                let last = bounds.list_len - 1;
                self.selected_index = if nav == Nav::PageUp {
                    self.selected_index.min(last).saturating_sub(page)
                } else {
                    (self.selected_index + page).min(last)
                };
                self.after_list_move(bounds, surface);
            }

            (Pane::Detail, Nav::Up | Nav::Down | Nav::PageUp | Nav::PageDown) => {
                let step = match nav {
                    Nav::PageUp | Nav::PageDown => bounds.detail_page.max(1),
                    _ => 1,
                };
                self.detail_scroll_offset = match nav {
                    Nav::Up | Nav::PageUp => self.detail_scroll_offset.saturating_sub(step),
                    _ => self.detail_scroll_offset + step,
                }
                .min(bounds.max_detail_offset());
                surface.mark_dirty(Region::Detail);
            }
        }
    }

    fn after_list_move(&mut self, bounds: Bounds, surface: &mut RenderSurface) {
        self.detail_scroll_offset = 0;
        self.keep_selection_visible(bounds.list_page);
        surface.mark_dirty(Region::List);
        surface.mark_dirty(Region::Detail);
    }

    fn keep_selection_visible(&mut self, page: usize) {
        let page = page.max(1);
        if self.selected_index < self.list_scroll_offset {
            self.list_scroll_offset = self.selected_index;
        } else if self.selected_index >= self.list_scroll_offset + page {
            self.list_scroll_offset = self.selected_index + 1 - page;
        }
    }

    /// Moves the selection to `index` (jump, new hypothesis) without changing focus.
    pub(in crate::tui_shell) fn select(
        &mut self,
        index: usize,
        bounds: Bounds,
        surface: &mut RenderSurface,
    ) {
        self.selected_index = index.min(bounds.list_len.saturating_sub(1));
        self.after_list_move(bounds, surface);
        surface.mark_dirty(Region::Header);
    }

    /// Back to the initial view: list focus, first entry, no scrolling.
    pub(in crate::tui_shell) fn reset(&mut self, surface: &mut RenderSurface) {
        *self = FocusState::default();
        mark_focus_change(surface);
    }

    /// Re-establishes offsets after the list or the detail content changed size.
    pub(in crate::tui_shell) fn clamp(&mut self, bounds: Bounds) {
        self.selected_index = self
            .selected_index
            .min(bounds.list_len.saturating_sub(1));
        self.list_scroll_offset = self
            .list_scroll_offset
            .min(bounds.list_len.saturating_sub(bounds.list_page.max(1)));
        self.keep_selection_visible(bounds.list_page);
        self.detail_scroll_offset = self.detail_scroll_offset.min(bounds.max_detail_offset());
    }
}

fn mark_focus_change(surface: &mut RenderSurface) {
    surface.mark_dirty(Region::Header);
    surface.mark_dirty(Region::List);
    surface.mark_dirty(Region::Detail);
}

#[cfg(test)]
#[path = "../tests/tui_shell/focus_tests.rs"]
mod tests;
