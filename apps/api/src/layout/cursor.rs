//! Page cursor: the vertical position on the current page and the
//! page-break decision.
//!
//! Coordinates are top-down: `y = 0` is the top edge of the page.

use serde::Serialize;

use crate::theme::ThemeConfig;

/// Tolerance for float accumulation when comparing against the bottom limit.
const FIT_EPSILON: f32 = 1e-3;

/// Where the flow engine is in a render.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum FlowState {
    /// Nothing placed yet on `page`.
    AtTop { page: usize },
    /// At least one block placed on `page`; the next goes at `cursor_y`.
    InSection { page: usize, cursor_y: f32 },
    /// The pending block does not fit on `page`; a new page must start.
    NeedsBreak { page: usize },
    /// Document finalized.
    Done { pages: usize },
}

/// Outcome of asking the cursor for room.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reservation {
    /// Place the block at the current position.
    Fits,
    /// Start a new page first, then place the block at its top.
    Break,
    /// The block is taller than the remaining space on an empty page.
    /// It is placed anyway and will overflow the bottom margin.
    Oversized,
}

#[derive(Debug, Clone)]
pub struct PageCursor {
    state: FlowState,
    page: usize,
    y: f32,
    page_height: f32,
    top_margin: f32,
    bottom_margin: f32,
}

impl PageCursor {
    pub fn new(theme: &ThemeConfig) -> Self {
        Self::with_geometry(
            theme.layout.page_height,
            theme.spacing.page_margin.top,
            theme.spacing.page_margin.bottom,
        )
    }

    pub fn with_geometry(page_height: f32, top_margin: f32, bottom_margin: f32) -> Self {
        Self {
            state: FlowState::AtTop { page: 0 },
            page: 0,
            y: top_margin,
            page_height,
            top_margin,
            bottom_margin,
        }
    }

    pub fn state(&self) -> FlowState {
        self.state
    }

    /// Zero-based index of the current page.
    pub fn page(&self) -> usize {
        self.page
    }

    pub fn y(&self) -> f32 {
        self.y
    }

    /// Lowest `y` any block may reach.
    pub fn bottom_limit(&self) -> f32 {
        self.page_height - self.bottom_margin
    }

    pub fn usable_height(&self) -> f32 {
        self.bottom_limit() - self.top_margin
    }

    pub fn remaining(&self) -> f32 {
        (self.bottom_limit() - self.y).max(0.0)
    }

    pub fn at_top(&self) -> bool {
        matches!(self.state, FlowState::AtTop { .. })
    }

    pub fn fits(&self, height: f32) -> bool {
        self.y + height <= self.bottom_limit() + FIT_EPSILON
    }

    /// Decides whether a block of `height` can be placed here.
    ///
    /// Breaks only when `y + height` would cross the bottom limit and the page
    /// already holds something; an empty page always accepts the block.
    pub fn reserve(&mut self, height: f32) -> Reservation {
        if self.fits(height) {
            Reservation::Fits
        } else if self.at_top() {
            Reservation::Oversized
        } else {
            self.state = FlowState::NeedsBreak { page: self.page };
            Reservation::Break
        }
    }

    /// Starts the next page with the cursor at the top margin.
    pub fn break_page(&mut self) {
        self.page += 1;
        self.y = self.top_margin;
        self.state = FlowState::AtTop { page: self.page };
    }

    /// Moves the cursor down after placing a block.
    pub fn advance(&mut self, height: f32) {
        self.y += height;
        self.state = FlowState::InSection {
            page: self.page,
            cursor_y: self.y,
        };
    }

    /// Moves the cursor down for spacing. Spacing at the top of a page is
    /// dropped, and spacing never pushes the cursor past the bottom limit.
    pub fn gap(&mut self, height: f32) {
        if !self.at_top() {
            let h = height.min(self.remaining());
            self.advance(h);
        }
    }

    /// Finalizes the render and returns the page count.
    pub fn finish(&mut self) -> usize {
        let pages = self.page + 1;
        self.state = FlowState::Done { pages };
        pages
    }
}
