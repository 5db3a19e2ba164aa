//! Page Flow Engine.
//!
//! Turns a resume plus a resolved theme into pages of positioned drawing
//! instructions. Every block's height is computed before it is placed; the
//! cursor decides whether it fits, and a new page is started exactly when it
//! would cross the bottom margin.
//!
//! Output coordinates are top-down points (`y = 0` at the top edge); backends
//! convert to their own space.

use serde::Serialize;
use tracing::{debug, warn};

use crate::layout::cursor::{PageCursor, Reservation};
use crate::layout::font_metrics::FontFace;
use crate::layout::sections::{walk_sections, EntryHeading, SectionKind, SectionSink};
use crate::layout::wrap::wrap;
use crate::models::ResumeData;
use crate::theme::{Align, Rgb, ThemeConfig};

/// Baseline position inside a line box, as a fraction of the font size.
const BASELINE_RATIO: f32 = 0.88;
/// Minimum horizontal space between a job title and its right-aligned dates.
const DATE_GUTTER: f32 = 12.0;
const CONTACT_SEPARATOR: &str = "  |  ";
const CONTINUED_BOTTOM: &str = "Continued...";
const CONTINUED_TOP: &str = "(Continued)";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum DrawOp {
    Text {
        x: f32,
        baseline: f32,
        text: String,
        face: FontFace,
        size: f32,
        color: Rgb,
    },
    Rule {
        x1: f32,
        x2: f32,
        y: f32,
        thickness: f32,
        color: Rgb,
    },
    /// Filled rectangle; `y` is its top edge.
    Rect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        color: Rgb,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageLayout {
    pub ops: Vec<DrawOp>,
    /// Cursor position when the page was closed.
    pub cursor_end: f32,
}

/// Non-fatal layout problems. Rendering always completes.
#[derive(Debug, Clone, PartialEq, Serialize, thiserror::Error)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum LayoutWarning {
    #[error("block of {height:.1}pt on page {page} exceeds the {available:.1}pt available")]
    OversizedBlock {
        page: usize,
        height: f32,
        available: f32,
    },
    #[error("document runs to {pages} pages, theme allows {max_pages}")]
    ExceedsMaxPages { pages: usize, max_pages: usize },
}

impl LayoutWarning {
    pub fn kind(&self) -> &'static str {
        "LAYOUT_OVERFLOW"
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LaidOutDocument {
    pub pages: Vec<PageLayout>,
    pub sections: Vec<SectionKind>,
    pub warnings: Vec<LayoutWarning>,
}

impl LaidOutDocument {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }
}

/// Lays out `resume` with `theme`. Pure: identical inputs give identical
/// output.
pub fn layout_resume(resume: &ResumeData, theme: &ThemeConfig) -> LaidOutDocument {
    let mut flow = PageFlow::new(theme);
    let sections = walk_sections(resume, theme, &mut flow);
    let mut doc = flow.finish();
    doc.sections = sections;
    debug!(
        pages = doc.page_count(),
        warnings = doc.warnings.len(),
        preset = %theme.preset,
        "layout complete"
    );
    doc
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LastBlock {
    Nothing,
    Header,
    Heading,
    Paragraph,
    Bullet,
    Separator,
}

/// The pagination state machine, driven through `SectionSink`.
pub struct PageFlow<'a> {
    theme: &'a ThemeConfig,
    cursor: PageCursor,
    pages: Vec<PageLayout>,
    warnings: Vec<LayoutWarning>,
    sections_begun: usize,
    entries_in_section: usize,
    last: LastBlock,
}

impl<'a> PageFlow<'a> {
    pub fn new(theme: &'a ThemeConfig) -> Self {
        Self {
            theme,
            cursor: PageCursor::new(theme),
            pages: vec![PageLayout::default()],
            warnings: Vec::new(),
            sections_begun: 0,
            entries_in_section: 0,
            last: LastBlock::Nothing,
        }
    }

    pub fn finish(mut self) -> LaidOutDocument {
        let y = self.cursor.y();
        if let Some(page) = self.pages.last_mut() {
            page.cursor_end = y;
        }
        let pages = self.cursor.finish();
        let max_pages = self.theme.layout.max_pages;
        if pages > max_pages {
            warn!(pages, max_pages, "layout exceeds the theme's page limit");
            self.warnings
                .push(LayoutWarning::ExceedsMaxPages { pages, max_pages });
        }
        LaidOutDocument {
            pages: self.pages,
            sections: Vec::new(),
            warnings: self.warnings,
        }
    }

    // ── geometry ────────────────────────────────────────────────────────────

    fn left(&self) -> f32 {
        self.theme.spacing.page_margin.left
    }

    fn right(&self) -> f32 {
        self.theme.layout.page_width - self.theme.spacing.page_margin.right
    }

    fn width(&self) -> f32 {
        self.theme.content_width()
    }

    fn adv(&self, size: f32) -> f32 {
        self.theme.line_advance(size)
    }

    fn regular(&self) -> FontFace {
        self.theme.typography.family.regular()
    }

    fn face(&self, bold: bool) -> FontFace {
        self.theme.typography.family.face(bold)
    }

    fn lines(&self, text: &str, face: FontFace, size: f32, max_width: f32) -> Vec<String> {
        wrap(text, |s| face.text_width(s, size), max_width)
    }

    // ── placement ───────────────────────────────────────────────────────────

    /// Makes room for a block of `height`, breaking the page if needed.
    fn ensure(&mut self, height: f32) {
        match self.cursor.reserve(height) {
            Reservation::Fits => {}
            Reservation::Break => {
                self.new_page();
                if !self.cursor.fits(height) {
                    self.oversized(height);
                }
            }
            Reservation::Oversized => self.oversized(height),
        }
    }

    fn oversized(&mut self, height: f32) {
        let page = self.cursor.page() + 1;
        let available = self.cursor.remaining();
        warn!(
            kind = "LAYOUT_OVERFLOW",
            page,
            height,
            available,
            usable = self.cursor.usable_height(),
            "block taller than the page; placing anyway"
        );
        self.warnings.push(LayoutWarning::OversizedBlock {
            page,
            height,
            available,
        });
    }

    fn new_page(&mut self) {
        let markers = self.theme.elements.continuation_markers;
        let small = self.theme.typography.sizes.small;
        let muted = self.theme.colors.muted;
        let regular = self.regular();

        if markers {
            // Sits in the bottom margin, outside the flow.
            let x = self.right() - regular.text_width(CONTINUED_BOTTOM, small);
            let y = self.cursor.bottom_limit() + small * 0.5;
            self.text(x, y, CONTINUED_BOTTOM, regular, small, muted);
        }
        let y = self.cursor.y();
        if let Some(page) = self.pages.last_mut() {
            page.cursor_end = y;
        }

        self.cursor.break_page();
        self.pages.push(PageLayout::default());
        debug!(page = self.cursor.page() + 1, state = ?self.cursor.state(), "page break");

        if markers {
            let y = self.cursor.y();
            let left = self.left();
            self.text(left, y, CONTINUED_TOP, regular, small, muted);
            let h = self.adv(small);
            self.cursor.advance(h);
        }
    }

    fn push(&mut self, op: DrawOp) {
        if let Some(page) = self.pages.last_mut() {
            page.ops.push(op);
        }
    }

    /// Draws one line of text whose line box starts at `y_top`.
    fn text(&mut self, x: f32, y_top: f32, text: &str, face: FontFace, size: f32, color: Rgb) {
        if text.is_empty() {
            return;
        }
        self.push(DrawOp::Text {
            x,
            baseline: y_top + size * BASELINE_RATIO,
            text: text.to_string(),
            face,
            size,
            color,
        });
    }

    fn aligned_x(&self, text: &str, face: FontFace, size: f32, inset_left: f32, inset_right: f32) -> f32 {
        match self.theme.layout.header_align {
            Align::Left => self.left() + inset_left,
            Align::Center => {
                let inner = self.width() - inset_left - inset_right;
                self.left() + inset_left + ((inner - face.text_width(text, size)) / 2.0).max(0.0)
            }
        }
    }
}

impl SectionSink for PageFlow<'_> {
    fn name_block(&mut self, name: &str, contact: &[&str]) {
        let t = self.theme;
        let card = &t.elements.name_card;
        let (pad_top, pad_bottom, pad_left, pad_right) = if card.enabled {
            (card.padding.top, card.padding.bottom, card.padding.left, card.padding.right)
        } else {
            (0.0, 0.0, 0.0, 0.0)
        };
        let inner_width = self.width() - pad_left - pad_right;

        let name_size = t.typography.sizes.name;
        let name_face = self.face(t.typography.name_bold);
        let contact_size = t.typography.sizes.contact;
        let contact_face = self.regular();

        let name_lines = self.lines(name, name_face, name_size, inner_width);
        let contact_line = contact.join(CONTACT_SEPARATOR);
        let contact_lines = self.lines(&contact_line, contact_face, contact_size, inner_width);
        if name_lines.is_empty() && contact_lines.is_empty() {
            return;
        }

        let name_h = name_lines.len() as f32 * self.adv(name_size);
        let contact_h = contact_lines.len() as f32 * self.adv(contact_size);
        let gap = if name_lines.is_empty() || contact_lines.is_empty() {
            0.0
        } else {
            t.spacing.name_gap
        };
        let block_h = pad_top + name_h + gap + contact_h + pad_bottom;
        self.ensure(block_h);

        let top = self.cursor.y();
        if card.enabled {
            let x = self.left();
            let width = self.width();
            self.push(DrawOp::Rect {
                x,
                y: top,
                width,
                height: block_h,
                color: card.background,
            });
        }

        let mut y = top + pad_top;
        for line in &name_lines {
            let x = self.aligned_x(line, name_face, name_size, pad_left, pad_right);
            self.text(x, y, line, name_face, name_size, t.colors.primary);
            y += self.adv(name_size);
        }
        y += gap;
        for line in &contact_lines {
            let x = self.aligned_x(line, contact_face, contact_size, pad_left, pad_right);
            self.text(x, y, line, contact_face, contact_size, t.colors.secondary);
            y += self.adv(contact_size);
        }

        self.cursor.advance(block_h);
        self.last = LastBlock::Nothing;
    }

    fn begin_section(&mut self, kind: SectionKind, title: &str) {
        let t = self.theme;
        if self.sections_begun > 0 || self.last != LastBlock::Nothing || !self.cursor.at_top() {
            self.cursor.gap(t.spacing.section_gap);
        }
        self.sections_begun += 1;
        self.entries_in_section = 0;

        let size = t.typography.sizes.section_header;
        let header_h = t.section_header_height();
        // Keep the header with at least one line of its content.
        self.ensure(header_h + self.adv(t.typography.sizes.body));

        let top = self.cursor.y();
        let face = self.face(t.typography.header_bold);
        let left = self.left();
        self.text(left, top + t.spacing.section_header_above, title, face, size, t.sections.header.color);

        let underline = &t.sections.header.underline;
        if underline.enabled {
            let y = top + t.spacing.section_header_above + self.adv(size) + underline.offset;
            let (x1, x2) = (self.left(), self.right());
            self.push(DrawOp::Rule {
                x1,
                x2,
                y,
                thickness: underline.thickness,
                color: underline.color,
            });
        }

        self.cursor.advance(header_h);
        self.last = LastBlock::Header;
        debug!(section = ?kind, page = self.cursor.page() + 1, "section header placed");
    }

    fn paragraph(&mut self, text: &str) {
        let t = self.theme;
        if matches!(self.last, LastBlock::Paragraph | LastBlock::Bullet) {
            self.cursor.gap(t.spacing.paragraph_gap);
        }
        let size = t.typography.sizes.body;
        let face = self.regular();
        let h = self.adv(size);
        for line in self.lines(text, face, size, self.width()) {
            self.ensure(h);
            let (x, y) = (self.left(), self.cursor.y());
            self.text(x, y, &line, face, size, t.colors.text);
            self.cursor.advance(h);
        }
        self.last = LastBlock::Paragraph;
    }

    fn entry_heading(&mut self, heading: &EntryHeading) {
        let t = self.theme;
        if self.entries_in_section > 0 && self.last != LastBlock::Separator {
            self.cursor.gap(t.spacing.entry_gap);
        }
        self.entries_in_section += 1;

        let title_size = t.typography.sizes.job_title;
        let title_face = self.face(t.typography.title_bold);
        let body_size = t.typography.sizes.body;
        let regular = self.regular();

        let date_width = if heading.dates.is_empty() {
            0.0
        } else {
            regular.text_width(&heading.dates, title_size) + DATE_GUTTER
        };
        let title_width = (self.width() - date_width).max(self.width() * 0.5);
        let mut title_lines = self.lines(&heading.title, title_face, title_size, title_width);
        if title_lines.is_empty() && !heading.dates.is_empty() {
            title_lines.push(String::new());
        }
        let subtitle_lines = self.lines(&heading.subtitle, regular, body_size, self.width());

        let title_adv = self.adv(title_size);
        let body_adv = self.adv(body_size);
        let heading_h =
            title_lines.len() as f32 * title_adv + subtitle_lines.len() as f32 * body_adv;
        let keep_h = if heading.has_bullets {
            heading_h + body_adv
        } else {
            heading_h
        };
        self.ensure(keep_h);

        let left = self.left();
        let mut y = self.cursor.y();
        for (i, line) in title_lines.iter().enumerate() {
            self.text(left, y, line, title_face, title_size, t.colors.text);
            if i == 0 && !heading.dates.is_empty() {
                let x = self.right() - regular.text_width(&heading.dates, title_size);
                self.text(x, y, &heading.dates, regular, title_size, t.colors.secondary);
            }
            y += title_adv;
        }
        for line in &subtitle_lines {
            self.text(left, y, line, regular, body_size, t.colors.secondary);
            y += body_adv;
        }
        self.cursor.advance(heading_h);
        self.last = LastBlock::Heading;
    }

    fn bullet(&mut self, text: &str) {
        let t = self.theme;
        if self.last == LastBlock::Bullet {
            self.cursor.gap(t.spacing.bullet_gap);
        }
        let style = &t.elements.bullet;
        let size = t.typography.sizes.body;
        let face = self.regular();
        let h = self.adv(size);
        let lines = self.lines(text, face, size, self.width() - style.indent);

        for (i, line) in lines.iter().enumerate() {
            self.ensure(h);
            let y = self.cursor.y();
            if i == 0 {
                let x = self.left() + style.symbol_offset;
                self.text(x, y, &style.symbol, face, size, style.color);
            }
            // Continuation lines hang at the same indent as the first.
            let x = self.left() + style.indent;
            self.text(x, y, line, face, size, t.colors.text);
            self.cursor.advance(h);
        }
        self.last = LastBlock::Bullet;
    }

    fn entry_separator(&mut self) {
        let t = self.theme;
        if !t.elements.job_separator {
            return;
        }
        let gap = t.spacing.entry_gap;
        // A separator is never carried onto a fresh page.
        if self.cursor.at_top() || !self.cursor.fits(gap) {
            return;
        }
        let y = self.cursor.y() + gap / 2.0;
        let (x1, x2) = (self.left(), self.right());
        self.push(DrawOp::Rule {
            x1,
            x2,
            y,
            thickness: 0.5,
            color: t.colors.rule,
        });
        self.cursor.advance(gap);
        self.last = LastBlock::Separator;
    }
}
