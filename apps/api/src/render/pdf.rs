//! PDF emitter: writes the page flow's draw instructions with `pdf-writer`.
//!
//! Standard Type1 faces with WinAnsiEncoding, no embedded fonts, no
//! compression and no timestamps, so the text is extractable and the bytes
//! are identical across runs.

use pdf_writer::{Content, Finish, Name, Pdf, Rect, Ref, Str, TextStr};
use tracing::info;

use crate::layout::{layout_resume, DrawOp, FontFace, LaidOutDocument, LayoutWarning, PageLayout};
use crate::models::ResumeData;
use crate::render::winansi;
use crate::theme::ThemeConfig;

const CATALOG_ID: Ref = Ref::new(1);
const PAGE_TREE_ID: Ref = Ref::new(2);
const INFO_ID: Ref = Ref::new(3);
/// Font objects occupy 4..=7, one per face in `FontFace::ALL` order.
const FIRST_FONT_ID: i32 = 4;
const FIRST_PAGE_ID: i32 = FIRST_FONT_ID + FontFace::ALL.len() as i32;

#[derive(Debug, Clone)]
pub struct RenderedPdf {
    pub bytes: Vec<u8>,
    pub page_count: usize,
    pub warnings: Vec<LayoutWarning>,
}

/// Lays out and writes a complete PDF.
pub fn render_pdf(resume: &ResumeData, theme: &ThemeConfig) -> RenderedPdf {
    let doc = layout_resume(resume, theme);
    let bytes = write_pdf(&doc, resume, theme);
    info!(
        pages = doc.page_count(),
        bytes = bytes.len(),
        preset = %theme.preset,
        "pdf rendered"
    );
    RenderedPdf {
        bytes,
        page_count: doc.page_count(),
        warnings: doc.warnings,
    }
}

fn font_id(face: FontFace) -> Ref {
    let index = FontFace::ALL.iter().position(|f| *f == face).unwrap_or(0);
    Ref::new(FIRST_FONT_ID + index as i32)
}

/// Serializes an already laid-out document.
pub fn write_pdf(doc: &LaidOutDocument, resume: &ResumeData, theme: &ThemeConfig) -> Vec<u8> {
    let mut pdf = Pdf::new();
    let (width, height) = (theme.layout.page_width, theme.layout.page_height);

    let page_ids: Vec<Ref> = (0..doc.pages.len())
        .map(|i| Ref::new(FIRST_PAGE_ID + 2 * i as i32))
        .collect();

    pdf.catalog(CATALOG_ID).pages(PAGE_TREE_ID);
    pdf.pages(PAGE_TREE_ID)
        .kids(page_ids.iter().copied())
        .count(page_ids.len() as i32);

    let name = resume.personal_info.name.trim();
    let title = if name.is_empty() {
        "Resume".to_string()
    } else {
        format!("{name} - Resume")
    };
    let subject = if name.is_empty() {
        "Resume".to_string()
    } else {
        format!("Resume of {name}")
    };
    {
        let mut info = pdf.document_info(INFO_ID);
        info.title(TextStr(&title));
        if !name.is_empty() {
            info.author(TextStr(name));
        }
        info.subject(TextStr(&subject));
        info.creator(TextStr(env!("CARGO_PKG_NAME")));
        info.finish();
    }

    for face in FontFace::ALL {
        pdf.type1_font(font_id(face))
            .base_font(Name(face.base_font().as_bytes()))
            .encoding_predefined(Name(b"WinAnsiEncoding"));
    }

    for (i, layout) in doc.pages.iter().enumerate() {
        let page_id = page_ids[i];
        let content_id = Ref::new(page_id.get() + 1);

        let mut page = pdf.page(page_id);
        page.media_box(Rect::new(0.0, 0.0, width, height))
            .parent(PAGE_TREE_ID)
            .contents(content_id);
        {
            let mut resources = page.resources();
            let mut fonts = resources.fonts();
            for face in FontFace::ALL {
                fonts.pair(Name(face.resource_name().as_bytes()), font_id(face));
            }
        }
        page.finish();

        let content = page_content(layout, height);
        pdf.stream(content_id, &content);
    }

    pdf.finish()
}

/// Builds one page's content stream, flipping top-down `y` into PDF space.
fn page_content(layout: &PageLayout, page_height: f32) -> Vec<u8> {
    let mut content = Content::new();
    for op in &layout.ops {
        match op {
            DrawOp::Rect {
                x,
                y,
                width,
                height,
                color,
            } => {
                let (r, g, b) = color.unit();
                content.save_state();
                content.set_fill_rgb(r, g, b);
                content.rect(*x, page_height - y - height, *width, *height);
                content.fill_nonzero();
                content.restore_state();
            }
            DrawOp::Rule {
                x1,
                x2,
                y,
                thickness,
                color,
            } => {
                let (r, g, b) = color.unit();
                let pdf_y = page_height - y;
                content.save_state();
                content.set_stroke_rgb(r, g, b);
                content.set_line_width(*thickness);
                content.move_to(*x1, pdf_y);
                content.line_to(*x2, pdf_y);
                content.stroke();
                content.restore_state();
            }
            DrawOp::Text {
                x,
                baseline,
                text,
                face,
                size,
                color,
            } => {
                let (r, g, b) = color.unit();
                let encoded = winansi::encode(text);
                content.set_fill_rgb(r, g, b);
                content.begin_text();
                content.set_font(Name(face.resource_name().as_bytes()), *size);
                content.set_text_matrix([1.0, 0.0, 0.0, 1.0, *x, page_height - baseline]);
                content.show(Str(&encoded));
                content.end_text();
            }
        }
    }
    content.finish()
}
