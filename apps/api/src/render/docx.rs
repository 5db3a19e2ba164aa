//! DOCX emitter.
//!
//! Word paginates on its own, so this backend does not run the page flow. It
//! drives the same section walk and maps each block onto a named paragraph
//! style derived from the theme: Name, Contact, SectionHeader, JobTitle,
//! Company, Bullet, Body.

use std::io::{Cursor, Write};

use quick_xml::escape::escape;
use tracing::info;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::layout::{walk_sections, EntryHeading, SectionKind, SectionSink};
use crate::models::ResumeData;
use crate::render::RenderError;
use crate::theme::{Align, ThemeConfig};

const XML_DECL: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;
const W_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";

const CONTENT_TYPES: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
    r#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">"#,
    r#"<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>"#,
    r#"<Default Extension="xml" ContentType="application/xml"/>"#,
    r#"<Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/>"#,
    r#"<Override PartName="/word/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml"/>"#,
    r#"<Override PartName="/docProps/core.xml" ContentType="application/vnd.openxmlformats-package.core-properties+xml"/>"#,
    r#"</Types>"#
);

const PACKAGE_RELS: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
    r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
    r#"<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/>"#,
    r#"<Relationship Id="rId2" Type="http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties" Target="docProps/core.xml"/>"#,
    r#"</Relationships>"#
);

const DOCUMENT_RELS: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
    r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
    r#"<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/>"#,
    r#"</Relationships>"#
);

/// Points to twentieths of a point.
fn twips(pt: f32) -> i64 {
    (pt * 20.0).round() as i64
}

/// Points to half-points (run font size unit).
fn half_points(pt: f32) -> i64 {
    (pt * 2.0).round() as i64
}

/// Renders the resume to DOCX bytes.
pub fn render_docx(resume: &ResumeData, theme: &ThemeConfig) -> Result<Vec<u8>, RenderError> {
    let mut body = DocxBody::new(theme);
    let sections = walk_sections(resume, theme, &mut body);

    let document = document_xml(&body.xml, theme);
    let styles = styles_xml(theme);
    let core = core_xml(resume.personal_info.name.trim());

    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    // Fixed timestamp keeps the archive byte-identical across runs.
    let options = FileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .last_modified_time(zip::DateTime::default());

    let parts: [(&str, &str); 6] = [
        ("[Content_Types].xml", CONTENT_TYPES),
        ("_rels/.rels", PACKAGE_RELS),
        ("word/document.xml", &document),
        ("word/styles.xml", &styles),
        ("word/_rels/document.xml.rels", DOCUMENT_RELS),
        ("docProps/core.xml", &core),
    ];
    for (name, content) in parts {
        zip.start_file(name, options)?;
        zip.write_all(content.as_bytes())?;
    }
    let bytes = zip.finish()?.into_inner();

    info!(
        sections = sections.len(),
        bytes = bytes.len(),
        preset = %theme.preset,
        "docx rendered"
    );
    Ok(bytes)
}

/// Accumulates `<w:p>` elements for the document body.
struct DocxBody<'a> {
    theme: &'a ThemeConfig,
    xml: String,
}

impl<'a> DocxBody<'a> {
    fn new(theme: &'a ThemeConfig) -> Self {
        Self {
            theme,
            xml: String::new(),
        }
    }

    fn push_paragraph(&mut self, style: &str, runs: &str) {
        self.xml.push_str(&format!(
            r#"<w:p><w:pPr><w:pStyle w:val="{style}"/></w:pPr>{runs}</w:p>"#
        ));
    }
}

fn run(text: &str) -> String {
    format!(r#"<w:r><w:t xml:space="preserve">{}</w:t></w:r>"#, escape(text))
}

fn plain_run(text: &str) -> String {
    format!(
        r#"<w:r><w:rPr><w:b w:val="0"/></w:rPr><w:t xml:space="preserve">{}</w:t></w:r>"#,
        escape(text)
    )
}

impl SectionSink for DocxBody<'_> {
    fn name_block(&mut self, name: &str, contact: &[&str]) {
        if !name.is_empty() {
            self.push_paragraph("Name", &run(name));
        }
        if !contact.is_empty() {
            self.push_paragraph("Contact", &run(&contact.join("  |  ")));
        }
    }

    fn begin_section(&mut self, _kind: SectionKind, title: &str) {
        self.push_paragraph("SectionHeader", &run(title));
    }

    fn paragraph(&mut self, text: &str) {
        self.push_paragraph("Body", &run(text));
    }

    fn entry_heading(&mut self, heading: &EntryHeading) {
        let mut runs = run(&heading.title);
        if !heading.dates.is_empty() {
            runs.push_str("<w:r><w:tab/></w:r>");
            runs.push_str(&plain_run(&heading.dates));
        }
        self.push_paragraph("JobTitle", &runs);
        if !heading.subtitle.is_empty() {
            self.push_paragraph("Company", &run(&heading.subtitle));
        }
    }

    fn bullet(&mut self, text: &str) {
        let symbol = &self.theme.elements.bullet.symbol;
        let runs = format!("{}<w:r><w:tab/></w:r>{}", run(symbol), run(text));
        self.push_paragraph("Bullet", &runs);
    }

    fn entry_separator(&mut self) {
        if !self.theme.elements.job_separator {
            return;
        }
        let color = self.theme.colors.rule.hex();
        self.xml.push_str(&format!(
            r#"<w:p><w:pPr><w:pStyle w:val="Body"/><w:pBdr><w:bottom w:val="single" w:sz="4" w:space="1" w:color="{color}"/></w:pBdr><w:spacing w:before="0" w:after="{}"/></w:pPr></w:p>"#,
            twips(self.theme.spacing.entry_gap / 2.0)
        ));
    }
}

fn document_xml(body: &str, theme: &ThemeConfig) -> String {
    let m = &theme.spacing.page_margin;
    format!(
        concat!(
            "{decl}",
            r#"<w:document xmlns:w="{ns}"><w:body>{body}"#,
            r#"<w:sectPr><w:pgSz w:w="{w}" w:h="{h}"/>"#,
            r#"<w:pgMar w:top="{top}" w:right="{right}" w:bottom="{bottom}" w:left="{left}" w:header="0" w:footer="0" w:gutter="0"/>"#,
            r#"</w:sectPr></w:body></w:document>"#
        ),
        decl = XML_DECL,
        ns = W_NS,
        body = body,
        w = twips(theme.layout.page_width),
        h = twips(theme.layout.page_height),
        top = twips(m.top),
        right = twips(m.right),
        bottom = twips(m.bottom),
        left = twips(m.left),
    )
}

/// Paragraph style with its own run properties.
struct StyleDef {
    id: &'static str,
    ppr: String,
    rpr: String,
}

fn style_xml(s: &StyleDef) -> String {
    format!(
        r#"<w:style w:type="paragraph" w:customStyle="1" w:styleId="{id}"><w:name w:val="{id}"/><w:basedOn w:val="Normal"/><w:qFormat/><w:pPr>{ppr}</w:pPr><w:rPr>{rpr}</w:rPr></w:style>"#,
        id = s.id,
        ppr = s.ppr,
        rpr = s.rpr,
    )
}

/// Run properties in `CT_RPr` child order: bold, caps, color, size.
fn rpr(size: f32, bold: bool, caps: bool, color: &str) -> String {
    let b = if bold { "<w:b/>" } else { "" };
    let caps = if caps { "<w:caps/>" } else { "" };
    format!(
        r#"{b}{caps}<w:color w:val="{color}"/><w:sz w:val="{s}"/><w:szCs w:val="{s}"/>"#,
        s = half_points(size)
    )
}

fn spacing(before: f32, after: f32) -> String {
    format!(
        r#"<w:spacing w:before="{}" w:after="{}"/>"#,
        twips(before),
        twips(after)
    )
}

fn styles_xml(theme: &ThemeConfig) -> String {
    let typo = &theme.typography;
    let sizes = &typo.sizes;
    let sp = &theme.spacing;
    let colors = &theme.colors;
    let font = typo.family.docx_name();
    let line = (typo.line_height * 240.0).round() as i64;
    let content_width = twips(theme.content_width());
    let jc = match theme.layout.header_align {
        Align::Left => "left",
        Align::Center => "center",
    };

    let header = &theme.sections.header;
    let underline = if header.underline.enabled {
        format!(
            r#"<w:pBdr><w:bottom w:val="single" w:sz="{}" w:space="1" w:color="{}"/></w:pBdr>"#,
            // Border width is in eighths of a point.
            (header.underline.thickness * 8.0).round().max(2.0) as i64,
            header.underline.color.hex()
        )
    } else {
        String::new()
    };
    let bullet = &theme.elements.bullet;

    let styles = [
        StyleDef {
            id: "Name",
            ppr: format!(r#"{}<w:jc w:val="{jc}"/>"#, spacing(0.0, sp.name_gap)),
            rpr: rpr(sizes.name, typo.name_bold, false, &colors.primary.hex()),
        },
        StyleDef {
            id: "Contact",
            ppr: format!(r#"{}<w:jc w:val="{jc}"/>"#, spacing(0.0, 0.0)),
            rpr: rpr(sizes.contact, false, false, &colors.secondary.hex()),
        },
        StyleDef {
            id: "SectionHeader",
            ppr: format!(
                r#"<w:keepNext/>{underline}{}"#,
                spacing(sp.section_gap + sp.section_header_above, sp.section_header_below)
            ),
            rpr: rpr(
                sizes.section_header,
                typo.header_bold,
                header.uppercase,
                &header.color.hex(),
            ),
        },
        StyleDef {
            id: "JobTitle",
            ppr: format!(
                r#"<w:keepNext/><w:tabs><w:tab w:val="right" w:pos="{content_width}"/></w:tabs>{}"#,
                spacing(sp.entry_gap, 0.0)
            ),
            rpr: rpr(sizes.job_title, typo.title_bold, false, &colors.text.hex()),
        },
        StyleDef {
            id: "Company",
            ppr: format!("<w:keepNext/>{}", spacing(0.0, 0.0)),
            rpr: rpr(sizes.body, false, false, &colors.secondary.hex()),
        },
        StyleDef {
            id: "Bullet",
            ppr: format!(
                r#"<w:tabs><w:tab w:val="left" w:pos="{ind}"/></w:tabs>{}<w:ind w:left="{ind}" w:hanging="{hang}"/>"#,
                spacing(sp.bullet_gap, 0.0),
                ind = twips(bullet.indent),
                hang = twips(bullet.indent - bullet.symbol_offset),
            ),
            rpr: rpr(sizes.body, false, false, &colors.text.hex()),
        },
        StyleDef {
            id: "Body",
            ppr: spacing(sp.paragraph_gap, 0.0),
            rpr: rpr(sizes.body, false, false, &colors.text.hex()),
        },
    ];

    let mut xml = String::new();
    xml.push_str(XML_DECL);
    xml.push_str(&format!(r#"<w:styles xmlns:w="{W_NS}">"#));
    xml.push_str(&format!(
        concat!(
            r#"<w:docDefaults><w:rPrDefault><w:rPr>"#,
            r#"<w:rFonts w:ascii="{font}" w:hAnsi="{font}" w:cs="{font}"/>"#,
            r#"<w:sz w:val="{sz}"/><w:szCs w:val="{sz}"/></w:rPr></w:rPrDefault>"#,
            r#"<w:pPrDefault><w:pPr><w:spacing w:after="0" w:line="{line}" w:lineRule="auto"/></w:pPr></w:pPrDefault>"#,
            r#"</w:docDefaults>"#,
            r#"<w:style w:type="paragraph" w:default="1" w:styleId="Normal"><w:name w:val="Normal"/></w:style>"#
        ),
        font = font,
        sz = half_points(sizes.body),
        line = line,
    ));
    for style in &styles {
        xml.push_str(&style_xml(style));
    }
    xml.push_str("</w:styles>");
    xml
}

fn core_xml(name: &str) -> String {
    let title = if name.is_empty() {
        "Resume".to_string()
    } else {
        format!("{name} - Resume")
    };
    format!(
        concat!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
            r#"<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" "#,
            r#"xmlns:dc="http://purl.org/dc/elements/1.1/">"#,
            r#"<dc:title>{title}</dc:title><dc:creator>{creator}</dc:creator><dc:subject>Resume</dc:subject>"#,
            r#"</cp:coreProperties>"#
        ),
        title = escape(&title),
        creator = escape(name),
    )
}
