//! Theme Resolver: a fully resolved, immutable visual configuration.
//!
//! A theme is `BASE` with one named preset layered over it. Presets are typed
//! `*Override` records where every field is optional; each nested record has
//! its own `merged` function so a preset that only touches `colors.primary`
//! can never erase an unrelated base field.

pub mod presets;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::layout::font_metrics::FontFamily;

pub use presets::{base_theme, resolve, resolve_named};

// ────────────────────────────────────────────────────────────────────────────
// Presets
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    Classic,
    #[default]
    Professional,
    Modern,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown theme preset '{0}'")]
pub struct UnknownPreset(pub String);

impl FromStr for Preset {
    type Err = UnknownPreset;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "classic" => Ok(Preset::Classic),
            "professional" => Ok(Preset::Professional),
            "modern" => Ok(Preset::Modern),
            _ => Err(UnknownPreset(s.to_string())),
        }
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Preset::Classic => "classic",
            Preset::Professional => "professional",
            Preset::Modern => "modern",
        };
        f.write_str(name)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Resolved configuration
// ────────────────────────────────────────────────────────────────────────────

/// RGB color, serialized as `[r, g, b]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const BLACK: Rgb = Rgb(0, 0, 0);

    /// Uppercase hex without `#`, as WordprocessingML expects.
    pub fn hex(&self) -> String {
        format!("{:02X}{:02X}{:02X}", self.0, self.1, self.2)
    }

    /// Components in the 0.0–1.0 range used by PDF color operators.
    pub fn unit(&self) -> (f32, f32, f32) {
        (
            self.0 as f32 / 255.0,
            self.1 as f32 / 255.0,
            self.2 as f32 / 255.0,
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Align {
    Left,
    Center,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeConfig {
    pub preset: Preset,
    pub colors: Colors,
    pub typography: Typography,
    pub spacing: Spacing,
    pub layout: LayoutBounds,
    pub sections: Sections,
    pub elements: Elements,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Colors {
    pub primary: Rgb,
    pub secondary: Rgb,
    pub text: Rgb,
    pub muted: Rgb,
    pub accent: Rgb,
    pub rule: Rgb,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Typography {
    pub family: FontFamily,
    pub sizes: TypeSizes,
    /// Line advance as a multiple of the font size.
    pub line_height: f32,
    pub name_bold: bool,
    pub header_bold: bool,
    pub title_bold: bool,
}

/// Font sizes in points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeSizes {
    pub name: f32,
    pub contact: f32,
    pub section_header: f32,
    pub job_title: f32,
    pub body: f32,
    pub small: f32,
}

/// Vertical rhythm in points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Spacing {
    pub page_margin: PageMargin,
    pub section_gap: f32,
    pub section_header_above: f32,
    pub section_header_below: f32,
    pub entry_gap: f32,
    pub bullet_gap: f32,
    pub paragraph_gap: f32,
    pub name_gap: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMargin {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutBounds {
    pub page_width: f32,
    pub page_height: f32,
    pub max_bullets_per_role: usize,
    pub max_pages: usize,
    pub header_align: Align,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sections {
    pub header: SectionHeader,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionHeader {
    pub uppercase: bool,
    pub color: Rgb,
    pub underline: Underline,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Underline {
    pub enabled: bool,
    pub thickness: f32,
    /// Distance below the header's line box.
    pub offset: f32,
    pub color: Rgb,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Elements {
    pub bullet: BulletStyle,
    pub name_card: NameCard,
    /// Thin rule between consecutive jobs.
    pub job_separator: bool,
    /// "Continued..." / "(Continued)" markers around page breaks.
    pub continuation_markers: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulletStyle {
    pub symbol: String,
    pub color: Rgb,
    /// Left indent of bullet text (and of its hanging continuation lines).
    pub indent: f32,
    /// Left offset of the bullet glyph itself.
    pub symbol_offset: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NameCard {
    pub enabled: bool,
    pub background: Rgb,
    pub padding: Padding,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Padding {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

impl ThemeConfig {
    /// Horizontal space between the side margins.
    pub fn content_width(&self) -> f32 {
        self.layout.page_width - self.spacing.page_margin.left - self.spacing.page_margin.right
    }

    /// Vertical space between the top and bottom margins.
    pub fn usable_height(&self) -> f32 {
        self.layout.page_height - self.spacing.page_margin.top - self.spacing.page_margin.bottom
    }

    /// Line advance for text set at `size` points.
    pub fn line_advance(&self, size: f32) -> f32 {
        size * self.typography.line_height
    }

    /// Vertical space a section header consumes.
    pub fn section_header_height(&self) -> f32 {
        self.spacing.section_header_above
            + self.line_advance(self.typography.sizes.section_header)
            + self.spacing.section_header_below
    }

    /// Applies a preset override on top of this configuration.
    pub fn merged(&self, o: &ThemeOverride) -> ThemeConfig {
        ThemeConfig {
            preset: o.preset.unwrap_or(self.preset),
            colors: merge_with(&self.colors, &o.colors, Colors::merged),
            typography: merge_with(&self.typography, &o.typography, Typography::merged),
            spacing: merge_with(&self.spacing, &o.spacing, Spacing::merged),
            layout: merge_with(&self.layout, &o.layout, LayoutBounds::merged),
            sections: merge_with(&self.sections, &o.sections, Sections::merged),
            elements: merge_with(&self.elements, &o.elements, Elements::merged),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Overrides
// ────────────────────────────────────────────────────────────────────────────

/// A partial theme. `None` at any level means "keep the base value".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ThemeOverride {
    pub preset: Option<Preset>,
    pub colors: Option<ColorsOverride>,
    pub typography: Option<TypographyOverride>,
    pub spacing: Option<SpacingOverride>,
    pub layout: Option<LayoutBoundsOverride>,
    pub sections: Option<SectionsOverride>,
    pub elements: Option<ElementsOverride>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColorsOverride {
    pub primary: Option<Rgb>,
    pub secondary: Option<Rgb>,
    pub text: Option<Rgb>,
    pub muted: Option<Rgb>,
    pub accent: Option<Rgb>,
    pub rule: Option<Rgb>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TypographyOverride {
    pub family: Option<FontFamily>,
    pub sizes: Option<TypeSizesOverride>,
    pub line_height: Option<f32>,
    pub name_bold: Option<bool>,
    pub header_bold: Option<bool>,
    pub title_bold: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TypeSizesOverride {
    pub name: Option<f32>,
    pub contact: Option<f32>,
    pub section_header: Option<f32>,
    pub job_title: Option<f32>,
    pub body: Option<f32>,
    pub small: Option<f32>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpacingOverride {
    pub page_margin: Option<PageMarginOverride>,
    pub section_gap: Option<f32>,
    pub section_header_above: Option<f32>,
    pub section_header_below: Option<f32>,
    pub entry_gap: Option<f32>,
    pub bullet_gap: Option<f32>,
    pub paragraph_gap: Option<f32>,
    pub name_gap: Option<f32>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageMarginOverride {
    pub top: Option<f32>,
    pub right: Option<f32>,
    pub bottom: Option<f32>,
    pub left: Option<f32>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayoutBoundsOverride {
    pub page_width: Option<f32>,
    pub page_height: Option<f32>,
    pub max_bullets_per_role: Option<usize>,
    pub max_pages: Option<usize>,
    pub header_align: Option<Align>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SectionsOverride {
    pub header: Option<SectionHeaderOverride>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SectionHeaderOverride {
    pub uppercase: Option<bool>,
    pub color: Option<Rgb>,
    pub underline: Option<UnderlineOverride>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct UnderlineOverride {
    pub enabled: Option<bool>,
    pub thickness: Option<f32>,
    pub offset: Option<f32>,
    pub color: Option<Rgb>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ElementsOverride {
    pub bullet: Option<BulletStyleOverride>,
    pub name_card: Option<NameCardOverride>,
    pub job_separator: Option<bool>,
    pub continuation_markers: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BulletStyleOverride {
    pub symbol: Option<String>,
    pub color: Option<Rgb>,
    pub indent: Option<f32>,
    pub symbol_offset: Option<f32>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NameCardOverride {
    pub enabled: Option<bool>,
    pub background: Option<Rgb>,
    pub padding: Option<PaddingOverride>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PaddingOverride {
    pub top: Option<f32>,
    pub right: Option<f32>,
    pub bottom: Option<f32>,
    pub left: Option<f32>,
}

// ────────────────────────────────────────────────────────────────────────────
// Per-record merge functions
// ────────────────────────────────────────────────────────────────────────────

fn merge_with<T: Clone, O>(base: &T, o: &Option<O>, merge: fn(&T, &O) -> T) -> T {
    match o {
        Some(o) => merge(base, o),
        None => base.clone(),
    }
}

impl Colors {
    pub fn merged(&self, o: &ColorsOverride) -> Colors {
        Colors {
            primary: o.primary.unwrap_or(self.primary),
            secondary: o.secondary.unwrap_or(self.secondary),
            text: o.text.unwrap_or(self.text),
            muted: o.muted.unwrap_or(self.muted),
            accent: o.accent.unwrap_or(self.accent),
            rule: o.rule.unwrap_or(self.rule),
        }
    }
}

impl Typography {
    pub fn merged(&self, o: &TypographyOverride) -> Typography {
        Typography {
            family: o.family.unwrap_or(self.family),
            sizes: merge_with(&self.sizes, &o.sizes, TypeSizes::merged),
            line_height: o.line_height.unwrap_or(self.line_height),
            name_bold: o.name_bold.unwrap_or(self.name_bold),
            header_bold: o.header_bold.unwrap_or(self.header_bold),
            title_bold: o.title_bold.unwrap_or(self.title_bold),
        }
    }
}

impl TypeSizes {
    pub fn merged(&self, o: &TypeSizesOverride) -> TypeSizes {
        TypeSizes {
            name: o.name.unwrap_or(self.name),
            contact: o.contact.unwrap_or(self.contact),
            section_header: o.section_header.unwrap_or(self.section_header),
            job_title: o.job_title.unwrap_or(self.job_title),
            body: o.body.unwrap_or(self.body),
            small: o.small.unwrap_or(self.small),
        }
    }
}

impl Spacing {
    pub fn merged(&self, o: &SpacingOverride) -> Spacing {
        Spacing {
            page_margin: merge_with(&self.page_margin, &o.page_margin, PageMargin::merged),
            section_gap: o.section_gap.unwrap_or(self.section_gap),
            section_header_above: o.section_header_above.unwrap_or(self.section_header_above),
            section_header_below: o.section_header_below.unwrap_or(self.section_header_below),
            entry_gap: o.entry_gap.unwrap_or(self.entry_gap),
            bullet_gap: o.bullet_gap.unwrap_or(self.bullet_gap),
            paragraph_gap: o.paragraph_gap.unwrap_or(self.paragraph_gap),
            name_gap: o.name_gap.unwrap_or(self.name_gap),
        }
    }
}

impl PageMargin {
    pub fn merged(&self, o: &PageMarginOverride) -> PageMargin {
        PageMargin {
            top: o.top.unwrap_or(self.top),
            right: o.right.unwrap_or(self.right),
            bottom: o.bottom.unwrap_or(self.bottom),
            left: o.left.unwrap_or(self.left),
        }
    }
}

impl LayoutBounds {
    pub fn merged(&self, o: &LayoutBoundsOverride) -> LayoutBounds {
        LayoutBounds {
            page_width: o.page_width.unwrap_or(self.page_width),
            page_height: o.page_height.unwrap_or(self.page_height),
            max_bullets_per_role: o.max_bullets_per_role.unwrap_or(self.max_bullets_per_role),
            max_pages: o.max_pages.unwrap_or(self.max_pages),
            header_align: o.header_align.unwrap_or(self.header_align),
        }
    }
}

impl Sections {
    pub fn merged(&self, o: &SectionsOverride) -> Sections {
        Sections {
            header: merge_with(&self.header, &o.header, SectionHeader::merged),
        }
    }
}

impl SectionHeader {
    pub fn merged(&self, o: &SectionHeaderOverride) -> SectionHeader {
        SectionHeader {
            uppercase: o.uppercase.unwrap_or(self.uppercase),
            color: o.color.unwrap_or(self.color),
            underline: merge_with(&self.underline, &o.underline, Underline::merged),
        }
    }
}

impl Underline {
    pub fn merged(&self, o: &UnderlineOverride) -> Underline {
        Underline {
            enabled: o.enabled.unwrap_or(self.enabled),
            thickness: o.thickness.unwrap_or(self.thickness),
            offset: o.offset.unwrap_or(self.offset),
            color: o.color.unwrap_or(self.color),
        }
    }
}

impl Elements {
    pub fn merged(&self, o: &ElementsOverride) -> Elements {
        Elements {
            bullet: merge_with(&self.bullet, &o.bullet, BulletStyle::merged),
            name_card: merge_with(&self.name_card, &o.name_card, NameCard::merged),
            job_separator: o.job_separator.unwrap_or(self.job_separator),
            continuation_markers: o.continuation_markers.unwrap_or(self.continuation_markers),
        }
    }
}

impl BulletStyle {
    pub fn merged(&self, o: &BulletStyleOverride) -> BulletStyle {
        BulletStyle {
            symbol: o.symbol.clone().unwrap_or_else(|| self.symbol.clone()),
            color: o.color.unwrap_or(self.color),
            indent: o.indent.unwrap_or(self.indent),
            symbol_offset: o.symbol_offset.unwrap_or(self.symbol_offset),
        }
    }
}

impl NameCard {
    pub fn merged(&self, o: &NameCardOverride) -> NameCard {
        NameCard {
            enabled: o.enabled.unwrap_or(self.enabled),
            background: o.background.unwrap_or(self.background),
            padding: merge_with(&self.padding, &o.padding, Padding::merged),
        }
    }
}

impl Padding {
    pub fn merged(&self, o: &PaddingOverride) -> Padding {
        Padding {
            top: o.top.unwrap_or(self.top),
            right: o.right.unwrap_or(self.right),
            bottom: o.bottom.unwrap_or(self.bottom),
            left: o.left.unwrap_or(self.left),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primary_only_override_keeps_every_other_field() {
        let base = base_theme();
        let o = ThemeOverride {
            colors: Some(ColorsOverride {
                primary: Some(Rgb(1, 2, 3)),
                ..Default::default()
            }),
            ..Default::default()
        };
        let merged = base.merged(&o);
        assert_eq!(merged.colors.primary, Rgb(1, 2, 3));
        assert_eq!(merged.colors.secondary, base.colors.secondary);
        assert_eq!(merged.colors.rule, base.colors.rule);
        assert_eq!(merged.typography, base.typography);
        assert_eq!(merged.spacing, base.spacing);
        assert_eq!(merged.elements, base.elements);
    }

    #[test]
    fn test_nested_padding_override_is_key_by_key() {
        let base = base_theme();
        let o = ThemeOverride {
            elements: Some(ElementsOverride {
                name_card: Some(NameCardOverride {
                    padding: Some(PaddingOverride {
                        top: Some(30.0),
                        ..Default::default()
                    }),
                    ..Default::default()
                }),
                ..Default::default()
            }),
            ..Default::default()
        };
        let merged = base.merged(&o);
        let padding = &merged.elements.name_card.padding;
        assert_eq!(padding.top, 30.0);
        assert_eq!(padding.left, base.elements.name_card.padding.left);
        assert_eq!(merged.elements.bullet, base.elements.bullet);
    }

    #[test]
    fn test_nested_underline_override_is_key_by_key() {
        let base = base_theme();
        let o = ThemeOverride {
            sections: Some(SectionsOverride {
                header: Some(SectionHeaderOverride {
                    underline: Some(UnderlineOverride {
                        thickness: Some(2.5),
                        ..Default::default()
                    }),
                    ..Default::default()
                }),
            }),
            ..Default::default()
        };
        let merged = base.merged(&o);
        assert_eq!(merged.sections.header.underline.thickness, 2.5);
        assert_eq!(
            merged.sections.header.underline.enabled,
            base.sections.header.underline.enabled
        );
        assert_eq!(merged.sections.header.uppercase, base.sections.header.uppercase);
    }

    #[test]
    fn test_preset_parsing_is_case_insensitive() {
        assert_eq!("Modern".parse::<Preset>(), Ok(Preset::Modern));
        assert_eq!(" classic ".parse::<Preset>(), Ok(Preset::Classic));
        assert!("neon".parse::<Preset>().is_err());
    }

    #[test]
    fn test_rgb_helpers() {
        assert_eq!(Rgb(31, 58, 95).hex(), "1F3A5F");
        let (r, g, b) = Rgb(255, 0, 51).unit();
        assert!((r - 1.0).abs() < 1e-6);
        assert_eq!(g, 0.0);
        assert!((b - 0.2).abs() < 1e-6);
    }
}
