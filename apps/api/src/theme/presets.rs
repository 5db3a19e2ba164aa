//! BASE design system and the three named presets layered over it.

use tracing::warn;

use crate::layout::font_metrics::FontFamily;
use crate::theme::{
    Align, BulletStyle, BulletStyleOverride, Colors, ColorsOverride, Elements, ElementsOverride,
    LayoutBounds, LayoutBoundsOverride, NameCard, NameCardOverride, Padding, PaddingOverride,
    PageMargin, Preset, Rgb, SectionHeader, SectionHeaderOverride, Sections, SectionsOverride,
    Spacing, SpacingOverride, ThemeConfig, ThemeOverride, TypeSizes, TypeSizesOverride,
    Typography, TypographyOverride, Underline, UnderlineOverride,
};

/// US Letter in points.
pub const US_LETTER: (f32, f32) = (612.0, 792.0);

/// The base design system every preset starts from.
///
/// Geometry: US Letter with 45pt side margins, giving a 522pt content width.
pub fn base_theme() -> ThemeConfig {
    ThemeConfig {
        preset: Preset::Professional,
        colors: Colors {
            primary: Rgb(31, 58, 95),
            secondary: Rgb(75, 85, 99),
            text: Rgb(17, 24, 39),
            muted: Rgb(107, 114, 128),
            accent: Rgb(37, 99, 235),
            rule: Rgb(209, 213, 219),
        },
        typography: Typography {
            family: FontFamily::Helvetica,
            sizes: TypeSizes {
                name: 22.0,
                contact: 10.0,
                section_header: 12.0,
                job_title: 11.0,
                body: 11.0,
                small: 9.0,
            },
            line_height: 1.25,
            name_bold: true,
            header_bold: true,
            title_bold: true,
        },
        spacing: Spacing {
            page_margin: PageMargin {
                top: 40.0,
                right: 45.0,
                bottom: 40.0,
                left: 45.0,
            },
            section_gap: 10.0,
            section_header_above: 4.0,
            section_header_below: 4.0,
            entry_gap: 6.0,
            bullet_gap: 1.0,
            paragraph_gap: 2.0,
            name_gap: 4.0,
        },
        layout: LayoutBounds {
            page_width: US_LETTER.0,
            page_height: US_LETTER.1,
            max_bullets_per_role: 5,
            max_pages: 2,
            header_align: Align::Left,
        },
        sections: Sections {
            header: SectionHeader {
                uppercase: true,
                color: Rgb(31, 58, 95),
                underline: Underline {
                    enabled: true,
                    thickness: 0.75,
                    offset: 1.0,
                    color: Rgb(209, 213, 219),
                },
            },
        },
        elements: Elements {
            bullet: BulletStyle {
                symbol: "\u{2022}".to_string(),
                color: Rgb(31, 58, 95),
                indent: 14.0,
                symbol_offset: 4.0,
            },
            name_card: NameCard {
                enabled: false,
                background: Rgb(243, 244, 246),
                padding: Padding {
                    top: 10.0,
                    right: 12.0,
                    bottom: 10.0,
                    left: 12.0,
                },
            },
            job_separator: false,
            continuation_markers: false,
        },
    }
}

/// Serif, black-on-white, centered header, underlined section headers and
/// continuation markers on page breaks.
fn classic_override() -> ThemeOverride {
    let black = Rgb::BLACK;
    ThemeOverride {
        preset: Some(Preset::Classic),
        colors: Some(ColorsOverride {
            primary: Some(black),
            secondary: Some(Rgb(51, 51, 51)),
            text: Some(black),
            muted: Some(Rgb(85, 85, 85)),
            accent: Some(black),
            rule: Some(black),
        }),
        typography: Some(TypographyOverride {
            family: Some(FontFamily::Times),
            sizes: Some(TypeSizesOverride {
                name: Some(20.0),
                section_header: Some(11.5),
                ..Default::default()
            }),
            ..Default::default()
        }),
        layout: Some(LayoutBoundsOverride {
            header_align: Some(Align::Center),
            ..Default::default()
        }),
        sections: Some(SectionsOverride {
            header: Some(SectionHeaderOverride {
                color: Some(black),
                underline: Some(UnderlineOverride {
                    color: Some(black),
                    thickness: Some(0.5),
                    ..Default::default()
                }),
                ..Default::default()
            }),
        }),
        elements: Some(ElementsOverride {
            bullet: Some(BulletStyleOverride {
                color: Some(black),
                ..Default::default()
            }),
            continuation_markers: Some(true),
            ..Default::default()
        }),
        ..Default::default()
    }
}

/// The base look plus separators between jobs.
fn professional_override() -> ThemeOverride {
    ThemeOverride {
        preset: Some(Preset::Professional),
        elements: Some(ElementsOverride {
            job_separator: Some(true),
            ..Default::default()
        }),
        ..Default::default()
    }
}

/// Teal accents, a tinted name card, no header underline.
fn modern_override() -> ThemeOverride {
    let teal = Rgb(15, 118, 110);
    ThemeOverride {
        preset: Some(Preset::Modern),
        colors: Some(ColorsOverride {
            primary: Some(teal),
            accent: Some(Rgb(20, 184, 166)),
            ..Default::default()
        }),
        typography: Some(TypographyOverride {
            sizes: Some(TypeSizesOverride {
                name: Some(26.0),
                section_header: Some(12.5),
                ..Default::default()
            }),
            line_height: Some(1.3),
            ..Default::default()
        }),
        spacing: Some(SpacingOverride {
            section_gap: Some(12.0),
            ..Default::default()
        }),
        sections: Some(SectionsOverride {
            header: Some(SectionHeaderOverride {
                color: Some(teal),
                underline: Some(UnderlineOverride {
                    enabled: Some(false),
                    ..Default::default()
                }),
                ..Default::default()
            }),
        }),
        elements: Some(ElementsOverride {
            bullet: Some(BulletStyleOverride {
                color: Some(teal),
                ..Default::default()
            }),
            name_card: Some(NameCardOverride {
                enabled: Some(true),
                background: Some(Rgb(230, 244, 241)),
                padding: Some(PaddingOverride {
                    top: Some(14.0),
                    bottom: Some(14.0),
                    ..Default::default()
                }),
            }),
            ..Default::default()
        }),
        ..Default::default()
    }
}

fn preset_override(preset: Preset) -> ThemeOverride {
    match preset {
        Preset::Classic => classic_override(),
        Preset::Professional => professional_override(),
        Preset::Modern => modern_override(),
    }
}

/// Resolves a preset into a complete theme. Pure: the same preset always
/// yields an identical configuration.
pub fn resolve(preset: Preset) -> ThemeConfig {
    base_theme().merged(&preset_override(preset))
}

/// Resolves a preset by name. Unknown names fall back to `professional`.
pub fn resolve_named(name: &str) -> ThemeConfig {
    let preset = name.parse::<Preset>().unwrap_or_else(|e| {
        warn!(requested = name, "{e}; falling back to professional");
        Preset::Professional
    });
    resolve(preset)
}
