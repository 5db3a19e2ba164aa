//! Static font-metric tables for the standard PDF faces used by the themes.
//!
//! Widths are in em units (relative to font size) and come from the Adobe
//! core-14 AFM files, so measurements agree with what a PDF viewer draws for
//! the non-embedded Type1 faces the PDF emitter references.
//!
//! Tables cover ASCII 0x20..=0x7E (95 printable characters), index =
//! `(char as usize) - 32`, plus the few WinAnsi punctuation glyphs the
//! renderer emits itself (bullet, dashes, curly quotes, ellipsis). Anything
//! else falls back to `average_char_width`.

use serde::{Deserialize, Serialize};

// ────────────────────────────────────────────────────────────────────────────
// Families and faces
// ────────────────────────────────────────────────────────────────────────────

/// Font family selected by a theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontFamily {
    /// Sans-serif; professional and modern presets.
    Helvetica,
    /// Serif; classic preset.
    Times,
}

/// A concrete face: family plus weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FontFace {
    Helvetica,
    HelveticaBold,
    TimesRoman,
    TimesBold,
}

impl FontFamily {
    pub fn regular(self) -> FontFace {
        match self {
            FontFamily::Helvetica => FontFace::Helvetica,
            FontFamily::Times => FontFace::TimesRoman,
        }
    }

    pub fn bold(self) -> FontFace {
        match self {
            FontFamily::Helvetica => FontFace::HelveticaBold,
            FontFamily::Times => FontFace::TimesBold,
        }
    }

    pub fn face(self, bold: bool) -> FontFace {
        if bold {
            self.bold()
        } else {
            self.regular()
        }
    }

    /// Metric-compatible family name for word processors.
    pub fn docx_name(self) -> &'static str {
        match self {
            FontFamily::Helvetica => "Arial",
            FontFamily::Times => "Times New Roman",
        }
    }
}

impl FontFace {
    pub const ALL: [FontFace; 4] = [
        FontFace::Helvetica,
        FontFace::HelveticaBold,
        FontFace::TimesRoman,
        FontFace::TimesBold,
    ];

    /// PostScript name of the standard Type1 font.
    pub fn base_font(self) -> &'static str {
        match self {
            FontFace::Helvetica => "Helvetica",
            FontFace::HelveticaBold => "Helvetica-Bold",
            FontFace::TimesRoman => "Times-Roman",
            FontFace::TimesBold => "Times-Bold",
        }
    }

    /// Resource name used in page content streams.
    pub fn resource_name(self) -> &'static str {
        match self {
            FontFace::Helvetica => "F1",
            FontFace::HelveticaBold => "F2",
            FontFace::TimesRoman => "F3",
            FontFace::TimesBold => "F4",
        }
    }

    pub fn metrics(self) -> &'static FontMetricTable {
        get_metrics(self)
    }

    /// Rendered width of `s` in points at `size_pt`.
    pub fn text_width(self, s: &str, size_pt: f32) -> f32 {
        self.metrics().measure_str(s) * size_pt
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Font metric table
// ────────────────────────────────────────────────────────────────────────────

/// Static character-width table for one face.
///
/// Width array slot layout:
/// ```text
/// [0]=sp  [1]=!   [2]="   [3]=#   [4]=$   [5]=%   [6]=&   [7]='
/// [8]=(   [9]=)   [10]=*  [11]=+  [12]=,  [13]=-  [14]=.  [15]=/
/// [16..25]=0-9
/// [26]=:  [27]=;  [28]=<  [29]==  [30]=>  [31]=?  [32]=@
/// [33..58]=A-Z
/// [59]=[  [60]=\  [61]=]  [62]=^  [63]=_  [64]=`
/// [65..90]=a-z
/// [91]={  [92]=|  [93]=}  [94]=~
/// ```
pub struct FontMetricTable {
    pub face: FontFace,
    widths: [f32; 95],
    /// (bullet, en dash, em dash, single quote, double quote, ellipsis)
    punctuation: Punctuation,
    /// Fallback width for characters outside the table.
    pub average_char_width: f32,
    pub space_width: f32,
}

struct Punctuation {
    bullet: f32,
    en_dash: f32,
    em_dash: f32,
    single_quote: f32,
    double_quote: f32,
    ellipsis: f32,
}

impl FontMetricTable {
    /// Width of one character in em units.
    pub fn char_width(&self, c: char) -> f32 {
        let code = c as usize;
        if (32..=126).contains(&code) {
            return self.widths[code - 32];
        }
        let p = &self.punctuation;
        match c {
            '\u{2022}' => p.bullet,
            '\u{2013}' => p.en_dash,
            '\u{2014}' => p.em_dash,
            '\u{2018}' | '\u{2019}' => p.single_quote,
            '\u{201C}' | '\u{201D}' => p.double_quote,
            '\u{2026}' => p.ellipsis,
            '\u{00A0}' => self.space_width,
            _ => self.average_char_width,
        }
    }

    /// Measures the rendered width of a string in em units.
    pub fn measure_str(&self, s: &str) -> f32 {
        s.chars().map(|c| self.char_width(c)).sum()
    }
}

/// Returns the static metric table for a face.
pub fn get_metrics(face: FontFace) -> &'static FontMetricTable {
    match face {
        FontFace::Helvetica => &HELVETICA_TABLE,
        FontFace::HelveticaBold => &HELVETICA_BOLD_TABLE,
        FontFace::TimesRoman => &TIMES_ROMAN_TABLE,
        FontFace::TimesBold => &TIMES_BOLD_TABLE,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Static width tables  (95 ASCII printable characters each)
// ────────────────────────────────────────────────────────────────────────────

static HELVETICA_TABLE: FontMetricTable = FontMetricTable {
    face: FontFace::Helvetica,
    #[rustfmt::skip]
    widths: [
        // sp     !      "      #      $      %      &      '      (      )      *      +      ,      -      .      /
        0.278, 0.278, 0.355, 0.556, 0.556, 0.889, 0.667, 0.191, 0.333, 0.333, 0.389, 0.584, 0.278, 0.333, 0.278, 0.278,
        // 0      1      2      3      4      5      6      7      8      9
        0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556,
        // :      ;      <      =      >      ?      @
        0.278, 0.278, 0.584, 0.584, 0.584, 0.556, 1.015,
        // A      B      C      D      E      F      G      H      I      J      K      L      M
        0.667, 0.667, 0.722, 0.722, 0.667, 0.611, 0.778, 0.722, 0.278, 0.500, 0.667, 0.556, 0.833,
        // N      O      P      Q      R      S      T      U      V      W      X      Y      Z
        0.722, 0.778, 0.667, 0.778, 0.722, 0.667, 0.611, 0.722, 0.667, 0.944, 0.667, 0.667, 0.611,
        // [      \      ]      ^      _      `
        0.278, 0.278, 0.278, 0.469, 0.556, 0.333,
        // a      b      c      d      e      f      g      h      i      j      k      l      m
        0.556, 0.556, 0.500, 0.556, 0.556, 0.278, 0.556, 0.556, 0.222, 0.222, 0.500, 0.222, 0.833,
        // n      o      p      q      r      s      t      u      v      w      x      y      z
        0.556, 0.556, 0.556, 0.556, 0.333, 0.500, 0.278, 0.556, 0.500, 0.722, 0.500, 0.500, 0.500,
        // {      |      }      ~
        0.334, 0.260, 0.334, 0.584,
    ],
    punctuation: Punctuation {
        bullet: 0.350,
        en_dash: 0.556,
        em_dash: 1.000,
        single_quote: 0.222,
        double_quote: 0.333,
        ellipsis: 1.000,
    },
    average_char_width: 0.52,
    space_width: 0.278,
};

static HELVETICA_BOLD_TABLE: FontMetricTable = FontMetricTable {
    face: FontFace::HelveticaBold,
    #[rustfmt::skip]
    widths: [
        // sp     !      "      #      $      %      &      '      (      )      *      +      ,      -      .      /
        0.278, 0.333, 0.474, 0.556, 0.556, 0.889, 0.722, 0.238, 0.333, 0.333, 0.389, 0.584, 0.278, 0.333, 0.278, 0.278,
        // 0      1      2      3      4      5      6      7      8      9
        0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556,
        // :      ;      <      =      >      ?      @
        0.333, 0.333, 0.584, 0.584, 0.584, 0.611, 0.975,
        // A      B      C      D      E      F      G      H      I      J      K      L      M
        0.722, 0.722, 0.722, 0.722, 0.667, 0.611, 0.778, 0.722, 0.278, 0.556, 0.722, 0.611, 0.833,
        // N      O      P      Q      R      S      T      U      V      W      X      Y      Z
        0.722, 0.778, 0.667, 0.778, 0.722, 0.667, 0.611, 0.722, 0.667, 0.944, 0.667, 0.667, 0.611,
        // [      \      ]      ^      _      `
        0.333, 0.278, 0.333, 0.584, 0.556, 0.333,
        // a      b      c      d      e      f      g      h      i      j      k      l      m
        0.556, 0.611, 0.556, 0.611, 0.556, 0.333, 0.611, 0.611, 0.278, 0.278, 0.556, 0.278, 0.889,
        // n      o      p      q      r      s      t      u      v      w      x      y      z
        0.611, 0.611, 0.611, 0.611, 0.389, 0.556, 0.333, 0.611, 0.556, 0.778, 0.556, 0.556, 0.500,
        // {      |      }      ~
        0.389, 0.280, 0.389, 0.584,
    ],
    punctuation: Punctuation {
        bullet: 0.350,
        en_dash: 0.556,
        em_dash: 1.000,
        single_quote: 0.278,
        double_quote: 0.500,
        ellipsis: 1.000,
    },
    average_char_width: 0.56,
    space_width: 0.278,
};

static TIMES_ROMAN_TABLE: FontMetricTable = FontMetricTable {
    face: FontFace::TimesRoman,
    #[rustfmt::skip]
    widths: [
        // sp     !      "      #      $      %      &      '      (      )      *      +      ,      -      .      /
        0.250, 0.333, 0.408, 0.500, 0.500, 0.833, 0.778, 0.180, 0.333, 0.333, 0.500, 0.564, 0.250, 0.333, 0.250, 0.278,
        // 0      1      2      3      4      5      6      7      8      9
        0.500, 0.500, 0.500, 0.500, 0.500, 0.500, 0.500, 0.500, 0.500, 0.500,
        // :      ;      <      =      >      ?      @
        0.278, 0.278, 0.564, 0.564, 0.564, 0.444, 0.921,
        // A      B      C      D      E      F      G      H      I      J      K      L      M
        0.722, 0.667, 0.667, 0.722, 0.611, 0.556, 0.722, 0.722, 0.333, 0.389, 0.722, 0.611, 0.889,
        // N      O      P      Q      R      S      T      U      V      W      X      Y      Z
        0.722, 0.722, 0.556, 0.722, 0.667, 0.556, 0.611, 0.722, 0.722, 0.944, 0.722, 0.722, 0.611,
        // [      \      ]      ^      _      `
        0.333, 0.278, 0.333, 0.469, 0.500, 0.333,
        // a      b      c      d      e      f      g      h      i      j      k      l      m
        0.444, 0.500, 0.444, 0.500, 0.444, 0.333, 0.500, 0.500, 0.278, 0.278, 0.500, 0.278, 0.778,
        // n      o      p      q      r      s      t      u      v      w      x      y      z
        0.500, 0.500, 0.500, 0.500, 0.333, 0.389, 0.278, 0.500, 0.500, 0.722, 0.500, 0.500, 0.444,
        // {      |      }      ~
        0.480, 0.200, 0.480, 0.541,
    ],
    punctuation: Punctuation {
        bullet: 0.350,
        en_dash: 0.500,
        em_dash: 1.000,
        single_quote: 0.333,
        double_quote: 0.444,
        ellipsis: 1.000,
    },
    average_char_width: 0.47,
    space_width: 0.250,
};

static TIMES_BOLD_TABLE: FontMetricTable = FontMetricTable {
    face: FontFace::TimesBold,
    #[rustfmt::skip]
    widths: [
        // sp     !      "      #      $      %      &      '      (      )      *      +      ,      -      .      /
        0.250, 0.333, 0.555, 0.500, 0.500, 1.000, 0.833, 0.278, 0.333, 0.333, 0.500, 0.570, 0.250, 0.333, 0.250, 0.278,
        // 0      1      2      3      4      5      6      7      8      9
        0.500, 0.500, 0.500, 0.500, 0.500, 0.500, 0.500, 0.500, 0.500, 0.500,
        // :      ;      <      =      >      ?      @
        0.333, 0.333, 0.570, 0.570, 0.570, 0.500, 0.930,
        // A      B      C      D      E      F      G      H      I      J      K      L      M
        0.722, 0.667, 0.722, 0.722, 0.667, 0.611, 0.778, 0.778, 0.389, 0.500, 0.778, 0.667, 0.944,
        // N      O      P      Q      R      S      T      U      V      W      X      Y      Z
        0.722, 0.778, 0.611, 0.778, 0.722, 0.556, 0.667, 0.722, 0.722, 1.000, 0.722, 0.722, 0.667,
        // [      \      ]      ^      _      `
        0.333, 0.278, 0.333, 0.581, 0.500, 0.333,
        // a      b      c      d      e      f      g      h      i      j      k      l      m
        0.500, 0.556, 0.444, 0.556, 0.444, 0.333, 0.500, 0.556, 0.278, 0.333, 0.556, 0.278, 0.833,
        // n      o      p      q      r      s      t      u      v      w      x      y      z
        0.556, 0.500, 0.556, 0.556, 0.444, 0.389, 0.333, 0.556, 0.500, 0.722, 0.500, 0.500, 0.444,
        // {      |      }      ~
        0.394, 0.220, 0.394, 0.520,
    ],
    punctuation: Punctuation {
        bullet: 0.350,
        en_dash: 0.500,
        em_dash: 1.000,
        single_quote: 0.333,
        double_quote: 0.500,
        ellipsis: 1.000,
    },
    average_char_width: 0.50,
    space_width: 0.250,
};

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_measure_empty_string_is_zero() {
        assert_eq!(get_metrics(FontFace::Helvetica).measure_str(""), 0.0);
    }

    #[test]
    fn test_space_slot_matches_space_width() {
        for face in FontFace::ALL {
            let m = get_metrics(face);
            assert_eq!(m.char_width(' '), m.space_width, "{face:?}");
        }
    }

    #[test]
    fn test_known_helvetica_widths() {
        let m = get_metrics(FontFace::Helvetica);
        assert!((m.char_width('M') - 0.833).abs() < 1e-6);
        assert!((m.char_width('i') - 0.222).abs() < 1e-6);
        assert!((m.char_width('~') - 0.584).abs() < 1e-6);
    }

    #[test]
    fn test_text_width_scales_with_size() {
        let w11 = FontFace::Helvetica.text_width("Resume", 11.0);
        let w22 = FontFace::Helvetica.text_width("Resume", 22.0);
        assert!((w22 - 2.0 * w11).abs() < 1e-3);
    }

    #[test]
    fn test_bold_is_not_narrower_than_regular() {
        let text = "Architected distributed caching layer";
        assert!(
            FontFace::HelveticaBold.text_width(text, 11.0)
                >= FontFace::Helvetica.text_width(text, 11.0)
        );
    }

    #[test]
    fn test_times_narrower_than_helvetica() {
        let text = "Reduced p99 latency by 40 percent";
        assert!(
            FontFace::TimesRoman.text_width(text, 11.0) < FontFace::Helvetica.text_width(text, 11.0)
        );
    }

    #[test]
    fn test_punctuation_and_fallback() {
        let m = get_metrics(FontFace::Helvetica);
        assert_eq!(m.char_width('\u{2022}'), 0.350);
        assert_eq!(m.char_width('\u{2014}'), 1.000);
        assert_eq!(m.char_width('\u{4E2D}'), m.average_char_width);
    }

    #[test]
    fn test_family_faces() {
        assert_eq!(FontFamily::Times.face(true), FontFace::TimesBold);
        assert_eq!(FontFamily::Helvetica.face(false), FontFace::Helvetica);
        assert_eq!(FontFace::TimesRoman.base_font(), "Times-Roman");
    }
}
