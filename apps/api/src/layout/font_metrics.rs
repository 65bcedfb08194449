//! Static font-metric tables for the PDF fonts.
//!
//! Character widths are in em units (relative to font size). Helvetica values
//! come from the standard AFM files; DejaVu Sans is approximated by scaling
//! the Helvetica tables, which is close enough for wrapping decisions.
//! All tables cover ASCII 0x20..=0x7E (95 printable characters).
//! Index = (char as usize) - 32.

use serde::{Deserialize, Serialize};

/// DejaVu Sans runs roughly 10% wider than Helvetica.
const DEJAVU_SCALE: f32 = 1.10;

/// Fonts the renderer can draw with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FontFace {
    /// Built-in PDF font, always available.
    Helvetica,
    HelveticaBold,
    /// Loaded from disk when present; covers smart punctuation and emoji-free Unicode text.
    DejaVuSans,
    DejaVuSansBold,
}

impl FontFace {
    pub fn is_bold(&self) -> bool {
        matches!(self, FontFace::HelveticaBold | FontFace::DejaVuSansBold)
    }
}

/// Static character-width table for a font face.
///
/// `widths[i]` = width of ASCII character `(i + 32)` at 1em.
pub struct FontMetricTable {
    widths: [f32; 95],
    /// Fallback width for non-ASCII characters (codepoints > 0x7E).
    pub average_char_width: f32,
    pub space_width: f32,
    /// Multiplier applied on top of `widths` (1.0 for the native table).
    scale: f32,
}

impl FontMetricTable {
    /// Measures the rendered width of a string in em units.
    ///
    /// Non-ASCII characters fall back to `average_char_width`.
    pub fn measure_em(&self, s: &str) -> f32 {
        s.chars().map(|c| self.char_em(c)).sum()
    }

    fn char_em(&self, c: char) -> f32 {
        let code = c as usize;
        let raw = if (32..=126).contains(&code) {
            self.widths[code - 32]
        } else {
            self.average_char_width
        };
        raw * self.scale
    }

    /// Width of `s` in points at `size_pt`.
    pub fn measure_pt(&self, s: &str, size_pt: f32) -> f32 {
        self.measure_em(s) * size_pt
    }

    /// Greedy word-wrap of `text` into lines no wider than `max_width_pt`.
    ///
    /// Words wider than a full line are split between characters. Empty or
    /// whitespace-only text yields a single empty line so callers keep the row.
    pub fn wrap(&self, text: &str, size_pt: f32, max_width_pt: f32) -> Vec<String> {
        let space_w = self.space_width * self.scale * size_pt;
        let mut lines = Vec::new();
        let mut current = String::new();
        let mut current_width = 0.0_f32;

        for word in text.split_whitespace() {
            for piece in self.split_long_word(word, size_pt, max_width_pt) {
                let word_w = self.measure_pt(&piece, size_pt);
                if current.is_empty() {
                    current_width = word_w;
                    current = piece;
                } else if current_width + space_w + word_w > max_width_pt {
                    lines.push(std::mem::take(&mut current));
                    current_width = word_w;
                    current = piece;
                } else {
                    current.push(' ');
                    current.push_str(&piece);
                    current_width += space_w + word_w;
                }
            }
        }

        if !current.is_empty() || lines.is_empty() {
            lines.push(current);
        }
        lines
    }

    fn split_long_word(&self, word: &str, size_pt: f32, max_width_pt: f32) -> Vec<String> {
        if self.measure_pt(word, size_pt) <= max_width_pt {
            return vec![word.to_string()];
        }
        let mut pieces = Vec::new();
        let mut piece = String::new();
        let mut piece_width = 0.0;
        for c in word.chars() {
            let width = self.char_em(c) * size_pt;
            if !piece.is_empty() && piece_width + width > max_width_pt {
                pieces.push(std::mem::take(&mut piece));
                piece_width = 0.0;
            }
            piece.push(c);
            piece_width += width;
        }
        if !piece.is_empty() {
            pieces.push(piece);
        }
        pieces
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Static width tables  (95 ASCII printable characters each)
// ────────────────────────────────────────────────────────────────────────────

#[rustfmt::skip]
const HELVETICA_WIDTHS: [f32; 95] = [
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
];

#[rustfmt::skip]
const HELVETICA_BOLD_WIDTHS: [f32; 95] = [
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
];

static HELVETICA_TABLE: FontMetricTable = FontMetricTable {
    widths: HELVETICA_WIDTHS,
    average_char_width: 0.556,
    space_width: 0.278,
    scale: 1.0,
};

static HELVETICA_BOLD_TABLE: FontMetricTable = FontMetricTable {
    widths: HELVETICA_BOLD_WIDTHS,
    average_char_width: 0.611,
    space_width: 0.278,
    scale: 1.0,
};

static DEJAVU_SANS_TABLE: FontMetricTable = FontMetricTable {
    widths: HELVETICA_WIDTHS,
    average_char_width: 0.556,
    space_width: 0.278,
    scale: DEJAVU_SCALE,
};

static DEJAVU_SANS_BOLD_TABLE: FontMetricTable = FontMetricTable {
    widths: HELVETICA_BOLD_WIDTHS,
    average_char_width: 0.611,
    space_width: 0.278,
    scale: DEJAVU_SCALE,
};

/// Returns the static metric table for a given font face.
pub fn get_metrics(face: FontFace) -> &'static FontMetricTable {
    match face {
        FontFace::Helvetica => &HELVETICA_TABLE,
        FontFace::HelveticaBold => &HELVETICA_BOLD_TABLE,
        FontFace::DejaVuSans => &DEJAVU_SANS_TABLE,
        FontFace::DejaVuSansBold => &DEJAVU_SANS_BOLD_TABLE,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
