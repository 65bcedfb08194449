//! Block flow layout: wraps text, stacks blocks top to bottom and breaks pages.
//!
//! Output is a list of pages of plain [`DrawOp`]s in PDF user space (points,
//! origin at the bottom-left corner), so pagination is testable without a PDF
//! backend. Paragraphs break between lines; table rows never split.

use crate::layout::font_metrics::{get_metrics, FontFace};

// ────────────────────────────────────────────────────────────────────────────
// Geometry and styling
// ────────────────────────────────────────────────────────────────────────────

pub const POINTS_PER_INCH: f32 = 72.0;

/// Page size and margins, in points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    pub width: f32,
    pub height: f32,
    pub margin_left: f32,
    pub margin_right: f32,
    /// Distance from the top edge to the first line of body content.
    pub margin_top: f32,
    pub margin_bottom: f32,
}

impl PageGeometry {
    /// US Letter (8.5 x 11 in).
    pub fn letter(margin: f32, margin_top: f32) -> Self {
        Self {
            width: 8.5 * POINTS_PER_INCH,
            height: 11.0 * POINTS_PER_INCH,
            margin_left: margin,
            margin_right: margin,
            margin_top,
            margin_bottom: margin,
        }
    }

    pub fn content_width(&self) -> f32 {
        self.width - self.margin_left - self.margin_right
    }

    /// Converts a distance from the top edge to a PDF y coordinate.
    pub fn pdf_y(&self, from_top: f32) -> f32 {
        self.height - from_top
    }
}

/// 8-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::gray(0);
    pub const WHITE: Color = Color::gray(255);

    pub const fn gray(level: u8) -> Self {
        Self {
            r: level,
            g: level,
            b: level,
        }
    }

    /// From a 0xRRGGBB literal.
    pub const fn hex(rgb: u32) -> Self {
        Self {
            r: ((rgb >> 16) & 0xFF) as u8,
            g: ((rgb >> 8) & 0xFF) as u8,
            b: (rgb & 0xFF) as u8,
        }
    }

    /// Components scaled to 0.0..=1.0.
    pub fn unit(&self) -> (f32, f32, f32) {
        (
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
        )
    }
}

/// The pair of faces a document draws with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FontSet {
    pub regular: FontFace,
    pub bold: FontFace,
}

impl FontSet {
    pub const BUILTIN: FontSet = FontSet {
        regular: FontFace::Helvetica,
        bold: FontFace::HelveticaBold,
    };
    pub const UNICODE: FontSet = FontSet {
        regular: FontFace::DejaVuSans,
        bold: FontFace::DejaVuSansBold,
    };

    pub fn face(&self, bold: bool) -> FontFace {
        if bold {
            self.bold
        } else {
            self.regular
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub size: f32,
    pub bold: bool,
    pub color: Color,
    /// Line height as a multiple of `size`.
    pub leading: f32,
}

impl TextStyle {
    pub const fn new(size: f32, bold: bool) -> Self {
        Self {
            size,
            bold,
            color: Color::BLACK,
            leading: 1.25,
        }
    }

    pub const fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn line_height(&self) -> f32 {
        self.size * self.leading
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Input blocks and output ops
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct Table {
    pub col_widths: Vec<f32>,
    pub rows: Vec<Vec<String>>,
    pub style: TextStyle,
    /// Per-row overrides by row index; rows past the end use `style`.
    pub row_styles: Vec<TextStyle>,
    pub header_background: Option<Color>,
    /// Per-cell grid lines.
    pub grid: Option<Color>,
    /// Box around the whole table (one per page the table spans).
    pub outline: Option<Color>,
    pub padding: f32,
}

impl Table {
    pub fn new(col_widths: Vec<f32>, rows: Vec<Vec<String>>, style: TextStyle) -> Self {
        Self {
            col_widths,
            rows,
            style,
            row_styles: Vec::new(),
            header_background: None,
            grid: None,
            outline: None,
            padding: 4.0,
        }
    }

    pub fn width(&self) -> f32 {
        self.col_widths.iter().sum()
    }
}

#[derive(Debug, Clone)]
pub enum Block {
    Paragraph {
        text: String,
        style: TextStyle,
        space_after: f32,
    },
    Spacer(f32),
    Table(Table),
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    FillRect {
        x: f32,
        y: f32,
        w: f32,
        h: f32,
        color: Color,
    },
    StrokeRect {
        x: f32,
        y: f32,
        w: f32,
        h: f32,
        color: Color,
        thickness: f32,
    },
    /// `y` is the baseline.
    Text {
        x: f32,
        y: f32,
        text: String,
        face: FontFace,
        size: f32,
        color: Color,
    },
    RotatedText {
        x: f32,
        y: f32,
        text: String,
        face: FontFace,
        size: f32,
        color: Color,
        angle_deg: f32,
    },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub ops: Vec<DrawOp>,
}

impl Page {
    /// Every piece of text on the page, in draw order.
    #[cfg(test)]
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Text { text, .. } | DrawOp::RotatedText { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }
}

/// A `Text` op whose right edge sits at `right_x`.
pub fn text_right(
    text: &str,
    right_x: f32,
    baseline: f32,
    face: FontFace,
    size: f32,
    color: Color,
) -> DrawOp {
    let width = get_metrics(face).measure_pt(text, size);
    DrawOp::Text {
        x: right_x - width,
        y: baseline,
        text: text.to_string(),
        face,
        size,
        color,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Flow
// ────────────────────────────────────────────────────────────────────────────

/// Lays out `blocks` into as many pages as needed. Always returns at least one page.
pub fn layout_blocks(geometry: &PageGeometry, fonts: FontSet, blocks: &[Block]) -> Vec<Page> {
    let mut flow = Flow::new(*geometry, fonts);
    for block in blocks {
        match block {
            Block::Paragraph {
                text,
                style,
                space_after,
            } => {
                flow.paragraph(text, style);
                flow.cursor += space_after;
            }
            Block::Spacer(height) => flow.cursor += height,
            Block::Table(table) => flow.table(table),
        }
    }
    flow.finish()
}

struct Flow {
    geometry: PageGeometry,
    fonts: FontSet,
    pages: Vec<Page>,
    current: Page,
    /// Distance from the top edge of the current page.
    cursor: f32,
}

impl Flow {
    fn new(geometry: PageGeometry, fonts: FontSet) -> Self {
        Self {
            geometry,
            fonts,
            pages: Vec::new(),
            current: Page::default(),
            cursor: geometry.margin_top,
        }
    }

    fn bottom(&self) -> f32 {
        self.geometry.height - self.geometry.margin_bottom
    }

    fn at_page_top(&self) -> bool {
        self.cursor <= self.geometry.margin_top
    }

    fn new_page(&mut self) {
        self.pages.push(std::mem::take(&mut self.current));
        self.cursor = self.geometry.margin_top;
    }

    /// Starts a new page unless `height` still fits (or the page is empty).
    fn ensure_room(&mut self, height: f32) {
        if self.cursor + height > self.bottom() && !self.at_page_top() {
            self.new_page();
        }
    }

    fn paragraph(&mut self, text: &str, style: &TextStyle) {
        let face = self.fonts.face(style.bold);
        let lines = get_metrics(face).wrap(text, style.size, self.geometry.content_width());
        let line_height = style.line_height();
        for line in lines {
            self.ensure_room(line_height);
            let baseline = self.geometry.pdf_y(self.cursor + style.size);
            self.current.ops.push(DrawOp::Text {
                x: self.geometry.margin_left,
                y: baseline,
                text: line,
                face,
                size: style.size,
                color: style.color,
            });
            self.cursor += line_height;
        }
    }

    fn table(&mut self, table: &Table) {
        let left = self.geometry.margin_left;
        let mut segment_top = self.cursor;

        for (index, row) in table.rows.iter().enumerate() {
            let is_header = index == 0;
            let style = table.row_styles.get(index).copied().unwrap_or(table.style);
            let face = self.fonts.face(style.bold);
            let metrics = get_metrics(face);

            let cells: Vec<Vec<String>> = table
                .col_widths
                .iter()
                .enumerate()
                .map(|(col, width)| {
                    let text = row.get(col).map(String::as_str).unwrap_or("");
                    metrics.wrap(text, style.size, (width - 2.0 * table.padding).max(1.0))
                })
                .collect();
            let max_lines = cells.iter().map(Vec::len).max().unwrap_or(1);
            let row_height = max_lines as f32 * style.line_height() + 2.0 * table.padding;

            if self.cursor + row_height > self.bottom() && !self.at_page_top() {
                self.outline_segment(table, segment_top);
                self.new_page();
                segment_top = self.cursor;
            }

            let row_y = self.geometry.pdf_y(self.cursor + row_height);
            if is_header {
                if let Some(color) = table.header_background {
                    self.current.ops.push(DrawOp::FillRect {
                        x: left,
                        y: row_y,
                        w: table.width(),
                        h: row_height,
                        color,
                    });
                }
            }

            let mut x = left;
            for (width, lines) in table.col_widths.iter().zip(cells) {
                if let Some(color) = table.grid {
                    self.current.ops.push(DrawOp::StrokeRect {
                        x,
                        y: row_y,
                        w: *width,
                        h: row_height,
                        color,
                        thickness: 0.5,
                    });
                }
                let mut line_top = self.cursor + table.padding;
                for line in lines {
                    if !line.is_empty() {
                        self.current.ops.push(DrawOp::Text {
                            x: x + table.padding,
                            y: self.geometry.pdf_y(line_top + style.size),
                            text: line,
                            face,
                            size: style.size,
                            color: style.color,
                        });
                    }
                    line_top += style.line_height();
                }
                x += width;
            }
            self.cursor += row_height;
        }

        self.outline_segment(table, segment_top);
    }

    fn outline_segment(&mut self, table: &Table, segment_top: f32) {
        let Some(color) = table.outline else {
            return;
        };
        if self.cursor <= segment_top {
            return;
        }
        self.current.ops.push(DrawOp::StrokeRect {
            x: self.geometry.margin_left,
            y: self.geometry.pdf_y(self.cursor),
            w: table.width(),
            h: self.cursor - segment_top,
            color,
            thickness: 1.0,
        });
    }

    fn finish(mut self) -> Vec<Page> {
        self.pages.push(self.current);
        self.pages
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn geometry() -> PageGeometry {
        PageGeometry::letter(50.4, 79.2)
    }

    fn paragraph(text: &str) -> Block {
        Block::Paragraph {
            text: text.to_string(),
            style: TextStyle::new(10.0, false),
            space_after: 4.0,
        }
    }

    fn text_ops(page: &Page) -> Vec<(f32, f32, &str)> {
        page.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Text { x, y, text, .. } => Some((*x, *y, text.as_str())),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_color_hex() {
        let c = Color::hex(0x1E88E5);
        assert_eq!((c.r, c.g, c.b), (30, 136, 229));
        let (r, _, b) = Color::WHITE.unit();
        assert_eq!((r, b), (1.0, 1.0));
    }

    #[test]
    fn test_empty_input_yields_one_blank_page() {
        let pages = layout_blocks(&geometry(), FontSet::BUILTIN, &[]);
        assert_eq!(pages.len(), 1);
        assert!(pages[0].ops.is_empty());
    }

    #[test]
    fn test_paragraph_starts_below_top_margin() {
        let g = geometry();
        let pages = layout_blocks(&g, FontSet::BUILTIN, &[paragraph("Hello")]);
        let ops = text_ops(&pages[0]);
        assert_eq!(ops.len(), 1);
        let (x, y, text) = ops[0];
        assert_eq!(text, "Hello");
        assert_eq!(x, g.margin_left);
        assert!(y < g.pdf_y(g.margin_top));
    }

    #[test]
    fn test_long_paragraph_wraps_within_content_width() {
        let g = geometry();
        let text = "Seven quick wins for your morning routine ".repeat(20);
        let pages = layout_blocks(&g, FontSet::BUILTIN, &[paragraph(&text)]);
        let metrics = get_metrics(FontFace::Helvetica);
        let ops = text_ops(&pages[0]);
        assert!(ops.len() > 1);
        for (_, _, line) in ops {
            assert!(metrics.measure_pt(line, 10.0) <= g.content_width());
        }
    }

    #[test]
    fn test_overflowing_content_breaks_pages_and_stays_in_margins() {
        let g = geometry();
        let blocks: Vec<Block> = (0..120).map(|i| paragraph(&format!("Line {i}"))).collect();
        let pages = layout_blocks(&g, FontSet::BUILTIN, &blocks);
        assert!(pages.len() >= 2);
        for page in &pages {
            for (_, y, _) in text_ops(page) {
                assert!(y >= g.margin_bottom, "baseline {y} below bottom margin");
                assert!(y <= g.pdf_y(g.margin_top));
            }
        }
        let total: usize = pages.iter().map(|p| text_ops(p).len()).sum();
        assert_eq!(total, 120);
    }

    #[test]
    fn test_table_rows_are_never_split_across_pages() {
        let g = geometry();
        let rows: Vec<Vec<String>> = (0..80)
            .map(|i| vec![format!("{i}"), format!("post {i}"), "note".to_string()])
            .collect();
        let table = Table::new(vec![43.2, 280.8, 187.2], rows, TextStyle::new(9.0, false));
        let pages = layout_blocks(&g, FontSet::BUILTIN, &[Block::Table(table)]);
        assert!(pages.len() >= 2);
        for page in &pages {
            let texts: Vec<&str> = page.texts().collect();
            for (i, text) in texts.iter().enumerate() {
                if let Some(n) = text.strip_prefix("post ") {
                    assert_eq!(texts[i - 1], n);
                    assert_eq!(texts[i + 1], "note");
                }
            }
        }
    }

    #[test]
    fn test_table_header_background_and_outline() {
        let mut table = Table::new(
            vec![100.0, 100.0],
            vec![
                vec!["Day".to_string(), "Post".to_string()],
                vec!["1".to_string(), "Intro".to_string()],
            ],
            TextStyle::new(9.0, false),
        );
        table.row_styles = vec![TextStyle::new(9.0, true)];
        table.header_background = Some(Color::hex(0xFFB300));
        table.outline = Some(Color::hex(0x1E88E5));
        let pages = layout_blocks(&geometry(), FontSet::BUILTIN, &[Block::Table(table)]);
        let ops = &pages[0].ops;

        assert!(matches!(ops[0], DrawOp::FillRect { color, w, .. }
            if color == Color::hex(0xFFB300) && w == 200.0));
        assert!(matches!(ops.last(), Some(DrawOp::StrokeRect { color, .. })
            if *color == Color::hex(0x1E88E5)));
        let header_face = ops.iter().find_map(|op| match op {
            DrawOp::Text { text, face, .. } if text == "Day" => Some(*face),
            _ => None,
        });
        assert_eq!(header_face, Some(FontFace::HelveticaBold));
    }

    #[test]
    fn test_unicode_font_set_is_used_for_text() {
        let pages = layout_blocks(&geometry(), FontSet::UNICODE, &[paragraph("Hi")]);
        assert!(matches!(pages[0].ops[0], DrawOp::Text { face: FontFace::DejaVuSans, .. }));
    }

    #[test]
    fn test_text_right_aligns_to_edge() {
        let op = text_right("Page 1", 561.6, 30.0, FontFace::Helvetica, 8.0, Color::BLACK);
        let DrawOp::Text { x, .. } = op else {
            panic!("expected text op");
        };
        let width = get_metrics(FontFace::Helvetica).measure_pt("Page 1", 8.0);
        assert!((x + width - 561.6).abs() < 1e-3);
    }
}
