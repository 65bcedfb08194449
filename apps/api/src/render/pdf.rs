//! Branded PDF rendering of a normalized pack.
//!
//! Two stages: `layout_pack` turns the pack into per-page draw ops (pure,
//! testable), then `paint` replays them onto a `printpdf` document.

use std::io::Write;
use std::path::Path;

use printpdf::path::PaintMode;
use printpdf::{
    BuiltinFont, Color as PdfColor, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference,
    PdfLayerReference, Pt, Rect, Rgb, TextMatrix,
};
use tempfile::NamedTempFile;

use crate::generation::pack::{ContentPack, PackRequest};
use crate::generation::vocabulary::platform_tips;
use crate::layout::flow::{
    layout_blocks, text_right, Block, Color, DrawOp, FontSet, Page, PageGeometry, Table,
    TextStyle, POINTS_PER_INCH,
};
use crate::layout::font_metrics::{get_metrics, FontFace};
use crate::render::text::sanitize_for_pdf;
use crate::render::{FontRegistry, RenderError};

pub const BRAND_NAME: &str = "TrendForge AI";
pub const WATERMARK_TEXT: &str = "Generated in Offline Mode";

const MARGIN: f32 = 0.7 * POINTS_PER_INCH;
const HEADER_HEIGHT: f32 = 0.9 * POINTS_PER_INCH;
/// Body starts a little below the header band.
const BODY_TOP: f32 = HEADER_HEIGHT + 0.2 * POINTS_PER_INCH;

const PRIMARY: Color = Color::hex(0x1E88E5);
const SECONDARY: Color = Color::hex(0xFFB300);
const COVER_BACKGROUND: Color = Color::hex(0xF5F7FA);
const GRID: Color = Color::hex(0xE0E6EF);
const FOOTER_GRAY: Color = Color::gray(128);
const WATERMARK_GRAY: Color = Color::gray(230);

const WATERMARK_SIZE: f32 = 42.0;
const WATERMARK_ANGLE_DEG: f32 = 35.0;
const LOGO_SIZE: f32 = 0.48 * POINTS_PER_INCH;
const MAX_TIPS: usize = 6;

const TITLE: TextStyle = TextStyle {
    size: 22.0,
    bold: true,
    color: Color::BLACK,
    leading: 26.0 / 22.0,
};
const BODY: TextStyle = TextStyle {
    size: 10.0,
    bold: false,
    color: Color::BLACK,
    leading: 1.4,
};
const SMALL: TextStyle = TextStyle {
    size: 8.0,
    bold: false,
    color: FOOTER_GRAY,
    leading: 11.0 / 8.0,
};
const BAR: TextStyle = TextStyle::new(12.0, true).with_color(Color::WHITE);

pub fn page_geometry() -> PageGeometry {
    PageGeometry::letter(MARGIN, BODY_TOP)
}

pub fn mode_label(ai_used: bool) -> &'static str {
    if ai_used {
        "AI Enhanced"
    } else {
        "Offline"
    }
}

/// Builds and paints the PDF. CPU-bound; run it on a blocking thread.
pub fn build_pdf(
    request: &PackRequest,
    pack: &ContentPack,
    ai_used: bool,
    generated_at: &str,
    fonts: &FontRegistry,
) -> Result<Vec<u8>, RenderError> {
    let pages = layout_pack(request, pack, ai_used, generated_at, fonts);
    paint(&pages, fonts)
}

/// Writes `bytes` to `path` through a temp file in the same directory, then
/// reads the file back.
pub fn write_and_reload(path: &Path, bytes: &[u8]) -> Result<Vec<u8>, RenderError> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(bytes)?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| RenderError::Io(e.error))?;
    Ok(std::fs::read(path)?)
}

// ────────────────────────────────────────────────────────────────────────────
// Layout
// ────────────────────────────────────────────────────────────────────────────

/// Lays out the full document: body flow plus header, footer and (offline
/// only) watermark on every page.
pub fn layout_pack(
    request: &PackRequest,
    pack: &ContentPack,
    ai_used: bool,
    generated_at: &str,
    fonts: &FontRegistry,
) -> Vec<Page> {
    let geometry = page_geometry();
    let font_set = fonts.font_set();
    let clean = |s: &str| sanitize_for_pdf(s, fonts.unicode());

    let blocks = body_blocks(request, pack, ai_used, geometry.content_width(), &clean);
    let body_pages = layout_blocks(&geometry, font_set, &blocks);

    let stamp = clean(generated_at);
    body_pages
        .into_iter()
        .enumerate()
        .map(|(index, body)| {
            let mut ops = Vec::with_capacity(body.ops.len() + 8);
            if !ai_used {
                ops.push(watermark(&geometry));
            }
            ops.extend(header_band(&geometry, font_set, &clean(BRAND_NAME), &stamp));
            ops.extend(body.ops);
            ops.push(footer(&geometry, font_set, index + 1));
            Page { ops }
        })
        .collect()
}

fn body_blocks(
    request: &PackRequest,
    pack: &ContentPack,
    ai_used: bool,
    content_width: f32,
    clean: &dyn Fn(&str) -> String,
) -> Vec<Block> {
    let platform = request.platform.title();
    let mode = mode_label(ai_used);
    let mut blocks = Vec::new();

    let mut cover = Table::new(
        vec![content_width],
        vec![
            vec![clean("Content Strategy Pack")],
            vec![clean(&format!("Topic: {}", request.topic))],
            vec![clean(&format!(
                "Niche: {}  |  Audience: {}  |  Tone: {}",
                request.niche,
                request.audience_or_default(),
                request.tone_or_default()
            ))],
            vec![clean(&format!("Platform: {platform}  |  Mode: {mode}"))],
        ],
        SMALL,
    );
    cover.row_styles = vec![TITLE, BODY];
    cover.header_background = Some(COVER_BACKGROUND);
    cover.grid = Some(GRID);
    cover.outline = Some(PRIMARY);
    cover.padding = 10.0;
    blocks.push(Block::Table(cover));
    blocks.push(Block::Spacer(0.2 * POINTS_PER_INCH));

    section(&mut blocks, content_width, &clean("Executive Summary"));
    blocks.push(paragraph(
        clean(&format!(
            "This pack includes hooks, captions, hashtags, and a 7-day plan tailored for \
             {platform} creators in the {} niche.",
            request.niche
        )),
        BODY,
    ));

    section(&mut blocks, content_width, "Hooks (10)");
    blocks.extend(numbered(&pack.hooks, clean));

    section(&mut blocks, content_width, "Captions (10)");
    blocks.extend(numbered(&pack.captions, clean));

    section(&mut blocks, content_width, "Hashtags (30)");
    let tags: Vec<String> = pack.hashtags.iter().map(|t| clean(t)).collect();
    let mut grid = Table::new(vec![content_width / 3.0; 3], hashtag_rows(&tags), BODY);
    grid.grid = Some(GRID);
    grid.padding = 5.0;
    blocks.push(Block::Table(grid));

    section(&mut blocks, content_width, "7-Day Posting Plan");
    let day_width = 0.6 * POINTS_PER_INCH;
    let post_width = 3.9 * POINTS_PER_INCH;
    let mut rows = vec![vec![
        "Day".to_string(),
        "Post Idea".to_string(),
        "Notes".to_string(),
    ]];
    rows.extend(
        pack.plan
            .iter()
            .map(|item| vec![item.day.to_string(), clean(&item.post), clean(&item.note)]),
    );
    let mut plan = Table::new(
        vec![day_width, post_width, content_width - day_width - post_width],
        rows,
        BODY,
    );
    plan.row_styles = vec![TextStyle { bold: true, ..BODY }];
    plan.header_background = Some(SECONDARY);
    plan.grid = Some(GRID);
    blocks.push(Block::Table(plan));

    section(&mut blocks, content_width, &format!("{platform} Tips"));
    for tip in platform_tips(request.platform).iter().take(MAX_TIPS) {
        blocks.push(paragraph(clean(&format!("\u{2022} {tip}")), BODY));
    }

    section(&mut blocks, content_width, "Appendix");
    blocks.push(paragraph(
        clean(&format!("Mode: {mode}. Generated by {BRAND_NAME}.")),
        SMALL,
    ));

    blocks
}

/// Full-width primary bar with a white title.
fn section(blocks: &mut Vec<Block>, content_width: f32, title: &str) {
    let mut bar = Table::new(vec![content_width], vec![vec![title.to_string()]], BAR);
    bar.header_background = Some(PRIMARY);
    bar.padding = 6.0;
    blocks.push(Block::Spacer(0.08 * POINTS_PER_INCH));
    blocks.push(Block::Table(bar));
    blocks.push(Block::Spacer(0.12 * POINTS_PER_INCH));
}

fn paragraph(text: String, style: TextStyle) -> Block {
    Block::Paragraph {
        text,
        style,
        space_after: 2.0,
    }
}

fn numbered<'a>(
    items: &'a [String],
    clean: &'a dyn Fn(&str) -> String,
) -> impl Iterator<Item = Block> + 'a {
    items
        .iter()
        .enumerate()
        .map(move |(i, item)| paragraph(clean(&format!("{}. {}", i + 1, item)), BODY))
}

/// Three tags per row; the last row is padded with empty cells.
pub(crate) fn hashtag_rows(tags: &[String]) -> Vec<Vec<String>> {
    tags.chunks(3)
        .map(|chunk| {
            let mut row = chunk.to_vec();
            row.resize(3, String::new());
            row
        })
        .collect()
}

fn watermark(geometry: &PageGeometry) -> DrawOp {
    let face = FontFace::Helvetica;
    let half_width = get_metrics(face).measure_pt(WATERMARK_TEXT, WATERMARK_SIZE) / 2.0;
    let angle = WATERMARK_ANGLE_DEG.to_radians();
    DrawOp::RotatedText {
        x: geometry.width / 2.0 - half_width * angle.cos(),
        y: geometry.height / 2.0 - half_width * angle.sin(),
        text: WATERMARK_TEXT.to_string(),
        face,
        size: WATERMARK_SIZE,
        color: WATERMARK_GRAY,
        angle_deg: WATERMARK_ANGLE_DEG,
    }
}

fn header_band(geometry: &PageGeometry, fonts: FontSet, brand: &str, stamp: &str) -> Vec<DrawOp> {
    let band_bottom = geometry.height - HEADER_HEIGHT;
    let logo_bottom = band_bottom + (HEADER_HEIGHT - LOGO_SIZE) / 2.0;
    let baseline = geometry.height - 0.55 * POINTS_PER_INCH;

    let monogram_size = 14.0;
    let monogram_width = get_metrics(fonts.bold).measure_pt("TF", monogram_size);

    vec![
        DrawOp::FillRect {
            x: 0.0,
            y: band_bottom,
            w: geometry.width,
            h: HEADER_HEIGHT,
            color: PRIMARY,
        },
        DrawOp::FillRect {
            x: geometry.margin_left,
            y: logo_bottom,
            w: LOGO_SIZE,
            h: LOGO_SIZE,
            color: Color::WHITE,
        },
        DrawOp::Text {
            x: geometry.margin_left + (LOGO_SIZE - monogram_width) / 2.0,
            y: logo_bottom + LOGO_SIZE / 2.0 - monogram_size * 0.35,
            text: "TF".to_string(),
            face: fonts.bold,
            size: monogram_size,
            color: PRIMARY,
        },
        DrawOp::Text {
            x: geometry.margin_left + LOGO_SIZE + 10.0,
            y: baseline,
            text: brand.to_string(),
            face: fonts.bold,
            size: 13.0,
            color: Color::WHITE,
        },
        text_right(
            stamp,
            geometry.width - geometry.margin_right,
            baseline,
            fonts.regular,
            9.0,
            Color::WHITE,
        ),
    ]
}

fn footer(geometry: &PageGeometry, fonts: FontSet, page_number: usize) -> DrawOp {
    text_right(
        &format!("Page {page_number}"),
        geometry.width - geometry.margin_right,
        0.5 * POINTS_PER_INCH,
        fonts.regular,
        8.0,
        FOOTER_GRAY,
    )
}

// ────────────────────────────────────────────────────────────────────────────
// Painting
// ────────────────────────────────────────────────────────────────────────────

struct LoadedFonts {
    helvetica: IndirectFontRef,
    helvetica_bold: IndirectFontRef,
    /// (regular, bold) when the Unicode TTFs are available.
    dejavu: Option<(IndirectFontRef, IndirectFontRef)>,
}

impl LoadedFonts {
    fn load(doc: &PdfDocumentReference, registry: &FontRegistry) -> Result<Self, RenderError> {
        let helvetica = doc.add_builtin_font(BuiltinFont::Helvetica).map_err(pdf_error)?;
        let helvetica_bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(pdf_error)?;

        let dejavu = match registry.unicode_fonts() {
            Some(ttf) => {
                let regular = doc
                    .add_external_font(ttf.regular.as_slice())
                    .map_err(pdf_error)?;
                let bold = doc
                    .add_external_font(ttf.bold.as_slice())
                    .map_err(pdf_error)?;
                Some((regular, bold))
            }
            None => None,
        };

        Ok(Self {
            helvetica,
            helvetica_bold,
            dejavu,
        })
    }

    fn get(&self, face: FontFace) -> &IndirectFontRef {
        match (face, &self.dejavu) {
            (FontFace::DejaVuSans, Some((regular, _))) => regular,
            (FontFace::DejaVuSansBold, Some((_, bold))) => bold,
            (face, _) if face.is_bold() => &self.helvetica_bold,
            _ => &self.helvetica,
        }
    }
}

/// Loads `bytes` into a scratch document, failing the way `paint` would.
pub(crate) fn check_font(bytes: &[u8]) -> Result<(), RenderError> {
    PdfDocument::empty("font check")
        .add_external_font(bytes)
        .map(|_| ())
        .map_err(pdf_error)
}

fn mm(points: f32) -> Mm {
    Mm(points * 25.4 / POINTS_PER_INCH)
}

fn pdf_color(color: Color) -> PdfColor {
    let (r, g, b) = color.unit();
    PdfColor::Rgb(Rgb::new(r, g, b, None))
}

fn pdf_error(e: impl std::fmt::Display) -> RenderError {
    RenderError::Pdf(e.to_string())
}

/// Replays laid-out pages onto a new document and serializes it.
pub fn paint(pages: &[Page], registry: &FontRegistry) -> Result<Vec<u8>, RenderError> {
    let geometry = page_geometry();
    let (width, height) = (mm(geometry.width), mm(geometry.height));
    let (doc, first_page, first_layer) = PdfDocument::new(BRAND_NAME, width, height, "Layer 1");
    let fonts = LoadedFonts::load(&doc, registry)?;

    for (index, page) in pages.iter().enumerate() {
        let (page_index, layer_index) = if index == 0 {
            (first_page, first_layer)
        } else {
            doc.add_page(width, height, "Layer 1")
        };
        let layer = doc.get_page(page_index).get_layer(layer_index);
        for op in &page.ops {
            draw(&layer, &fonts, op);
        }
    }

    doc.save_to_bytes().map_err(pdf_error)
}

fn draw(layer: &PdfLayerReference, fonts: &LoadedFonts, op: &DrawOp) {
    match op {
        DrawOp::FillRect { x, y, w, h, color } => {
            layer.set_fill_color(pdf_color(*color));
            layer.add_rect(
                Rect::new(mm(*x), mm(*y), mm(x + w), mm(y + h)).with_mode(PaintMode::Fill),
            );
        }
        DrawOp::StrokeRect {
            x,
            y,
            w,
            h,
            color,
            thickness,
        } => {
            layer.set_outline_color(pdf_color(*color));
            layer.set_outline_thickness(*thickness);
            layer.add_rect(
                Rect::new(mm(*x), mm(*y), mm(x + w), mm(y + h)).with_mode(PaintMode::Stroke),
            );
        }
        DrawOp::Text {
            x,
            y,
            text,
            face,
            size,
            color,
        } => {
            layer.set_fill_color(pdf_color(*color));
            layer.use_text(text.as_str(), *size, mm(*x), mm(*y), fonts.get(*face));
        }
        DrawOp::RotatedText {
            x,
            y,
            text,
            face,
            size,
            color,
            angle_deg,
        } => {
            let font = fonts.get(*face);
            layer.set_fill_color(pdf_color(*color));
            layer.begin_text_section();
            layer.set_font(font, *size);
            layer.set_text_matrix(TextMatrix::TranslateRotate(Pt(*x), Pt(*y), *angle_deg));
            layer.write_text(text.as_str(), font);
            layer.end_text_section();
        }
    }
}
