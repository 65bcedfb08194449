// Rendering of a normalized pack into Markdown, PDF and bulk zip archives.
// PDF layout is CPU-bound: callers run `pdf::build_pdf` inside spawn_blocking.

pub mod archive;
pub mod markdown;
pub mod pdf;
pub mod text;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use thiserror::Error;
use tracing::{info, warn};

use crate::config::Config;
use crate::layout::flow::FontSet;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("PDF backend error: {0}")]
    Pdf(String),

    #[error("could not load font {path}: {source}")]
    Font {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("font {path} is not usable: {reason}")]
    InvalidFont { path: PathBuf, reason: String },

    #[error("file error: {0}")]
    Io(#[from] std::io::Error),

    #[error("archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("render task failed: {0}")]
    Task(String),
}

impl From<tokio::task::JoinError> for RenderError {
    fn from(e: tokio::task::JoinError) -> Self {
        RenderError::Task(e.to_string())
    }
}

/// TTF fonts for the PDF, read and parsed once at startup.
///
/// When either DejaVu file is missing or is not a font printpdf can load,
/// the renderer uses the built-in Helvetica pair and ASCII-folds smart
/// punctuation.
#[derive(Clone)]
pub struct FontRegistry {
    unicode: Option<UnicodeFonts>,
}

/// Raw bytes of the validated regular and bold TTFs.
#[derive(Clone)]
pub struct UnicodeFonts {
    pub regular: Arc<Vec<u8>>,
    pub bold: Arc<Vec<u8>>,
}

impl FontRegistry {
    pub fn detect(config: &Config) -> Self {
        let regular = &config.font_regular_path;
        let bold = &config.font_bold_path;
        match (read_font(regular), read_font(bold)) {
            (Ok(regular_bytes), Ok(bold_bytes)) => {
                info!("PDF fonts: {} / {}", regular.display(), bold.display());
                Self {
                    unicode: Some(UnicodeFonts {
                        regular: Arc::new(regular_bytes),
                        bold: Arc::new(bold_bytes),
                    }),
                }
            }
            (Err(e), _) | (_, Err(e)) => {
                warn!("{e}; falling back to Helvetica");
                Self { unicode: None }
            }
        }
    }

    /// Registry that always draws with the built-in fonts.
    #[cfg(test)]
    pub fn builtin() -> Self {
        Self { unicode: None }
    }

    pub fn unicode(&self) -> bool {
        self.unicode.is_some()
    }

    pub fn unicode_fonts(&self) -> Option<&UnicodeFonts> {
        self.unicode.as_ref()
    }

    pub fn font_set(&self) -> FontSet {
        if self.unicode() {
            FontSet::UNICODE
        } else {
            FontSet::BUILTIN
        }
    }
}

fn read_font(path: &Path) -> Result<Vec<u8>, RenderError> {
    let bytes = std::fs::read(path).map_err(|source| RenderError::Font {
        path: path.to_path_buf(),
        source,
    })?;
    pdf::check_font(&bytes).map_err(|e| RenderError::InvalidFont {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::normalize::normalize_pack;
    use crate::generation::offline::offline_generate;
    use crate::generation::pack::{PackRequest, Platform};
    use crate::layout::font_metrics::FontFace;

    #[test]
    fn test_missing_fonts_fall_back_to_builtin() {
        let config = Config::for_tests(PathBuf::from("/tmp"));
        let fonts = FontRegistry::detect(&config);
        assert!(!fonts.unicode());
        assert_eq!(fonts.font_set().regular, FontFace::Helvetica);
    }

    #[test]
    fn test_unparseable_fonts_fall_back_to_builtin() {
        let dir = tempfile::tempdir().unwrap();
        let regular = dir.path().join("r.ttf");
        let bold = dir.path().join("b.ttf");
        std::fs::write(&regular, b"not a font").unwrap();
        std::fs::write(&bold, b"not a font").unwrap();

        let mut config = Config::for_tests(dir.path().to_path_buf());
        config.font_regular_path = regular;
        config.font_bold_path = bold;
        let fonts = FontRegistry::detect(&config);
        assert!(!fonts.unicode());
        assert!(fonts.unicode_fonts().is_none());
        assert_eq!(fonts.font_set().bold, FontFace::HelveticaBold);

        let request = PackRequest::new("study hacks", "school", "", "", Platform::Tiktok);
        let pack = normalize_pack(offline_generate(&request));
        let bytes = pdf::build_pdf(&request, &pack, false, "2025-09-14 08:05", &fonts).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_read_font_reports_invalid_data() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("r.ttf");
        std::fs::write(&path, b"stub").unwrap();
        assert!(matches!(
            read_font(&path),
            Err(RenderError::InvalidFont { .. })
        ));
        assert!(matches!(
            read_font(&dir.path().join("missing.ttf")),
            Err(RenderError::Font { .. })
        ));
    }

    #[test]
    fn test_render_error_messages() {
        let e = RenderError::Pdf("bad font".to_string());
        assert_eq!(e.to_string(), "PDF backend error: bad font");
    }
}
