//! Zip bundle for bulk runs.

use std::io::{Cursor, Write};

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::render::RenderError;

/// One file inside the archive.
#[derive(Debug, Clone)]
pub struct ArchiveEntry {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl ArchiveEntry {
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }
}

/// Deflate-compresses `entries` into an in-memory zip, in order.
pub fn build_archive(entries: &[ArchiveEntry]) -> Result<Vec<u8>, RenderError> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for entry in entries {
        writer.start_file(entry.name.as_str(), options)?;
        writer.write_all(&entry.bytes)?;
    }

    Ok(writer.finish()?.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;
    use zip::ZipArchive;

    #[test]
    fn test_archive_contains_every_entry_in_order() {
        let entries = vec![
            ArchiveEntry::new("TrendForge_tiktok_a.md", "# Content Pack"),
            ArchiveEntry::new("TrendForge_tiktok_a.pdf", b"%PDF-1.3".to_vec()),
        ];
        let bytes = build_archive(&entries).unwrap();

        let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        assert_eq!(archive.len(), 2);

        let mut md = String::new();
        archive
            .by_index(0)
            .unwrap()
            .read_to_string(&mut md)
            .unwrap();
        assert_eq!(md, "# Content Pack");
        assert_eq!(archive.by_index(1).unwrap().name(), "TrendForge_tiktok_a.pdf");
    }

    #[test]
    fn test_empty_archive_is_valid() {
        let bytes = build_archive(&[]).unwrap();
        let archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        assert_eq!(archive.len(), 0);
    }
}
