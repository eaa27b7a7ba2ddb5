//! File-system access for SVG-subset documents.

use super::{StorageError, StorageResult};
use crate::shapes::Shape;
use crate::svg::parse_document;
use std::fs;
use std::path::Path;

/// Read and parse a document.
///
/// Fails without side effects when the file is missing, unreadable, or
/// contains no recognizable shapes.
pub fn read_document(path: &Path) -> StorageResult<Vec<Shape>> {
    if !path.exists() {
        return Err(StorageError::NotFound(path.display().to_string()));
    }
    let text = fs::read_to_string(path)
        .map_err(|e| StorageError::Io(format!("Failed to read {}: {}", path.display(), e)))?;
    Ok(parse_document(&text)?)
}

/// Write serialized document text.
pub fn write_document(path: &Path, contents: &str) -> StorageResult<()> {
    fs::write(path, contents)
        .map_err(|e| StorageError::Io(format!("Failed to write {}: {}", path.display(), e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::svg::SvgError;
    use tempfile::tempdir;

    #[test]
    fn test_write_then_read() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("doc.svg");
        let contents = "<svg width=\"10\" height=\"10\" xmlns=\"http://www.w3.org/2000/svg\">\n  <rect x=\"1\" y=\"2\" width=\"3\" height=\"4\" fill=\"none\" stroke=\"#000000\" stroke-width=\"1\"/>\n</svg>\n";
        write_document(&path, contents).unwrap();
        let shapes = read_document(&path).unwrap();
        assert_eq!(shapes.len(), 1);
    }

    #[test]
    fn test_read_missing_file() {
        let dir = tempdir().unwrap();
        let result = read_document(&dir.path().join("missing.svg"));
        assert!(matches!(result, Err(StorageError::NotFound(_))));
    }

    #[test]
    fn test_read_empty_document() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("empty.svg");
        write_document(&path, "<svg></svg>").unwrap();
        assert!(matches!(
            read_document(&path),
            Err(StorageError::Parse(SvgError::Empty))
        ));
    }

    #[test]
    fn test_write_to_missing_directory_fails() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("no").join("such").join("doc.svg");
        assert!(matches!(write_document(&path, "x"), Err(StorageError::Io(_))));
    }
}
