//! File reading utilities

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// File reader with UTF-8 validation
pub struct FileReader;

impl FileReader {
    /// Read a file as UTF-8 text
    pub fn read_text(path: &Path) -> Result<String> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read file: {}", path.display()))?;

        // Files exported on Windows often carry a BOM
        Ok(match content.strip_prefix('\u{feff}') {
            Some(stripped) => stripped.to_string(),
            None => content,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_read_text_success() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("posts.txt");

        let content = "밥 먹었음? ㅋㅋㅋ\n응 먹었어";
        fs::write(&file_path, content).unwrap();

        assert_eq!(FileReader::read_text(&file_path).unwrap(), content);
    }

    #[test]
    fn test_read_text_strips_bom() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("bom.txt");
        fs::write(&file_path, "\u{feff}안녕").unwrap();

        assert_eq!(FileReader::read_text(&file_path).unwrap(), "안녕");
    }

    #[test]
    fn test_read_text_nonexistent_file() {
        let result = FileReader::read_text(Path::new("/nonexistent/file.txt"));
        let err_msg = result.unwrap_err().to_string();
        assert!(err_msg.contains("Failed to read file"));
    }
}
