//! # File Management Module
//!
//! Questo modulo gestisce le operazioni sui file attorno all'esecuzione di oxipng.
//!
//! ## Responsabilità:
//! - Riconoscimento dei PNG (estensione, case-insensitive)
//! - Raccolta ricorsiva degli originali in modalità directory
//! - Rimozione degli originali dopo una compressione riuscita
//! - Utilità per dimensioni e percentuali di riduzione
//!
//! ## Raccolta originali:
//! I PNG che si trovano sotto la directory di destinazione vengono esclusi,
//! perché la destinazione di default vive dentro la cartella degli screenshot.
//!
//! ## Esempio:
//! ```ignore
//! let originals = FileManager::find_pngs(&source, &destination);
//! FileManager::remove_files(&originals).await?;
//! ```

use crate::error::CompressError;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;
use walkdir::WalkDir;

/// Manages file operations around an optimizer run
pub struct FileManager;

impl FileManager {
    /// Check if a path names a PNG file
    pub fn is_png(path: &Path) -> bool {
        path.extension()
            .map(|ext| ext.to_string_lossy().eq_ignore_ascii_case("png"))
            .unwrap_or(false)
    }

    /// Find all PNG files under `dir`, skipping anything inside `exclude`.
    /// The walk root itself is never excluded, so `dir` may live inside `exclude`.
    pub fn find_pngs(dir: &Path, exclude: &Path) -> Vec<PathBuf> {
        WalkDir::new(dir)
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !e.path().starts_with(exclude))
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file() && Self::is_png(e.path()))
            .map(|e| e.into_path())
            .collect()
    }

    /// Size of a file in bytes, if it can be read
    pub async fn file_size(path: &Path) -> Option<u64> {
        fs::metadata(path).await.ok().map(|m| m.len())
    }

    /// Remove a single original
    pub async fn remove_file(path: &Path) -> Result<(), CompressError> {
        debug!("Removing {}", path.display());
        fs::remove_file(path).await.map_err(|source| CompressError::Cleanup {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Remove every file in `paths`, stopping at the first failure
    pub async fn remove_files(paths: &[PathBuf]) -> Result<usize, CompressError> {
        for path in paths {
            Self::remove_file(path).await?;
        }
        Ok(paths.len())
    }

    /// Get human-readable file size
    pub fn format_size(size: u64) -> String {
        const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
        let mut size = size as f64;
        let mut unit_index = 0;

        while size >= 1024.0 && unit_index < UNITS.len() - 1 {
            size /= 1024.0;
            unit_index += 1;
        }

        if unit_index == 0 {
            format!("{} {}", size as u64, UNITS[unit_index])
        } else {
            format!("{:.2} {}", size, UNITS[unit_index])
        }
    }

    /// Calculate percentage reduction
    pub fn calculate_reduction(original_size: u64, new_size: u64) -> f64 {
        if original_size == 0 {
            0.0
        } else {
            ((original_size as f64 - new_size as f64) / original_size as f64) * 100.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_is_png() {
        assert!(FileManager::is_png(Path::new("/shots/a.png")));
        assert!(FileManager::is_png(Path::new("/shots/A.PNG")));
        assert!(!FileManager::is_png(Path::new("/shots/a.jpg")));
        assert!(!FileManager::is_png(Path::new("/shots/png")));
        assert!(!FileManager::is_png(Path::new("/shots")));
    }

    #[test]
    fn test_find_pngs_skips_destination() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        let nested = root.join("2024");
        let compressed = root.join("Compressed");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::create_dir_all(&compressed).unwrap();

        std::fs::write(root.join("one.png"), b"png").unwrap();
        std::fs::write(nested.join("two.PNG"), b"png").unwrap();
        std::fs::write(root.join("notes.txt"), b"txt").unwrap();
        std::fs::write(compressed.join("one.png"), b"png").unwrap();

        let mut found = FileManager::find_pngs(root, &compressed);
        found.sort();
        assert_eq!(found, vec![nested.join("two.PNG"), root.join("one.png")]);
    }

    #[test]
    fn test_find_pngs_source_inside_destination() {
        let temp_dir = TempDir::new().unwrap();
        let out = temp_dir.path().join("out");
        let shots = out.join("shots");
        std::fs::create_dir_all(&shots).unwrap();
        std::fs::write(shots.join("a.png"), b"png").unwrap();
        std::fs::write(out.join("a.png"), b"png").unwrap();

        let found = FileManager::find_pngs(&shots, &out);
        assert_eq!(found, vec![shots.join("a.png")]);
    }

    #[tokio::test]
    async fn test_remove_missing_file_is_cleanup_error() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("gone.png");
        let err = FileManager::remove_file(&missing).await.unwrap_err();
        assert!(matches!(err, CompressError::Cleanup { .. }));
    }

    #[tokio::test]
    async fn test_remove_files() {
        let temp_dir = TempDir::new().unwrap();
        let a = temp_dir.path().join("a.png");
        let b = temp_dir.path().join("b.png");
        std::fs::write(&a, b"a").unwrap();
        std::fs::write(&b, b"b").unwrap();

        let removed = FileManager::remove_files(&[a.clone(), b.clone()]).await.unwrap();
        assert_eq!(removed, 2);
        assert!(!a.exists());
        assert!(!b.exists());
    }

    #[test]
    fn test_format_size() {
        assert_eq!(FileManager::format_size(512), "512 B");
        assert_eq!(FileManager::format_size(2048), "2.00 KB");
        assert_eq!(FileManager::format_size(5 * 1024 * 1024), "5.00 MB");
    }

    #[test]
    fn test_calculate_reduction() {
        assert_eq!(FileManager::calculate_reduction(0, 10), 0.0);
        assert_eq!(FileManager::calculate_reduction(200, 150), 25.0);
    }
}
