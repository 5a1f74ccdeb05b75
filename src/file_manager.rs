//! # File Management Module
//!
//! Questo modulo gestisce la discovery delle immagini e le utilità sui file.
//!
//! ## Responsabilità:
//! - Discovery ricorsiva delle immagini sotto una directory radice
//! - Filtro per estensione (case-insensitive) sui formati supportati
//! - Esclusione della directory di output se si trova dentro la radice
//! - Utilità per percentuali di riduzione e dimensioni human-readable
//!
//! ## Formati supportati:
//! - **Input**: JPG, JPEG, PNG, BMP, TIFF, TIF
//! - **Esclusi**: GIF (e qualsiasi altra estensione), mai considerati
//!
//! ## Errori:
//! - Radice mancante o illeggibile: errore fatale, restituito al chiamante
//! - Sottodirectory illeggibili: loggate e saltate
//!
//! ## Esempio:
//! ```rust,no_run
//! use std::path::Path;
//! use webp_batch_converter::file_manager::FileManager;
//!
//! let root = Path::new("/path/to/images");
//! let files = FileManager::find_image_files(root, Some(&root.join("Processed_Images")))?;
//! # Ok::<(), anyhow::Error>(())
//! ```

use anyhow::Result;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Extensions picked up by the scanner, compared case-insensitively
pub const SUPPORTED_EXTENSIONS: [&str; 6] = ["jpg", "jpeg", "png", "bmp", "tiff", "tif"];

/// Manages file operations and discovery
pub struct FileManager;

impl FileManager {
    /// Find all supported images under `root_dir`, skipping `exclude_dir`.
    pub fn find_image_files(root_dir: &Path, exclude_dir: Option<&Path>) -> Result<Vec<PathBuf>> {
        let root_metadata = std::fs::metadata(root_dir)
            .map_err(|e| anyhow::anyhow!("Cannot read input directory {}: {}", root_dir.display(), e))?;
        if !root_metadata.is_dir() {
            return Err(anyhow::anyhow!("Input path is not a directory: {}", root_dir.display()));
        }

        let mut files = Vec::new();

        let walker = WalkDir::new(root_dir)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| match exclude_dir {
                Some(excluded) => entry.depth() == 0 || entry.path() != excluded,
                None => true,
            });

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) if e.depth() == 0 => {
                    return Err(anyhow::anyhow!("Cannot read input directory {}: {}", root_dir.display(), e));
                }
                Err(e) => {
                    warn!("Skipping unreadable entry: {}", e);
                    continue;
                }
            };

            if entry.file_type().is_file() && Self::is_supported_format(entry.path()) {
                files.push(entry.into_path());
            }
        }

        debug!("Found {} candidate images under {}", files.len(), root_dir.display());
        Ok(files)
    }

    /// Check if a file format is supported
    pub fn is_supported_format(path: &Path) -> bool {
        if let Some(ext) = path.extension() {
            let ext_lower = ext.to_string_lossy().to_lowercase();
            SUPPORTED_EXTENSIONS.contains(&ext_lower.as_str())
        } else {
            false
        }
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
            format!("{:.1} {}", size, UNITS[unit_index])
        }
    }

    /// Calculate percentage reduction, `(1 - new/original) * 100`
    pub fn calculate_reduction(original_size: u64, new_size: u64) -> f64 {
        if original_size == 0 {
            0.0
        } else {
            (1.0 - new_size as f64 / original_size as f64) * 100.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn touch(path: &Path) {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(path, b"x").unwrap();
    }

    #[test]
    fn test_supported_formats_case_insensitive() {
        for name in ["a.jpg", "a.JPG", "a.jpeg", "a.Png", "a.bmp", "a.TIFF", "a.tif"] {
            assert!(FileManager::is_supported_format(Path::new(name)), "{}", name);
        }
        for name in ["a.gif", "a.GIF", "a.webp", "a.txt", "jpg", "a"] {
            assert!(!FileManager::is_supported_format(Path::new(name)), "{}", name);
        }
    }

    #[test]
    fn test_find_image_files_recursive() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        touch(&root.join("a.jpg"));
        touch(&root.join("nested/deeper/b.PNG"));
        touch(&root.join("nested/c.tif"));
        touch(&root.join("nested/anim.gif"));
        touch(&root.join("notes.txt"));

        let files = FileManager::find_image_files(root, None).unwrap();
        let mut relative: Vec<_> = files
            .iter()
            .map(|p| p.strip_prefix(root).unwrap().to_path_buf())
            .collect();
        relative.sort();

        assert_eq!(
            relative,
            vec![
                PathBuf::from("a.jpg"),
                PathBuf::from("nested/c.tif"),
                PathBuf::from("nested/deeper/b.PNG"),
            ]
        );
    }

    #[test]
    fn test_find_image_files_skips_output_dir() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        let output = root.join("Processed_Images");
        touch(&root.join("keep.jpg"));
        touch(&output.join("stray.jpg"));

        let files = FileManager::find_image_files(root, Some(&output)).unwrap();
        assert_eq!(files, vec![root.join("keep.jpg")]);
    }

    #[test]
    fn test_find_image_files_missing_root() {
        let temp_dir = TempDir::new().unwrap();
        let result = FileManager::find_image_files(&temp_dir.path().join("nope"), None);
        assert!(result.is_err());
    }

    #[test]
    fn test_find_image_files_root_is_file() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("a.jpg");
        touch(&file);
        assert!(FileManager::find_image_files(&file, None).is_err());
    }

    #[test]
    fn test_calculate_reduction() {
        assert_eq!(FileManager::calculate_reduction(1000, 250), 75.0);
        assert_eq!(FileManager::calculate_reduction(1000, 1000), 0.0);
        assert_eq!(FileManager::calculate_reduction(1000, 1500), -50.0);
        assert_eq!(FileManager::calculate_reduction(0, 10), 0.0);
    }

    #[test]
    fn test_format_size() {
        assert_eq!(FileManager::format_size(512), "512 B");
        assert_eq!(FileManager::format_size(1536), "1.5 KB");
        assert_eq!(FileManager::format_size(5 * 1024 * 1024), "5.0 MB");
    }
}
