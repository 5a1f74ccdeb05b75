//! # Path Resolution Module
//!
//! Centralizza il calcolo dei path di output e il controllo di freschezza.
//!
//! ```text
//! Input:  <root>/photos/2023/IMG_001.JPG
//! Output: <output_base>/photos/2023/IMG_001.webp
//! ```

use anyhow::Result;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Extension of every converted file
pub const OUTPUT_EXTENSION: &str = "webp";

/// Utility per calcolare i path di output in modo centralizzato
pub struct PathResolver;

impl PathResolver {
    /// Calcola il path di output: struttura relativa preservata, estensione `.webp`
    pub fn get_output_path(input_path: &Path, root_dir: &Path, output_base: &Path) -> Result<PathBuf> {
        let relative_path = input_path.strip_prefix(root_dir).map_err(|_| {
            anyhow::anyhow!(
                "{} is not inside input directory {}",
                input_path.display(),
                root_dir.display()
            )
        })?;

        if relative_path.file_name().is_none() {
            return Err(anyhow::anyhow!("Invalid file name: {}", input_path.display()));
        }

        let result = output_base.join(relative_path).with_extension(OUTPUT_EXTENSION);
        debug!("Resolved output path: {} -> {}", input_path.display(), result.display());

        Ok(result)
    }

    /// Crea le directory parent se necessario (idempotente)
    pub async fn ensure_parent_dirs(path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                anyhow::anyhow!("Failed to create parent directories for {}: {}", path.display(), e)
            })?;
        }
        Ok(())
    }

    /// True when `output_path` exists and was modified strictly after `input_path`.
    ///
    /// Confronto sui modification time, non sul contenuto: un input modificato
    /// senza far avanzare l'mtime (o con clock skew) non viene riconvertito.
    pub async fn is_up_to_date(input_path: &Path, output_path: &Path) -> bool {
        let output_modified = match tokio::fs::metadata(output_path).await.and_then(|m| m.modified()) {
            Ok(modified) => modified,
            Err(_) => return false,
        };

        match tokio::fs::metadata(input_path).await.and_then(|m| m.modified()) {
            Ok(input_modified) => output_modified > input_modified,
            Err(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::time::{Duration, SystemTime};
    use tempfile::TempDir;

    fn write_with_mtime(path: &Path, modified: SystemTime) {
        std::fs::write(path, b"data").unwrap();
        File::options()
            .write(true)
            .open(path)
            .unwrap()
            .set_modified(modified)
            .unwrap();
    }

    #[test]
    fn test_output_path_mirrors_structure() {
        let root = Path::new("/data/images");
        let output_base = Path::new("/data/images/Processed_Images");

        let output = PathResolver::get_output_path(
            Path::new("/data/images/trips/2023/IMG_001.JPG"),
            root,
            output_base,
        )
        .unwrap();

        assert_eq!(output, PathBuf::from("/data/images/Processed_Images/trips/2023/IMG_001.webp"));
    }

    #[test]
    fn test_output_path_replaces_only_last_extension() {
        let output = PathResolver::get_output_path(
            Path::new("/in/archive.v2.tiff"),
            Path::new("/in"),
            Path::new("/out"),
        )
        .unwrap();

        assert_eq!(output, PathBuf::from("/out/archive.v2.webp"));
    }

    #[test]
    fn test_output_path_outside_root_is_error() {
        let result = PathResolver::get_output_path(Path::new("/elsewhere/a.png"), Path::new("/in"), Path::new("/out"));
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_ensure_parent_dirs_is_idempotent() {
        let temp_dir = TempDir::new().unwrap();
        let output = temp_dir.path().join("a/b/c/image.webp");

        PathResolver::ensure_parent_dirs(&output).await.unwrap();
        PathResolver::ensure_parent_dirs(&output).await.unwrap();
        assert!(temp_dir.path().join("a/b/c").is_dir());
    }

    #[tokio::test]
    async fn test_missing_output_is_not_up_to_date() {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.path().join("a.png");
        std::fs::write(&input, b"data").unwrap();

        assert!(!PathResolver::is_up_to_date(&input, &temp_dir.path().join("a.webp")).await);
    }

    #[tokio::test]
    async fn test_newer_output_is_up_to_date() {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.path().join("a.png");
        let output = temp_dir.path().join("a.webp");
        let now = SystemTime::now();
        write_with_mtime(&input, now - Duration::from_secs(3600));
        write_with_mtime(&output, now);

        assert!(PathResolver::is_up_to_date(&input, &output).await);
    }

    #[tokio::test]
    async fn test_older_or_equal_output_is_stale() {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.path().join("a.png");
        let output = temp_dir.path().join("a.webp");
        let now = SystemTime::now();

        write_with_mtime(&input, now);
        write_with_mtime(&output, now - Duration::from_secs(60));
        assert!(!PathResolver::is_up_to_date(&input, &output).await);

        write_with_mtime(&output, now);
        assert!(!PathResolver::is_up_to_date(&input, &output).await);
    }
}
