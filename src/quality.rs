//! # Quality Policy Module
//!
//! Sceglie la qualità WebP di ogni immagine.
//!
//! ## Regola (la prima che corrisponde vince):
//! 1. Il nome file (case-insensitive) contiene una parola chiave da
//!    thumbnail/hero (`thumb`, `thumbnail`, `banner`, `hero`, `large`,
//!    `cover`, `featured`) → `High`
//! 2. `width * height > 800 * 600` → `High`
//! 3. Altrimenti → `Standard`
//!
//! Le immagini "in vetrina" vengono viste grandi e gli artefatti di
//! compressione si notano di più: per loro si usa una qualità più alta.
//!
//! ## Esempio:
//! ```rust
//! use webp_batch_converter::quality::{QualitySettings, QualityTier};
//!
//! let tier = QualityTier::decide("hero-image.png", 320, 200);
//! assert_eq!(tier, QualityTier::High);
//! assert_eq!(QualitySettings::default().value_for(tier), 85);
//! ```

use serde::Serialize;

/// Filename fragments that mark an image as thumbnail/hero material
pub const THUMBNAIL_KEYWORDS: [&str; 7] = [
    "thumb",
    "thumbnail",
    "banner",
    "hero",
    "large",
    "cover",
    "featured",
];

/// Images with more pixels than this (800x600) get the high tier
pub const HIGH_QUALITY_PIXEL_THRESHOLD: u64 = 800 * 600;

pub const DEFAULT_STANDARD_QUALITY: u8 = 75;
pub const DEFAULT_HIGH_QUALITY: u8 = 85;

/// Two-valued quality classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum QualityTier {
    Standard,
    High,
}

impl QualityTier {
    /// Classify an image from its file name and pixel dimensions.
    pub fn decide(filename: &str, width: u32, height: u32) -> Self {
        let filename_lower = filename.to_lowercase();

        if THUMBNAIL_KEYWORDS
            .iter()
            .any(|keyword| filename_lower.contains(keyword))
        {
            return Self::High;
        }

        let total_pixels = u64::from(width) * u64::from(height);
        if total_pixels > HIGH_QUALITY_PIXEL_THRESHOLD {
            return Self::High;
        }

        Self::Standard
    }

    /// Descrizione per il logging
    pub fn description(&self) -> &'static str {
        match self {
            Self::Standard => "standard quality",
            Self::High => "high quality (thumbnail/large image)",
        }
    }
}

/// Numeric WebP quality for each tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct QualitySettings {
    pub standard: u8,
    pub high: u8,
}

impl Default for QualitySettings {
    fn default() -> Self {
        Self {
            standard: DEFAULT_STANDARD_QUALITY,
            high: DEFAULT_HIGH_QUALITY,
        }
    }
}

impl QualitySettings {
    pub fn new(standard: u8, high: u8) -> Self {
        Self { standard, high }
    }

    pub fn value_for(&self, tier: QualityTier) -> u8 {
        match tier {
            QualityTier::Standard => self.standard,
            QualityTier::High => self.high,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_wins_over_tiny_size() {
        assert_eq!(QualityTier::decide("thumbnail.png", 10, 10), QualityTier::High);
    }

    #[test]
    fn test_pixel_threshold_is_exclusive() {
        assert_eq!(QualityTier::decide("x.png", 801, 600), QualityTier::High);
        assert_eq!(QualityTier::decide("x.png", 800, 600), QualityTier::Standard);
        assert_eq!(QualityTier::decide("x.png", 600, 800), QualityTier::Standard);
    }

    #[test]
    fn test_keyword_match_is_case_insensitive() {
        assert_eq!(QualityTier::decide("Banner.PNG", 1, 1), QualityTier::High);
        assert_eq!(QualityTier::decide("FEATURED_post.jpg", 1, 1), QualityTier::High);
    }

    #[test]
    fn test_keyword_match_is_substring() {
        // "enlarged" contains "large", "discovery" contains "cover"
        assert_eq!(QualityTier::decide("enlarged.jpg", 1, 1), QualityTier::High);
        assert_eq!(QualityTier::decide("discovery.jpg", 1, 1), QualityTier::High);
        assert_eq!(QualityTier::decide("photo.jpg", 1, 1), QualityTier::Standard);
    }

    #[test]
    fn test_every_keyword_selects_high() {
        for keyword in THUMBNAIL_KEYWORDS {
            let name = format!("img_{}_01.png", keyword);
            assert_eq!(QualityTier::decide(&name, 0, 0), QualityTier::High, "{}", name);
        }
    }

    #[test]
    fn test_huge_dimensions_do_not_overflow() {
        assert_eq!(QualityTier::decide("x.tif", u32::MAX, u32::MAX), QualityTier::High);
        assert_eq!(QualityTier::decide("x.tif", 0, u32::MAX), QualityTier::Standard);
    }

    #[test]
    fn test_quality_settings_mapping() {
        let settings = QualitySettings::default();
        assert_eq!(settings.value_for(QualityTier::Standard), 75);
        assert_eq!(settings.value_for(QualityTier::High), 85);

        let custom = QualitySettings::new(60, 90);
        assert_eq!(custom.value_for(QualityTier::Standard), 60);
        assert_eq!(custom.value_for(QualityTier::High), 90);
    }
}
