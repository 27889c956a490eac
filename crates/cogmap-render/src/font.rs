//! Label font discovery

use std::path::{Path, PathBuf};

use ab_glyph::FontVec;

use crate::{RenderError, Result};

/// Fonts tried in order when no font is configured
const SYSTEM_FONTS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu-sans-fonts/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/liberation/LiberationSans-Regular.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "/Library/Fonts/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

/// Read and parse a font file
pub fn load_font(path: &Path) -> Result<FontVec> {
    let bytes = std::fs::read(path).map_err(|e| RenderError::FontIo {
        path: path.display().to_string(),
        source: e,
    })?;

    FontVec::try_from_vec(bytes)
        .map_err(|e| RenderError::InvalidFont(format!("{}: {}", path.display(), e)))
}

/// Resolve the label font
///
/// A configured font must load. Otherwise the first usable system font is
/// taken, and `None` means labels will not be drawn.
pub fn resolve_font(configured: Option<&Path>) -> Result<Option<FontVec>> {
    if let Some(path) = configured {
        return load_font(path).map(Some);
    }

    for candidate in SYSTEM_FONTS.iter().map(PathBuf::from) {
        if !candidate.is_file() {
            continue;
        }
        match load_font(&candidate) {
            Ok(font) => {
                tracing::debug!("Using label font {}", candidate.display());
                return Ok(Some(font));
            }
            Err(e) => tracing::debug!("Skipping font: {}", e),
        }
    }

    tracing::warn!("No usable system font found; labels and title will be omitted");
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_configured_font() {
        let err = resolve_font(Some(Path::new("/nonexistent/font.ttf"))).unwrap_err();
        assert!(matches!(err, RenderError::FontIo { .. }));
    }

    #[test]
    fn test_invalid_configured_font() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.ttf");
        std::fs::write(&path, b"not a font").unwrap();

        let err = resolve_font(Some(&path)).unwrap_err();
        assert!(matches!(err, RenderError::InvalidFont(_)));
    }

    #[test]
    fn test_system_lookup_never_fails() {
        assert!(resolve_font(None).is_ok());
    }
}
