//! cogmap Render - Drawing cognitive maps
//!
//! Lays the pruned relation graph out with a spring (Fruchterman-Reingold)
//! model and draws it onto a raster canvas: nodes sized by degree, gray
//! directed edges labeled with their verb, and a title.

use std::path::Path;

use cogmap_graph::RelationGraph;
use thiserror::Error;

pub mod draw;
pub mod font;
pub mod layout;
pub mod viewer;

pub use draw::RasterRenderer;
pub use layout::{spring_layout, LayoutParams};
pub use viewer::open_in_viewer;

// ============================================================================
// Error Types
// ============================================================================

/// Errors that can occur while rendering
#[derive(Error, Debug)]
pub enum RenderError {
    /// Font file could not be read
    #[error("Failed to read font {path}: {source}")]
    FontIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Font file is not a usable TrueType/OpenType font
    #[error("Invalid font file: {0}")]
    InvalidFont(String),

    /// Image encoding or writing failed
    #[error("Failed to write image {path}: {message}")]
    Image { path: String, message: String },

    /// Platform viewer could not be launched
    #[error("Failed to open viewer for {path}: {source}")]
    Viewer {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, RenderError>;

// ============================================================================
// Renderer Trait
// ============================================================================

/// Turns a relation graph into an image file
pub trait GraphRenderer {
    fn render(&self, graph: &RelationGraph, path: &Path) -> Result<()>;
}
