//! Raster renderer
//!
//! Sizes follow the usual plotting conventions: node area in points² grows
//! with degree, label and line sizes are in points, and everything is
//! converted to pixels through the configured dpi.

use std::path::Path;

use ab_glyph::{FontVec, PxScale};
use cogmap_core::RenderConfig;
use cogmap_graph::RelationGraph;
use image::{Rgb, RgbImage};
use imageproc::drawing::{
    draw_filled_circle_mut, draw_filled_rect_mut, draw_line_segment_mut, draw_polygon_mut,
    draw_text_mut, text_size,
};
use imageproc::point::Point;
use imageproc::rect::Rect;

use crate::font::resolve_font;
use crate::layout::{spring_layout, LayoutParams};
use crate::{GraphRenderer, RenderError, Result};

const SKY_BLUE: [u8; 3] = [135, 206, 235];
const GRAY: [u8; 3] = [128, 128, 128];
const NODE_ALPHA: f32 = 0.8;
const EDGE_ALPHA: f32 = 0.4;

const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);
const TEXT_COLOR: Rgb<u8> = Rgb([0, 0, 0]);

/// Node area in points² is BASE + PER_DEGREE * degree
const BASE_NODE_SIZE: f32 = 300.0;
const NODE_SIZE_PER_DEGREE: f32 = 100.0;

const NODE_LABEL_PT: f32 = 10.0;
const EDGE_LABEL_PT: f32 = 8.0;
const TITLE_PT: f32 = 16.0;
const EDGE_WIDTH_PT: f32 = 1.0;
const ARROW_PT: f32 = 10.0;

/// Share of the canvas height reserved for the title
const TITLE_BAND: f32 = 0.08;
/// Share of the canvas width kept clear on each side of the plot
const MARGIN: f32 = 0.04;

/// Composite a color with the given opacity over a white background
pub fn over_white(color: [u8; 3], alpha: f32) -> Rgb<u8> {
    let blend = |c: u8| (c as f32 * alpha + 255.0 * (1.0 - alpha)).round() as u8;
    Rgb([blend(color[0]), blend(color[1]), blend(color[2])])
}

pub fn node_fill() -> Rgb<u8> {
    over_white(SKY_BLUE, NODE_ALPHA)
}

pub fn edge_stroke() -> Rgb<u8> {
    over_white(GRAY, EDGE_ALPHA)
}

/// Draws a relation graph onto a PNG canvas
pub struct RasterRenderer {
    config: RenderConfig,
    font: Option<FontVec>,
}

impl RasterRenderer {
    /// Create a renderer, resolving the label font from config or the system
    pub fn new(config: RenderConfig) -> Result<Self> {
        let font = resolve_font(config.font_path.as_deref())?;
        Ok(Self { config, font })
    }

    /// Create a renderer that draws shapes only
    pub fn without_font(config: RenderConfig) -> Self {
        Self { config, font: None }
    }

    pub fn has_font(&self) -> bool {
        self.font.is_some()
    }

    fn px(&self, points: f32) -> f32 {
        points * self.config.dpi / 72.0
    }

    /// Node radius in pixels for a given degree
    pub fn node_radius(&self, degree: usize) -> f32 {
        let area = BASE_NODE_SIZE + NODE_SIZE_PER_DEGREE * degree as f32;
        self.px(area.sqrt() / 2.0)
    }

    fn layout_params(&self) -> LayoutParams {
        LayoutParams {
            k: self.config.layout_k,
            iterations: self.config.iterations,
            seed: self.config.seed,
        }
    }

    /// Pixel centers of the nodes, in the order of `graph.nodes()`
    pub fn node_centers(&self, graph: &RelationGraph) -> Vec<(f32, f32)> {
        let edges: Vec<(usize, usize)> = graph.indexed_edges().map(|(s, o, _)| (s, o)).collect();
        let positions = spring_layout(graph.node_count(), &edges, &self.layout_params());

        let max_radius = graph
            .nodes_with_degree()
            .map(|(_, degree)| self.node_radius(degree))
            .fold(0.0_f32, f32::max);

        let width = self.config.width as f32;
        let height = self.config.height as f32;
        let inset = MARGIN * width + max_radius;
        let left = inset;
        let top = TITLE_BAND * height + max_radius;
        let span_x = (width - 2.0 * inset).max(1.0);
        let span_y = (height - top - inset).max(1.0);

        positions
            .into_iter()
            .map(|(x, y)| {
                (
                    left + (x + 1.0) / 2.0 * span_x,
                    top + (1.0 - y) / 2.0 * span_y,
                )
            })
            .collect()
    }

    /// Draw the graph onto a fresh canvas
    pub fn draw(&self, graph: &RelationGraph) -> RgbImage {
        let mut canvas = RgbImage::from_pixel(self.config.width, self.config.height, BACKGROUND);

        let centers = self.node_centers(graph);
        let radii: Vec<f32> = graph
            .nodes_with_degree()
            .map(|(_, degree)| self.node_radius(degree))
            .collect();

        for (s, o, _) in graph.indexed_edges() {
            self.draw_edge(&mut canvas, centers[s], centers[o], radii[s], radii[o]);
        }

        let fill = node_fill();
        for (center, radius) in centers.iter().zip(&radii) {
            draw_filled_circle_mut(
                &mut canvas,
                (center.0.round() as i32, center.1.round() as i32),
                radius.round() as i32,
                fill,
            );
        }

        if let Some(font) = &self.font {
            let node_scale = PxScale::from(self.px(NODE_LABEL_PT));
            for (name, center) in graph.nodes().zip(&centers) {
                draw_centered_text(&mut canvas, font, node_scale, *center, name, None);
            }

            let edge_scale = PxScale::from(self.px(EDGE_LABEL_PT));
            for (s, o, verb) in graph.indexed_edges() {
                let mid = (
                    (centers[s].0 + centers[o].0) / 2.0,
                    (centers[s].1 + centers[o].1) / 2.0,
                );
                draw_centered_text(&mut canvas, font, edge_scale, mid, verb, Some(BACKGROUND));
            }

            let title_center = (
                self.config.width as f32 / 2.0,
                TITLE_BAND * self.config.height as f32 / 2.0,
            );
            draw_centered_text(
                &mut canvas,
                font,
                PxScale::from(self.px(TITLE_PT)),
                title_center,
                &self.config.title,
                None,
            );
        }

        canvas
    }

    fn draw_edge(
        &self,
        canvas: &mut RgbImage,
        from: (f32, f32),
        to: (f32, f32),
        from_radius: f32,
        to_radius: f32,
    ) {
        let (dx, dy) = (to.0 - from.0, to.1 - from.1);
        let length = (dx * dx + dy * dy).sqrt();
        if length <= from_radius + to_radius {
            return;
        }
        let (ux, uy) = (dx / length, dy / length);

        let start = (from.0 + ux * from_radius, from.1 + uy * from_radius);
        let tip = (to.0 - ux * to_radius, to.1 - uy * to_radius);
        let arrow = self.px(ARROW_PT).min(length - from_radius - to_radius);
        let base = (tip.0 - ux * arrow, tip.1 - uy * arrow);

        let color = edge_stroke();
        draw_thick_line(canvas, start, base, self.px(EDGE_WIDTH_PT), color);

        let half = arrow * 0.4;
        let head = [
            Point::new(tip.0.round() as i32, tip.1.round() as i32),
            Point::new(
                (base.0 - uy * half).round() as i32,
                (base.1 + ux * half).round() as i32,
            ),
            Point::new(
                (base.0 + uy * half).round() as i32,
                (base.1 - ux * half).round() as i32,
            ),
        ];
        if head[0] != head[2] && head[1] != head[2] && head[0] != head[1] {
            draw_polygon_mut(canvas, &head, color);
        }
    }
}

impl GraphRenderer for RasterRenderer {
    fn render(&self, graph: &RelationGraph, path: &Path) -> Result<()> {
        let canvas = self.draw(graph);
        canvas.save(path).map_err(|e| RenderError::Image {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        tracing::info!(
            "Rendered {} nodes and {} edges to {}",
            graph.node_count(),
            graph.edge_count(),
            path.display()
        );
        Ok(())
    }
}

fn draw_thick_line(
    canvas: &mut RgbImage,
    from: (f32, f32),
    to: (f32, f32),
    width: f32,
    color: Rgb<u8>,
) {
    let (dx, dy) = (to.0 - from.0, to.1 - from.1);
    let length = (dx * dx + dy * dy).sqrt();
    if length < f32::EPSILON {
        return;
    }
    let (nx, ny) = (-dy / length, dx / length);

    let strokes = width.round().max(1.0) as i32;
    for i in 0..strokes {
        let offset = i as f32 - (strokes - 1) as f32 / 2.0;
        draw_line_segment_mut(
            canvas,
            (from.0 + nx * offset, from.1 + ny * offset),
            (to.0 + nx * offset, to.1 + ny * offset),
            color,
        );
    }
}

/// Draw text centered on a point, optionally over a filled box
fn draw_centered_text(
    canvas: &mut RgbImage,
    font: &FontVec,
    scale: PxScale,
    center: (f32, f32),
    text: &str,
    background: Option<Rgb<u8>>,
) {
    if text.is_empty() {
        return;
    }
    let (w, h) = text_size(scale, font, text);
    let x = (center.0 - w as f32 / 2.0).round() as i32;
    let y = (center.1 - h as f32 / 2.0).round() as i32;

    if let Some(fill) = background {
        let pad = (h / 4).max(1);
        draw_filled_rect_mut(
            canvas,
            Rect::at(x - pad as i32, y - pad as i32).of_size(w + 2 * pad, h + 2 * pad),
            fill,
        );
    }
    draw_text_mut(canvas, TEXT_COLOR, x, y, scale, font, text);
}

#[cfg(test)]
mod tests {
    use super::*;
    use cogmap_core::Triple;

    fn small_config() -> RenderConfig {
        RenderConfig {
            width: 800,
            height: 600,
            dpi: 100.0,
            show: false,
            ..RenderConfig::default()
        }
    }

    fn graph_of(triples: &[(&str, &str, &str)]) -> RelationGraph {
        let mut graph = RelationGraph::new();
        for (s, v, o) in triples {
            graph.add_relation(&Triple::new(*s, *v, *o));
        }
        graph
    }

    #[test]
    fn test_colors_blend_over_white() {
        assert_eq!(node_fill(), Rgb([159, 216, 239]));
        assert_eq!(edge_stroke(), Rgb([204, 204, 204]));
        assert_eq!(over_white([10, 20, 30], 1.0), Rgb([10, 20, 30]));
        assert_eq!(over_white([10, 20, 30], 0.0), BACKGROUND);
    }

    #[test]
    fn test_node_radius_grows_with_degree() {
        let renderer = RasterRenderer::without_font(RenderConfig::default());

        // 300 pt² at 300 dpi
        let r0 = renderer.node_radius(0);
        assert!((r0 - 300f32.sqrt() / 2.0 * 300.0 / 72.0).abs() < 1e-3);
        assert!(renderer.node_radius(3) > renderer.node_radius(1));
    }

    #[test]
    fn test_empty_graph_draws_blank_canvas() {
        let renderer = RasterRenderer::without_font(small_config());
        let canvas = renderer.draw(&RelationGraph::new());

        assert_eq!(canvas.dimensions(), (800, 600));
        assert!(canvas.pixels().all(|p| *p == BACKGROUND));
    }

    #[test]
    fn test_nodes_drawn_inside_canvas() {
        let renderer = RasterRenderer::without_font(small_config());
        let graph = graph_of(&[("cat", "chased", "mouse"), ("dog", "chased", "cat")]);
        let canvas = renderer.draw(&graph);

        for ((_, degree), (x, y)) in graph.nodes_with_degree().zip(renderer.node_centers(&graph)) {
            let r = renderer.node_radius(degree);
            assert!(x - r >= 0.0 && x + r <= 800.0);
            assert!(y - r >= 0.0 && y + r <= 600.0);
            assert_eq!(*canvas.get_pixel(x.round() as u32, y.round() as u32), node_fill());
        }
        assert!(canvas.pixels().any(|p| *p == edge_stroke()));
    }

    #[test]
    fn test_render_writes_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("map.png");
        let renderer = RasterRenderer::without_font(small_config());

        renderer
            .render(&graph_of(&[("Alice", "met", "Bob")]), &path)
            .unwrap();

        let image = image::open(&path).unwrap();
        assert_eq!((image.width(), image.height()), (800, 600));
    }

    #[test]
    fn test_render_bad_path() {
        let renderer = RasterRenderer::without_font(small_config());
        let err = renderer
            .render(&RelationGraph::new(), Path::new("/nonexistent/dir/map.png"))
            .unwrap_err();
        assert!(matches!(err, RenderError::Image { .. }));
    }

    #[test]
    fn test_draw_with_system_font() {
        let renderer = RasterRenderer::new(small_config()).unwrap();
        if !renderer.has_font() {
            return;
        }

        let canvas = renderer.draw(&RelationGraph::new());
        // Title only
        assert!(canvas.pixels().any(|p| *p != BACKGROUND));
    }
}
