use eframe::egui;

use crate::annotation::{Annotation, Point};
use crate::transform::Viewport;

const COMMITTED_COLOR: egui::Color32 = egui::Color32::RED;
const COMMITTED_WIDTH: f32 = 2.0;
const LABEL_COLOR: egui::Color32 = egui::Color32::WHITE;
const LABEL_FONT_SIZE: f32 = 14.0;
const IN_PROGRESS_COLOR: egui::Color32 = egui::Color32::BLUE;
const IN_PROGRESS_WIDTH: f32 = 1.5;
const DASH_LENGTH: f32 = 4.0;
const GAP_LENGTH: f32 = 2.0;

/// Arithmetic mean of the vertices, or `None` for an empty slice.
pub fn centroid(points: &[egui::Pos2]) -> Option<egui::Pos2> {
    if points.is_empty() {
        return None;
    }
    let sum = points
        .iter()
        .fold(egui::Vec2::ZERO, |acc, p| acc + p.to_vec2());
    Some((sum / points.len() as f32).to_pos2())
}

#[derive(Clone, Debug, PartialEq)]
pub struct RenderedPolygon {
    pub points: Vec<egui::Pos2>,
    pub label: String,
    pub centroid: egui::Pos2,
}

/// Screen-space geometry for one frame.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RenderScene {
    pub polygons: Vec<RenderedPolygon>,
    pub in_progress: Vec<egui::Pos2>,
}

impl RenderScene {
    /// Projects every committed polygon and the in-progress vertices through
    /// `viewport`, offset by the canvas `origin`.
    pub fn build(
        annotations: &[Annotation],
        in_progress: &[Point],
        viewport: &Viewport,
        origin: egui::Pos2,
    ) -> Self {
        let project = |p: &Point| origin + viewport.image_to_canvas(*p).to_vec2();

        let polygons = annotations
            .iter()
            .filter_map(|annotation| {
                let points: Vec<_> = annotation.polygon.points().iter().map(project).collect();
                let centroid = centroid(&points)?;
                Some(RenderedPolygon {
                    points,
                    label: annotation.label.clone(),
                    centroid,
                })
            })
            .collect();

        Self {
            polygons,
            in_progress: in_progress.iter().map(project).collect(),
        }
    }

    pub fn paint(&self, painter: &egui::Painter) {
        for polygon in &self.polygons {
            painter.add(egui::Shape::closed_line(
                polygon.points.clone(),
                egui::Stroke::new(COMMITTED_WIDTH, COMMITTED_COLOR),
            ));
            painter.text(
                polygon.centroid,
                egui::Align2::CENTER_CENTER,
                &polygon.label,
                egui::FontId::proportional(LABEL_FONT_SIZE),
                LABEL_COLOR,
            );
        }

        match self.in_progress.as_slice() {
            [] => {}
            [single] => {
                painter.circle_filled(*single, IN_PROGRESS_WIDTH * 2.0, IN_PROGRESS_COLOR);
            }
            points => {
                let mut ring = points.to_vec();
                ring.push(points[0]);
                painter.extend(egui::Shape::dashed_line(
                    &ring,
                    egui::Stroke::new(IN_PROGRESS_WIDTH, IN_PROGRESS_COLOR),
                    DASH_LENGTH,
                    GAP_LENGTH,
                ));
            }
        }
    }
}
