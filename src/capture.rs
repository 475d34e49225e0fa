use std::mem;

use crate::annotation::{Annotation, Point, Polygon};
use crate::error::{Error, Result};
use crate::labels::LabelRegistry;

/// Where the polygon currently being drawn stands.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum CaptureState {
    #[default]
    Idle,
    Capturing(Vec<Point>),
    /// Ring closed; waiting for the user to pick a label or cancel.
    AwaitingLabel(Vec<Point>),
}

/// What a single click did to the capture.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CaptureEvent {
    Started,
    Added { vertices: usize },
    Closed { vertices: usize },
    /// Input withheld while a label is pending.
    Suspended,
}

/// Turns a stream of image-space clicks into labeled polygons.
#[derive(Clone, Debug)]
pub struct PolygonCapture {
    state: CaptureState,
    min_vertices: usize,
}

impl PolygonCapture {
    pub fn new(min_vertices: usize) -> Self {
        Self {
            state: CaptureState::Idle,
            min_vertices,
        }
    }

    pub fn state(&self) -> &CaptureState {
        &self.state
    }

    pub fn is_awaiting_label(&self) -> bool {
        matches!(self.state, CaptureState::AwaitingLabel(_))
    }

    /// Vertices of the in-progress polygon, empty when idle.
    pub fn points(&self) -> &[Point] {
        match &self.state {
            CaptureState::Idle => &[],
            CaptureState::Capturing(points) | CaptureState::AwaitingLabel(points) => points,
        }
    }

    /// Records a click at `point`. A click within `threshold` of the first
    /// vertex closes the ring instead of adding a vertex.
    pub fn add_point(&mut self, point: Point, threshold: f32) -> CaptureEvent {
        match &mut self.state {
            CaptureState::Idle => {
                self.state = CaptureState::Capturing(vec![point]);
                CaptureEvent::Started
            }
            CaptureState::Capturing(points) => {
                if points[0].is_near(&point, threshold) {
                    let vertices = points.len();
                    let points = mem::take(points);
                    self.state = CaptureState::AwaitingLabel(points);
                    CaptureEvent::Closed { vertices }
                } else {
                    points.push(point);
                    CaptureEvent::Added {
                        vertices: points.len(),
                    }
                }
            }
            CaptureState::AwaitingLabel(_) => CaptureEvent::Suspended,
        }
    }

    /// Attaches `label` to the closed ring.
    ///
    /// A ring that is too small is discarded. A missing, placeholder or
    /// unregistered label leaves the ring waiting for another attempt.
    pub fn finalize(
        &mut self,
        label: Option<&str>,
        registry: &LabelRegistry,
        placeholder: &str,
    ) -> Result<Annotation> {
        let CaptureState::AwaitingLabel(points) = &mut self.state else {
            return Err(Error::NotClosed);
        };

        let count = points.len();
        if count < self.min_vertices {
            self.state = CaptureState::Idle;
            return Err(Error::InsufficientVertices {
                count,
                min: self.min_vertices,
            });
        }

        let label = match label {
            Some(label) if label != placeholder && registry.contains(label) => label,
            _ => return Err(Error::NoLabelSelected),
        };

        let points = mem::take(points);
        self.state = CaptureState::Idle;
        let polygon = Polygon::new(points, self.min_vertices).map_err(|points| {
            Error::InsufficientVertices {
                count: points.len(),
                min: self.min_vertices,
            }
        })?;

        Ok(Annotation {
            polygon,
            label: label.to_owned(),
        })
    }

    /// Drops a closed ring awaiting its label. Returns whether anything was dropped.
    pub fn cancel(&mut self) -> bool {
        if self.is_awaiting_label() {
            self.state = CaptureState::Idle;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PLACEHOLDER: &str = "Select Label";

    fn registry() -> LabelRegistry {
        LabelRegistry::new(["Not Defined", "Box"])
    }

    fn capture_with(points: &[(f32, f32)]) -> PolygonCapture {
        let mut capture = PolygonCapture::new(3);
        for &(x, y) in points {
            capture.add_point(Point::new(x, y), 10.0);
        }
        capture
    }

    #[test]
    fn distant_points_keep_capturing() {
        let clicks = [(0.0, 0.0), (50.0, 0.0), (50.0, 50.0), (0.0, 50.0), (25.0, 80.0)];
        let mut capture = PolygonCapture::new(3);
        for (i, &(x, y)) in clicks.iter().enumerate() {
            capture.add_point(Point::new(x, y), 10.0);
            assert!(matches!(capture.state(), CaptureState::Capturing(_)));
            assert_eq!(capture.points().len(), i + 1);
        }
    }

    #[test]
    fn closing_click_is_not_appended() {
        let mut capture = capture_with(&[(10.0, 10.0), (100.0, 10.0), (100.0, 100.0)]);
        let event = capture.add_point(Point::new(12.0, 12.0), 10.0);

        assert_eq!(event, CaptureEvent::Closed { vertices: 3 });
        assert!(capture.is_awaiting_label());
        assert_eq!(capture.points().len(), 3);
        assert_eq!(capture.points()[2], Point::new(100.0, 100.0));
    }

    #[test]
    fn clicks_are_withheld_while_awaiting_label() {
        let mut capture = capture_with(&[(10.0, 10.0), (100.0, 10.0), (100.0, 100.0), (11.0, 11.0)]);
        assert_eq!(
            capture.add_point(Point::new(300.0, 300.0), 10.0),
            CaptureEvent::Suspended
        );
        assert_eq!(capture.points().len(), 3);
    }

    #[test]
    fn finalize_commits_box() {
        let mut capture = capture_with(&[(10.0, 10.0), (100.0, 10.0), (100.0, 100.0), (12.0, 12.0)]);
        let annotation = capture.finalize(Some("Box"), &registry(), PLACEHOLDER).unwrap();

        assert_eq!(annotation.label, "Box");
        assert_eq!(
            annotation.polygon.points(),
            [
                Point::new(10.0, 10.0),
                Point::new(100.0, 10.0),
                Point::new(100.0, 100.0)
            ]
        );
        assert_eq!(capture.state(), &CaptureState::Idle);
    }

    #[test]
    fn short_ring_is_discarded() {
        let mut capture = capture_with(&[(10.0, 10.0), (100.0, 10.0), (15.0, 15.0)]);
        assert!(capture.is_awaiting_label());

        let err = capture.finalize(Some("Box"), &registry(), PLACEHOLDER).unwrap_err();
        assert!(matches!(err, Error::InsufficientVertices { count: 2, min: 3 }));
        assert_eq!(capture.state(), &CaptureState::Idle);
        assert!(capture.points().is_empty());
    }

    #[test]
    fn short_ring_fails_before_label_check() {
        let mut capture = capture_with(&[(10.0, 10.0), (11.0, 11.0)]);
        let err = capture.finalize(None, &registry(), PLACEHOLDER).unwrap_err();
        assert!(matches!(err, Error::InsufficientVertices { count: 1, .. }));
        assert_eq!(capture.state(), &CaptureState::Idle);
    }

    #[test]
    fn bad_labels_keep_ring_waiting() {
        let mut capture = capture_with(&[(10.0, 10.0), (100.0, 10.0), (100.0, 100.0), (12.0, 12.0)]);
        let registry = registry();

        for label in [None, Some(PLACEHOLDER), Some("Car"), Some("")] {
            let err = capture.finalize(label, &registry, PLACEHOLDER).unwrap_err();
            assert!(matches!(err, Error::NoLabelSelected));
            assert!(capture.is_awaiting_label());
            assert_eq!(capture.points().len(), 3);
        }

        assert!(capture.finalize(Some("Not Defined"), &registry, PLACEHOLDER).is_ok());
    }

    #[test]
    fn placeholder_is_rejected_even_if_registered() {
        let mut capture = capture_with(&[(10.0, 10.0), (100.0, 10.0), (100.0, 100.0), (12.0, 12.0)]);
        let registry = LabelRegistry::new([PLACEHOLDER]);
        assert!(matches!(
            capture.finalize(Some(PLACEHOLDER), &registry, PLACEHOLDER),
            Err(Error::NoLabelSelected)
        ));
    }

    #[test]
    fn finalize_requires_closed_ring() {
        let mut capture = capture_with(&[(10.0, 10.0), (100.0, 10.0), (100.0, 100.0)]);
        assert!(matches!(
            capture.finalize(Some("Box"), &registry(), PLACEHOLDER),
            Err(Error::NotClosed)
        ));
        assert_eq!(capture.points().len(), 3);
    }

    #[test]
    fn cancel_discards_ring() {
        let mut capture = capture_with(&[(10.0, 10.0), (100.0, 10.0), (100.0, 100.0), (12.0, 12.0)]);
        assert!(capture.cancel());
        assert_eq!(capture.state(), &CaptureState::Idle);
        assert!(!capture.cancel());

        assert_eq!(
            capture.add_point(Point::new(5.0, 5.0), 10.0),
            CaptureEvent::Started
        );
    }
}
