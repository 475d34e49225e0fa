use eframe::egui;

use crate::annotation::Point;
use crate::config::Settings;

/// Canvas-relative screen position to image space.
pub fn to_image_space(screen: egui::Pos2, scroll: egui::Vec2, zoom: f32) -> Point {
    Point::new((screen.x + scroll.x) / zoom, (screen.y + scroll.y) / zoom)
}

/// Image space to the scaled content surface. Scroll is applied by the caller.
pub fn to_screen_space(image: Point, zoom: f32) -> egui::Pos2 {
    egui::pos2(image.x * zoom, image.y * zoom)
}

/// Zoom and scroll state of the canvas.
#[derive(Clone, Debug, PartialEq)]
pub struct Viewport {
    zoom: f32,
    scroll: egui::Vec2,
    min_zoom: f32,
    max_zoom: f32,
    zoom_in_factor: f32,
    zoom_out_factor: f32,
}

impl Viewport {
    pub fn new(settings: &Settings) -> Self {
        Self {
            zoom: 1.0,
            scroll: egui::Vec2::ZERO,
            min_zoom: settings.min_zoom,
            max_zoom: settings.max_zoom,
            zoom_in_factor: settings.zoom_in_factor,
            zoom_out_factor: settings.zoom_out_factor,
        }
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    pub fn scroll(&self) -> egui::Vec2 {
        self.scroll
    }

    pub fn zoom_in(&mut self) -> bool {
        self.apply_zoom(self.zoom_in_factor)
    }

    pub fn zoom_out(&mut self) -> bool {
        self.apply_zoom(self.zoom_out_factor)
    }

    /// Multiplies the zoom by `factor` unless the result leaves the allowed
    /// range, in which case nothing changes and `false` is returned.
    fn apply_zoom(&mut self, factor: f32) -> bool {
        let new_zoom = self.zoom * factor;
        if new_zoom < self.min_zoom || new_zoom > self.max_zoom {
            return false;
        }
        self.zoom = new_zoom;
        true
    }

    /// Moves the view along with a pointer drag of `delta` screen pixels.
    pub fn pan(&mut self, delta: egui::Vec2) {
        self.scroll -= delta;
    }

    /// Keeps the scroll offset inside the scaled image so the view never
    /// drifts past its edges.
    pub fn clamp_scroll(&mut self, image_size: egui::Vec2, view_size: egui::Vec2) {
        let max = (image_size * self.zoom - view_size).max(egui::Vec2::ZERO);
        self.scroll = self.scroll.clamp(egui::Vec2::ZERO, max);
    }

    pub fn screen_to_image(&self, screen: egui::Pos2) -> Point {
        to_image_space(screen, self.scroll, self.zoom)
    }

    /// Image point to a canvas-relative position, scroll included.
    pub fn image_to_canvas(&self, image: Point) -> egui::Pos2 {
        to_screen_space(image, self.zoom) - self.scroll
    }
}
