use std::path::{Path, PathBuf};

use eframe::egui;
use image::RgbaImage;

use crate::annotation::Point;
use crate::capture::{CaptureEvent, PolygonCapture};
use crate::config::Settings;
use crate::error::{Error, Result};
use crate::export::{self, AnnotationDocument};
use crate::labels::LabelRegistry;
use crate::render::RenderScene;
use crate::store::AnnotationStore;
use crate::transform::Viewport;

/// A decoded image ready to be annotated.
pub struct LoadedImage {
    pub path: PathBuf,
    pub pixels: RgbaImage,
}

impl LoadedImage {
    pub fn open(path: &Path) -> Result<Self> {
        let pixels = image::open(path)
            .map_err(|source| Error::ImageLoad {
                path: path.to_path_buf(),
                source,
            })?
            .to_rgba8();
        Ok(Self {
            path: path.to_path_buf(),
            pixels,
        })
    }

    pub fn size(&self) -> egui::Vec2 {
        egui::vec2(self.pixels.width() as f32, self.pixels.height() as f32)
    }

    pub fn color_image(&self) -> egui::ColorImage {
        let size = [self.pixels.width() as usize, self.pixels.height() as usize];
        egui::ColorImage::from_rgba_unmultiplied(size, self.pixels.as_flat_samples().as_slice())
    }
}

/// Everything tied to one loaded image. Replaced as a whole when another
/// image is opened; the label registry lives outside it.
pub struct Session {
    image: LoadedImage,
    viewport: Viewport,
    capture: PolygonCapture,
    store: AnnotationStore,
    settings: Settings,
}

impl Session {
    pub fn new(image: LoadedImage, settings: &Settings) -> Self {
        log::info!(
            "loaded {} ({}x{})",
            image.path.display(),
            image.pixels.width(),
            image.pixels.height()
        );
        Self {
            image,
            viewport: Viewport::new(settings),
            capture: PolygonCapture::new(settings.min_vertices),
            store: AnnotationStore::default(),
            settings: settings.clone(),
        }
    }

    pub fn image(&self) -> &LoadedImage {
        &self.image
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn capture(&self) -> &PolygonCapture {
        &self.capture
    }

    pub fn store(&self) -> &AnnotationStore {
        &self.store
    }

    /// Handles a primary click at a canvas-relative position.
    pub fn click(&mut self, canvas_pos: egui::Pos2) -> CaptureEvent {
        let point = self.viewport.screen_to_image(canvas_pos);
        let threshold = self.settings.closure_threshold_at(self.viewport.zoom());
        let event = self.capture.add_point(point, threshold);
        match event {
            CaptureEvent::Started | CaptureEvent::Added { .. } => {
                log::debug!("vertex at ({:.1}, {:.1}): {:?}", point.x, point.y, event);
            }
            CaptureEvent::Closed { vertices } => {
                log::info!("polygon closed with {vertices} vertices");
            }
            CaptureEvent::Suspended => {}
        }
        event
    }

    /// Labels the closed ring and commits it to the store.
    pub fn finalize(&mut self, label: Option<&str>, registry: &LabelRegistry) -> Result<()> {
        let annotation =
            self.capture
                .finalize(label, registry, &self.settings.placeholder_label)?;
        log::info!(
            "committed '{}' with {} vertices",
            annotation.label,
            annotation.polygon.points().len()
        );
        self.store.commit(annotation);
        Ok(())
    }

    pub fn cancel_label(&mut self) -> bool {
        let dropped = self.capture.cancel();
        if dropped {
            log::info!("pending polygon discarded");
        }
        dropped
    }

    pub fn zoom_in(&mut self) -> bool {
        self.viewport.zoom_in()
    }

    pub fn zoom_out(&mut self) -> bool {
        self.viewport.zoom_out()
    }

    pub fn pan(&mut self, delta: egui::Vec2, view_size: egui::Vec2) {
        self.viewport.pan(delta);
        self.fit_scroll(view_size);
    }

    pub fn fit_scroll(&mut self, view_size: egui::Vec2) {
        self.viewport.clamp_scroll(self.image.size(), view_size);
    }

    /// Where the image's top-left corner sits on a canvas whose origin is `origin`.
    pub fn image_rect(&self, origin: egui::Pos2) -> egui::Rect {
        let min = origin + self.viewport.image_to_canvas(Point::new(0.0, 0.0)).to_vec2();
        egui::Rect::from_min_size(min, self.image.size() * self.viewport.zoom())
    }

    pub fn scene(&self, origin: egui::Pos2) -> RenderScene {
        RenderScene::build(self.store.all(), self.capture.points(), &self.viewport, origin)
    }

    pub fn export(&self) -> Result<AnnotationDocument> {
        export::export(&self.store)
    }
}

/// Process-wide state: settings, the label registry, and the current session.
pub struct Workspace {
    pub settings: Settings,
    pub labels: LabelRegistry,
    pub session: Option<Session>,
}

impl Workspace {
    pub fn new(settings: Settings) -> Self {
        let labels = LabelRegistry::new(settings.initial_labels.iter().cloned());
        Self {
            settings,
            labels,
            session: None,
        }
    }

    /// Starts over on `image`. Labels survive; everything else is replaced.
    pub fn load(&mut self, image: LoadedImage) {
        self.session = Some(Session::new(image, &self.settings));
    }

    pub fn add_label(&mut self, name: &str) -> bool {
        let added = self.labels.add(name);
        if added {
            log::info!("label '{name}' added");
        }
        added
    }

    pub fn finalize(&mut self, label: Option<&str>) -> Result<()> {
        match self.session.as_mut() {
            Some(session) => session.finalize(label, &self.labels),
            None => Err(Error::NotClosed),
        }
    }
}
