/// Which coordinate space the closure threshold is measured in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClosureSpace {
    /// Threshold is in image pixels; closing behaves the same at any zoom.
    Image,
    /// Threshold is in canvas pixels; it shrinks in image space as zoom grows.
    Screen,
}

/// Tunables for the capture session and the shell around it.
#[derive(Clone, Debug)]
pub struct Settings {
    pub zoom_in_factor: f32,
    pub zoom_out_factor: f32,
    pub min_zoom: f32,
    pub max_zoom: f32,
    pub closure_threshold: f32,
    pub closure_space: ClosureSpace,
    pub min_vertices: usize,
    /// Shown in the label picker before the user chooses; never a valid label.
    pub placeholder_label: String,
    pub initial_labels: Vec<String>,
}

impl Settings {
    /// Closure threshold expressed in image units at the given zoom.
    pub fn closure_threshold_at(&self, zoom: f32) -> f32 {
        match self.closure_space {
            ClosureSpace::Image => self.closure_threshold,
            ClosureSpace::Screen => self.closure_threshold / zoom,
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            zoom_in_factor: 1.1,
            zoom_out_factor: 0.9,
            min_zoom: 0.1,
            max_zoom: 10.0,
            closure_threshold: 10.0,
            closure_space: ClosureSpace::Image,
            min_vertices: 3,
            placeholder_label: "Select Label".to_owned(),
            initial_labels: vec!["Not Defined".to_owned()],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ClosureSpace, Settings};

    #[test]
    fn screen_space_threshold_scales_with_zoom() {
        let mut settings = Settings::default();
        assert_eq!(settings.closure_threshold_at(4.0), 10.0);

        settings.closure_space = ClosureSpace::Screen;
        assert_eq!(settings.closure_threshold_at(2.0), 5.0);
        assert_eq!(settings.closure_threshold_at(0.5), 20.0);
    }
}
