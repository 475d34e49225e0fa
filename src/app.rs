use std::path::{Path, PathBuf};

use eframe::egui;
use egui_extras::{Column, TableBuilder};

use crate::capture::CaptureEvent;
use crate::config::Settings;
use crate::error::Error;
use crate::session::{LoadedImage, Workspace};

const CANVAS_BACKGROUND: egui::Color32 = egui::Color32::GRAY;

/// One entry per wheel event this frame: `true` to zoom in, `false` to zoom out.
fn wheel_notches(events: &[egui::Event]) -> Vec<bool> {
    events
        .iter()
        .filter_map(|event| match event {
            egui::Event::MouseWheel { delta, .. } if delta.y != 0.0 => Some(delta.y > 0.0),
            _ => None,
        })
        .collect()
}

// ── Dialog State ────────────────────────────────────────────────────────────

/// A blocking message; all other input waits until it is dismissed.
struct Notice {
    title: String,
    message: String,
}

impl Notice {
    fn info(message: impl Into<String>) -> Self {
        Self {
            title: "Success".to_owned(),
            message: message.into(),
        }
    }

    fn error(err: &Error) -> Self {
        Self {
            title: err.title().to_owned(),
            message: err.to_string(),
        }
    }
}

/// The label picker shown after a ring is closed.
#[derive(Default)]
struct LabelPick {
    selected: Option<String>,
}

// ── App ─────────────────────────────────────────────────────────────────────

pub struct PolygonLabelApp {
    workspace: Workspace,
    texture: Option<egui::TextureHandle>,
    label_prompt: Option<String>,
    label_pick: Option<LabelPick>,
    notice: Option<Notice>,
}

impl PolygonLabelApp {
    pub fn new(settings: Settings, initial_image: Option<PathBuf>) -> Self {
        let mut app = Self {
            workspace: Workspace::new(settings),
            texture: None,
            label_prompt: None,
            label_pick: None,
            notice: None,
        };
        if let Some(path) = initial_image {
            app.open_image(&path);
        }
        app
    }

    fn report(&mut self, err: Error) {
        log::warn!("{err}");
        self.notice = Some(Notice::error(&err));
    }

    fn open_image(&mut self, path: &Path) {
        match LoadedImage::open(path) {
            Ok(image) => {
                self.workspace.load(image);
                self.texture = None;
                self.label_pick = None;
            }
            Err(err) => self.report(err),
        }
    }

    fn load_image(&mut self) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("Image Files", &["png", "jpg", "jpeg"])
            .pick_file()
        else {
            return;
        };
        self.open_image(&path);
    }

    fn save_annotations(&mut self) {
        let Some(session) = self.workspace.session.as_ref() else {
            self.report(Error::NothingToExport);
            return;
        };
        let document = match session.export() {
            Ok(document) => document,
            Err(err) => {
                self.report(err);
                return;
            }
        };
        let Some(mut path) = rfd::FileDialog::new()
            .add_filter("JSON Files", &["json"])
            .set_file_name("annotations.json")
            .save_file()
        else {
            return;
        };
        if path.extension().is_none() {
            path.set_extension("json");
        }
        match document.write_to(&path) {
            Ok(()) => {
                self.notice = Some(Notice::info(format!(
                    "Annotations saved to {}.",
                    path.display()
                )));
            }
            Err(err) => self.report(err),
        }
    }

    fn ensure_texture(&mut self, ctx: &egui::Context) {
        if self.texture.is_some() {
            return;
        }
        if let Some(ref session) = self.workspace.session {
            self.texture = Some(ctx.load_texture(
                "image",
                session.image().color_image(),
                egui::TextureOptions::LINEAR,
            ));
        }
    }

    fn on_capture(&mut self, event: CaptureEvent) {
        let CaptureEvent::Closed { vertices } = event else {
            return;
        };
        if vertices < self.workspace.settings.min_vertices {
            // Too few points: let finalize discard the ring and explain why.
            if let Err(err) = self.workspace.finalize(None) {
                self.report(err);
            }
        } else {
            self.label_pick = Some(LabelPick::default());
        }
    }

    fn confirm_label(&mut self) {
        let selected = self
            .label_pick
            .as_ref()
            .and_then(|pick| pick.selected.clone());
        match self.workspace.finalize(selected.as_deref()) {
            Ok(()) => self.label_pick = None,
            Err(err @ Error::NoLabelSelected) => self.report(err),
            Err(err) => {
                self.label_pick = None;
                self.report(err);
            }
        }
    }

    fn cancel_label(&mut self) {
        if let Some(session) = self.workspace.session.as_mut() {
            session.cancel_label();
        }
        self.label_pick = None;
    }

    fn confirm_new_label(&mut self) {
        let Some(name) = self.label_prompt.take() else {
            return;
        };
        if self.workspace.add_label(&name) {
            self.notice = Some(Notice::info(format!("Label '{name}' added!")));
        }
    }

    // ── Panels ──────────────────────────────────────────────────────────────

    fn toolbar(&mut self, ui: &mut egui::Ui) {
        let free = self.notice.is_none();
        ui.horizontal(|ui| {
            let can_switch = free && self.label_pick.is_none();
            if ui
                .add_enabled(can_switch, egui::Button::new("Load Image"))
                .clicked()
            {
                self.load_image();
            }
            if ui
                .add_enabled(free && self.label_prompt.is_none(), egui::Button::new("Add Label"))
                .clicked()
            {
                self.label_prompt = Some(String::new());
            }
            if ui
                .add_enabled(can_switch, egui::Button::new("Save Annotations"))
                .clicked()
            {
                self.save_annotations();
            }
            ui.separator();
            if let Some(ref session) = self.workspace.session {
                ui.label(format!("Zoom: {:.0}%", session.viewport().zoom() * 100.0));
                let pending = session.capture().points().len();
                if pending > 0 {
                    ui.label(format!("Points: {pending}"));
                }
                ui.separator();
                ui.label(
                    session
                        .image()
                        .path
                        .file_name()
                        .unwrap_or_default()
                        .to_string_lossy()
                        .into_owned(),
                );
            }
        });
    }

    fn side_panel(&self, ui: &mut egui::Ui) {
        ui.heading(format!("Labels ({})", self.workspace.labels.len()));
        for name in self.workspace.labels.list() {
            ui.label(name.as_str());
        }
        ui.separator();

        let Some(ref session) = self.workspace.session else {
            return;
        };
        ui.heading(format!("Annotations ({})", session.store().len()));
        TableBuilder::new(ui)
            .striped(true)
            .column(Column::auto())
            .column(Column::remainder())
            .column(Column::auto())
            .header(18.0, |mut header| {
                header.col(|ui| {
                    ui.strong("#");
                });
                header.col(|ui| {
                    ui.strong("Label");
                });
                header.col(|ui| {
                    ui.strong("Points");
                });
            })
            .body(|mut body| {
                for (i, annotation) in session.store().all().iter().enumerate() {
                    body.row(18.0, |mut row| {
                        row.col(|ui| {
                            ui.label((i + 1).to_string());
                        });
                        row.col(|ui| {
                            ui.label(annotation.label.as_str());
                        });
                        row.col(|ui| {
                            ui.label(annotation.polygon.points().len().to_string());
                        });
                    });
                }
            });
    }

    fn canvas(&mut self, ui: &mut egui::Ui) {
        let (response, painter) =
            ui.allocate_painter(ui.available_size(), egui::Sense::click_and_drag());
        let canvas_rect = response.rect;
        painter.rect_filled(canvas_rect, 0.0, CANVAS_BACKGROUND);

        let accepts_input = self.notice.is_none() && self.label_pick.is_none();
        let Some(session) = self.workspace.session.as_mut() else {
            return;
        };

        if accepts_input {
            // Pan with the middle or secondary button
            if response.dragged_by(egui::PointerButton::Middle)
                || response.dragged_by(egui::PointerButton::Secondary)
            {
                session.pan(response.drag_delta(), canvas_rect.size());
            }

            if response.hovered() {
                let notches = ui.ctx().input(|i| wheel_notches(&i.events));
                let mut changed = false;
                for zoom_in in notches {
                    changed |= if zoom_in {
                        session.zoom_in()
                    } else {
                        session.zoom_out()
                    };
                }
                if changed {
                    session.fit_scroll(canvas_rect.size());
                }
            }
        }

        if let Some(ref tex) = self.texture {
            painter.image(
                tex.id(),
                session.image_rect(canvas_rect.min),
                egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                egui::Color32::WHITE,
            );
        }

        let mut event = None;
        if accepts_input && response.clicked_by(egui::PointerButton::Primary) {
            if let Some(pos) = response.interact_pointer_pos() {
                event = Some(session.click(pos - canvas_rect.min.to_vec2()));
            }
        }

        session.scene(canvas_rect.min).paint(&painter);

        if let Some(event) = event {
            self.on_capture(event);
        }
    }

    // ── Dialogs ─────────────────────────────────────────────────────────────

    fn label_prompt_window(&mut self, ctx: &egui::Context) {
        let Some(buffer) = self.label_prompt.as_mut() else {
            return;
        };
        let enabled = self.notice.is_none();
        let (mut confirm, mut cancel) = (false, false);
        egui::Window::new("Add Label")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, -60.0])
            .show(ctx, |ui| {
                ui.add_enabled_ui(enabled, |ui| {
                    ui.label("Enter new label:");
                    let te = ui.text_edit_singleline(buffer);
                    // Take the Enter so the notice it may raise is not dismissed by it
                    if te.lost_focus()
                        && ui.input_mut(|i| i.consume_key(egui::Modifiers::NONE, egui::Key::Enter))
                    {
                        confirm = true;
                    } else if enabled {
                        te.request_focus();
                    }
                    ui.horizontal(|ui| {
                        confirm |= ui.button("OK").clicked();
                        cancel = ui.button("Cancel").clicked();
                    });
                });
            });
        if confirm {
            self.confirm_new_label();
        } else if cancel {
            self.label_prompt = None;
        }
    }

    fn label_pick_window(&mut self, ctx: &egui::Context) {
        let Some(pick) = self.label_pick.as_mut() else {
            return;
        };
        let enabled = self.notice.is_none();
        let labels = self.workspace.labels.list();
        let placeholder = &self.workspace.settings.placeholder_label;
        let (mut confirm, mut cancel) = (false, false);
        egui::Window::new("Select Label")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.add_enabled_ui(enabled, |ui| {
                    ui.label("Select a label for this polygon:");
                    egui::ComboBox::from_id_salt("label_pick")
                        .selected_text(pick.selected.as_deref().unwrap_or(placeholder.as_str()))
                        .show_ui(ui, |ui| {
                            for name in labels {
                                ui.selectable_value(&mut pick.selected, Some(name.clone()), name.as_str());
                            }
                        });
                    ui.horizontal(|ui| {
                        confirm = ui.button("Confirm").clicked();
                        cancel = ui.button("Cancel").clicked();
                    });
                });
            });
        if confirm {
            self.confirm_label();
        } else if cancel {
            self.cancel_label();
        }
    }

    fn notice_window(&mut self, ctx: &egui::Context) {
        let Some(ref notice) = self.notice else {
            return;
        };
        let mut dismissed = false;
        egui::Window::new(notice.title.as_str())
            .id(egui::Id::new("notice"))
            .collapsible(false)
            .resizable(false)
            .order(egui::Order::Foreground)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 60.0])
            .show(ctx, |ui| {
                ui.label(notice.message.as_str());
                dismissed = ui.button("OK").clicked()
                    || ui.input(|i| i.key_pressed(egui::Key::Enter));
            });
        if dismissed {
            self.notice = None;
        }
    }
}

// ── eframe App impl ────────────────────────────────────────────────────────

impl eframe::App for PolygonLabelApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.ensure_texture(ctx);

        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| self.toolbar(ui));
        egui::SidePanel::right("annotations")
            .default_width(220.0)
            .show(ctx, |ui| self.side_panel(ui));
        egui::CentralPanel::default().show(ctx, |ui| self.canvas(ui));

        self.label_pick_window(ctx);
        self.label_prompt_window(ctx);
        self.notice_window(ctx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(key: egui::Key) -> egui::Event {
        egui::Event::Key {
            key,
            physical_key: None,
            pressed: true,
            repeat: false,
            modifiers: egui::Modifiers::NONE,
        }
    }

    fn wheel(y: f32) -> egui::Event {
        egui::Event::MouseWheel {
            unit: egui::MouseWheelUnit::Line,
            delta: egui::vec2(0.0, y),
            modifiers: egui::Modifiers::NONE,
        }
    }

    fn run_dialogs(ctx: &egui::Context, app: &mut PolygonLabelApp, events: Vec<egui::Event>) {
        let input = egui::RawInput {
            events,
            ..Default::default()
        };
        let _ = ctx.run(input, |ctx| {
            app.label_prompt_window(ctx);
            app.notice_window(ctx);
        });
    }

    #[test]
    fn enter_adds_label_and_keeps_success_notice() {
        let ctx = egui::Context::default();
        let mut app = PolygonLabelApp::new(Settings::default(), None);
        app.label_prompt = Some("Car".to_owned());

        run_dialogs(&ctx, &mut app, Vec::new());
        run_dialogs(&ctx, &mut app, Vec::new());
        run_dialogs(&ctx, &mut app, vec![key(egui::Key::Enter)]);

        assert_eq!(app.workspace.labels.list(), ["Not Defined", "Car"]);
        assert!(app.label_prompt.is_none());
        let notice = app.notice.as_ref().expect("success notice shown");
        assert_eq!(notice.message, "Label 'Car' added!");

        // A later Enter dismisses it
        run_dialogs(&ctx, &mut app, vec![key(egui::Key::Enter)]);
        assert!(app.notice.is_none());
    }

    #[test]
    fn each_wheel_event_is_one_zoom_step() {
        let events = [
            wheel(1.0),
            wheel(3.0),
            key(egui::Key::A),
            wheel(0.0),
            wheel(-1.0),
        ];
        assert_eq!(wheel_notches(&events), [true, true, false]);
        assert!(wheel_notches(&[]).is_empty());
    }
}
