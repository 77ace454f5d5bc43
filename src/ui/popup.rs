use crate::feed::event::SeismicEvent;
use egui::{Color32, Pos2, Stroke, Ui, Vec2};

#[derive(Debug, Clone)]
struct PopupStyle {
    background_color: Color32,
    border_color: Color32,
    border_width: f32,
    rounding: f32,
    padding: f32,
    max_width: f32,
}

impl Default for PopupStyle {
    fn default() -> Self {
        Self {
            background_color: Color32::WHITE,
            border_color: Color32::GRAY,
            border_width: 1.0,
            rounding: 4.0,
            padding: 8.0,
            max_width: 300.0,
        }
    }
}

/// What the popup wants after a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PopupAction {
    KeepOpen,
    Close,
}

/// Detail popup anchored to a clicked event marker
pub struct EventPopup {
    pub event_id: String,
    style: PopupStyle,
}

impl EventPopup {
    pub fn new(event_id: String) -> Self {
        Self {
            event_id,
            style: PopupStyle::default(),
        }
    }

    /// Renders the popup above the marker's screen position
    pub fn show(&self, ui: &Ui, event: &SeismicEvent, marker_pos: Pos2) -> PopupAction {
        let mut action = PopupAction::KeepOpen;
        let anchor = marker_pos + Vec2::new(10.0, 10.0);

        egui::Area::new(egui::Id::new(("event-popup", &self.event_id)))
            .fixed_pos(anchor)
            .order(egui::Order::Foreground)
            .show(ui.ctx(), |ui| {
                egui::Frame::none()
                    .fill(self.style.background_color)
                    .stroke(Stroke::new(self.style.border_width, self.style.border_color))
                    .rounding(self.style.rounding)
                    .inner_margin(self.style.padding)
                    .show(ui, |ui| {
                        ui.set_max_width(self.style.max_width);
                        ui.visuals_mut().override_text_color = Some(Color32::BLACK);

                        ui.strong(&event.place);
                        ui.label(format!(
                            "Magnitude: {} | Depth: {} km",
                            event.magnitude, event.depth_km
                        ));
                        ui.label(format!("Time: {}", event.formatted_time()));

                        ui.horizontal(|ui| {
                            if let Some(url) = &event.url {
                                ui.hyperlink_to("View on USGS", url);
                            }
                            if ui.small_button("Close").clicked() {
                                action = PopupAction::Close;
                            }
                        });
                    });
            });

        action
    }
}
