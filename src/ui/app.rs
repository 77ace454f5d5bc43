use crate::feed::catalog::{EventCatalog, MAX_MAGNITUDE, MIN_MAGNITUDE};
use crate::feed::loader::FeedLoader;
use crate::feed::source::FeedPeriod;
use crate::ui::map::MapView;
use egui::Color32;

/// The only user-facing failure text; network and parse errors both land here
const FETCH_ERROR: &str = "Failed to fetch earthquake data";

/// The earthquake visualizer application: page shell, feed controls, and
/// the map view
pub struct QuakeApp {
    loader: FeedLoader,
    catalog: EventCatalog,
    map: MapView,
    period: FeedPeriod,
    error: Option<&'static str>,
}

impl QuakeApp {
    pub fn new(_cc: &eframe::CreationContext<'_>) -> Self {
        let mut app = Self::idle();
        app.select_period(app.period);
        app
    }

    /// App with no fetch issued yet
    fn idle() -> Self {
        Self {
            loader: FeedLoader::new(),
            catalog: EventCatalog::new(),
            map: MapView::new(),
            period: FeedPeriod::default(),
            error: None,
        }
    }

    /// Switches the feed period and starts fetching its event collection
    fn select_period(&mut self, period: FeedPeriod) {
        self.period = period;
        self.error = None;
        self.loader.request(period);
    }

    /// Re-filters the already-fetched data; never touches the network
    fn apply_threshold(&mut self, threshold: f64) {
        self.catalog.set_min_magnitude(threshold);
        self.map.request_fit();
    }

    fn poll_feed(&mut self) {
        let Some(response) = self.loader.poll() else {
            return;
        };

        match response.result {
            Ok(events) => {
                self.catalog.replace(events);
                self.error = None;
                self.map.request_fit();
            }
            Err(e) => {
                log::warn!("{:?} fetch failed: {}", response.period, e);
                self.error = Some(FETCH_ERROR);
            }
        }
    }

    fn controls(&mut self, ui: &mut egui::Ui) {
        let previous = self.period;
        egui::ComboBox::from_label("Period")
            .selected_text(self.period.label())
            .show_ui(ui, |ui| {
                for period in FeedPeriod::ALL {
                    ui.selectable_value(&mut self.period, period, period.label());
                }
            });
        if self.period != previous {
            self.select_period(self.period);
        }

        ui.separator();

        let mut threshold = self.catalog.min_magnitude();
        let slider = ui.add(
            egui::Slider::new(&mut threshold, MIN_MAGNITUDE..=MAX_MAGNITUDE)
                .step_by(0.1)
                .fixed_decimals(1)
                .text("Min magnitude"),
        );
        if slider.changed() {
            self.apply_threshold(threshold);
        }

        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            if self.loader.is_loading() {
                ui.label("Loading…");
                ui.spinner();
            } else if let Some(error) = self.error {
                ui.colored_label(Color32::RED, error);
            } else {
                ui.label(format!("{} events", self.catalog.visible_count()));
            }
        });
    }
}

impl eframe::App for QuakeApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_feed();

        egui::TopBottomPanel::top("header").show(ctx, |ui| {
            ui.add_space(4.0);
            ui.heading("🌎 Earthquake Visualizer");
            ui.label("Explore recent earthquake activity around the world in real time.");
            ui.separator();
            ui.horizontal(|ui| self.controls(ui));
            ui.add_space(4.0);
        });

        egui::TopBottomPanel::bottom("footer").show(ctx, |ui| {
            ui.small("Data from USGS Earthquake API");
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            self.map.show(ui, &self.catalog);
        });

        // Keep polling for the in-flight fetch without busy-rendering
        if self.loader.is_loading() {
            ctx.request_repaint_after(std::time::Duration::from_millis(100));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::geo::LatLng;
    use crate::feed::event::SeismicEvent;

    fn event(magnitude: f64) -> SeismicEvent {
        SeismicEvent {
            id: format!("m{}", magnitude),
            magnitude,
            place: "test".to_string(),
            time_ms: None,
            position: LatLng::new(10.0, 20.0),
            depth_km: 5.0,
            url: None,
        }
    }

    #[test]
    fn test_threshold_change_does_not_fetch() {
        let mut app = QuakeApp::idle();
        app.catalog.replace(vec![event(2.0), event(4.0), event(6.0)]);
        assert_eq!(app.loader.request_count(), 0);

        app.apply_threshold(5.0);
        app.apply_threshold(3.0);

        assert_eq!(app.loader.request_count(), 0);
        assert_eq!(app.catalog.visible_count(), 2);
    }

    #[test]
    fn test_period_change_fetches_once() {
        let mut app = QuakeApp::idle();

        app.select_period(FeedPeriod::PastWeek);
        assert_eq!(app.loader.request_count(), 1);

        // Threshold sweep after the fetch leaves the count alone
        app.apply_threshold(5.0);
        app.apply_threshold(0.0);
        assert_eq!(app.loader.request_count(), 1);
    }

    #[test]
    fn test_mock_feed_threshold_scenario() {
        let mut app = QuakeApp::idle();
        app.catalog.replace(vec![event(2.0), event(4.0), event(6.0)]);

        app.apply_threshold(3.0);

        let magnitudes: Vec<_> = app.catalog.visible().map(|e| e.magnitude).collect();
        assert_eq!(magnitudes, vec![4.0, 6.0]);
    }
}
