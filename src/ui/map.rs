use crate::basemap::{tile_range, TileServer, TileStore, TILE_SIZE};
use crate::core::geo::{LatLng, Point};
use crate::core::viewport::Viewport;
use crate::feed::catalog::EventCatalog;
use crate::feed::event::SeismicEvent;
use crate::style::MarkerStyle;
use crate::ui::popup::{EventPopup, PopupAction};
use egui::{Color32, FontId, Pos2, Rect, Response, Sense, Stroke, Ui, Vec2};

/// Padding around the fitted bounds, in pixels per side
pub const FIT_PADDING: f64 = 40.0;
/// Auto-fit never zooms in past this level
pub const FIT_MAX_ZOOM: f64 = 6.0;

const TILE_CACHE_CAPACITY: usize = 512;
const SCROLL_ZOOM_STEP: f64 = 0.003;

/// Interactive slippy map rendering the basemap, event markers, and the
/// detail popup
pub struct MapView {
    viewport: Viewport,
    tiles: TileStore,
    popup: Option<EventPopup>,
    fit_requested: bool,
}

impl MapView {
    pub fn new() -> Self {
        Self {
            // Initial world view matching the source application
            viewport: Viewport::new(LatLng::new(20.0, 0.0), 2.0, Point::new(800.0, 600.0)),
            tiles: TileStore::new(TileServer::openstreetmap(), TILE_CACHE_CAPACITY),
            popup: None,
            fit_requested: false,
        }
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// Re-frame around the visible events on the next frame.
    /// A no-op when the filtered set turns out to be empty.
    pub fn request_fit(&mut self) {
        self.fit_requested = true;
    }

    pub fn show(&mut self, ui: &mut Ui, catalog: &EventCatalog) -> Response {
        let (rect, response) =
            ui.allocate_exact_size(ui.available_size(), Sense::click_and_drag());
        self.viewport
            .set_size(Point::new(rect.width() as f64, rect.height() as f64));

        if self.fit_requested {
            if let Some(bounds) = catalog.visible_bounds() {
                self.viewport.fit_bounds(&bounds, FIT_PADDING, FIT_MAX_ZOOM);
            }
            self.fit_requested = false;
        }

        self.handle_input(ui, &rect, &response);

        if self.tiles.poll_completed(ui.ctx()) > 0 {
            ui.ctx().request_repaint();
        }

        let painter = ui.painter_at(rect);
        painter.rect_filled(rect, 0.0, Color32::from_rgb(230, 230, 230));
        self.paint_tiles(&painter, &rect);
        self.paint_markers(&painter, &rect, catalog);
        self.paint_attribution(&painter, &rect);

        self.handle_marker_clicks(&rect, &response, catalog);
        self.show_popup(ui, &rect, catalog);

        response
    }

    fn handle_input(&mut self, ui: &Ui, rect: &Rect, response: &Response) {
        if response.dragged() {
            let delta = response.drag_delta();
            if delta.length_sq() > 0.0 {
                // Dragging right moves the world origin west
                self.viewport
                    .pan(Point::new(-delta.x as f64, -delta.y as f64));
            }
        }

        if response.hovered() {
            let scroll = ui.input(|i| i.raw_scroll_delta.y);
            if scroll.abs() > 0.1 {
                let focus = response
                    .hover_pos()
                    .map(|p| Point::new((p.x - rect.min.x) as f64, (p.y - rect.min.y) as f64));
                let target = self.viewport.zoom + scroll as f64 * SCROLL_ZOOM_STEP;
                self.viewport.zoom_to(target, focus);
            }
        }
    }

    fn paint_tiles(&mut self, painter: &egui::Painter, rect: &Rect) {
        let zoom_level = self.viewport.zoom.floor().clamp(0.0, 18.0) as u8;
        // Tiles for an integer zoom level, scaled up for fractional zooms
        let tile_px = TILE_SIZE as f64 * 2_f64.powf(self.viewport.zoom - zoom_level as f64);
        let origin = self.viewport.world_origin();

        let uv = Rect::from_min_max(Pos2::ZERO, Pos2::new(1.0, 1.0));
        for coord in tile_range(&self.viewport, zoom_level) {
            if let Some(texture) = self.tiles.texture_for(coord) {
                let x = coord.x as f64 * tile_px - origin.x;
                let y = coord.y as f64 * tile_px - origin.y;
                let tile_rect = Rect::from_min_size(
                    rect.min + Vec2::new(x as f32, y as f32),
                    Vec2::splat(tile_px as f32),
                );
                if tile_rect.intersects(*rect) {
                    painter.image(texture.id(), tile_rect, uv, Color32::WHITE);
                }
            }
        }
    }

    fn paint_markers(&self, painter: &egui::Painter, rect: &Rect, catalog: &EventCatalog) {
        for event in catalog.visible() {
            let style = MarkerStyle::for_magnitude(event.magnitude);
            let pos = self.marker_screen_pos(rect, event);
            let radius = style.radius as f32;

            if rect.expand(radius).contains(pos) {
                painter.circle(
                    pos,
                    radius,
                    style.fill_color,
                    Stroke::new(1.0, style.stroke_color),
                );
            }
        }
    }

    fn paint_attribution(&self, painter: &egui::Painter, rect: &Rect) {
        painter.text(
            rect.right_bottom() - Vec2::new(4.0, 2.0),
            egui::Align2::RIGHT_BOTTOM,
            self.tiles.attribution(),
            FontId::proportional(10.0),
            Color32::DARK_GRAY,
        );
    }

    fn handle_marker_clicks(&mut self, rect: &Rect, response: &Response, catalog: &EventCatalog) {
        if !response.clicked() {
            return;
        }
        let Some(click_pos) = response.interact_pointer_pos() else {
            return;
        };

        // Closest marker whose circle covers the click; small markers get a
        // slightly larger hit target
        let mut hit: Option<(&SeismicEvent, f32)> = None;
        for event in catalog.visible() {
            let style = MarkerStyle::for_magnitude(event.magnitude);
            let pos = self.marker_screen_pos(rect, event);
            let distance = pos.distance(click_pos);
            if distance <= (style.radius as f32).max(6.0)
                && hit.map_or(true, |(_, best)| distance < best)
            {
                hit = Some((event, distance));
            }
        }

        // Clicking empty map dismisses any open popup
        self.popup = hit.map(|(event, _)| EventPopup::new(event.id.clone()));
    }

    fn show_popup(&mut self, ui: &Ui, rect: &Rect, catalog: &EventCatalog) {
        let Some(popup) = self.popup.take() else {
            return;
        };

        // The selected event may have been filtered out or replaced
        let Some(event) = catalog.visible().find(|e| e.id == popup.event_id) else {
            return;
        };

        let pos = self.marker_screen_pos(rect, event);
        if popup.show(ui, event, pos) != PopupAction::Close {
            self.popup = Some(popup);
        }
    }

    fn marker_screen_pos(&self, rect: &Rect, event: &SeismicEvent) -> Pos2 {
        let screen = self.viewport.lat_lng_to_pixel(&event.position);
        rect.min + Vec2::new(screen.x as f32, screen.y as f32)
    }
}

impl Default for MapView {
    fn default() -> Self {
        Self::new()
    }
}
