//! OpenStreetMap raster basemap: tile URLs, background download and decode,
//! and an LRU-backed texture store polled by the map view each frame.

use std::num::NonZeroUsize;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::thread;

use lru::LruCache;

use crate::core::geo::{Point, TileCoord};
use crate::core::viewport::Viewport;
use crate::net;

/// Edge length of a slippy map tile in pixels
pub const TILE_SIZE: u32 = 256;

/// A slippy tile server with subdomain rotation
#[derive(Debug, Clone)]
pub struct TileServer {
    subdomains: &'static [&'static str],
    attribution: &'static str,
}

impl TileServer {
    /// The default OpenStreetMap tile server
    pub fn openstreetmap() -> Self {
        Self {
            subdomains: &["a", "b", "c"],
            attribution: "© OpenStreetMap contributors",
        }
    }

    /// Build a URL for the requested tile
    pub fn url(&self, coord: TileCoord) -> String {
        let idx = ((coord.x + coord.y) % self.subdomains.len() as u32) as usize;
        format!(
            "https://{}.tile.openstreetmap.org/{}/{}/{}.png",
            self.subdomains[idx], coord.z, coord.x, coord.y
        )
    }

    pub fn attribution(&self) -> &'static str {
        self.attribution
    }
}

/// Lifecycle of one tile slot in the store
enum TileSlot {
    /// Download in flight
    Pending,
    /// Download or decode failed; background color shows through
    Failed,
    /// Uploaded and ready to paint
    Ready(egui::TextureHandle),
}

/// Tile cache with LRU eviction.
///
/// Requests are deduplicated through the slot state; downloads and PNG
/// decoding run on detached threads and completed images are uploaded as
/// egui textures during [`poll_completed`](Self::poll_completed). Dropping
/// an evicted `TextureHandle` releases its texture.
pub struct TileStore {
    server: TileServer,
    tiles: LruCache<TileCoord, TileSlot>,
    tx: Sender<(TileCoord, Option<egui::ColorImage>)>,
    rx: Receiver<(TileCoord, Option<egui::ColorImage>)>,
}

impl TileStore {
    pub fn new(server: TileServer, capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity.max(1))
            .unwrap_or(NonZeroUsize::MIN);
        let (tx, rx) = channel();
        Self {
            server,
            tiles: LruCache::new(capacity),
            tx,
            rx,
        }
    }

    pub fn attribution(&self) -> &'static str {
        self.server.attribution()
    }

    /// Texture for the tile if it is ready, scheduling a download the first
    /// time a coordinate is seen
    pub fn texture_for(&mut self, coord: TileCoord) -> Option<egui::TextureHandle> {
        if !coord.is_valid() {
            return None;
        }

        match self.tiles.get(&coord) {
            Some(TileSlot::Ready(texture)) => Some(texture.clone()),
            Some(TileSlot::Pending) | Some(TileSlot::Failed) => None,
            None => {
                self.tiles.put(coord, TileSlot::Pending);
                self.spawn_fetch(coord);
                None
            }
        }
    }

    /// Drains completed downloads, uploading them as textures.
    /// Returns the number of tiles that became ready.
    pub fn poll_completed(&mut self, ctx: &egui::Context) -> usize {
        let mut ready = 0;
        while let Ok((coord, image)) = self.rx.try_recv() {
            let slot = match image {
                Some(image) => {
                    let texture = ctx.load_texture(
                        format!("tile-{}-{}-{}", coord.z, coord.x, coord.y),
                        image,
                        egui::TextureOptions::LINEAR,
                    );
                    ready += 1;
                    TileSlot::Ready(texture)
                }
                None => TileSlot::Failed,
            };
            self.tiles.put(coord, slot);
        }
        ready
    }

    fn spawn_fetch(&self, coord: TileCoord) {
        let url = self.server.url(coord);
        let tx = self.tx.clone();

        thread::spawn(move || {
            log::debug!("fetching tile {:?}", coord);
            let image = match net::fetch_bytes(&url).and_then(|bytes| decode_tile(&bytes)) {
                Ok(image) => Some(image),
                Err(e) => {
                    log::warn!("tile {:?} failed: {}", coord, e);
                    None
                }
            };
            // Receiver may be gone during shutdown
            let _ = tx.send((coord, image));
        });
    }
}

fn decode_tile(bytes: &[u8]) -> crate::Result<egui::ColorImage> {
    let image = image::load_from_memory(bytes)?;
    let rgba = image.to_rgba8();
    let size = [rgba.width() as usize, rgba.height() as usize];
    Ok(egui::ColorImage::from_rgba_unmultiplied(size, rgba.as_raw()))
}

/// Tile coordinates covering the viewport at the given integer zoom
pub fn tile_range(viewport: &Viewport, zoom: u8) -> Vec<TileCoord> {
    let max_index = 2_u32.pow(zoom as u32).saturating_sub(1);

    let nw = viewport.pixel_to_lat_lng(&Point::new(0.0, 0.0));
    let se = viewport.pixel_to_lat_lng(&Point::new(viewport.size.x, viewport.size.y));

    let nw_tile = TileCoord::from_lat_lng(&nw, zoom);
    let se_tile = TileCoord::from_lat_lng(&se, zoom);

    let x_min = nw_tile.x.min(max_index);
    let x_max = se_tile.x.min(max_index);
    let y_min = nw_tile.y.min(max_index);
    let y_max = se_tile.y.min(max_index);

    let mut tiles = Vec::new();
    for x in x_min..=x_max {
        for y in y_min..=y_max {
            tiles.push(TileCoord::new(x, y, zoom));
        }
    }
    tiles
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::geo::{LatLng, Point};

    #[test]
    fn test_osm_url_format() {
        let server = TileServer::openstreetmap();
        let url = server.url(TileCoord::new(2, 1, 3));
        assert!(url.ends_with("/3/2/1.png"));
        assert!(url.contains(".tile.openstreetmap.org"));
    }

    #[test]
    fn test_subdomain_rotation_is_deterministic() {
        let server = TileServer::openstreetmap();
        let coord = TileCoord::new(7, 5, 4);
        assert_eq!(server.url(coord), server.url(coord));
    }

    #[test]
    fn test_tile_range_covers_world_at_low_zoom() {
        let viewport = Viewport::new(LatLng::new(0.0, 0.0), 1.0, Point::new(512.0, 512.0));
        let tiles = tile_range(&viewport, 1);

        // Whole world at zoom 1 is a 2x2 grid
        assert_eq!(tiles.len(), 4);
        assert!(tiles.iter().all(|t| t.is_valid()));
    }

    #[test]
    fn test_tile_range_clamps_to_world_edge() {
        let viewport = Viewport::new(LatLng::new(80.0, 175.0), 3.0, Point::new(1024.0, 768.0));
        let tiles = tile_range(&viewport, 3);
        assert!(tiles.iter().all(|t| t.is_valid()));
    }
}
