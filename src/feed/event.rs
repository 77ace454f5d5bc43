use crate::core::geo::LatLng;
use chrono::{TimeZone, Utc};
use serde::Deserialize;

/// One seismic event from a USGS summary feed.
///
/// Events are immutable once decoded; the whole collection is replaced when
/// the selected feed period changes.
#[derive(Debug, Clone, PartialEq)]
pub struct SeismicEvent {
    pub id: String,
    pub magnitude: f64,
    pub place: String,
    /// Occurrence time in epoch milliseconds, when the feed reports one
    pub time_ms: Option<i64>,
    pub position: LatLng,
    pub depth_km: f64,
    /// USGS event page
    pub url: Option<String>,
}

impl SeismicEvent {
    /// Occurrence time formatted for display, or "Unknown"
    pub fn formatted_time(&self) -> String {
        self.time_ms
            .and_then(|ms| Utc.timestamp_millis_opt(ms).single())
            .map(|t| t.format("%b %e, %Y %H:%M UTC").to_string())
            .unwrap_or_else(|| "Unknown".to_string())
    }
}

/// Wire format of the USGS GeoJSON summary feeds
#[derive(Debug, Deserialize)]
struct FeedDocument {
    #[serde(default)]
    features: Vec<FeedFeature>,
}

#[derive(Debug, Deserialize)]
struct FeedFeature {
    id: Option<String>,
    #[serde(default)]
    properties: FeatureProperties,
    geometry: Option<FeatureGeometry>,
}

#[derive(Debug, Default, Deserialize)]
struct FeatureProperties {
    mag: Option<f64>,
    place: Option<String>,
    time: Option<i64>,
    url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FeatureGeometry {
    /// `[longitude, latitude, depth_km]`
    #[serde(default)]
    coordinates: Vec<f64>,
}

/// Decodes a feed document into seismic events.
///
/// Features without a magnitude or a usable point geometry carry nothing the
/// viewer can show, so they are dropped (the magnitude filter has to compare
/// against a real number).
pub fn decode_feed(json: &str) -> crate::Result<Vec<SeismicEvent>> {
    let doc: FeedDocument = serde_json::from_str(json)
        .map_err(|e| crate::Error::ParseError(format!("invalid feed document: {}", e)))?;

    let mut events = Vec::with_capacity(doc.features.len());
    for (index, feature) in doc.features.into_iter().enumerate() {
        match decode_feature(index, feature) {
            Some(event) => events.push(event),
            None => log::debug!("skipping feed feature {} without magnitude/geometry", index),
        }
    }

    log::info!("decoded {} seismic events", events.len());
    Ok(events)
}

fn decode_feature(index: usize, feature: FeedFeature) -> Option<SeismicEvent> {
    let magnitude = feature.properties.mag?;
    let geometry = feature.geometry?;
    if geometry.coordinates.len() < 2 {
        return None;
    }

    let position = LatLng::new(geometry.coordinates[1], geometry.coordinates[0]);
    if !position.is_valid() {
        return None;
    }

    Some(SeismicEvent {
        id: feature.id.unwrap_or_else(|| format!("event-{}", index)),
        magnitude,
        place: feature
            .properties
            .place
            .unwrap_or_else(|| "Unknown location".to_string()),
        time_ms: feature.properties.time,
        position,
        depth_km: geometry.coordinates.get(2).copied().unwrap_or(0.0),
        url: feature.properties.url,
    })
}
