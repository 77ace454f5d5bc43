/// Time window of the USGS "all earthquakes" summary feed.
///
/// Each period maps to a fixed endpoint returning a GeoJSON document of the
/// events recorded in that window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeedPeriod {
    PastHour,
    PastDay,
    PastWeek,
}

impl FeedPeriod {
    /// All selectable periods, in UI order
    pub const ALL: [FeedPeriod; 3] = [Self::PastHour, Self::PastDay, Self::PastWeek];

    /// Endpoint URL for this period's feed
    pub fn url(&self) -> &'static str {
        match self {
            Self::PastHour => {
                "https://earthquake.usgs.gov/earthquakes/feed/v1.0/summary/all_hour.geojson"
            }
            Self::PastDay => {
                "https://earthquake.usgs.gov/earthquakes/feed/v1.0/summary/all_day.geojson"
            }
            Self::PastWeek => {
                "https://earthquake.usgs.gov/earthquakes/feed/v1.0/summary/all_week.geojson"
            }
        }
    }

    /// Human-readable label for selectors
    pub fn label(&self) -> &'static str {
        match self {
            Self::PastHour => "Past Hour",
            Self::PastDay => "Past Day",
            Self::PastWeek => "Past Week",
        }
    }
}

impl Default for FeedPeriod {
    fn default() -> Self {
        Self::PastDay
    }
}
