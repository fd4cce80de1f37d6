use serde::Deserialize;
use tracing::{debug, warn};

/// Nominatim-format search result
#[derive(Debug, Deserialize)]
struct GeocodeResult {
    lat: String,
    lon: String,
}

/// A longitude/latitude pair
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    pub longitude: f64,
    pub latitude: f64,
}

impl GeoPoint {
    /// The origin point, used when a listing's location cannot be resolved.
    pub fn origin() -> Self {
        GeoPoint {
            longitude: 0.0,
            latitude: 0.0,
        }
    }
}

/// Forward-geocoding client against a Nominatim-compatible endpoint.
///
/// Geocoding is best-effort: every failure mode (unconfigured endpoint,
/// blank input, HTTP error, empty result set, unparseable coordinates)
/// resolves to `None` rather than an error, and callers fall back to the
/// origin point. Listing creation must never fail because a map service
/// was down.
#[derive(Debug, Clone)]
pub struct Geocoder {
    client: reqwest::Client,
    base_url: Option<String>,
}

impl Geocoder {
    /// Create a geocoder. `base_url` of `None` disables geocoding entirely
    /// (every lookup resolves to `None`).
    pub fn new(base_url: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url,
        }
    }

    /// A geocoder that never resolves anything.
    pub fn disabled() -> Self {
        Self::new(None)
    }

    /// Resolve free-text place like "Jaipur, India" to a point.
    pub async fn geocode(&self, place: &str) -> Option<GeoPoint> {
        let base = self.base_url.as_deref()?;
        let place = place.trim();
        if place.is_empty() {
            return None;
        }

        let url = format!(
            "{}/search?q={}&format=json&limit=1",
            base.trim_end_matches('/'),
            urlencoding::encode(place)
        );

        debug!("Geocoding location: {}", place);

        let response = self
            .client
            .get(&url)
            .header("User-Agent", "Roost/1.0 (listings API)")
            .timeout(std::time::Duration::from_secs(10))
            .send()
            .await;

        let results: Vec<GeocodeResult> = match response {
            Ok(resp) => match resp.json().await {
                Ok(results) => results,
                Err(e) => {
                    warn!(error = %e, "Failed to parse geocoding response");
                    return None;
                }
            },
            Err(e) => {
                warn!(error = %e, place = %place, "Geocoding request failed");
                return None;
            }
        };

        let first = match results.first() {
            Some(first) => first,
            None => {
                debug!(place = %place, "Location not found by geocoder");
                return None;
            }
        };

        let latitude: f64 = first.lat.parse().ok()?;
        let longitude: f64 = first.lon.parse().ok()?;

        debug!("Geocoded {} -> ({}, {})", place, longitude, latitude);

        Some(GeoPoint {
            longitude,
            latitude,
        })
    }
}
