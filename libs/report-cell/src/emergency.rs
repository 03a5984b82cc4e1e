use serde::{Deserialize, Serialize};

pub const EMERGENCY_NUMBER: &str = "911";
const MAPS_SEARCH_BASE: &str = "https://www.google.com/maps/search";

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinates {
    /// Rejects values outside the valid latitude/longitude ranges.
    pub fn new(lat: f64, lon: f64) -> Option<Self> {
        let valid = (-90.0..=90.0).contains(&lat) && (-180.0..=180.0).contains(&lon);
        valid.then_some(Self { lat, lon })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmergencyLinks {
    pub call_uri: String,
    pub nearest_hospital_url: String,
}

impl EmergencyLinks {
    pub fn new(location: Option<Coordinates>) -> Self {
        Self {
            call_uri: format!("tel:{}", EMERGENCY_NUMBER),
            nearest_hospital_url: nearest_hospital_url(location),
        }
    }
}

impl Default for EmergencyLinks {
    fn default() -> Self {
        Self::new(None)
    }
}

pub fn nearest_hospital_url(location: Option<Coordinates>) -> String {
    match location {
        Some(Coordinates { lat, lon }) => {
            format!("{}/hospital/@{:.6},{:.6},14z", MAPS_SEARCH_BASE, lat, lon)
        }
        None => format!("{}/hospitals+near+me", MAPS_SEARCH_BASE),
    }
}
