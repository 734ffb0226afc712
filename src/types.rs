//! Core data structures for incident reporting.
//!
//! This module defines the fundamental types used throughout the library:
//!
//! - [`Incident`] - A stored report with identity, provenance, and location
//! - [`Location`] - Canonical coordinates with an optional display address
//! - [`Coord`] - Bare coordinate pair with distance calculations
//! - [`IncidentType`] - The closed set of recognized incident categories
//! - [`Severity`] - Three-level impact scale used for ranking

#![warn(missing_docs)]

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

/// A coordinate pair with distance calculation capabilities.
///
/// This is a simple wrapper around latitude and longitude coordinates that provides
/// utility methods for geographic calculations. Unlike [`Location`], it carries no
/// address and is `Copy`, making it the currency of the distance and map code.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coord {
    /// Latitude in decimal degrees (-90 to 90)
    pub lat: f64,
    /// Longitude in decimal degrees (-180 to 180)
    pub lng: f64,
}

impl Coord {
    /// Constructs a new coordinate pair.
    ///
    /// # Examples
    ///
    /// ```
    /// use sitrep::Coord;
    ///
    /// let kochi = Coord::new(9.9312, 76.2673);
    /// assert_eq!(kochi.lat, 9.9312);
    /// assert_eq!(kochi.lng, 76.2673);
    /// ```
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Calculates the great-circle distance to another coordinate using the haversine formula.
    ///
    /// Returns the distance in kilometers. This calculation assumes a spherical Earth
    /// with radius 6371 km, which provides accuracy within 0.5% for most distances.
    /// The result is always finite, including for antipodal coordinate pairs.
    ///
    /// # Examples
    ///
    /// ```
    /// use sitrep::Coord;
    ///
    /// let kochi = Coord::new(9.9312, 76.2673);
    /// let delhi = Coord::new(28.7041, 77.1025);
    ///
    /// let distance = kochi.distance_km(&delhi);
    /// assert!(distance > 2050.0 && distance < 2130.0); // ~2089 km
    /// ```
    pub fn distance_km(&self, other: &Coord) -> f64 {
        let lat1 = self.lat.to_radians();
        let lat2 = other.lat.to_radians();
        let delta_lat = (other.lat - self.lat).to_radians();
        let delta_lng = (other.lng - self.lng).to_radians();

        let a = (delta_lat / 2.0).sin().powi(2)
            + lat1.cos() * lat2.cos() * (delta_lng / 2.0).sin().powi(2);
        // Rounding can push the term just past 1 for antipodal pairs, where the
        // square root below would produce NaN.
        let a = a.clamp(0.0, 1.0);
        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

        6371.0 * c
    }
}

/// A canonical incident location: validated coordinates plus an optional address.
///
/// Every location stored on an [`Incident`] has passed normalization, so its
/// coordinates are finite and inside the legal latitude/longitude ranges. The
/// address is an opaque display string and is never geocoded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    /// Latitude in decimal degrees (-90 to 90)
    pub lat: f64,
    /// Longitude in decimal degrees (-180 to 180)
    pub lng: f64,
    /// Free-form display address (e.g., "Ernakulam, Kochi, Kerala"), if one was provided
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

impl Location {
    /// Constructs a location from coordinates, with no address.
    ///
    /// # Examples
    ///
    /// ```
    /// use sitrep::Location;
    ///
    /// let loc = Location::new(19.8135, 85.8312);
    /// assert!(loc.address.is_none());
    /// ```
    pub fn new(lat: f64, lng: f64) -> Self {
        Self {
            lat,
            lng,
            address: None,
        }
    }

    /// Attaches a display address, consuming and returning the location.
    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    /// Returns the bare coordinate pair for distance and projection math.
    pub fn coord(&self) -> Coord {
        Coord::new(self.lat, self.lng)
    }

    /// Reports whether both coordinates are finite and inside the legal ranges.
    ///
    /// Locations produced by normalization always pass. Hand-built or
    /// deserialized values may not, which is why the map projector re-checks
    /// before plotting.
    ///
    /// # Examples
    ///
    /// ```
    /// use sitrep::Location;
    ///
    /// assert!(Location::new(9.9312, 76.2673).is_valid());
    /// assert!(!Location::new(91.0, 0.0).is_valid());
    /// assert!(!Location::new(0.0, f64::NAN).is_valid());
    /// ```
    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.lat) && (-180.0..=180.0).contains(&self.lng)
    }
}

/// The closed set of incident categories a report can carry.
///
/// Serialized as lowercase strings ("flood", "heatwave", ...) to match the
/// report form's wire values. Unknown names are rejected at the submission
/// boundary rather than coerced, see [`IncidentType::from_str`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IncidentType {
    /// River, coastal, or flash flooding
    Flood,
    /// Structural or wildland fire
    Fire,
    /// Seismic event
    Earthquake,
    /// Hurricane or tropical storm
    Hurricane,
    /// Tornado
    Tornado,
    /// Slope failure or debris flow
    Landslide,
    /// Tsunami or seiche
    Tsunami,
    /// Cyclonic storm, including storm surge
    Cyclone,
    /// Extreme heat event
    Heatwave,
    /// Transport or industrial accident
    Accident,
    /// Anything outside the named categories
    Other,
}

impl IncidentType {
    /// Every recognized category, in report-form display order.
    pub const ALL: [IncidentType; 11] = [
        IncidentType::Flood,
        IncidentType::Fire,
        IncidentType::Earthquake,
        IncidentType::Hurricane,
        IncidentType::Tornado,
        IncidentType::Landslide,
        IncidentType::Tsunami,
        IncidentType::Cyclone,
        IncidentType::Heatwave,
        IncidentType::Accident,
        IncidentType::Other,
    ];
}

impl std::fmt::Display for IncidentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IncidentType::Flood => write!(f, "Flood"),
            IncidentType::Fire => write!(f, "Fire"),
            IncidentType::Earthquake => write!(f, "Earthquake"),
            IncidentType::Hurricane => write!(f, "Hurricane"),
            IncidentType::Tornado => write!(f, "Tornado"),
            IncidentType::Landslide => write!(f, "Landslide"),
            IncidentType::Tsunami => write!(f, "Tsunami"),
            IncidentType::Cyclone => write!(f, "Cyclone"),
            IncidentType::Heatwave => write!(f, "Heatwave"),
            IncidentType::Accident => write!(f, "Accident"),
            IncidentType::Other => write!(f, "Other"),
        }
    }
}

/// Error returned when an incident type name is not one of the recognized categories.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unrecognized incident type: {0:?}")]
pub struct ParseIncidentTypeError(pub String);

impl FromStr for IncidentType {
    type Err = ParseIncidentTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "flood" => Ok(IncidentType::Flood),
            "fire" => Ok(IncidentType::Fire),
            "earthquake" => Ok(IncidentType::Earthquake),
            "hurricane" => Ok(IncidentType::Hurricane),
            "tornado" => Ok(IncidentType::Tornado),
            "landslide" => Ok(IncidentType::Landslide),
            "tsunami" => Ok(IncidentType::Tsunami),
            "cyclone" => Ok(IncidentType::Cyclone),
            "heatwave" => Ok(IncidentType::Heatwave),
            "accident" => Ok(IncidentType::Accident),
            "other" => Ok(IncidentType::Other),
            _ => Err(ParseIncidentTypeError(s.to_string())),
        }
    }
}

/// Three-level impact scale attached to every incident.
///
/// Serialized as lowercase strings ("low", "medium", "high"). The numeric
/// [`rank`](Severity::rank) drives the severity sort in the discovery engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Minor incident
    Low,
    /// Significant impact
    Medium,
    /// Major emergency
    High,
}

impl Severity {
    /// Every severity level, lowest first.
    pub const ALL: [Severity; 3] = [Severity::Low, Severity::Medium, Severity::High];

    /// Numeric weight for ordering: low is 1, medium is 2, high is 3.
    ///
    /// # Examples
    ///
    /// ```
    /// use sitrep::Severity;
    ///
    /// assert!(Severity::High.rank() > Severity::Low.rank());
    /// ```
    pub fn rank(&self) -> u8 {
        match self {
            Severity::Low => 1,
            Severity::Medium => 2,
            Severity::High => 3,
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Low => write!(f, "Low"),
            Severity::Medium => write!(f, "Medium"),
            Severity::High => write!(f, "High"),
        }
    }
}

/// Error returned when a severity name is not one of the three recognized levels.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unrecognized severity: {0:?}")]
pub struct ParseSeverityError(pub String);

impl FromStr for Severity {
    type Err = ParseSeverityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "low" => Ok(Severity::Low),
            "medium" => Ok(Severity::Medium),
            "high" => Ok(Severity::High),
            _ => Err(ParseSeverityError(s.to_string())),
        }
    }
}

/// A stored incident report.
///
/// Records are created exclusively through
/// [`IncidentStore::insert`](crate::IncidentStore::insert), which assigns the
/// identity and provenance fields. Once stored, everything except the
/// [`verified`](Incident::verified) flag is immutable.
///
/// The serialized form uses the report feed's JSON field names
/// (`type`, `imageUrl`, `reportedBy`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Incident {
    /// Unique identifier, assigned at insert and never reused
    pub id: String,
    /// Short human-readable headline (e.g., "Severe Flooding in Kochi Lowlands")
    pub title: String,
    /// Longer prose description of what was observed
    pub description: String,
    /// Incident category
    #[serde(rename = "type")]
    pub kind: IncidentType,
    /// Reporter-assessed impact level
    pub severity: Severity,
    /// Canonical, validated location of the incident
    pub location: Location,
    /// Image URL or data URI, if the reporter attached a picture.
    /// `None` means the feed shows its default imagery for the category.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    /// Identifier of the submitting user
    pub reported_by: String,
    /// Creation instant, stamped by the store and never updated
    pub timestamp: DateTime<Utc>,
    /// Whether the report has been confirmed through the external trust process
    pub verified: bool,
}
