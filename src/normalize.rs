//! Normalizes raw location shapes into canonical [`Location`] values.
//!
//! Report submissions and imported records carry locations in several
//! historical shapes: an object with `lat`/`lng` fields, a GeoJSON-style
//! point with a `[lng, lat]` coordinate array, or a flat object whose
//! top-level fields happen to be coordinates. [`normalize`] reconciles all
//! of them, validates the coordinate ranges, and rejects anything it cannot
//! interpret. Nothing downstream of this module ever sees an
//! un-normalized location.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::Location;

/// A raw location value as submitted, before normalization.
///
/// Deserialization is shape-driven: the variants are tried in declaration
/// order and the first that fits wins, so an object carrying both `lat`/`lng`
/// fields and a `coordinates` array is read as [`Plain`](LocationInput::Plain).
/// Unknown extra fields are ignored, which is what lets a flat report payload
/// with top-level `lat`/`lng` normalize without a wrapper object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LocationInput {
    /// Already-canonical shape: `{ "lat": 9.93, "lng": 76.27, "address": ... }`
    Plain {
        /// Latitude in decimal degrees
        lat: f64,
        /// Longitude in decimal degrees
        lng: f64,
        /// Optional display address, preserved through normalization
        #[serde(default, skip_serializing_if = "Option::is_none")]
        address: Option<String>,
    },
    /// GeoJSON point convention: `{ "coordinates": [lng, lat] }`.
    /// A third altitude element is tolerated and ignored.
    GeoJson {
        /// Point coordinates in `[lng, lat]` order
        coordinates: Vec<f64>,
    },
}

impl From<Location> for LocationInput {
    fn from(location: Location) -> Self {
        LocationInput::Plain {
            lat: location.lat,
            lng: location.lng,
            address: location.address,
        }
    }
}

/// Errors produced when a raw location cannot be normalized.
///
/// A failed normalization is always reported to the caller; out-of-range or
/// unrecognized input is never coerced to a placeholder coordinate.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum NormalizeError {
    /// The value matched none of the accepted location shapes.
    #[error("unrecognized location shape")]
    UnrecognizedShape,
    /// Latitude was not a finite number in [-90, 90].
    #[error("latitude {0} is outside the valid range -90..=90")]
    LatitudeOutOfRange(f64),
    /// Longitude was not a finite number in [-180, 180].
    #[error("longitude {0} is outside the valid range -180..=180")]
    LongitudeOutOfRange(f64),
}

/// Converts a raw location shape into a canonical [`Location`].
///
/// GeoJSON coordinate arrays are reordered from `[lng, lat]` to
/// `{lat, lng}`. Coordinates outside the legal ranges are rejected, and a
/// blank or whitespace-only address collapses to `None`.
///
/// # Examples
///
/// ```
/// use sitrep::normalize::{normalize, LocationInput};
///
/// let input = LocationInput::GeoJson {
///     coordinates: vec![76.27, 9.93],
/// };
/// let location = normalize(input).unwrap();
/// assert_eq!(location.lat, 9.93);
/// assert_eq!(location.lng, 76.27);
/// ```
pub fn normalize(input: LocationInput) -> Result<Location, NormalizeError> {
    let (lat, lng, address) = match input {
        LocationInput::Plain { lat, lng, address } => (lat, lng, address),
        LocationInput::GeoJson { coordinates } => {
            if coordinates.len() < 2 {
                return Err(NormalizeError::UnrecognizedShape);
            }
            (coordinates[1], coordinates[0], None)
        }
    };

    if !(-90.0..=90.0).contains(&lat) {
        return Err(NormalizeError::LatitudeOutOfRange(lat));
    }
    if !(-180.0..=180.0).contains(&lng) {
        return Err(NormalizeError::LongitudeOutOfRange(lng));
    }

    let address = address
        .map(|a| a.trim().to_string())
        .filter(|a| !a.is_empty());

    Ok(Location { lat, lng, address })
}

/// Normalizes an arbitrary JSON value into a canonical [`Location`].
///
/// This is the entry point for shapes arriving from outside the typed API,
/// such as geolocation payloads or imported feed records. Values that decode
/// into none of the accepted shapes yield
/// [`NormalizeError::UnrecognizedShape`].
///
/// # Examples
///
/// ```
/// use sitrep::normalize::{normalize_value, NormalizeError};
/// use serde_json::json;
///
/// let location = normalize_value(&json!({"coordinates": [76.27, 9.93]})).unwrap();
/// assert_eq!((location.lat, location.lng), (9.93, 76.27));
///
/// let err = normalize_value(&json!("not a location")).unwrap_err();
/// assert_eq!(err, NormalizeError::UnrecognizedShape);
/// ```
pub fn normalize_value(value: &serde_json::Value) -> Result<Location, NormalizeError> {
    let input =
        LocationInput::deserialize(value).map_err(|_| NormalizeError::UnrecognizedShape)?;
    normalize(input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn plain_shape_passes_through_with_address() {
        let input = LocationInput::Plain {
            lat: 9.931233,
            lng: 76.267303,
            address: Some("Ernakulam, Kochi, Kerala".to_string()),
        };

        let location = normalize(input).unwrap();
        assert_eq!(location.lat, 9.931233);
        assert_eq!(location.lng, 76.267303);
        assert_eq!(location.address.as_deref(), Some("Ernakulam, Kochi, Kerala"));
    }

    #[test]
    fn blank_address_collapses_to_none() {
        let input = LocationInput::Plain {
            lat: 19.8135,
            lng: 85.8312,
            address: Some("   ".to_string()),
        };

        assert_eq!(normalize(input).unwrap().address, None);
    }

    #[test]
    fn geojson_coordinates_are_reordered() {
        let location = normalize(LocationInput::GeoJson {
            coordinates: vec![76.27, 9.93],
        })
        .unwrap();

        assert_eq!(location.lat, 9.93);
        assert_eq!(location.lng, 76.27);
        assert_eq!(location.address, None);
    }

    #[test]
    fn geojson_altitude_element_is_ignored() {
        let location = normalize(LocationInput::GeoJson {
            coordinates: vec![77.1025, 28.7041, 216.0],
        })
        .unwrap();

        assert_eq!(location.lat, 28.7041);
        assert_eq!(location.lng, 77.1025);
    }

    #[test]
    fn geojson_with_single_coordinate_is_rejected() {
        let err = normalize(LocationInput::GeoJson {
            coordinates: vec![76.27],
        })
        .unwrap_err();

        assert_eq!(err, NormalizeError::UnrecognizedShape);
    }

    #[test]
    fn out_of_range_coordinates_are_rejected_not_coerced() {
        let err = normalize(LocationInput::Plain {
            lat: 91.0,
            lng: 0.0,
            address: None,
        })
        .unwrap_err();
        assert_eq!(err, NormalizeError::LatitudeOutOfRange(91.0));

        let err = normalize(LocationInput::Plain {
            lat: 0.0,
            lng: -181.0,
            address: None,
        })
        .unwrap_err();
        assert_eq!(err, NormalizeError::LongitudeOutOfRange(-181.0));

        // GeoJSON order means the range check sees the reordered values.
        let err = normalize(LocationInput::GeoJson {
            coordinates: vec![200.0, 10.0],
        })
        .unwrap_err();
        assert_eq!(err, NormalizeError::LongitudeOutOfRange(200.0));
    }

    #[test]
    fn nan_coordinates_fail_the_range_check() {
        let err = normalize(LocationInput::Plain {
            lat: f64::NAN,
            lng: 0.0,
            address: None,
        })
        .unwrap_err();

        assert!(matches!(err, NormalizeError::LatitudeOutOfRange(_)));
    }

    #[test]
    fn value_entry_accepts_all_three_documented_shapes() {
        // 1. Already-canonical object.
        let location = normalize_value(&json!({
            "lat": 9.931233,
            "lng": 76.267303,
            "address": "Ernakulam, Kochi, Kerala"
        }))
        .unwrap();
        assert_eq!(location.lat, 9.931233);

        // 2. GeoJSON point, extra fields ignored.
        let location = normalize_value(&json!({
            "type": "Point",
            "coordinates": [80.270718, 13.082680]
        }))
        .unwrap();
        assert_eq!((location.lat, location.lng), (13.082680, 80.270718));

        // 3. Flat payload with top-level coordinate fields.
        let location = normalize_value(&json!({
            "title": "Large Fire in Industrial Area",
            "lat": 19.076090,
            "lng": 72.877426
        }))
        .unwrap();
        assert_eq!((location.lat, location.lng), (19.076090, 72.877426));
    }

    #[test]
    fn plain_fields_win_over_a_coordinate_array() {
        let location = normalize_value(&json!({
            "lat": 9.93,
            "lng": 76.27,
            "coordinates": [0.0, 0.0]
        }))
        .unwrap();

        assert_eq!((location.lat, location.lng), (9.93, 76.27));
    }

    #[test]
    fn unrecognized_shapes_are_rejected() {
        for value in [
            json!(null),
            json!(42),
            json!("9.93,76.27"),
            json!([9.93, 76.27]),
            json!({"latitude": 9.93, "longitude": 76.27}),
            json!({"lat": "9.93", "lng": "76.27"}),
            json!({"coordinates": ["a", "b"]}),
        ] {
            assert_eq!(
                normalize_value(&value).unwrap_err(),
                NormalizeError::UnrecognizedShape,
                "value {value} should not normalize"
            );
        }
    }

    #[test]
    fn integer_coordinates_are_accepted() {
        let location = normalize_value(&json!({"lat": 9, "lng": 76})).unwrap();
        assert_eq!((location.lat, location.lng), (9.0, 76.0));
    }

    #[test]
    fn canonical_location_round_trips_through_input() {
        let original = Location::new(32.243186, 77.189223)
            .with_address("Kullu-Manali Highway, Himachal Pradesh");
        let back = normalize(LocationInput::from(original.clone())).unwrap();
        assert_eq!(back, original);
    }
}
