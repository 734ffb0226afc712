//! Map projection: bounding boxes and marker placement for the map view.
//!
//! The projector takes whatever incident slice the discovery engine produced
//! and turns it into plottable output: one marker per record with usable
//! coordinates, plus a padded viewport box covering them. Records whose
//! coordinates fail validation are excluded and counted, never silently
//! dropped, even though store-owned incidents should always pass.

use tracing::warn;

use crate::types::{Coord, Incident};

// Padding keeps markers off the viewport edge: a tenth of each axis span,
// and never less than 0.05 degrees so a single point still gets a real box.
const PADDING_RATIO: f64 = 0.1;
const MIN_PADDING_DEG: f64 = 0.05;

/// A latitude/longitude rectangle used to fit the map viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    /// Southern edge in decimal degrees
    pub south: f64,
    /// Western edge in decimal degrees
    pub west: f64,
    /// Northern edge in decimal degrees
    pub north: f64,
    /// Eastern edge in decimal degrees
    pub east: f64,
}

impl BoundingBox {
    /// Center point of the box.
    pub fn center(&self) -> Coord {
        Coord::new(
            (self.south + self.north) / 2.0,
            (self.west + self.east) / 2.0,
        )
    }

    /// Reports whether the coordinate lies inside the box, edges included.
    pub fn contains(&self, coord: &Coord) -> bool {
        (self.south..=self.north).contains(&coord.lat)
            && (self.west..=self.east).contains(&coord.lng)
    }
}

/// A plottable incident: the record plus its validated coordinate.
#[derive(Debug, Clone)]
pub struct Marker<'a> {
    /// The incident behind the marker
    pub incident: &'a Incident,
    /// Where to place it
    pub coord: Coord,
}

/// Everything the map view needs for one render.
#[derive(Debug)]
pub struct MapProjection<'a> {
    /// Padded viewport box covering the markers, absent when nothing is plottable
    pub bounds: Option<BoundingBox>,
    /// Markers in input order
    pub markers: Vec<Marker<'a>>,
    /// Incidents excluded because their coordinates failed validation
    pub skipped: usize,
}

/// Builds one marker per incident with valid coordinates, preserving input order.
///
/// Returns the markers together with the count of excluded incidents. Each
/// exclusion is also logged, since a store-owned record should never fail
/// validation.
pub fn place_markers(incidents: &[Incident]) -> (Vec<Marker<'_>>, usize) {
    let mut markers = Vec::with_capacity(incidents.len());
    let mut skipped = 0usize;

    for incident in incidents {
        if incident.location.is_valid() {
            markers.push(Marker {
                incident,
                coord: incident.location.coord(),
            });
        } else {
            skipped += 1;
            warn!(
                id = %incident.id,
                lat = incident.location.lat,
                lng = incident.location.lng,
                "incident has unusable coordinates, excluded from map"
            );
        }
    }

    (markers, skipped)
}

/// Computes the padded viewport box covering the incidents' valid coordinates.
///
/// Returns `None` when the input holds no plottable incident; the caller
/// keeps its current viewport rather than guessing a default box.
///
/// # Examples
///
/// ```
/// use sitrep::map::bounds_for;
/// use sitrep::IncidentStore;
///
/// assert!(bounds_for(IncidentStore::new().incidents()).is_none());
/// assert!(bounds_for(IncidentStore::demo().incidents()).is_some());
/// ```
pub fn bounds_for(incidents: &[Incident]) -> Option<BoundingBox> {
    bounds_of(
        incidents
            .iter()
            .filter(|incident| incident.location.is_valid())
            .map(|incident| incident.location.coord()),
    )
}

/// Projects an incident slice for one map render: bounds, markers, and the
/// count of excluded records.
pub fn project(incidents: &[Incident]) -> MapProjection<'_> {
    let (markers, skipped) = place_markers(incidents);
    let bounds = bounds_of(markers.iter().map(|marker| marker.coord));

    MapProjection {
        bounds,
        markers,
        skipped,
    }
}

fn bounds_of(mut coords: impl Iterator<Item = Coord>) -> Option<BoundingBox> {
    let first = coords.next()?;
    let mut south = first.lat;
    let mut north = first.lat;
    let mut west = first.lng;
    let mut east = first.lng;

    for coord in coords {
        south = south.min(coord.lat);
        north = north.max(coord.lat);
        west = west.min(coord.lng);
        east = east.max(coord.lng);
    }

    let lat_pad = ((north - south) * PADDING_RATIO).max(MIN_PADDING_DEG);
    let lng_pad = ((east - west) * PADDING_RATIO).max(MIN_PADDING_DEG);

    Some(BoundingBox {
        south: (south - lat_pad).max(-90.0),
        west: (west - lng_pad).max(-180.0),
        north: (north + lat_pad).min(90.0),
        east: (east + lng_pad).min(180.0),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::IncidentStore;
    use crate::types::{IncidentType, Location, Severity};
    use chrono::Utc;

    fn pinned_incident(id: &str, lat: f64, lng: f64) -> Incident {
        Incident {
            id: id.to_string(),
            title: "Pinned".to_string(),
            description: "Marker fixture".to_string(),
            kind: IncidentType::Other,
            severity: Severity::Low,
            location: Location::new(lat, lng),
            image_url: None,
            reported_by: "reporter".to_string(),
            timestamp: Utc::now(),
            verified: false,
        }
    }

    #[test]
    fn empty_input_yields_no_bounds_and_no_markers() {
        let projection = project(&[]);
        assert!(projection.bounds.is_none());
        assert!(projection.markers.is_empty());
        assert_eq!(projection.skipped, 0);

        assert!(bounds_for(&[]).is_none());
    }

    #[test]
    fn single_point_gets_a_padded_nonzero_box() {
        let incidents = vec![pinned_incident("solo", 9.9312, 76.2673)];
        let bounds = bounds_for(&incidents).unwrap();

        assert!(bounds.north > bounds.south);
        assert!(bounds.east > bounds.west);
        assert!(bounds.contains(&Coord::new(9.9312, 76.2673)));
        assert!(bounds.north - 9.9312 >= MIN_PADDING_DEG);
    }

    #[test]
    fn bounds_cover_every_marker() {
        let store = IncidentStore::demo();
        let projection = project(store.incidents());

        let bounds = projection.bounds.unwrap();
        assert_eq!(projection.markers.len(), 7);
        assert_eq!(projection.skipped, 0);
        for marker in &projection.markers {
            assert!(bounds.contains(&marker.coord), "marker {} outside bounds", marker.incident.id);
        }
    }

    #[test]
    fn markers_preserve_input_order() {
        let store = IncidentStore::demo();
        let (markers, _) = place_markers(store.incidents());

        let marker_ids: Vec<&str> = markers.iter().map(|m| m.incident.id.as_str()).collect();
        let input_ids: Vec<&str> = store.incidents().iter().map(|i| i.id.as_str()).collect();
        assert_eq!(marker_ids, input_ids);
    }

    #[test]
    fn invalid_coordinates_are_skipped_and_counted() {
        let incidents = vec![
            pinned_incident("good-1", 9.9312, 76.2673),
            pinned_incident("broken", 200.0, 76.0),
            pinned_incident("good-2", 28.7041, 77.1025),
        ];

        let projection = project(&incidents);
        assert_eq!(projection.skipped, 1);
        let marker_ids: Vec<&str> = projection
            .markers
            .iter()
            .map(|m| m.incident.id.as_str())
            .collect();
        assert_eq!(marker_ids, vec!["good-1", "good-2"]);

        // The broken record must not stretch the box either.
        let bounds = projection.bounds.unwrap();
        assert!(bounds.north < 40.0);
    }

    #[test]
    fn all_invalid_input_behaves_like_empty() {
        let incidents = vec![pinned_incident("broken", f64::NAN, 76.0)];
        let projection = project(&incidents);

        assert!(projection.bounds.is_none());
        assert!(projection.markers.is_empty());
        assert_eq!(projection.skipped, 1);
    }

    #[test]
    fn padding_clamps_to_legal_ranges() {
        let incidents = vec![
            pinned_incident("arctic", 89.99, 179.99),
            pinned_incident("antarctic", -89.99, -179.99),
        ];

        let bounds = bounds_for(&incidents).unwrap();
        assert_eq!(bounds.north, 90.0);
        assert_eq!(bounds.south, -90.0);
        assert_eq!(bounds.east, 180.0);
        assert_eq!(bounds.west, -180.0);
    }

    #[test]
    fn project_and_bounds_for_agree() {
        let store = IncidentStore::demo();
        assert_eq!(
            project(store.incidents()).bounds,
            bounds_for(store.incidents())
        );
    }

    #[test]
    fn center_sits_inside_the_box() {
        let incidents = vec![
            pinned_incident("a", 9.9312, 76.2673),
            pinned_incident("b", 28.7041, 77.1025),
        ];

        let bounds = bounds_for(&incidents).unwrap();
        let center = bounds.center();
        assert!(bounds.contains(&center));
        assert!(center.lat > 9.9312 && center.lat < 28.7041);
    }
}
