//! In-memory core for community incident reporting.
//!
//! `sitrep` holds the domain logic of a crowd-sourced incident map: residents
//! report floods, fires, accidents and other emergencies at a location, and
//! everyone nearby can discover, filter and map what is happening around
//! them. The crate owns the data model, validation, storage, feed queries
//! and map framing; rendering and device access stay with the embedding
//! application.
//!
//! # Features
//!
//! - **Typed incident model** - [`Incident`] carries kind, severity,
//!   location, reporter and verification state with wire-compatible
//!   serde field names
//! - **Tolerant location intake** - [`normalize`] accepts plain
//!   `{lat, lng}` objects and GeoJSON-style `[lng, lat]` arrays, and
//!   range-checks both
//! - **Newest-first repository** - [`IncidentStore`] validates drafts
//!   atomically, keeps reports in reverse-chronological order and notifies
//!   subscribers on every insert
//! - **Feed discovery** - [`discovery::query`] combines text search, type
//!   filter, haversine radius and sort order in a single read-only pass
//! - **Map framing** - [`map::project`] computes padded viewport bounds and
//!   markers, counting records it had to skip
//! - **Position tracking** - [`geoloc::PositionWatch`] settles racing
//!   geolocation callbacks deterministically
//! - **Offline** - no network, no database; everything lives in process
//!   memory
//!
//! # Quick Start
//!
//! Add `sitrep` to your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! sitrep = "0.1"
//! ```
//!
//! Basic usage:
//!
//! ```
//! use sitrep::{Coord, IncidentStore};
//!
//! let store = IncidentStore::demo();
//!
//! // What is happening within 50 km of Kochi?
//! let nearby = sitrep::nearby(&store, Coord::new(9.9312, 76.2673), 50.0);
//! for incident in &nearby.incidents {
//!     println!("{} [{}]", incident.title, incident.severity);
//! }
//! # assert_eq!(nearby.result_count, 1);
//! ```
//!
//! # Detailed Example
//!
//! Reporting, discovering and mapping in one flow:
//!
//! ```
//! use sitrep::{discovery, map, Coord, IncidentDraft, IncidentStore};
//! use sitrep::{IncidentType, Location, Severity};
//!
//! # fn main() -> Result<(), sitrep::SubmitError> {
//! let mut store = IncidentStore::demo();
//!
//! // Report a new incident near the Kochi ferry terminal.
//! let incident = store.insert(IncidentDraft {
//!     title: "Road collapse near ferry terminal".to_string(),
//!     description: "Northbound lane has caved in; traffic diverted.".to_string(),
//!     kind: Some(IncidentType::Accident),
//!     severity: Some(Severity::High),
//!     location: Some(Location::new(9.9658, 76.2421).into()),
//!     ..IncidentDraft::default()
//! })?;
//! assert!(!incident.verified);
//!
//! // It shows up in a radius-filtered feed, newest first.
//! let results = sitrep::nearby(&store, Coord::new(9.9312, 76.2673), 50.0);
//! assert_eq!(results.result_count, 2);
//! assert_eq!(results.incidents[0].id, incident.id);
//!
//! // Frame every report on a map.
//! let projection = map::project(store.incidents());
//! assert_eq!(projection.markers.len(), 8);
//! assert_eq!(projection.skipped, 0);
//! # Ok(())
//! # }
//! ```
//!
//! # Data Flow
//!
//! 1. A draft arrives from a form or API payload as [`IncidentDraft`]
//! 2. [`IncidentStore::insert`] validates it, normalizes the location
//!    through [`normalize`], assigns an id and timestamp, and prepends the
//!    record
//! 3. Readers run [`discovery::query`] over [`IncidentStore::incidents`]
//!    to build their feed
//! 4. [`map::project`] turns the same slice into viewport bounds and
//!    markers
//!
//! Every step after intake is read-only; queries and projections never
//! mutate or reorder the stored records.
//!
//! # Modules
//!
//! - [`types`] - Core data structures ([`Incident`], [`Location`], [`Coord`])
//! - [`normalize`] - Location payload normalization and range checks
//! - [`discovery`] - Feed filtering, radius search and sorting
//! - [`map`] - Marker projection and viewport bounds
//! - [`geoloc`] - Position request tracking for the feed center
//!
//! # Limitations
//!
//! - **Volatile**: all state is in process memory and gone on exit
//! - **Single-threaded**: [`IncidentStore`] is `&mut`-based; wrap it
//!   yourself if you need sharing
//! - **Great-circle distances**: radius filters use the haversine formula
//!   and ignore terrain and roads
//!
//! # See Also
//!
//! - [`IncidentStore`] - The repository (seed one via [`IncidentStore::demo`])
//! - [`discovery::FeedQuery`] - The full query surface behind [`nearby`]
//! - [`Incident`] - The stored record with all of its fields

#![warn(missing_docs)]

mod store;

pub mod discovery;
pub mod geoloc;
pub mod map;
pub mod normalize;
pub mod types;

pub use store::{IncidentDraft, IncidentStore, SubmitError, ANONYMOUS_REPORTER};
pub use types::{Coord, Incident, IncidentType, Location, Severity};

/// Returns incidents within `radius_km` of `center`, newest first.
///
/// This is the one-call entry point for the common "what is happening
/// around me" question. It is shorthand for a [`discovery::query`] with a
/// radius filter and the default sort order; reach for [`discovery`]
/// directly when you also need text search, type filters or
/// severity-ranked ordering.
///
/// A negative `radius_km` disables the distance cut and returns every
/// incident, matching [`discovery::RangeFilter::from_km`].
///
/// # Examples
///
/// ```
/// use sitrep::{Coord, IncidentStore};
///
/// let store = IncidentStore::demo();
/// let results = sitrep::nearby(&store, Coord::new(9.9312, 76.2673), 50.0);
///
/// assert_eq!(results.result_count, 1);
/// assert_eq!(results.incidents[0].id, "in-1");
/// ```
pub fn nearby<'a>(
    store: &'a IncidentStore,
    center: Coord,
    radius_km: f64,
) -> discovery::FeedResults<'a> {
    let params = discovery::FeedQuery {
        center: Some(center),
        range: discovery::RangeFilter::from_km(radius_km),
        ..discovery::FeedQuery::default()
    };
    discovery::query(store.incidents(), &params)
}
