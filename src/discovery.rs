//! Incident discovery: the filter and sort pipeline behind the feed.
//!
//! Pure functions over borrowed incident slices. A [`FeedQuery`] bundles the
//! feed's controls (search box, type select, radius slider, sort select) and
//! [`query`] evaluates them in one pass, leaving the source slice untouched.

use tracing::debug;

use crate::types::{Coord, Incident, IncidentType};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Smallest selectable search radius, in kilometers.
pub const MIN_RADIUS_KM: f64 = 5.0;
/// Largest selectable search radius, in kilometers.
pub const MAX_RADIUS_KM: f64 = 500.0;
/// Slider step between selectable radii, in kilometers.
pub const RADIUS_STEP_KM: f64 = 5.0;
/// Radius preselected when the feed first opens, in kilometers.
pub const DEFAULT_RADIUS_KM: f64 = 50.0;

/// Category predicate of a feed query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TypeFilter {
    /// Match every category.
    #[default]
    All,
    /// Match a single category.
    Only(IncidentType),
}

impl TypeFilter {
    fn matches(&self, kind: IncidentType) -> bool {
        match self {
            TypeFilter::All => true,
            TypeFilter::Only(only) => *only == kind,
        }
    }
}

/// Distance predicate of a feed query.
///
/// `Global` is a real state, not a magic number: it means the feed shows
/// incidents everywhere. The radius slider still speaks its legacy dialect
/// through [`RangeFilter::from_km`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RangeFilter {
    /// No distance restriction.
    Global,
    /// Keep incidents within this many kilometers of the query center.
    WithinKm(f64),
}

impl RangeFilter {
    /// Maps a slider value to a filter, treating any negative number as the
    /// "Global" sentinel the range selector emits.
    pub fn from_km(km: f64) -> Self {
        if km < 0.0 {
            RangeFilter::Global
        } else {
            RangeFilter::WithinKm(km)
        }
    }
}

impl Default for RangeFilter {
    fn default() -> Self {
        RangeFilter::WithinKm(DEFAULT_RADIUS_KM)
    }
}

/// Result ordering of a feed query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    /// Newest first.
    #[default]
    Recent,
    /// Highest severity first.
    Severity,
}

/// Everything the feed's controls can ask of a query.
///
/// The default query matches the feed's initial state: no search term, all
/// types, a 50 km radius with no viewer position yet, newest first.
#[derive(Debug, Clone, Default)]
pub struct FeedQuery {
    /// Free-text term matched against titles and descriptions; blank matches everything
    pub search: String,
    /// Category restriction
    pub kind: TypeFilter,
    /// Viewer position the radius filter measures from, when known
    pub center: Option<Coord>,
    /// Distance restriction, applied only when a center is known
    pub range: RangeFilter,
    /// Result ordering
    pub sort: SortOrder,
}

/// An ordered, filtered view over a slice of incidents.
#[derive(Debug)]
pub struct FeedResults<'a> {
    /// Matching incidents in the requested order
    pub incidents: Vec<&'a Incident>,
    /// Number of matches, carried for the feed's result counter
    pub result_count: usize,
    /// Whether nothing matched, carried for the feed's empty state
    pub is_empty: bool,
}

// ---------------------------------------------------------------------------
// Pure query pipeline
// ---------------------------------------------------------------------------

/// Runs a feed query over a slice of incidents.
///
/// All predicates are AND-combined in a single pass:
///
/// 1. A blank search matches everything; otherwise the term must appear in
///    the title or the description, case-insensitively.
/// 2. The type filter matches every category when `All`.
/// 3. The radius predicate applies only when the query has a center and the
///    range is not `Global`; an incident passes when its distance from the
///    center is at most the radius.
///
/// Survivors are then sorted by the requested order. The sort is stable, so
/// ties keep their stored relative order. The input slice is never
/// reordered; results borrow from it.
///
/// # Examples
///
/// ```
/// use sitrep::discovery::{query, FeedQuery, RangeFilter};
/// use sitrep::{Coord, IncidentStore};
///
/// let store = IncidentStore::demo();
/// let nearby = query(
///     store.incidents(),
///     &FeedQuery {
///         center: Some(Coord::new(9.9312, 76.2673)),
///         range: RangeFilter::WithinKm(50.0),
///         ..FeedQuery::default()
///     },
/// );
/// assert_eq!(nearby.result_count, 1);
/// ```
pub fn query<'a>(incidents: &'a [Incident], params: &FeedQuery) -> FeedResults<'a> {
    let term = params.search.trim().to_lowercase();

    let mut matched: Vec<&Incident> = incidents
        .iter()
        .filter(|incident| matches_search(incident, &term))
        .filter(|incident| params.kind.matches(incident.kind))
        .filter(|incident| matches_range(incident, params.center, params.range))
        .collect();

    match params.sort {
        SortOrder::Recent => matched.sort_by(|a, b| b.timestamp.cmp(&a.timestamp)),
        SortOrder::Severity => {
            matched.sort_by(|a, b| b.severity.rank().cmp(&a.severity.rank()))
        }
    }

    debug!(
        total = incidents.len(),
        matched = matched.len(),
        "feed query evaluated"
    );

    FeedResults {
        result_count: matched.len(),
        is_empty: matched.is_empty(),
        incidents: matched,
    }
}

fn matches_search(incident: &Incident, term: &str) -> bool {
    term.is_empty()
        || incident.title.to_lowercase().contains(term)
        || incident.description.to_lowercase().contains(term)
}

fn matches_range(incident: &Incident, center: Option<Coord>, range: RangeFilter) -> bool {
    match (center, range) {
        (Some(center), RangeFilter::WithinKm(radius)) => {
            center.distance_km(&incident.location.coord()) <= radius
        }
        _ => true,
    }
}

// ===========================================================================
// Unit tests
// ===========================================================================
