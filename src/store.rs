//! In-memory incident repository.
//!
//! [`IncidentStore`] is the sole owner of all incident records for the life
//! of the process. Reports enter through [`IncidentStore::insert`], which
//! validates the draft, normalizes its location, and assigns identity and
//! provenance. Everything downstream reads borrowed, most-recent-first views.

use chrono::{Duration, Utc};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::normalize::{self, LocationInput, NormalizeError};
use crate::types::{Incident, IncidentType, Location, Severity};

/// Reporter identifier used when a draft names no submitting user.
pub const ANONYMOUS_REPORTER: &str = "anonymous";

/// A report submission, before validation.
///
/// The classification and location fields are optional so that an incomplete
/// form is representable; [`IncidentStore::insert`] rejects drafts with
/// anything required still unset.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncidentDraft {
    /// Short headline, required
    pub title: String,
    /// Prose description, required
    pub description: String,
    /// Incident category, required
    #[serde(rename = "type")]
    pub kind: Option<IncidentType>,
    /// Impact level, required
    pub severity: Option<Severity>,
    /// Raw location in any accepted shape, required
    pub location: Option<LocationInput>,
    /// Optional image URL or data URI
    pub image_url: Option<String>,
    /// Submitting user, defaulted to [`ANONYMOUS_REPORTER`] when unset
    pub reported_by: Option<String>,
}

/// Errors produced when a draft cannot be turned into a stored incident.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SubmitError {
    /// A required field was empty or unset. Carries the wire name of the field.
    #[error("missing required field: {0}")]
    MissingField(&'static str),
    /// The draft's location failed normalization.
    #[error("location could not be normalized: {0}")]
    Location(#[from] NormalizeError),
}

type Subscriber = Box<dyn FnMut(&Incident)>;

/// The authoritative in-memory collection of incident records.
///
/// Records are held most recent first. Inserts are atomic: a draft that
/// fails validation leaves the store untouched. Each successful insert is
/// announced to every registered subscriber.
pub struct IncidentStore {
    incidents: Vec<Incident>,
    index: FxHashMap<String, u64>,
    seq: u64,
    subscribers: Vec<Subscriber>,
}

impl IncidentStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self {
            incidents: Vec::new(),
            index: FxHashMap::default(),
            seq: 0,
            subscribers: Vec::new(),
        }
    }

    /// Creates a store seeded with the demo incident set.
    ///
    /// The seven records mirror a week of India-focused disaster reports and
    /// give the feed, map, and examples something to show before any real
    /// submission arrives. Timestamps are relative to now, so recency
    /// ordering behaves the same whenever the store is created.
    pub fn demo() -> Self {
        let now = Utc::now();
        let records = vec![
            Incident {
                id: "in-1".to_string(),
                title: "Severe Flooding in Kochi Lowlands".to_string(),
                description: "Heavy monsoon rains caused localized flooding across low-lying \
                              areas. Several roads are submerged and rescue teams are assisting \
                              stranded residents."
                    .to_string(),
                kind: IncidentType::Flood,
                severity: Severity::High,
                location: Location::new(9.931233, 76.267303)
                    .with_address("Ernakulam, Kochi, Kerala"),
                image_url: None,
                reported_by: "user_kerala01".to_string(),
                timestamp: now - Duration::minutes(45),
                verified: true,
            },
            Incident {
                id: "in-2".to_string(),
                title: "Cyclone-related Storm Surge Near Puri Coast".to_string(),
                description: "Strong winds and elevated sea levels along the Puri coast have \
                              caused coastal flooding and damaged small fishing boats. \
                              Authorities have issued cautionary advisories."
                    .to_string(),
                kind: IncidentType::Cyclone,
                severity: Severity::High,
                location: Location::new(19.8135, 85.8312).with_address("Puri Coast, Odisha"),
                image_url: None,
                reported_by: "user_odisha02".to_string(),
                timestamp: now - Duration::hours(2),
                verified: true,
            },
            Incident {
                id: "in-3".to_string(),
                title: "Heatwave Medical Emergencies in Delhi".to_string(),
                description: "Multiple heat-related illness reports near central Delhi. Medical \
                              camps are being set up and public advisories warn of extreme \
                              daytime temperatures."
                    .to_string(),
                kind: IncidentType::Heatwave,
                severity: Severity::Medium,
                location: Location::new(28.704060, 77.102493)
                    .with_address("Connaught Place, New Delhi, Delhi"),
                image_url: None,
                reported_by: "user_delhi03".to_string(),
                timestamp: now - Duration::minutes(30),
                verified: false,
            },
            Incident {
                id: "in-4".to_string(),
                title: "Landslide Blocks Mountain Highway near Manali".to_string(),
                description: "A landslide has blocked a stretch of the Kullu-Manali highway \
                              after heavy rainfall. Traffic is stalled and local authorities \
                              are arranging clearance operations."
                    .to_string(),
                kind: IncidentType::Landslide,
                severity: Severity::High,
                location: Location::new(32.243186, 77.189223)
                    .with_address("Kullu-Manali Highway, Himachal Pradesh"),
                image_url: None,
                reported_by: "user_hp04".to_string(),
                timestamp: now - Duration::hours(4),
                verified: true,
            },
            Incident {
                id: "in-5".to_string(),
                title: "Large Fire in Industrial Area, Mumbai".to_string(),
                description: "A blaze reported in an industrial warehouse in suburban Mumbai. \
                              Fire units are on site; nearby roads are closed for emergency \
                              access."
                    .to_string(),
                kind: IncidentType::Fire,
                severity: Severity::High,
                location: Location::new(19.076090, 72.877426)
                    .with_address("Andheri Industrial Area, Mumbai, Maharashtra"),
                image_url: None,
                reported_by: "user_mumbai05".to_string(),
                timestamp: now - Duration::minutes(90),
                verified: false,
            },
            Incident {
                id: "in-6".to_string(),
                title: "Train Derailment (Major) Near Bengaluru Outskirts".to_string(),
                description: "A short-distance passenger train derailed on the outskirts; \
                              services are delayed and emergency teams are inspecting \
                              carriages. No major casualties reported so far."
                    .to_string(),
                kind: IncidentType::Accident,
                severity: Severity::Medium,
                location: Location::new(13.0110, 77.5536)
                    .with_address("Yelahanka, outskirts of Bengaluru, Karnataka"),
                image_url: None,
                reported_by: "user_bengaluru06".to_string(),
                timestamp: now - Duration::hours(6),
                verified: false,
            },
            Incident {
                id: "in-7".to_string(),
                title: "Coastal Flooding & Road Closures in Chennai".to_string(),
                description: "High tide and heavy coastal rain has resulted in localized \
                              flooding and temporary road closures in low-lying Chennai \
                              neighborhoods."
                    .to_string(),
                kind: IncidentType::Flood,
                severity: Severity::Medium,
                location: Location::new(13.082680, 80.270718)
                    .with_address("Marina / Besant Nagar area, Chennai, Tamil Nadu"),
                image_url: None,
                reported_by: "user_chennai07".to_string(),
                timestamp: now - Duration::minutes(20),
                verified: true,
            },
        ];

        Self::from_records(records)
    }

    fn from_records(records: Vec<Incident>) -> Self {
        let len = records.len();
        let mut index = FxHashMap::default();
        for (position, incident) in records.iter().enumerate() {
            index.insert(incident.id.clone(), (len - 1 - position) as u64);
        }
        Self {
            incidents: records,
            index,
            seq: len as u64,
            subscribers: Vec::new(),
        }
    }

    /// Validates a draft and stores it as a new incident.
    ///
    /// On success the record is prepended (the store reads most recent
    /// first), subscribers are notified, and a copy of the stored incident
    /// is returned. On failure nothing is stored and nobody is notified.
    ///
    /// The assigned id fuses the insert's millisecond timestamp with a
    /// store-scoped sequence number, so two inserts in the same millisecond
    /// still get distinct ids.
    pub fn insert(&mut self, draft: IncidentDraft) -> Result<Incident, SubmitError> {
        let draft = match prepare(draft) {
            Ok(draft) => draft,
            Err(error) => {
                warn!(%error, "incident draft rejected");
                return Err(error);
            }
        };

        let timestamp = Utc::now();
        let incident = Incident {
            id: format!("{}-{}", timestamp.timestamp_millis(), self.seq),
            title: draft.title,
            description: draft.description,
            kind: draft.kind,
            severity: draft.severity,
            location: draft.location,
            image_url: draft.image_url,
            reported_by: draft.reported_by,
            timestamp,
            verified: false,
        };

        self.index.insert(incident.id.clone(), self.seq);
        self.seq += 1;
        self.incidents.insert(0, incident);

        let stored = &self.incidents[0];
        debug!(id = %stored.id, kind = %stored.kind, "incident stored");
        for subscriber in &mut self.subscribers {
            subscriber(stored);
        }

        Ok(stored.clone())
    }

    /// Looks up an incident by id.
    pub fn get(&self, id: &str) -> Option<&Incident> {
        self.position(id).and_then(|idx| self.incidents.get(idx))
    }

    /// All stored incidents, most recent first.
    pub fn incidents(&self) -> &[Incident] {
        &self.incidents
    }

    /// Number of stored incidents.
    pub fn len(&self) -> usize {
        self.incidents.len()
    }

    /// Reports whether the store holds no incidents.
    pub fn is_empty(&self) -> bool {
        self.incidents.is_empty()
    }

    /// Registers a callback invoked with each newly stored incident.
    ///
    /// Callbacks run synchronously inside [`insert`](IncidentStore::insert)
    /// and must not call back into the store.
    pub fn subscribe(&mut self, subscriber: impl FnMut(&Incident) + 'static) {
        self.subscribers.push(Box::new(subscriber));
    }

    /// Updates the verification flag of a stored incident.
    ///
    /// This is the only mutation permitted after insert and exists for the
    /// external trust process. Returns false when the id is unknown.
    pub fn set_verified(&mut self, id: &str, verified: bool) -> bool {
        match self.position(id) {
            Some(idx) => {
                self.incidents[idx].verified = verified;
                debug!(id, verified, "verification flag updated");
                true
            }
            None => false,
        }
    }

    // The index stores each record's insertion sequence number, which stays
    // valid under prepends; the vector position is recomputed from the tail.
    fn position(&self, id: &str) -> Option<usize> {
        let seq = *self.index.get(id)?;
        Some(self.incidents.len() - 1 - seq as usize)
    }
}

impl Default for IncidentStore {
    fn default() -> Self {
        Self::new()
    }
}

struct PreparedDraft {
    title: String,
    description: String,
    kind: IncidentType,
    severity: Severity,
    location: Location,
    image_url: Option<String>,
    reported_by: String,
}

fn prepare(draft: IncidentDraft) -> Result<PreparedDraft, SubmitError> {
    if draft.title.trim().is_empty() {
        return Err(SubmitError::MissingField("title"));
    }
    if draft.description.trim().is_empty() {
        return Err(SubmitError::MissingField("description"));
    }
    let kind = draft.kind.ok_or(SubmitError::MissingField("type"))?;
    let severity = draft.severity.ok_or(SubmitError::MissingField("severity"))?;
    let raw = draft.location.ok_or(SubmitError::MissingField("location"))?;
    let location = normalize::normalize(raw)?;

    Ok(PreparedDraft {
        title: draft.title,
        description: draft.description,
        kind,
        severity,
        location,
        image_url: draft.image_url,
        reported_by: draft.reported_by.unwrap_or_else(|| ANONYMOUS_REPORTER.to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn flood_draft() -> IncidentDraft {
        IncidentDraft {
            title: "Severe Flooding in Kochi Lowlands".to_string(),
            description: "Heavy monsoon rains caused localized flooding.".to_string(),
            kind: Some(IncidentType::Flood),
            severity: Some(Severity::High),
            location: Some(LocationInput::Plain {
                lat: 9.931233,
                lng: 76.267303,
                address: Some("Ernakulam, Kochi, Kerala".to_string()),
            }),
            image_url: None,
            reported_by: None,
        }
    }

    #[test]
    fn insert_assigns_identity_and_provenance() {
        let mut store = IncidentStore::new();
        let before = Utc::now();

        let incident = store.insert(flood_draft()).unwrap();

        assert!(!incident.id.is_empty());
        assert!(!incident.verified);
        assert_eq!(incident.reported_by, ANONYMOUS_REPORTER);
        assert!(incident.timestamp >= before && incident.timestamp <= Utc::now());
        assert_eq!(incident.location.address.as_deref(), Some("Ernakulam, Kochi, Kerala"));

        let stored = store.get(&incident.id).unwrap();
        assert_eq!(stored.id, incident.id);
        assert_eq!(stored.title, "Severe Flooding in Kochi Lowlands");
    }

    #[test]
    fn insert_prepends_most_recent_first() {
        let mut store = IncidentStore::new();
        let first = store.insert(flood_draft()).unwrap();
        let second = store
            .insert(IncidentDraft {
                title: "Large Fire in Industrial Area".to_string(),
                kind: Some(IncidentType::Fire),
                ..flood_draft()
            })
            .unwrap();

        let ids: Vec<&str> = store.incidents().iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec![second.id.as_str(), first.id.as_str()]);
    }

    #[test]
    fn ids_stay_unique_within_one_millisecond() {
        let mut store = IncidentStore::new();
        let mut ids = Vec::new();
        for _ in 0..10 {
            ids.push(store.insert(flood_draft()).unwrap().id);
        }

        let mut deduped = ids.clone();
        deduped.sort();
        deduped.dedup();
        assert_eq!(deduped.len(), ids.len());
    }

    #[test]
    fn rejected_draft_leaves_store_untouched() {
        let mut store = IncidentStore::new();

        let err = store
            .insert(IncidentDraft {
                severity: None,
                ..flood_draft()
            })
            .unwrap_err();
        assert_eq!(err, SubmitError::MissingField("severity"));

        let err = store
            .insert(IncidentDraft {
                title: "   ".to_string(),
                ..flood_draft()
            })
            .unwrap_err();
        assert_eq!(err, SubmitError::MissingField("title"));

        let err = store
            .insert(IncidentDraft {
                location: None,
                ..flood_draft()
            })
            .unwrap_err();
        assert_eq!(err, SubmitError::MissingField("location"));

        assert!(store.is_empty());
    }

    #[test]
    fn invalid_location_fails_the_whole_insert() {
        let mut store = IncidentStore::new();

        let err = store
            .insert(IncidentDraft {
                location: Some(LocationInput::Plain {
                    lat: 91.0,
                    lng: 76.0,
                    address: None,
                }),
                ..flood_draft()
            })
            .unwrap_err();

        assert_eq!(
            err,
            SubmitError::Location(NormalizeError::LatitudeOutOfRange(91.0))
        );
        assert!(store.is_empty());
    }

    #[test]
    fn get_misses_return_none() {
        let mut store = IncidentStore::new();
        store.insert(flood_draft()).unwrap();
        assert!(store.get("no-such-id").is_none());
    }

    #[test]
    fn subscribers_see_each_stored_incident() {
        let seen: Rc<RefCell<Vec<String>>> = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);

        let mut store = IncidentStore::new();
        store.subscribe(move |incident| sink.borrow_mut().push(incident.id.clone()));

        let first = store.insert(flood_draft()).unwrap();
        let second = store.insert(flood_draft()).unwrap();

        assert_eq!(*seen.borrow(), vec![first.id, second.id]);
    }

    #[test]
    fn subscribers_are_not_notified_of_rejected_drafts() {
        let count = Rc::new(RefCell::new(0usize));
        let sink = Rc::clone(&count);

        let mut store = IncidentStore::new();
        store.subscribe(move |_| *sink.borrow_mut() += 1);

        let _ = store.insert(IncidentDraft {
            kind: None,
            ..flood_draft()
        });

        assert_eq!(*count.borrow(), 0);
    }

    #[test]
    fn set_verified_flips_the_flag() {
        let mut store = IncidentStore::new();
        let incident = store.insert(flood_draft()).unwrap();
        assert!(!incident.verified);

        assert!(store.set_verified(&incident.id, true));
        assert!(store.get(&incident.id).unwrap().verified);

        assert!(!store.set_verified("no-such-id", true));
    }

    #[test]
    fn demo_store_matches_the_seeded_feed() {
        let store = IncidentStore::demo();

        assert_eq!(store.len(), 7);
        assert_eq!(store.incidents()[0].id, "in-1");
        assert_eq!(store.incidents()[6].id, "in-7");

        let kochi = store.get("in-1").unwrap();
        assert_eq!(kochi.kind, IncidentType::Flood);
        assert!(kochi.verified);

        let delhi = store.get("in-3").unwrap();
        assert_eq!(delhi.severity, Severity::Medium);
        assert!(!delhi.verified);

        assert!(store.incidents().iter().all(|i| i.location.is_valid()));
    }

    #[test]
    fn inserts_into_the_demo_store_land_in_front() {
        let mut store = IncidentStore::demo();
        let incident = store.insert(flood_draft()).unwrap();

        assert_eq!(store.len(), 8);
        assert_eq!(store.incidents()[0].id, incident.id);
        assert_eq!(store.get("in-4").unwrap().id, "in-4");
    }
}
