//! Watched-state overlay.
//!
//! Events are regenerated on every view, so the watched flag lives in a
//! separate sparse set keyed by event id. Ids only ever enter the set as
//! "watched"; unmarking removes them.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::{BTreeMap, BTreeSet};

use crate::domain::EventId;
use crate::models::Event;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WatchedSet {
    ids: BTreeSet<EventId>,
}

impl WatchedSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks or unmarks an event. Returns `true` if the set changed.
    pub fn set_watched(&mut self, id: &EventId, watched: bool) -> bool {
        if watched {
            self.ids.insert(id.clone())
        } else {
            self.ids.remove(id)
        }
    }

    #[must_use]
    pub fn is_watched(&self, id: &EventId) -> bool {
        self.ids.contains(id)
    }

    /// Annotates each event with its watched flag. Applying twice is the
    /// same as applying once.
    #[must_use]
    pub fn apply(&self, events: Vec<Event>) -> Vec<Event> {
        events
            .into_iter()
            .map(|mut event| {
                event.watched = Some(self.is_watched(&event.id));
                event
            })
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &EventId> {
        self.ids.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

impl FromIterator<EventId> for WatchedSet {
    fn from_iter<I: IntoIterator<Item = EventId>>(iter: I) -> Self {
        Self {
            ids: iter.into_iter().collect(),
        }
    }
}

/// Stored as `{ "<event id>": true }`; `false` entries are dropped on load.
impl Serialize for WatchedSet {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_map(self.ids.iter().map(|id| (id, true)))
    }
}

impl<'de> Deserialize<'de> for WatchedSet {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let entries = BTreeMap::<EventId, bool>::deserialize(deserializer)?;
        Ok(entries
            .into_iter()
            .filter_map(|(id, watched)| watched.then_some(id))
            .collect())
    }
}

/// Free-function form of [`WatchedSet::apply`].
#[must_use]
pub fn apply_watched(events: Vec<Event>, watched: &WatchedSet) -> Vec<Event> {
    watched.apply(events)
}
