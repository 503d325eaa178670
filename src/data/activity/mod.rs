use std::fmt;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tokio::sync::RwLock;
use utoipa::ToSchema;

use crate::error::{ConfigurationError, RosterError};

pub mod seed;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Activity {
    pub description: String,
    pub schedule: String,
    pub max_participants: u32,
    /// Emails in signup order.
    #[serde(default)]
    pub participants: Vec<String>,
}

impl Activity {
    pub fn new(description: impl ToString, schedule: impl ToString, max_participants: u32) -> Self {
        Activity {
            description: description.to_string(),
            schedule: schedule.to_string(),
            max_participants,
            participants: vec![],
        }
    }

    pub fn with_participants<S: ToString>(mut self, participants: impl IntoIterator<Item = S>) -> Self {
        self.participants = participants.into_iter().map(|it| it.to_string()).collect();
        self
    }

    pub fn has_participant(&self, email: &str) -> bool {
        self.participants.iter().any(|it| it == email)
    }

    pub fn is_full(&self) -> bool {
        self.participants.len() >= self.max_participants as usize
    }
}

/// Activities keyed by name, kept in the order they were added.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Roster {
    entries: Vec<(String, Activity)>,
}

impl Roster {
    pub fn new() -> Self {
        Roster::default()
    }

    /// Reads a YAML mapping of activity name to activity.
    pub fn load(path: impl AsRef<Path>) -> Result<Roster, ConfigurationError> {
        let file = File::open(path)?;
        Ok(serde_yaml::from_reader(BufReader::new(file))?)
    }

    /// Adds an activity, replacing an existing one with the same name in place.
    pub fn insert(&mut self, name: impl ToString, activity: Activity) -> Option<Activity> {
        let name = name.to_string();
        match self.get_mut(&name) {
            Some(existing) => Some(std::mem::replace(existing, activity)),
            None => {
                self.entries.push((name, activity));
                None
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&Activity> {
        self.entries
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, activity)| activity)
    }

    fn get_mut(&mut self, name: &str) -> Option<&mut Activity> {
        self.entries
            .iter_mut()
            .find(|(key, _)| key == name)
            .map(|(_, activity)| activity)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Activity)> {
        self.entries.iter().map(|(name, activity)| (name.as_str(), activity))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn sign_up(
        &mut self,
        activity_name: &str,
        email: &str,
        enforce_capacity: bool,
    ) -> Result<(), RosterError> {
        let activity = self
            .get_mut(activity_name)
            .ok_or_else(|| RosterError::NotFound {
                activity: activity_name.to_string(),
            })?;

        if activity.has_participant(email) {
            return Err(RosterError::AlreadyRegistered {
                activity: activity_name.to_string(),
                email: email.to_string(),
            });
        }

        if enforce_capacity && activity.is_full() {
            return Err(RosterError::ActivityFull {
                activity: activity_name.to_string(),
                max_participants: activity.max_participants,
            });
        }

        activity.participants.push(email.to_string());
        Ok(())
    }

    pub fn unregister(&mut self, activity_name: &str, email: &str) -> Result<(), RosterError> {
        let activity = self
            .get_mut(activity_name)
            .ok_or_else(|| RosterError::NotFound {
                activity: activity_name.to_string(),
            })?;

        let position = activity
            .participants
            .iter()
            .position(|it| it == email)
            .ok_or_else(|| RosterError::NotRegistered {
                activity: activity_name.to_string(),
                email: email.to_string(),
            })?;

        activity.participants.remove(position);
        Ok(())
    }
}

impl Serialize for Roster {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, activity) in &self.entries {
            map.serialize_entry(name, activity)?;
        }
        map.end()
    }
}

struct RosterVisitor;

impl<'de> Visitor<'de> for RosterVisitor {
    type Value = Roster;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a map of activity names to activities")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Roster, A::Error> {
        let mut roster = Roster::new();
        while let Some((name, activity)) = access.next_entry::<String, Activity>()? {
            roster.insert(name, activity);
        }
        Ok(roster)
    }
}

impl<'de> Deserialize<'de> for Roster {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Roster, D::Error> {
        deserializer.deserialize_map(RosterVisitor)
    }
}

/// The roster owned by a running server.
#[derive(Debug)]
pub struct Registry {
    roster: RwLock<Roster>,
    enforce_capacity: bool,
}

impl Registry {
    pub fn new(roster: Roster, enforce_capacity: bool) -> Self {
        Registry {
            roster: RwLock::new(roster),
            enforce_capacity,
        }
    }

    pub async fn snapshot(&self) -> Roster {
        self.roster.read().await.clone()
    }

    pub async fn sign_up(&self, activity_name: &str, email: &str) -> Result<(), RosterError> {
        self.roster
            .write()
            .await
            .sign_up(activity_name, email, self.enforce_capacity)
    }

    pub async fn unregister(&self, activity_name: &str, email: &str) -> Result<(), RosterError> {
        self.roster.write().await.unregister(activity_name, email)
    }
}
