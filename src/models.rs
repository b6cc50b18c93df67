use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer};

/// A single activity as returned by `GET /activities`.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Activity {
    pub description: String,
    pub schedule: String,
    pub max_participants: u32,
    pub participants: Vec<String>,
}

impl Activity {
    /// Capacity minus current enrollment. Negative when the backend reports
    /// more participants than seats.
    pub fn spots_left(&self) -> i64 {
        i64::from(self.max_participants) - self.participants.len() as i64
    }
}

/// Activities keyed by name, kept in the order the backend listed them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActivityDirectory {
    entries: Vec<(String, Activity)>,
}

impl ActivityDirectory {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Activity)> {
        self.entries
            .iter()
            .map(|(name, activity)| (name.as_str(), activity))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }
}

impl FromIterator<(String, Activity)> for ActivityDirectory {
    fn from_iter<I: IntoIterator<Item = (String, Activity)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl<'de> Deserialize<'de> for ActivityDirectory {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct DirectoryVisitor;

        impl<'de> Visitor<'de> for DirectoryVisitor {
            type Value = ActivityDirectory;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of activity name to activity")
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((name, activity)) = map.next_entry::<String, Activity>()? {
                    // A repeated name keeps its first position and takes the later value.
                    match entries.iter_mut().find(|(key, _)| *key == name) {
                        Some(entry) => entry.1 = activity,
                        None => entries.push((name, activity)),
                    }
                }
                Ok(ActivityDirectory { entries })
            }
        }

        deserializer.deserialize_map(DirectoryVisitor)
    }
}

/// Body of a successful signup or unregister call.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct MutationResponse {
    pub message: String,
}

/// Body of a rejected call. `detail` is optional since not every backend
/// error carries one.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct ErrorResponse {
    #[serde(default)]
    pub detail: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spots_left() {
        let activity = Activity {
            description: "Strategy".to_string(),
            schedule: "Fridays".to_string(),
            max_participants: 12,
            participants: vec!["a@x.com".to_string(), "b@x.com".to_string()],
        };
        assert_eq!(activity.spots_left(), 10);
    }

    #[test]
    fn test_directory_keeps_response_order() {
        let body = r#"{
            "Zumba": {"description": "d", "schedule": "s", "max_participants": 5, "participants": []},
            "Art Club": {"description": "d", "schedule": "s", "max_participants": 5, "participants": []},
            "Math Olympiad": {"description": "d", "schedule": "s", "max_participants": 5, "participants": []}
        }"#;
        let directory: ActivityDirectory = serde_json::from_str(body).unwrap();
        let names: Vec<&str> = directory.names().collect();
        assert_eq!(names, vec!["Zumba", "Art Club", "Math Olympiad"]);
    }

    #[test]
    fn test_directory_repeated_name_keeps_one_entry() {
        let body = r#"{
            "Chess Club": {"description": "first", "schedule": "s", "max_participants": 5, "participants": []},
            "Art Club": {"description": "d", "schedule": "s", "max_participants": 5, "participants": []},
            "Chess Club": {"description": "second", "schedule": "s", "max_participants": 8, "participants": []}
        }"#;
        let directory: ActivityDirectory = serde_json::from_str(body).unwrap();
        let names: Vec<&str> = directory.names().collect();
        assert_eq!(names, vec!["Chess Club", "Art Club"]);
        assert_eq!(directory.len(), 2);

        let (_, chess) = directory.iter().next().unwrap();
        assert_eq!(chess.description, "second");
        assert_eq!(chess.max_participants, 8);
    }

    #[test]
    fn test_directory_rejects_missing_fields() {
        let body = r#"{"Chess Club": {"description": "d", "schedule": "s"}}"#;
        assert!(serde_json::from_str::<ActivityDirectory>(body).is_err());
    }

    #[test]
    fn test_error_response_without_detail() {
        let parsed: ErrorResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(parsed.detail, None);
    }
}
