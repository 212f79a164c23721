use std::collections::{BTreeMap, VecDeque};

use ironplan_domain as domain;
use log::debug;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use strum::AsRefStr;

use crate::log::{self as store_log, Entry};

const MAX_LOG_ENTRIES: usize = 100;

#[derive(AsRefStr)]
enum Key {
    #[strum(serialize = "log")]
    Log,
    #[strum(serialize = "program/")]
    Program,
}

fn program_key(name: &str) -> String {
    format!("{}{name}", Key::Program.as_ref())
}

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("no value for '{0}'")]
    KeyNotFound(String),
    #[error("invalid value for '{key}': {source}")]
    Format {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

/// JSON values stored under string keys.
///
/// The whole store round-trips to a single JSON object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeyedStore {
    entries: BTreeMap<String, serde_json::Value>,
}

impl KeyedStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<T, Error> {
        let value = self
            .entries
            .get(key)
            .ok_or_else(|| Error::KeyNotFound(key.to_string()))?;
        T::deserialize(value).map_err(|source| Error::Format {
            key: key.to_string(),
            source,
        })
    }

    pub fn put<T: Serialize + ?Sized>(&mut self, key: &str, value: &T) -> Result<(), Error> {
        let value = serde_json::to_value(value).map_err(|source| Error::Format {
            key: key.to_string(),
            source,
        })?;
        self.entries.insert(key.to_string(), value);
        Ok(())
    }

    #[must_use]
    pub fn has_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Returns whether a value was removed.
    pub fn remove(&mut self, key: &str) -> bool {
        self.entries.remove(key).is_some()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

impl domain::ProgramRepository for KeyedStore {
    fn read_program(&self, name: &str) -> Result<domain::Program, domain::ReadError> {
        match self.get(&program_key(name)) {
            Ok(program) => Ok(program),
            Err(Error::KeyNotFound(_)) => Err(domain::ReadError::NotFound(name.to_string())),
            Err(err) => Err(domain::ReadError::Decode(err.to_string())),
        }
    }

    fn write_program(&mut self, program: &domain::Program) -> Result<(), domain::WriteError> {
        debug!("writing {}", program.name);
        self.put(&program_key(&program.name), program)
            .map_err(|err| domain::WriteError::Encode(err.to_string()))
    }
}

impl store_log::Repository for KeyedStore {
    fn read_entries(&self) -> Result<VecDeque<Entry>, store_log::Error> {
        match self.get(Key::Log.as_ref()) {
            Ok(entries) => Ok(entries),
            Err(Error::KeyNotFound(_)) => Ok(VecDeque::new()),
            Err(err) => Err(store_log::Error::Unknown(err.to_string())),
        }
    }

    fn write_entry(&mut self, entry: Entry) -> Result<(), store_log::Error> {
        let mut entries = self.read_entries()?;
        entries.push_front(entry);
        entries.truncate(MAX_LOG_ENTRIES);
        self.put(Key::Log.as_ref(), &entries)
            .map_err(|err| store_log::Error::Unknown(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use domain::{Plan, PlanState, ProgramRepository};
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use serde_json::json;

    use super::*;
    use crate::{
        log::Repository,
        tests::data::{PROGRAM, entry},
    };

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Nested {
        name: String,
        values: Vec<u32>,
    }

    #[test]
    fn test_typed_values() {
        let mut store = KeyedStore::new();
        let date = NaiveDate::from_ymd_opt(2024, 5, 6).unwrap();
        let nested = Nested {
            name: "A".into(),
            values: vec![1, 2, 3],
        };

        store.put("string", "foo").unwrap();
        store.put("bool", &true).unwrap();
        store.put("int", &-42_i64).unwrap();
        store.put("double", &2.5_f64).unwrap();
        store.put("date", &date).unwrap();
        store.put("array", &[1.5, 2.5]).unwrap();
        store.put("object", &nested).unwrap();

        assert_eq!(store.get::<String>("string").unwrap(), "foo");
        assert!(store.get::<bool>("bool").unwrap());
        assert_eq!(store.get::<i64>("int").unwrap(), -42);
        assert_eq!(store.get::<f64>("double").unwrap(), 2.5);
        assert_eq!(store.get::<NaiveDate>("date").unwrap(), date);
        assert_eq!(store.get::<Vec<f64>>("array").unwrap(), vec![1.5, 2.5]);
        assert_eq!(store.get::<Nested>("object").unwrap(), nested);
        assert_eq!(
            store.keys().collect::<Vec<_>>(),
            vec!["array", "bool", "date", "double", "int", "object", "string"]
        );
    }

    #[test]
    fn test_get_missing() {
        assert!(matches!(
            KeyedStore::new().get::<String>("a"),
            Err(Error::KeyNotFound(key)) if key == "a"
        ));
    }

    #[test]
    fn test_get_wrong_type() {
        let mut store = KeyedStore::new();
        store.put("a", &1).unwrap();

        assert!(matches!(
            store.get::<String>("a"),
            Err(Error::Format { key, .. }) if key == "a"
        ));
    }

    #[test]
    fn test_has_key_and_remove() {
        let mut store = KeyedStore::new();
        store.put("a", &1).unwrap();

        assert!(store.has_key("a"));
        assert!(store.remove("a"));
        assert!(!store.has_key("a"));
        assert!(!store.remove("a"));
    }

    #[test]
    fn test_json_round_trip() {
        let mut store = KeyedStore::new();
        store.put("a", &json!({"b": [1, 2]})).unwrap();

        let json = store.to_json().unwrap();

        assert_eq!(json, r#"{"a":{"b":[1,2]}}"#);
        assert_eq!(KeyedStore::from_json(&json).unwrap(), store);
    }

    #[test]
    fn test_from_json_invalid() {
        assert!(KeyedStore::from_json("[1, 2]").is_err());
    }

    #[test]
    fn test_program_repository() {
        let mut store = KeyedStore::new();

        assert!(matches!(
            store.read_program(&PROGRAM.name),
            Err(domain::ReadError::NotFound(name)) if name == PROGRAM.name
        ));

        store.write_program(&PROGRAM).unwrap();

        assert!(store.has_key(&format!("program/{}", PROGRAM.name)));
        let program = store.read_program(&PROGRAM.name).unwrap();
        assert_eq!(program, *PROGRAM);
        assert_eq!(
            *program.find_exercise("Squat (5RM)").unwrap().plan.state(),
            PlanState::Underway
        );
    }

    #[rstest]
    #[case::plan_type("/exercises/0/plan/type", json!("wendler"))]
    #[case::plan_state("/exercises/0/plan/lifecycle/state", json!("paused"))]
    #[case::settings_type("/exercises/0/settings/type", json!("bodyweight"))]
    #[case::apparatus_type("/exercises/0/settings/apparatus/type", json!("kettlebell"))]
    #[case::tag("/tags/0", json!("expert"))]
    fn test_read_program_with_unknown_discriminator(
        #[case] pointer: &str,
        #[case] replacement: serde_json::Value,
    ) {
        let mut value = serde_json::to_value(&*PROGRAM).unwrap();
        *value.pointer_mut(pointer).unwrap() = replacement;
        let mut store = KeyedStore::new();
        store.put(&program_key(&PROGRAM.name), &value).unwrap();

        assert!(matches!(
            store.read_program(&PROGRAM.name),
            Err(domain::ReadError::Decode(_))
        ));
    }

    #[test]
    fn test_log_repository() {
        let mut store = KeyedStore::new();
        assert_eq!(store.read_entries().unwrap(), VecDeque::new());

        for i in 0..105 {
            store.write_entry(entry(&i.to_string())).unwrap();
        }

        let entries = store.read_entries().unwrap();
        assert_eq!(entries.len(), MAX_LOG_ENTRIES);
        assert_eq!(entries[0], entry("104"));
        assert_eq!(entries[99], entry("5"));
    }

    #[test]
    fn test_log_repository_corrupt() {
        let mut store = KeyedStore::new();
        store.put(Key::Log.as_ref(), "foo").unwrap();

        assert!(store.read_entries().is_err());
        assert!(store.write_entry(entry("a")).is_err());
    }
}
