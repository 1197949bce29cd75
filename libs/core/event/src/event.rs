//! Security event raised by a service.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventLevel {
    Info,
    Low,
    Medium,
    High,
    Critical,
}

/// An event to notify.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: Uuid,
    /// Event code, defined by the emitting service
    pub code: u32,
    pub level: EventLevel,
    /// Emitting service
    pub source: String,
    #[serde(default)]
    pub data: Map<String, Value>,
    pub created_at: DateTime<Utc>,
}

impl Event {
    pub fn new(code: u32, level: EventLevel, source: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            code,
            level,
            source: source.into(),
            data: Map::new(),
            created_at: Utc::now(),
        }
    }

    pub fn with_data(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.data.insert(key.into(), value.into());
        self
    }

    /// Identity used to detect duplicates: everything but id and timestamp.
    pub fn dedup_key(&self) -> String {
        format!(
            "{}|{:?}|{}|{}",
            self.code,
            self.level,
            self.source,
            Value::Object(self.data.clone())
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dedup_key_ignores_id_and_time() {
        let a = Event::new(1, EventLevel::High, "xlist").with_data("ip", "10.0.0.1");
        let b = Event::new(1, EventLevel::High, "xlist").with_data("ip", "10.0.0.1");
        assert_ne!(a.id, b.id);
        assert_eq!(a.dedup_key(), b.dedup_key());
    }

    #[test]
    fn test_dedup_key_depends_on_data() {
        let a = Event::new(1, EventLevel::High, "xlist").with_data("ip", "10.0.0.1");
        let b = Event::new(1, EventLevel::High, "xlist").with_data("ip", "10.0.0.2");
        assert_ne!(a.dedup_key(), b.dedup_key());
    }

    #[test]
    fn test_serialize_level_lowercase() {
        let event = Event::new(7, EventLevel::Critical, "dnsutil");
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["level"], "critical");
        assert_eq!(json["source"], "dnsutil");
    }
}
