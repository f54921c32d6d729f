use crate::core::{BookedEvent, CalendarSink, Storage};
use crate::utils::error::Result;
use serde::Serialize;

/// File-backed stand-in for a calendar booking client: prepared events are
/// written as one JSON document per run, ready for a real transport to pick
/// up.
pub struct JsonOutbox<S: Storage> {
    storage: S,
    path: String,
}

#[derive(Serialize)]
struct OutboxDocument<'a> {
    calendar_id: &'a str,
    events: &'a [BookedEvent],
}

impl<S: Storage> JsonOutbox<S> {
    pub fn new(storage: S, path: impl Into<String>) -> Self {
        Self {
            storage,
            path: path.into(),
        }
    }
}

#[async_trait::async_trait]
impl<S: Storage> CalendarSink for JsonOutbox<S> {
    async fn publish(&self, calendar_id: &str, events: &[BookedEvent]) -> Result<usize> {
        let document = OutboxDocument {
            calendar_id,
            events,
        };
        let json = serde_json::to_vec_pretty(&document)?;
        self.storage.write_file(&self.path, &json).await?;
        Ok(events.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::LocalStorage;
    use crate::calendar::{build_event, EventSettings};
    use crate::domain::model::Slot;

    #[tokio::test]
    async fn test_publish_writes_outbox_document() {
        let dir = tempfile::TempDir::new().unwrap();
        let storage = LocalStorage::new(dir.path().to_str().unwrap().to_string());
        let outbox = JsonOutbox::new(storage.clone(), "event_outbox.json");

        let slot = Slot::new("2020-11-03", "Tue", "9:00-10:00");
        let events = vec![BookedEvent {
            participant: "Ana".to_string(),
            slot: slot.clone(),
            event: build_event(&slot, &EventSettings::default()).unwrap(),
        }];

        let written = outbox.publish("primary", &events).await.unwrap();
        assert_eq!(written, 1);

        let raw = storage.read_file("event_outbox.json").await.unwrap();
        let doc: serde_json::Value = serde_json::from_slice(&raw).unwrap();
        assert_eq!(doc["calendar_id"], "primary");
        assert_eq!(doc["events"][0]["participant"], "Ana");
        assert_eq!(doc["events"][0]["event"]["kind"], "calendar#event");
    }
}
