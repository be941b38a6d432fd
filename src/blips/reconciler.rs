// Update reconciler - keeps the local mirror in step with host pushes
//
// The host never tags its `updateBlipData` payloads. A bare number means
// "this id was deleted", an object with an `id` is one changed record, and
// anything else is a full snapshot (either a list or a Lua table keyed by
// row index). `BlipUpdate::sniff` decides once, at the boundary; everything
// after that works with the typed update.

use super::model::{as_integer, MarkerRecord};
use indexmap::IndexMap;
use serde_json::Value;

/// A host update after shape inspection
#[derive(Debug, Clone, PartialEq)]
pub enum BlipUpdate {
    Delete(i64),
    UpsertOne(MarkerRecord),
    ReplaceAll(Vec<MarkerRecord>),
}

impl BlipUpdate {
    /// Classify a raw `updateBlipData` payload
    ///
    /// Returns `None` for payloads that are neither an id nor something
    /// records can be pulled out of (null, booleans, strings, fractional
    /// numbers). Those leave the collection alone.
    pub fn sniff(payload: &Value) -> Option<Self> {
        match payload {
            Value::Number(_) => match as_integer(payload) {
                Some(id) => Some(Self::Delete(id)),
                None => {
                    tracing::warn!("Ignoring blip update with non-integer id {}", payload);
                    None
                }
            },
            Value::Object(obj) if obj.contains_key("id") => match MarkerRecord::from_value(payload)
            {
                Some(record) => Some(Self::UpsertOne(record)),
                None => {
                    // The key is there, so this is an upsert, but there is nothing to key it by
                    tracing::warn!(
                        "Ignoring single blip update: id {} is not a usable record id",
                        obj.get("id").unwrap_or(&serde_json::Value::Null)
                    );
                    None
                }
            },
            Value::Object(obj) => Some(Self::ReplaceAll(collect_records(obj.values()))),
            Value::Array(items) => Some(Self::ReplaceAll(collect_records(items.iter()))),
            Value::Null | Value::Bool(_) | Value::String(_) => {
                tracing::warn!("Ignoring blip update with unexpected payload {}", payload);
                None
            }
        }
    }
}

fn collect_records<'a>(values: impl Iterator<Item = &'a Value>) -> Vec<MarkerRecord> {
    values
        .filter_map(|value| {
            let record = MarkerRecord::from_value(value);
            if record.is_none() {
                tracing::warn!("Dropping snapshot entry without a usable id");
            }
            record
        })
        .collect()
}

/// What an applied update did to the collection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileOutcome {
    Removed(i64),
    /// Delete for an id we do not hold, or an ignored payload
    Unchanged,
    Replaced(i64),
    Appended(i64),
    Reloaded(usize),
}

/// Client-side mirror of the host's markers, in host insertion order
#[derive(Debug, Clone, Default)]
pub struct BlipCollection {
    records: IndexMap<i64, MarkerRecord>,
}

impl BlipCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a collection from records; later duplicates overwrite earlier ones in place
    pub fn from_records(records: impl IntoIterator<Item = MarkerRecord>) -> Self {
        let mut collection = Self::new();
        for record in records {
            collection.records.insert(record.id, record);
        }
        collection
    }

    /// Apply one typed update
    pub fn apply(&mut self, update: BlipUpdate) -> ReconcileOutcome {
        match update {
            BlipUpdate::Delete(id) => match self.records.shift_remove(&id) {
                Some(_) => ReconcileOutcome::Removed(id),
                None => ReconcileOutcome::Unchanged,
            },
            BlipUpdate::UpsertOne(record) => {
                let id = record.id;
                // IndexMap::insert keeps the slot of an existing key
                match self.records.insert(id, record) {
                    Some(_) => ReconcileOutcome::Replaced(id),
                    None => ReconcileOutcome::Appended(id),
                }
            }
            BlipUpdate::ReplaceAll(records) => {
                *self = Self::from_records(records);
                ReconcileOutcome::Reloaded(self.records.len())
            }
        }
    }

    /// Sniff a raw payload and apply it; unrecognised payloads change nothing
    pub fn apply_payload(&mut self, payload: &Value) -> ReconcileOutcome {
        match BlipUpdate::sniff(payload) {
            Some(update) => {
                let outcome = self.apply(update);
                tracing::debug!("Reconciled blip update: {:?}", outcome);
                outcome
            }
            None => ReconcileOutcome::Unchanged,
        }
    }

    pub fn get(&self, id: i64) -> Option<&MarkerRecord> {
        self.records.get(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &MarkerRecord> {
        self.records.values()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn ids(&self) -> Vec<i64> {
        self.records.keys().copied().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn seeded() -> BlipCollection {
        let mut collection = BlipCollection::new();
        collection.apply_payload(&json!([
            {"id": 1, "zone": "Mission Row", "name": "Police"},
            {"id": 2, "zone": "Pillbox Hill", "name": "Hospital"},
            {"id": 3, "zone": "Legion Square", "name": "Bank"}
        ]));
        collection
    }

    #[test]
    fn test_sniff_dispatches_on_shape() {
        assert_eq!(BlipUpdate::sniff(&json!(5)), Some(BlipUpdate::Delete(5)));
        assert_eq!(BlipUpdate::sniff(&json!(5.0)), Some(BlipUpdate::Delete(5)));

        match BlipUpdate::sniff(&json!({"id": 9, "name": "Garage"})) {
            Some(BlipUpdate::UpsertOne(record)) => assert_eq!(record.id, 9),
            other => panic!("expected upsert, got {:?}", other),
        }

        match BlipUpdate::sniff(&json!({"1": {"id": 1}, "2": {"id": 2}})) {
            Some(BlipUpdate::ReplaceAll(records)) => assert_eq!(records.len(), 2),
            other => panic!("expected replace-all, got {:?}", other),
        }

        match BlipUpdate::sniff(&json!([{"id": 1}])) {
            Some(BlipUpdate::ReplaceAll(records)) => assert_eq!(records.len(), 1),
            other => panic!("expected replace-all, got {:?}", other),
        }
    }

    #[test]
    fn test_sniff_ignores_scalars_that_are_not_ids() {
        assert_eq!(BlipUpdate::sniff(&Value::Null), None);
        assert_eq!(BlipUpdate::sniff(&json!(true)), None);
        assert_eq!(BlipUpdate::sniff(&json!("3")), None);
        assert_eq!(BlipUpdate::sniff(&json!(2.5)), None);
        assert_eq!(BlipUpdate::sniff(&json!({"id": null, "name": "x"})), None);
    }

    #[test]
    fn test_upsert_with_unusable_id_leaves_collection_alone() {
        let mut collection = seeded();
        for payload in [
            json!({"id": null, "name": "Ghost"}),
            json!({"id": "north", "name": "Ghost"}),
            json!({"id": 1.5, "name": "Ghost"}),
        ] {
            assert_eq!(collection.apply_payload(&payload), ReconcileOutcome::Unchanged);
        }
        assert_eq!(collection.ids(), vec![1, 2, 3]);
        assert!(collection.iter().all(|r| r.name.as_deref() != Some("Ghost")));
    }

    #[test]
    fn test_delete_of_unknown_id_is_idempotent() {
        let mut collection = seeded();
        let before = collection.ids();

        assert_eq!(collection.apply(BlipUpdate::Delete(42)), ReconcileOutcome::Unchanged);
        assert_eq!(collection.ids(), before);
        assert_eq!(collection.len(), 3);
    }

    #[test]
    fn test_delete_keeps_remaining_order() {
        let mut collection = seeded();
        assert_eq!(collection.apply_payload(&json!(2)), ReconcileOutcome::Removed(2));
        assert_eq!(collection.ids(), vec![1, 3]);
    }

    #[test]
    fn test_upsert_existing_keeps_position() {
        let mut collection = seeded();
        let outcome = collection.apply_payload(&json!({"id": 1, "zone": "Vespucci", "name": "LSPD"}));

        assert_eq!(outcome, ReconcileOutcome::Replaced(1));
        assert_eq!(collection.ids(), vec![1, 2, 3]);
        let record = collection.get(1).unwrap();
        assert_eq!(record.name.as_deref(), Some("LSPD"));
        assert_eq!(record.zone_label, "Vespucci");
    }

    #[test]
    fn test_upsert_new_appends() {
        let mut collection = seeded();
        let outcome = collection.apply_payload(&json!({"id": 10, "zone": "Sandy Shores"}));
        assert_eq!(outcome, ReconcileOutcome::Appended(10));
        assert_eq!(collection.ids(), vec![1, 2, 3, 10]);
    }

    #[test]
    fn test_replace_all_discards_prior_order() {
        let mut collection = seeded();
        collection.apply_payload(&json!([{"id": 3}, {"id": 7}]));
        assert_eq!(collection.ids(), vec![3, 7]);
    }

    #[test]
    fn test_replace_all_with_empty_payload_clears() {
        let mut collection = seeded();
        assert_eq!(collection.apply_payload(&json!([])), ReconcileOutcome::Reloaded(0));
        assert!(collection.is_empty());

        let mut collection = seeded();
        collection.apply_payload(&json!({}));
        assert!(collection.is_empty());
    }

    #[test]
    fn test_malformed_snapshot_keeps_what_it_can() {
        let mut collection = seeded();
        collection.apply_payload(&json!({
            "a": {"id": 4, "name": "Garage"},
            "b": {"name": "no id"},
            "c": 17
        }));
        assert_eq!(collection.ids(), vec![4]);
    }

    #[test]
    fn test_duplicate_ids_in_snapshot_keep_first_slot_last_value() {
        let mut collection = BlipCollection::new();
        collection.apply_payload(&json!([
            {"id": 1, "name": "old"},
            {"id": 2},
            {"id": 1, "name": "new"}
        ]));
        assert_eq!(collection.ids(), vec![1, 2]);
        assert_eq!(collection.get(1).unwrap().name.as_deref(), Some("new"));
    }

    #[test]
    fn test_upsert_then_delete_same_id_leaves_empty() {
        let mut collection = BlipCollection::new();
        collection.apply_payload(&json!({"id": 0, "name": "Test", "zone": "Davis"}));
        assert_eq!(collection.len(), 1);
        collection.apply_payload(&json!(0));
        assert!(collection.is_empty());
    }
}
