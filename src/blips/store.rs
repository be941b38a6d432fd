// Active draft store - the one marker currently being edited
//
// Setters only; nothing here validates. Validation is consulted by the
// panel right before a submission goes out.

use super::draft::{
    to_draft, to_submission_with, DraftRecord, FlagPolicy, GroupEntry, SubmissionPayload,
};
use super::model::{FlagField, MarkerRecord};
use serde::Deserialize;
use serde_json::Number;

/// A single scalar field change from the settings form
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "camelCase")]
pub enum DraftEdit {
    Name(Option<String>),
    FlashInterval(Option<Number>),
    /// Sprite picker sets id and preview image together
    Sprite {
        id: Option<Number>,
        image: Option<String>,
    },
    /// Color picker sets id and swatch together
    Color {
        id: Option<Number>,
        image: Option<String>,
    },
    Scale(Option<f64>),
    Opacity(Option<i64>),
    ItemsRef(Option<Number>),
    ColorsRef(Option<Number>),
}

#[derive(Debug, Clone, Default)]
pub struct ActiveDraft {
    draft: DraftRecord,
}

impl ActiveDraft {
    /// Start from the blank "new marker" draft
    pub fn new_blank() -> Self {
        Self {
            draft: DraftRecord::blank(),
        }
    }

    /// Start from an existing record
    pub fn open(record: &MarkerRecord) -> Self {
        Self {
            draft: to_draft(record),
        }
    }

    pub fn draft(&self) -> &DraftRecord {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut DraftRecord {
        &mut self.draft
    }

    pub fn apply(&mut self, edit: DraftEdit) {
        let draft = &mut self.draft;
        match edit {
            DraftEdit::Name(name) => draft.name = name,
            DraftEdit::FlashInterval(ms) => draft.flash_interval_ms = ms,
            DraftEdit::Sprite { id, image } => {
                draft.sprite_id = id;
                draft.sprite_image = image;
            }
            DraftEdit::Color { id, image } => {
                draft.color_id = id;
                draft.color_image = image;
            }
            DraftEdit::Scale(scale) => draft.scale = scale,
            DraftEdit::Opacity(alpha) => draft.opacity = alpha,
            DraftEdit::ItemsRef(items) => draft.items_ref = items,
            DraftEdit::ColorsRef(colors) => draft.colors_ref = colors,
        }
    }

    /// Flip a flag; an unset flag becomes `true`
    pub fn toggle_flag(&mut self, field: FlagField) {
        let slot = self.draft.flags.slot_mut(field);
        *slot = Some(!slot.unwrap_or(false));
    }

    pub fn add_group_row(&mut self) {
        self.draft.groups.push(GroupEntry::placeholder());
    }

    /// Returns false when `index` is out of range
    pub fn set_group_name(&mut self, index: usize, name: Option<String>) -> bool {
        match self.draft.groups.get_mut(index) {
            Some(row) => {
                row.name = name;
                true
            }
            None => false,
        }
    }

    /// Returns false when `index` is out of range
    pub fn set_group_grade(&mut self, index: usize, grade: Option<i64>) -> bool {
        match self.draft.groups.get_mut(index) {
            Some(row) => {
                row.grade = grade;
                true
            }
            None => false,
        }
    }

    /// Returns false when `index` is out of range
    pub fn remove_group_row(&mut self, index: usize) -> bool {
        if index < self.draft.groups.len() {
            self.draft.groups.remove(index);
            true
        } else {
            false
        }
    }

    /// Build the payload for `createBlip`; the draft is left as it is
    pub fn submission(&self, policy: FlagPolicy) -> SubmissionPayload {
        to_submission_with(&self.draft, policy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_blank_starts_with_defaults() {
        let store = ActiveDraft::new_blank();
        assert_eq!(store.draft(), &DraftRecord::blank());
        assert_eq!(store.draft().opacity, Some(255));
        assert_eq!(store.draft().groups.len(), 1);
    }

    #[test]
    fn test_open_loads_record_through_transform() {
        let mut record = MarkerRecord::new(3, "Davis");
        record.name = Some("Grove".to_string());
        let store = ActiveDraft::open(&record);
        assert_eq!(store.draft().name.as_deref(), Some("Grove"));
        assert!(store.draft().groups.is_empty());
    }

    #[test]
    fn test_field_setters() {
        let mut store = ActiveDraft::new_blank();
        store.apply(DraftEdit::Name(Some("Bank".to_string())));
        store.apply(DraftEdit::Sprite {
            id: Some(Number::from(108)),
            image: Some("sprite_108.png".to_string()),
        });
        store.apply(DraftEdit::Scale(Some(2.5)));
        store.apply(DraftEdit::Opacity(None));

        let draft = store.draft();
        assert_eq!(draft.name.as_deref(), Some("Bank"));
        assert_eq!(draft.sprite_id, Some(Number::from(108)));
        assert_eq!(draft.sprite_image.as_deref(), Some("sprite_108.png"));
        assert_eq!(draft.scale, Some(2.5));
        assert_eq!(draft.opacity, None);
    }

    #[test]
    fn test_edits_deserialize_from_operator_json() {
        let edit: DraftEdit =
            serde_json::from_str(r#"{"field": "flashInterval", "value": 1000}"#).unwrap();
        assert_eq!(edit, DraftEdit::FlashInterval(Some(Number::from(1000))));

        let edit: DraftEdit =
            serde_json::from_str(r#"{"field": "itemsRef", "value": 2.5}"#).unwrap();
        assert_eq!(edit, DraftEdit::ItemsRef(Number::from_f64(2.5)));

        let edit: DraftEdit =
            serde_json::from_str(r#"{"field": "color", "value": {"id": 2, "image": "rgb(1,2,3)"}}"#)
                .unwrap();
        assert_eq!(
            edit,
            DraftEdit::Color {
                id: Some(Number::from(2)),
                image: Some("rgb(1,2,3)".to_string())
            }
        );
    }

    #[test]
    fn test_toggle_flag_treats_unset_as_off() {
        let mut store = ActiveDraft::open(&MarkerRecord::new(1, "z"));
        assert_eq!(store.draft().flags.tick_mark, None);

        store.toggle_flag(FlagField::TickMark);
        assert_eq!(store.draft().flags.tick_mark, Some(true));
        store.toggle_flag(FlagField::TickMark);
        assert_eq!(store.draft().flags.tick_mark, Some(false));
    }

    #[test]
    fn test_group_rows() {
        let mut store = ActiveDraft::new_blank();
        assert!(store.set_group_name(0, Some("police".to_string())));
        assert!(store.set_group_grade(0, Some(3)));
        store.add_group_row();
        assert_eq!(store.draft().groups.len(), 2);

        assert!(!store.set_group_name(5, Some("nope".to_string())));
        assert!(!store.remove_group_row(5));

        let payload = store.submission(FlagPolicy::HOST_COMPATIBLE);
        assert_eq!(payload.groups.unwrap().get("police"), Some(&3));

        assert!(store.remove_group_row(0));
        assert_eq!(store.draft().groups, vec![GroupEntry::placeholder()]);
    }

    #[test]
    fn test_submission_does_not_clear_the_draft() {
        let mut store = ActiveDraft::new_blank();
        store.apply(DraftEdit::Name(Some("Bank".to_string())));
        let _ = store.submission(FlagPolicy::default());
        assert_eq!(store.draft().name.as_deref(), Some("Bank"));
    }
}
