// Clipboard relay - "copy settings" from one marker, "apply" onto another
//
// Single slot, last copy wins. The entry never carries a name and applying
// never touches the target's: every marker has to be named on its own.

use super::draft::DraftRecord;

#[derive(Debug, Clone, Default)]
pub struct ClipboardRelay {
    entry: Option<DraftRecord>,
}

impl ClipboardRelay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrite the slot. The name is stripped on the way in.
    pub fn set(&mut self, mut draft: DraftRecord) {
        draft.name = None;
        self.entry = Some(draft);
    }

    pub fn is_empty(&self) -> bool {
        self.entry.is_none()
    }

    pub fn entry(&self) -> Option<&DraftRecord> {
        self.entry.as_ref()
    }

    /// Copy the transferable settings onto `target`.
    /// Returns false (and leaves `target` alone) when nothing was copied yet.
    pub fn apply(&self, target: &mut DraftRecord) -> bool {
        let Some(source) = &self.entry else {
            return false;
        };

        target.flash_interval_ms = source.flash_interval_ms.clone();
        target.sprite_id = source.sprite_id.clone();
        target.sprite_image = source.sprite_image.clone();
        target.color_id = source.color_id.clone();
        target.color_image = source.color_image.clone();
        target.scale = source.scale;
        target.opacity = source.opacity;
        target.items_ref = source.items_ref.clone();
        target.colors_ref = source.colors_ref.clone();
        target.groups = source.groups.clone();
        target.flags = source.flags;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blips::draft::GroupEntry;
    use serde_json::Number;

    fn source() -> DraftRecord {
        let mut draft = DraftRecord::blank();
        draft.name = Some("Hospital".to_string());
        draft.sprite_id = Some(Number::from(61));
        draft.color_id = Some(Number::from(2));
        draft.scale = Some(1.4);
        draft.opacity = Some(120);
        draft.groups = vec![GroupEntry::new("ems", 1)];
        draft.flags.flashing = Some(true);
        draft
    }

    #[test]
    fn test_apply_without_entry_is_a_no_op() {
        let relay = ClipboardRelay::new();
        let mut target = DraftRecord::blank();
        let before = target.clone();

        assert!(!relay.apply(&mut target));
        assert_eq!(target, before);
    }

    #[test]
    fn test_apply_copies_settings_but_never_the_name() {
        let mut relay = ClipboardRelay::new();
        relay.set(source());

        let mut target = DraftRecord::blank();
        target.name = Some("Pharmacy".to_string());
        assert!(relay.apply(&mut target));

        assert_eq!(target.name.as_deref(), Some("Pharmacy"));
        assert_eq!(target.sprite_id, Some(Number::from(61)));
        assert_eq!(target.color_id, Some(Number::from(2)));
        assert_eq!(target.scale, Some(1.4));
        assert_eq!(target.opacity, Some(120));
        assert_eq!(target.groups, vec![GroupEntry::new("ems", 1)]);
        assert_eq!(target.flags.flashing, Some(true));
    }

    #[test]
    fn test_stored_entry_has_no_name() {
        let mut relay = ClipboardRelay::new();
        relay.set(source());

        let entry = relay.entry().expect("entry");
        assert_eq!(entry.name, None);
        assert_eq!(entry.sprite_id, Some(Number::from(61)));
    }

    #[test]
    fn test_apply_keeps_unset_target_name_unset() {
        let mut relay = ClipboardRelay::new();
        relay.set(source());

        let mut target = DraftRecord::blank();
        target.name = None;
        relay.apply(&mut target);
        assert_eq!(target.name, None);
    }

    #[test]
    fn test_copy_overwrites_previous_entry() {
        let mut relay = ClipboardRelay::new();
        relay.set(source());

        let mut second = DraftRecord::blank();
        second.sprite_id = Some(Number::from(1));
        relay.set(second);

        let mut target = DraftRecord::blank();
        relay.apply(&mut target);
        assert_eq!(target.sprite_id, Some(Number::from(1)));
        assert!(target.groups.iter().all(GroupEntry::is_placeholder));
    }
}
