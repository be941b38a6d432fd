// Draft transform - storage shape <-> editable shape
//
// The host stores group access as a mapping, but an operator editing a
// marker needs rows that can be half-filled (a name not typed yet, a grade
// cleared), which a mapping cannot hold. Drafts therefore keep groups as an
// ordered list of rows, and submission folds the rows back into a mapping.

use super::model::{GroupAccess, MarkerFlags, MarkerRecord};
use serde::Serialize;
use serde_json::Number;

/// Default flash interval for a brand-new marker
pub const DEFAULT_FLASH_INTERVAL_MS: i64 = 50_000;

/// One editable group-access row
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GroupEntry {
    pub name: Option<String>,
    pub grade: Option<i64>,
}

impl GroupEntry {
    pub fn new(name: impl Into<String>, grade: i64) -> Self {
        Self {
            name: Some(name.into()),
            grade: Some(grade),
        }
    }

    /// Empty row the operator has not filled in yet
    pub fn placeholder() -> Self {
        Self {
            name: Some(String::new()),
            grade: None,
        }
    }

    /// Rows without a name are not submitted
    pub fn is_placeholder(&self) -> bool {
        self.name.as_deref().map_or(true, str::is_empty)
    }
}

/// Editable marker: every scalar of `MarkerRecord` except identity, with
/// group access as rows
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DraftRecord {
    pub name: Option<String>,
    #[serde(rename = "ftimer")]
    pub flash_interval_ms: Option<Number>,
    #[serde(rename = "Sprite")]
    pub sprite_id: Option<Number>,
    #[serde(rename = "SpriteImg")]
    pub sprite_image: Option<String>,
    pub scale: Option<f64>,
    #[serde(rename = "sColor")]
    pub color_id: Option<Number>,
    #[serde(rename = "scImg")]
    pub color_image: Option<String>,
    #[serde(rename = "alpha")]
    pub opacity: Option<i64>,
    #[serde(rename = "items")]
    pub items_ref: Option<Number>,
    #[serde(rename = "colors")]
    pub colors_ref: Option<Number>,
    pub groups: Vec<GroupEntry>,
    #[serde(flatten)]
    pub flags: MarkerFlags,
}

impl DraftRecord {
    /// The draft shown when the operator starts a new marker
    pub fn blank() -> Self {
        Self {
            name: Some(String::new()),
            flash_interval_ms: Some(Number::from(DEFAULT_FLASH_INTERVAL_MS)),
            sprite_id: Some(Number::from(0)),
            sprite_image: Some(String::new()),
            scale: Some(1.0),
            color_id: Some(Number::from(0)),
            color_image: Some(String::new()),
            opacity: Some(255),
            items_ref: Some(Number::from(0)),
            colors_ref: Some(Number::from(0)),
            groups: vec![GroupEntry::placeholder()],
            flags: MarkerFlags::all_off(),
        }
    }
}

impl Default for DraftRecord {
    fn default() -> Self {
        Self::blank()
    }
}

/// How boolean flags are written on submission
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlagPolicy {
    /// Submit `hideUi: false` as `null`, matching what existing host
    /// resources expect. Other flags are always submitted as-is.
    pub collapse_hidden_false: bool,
}

impl FlagPolicy {
    /// Bit-for-bit compatible with the host resource
    pub const HOST_COMPATIBLE: Self = Self {
        collapse_hidden_false: true,
    };

    /// Every flag submitted as its actual value
    pub const UNIFORM: Self = Self {
        collapse_hidden_false: false,
    };
}

impl Default for FlagPolicy {
    fn default() -> Self {
        Self::HOST_COMPATIBLE
    }
}

/// Body of a `createBlip` call
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubmissionPayload {
    pub name: Option<String>,
    #[serde(rename = "ftimer")]
    pub flash_interval_ms: Option<Number>,
    #[serde(rename = "Sprite")]
    pub sprite_id: Option<Number>,
    #[serde(rename = "SpriteImg")]
    pub sprite_image: Option<String>,
    pub scale: Option<f64>,
    #[serde(rename = "sColor")]
    pub color_id: Option<Number>,
    #[serde(rename = "scImg")]
    pub color_image: Option<String>,
    #[serde(rename = "alpha")]
    pub opacity: Option<i64>,
    #[serde(rename = "items")]
    pub items_ref: Option<Number>,
    #[serde(rename = "colors")]
    pub colors_ref: Option<Number>,
    /// `None` means "no group restriction"; never an empty mapping
    pub groups: Option<GroupAccess>,
    #[serde(flatten)]
    pub flags: MarkerFlags,
}

/// Storage -> draft. Drops identity, turns the group mapping into rows.
pub fn to_draft(record: &MarkerRecord) -> DraftRecord {
    let groups = record
        .group_access
        .iter()
        .flatten()
        .map(|(name, grade)| GroupEntry::new(name.clone(), *grade))
        .collect();

    DraftRecord {
        name: record.name.clone(),
        flash_interval_ms: record.flash_interval_ms.clone(),
        sprite_id: record.sprite_id.clone(),
        sprite_image: record.sprite_image.clone(),
        scale: record.scale,
        color_id: record.color_id.clone(),
        color_image: record.color_image.clone(),
        opacity: record.opacity,
        items_ref: record.items_ref.clone(),
        colors_ref: record.colors_ref.clone(),
        groups,
        flags: record.flags,
    }
}

/// Draft -> submission with the host-compatible flag policy
pub fn to_submission(draft: &DraftRecord) -> SubmissionPayload {
    to_submission_with(draft, FlagPolicy::HOST_COMPATIBLE)
}

pub fn to_submission_with(draft: &DraftRecord, policy: FlagPolicy) -> SubmissionPayload {
    let name = draft.name.clone().filter(|n| !n.is_empty());

    let mut flags = draft.flags;
    if policy.collapse_hidden_false && flags.hidden_from_ui == Some(false) {
        flags.hidden_from_ui = None;
    }

    SubmissionPayload {
        name,
        flash_interval_ms: draft.flash_interval_ms.clone(),
        sprite_id: draft.sprite_id.clone(),
        sprite_image: draft.sprite_image.clone(),
        scale: draft.scale,
        color_id: draft.color_id.clone(),
        color_image: draft.color_image.clone(),
        opacity: draft.opacity,
        items_ref: draft.items_ref.clone(),
        colors_ref: draft.colors_ref.clone(),
        groups: collapse_groups(&draft.groups),
        flags,
    }
}

/// Fold group rows into a mapping; last row wins on duplicate names
fn collapse_groups(rows: &[GroupEntry]) -> Option<GroupAccess> {
    let mut groups = GroupAccess::with_capacity(rows.len());
    for row in rows {
        let Some(name) = row.name.as_deref().filter(|n| !n.is_empty()) else {
            continue;
        };
        groups.insert(name.to_owned(), row.grade.unwrap_or(0));
    }

    if groups.is_empty() {
        None
    } else {
        Some(groups)
    }
}
