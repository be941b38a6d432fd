// Marker records as the host stores them
//
// The host is a Lua resource, so its JSON is loosely typed: ids sometimes
// arrive as floats or strings, empty tables arrive as `[]`, and optional
// columns may be missing entirely. `MarkerRecord::from_value` reads every
// field leniently so one odd column never hides a whole row.
//
// Numeric settings are kept as the host's own `Number` so a value like
// `1500.5` goes back out exactly as it came in.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

/// Group name -> minimum grade, in host payload order
pub type GroupAccess = IndexMap<String, i64>;

/// Canonical, host-owned marker record
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarkerRecord {
    pub id: i64,
    #[serde(rename = "zone")]
    pub zone_label: String,
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
    #[serde(rename = "groups")]
    pub group_access: Option<GroupAccess>,
    #[serde(flatten)]
    pub flags: MarkerFlags,
}

/// The six on/off presentation switches of a marker
///
/// Each one is tri-state on the wire: the host may send `null` for a flag
/// that was never set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MarkerFlags {
    #[serde(rename = "hideb")]
    pub hide_on_map: Option<bool>,
    #[serde(rename = "tickb")]
    pub tick_mark: Option<bool>,
    #[serde(rename = "bflash")]
    pub flashing: Option<bool>,
    #[serde(rename = "sRange")]
    pub short_range_only: Option<bool>,
    #[serde(rename = "outline")]
    pub outline_enabled: Option<bool>,
    #[serde(rename = "hideUi")]
    pub hidden_from_ui: Option<bool>,
}

/// Identifies one of the six flags (wire names are used by the operator protocol)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub enum FlagField {
    #[serde(rename = "hideb")]
    HideOnMap,
    #[serde(rename = "tickb")]
    TickMark,
    #[serde(rename = "bflash")]
    Flashing,
    #[serde(rename = "sRange")]
    ShortRangeOnly,
    #[serde(rename = "outline")]
    OutlineEnabled,
    #[serde(rename = "hideUi")]
    HiddenFromUi,
}

impl MarkerFlags {
    /// All flags explicitly off (the "new blip" state)
    pub fn all_off() -> Self {
        Self {
            hide_on_map: Some(false),
            tick_mark: Some(false),
            flashing: Some(false),
            short_range_only: Some(false),
            outline_enabled: Some(false),
            hidden_from_ui: Some(false),
        }
    }

    pub fn get(&self, field: FlagField) -> Option<bool> {
        match field {
            FlagField::HideOnMap => self.hide_on_map,
            FlagField::TickMark => self.tick_mark,
            FlagField::Flashing => self.flashing,
            FlagField::ShortRangeOnly => self.short_range_only,
            FlagField::OutlineEnabled => self.outline_enabled,
            FlagField::HiddenFromUi => self.hidden_from_ui,
        }
    }

    pub fn slot_mut(&mut self, field: FlagField) -> &mut Option<bool> {
        match field {
            FlagField::HideOnMap => &mut self.hide_on_map,
            FlagField::TickMark => &mut self.tick_mark,
            FlagField::Flashing => &mut self.flashing,
            FlagField::ShortRangeOnly => &mut self.short_range_only,
            FlagField::OutlineEnabled => &mut self.outline_enabled,
            FlagField::HiddenFromUi => &mut self.hidden_from_ui,
        }
    }

    fn from_object(obj: &Map<String, Value>) -> Self {
        Self {
            hide_on_map: bool_field(obj, "hideb"),
            tick_mark: bool_field(obj, "tickb"),
            flashing: bool_field(obj, "bflash"),
            short_range_only: bool_field(obj, "sRange"),
            outline_enabled: bool_field(obj, "outline"),
            hidden_from_ui: bool_field(obj, "hideUi"),
        }
    }
}

impl MarkerRecord {
    /// Minimal record with only identity fields set
    pub fn new(id: i64, zone_label: impl Into<String>) -> Self {
        Self {
            id,
            zone_label: zone_label.into(),
            name: None,
            flash_interval_ms: None,
            sprite_id: None,
            sprite_image: None,
            scale: None,
            color_id: None,
            color_image: None,
            opacity: None,
            items_ref: None,
            colors_ref: None,
            group_access: None,
            flags: MarkerFlags::default(),
        }
    }

    /// Best-effort extraction of a record from a host JSON value
    ///
    /// Returns `None` only when the value is not an object or carries no
    /// usable `id`. Every other field degrades to absent on a type mismatch.
    pub fn from_value(value: &Value) -> Option<Self> {
        let obj = value.as_object()?;
        let id = obj.get("id").and_then(parse_id)?;

        Some(Self {
            id,
            zone_label: string_field(obj, "zone").unwrap_or_default(),
            name: string_field(obj, "name"),
            flash_interval_ms: number_field(obj, "ftimer"),
            sprite_id: number_field(obj, "Sprite"),
            sprite_image: string_field(obj, "SpriteImg"),
            scale: obj.get("scale").and_then(Value::as_f64),
            color_id: number_field(obj, "sColor"),
            color_image: string_field(obj, "scImg"),
            opacity: int_field(obj, "alpha"),
            items_ref: number_field(obj, "items"),
            colors_ref: number_field(obj, "colors"),
            group_access: obj.get("groups").and_then(parse_groups),
            flags: MarkerFlags::from_object(obj),
        })
    }
}

/// Read a record id: integer, integral float, or numeric string
pub fn parse_id(value: &Value) -> Option<i64> {
    match value {
        Value::String(s) => s.trim().parse().ok(),
        other => as_integer(other),
    }
}

/// Integer view of a JSON number, accepting integral floats (`3.0`)
pub fn as_integer(value: &Value) -> Option<i64> {
    if let Some(i) = value.as_i64() {
        return Some(i);
    }
    let f = value.as_f64()?;
    if f.fract() == 0.0 && f >= i64::MIN as f64 && f <= i64::MAX as f64 {
        Some(f as i64)
    } else {
        None
    }
}

fn int_field(obj: &Map<String, Value>, key: &str) -> Option<i64> {
    obj.get(key).and_then(as_integer)
}

fn number_field(obj: &Map<String, Value>, key: &str) -> Option<Number> {
    match obj.get(key)? {
        Value::Number(n) => Some(n.clone()),
        _ => None,
    }
}

fn string_field(obj: &Map<String, Value>, key: &str) -> Option<String> {
    obj.get(key).and_then(Value::as_str).map(str::to_owned)
}

fn bool_field(obj: &Map<String, Value>, key: &str) -> Option<bool> {
    obj.get(key).and_then(Value::as_bool)
}

fn parse_groups(value: &Value) -> Option<GroupAccess> {
    // Lua serializes an empty table as `[]`; anything but an object means "no groups"
    let obj = value.as_object()?;
    let groups = obj
        .iter()
        .filter_map(|(name, grade)| match as_integer(grade) {
            Some(grade) => Some((name.clone(), grade)),
            None => {
                tracing::debug!("Dropping group {:?} with non-integer grade {}", name, grade);
                None
            }
        })
        .collect();
    Some(groups)
}
