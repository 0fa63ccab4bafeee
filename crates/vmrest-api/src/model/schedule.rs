//! Schedule resource -- `/vmrest/schedules`.

use serde::Deserialize;

use super::de;
use crate::resource::{FieldDescriptor, Resource};
use crate::track::{FieldKind, FieldValue};

/// A schedule referenced by call handlers and routing rules.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Schedule {
    pub object_id: String,
    #[serde(rename = "URI")]
    pub uri: Option<String>,
    pub display_name: Option<String>,
    pub owner_location_object_id: Option<String>,
    #[serde(deserialize_with = "de::flexible_bool")]
    pub is_holiday_schedule: Option<bool>,
    /// True for system schedules that cannot be removed.
    #[serde(deserialize_with = "de::flexible_bool")]
    pub undeletable: Option<bool>,
}

static SCHEDULE_FIELDS: &[FieldDescriptor<Schedule>] = &[FieldDescriptor {
    name: "DisplayName",
    kind: FieldKind::Str,
    get: |s| s.display_name.clone().map(FieldValue::Str),
    set: |s, v| {
        s.display_name = Some(v.into_str()?);
        Ok(())
    },
}];

impl Resource for Schedule {
    const NAME: &'static str = "schedule";
    const COLLECTION: &'static str = "schedules";
    const LIST_KEY: &'static str = "Schedule";

    fn descriptors() -> &'static [FieldDescriptor<Self>] {
        SCHEDULE_FIELDS
    }

    fn object_id(&self) -> &str {
        &self.object_id
    }

    fn set_object_id(&mut self, id: String) {
        self.object_id = id;
    }

    fn uri(&self) -> Option<&str> {
        self.uri.as_deref()
    }

    fn empty() -> Self {
        Self::default()
    }
}
