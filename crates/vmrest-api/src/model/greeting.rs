//! Greeting sub-resource of a call handler.
//!
//! Greetings have no collection of their own: they are addressed through
//! the owning handler (`handlers/callhandlers/{id}/greetings/{type}`) and
//! identified by type rather than object id, so every handle relies on
//! the server-supplied `URI` field for updates.

use std::path::Path;

use chrono::NaiveDateTime;
use serde::Deserialize;
use strum::{Display, EnumString};

use super::de;
use crate::error::Error;
use crate::resource::{Entity, FieldDescriptor, Resource};
use crate::session::Session;
use crate::track::{FieldKind, FieldValue};

/// The seven greeting slots every call handler carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
pub enum GreetingType {
    Standard,
    #[strum(serialize = "Off Hours")]
    OffHours,
    Busy,
    Internal,
    Alternate,
    Holiday,
    Error,
}

/// One greeting slot: whether it is active, until when, and what plays.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Greeting {
    #[serde(rename = "URI")]
    pub uri: Option<String>,
    pub greeting_type: Option<String>,
    pub call_handler_object_id: Option<String>,
    #[serde(deserialize_with = "de::flexible_bool")]
    pub enabled: Option<bool>,
    /// When the greeting stops playing; unset means enabled indefinitely.
    #[serde(deserialize_with = "de::flexible_datetime")]
    pub time_expires: Option<NaiveDateTime>,
    /// What callers hear: 0 = system default, 1 = recorded, 2 = nothing.
    #[serde(deserialize_with = "de::flexible_int")]
    pub play_what: Option<i64>,
}

static GREETING_FIELDS: &[FieldDescriptor<Greeting>] = &[
    FieldDescriptor {
        name: "Enabled",
        kind: FieldKind::Bool,
        get: |g| g.enabled.map(FieldValue::Bool),
        set: |g, v| {
            g.enabled = Some(v.into_bool()?);
            Ok(())
        },
    },
    FieldDescriptor {
        name: "TimeExpires",
        kind: FieldKind::DateTime,
        get: |g| g.time_expires.map(FieldValue::DateTime),
        set: |g, v| {
            g.time_expires = Some(v.into_datetime()?);
            Ok(())
        },
    },
    FieldDescriptor {
        name: "PlayWhat",
        kind: FieldKind::Int,
        get: |g| g.play_what.map(FieldValue::Int),
        set: |g, v| {
            g.play_what = Some(v.into_int()?);
            Ok(())
        },
    },
];

impl Resource for Greeting {
    const NAME: &'static str = "greeting";
    const COLLECTION: &'static str = "handlers/callhandlers";
    const LIST_KEY: &'static str = "Greeting";
    // Fixed slots per handler; never created or deleted.
    const CREATABLE: bool = false;

    fn descriptors() -> &'static [FieldDescriptor<Self>] {
        GREETING_FIELDS
    }

    /// Greetings are keyed by type, not object id.
    fn object_id(&self) -> &str {
        self.greeting_type.as_deref().unwrap_or("")
    }

    fn set_object_id(&mut self, id: String) {
        self.greeting_type = Some(id);
    }

    fn uri(&self) -> Option<&str> {
        self.uri.as_deref()
    }

    fn empty() -> Self {
        Self::default()
    }
}

impl Entity<Greeting> {
    fn stream_path(&self, language: u32) -> Result<String, Error> {
        if self.get().uri.is_none() {
            return Err(Error::invalid_argument(
                "recording transfer requires a fetched greeting",
            ));
        }
        Ok(format!(
            "{}/greetingstreamfiles/{language}/audio",
            self.update_path()
        ))
    }

    /// Upload a WAV recording for this greeting in the given language
    /// (e.g. 1033 for US English).
    pub async fn upload_recording(
        &self,
        session: &Session,
        language: u32,
        local: &Path,
    ) -> Result<(), Error> {
        let path = self.stream_path(language)?;
        session.upload_wav(&path, local).await
    }

    /// Download this greeting's recorded audio to a local WAV file.
    pub async fn download_recording(
        &self,
        session: &Session,
        language: u32,
        local: &Path,
    ) -> Result<(), Error> {
        let path = self.stream_path(language)?;
        session.download_wav(&path, local).await
    }
}
