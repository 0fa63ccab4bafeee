//! Subscriber (user) resource -- `/vmrest/users`.

use std::path::Path;

use serde::Deserialize;

use super::de;
use crate::error::Error;
use crate::resource::{Entity, EntityState, FieldDescriptor, Resource};
use crate::session::Session;
use crate::track::{FieldKind, FieldValue};

/// A mailbox-owning subscriber.
///
/// Only fields in the descriptor table are editable through
/// [`Entity::set_field`]; the rest are server-owned.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct User {
    pub object_id: String,
    #[serde(rename = "URI")]
    pub uri: Option<String>,
    pub alias: Option<String>,
    pub display_name: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    /// The user's extension.
    pub dtmf_access_id: Option<String>,
    #[serde(deserialize_with = "de::flexible_bool")]
    pub list_in_directory: Option<bool>,
    #[serde(deserialize_with = "de::flexible_int")]
    pub language: Option<i64>,
    #[serde(deserialize_with = "de::flexible_int")]
    pub time_zone: Option<i64>,
    pub department: Option<String>,
    /// Class of service this user is assigned to.
    pub cos_object_id: Option<String>,
}

static USER_FIELDS: &[FieldDescriptor<User>] = &[
    FieldDescriptor {
        name: "Alias",
        kind: FieldKind::Str,
        get: |u| u.alias.clone().map(FieldValue::Str),
        set: |u, v| {
            u.alias = Some(v.into_str()?);
            Ok(())
        },
    },
    FieldDescriptor {
        name: "DisplayName",
        kind: FieldKind::Str,
        get: |u| u.display_name.clone().map(FieldValue::Str),
        set: |u, v| {
            u.display_name = Some(v.into_str()?);
            Ok(())
        },
    },
    FieldDescriptor {
        name: "FirstName",
        kind: FieldKind::Str,
        get: |u| u.first_name.clone().map(FieldValue::Str),
        set: |u, v| {
            u.first_name = Some(v.into_str()?);
            Ok(())
        },
    },
    FieldDescriptor {
        name: "LastName",
        kind: FieldKind::Str,
        get: |u| u.last_name.clone().map(FieldValue::Str),
        set: |u, v| {
            u.last_name = Some(v.into_str()?);
            Ok(())
        },
    },
    FieldDescriptor {
        name: "DtmfAccessId",
        kind: FieldKind::Str,
        get: |u| u.dtmf_access_id.clone().map(FieldValue::Str),
        set: |u, v| {
            u.dtmf_access_id = Some(v.into_str()?);
            Ok(())
        },
    },
    FieldDescriptor {
        name: "ListInDirectory",
        kind: FieldKind::Bool,
        get: |u| u.list_in_directory.map(FieldValue::Bool),
        set: |u, v| {
            u.list_in_directory = Some(v.into_bool()?);
            Ok(())
        },
    },
    FieldDescriptor {
        name: "Language",
        kind: FieldKind::Int,
        get: |u| u.language.map(FieldValue::Int),
        set: |u, v| {
            u.language = Some(v.into_int()?);
            Ok(())
        },
    },
    FieldDescriptor {
        name: "TimeZone",
        kind: FieldKind::Int,
        get: |u| u.time_zone.map(FieldValue::Int),
        set: |u, v| {
            u.time_zone = Some(v.into_int()?);
            Ok(())
        },
    },
    FieldDescriptor {
        name: "Department",
        kind: FieldKind::Str,
        get: |u| u.department.clone().map(FieldValue::Str),
        set: |u, v| {
            u.department = Some(v.into_str()?);
            Ok(())
        },
    },
    FieldDescriptor {
        name: "CosObjectId",
        kind: FieldKind::Str,
        get: |u| u.cos_object_id.clone().map(FieldValue::Str),
        set: |u, v| {
            u.cos_object_id = Some(v.into_str()?);
            Ok(())
        },
    },
];

impl Resource for User {
    const NAME: &'static str = "user";
    const COLLECTION: &'static str = "users";
    const LIST_KEY: &'static str = "User";

    fn descriptors() -> &'static [FieldDescriptor<Self>] {
        USER_FIELDS
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

impl Entity<User> {
    fn voice_name_path(&self) -> Result<String, Error> {
        if self.state() != EntityState::Synced || self.object_id().is_empty() {
            return Err(Error::invalid_argument(
                "voice name transfer requires a fetched user",
            ));
        }
        Ok(format!("users/{}/voicename", self.object_id()))
    }

    /// Upload a WAV recording as this user's voice name.
    pub async fn upload_voice_name(&self, session: &Session, local: &Path) -> Result<(), Error> {
        let path = self.voice_name_path()?;
        session.upload_wav(&path, local).await
    }

    /// Download this user's recorded voice name to a local WAV file.
    pub async fn download_voice_name(&self, session: &Session, local: &Path) -> Result<(), Error> {
        let path = self.voice_name_path()?;
        session.download_wav(&path, local).await
    }
}
