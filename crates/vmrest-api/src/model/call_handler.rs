//! Call handler resource -- `/vmrest/handlers/callhandlers`.

use serde::Deserialize;

use super::de;
use super::greeting::{Greeting, GreetingType};
use crate::error::Error;
use crate::list::{self, ListResult};
use crate::query::Query;
use crate::resource::{Entity, FieldDescriptor, Resource};
use crate::session::Session;
use crate::track::{FieldKind, FieldValue};

/// A call handler: answers calls, plays greetings, and routes callers.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct CallHandler {
    pub object_id: String,
    #[serde(rename = "URI")]
    pub uri: Option<String>,
    pub display_name: Option<String>,
    /// The handler's extension.
    pub dtmf_access_id: Option<String>,
    #[serde(deserialize_with = "de::flexible_int")]
    pub language: Option<i64>,
    #[serde(deserialize_with = "de::flexible_int")]
    pub after_message_action: Option<i64>,
    #[serde(deserialize_with = "de::flexible_int")]
    pub time_zone: Option<i64>,
    /// True for the system handlers that cannot be removed.
    #[serde(deserialize_with = "de::flexible_bool")]
    pub undeletable: Option<bool>,
}

static CALL_HANDLER_FIELDS: &[FieldDescriptor<CallHandler>] = &[
    FieldDescriptor {
        name: "DisplayName",
        kind: FieldKind::Str,
        get: |h| h.display_name.clone().map(FieldValue::Str),
        set: |h, v| {
            h.display_name = Some(v.into_str()?);
            Ok(())
        },
    },
    FieldDescriptor {
        name: "DtmfAccessId",
        kind: FieldKind::Str,
        get: |h| h.dtmf_access_id.clone().map(FieldValue::Str),
        set: |h, v| {
            h.dtmf_access_id = Some(v.into_str()?);
            Ok(())
        },
    },
    FieldDescriptor {
        name: "Language",
        kind: FieldKind::Int,
        get: |h| h.language.map(FieldValue::Int),
        set: |h, v| {
            h.language = Some(v.into_int()?);
            Ok(())
        },
    },
    FieldDescriptor {
        name: "AfterMessageAction",
        kind: FieldKind::Int,
        get: |h| h.after_message_action.map(FieldValue::Int),
        set: |h, v| {
            h.after_message_action = Some(v.into_int()?);
            Ok(())
        },
    },
    FieldDescriptor {
        name: "TimeZone",
        kind: FieldKind::Int,
        get: |h| h.time_zone.map(FieldValue::Int),
        set: |h, v| {
            h.time_zone = Some(v.into_int()?);
            Ok(())
        },
    },
];

impl Resource for CallHandler {
    const NAME: &'static str = "call handler";
    const COLLECTION: &'static str = "handlers/callhandlers";
    const LIST_KEY: &'static str = "Callhandler";

    fn descriptors() -> &'static [FieldDescriptor<Self>] {
        CALL_HANDLER_FIELDS
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

impl Entity<CallHandler> {
    fn greetings_path(&self) -> Result<String, Error> {
        if self.object_id().is_empty() {
            return Err(Error::invalid_argument(
                "greetings require a fetched call handler",
            ));
        }
        Ok(format!(
            "{}/{}/greetings",
            CallHandler::COLLECTION,
            self.object_id()
        ))
    }

    /// Fetch one of this handler's greetings by type.
    pub async fn fetch_greeting(
        &self,
        session: &Session,
        greeting_type: GreetingType,
    ) -> Result<Entity<Greeting>, Error> {
        let path = format!("{}/{greeting_type}", self.greetings_path()?);
        let row: Greeting = session.get_json(&path).await.map_err(|e| {
            if e.is_not_found() {
                Error::NotFound {
                    resource: Greeting::NAME,
                    key: greeting_type.to_string(),
                }
            } else {
                e
            }
        })?;
        Ok(Entity::adopt(row))
    }

    /// List all of this handler's greetings.
    pub async fn list_greetings(&self, session: &Session) -> Result<ListResult<Greeting>, Error> {
        list::fetch_list_at(session, &self.greetings_path()?, &Query::new()).await
    }
}
