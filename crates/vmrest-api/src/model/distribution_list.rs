//! System distribution list resource -- `/vmrest/distributionlists`.

use indexmap::IndexMap;
use serde::Deserialize;

use crate::error::Error;
use crate::list::{self, ListResult};
use crate::query::Query;
use crate::resource::{Entity, FieldDescriptor, Resource};
use crate::session::Session;
use crate::track::{FieldKind, FieldValue};

/// A system distribution list.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct DistributionList {
    pub object_id: String,
    #[serde(rename = "URI")]
    pub uri: Option<String>,
    pub alias: Option<String>,
    pub display_name: Option<String>,
    /// The list's extension, when one is assigned.
    pub dtmf_access_id: Option<String>,
}

static DISTRIBUTION_LIST_FIELDS: &[FieldDescriptor<DistributionList>] = &[
    FieldDescriptor {
        name: "Alias",
        kind: FieldKind::Str,
        get: |l| l.alias.clone().map(FieldValue::Str),
        set: |l, v| {
            l.alias = Some(v.into_str()?);
            Ok(())
        },
    },
    FieldDescriptor {
        name: "DisplayName",
        kind: FieldKind::Str,
        get: |l| l.display_name.clone().map(FieldValue::Str),
        set: |l, v| {
            l.display_name = Some(v.into_str()?);
            Ok(())
        },
    },
    FieldDescriptor {
        name: "DtmfAccessId",
        kind: FieldKind::Str,
        get: |l| l.dtmf_access_id.clone().map(FieldValue::Str),
        set: |l, v| {
            l.dtmf_access_id = Some(v.into_str()?);
            Ok(())
        },
    },
];

impl Resource for DistributionList {
    const NAME: &'static str = "distribution list";
    const COLLECTION: &'static str = "distributionlists";
    const LIST_KEY: &'static str = "DistributionList";

    fn descriptors() -> &'static [FieldDescriptor<Self>] {
        DISTRIBUTION_LIST_FIELDS
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

// ── Membership ───────────────────────────────────────────────────────

/// One membership row of a distribution list. Read-only: members are
/// added and removed, never edited in place.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct DistributionListMember {
    pub object_id: String,
    pub alias: Option<String>,
    pub display_name: Option<String>,
    /// Set when the member is a user.
    pub member_subscriber_object_id: Option<String>,
    /// Set when the member is a nested distribution list.
    pub member_distribution_list_object_id: Option<String>,
}

impl Resource for DistributionListMember {
    const NAME: &'static str = "distribution list member";
    const COLLECTION: &'static str = "distributionlistmembers";
    const LIST_KEY: &'static str = "DistributionListMember";
    // Added through the owning list's member collection, never here.
    const CREATABLE: bool = false;

    fn descriptors() -> &'static [FieldDescriptor<Self>] {
        &[]
    }

    fn object_id(&self) -> &str {
        &self.object_id
    }

    fn set_object_id(&mut self, id: String) {
        self.object_id = id;
    }

    fn empty() -> Self {
        Self::default()
    }
}

impl Entity<DistributionList> {
    fn members_path(&self) -> Result<String, Error> {
        if self.object_id().is_empty() {
            return Err(Error::invalid_argument(
                "membership requires a fetched distribution list",
            ));
        }
        Ok(format!(
            "{}/{}/distributionlistmembers",
            DistributionList::COLLECTION,
            self.object_id()
        ))
    }

    /// One page of this list's members.
    pub async fn list_members(
        &self,
        session: &Session,
        query: &Query,
    ) -> Result<ListResult<DistributionListMember>, Error> {
        list::fetch_list_at(session, &self.members_path()?, query).await
    }

    /// Add a user to this list; returns the new membership's object id.
    pub async fn add_member_user(
        &self,
        session: &Session,
        user_object_id: &str,
    ) -> Result<String, Error> {
        if user_object_id.is_empty() {
            return Err(Error::invalid_argument("user object id must not be empty"));
        }
        let path = self.members_path()?;
        let mut fields: IndexMap<&'static str, String> = IndexMap::with_capacity(1);
        fields.insert("MemberSubscriberObjectId", user_object_id.to_owned());
        session.post_fields(&path, &fields).await
    }

    /// Remove a membership row from this list.
    pub async fn remove_member(
        &self,
        session: &Session,
        member_object_id: &str,
    ) -> Result<(), Error> {
        if member_object_id.is_empty() {
            return Err(Error::invalid_argument(
                "member object id must not be empty",
            ));
        }
        let path = format!("{}/{member_object_id}", self.members_path()?);
        session.delete(&path).await
    }
}
