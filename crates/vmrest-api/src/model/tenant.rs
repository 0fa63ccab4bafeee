//! Tenant resource -- `/vmrest/tenants` (multi-tenant deployments).

use serde::Deserialize;

use crate::resource::{FieldDescriptor, Resource};
use crate::track::{FieldKind, FieldValue};

/// A partition of the server serving one customer organization.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Tenant {
    pub object_id: String,
    #[serde(rename = "URI")]
    pub uri: Option<String>,
    pub alias: Option<String>,
    pub display_name: Option<String>,
    pub description: Option<String>,
    /// SMTP domain mailbox addresses are created under.
    pub smtp_domain: Option<String>,
}

static TENANT_FIELDS: &[FieldDescriptor<Tenant>] = &[
    FieldDescriptor {
        name: "Alias",
        kind: FieldKind::Str,
        get: |t| t.alias.clone().map(FieldValue::Str),
        set: |t, v| {
            t.alias = Some(v.into_str()?);
            Ok(())
        },
    },
    FieldDescriptor {
        name: "DisplayName",
        kind: FieldKind::Str,
        get: |t| t.display_name.clone().map(FieldValue::Str),
        set: |t, v| {
            t.display_name = Some(v.into_str()?);
            Ok(())
        },
    },
    FieldDescriptor {
        name: "Description",
        kind: FieldKind::Str,
        get: |t| t.description.clone().map(FieldValue::Str),
        set: |t, v| {
            t.description = Some(v.into_str()?);
            Ok(())
        },
    },
    FieldDescriptor {
        name: "SmtpDomain",
        kind: FieldKind::Str,
        get: |t| t.smtp_domain.clone().map(FieldValue::Str),
        set: |t, v| {
            t.smtp_domain = Some(v.into_str()?);
            Ok(())
        },
    },
];

impl Resource for Tenant {
    const NAME: &'static str = "tenant";
    const COLLECTION: &'static str = "tenants";
    const LIST_KEY: &'static str = "Tenant";

    fn descriptors() -> &'static [FieldDescriptor<Self>] {
        TENANT_FIELDS
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
