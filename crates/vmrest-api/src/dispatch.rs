//! The shared update dispatcher.
//!
//! Builds the minimal string-valued property list from a resource's
//! descriptor table plus its change tracker, and issues the create or
//! update call. One dispatcher services every resource type; snapshot
//! commit and tracker clearing stay in [`crate::resource::Entity`] and
//! happen only after a success returned from here.

use indexmap::IndexMap;

use crate::error::Error;
use crate::resource::Resource;
use crate::session::Session;
use crate::track::ChangeTracker;

/// Minimal update payload: dirty wire names mapped to their current
/// values, serialized as strings regardless of semantic type. An unset
/// optional field that was explicitly dirtied is sent as an empty string,
/// which is how the server clears a property.
pub(crate) fn build_payload<T: Resource>(
    current: &T,
    tracker: &ChangeTracker,
) -> Result<IndexMap<&'static str, String>, Error> {
    let mut payload = IndexMap::with_capacity(tracker.len());

    for name in tracker.dirty_fields() {
        let desc = T::descriptor(name).ok_or_else(|| {
            Error::invalid_argument(format!("{} has no field named '{name}'", T::NAME))
        })?;
        let wire = (desc.get)(current).map_or_else(String::new, |v| v.to_wire());
        payload.insert(desc.name, wire);
    }

    Ok(payload)
}

/// PUT the dirty fields to the given resource path.
pub(crate) async fn push_update<T: Resource>(
    session: &Session,
    path: &str,
    current: &T,
    tracker: &ChangeTracker,
) -> Result<(), Error> {
    let payload = build_payload::<T>(current, tracker)?;
    session.put_fields(path, &payload).await
}

/// POST the dirty fields to the collection endpoint; returns the
/// server-assigned object id of the new resource.
pub(crate) async fn push_create<T: Resource>(
    session: &Session,
    current: &T,
    tracker: &ChangeTracker,
) -> Result<String, Error> {
    let payload = build_payload::<T>(current, tracker)?;
    session.post_fields(T::COLLECTION, &payload).await
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde::Deserialize;

    use super::*;
    use crate::resource::FieldDescriptor;
    use crate::track::{FieldKind, FieldValue};

    #[derive(Debug, Clone, Default, Deserialize)]
    #[serde(rename_all = "PascalCase", default)]
    struct Widget {
        object_id: String,
        display_name: Option<String>,
        enabled: Option<bool>,
        weight: Option<i64>,
    }

    static WIDGET_FIELDS: &[FieldDescriptor<Widget>] = &[
        FieldDescriptor {
            name: "DisplayName",
            kind: FieldKind::Str,
            get: |w| w.display_name.clone().map(FieldValue::Str),
            set: |w, v| {
                w.display_name = Some(v.into_str()?);
                Ok(())
            },
        },
        FieldDescriptor {
            name: "Enabled",
            kind: FieldKind::Bool,
            get: |w| w.enabled.map(FieldValue::Bool),
            set: |w, v| {
                w.enabled = Some(v.into_bool()?);
                Ok(())
            },
        },
        FieldDescriptor {
            name: "Weight",
            kind: FieldKind::Int,
            get: |w| w.weight.map(FieldValue::Int),
            set: |w, v| {
                w.weight = Some(v.into_int()?);
                Ok(())
            },
        },
    ];

    impl Resource for Widget {
        const NAME: &'static str = "widget";
        const COLLECTION: &'static str = "widgets";
        const LIST_KEY: &'static str = "Widget";

        fn descriptors() -> &'static [FieldDescriptor<Self>] {
            WIDGET_FIELDS
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

    #[test]
    fn payload_contains_only_dirty_fields_in_mark_order() {
        let widget = Widget {
            object_id: "w-1".into(),
            display_name: Some("Widget".into()),
            enabled: Some(false),
            weight: Some(12),
        };
        let mut tracker = ChangeTracker::new();
        tracker.mark_dirty("Weight");
        tracker.mark_dirty("Enabled");

        let payload = build_payload(&widget, &tracker).expect("known fields");

        assert_eq!(
            payload.iter().collect::<Vec<_>>(),
            vec![
                (&"Weight", &"12".to_owned()),
                (&"Enabled", &"false".to_owned()),
            ]
        );
    }

    #[test]
    fn unset_dirty_field_serializes_as_empty_string() {
        let widget = Widget {
            object_id: "w-1".into(),
            ..Widget::default()
        };
        let mut tracker = ChangeTracker::new();
        tracker.mark_dirty("DisplayName");

        let payload = build_payload(&widget, &tracker).expect("known field");
        assert_eq!(payload.get("DisplayName"), Some(&String::new()));
    }

    #[test]
    fn clean_tracker_yields_empty_payload() {
        let payload =
            build_payload(&Widget::default(), &ChangeTracker::new()).expect("empty tracker");
        assert!(payload.is_empty());
    }
}

