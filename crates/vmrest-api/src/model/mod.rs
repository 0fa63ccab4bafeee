//! Typed resource models with their field-descriptor tables.

pub mod call_handler;
pub mod distribution_list;
pub mod greeting;
pub mod schedule;
pub mod tenant;
pub mod user;

pub use call_handler::CallHandler;
pub use distribution_list::{DistributionList, DistributionListMember};
pub use greeting::{Greeting, GreetingType};
pub use schedule::Schedule;
pub use tenant::Tenant;
pub use user::User;

/// Lenient deserializers for the server's loosely-typed JSON: booleans,
/// integers, and date/times frequently arrive as strings.
pub(crate) mod de {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    use crate::track::DATETIME_WIRE_FORMAT;

    pub fn flexible_bool<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<Value>::deserialize(deserializer)? {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Bool(b)) => Ok(Some(b)),
            Some(Value::Number(n)) => Ok(Some(n.as_i64() != Some(0))),
            Some(Value::String(s)) => match s.as_str() {
                "true" | "1" => Ok(Some(true)),
                "false" | "0" | "" => Ok(Some(false)),
                other => Err(serde::de::Error::custom(format!(
                    "invalid boolean: {other:?}"
                ))),
            },
            Some(other) => Err(serde::de::Error::custom(format!(
                "invalid boolean: {other}"
            ))),
        }
    }

    pub fn flexible_int<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<Value>::deserialize(deserializer)? {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Number(n)) => n.as_i64().map(Some).ok_or_else(|| {
                serde::de::Error::custom(format!("integer out of range: {n}"))
            }),
            Some(Value::String(s)) if s.is_empty() => Ok(None),
            Some(Value::String(s)) => s
                .parse()
                .map(Some)
                .map_err(|e| serde::de::Error::custom(format!("invalid integer {s:?}: {e}"))),
            Some(other) => Err(serde::de::Error::custom(format!(
                "invalid integer: {other}"
            ))),
        }
    }

    pub fn flexible_datetime<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<Value>::deserialize(deserializer)? {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(s)) if s.is_empty() => Ok(None),
            Some(Value::String(s)) => NaiveDateTime::parse_from_str(&s, DATETIME_WIRE_FORMAT)
                .or_else(|_| NaiveDateTime::parse_from_str(&s, "%Y-%m-%d %H:%M:%S"))
                .map(Some)
                .map_err(|e| serde::de::Error::custom(format!("invalid date-time {s:?}: {e}"))),
            Some(other) => Err(serde::de::Error::custom(format!(
                "invalid date-time: {other}"
            ))),
        }
    }

    #[cfg(test)]
    mod tests {
        use pretty_assertions::assert_eq;
        use serde::Deserialize;

        #[derive(Debug, Deserialize, Default)]
        #[serde(default)]
        struct Row {
            #[serde(deserialize_with = "super::flexible_bool")]
            flag: Option<bool>,
            #[serde(deserialize_with = "super::flexible_int")]
            num: Option<i64>,
            #[serde(deserialize_with = "super::flexible_datetime")]
            at: Option<chrono::NaiveDateTime>,
        }

        #[test]
        fn booleans_accepted_as_strings_or_bools() {
            let row: Row = serde_json::from_str(r#"{"flag": "true"}"#).expect("string bool");
            assert_eq!(row.flag, Some(true));

            let row: Row = serde_json::from_str(r#"{"flag": false}"#).expect("native bool");
            assert_eq!(row.flag, Some(false));

            let row: Row = serde_json::from_str(r#"{"flag": "0"}"#).expect("numeric string");
            assert_eq!(row.flag, Some(false));
        }

        #[test]
        fn integers_accepted_as_strings_or_numbers() {
            let row: Row = serde_json::from_str(r#"{"num": "42"}"#).expect("string int");
            assert_eq!(row.num, Some(42));

            let row: Row = serde_json::from_str(r#"{"num": 7}"#).expect("native int");
            assert_eq!(row.num, Some(7));
        }

        #[test]
        fn datetimes_parsed_with_and_without_millis() {
            let row: Row =
                serde_json::from_str(r#"{"at": "2024-06-15 10:30:00.000"}"#).expect("millis");
            assert!(row.at.is_some());

            let row: Row =
                serde_json::from_str(r#"{"at": "2024-06-15 10:30:00"}"#).expect("no millis");
            assert!(row.at.is_some());
        }

        #[test]
        fn missing_and_empty_become_none() {
            let row: Row = serde_json::from_str("{}").expect("all defaulted");
            assert_eq!(row.flag, None);
            assert_eq!(row.num, None);
            assert!(row.at.is_none());
        }
    }
}
