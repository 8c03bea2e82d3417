//! Core `Event` resource

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::meta::{ObjectMeta, ObjectReference};
use crate::object::{ApiGroup, TypedResource};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub metadata: ObjectMeta,

    pub involved_object: ObjectReference,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    /// `Normal` or `Warning`
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub type_: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<i32>,

    #[serde(
        default,
        with = "crate::time::time_serde",
        skip_serializing_if = "Option::is_none"
    )]
    pub first_timestamp: Option<DateTime<Utc>>,

    #[serde(
        default,
        with = "crate::time::time_serde",
        skip_serializing_if = "Option::is_none"
    )]
    pub last_timestamp: Option<DateTime<Utc>>,

    #[serde(
        default,
        with = "crate::time::micro_time_serde",
        skip_serializing_if = "Option::is_none"
    )]
    pub event_time: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<EventSource>,
}

impl TypedResource for Event {
    const KIND: &'static str = "Event";
    const GROUP: ApiGroup = ApiGroup::CORE;
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventSource {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::Resource;
    use chrono::TimeZone;

    #[test]
    fn test_event_timestamps() {
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 30).unwrap();
        let event = Event {
            metadata: ObjectMeta::named("web.17a"),
            involved_object: ObjectReference {
                kind: Some("Pod".to_string()),
                name: Some("web-0".to_string()),
                ..Default::default()
            },
            reason: Some("Started".to_string()),
            first_timestamp: Some(at),
            event_time: Some(at),
            ..Default::default()
        };

        assert_eq!(
            event.to_yaml().unwrap(),
            "\
apiVersion: v1
eventTime: 2024-05-01T12:00:30.000000Z
firstTimestamp: 2024-05-01T12:00:30Z
involvedObject:
  kind: Pod
  name: web-0
kind: Event
metadata:
  name: web.17a
reason: Started
"
        );
    }
}
