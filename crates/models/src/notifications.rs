use serde::{Deserialize, Serialize};

/// A notification channel as returned by the channel lookup API.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NotificationChannel {
    pub id: i64,
    pub uid: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub is_default: bool,
}

/// A rule's persisted reference to a notification channel.
///
/// New references carry `uid`. Rules saved before uids existed carry only
/// the numeric `id`, and both forms must keep matching and removable.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct ChannelRef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
}

impl ChannelRef {
    pub fn by_uid(uid: impl Into<String>) -> Self {
        Self {
            uid: Some(uid.into()),
            id: None,
        }
    }

    pub fn by_id(id: i64) -> Self {
        Self { uid: None, id: Some(id) }
    }

    /// Whether this reference points at `channel`, by uid or legacy id.
    pub fn matches_channel(&self, channel: &NotificationChannel) -> bool {
        self.uid.as_deref() == Some(channel.uid.as_str()) || self.id == Some(channel.id)
    }

    /// Whether two references identify the same channel.
    /// Unset fields never match each other.
    pub fn matches(&self, other: &ChannelRef) -> bool {
        (self.uid.is_some() && self.uid == other.uid) || (self.id.is_some() && self.id == other.id)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn channel() -> NotificationChannel {
        NotificationChannel {
            id: 7,
            uid: "pager-uid".to_string(),
            name: "pager".to_string(),
            kind: "pagerduty".to_string(),
            is_default: false,
        }
    }

    #[test]
    fn matches_channel_by_uid_or_legacy_id() {
        assert!(ChannelRef::by_uid("pager-uid").matches_channel(&channel()));
        assert!(ChannelRef::by_id(7).matches_channel(&channel()));
        assert!(!ChannelRef::by_uid("other").matches_channel(&channel()));
        assert!(!ChannelRef::by_id(8).matches_channel(&channel()));
    }

    #[test]
    fn unset_fields_never_match() {
        let empty = ChannelRef::default();
        assert!(!empty.matches(&empty));
        assert!(!empty.matches(&ChannelRef::by_id(7)));
        assert!(ChannelRef::by_id(7).matches(&ChannelRef::by_id(7)));
        assert!(ChannelRef::by_uid("u").matches(&ChannelRef {
            uid: Some("u".to_string()),
            id: Some(3),
        }));
    }

    #[test]
    fn legacy_id_reference_round_trips_without_uid() {
        let parsed: ChannelRef = serde_json::from_str(r#"{"id": 4}"#).unwrap();
        assert_eq!(parsed, ChannelRef::by_id(4));
        assert_eq!(serde_json::to_string(&parsed).unwrap(), r#"{"id":4}"#);
    }
}
