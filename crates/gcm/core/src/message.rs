//! Downstream message types.

/// Delivery priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    /// Delivered when the device is awake; may be batched by the provider.
    #[default]
    Normal,
    /// Wakes a sleeping device.
    High,
}

/// Display notification shown by the device on behalf of the app.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Notification {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sound: Option<String>,
    /// iOS badge count.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub badge: Option<String>,
    /// Android: notifications with the same tag replace each other.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    /// Android icon color in `#rrggbb` form.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub click_action: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body_loc_key: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub body_loc_args: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title_loc_key: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub title_loc_args: Vec<String>,
}

/// Message content delivered to the app.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Payload {
    /// Custom key/value data handed to the app.
    #[serde(default, skip_serializing_if = "serde_json::Map::is_empty")]
    pub data: serde_json::Map<String, serde_json::Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notification: Option<Notification>,
}

/// Delivery options.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Options {
    /// Messages sharing a collapse key replace each other while undelivered.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collapse_key: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_available: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delay_while_idle: Option<bool>,

    /// Seconds the message is kept while the device is offline.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_to_live: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub restricted_package_name: Option<String>,

    /// Validate the request without delivering it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dry_run: Option<bool>,
}

/// A logical notification addressed to one or more devices.
///
/// Serializes to the flat downstream JSON object, so a message file in the
/// provider's own format can be loaded directly.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Message {
    /// Recipient registration IDs, in delivery order.
    pub registration_ids: Vec<String>,

    #[serde(flatten)]
    pub payload: Payload,

    #[serde(flatten)]
    pub options: Options,
}

impl Message {
    /// Create a message for the given recipients with an empty payload.
    pub fn new<I, S>(registration_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            registration_ids: registration_ids.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    /// Add a data entry.
    pub fn with_data(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.payload.data.insert(key.into(), value.into());
        self
    }

    /// Set the display notification.
    pub fn with_notification(mut self, notification: Notification) -> Self {
        self.payload.notification = Some(notification);
        self
    }

    /// Replace the delivery options.
    pub fn with_options(mut self, options: Options) -> Self {
        self.options = options;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unset_fields_are_omitted() {
        let message = Message::new(["a"]);
        let json = serde_json::to_value(&message).unwrap();
        assert_eq!(json, serde_json::json!({ "registration_ids": ["a"] }));
    }

    #[test]
    fn test_flat_wire_shape() {
        let message = Message::new(["a", "b"])
            .with_data("score", "5x1")
            .with_notification(Notification {
                title: Some("Goal".into()),
                ..Default::default()
            })
            .with_options(Options {
                priority: Some(Priority::High),
                time_to_live: Some(60),
                dry_run: Some(true),
                ..Default::default()
            });

        let json = serde_json::to_value(&message).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "registration_ids": ["a", "b"],
                "data": { "score": "5x1" },
                "notification": { "title": "Goal" },
                "priority": "high",
                "time_to_live": 60,
                "dry_run": true
            })
        );
    }

    #[test]
    fn test_parse_message_file() {
        let message: Message = serde_json::from_str(
            r#"{
                "registration_ids": ["r1"],
                "collapse_key": "score_update",
                "delay_while_idle": true,
                "data": { "k": 1 }
            }"#,
        )
        .unwrap();

        assert_eq!(message.registration_ids, vec!["r1".to_string()]);
        assert_eq!(message.options.collapse_key.as_deref(), Some("score_update"));
        assert_eq!(message.options.delay_while_idle, Some(true));
        assert_eq!(message.payload.data["k"], 1);
        assert!(message.payload.notification.is_none());
    }
}
