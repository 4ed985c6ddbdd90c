//! The outbound user message

use crate::core_attachment::PackagedPart;
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// ebMS3 service element: the business process context of the exchange
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Service {
    pub scheme: Option<String>,
    pub value: String,
}

/// One party of the exchange
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PartyInfo {
    pub id: Option<String>,
    pub id_type: Option<String>,
    pub role: String,
}

/// A name/value message property carried in the ebMS3 header
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MessageProperty {
    pub name: String,
    pub value: String,
}

/// The assembled outbound message
///
/// The primary payload is always carried as the first attachment part; the
/// message itself has no inline payload.
#[derive(Debug, Clone, Serialize)]
pub struct UserMessage {
    pub message_id: String,
    pub conversation_id: String,
    pub agreement_ref: Option<String>,
    pub action: String,
    pub service: Service,
    pub from: PartyInfo,
    pub to: PartyInfo,
    pub properties: Vec<MessageProperty>,
    pub sending_date_time: Option<DateTime<Utc>>,
    parts: Vec<PackagedPart>,
}

impl UserMessage {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        conversation_id: Option<String>,
        agreement_ref: Option<String>,
        action: String,
        service: Service,
        from: PartyInfo,
        to: PartyInfo,
        properties: Vec<MessageProperty>,
    ) -> Self {
        Self {
            message_id: Uuid::new_v4().to_string(),
            conversation_id: conversation_id.unwrap_or_else(|| Uuid::new_v4().to_string()),
            agreement_ref,
            action,
            service,
            from,
            to,
            properties,
            sending_date_time: None,
            parts: Vec::new(),
        }
    }

    /// Stamp the sending date time if none is set yet and return the
    /// effective value
    pub fn ensure_sending_date_time(&mut self) -> DateTime<Utc> {
        *self.sending_date_time.get_or_insert_with(Utc::now)
    }

    /// Append an attachment part; order is significant
    pub fn add_part(&mut self, part: PackagedPart) {
        self.parts.push(part);
    }

    /// Attachment parts in packaging order (primary payload first)
    pub fn parts(&self) -> &[PackagedPart] {
        &self.parts
    }

    /// Look up a message property by name
    pub fn property(&self, name: &str) -> Option<&str> {
        self.properties
            .iter()
            .find(|p| p.name == name)
            .map(|p| p.value.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message() -> UserMessage {
        UserMessage::new(
            None,
            Some("urn:example:agreement".to_string()),
            "urn:example:action".to_string(),
            Service {
                scheme: Some("cenbii-procid-ubl".to_string()),
                value: "urn:example:process".to_string(),
            },
            PartyInfo {
                id: Some("SENDER".to_string()),
                id_type: None,
                role: super::super::constants::DEFAULT_INITIATOR_ROLE.to_string(),
            },
            PartyInfo {
                id: Some("RECEIVER".to_string()),
                id_type: None,
                role: super::super::constants::DEFAULT_RESPONDER_ROLE.to_string(),
            },
            vec![MessageProperty {
                name: "finalRecipient".to_string(),
                value: "iso6523-actorid-upis::0088:123".to_string(),
            }],
        )
    }

    #[test]
    fn test_message_ids_are_generated() {
        let a = message();
        let b = message();
        assert_ne!(a.message_id, b.message_id);
        assert_ne!(a.conversation_id, b.conversation_id);
    }

    #[test]
    fn test_explicit_conversation_id_is_kept() {
        let msg = UserMessage::new(
            Some("conv-1".to_string()),
            None,
            "a".to_string(),
            Service {
                scheme: None,
                value: "s".to_string(),
            },
            PartyInfo {
                id: None,
                id_type: None,
                role: "r".to_string(),
            },
            PartyInfo {
                id: None,
                id_type: None,
                role: "r".to_string(),
            },
            vec![],
        );
        assert_eq!(msg.conversation_id, "conv-1");
    }

    #[test]
    fn test_ensure_sending_date_time_is_stable() {
        let mut msg = message();
        assert!(msg.sending_date_time.is_none());

        let first = msg.ensure_sending_date_time();
        let second = msg.ensure_sending_date_time();
        assert_eq!(first, second);
        assert_eq!(msg.sending_date_time, Some(first));
    }

    #[test]
    fn test_property_lookup() {
        let msg = message();
        assert_eq!(
            msg.property("finalRecipient"),
            Some("iso6523-actorid-upis::0088:123")
        );
        assert_eq!(msg.property("originalSender"), None);
    }
}
