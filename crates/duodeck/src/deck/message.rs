use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A control message crossing between the deck window and the presenter window.
///
/// On the wire this is an untyped JSON object tagged by `kind`, for example
/// `{"kind": "deck-advanced", "slideIndex": 5}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum SyncMessage {
    /// Deck window → presenter window.
    DeckAdvanced {
        #[serde(rename = "slideIndex")]
        slide_index: usize,
    },
    /// Presenter window → deck window.
    PresenterAdvanced {
        #[serde(rename = "slideIndex")]
        slide_index: usize,
    },
}

impl SyncMessage {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::DeckAdvanced { .. } => "deck-advanced",
            Self::PresenterAdvanced { .. } => "presenter-advanced",
        }
    }

    pub fn slide_index(&self) -> usize {
        match *self {
            Self::DeckAdvanced { slide_index } | Self::PresenterAdvanced { slide_index } => {
                slide_index
            }
        }
    }

    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or_default()
    }

    /// Decode a value seen on the channel. Anything that is not one of our
    /// two message kinds decodes to `None`.
    pub fn from_value(value: &Value) -> Option<Self> {
        Self::deserialize(value).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_wire_shape() {
        let msg = SyncMessage::DeckAdvanced { slide_index: 5 };
        assert_eq!(msg.to_value(), json!({"kind": "deck-advanced", "slideIndex": 5}));

        let msg = SyncMessage::PresenterAdvanced { slide_index: 2 };
        assert_eq!(
            serde_json::to_value(msg).unwrap(),
            json!({"kind": "presenter-advanced", "slideIndex": 2})
        );
    }

    #[test]
    fn test_kind_matches_wire_tag() {
        for msg in [
            SyncMessage::DeckAdvanced { slide_index: 4 },
            SyncMessage::PresenterAdvanced { slide_index: 11 },
        ] {
            let value = msg.to_value();
            assert_eq!(value["kind"], msg.kind());
            assert_eq!(SyncMessage::from_value(&value), Some(msg));
        }
    }

    #[test]
    fn test_decodes_known_kinds() {
        let msg = SyncMessage::from_value(&json!({"kind": "presenter-advanced", "slideIndex": 9}));
        assert_eq!(msg, Some(SyncMessage::PresenterAdvanced { slide_index: 9 }));
    }

    #[test]
    fn test_ignores_foreign_traffic() {
        let foreign = [
            json!({"type": "slideChange", "slideNum": "3"}),
            json!({"kind": "reload"}),
            json!({"kind": "deck-advanced"}),
            json!({"kind": "deck-advanced", "slideIndex": -1}),
            json!({"kind": "deck-advanced", "slideIndex": "4"}),
            json!("deck-advanced"),
            Value::Null,
        ];
        for value in &foreign {
            assert_eq!(SyncMessage::from_value(value), None, "accepted {value}");
        }
    }

    #[test]
    fn test_extra_fields_are_tolerated() {
        let msg = SyncMessage::from_value(
            &json!({"kind": "deck-advanced", "slideIndex": 3, "source": "remote"}),
        );
        assert_eq!(msg, Some(SyncMessage::DeckAdvanced { slide_index: 3 }));
    }
}
