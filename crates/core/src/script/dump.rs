use crate::model::TicketElement;

/// Serialize an element sequence to a pretty-printed JSON string.
pub fn to_pretty_json(elements: &[TicketElement]) -> String {
    serde_json::to_string_pretty(elements).expect("element serialization cannot fail")
}
