//! Contract with the external free-text parser.

use serde::{Deserialize, Serialize};

/// Structured order data extracted from a customer message.
///
/// Produced by the external AI parser; the parser contract guarantees
/// positive quantities, so they are not re-validated here.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParsedOrder {
    /// Requested products.
    #[serde(default)]
    pub items: Vec<ParsedItem>,

    /// Delivery address, if the message mentioned one.
    #[serde(default)]
    pub delivery_address: Option<String>,

    /// Contact email, if the message mentioned one.
    #[serde(default)]
    pub contact_email: Option<String>,

    /// Contact phone, if the message mentioned one.
    #[serde(default)]
    pub contact_phone: Option<String>,
}

/// One requested product with its quantity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParsedItem {
    pub name: String,
    pub quantity: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_full_payload() {
        let json = r#"{
            "items": [{"name": "iPhone 15", "quantity": 2}],
            "delivery_address": "Lenina 15, kv 44",
            "contact_email": "ivanov@mail.ru",
            "contact_phone": "+79161234567"
        }"#;

        let parsed: ParsedOrder = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.items.len(), 1);
        assert_eq!(parsed.items[0].quantity, 2);
        assert_eq!(parsed.contact_phone.as_deref(), Some("+79161234567"));
    }

    #[test]
    fn test_missing_fields_default_to_none() {
        let parsed: ParsedOrder =
            serde_json::from_str(r#"{"items": [{"name": "AirPods", "quantity": 1}]}"#).unwrap();
        assert!(parsed.delivery_address.is_none());
        assert!(parsed.contact_email.is_none());
        assert!(parsed.contact_phone.is_none());
    }
}
