//! Order lifecycle statuses.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Lifecycle status of an order.
///
/// The set of known statuses is closed, but operators may supply labels
/// outside it; those are carried verbatim in [`OrderStatus::Custom`] instead
/// of being rejected, so a typo can never be mistaken for a known status
/// downstream (the delivered check matches the variant, not the string).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum OrderStatus {
    /// Order accepted and waiting for a manager.
    Pending,
    /// Contact email or phone failed validation at intake.
    InvalidContact,
    /// At least one requested item was unavailable at intake.
    OutOfStock,
    /// Confirmed by a manager.
    Confirmed,
    /// Handed to delivery.
    Shipped,
    /// Delivered to the customer.
    Delivered,
    /// Cancelled.
    Cancelled,
    /// Operator-supplied label outside the known set, stored verbatim.
    Custom(String),
}

impl OrderStatus {
    /// Labels of every known status, in lifecycle order.
    pub const KNOWN_LABELS: [&'static str; 7] = [
        "pending",
        "invalid_contact",
        "out_of_stock",
        "confirmed",
        "shipped",
        "delivered",
        "cancelled",
    ];

    /// Parses a label, falling back to [`OrderStatus::Custom`] for anything
    /// outside the known set.
    pub fn from_label(label: &str) -> Self {
        match label {
            "pending" => Self::Pending,
            "invalid_contact" => Self::InvalidContact,
            "out_of_stock" => Self::OutOfStock,
            "confirmed" => Self::Confirmed,
            "shipped" => Self::Shipped,
            "delivered" => Self::Delivered,
            "cancelled" => Self::Cancelled,
            other => Self::Custom(other.to_string()),
        }
    }

    /// The wire label for this status.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Pending => "pending",
            Self::InvalidContact => "invalid_contact",
            Self::OutOfStock => "out_of_stock",
            Self::Confirmed => "confirmed",
            Self::Shipped => "shipped",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
            Self::Custom(label) => label,
        }
    }

    /// True for the closed set, false for [`OrderStatus::Custom`].
    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Custom(_))
    }

    /// True only for the `Delivered` variant; a custom `"deliverd"` label
    /// does not count.
    pub fn is_delivered(&self) -> bool {
        matches!(self, Self::Delivered)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for OrderStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for OrderStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let label = String::deserialize(deserializer)?;
        Ok(Self::from_label(&label))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_labels_roundtrip() {
        for label in OrderStatus::KNOWN_LABELS {
            let status = OrderStatus::from_label(label);
            assert!(status.is_known());
            assert_eq!(status.as_str(), label);
        }
    }

    #[test]
    fn test_unknown_label_kept_verbatim() {
        let status = OrderStatus::from_label("deliverd");
        assert_eq!(status, OrderStatus::Custom("deliverd".to_string()));
        assert_eq!(status.as_str(), "deliverd");
        assert!(!status.is_known());
        assert!(!status.is_delivered());
    }

    #[test]
    fn test_delivered_check_matches_variant() {
        assert!(OrderStatus::Delivered.is_delivered());
        assert!(!OrderStatus::Shipped.is_delivered());
    }

    #[test]
    fn test_serde_as_plain_string() {
        let json = serde_json::to_string(&OrderStatus::OutOfStock).unwrap();
        assert_eq!(json, "\"out_of_stock\"");

        let status: OrderStatus = serde_json::from_str("\"weird\"").unwrap();
        assert_eq!(status, OrderStatus::Custom("weird".to_string()));
    }
}
