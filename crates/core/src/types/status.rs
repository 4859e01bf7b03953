//! The order status machine.
//!
//! An order moves along `new → confirmed → shipped → delivered`, and may be
//! cancelled from any non-terminal state. `delivered` and `cancelled` are
//! terminal. Setting the current status again is a valid no-op; everything
//! else is rejected.

use serde::{Deserialize, Serialize};

use super::locale::Locale;

/// Lifecycle status of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Just placed, awaiting the shop's confirmation.
    #[default]
    New,
    /// Accepted by the shop.
    Confirmed,
    /// Handed to delivery.
    Shipped,
    /// Received by the customer. Terminal.
    Delivered,
    /// Abandoned by either side. Terminal.
    Cancelled,
}

impl OrderStatus {
    /// All known statuses, in lifecycle order.
    pub const ALL: [Self; 5] = [
        Self::New,
        Self::Confirmed,
        Self::Shipped,
        Self::Delivered,
        Self::Cancelled,
    ];

    /// Whether no further transition out of this status is allowed.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Delivered | Self::Cancelled)
    }

    /// Whether moving from `self` to `next` is an allowed transition.
    ///
    /// Re-asserting the current status is always allowed (callers treat it
    /// as a no-op and suppress side effects).
    #[must_use]
    pub const fn can_transition_to(&self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::New, Self::New)
                | (Self::Confirmed, Self::Confirmed)
                | (Self::Shipped, Self::Shipped)
                | (Self::Delivered, Self::Delivered)
                | (Self::Cancelled, Self::Cancelled)
                | (Self::New, Self::Confirmed)
                | (Self::Confirmed, Self::Shipped)
                | (Self::Shipped, Self::Delivered)
                | (Self::New | Self::Confirmed | Self::Shipped, Self::Cancelled)
        )
    }

    /// Human-readable status label in the given locale.
    #[must_use]
    pub const fn label(&self, locale: Locale) -> &'static str {
        match locale {
            Locale::Uz => match self {
                Self::New => "Yangi",
                Self::Confirmed => "Tasdiqlandi",
                Self::Shipped => "Jo'natildi",
                Self::Delivered => "Yetkazildi",
                Self::Cancelled => "Bekor qilindi",
            },
            Locale::Ru => match self {
                Self::New => "Новый",
                Self::Confirmed => "Подтверждён",
                Self::Shipped => "Отправлен",
                Self::Delivered => "Доставлен",
                Self::Cancelled => "Отменён",
            },
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::New => write!(f, "new"),
            Self::Confirmed => write!(f, "confirmed"),
            Self::Shipped => write!(f, "shipped"),
            Self::Delivered => write!(f, "delivered"),
            Self::Cancelled => write!(f, "cancelled"),
        }
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "new" => Ok(Self::New),
            "confirmed" => Ok(Self::Confirmed),
            "shipped" => Ok(Self::Shipped),
            "delivered" => Ok(Self::Delivered),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(format!("invalid order status: {s}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_string_roundtrip() {
        for status in OrderStatus::ALL {
            let parsed: OrderStatus = status.to_string().parse().expect("roundtrip");
            assert_eq!(parsed, status);
        }
    }

    #[test]
    fn test_unknown_status_rejected() {
        assert!("not_a_status".parse::<OrderStatus>().is_err());
        assert!("NEW".parse::<OrderStatus>().is_err());
    }

    #[test]
    fn test_forward_chain_is_allowed() {
        assert!(OrderStatus::New.can_transition_to(OrderStatus::Confirmed));
        assert!(OrderStatus::Confirmed.can_transition_to(OrderStatus::Shipped));
        assert!(OrderStatus::Shipped.can_transition_to(OrderStatus::Delivered));
    }

    #[test]
    fn test_cancel_from_any_non_terminal() {
        assert!(OrderStatus::New.can_transition_to(OrderStatus::Cancelled));
        assert!(OrderStatus::Confirmed.can_transition_to(OrderStatus::Cancelled));
        assert!(OrderStatus::Shipped.can_transition_to(OrderStatus::Cancelled));
    }

    #[test]
    fn test_terminal_states_allow_no_new_transitions() {
        for next in OrderStatus::ALL {
            if next != OrderStatus::Delivered {
                assert!(!OrderStatus::Delivered.can_transition_to(next));
            }
            if next != OrderStatus::Cancelled {
                assert!(!OrderStatus::Cancelled.can_transition_to(next));
            }
        }
    }

    #[test]
    fn test_reassertion_is_allowed() {
        for status in OrderStatus::ALL {
            assert!(status.can_transition_to(status));
        }
    }

    #[test]
    fn test_no_backwards_or_skipping_transitions() {
        assert!(!OrderStatus::Delivered.can_transition_to(OrderStatus::New));
        assert!(!OrderStatus::New.can_transition_to(OrderStatus::Shipped));
        assert!(!OrderStatus::New.can_transition_to(OrderStatus::Delivered));
        assert!(!OrderStatus::Shipped.can_transition_to(OrderStatus::Confirmed));
        assert!(!OrderStatus::Cancelled.can_transition_to(OrderStatus::New));
    }

    #[test]
    fn test_labels_cover_both_locales() {
        assert_eq!(OrderStatus::New.label(Locale::Uz), "Yangi");
        assert_eq!(OrderStatus::New.label(Locale::Ru), "Новый");
        assert_eq!(OrderStatus::Delivered.label(Locale::Uz), "Yetkazildi");
        assert_eq!(OrderStatus::Cancelled.label(Locale::Ru), "Отменён");
    }

    #[test]
    fn test_serde_uses_snake_case() {
        assert_eq!(
            serde_json::to_string(&OrderStatus::Confirmed).expect("serialize"),
            "\"confirmed\""
        );
        let parsed: OrderStatus = serde_json::from_str("\"cancelled\"").expect("deserialize");
        assert_eq!(parsed, OrderStatus::Cancelled);
    }
}
