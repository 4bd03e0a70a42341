//! Status and role enums shared across the service.

use serde::{Deserialize, Serialize};

/// Lifecycle status of an order.
///
/// Orders move forward one step at a time:
/// `Received → Preparing → Ready → OutForDelivery → Delivered`.
/// `Cancelled` is reachable from every non-terminal state. `Delivered` and
/// `Cancelled` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    #[default]
    Received,
    Preparing,
    Ready,
    OutForDelivery,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    /// Whether this status admits no further transitions.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Delivered | Self::Cancelled)
    }

    /// The next state in the forward progression, if any.
    #[must_use]
    pub const fn next(self) -> Option<Self> {
        match self {
            Self::Received => Some(Self::Preparing),
            Self::Preparing => Some(Self::Ready),
            Self::Ready => Some(Self::OutForDelivery),
            Self::OutForDelivery => Some(Self::Delivered),
            Self::Delivered | Self::Cancelled => None,
        }
    }

    /// Whether a transition from `self` to `to` is allowed.
    ///
    /// Allowed transitions are the single forward step and cancellation from
    /// any non-terminal state. Terminal states accept nothing.
    #[must_use]
    pub fn can_transition_to(self, to: Self) -> bool {
        if self.is_terminal() {
            return false;
        }
        if to == Self::Cancelled {
            return true;
        }
        self.next() == Some(to)
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Received => "RECEIVED",
            Self::Preparing => "PREPARING",
            Self::Ready => "READY",
            Self::OutForDelivery => "OUT_FOR_DELIVERY",
            Self::Delivered => "DELIVERED",
            Self::Cancelled => "CANCELLED",
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "RECEIVED" => Ok(Self::Received),
            "PREPARING" => Ok(Self::Preparing),
            "READY" => Ok(Self::Ready),
            "OUT_FOR_DELIVERY" => Ok(Self::OutForDelivery),
            "DELIVERED" => Ok(Self::Delivered),
            "CANCELLED" => Ok(Self::Cancelled),
            _ => Err(format!("invalid order status: {s}")),
        }
    }
}

/// How the customer chose to pay.
///
/// Payment capture happens upstream; the order only records the choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    CreditCard,
    Paypal,
    Cash,
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::CreditCard => "CREDIT_CARD",
            Self::Paypal => "PAYPAL",
            Self::Cash => "CASH",
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for PaymentMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "CREDIT_CARD" => Ok(Self::CreditCard),
            "PAYPAL" => Ok(Self::Paypal),
            "CASH" => Ok(Self::Cash),
            _ => Err(format!("invalid payment method: {s}")),
        }
    }
}

/// Actor roles recognized at the HTTP boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    /// An ordering customer.
    User,
    /// A restaurant operator managing menus and fulfilling orders.
    Restaurant,
    /// Platform administrator.
    Admin,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::User => "USER",
            Self::Restaurant => "RESTAURANT",
            Self::Admin => "ADMIN",
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "USER" => Ok(Self::User),
            "RESTAURANT" => Ok(Self::Restaurant),
            "ADMIN" => Ok(Self::Admin),
            _ => Err(format!("invalid role: {s}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forward_progression() {
        assert!(OrderStatus::Received.can_transition_to(OrderStatus::Preparing));
        assert!(OrderStatus::Preparing.can_transition_to(OrderStatus::Ready));
        assert!(OrderStatus::Ready.can_transition_to(OrderStatus::OutForDelivery));
        assert!(OrderStatus::OutForDelivery.can_transition_to(OrderStatus::Delivered));
    }

    #[test]
    fn test_no_skipping_states() {
        assert!(!OrderStatus::Received.can_transition_to(OrderStatus::Delivered));
        assert!(!OrderStatus::Received.can_transition_to(OrderStatus::Ready));
        assert!(!OrderStatus::Preparing.can_transition_to(OrderStatus::OutForDelivery));
    }

    #[test]
    fn test_no_moving_backwards() {
        assert!(!OrderStatus::Ready.can_transition_to(OrderStatus::Preparing));
        assert!(!OrderStatus::OutForDelivery.can_transition_to(OrderStatus::Received));
    }

    #[test]
    fn test_cancel_from_any_non_terminal() {
        for status in [
            OrderStatus::Received,
            OrderStatus::Preparing,
            OrderStatus::Ready,
            OrderStatus::OutForDelivery,
        ] {
            assert!(status.can_transition_to(OrderStatus::Cancelled));
        }
    }

    #[test]
    fn test_terminal_states_reject_everything() {
        for terminal in [OrderStatus::Delivered, OrderStatus::Cancelled] {
            assert!(terminal.is_terminal());
            for next in [
                OrderStatus::Received,
                OrderStatus::Preparing,
                OrderStatus::Ready,
                OrderStatus::OutForDelivery,
                OrderStatus::Delivered,
                OrderStatus::Cancelled,
            ] {
                assert!(!terminal.can_transition_to(next));
            }
        }
    }

    #[test]
    fn test_status_wire_format() {
        let json = serde_json::to_string(&OrderStatus::OutForDelivery).expect("serialize");
        assert_eq!(json, "\"OUT_FOR_DELIVERY\"");
        let back: OrderStatus = serde_json::from_str("\"CANCELLED\"").expect("deserialize");
        assert_eq!(back, OrderStatus::Cancelled);
    }

    #[test]
    fn test_status_from_str_matches_display() {
        for status in [
            OrderStatus::Received,
            OrderStatus::Preparing,
            OrderStatus::Ready,
            OrderStatus::OutForDelivery,
            OrderStatus::Delivered,
            OrderStatus::Cancelled,
        ] {
            let parsed: OrderStatus = status.to_string().parse().expect("parse");
            assert_eq!(parsed, status);
        }
    }

    #[test]
    fn test_payment_method_wire_format() {
        let json = serde_json::to_string(&PaymentMethod::CreditCard).expect("serialize");
        assert_eq!(json, "\"CREDIT_CARD\"");
    }

    #[test]
    fn test_role_parse() {
        assert_eq!("ADMIN".parse::<Role>(), Ok(Role::Admin));
        assert!("SUPERUSER".parse::<Role>().is_err());
    }
}
