//! Integration tests for the order status machine.
//!
//! These verify the transition table and label localization without
//! requiring a database — the machine itself is pure.

use bazaar_core::{Locale, OrderStatus};
use bazaar_server::models::order::status_directory;

// =============================================================================
// Transition Table
// =============================================================================

/// Valid transitions:
/// new -> confirmed -> shipped -> delivered
/// {new, confirmed, shipped} -> cancelled
#[test]
fn test_forward_chain_is_accepted() {
    let forward = [
        (OrderStatus::New, OrderStatus::Confirmed),
        (OrderStatus::Confirmed, OrderStatus::Shipped),
        (OrderStatus::Shipped, OrderStatus::Delivered),
    ];

    for (from, to) in forward {
        assert!(from.can_transition_to(to), "{from} -> {to} should be valid");
    }
}

#[test]
fn test_cancellation_from_non_terminal_states() {
    for from in [
        OrderStatus::New,
        OrderStatus::Confirmed,
        OrderStatus::Shipped,
    ] {
        assert!(from.can_transition_to(OrderStatus::Cancelled));
    }
}

#[test]
fn test_terminal_states_reject_everything_else() {
    for terminal in [OrderStatus::Delivered, OrderStatus::Cancelled] {
        assert!(terminal.is_terminal());
        for to in OrderStatus::ALL {
            if to == terminal {
                // Re-asserting the current status stays allowed (no-op).
                assert!(terminal.can_transition_to(to));
            } else {
                assert!(
                    !terminal.can_transition_to(to),
                    "{terminal} -> {to} should be rejected"
                );
            }
        }
    }
}

#[test]
fn test_backwards_and_skipping_moves_are_rejected() {
    let invalid = [
        (OrderStatus::Delivered, OrderStatus::New),
        (OrderStatus::Shipped, OrderStatus::Confirmed),
        (OrderStatus::New, OrderStatus::Shipped),
        (OrderStatus::New, OrderStatus::Delivered),
        (OrderStatus::Cancelled, OrderStatus::Confirmed),
    ];

    for (from, to) in invalid {
        assert!(!from.can_transition_to(to), "{from} -> {to} should be invalid");
    }
}

// =============================================================================
// Parsing and Labels
// =============================================================================

#[test]
fn test_every_status_roundtrips_through_its_wire_name() {
    for status in OrderStatus::ALL {
        let parsed: OrderStatus = status.to_string().parse().expect("roundtrip");
        assert_eq!(parsed, status);
    }
}

#[test]
fn test_unrecognized_status_values_fail_to_parse() {
    for raw in ["not_a_status", "Delivered", "done", ""] {
        assert!(raw.parse::<OrderStatus>().is_err(), "{raw:?} should fail");
    }
}

#[test]
fn test_status_directory_is_complete_and_localized() {
    let directory = status_directory();
    assert_eq!(directory.len(), OrderStatus::ALL.len());

    for status in OrderStatus::ALL {
        let entry = directory
            .iter()
            .find(|e| e.key == status.to_string())
            .expect("entry for every status");
        assert_eq!(entry.uz, status.label(Locale::Uz));
        assert_eq!(entry.ru, status.label(Locale::Ru));
    }
}
