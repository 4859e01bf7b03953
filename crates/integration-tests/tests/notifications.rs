//! Integration tests for notification payload rendering.
//!
//! The core returns structured payloads; rendering into Bot API requests is
//! pure and tested here without any network.

use bazaar_core::{Locale, OrderId, OrderStatus};
use bazaar_server::models::notification::{
    NotificationItem, NotificationPayload, OrderNotification, StatusNotification,
};
use bazaar_server::telegram::render;
use chrono::Utc;
use rust_decimal_macros::dec;

fn order_notification(chat_id: &str, locale: Locale) -> OrderNotification {
    OrderNotification {
        chat_id: chat_id.to_owned(),
        locale,
        order_id: OrderId::new(91),
        customer_name: "Gulnora Karimova".to_owned(),
        customer_username: None,
        address: "Samarqand, Registon 1".to_owned(),
        comment: Some("eshik oldiga".to_owned()),
        total_price: dec!(1750.50),
        created_at: Utc::now(),
        items: vec![
            NotificationItem {
                product_name: "Ko'ylak".to_owned(),
                quantity: 1,
                line_total: dec!(1250.50),
                color: Some("oq".to_owned()),
                size: Some("M".to_owned()),
            },
            NotificationItem {
                product_name: "Sharf".to_owned(),
                quantity: 2,
                line_total: dec!(500.00),
                color: None,
                size: None,
            },
        ],
    }
}

#[test]
fn test_new_order_goes_to_the_shop_group() {
    let payload = NotificationPayload::NewOrder(order_notification("-100777", Locale::Uz));
    let request = render(&payload);

    assert_eq!(request.chat_id, "-100777");
    assert_eq!(request.parse_mode, "HTML");
    assert!(request.text.contains("#91"));
    assert!(request.text.contains("Ko'ylak"));
    assert!(request.text.contains("Sharf"));
    assert!(request.text.contains("1750.50"));
}

#[test]
fn test_order_confirmed_goes_to_the_customer_chat() {
    let payload = NotificationPayload::OrderConfirmed(order_notification("555001", Locale::Ru));
    let request = render(&payload);

    assert_eq!(request.chat_id, "555001");
    assert!(request.text.contains("ЗАКАЗ УСПЕШНО ОФОРМЛЕН"));
    assert!(request.text.contains("Gulnora Karimova"));
}

#[test]
fn test_status_change_carries_the_localized_label() {
    let payload = NotificationPayload::StatusChanged(StatusNotification {
        chat_id: "555001".to_owned(),
        locale: Locale::Uz,
        order_id: OrderId::new(91),
        status: OrderStatus::Delivered,
        address: "Samarqand, Registon 1".to_owned(),
    });
    let request = render(&payload);

    assert!(request.text.contains("Yetkazildi"));
    assert!(request.text.contains("#91"));
    assert!(request.text.contains("Samarqand, Registon 1"));
}

#[test]
fn test_payload_accessors_route_by_kind() {
    let shop = NotificationPayload::NewOrder(order_notification("-1", Locale::Uz));
    let user = NotificationPayload::OrderConfirmed(order_notification("2", Locale::Uz));

    assert_eq!(shop.chat_id(), "-1");
    assert_eq!(user.chat_id(), "2");
    assert_eq!(shop.order_id(), OrderId::new(91));
}

#[test]
fn test_payload_serializes_with_a_kind_tag() {
    let payload = NotificationPayload::StatusChanged(StatusNotification {
        chat_id: "9".to_owned(),
        locale: Locale::Ru,
        order_id: OrderId::new(3),
        status: OrderStatus::Confirmed,
        address: "x".to_owned(),
    });

    let json = serde_json::to_value(&payload).expect("serialize");
    assert_eq!(json["kind"], "status_changed");
    assert_eq!(json["order_id"], 3);
    assert_eq!(json["status"], "confirmed");
}
