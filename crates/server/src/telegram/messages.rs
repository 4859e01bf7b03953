//! Message builders rendering notification payloads into HTML.
//!
//! Templates exist in Uzbek and Russian; the payload's locale picks one.
//! Shop-facing and user-facing order messages share the item list format.

use crate::models::notification::{
    NotificationItem, NotificationPayload, OrderNotification, StatusNotification,
};

use bazaar_core::Locale;

use super::types::SendMessageRequest;

const DIVIDER: &str = "━━━━━━━━━━━━━━━";

/// Render a payload into a ready-to-send request.
#[must_use]
pub fn render(payload: &NotificationPayload) -> SendMessageRequest {
    match payload {
        NotificationPayload::NewOrder(n) => {
            SendMessageRequest::html(n.chat_id.clone(), build_new_order(n))
        }
        NotificationPayload::OrderConfirmed(n) => {
            SendMessageRequest::html(n.chat_id.clone(), build_order_confirmed(n))
        }
        NotificationPayload::StatusChanged(n) => {
            SendMessageRequest::html(n.chat_id.clone(), build_status_changed(n))
        }
    }
}

/// Shop-facing "new order" message for the shop's order group.
#[must_use]
pub fn build_new_order(n: &OrderNotification) -> String {
    let maps_link = format!(
        "https://yandex.com/maps/?text={}",
        urlencoding::encode(&n.address)
    );
    let created = n.created_at.format("%Y-%m-%d %H:%M");
    let username = n.customer_username.as_deref().unwrap_or("-");
    let comment = n.comment.as_deref().unwrap_or("-");

    let (header, text) = match n.locale {
        Locale::Ru => (
            "🛒 <b>НОВЫЙ ЗАКАЗ!</b>",
            format!(
                "\n{DIVIDER}\n\n\
                 👤 <b>Покупатель:</b> {name}\n\
                 🆔 <b>Юзернейм:</b> {username}\n\
                 📍 <b>Адрес:</b> {address}\n\
                 🔗 <a href='{maps_link}'>Посмотреть адрес на карте</a>\n\
                 🧾 <b>Номер заказа:</b> <code>#{id}</code>\n\
                 🕒 <b>Дата заказа:</b> {created}\n\
                 💬 <b>Комментарий:</b> {comment}\n\n\
                 {DIVIDER}\n\
                 🛍️ <b>ТОВАРЫ В ЗАКАЗЕ:</b>\n",
                name = n.customer_name,
                address = n.address,
                id = n.order_id,
            ),
        ),
        Locale::Uz => (
            "🛒 <b>YANGI BUYURTMA!</b>",
            format!(
                "\n{DIVIDER}\n\n\
                 👤 <b>Buyurtmachi:</b> {name}\n\
                 🆔 <b>Username:</b> {username}\n\
                 📍 <b>Manzil:</b> {address}\n\
                 🔗 <a href='{maps_link}'>Manzilni xaritada ko'rish</a>\n\
                 🧾 <b>Buyurtma raqami:</b> <code>#{id}</code>\n\
                 🕒 <b>Buyurtma vaqti:</b> {created}\n\
                 💬 <b>Izoh:</b> {comment}\n\n\
                 {DIVIDER}\n\
                 🛍️ <b>BUYURTMADAGI MAHSULOTLAR:</b>\n",
                name = n.customer_name,
                address = n.address,
                id = n.order_id,
            ),
        ),
    };

    let total_line = match n.locale {
        Locale::Ru => format!("💵 <b>ИТОГО: {} сум</b>", n.total_price),
        Locale::Uz => format!("💵 <b>JAMI: {} so'm</b>", n.total_price),
    };

    format!(
        "{header}{text}{items}\n{DIVIDER}\n{total_line}\n{DIVIDER}",
        items = item_lines(&n.items, n.locale),
    )
}

/// User-facing "order confirmed" message.
#[must_use]
pub fn build_order_confirmed(n: &OrderNotification) -> String {
    let created = n.created_at.format("%Y-%m-%d %H:%M");
    let comment = n.comment.as_deref().unwrap_or("-");

    let (body, footer) = match n.locale {
        Locale::Ru => (
            format!(
                "🎉 <b>ЗАКАЗ УСПЕШНО ОФОРМЛЕН!</b>\n{DIVIDER}\n\n\
                 🧾 <b>Номер заказа:</b> <code>#{id}</code>\n\
                 👤 <b>Ф.И.О:</b> {name}\n\
                 📍 <b>Адрес:</b> {address}\n\
                 💵 <b>Общая сумма:</b> <b>{total} сум</b>\n\
                 🕒 <b>Дата заказа:</b> {created}\n\
                 💬 <b>Комментарий:</b> {comment}\n\n\
                 {DIVIDER}\n\
                 🛍️ <b>ТОВАРЫ В ЗАКАЗЕ:</b>\n",
                id = n.order_id,
                name = n.customer_name,
                address = n.address,
                total = n.total_price,
            ),
            "\n📬 <b>Ваш заказ был отправлен в магазин!</b>\n\
             💬 В ближайшее время мы сообщим, когда заказ будет принят.\n\
             🤝 Спасибо, что вы с нами! 😊",
        ),
        Locale::Uz => (
            format!(
                "🎉 <b>BUYURTMA MUVAFFAQIYATLI RASMIYLASHTIRILDI!</b>\n{DIVIDER}\n\n\
                 🧾 <b>Buyurtma raqami:</b> <code>#{id}</code>\n\
                 👤 <b>F.I.O:</b> {name}\n\
                 📍 <b>Manzil:</b> {address}\n\
                 💵 <b>Umumiy narx:</b> <b>{total} so'm</b>\n\
                 🕒 <b>Buyurtma vaqti:</b> {created}\n\
                 💬 <b>Izoh:</b> {comment}\n\n\
                 {DIVIDER}\n\
                 🛍️ <b>BUYURTMADAGI MAHSULOTLAR:</b>\n",
                id = n.order_id,
                name = n.customer_name,
                address = n.address,
                total = n.total_price,
            ),
            "\n📬 <b>Buyurtmangiz do'konga yuborildi!</b>\n\
             💬 Tez orada buyurtmangiz qabul qilinganligi haqida sizga xabar beramiz.\n\
             🤝 Biz bilan bo'lganingiz uchun tashakkur! 😊",
        ),
    };

    format!("{body}{items}{footer}", items = item_lines(&n.items, n.locale))
}

/// User-facing "status changed" message.
#[must_use]
pub fn build_status_changed(n: &StatusNotification) -> String {
    let status_label = n.status.label(n.locale);

    match n.locale {
        Locale::Ru => format!(
            "📦 <b>Ваш заказ обновлён!</b>\n\n\
             🧾 <b>Номер заказа:</b> #{id}\n\
             📍 <b>Адрес:</b> {address}\n\
             🆕 <b>Новый статус:</b> {status_label}",
            id = n.order_id,
            address = n.address,
        ),
        Locale::Uz => format!(
            "📦 <b>Sizning buyurtmangiz yangilandi!</b>\n\n\
             🧾 <b>Buyurtma raqami:</b> #{id}\n\
             📍 <b>Manzil:</b> {address}\n\
             🆕 <b>Yangi holat:</b> {status_label}",
            id = n.order_id,
            address = n.address,
        ),
    }
}

/// One numbered line per item, localized field labels.
fn item_lines(items: &[NotificationItem], locale: Locale) -> String {
    let mut text = String::new();
    for (i, item) in items.iter().enumerate() {
        let color = item.color.as_deref().unwrap_or("-");
        let size = item.size.as_deref().unwrap_or("-");
        let line = match locale {
            Locale::Ru => format!(
                "<code>#{n}</code> <b>{name}</b> x <b>{qty}</b>\n\
                 <b>Цена:</b> {total}\n\
                 <b>Цвет:</b> {color}, <b>Размер:</b> {size}\n",
                n = i + 1,
                name = item.product_name,
                qty = item.quantity,
                total = item.line_total,
            ),
            Locale::Uz => format!(
                "<code>#{n}</code> <b>{name}</b> x <b>{qty}</b>\n\
                 <b>Narxi:</b> {total}\n\
                 <b>Rangi:</b> {color}, <b>Razmeri:</b> {size}\n",
                n = i + 1,
                name = item.product_name,
                qty = item.quantity,
                total = item.line_total,
            ),
        };
        text.push_str(&line);
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use bazaar_core::{OrderId, OrderStatus};
    use chrono::Utc;
    use rust_decimal_macros::dec;

    fn notification(locale: Locale) -> OrderNotification {
        OrderNotification {
            chat_id: "-100123".to_owned(),
            locale,
            order_id: OrderId::new(17),
            customer_name: "Ali Valiyev".to_owned(),
            customer_username: Some("alivaliyev".to_owned()),
            address: "Tashkent, Chilonzor 5".to_owned(),
            comment: None,
            total_price: dec!(2500.00),
            created_at: Utc::now(),
            items: vec![NotificationItem {
                product_name: "Futbolka".to_owned(),
                quantity: 2,
                line_total: dec!(2000.00),
                color: Some("qora".to_owned()),
                size: Some("L".to_owned()),
            }],
        }
    }

    #[test]
    fn test_new_order_mentions_order_number_and_items() {
        let text = build_new_order(&notification(Locale::Uz));
        assert!(text.contains("#17"));
        assert!(text.contains("Futbolka"));
        assert!(text.contains("YANGI BUYURTMA"));
        assert!(text.contains("2500.00"));
    }

    #[test]
    fn test_new_order_russian_template() {
        let text = build_new_order(&notification(Locale::Ru));
        assert!(text.contains("НОВЫЙ ЗАКАЗ"));
        assert!(text.contains("Покупатель"));
    }

    #[test]
    fn test_maps_link_is_url_encoded() {
        let text = build_new_order(&notification(Locale::Uz));
        assert!(text.contains("https://yandex.com/maps/?text=Tashkent%2C%20Chilonzor%205"));
    }

    #[test]
    fn test_confirmed_message_addresses_the_customer() {
        let text = build_order_confirmed(&notification(Locale::Uz));
        assert!(text.contains("RASMIYLASHTIRILDI"));
        assert!(text.contains("Ali Valiyev"));
    }

    #[test]
    fn test_status_changed_uses_localized_label() {
        let n = StatusNotification {
            chat_id: "42".to_owned(),
            locale: Locale::Ru,
            order_id: OrderId::new(5),
            status: OrderStatus::Shipped,
            address: "somewhere".to_owned(),
        };
        let text = build_status_changed(&n);
        assert!(text.contains("Отправлен"));
        assert!(text.contains("#5"));
    }

    #[test]
    fn test_render_routes_to_the_payload_chat() {
        let payload = NotificationPayload::NewOrder(notification(Locale::Uz));
        let request = render(&payload);
        assert_eq!(request.chat_id, "-100123");
        assert_eq!(request.parse_mode, "HTML");
    }
}
