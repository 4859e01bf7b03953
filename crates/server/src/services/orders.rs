//! Order assembly and the status lifecycle.
//!
//! Assembly converts basket lines (or explicit pairs) into a frozen Order +
//! OrderItem snapshot inside one transaction: a failure on any line aborts
//! the whole order and leaves the basket untouched. Status updates run the
//! transition table and report whether anything actually changed.
//!
//! Neither path sends anything itself: notification payloads are returned
//! to the caller for dispatch after commit.

use chrono::Utc;
use rust_decimal::Decimal;
use sqlx::PgPool;
use tracing::instrument;

use bazaar_core::{OrderId, OrderStatus, TelegramId};

use crate::db;
use crate::db::catalog::variant_with_shop;
use crate::db::orders::OrderRepository;
use crate::db::shops::ShopRepository;
use crate::db::users::UserRepository;
use crate::db::RepositoryError;
use crate::error::{AppError, Result};
use crate::models::notification::{
    NotificationItem, NotificationPayload, OrderNotification, StatusNotification,
};
use crate::models::order::{
    CreateOrderInput, CreateOrderResponse, LineSelector, Order, OrderView,
};
use crate::models::user::BotUser;

/// Service for order assembly, status transitions, and order reads.
pub struct OrderService<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderService<'a> {
    /// Create a new order service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Assemble an order from the given line selectors.
    ///
    /// Runs as one transaction: the order row, every item snapshot, and the
    /// consumption of referenced basket lines commit together or not at
    /// all. The persisted total is always the server-computed sum of
    /// effective unit price × quantity; a client-supplied total is only a
    /// display hint.
    ///
    /// Returns the creation response plus the notification payloads (shop
    /// group and customer chat) for the caller to dispatch after commit.
    ///
    /// # Errors
    ///
    /// Returns `AppError::EmptyOrder` for an empty selector list,
    /// `AppError::UserNotFound` / `AppError::AddressNotFound` /
    /// `AppError::LineNotFound` / `AppError::VariantNotFound` for broken
    /// references, and `AppError::VariantInactive` when a resolved variant
    /// or its shop no longer accepts orders.
    #[instrument(skip(self, input), fields(telegram_id = %input.telegram_id, lines = input.items.len()))]
    pub async fn create_order(
        &self,
        input: &CreateOrderInput,
    ) -> Result<(CreateOrderResponse, Vec<NotificationPayload>)> {
        let user = self.resolve_user(&input.telegram_id).await?;
        let address = self.resolve_address(&user, input).await?;

        if input.items.is_empty() {
            return Err(AppError::EmptyOrder);
        }

        // Everything below runs in one transaction; any error path drops
        // `tx` and rolls the whole order back.
        let mut tx = self.pool.begin().await?;

        let order =
            db::orders::insert_order(&mut *tx, user.id, &address, input.comment.as_deref()).await?;

        let now = Utc::now();
        let mut resolved_lines: Vec<(Decimal, i32)> = Vec::with_capacity(input.items.len());
        let mut notification_items = Vec::with_capacity(input.items.len());
        let mut shop_group: Option<String> = None;

        for selector in &input.items {
            let (resolved, quantity) = match selector {
                LineSelector::Basket { basket_id } => {
                    let line = db::basket::fetch_line(&mut *tx, *basket_id)
                        .await?
                        .ok_or(AppError::LineNotFound)?;
                    let resolved = variant_with_shop(&mut *tx, line.product_variant_id)
                        .await?
                        .ok_or(AppError::VariantNotFound)?;
                    db::basket::delete_line(&mut *tx, *basket_id).await?;
                    (resolved, line.quantity)
                }
                LineSelector::Explicit {
                    product_variant_id,
                    quantity,
                } => {
                    if *quantity <= 0 {
                        return Err(AppError::InvalidQuantity);
                    }
                    let resolved = variant_with_shop(&mut *tx, *product_variant_id)
                        .await?
                        .ok_or(AppError::VariantNotFound)?;
                    (resolved, *quantity)
                }
            };

            if !resolved.variant.is_active || !resolved.is_shop_open(now) {
                return Err(AppError::VariantInactive);
            }

            db::orders::insert_item(&mut *tx, order.id, resolved.variant.id, quantity).await?;

            let unit_price = resolved.variant.effective_price();
            resolved_lines.push((unit_price, quantity));
            notification_items.push(NotificationItem {
                product_name: resolved.product_name,
                quantity,
                line_total: unit_price * Decimal::from(quantity),
                color: resolved.variant.color,
                size: resolved.variant.size,
            });

            if shop_group.is_none() {
                shop_group = resolved.telegram_group;
            }
        }

        let total = order_total(&resolved_lines);
        db::orders::set_total_price(&mut *tx, order.id, total).await?;

        tx.commit().await?;

        if let Some(hint) = input.total_price
            && hint != total
        {
            tracing::debug!(
                order_id = %order.id,
                client_total = %hint,
                server_total = %total,
                "Ignoring client-supplied total that differs from server computation"
            );
        }

        let mut payloads = Vec::with_capacity(2);
        if let Some(group) = shop_group {
            payloads.push(NotificationPayload::NewOrder(OrderNotification {
                chat_id: group,
                locale: user.language,
                order_id: order.id,
                customer_name: user.full_name(),
                customer_username: user.telegram_username.clone(),
                address: address.clone(),
                comment: input.comment.clone(),
                total_price: total,
                created_at: order.created_at,
                items: notification_items.clone(),
            }));
        } else {
            tracing::debug!(order_id = %order.id, "Shop has no notification group configured");
        }
        payloads.push(NotificationPayload::OrderConfirmed(OrderNotification {
            chat_id: user.telegram_id.to_string(),
            locale: user.language,
            order_id: order.id,
            customer_name: user.full_name(),
            customer_username: user.telegram_username.clone(),
            address,
            comment: input.comment.clone(),
            total_price: total,
            created_at: order.created_at,
            items: notification_items,
        }));

        Ok((
            CreateOrderResponse {
                order_id: order.id,
                total_price: total,
            },
            payloads,
        ))
    }

    /// Move an order to a new status.
    ///
    /// Re-asserting the current status succeeds without persisting or
    /// notifying; an actual change persists and returns a status-changed
    /// payload for best-effort dispatch.
    ///
    /// # Errors
    ///
    /// Returns `AppError::InvalidStatus` for an unknown value,
    /// `AppError::InvalidTransition` for a move outside the table, and
    /// `AppError::OrderNotFound` for an unknown order.
    #[instrument(skip(self), fields(order_id = %order_id, status = raw_status))]
    pub async fn update_status(
        &self,
        order_id: OrderId,
        raw_status: &str,
    ) -> Result<(Order, Option<NotificationPayload>)> {
        let new_status: OrderStatus = raw_status
            .parse()
            .map_err(|_| AppError::InvalidStatus(raw_status.to_owned()))?;

        let orders = OrderRepository::new(self.pool);
        let order = orders.get(order_id).await?.ok_or(AppError::OrderNotFound)?;

        // Change detection is by value equality; a same-status update is a
        // successful no-op and must not re-trigger the notification.
        if order.status == new_status {
            return Ok((order, None));
        }

        if !order.status.can_transition_to(new_status) {
            return Err(AppError::InvalidTransition {
                from: order.status.to_string(),
                to: new_status.to_string(),
            });
        }

        let updated = match orders.update_status(order_id, new_status).await {
            Ok(order) => order,
            Err(RepositoryError::NotFound) => return Err(AppError::OrderNotFound),
            Err(e) => return Err(e.into()),
        };

        let user = UserRepository::new(self.pool)
            .find_by_id(updated.user_id)
            .await?
            .ok_or(AppError::UserNotFound)?;

        let payload = NotificationPayload::StatusChanged(StatusNotification {
            chat_id: user.telegram_id.to_string(),
            locale: user.language,
            order_id: updated.id,
            status: updated.status,
            address: updated.address.clone(),
        });

        Ok((updated, Some(payload)))
    }

    /// A user's orders within their active shop, newest first.
    ///
    /// A user with no active shop selection has no orders to show.
    ///
    /// # Errors
    ///
    /// Returns `AppError::UserNotFound` for an unknown handle.
    pub async fn list_for_user(&self, telegram_id: &TelegramId) -> Result<Vec<OrderView>> {
        let user = self.resolve_user(telegram_id).await?;
        let Some(shop_id) = user.active_shop_id else {
            return Ok(Vec::new());
        };

        let orders = OrderRepository::new(self.pool);
        let mut views = Vec::new();
        for order in orders.list_for_user(user.id, shop_id).await? {
            let items = orders.items_for_order(order.id).await?;
            views.push(order_view(order, items));
        }
        Ok(views)
    }

    /// One order, visible only to its owner.
    ///
    /// # Errors
    ///
    /// Returns `AppError::OrderNotFound` when missing or owned by someone
    /// else.
    pub async fn get_for_user(
        &self,
        order_id: OrderId,
        telegram_id: &TelegramId,
    ) -> Result<OrderView> {
        let user = self.resolve_user(telegram_id).await?;
        let orders = OrderRepository::new(self.pool);
        let order = orders.get(order_id).await?.ok_or(AppError::OrderNotFound)?;

        if order.user_id != user.id {
            return Err(AppError::OrderNotFound);
        }

        let items = orders.items_for_order(order.id).await?;
        Ok(order_view(order, items))
    }

    /// All orders placed against a shop, newest first.
    ///
    /// # Errors
    ///
    /// Returns `AppError::ShopNotFound` for an unknown code.
    pub async fn list_for_shop(&self, shop_code: &str) -> Result<Vec<OrderView>> {
        let shop = ShopRepository::new(self.pool)
            .find_by_code(shop_code)
            .await?
            .ok_or(AppError::ShopNotFound)?;

        let orders = OrderRepository::new(self.pool);
        let mut views = Vec::new();
        for order in orders.list_for_shop(shop.id).await? {
            let items = orders.items_for_order(order.id).await?;
            views.push(order_view(order, items));
        }
        Ok(views)
    }

    async fn resolve_user(&self, telegram_id: &TelegramId) -> Result<BotUser> {
        UserRepository::new(self.pool)
            .find_by_telegram_id(telegram_id)
            .await?
            .ok_or(AppError::UserNotFound)
    }

    /// Resolve the delivery address: a referenced address must belong to the
    /// caller; otherwise the free-text address is taken verbatim.
    async fn resolve_address(&self, user: &BotUser, input: &CreateOrderInput) -> Result<String> {
        if let Some(address_id) = input.address_id {
            let address = UserRepository::new(self.pool)
                .find_address(address_id, user.id)
                .await?
                .ok_or(AppError::AddressNotFound)?;
            return Ok(address.full_address);
        }

        match input.address.as_deref().map(str::trim) {
            Some(text) if !text.is_empty() => Ok(text.to_owned()),
            _ => Err(AppError::BadRequest(
                "address_id or address is required".to_owned(),
            )),
        }
    }
}

/// Sum of unit price × quantity across resolved lines.
fn order_total(lines: &[(Decimal, i32)]) -> Decimal {
    lines
        .iter()
        .fold(Decimal::ZERO, |acc, (unit, quantity)| {
            acc + *unit * Decimal::from(*quantity)
        })
}

fn order_view(order: Order, items: Vec<crate::models::order::OrderItemView>) -> OrderView {
    OrderView {
        id: order.id,
        status: order.status,
        address: order.address,
        total_price: order.total_price,
        comment: order.comment,
        created_at: order.created_at,
        items,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_order_total_sums_unit_price_times_quantity() {
        let lines = [(dec!(1000), 2), (dec!(500), 1)];
        assert_eq!(order_total(&lines), dec!(2500));
    }

    #[test]
    fn test_order_total_of_no_lines_is_zero() {
        assert_eq!(order_total(&[]), Decimal::ZERO);
    }

    #[test]
    fn test_order_total_keeps_decimal_places() {
        let lines = [(dec!(19.99), 3)];
        assert_eq!(order_total(&lines), dec!(59.97));
    }
}
