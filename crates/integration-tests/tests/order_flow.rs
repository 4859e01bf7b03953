//! Database-backed tests for the basket ledger and order assembly.
//!
//! These run against the `PostgreSQL` named by `DATABASE_URL` and skip
//! silently when it is unset.

use bazaar_core::{Locale, TelegramId, VariantId};
use bazaar_integration_tests::{try_pool, unique};
use bazaar_server::db::basket::BasketRepository;
use bazaar_server::db::shops::ShopRepository;
use bazaar_server::error::AppError;
use bazaar_server::models::basket::{BasketStep, StepBasketInput, UpsertBasketInput};
use bazaar_server::models::catalog::{
    CreateProductInput, CreateShopInput, CreateVariantInput, UpdateShopInput, UpdateVariantInput,
};
use bazaar_server::models::order::{CreateOrderInput, LineSelector};
use bazaar_server::models::user::RegisterUserInput;
use bazaar_server::services::{BasketService, CatalogService, OrderService, UserService};
use chrono::{Duration, Utc};
use rust_decimal_macros::dec;
use sqlx::PgPool;

struct Fixture {
    telegram_id: TelegramId,
    shop_code: String,
    shop_id: bazaar_core::ShopId,
    user_id: bazaar_core::UserId,
    /// Variant at price 1000.
    variant_a: VariantId,
    /// Variant at price 500.
    variant_b: VariantId,
}

async fn fixture(pool: &PgPool) -> Fixture {
    let users = UserService::new(pool);
    let telegram_id = TelegramId::new(unique("tg"));
    users
        .register(&RegisterUserInput {
            phone_number: unique("+99890"),
            telegram_id: telegram_id.clone(),
            telegram_username: Some("tester".to_owned()),
            first_name: Some("Test".to_owned()),
            last_name: Some("User".to_owned()),
            language: Locale::Uz,
        })
        .await
        .expect("register user");
    let user = users.resolve(&telegram_id).await.expect("resolve user");

    let shops = ShopRepository::new(pool);
    let shop_code = unique("shop");
    let shop = shops
        .create(
            user.id,
            &CreateShopInput {
                owner_telegram_id: telegram_id.clone(),
                shop_code: shop_code.clone(),
                shop_name: "Test Shop".to_owned(),
                phone_number: None,
                description: None,
                telegram_group: Some("-100424242".to_owned()),
                telegram_channel: None,
                instagram_url: None,
            },
        )
        .await
        .expect("create shop");
    shops
        .update(
            shop.id,
            &UpdateShopInput {
                is_active: Some(true),
                subscription_end: Some(Utc::now() + Duration::days(30)),
                ..Default::default()
            },
        )
        .await
        .expect("activate shop");

    let catalog = CatalogService::new(pool);
    let product = catalog
        .create_product(&CreateProductInput {
            shop_code: shop_code.clone(),
            category_id: None,
            name: "Futbolka".to_owned(),
            description: None,
            variants: vec![
                CreateVariantInput {
                    color: Some("qora".to_owned()),
                    size: Some("L".to_owned()),
                    volume: None,
                    taste: None,
                    price: dec!(1000),
                    discount_price: None,
                    discount_percent: None,
                    stock: 10,
                    is_active: true,
                },
                CreateVariantInput {
                    color: Some("oq".to_owned()),
                    size: Some("M".to_owned()),
                    volume: None,
                    taste: None,
                    price: dec!(500),
                    discount_price: None,
                    discount_percent: None,
                    stock: 10,
                    is_active: true,
                },
            ],
        })
        .await
        .expect("create product");

    Fixture {
        telegram_id,
        shop_code,
        shop_id: shop.id,
        user_id: user.id,
        variant_a: product.variants[0].id,
        variant_b: product.variants[1].id,
    }
}

// =============================================================================
// Basket Ledger
// =============================================================================

#[tokio::test]
async fn test_upsert_replaces_quantity_instead_of_adding() {
    let Some(pool) = try_pool().await else { return };
    let fx = fixture(&pool).await;
    let baskets = BasketService::new(&pool);

    for quantity in [3, 5] {
        let mutation = baskets
            .upsert_line(&UpsertBasketInput {
                telegram_id: fx.telegram_id.clone(),
                product_variant_id: fx.variant_a,
                quantity,
            })
            .await
            .expect("upsert");
        assert_eq!(mutation.quantity, quantity);
    }

    let lines = baskets
        .list_lines(&fx.shop_code, &fx.telegram_id)
        .await
        .expect("list");
    assert_eq!(lines.len(), 1, "re-adding the same variant must not duplicate");
    assert_eq!(lines[0].quantity, 5, "quantity is replaced, not added");
}

#[tokio::test]
async fn test_upsert_zero_removes_and_is_idempotent() {
    let Some(pool) = try_pool().await else { return };
    let fx = fixture(&pool).await;
    let baskets = BasketService::new(&pool);

    baskets
        .upsert_line(&UpsertBasketInput {
            telegram_id: fx.telegram_id.clone(),
            product_variant_id: fx.variant_a,
            quantity: 2,
        })
        .await
        .expect("seed line");

    for _ in 0..2 {
        let mutation = baskets
            .upsert_line(&UpsertBasketInput {
                telegram_id: fx.telegram_id.clone(),
                product_variant_id: fx.variant_a,
                quantity: 0,
            })
            .await
            .expect("zero upsert succeeds even when the line is gone");
        assert_eq!(mutation.quantity, 0);
    }

    let lines = baskets
        .list_lines(&fx.shop_code, &fx.telegram_id)
        .await
        .expect("list");
    assert!(lines.is_empty());
}

#[tokio::test]
async fn test_negative_quantity_is_rejected() {
    let Some(pool) = try_pool().await else { return };
    let fx = fixture(&pool).await;

    let err = BasketService::new(&pool)
        .upsert_line(&UpsertBasketInput {
            telegram_id: fx.telegram_id.clone(),
            product_variant_id: fx.variant_a,
            quantity: -1,
        })
        .await
        .expect_err("negative quantity");
    assert!(matches!(err, AppError::InvalidQuantity));
}

#[tokio::test]
async fn test_step_remove_at_one_deletes_and_at_three_decrements() {
    let Some(pool) = try_pool().await else { return };
    let fx = fixture(&pool).await;
    let baskets = BasketService::new(&pool);

    let remove_a = StepBasketInput {
        telegram_id: fx.telegram_id.clone(),
        product_variant_id: fx.variant_a,
        action: BasketStep::Remove,
    };

    // Removing from a line that doesn't exist fails.
    let err = baskets.step_line(&remove_a).await.expect_err("no line yet");
    assert!(matches!(err, AppError::LineNotFound));

    // At quantity 1 a remove deletes the line and reports 0.
    baskets
        .upsert_line(&UpsertBasketInput {
            telegram_id: fx.telegram_id.clone(),
            product_variant_id: fx.variant_a,
            quantity: 1,
        })
        .await
        .expect("seed at 1");
    let mutation = baskets.step_line(&remove_a).await.expect("remove at 1");
    assert_eq!(mutation.quantity, 0);

    // At quantity 3 a remove leaves 2.
    baskets
        .upsert_line(&UpsertBasketInput {
            telegram_id: fx.telegram_id.clone(),
            product_variant_id: fx.variant_a,
            quantity: 3,
        })
        .await
        .expect("seed at 3");
    let mutation = baskets.step_line(&remove_a).await.expect("remove at 3");
    assert_eq!(mutation.quantity, 2);

    // An add on a missing line creates it at 1.
    let mutation = baskets
        .step_line(&StepBasketInput {
            telegram_id: fx.telegram_id.clone(),
            product_variant_id: fx.variant_b,
            action: BasketStep::Add,
        })
        .await
        .expect("add missing");
    assert_eq!(mutation.quantity, 1);
}

// =============================================================================
// Order Assembly
// =============================================================================

#[tokio::test]
async fn test_assembly_freezes_total_and_drains_the_basket() {
    let Some(pool) = try_pool().await else { return };
    let fx = fixture(&pool).await;
    let baskets = BasketService::new(&pool);
    let orders = OrderService::new(&pool);

    for (variant, quantity) in [(fx.variant_a, 2), (fx.variant_b, 1)] {
        baskets
            .upsert_line(&UpsertBasketInput {
                telegram_id: fx.telegram_id.clone(),
                product_variant_id: variant,
                quantity,
            })
            .await
            .expect("seed basket");
    }

    let lines = baskets
        .list_lines(&fx.shop_code, &fx.telegram_id)
        .await
        .expect("list basket");
    let selectors: Vec<LineSelector> = lines
        .iter()
        .map(|line| LineSelector::Basket { basket_id: line.id })
        .collect();

    let (response, payloads) = orders
        .create_order(&CreateOrderInput {
            telegram_id: fx.telegram_id.clone(),
            items: selectors,
            address_id: None,
            address: Some("Tashkent, Chilonzor 5".to_owned()),
            comment: None,
            // A lying client total is ignored in favor of the server sum.
            total_price: Some(dec!(1)),
        })
        .await
        .expect("create order");

    assert_eq!(response.total_price, dec!(2500));
    assert_eq!(payloads.len(), 2, "shop group + customer confirmation");

    let view = orders
        .get_for_user(response.order_id, &fx.telegram_id)
        .await
        .expect("read back");
    assert_eq!(view.items.len(), 2);
    assert_eq!(view.total_price, dec!(2500));

    let remaining = BasketRepository::new(&pool)
        .count_for_shop(fx.user_id, fx.shop_id)
        .await
        .expect("count");
    assert_eq!(remaining, 0, "consumed basket lines are deleted");
}

#[tokio::test]
async fn test_empty_order_is_rejected_and_writes_nothing() {
    let Some(pool) = try_pool().await else { return };
    let fx = fixture(&pool).await;

    let err = OrderService::new(&pool)
        .create_order(&CreateOrderInput {
            telegram_id: fx.telegram_id.clone(),
            items: Vec::new(),
            address_id: None,
            address: Some("anywhere".to_owned()),
            comment: None,
            total_price: None,
        })
        .await
        .expect_err("empty order");
    assert!(matches!(err, AppError::EmptyOrder));

    let orders = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM orders WHERE user_id = $1")
        .bind(fx.user_id.as_i32())
        .fetch_one(&pool)
        .await
        .expect("count orders");
    assert_eq!(orders, 0, "no order row may survive a rejected assembly");
}

#[tokio::test]
async fn test_failing_line_aborts_the_whole_order_and_keeps_the_basket() {
    let Some(pool) = try_pool().await else { return };
    let fx = fixture(&pool).await;
    let baskets = BasketService::new(&pool);

    baskets
        .upsert_line(&UpsertBasketInput {
            telegram_id: fx.telegram_id.clone(),
            product_variant_id: fx.variant_a,
            quantity: 2,
        })
        .await
        .expect("seed basket");
    let lines = baskets
        .list_lines(&fx.shop_code, &fx.telegram_id)
        .await
        .expect("list");

    let err = OrderService::new(&pool)
        .create_order(&CreateOrderInput {
            telegram_id: fx.telegram_id.clone(),
            items: vec![
                LineSelector::Basket {
                    basket_id: lines[0].id,
                },
                // Dangling variant reference fails the second line.
                LineSelector::Explicit {
                    product_variant_id: VariantId::new(i32::MAX),
                    quantity: 1,
                },
            ],
            address_id: None,
            address: Some("anywhere".to_owned()),
            comment: None,
            total_price: None,
        })
        .await
        .expect_err("second line is broken");
    assert!(matches!(err, AppError::VariantNotFound));

    let remaining = BasketRepository::new(&pool)
        .count_for_shop(fx.user_id, fx.shop_id)
        .await
        .expect("count");
    assert_eq!(remaining, 1, "the consumed line comes back with the rollback");
}

// =============================================================================
// Status Lifecycle
// =============================================================================

#[tokio::test]
async fn test_status_updates_notify_once_per_actual_change() {
    let Some(pool) = try_pool().await else { return };
    let fx = fixture(&pool).await;
    let orders = OrderService::new(&pool);

    let (response, _) = orders
        .create_order(&CreateOrderInput {
            telegram_id: fx.telegram_id.clone(),
            items: vec![LineSelector::Explicit {
                product_variant_id: fx.variant_a,
                quantity: 1,
            }],
            address_id: None,
            address: Some("anywhere".to_owned()),
            comment: None,
            total_price: None,
        })
        .await
        .expect("create order");
    let order_id = response.order_id;

    // Walk the forward chain; every actual change emits one payload.
    for status in ["confirmed", "shipped", "delivered"] {
        let (order, payload) = orders
            .update_status(order_id, status)
            .await
            .expect("valid transition");
        assert_eq!(order.status.to_string(), status);
        assert!(payload.is_some(), "{status} is an actual change");
    }

    // Re-asserting the terminal status succeeds but must not re-notify.
    let (order, payload) = orders
        .update_status(order_id, "delivered")
        .await
        .expect("same-status update succeeds");
    assert_eq!(order.status.to_string(), "delivered");
    assert!(payload.is_none(), "no second status-changed notification");

    // Unknown values are rejected and leave the status untouched.
    let err = orders
        .update_status(order_id, "not_a_status")
        .await
        .expect_err("unknown status");
    assert!(matches!(err, AppError::InvalidStatus(_)));

    // Moves outside the transition table are rejected too.
    let err = orders
        .update_status(order_id, "new")
        .await
        .expect_err("terminal state");
    assert!(matches!(err, AppError::InvalidTransition { .. }));

    let view = orders
        .get_for_user(order_id, &fx.telegram_id)
        .await
        .expect("read back");
    assert_eq!(view.status.to_string(), "delivered");
}

// =============================================================================
// Pricing Persistence
// =============================================================================

#[tokio::test]
async fn test_variant_writes_run_the_discount_derivation() {
    let Some(pool) = try_pool().await else { return };
    let fx = fixture(&pool).await;
    let catalog = CatalogService::new(&pool);

    let created = catalog
        .create_variant(
            catalog
                .get_product(
                    catalog
                        .list_products(&fx.shop_code, &Default::default())
                        .await
                        .expect("list")[0]
                        .id,
                    None,
                )
                .await
                .expect("product")
                .id,
            &CreateVariantInput {
                color: Some("kok".to_owned()),
                size: None,
                volume: None,
                taste: None,
                price: dec!(1000),
                discount_price: None,
                discount_percent: Some(20),
                stock: 1,
                is_active: true,
            },
        )
        .await
        .expect("create variant");
    assert_eq!(created.discount_price, Some(dec!(800.00)));

    let updated = catalog
        .update_variant(
            created.id,
            &UpdateVariantInput {
                discount_price: Some(dec!(750)),
                ..Default::default()
            },
        )
        .await
        .expect("update variant");
    assert_eq!(updated.discount_percent, Some(25));
    assert_eq!(updated.discount_price, Some(dec!(750)));
}
