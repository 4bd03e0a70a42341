//! Order repository backed by `PostgreSQL`.
//!
//! Orders and their items are written and deleted inside one transaction so a
//! partially created or partially deleted aggregate is never observable.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use quickbite_core::{
    AddressId, MenuItemId, OrderId, OrderItemId, OrderStatus, PaymentMethod, RestaurantId, UserId,
};

use super::{OrderRepository, RepositoryError};
use crate::models::{NewOrder, Order, OrderItem};

/// Repository for order database operations.
#[derive(Clone)]
pub struct PgOrderRepository {
    pool: PgPool,
}

impl PgOrderRepository {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn load_items(&self, order_id: OrderId) -> Result<Vec<OrderItem>, RepositoryError> {
        let rows = sqlx::query_as::<_, OrderItemRow>(
            r"
            SELECT id, order_id, menu_item_id, name, price, quantity, subtotal
            FROM order_items
            WHERE order_id = $1
            ORDER BY id ASC
            ",
        )
        .bind(order_id.as_i64())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(OrderItemRow::into_item).collect())
    }

    async fn hydrate(&self, row: OrderRow) -> Result<Order, RepositoryError> {
        let items = self.load_items(OrderId::new(row.id)).await?;
        row.into_order(items)
    }
}

#[async_trait]
impl OrderRepository for PgOrderRepository {
    async fn create(&self, new: NewOrder) -> Result<Order, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, OrderRow>(
            r"
            INSERT INTO orders (
                order_number, status, user_id, restaurant_id, delivery_address_id,
                subtotal, delivery_fee, service_fee, total,
                payment_method, payment_status, estimated_delivery_time
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING id, order_number, status, user_id, restaurant_id, delivery_address_id,
                      subtotal, delivery_fee, service_fee, total,
                      payment_method, payment_status, estimated_delivery_time,
                      created_at, updated_at, delivered_at
            ",
        )
        .bind(&new.order_number)
        .bind(new.status.to_string())
        .bind(new.user_id.as_i64())
        .bind(new.restaurant_id.as_i64())
        .bind(new.delivery_address_id.as_i64())
        .bind(new.subtotal)
        .bind(new.delivery_fee)
        .bind(new.service_fee)
        .bind(new.total)
        .bind(new.payment_method.to_string())
        .bind(&new.payment_status)
        .bind(new.estimated_delivery_time)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict("order number already exists".to_owned());
            }
            RepositoryError::Database(e)
        })?;

        let order_id = row.id;
        let mut items = Vec::with_capacity(new.items.len());
        for item in &new.items {
            let item_row = sqlx::query_as::<_, OrderItemRow>(
                r"
                INSERT INTO order_items (order_id, menu_item_id, name, price, quantity, subtotal)
                VALUES ($1, $2, $3, $4, $5, $6)
                RETURNING id, order_id, menu_item_id, name, price, quantity, subtotal
                ",
            )
            .bind(order_id)
            .bind(item.menu_item_id.as_i64())
            .bind(&item.name)
            .bind(item.price)
            .bind(item.quantity)
            .bind(item.subtotal)
            .fetch_one(&mut *tx)
            .await?;

            items.push(item_row.into_item());
        }

        tx.commit().await?;

        row.into_order(items)
    }

    async fn find(&self, id: OrderId) -> Result<Option<Order>, RepositoryError> {
        let row = sqlx::query_as::<_, OrderRow>(
            r"
            SELECT id, order_number, status, user_id, restaurant_id, delivery_address_id,
                   subtotal, delivery_fee, service_fee, total,
                   payment_method, payment_status, estimated_delivery_time,
                   created_at, updated_at, delivered_at
            FROM orders
            WHERE id = $1
            ",
        )
        .bind(id.as_i64())
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(r) => Ok(Some(self.hydrate(r).await?)),
            None => Ok(None),
        }
    }

    async fn find_by_order_number(
        &self,
        order_number: &str,
    ) -> Result<Option<Order>, RepositoryError> {
        let row = sqlx::query_as::<_, OrderRow>(
            r"
            SELECT id, order_number, status, user_id, restaurant_id, delivery_address_id,
                   subtotal, delivery_fee, service_fee, total,
                   payment_method, payment_status, estimated_delivery_time,
                   created_at, updated_at, delivered_at
            FROM orders
            WHERE order_number = $1
            ",
        )
        .bind(order_number)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(r) => Ok(Some(self.hydrate(r).await?)),
            None => Ok(None),
        }
    }

    async fn find_by_user(&self, user_id: UserId) -> Result<Vec<Order>, RepositoryError> {
        let rows = sqlx::query_as::<_, OrderRow>(
            r"
            SELECT id, order_number, status, user_id, restaurant_id, delivery_address_id,
                   subtotal, delivery_fee, service_fee, total,
                   payment_method, payment_status, estimated_delivery_time,
                   created_at, updated_at, delivered_at
            FROM orders
            WHERE user_id = $1
            ORDER BY created_at DESC
            ",
        )
        .bind(user_id.as_i64())
        .fetch_all(&self.pool)
        .await?;

        let mut orders = Vec::with_capacity(rows.len());
        for row in rows {
            orders.push(self.hydrate(row).await?);
        }
        Ok(orders)
    }

    async fn find_by_restaurant(
        &self,
        restaurant_id: RestaurantId,
    ) -> Result<Vec<Order>, RepositoryError> {
        let rows = sqlx::query_as::<_, OrderRow>(
            r"
            SELECT id, order_number, status, user_id, restaurant_id, delivery_address_id,
                   subtotal, delivery_fee, service_fee, total,
                   payment_method, payment_status, estimated_delivery_time,
                   created_at, updated_at, delivered_at
            FROM orders
            WHERE restaurant_id = $1
            ORDER BY created_at DESC
            ",
        )
        .bind(restaurant_id.as_i64())
        .fetch_all(&self.pool)
        .await?;

        let mut orders = Vec::with_capacity(rows.len());
        for row in rows {
            orders.push(self.hydrate(row).await?);
        }
        Ok(orders)
    }

    async fn update_status(
        &self,
        id: OrderId,
        status: OrderStatus,
        delivered_at: Option<DateTime<Utc>>,
    ) -> Result<Order, RepositoryError> {
        let row = sqlx::query_as::<_, OrderRow>(
            r"
            UPDATE orders
            SET status = $2,
                delivered_at = COALESCE($3, delivered_at),
                updated_at = now()
            WHERE id = $1
            RETURNING id, order_number, status, user_id, restaurant_id, delivery_address_id,
                      subtotal, delivery_fee, service_fee, total,
                      payment_method, payment_status, estimated_delivery_time,
                      created_at, updated_at, delivered_at
            ",
        )
        .bind(id.as_i64())
        .bind(status.to_string())
        .bind(delivered_at)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        self.hydrate(row).await
    }

    async fn delete(&self, id: OrderId) -> Result<(), RepositoryError> {
        let mut tx = self.pool.begin().await?;

        // Items first; the cascade is explicit.
        sqlx::query("DELETE FROM order_items WHERE order_id = $1")
            .bind(id.as_i64())
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM orders WHERE id = $1")
            .bind(id.as_i64())
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            tx.rollback().await?;
            return Err(RepositoryError::NotFound);
        }

        tx.commit().await?;
        Ok(())
    }
}

#[derive(sqlx::FromRow)]
struct OrderRow {
    id: i64,
    order_number: String,
    status: String,
    user_id: i64,
    restaurant_id: i64,
    delivery_address_id: i64,
    subtotal: Decimal,
    delivery_fee: Decimal,
    service_fee: Decimal,
    total: Decimal,
    payment_method: String,
    payment_status: String,
    estimated_delivery_time: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    delivered_at: Option<DateTime<Utc>>,
}

impl OrderRow {
    fn into_order(self, items: Vec<OrderItem>) -> Result<Order, RepositoryError> {
        let status = self.status.parse::<OrderStatus>().map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid order status in database: {e}"))
        })?;
        let payment_method = self.payment_method.parse::<PaymentMethod>().map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid payment method in database: {e}"))
        })?;

        Ok(Order {
            id: OrderId::new(self.id),
            order_number: self.order_number,
            status,
            user_id: UserId::new(self.user_id),
            restaurant_id: RestaurantId::new(self.restaurant_id),
            delivery_address_id: AddressId::new(self.delivery_address_id),
            items,
            subtotal: self.subtotal,
            delivery_fee: self.delivery_fee,
            service_fee: self.service_fee,
            total: self.total,
            payment_method,
            payment_status: self.payment_status,
            estimated_delivery_time: self.estimated_delivery_time,
            created_at: self.created_at,
            updated_at: self.updated_at,
            delivered_at: self.delivered_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct OrderItemRow {
    id: i64,
    order_id: i64,
    menu_item_id: i64,
    name: String,
    price: Decimal,
    quantity: i32,
    subtotal: Decimal,
}

impl OrderItemRow {
    fn into_item(self) -> OrderItem {
        OrderItem {
            id: OrderItemId::new(self.id),
            order_id: OrderId::new(self.order_id),
            menu_item_id: MenuItemId::new(self.menu_item_id),
            name: self.name,
            price: self.price,
            quantity: self.quantity,
            subtotal: self.subtotal,
        }
    }
}
