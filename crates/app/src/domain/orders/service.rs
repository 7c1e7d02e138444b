//! Orders service.

use async_trait::async_trait;
use mockall::automock;
use rustc_hash::FxHashMap;
use tokio::sync::RwLock;

use crate::domain::{
    orders::{
        errors::OrdersServiceError,
        models::{Order, OrderUuid},
    },
    users::UserUuid,
};

#[derive(Debug, Default)]
struct OrderLog {
    orders: FxHashMap<OrderUuid, Order>,
    by_user: FxHashMap<UserUuid, Vec<OrderUuid>>,
}

/// Append-only order store held in process memory.
#[derive(Debug, Default)]
pub struct InMemoryOrdersService {
    log: RwLock<OrderLog>,
}

impl InMemoryOrdersService {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl OrdersService for InMemoryOrdersService {
    async fn create_order(&self, order: Order) -> Result<Order, OrdersServiceError> {
        let mut log = self.log.write().await;

        if log.orders.contains_key(&order.uuid) {
            return Err(OrdersServiceError::AlreadyExists);
        }

        log.by_user.entry(order.user).or_default().push(order.uuid);
        log.orders.insert(order.uuid, order.clone());

        Ok(order)
    }

    async fn list_orders(&self, user: UserUuid) -> Result<Vec<Order>, OrdersServiceError> {
        let log = self.log.read().await;

        let Some(uuids) = log.by_user.get(&user) else {
            return Ok(Vec::new());
        };

        Ok(uuids
            .iter()
            .rev()
            .filter_map(|uuid| log.orders.get(uuid))
            .cloned()
            .collect())
    }

    async fn get_order(
        &self,
        user: UserUuid,
        order: OrderUuid,
    ) -> Result<Order, OrdersServiceError> {
        self.log
            .read()
            .await
            .orders
            .get(&order)
            .filter(|found| found.user == user)
            .cloned()
            .ok_or(OrdersServiceError::NotFound)
    }
}

#[automock]
#[async_trait]
pub trait OrdersService: Send + Sync {
    /// Append a finalised order.
    async fn create_order(&self, order: Order) -> Result<Order, OrdersServiceError>;

    /// The user's orders, newest first.
    async fn list_orders(&self, user: UserUuid) -> Result<Vec<Order>, OrdersServiceError>;

    /// A single order belonging to the user.
    async fn get_order(
        &self,
        user: UserUuid,
        order: OrderUuid,
    ) -> Result<Order, OrdersServiceError>;
}
