//! Checkout service.

use std::sync::Arc;

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use tracing::{debug, error, info, warn};

use crate::domain::{
    carts::{CartsService, models::Cart},
    checkout::{
        errors::CheckoutError,
        models::{CheckoutRequest, CheckoutStage},
    },
    discounts::{DiscountsService, rules::normalize_code},
    inventory::{
        InventoryLedger,
        models::{Reservation, StockRequest},
    },
    orders::{
        OrdersService,
        models::{LineItem, Order, OrderStatus, OrderUuid},
    },
    products::{ProductsService, ProductsServiceError},
    users::UserUuid,
};

/// Turns a user's cart into an order.
///
/// Carts only cache prices for display; the amounts recorded on the order are
/// always read from the catalog and the discount service during checkout.
pub struct DefaultCheckoutService {
    carts: Arc<dyn CartsService>,
    products: Arc<dyn ProductsService>,
    inventory: Arc<dyn InventoryLedger>,
    discounts: Arc<dyn DiscountsService>,
    orders: Arc<dyn OrdersService>,
}

impl std::fmt::Debug for DefaultCheckoutService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DefaultCheckoutService").finish_non_exhaustive()
    }
}

impl DefaultCheckoutService {
    #[must_use]
    pub fn new(
        carts: Arc<dyn CartsService>,
        products: Arc<dyn ProductsService>,
        inventory: Arc<dyn InventoryLedger>,
        discounts: Arc<dyn DiscountsService>,
        orders: Arc<dyn OrdersService>,
    ) -> Self {
        Self {
            carts,
            products,
            inventory,
            discounts,
            orders,
        }
    }

    async fn run(
        &self,
        attempt: &mut Attempt,
        request: &CheckoutRequest,
        point_in_time: Timestamp,
    ) -> Result<Order, CheckoutError> {
        let user = attempt.user;
        let cart = self.validate(user, request, point_in_time).await?;

        attempt.advance(CheckoutStage::Reserving);

        let reservation = self
            .inventory
            .reserve_and_decrement(stock_requests(&cart))
            .await?;

        attempt.advance(CheckoutStage::Pricing);

        let order = match self.price(&cart, request, point_in_time).await {
            Ok(order) => order,
            Err(error) => {
                self.compensate(user, reservation).await;

                return Err(error);
            }
        };

        attempt.advance(CheckoutStage::Committing);

        let order = match self.orders.create_order(order).await {
            Ok(order) => order,
            Err(source) => {
                error!(%user, error = %source, "failed to record order");

                self.compensate(user, reservation).await;

                return Err(CheckoutError::PersistenceFailure(source));
            }
        };

        attempt.advance(CheckoutStage::Done);

        let ordered = cart
            .items
            .iter()
            .map(|item| (item.product_uuid, item.quantity))
            .collect();

        if let Err(clear_error) = self.carts.remove_ordered(user, ordered).await {
            warn!(%user, order = %order.uuid, error = %clear_error, "failed to clear cart after checkout");
        }

        info!(
            %user,
            order = %order.uuid,
            subtotal = order.subtotal,
            discount = order.discount,
            total = order.total,
            "order placed"
        );

        Ok(order)
    }

    /// Checks that need no stock: a non-empty cart, an address and, when a
    /// coupon is given, that it applies to the cart's display subtotal.
    async fn validate(
        &self,
        user: UserUuid,
        request: &CheckoutRequest,
        point_in_time: Timestamp,
    ) -> Result<Cart, CheckoutError> {
        let cart = self.carts.get_cart(user).await?;

        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        if request.address().is_empty() {
            return Err(CheckoutError::MissingAddress);
        }

        if let Some(code) = request.coupon_code() {
            self.discounts
                .evaluate(code, cart.total(), point_in_time)
                .await?;
        }

        Ok(cart)
    }

    /// Snapshot catalog prices and build the order to record.
    async fn price(
        &self,
        cart: &Cart,
        request: &CheckoutRequest,
        point_in_time: Timestamp,
    ) -> Result<Order, CheckoutError> {
        let mut line_items = Vec::with_capacity(cart.items.len());

        for item in &cart.items {
            let product = self
                .products
                .get_product(item.product_uuid)
                .await
                .map_err(|error| match error {
                    ProductsServiceError::NotFound => {
                        CheckoutError::ProductNotFound(item.product_uuid)
                    }
                    other => CheckoutError::Products(other),
                })?;

            line_items.push(LineItem {
                product_uuid: product.uuid,
                name: product.name,
                quantity: item.quantity,
                unit_price: product.price,
                line_total: product.price.saturating_mul(item.quantity),
            });
        }

        let subtotal = line_items
            .iter()
            .map(|item| item.line_total)
            .fold(0, u64::saturating_add);

        let discount = match request.coupon_code() {
            Some(code) => {
                self.discounts
                    .evaluate(code, subtotal, point_in_time)
                    .await?
            }
            None => 0,
        };

        Ok(Order {
            uuid: OrderUuid::new(),
            user: cart.user,
            line_items,
            subtotal,
            discount,
            coupon_code: request.coupon_code().map(normalize_code),
            total: subtotal.saturating_sub(discount),
            delivery_address: request.address().to_string(),
            notes: request.notes().map(ToString::to_string),
            status: OrderStatus::Placed,
            ordered_at: point_in_time,
        })
    }

    async fn compensate(&self, user: UserUuid, reservation: Reservation) {
        let units = reservation.units();

        match self.inventory.release(reservation).await {
            Ok(()) => warn!(%user, units, "released reserved stock"),
            Err(error) => error!(%user, units, %error, "failed to release reserved stock"),
        }
    }
}

#[async_trait]
impl CheckoutService for DefaultCheckoutService {
    async fn checkout(
        &self,
        user: UserUuid,
        request: CheckoutRequest,
    ) -> Result<Order, CheckoutError> {
        let point_in_time = Timestamp::now();
        let mut attempt = Attempt::new(user);

        let result = self.run(&mut attempt, &request, point_in_time).await;

        if let Err(error) = &result {
            debug!(%user, stage = %attempt.stage, %error, "checkout failed");

            attempt.advance(CheckoutStage::Failed);
        }

        result
    }
}

#[automock]
#[async_trait]
pub trait CheckoutService: Send + Sync {
    /// Convert the user's cart into an order.
    ///
    /// Either every cart line is taken out of stock and an order is recorded,
    /// or stock is left as it was and the cart is untouched.
    async fn checkout(
        &self,
        user: UserUuid,
        request: CheckoutRequest,
    ) -> Result<Order, CheckoutError>;
}

#[derive(Debug)]
struct Attempt {
    user: UserUuid,
    stage: CheckoutStage,
}

impl Attempt {
    fn new(user: UserUuid) -> Self {
        debug!(%user, stage = %CheckoutStage::Validating, "checkout started");

        Self {
            user,
            stage: CheckoutStage::Validating,
        }
    }

    fn advance(&mut self, next: CheckoutStage) {
        debug_assert!(
            self.stage.can_advance_to(next),
            "checkout cannot move from {} to {next}",
            self.stage
        );

        debug!(user = %self.user, from = %self.stage, to = %next, "checkout stage");

        self.stage = next;
    }
}

fn stock_requests(cart: &Cart) -> Vec<StockRequest> {
    cart.items
        .iter()
        .map(|item| StockRequest {
            product: item.product_uuid,
            quantity: item.quantity,
        })
        .collect()
}
