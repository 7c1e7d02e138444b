//! Test helpers.

use std::sync::Arc;

use salvo::{affix_state::inject, prelude::*};
use uuid::Uuid;

use sweetcart_app::{
    context::AppContext,
    domain::{
        carts::{
            MockCartsService,
            models::{Cart, CartItem},
        },
        checkout::MockCheckoutService,
        discounts::MockDiscountsService,
        inventory::MockInventoryLedger,
        orders::{
            MockOrdersService,
            models::{LineItem, Order, OrderStatus, OrderUuid},
        },
        products::{MockProductsService, models::ProductUuid},
        users::UserUuid,
    },
};

use crate::{extensions::*, state::State};

pub(crate) const TEST_USER_UUID: UserUuid = UserUuid::from_uuid(Uuid::nil());

#[salvo::handler]
pub(crate) async fn inject_user(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    depot.insert_user_uuid(TEST_USER_UUID);
    ctrl.call_next(req, depot, res).await;
}

/// One mock per service. Any call without a matching expectation fails the
/// test.
#[derive(Default)]
pub(crate) struct MockApp {
    pub(crate) products: MockProductsService,
    pub(crate) inventory: MockInventoryLedger,
    pub(crate) carts: MockCartsService,
    pub(crate) discounts: MockDiscountsService,
    pub(crate) orders: MockOrdersService,
    pub(crate) checkout: MockCheckoutService,
}

impl MockApp {
    pub(crate) fn into_state(self) -> Arc<State> {
        State::from_app_context(AppContext {
            products: Arc::new(self.products),
            inventory: Arc::new(self.inventory),
            carts: Arc::new(self.carts),
            discounts: Arc::new(self.discounts),
            orders: Arc::new(self.orders),
            checkout: Arc::new(self.checkout),
        })
    }

    /// Mount `route` behind state injection and a fixed test user.
    pub(crate) fn service(self, route: Router) -> Service {
        Service::new(
            Router::new()
                .hoop(inject(self.into_state()))
                .hoop(inject_user)
                .push(route),
        )
    }
}

pub(crate) fn make_cart(items: Vec<CartItem>) -> Cart {
    Cart {
        user: TEST_USER_UUID,
        items,
        updated_at: None,
    }
}

pub(crate) fn make_cart_item(product: ProductUuid, quantity: u64, unit_price: u64) -> CartItem {
    CartItem {
        product_uuid: product,
        name: "Kaju Katli".to_string(),
        quantity,
        unit_price,
    }
}

pub(crate) fn make_order(subtotal: u64, discount: u64) -> Order {
    let product = ProductUuid::new();

    Order {
        uuid: OrderUuid::new(),
        user: TEST_USER_UUID,
        line_items: vec![LineItem {
            product_uuid: product,
            name: "Kaju Katli".to_string(),
            quantity: 2,
            unit_price: subtotal / 2,
            line_total: subtotal,
        }],
        subtotal,
        discount,
        coupon_code: (discount > 0).then(|| "SAVE20".to_string()),
        total: subtotal - discount,
        delivery_address: "12 MG Road".to_string(),
        notes: None,
        status: OrderStatus::Placed,
        ordered_at: jiff::Timestamp::UNIX_EPOCH,
    }
}
