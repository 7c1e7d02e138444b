//! App Router

use salvo::Router;

use crate::{auth, carts, checkout, discounts, orders};

/// Every route that acts on behalf of a user, behind the identity middleware.
pub(crate) fn app_router() -> Router {
    Router::new()
        .hoop(auth::middleware::handler)
        .push(
            Router::with_path("cart")
                .get(carts::get::handler)
                .delete(carts::delete::handler)
                .push(
                    Router::with_path("items")
                        .post(carts::items::create::handler)
                        .push(
                            Router::with_path("{product}")
                                .put(carts::items::update::handler)
                                .delete(carts::items::delete::handler),
                        ),
                )
                .push(Router::with_path("discount/preview").post(discounts::preview::handler)),
        )
        .push(Router::with_path("checkout").post(checkout::create::handler))
        .push(
            Router::with_path("orders")
                .get(orders::index::handler)
                .push(Router::with_path("{order}").get(orders::get::handler)),
        )
}
