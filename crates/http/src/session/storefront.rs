//! Cart, order and comment operations
//!
//! Every call here goes through [`Session::send`] and so recovers once from
//! an expired access token.

use super::{AuthenticatedRequest, Session, SessionError};
use crate::types::{
    AddToCartRequest, Cart, Comment, CommentRequest, Order, OrderRequest, UpdateCartItemRequest,
};

const CART: &str = "/cart/";
const ORDERS: &str = "/order/";
const COMMENTS: &str = "/comment/";

fn cart_item_path(item_id: u64) -> String {
    format!("/cart-item/{item_id}/")
}

impl Session {
    /// Current user's cart
    pub async fn cart(&self) -> Result<Cart, SessionError> {
        self.send(&AuthenticatedRequest::get(CART)).await
    }

    /// Add `quantity` of `product` to the cart
    pub async fn add_to_cart(&self, product: u64, quantity: u32) -> Result<Cart, SessionError> {
        let request =
            AuthenticatedRequest::post(CART).json(&AddToCartRequest { product, quantity })?;
        self.send(&request).await
    }

    /// Change the quantity of a cart line
    pub async fn update_cart_item(
        &self,
        item_id: u64,
        quantity: u32,
    ) -> Result<serde_json::Value, SessionError> {
        let request = AuthenticatedRequest::patch(cart_item_path(item_id))
            .json(&UpdateCartItemRequest { quantity })?;
        self.send(&request).await
    }

    /// Remove a cart line
    pub async fn remove_cart_item(&self, item_id: u64) -> Result<(), SessionError> {
        self.send(&AuthenticatedRequest::delete(cart_item_path(item_id)))
            .await
    }

    /// Place an order for the current cart.
    ///
    /// For card payments the returned [`Order::payment_url`] is where the
    /// user has to be sent next.
    pub async fn create_order(&self, order: &OrderRequest) -> Result<Order, SessionError> {
        let request = AuthenticatedRequest::post(ORDERS).json(order)?;
        self.send(&request).await
    }

    /// Orders placed by the current user
    pub async fn orders(&self) -> Result<Vec<Order>, SessionError> {
        self.send(&AuthenticatedRequest::get(ORDERS)).await
    }

    /// Post a product review
    pub async fn post_comment(&self, comment: &CommentRequest) -> Result<Comment, SessionError> {
        let request = AuthenticatedRequest::post(COMMENTS).json(comment)?;
        self.send(&request).await
    }
}
