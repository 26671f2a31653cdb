//! Request and response payloads of the storefront API
//!
//! Response types ignore fields they do not know about, so backend additions
//! do not break deserialization.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// Auth

/// `POST <auth>/token/` body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub phone: String,
    pub password: String,
}

/// Credential pair issued at login or SMS confirmation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
    #[serde(default)]
    pub first_name: Option<String>,
}

/// `POST <auth>/register/` body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub first_name: String,
    pub phone: String,
    pub password: String,
}

/// `POST <auth>/confirm/` body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfirmRequest {
    pub phone: String,
    pub code: String,
}

/// `POST <auth>/confirm/` response
///
/// `status` is passed through untouched; a confirmation succeeded when
/// `data.token` is present.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfirmResponse {
    #[serde(default)]
    pub status: serde_json::Value,
    #[serde(default)]
    pub data: Option<ConfirmData>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfirmData {
    #[serde(default)]
    pub token: Option<TokenPair>,
}

impl ConfirmResponse {
    /// The issued credential pair, if the code was accepted
    pub fn into_token(self) -> Option<TokenPair> {
        self.data.and_then(|data| data.token)
    }
}

/// `POST <auth>/token/refresh/` body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshRequest {
    pub refresh: String,
}

/// `POST <auth>/token/refresh/` response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshResponse {
    pub access: String,
}

// Catalog

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price: Decimal,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub in_stock: Option<bool>,
}

/// Marketing banner shown on the landing page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Banner {
    pub id: u64,
    #[serde(default)]
    pub title: Option<String>,
    pub image: String,
    #[serde(default)]
    pub link: Option<String>,
}

// Cart

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Cart {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub items: Vec<CartItem>,
    #[serde(default)]
    pub total_price: Option<Decimal>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    pub id: u64,
    pub product: u64,
    pub quantity: u32,
    #[serde(default)]
    pub price: Option<Decimal>,
}

/// `POST /cart/` body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddToCartRequest {
    pub product: u64,
    pub quantity: u32,
}

/// `PATCH /cart-item/{id}/` body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateCartItemRequest {
    pub quantity: u32,
}

// Orders

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Cash,
    Card,
}

/// `POST /order/` body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderRequest {
    pub address: String,
    pub phone: String,
    pub payment_method: PaymentMethod,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: u64,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub total_price: Option<Decimal>,
    /// Set for card payments: the client must send the user here to pay
    #[serde(default)]
    pub payment_url: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

// Comments

/// `POST /comment/` body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentRequest {
    pub product: u64,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: u64,
    pub product: u64,
    pub text: String,
    #[serde(default)]
    pub rating: Option<u8>,
    #[serde(default)]
    pub author: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_confirm_response_token() {
        let accepted: ConfirmResponse = serde_json::from_value(json!({
            "status": true,
            "data": {"token": {"access": "A1", "refresh": "R1", "first_name": "Ann"}}
        }))
        .unwrap();
        let token = accepted.into_token().unwrap();
        assert_eq!(token.access, "A1");
        assert_eq!(token.first_name.as_deref(), Some("Ann"));

        let rejected: ConfirmResponse =
            serde_json::from_value(json!({"status": "invalid code"})).unwrap();
        assert!(rejected.into_token().is_none());
    }

    #[test]
    fn test_product_price_accepts_string_and_number() {
        let from_string: Product =
            serde_json::from_value(json!({"id": 1, "name": "Tea", "price": "12.50"})).unwrap();
        let from_number: Product =
            serde_json::from_value(json!({"id": 1, "name": "Tea", "price": 12.5})).unwrap();
        assert_eq!(from_string.price, from_number.price);
        assert!(from_string.images.is_empty());
    }

    #[test]
    fn test_order_request_omits_empty_comment() {
        let body = serde_json::to_value(OrderRequest {
            address: "Main st. 1".into(),
            phone: "+10000000000".into(),
            payment_method: PaymentMethod::Card,
            comment: None,
        })
        .unwrap();
        assert_eq!(body["payment_method"], "card");
        assert!(body.get("comment").is_none());
    }
}
