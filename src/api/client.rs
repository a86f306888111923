//! HTTP client for the commerce API.
//!
//! Everything the storefront needs from the backend sits behind the
//! [`CommerceApi`] trait so the UI state machine can be driven against a
//! mock in tests. [`HttpCommerceApi`] is the production implementation.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::error::ApiError;
use super::models::{
    Address, AddressDraft, Card, Cart, Order, SessionSnapshot, Subscription, SubscriptionDraft,
    User,
};

/// Operations the storefront performs against the backend. Each call maps
/// to one request and resolves to a value or an [`ApiError`].
#[async_trait]
pub trait CommerceApi: Send + Sync {
    async fn init_session(&self) -> Result<SessionSnapshot, ApiError>;

    async fn get_cart(&self) -> Result<Cart, ApiError>;
    async fn set_cart_item(&self, variant_id: &str, quantity: u32) -> Result<Cart, ApiError>;
    async fn set_cart_address(&self, address_id: &str) -> Result<(), ApiError>;
    async fn set_cart_card(&self, card_id: &str) -> Result<(), ApiError>;
    async fn convert_cart(&self) -> Result<Order, ApiError>;

    async fn list_addresses(&self) -> Result<Vec<Address>, ApiError>;
    async fn create_address(&self, draft: &AddressDraft) -> Result<String, ApiError>;
    async fn delete_address(&self, address_id: &str) -> Result<(), ApiError>;

    async fn list_cards(&self) -> Result<Vec<Card>, ApiError>;
    async fn create_card(&self, token: &str) -> Result<String, ApiError>;
    async fn delete_card(&self, card_id: &str) -> Result<(), ApiError>;

    async fn list_subscriptions(&self) -> Result<Vec<Subscription>, ApiError>;
    async fn create_subscription(
        &self,
        draft: &SubscriptionDraft,
    ) -> Result<Subscription, ApiError>;
    async fn cancel_subscription(&self, subscription_id: &str) -> Result<(), ApiError>;

    async fn list_orders(&self) -> Result<Vec<Order>, ApiError>;

    async fn update_profile(&self, name: &str, email: &str) -> Result<User, ApiError>;
}

/// API responses wrap their payload in a `data` envelope.
#[derive(Deserialize)]
struct Envelope<T> {
    data: T,
}

#[derive(Deserialize)]
struct FailureBody {
    #[serde(default)]
    message: Option<String>,
}

/// Exchange a device fingerprint for a bearer token.
pub async fn sign_in(base_url: &str, fingerprint: &str) -> Result<String, ApiError> {
    #[derive(Serialize)]
    struct SignInRequest<'a> {
        fingerprint: &'a str,
    }

    #[derive(Deserialize)]
    struct SignInResponse {
        access_token: String,
    }

    let http = reqwest::Client::new();
    let url = format!("{}/auth/device", base_url.trim_end_matches('/'));
    let response = http
        .post(url)
        .json(&SignInRequest { fingerprint })
        .send()
        .await?;
    let token: SignInResponse = decode(response).await?;
    Ok(token.access_token)
}

async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
    let status = response.status();
    if !status.is_success() {
        let message = response
            .json::<FailureBody>()
            .await
            .ok()
            .and_then(|body| body.message)
            .unwrap_or_else(|| format!("request failed with status {}", status.as_u16()));
        return Err(ApiError::Api {
            status: status.as_u16(),
            message,
        });
    }
    Ok(response.json::<Envelope<T>>().await?.data)
}

pub struct HttpCommerceApi {
    http: reqwest::Client,
    base_url: String,
    token: String,
}

impl HttpCommerceApi {
    pub fn new(base_url: &str, token: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self
            .http
            .get(self.url(path))
            .bearer_auth(&self.token)
            .send()
            .await?;
        decode(response).await
    }

    async fn post<B: Serialize + Sync, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let response = self
            .http
            .post(self.url(path))
            .bearer_auth(&self.token)
            .json(body)
            .send()
            .await?;
        decode(response).await
    }

    async fn put<B: Serialize + Sync, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let response = self
            .http
            .put(self.url(path))
            .bearer_auth(&self.token)
            .json(body)
            .send()
            .await?;
        decode(response).await
    }

    async fn delete(&self, path: &str) -> Result<(), ApiError> {
        let response = self
            .http
            .delete(self.url(path))
            .bearer_auth(&self.token)
            .send()
            .await?;
        let _: serde_json::Value = decode(response).await?;
        Ok(())
    }
}

#[async_trait]
impl CommerceApi for HttpCommerceApi {
    async fn init_session(&self) -> Result<SessionSnapshot, ApiError> {
        self.get("/session/init").await
    }

    async fn get_cart(&self) -> Result<Cart, ApiError> {
        self.get("/cart").await
    }

    async fn set_cart_item(&self, variant_id: &str, quantity: u32) -> Result<Cart, ApiError> {
        #[derive(Serialize)]
        struct Body<'a> {
            product_variant_id: &'a str,
            quantity: u32,
        }
        self.put(
            "/cart/item",
            &Body {
                product_variant_id: variant_id,
                quantity,
            },
        )
        .await
    }

    async fn set_cart_address(&self, address_id: &str) -> Result<(), ApiError> {
        #[derive(Serialize)]
        struct Body<'a> {
            address_id: &'a str,
        }
        let _: serde_json::Value = self.put("/cart/address", &Body { address_id }).await?;
        Ok(())
    }

    async fn set_cart_card(&self, card_id: &str) -> Result<(), ApiError> {
        #[derive(Serialize)]
        struct Body<'a> {
            card_id: &'a str,
        }
        let _: serde_json::Value = self.put("/cart/card", &Body { card_id }).await?;
        Ok(())
    }

    async fn convert_cart(&self) -> Result<Order, ApiError> {
        self.post("/cart/convert", &serde_json::json!({})).await
    }

    async fn list_addresses(&self) -> Result<Vec<Address>, ApiError> {
        self.get("/address").await
    }

    async fn create_address(&self, draft: &AddressDraft) -> Result<String, ApiError> {
        self.post("/address", draft).await
    }

    async fn delete_address(&self, address_id: &str) -> Result<(), ApiError> {
        self.delete(&format!("/address/{address_id}")).await
    }

    async fn list_cards(&self) -> Result<Vec<Card>, ApiError> {
        self.get("/card").await
    }

    async fn create_card(&self, token: &str) -> Result<String, ApiError> {
        #[derive(Serialize)]
        struct Body<'a> {
            token: &'a str,
        }
        self.post("/card", &Body { token }).await
    }

    async fn delete_card(&self, card_id: &str) -> Result<(), ApiError> {
        self.delete(&format!("/card/{card_id}")).await
    }

    async fn list_subscriptions(&self) -> Result<Vec<Subscription>, ApiError> {
        self.get("/subscription").await
    }

    async fn create_subscription(
        &self,
        draft: &SubscriptionDraft,
    ) -> Result<Subscription, ApiError> {
        self.post("/subscription", draft).await
    }

    async fn cancel_subscription(&self, subscription_id: &str) -> Result<(), ApiError> {
        self.delete(&format!("/subscription/{subscription_id}")).await
    }

    async fn list_orders(&self) -> Result<Vec<Order>, ApiError> {
        self.get("/order").await
    }

    async fn update_profile(&self, name: &str, email: &str) -> Result<User, ApiError> {
        #[derive(Serialize)]
        struct Body<'a> {
            name: &'a str,
            email: &'a str,
        }
        self.put("/profile", &Body { name, email }).await
    }
}
