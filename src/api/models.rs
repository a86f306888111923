//! Domain types exchanged with the commerce API.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The signed-in customer profile.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
}

/// A purchasable variation of a product (size, roast, edition).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variant {
    pub id: String,
    pub name: String,
    /// Unit price in cents.
    pub price: u64,
}

/// Whether a product can only be bought as a recurring subscription.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionPolicy {
    #[default]
    None,
    Allowed,
    Required,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub variants: Vec<Variant>,
    #[serde(default)]
    pub subscription: SubscriptionPolicy,
    #[serde(default)]
    pub tags: HashMap<String, String>,
}

impl Product {
    /// Featured products sort ahead of staples in the storefront.
    pub fn is_featured(&self) -> bool {
        self.tags.get("featured").map(|v| v == "true").unwrap_or(false)
    }

    /// Subscription-only products skip the cart entirely.
    pub fn subscription_only(&self) -> bool {
        self.subscription == SubscriptionPolicy::Required
    }

    /// Optional accent color override ("#RRGGBB") for the storefront theme.
    pub fn accent(&self) -> Option<&str> {
        self.tags.get("accent").map(String::as_str)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    pub id: String,
    pub product_variant_id: String,
    pub quantity: u32,
    /// Line subtotal in cents.
    pub subtotal: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CartAmount {
    pub subtotal: u64,
    pub shipping: u64,
}

/// Shipping rate the API picks once the cart has a destination.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShippingRate {
    pub service: String,
    #[serde(default)]
    pub timeframe: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cart {
    #[serde(default)]
    pub items: Vec<CartItem>,
    #[serde(default)]
    pub amount: CartAmount,
    #[serde(default)]
    pub address_id: Option<String>,
    #[serde(default)]
    pub card_id: Option<String>,
    #[serde(default)]
    pub shipping: Option<ShippingRate>,
}

impl Cart {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn quantity_of(&self, variant_id: &str) -> u32 {
        self.items
            .iter()
            .find(|i| i.product_variant_id == variant_id)
            .map(|i| i.quantity)
            .unwrap_or(0)
    }

    pub fn total(&self) -> u64 {
        self.amount.subtotal + self.amount.shipping
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Address {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub street1: String,
    #[serde(default)]
    pub street2: String,
    pub city: String,
    #[serde(default)]
    pub province: String,
    pub country: String,
    pub zip: String,
    #[serde(default)]
    pub phone: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardExpiration {
    pub month: u8,
    pub year: u16,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub id: String,
    #[serde(default)]
    pub brand: String,
    pub last4: String,
    pub expiration: CardExpiration,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Subscription {
    pub id: String,
    pub product_variant_id: String,
    pub quantity: u32,
    #[serde(default)]
    pub address_id: String,
    #[serde(default)]
    pub card_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    pub product_variant_id: String,
    pub quantity: u32,
    #[serde(default)]
    pub amount: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct OrderAmount {
    pub subtotal: u64,
    pub shipping: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: String,
    pub created: DateTime<Utc>,
    pub items: Vec<OrderItem>,
    pub amount: OrderAmount,
}

/// Everything the init call returns after sign-in.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub user: User,
    #[serde(default)]
    pub products: Vec<Product>,
    #[serde(default)]
    pub cart: Cart,
    #[serde(default)]
    pub addresses: Vec<Address>,
    #[serde(default)]
    pub cards: Vec<Card>,
    #[serde(default)]
    pub subscriptions: Vec<Subscription>,
    #[serde(default)]
    pub orders: Vec<Order>,
}

/// Outgoing payload for a new shipping address.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AddressDraft {
    pub name: String,
    pub street1: String,
    pub street2: String,
    pub city: String,
    pub province: String,
    pub country: String,
    pub zip: String,
    pub phone: String,
}

/// Raw card fields headed for the payment tokenizer. Never sent to the
/// commerce API itself.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CardDraft {
    pub name: String,
    pub number: String,
    pub exp_month: String,
    pub exp_year: String,
    pub cvc: String,
    pub zip: String,
}

/// Outgoing payload for a new subscription.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SubscriptionDraft {
    pub product_variant_id: String,
    pub quantity: u32,
    pub address_id: String,
    pub card_id: String,
}

/// Find the product and variant owning `variant_id`.
pub fn find_variant<'a>(
    products: &'a [Product],
    variant_id: &str,
) -> Option<(&'a Product, &'a Variant)> {
    products.iter().find_map(|p| {
        p.variants
            .iter()
            .find(|v| v.id == variant_id)
            .map(|v| (p, v))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(id: &str, featured: bool) -> Product {
        let mut tags = HashMap::new();
        if featured {
            tags.insert("featured".to_string(), "true".to_string());
        }
        Product {
            id: id.to_string(),
            name: id.to_string(),
            description: String::new(),
            variants: vec![Variant {
                id: format!("var_{id}"),
                name: "12oz".to_string(),
                price: 2200,
            }],
            subscription: SubscriptionPolicy::None,
            tags,
        }
    }

    #[test]
    fn test_featured_tag() {
        assert!(product("a", true).is_featured());
        assert!(!product("b", false).is_featured());
    }

    #[test]
    fn test_find_variant_walks_all_products() {
        let products = vec![product("a", false), product("b", false)];
        let (p, v) = find_variant(&products, "var_b").expect("variant");
        assert_eq!(p.id, "b");
        assert_eq!(v.price, 2200);
        assert!(find_variant(&products, "var_missing").is_none());
    }

    #[test]
    fn test_cart_quantity_lookup() {
        let cart = Cart {
            items: vec![CartItem {
                id: "itm_1".to_string(),
                product_variant_id: "var_a".to_string(),
                quantity: 3,
                subtotal: 6600,
            }],
            amount: CartAmount {
                subtotal: 6600,
                shipping: 0,
            },
            ..Cart::default()
        };
        assert_eq!(cart.quantity_of("var_a"), 3);
        assert_eq!(cart.quantity_of("var_b"), 0);
        assert_eq!(cart.total(), 6600);
    }
}
