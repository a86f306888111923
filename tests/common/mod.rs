//! Shared fixtures for the state-machine tests.
#![allow(dead_code)]

use std::collections::HashMap;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use kiosk::api::{
    Address, Card, CardExpiration, CartItem, Product, SessionSnapshot, SubscriptionPolicy, User,
    Variant,
};
use kiosk::{Command, Model, Msg, Page};

pub fn key(code: KeyCode) -> Msg {
    Msg::Key(KeyEvent::new(code, KeyModifiers::NONE))
}

pub fn press(model: Model, code: KeyCode) -> (Model, Vec<Command>) {
    model.update(&key(code))
}

pub fn press_char(model: Model, c: char) -> (Model, Vec<Command>) {
    press(model, KeyCode::Char(c))
}

/// Type a string then press enter, like filling one form field.
pub fn fill_field(mut model: Model, text: &str) -> Model {
    for c in text.chars() {
        model = press_char(model, c).0;
    }
    press(model, KeyCode::Enter).0
}

pub fn product(id: &str, price: u64) -> Product {
    Product {
        id: id.to_string(),
        name: id.to_string(),
        description: "whole bean, 12oz".to_string(),
        variants: vec![Variant {
            id: format!("var_{id}"),
            name: "12oz".to_string(),
            price,
        }],
        subscription: SubscriptionPolicy::None,
        tags: HashMap::new(),
    }
}

pub fn subscription_product(id: &str, price: u64) -> Product {
    let mut p = product(id, price);
    p.variants.push(Variant {
        id: format!("var_{id}_2"),
        name: "24oz".to_string(),
        price: price * 2,
    });
    p.subscription = SubscriptionPolicy::Required;
    p
}

pub fn address(id: &str) -> Address {
    Address {
        id: id.to_string(),
        name: "Ada Lovelace".to_string(),
        street1: "123 Main St".to_string(),
        street2: String::new(),
        city: "Springfield".to_string(),
        province: "IL".to_string(),
        country: "US".to_string(),
        zip: "62704".to_string(),
        phone: String::new(),
    }
}

pub fn card(id: &str) -> Card {
    Card {
        id: id.to_string(),
        brand: "Visa".to_string(),
        last4: "4242".to_string(),
        expiration: CardExpiration { month: 12, year: 2030 },
    }
}

pub fn cart_item(variant_id: &str, quantity: u32, subtotal: u64) -> CartItem {
    CartItem {
        id: format!("itm_{variant_id}"),
        product_variant_id: variant_id.to_string(),
        quantity,
        subtotal,
    }
}

/// A signed-in session: two products, one cart item, nothing else saved.
pub fn snapshot() -> SessionSnapshot {
    let mut snapshot = SessionSnapshot {
        user: User {
            id: "usr_1".to_string(),
            name: "Ada Lovelace".to_string(),
            email: "ada@example.com".to_string(),
        },
        products: vec![product("espresso", 2200), product("filter", 1800)],
        ..SessionSnapshot::default()
    };
    snapshot.cart.items = vec![cart_item("var_espresso", 1, 2200)];
    snapshot.cart.amount.subtotal = 2200;
    snapshot
}

/// Drive a fresh model through sign-in and the initial load, landing on the
/// shop page.
pub fn model_at_shop(snapshot: SessionSnapshot) -> Model {
    let (model, boot) = Model::new();
    assert_eq!(boot, vec![Command::Authenticate]);

    let (model, commands) = model.update(&Msg::SignedIn {
        access_token: "tok_test".to_string(),
    });
    assert!(commands.contains(&Command::LoadSession));
    assert!(commands.contains(&Command::SplashDelay));

    let (model, _) = model.update(&Msg::SessionLoaded(snapshot));
    let (model, _) = model.update(&Msg::SplashDelayElapsed);
    assert_eq!(model.page, Page::Shop);
    model
}
