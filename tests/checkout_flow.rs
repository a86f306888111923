//! End-to-end walks through the checkout chain: cart → shipping → payment
//! → confirm → receipt, for both cart orders and subscriptions, plus the
//! fault reroutes.

mod common;

use common::*;
use crossterm::event::KeyCode;
use kiosk::api::{Order, OrderAmount};
use kiosk::ui::pages::payment::CardMode;
use kiosk::{Command, Fault, Msg, Page};

fn order(id: &str) -> Order {
    Order {
        id: id.to_string(),
        created: chrono::Utc::now(),
        items: vec![],
        amount: OrderAmount {
            subtotal: 2200,
            shipping: 500,
        },
    }
}

#[test]
fn full_order_flow_with_saved_details() {
    let mut snapshot = snapshot();
    snapshot.addresses = vec![address("shp_1")];
    snapshot.cards = vec![card("crd_1")];
    let model = model_at_shop(snapshot);

    // into the cart, then checkout
    let (model, _) = press_char(model, 'c');
    assert_eq!(model.page, Page::Cart);
    let (model, _) = press(model, KeyCode::Enter);
    assert_eq!(model.page, Page::Shipping);

    // pick the saved address; the cart is pointed at it asynchronously
    let (model, commands) = press(model, KeyCode::Enter);
    assert_eq!(
        commands,
        vec![Command::SetCartAddress {
            address_id: "shp_1".to_string()
        }]
    );
    assert!(model.state.shipping.submitting);
    assert_eq!(model.page, Page::Shipping);

    let (model, commands) = model.update(&Msg::CartAddressSet {
        address_id: "shp_1".to_string(),
    });
    assert_eq!(model.page, Page::Payment);
    assert!(commands.contains(&Command::FetchCart));
    assert_eq!(model.cart.address_id.as_deref(), Some("shp_1"));

    // pick the saved card
    let (model, commands) = press(model, KeyCode::Enter);
    assert_eq!(
        commands,
        vec![Command::SetCartCard {
            card_id: "crd_1".to_string()
        }]
    );
    let (model, commands) = model.update(&Msg::CartCardSet {
        card_id: "crd_1".to_string(),
    });
    assert_eq!(model.page, Page::Confirm);
    assert!(commands.is_empty());

    // place the order
    let (model, commands) = press(model, KeyCode::Enter);
    assert_eq!(commands, vec![Command::PlaceOrder]);
    assert!(model.state.confirm.submitting);

    // a second enter while submitting must not double-submit
    let (model, commands) = press(model, KeyCode::Enter);
    assert!(commands.is_empty());

    let (model, commands) = model.update(&Msg::OrderPlaced(order("ord_1")));
    assert_eq!(model.page, Page::Receipt);
    assert!(commands.contains(&Command::FetchCart));
    assert!(commands.contains(&Command::FetchOrders));
    assert_eq!(model.state.receipt.order_id.as_deref(), Some("ord_1"));

    let (model, _) = press(model, KeyCode::Enter);
    assert_eq!(model.page, Page::Shop);
}

#[test]
fn esc_walks_the_chain_backwards() {
    let mut snapshot = snapshot();
    snapshot.addresses = vec![address("shp_1")];
    let model = model_at_shop(snapshot);

    let (model, _) = press_char(model, 'c');
    let (model, _) = press(model, KeyCode::Enter);
    assert_eq!(model.page, Page::Shipping);
    let (model, _) = press(model, KeyCode::Esc);
    assert_eq!(model.page, Page::Cart);
    let (model, _) = press(model, KeyCode::Esc);
    assert_eq!(model.page, Page::Shop);
}

#[test]
fn new_card_goes_through_the_tokenizer() {
    let mut snapshot = snapshot();
    snapshot.addresses = vec![address("shp_1")];
    // no saved cards: payment opens straight into the form
    let model = model_at_shop(snapshot);

    let (model, _) = press_char(model, 'c');
    let (model, _) = press(model, KeyCode::Enter);
    let (model, _) = press(model, KeyCode::Enter);
    let (model, _) = model.update(&Msg::CartAddressSet {
        address_id: "shp_1".to_string(),
    });
    assert_eq!(model.page, Page::Payment);
    assert_eq!(model.state.payment.mode, CardMode::Form);

    // name and email are prefilled from the profile
    let model = press(model, KeyCode::Enter).0;
    let model = press(model, KeyCode::Enter).0;
    let model = fill_field(model, "4242 4242 4242 4242");
    let model = fill_field(model, "12");
    let model = fill_field(model, "30");
    let model = fill_field(model, "123");
    let (model, commands) = {
        let mut model = model;
        for c in "90210".chars() {
            model = press_char(model, c).0;
        }
        press(model, KeyCode::Enter)
    };

    assert_eq!(commands.len(), 2);
    assert!(matches!(commands[0], Command::TokenizeCard(_)));
    assert!(matches!(commands[1], Command::UpdateProfile { .. }));
    assert!(model.state.payment.submitting);

    // token comes back, then the created card is set on the cart
    let (model, commands) = model.update(&Msg::CardTokenized {
        token: "tok_abc".to_string(),
    });
    assert_eq!(
        commands,
        vec![Command::CreateCard {
            token: "tok_abc".to_string()
        }]
    );
    let (model, commands) = model.update(&Msg::CardCreated {
        card_id: "crd_9".to_string(),
        cards: vec![card("crd_9")],
    });
    assert_eq!(
        commands,
        vec![Command::SetCartCard {
            card_id: "crd_9".to_string()
        }]
    );
    let (model, _) = model.update(&Msg::CartCardSet {
        card_id: "crd_9".to_string(),
    });
    assert_eq!(model.page, Page::Confirm);
}

#[test]
fn confirm_failure_reroutes_to_shipping_with_message() {
    let mut snapshot = snapshot();
    snapshot.addresses = vec![address("shp_1")];
    snapshot.cards = vec![card("crd_1")];
    let model = model_at_shop(snapshot);

    let (model, _) = press_char(model, 'c');
    let (model, _) = press(model, KeyCode::Enter);
    let (model, _) = press(model, KeyCode::Enter);
    let (model, _) = model.update(&Msg::CartAddressSet {
        address_id: "shp_1".to_string(),
    });
    let (model, _) = press(model, KeyCode::Enter);
    let (model, _) = model.update(&Msg::CartCardSet {
        card_id: "crd_1".to_string(),
    });
    let (model, _) = press(model, KeyCode::Enter);
    assert!(model.state.confirm.submitting);

    let (model, commands) = model.update(&Msg::Failed(Fault::new("card was declined")));
    assert_eq!(model.page, Page::Shipping);
    assert!(commands.is_empty());
    assert!(!model.state.confirm.submitting);
    assert_eq!(
        model.state.shipping.error.as_deref(),
        Some("card was declined")
    );
}

#[test]
fn fault_on_the_shop_page_raises_the_overlay() {
    let model = model_at_shop(snapshot());
    let (model, _) = model.update(&Msg::Failed(Fault::new("session expired")));
    assert_eq!(
        model.overlay.as_ref().map(|f| f.message.as_str()),
        Some("session expired")
    );
    // esc dismisses the overlay without leaving the page
    let (model, _) = press(model, KeyCode::Esc);
    assert!(model.overlay.is_none());
    assert_eq!(model.page, Page::Shop);
}

#[test]
fn subscription_flow_skips_the_cart() {
    let mut snapshot = snapshot();
    snapshot.products = vec![subscription_product("cron", 2500)];
    snapshot.cart = Default::default();
    snapshot.addresses = vec![address("shp_1")];
    snapshot.cards = vec![card("crd_1")];
    let model = model_at_shop(snapshot);

    // enter on a subscription-only product opens the variant picker
    let (model, _) = press(model, KeyCode::Enter);
    assert_eq!(model.page, Page::Subscribe);
    assert!(model.is_subscribing());

    // pick the second variant
    let (model, _) = press(model, KeyCode::Down);
    let (model, _) = press(model, KeyCode::Enter);
    assert_eq!(model.page, Page::Shipping);

    // choosing an address stores it on the target; no cart command fires
    let (model, commands) = press(model, KeyCode::Enter);
    assert!(commands.is_empty());
    assert_eq!(model.page, Page::Payment);

    let (model, commands) = press(model, KeyCode::Enter);
    assert!(commands.is_empty());
    assert_eq!(model.page, Page::Confirm);

    let (model, commands) = press(model, KeyCode::Enter);
    assert_eq!(commands.len(), 1);
    match &commands[0] {
        Command::CreateSubscription(draft) => {
            assert_eq!(draft.product_variant_id, "var_cron_2");
            assert_eq!(draft.quantity, 1);
            assert_eq!(draft.address_id, "shp_1");
            assert_eq!(draft.card_id, "crd_1");
        }
        other => panic!("expected CreateSubscription, got {other:?}"),
    }

    let (model, commands) = model.update(&Msg::SubscriptionCreated(kiosk::api::Subscription {
        id: "sub_1".to_string(),
        product_variant_id: "var_cron_2".to_string(),
        quantity: 1,
        address_id: "shp_1".to_string(),
        card_id: "crd_1".to_string(),
    }));
    assert_eq!(model.page, Page::Receipt);
    assert!(commands.contains(&Command::FetchSubscriptions));
    assert!(model.state.receipt.subscription);

    // leaving the receipt clears the subscribe target
    let (model, _) = press(model, KeyCode::Enter);
    assert_eq!(model.page, Page::Shop);
    assert!(!model.is_subscribing());
}

#[test]
fn subscription_cancel_is_two_step() {
    let mut snapshot = snapshot();
    snapshot.subscriptions = vec![kiosk::api::Subscription {
        id: "sub_1".to_string(),
        product_variant_id: "var_espresso".to_string(),
        quantity: 1,
        address_id: String::new(),
        card_id: String::new(),
    }];
    let model = model_at_shop(snapshot);

    let (model, _) = press_char(model, 'a');
    assert_eq!(model.page, Page::Account);
    // move to the subscriptions entry and focus it
    let (model, _) = press(model, KeyCode::Down);
    let (model, _) = press(model, KeyCode::Enter);
    assert!(model.state.account.focused);

    let (model, _) = press_char(model, 'x');
    assert_eq!(model.state.subscriptions.deleting, Some(0));
    let (model, commands) = press_char(model, 'y');
    assert_eq!(
        commands,
        vec![
            Command::CancelSubscription {
                subscription_id: "sub_1".to_string()
            },
            Command::FetchSubscriptions,
        ]
    );
    // the list is about to empty; focus returns to the account menu
    assert!(!model.state.account.focused);
    assert_eq!(model.state.subscriptions.deleting, None);
}
