//! State-machine invariants: cursor clamping, two-step deletion, the
//! submitting latch, and the cart's stale-result guard.

mod common;

use common::*;
use crossterm::event::KeyCode;
use kiosk::api::Cart;
use kiosk::ui::pages::shipping::AddressMode;
use kiosk::{Command, Model, Msg, Page};
use proptest::prelude::*;

fn model_at_shipping(address_count: usize) -> Model {
    let mut snapshot = snapshot();
    snapshot.addresses = (0..address_count)
        .map(|i| address(&format!("shp_{i}")))
        .collect();
    let model = model_at_shop(snapshot);
    let (model, _) = press_char(model, 'c');
    assert_eq!(model.page, Page::Cart);
    let (model, _) = press(model, KeyCode::Enter);
    assert_eq!(model.page, Page::Shipping);
    model
}

proptest! {
    /// Any sequence of list-mode keys leaves the cursor within [0, len],
    /// the upper bound being the "add address" sentinel row.
    #[test]
    fn shipping_cursor_stays_in_bounds(
        keys in proptest::collection::vec(0u8..6, 0..40),
        address_count in 1usize..4,
    ) {
        let mut model = model_at_shipping(address_count);
        for k in keys {
            let code = match k {
                0 => KeyCode::Down,
                1 => KeyCode::Up,
                2 => KeyCode::Char('j'),
                3 => KeyCode::Char('k'),
                4 => KeyCode::Char('x'),
                _ => KeyCode::Char('n'),
            };
            model = press(model, code).0;
        }
        prop_assert!(model.state.shipping.selected <= model.addresses.len());
    }
}

#[test]
fn empty_address_book_opens_in_form_mode() {
    let model = model_at_shipping(0);
    assert_eq!(model.state.shipping.mode, AddressMode::Form);
}

#[test]
fn saved_addresses_open_in_list_mode() {
    let model = model_at_shipping(2);
    assert_eq!(model.state.shipping.mode, AddressMode::List);
}

#[test]
fn armed_deletion_survives_unrelated_keys() {
    let model = model_at_shipping(2);
    let (model, _) = press_char(model, 'x');
    assert_eq!(model.state.shipping.deleting, Some(0));

    let mut model = model;
    for code in [
        KeyCode::Char('z'),
        KeyCode::Char('1'),
        KeyCode::Char('j'),
        KeyCode::Char('k'),
        KeyCode::Tab,
        KeyCode::Down,
    ] {
        let (next, commands) = press(model, code);
        assert!(commands.is_empty());
        model = next;
        assert_eq!(model.state.shipping.deleting, Some(0), "still armed after {code:?}");
        assert_eq!(model.state.shipping.selected, 0, "cursor frozen while armed");
    }
}

#[test]
fn confirming_deletion_issues_delete_plus_refetch() {
    let model = model_at_shipping(2);
    let (model, _) = press_char(model, 'x');
    let (model, commands) = press_char(model, 'y');
    assert_eq!(
        commands,
        vec![
            Command::DeleteAddress {
                address_id: "shp_0".to_string()
            },
            Command::FetchAddresses,
        ]
    );
    assert_eq!(model.state.shipping.deleting, None);
}

#[test]
fn n_and_esc_disarm_deletion() {
    let model = model_at_shipping(2);
    let (model, _) = press_char(model, 'x');
    let (model, commands) = press_char(model, 'n');
    assert!(commands.is_empty());
    assert_eq!(model.state.shipping.deleting, None);

    let (model, _) = press_char(model, 'x');
    let (model, _) = press(model, KeyCode::Esc);
    assert_eq!(model.state.shipping.deleting, None);
    // the first esc only disarms; the page stays put
    assert_eq!(model.page, Page::Shipping);
}

#[test]
fn deletion_cannot_arm_on_the_sentinel_row() {
    let model = model_at_shipping(1);
    let (model, _) = press(model, KeyCode::Down); // onto "add address"
    assert_eq!(model.state.shipping.selected, 1);
    let (model, _) = press_char(model, 'x');
    assert_eq!(model.state.shipping.deleting, None);
}

#[test]
fn submitting_form_ignores_second_completion() {
    // no saved addresses: shipping opens straight into the form
    let model = model_at_shipping(0);

    // name and country are prefilled; walk the remaining fields
    let model = press(model, KeyCode::Enter).0; // name
    let model = fill_field(model, "123 Main St"); // street 1
    let model = press(model, KeyCode::Enter).0; // street 2 (optional)
    let model = fill_field(model, "Springfield"); // city
    let model = fill_field(model, "IL"); // state
    let model = press(model, KeyCode::Enter).0; // country (prefilled US)
    let model = press(model, KeyCode::Enter).0; // phone (optional)

    // typing the zip then enter completes the form
    let mut model = model;
    for c in "62704".chars() {
        model = press_char(model, c).0;
    }
    let (model, commands) = press(model, KeyCode::Enter);
    assert_eq!(commands.len(), 1);
    assert!(matches!(commands[0], Command::CreateAddress(_)));
    assert!(model.state.shipping.submitting);

    // a second completion signal while submitting must not fire again
    let (model, commands) = press(model, KeyCode::Enter);
    assert!(commands.is_empty());
    assert!(model.state.shipping.submitting);
}

#[test]
fn stale_cart_update_is_dropped_matching_is_applied() {
    let model = model_at_shop(snapshot());

    // two quick quantity bumps issue two tokenized updates
    let (model, commands) = press_char(model, '+');
    assert_eq!(
        commands,
        vec![Command::SetCartItem {
            variant_id: "var_espresso".to_string(),
            quantity: 2,
            seq: 1,
        }]
    );
    let (model, commands) = press_char(model, '+');
    assert_eq!(
        commands,
        vec![Command::SetCartItem {
            variant_id: "var_espresso".to_string(),
            quantity: 3,
            seq: 2,
        }]
    );
    assert_eq!(model.cart.quantity_of("var_espresso"), 3);

    // the first update's echo arrives late: stale, must not land
    let mut stale = Cart::default();
    stale.items = vec![cart_item("var_espresso", 2, 4400)];
    let (model, _) = model.update(&Msg::CartUpdated { seq: 1, cart: stale });
    assert_eq!(model.cart.quantity_of("var_espresso"), 3);

    // the second update's echo matches the latest token and lands
    let mut fresh = Cart::default();
    fresh.items = vec![kiosk::api::CartItem {
        id: "itm_server".to_string(),
        product_variant_id: "var_espresso".to_string(),
        quantity: 3,
        subtotal: 6600,
    }];
    let (model, _) = model.update(&Msg::CartUpdated { seq: 2, cart: fresh });
    assert_eq!(model.cart.items[0].id, "itm_server");
    assert_eq!(model.cart.quantity_of("var_espresso"), 3);
}

#[test]
fn minus_at_zero_issues_nothing() {
    let mut snapshot = snapshot();
    snapshot.cart = Cart::default();
    let model = model_at_shop(snapshot);
    let (_, commands) = press_char(model, '-');
    assert!(commands.is_empty());
}

#[test]
fn orders_cursor_clamps_at_both_ends() {
    let mut snapshot = snapshot();
    snapshot.orders = vec![]; // empty history first
    let model = model_at_shop(snapshot);
    let (model, _) = press_char(model, 'a');
    assert_eq!(model.page, Page::Account);

    // focus order history and mash navigation keys
    let (model, _) = press(model, KeyCode::Enter);
    let mut model = model;
    for _ in 0..5 {
        model = press(model, KeyCode::Down).0;
    }
    assert_eq!(model.state.orders.selected, 0);
    for _ in 0..5 {
        model = press(model, KeyCode::Up).0;
    }
    assert_eq!(model.state.orders.selected, 0);
}
