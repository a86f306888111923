//! Confirm page: the read-only order summary and the final `enter`.
//!
//! `enter` fires the one-shot convert-cart command (or create-subscription
//! in the subscribe flow). A failure walks back to shipping with the
//! message; success lands on the receipt.

use crossterm::event::KeyCode;
use ratatui::text::{Line, Span, Text};

use crate::api::SubscriptionDraft;
use crate::ui::command::Command;
use crate::ui::model::{Hint, Model};
use crate::ui::msg::Msg;
use crate::ui::page::Page;
use crate::ui::pages::{payment, receipt, shipping};
use crate::ui::widgets::spinner_dots;
use crate::util::format_usd;

#[derive(Debug, Clone, Default)]
pub struct ConfirmState {
    pub submitting: bool,
    pub error: Option<String>,
}

pub fn enter(mut m: Model) -> (Model, Vec<Command>) {
    m = m.switch(Page::Confirm);
    m.state.confirm.submitting = false;
    m.state.confirm.error = None;
    m.footer = vec![
        Hint { key: "enter", action: "place order" },
        Hint { key: "esc", action: "back" },
    ];
    (m, Vec::new())
}

pub fn update(mut m: Model, msg: &Msg) -> (Model, Vec<Command>) {
    match msg {
        Msg::OrderPlaced(order) => {
            m.state.receipt.order_id = Some(order.id.clone());
            m.state.receipt.subscription = false;
            let (m, mut commands) = receipt::enter(m);
            commands.push(Command::FetchCart);
            commands.push(Command::FetchOrders);
            return (m, commands);
        }
        Msg::SubscriptionCreated(_) => {
            m.state.receipt.order_id = None;
            m.state.receipt.subscription = true;
            let (m, mut commands) = receipt::enter(m);
            commands.push(Command::FetchSubscriptions);
            return (m, commands);
        }
        Msg::Failed(fault) => {
            m.state.confirm.submitting = false;
            let message = fault.message.clone();
            let (mut m, commands) = shipping::enter(m);
            m.state.shipping.error = Some(message);
            return (m, commands);
        }
        Msg::Key(key) => match key.code {
            KeyCode::Esc => return payment::enter(m),
            KeyCode::Enter => {
                if m.state.confirm.submitting {
                    return (m, Vec::new());
                }
                let command = match (m.subscribe_selection(), m.state.subscribe.target.as_ref()) {
                    (Some((_, variant)), Some(target)) => {
                        Command::CreateSubscription(SubscriptionDraft {
                            product_variant_id: variant.id.clone(),
                            quantity: 1,
                            address_id: target.address_id.clone().unwrap_or_default(),
                            card_id: target.card_id.clone().unwrap_or_default(),
                        })
                    }
                    _ => Command::PlaceOrder,
                };
                m.state.confirm.submitting = true;
                return (m, vec![command]);
            }
            _ => {}
        },
        _ => {}
    }
    (m, Vec::new())
}

pub fn view(m: &Model) -> Text<'static> {
    if m.state.confirm.submitting {
        return Text::from(Line::from(format!(
            "submitting order{}",
            spinner_dots(m.frame)
        )));
    }

    let mut lines: Vec<Line> = Vec::new();

    if let Some((product, variant)) = m.subscribe_selection() {
        lines.push(Line::from(Span::styled(
            format!("{}: {}", product.name, variant.name),
            m.theme.accent(),
        )));
        lines.push(Line::from("Monthly Subscription".to_string()));
        lines.push(Line::default());
    }

    match m.selected_address() {
        Some(address) => {
            lines.push(Line::from(address.name.clone()));
            lines.push(Line::from(address.street1.clone()));
            if !address.street2.is_empty() {
                lines.push(Line::from(address.street2.clone()));
            }
            lines.push(Line::from(format!(
                "{}, {}, {} {}",
                address.city, address.province, address.country, address.zip
            )));
        }
        None => lines.push(Line::from(Span::styled(
            "no address selected".to_string(),
            m.theme.error(),
        ))),
    }

    if !m.is_subscribing() {
        if let Some(rate) = &m.cart.shipping {
            lines.push(Line::default());
            lines.push(Line::from(rate.service.clone()));
            if !rate.timeframe.is_empty() {
                lines.push(Line::from(rate.timeframe.clone()));
            }
        }
    }

    lines.push(Line::default());
    match m.selected_card() {
        Some(card) => lines.push(Line::from(format!("CC: **** **** **** {}", card.last4))),
        None => lines.push(Line::from(Span::styled(
            "no payment method selected".to_string(),
            m.theme.error(),
        ))),
    }

    let (subtotal, shipping_cost) = m.checkout_amounts();
    lines.push(Line::from(format!("Subtotal: {}", format_usd(subtotal))));
    lines.push(Line::from(format!("Shipping: {}", format_usd(shipping_cost))));
    lines.push(Line::from(Span::styled(
        format!("Total:    {}", format_usd(subtotal + shipping_cost)),
        m.theme.accent(),
    )));
    lines.push(Line::default());
    lines.push(Line::from(Span::styled(
        " press enter to confirm ".to_string(),
        m.theme.button(),
    )));
    if let Some(error) = &m.state.confirm.error {
        lines.push(Line::default());
        lines.push(Line::from(Span::styled(error.clone(), m.theme.error())));
    }
    Text::from(lines)
}
