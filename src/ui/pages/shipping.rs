//! Shipping page: saved addresses plus the new-address form.
//!
//! Two modes. List mode moves a cursor over the saved addresses and a
//! trailing "add address" row; `enter` on an existing address points the
//! cart at it and advances to payment, deletion is a two-step confirm.
//! Form mode runs the field sub-machine until submission, creates the
//! address, re-lists, and then advances the same way. With no saved
//! addresses the page opens directly in form mode.

use crossterm::event::KeyCode;
use ratatui::text::{Line, Span, Text};

use crate::api::{Address, AddressDraft, User};
use crate::ui::command::Command;
use crate::ui::form::{Field, Form, FormOutcome, Rule};
use crate::ui::model::{Hint, Model};
use crate::ui::msg::Msg;
use crate::ui::page::Page;
use crate::ui::pages::{cart, payment, subscribe};
use crate::ui::widgets::{boxed, centered_box, spinner_dots};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AddressMode {
    #[default]
    List,
    Form,
}

#[derive(Debug, Clone, Default)]
pub struct ShippingState {
    pub mode: AddressMode,
    pub selected: usize,
    /// Armed two-step deletion: the index awaiting y/n.
    pub deleting: Option<usize>,
    pub form: Form,
    pub submitting: bool,
    pub error: Option<String>,
}

pub fn enter(mut m: Model) -> (Model, Vec<Command>) {
    m = m.switch(Page::Shipping);
    m.footer = vec![
        Hint { key: "↑/↓", action: "addresses" },
        Hint { key: "x/del", action: "remove" },
        Hint { key: "enter", action: "select" },
        Hint { key: "esc", action: "back" },
    ];
    m.state.shipping.submitting = false;
    m.state.shipping.deleting = None;
    m.state.shipping.mode = if m.addresses.is_empty() {
        AddressMode::Form
    } else {
        AddressMode::List
    };
    m.state.shipping.form = address_form(&m.user);
    (m, Vec::new())
}

fn address_form(user: &User) -> Form {
    Form::new(vec![
        Field::new("name", "name")
            .with_value(&user.name)
            .rule(Rule::Required),
        Field::new("street1", "street 1").rule(Rule::Required),
        Field::new("street2", "street 2"),
        Field::new("city", "city").rule(Rule::Required),
        Field::new("province", "state"),
        Field::new("country", "country")
            .with_value("US")
            .rule(Rule::Required),
        Field::new("phone", "phone"),
        Field::new("zip", "postal code").rule(Rule::Required),
    ])
}

pub fn update(mut m: Model, msg: &Msg) -> (Model, Vec<Command>) {
    match msg {
        Msg::CartAddressSet { address_id } => {
            m.cart.address_id = Some(address_id.clone());
            m.state.shipping.submitting = false;
            let (m, mut commands) = payment::enter(m);
            // totals now include the shipping cost
            commands.push(Command::FetchCart);
            return (m, commands);
        }
        Msg::AddressCreated {
            address_id,
            addresses,
        } => {
            m.addresses = addresses.clone();
            if m.is_subscribing() {
                if let Some(target) = m.state.subscribe.target.as_mut() {
                    target.address_id = Some(address_id.clone());
                }
                m.state.shipping.submitting = false;
                return payment::enter(m);
            }
            return (
                m,
                vec![Command::SetCartAddress {
                    address_id: address_id.clone(),
                }],
            );
        }
        Msg::Failed(fault) => {
            m.state.shipping.submitting = false;
            m.state.shipping.deleting = None;
            m.state.shipping.error = Some(fault.message.clone());
            return (m, Vec::new());
        }
        _ => {}
    }

    match m.state.shipping.mode {
        AddressMode::List => list_update(m, msg),
        AddressMode::Form => form_update(m, msg),
    }
}

fn list_update(mut m: Model, msg: &Msg) -> (Model, Vec<Command>) {
    let Msg::Key(key) = msg else {
        return (m, Vec::new());
    };
    let count = m.addresses.len();
    match key.code {
        KeyCode::Down | KeyCode::Tab | KeyCode::Char('j') => {
            if m.state.shipping.deleting.is_none() {
                m.state.shipping.selected = (m.state.shipping.selected + 1).min(count);
            }
        }
        KeyCode::Up | KeyCode::BackTab | KeyCode::Char('k') => {
            if m.state.shipping.deleting.is_none() {
                m.state.shipping.selected = m.state.shipping.selected.saturating_sub(1);
            }
        }
        KeyCode::Delete | KeyCode::Backspace | KeyCode::Char('x') | KeyCode::Char('d') => {
            if m.state.shipping.deleting.is_none() && m.state.shipping.selected < count {
                m.state.shipping.deleting = Some(m.state.shipping.selected);
            }
        }
        KeyCode::Char('y') => {
            if let Some(index) = m.state.shipping.deleting.take() {
                if let Some(address) = m.addresses.get(index) {
                    let address_id = address.id.clone();
                    return (
                        m,
                        vec![
                            Command::DeleteAddress { address_id },
                            Command::FetchAddresses,
                        ],
                    );
                }
            }
        }
        KeyCode::Char('n') => m.state.shipping.deleting = None,
        KeyCode::Enter => {
            if m.state.shipping.deleting.is_none() {
                return choose(m);
            }
        }
        KeyCode::Esc => {
            if m.state.shipping.deleting.is_some() {
                m.state.shipping.deleting = None;
            } else if m.is_subscribing() {
                return subscribe::reenter(m);
            } else {
                return cart::enter(m);
            }
        }
        _ => {}
    }
    (m, Vec::new())
}

fn choose(mut m: Model) -> (Model, Vec<Command>) {
    if m.state.shipping.selected < m.addresses.len() {
        let address_id = m.addresses[m.state.shipping.selected].id.clone();
        if m.is_subscribing() {
            // subscriptions carry their own destination; nothing to set on
            // the cart
            if let Some(target) = m.state.subscribe.target.as_mut() {
                target.address_id = Some(address_id);
            }
            return payment::enter(m);
        }
        m.state.shipping.submitting = true;
        (m, vec![Command::SetCartAddress { address_id }])
    } else {
        m.state.shipping.form = address_form(&m.user);
        m.state.shipping.error = None;
        m.state.shipping.mode = AddressMode::Form;
        (m, Vec::new())
    }
}

fn form_update(mut m: Model, msg: &Msg) -> (Model, Vec<Command>) {
    let Msg::Key(key) = msg else {
        return (m, Vec::new());
    };
    if key.code == KeyCode::Esc {
        m.state.shipping.mode = AddressMode::List;
        return (m, Vec::new());
    }
    if m.state.shipping.submitting {
        // a submission is in flight; nothing else may fire
        return (m, Vec::new());
    }
    if m.state.shipping.form.update(key) == FormOutcome::Submitted {
        let form = &m.state.shipping.form;
        let draft = AddressDraft {
            name: form.get("name").trim().to_string(),
            street1: form.get("street1").trim().to_string(),
            street2: form.get("street2").trim().to_string(),
            city: form.get("city").trim().to_string(),
            province: form.get("province").trim().to_string(),
            country: form.get("country").trim().to_uppercase(),
            zip: form.get("zip").trim().to_string(),
            phone: form.get("phone").trim().to_string(),
        };
        if draft.country != "US" {
            m.state.shipping.error = Some("we're only shipping to the US, for now".to_string());
            return (m, Vec::new());
        }
        m.state.shipping.error = None;
        m.state.shipping.submitting = true;
        return (m, vec![Command::CreateAddress(draft)]);
    }
    (m, Vec::new())
}

pub fn view(m: &Model) -> Text<'static> {
    if m.state.shipping.submitting {
        return Text::from(Line::from(format!(
            "calculating shipping costs{}",
            spinner_dots(m.frame)
        )));
    }
    match m.state.shipping.mode {
        AddressMode::List => list_view(m),
        AddressMode::Form => form_view(m),
    }
}

fn format_address(m: &Model, address: &Address) -> Vec<Line<'static>> {
    let mut lines = vec![Line::from(Span::styled(
        address.street1.clone(),
        m.theme.accent(),
    ))];
    if !address.street2.is_empty() {
        lines.push(Line::from(address.street2.clone()));
    }
    lines.push(Line::from(format!(
        "{}, {}, {}",
        address.city, address.province, address.country
    )));
    lines.push(Line::from(address.zip.clone()));
    lines
}

fn list_view(m: &Model) -> Text<'static> {
    let width = m.content_width();
    let mut lines = Vec::new();
    if let Some(error) = &m.state.shipping.error {
        lines.push(Line::from(Span::styled(error.clone(), m.theme.error())));
    }
    for (i, address) in m.addresses.iter().enumerate() {
        let content = if m.state.shipping.deleting == Some(i) {
            vec![
                Line::from(Span::styled("are you sure?".to_string(), m.theme.accent())),
                Line::from("(y/n)".to_string()),
            ]
        } else {
            format_address(m, address)
        };
        lines.extend(boxed(
            content,
            width,
            i == m.state.shipping.selected,
            &m.theme,
        ));
    }
    let sentinel = m.addresses.len();
    lines.extend(centered_box(
        "add address",
        width,
        m.state.shipping.selected == sentinel,
        &m.theme,
    ));
    let hint = if m.state.shipping.selected == sentinel {
        "create new address"
    } else {
        "use selected address"
    };
    lines.push(Line::from(vec![
        Span::styled("enter ".to_string(), m.theme.accent()),
        Span::raw(hint.to_string()),
    ]));
    Text::from(lines)
}

fn form_view(m: &Model) -> Text<'static> {
    let mut text = m.state.shipping.form.view(&m.theme);
    if let Some(error) = &m.state.shipping.error {
        text.lines.push(Line::from(Span::styled(
            error.clone(),
            m.theme.error(),
        )));
    }
    text
}
