//! Payment page: saved cards plus the new-card form.
//!
//! Same two-mode shape as shipping. Submitting the form first sends the
//! raw fields to the payment tokenizer; only the opaque token reaches the
//! commerce API. Profile name/email edits ride along with the submission.

use crossterm::event::KeyCode;
use ratatui::text::{Line, Span, Text};
use unicode_width::UnicodeWidthStr;

use crate::api::{Card, CardDraft, User};
use crate::ui::command::Command;
use crate::ui::form::{Field, Form, FormOutcome, Rule};
use crate::ui::model::{Hint, Model};
use crate::ui::msg::Msg;
use crate::ui::page::Page;
use crate::ui::pages::{confirm, shipping};
use crate::ui::widgets::{boxed, centered_box, spinner_dots};
use crate::util::format_usd;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CardMode {
    #[default]
    List,
    Form,
}

#[derive(Debug, Clone, Default)]
pub struct PaymentState {
    pub mode: CardMode,
    pub selected: usize,
    pub deleting: Option<usize>,
    pub form: Form,
    pub submitting: bool,
    pub error: Option<String>,
}

pub fn enter(mut m: Model) -> (Model, Vec<Command>) {
    if m.cart.is_empty() && !m.is_subscribing() {
        return (m, Vec::new());
    }
    m = m.switch(Page::Payment);
    m.footer = vec![
        Hint { key: "↑/↓", action: "cards" },
        Hint { key: "x/del", action: "remove" },
        Hint { key: "enter", action: "select" },
        Hint { key: "esc", action: "back" },
    ];
    m.state.payment.submitting = false;
    m.state.payment.deleting = None;
    m.state.payment.form = card_form(&m.user);
    m.state.payment.mode = if m.cards.is_empty() {
        CardMode::Form
    } else {
        CardMode::List
    };
    (m, Vec::new())
}

fn card_form(user: &User) -> Form {
    Form::new(vec![
        Field::new("name", "name")
            .with_value(&user.name)
            .rule(Rule::Required),
        Field::new("email", "email address")
            .with_value(&user.email)
            .rule(Rule::Required)
            .rule(Rule::Email),
        Field::new("number", "card number")
            .rule(Rule::Required)
            .rule(Rule::CardNumber),
        Field::new("month", "expiry month")
            .rule(Rule::Required)
            .rule(Rule::Digits)
            .rule(Rule::Length(2, 2)),
        Field::new("year", "expiry year")
            .rule(Rule::Required)
            .rule(Rule::Digits)
            .rule(Rule::Length(2, 2)),
        Field::new("cvc", "cvc number")
            .rule(Rule::Required)
            .rule(Rule::Digits)
            .rule(Rule::Length(3, 4)),
        Field::new("zip", "zip").rule(Rule::Required),
    ])
}

fn format_last4(last4: &str) -> String {
    format!("**** **** **** {last4}")
}

fn format_expiration(card: &Card) -> String {
    format!(
        "{:02}/{:02}",
        card.expiration.month,
        card.expiration.year % 100
    )
}

/// Strip the separators people type into card numbers.
fn clean_card_number(number: &str) -> String {
    number.chars().filter(char::is_ascii_digit).collect()
}

pub fn update(mut m: Model, msg: &Msg) -> (Model, Vec<Command>) {
    match msg {
        Msg::CardTokenized { token } => {
            return (
                m,
                vec![Command::CreateCard {
                    token: token.clone(),
                }],
            );
        }
        Msg::CardCreated { card_id, cards } => {
            m.cards = cards.clone();
            if m.is_subscribing() {
                if let Some(target) = m.state.subscribe.target.as_mut() {
                    target.card_id = Some(card_id.clone());
                }
                m.state.payment.submitting = false;
                return confirm::enter(m);
            }
            return (
                m,
                vec![Command::SetCartCard {
                    card_id: card_id.clone(),
                }],
            );
        }
        Msg::CartCardSet { card_id } => {
            m.cart.card_id = Some(card_id.clone());
            m.state.payment.submitting = false;
            return confirm::enter(m);
        }
        Msg::Failed(fault) => {
            m.state.payment.submitting = false;
            m.state.payment.deleting = None;
            m.state.payment.error = Some(fault.message.clone());
            return (m, Vec::new());
        }
        _ => {}
    }

    match m.state.payment.mode {
        CardMode::List => list_update(m, msg),
        CardMode::Form => form_update(m, msg),
    }
}

fn list_update(mut m: Model, msg: &Msg) -> (Model, Vec<Command>) {
    let Msg::Key(key) = msg else {
        return (m, Vec::new());
    };
    let count = m.cards.len();
    match key.code {
        KeyCode::Down | KeyCode::Tab | KeyCode::Char('j') => {
            if m.state.payment.deleting.is_none() {
                m.state.payment.selected = (m.state.payment.selected + 1).min(count);
            }
        }
        KeyCode::Up | KeyCode::BackTab | KeyCode::Char('k') => {
            if m.state.payment.deleting.is_none() {
                m.state.payment.selected = m.state.payment.selected.saturating_sub(1);
            }
        }
        KeyCode::Delete | KeyCode::Backspace | KeyCode::Char('x') | KeyCode::Char('d') => {
            if m.state.payment.deleting.is_none() && m.state.payment.selected < count {
                m.state.payment.deleting = Some(m.state.payment.selected);
            }
        }
        KeyCode::Char('y') => {
            if let Some(index) = m.state.payment.deleting.take() {
                if let Some(card) = m.cards.get(index) {
                    let card_id = card.id.clone();
                    return (
                        m,
                        vec![Command::DeleteCard { card_id }, Command::FetchCards],
                    );
                }
            }
        }
        KeyCode::Char('n') => m.state.payment.deleting = None,
        KeyCode::Enter => {
            if m.state.payment.deleting.is_none() {
                return choose(m);
            }
        }
        KeyCode::Esc => {
            if m.state.payment.deleting.is_some() {
                m.state.payment.deleting = None;
            } else {
                return shipping::enter(m);
            }
        }
        _ => {}
    }
    (m, Vec::new())
}

fn choose(mut m: Model) -> (Model, Vec<Command>) {
    if m.state.payment.selected < m.cards.len() {
        let card_id = m.cards[m.state.payment.selected].id.clone();
        if m.is_subscribing() {
            if let Some(target) = m.state.subscribe.target.as_mut() {
                target.card_id = Some(card_id);
            }
            return confirm::enter(m);
        }
        (m, vec![Command::SetCartCard { card_id }])
    } else {
        m.state.payment.form = card_form(&m.user);
        m.state.payment.error = None;
        m.state.payment.mode = CardMode::Form;
        (m, Vec::new())
    }
}

fn form_update(mut m: Model, msg: &Msg) -> (Model, Vec<Command>) {
    let Msg::Key(key) = msg else {
        return (m, Vec::new());
    };
    if key.code == KeyCode::Esc {
        if m.cards.is_empty() {
            return shipping::enter(m);
        }
        m.state.payment.mode = CardMode::List;
        return (m, Vec::new());
    }
    if m.state.payment.submitting {
        return (m, Vec::new());
    }
    if m.state.payment.form.update(key) == FormOutcome::Submitted {
        let form = &m.state.payment.form;
        let name = form.get("name").trim().to_string();
        let email = form.get("email").trim().to_string();
        let draft = CardDraft {
            name: name.clone(),
            number: clean_card_number(form.get("number")),
            exp_month: form.get("month").to_string(),
            exp_year: form.get("year").to_string(),
            cvc: form.get("cvc").to_string(),
            zip: form.get("zip").trim().to_string(),
        };
        m.user.name = name.clone();
        m.user.email = email.clone();
        m.state.payment.error = None;
        m.state.payment.submitting = true;
        return (
            m,
            vec![
                Command::TokenizeCard(draft),
                Command::UpdateProfile { name, email },
            ],
        );
    }
    (m, Vec::new())
}

pub fn view(m: &Model) -> Text<'static> {
    if m.state.payment.submitting {
        return Text::from(Line::from(format!(
            "verifying payment details{}",
            spinner_dots(m.frame)
        )));
    }
    match m.state.payment.mode {
        CardMode::List => list_view(m),
        CardMode::Form => form_view(m),
    }
}

fn costs_lines(m: &Model) -> Vec<Line<'static>> {
    let (subtotal, shipping_cost) = m.checkout_amounts();
    vec![
        Line::from(format!("Subtotal: {}", format_usd(subtotal))),
        Line::from(format!("Shipping: {}", format_usd(shipping_cost))),
        Line::from(Span::styled(
            format!("Total:    {}", format_usd(subtotal + shipping_cost)),
            m.theme.accent(),
        )),
        Line::default(),
    ]
}

fn list_view(m: &Model) -> Text<'static> {
    let width = m.content_width();
    let mut lines = costs_lines(m);
    if let Some(error) = &m.state.payment.error {
        lines.push(Line::from(Span::styled(error.clone(), m.theme.error())));
    }
    for (i, card) in m.cards.iter().enumerate() {
        let content = if m.state.payment.deleting == Some(i) {
            vec![
                Line::from(Span::styled("are you sure?".to_string(), m.theme.accent())),
                Line::from("(y/n)".to_string()),
            ]
        } else {
            let number = format_last4(&card.last4);
            let number_width = UnicodeWidthStr::width(number.as_str());
            let expiration = format_expiration(card);
            let pad = number_width.saturating_sub(
                UnicodeWidthStr::width(card.brand.as_str())
                    + UnicodeWidthStr::width(expiration.as_str()),
            );
            vec![
                Line::from(Span::styled(number, m.theme.accent())),
                Line::from(vec![
                    Span::raw(card.brand.clone()),
                    Span::raw(" ".repeat(pad)),
                    Span::styled(expiration, m.theme.accent()),
                ]),
            ]
        };
        lines.extend(boxed(
            content,
            width,
            i == m.state.payment.selected,
            &m.theme,
        ));
    }
    let sentinel = m.cards.len();
    lines.extend(centered_box(
        "add payment method",
        width,
        m.state.payment.selected == sentinel,
        &m.theme,
    ));
    let hint = if m.state.payment.selected == sentinel {
        "create new payment method"
    } else {
        "use selected payment method"
    };
    lines.push(Line::from(vec![
        Span::styled("enter ".to_string(), m.theme.accent()),
        Span::raw(hint.to_string()),
    ]));
    Text::from(lines)
}

fn form_view(m: &Model) -> Text<'static> {
    let mut lines = costs_lines(m);
    lines.push(Line::from("create new payment method:".to_string()));
    lines.push(Line::default());
    lines.extend(m.state.payment.form.view(&m.theme).lines);
    if let Some(error) = &m.state.payment.error {
        lines.push(Line::from(Span::styled(error.clone(), m.theme.error())));
    }
    Text::from(lines)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_card_number() {
        assert_eq!(clean_card_number("4242 4242-4242 4242"), "4242424242424242");
    }

    #[test]
    fn test_format_expiration_wraps_year() {
        let card = Card {
            id: "crd_1".to_string(),
            brand: "Visa".to_string(),
            last4: "4242".to_string(),
            expiration: crate::api::CardExpiration {
                month: 4,
                year: 2030,
            },
        };
        assert_eq!(format_expiration(&card), "04/30");
    }
}
