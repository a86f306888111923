//! Receipt page: the post-checkout acknowledgment.

use crossterm::event::KeyCode;
use ratatui::text::{Line, Span, Text};

use crate::ui::command::Command;
use crate::ui::model::{Hint, Model};
use crate::ui::msg::Msg;
use crate::ui::page::Page;
use crate::ui::pages::shop;

#[derive(Debug, Clone, Default)]
pub struct ReceiptState {
    pub order_id: Option<String>,
    pub subscription: bool,
}

pub fn enter(mut m: Model) -> (Model, Vec<Command>) {
    m = m.switch(Page::Receipt);
    m.footer = vec![Hint {
        key: "enter",
        action: "keep shopping",
    }];
    (m, Vec::new())
}

pub fn update(mut m: Model, msg: &Msg) -> (Model, Vec<Command>) {
    let Msg::Key(key) = msg else {
        return (m, Vec::new());
    };
    match key.code {
        KeyCode::Enter | KeyCode::Esc => {
            // the checkout chain is done; drop any subscribe target
            m.state.subscribe.target = None;
            shop::enter(m)
        }
        _ => (m, Vec::new()),
    }
}

pub fn view(m: &Model) -> Text<'static> {
    let mut lines = vec![Line::default()];
    let headline = if m.state.receipt.subscription {
        "✓ subscription started"
    } else {
        "✓ order placed"
    };
    lines.push(Line::from(Span::styled(
        headline.to_string(),
        m.theme.accent(),
    )));
    lines.push(Line::default());
    if let Some(order_id) = &m.state.receipt.order_id {
        lines.push(Line::from(Span::styled(
            format!("order {order_id}"),
            m.theme.muted(),
        )));
    }
    if !m.user.email.is_empty() {
        lines.push(Line::from(format!(
            "a confirmation is on its way to {}",
            m.user.email
        )));
    }
    lines.push(Line::default());
    lines.push(Line::from(vec![
        Span::styled("enter ".to_string(), m.theme.accent()),
        Span::raw("keep shopping".to_string()),
    ]));
    Text::from(lines)
}
