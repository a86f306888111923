//! Cart page: line items, quantity tweaks, and the road to checkout.

use crossterm::event::KeyCode;
use ratatui::text::{Line, Span, Text};
use unicode_width::UnicodeWidthStr;

use crate::api::find_variant;
use crate::ui::command::Command;
use crate::ui::model::{Hint, Model};
use crate::ui::msg::Msg;
use crate::ui::page::Page;
use crate::ui::pages::{shipping, shop};
use crate::util::format_usd;

#[derive(Debug, Clone, Copy, Default)]
pub struct CartState {
    pub selected: usize,
    /// Sequence token attached to in-flight quantity updates. A result
    /// carrying an older token is stale and must not land.
    pub last_seq: u64,
}

impl CartState {
    pub fn bump_seq(&mut self) -> u64 {
        self.last_seq += 1;
        self.last_seq
    }
}

pub fn enter(mut m: Model) -> (Model, Vec<Command>) {
    m = m.switch(Page::Cart);
    m.footer = vec![
        Hint { key: "↑/↓", action: "items" },
        Hint { key: "+/-", action: "qty" },
        Hint { key: "enter", action: "checkout" },
        Hint { key: "esc", action: "back" },
    ];
    let max = m.cart.items.len().saturating_sub(1);
    m.state.cart.selected = m.state.cart.selected.min(max);
    (m, Vec::new())
}

/// Issue a sequence-tokenized quantity update, mirroring it locally so the
/// UI tracks the keypress before the server echoes back.
pub(crate) fn adjust_quantity(
    mut m: Model,
    variant_id: &str,
    delta: i64,
) -> (Model, Vec<Command>) {
    let current = m.cart.quantity_of(variant_id) as i64;
    let next = (current + delta).max(0) as u32;
    if next as i64 == current {
        return (m, Vec::new());
    }
    let seq = m.state.cart.bump_seq();
    m.apply_local_quantity(variant_id, next);
    (
        m,
        vec![Command::SetCartItem {
            variant_id: variant_id.to_string(),
            quantity: next,
            seq,
        }],
    )
}

pub fn update(mut m: Model, msg: &Msg) -> (Model, Vec<Command>) {
    let Msg::Key(key) = msg else {
        return (m, Vec::new());
    };
    let selected_variant = m
        .cart
        .items
        .get(m.state.cart.selected)
        .map(|i| i.product_variant_id.clone());

    match key.code {
        KeyCode::Down | KeyCode::Tab | KeyCode::Char('j') => {
            let max = m.cart.items.len().saturating_sub(1);
            m.state.cart.selected = (m.state.cart.selected + 1).min(max);
        }
        KeyCode::Up | KeyCode::BackTab | KeyCode::Char('k') => {
            m.state.cart.selected = m.state.cart.selected.saturating_sub(1);
        }
        KeyCode::Right | KeyCode::Char('+') | KeyCode::Char('=') | KeyCode::Char('l') => {
            if let Some(variant_id) = selected_variant {
                return adjust_quantity(m, &variant_id, 1);
            }
        }
        KeyCode::Left | KeyCode::Char('-') | KeyCode::Char('h') => {
            if let Some(variant_id) = selected_variant {
                return adjust_quantity(m, &variant_id, -1);
            }
        }
        KeyCode::Enter => {
            if !m.cart.is_empty() {
                return shipping::enter(m);
            }
        }
        KeyCode::Esc => return shop::enter(m),
        _ => {}
    }
    (m, Vec::new())
}

pub fn view(m: &Model) -> Text<'static> {
    let width = m.content_width();
    if m.cart.is_empty() {
        return Text::from(vec![
            Line::default(),
            Line::from(Span::styled(
                "your cart is empty".to_string(),
                m.theme.muted(),
            )),
            Line::default(),
            Line::from(vec![
                Span::styled("esc ".to_string(), m.theme.accent()),
                Span::raw("back to the shop".to_string()),
            ]),
        ]);
    }

    let mut lines = Vec::new();
    for (i, item) in m.cart.items.iter().enumerate() {
        let name = find_variant(&m.products, &item.product_variant_id)
            .map(|(p, v)| format!("{} ({})", p.name, v.name.to_lowercase()))
            .unwrap_or_else(|| item.product_variant_id.clone());
        let left = format!("{}x {}", item.quantity, name);
        let price = format_usd(item.subtotal);
        let pad = width.saturating_sub(
            UnicodeWidthStr::width(left.as_str()) + UnicodeWidthStr::width(price.as_str()),
        );
        let style = if i == m.state.cart.selected {
            m.theme.highlight()
        } else {
            m.theme.base()
        };
        lines.push(Line::from(Span::styled(
            format!("{left}{}{price}", " ".repeat(pad)),
            style,
        )));
    }

    lines.push(Line::default());
    let (subtotal, shipping_cost) = (m.cart.amount.subtotal, m.cart.amount.shipping);
    lines.push(Line::from(format!("Subtotal: {}", format_usd(subtotal))));
    if m.cart.address_id.is_some() {
        lines.push(Line::from(format!("Shipping: {}", format_usd(shipping_cost))));
    }
    lines.push(Line::from(Span::styled(
        format!("Total:    {}", format_usd(subtotal + shipping_cost)),
        m.theme.accent(),
    )));
    lines.push(Line::default());
    lines.push(Line::from(vec![
        Span::styled("enter ".to_string(), m.theme.accent()),
        Span::raw("continue to shipping".to_string()),
    ]));
    Text::from(lines)
}
