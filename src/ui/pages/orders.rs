//! Order history, hosted by the account page. Read-only.

use crossterm::event::KeyCode;
use ratatui::text::{Line, Span};
use unicode_width::UnicodeWidthStr;

use crate::api::{find_variant, Order, OrderItem};
use crate::ui::command::Command;
use crate::ui::model::Model;
use crate::ui::msg::Msg;
use crate::ui::widgets::boxed;
use crate::util::format_usd;

#[derive(Debug, Clone, Copy, Default)]
pub struct OrdersState {
    pub selected: usize,
}

pub fn update(mut m: Model, msg: &Msg) -> (Model, Vec<Command>) {
    let Msg::Key(key) = msg else {
        return (m, Vec::new());
    };
    match key.code {
        KeyCode::Down | KeyCode::Tab | KeyCode::Char('j') => {
            let max = m.orders.len().saturating_sub(1);
            m.state.orders.selected = (m.state.orders.selected + 1).min(max);
        }
        KeyCode::Up | KeyCode::BackTab | KeyCode::Char('k') => {
            m.state.orders.selected = m.state.orders.selected.saturating_sub(1);
        }
        _ => {}
    }
    (m, Vec::new())
}

fn format_item(m: &Model, item: &OrderItem) -> String {
    let name = find_variant(&m.products, &item.product_variant_id)
        .map(|(p, _)| p.name.clone())
        .unwrap_or_else(|| item.product_variant_id.clone());
    format!("{}x {}", item.quantity, name)
}

fn format_order(m: &Model, order: &Order, number: usize, width: usize) -> Vec<Line<'static>> {
    let heading = format!("Order #{number}");
    let price = format_usd(order.amount.subtotal + order.amount.shipping);
    let pad = width.saturating_sub(
        UnicodeWidthStr::width(heading.as_str()) + UnicodeWidthStr::width(price.as_str()) + 4,
    );
    let mut lines = vec![Line::from(vec![
        Span::styled(heading, m.theme.accent()),
        Span::raw(" ".repeat(pad)),
        Span::raw(price),
    ])];
    lines.push(Line::from(Span::styled(
        order.created.format("%b %d, %Y").to_string(),
        m.theme.muted(),
    )));
    for item in &order.items {
        lines.push(Line::from(format_item(m, item)));
    }
    lines
}

pub fn view(m: &Model, width: usize, focused: bool) -> Vec<Line<'static>> {
    if m.orders.is_empty() {
        return vec![
            Line::default(),
            Line::from(Span::styled(
                "no orders found".to_string(),
                m.theme.muted(),
            )),
        ];
    }
    let mut lines = Vec::new();
    for (i, order) in m.orders.iter().enumerate() {
        // newest orders carry the highest numbers
        let number = m.orders.len() - i;
        let content = format_order(m, order, number, width);
        lines.extend(boxed(
            content,
            width,
            focused && i == m.state.orders.selected,
            &m.theme,
        ));
    }
    lines
}
