//! Shop page: the product menu and detail pane.
//!
//! Featured products list ahead of staples. `+`/`-` adjust the cart
//! quantity for the product under the cursor; subscription-only products
//! route through the subscribe flow instead.

use crossterm::event::KeyCode;
use ratatui::text::{Line, Span, Text};
use unicode_width::UnicodeWidthStr;

use crate::ui::command::Command;
use crate::ui::layout::SizeClass;
use crate::ui::model::{Hint, Model};
use crate::ui::msg::Msg;
use crate::ui::page::Page;
use crate::ui::pages::{account, cart, subscribe};
use crate::ui::widgets::{center, join_horizontal, wrap_text};
use crate::util::format_usd;

#[derive(Debug, Clone, Copy, Default)]
pub struct ShopState {
    pub selected: usize,
}

pub fn enter(mut m: Model) -> (Model, Vec<Command>) {
    m = m.switch(Page::Shop);
    let mut hints = vec![
        Hint { key: "+/-", action: "qty" },
        Hint { key: "c", action: "cart" },
        Hint { key: "a", action: "account" },
        Hint { key: "q", action: "quit" },
    ];
    if m.products.len() > 1 {
        hints.insert(
            0,
            Hint {
                key: "↑↓",
                action: "products",
            },
        );
    }
    m.footer = hints;
    m.apply_product_accent();
    (m, Vec::new())
}

pub fn update(mut m: Model, msg: &Msg) -> (Model, Vec<Command>) {
    let Msg::Key(key) = msg else {
        return (m, Vec::new());
    };
    if m.products.is_empty() {
        if key.code == KeyCode::Char('q') {
            m.should_quit = true;
        }
        return (m, Vec::new());
    }

    let product = &m.products[m.state.shop.selected];
    let subscription_only = product.subscription_only();
    let product_id = product.id.clone();
    let variant_id = product
        .variants
        .first()
        .map(|v| v.id.clone())
        .unwrap_or_default();

    match key.code {
        KeyCode::Down | KeyCode::Tab | KeyCode::Char('j') => move_selection(m, 1),
        KeyCode::Up | KeyCode::BackTab | KeyCode::Char('k') => move_selection(m, -1),
        KeyCode::Right | KeyCode::Char('+') | KeyCode::Char('=') | KeyCode::Char('l') => {
            if subscription_only || variant_id.is_empty() {
                (m, Vec::new())
            } else {
                cart::adjust_quantity(m, &variant_id, 1)
            }
        }
        KeyCode::Left | KeyCode::Char('-') | KeyCode::Char('h') => {
            if subscription_only || variant_id.is_empty() {
                (m, Vec::new())
            } else {
                cart::adjust_quantity(m, &variant_id, -1)
            }
        }
        KeyCode::Enter => {
            if subscription_only {
                subscribe::enter(m, &product_id)
            } else {
                cart::enter(m)
            }
        }
        KeyCode::Char('c') => cart::enter(m),
        KeyCode::Char('a') => account::enter(m),
        KeyCode::Char('q') => {
            m.should_quit = true;
            (m, Vec::new())
        }
        _ => (m, Vec::new()),
    }
}

fn move_selection(mut m: Model, delta: i64) -> (Model, Vec<Command>) {
    let max = (m.products.len() - 1) as i64;
    m.state.shop.selected = (m.state.shop.selected as i64 + delta).clamp(0, max) as usize;
    m.apply_product_accent();
    (m, Vec::new())
}

pub fn view(m: &Model) -> Text<'static> {
    if m.products.is_empty() {
        return Text::from(Line::from(Span::styled(
            "no products available".to_string(),
            m.theme.muted(),
        )));
    }

    let width = m.content_width();
    let selected = m.state.shop.selected;
    let featured_count = m.products.iter().filter(|p| p.is_featured()).count();
    let stacked = m.screen.size < SizeClass::Large;

    let mut label_width = m
        .products
        .iter()
        .map(|p| UnicodeWidthStr::width(p.name.as_str()))
        .max()
        .unwrap_or(0);
    if featured_count > 0 {
        label_width = label_width.max("~ featured ~".len()).max("~ staples ~".len());
    }
    let item_width = if stacked { width } else { label_width + 2 };

    let mut menu: Vec<Line> = Vec::new();
    let item_line = |name: &str, highlighted: bool| {
        let text = if stacked {
            center(name, item_width)
        } else {
            format!(" {:<w$} ", name, w = item_width.saturating_sub(2))
        };
        let style = if highlighted {
            m.theme.highlight()
        } else {
            m.theme.base()
        };
        Line::from(Span::styled(text, style))
    };
    let header_line = |label: &str| {
        let text = if stacked {
            center(label, item_width)
        } else {
            format!(" {:<w$} ", label, w = item_width.saturating_sub(2))
        };
        Line::from(Span::styled(text, m.theme.accent()))
    };

    if featured_count > 0 {
        menu.push(header_line("~ featured ~"));
        for (i, p) in m.products.iter().enumerate().take(featured_count) {
            menu.push(item_line(&p.name, i == selected));
        }
        if featured_count < m.products.len() {
            menu.push(Line::default());
            menu.push(header_line("~ staples ~"));
            for (i, p) in m.products.iter().enumerate().skip(featured_count) {
                menu.push(item_line(&p.name, i == selected));
            }
        }
    } else {
        for (i, p) in m.products.iter().enumerate() {
            menu.push(item_line(&p.name, i == selected));
        }
    }

    let product = &m.products[selected];
    let variant_names = product
        .variants
        .iter()
        .map(|v| v.name.to_lowercase())
        .collect::<Vec<_>>()
        .join("/");
    let detail_width = if stacked {
        width
    } else {
        width.saturating_sub(item_width + 2)
    };
    let quantity_line = if product.subscription_only() {
        Line::from(vec![
            Span::styled(" subscribe ".to_string(), m.theme.button()),
            Span::raw(" enter".to_string()),
        ])
    } else {
        let qty = product
            .variants
            .first()
            .map(|v| m.cart.quantity_of(&v.id))
            .unwrap_or(0);
        Line::from(vec![
            Span::raw("- ".to_string()),
            Span::styled(format!(" {qty} "), m.theme.accent()),
            Span::raw(" +".to_string()),
        ])
    };
    let price = product.variants.first().map(|v| v.price).unwrap_or(0);

    let mut detail: Vec<Line> = vec![
        Line::from(Span::styled(product.name.clone(), m.theme.accent())),
        Line::from(Span::styled(variant_names, m.theme.muted())),
        Line::default(),
        Line::from(Span::styled(format_usd(price), m.theme.bold())),
        Line::default(),
    ];
    detail.extend(
        wrap_text(&product.description, detail_width.max(10))
            .into_iter()
            .map(Line::from),
    );
    detail.push(Line::default());
    detail.push(quantity_line);

    let lines = if m.products.len() == 1 {
        detail
    } else if stacked {
        let mut lines = menu;
        lines.push(Line::default());
        lines.extend(detail);
        lines
    } else {
        join_horizontal(menu, detail, 2)
    };
    Text::from(lines)
}
