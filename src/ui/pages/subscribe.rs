//! Subscribe page: variant picker for subscription-only products.
//!
//! Entering sets the checkout target to a subscription; the shipping,
//! payment and confirm pages then collect destination and card into the
//! target instead of the cart.

use crossterm::event::KeyCode;
use ratatui::text::{Line, Span, Text};
use unicode_width::UnicodeWidthStr;

use crate::ui::command::Command;
use crate::ui::model::{Hint, Model};
use crate::ui::msg::Msg;
use crate::ui::page::Page;
use crate::ui::pages::{shipping, shop};
use crate::ui::widgets::{boxed, wrap_text};
use crate::util::format_usd;

/// What the subscribe flow is buying, filled in as checkout progresses.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubscribeTarget {
    pub product_id: String,
    pub variant_id: Option<String>,
    pub address_id: Option<String>,
    pub card_id: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct SubscribeState {
    pub target: Option<SubscribeTarget>,
    pub selected: usize,
}

pub fn enter(mut m: Model, product_id: &str) -> (Model, Vec<Command>) {
    m.state.subscribe.target = Some(SubscribeTarget {
        product_id: product_id.to_string(),
        ..SubscribeTarget::default()
    });
    m.state.subscribe.selected = 0;
    reenter(m)
}

/// Return to the variant picker keeping the current target (esc from
/// shipping lands here).
pub fn reenter(mut m: Model) -> (Model, Vec<Command>) {
    m = m.switch(Page::Subscribe);
    m.footer = vec![
        Hint { key: "↑/↓", action: "options" },
        Hint { key: "enter", action: "continue" },
        Hint { key: "esc", action: "back" },
    ];
    (m, Vec::new())
}

pub fn update(mut m: Model, msg: &Msg) -> (Model, Vec<Command>) {
    let Msg::Key(key) = msg else {
        return (m, Vec::new());
    };
    let variant_count = m
        .subscribe_selection()
        .map(|(product, _)| product.variants.len())
        .unwrap_or(0);

    match key.code {
        KeyCode::Down | KeyCode::Tab | KeyCode::Char('j') => {
            let max = variant_count.saturating_sub(1);
            m.state.subscribe.selected = (m.state.subscribe.selected + 1).min(max);
        }
        KeyCode::Up | KeyCode::BackTab | KeyCode::Char('k') => {
            m.state.subscribe.selected = m.state.subscribe.selected.saturating_sub(1);
        }
        KeyCode::Enter => {
            let variant_id = m.subscribe_selection().map(|(_, v)| v.id.clone());
            if let Some(variant_id) = variant_id {
                if let Some(target) = m.state.subscribe.target.as_mut() {
                    target.variant_id = Some(variant_id);
                }
                return shipping::enter(m);
            }
        }
        KeyCode::Esc => {
            m.state.subscribe.target = None;
            return shop::enter(m);
        }
        _ => {}
    }
    (m, Vec::new())
}

pub fn view(m: &Model) -> Text<'static> {
    let width = m.content_width();
    let Some((product, _)) = m.subscribe_selection() else {
        return Text::from(Line::from(Span::styled(
            "nothing to subscribe to".to_string(),
            m.theme.muted(),
        )));
    };

    let mut lines = vec![Line::from(Span::styled(
        product.name.clone(),
        m.theme.accent(),
    ))];
    lines.extend(
        wrap_text(&product.description, width.max(10))
            .into_iter()
            .map(Line::from),
    );
    lines.push(Line::default());

    for (i, variant) in product.variants.iter().enumerate() {
        let price = format!("{}/mo", format_usd(variant.price));
        let pad = width.saturating_sub(
            UnicodeWidthStr::width(variant.name.as_str())
                + UnicodeWidthStr::width(price.as_str())
                + 4,
        );
        let content = vec![Line::from(vec![
            Span::styled(variant.name.clone(), m.theme.accent()),
            Span::raw(" ".repeat(pad)),
            Span::raw(price),
        ])];
        lines.extend(boxed(
            content,
            width,
            i == m.state.subscribe.selected,
            &m.theme,
        ));
    }

    lines.push(Line::from(vec![
        Span::styled("enter ".to_string(), m.theme.accent()),
        Span::raw("continue to shipping".to_string()),
    ]));
    Text::from(lines)
}
