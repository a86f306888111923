//! Active subscriptions, hosted by the account page. Cancelling is a
//! two-step confirm like address/card deletion.

use crossterm::event::KeyCode;
use ratatui::text::{Line, Span};
use unicode_width::UnicodeWidthStr;

use crate::api::{find_variant, Subscription};
use crate::ui::command::Command;
use crate::ui::model::Model;
use crate::ui::msg::Msg;
use crate::ui::widgets::boxed;
use crate::util::format_usd;

#[derive(Debug, Clone, Copy, Default)]
pub struct SubscriptionsState {
    pub selected: usize,
    pub deleting: Option<usize>,
}

pub fn update(mut m: Model, msg: &Msg) -> (Model, Vec<Command>) {
    let Msg::Key(key) = msg else {
        return (m, Vec::new());
    };
    match key.code {
        KeyCode::Down | KeyCode::Tab | KeyCode::Char('j') => {
            if m.state.subscriptions.deleting.is_none() {
                let max = m.subscriptions.len().saturating_sub(1);
                m.state.subscriptions.selected = (m.state.subscriptions.selected + 1).min(max);
            }
        }
        KeyCode::Up | KeyCode::BackTab | KeyCode::Char('k') => {
            if m.state.subscriptions.deleting.is_none() {
                m.state.subscriptions.selected = m.state.subscriptions.selected.saturating_sub(1);
            }
        }
        KeyCode::Delete | KeyCode::Backspace | KeyCode::Char('x') | KeyCode::Char('d') => {
            if m.state.subscriptions.deleting.is_none()
                && m.state.subscriptions.selected < m.subscriptions.len()
            {
                m.state.subscriptions.deleting = Some(m.state.subscriptions.selected);
            }
        }
        KeyCode::Char('y') => {
            if let Some(index) = m.state.subscriptions.deleting.take() {
                if let Some(subscription) = m.subscriptions.get(index) {
                    let subscription_id = subscription.id.clone();
                    if m.subscriptions.len() == 1 {
                        // the list is about to empty out; drop focus back to
                        // the account menu
                        m.state.account.focused = false;
                    }
                    return (
                        m,
                        vec![
                            Command::CancelSubscription { subscription_id },
                            Command::FetchSubscriptions,
                        ],
                    );
                }
            }
        }
        KeyCode::Char('n') | KeyCode::Esc => m.state.subscriptions.deleting = None,
        _ => {}
    }
    (m, Vec::new())
}

fn format_subscription(m: &Model, subscription: &Subscription, width: usize) -> Vec<Line<'static>> {
    let Some((product, variant)) = find_variant(&m.products, &subscription.product_variant_id)
    else {
        return vec![Line::from(subscription.product_variant_id.clone())];
    };
    let price = format!("{}/mo", format_usd(variant.price));
    let pad = width.saturating_sub(
        UnicodeWidthStr::width(product.name.as_str()) + UnicodeWidthStr::width(price.as_str()) + 4,
    );
    vec![
        Line::from(vec![
            Span::styled(product.name.clone(), m.theme.accent()),
            Span::raw(" ".repeat(pad)),
            Span::raw(price),
        ]),
        Line::from(variant.name.clone()),
    ]
}

pub fn view(m: &Model, width: usize, focused: bool) -> Vec<Line<'static>> {
    if m.subscriptions.is_empty() {
        return vec![
            Line::default(),
            Line::from(Span::styled(
                "no active subscriptions".to_string(),
                m.theme.muted(),
            )),
        ];
    }
    let mut lines = Vec::new();
    for (i, subscription) in m.subscriptions.iter().enumerate() {
        let content = if m.state.subscriptions.deleting == Some(i) {
            vec![
                Line::from(Span::styled("are you sure?".to_string(), m.theme.accent())),
                Line::from("(y/n)".to_string()),
            ]
        } else {
            format_subscription(m, subscription, width)
        };
        lines.extend(boxed(
            content,
            width,
            focused && i == m.state.subscriptions.selected,
            &m.theme,
        ));
    }
    lines
}
