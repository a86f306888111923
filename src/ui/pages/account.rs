//! Account page: a vertical menu of sub-pages (order history,
//! subscriptions) with a focus model. Unfocused, arrows move the menu;
//! `enter`/`right` hands focus (and events) to the selected sub-page,
//! `esc`/`left` hands it back.

use crossterm::event::KeyCode;
use ratatui::text::{Line, Span, Text};
use unicode_width::UnicodeWidthStr;

use crate::ui::command::Command;
use crate::ui::layout::SizeClass;
use crate::ui::model::{Hint, Model};
use crate::ui::msg::Msg;
use crate::ui::page::Page;
use crate::ui::pages::{orders, shop, subscriptions};
use crate::ui::widgets::{center, join_horizontal};

#[derive(Debug, Clone, Copy, Default)]
pub struct AccountState {
    pub selected: usize,
    pub focused: bool,
}

pub fn enter(mut m: Model) -> (Model, Vec<Command>) {
    m = m.switch(Page::Account);
    m.state.account.selected = 0;
    m.state.account.focused = false;
    m.state.orders.selected = 0;
    m.state.subscriptions.selected = 0;
    m.state.subscriptions.deleting = None;
    m.footer = vec![
        Hint { key: "↑/↓", action: "navigate" },
        Hint { key: "enter", action: "select" },
        Hint { key: "esc", action: "shop" },
    ];
    (m, Vec::new())
}

fn selected_sub_page(m: &Model) -> Page {
    m.account_pages
        .get(m.state.account.selected)
        .copied()
        .unwrap_or(Page::Orders)
}

pub fn update(mut m: Model, msg: &Msg) -> (Model, Vec<Command>) {
    let sub_page = selected_sub_page(&m);

    if m.state.account.focused {
        if let Msg::Key(key) = msg {
            if matches!(key.code, KeyCode::Esc | KeyCode::Left | KeyCode::Char('h')) {
                // an armed deletion eats the first esc
                if key.code == KeyCode::Esc
                    && sub_page == Page::Subscriptions
                    && m.state.subscriptions.deleting.is_some()
                {
                    m.state.subscriptions.deleting = None;
                    return (m, Vec::new());
                }
                m.state.account.focused = false;
                m.state.subscriptions.deleting = None;
                return (m, Vec::new());
            }
        }
        return match sub_page {
            Page::Subscriptions => subscriptions::update(m, msg),
            _ => orders::update(m, msg),
        };
    }

    let Msg::Key(key) = msg else {
        return (m, Vec::new());
    };
    match key.code {
        KeyCode::Down | KeyCode::Tab | KeyCode::Char('j') => {
            let max = m.account_pages.len().saturating_sub(1);
            m.state.account.selected = (m.state.account.selected + 1).min(max);
            m.switched = true;
            (m, Vec::new())
        }
        KeyCode::Up | KeyCode::BackTab | KeyCode::Char('k') => {
            m.state.account.selected = m.state.account.selected.saturating_sub(1);
            m.switched = true;
            (m, Vec::new())
        }
        KeyCode::Enter | KeyCode::Right | KeyCode::Char('l') => {
            m.state.account.focused = true;
            match sub_page {
                Page::Subscriptions => subscriptions::update(m, msg),
                _ => orders::update(m, msg),
            }
        }
        KeyCode::Esc | KeyCode::Char('s') => shop::enter(m),
        _ => (m, Vec::new()),
    }
}

pub fn view(m: &Model) -> Text<'static> {
    let width = m.content_width();
    let stacked = m.screen.size < SizeClass::Large;
    let labels: Vec<&str> = m.account_pages.iter().map(|p| p.title()).collect();

    let menu_width = if stacked {
        width
    } else {
        labels
            .iter()
            .map(|l| UnicodeWidthStr::width(*l))
            .max()
            .unwrap_or(0)
            + 2
    };

    let mut menu: Vec<Line> = Vec::new();
    for (i, label) in labels.iter().enumerate() {
        let text = if stacked {
            center(label, menu_width)
        } else {
            format!(" {:<w$} ", label, w = menu_width.saturating_sub(2))
        };
        let style = if i == m.state.account.selected {
            m.theme.highlight()
        } else {
            m.theme.base()
        };
        menu.push(Line::from(Span::styled(text, style)));
    }

    let detail_width = if stacked {
        width
    } else {
        width.saturating_sub(menu_width + 2)
    };
    let detail = match selected_sub_page(m) {
        Page::Subscriptions => subscriptions::view(m, detail_width, m.state.account.focused),
        _ => orders::view(m, detail_width, m.state.account.focused),
    };

    let lines = if stacked {
        let mut lines = menu;
        lines.push(Line::default());
        lines.extend(detail);
        lines
    } else {
        join_horizontal(menu, detail, 2)
    };
    Text::from(lines)
}
