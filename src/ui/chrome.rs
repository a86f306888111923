//! Frame chrome around the page content: header, breadcrumbs, footer, the
//! error overlay, and the too-small view.

use ratatui::style::Modifier;
use ratatui::text::{Line, Span, Text};
use unicode_width::UnicodeWidthStr;

use crate::ui::layout::{MIN_HEIGHT, MIN_WIDTH};
use crate::ui::model::Model;
use crate::ui::msg::Fault;
use crate::ui::page::Page;
use crate::ui::widgets::wrap_text;

pub fn header(m: &Model) -> Vec<Line<'static>> {
    let width = m.screen.container_width.saturating_sub(2) as usize;
    let item_count: u32 = m.cart.items.iter().map(|i| i.quantity).sum();

    let tab = |label: String, active: bool| {
        if active {
            Span::styled(format!(" {label} "), m.theme.highlight())
        } else {
            Span::styled(format!(" {label} "), m.theme.muted())
        }
    };
    let account_active = matches!(m.page, Page::Account | Page::Orders | Page::Subscriptions);
    let tabs = vec![
        tab(
            "shop".to_string(),
            m.page == Page::Shop || m.page == Page::Subscribe,
        ),
        tab("account".to_string(), account_active),
        tab(
            format!("cart [{item_count}]"),
            m.page.is_checkout() || m.page == Page::Receipt,
        ),
    ];

    let wordmark = Span::styled(
        "kiosk".to_string(),
        m.theme.accent().add_modifier(Modifier::BOLD),
    );
    let tabs_width: usize = tabs
        .iter()
        .map(|s| UnicodeWidthStr::width(s.content.as_ref()))
        .sum();
    let pad = width.saturating_sub(UnicodeWidthStr::width("kiosk") + tabs_width);

    let mut spans = vec![wordmark, Span::raw(" ".repeat(pad))];
    spans.extend(tabs);
    vec![Line::from(spans), Line::default()]
}

pub fn breadcrumbs(m: &Model) -> Line<'static> {
    if !m.page.is_checkout() {
        return Line::default();
    }
    let mut spans = Vec::new();
    for (i, step) in Page::CHECKOUT.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" > ".to_string(), m.theme.muted()));
        }
        let style = if *step == m.page {
            m.theme.accent()
        } else {
            m.theme.muted()
        };
        spans.push(Span::styled(step.title().to_string(), style));
    }
    Line::from(spans)
}

pub fn footer(m: &Model) -> Line<'static> {
    let mut spans = Vec::new();
    for (i, hint) in m.footer.iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw("  ".to_string()));
        }
        spans.push(Span::styled(hint.key.to_string(), m.theme.accent()));
        spans.push(Span::styled(format!(" {}", hint.action), m.theme.muted()));
    }
    Line::from(spans)
}

pub fn error_overlay(m: &Model, fault: &Fault) -> Text<'static> {
    let width = (m.screen.container_width.saturating_sub(6) as usize).max(10);
    let mut lines = vec![
        Line::from(Span::styled(
            "something went wrong".to_string(),
            m.theme.error(),
        )),
        Line::default(),
    ];
    lines.extend(wrap_text(&fault.message, width).into_iter().map(Line::from));
    lines.push(Line::default());
    lines.push(Line::from(vec![
        Span::styled("esc ".to_string(), m.theme.accent()),
        Span::styled("dismiss".to_string(), m.theme.muted()),
    ]));
    Text::from(lines)
}

pub fn undersized(m: &Model) -> Text<'static> {
    Text::from(vec![
        Line::from(Span::styled(
            "terminal too small".to_string(),
            m.theme.accent(),
        )),
        Line::from(Span::styled(
            format!("{MIN_WIDTH}x{MIN_HEIGHT} minimum"),
            m.theme.muted(),
        )),
    ])
}
