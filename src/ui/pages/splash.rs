//! Splash page: signs the device in and preloads the session.
//!
//! Two flags gate the hand-off to the shop: the session snapshot must have
//! arrived, and the splash must have been visible for its minimum delay.

use ratatui::text::{Line, Span, Text};

use crate::ui::command::Command;
use crate::ui::model::Model;
use crate::ui::msg::Msg;
use crate::ui::pages::shop;
use crate::ui::widgets::spinner_dots;

#[derive(Debug, Clone, Copy, Default)]
pub struct SplashState {
    pub data_loaded: bool,
    pub delay_done: bool,
}

const LOGO: [&str; 5] = [
    "█   █  ███   ███   ████  █   █",
    "█  █    █   █   █ █      █  █ ",
    "███     █   █   █  ███   ███  ",
    "█  █    █   █   █     █  █  █ ",
    "█   █  ███   ███  ████   █   █",
];

pub fn update(mut m: Model, msg: &Msg) -> (Model, Vec<Command>) {
    match msg {
        Msg::SignedIn { .. } => {
            return (m, vec![Command::LoadSession, Command::SplashDelay]);
        }
        Msg::SplashDelayElapsed => m.state.splash.delay_done = true,
        Msg::SessionLoaded(_) => m.state.splash.data_loaded = true,
        _ => {}
    }
    if m.state.splash.data_loaded && m.state.splash.delay_done {
        return shop::enter(m);
    }
    (m, Vec::new())
}

pub fn view(m: &Model) -> Text<'static> {
    let mut lines: Vec<Line> = LOGO
        .iter()
        .map(|l| Line::from(Span::styled(l.to_string(), m.theme.accent())))
        .collect();
    lines.push(Line::default());
    let label = if m.signed_in {
        "stocking the shelves"
    } else {
        "signing you in"
    };
    lines.push(Line::from(Span::styled(
        format!("{label}{}", spinner_dots(m.frame)),
        m.theme.muted(),
    )));
    Text::from(lines)
}
