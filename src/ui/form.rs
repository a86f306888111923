//! Field-input sub-machine backing the shipping and payment forms.
//!
//! A [`Form`] owns an ordered list of fields. Keystrokes edit the focused
//! field; `tab`/`enter` advance (validating the field being left),
//! `shift+tab` goes back. `enter` on the last field validates everything
//! and reports [`FormOutcome::Submitted`]. Validation failures pin focus on
//! the first bad field and render inline; they never leave the form.

use std::sync::OnceLock;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::style::Modifier;
use ratatui::text::{Line, Span, Text};
use regex::Regex;

use crate::ui::theme::Theme;

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn email_re() -> &'static Regex {
    EMAIL_RE.get_or_init(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email regex"))
}

/// Synchronous field validation rules. Empty values only trip `Required`;
/// the other rules wait for input so optional fields stay optional.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    Required,
    Email,
    Digits,
    /// Inclusive character-count bounds.
    Length(usize, usize),
    CardNumber,
}

impl Rule {
    fn check(&self, label: &str, value: &str) -> Option<String> {
        match self {
            Rule::Required => {
                if value.trim().is_empty() {
                    Some(format!("{label} is required"))
                } else {
                    None
                }
            }
            Rule::Email => {
                let trimmed = value.trim();
                if !trimmed.is_empty() && !email_re().is_match(trimmed) {
                    Some(format!("{label} doesn't look right"))
                } else {
                    None
                }
            }
            Rule::Digits => {
                if !value.is_empty() && !value.chars().all(|c| c.is_ascii_digit()) {
                    Some(format!("{label} must be digits"))
                } else {
                    None
                }
            }
            Rule::Length(min, max) => {
                let count = value.chars().count();
                if !value.is_empty() && (count < *min || count > *max) {
                    if min == max {
                        Some(format!("{label} must be {min} digits"))
                    } else {
                        Some(format!("{label} must be {min}-{max} digits"))
                    }
                } else {
                    None
                }
            }
            Rule::CardNumber => {
                if value.is_empty() {
                    return None;
                }
                let digits = value.chars().filter(char::is_ascii_digit).count();
                let only_card_chars = value
                    .chars()
                    .all(|c| c.is_ascii_digit() || c == ' ' || c == '-');
                if !only_card_chars || !(13..=19).contains(&digits) {
                    Some(format!("{label} doesn't look like a card number"))
                } else {
                    None
                }
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct Field {
    pub key: &'static str,
    pub label: &'static str,
    pub value: String,
    cursor: usize,
    rules: Vec<Rule>,
    pub error: Option<String>,
}

impl Field {
    pub fn new(key: &'static str, label: &'static str) -> Self {
        Self {
            key,
            label,
            value: String::new(),
            cursor: 0,
            rules: Vec::new(),
            error: None,
        }
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self.cursor = self.value.chars().count();
        self
    }

    pub fn rule(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }

    fn byte_index(&self) -> usize {
        self.value
            .char_indices()
            .nth(self.cursor)
            .map(|(i, _)| i)
            .unwrap_or(self.value.len())
    }

    fn insert(&mut self, c: char) {
        let i = self.byte_index();
        self.value.insert(i, c);
        self.cursor += 1;
        self.error = None;
    }

    fn backspace(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            let i = self.byte_index();
            self.value.remove(i);
            self.error = None;
        }
    }

    fn delete(&mut self) {
        if self.cursor < self.value.chars().count() {
            let i = self.byte_index();
            self.value.remove(i);
            self.error = None;
        }
    }

    fn validate(&mut self) -> bool {
        self.error = self
            .rules
            .iter()
            .find_map(|rule| rule.check(self.label, &self.value));
        self.error.is_none()
    }
}

/// Outcome of feeding one key into the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormOutcome {
    Editing,
    Submitted,
}

#[derive(Debug, Clone, Default)]
pub struct Form {
    fields: Vec<Field>,
    focus: usize,
}

impl Form {
    pub fn new(fields: Vec<Field>) -> Self {
        Self { fields, focus: 0 }
    }

    pub fn get(&self, key: &str) -> &str {
        self.fields
            .iter()
            .find(|f| f.key == key)
            .map(|f| f.value.as_str())
            .unwrap_or("")
    }

    pub fn focused(&self) -> usize {
        self.focus
    }

    pub fn update(&mut self, key: &KeyEvent) -> FormOutcome {
        if self.fields.is_empty() {
            return FormOutcome::Editing;
        }
        match key.code {
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.fields[self.focus].insert(c);
            }
            KeyCode::Backspace => self.fields[self.focus].backspace(),
            KeyCode::Delete => self.fields[self.focus].delete(),
            KeyCode::Left => {
                let field = &mut self.fields[self.focus];
                field.cursor = field.cursor.saturating_sub(1);
            }
            KeyCode::Right => {
                let field = &mut self.fields[self.focus];
                field.cursor = (field.cursor + 1).min(field.value.chars().count());
            }
            KeyCode::Home => self.fields[self.focus].cursor = 0,
            KeyCode::End => {
                let field = &mut self.fields[self.focus];
                field.cursor = field.value.chars().count();
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.focus = self.focus.saturating_sub(1);
            }
            KeyCode::Tab | KeyCode::Down => {
                if self.fields[self.focus].validate() {
                    self.focus = (self.focus + 1).min(self.fields.len() - 1);
                }
            }
            KeyCode::Enter => {
                if !self.fields[self.focus].validate() {
                    return FormOutcome::Editing;
                }
                if self.focus + 1 < self.fields.len() {
                    self.focus += 1;
                    return FormOutcome::Editing;
                }
                if self.validate_all() {
                    return FormOutcome::Submitted;
                }
            }
            _ => {}
        }
        FormOutcome::Editing
    }

    /// Validate every field, parking focus on the first invalid one.
    fn validate_all(&mut self) -> bool {
        let mut first_bad = None;
        for (i, field) in self.fields.iter_mut().enumerate() {
            if !field.validate() && first_bad.is_none() {
                first_bad = Some(i);
            }
        }
        match first_bad {
            Some(i) => {
                self.focus = i;
                false
            }
            None => true,
        }
    }

    pub fn view(&self, theme: &Theme) -> Text<'static> {
        let mut lines = Vec::new();
        for (i, field) in self.fields.iter().enumerate() {
            let focused = i == self.focus;
            let label_style = if focused { theme.accent() } else { theme.muted() };
            lines.push(Line::from(Span::styled(field.label.to_string(), label_style)));

            if focused {
                let chars: Vec<char> = field.value.chars().collect();
                let before: String = chars[..field.cursor.min(chars.len())].iter().collect();
                let at: String = chars
                    .get(field.cursor)
                    .map(|c| c.to_string())
                    .unwrap_or_else(|| " ".to_string());
                let after: String = if field.cursor < chars.len() {
                    chars[field.cursor + 1..].iter().collect()
                } else {
                    String::new()
                };
                lines.push(Line::from(vec![
                    Span::styled("> ".to_string(), theme.accent()),
                    Span::raw(before),
                    Span::styled(at, theme.base().add_modifier(Modifier::REVERSED)),
                    Span::raw(after),
                ]));
            } else {
                lines.push(Line::from(vec![
                    Span::styled("> ".to_string(), theme.muted()),
                    Span::raw(field.value.clone()),
                ]));
            }

            if let Some(error) = &field.error {
                lines.push(Line::from(Span::styled(format!("  {error}"), theme.error())));
            }
        }
        Text::from(lines)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_str(form: &mut Form, text: &str) {
        for c in text.chars() {
            form.update(&key(KeyCode::Char(c)));
        }
    }

    fn two_field_form() -> Form {
        Form::new(vec![
            Field::new("name", "name").rule(Rule::Required),
            Field::new("zip", "zip").rule(Rule::Required).rule(Rule::Digits),
        ])
    }

    #[test]
    fn test_typing_edits_focused_field() {
        let mut form = two_field_form();
        type_str(&mut form, "ada");
        assert_eq!(form.get("name"), "ada");
        form.update(&key(KeyCode::Backspace));
        assert_eq!(form.get("name"), "ad");
    }

    #[test]
    fn test_tab_blocked_by_invalid_field() {
        let mut form = two_field_form();
        form.update(&key(KeyCode::Tab));
        assert_eq!(form.focused(), 0, "empty required field must hold focus");
        type_str(&mut form, "ada");
        form.update(&key(KeyCode::Tab));
        assert_eq!(form.focused(), 1);
    }

    #[test]
    fn test_enter_on_last_field_submits_when_valid() {
        let mut form = two_field_form();
        type_str(&mut form, "ada");
        assert_eq!(form.update(&key(KeyCode::Enter)), FormOutcome::Editing);
        type_str(&mut form, "90210");
        assert_eq!(form.update(&key(KeyCode::Enter)), FormOutcome::Submitted);
    }

    #[test]
    fn test_submit_parks_focus_on_first_invalid() {
        let mut form = Form::new(vec![
            Field::new("a", "a").rule(Rule::Required),
            Field::new("b", "b"),
            Field::new("c", "c").rule(Rule::Required),
        ]);
        // skip ahead without filling anything, then force a submit attempt
        form.focus = 2;
        type_str(&mut form, "x");
        assert_eq!(form.update(&key(KeyCode::Enter)), FormOutcome::Editing);
        assert_eq!(form.focused(), 0);
    }

    #[test]
    fn test_rules() {
        assert!(Rule::Required.check("name", "  ").is_some());
        assert!(Rule::Required.check("name", "x").is_none());
        assert!(Rule::Email.check("email", "not-an-email").is_some());
        assert!(Rule::Email.check("email", "a@b.co").is_none());
        assert!(Rule::Email.check("email", "").is_none());
        assert!(Rule::Digits.check("month", "1a").is_some());
        assert!(Rule::Length(2, 2).check("month", "1").is_some());
        assert!(Rule::Length(2, 2).check("month", "12").is_none());
        assert!(Rule::CardNumber.check("card", "4242 4242 4242 4242").is_none());
        assert!(Rule::CardNumber.check("card", "42").is_some());
    }

    #[test]
    fn test_cursor_insert_mid_string() {
        let mut form = Form::new(vec![Field::new("name", "name")]);
        type_str(&mut form, "ac");
        form.update(&key(KeyCode::Left));
        type_str(&mut form, "b");
        assert_eq!(form.get("name"), "abc");
    }
}
