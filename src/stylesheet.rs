// File: src/stylesheet.rs
// CSS text handed to whatever injects styles into the host.
use crate::model::{ResolvedColor, TagPath, Theme};
use std::fmt::Write;

pub const TAG_ATTRIBUTE: &str = "data-tag";

#[derive(Debug, Clone, PartialEq)]
pub struct StyleRule {
    pub tag: TagPath,
    pub theme: Theme,
    pub color: ResolvedColor,
}

pub fn theme_scope(theme: Theme) -> &'static str {
    match theme {
        Theme::Light => ".theme-light",
        Theme::Dark => ".theme-dark",
    }
}

/// One rule per entry, in the given order.
pub fn render(rules: &[StyleRule]) -> String {
    let mut css = String::new();
    for rule in rules {
        // Writing into a String cannot fail
        let _ = writeln!(
            css,
            "{} [{}=\"{}\"] {{ background-color: {}; color: {}; }}",
            theme_scope(rule.theme),
            TAG_ATTRIBUTE,
            escape(rule.tag.as_str()),
            rule.color.background,
            rule.color.foreground,
        );
    }
    css
}

/// Escapes a value for use inside a double-quoted CSS string.
fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '"' | '\\' => {
                out.push('\\');
                out.push(c);
            }
            '\n' => out.push_str("\\a "),
            _ => out.push(c),
        }
    }
    out
}
