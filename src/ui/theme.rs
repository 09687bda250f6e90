//! cliclack theme for the namespace views
//!
//! Log lines carry the listing's state: a loaded list is marked with a
//! check, an empty list with the info glyph, a failed fetch with a cross.

use cliclack::ThemeState;
use console::{style, Style};

const SYMBOL_LOADED: &str = "✔";
const SYMBOL_INFO: &str = "≡";
const SYMBOL_WARN: &str = "▲";
const SYMBOL_FAILED: &str = "✖";
const SYMBOL_REMARK: &str = "·";

#[derive(Debug, Clone, Default)]
pub struct NsAdminTheme;

impl cliclack::Theme for NsAdminTheme {
    /// The frame is blue while a view is open and red once it errors
    fn bar_color(&self, state: &ThemeState) -> Style {
        match state {
            ThemeState::Active => Style::new().blue(),
            ThemeState::Error(_) => Style::new().red(),
            ThemeState::Cancel | ThemeState::Submit => Style::new().dim(),
        }
    }

    fn submit_symbol(&self) -> String {
        style(SYMBOL_LOADED).green().to_string()
    }

    fn info_symbol(&self) -> String {
        style(SYMBOL_INFO).cyan().to_string()
    }

    fn warning_symbol(&self) -> String {
        style(SYMBOL_WARN).yellow().to_string()
    }

    fn error_symbol(&self) -> String {
        style(SYMBOL_FAILED).red().bold().to_string()
    }

    fn remark_symbol(&self) -> String {
        style(SYMBOL_REMARK).dim().to_string()
    }
}

/// Install the theme for all cliclack output
pub fn init_theme() {
    cliclack::set_theme(NsAdminTheme);
}
