//! Terminal output for nsadmin
//!
//! Uses `cliclack` for log lines and `indicatif` for the loading spinner in
//! interactive terminals, with plain fallbacks for CI and piped output.

mod context;
mod output;
mod progress;
mod theme;

pub use context::UiContext;
pub use output::{
    intro, key_value, outro_success, remark, step_error_detail, step_info, step_ok,
    step_warn_hint,
};
pub use progress::LoadingSpinner;
pub use theme::{init_theme, NsAdminTheme};
