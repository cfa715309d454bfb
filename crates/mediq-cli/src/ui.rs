use std::io::IsTerminal;
use std::sync::OnceLock;

use crate::cli::{ColorMode, GlobalFlags, OutputFormat};

#[derive(Clone, Copy, Debug)]
pub struct UiPrefs {
    pub table_color: bool,
    pub progress: bool,
    pub term_width: Option<usize>,
}

static UI_PREFS: OnceLock<UiPrefs> = OnceLock::new();

pub fn init(flags: &GlobalFlags) {
    let _ = UI_PREFS.set(resolve(flags, std::io::stdout().is_terminal()));
}

fn resolve(flags: &GlobalFlags, is_tty: bool) -> UiPrefs {
    let table_color = match flags.color {
        ColorMode::Always => flags.format == OutputFormat::Table,
        ColorMode::Never => false,
        ColorMode::Auto => {
            is_tty
                && flags.format == OutputFormat::Table
                && !flags.quiet
                && std::env::var_os("NO_COLOR").is_none()
        }
    };

    let progress = is_tty && !flags.quiet && flags.format != OutputFormat::Json;

    let term_width = std::env::var("COLUMNS")
        .ok()
        .and_then(|value| value.parse::<usize>().ok())
        .filter(|width| *width >= 40);

    UiPrefs {
        table_color,
        progress,
        term_width,
    }
}

#[must_use]
pub fn prefs() -> UiPrefs {
    *UI_PREFS.get().unwrap_or(&UiPrefs {
        table_color: false,
        progress: false,
        term_width: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flags(format: OutputFormat, color: ColorMode) -> GlobalFlags {
        GlobalFlags {
            format,
            quiet: false,
            verbose: false,
            color,
            backend_url: None,
        }
    }

    #[test]
    fn no_progress_or_color_off_a_terminal() {
        let prefs = resolve(&flags(OutputFormat::Table, ColorMode::Auto), false);
        assert!(!prefs.progress);
        assert!(!prefs.table_color);
    }

    #[test]
    fn always_colors_tables_only() {
        assert!(resolve(&flags(OutputFormat::Table, ColorMode::Always), false).table_color);
        assert!(!resolve(&flags(OutputFormat::Json, ColorMode::Always), true).table_color);
    }

    #[test]
    fn json_output_never_shows_progress() {
        assert!(!resolve(&flags(OutputFormat::Json, ColorMode::Auto), true).progress);
        assert!(resolve(&flags(OutputFormat::Raw, ColorMode::Never), true).progress);
    }
}
