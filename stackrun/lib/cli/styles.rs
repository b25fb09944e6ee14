use std::{fmt::Write, sync::LazyLock};

use clap::builder::styling::{AnsiColor, Effects, Style, Styles};

//--------------------------------------------------------------------------------------------------
// Constants
//--------------------------------------------------------------------------------------------------

#[cfg(not(test))]
/// Whether stackrun is attached to an ANSI-capable interactive terminal.
static IS_ANSI_TERMINAL: LazyLock<bool> =
    LazyLock::new(stackutils::term::is_ansi_interactive_terminal);

/// The palette shared by the help output and messages printed by the binary.
static STYLES: LazyLock<Styles> = LazyLock::new(|| {
    Styles::styled()
        .header(AnsiColor::Yellow.on_default() | Effects::BOLD)
        .usage(AnsiColor::Yellow.on_default() | Effects::BOLD)
        .literal(AnsiColor::Blue.on_default() | Effects::BOLD)
        .placeholder(AnsiColor::Green.on_default())
        .error(AnsiColor::Red.on_default() | Effects::BOLD)
        .valid(AnsiColor::Green.on_default() | Effects::BOLD)
        .invalid(AnsiColor::Red.on_default() | Effects::BOLD)
});

//--------------------------------------------------------------------------------------------------
// Traits
//--------------------------------------------------------------------------------------------------

/// Applies the [`styles`] palette to text printed outside of clap.
pub trait AnsiStyles {
    /// Styles text as a literal, such as a container name or command.
    fn literal(&self) -> String;

    /// Styles text as an error.
    fn error(&self) -> String;

    /// Styles text as a success.
    fn valid(&self) -> String;
}

//--------------------------------------------------------------------------------------------------
// Functions
//--------------------------------------------------------------------------------------------------

/// Returns the styles for the CLI.
pub fn styles() -> Styles {
    STYLES.clone()
}

fn apply_style(text: &str, style: &Style) -> String {
    #[cfg(not(test))]
    if !*IS_ANSI_TERMINAL {
        return text.to_string();
    }

    #[cfg(test)]
    if std::env::var("TERM").unwrap_or_default() == "dumb" {
        return text.to_string();
    }

    let mut styled = String::with_capacity(text.len() + 16);
    let _ = write!(styled, "{}{}{}", style, text, style.render_reset());
    styled
}

//--------------------------------------------------------------------------------------------------
// Trait Implementations
//--------------------------------------------------------------------------------------------------

impl<T: AsRef<str> + ?Sized> AnsiStyles for T {
    fn literal(&self) -> String {
        apply_style(self.as_ref(), STYLES.get_literal())
    }

    fn error(&self) -> String {
        apply_style(self.as_ref(), STYLES.get_error())
    }

    fn valid(&self) -> String {
        apply_style(self.as_ref(), STYLES.get_valid())
    }
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------
