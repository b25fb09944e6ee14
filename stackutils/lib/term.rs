//! Module containing terminal utilities

//--------------------------------------------------------------------------------------------------
// Functions
//--------------------------------------------------------------------------------------------------

/// Determines if the process is attached to an interactive terminal.
///
/// Both stdin and stdout must be TTYs.
pub fn is_interactive_terminal() -> bool {
    let stdin_is_tty = unsafe { libc::isatty(libc::STDIN_FILENO) == 1 };
    let stdout_is_tty = unsafe { libc::isatty(libc::STDOUT_FILENO) == 1 };

    stdin_is_tty && stdout_is_tty
}

/// Determines if the process is attached to an interactive terminal that understands ANSI
/// escape codes.
pub fn is_ansi_interactive_terminal() -> bool {
    let term = std::env::var("TERM").unwrap_or_default();
    if term.is_empty() {
        tracing::debug!("detected TTY without TERM environment variable");
    }

    is_interactive_terminal() && term != "dumb"
}
