use std::{fmt, os::unix::process::ExitStatusExt, process::ExitStatus};

use nix::sys::signal::Signal;

//--------------------------------------------------------------------------------------------------
// Constants
//--------------------------------------------------------------------------------------------------

/// Exit descriptions that mean the user cancelled the container with Ctrl-C.
///
/// Linux reports the signal itself while the runtime CLI on other hosts exits with status 2.
pub const USER_INTERRUPT_PATTERNS: [&str; 2] = ["signal: interrupt", "exit status 2"];

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// How a supervised process ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitReason {
    /// The process exited with status 0.
    Success,

    /// The process exited with a non-zero status.
    Code(i32),

    /// The process was terminated by a signal.
    Signal(i32),
}

//--------------------------------------------------------------------------------------------------
// Methods
//--------------------------------------------------------------------------------------------------

impl ExitReason {
    /// Returns true if the process exited with status 0.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }
}

//--------------------------------------------------------------------------------------------------
// Functions
//--------------------------------------------------------------------------------------------------

/// Returns true if `reason` describes a user-initiated interrupt.
///
/// All interrupt detection goes through here.
pub fn is_user_interrupt(reason: &ExitReason) -> bool {
    let description = reason.to_string();
    USER_INTERRUPT_PATTERNS.contains(&description.as_str())
}

fn signal_description(signo: i32) -> String {
    let name = match Signal::try_from(signo) {
        Ok(Signal::SIGINT) => "interrupt",
        Ok(Signal::SIGTERM) => "terminated",
        Ok(Signal::SIGKILL) => "killed",
        Ok(Signal::SIGHUP) => "hangup",
        Ok(Signal::SIGQUIT) => "quit",
        Ok(Signal::SIGABRT) => "aborted",
        Ok(Signal::SIGPIPE) => "broken pipe",
        Ok(Signal::SIGSEGV) => "segmentation fault",
        _ => return format!("signal {}", signo),
    };

    name.to_string()
}

//--------------------------------------------------------------------------------------------------
// Trait Implementations
//--------------------------------------------------------------------------------------------------

impl From<ExitStatus> for ExitReason {
    fn from(status: ExitStatus) -> Self {
        if status.success() {
            return Self::Success;
        }

        match (status.code(), status.signal()) {
            (Some(code), _) => Self::Code(code),
            (None, Some(signo)) => Self::Signal(signo),
            (None, None) => Self::Code(-1),
        }
    }
}

impl fmt::Display for ExitReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success => write!(f, "exit status 0"),
            Self::Code(code) => write!(f, "exit status {}", code),
            Self::Signal(signo) => write!(f, "signal: {}", signal_description(*signo)),
        }
    }
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_reason_display() {
        assert_eq!(ExitReason::Success.to_string(), "exit status 0");
        assert_eq!(ExitReason::Code(2).to_string(), "exit status 2");
        assert_eq!(
            ExitReason::Signal(libc::SIGINT).to_string(),
            "signal: interrupt"
        );
        assert_eq!(
            ExitReason::Signal(libc::SIGKILL).to_string(),
            "signal: killed"
        );
    }

    #[test]
    fn test_exit_reason_from_status() {
        assert_eq!(ExitReason::from(ExitStatus::from_raw(0)), ExitReason::Success);
        assert_eq!(
            ExitReason::from(ExitStatus::from_raw(2 << 8)),
            ExitReason::Code(2)
        );
        assert_eq!(
            ExitReason::from(ExitStatus::from_raw(libc::SIGINT)),
            ExitReason::Signal(libc::SIGINT)
        );
    }

    #[test]
    fn test_is_user_interrupt() {
        assert!(is_user_interrupt(&ExitReason::Signal(libc::SIGINT)));
        assert!(is_user_interrupt(&ExitReason::Code(2)));

        assert!(!is_user_interrupt(&ExitReason::Success));
        assert!(!is_user_interrupt(&ExitReason::Code(1)));
        assert!(!is_user_interrupt(&ExitReason::Code(125)));
        assert!(!is_user_interrupt(&ExitReason::Signal(libc::SIGTERM)));
    }
}
