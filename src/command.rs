/// Conventional process exit code type used by this crate.
///
/// A value of 0 indicates success; any non-zero value indicates failure.
/// This mirrors the convention used by POSIX shells and many command-line tools.
pub type ExitCode = i32;

/// Exit status used when the user aborts the shell with the interrupt byte.
pub const INTERRUPTED: ExitCode = 130;

/// What the read/dispatch loop should do after a command has run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Show the next prompt.
    Continue,
    /// Leave the loop and terminate the process with the given status.
    Exit(ExitCode),
}
