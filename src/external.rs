use crate::command::ExitCode;
use crate::env::Environment;
use crate::error::ShellError;
use std::os::unix::process::CommandExt;
use std::path::PathBuf;
use std::process::{ExitStatus, Stdio};

/// Command that is not a builtin.
///
/// The child inherits the shell's standard streams, starts in the shell's
/// current directory and sees the shell's variables. It is started with the
/// name the user typed as `argv[0]`.
pub(crate) struct ExternalCommand {
    name: String,
    path: PathBuf,
    args: Vec<String>,
}

impl ExternalCommand {
    pub(crate) fn new(name: impl Into<String>, path: PathBuf, args: Vec<String>) -> Self {
        Self {
            name: name.into(),
            path,
            args,
        }
    }

    /// Spawn the program and block until it exits.
    ///
    /// A non-zero status is logged and returned; only a failure to start or
    /// wait for the child is an error.
    pub(crate) fn execute(&self, env: &Environment) -> Result<ExitCode, ShellError> {
        let spawn_error = |source| ShellError::Spawn {
            program: self.name.clone(),
            source,
        };

        log::debug!("spawning {} as {}", self.path.display(), self.name);
        let mut child = std::process::Command::new(&self.path)
            .arg0(&self.name)
            .args(&self.args)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .envs(env.vars.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .current_dir(&env.current_dir)
            .spawn()
            .map_err(spawn_error)?;
        let exit_status = child.wait().map_err(spawn_error)?;

        let code = match exit_status.code() {
            Some(x) => x,
            None => terminated_by_signal(exit_status),
        };
        if code != 0 {
            log::warn!("{} exited with status {code}", self.name);
        }
        Ok(code)
    }
}

fn terminated_by_signal(exit_status: ExitStatus) -> ExitCode {
    use std::os::unix::process::ExitStatusExt;
    if let Some(signal) = exit_status.signal() {
        128 + signal
    } else if exit_status.core_dumped() {
        255
    } else {
        -1
    }
}
