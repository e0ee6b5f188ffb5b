use crate::builtin::{Builtin, Context};
use crate::command::{ExitCode, INTERRUPTED, Outcome};
use crate::config::{IndexPolicy, ShellConfig};
use crate::editor::{Completer, LineEditor, ReadOutcome};
use crate::env::Environment;
use crate::error::ShellError;
use crate::external::ExternalCommand;
use crate::parser::ParsedCommand;
use crate::resolver::ExecutableIndex;
use crate::terminal::{ModeControl, RawMode};
use anyhow::Context as _;
use std::collections::BTreeSet;
use std::io::{Read, Write};

/// Printed before every line the user types.
pub const PROMPT: &str = "$ ";

/// A minimal interactive shell that runs builtins and external commands.
///
/// The interpreter owns the [`Environment`] and the [`ExecutableIndex`].
/// [`Interpreter::dispatch`] runs one finished line; [`Interpreter::repl`]
/// drives the prompt/edit/dispatch loop over a terminal.
///
/// Example
/// ```
/// use myshell::Interpreter;
/// use myshell::command::Outcome;
/// use myshell::config::ShellConfig;
/// use myshell::env::Environment;
///
/// let mut sh = Interpreter::new(Environment::new(), ShellConfig::default());
/// let mut out: Vec<u8> = Vec::new();
/// let outcome = sh.dispatch("echo   hello  world", &mut out, &mut std::io::sink());
/// assert_eq!(outcome, Outcome::Continue);
/// assert_eq!(out, b"hello world\n");
/// ```
pub struct Interpreter {
    env: Environment,
    index: ExecutableIndex,
    config: ShellConfig,
}

impl Interpreter {
    /// Create an interpreter and index the executables on the environment's `PATH`.
    pub fn new(env: Environment, config: ShellConfig) -> Self {
        let index = ExecutableIndex::from_search_path(&env.search_path());
        Self { env, index, config }
    }

    pub fn env(&self) -> &Environment {
        &self.env
    }

    pub fn index(&self) -> &ExecutableIndex {
        &self.index
    }

    /// Replace the index with a fresh scan of `PATH`.
    pub fn rebuild_index(&mut self) {
        self.index = ExecutableIndex::from_search_path(&self.env.search_path());
    }

    /// Run one finished input line.
    ///
    /// Builtins take precedence over executables of the same name. Errors are
    /// written to `stderr` and never stop the shell; a blank line does nothing.
    pub fn dispatch(
        &mut self,
        line: &str,
        stdout: &mut dyn Write,
        stderr: &mut dyn Write,
    ) -> Outcome {
        let parsed = ParsedCommand::parse(line);
        if parsed.is_empty() {
            return Outcome::Continue;
        }

        let outcome = match self.run(line.trim(), &parsed, stdout, stderr) {
            Ok(outcome) => outcome,
            Err(err) => {
                let _ = writeln!(stderr, "{err}");
                Outcome::Continue
            }
        };
        let _ = stdout.flush();
        let _ = stderr.flush();
        outcome
    }

    fn run(
        &mut self,
        line: &str,
        parsed: &ParsedCommand,
        stdout: &mut dyn Write,
        stderr: &mut dyn Write,
    ) -> anyhow::Result<Outcome> {
        let Some(name) = parsed.name() else {
            return Ok(Outcome::Continue);
        };

        if let Some(builtin) = Builtin::from_name(name) {
            log::debug!("builtin {name}");
            let mut ctx = Context {
                env: &mut self.env,
                index: &self.index,
                stdout,
                stderr,
            };
            return builtin.execute(parsed.args(), &mut ctx);
        }

        let Some(path) = self.index.resolve(name) else {
            return Err(ShellError::CommandNotFound(line.to_owned()).into());
        };
        // The child writes straight to the inherited descriptors.
        stdout.flush()?;
        stderr.flush()?;
        ExternalCommand::new(name, path, parsed.args().to_vec()).execute(&self.env)?;
        Ok(Outcome::Continue)
    }

    /// Prompt, read and dispatch lines until `exit`, interrupt or a fatal error.
    ///
    /// The terminal is in raw mode only while a line is being edited; it is
    /// back in its original mode whenever a command runs and whenever this
    /// function returns. Returns the status the process should exit with.
    pub fn repl<T, R, W, E>(
        &mut self,
        term: &mut T,
        mut input: R,
        mut stdout: W,
        mut stderr: E,
    ) -> anyhow::Result<ExitCode>
    where
        T: ModeControl,
        R: Read,
        W: Write,
        E: Write,
    {
        loop {
            if self.config.index_policy == IndexPolicy::EveryPrompt {
                self.rebuild_index();
            }

            let read = {
                let guard = RawMode::enter(&mut *term)?;
                let completer = CommandNames { index: &self.index };
                let read =
                    LineEditor::new(&mut input, &mut stdout).read_line(PROMPT, &completer);
                guard.restore().context("failed to restore terminal mode")?;
                read?
            };

            let line = match read {
                ReadOutcome::Line(line) => line,
                ReadOutcome::Interrupted => return Ok(INTERRUPTED),
            };

            if let Outcome::Exit(code) = self.dispatch(&line, &mut stdout, &mut stderr) {
                return Ok(code);
            }
        }
    }
}

/// Completion candidates: builtins first, then executables in name order.
struct CommandNames<'a> {
    index: &'a ExecutableIndex,
}

impl Completer for CommandNames<'_> {
    fn candidates(&self, prefix: &str) -> Vec<String> {
        let is_candidate = |name: &str| name.len() > prefix.len() && name.starts_with(prefix);

        let mut candidates: Vec<String> = Builtin::names()
            .filter(|name| is_candidate(name))
            .map(str::to_owned)
            .collect();
        let executables: BTreeSet<&str> = self
            .index
            .names()
            .filter(|name| is_candidate(name))
            .collect();
        for name in executables {
            if !candidates.iter().any(|candidate| candidate == name) {
                candidates.push(name.to_owned());
            }
        }
        candidates
    }
}
