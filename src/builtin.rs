use crate::command::{ExitCode, Outcome};
use crate::env::Environment;
use crate::error::ShellError;
use crate::resolver::ExecutableIndex;
use anyhow::Result;
use std::env;
use std::ffi::OsString;
use std::fs;
use std::io::Write;
use std::path::PathBuf;

/// Built-in commands known to the shell at compile time.
///
/// Builtins run in-process. Every variant is executed through the same
/// [`Builtin::execute`] signature; names map to variants through [`BUILTINS`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Builtin {
    Echo,
    Type,
    Exit,
    Pwd,
    Cd,
}

pub(crate) const BUILTINS: [(&str, Builtin); 5] = [
    ("echo", Builtin::Echo),
    ("type", Builtin::Type),
    ("exit", Builtin::Exit),
    ("pwd", Builtin::Pwd),
    ("cd", Builtin::Cd),
];

/// Everything a builtin may read or change.
pub(crate) struct Context<'a> {
    pub env: &'a mut Environment,
    pub index: &'a ExecutableIndex,
    pub stdout: &'a mut dyn Write,
    pub stderr: &'a mut dyn Write,
}

impl Builtin {
    pub(crate) fn from_name(name: &str) -> Option<Self> {
        BUILTINS
            .iter()
            .find(|(builtin, _)| *builtin == name)
            .map(|(_, builtin)| *builtin)
    }

    pub(crate) fn names() -> impl Iterator<Item = &'static str> {
        BUILTINS.iter().map(|(name, _)| *name)
    }

    /// Run the builtin with the tokens following its name.
    ///
    /// Errors are recoverable: the caller reports them and keeps prompting.
    pub(crate) fn execute(self, args: &[String], ctx: &mut Context<'_>) -> Result<Outcome> {
        match self {
            Builtin::Echo => echo(args, ctx),
            Builtin::Type => type_of(args, ctx),
            Builtin::Exit => exit(args, ctx),
            Builtin::Pwd => pwd(ctx),
            Builtin::Cd => cd(args, ctx),
        }
    }
}

fn echo(args: &[String], ctx: &mut Context<'_>) -> Result<Outcome> {
    writeln!(ctx.stdout, "{}", args.join(" "))?;
    Ok(Outcome::Continue)
}

fn type_of(args: &[String], ctx: &mut Context<'_>) -> Result<Outcome> {
    if args.is_empty() {
        return Err(ShellError::MissingArgument("type").into());
    }
    for name in args {
        if Builtin::from_name(name).is_some() {
            writeln!(ctx.stdout, "{name} is a shell builtin")?;
        } else if let Some(path) = ctx.index.resolve(name) {
            writeln!(ctx.stdout, "{name} is {}", path.display())?;
        } else {
            writeln!(ctx.stdout, "{name}: not found")?;
        }
    }
    Ok(Outcome::Continue)
}

fn exit(args: &[String], ctx: &mut Context<'_>) -> Result<Outcome> {
    let code = match args.first() {
        None => 0,
        Some(arg) => match arg.parse::<ExitCode>() {
            Ok(code) => code,
            Err(_) => {
                writeln!(ctx.stderr, "{}", ShellError::InvalidExitCode(arg.clone()))?;
                2
            }
        },
    };
    Ok(Outcome::Exit(code))
}

fn pwd(ctx: &mut Context<'_>) -> Result<Outcome> {
    writeln!(ctx.stdout, "{}", ctx.env.current_dir.display())?;
    Ok(Outcome::Continue)
}

/// Change the working directory of the shell process.
///
/// With no argument the target is `HOME`. A leading `~` is replaced by `HOME`.
/// Relative targets are taken from the shell's current directory. On failure
/// the working directory is left unchanged.
fn cd(args: &[String], ctx: &mut Context<'_>) -> Result<Outcome> {
    let (shown, target) = match args.first() {
        Some(arg) => (arg.as_str(), expand_tilde(arg, ctx.env)?),
        None => ("~", ctx.env.home().ok_or(ShellError::HomeNotSet)?),
    };

    let new_dir = ctx.env.current_dir.join(target);
    let no_such_dir = || ShellError::NoSuchDirectory(shown.to_owned());

    let canonical = fs::canonicalize(&new_dir).map_err(|_| no_such_dir())?;
    env::set_current_dir(&canonical).map_err(|_| no_such_dir())?;
    log::debug!("cd {}", canonical.display());
    ctx.env.current_dir = canonical;
    Ok(Outcome::Continue)
}

fn expand_tilde(arg: &str, env: &Environment) -> std::result::Result<PathBuf, ShellError> {
    let Some(rest) = arg.strip_prefix('~') else {
        return Ok(PathBuf::from(arg));
    };
    let mut expanded = OsString::from(env.home().ok_or(ShellError::HomeNotSet)?);
    expanded.push(rest);
    Ok(PathBuf::from(expanded))
}
