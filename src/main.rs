use anyhow::{Context, Result};
use myshell::Interpreter;
use myshell::command::ExitCode;
use myshell::config::{Args, ShellConfig};
use myshell::env::Environment;
use myshell::terminal::Tty;
use std::fs::File;
use std::io;
use std::os::fd::AsFd;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let config = ShellConfig::from(argh::from_env::<Args>());
    let code = match run(config) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("myshell: {err:#}");
            1
        }
    };
    std::process::exit(code);
}

fn run(config: ShellConfig) -> Result<ExitCode> {
    log::debug!("index policy: {:?}", config.index_policy);
    let mut shell = Interpreter::new(Environment::new(), config);
    log::debug!("{} executables on PATH", shell.index().len());

    // Unbuffered handle so bytes typed ahead of a command stay in the
    // terminal for the child instead of in a userspace buffer.
    let input = io::stdin()
        .as_fd()
        .try_clone_to_owned()
        .map(File::from)
        .context("failed to open standard input")?;

    let mut tty = Tty::stdin();
    shell.repl(&mut tty, input, io::stdout(), io::stderr())
}
