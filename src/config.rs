//! Runtime configuration of the shell.

use argh::FromArgs;

/// When the [`ExecutableIndex`](crate::ExecutableIndex) is (re)built.
///
/// `Startup` scans the search path once; executables installed later are not
/// seen until the shell restarts. `EveryPrompt` always sees the current
/// search path at the cost of listing every `PATH` directory per command.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum IndexPolicy {
    #[default]
    Startup,
    EveryPrompt,
}

#[derive(Debug, Clone, Default)]
pub struct ShellConfig {
    pub index_policy: IndexPolicy,
}

#[derive(FromArgs, Debug)]
/// Interactive shell with tab completion of command names.
pub struct Args {
    #[argh(switch)]
    /// rescan the directories on PATH before every prompt instead of once at startup.
    pub rescan_path: bool,
}

impl From<Args> for ShellConfig {
    fn from(args: Args) -> Self {
        let index_policy = if args.rescan_path {
            IndexPolicy::EveryPrompt
        } else {
            IndexPolicy::Startup
        };
        Self { index_policy }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Args, argh::EarlyExit> {
        Args::from_args(&["myshell"], args)
    }

    #[test]
    fn test_default_policy_is_startup() {
        let config = ShellConfig::from(parse(&[]).unwrap());
        assert_eq!(config.index_policy, IndexPolicy::Startup);
    }

    #[test]
    fn test_rescan_flag_selects_every_prompt() {
        let config = ShellConfig::from(parse(&["--rescan-path"]).unwrap());
        assert_eq!(config.index_policy, IndexPolicy::EveryPrompt);
    }

    #[test]
    fn test_unknown_flag_is_rejected() {
        let err = parse(&["--bogus"]).unwrap_err();
        assert!(err.status.is_err());
    }
}
