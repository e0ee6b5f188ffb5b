/// A finished input line split into whitespace-separated tokens.
///
/// There is no quoting: every run of whitespace separates two tokens and no
/// token is ever empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ParsedCommand {
    tokens: Vec<String>,
}

impl ParsedCommand {
    pub(crate) fn parse(line: &str) -> Self {
        Self {
            tokens: line.split_whitespace().map(str::to_owned).collect(),
        }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// The command name, i.e. the first token.
    pub(crate) fn name(&self) -> Option<&str> {
        self.tokens.first().map(String::as_str)
    }

    /// Every token after the command name.
    pub(crate) fn args(&self) -> &[String] {
        self.tokens.get(1..).unwrap_or_default()
    }

    #[cfg(test)]
    pub(crate) fn tokens(&self) -> &[String] {
        &self.tokens
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collapses_runs_of_whitespace() {
        let parsed = ParsedCommand::parse("echo   a  b");
        assert_eq!(parsed.tokens(), ["echo", "a", "b"]);
        assert_eq!(parsed.name(), Some("echo"));
        assert_eq!(parsed.args(), ["a", "b"]);
    }

    #[test]
    fn test_trims_surrounding_whitespace() {
        let parsed = ParsedCommand::parse("\t  pwd \t ");
        assert_eq!(parsed.tokens(), ["pwd"]);
        assert!(parsed.args().is_empty());
    }

    #[test]
    fn test_blank_line_has_no_tokens() {
        for line in ["", "   ", "\t \t"] {
            let parsed = ParsedCommand::parse(line);
            assert!(parsed.is_empty());
            assert_eq!(parsed.name(), None);
            assert!(parsed.args().is_empty());
        }
    }

    #[test]
    fn test_quotes_are_not_special() {
        let parsed = ParsedCommand::parse("echo 'a b'");
        assert_eq!(parsed.tokens(), ["echo", "'a", "b'"]);
    }
}
