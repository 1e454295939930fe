//! Console line handling: tokenizing, dispatch and collected output.

use tracing::{debug, warn};

use crate::{
    query::{self, Invocation, Session, TargetKind},
    world::{CommandGateway, World},
};

/// How a console line should be rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineLevel {
    /// Regular command output.
    Default,
    /// Usage and help text.
    Help,
    /// Error messages.
    Error,
    /// The operator's own input.
    Echo,
}

/// One line of console output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleLine {
    /// Rendering class.
    pub level: LineLevel,
    /// Text without trailing newline.
    pub text: String,
}

/// Output collected during one or more invocations.
#[derive(Debug, Default, Clone)]
pub struct ConsoleOutput {
    lines: Vec<ConsoleLine>,
}

impl ConsoleOutput {
    /// Empty output buffer.
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, level: LineLevel, text: impl Into<String>) {
        self.lines.push(ConsoleLine {
            level,
            text: text.into(),
        });
    }

    /// Append regular output.
    pub fn print(&mut self, text: impl Into<String>) {
        self.push(LineLevel::Default, text);
    }

    /// Append help text.
    pub fn help(&mut self, text: impl Into<String>) {
        self.push(LineLevel::Help, text);
    }

    /// Append an error.
    pub fn error(&mut self, text: impl Into<String>) {
        self.push(LineLevel::Error, text);
    }

    /// Append echoed input.
    pub fn echo(&mut self, text: impl Into<String>) {
        self.push(LineLevel::Echo, text);
    }

    /// Lines collected so far.
    pub fn lines(&self) -> &[ConsoleLine] {
        &self.lines
    }

    /// Take the collected lines, leaving the buffer empty.
    pub fn take(&mut self) -> Vec<ConsoleLine> {
        std::mem::take(&mut self.lines)
    }

    /// Text of every line, for assertions and plain printing.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(|line| line.text.as_str())
    }
}

/// Split a console line into words. Double quotes group words containing spaces.
pub fn split_words(line: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut quoted = false;
    let mut in_word = false;

    for c in line.chars() {
        match c {
            '"' => {
                quoted = !quoted;
                in_word = true;
            }
            c if c.is_whitespace() && !quoted => {
                if in_word {
                    words.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            c => {
                current.push(c);
                in_word = true;
            }
        }
    }
    if in_word {
        words.push(current);
    }
    words
}

/// Outcome of [`execute_line`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineOutcome {
    /// Blank input.
    Empty,
    /// The first word is not a query keyword.
    NotAQuery(String),
    /// A query ran, printed usage or reported an error.
    Handled,
}

/// Run one console line against `world`.
pub fn execute_line<W: World + CommandGateway>(
    line: &str,
    world: &mut W,
    session: &mut Session,
    out: &mut ConsoleOutput,
) -> LineOutcome {
    let words = split_words(line);
    let Some((keyword, rest)) = words.split_first() else {
        return LineOutcome::Empty;
    };
    let Ok(kind) = TargetKind::from_keyword(keyword) else {
        return LineOutcome::NotAQuery(keyword.clone());
    };

    let args: Vec<&str> = rest.iter().map(String::as_str).collect();
    debug!(%keyword, ?args, "console query");
    match query::run_query(kind, &args, world, session, out) {
        Ok(Invocation::Usage | Invocation::Completed(_)) => {}
        Err(err) => {
            warn!(%keyword, %err, "query refused");
            out.error(format!("ERROR: {err}"));
            if err.reprint_usage() {
                query::print_usage(kind, out);
            }
        }
    }
    LineOutcome::Handled
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::testing;

    #[test]
    fn splits_on_whitespace_and_honours_quotes() {
        assert_eq!(
            split_words("  train   group=\"Coal Trains\" info "),
            vec!["train", "group=Coal Trains", "info"]
        );
        assert_eq!(split_words("town \"\" count"), vec!["town", "", "count"]);
        assert!(split_words("   ").is_empty());
    }

    #[test]
    fn unknown_keyword_is_left_to_caller() {
        let mut world = testing::world();
        let mut session = Session::new();
        let mut out = ConsoleOutput::new();
        assert_eq!(
            execute_line("quit", &mut world, &mut session, &mut out),
            LineOutcome::NotAQuery("quit".to_string())
        );
        assert_eq!(
            execute_line("", &mut world, &mut session, &mut out),
            LineOutcome::Empty
        );
        assert!(out.lines().is_empty());
    }

    #[test]
    fn reprintable_errors_are_followed_by_usage() {
        let mut world = testing::world();
        world.towns.push(testing::town(1, "Ashby", 100));
        let mut session = Session::new();
        let mut out = ConsoleOutput::new();

        execute_line("town all launch", &mut world, &mut session, &mut out);
        let lines = out.take();
        assert_eq!(lines[0].level, LineLevel::Error);
        assert!(lines[0].text.contains("invalid command 'launch'"));
        assert!(lines.iter().any(|l| l.text.starts_with("Invoke command on specified town(s).")));

        execute_line("town population=abc count", &mut world, &mut session, &mut out);
        let texts: Vec<_> = out.texts().collect();
        assert_eq!(texts, vec!["Number of towns matched: 0, affected: 0"]);
    }

    #[test]
    fn handled_errors_do_not_print_usage() {
        let mut world = testing::world();
        let mut session = Session::new();
        let mut out = ConsoleOutput::new();
        execute_line("town age>1 count", &mut world, &mut session, &mut out);
        assert_eq!(out.lines().len(), 1);
        assert_eq!(out.lines()[0].level, LineLevel::Error);
    }
}
