//! Batch driver.
//!
//! Input is a whitespace-separated stream of test cases. Each case is an
//! initial string followed by a command string: the undo symbol reverts the
//! last append, any other character is appended. Output is the total after
//! the initial string, then one total per command, one per line.

use crate::automaton::Automaton;
use crate::config::SessionConfig;
use crate::error::Result;
use crate::types::AutomatonStats;
use std::io::{BufRead, Write};
use tracing::info;

/// Counters for one driver run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SessionSummary {
    pub cases: u64,
    pub appends: u64,
    pub undos: u64,
    /// Engine statistics at the end of the last case.
    pub last_case: AutomatonStats,
}

/// Process every case in `reader`, writing totals to `writer`.
pub fn run<R: BufRead, W: Write>(
    mut reader: R,
    mut writer: W,
    config: &SessionConfig,
) -> Result<SessionSummary> {
    let mut input = String::new();
    reader.read_to_string(&mut input)?;

    let mut automaton = Automaton::with_config(config.engine.clone());
    let mut summary = SessionSummary::default();
    let mut tokens = input.split_whitespace();

    while let Some(initial) = tokens.next() {
        let commands = tokens.next().unwrap_or("");
        automaton.reset();

        let total = automaton.extend(initial)?;
        writeln!(writer, "{}", total)?;
        summary.appends += automaton.len() as u64;

        for command in commands.chars() {
            let total = if command == config.undo_symbol {
                summary.undos += 1;
                automaton.undo()?
            } else {
                summary.appends += 1;
                automaton.append(command)?
            };
            writeln!(writer, "{}", total)?;
        }

        summary.cases += 1;
        summary.last_case = automaton.stats()?;
        info!(
            case = summary.cases,
            initial = initial.chars().count(),
            commands = commands.chars().count(),
            "case complete"
        );
    }

    writer.flush()?;
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EngineError;

    fn run_str(input: &str) -> Result<(String, SessionSummary)> {
        let mut out = Vec::new();
        let summary = run(input.as_bytes(), &mut out, &SessionConfig::default())?;
        Ok((String::from_utf8(out).unwrap(), summary))
    }

    #[test]
    fn test_single_case() {
        let (out, summary) = run_str("aa\nb--\n").unwrap();
        assert_eq!(out, "1\n1\n1\n0\n");
        assert_eq!(summary.cases, 1);
        assert_eq!(summary.appends, 3);
        assert_eq!(summary.undos, 2);
        assert_eq!(summary.last_case.live_len, 1);
        assert_eq!(summary.last_case.total, 0);
    }

    #[test]
    fn test_cases_are_independent() {
        let (out, summary) = run_str("aaa\n-\n\nab\nab\n").unwrap();
        assert_eq!(out, "2\n1\n0\n1\n3\n");
        assert_eq!(summary.cases, 2);
    }

    #[test]
    fn test_missing_command_line() {
        let (out, _) = run_str("abab").unwrap();
        assert_eq!(out, "3\n");
    }

    #[test]
    fn test_empty_input() {
        let (out, summary) = run_str("").unwrap();
        assert!(out.is_empty());
        assert_eq!(summary.cases, 0);
    }

    #[test]
    fn test_too_many_undos() {
        let err = run_str("a\n--\n").unwrap_err();
        assert!(matches!(err, EngineError::Underflow));
    }

    #[test]
    fn test_custom_undo_symbol() {
        let config = SessionConfig {
            undo_symbol: '<',
            ..SessionConfig::default()
        };
        let mut out = Vec::new();
        run("ab a<<".as_bytes(), &mut out, &config).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "0\n1\n0\n0\n");
    }
}
