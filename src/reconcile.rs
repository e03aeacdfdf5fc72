//! Cross-referencing the issues linked to a milestone against the issues
//! cited by release notes.
//!
//! The comparison and the proceed/halt decision are pure; reading the
//! operator's answer goes through the [`Prompt`] trait so the console is
//! only touched by [`ConsolePrompt`].
use async_trait::async_trait;
use log::*;
use std::{
    collections::BTreeSet,
    io::{self, BufRead, Write},
};

use crate::{ReleaseToolsError, Result, forge::request::Issue};

/// Question asked when the milestone and release notes disagree.
pub const CONFIRM_QUESTION: &str = "Prepare release anyhow? (y/N)";

/// Mismatches between a milestone and its release notes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Discrepancies {
    /// Issues linked to the milestone that no release note cites.
    pub missing_from_release: Vec<Issue>,
    /// Issue numbers cited by release notes but not linked to the milestone.
    pub missing_from_milestone: BTreeSet<u64>,
}

impl Discrepancies {
    pub fn is_empty(&self) -> bool {
        self.missing_from_release.is_empty()
            && self.missing_from_milestone.is_empty()
    }
}

/// Operator answer to the confirmation question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    Yes,
    No,
    Unknown(String),
}

impl Response {
    pub fn parse(input: &str) -> Self {
        let trimmed = input.trim();

        if trimmed.eq_ignore_ascii_case("y") {
            Response::Yes
        } else if trimmed.eq_ignore_ascii_case("n") {
            Response::No
        } else {
            Response::Unknown(trimmed.to_string())
        }
    }
}

/// Whether preparing the release should continue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Proceed,
    Halt,
}

/// Source of operator answers.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Prompt: Send + Sync {
    /// Ask `question` and return the raw answer. `None` means no answer
    /// could be read.
    async fn ask(&self, question: &str) -> Result<Option<String>>;
}

/// Prompt that asks on stdout and reads a line from stdin.
pub struct ConsolePrompt;

#[async_trait]
impl Prompt for ConsolePrompt {
    async fn ask(&self, question: &str) -> Result<Option<String>> {
        let question = question.to_string();

        // stdin reads block, so keep them off the async workers
        let answer = tokio::task::spawn_blocking(move || {
            let mut stdout = io::stdout();
            writeln!(stdout, "{question}")?;
            stdout.flush()?;

            read_answer(io::stdin().lock())
        })
        .await
        .map_err(|err| ReleaseToolsError::Other(err.into()))??;

        Ok(answer)
    }
}

/// One line of input, or `None` at end of input.
fn read_answer<R: BufRead>(mut input: R) -> io::Result<Option<String>> {
    let mut line = String::new();

    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }

    Ok(Some(line))
}

/// Compare milestone issues with the issue numbers cited by release notes.
pub fn cross_reference(
    milestone_issues: &[&Issue],
    referenced: &BTreeSet<u64>,
) -> Discrepancies {
    let in_milestone = milestone_issues
        .iter()
        .map(|i| i.number)
        .collect::<BTreeSet<u64>>();

    let missing_from_release = milestone_issues
        .iter()
        .filter(|i| !referenced.contains(&i.number))
        .map(|i| (*i).clone())
        .collect();

    let missing_from_milestone =
        referenced.difference(&in_milestone).copied().collect();

    Discrepancies {
        missing_from_release,
        missing_from_milestone,
    }
}

/// Decide from the discrepancies and, if any, the operator's answer.
///
/// Only an explicit yes proceeds past a mismatch.
pub fn decide(
    discrepancies: &Discrepancies,
    answer: Option<&Response>,
) -> Decision {
    if discrepancies.is_empty() {
        return Decision::Proceed;
    }

    match answer {
        Some(Response::Yes) => Decision::Proceed,
        _ => Decision::Halt,
    }
}

/// Report discrepancies and ask for confirmation when there are any.
pub async fn confirm(
    discrepancies: &Discrepancies,
    prompt: &dyn Prompt,
) -> Result<Decision> {
    if discrepancies.is_empty() {
        info!(
            "The release refers to the same issues included in the milestone. Congratulations."
        );
        return Ok(decide(discrepancies, None));
    }

    report(discrepancies);

    let response = match prompt.ask(CONFIRM_QUESTION).await? {
        Some(answer) => Response::parse(&answer),
        None => Response::Unknown(String::new()),
    };

    if let Response::Unknown(raw) = &response {
        warn!("Unknown response '{raw}' received. Treating as 'n'.");
    }

    Ok(decide(discrepancies, Some(&response)))
}

fn report(discrepancies: &Discrepancies) {
    if !discrepancies.missing_from_release.is_empty() {
        warn!(
            "The following issues are linked to the milestone but not referenced in the release:"
        );
        for issue in &discrepancies.missing_from_release {
            warn!("  #{}: {}", issue.number, issue.title);
        }
    }

    if !discrepancies.missing_from_milestone.is_empty() {
        warn!(
            "The following issues are referenced in the release but not linked to the milestone:"
        );
        for number in &discrepancies.missing_from_milestone {
            warn!("  #{number}");
        }
    }
}
