// crates/pulse-core/src/prompt.rs - Prompt provider boundary
//
// The interpreter never talks to a terminal or an editor directly. It asks
// a `PromptProvider` for three primitives and gets back `Option`s, where
// `None` always means "the user gave no answer" (Escape, empty line, EOF).
//
// Two providers live here or next door:
// - ScriptedPrompter: replays recorded answers (tests, `--answers` files)
// - TerminalPrompter: interactive, lives in the CLI crate (console-based)

use serde::Deserialize;
use std::collections::VecDeque;
use tracing::warn;

/// Answer to a choice prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Choice {
    One(String),
    Many(Vec<String>),
}

impl Choice {
    /// Picked labels, in the order the user picked them
    pub fn labels(&self) -> Vec<&str> {
        match self {
            Self::One(label) => vec![label.as_str()],
            Self::Many(labels) => labels.iter().map(String::as_str).collect(),
        }
    }
}

/// Interaction surface supplied by the host
///
/// Implementations must block until the user answered (or gave up); the
/// interpreter never has two prompts outstanding at once.
pub trait PromptProvider {
    /// Free text input
    fn ask_text(&mut self, title: &str, placeholder: Option<&str>, prompt: Option<&str>) -> Option<String>;

    /// Pick one label, or several when `allow_multiple` is set
    fn ask_choice(
        &mut self,
        title: &str,
        placeholder: Option<&str>,
        labels: &[&str],
        allow_multiple: bool,
    ) -> Option<Choice>;

    /// Yes/no question
    fn ask_confirm(&mut self, title: &str, placeholder: Option<&str>) -> Option<bool>;

    /// Whether the provider gave up for good
    ///
    /// Once aborted, a missing answer to a yes/no question cancels the
    /// resolution instead of counting as "no".
    fn aborted(&self) -> bool {
        false
    }
}

impl<P: PromptProvider + ?Sized> PromptProvider for &mut P {
    fn ask_text(&mut self, title: &str, placeholder: Option<&str>, prompt: Option<&str>) -> Option<String> {
        (**self).ask_text(title, placeholder, prompt)
    }

    fn ask_choice(
        &mut self,
        title: &str,
        placeholder: Option<&str>,
        labels: &[&str],
        allow_multiple: bool,
    ) -> Option<Choice> {
        (**self).ask_choice(title, placeholder, labels, allow_multiple)
    }

    fn ask_confirm(&mut self, title: &str, placeholder: Option<&str>) -> Option<bool> {
        (**self).ask_confirm(title, placeholder)
    }

    fn aborted(&self) -> bool {
        (**self).aborted()
    }
}

impl<P: PromptProvider + ?Sized> PromptProvider for Box<P> {
    fn ask_text(&mut self, title: &str, placeholder: Option<&str>, prompt: Option<&str>) -> Option<String> {
        (**self).ask_text(title, placeholder, prompt)
    }

    fn ask_choice(
        &mut self,
        title: &str,
        placeholder: Option<&str>,
        labels: &[&str],
        allow_multiple: bool,
    ) -> Option<Choice> {
        (**self).ask_choice(title, placeholder, labels, allow_multiple)
    }

    fn ask_confirm(&mut self, title: &str, placeholder: Option<&str>) -> Option<bool> {
        (**self).ask_confirm(title, placeholder)
    }

    fn aborted(&self) -> bool {
        (**self).aborted()
    }
}

/// One pre-recorded answer
///
/// In answers files: a string or number is text or a single pick, a list of
/// strings is a multi pick, a boolean (or yes/no/y/n) answers a
/// confirmation and `null` cancels.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "Option<RawAnswer>")]
pub enum ScriptedAnswer {
    Text(String),
    Picks(Vec<String>),
    Confirm(bool),
    Cancel,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawAnswer {
    Confirm(bool),
    Text(String),
    Number(serde_yaml::Number),
    Picks(Vec<String>),
}

impl From<Option<RawAnswer>> for ScriptedAnswer {
    fn from(raw: Option<RawAnswer>) -> Self {
        match raw {
            None => Self::Cancel,
            Some(RawAnswer::Confirm(flag)) => Self::Confirm(flag),
            Some(RawAnswer::Text(text)) => Self::Text(text),
            Some(RawAnswer::Number(number)) => Self::Text(number.to_string()),
            Some(RawAnswer::Picks(picks)) => Self::Picks(picks),
        }
    }
}

impl From<&str> for ScriptedAnswer {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<bool> for ScriptedAnswer {
    fn from(flag: bool) -> Self {
        Self::Confirm(flag)
    }
}

impl From<Vec<&str>> for ScriptedAnswer {
    fn from(picks: Vec<&str>) -> Self {
        Self::Picks(picks.into_iter().map(str::to_string).collect())
    }
}

/// Which primitive a prompt used
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKind {
    Text,
    Choice,
    Confirm,
}

/// A prompt the scripted provider was asked
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptRecord {
    pub kind: PromptKind,
    pub title: String,
    pub placeholder: Option<String>,
    pub labels: Vec<String>,
}

/// Replays recorded answers in order
///
/// Once the queue is exhausted every prompt gets "no answer", so a script
/// that is too short cancels instead of hanging. An answer of the wrong kind
/// for the prompt means the script no longer lines up with the prompts: the
/// prompter aborts and answers nothing from then on.
#[derive(Debug, Clone, Default)]
pub struct ScriptedPrompter {
    answers: VecDeque<ScriptedAnswer>,
    asked: Vec<PromptRecord>,
    mismatch: Option<String>,
}

impl ScriptedPrompter {
    pub fn new<I, A>(answers: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Into<ScriptedAnswer>,
    {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
            asked: Vec::new(),
            mismatch: None,
        }
    }

    /// Parse an answers document (YAML or JSON list)
    pub fn parse(content: &str) -> Result<Self, serde_yaml::Error> {
        let answers: Vec<ScriptedAnswer> = serde_yaml::from_str(content)?;
        Ok(Self::new(answers))
    }

    /// Every prompt asked so far, in order
    pub fn asked(&self) -> &[PromptRecord] {
        &self.asked
    }

    /// Titles of every prompt asked so far
    pub fn titles(&self) -> Vec<&str> {
        self.asked.iter().map(|record| record.title.as_str()).collect()
    }

    /// Answers not consumed yet
    pub fn remaining(&self) -> usize {
        self.answers.len()
    }

    /// Why the script was abandoned, if it was
    pub fn mismatch(&self) -> Option<&str> {
        self.mismatch.as_deref()
    }

    fn record(&mut self, kind: PromptKind, title: &str, placeholder: Option<&str>, labels: &[&str]) {
        self.asked.push(PromptRecord {
            kind,
            title: title.to_string(),
            placeholder: placeholder.map(str::to_string),
            labels: labels.iter().map(|label| label.to_string()).collect(),
        });
    }

    fn next_answer(&mut self, title: &str) -> Option<ScriptedAnswer> {
        if self.mismatch.is_some() {
            return None;
        }

        let answer = self.answers.pop_front();
        if answer.is_none() {
            warn!(title, "answer script exhausted");
        }
        answer
    }

    fn abort(&mut self, title: &str, expected: &str, answer: &ScriptedAnswer) -> Option<bool> {
        warn!(title, answer = ?answer, expected, "scripted answer does not fit the prompt");
        self.mismatch = Some(format!("answer {answer:?} for '{title}' is not {expected}"));
        None
    }
}

impl PromptProvider for ScriptedPrompter {
    fn ask_text(&mut self, title: &str, placeholder: Option<&str>, _prompt: Option<&str>) -> Option<String> {
        self.record(PromptKind::Text, title, placeholder, &[]);
        match self.next_answer(title)? {
            ScriptedAnswer::Text(text) => Some(text),
            ScriptedAnswer::Cancel => None,
            other => {
                self.abort(title, "text", &other);
                None
            }
        }
    }

    fn ask_choice(
        &mut self,
        title: &str,
        placeholder: Option<&str>,
        labels: &[&str],
        allow_multiple: bool,
    ) -> Option<Choice> {
        self.record(PromptKind::Choice, title, placeholder, labels);
        match self.next_answer(title)? {
            ScriptedAnswer::Text(label) if allow_multiple => Some(Choice::Many(vec![label])),
            ScriptedAnswer::Text(label) => Some(Choice::One(label)),
            ScriptedAnswer::Picks(picks) => Some(Choice::Many(picks)),
            ScriptedAnswer::Cancel => None,
            other => {
                self.abort(title, "a pick", &other);
                None
            }
        }
    }

    fn ask_confirm(&mut self, title: &str, placeholder: Option<&str>) -> Option<bool> {
        self.record(PromptKind::Confirm, title, placeholder, &[]);
        match self.next_answer(title)? {
            ScriptedAnswer::Confirm(flag) => Some(flag),
            ScriptedAnswer::Text(word) => match word.to_lowercase().as_str() {
                "y" | "yes" => Some(true),
                "n" | "no" => Some(false),
                _ => self.abort(title, "yes or no", &ScriptedAnswer::Text(word)),
            },
            ScriptedAnswer::Cancel => None,
            other => self.abort(title, "yes or no", &other),
        }
    }

    fn aborted(&self) -> bool {
        self.mismatch.is_some()
    }
}
