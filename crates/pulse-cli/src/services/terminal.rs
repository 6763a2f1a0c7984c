// crates/pulse-cli/src/services/terminal.rs - Interactive prompt provider
//
// Renders prompts on stderr so stdout only ever carries the rendered
// snippet. An empty line is "no answer", which the interpreter turns into
// cancellation (or into "stop repeating" for group questions). Text answers
// are passed on exactly as typed; choice and yes/no input is trimmed.
//
// CHOICE INPUT:
//   2          -> second label
//   JSON       -> label typed out (case-insensitive)
//   1,3 / 1 3  -> several labels, only when multiple picks are allowed
//   -          -> explicitly pick nothing (multiple picks only)

use console::{Term, style};
use pulse_core::{Choice, PromptProvider};
use tracing::warn;

pub struct TerminalPrompter {
    term: Term,
}

impl TerminalPrompter {
    pub fn new() -> Self {
        Self { term: Term::stderr() }
    }

    /// Print `lines` and read one raw line; `None` on I/O failure
    fn read(&self, lines: &[String], prompt: &str) -> Option<String> {
        let result = (|| {
            for line in lines {
                self.term.write_line(line)?;
            }
            self.term.write_str(&format!("{} ", style(prompt).cyan()))?;
            self.term.read_line()
        })();

        match result {
            Ok(line) => Some(line),
            Err(error) => {
                warn!(%error, "terminal prompt failed");
                None
            }
        }
    }

    /// Trimmed answer for choice and yes/no input
    fn ask(&self, lines: &[String], prompt: &str) -> Option<String> {
        let answer = self.read(lines, prompt)?;
        let answer = answer.trim();
        if answer.is_empty() { None } else { Some(answer.to_string()) }
    }

    fn complain(&self, message: &str) {
        if let Err(error) = self.term.write_line(&format!("{}", style(message).red())) {
            warn!(%error, "terminal write failed");
        }
    }
}

impl Default for TerminalPrompter {
    fn default() -> Self {
        Self::new()
    }
}

fn heading(title: &str, placeholder: Option<&str>) -> String {
    match placeholder {
        Some(placeholder) => format!("{} {}", style(title).bold(), style(placeholder).dim()),
        None => format!("{}", style(title).bold()),
    }
}

impl PromptProvider for TerminalPrompter {
    fn ask_text(&mut self, title: &str, placeholder: Option<&str>, prompt: Option<&str>) -> Option<String> {
        self.read(&[heading(title, placeholder)], prompt.unwrap_or(">"))
            .and_then(text_answer)
    }

    fn ask_choice(
        &mut self,
        title: &str,
        placeholder: Option<&str>,
        labels: &[&str],
        allow_multiple: bool,
    ) -> Option<Choice> {
        let mut lines = vec![heading(title, placeholder)];
        lines.extend(
            labels
                .iter()
                .enumerate()
                .map(|(index, label)| format!("  {} {label}", style(format!("{:>2})", index + 1)).dim())),
        );
        let prompt = if allow_multiple { "pick (e.g. 1,3)>" } else { "pick>" };

        loop {
            let answer = self.ask(&lines, prompt)?;
            match parse_choice(&answer, labels, allow_multiple) {
                Ok(choice) => return Some(choice),
                Err(message) => self.complain(&message),
            }
        }
    }

    fn ask_confirm(&mut self, title: &str, placeholder: Option<&str>) -> Option<bool> {
        let lines = [heading(title, placeholder)];

        loop {
            let answer = self.ask(&lines, "[y/n]>")?;
            match answer.to_lowercase().as_str() {
                "y" | "yes" => return Some(true),
                "n" | "no" => return Some(false),
                _ => self.complain("Answer y or n"),
            }
        }
    }
}

/// A typed text line without its terminator; an empty line is no answer
pub fn text_answer(line: String) -> Option<String> {
    let text = line.strip_suffix('\n').unwrap_or(&line);
    let text = text.strip_suffix('\r').unwrap_or(text);
    if text.is_empty() { None } else { Some(text.to_string()) }
}

/// Turn typed choice input into picked labels
///
/// Multiple picks are returned in the order they were typed; the interpreter
/// puts them back into declaration order.
pub fn parse_choice(input: &str, labels: &[&str], allow_multiple: bool) -> Result<Choice, String> {
    if allow_multiple && input.trim() == "-" {
        return Ok(Choice::Many(Vec::new()));
    }

    let tokens: Vec<&str> = if allow_multiple {
        input
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|token| !token.is_empty())
            .collect()
    } else {
        vec![input.trim()]
    };

    let mut picked = Vec::with_capacity(tokens.len());
    for token in tokens {
        let label = lookup(token, labels).ok_or_else(|| format!("No option '{token}'"))?;
        if !picked.contains(&label) {
            picked.push(label);
        }
    }

    if allow_multiple {
        Ok(Choice::Many(picked))
    } else {
        picked.pop().map(Choice::One).ok_or_else(|| "Pick one option".to_string())
    }
}

fn lookup(token: &str, labels: &[&str]) -> Option<String> {
    if let Ok(number) = token.parse::<usize>() {
        return number.checked_sub(1).and_then(|index| labels.get(index)).map(|label| label.to_string());
    }

    labels
        .iter()
        .find(|label| label.eq_ignore_ascii_case(token))
        .map(|label| label.to_string())
}
