// crates/pulse-core/src/resolve.rs - Argument interpreter
//
// Walks a validated argument schema depth-first, asking the prompt provider
// for one answer at a time, and assembles the resolved argument mapping.
//
// CANCELLATION:
// Every resolve step returns `Option`. `None` means the user gave no answer
// somewhere below, and it is propagated with `?` all the way to the top:
// the whole call yields `None` and everything collected so far (including
// already-resolved siblings and confirmed group repetitions) is dropped.
// A half-filled snippet is never produced.
//
// The one exception is the "Add another?" question of a group: declining it
// finishes the group successfully, and giving no answer to it counts as
// declining, so repetitions the user already completed are kept. A provider
// that reports itself aborted still cancels there.
//
// TITLES:
// Each prompt is titled with its position in the schema:
//
//   data.root                  (top-level input)
//   data.attributes[0].value   (first repetition of a group)
//   data.attributes            (the group's "Add another?" question)

use serde_json::Value;
use tracing::{debug, warn};

use crate::prompt::{Choice, PromptProvider};
use crate::schema::{ArgumentKind, ArgumentSpec, SelectionOption, SnippetDefinition};
use crate::value::{ResolvedArgs, ResolvedValue};

/// Placeholder of the question asked after each group repetition
pub const DEFAULT_CONFIRM_PLACEHOLDER: &str = "Add another?";

/// Resolve `args` against `prompter`, titling prompts under `title_prefix`
pub fn resolve(args: &[ArgumentSpec], title_prefix: &str, prompter: &mut dyn PromptProvider) -> Option<ResolvedArgs> {
    Resolver::new(prompter).resolve(args, title_prefix)
}

/// Resolve every argument of a snippet, using its name as title prefix
pub fn resolve_snippet(snippet: &SnippetDefinition, prompter: &mut dyn PromptProvider) -> Option<ResolvedArgs> {
    Resolver::new(prompter).resolve_snippet(snippet)
}

/// Interpreter state for one resolution
pub struct Resolver<'p> {
    prompter: &'p mut dyn PromptProvider,
    confirm_placeholder: String,
}

impl<'p> Resolver<'p> {
    pub fn new(prompter: &'p mut dyn PromptProvider) -> Self {
        Self {
            prompter,
            confirm_placeholder: DEFAULT_CONFIRM_PLACEHOLDER.to_string(),
        }
    }

    /// Override the placeholder of the "Add another?" question
    pub fn with_confirm_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.confirm_placeholder = placeholder.into();
        self
    }

    pub fn resolve_snippet(&mut self, snippet: &SnippetDefinition) -> Option<ResolvedArgs> {
        self.resolve(&snippet.args, &snippet.name)
    }

    /// Resolve an argument list into a full mapping, or `None` on cancellation
    pub fn resolve(&mut self, args: &[ArgumentSpec], title_prefix: &str) -> Option<ResolvedArgs> {
        let mut resolved = ResolvedArgs::new();

        for spec in args {
            let title = format!("{title_prefix}.{}", spec.name);
            let value = self.resolve_argument(spec, &title);

            let Some(value) = value else {
                debug!(title = %title, "resolution cancelled");
                return None;
            };

            resolved.insert(spec.name.clone(), value);
        }

        Some(resolved)
    }

    fn resolve_argument(&mut self, spec: &ArgumentSpec, title: &str) -> Option<ResolvedValue> {
        match &spec.kind {
            ArgumentKind::Input => self.resolve_input(spec, title),
            ArgumentKind::Selection {
                options,
                allow_multiple,
            } => self.resolve_selection(spec, title, options, *allow_multiple),
            ArgumentKind::Group { subargs } => self.resolve_group(title, subargs).map(ResolvedValue::Group),
        }
    }

    fn resolve_input(&mut self, spec: &ArgumentSpec, title: &str) -> Option<ResolvedValue> {
        debug!(title, "asking for text");
        let text = self
            .prompter
            .ask_text(title, spec.placeholder.as_deref(), spec.prompt.as_deref())?;

        // An empty answer is the same as no answer
        if text.is_empty() {
            return None;
        }

        Some(ResolvedValue::Text(text))
    }

    fn resolve_selection(
        &mut self,
        spec: &ArgumentSpec,
        title: &str,
        options: &[SelectionOption],
        allow_multiple: bool,
    ) -> Option<ResolvedValue> {
        debug!(title, allow_multiple, "asking for a choice");
        let labels: Vec<&str> = options.iter().map(|option| option.label.as_str()).collect();
        let choice = self
            .prompter
            .ask_choice(title, spec.placeholder.as_deref(), &labels, allow_multiple)?;

        let picked = choice.labels();
        if let Some(unknown) = picked.iter().find(|label| !labels.contains(*label)) {
            warn!(title, label = *unknown, "picked label is not an option");
            return None;
        }

        // Values follow declaration order, not pick order
        let values: Vec<Value> = options
            .iter()
            .filter(|option| picked.contains(&option.label.as_str()))
            .map(|option| option.value.clone())
            .collect();

        if allow_multiple {
            return Some(ResolvedValue::Multiple(values));
        }

        match (choice, values.as_slice()) {
            (Choice::One(_), [value]) => Some(ResolvedValue::Single(value.clone())),
            (Choice::Many(labels), [value]) if labels.len() == 1 => Some(ResolvedValue::Single(value.clone())),
            _ => {
                warn!(title, "single-pick selection answered with several labels");
                None
            }
        }
    }

    fn resolve_group(&mut self, title: &str, subargs: &[ArgumentSpec]) -> Option<Vec<ResolvedArgs>> {
        let mut entries = Vec::new();

        loop {
            let entry_prefix = format!("{title}[{}]", entries.len());
            entries.push(self.resolve(subargs, &entry_prefix)?);

            debug!(title, repetitions = entries.len(), "asking whether to repeat");
            match self.prompter.ask_confirm(title, Some(self.confirm_placeholder.as_str())) {
                Some(true) => continue,
                Some(false) => break,
                None if self.prompter.aborted() => {
                    debug!(title, "prompter aborted at repeat question");
                    return None;
                }
                None => {
                    debug!(title, "no answer to repeat question, keeping repetitions");
                    break;
                }
            }
        }

        Some(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::{PromptKind, ScriptedAnswer, ScriptedPrompter};
    use crate::transform::Transform;
    use serde_json::json;

    fn one_two(allow_multiple: bool) -> ArgumentSpec {
        ArgumentSpec::selection(
            "b",
            vec![
                SelectionOption::new("One", json!(1)),
                SelectionOption::new("Two", json!(2)),
            ],
            allow_multiple,
        )
    }

    fn text(value: &str) -> ResolvedValue {
        ResolvedValue::Text(value.to_string())
    }

    fn entry(pairs: &[(&str, &str)]) -> ResolvedArgs {
        pairs
            .iter()
            .map(|(name, value)| (name.to_string(), text(value)))
            .collect()
    }

    #[test]
    fn test_empty_schema_resolves_without_prompting() {
        let mut prompter = ScriptedPrompter::default();
        let resolved = resolve(&[], "s", &mut prompter).unwrap();
        assert!(resolved.is_empty());
        assert!(prompter.asked().is_empty());
    }

    #[test]
    fn test_input_and_multi_selection_use_declared_order() {
        let args = vec![ArgumentSpec::input("a"), one_two(true)];
        let mut prompter = ScriptedPrompter::new(vec![
            ScriptedAnswer::from("hi"),
            ScriptedAnswer::from(vec!["Two", "One"]),
        ]);

        let resolved = resolve(&args, "s", &mut prompter).unwrap();
        assert_eq!(resolved.to_json(), json!({ "a": "hi", "b": [1, 2] }));
        assert_eq!(prompter.titles(), vec!["s.a", "s.b"]);
        assert_eq!(prompter.asked()[1].labels, vec!["One", "Two"]);
    }

    #[test]
    fn test_single_selection_yields_bare_value() {
        let mut prompter = ScriptedPrompter::new(vec!["Two"]);
        let resolved = resolve(&[one_two(false)], "s", &mut prompter).unwrap();
        assert_eq!(resolved.get("b"), Some(&ResolvedValue::Single(json!(2))));
    }

    #[test]
    fn test_multi_selection_with_one_pick_is_still_a_list() {
        let mut prompter = ScriptedPrompter::new(vec![vec!["One"]]);
        let resolved = resolve(&[one_two(true)], "s", &mut prompter).unwrap();
        assert_eq!(resolved.get("b"), Some(&ResolvedValue::Multiple(vec![json!(1)])));
    }

    #[test]
    fn test_multi_selection_with_no_picks_is_an_empty_list() {
        let mut prompter = ScriptedPrompter::new(vec![ScriptedAnswer::Picks(Vec::new())]);
        let resolved = resolve(&[one_two(true)], "s", &mut prompter).unwrap();
        assert_eq!(resolved.get("b"), Some(&ResolvedValue::Multiple(Vec::new())));
    }

    #[test]
    fn test_selection_values_are_copied_verbatim() {
        let spec = ArgumentSpec::selection(
            "format",
            vec![
                SelectionOption::new("JSON", json!({ "type": "json", "minimal": false })),
                SelectionOption::new("Minimal XML", json!({ "type": "xml", "minimal": true })),
            ],
            false,
        );
        let mut prompter = ScriptedPrompter::new(vec!["Minimal XML"]);
        let resolved = resolve(&[spec], "s", &mut prompter).unwrap();
        assert_eq!(
            resolved.to_json(),
            json!({ "format": { "type": "xml", "minimal": true } })
        );
    }

    #[test]
    fn test_unknown_label_cancels() {
        let mut prompter = ScriptedPrompter::new(vec!["Three"]);
        assert!(resolve(&[one_two(false)], "s", &mut prompter).is_none());
    }

    #[test]
    fn test_several_labels_for_single_pick_cancels() {
        let mut prompter = ScriptedPrompter::new(vec![vec!["One", "Two"]]);
        assert!(resolve(&[one_two(false)], "s", &mut prompter).is_none());
    }

    #[test]
    fn test_group_collects_until_declined() {
        let group = ArgumentSpec::group("g", vec![ArgumentSpec::input("x")]);
        let mut prompter = ScriptedPrompter::new(vec![
            ScriptedAnswer::from("first"),
            ScriptedAnswer::from(true),
            ScriptedAnswer::from("second"),
            ScriptedAnswer::from(false),
        ]);

        let resolved = resolve(&[group], "s", &mut prompter).unwrap();
        assert_eq!(
            resolved.get("g"),
            Some(&ResolvedValue::Group(vec![
                entry(&[("x", "first")]),
                entry(&[("x", "second")]),
            ]))
        );
        assert_eq!(prompter.titles(), vec!["s.g[0].x", "s.g", "s.g[1].x", "s.g"]);
        assert_eq!(prompter.asked()[1].kind, PromptKind::Confirm);
        assert_eq!(prompter.asked()[1].placeholder.as_deref(), Some("Add another?"));
    }

    #[test]
    fn test_group_repeat_question_without_answer_keeps_repetitions() {
        let group = ArgumentSpec::group("g", vec![ArgumentSpec::input("x")]);
        let mut prompter = ScriptedPrompter::new(vec![
            ScriptedAnswer::from("first"),
            ScriptedAnswer::from(true),
            ScriptedAnswer::from("second"),
            ScriptedAnswer::Cancel,
            ScriptedAnswer::from("later"),
        ]);

        let resolved = resolve(&[group, ArgumentSpec::input("after")], "s", &mut prompter).unwrap();
        assert_eq!(
            resolved.get("g"),
            Some(&ResolvedValue::Group(vec![
                entry(&[("x", "first")]),
                entry(&[("x", "second")]),
            ]))
        );
        assert_eq!(resolved.get("after"), Some(&text("later")));
        assert_eq!(prompter.titles(), vec!["s.g[0].x", "s.g", "s.g[1].x", "s.g", "s.after"]);
    }

    #[test]
    fn test_out_of_step_script_cancels_at_repeat_question() {
        let group = ArgumentSpec::group("g", vec![ArgumentSpec::input("x")]);
        let mut prompter = ScriptedPrompter::new(vec!["first", "second", "no"]);

        let resolved = resolve(&[group, ArgumentSpec::input("after")], "s", &mut prompter);
        assert!(resolved.is_none());
        assert_eq!(prompter.titles(), vec!["s.g[0].x", "s.g"]);
        assert!(prompter.aborted());

        // Also when the group is the last argument
        let group = ArgumentSpec::group("g", vec![ArgumentSpec::input("x")]);
        let mut prompter = ScriptedPrompter::new(vec![ScriptedAnswer::from("first"), ScriptedAnswer::from(vec!["A"])]);
        assert!(resolve(&[group], "s", &mut prompter).is_none());
    }

    #[test]
    fn test_repeat_question_accepts_yes_and_no_words() {
        let group = ArgumentSpec::group("g", vec![ArgumentSpec::input("x")]);
        let mut prompter = ScriptedPrompter::new(vec!["first", "yes", "second", "no", "later"]);

        let resolved = resolve(&[group, ArgumentSpec::input("after")], "s", &mut prompter).unwrap();
        assert_eq!(resolved.get("g").and_then(ResolvedValue::as_group).map(<[_]>::len), Some(2));
        assert_eq!(resolved.get("after"), Some(&text("later")));
    }

    #[test]
    fn test_cancelled_repetition_discards_the_whole_group() {
        let group = ArgumentSpec::group("g", vec![ArgumentSpec::input("x")]);
        let mut prompter = ScriptedPrompter::new(vec![
            ScriptedAnswer::from("first"),
            ScriptedAnswer::from(true),
            ScriptedAnswer::Cancel,
        ]);
        assert!(resolve(&[group], "s", &mut prompter).is_none());
    }

    #[test]
    fn test_cancellation_discards_resolved_siblings() {
        let args = vec![ArgumentSpec::input("a"), ArgumentSpec::input("b"), ArgumentSpec::input("c")];
        let mut prompter = ScriptedPrompter::new(vec![ScriptedAnswer::from("x"), ScriptedAnswer::Cancel]);

        assert!(resolve(&args, "s", &mut prompter).is_none());
        // Nothing after the cancelled prompt is asked
        assert_eq!(prompter.titles(), vec!["s.a", "s.b"]);
    }

    #[test]
    fn test_empty_text_counts_as_no_answer() {
        let mut prompter = ScriptedPrompter::new(vec![""]);
        assert!(resolve(&[ArgumentSpec::input("a")], "s", &mut prompter).is_none());
    }

    #[test]
    fn test_whitespace_text_is_accepted_verbatim() {
        let mut prompter = ScriptedPrompter::new(vec!["  padded "]);
        let resolved = resolve(&[ArgumentSpec::input("a")], "s", &mut prompter).unwrap();
        assert_eq!(resolved.get("a"), Some(&text("  padded ")));
    }

    #[test]
    fn test_cancellation_deep_in_nested_groups_aborts_everything() {
        let inner = ArgumentSpec::group("inner", vec![ArgumentSpec::input("leaf"), one_two(false)]);
        let outer = ArgumentSpec::group("outer", vec![ArgumentSpec::input("label"), inner]);
        let args = vec![ArgumentSpec::input("top"), outer];

        let mut prompter = ScriptedPrompter::new(vec![
            ScriptedAnswer::from("t"),
            ScriptedAnswer::from("o0"),
            ScriptedAnswer::from("l0"),
            ScriptedAnswer::from("One"),
            ScriptedAnswer::from(true),
            ScriptedAnswer::from("l1"),
            ScriptedAnswer::Cancel,
        ]);

        assert!(resolve(&args, "s", &mut prompter).is_none());
        assert_eq!(
            prompter.titles(),
            vec![
                "s.top",
                "s.outer[0].label",
                "s.outer[0].inner[0].leaf",
                "s.outer[0].inner[0].b",
                "s.outer[0].inner",
                "s.outer[0].inner[1].leaf",
                "s.outer[0].inner[1].b",
            ]
        );
    }

    #[test]
    fn test_nested_groups_resolve_to_nested_lists() {
        let inner = ArgumentSpec::group("inner", vec![ArgumentSpec::input("leaf")]);
        let outer = ArgumentSpec::group("outer", vec![inner]);

        let mut prompter = ScriptedPrompter::new(vec![
            ScriptedAnswer::from("a"),
            ScriptedAnswer::from(true),
            ScriptedAnswer::from("b"),
            ScriptedAnswer::from(false),
            ScriptedAnswer::from(true),
            ScriptedAnswer::from("c"),
            ScriptedAnswer::from(false),
            ScriptedAnswer::from(false),
        ]);

        let resolved = resolve(&[outer], "s", &mut prompter).unwrap();
        assert_eq!(
            resolved.to_json(),
            json!({
                "outer": [
                    { "inner": [{ "leaf": "a" }, { "leaf": "b" }] },
                    { "inner": [{ "leaf": "c" }] }
                ]
            })
        );
        assert_eq!(prompter.remaining(), 0);
    }

    #[test]
    fn test_key_set_matches_spec_names() {
        let args = vec![
            ArgumentSpec::input("a"),
            one_two(false),
            ArgumentSpec::group("g", vec![ArgumentSpec::input("x")]),
        ];
        let mut prompter = ScriptedPrompter::new(vec![
            ScriptedAnswer::from("hi"),
            ScriptedAnswer::from("One"),
            ScriptedAnswer::from("x0"),
            ScriptedAnswer::from(false),
        ]);

        let resolved = resolve(&args, "s", &mut prompter).unwrap();
        assert_eq!(resolved.keys().collect::<Vec<_>>(), vec!["a", "b", "g"]);
    }

    #[test]
    fn test_resolve_snippet_prefixes_titles_with_snippet_name() {
        let snippet = SnippetDefinition::new("data", Transform::template("{{root}}"))
            .with_args(vec![ArgumentSpec::input("root").with_placeholder("Client Root")]);
        let mut prompter = ScriptedPrompter::new(vec!["Client"]);

        let resolved = resolve_snippet(&snippet, &mut prompter).unwrap();
        assert_eq!(snippet.transform.apply(&resolved).unwrap(), vec!["Client"]);
        assert_eq!(prompter.titles(), vec!["data.root"]);
        assert_eq!(prompter.asked()[0].placeholder.as_deref(), Some("Client Root"));
    }

    #[test]
    fn test_custom_confirm_placeholder() {
        let group = ArgumentSpec::group("g", vec![ArgumentSpec::input("x")]);
        let mut prompter = ScriptedPrompter::new(vec![ScriptedAnswer::from("only"), ScriptedAnswer::from(false)]);

        Resolver::new(&mut prompter)
            .with_confirm_placeholder("One more?")
            .resolve(&[group], "s")
            .unwrap();
        assert_eq!(prompter.asked()[1].placeholder.as_deref(), Some("One more?"));
    }
}
