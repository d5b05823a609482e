//! @acp:module "Interactive Prompts"
//! @acp:summary "Prompt abstraction and label-based selection from object lists"
//! @acp:domain cli
//! @acp:layer ui
//!
//! All questions go through the [`Prompter`] trait. [`DialoguerPrompter`]
//! asks on the terminal; [`NonInteractivePrompter`] answers with defaults
//! for `--no-interaction` runs.

pub mod cloud;

pub use cloud::{prompt_choose_application, prompt_choose_environment, prompt_choose_logs};

use dialoguer::theme::ColorfulTheme;
use dialoguer::{Confirm, Input, MultiSelect, Password, Select};

use crate::error::{AcliError, Result};

/// @acp:summary "Source of answers to interactive questions"
pub trait Prompter {
    /// Yes/no question
    fn confirm(&self, prompt: &str, default: bool) -> Result<bool>;

    /// Pick one label. `None` when nothing was chosen.
    fn select(&self, prompt: &str, labels: &[String]) -> Result<Option<usize>>;

    /// Pick any number of labels, returned as indices
    fn multi_select(&self, prompt: &str, labels: &[String]) -> Result<Vec<usize>>;

    /// Free text
    fn input(&self, prompt: &str) -> Result<String>;

    /// Hidden free text
    fn password(&self, prompt: &str) -> Result<String>;
}

/// @acp:summary "Terminal prompts via dialoguer"
pub struct DialoguerPrompter {
    theme: ColorfulTheme,
}

impl DialoguerPrompter {
    pub fn new() -> Self {
        Self {
            theme: ColorfulTheme::default(),
        }
    }
}

impl Default for DialoguerPrompter {
    fn default() -> Self {
        Self::new()
    }
}

impl Prompter for DialoguerPrompter {
    fn confirm(&self, prompt: &str, default: bool) -> Result<bool> {
        Ok(Confirm::with_theme(&self.theme)
            .with_prompt(prompt)
            .default(default)
            .interact()?)
    }

    fn select(&self, prompt: &str, labels: &[String]) -> Result<Option<usize>> {
        Ok(Select::with_theme(&self.theme)
            .with_prompt(prompt)
            .items(labels)
            .default(0)
            .interact_opt()?)
    }

    fn multi_select(&self, prompt: &str, labels: &[String]) -> Result<Vec<usize>> {
        Ok(MultiSelect::with_theme(&self.theme)
            .with_prompt(prompt)
            .items(labels)
            .interact()?)
    }

    fn input(&self, prompt: &str) -> Result<String> {
        Ok(Input::<String>::with_theme(&self.theme)
            .with_prompt(prompt)
            .interact_text()?)
    }

    fn password(&self, prompt: &str) -> Result<String> {
        Ok(Password::with_theme(&self.theme)
            .with_prompt(prompt)
            .interact()?)
    }
}

/// @acp:summary "Answers every question with its default"
///
/// Confirmations take their default, selections choose nothing, and text
/// input is an error since there is no sensible default.
#[derive(Debug, Default)]
pub struct NonInteractivePrompter;

impl Prompter for NonInteractivePrompter {
    fn confirm(&self, _prompt: &str, default: bool) -> Result<bool> {
        Ok(default)
    }

    fn select(&self, _prompt: &str, _labels: &[String]) -> Result<Option<usize>> {
        Ok(None)
    }

    fn multi_select(&self, _prompt: &str, _labels: &[String]) -> Result<Vec<usize>> {
        Ok(Vec::new())
    }

    fn input(&self, prompt: &str) -> Result<String> {
        Err(AcliError::InteractionRequired(prompt.to_string()))
    }

    fn password(&self, prompt: &str) -> Result<String> {
        Err(AcliError::InteractionRequired(prompt.to_string()))
    }
}

/// Pair each item's unique key with its trimmed label
fn keyed_labels<'a, T>(
    items: &'a [T],
    unique: impl Fn(&T) -> &str,
    label: impl Fn(&T) -> &str,
) -> Vec<(&'a T, String, String)> {
    items
        .iter()
        .map(|item| (item, unique(item).to_string(), label(item).trim().to_string()))
        .collect()
}

/// Map a chosen label back to an item: label -> first key carrying that
/// label -> first item with that key
fn lookup_by_label<'a, T>(list: &[(&'a T, String, String)], chosen: &str) -> Option<&'a T> {
    let key = list
        .iter()
        .find(|(_, _, label)| label == chosen)
        .map(|(_, key, _)| key)?;
    list.iter()
        .find(|(_, k, _)| k == key)
        .map(|(item, _, _)| *item)
}

/// @acp:summary "Prompt for one item out of a list of objects"
///
/// Labels are shown in input order. The answer is mapped back through its
/// label, so when two items share a label the first one wins.
pub fn choose_from_objects<'a, T>(
    prompter: &dyn Prompter,
    items: &'a [T],
    unique: impl Fn(&T) -> &str,
    label: impl Fn(&T) -> &str,
    prompt: &str,
) -> Result<Option<&'a T>> {
    if items.is_empty() {
        return Ok(None);
    }
    let list = keyed_labels(items, unique, label);
    let labels: Vec<String> = list.iter().map(|(_, _, l)| l.clone()).collect();

    let Some(index) = prompter.select(prompt, &labels)? else {
        return Ok(None);
    };
    Ok(labels
        .get(index)
        .and_then(|chosen| lookup_by_label(&list, chosen)))
}

/// @acp:summary "Prompt for several items out of a list of objects"
///
/// Returns the chosen items in the order the prompt reported them.
pub fn choose_many_from_objects<'a, T>(
    prompter: &dyn Prompter,
    items: &'a [T],
    unique: impl Fn(&T) -> &str,
    label: impl Fn(&T) -> &str,
    prompt: &str,
) -> Result<Vec<&'a T>> {
    if items.is_empty() {
        return Ok(Vec::new());
    }
    let list = keyed_labels(items, unique, label);
    let labels: Vec<String> = list.iter().map(|(_, _, l)| l.clone()).collect();

    let chosen = prompter.multi_select(prompt, &labels)?;
    Ok(chosen
        .into_iter()
        .filter_map(|index| labels.get(index))
        .filter_map(|label| lookup_by_label(&list, label))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::VecDeque;

    #[derive(Debug)]
    struct Item {
        uuid: &'static str,
        name: &'static str,
    }

    /// Answers select prompts by label
    struct ScriptedSelect {
        answers: RefCell<VecDeque<Vec<&'static str>>>,
        seen: RefCell<Vec<Vec<String>>>,
    }

    impl ScriptedSelect {
        fn new(answers: Vec<Vec<&'static str>>) -> Self {
            Self {
                answers: RefCell::new(answers.into()),
                seen: RefCell::new(Vec::new()),
            }
        }

        fn next(&self, labels: &[String]) -> Vec<usize> {
            self.seen.borrow_mut().push(labels.to_vec());
            let wanted = self.answers.borrow_mut().pop_front().unwrap_or_default();
            wanted
                .iter()
                .filter_map(|w| labels.iter().position(|l| l == w))
                .collect()
        }
    }

    impl Prompter for ScriptedSelect {
        fn confirm(&self, _prompt: &str, default: bool) -> Result<bool> {
            Ok(default)
        }
        fn select(&self, _prompt: &str, labels: &[String]) -> Result<Option<usize>> {
            Ok(self.next(labels).first().copied())
        }
        fn multi_select(&self, _prompt: &str, labels: &[String]) -> Result<Vec<usize>> {
            Ok(self.next(labels))
        }
        fn input(&self, _prompt: &str) -> Result<String> {
            Ok(String::new())
        }
        fn password(&self, _prompt: &str) -> Result<String> {
            Ok(String::new())
        }
    }

    fn items() -> Vec<Item> {
        vec![
            Item { uuid: "1", name: "Alpha" },
            Item { uuid: "2", name: "Beta" },
        ]
    }

    #[test]
    fn test_choose_beta_returns_uuid_2() {
        let prompter = ScriptedSelect::new(vec![vec!["Beta"]]);
        let items = items();

        let chosen = choose_from_objects(&prompter, &items, |i| i.uuid, |i| i.name, "Pick one")
            .unwrap()
            .unwrap();

        assert_eq!(chosen.uuid, "2");
        assert_eq!(
            prompter.seen.borrow()[0],
            vec!["Alpha".to_string(), "Beta".to_string()]
        );
    }

    #[test]
    fn test_labels_are_trimmed() {
        let prompter = ScriptedSelect::new(vec![vec!["Gamma"]]);
        let items = vec![Item { uuid: "3", name: "  Gamma \n" }];

        let chosen =
            choose_from_objects(&prompter, &items, |i| i.uuid, |i| i.name, "Pick").unwrap();
        assert_eq!(chosen.map(|i| i.uuid), Some("3"));
    }

    #[test]
    fn test_duplicate_labels_resolve_to_first_occurrence() {
        let items = vec![
            Item { uuid: "1", name: "Same" },
            Item { uuid: "2", name: "Same" },
        ];
        // Even if the second row is picked, its label maps back to the first item
        struct PickSecond;
        impl Prompter for PickSecond {
            fn confirm(&self, _: &str, d: bool) -> Result<bool> {
                Ok(d)
            }
            fn select(&self, _: &str, _: &[String]) -> Result<Option<usize>> {
                Ok(Some(1))
            }
            fn multi_select(&self, _: &str, _: &[String]) -> Result<Vec<usize>> {
                Ok(vec![1])
            }
            fn input(&self, _: &str) -> Result<String> {
                Ok(String::new())
            }
            fn password(&self, _: &str) -> Result<String> {
                Ok(String::new())
            }
        }

        let chosen =
            choose_from_objects(&PickSecond, &items, |i| i.uuid, |i| i.name, "Pick").unwrap();
        assert_eq!(chosen.map(|i| i.uuid), Some("1"));
    }

    #[test]
    fn test_multiselect_keeps_prompt_order() {
        let prompter = ScriptedSelect::new(vec![vec!["Alpha", "Beta"]]);
        let items = items();

        let chosen =
            choose_many_from_objects(&prompter, &items, |i| i.uuid, |i| i.name, "Pick some")
                .unwrap();

        let uuids: Vec<_> = chosen.iter().map(|i| i.uuid).collect();
        assert_eq!(uuids, vec!["1", "2"]);
    }

    #[test]
    fn test_nothing_chosen() {
        let items = items();
        let chosen = choose_from_objects(
            &NonInteractivePrompter,
            &items,
            |i| i.uuid,
            |i| i.name,
            "Pick",
        )
        .unwrap();
        assert!(chosen.is_none());
    }

    #[test]
    fn test_empty_list_does_not_prompt() {
        let prompter = ScriptedSelect::new(vec![]);
        let items: Vec<Item> = Vec::new();
        let chosen =
            choose_from_objects(&prompter, &items, |i| i.uuid, |i| i.name, "Pick").unwrap();
        assert!(chosen.is_none());
        assert!(prompter.seen.borrow().is_empty());
    }

    #[test]
    fn test_non_interactive_input_is_an_error() {
        assert!(matches!(
            NonInteractivePrompter.input("API key"),
            Err(AcliError::InteractionRequired(_))
        ));
        assert!(NonInteractivePrompter.confirm("Continue?", true).unwrap());
    }
}
