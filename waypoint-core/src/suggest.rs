//! Completion candidates for interactive front ends.
//!
//! A front end creates a [`SuggestionsBuilder`] for the partial input it is
//! completing, hands it to a provider (e.g. [`crate::runs::TimelineRegistry::suggest_runs`]),
//! and awaits the deferred [`Suggestions`] result.

use std::future::{ready, Ready};

/// Collects candidate strings for one completion request.
#[derive(Debug, Clone, Default)]
pub struct SuggestionsBuilder {
    input: String,
    candidates: Vec<String>,
}

impl SuggestionsBuilder {
    pub fn new(input: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            candidates: Vec::new(),
        }
    }

    /// The partial input being completed.
    pub fn input(&self) -> &str {
        &self.input
    }

    /// Add a candidate. A candidate identical to the input is not a completion and is skipped.
    pub fn suggest(&mut self, text: impl Into<String>) -> &mut Self {
        let text = text.into();
        if text != self.input {
            self.candidates.push(text);
        }
        self
    }

    pub fn build(self) -> Suggestions {
        let mut list = self.candidates;
        list.sort();
        list.dedup();
        Suggestions {
            input: self.input,
            list,
        }
    }

    /// Deferred form of [`Self::build`] for asynchronous completion callers.
    pub fn build_future(self) -> Ready<Suggestions> {
        ready(self.build())
    }
}

/// A sorted, de-duplicated list of completion candidates.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Suggestions {
    input: String,
    list: Vec<String>,
}

impl Suggestions {
    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn list(&self) -> &[String] {
        &self.list
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    /// Candidates that start with the builder's input, ignoring ASCII case.
    pub fn matching(&self) -> impl Iterator<Item = &str> {
        let prefix = self.input.to_ascii_lowercase();
        self.list
            .iter()
            .map(String::as_str)
            .filter(move |c| c.to_ascii_lowercase().starts_with(&prefix))
    }

    pub fn into_vec(self) -> Vec<String> {
        self.list
    }
}
