use serde::{Deserialize, Serialize};
use unicode_segmentation::UnicodeSegmentation;

use crate::models::Intent;

/// Treebank clitics. `n't` goes first so "can't" splits as "ca" + "n't".
const CONTRACTION_SUFFIXES: [&str; 7] = ["n't", "'ll", "'re", "'ve", "'s", "'m", "'d"];

/// Lowercases the input and rejoins its words with single spaces, with
/// contraction suffixes detached into words of their own.
pub fn normalize_text(input: &str) -> String {
    let lowered = input.to_lowercase();
    let mut words = Vec::new();
    for word in lowered.unicode_words() {
        match split_contraction(word) {
            Some((stem, suffix)) => {
                words.push(stem);
                words.push(suffix);
            }
            None => words.push(word),
        }
    }
    words.join(" ")
}

fn split_contraction(word: &str) -> Option<(&str, &str)> {
    CONTRACTION_SUFFIXES.iter().find_map(|suffix| {
        let stem = word.strip_suffix(suffix)?;
        (!stem.is_empty() && !stem.ends_with('\'')).then(|| (stem, &word[stem.len()..]))
    })
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntentExamples {
    pub intent: Intent,
    pub phrases: Vec<String>,
}

/// Example phrases per intent, kept in first-seen order so classifier ties
/// resolve deterministically.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntentExampleSet {
    groups: Vec<IntentExamples>,
}

impl IntentExampleSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builtin() -> Self {
        let table: [(Intent, &[&str]); 10] = [
            (
                Intent::BookFlight,
                &["book a flight", "reserve a flight", "flight booking"],
            ),
            (
                Intent::ViewFlights,
                &["view flights", "list flights", "show flights"],
            ),
            (
                Intent::SmallTalk,
                &["how are you", "tell me a joke", "what's up"],
            ),
            (Intent::Farewell, &["exit", "quit", "goodbye"]),
            (
                Intent::MyBooking,
                &["what is my booking", "show my booking details", "booking info"],
            ),
            (
                Intent::UpdateBooking,
                &["update my booking", "change my booking", "modify booking"],
            ),
            (
                Intent::CancelBooking,
                &["cancel my booking", "delete booking", "remove booking"],
            ),
            (Intent::MyName, &["what is my name", "do you know my name"]),
            (Intent::BotName, &["what is your name", "who are you"]),
            (Intent::Help, &["help", "what can you do", "commands"]),
        ];

        let mut set = Self::new();
        for (intent, phrases) in table {
            for phrase in phrases {
                set.push(intent, *phrase);
            }
        }
        set
    }

    /// Appends a phrase to its intent's group, creating the group on first use.
    pub fn push(&mut self, intent: Intent, phrase: impl Into<String>) {
        let phrase = phrase.into();
        match self.groups.iter_mut().find(|group| group.intent == intent) {
            Some(group) => group.phrases.push(phrase),
            None => self.groups.push(IntentExamples {
                intent,
                phrases: vec![phrase],
            }),
        }
    }

    pub fn groups(&self) -> &[IntentExamples] {
        &self.groups
    }

    pub fn examples_for(&self, intent: Intent) -> &[String] {
        self.groups
            .iter()
            .find(|group| group.intent == intent)
            .map(|group| group.phrases.as_slice())
            .unwrap_or(&[])
    }

    /// Every phrase with its intent, flattened in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (Intent, &str)> + '_ {
        self.groups.iter().flat_map(|group| {
            group
                .phrases
                .iter()
                .map(move |phrase| (group.intent, phrase.as_str()))
        })
    }

    pub fn len(&self) -> usize {
        self.groups.iter().map(|group| group.phrases.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
