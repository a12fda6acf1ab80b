use std::error::Error;
use std::sync::OnceLock;

use clap::ValueEnum;
use include_dir::{include_dir, Dir};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use serde_json::from_str;

static CORPUS_DIR: Dir = include_dir!("src/corpus");

/// Word corpora the game can draw from.
#[derive(
    Debug,
    Copy,
    Clone,
    PartialEq,
    Eq,
    Hash,
    Default,
    ValueEnum,
    Serialize,
    Deserialize,
    strum_macros::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Language {
    #[default]
    English,
    Polish,
}

impl Language {
    pub const ALL: [Language; 2] = [Language::English, Language::Polish];

    /// Name shown in the selector.
    pub fn label(&self) -> &'static str {
        match self {
            Language::English => "English",
            Language::Polish => "Polski",
        }
    }

    pub fn next(self) -> Self {
        match self {
            Language::English => Language::Polish,
            Language::Polish => Language::English,
        }
    }

    pub fn prev(self) -> Self {
        // two corpora, so stepping back is the same as stepping forward
        self.next()
    }

    /// De-duplicated word list for this language, parsed once.
    pub fn corpus(&self) -> &'static Corpus {
        static ENGLISH: OnceLock<Corpus> = OnceLock::new();
        static POLISH: OnceLock<Corpus> = OnceLock::new();

        let cell = match self {
            Language::English => &ENGLISH,
            Language::Polish => &POLISH,
        };
        cell.get_or_init(|| {
            read_corpus_from_file(&format!("{self}.json")).expect("embedded corpus must be valid")
        })
    }
}

#[derive(Deserialize, Clone, Debug)]
pub struct Corpus {
    pub name: String,
    /// Entry count of the source list, duplicates included.
    pub size: u32,
    pub words: Vec<String>,
}

fn read_corpus_from_file(file_name: &str) -> Result<Corpus, Box<dyn Error>> {
    let file = CORPUS_DIR
        .get_file(file_name)
        .ok_or_else(|| format!("corpus file not found: {file_name}"))?;
    let contents = file
        .contents_utf8()
        .ok_or_else(|| format!("corpus file is not utf-8: {file_name}"))?;

    let mut corpus: Corpus = from_str(contents)?;
    corpus.words = corpus.words.into_iter().unique().collect();
    tracing::debug!(
        target: "corpus",
        name = %corpus.name,
        listed = corpus.size,
        distinct = corpus.words.len(),
        "corpus_loaded"
    );

    Ok(corpus)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_english_corpus() {
        let corpus = Language::English.corpus();
        assert_eq!(corpus.name, "english");
        assert!(corpus.words.len() > 100);
        assert!(corpus.words.contains(&"time".to_string()));
    }

    #[test]
    fn test_polish_corpus_is_deduplicated() {
        let corpus = Language::Polish.corpus();
        assert_eq!(corpus.name, "polish");

        let distinct: HashSet<&String> = corpus.words.iter().collect();
        assert_eq!(distinct.len(), corpus.words.len());
        assert!(corpus.words.len() < corpus.size as usize);
    }

    #[test]
    fn test_corpus_words_are_single_tokens() {
        for language in Language::ALL {
            for word in &language.corpus().words {
                assert!(!word.is_empty());
                assert!(!word.contains(char::is_whitespace), "{word:?}");
            }
        }
    }

    #[test]
    fn test_missing_corpus_file_is_an_error() {
        assert!(read_corpus_from_file("klingon.json").is_err());
    }

    #[test]
    fn test_language_display_and_labels() {
        assert_eq!(Language::English.to_string(), "english");
        assert_eq!(Language::Polish.to_string(), "polish");
        assert_eq!(Language::Polish.label(), "Polski");
        assert_eq!(Language::English.next(), Language::Polish);
        assert_eq!(Language::Polish.prev(), Language::English);
    }

    #[test]
    fn test_language_serde_lowercase() {
        let json = serde_json::to_string(&Language::Polish).unwrap();
        assert_eq!(json, "\"polish\"");
        let back: Language = serde_json::from_str("\"english\"").unwrap();
        assert_eq!(back, Language::English);
    }
}
