use rand::seq::SliceRandom;
use rand::Rng;

use crate::language::Language;

/// Words generated for one session.
pub const WORD_POOL: usize = 300;
/// Words shown on screen out of the pool.
pub const DISPLAY_WINDOW: usize = 70;
/// A word should not reappear within this many previous words.
pub const MIN_REPEAT_GAP: usize = 7;
/// Re-draws allowed when a candidate repeats too soon.
const MAX_RETRIES: usize = 10;

/// Configuration for word generation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WordGenConfig {
    pub count: usize,
    pub language: Language,
    pub min_repeat_gap: usize,
}

impl WordGenConfig {
    pub fn new(language: Language) -> Self {
        Self {
            count: WORD_POOL,
            language,
            min_repeat_gap: MIN_REPEAT_GAP,
        }
    }
}

/// Generates target word sequences for sessions
pub struct WordGenerator {
    config: WordGenConfig,
}

impl WordGenerator {
    pub fn new(config: WordGenConfig) -> Self {
        Self { config }
    }

    pub fn generate(&self) -> Vec<String> {
        generate_words(
            self.config.count,
            self.config.language,
            self.config.min_repeat_gap,
        )
    }
}

/// Pick `count` words from the corpus of `language`.
///
/// A candidate already present in the last `min_repeat_gap` picks is redrawn
/// a bounded number of times; if every redraw repeats too, the last draw is
/// kept. Small corpora can therefore still produce close repeats.
pub fn generate_words(count: usize, language: Language, min_repeat_gap: usize) -> Vec<String> {
    generate_words_with(
        &mut rand::thread_rng(),
        &language.corpus().words,
        count,
        min_repeat_gap,
    )
}

/// Same as [`generate_words`] over an explicit word list and rng.
pub fn generate_words_with<R: Rng + ?Sized>(
    rng: &mut R,
    words: &[String],
    count: usize,
    min_repeat_gap: usize,
) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(count);
    if words.is_empty() {
        return out;
    }

    for _ in 0..count {
        let recent = &out[out.len().saturating_sub(min_repeat_gap)..];
        let mut candidate = words.choose(rng);
        let mut attempts = 0;
        while attempts < MAX_RETRIES && candidate.is_some_and(|c| recent.contains(c)) {
            candidate = words.choose(rng);
            attempts += 1;
        }
        if let Some(word) = candidate {
            out.push(word.clone());
        }
    }

    tracing::trace!(target: "words", requested = count, generated = out.len(), "words_generated");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn repeats_within(words: &[String], gap: usize) -> usize {
        words
            .iter()
            .enumerate()
            .filter(|&(i, w)| words[i.saturating_sub(gap)..i].contains(w))
            .count()
    }

    #[test]
    fn test_generate_count_and_membership() {
        let words = generate_words(50, Language::English, MIN_REPEAT_GAP);
        let corpus = &Language::English.corpus().words;

        assert_eq!(words.len(), 50);
        assert!(words.iter().all(|w| corpus.contains(w)));
    }

    #[test]
    fn test_generate_zero() {
        assert!(generate_words(0, Language::Polish, MIN_REPEAT_GAP).is_empty());
    }

    #[test]
    fn test_generate_from_empty_list() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(generate_words_with(&mut rng, &[], 10, 7).is_empty());
    }

    #[test]
    fn test_no_close_repeats_with_large_corpus() {
        // with ~200 distinct words eleven draws practically never all collide
        for language in Language::ALL {
            let words = generate_words(WORD_POOL, language, MIN_REPEAT_GAP);
            assert_eq!(words.len(), WORD_POOL);
            assert!(
                repeats_within(&words, MIN_REPEAT_GAP) <= 1,
                "{language}: too many close repeats"
            );
        }
    }

    #[test]
    fn test_tiny_corpus_falls_back_to_repeats() {
        let list: Vec<String> = ["a", "b", "c"].iter().map(|s| s.to_string()).collect();
        let mut rng = StdRng::seed_from_u64(7);

        let words = generate_words_with(&mut rng, &list, 40, 7);

        assert_eq!(words.len(), 40);
        assert!(repeats_within(&words, 7) > 0);
    }

    #[test]
    fn test_single_word_corpus() {
        let list = vec!["only".to_string()];
        let mut rng = StdRng::seed_from_u64(3);
        let words = generate_words_with(&mut rng, &list, 5, 7);
        assert_eq!(words, vec!["only"; 5]);
    }

    #[test]
    fn test_gap_zero_allows_anything() {
        let list: Vec<String> = ["x", "y"].iter().map(|s| s.to_string()).collect();
        let mut rng = StdRng::seed_from_u64(11);
        assert_eq!(generate_words_with(&mut rng, &list, 20, 0).len(), 20);
    }

    #[test]
    fn test_word_generator_uses_config() {
        let config = WordGenConfig {
            count: 12,
            ..WordGenConfig::new(Language::Polish)
        };
        let words = WordGenerator::new(config).generate();
        assert_eq!(words.len(), 12);
        assert!(words
            .iter()
            .all(|w| Language::Polish.corpus().words.contains(w)));
    }

    #[test]
    fn test_default_config() {
        let config = WordGenConfig::new(Language::English);
        assert_eq!(config.count, WORD_POOL);
        assert_eq!(config.min_repeat_gap, MIN_REPEAT_GAP);
        assert!(DISPLAY_WINDOW < WORD_POOL);
    }
}
