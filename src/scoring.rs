//! Scoring for a word-by-word typing session.
//!
//! [`compute_stats`] is recomputed from scratch on every keystroke and on
//! every timer tick, so it must stay cheap and free of hidden state.

/// Characters per "word" in the WPM convention.
pub const CHARS_PER_WORD: f64 = 5.0;

/// Point-in-time scoring result for a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScoringSnapshot {
    pub correct_chars: usize,
    pub incorrect_chars: usize,
    pub extra_chars: usize,
    pub missed_chars: usize,
    /// correct + incorrect + extra
    pub total_chars: usize,
    pub wpm: u32,
    pub raw_wpm: u32,
    /// Rounded percentage, 100 when nothing was typed.
    pub accuracy: u32,
    /// Sealed words typed exactly as the target.
    pub perfect_words: usize,
    /// Space presses implied by the typed log. Informational, no rate uses it.
    pub separators: usize,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct WordScore {
    correct: usize,
    incorrect: usize,
    extra: usize,
    missed: usize,
    clean: bool,
}

/// Classify every character of one word.
///
/// Missing target characters only count as missed when `count_missing` is
/// set; for the live word they simply haven't been typed yet.
fn score_word(typed: &str, target: &str, count_missing: bool) -> WordScore {
    let mut score = WordScore {
        clean: true,
        ..WordScore::default()
    };
    let mut typed_chars = typed.chars();
    let mut target_chars = target.chars();

    loop {
        match (typed_chars.next(), target_chars.next()) {
            (Some(input), Some(expected)) if input == expected => score.correct += 1,
            (Some(_), Some(_)) => {
                score.incorrect += 1;
                score.clean = false;
            }
            (Some(_), None) => {
                score.extra += 1;
                score.clean = false;
            }
            (None, Some(_)) => {
                if count_missing {
                    score.missed += 1;
                    score.clean = false;
                }
            }
            (None, None) => break,
        }
    }

    score
}

/// Score `typed_log` against `target_words` as of `elapsed_secs`.
///
/// Trailing empty entries of the log are ignored. Until `finished`, the last
/// non-empty entry is the live word and its untyped tail is not a miss,
/// unless an empty entry follows it: then a space already sealed it. Once
/// finished, the word right after the last typed one is scored as well so an
/// abandoned word shows up as missed characters. A session where nothing was
/// typed has no such word.
pub fn compute_stats<W, T>(
    target_words: &[W],
    typed_log: &[T],
    elapsed_secs: u64,
    finished: bool,
) -> ScoringSnapshot
where
    W: AsRef<str>,
    T: AsRef<str>,
{
    let typed_len = typed_log
        .iter()
        .rposition(|word| !word.as_ref().is_empty())
        .map_or(0, |idx| idx + 1);
    let typed = &typed_log[..typed_len];

    let words_to_check = if finished {
        typed_len + 1
    } else {
        typed_len.max(1)
    }
    .min(target_words.len());

    let sealed_until = if finished || typed_log.len() > typed_len {
        typed_len
    } else {
        typed_len.saturating_sub(1)
    };

    let mut snapshot = ScoringSnapshot::default();
    let mut scored_entries: usize = 0;

    for (idx, target) in target_words.iter().take(words_to_check).enumerate() {
        let target = target.as_ref();
        let input = typed.get(idx).map_or("", |word| word.as_ref());
        if idx < typed_len {
            scored_entries += 1;
        }

        let sealed = idx < sealed_until;
        let terminal = finished && typed_len > 0 && idx == typed_len;
        let score = score_word(input, target, sealed || terminal);

        snapshot.correct_chars += score.correct;
        snapshot.incorrect_chars += score.incorrect;
        snapshot.extra_chars += score.extra;
        snapshot.missed_chars += score.missed;

        if sealed && score.clean && input == target {
            snapshot.perfect_words += 1;
        }
    }

    snapshot.separators = scored_entries.saturating_sub(1);
    snapshot.total_chars = snapshot.correct_chars + snapshot.incorrect_chars + snapshot.extra_chars;

    let (wpm, raw_wpm, accuracy) = rates(snapshot.correct_chars, snapshot.total_chars, elapsed_secs);
    snapshot.wpm = wpm;
    snapshot.raw_wpm = raw_wpm;
    snapshot.accuracy = accuracy;

    snapshot
}

/// WPM, raw WPM and accuracy percentage, all rounded.
///
/// WPM is the raw rate discounted by accuracy. Accuracy reads 100 when
/// nothing was typed while the discount factor is 0, so WPM stays 0.
fn rates(correct: usize, total: usize, elapsed_secs: u64) -> (u32, u32, u32) {
    let minutes = elapsed_secs.max(1) as f64 / 60.0;
    let raw_exact = (total as f64 / CHARS_PER_WORD) / minutes;
    let accuracy_frac = if total == 0 {
        0.0
    } else {
        correct as f64 / total as f64
    };
    let wpm_exact = raw_exact * accuracy_frac;
    let accuracy = if total == 0 {
        100
    } else {
        (accuracy_frac * 100.0).round() as u32
    };

    (wpm_exact.round() as u32, raw_exact.round() as u32, accuracy)
}
