//! Edits applied to the typed log by keystrokes.
//!
//! The log holds one entry per word. The entry at the current word index is
//! the live word; earlier entries were sealed by a space.

/// Expected character at the live word's next position, if the target word
/// still has one.
pub fn expected_char(words: &[String], typed: &[String], word_index: usize) -> Option<char> {
    let target = words.get(word_index)?;
    let typed_len = typed.get(word_index).map_or(0, |w| w.chars().count());
    target.chars().nth(typed_len)
}

/// Character the keyboard should highlight next: the expected character, or
/// a space once the live word is complete (or overrun).
pub fn next_expected(words: &[String], typed: &[String], word_index: usize) -> char {
    expected_char(words, typed, word_index).unwrap_or(' ')
}

fn live_entry(typed: &mut Vec<String>, word_index: usize) -> &mut String {
    if typed.len() <= word_index {
        typed.resize(word_index + 1, String::new());
    }
    &mut typed[word_index]
}

/// Append `c` to the live word.
pub fn push_char(typed: &mut Vec<String>, word_index: usize, c: char) {
    live_entry(typed, word_index).push(c);
}

/// Remove the last character of the live word. Sealed words are never
/// reopened.
pub fn pop_char(typed: &mut Vec<String>, word_index: usize) {
    live_entry(typed, word_index).pop();
}

/// Seal the live word and open the next one. Returns the new word index.
pub fn seal_word(typed: &mut Vec<String>, word_index: usize) -> usize {
    live_entry(typed, word_index);
    let next = word_index + 1;
    live_entry(typed, next);
    next
}
