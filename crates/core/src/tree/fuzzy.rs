//! Integer fuzzy-match scoring for file names.
//!
//! The query must appear in the name as a (case-insensitive) subsequence.
//! Matched characters score a base amount, with bonuses for continuing a
//! run and for starting a word; longer names pay a small bounded penalty.
//! A strictly better subsequence match never scores lower.

/// Score assigned to names that do not contain the query as a subsequence.
pub const NO_MATCH: i32 = i32::MIN / 2;

const MATCH_BONUS: i32 = 16;
const CONTIGUOUS_BONUS: i32 = 8;
const WORD_START_BONUS: i32 = 6;
const MAX_LENGTH_PENALTY: i32 = 32;

/// An empty query scores 0 for every name.
pub fn fuzzy_score(name: &str, query: &str) -> i32 {
    if query.is_empty() {
        return 0;
    }

    let chars: Vec<char> = name.chars().collect();
    let folded: Vec<char> = chars.iter().map(|c| fold(*c)).collect();
    let query: Vec<char> = query.chars().map(fold).collect();

    let mut score = 0i32;
    let mut qi = 0usize;
    let mut prev_match: Option<usize> = None;

    for i in 0..folded.len() {
        if qi == query.len() {
            break;
        }
        if folded[i] != query[qi] {
            continue;
        }
        score += MATCH_BONUS;
        if i > 0 && prev_match == Some(i - 1) {
            score += CONTIGUOUS_BONUS;
        }
        if is_word_start(&chars, i) {
            score += WORD_START_BONUS;
        }
        prev_match = Some(i);
        qi += 1;
    }

    if qi < query.len() {
        return NO_MATCH;
    }

    let extra = chars.len().saturating_sub(query.len()) as i32;
    score - extra.min(MAX_LENGTH_PENALTY)
}

fn fold(c: char) -> char {
    c.to_lowercase().next().unwrap_or(c)
}

fn is_word_start(chars: &[char], i: usize) -> bool {
    if i == 0 {
        return true;
    }
    let prev = chars[i - 1];
    matches!(prev, '_' | '-' | '.' | '/' | '\\' | ' ')
        || (prev.is_lowercase() && chars[i].is_uppercase())
}
