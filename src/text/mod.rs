//! Text segmentation at each [`Granularity`].
//!
//! With `keep_separator` every block keeps its trailing separator and the
//! trailing remainder is kept as a last block, so concatenating the blocks
//! always reconstructs the input. Without it, separators are removed and empty
//! pieces are kept (`"a  b"` split at words is `["a", "", "b"]`).

use once_cell::sync::Lazy;
use regex::Regex;

use crate::ir::Granularity;

static SENTENCE_END_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[.?](\s)").expect("valid sentence end regex"));

/// Split `text` into ordered blocks at `granularity`.
///
/// Characters yield one code point each and ignore `keep_separator`. An
/// article is the whole text as a single block.
pub fn segment(text: &str, granularity: Granularity, keep_separator: bool) -> Vec<&str> {
    match granularity {
        Granularity::Character => text
            .char_indices()
            .map(|(start, ch)| &text[start..start + ch.len_utf8()])
            .collect(),
        Granularity::Word => split_at(text, &char_separators(text, ' '), keep_separator),
        Granularity::Sentence => split_at(text, &sentence_separators(text), keep_separator),
        Granularity::Paragraph => split_at(text, &char_separators(text, '\n'), keep_separator),
        Granularity::Article => {
            if text.is_empty() && keep_separator {
                Vec::new()
            } else {
                vec![text]
            }
        }
    }
}

/// Number of blocks [`segment`] would produce.
pub fn count_blocks(text: &str, granularity: Granularity, keep_separator: bool) -> usize {
    segment(text, granularity, keep_separator).len()
}

/// Split at explicit separator byte ranges.
fn split_at<'a>(
    text: &'a str,
    separators: &[(usize, usize)],
    keep_separator: bool,
) -> Vec<&'a str> {
    let mut blocks = Vec::with_capacity(separators.len() + 1);
    let mut start = 0;

    for &(sep_start, sep_end) in separators {
        if keep_separator {
            blocks.push(&text[start..sep_end]);
        } else {
            blocks.push(&text[start..sep_start]);
        }
        start = sep_end;
    }

    let remainder = &text[start..];
    if !keep_separator || !remainder.is_empty() {
        blocks.push(remainder);
    }
    blocks
}

fn char_separators(text: &str, separator: char) -> Vec<(usize, usize)> {
    text.match_indices(separator)
        .map(|(start, matched)| (start, start + matched.len()))
        .collect()
}

/// Whitespace following `.` or `?`, except after abbreviations such as
/// "e.g." or a capitalized Latin/Cyrillic initialism.
fn sentence_separators(text: &str) -> Vec<(usize, usize)> {
    SENTENCE_END_RE
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .filter(|ws| !ends_with_abbreviation(&text[..ws.start()]))
        .map(|ws| (ws.start(), ws.end()))
        .collect()
}

fn ends_with_abbreviation(prefix: &str) -> bool {
    // Reversed: last[0] is the terminal punctuation itself.
    let last: Vec<char> = prefix.chars().rev().take(5).collect();

    // `\w\.\w.` right before the whitespace, e.g. "e.g." or "i.e."
    let dotted =
        last.len() >= 4 && is_word_char(last[1]) && last[2] == '.' && is_word_char(last[3]);

    // `[A-Z][a-z][а-з][А-З]\.`
    let initialism = last.len() == 5
        && last[0] == '.'
        && ('А'..='З').contains(&last[1])
        && ('а'..='з').contains(&last[2])
        && last[3].is_ascii_lowercase()
        && last[4].is_ascii_uppercase();

    dotted || initialism
}

fn is_word_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_'
}
