//! Character-level streaming chunker
//!
//! Accumulates model-generated text one character at a time, strips
//! markup, normalizes the buffer into speakable Russian, and emits
//! fragments at sentence boundaries (or at a length cap as a
//! fallback). State is per-turn and must be `reset` between turns.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::numerals;
use crate::translit;

/// Default fragment length cap in characters.
pub const DEFAULT_MAX_CHUNK_SIZE: usize = 200;

static NUMBER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b\d+\b").expect("valid regex"));
static LATIN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b[A-Za-z]+\b").expect("valid regex"));
static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid regex"));

/// Incremental text normalizer.
///
/// Pure single-threaded logic: `feed` never suspends and holds no
/// hidden globals, so it can be driven inline from whatever owns the
/// delta stream.
#[derive(Debug)]
pub struct StreamChunker {
    max_chunk_size: usize,
    /// Accumulated text with markup already stripped
    clean: String,
    /// Currently inside a `<...>` tag; characters are discarded
    inside_tag: bool,
}

impl Default for StreamChunker {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_CHUNK_SIZE)
    }
}

impl StreamChunker {
    pub fn new(max_chunk_size: usize) -> Self {
        Self {
            max_chunk_size,
            clean: String::new(),
            inside_tag: false,
        }
    }

    /// Feed one character; returns zero or more fragments that became
    /// ready.
    pub fn feed(&mut self, ch: char) -> Vec<String> {
        // Markup never reaches the speakable buffer. A `<` opens
        // suppression; everything through the matching `>` is dropped.
        if ch == '<' {
            self.inside_tag = true;
            return Vec::new();
        }
        if self.inside_tag {
            if ch == '>' {
                self.inside_tag = false;
            }
            return Vec::new();
        }
        self.clean.push(ch);

        let processed = transform(&self.clean);

        // Complete sentence: emit through the terminator, drop the rest
        // of the accumulation context.
        if let Some(end) = find_sentence_end(&processed) {
            let fragment = processed[..end].trim().to_string();
            self.clean.clear();
            if fragment.is_empty() {
                return Vec::new();
            }
            return vec![fragment];
        }

        // Length cap: cut at the last whitespace at or before the
        // limit; the remainder's context is discarded.
        if processed.chars().count() >= self.max_chunk_size {
            let cut = find_cutoff(&processed, self.max_chunk_size);
            let fragment = processed[..cut].trim().to_string();
            self.clean.clear();
            if !fragment.is_empty() {
                return vec![fragment];
            }
        }

        Vec::new()
    }

    /// Feed a whole delta, character by character.
    pub fn feed_str(&mut self, text: &str) -> Vec<String> {
        let mut fragments = Vec::new();
        for ch in text.chars() {
            fragments.extend(self.feed(ch));
        }
        fragments
    }

    /// Emit whatever remains, terminator or not. Returns `None` when
    /// the buffer is empty or whitespace-only.
    pub fn flush(&mut self) -> Option<String> {
        if self.clean.is_empty() {
            return None;
        }
        let processed = transform(&self.clean);
        self.clean.clear();
        if processed.is_empty() {
            None
        } else {
            Some(processed)
        }
    }

    /// Clear all per-turn state. Must be called between turns so stale
    /// partial markup or numbers never leak into the next reply.
    pub fn reset(&mut self) {
        self.clean.clear();
        self.inside_tag = false;
    }

    /// Accumulated unemitted character count (after markup stripping).
    pub fn pending_len(&self) -> usize {
        self.clean.chars().count()
    }
}

/// Normalize a complete string in one pass: symbols to words, numerals
/// spelled out, Latin runs transliterated, whitespace collapsed.
pub fn normalize(text: &str) -> String {
    transform(text)
}

fn transform(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    // Symbols to spoken words
    let mut spoken = String::with_capacity(text.len());
    for ch in text.chars() {
        match translit::spoken_symbol(ch) {
            Some(word) => spoken.push_str(word),
            None => spoken.push(ch),
        }
    }

    // Digit runs to cardinals; parse failure leaves the digits as-is
    let spoken = NUMBER_RE.replace_all(&spoken, |caps: &Captures| match caps[0].parse::<u64>() {
        Ok(n) => numerals::cardinal(n),
        Err(_) => caps[0].to_string(),
    });

    // Latin runs: initialism, dictionary word, or letter-by-letter
    let spoken = LATIN_RE.replace_all(&spoken, |caps: &Captures| transliterate_word(&caps[0]));

    let spoken = WHITESPACE_RE.replace_all(&spoken, " ");
    spoken.trim().to_string()
}

fn transliterate_word(word: &str) -> String {
    // All-uppercase runs of two or more letters are read as
    // initialisms, letter names separated by spaces.
    if word.chars().count() >= 2 && word.chars().all(|c| c.is_ascii_uppercase()) {
        return word
            .chars()
            .filter_map(translit::letter_name)
            .collect::<Vec<_>>()
            .join(" ");
    }

    let lower = word.to_ascii_lowercase();
    if let Some(known) = translit::TRANS_MAP.get(lower.as_str()) {
        return (*known).to_string();
    }

    lower.chars().filter_map(translit::letter_name).collect()
}

/// Byte position just past the last completed sentence, if any.
///
/// A sentence is completed by `.`/`!`/`?` that either ends the buffer
/// or is immediately followed by whitespace.
fn find_sentence_end(text: &str) -> Option<usize> {
    let mut following: Option<char> = None;
    for (i, ch) in text.char_indices().rev() {
        if matches!(ch, '.' | '!' | '?') {
            match following {
                None => return Some(text.len()),
                Some(c) if c.is_whitespace() => return Some(i + ch.len_utf8()),
                Some(_) => {}
            }
        }
        following = Some(ch);
    }
    None
}

/// Byte position for a cut at the last whitespace at or before
/// `max_chars`, falling back to a hard cut when no whitespace exists.
fn find_cutoff(text: &str, max_chars: usize) -> usize {
    let chars: Vec<(usize, char)> = text.char_indices().collect();
    if chars.len() <= max_chars {
        return text.len();
    }

    let mut cut = max_chars;
    while cut > 0 && !chars[cut - 1].1.is_whitespace() {
        cut -= 1;
    }
    if cut == 0 {
        cut = max_chars;
    }
    chars.get(cut).map(|&(i, _)| i).unwrap_or(text.len())
}
