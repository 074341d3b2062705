//! Emoji normalization and classification.
//!
//! Rendered emoji glyphs are rewritten to canonical `:snake_case_name:` tokens
//! derived from their CLDR names, so that `😍` becomes
//! `:smiling_face_with_heart_eyes:`. Every later stage (classification,
//! counting, reference lookups) works on this normalized form.

use super::data::EmojiClass;
use regex::Regex;
use std::collections::HashMap;

/// Code-point blocks treated as raw emoji: emoticons, symbols & pictographs,
/// transport & map symbols, regional indicators.
const RAW_EMOJI_CLASS: &str =
    r"[\x{1F600}-\x{1F64F}\x{1F300}-\x{1F5FF}\x{1F680}-\x{1F6FF}\x{1F1E0}-\x{1F1FF}]";

/// Bracket-delimited emoji token
const TOKEN_PATTERN: &str = r":[a-z_]+:";

const VARIATION_SELECTOR: char = '\u{FE0F}';

pub struct EmojiNormalizer {
    glyphs: HashMap<String, String>,
    max_glyph_chars: usize,
    token_regex: Regex,
    any_emoji_regex: Regex,
    emoji_only_regex: Regex,
}

impl EmojiNormalizer {
    /// Build the glyph table from the bundled Unicode emoji data.
    pub fn new() -> Self {
        let mut glyphs: HashMap<String, String> = HashMap::new();
        for emoji in emojis::iter() {
            let token = canonical_token(emoji.name());
            register_glyph(&mut glyphs, emoji.as_str(), &token);
            if let Some(tones) = emoji.skin_tones() {
                for toned in tones {
                    register_glyph(&mut glyphs, toned.as_str(), &canonical_token(toned.name()));
                }
            }
        }
        Self::with_glyphs(glyphs)
    }

    /// Build a normalizer over an explicit glyph → token table.
    pub fn with_glyphs(glyphs: HashMap<String, String>) -> Self {
        let max_glyph_chars = glyphs
            .keys()
            .map(|glyph| glyph.chars().count())
            .max()
            .unwrap_or(0);

        EmojiNormalizer {
            glyphs,
            max_glyph_chars,
            token_regex: Regex::new(TOKEN_PATTERN).expect("valid token pattern"),
            any_emoji_regex: Regex::new(&format!("{}|{}", RAW_EMOJI_CLASS, TOKEN_PATTERN))
                .expect("valid emoji pattern"),
            emoji_only_regex: Regex::new(&format!("^(?:{}|{})*$", RAW_EMOJI_CLASS, TOKEN_PATTERN))
                .expect("valid emoji-only pattern"),
        }
    }

    /// Lowercase `text` and rewrite every known glyph to its token.
    ///
    /// The longest glyph sequence starting at a position wins, so ZWJ
    /// sequences and skin-tone variants map to their own token.
    pub fn normalize(&self, text: &str) -> String {
        let lowered = text.to_lowercase();
        let mut out = String::with_capacity(lowered.len());
        let mut rest = lowered.as_str();

        while let Some(ch) = rest.chars().next() {
            match self.longest_glyph(rest, ch) {
                Some((len, token)) => {
                    out.push_str(token);
                    rest = &rest[len..];
                }
                None => {
                    out.push(ch);
                    rest = &rest[ch.len_utf8()..];
                }
            }
        }
        out
    }

    fn longest_glyph<'s>(&'s self, text: &str, first: char) -> Option<(usize, &'s str)> {
        // No glyph starts with an ASCII letter. Other letter-like symbols
        // such as ℹ and 🅱 do.
        if first.is_ascii_alphabetic() || first.is_whitespace() {
            return None;
        }
        let ends: Vec<usize> = text
            .char_indices()
            .take(self.max_glyph_chars)
            .map(|(idx, ch)| idx + ch.len_utf8())
            .collect();

        ends.into_iter().rev().find_map(|end| {
            self.glyphs
                .get(&text[..end])
                .map(|token| (end, token.as_str()))
        })
    }

    /// Classify already-normalized text as emoji-only, mixed or text-only.
    ///
    /// Whitespace-only and empty text classify as emoji-only: the pattern
    /// accepts an empty sequence.
    pub fn classify(&self, text: &str) -> EmojiClass {
        if self.emoji_only_regex.is_match(text.trim()) {
            EmojiClass::EmojiOnly
        } else if self.contains_emoji(text) {
            EmojiClass::Mixed
        } else {
            EmojiClass::TextOnly
        }
    }

    /// True if the text holds a raw emoji glyph or an emoji token anywhere.
    pub fn contains_emoji(&self, text: &str) -> bool {
        self.any_emoji_regex.is_match(text)
            || text.chars().any(|ch| self.is_emoji_char(ch))
    }

    /// True if `ch` alone is a known glyph or lies in a raw emoji block.
    pub fn is_emoji_char(&self, ch: char) -> bool {
        let mut buf = [0u8; 4];
        is_raw_emoji(ch) || self.glyphs.contains_key(&*ch.encode_utf8(&mut buf))
    }

    /// Remove raw emoji glyphs (and their variation selectors) from `text`.
    pub fn strip_emoji(&self, text: &str) -> String {
        text.chars()
            .filter(|&ch| ch != VARIATION_SELECTOR && !self.is_emoji_char(ch))
            .collect()
    }

    /// Number of non-overlapping emoji tokens.
    pub fn count_tokens(&self, text: &str) -> usize {
        self.token_regex.find_iter(text).count()
    }

    /// Emoji tokens in occurrence order, duplicates kept.
    pub fn tokens<'t>(&self, text: &'t str) -> Vec<&'t str> {
        self.token_regex
            .find_iter(text)
            .map(|m| m.as_str())
            .collect()
    }

    /// Token for a single glyph, if known.
    pub fn token_for(&self, glyph: &str) -> Option<&str> {
        self.glyphs.get(glyph).map(String::as_str)
    }
}

impl Default for EmojiNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

fn register_glyph(glyphs: &mut HashMap<String, String>, glyph: &str, token: &str) {
    glyphs
        .entry(glyph.to_string())
        .or_insert_with(|| token.to_string());
    // Text often drops the emoji presentation selector.
    let bare: String = glyph.chars().filter(|&ch| ch != VARIATION_SELECTOR).collect();
    if !bare.is_empty() && bare != glyph {
        glyphs.entry(bare).or_insert_with(|| token.to_string());
    }
}

fn is_raw_emoji(ch: char) -> bool {
    matches!(
        ch as u32,
        0x1F600..=0x1F64F | 0x1F300..=0x1F5FF | 0x1F680..=0x1F6FF | 0x1F1E0..=0x1F1FF
    )
}

/// `:snake_case:` token for an emoji name.
///
/// Spaces, tabs, hyphens, commas and colons become single underscores; other
/// punctuation is dropped. `"flag: United States"` → `:flag_united_states:`.
pub fn canonical_token(name: &str) -> String {
    let mut token = String::with_capacity(name.len() + 2);
    token.push(':');
    let mut pending_sep = false;
    for ch in name.chars() {
        if ch.is_alphanumeric() {
            if pending_sep && token.len() > 1 {
                token.push('_');
            }
            pending_sep = false;
            token.extend(ch.to_lowercase());
        } else if matches!(ch, ' ' | '\t' | '-' | ',' | ':' | '_') {
            pending_sep = true;
        }
    }
    token.push(':');
    token
}
