//! Name extraction from explicit introductions, and `{name}` reply templating.

use std::sync::LazyLock;

use regex::Regex;

/// Placeholder a reply may carry for the user's name.
pub const NAME_PLACEHOLDER: &str = "{name}";

/// Used when a reply asks for a name the message did not give.
const FALLBACK_NAME: &str = "friend";

static INTRODUCTION_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)\bmy name is ([a-z]{1,15})\b",
        r"(?i)\bcall me ([a-z]{1,15})\b",
        r"(?i)\bi am ([a-z]{1,15})\b",
        r"(?i)\bi'm ([a-z]{1,15})\b",
        r"(?i)\bthis is ([a-z]{1,15})\b",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

/// Words that follow "I am" / "I'm" without being names.
static NOT_NAMES: &[&str] = &[
    "feeling", "sad", "happy", "angry", "good", "bad", "fine", "okay", "well", "great",
    "terrible", "stressed", "tired", "confused", "lost", "studying", "working", "learning",
    "thinking", "going", "doing", "lonely", "excited", "proud", "hurt", "scared", "anxious",
    "guilty", "so", "very", "really", "not", "just", "a", "an", "the",
];

/// Name given in an explicit introduction ("my name is sam" → `Sam`).
pub fn extract_name(text: &str) -> Option<String> {
    INTRODUCTION_PATTERNS.iter().find_map(|re| {
        let candidate = re.captures(text)?.get(1)?.as_str().to_lowercase();
        if NOT_NAMES.contains(&candidate.as_str()) {
            return None;
        }
        let mut chars = candidate.chars();
        let first = chars.next()?;
        Some(first.to_uppercase().chain(chars).collect())
    })
}

/// Substitute [`NAME_PLACEHOLDER`] in `reply` with the name introduced in `message`.
pub fn personalize(reply: &str, message: &str) -> String {
    if !reply.contains(NAME_PLACEHOLDER) {
        return reply.to_string();
    }
    let name = extract_name(message);
    reply.replace(NAME_PLACEHOLDER, name.as_deref().unwrap_or(FALLBACK_NAME))
}
