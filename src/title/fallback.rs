//! Deterministic fallback titles
//!
//! When a client cannot generate a title (or fails to in time), the title is
//! derived from the message that started the conversation.

/// Title used when there is no usable message text.
pub const DEFAULT_TITLE: &str = "New Chat";

/// Maximum title length, in characters.
pub const MAX_TITLE_CHARS: usize = 40;

/// Marker appended to truncated titles.
pub const ELLIPSIS: &str = "...";

/// Derive a title from the user's message text
///
/// Runs of whitespace (including newlines) collapse to a single space and the
/// result is trimmed. Text of at most [`MAX_TITLE_CHARS`] characters is
/// returned as is; longer text keeps its first 37 characters followed by
/// [`ELLIPSIS`], for exactly 40 characters. Missing or blank text yields
/// [`DEFAULT_TITLE`].
///
/// # Examples
///
/// ```
/// use titler::title::derive_fallback_title;
///
/// assert_eq!(derive_fallback_title(Some("  hello   world  ")), "hello world");
/// assert_eq!(derive_fallback_title(None), "New Chat");
///
/// let long = "a".repeat(50);
/// let title = derive_fallback_title(Some(&long));
/// assert_eq!(title.chars().count(), 40);
/// assert!(title.ends_with("..."));
/// ```
pub fn derive_fallback_title(text: Option<&str>) -> String {
    let Some(text) = text else {
        return DEFAULT_TITLE.to_string();
    };

    let clean = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if clean.is_empty() {
        return DEFAULT_TITLE.to_string();
    }

    if clean.chars().count() <= MAX_TITLE_CHARS {
        return clean;
    }

    let keep = MAX_TITLE_CHARS - ELLIPSIS.chars().count();
    let mut title: String = clean.chars().take(keep).collect();
    title.push_str(ELLIPSIS);
    title
}
