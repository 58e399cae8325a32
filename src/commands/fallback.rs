use crate::title::derive_fallback_title;

/// Print the fallback title for `text`
pub fn run_fallback(text: &str) {
    println!("{}", derive_fallback_title(Some(text)));
}
