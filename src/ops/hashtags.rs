//! Hashtag extraction. Tags live in the note body; this is the only place
//! a note's tag set is derived from.

use std::sync::LazyLock;

use regex::Regex;

// A tag is `#` (or fullwidth `＃`) followed by letters, marks, digits and
// underscores containing at least one letter. It must not follow `&` or a
// word character, so "a#b" and "&#39;" are not tags.
static HASHTAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:^|[^&\p{L}\p{M}\p{N}_])[#\x{FF03}]([\p{L}\p{M}\p{N}_]*[\p{L}\p{M}][\p{L}\p{M}\p{N}_]*)")
        .expect("valid hashtag pattern")
});

/// Tag names in `text`, in first-seen order, without duplicates.
pub fn parse_tags(text: &str) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();
    for caps in HASHTAG.captures_iter(text) {
        let name = &caps[1];
        if !tags.iter().any(|t| t == name) {
            tags.push(name.to_string());
        }
    }
    tags
}

/// Render tags as `#tag` tokens separated by spaces.
pub fn to_hashtags<'a>(tags: impl IntoIterator<Item = &'a String>) -> String {
    tags.into_iter()
        .map(|t| format!("#{}", t))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_tags_anywhere_in_text() {
        assert_eq!(
            parse_tags("body1\n #tag1 #tag2 #tag3"),
            vec!["tag1", "tag2", "tag3"]
        );
        assert_eq!(parse_tags("#work at start, and (#home)"), vec!["work", "home"]);
    }

    #[test]
    fn skips_numbers_entities_and_mid_word_hashes() {
        assert!(parse_tags("issue #123").is_empty());
        assert!(parse_tags("it&#39;s").is_empty());
        assert!(parse_tags("C#sharp").is_empty());
    }

    #[test]
    fn keeps_first_seen_order_without_duplicates() {
        assert_eq!(parse_tags("#b #a #b #a"), vec!["b", "a"]);
    }

    #[test]
    fn unicode_and_fullwidth_hash() {
        assert_eq!(parse_tags("#café ＃日本語 #v2"), vec!["café", "日本語", "v2"]);
    }

    #[test]
    fn renders_tokens() {
        let tags = vec!["work".to_string(), "ideas".to_string()];
        assert_eq!(to_hashtags(&tags), "#work #ideas");
        assert_eq!(to_hashtags(&Vec::<String>::new()), "");
    }
}
