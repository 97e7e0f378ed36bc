//! # Text Processing Module
//!
//! Low-level text utilities shared by the label engine:
//!
//! - Bracket-aware tokenization of composition text (`a、b(c、d)、e` → `a`, `b(c、d)`, `e`)
//! - `category(contents)` group parsing for additive declarations
//! - Splitting of compound-ingredient detail into its main and additive sections
//! - Normalization used for every case-insensitive reference lookup
//!
//! ASCII and full-width variants of brackets, commas and slashes are treated as
//! equivalent throughout.

use lazy_static::lazy_static;
use regex::Regex;
use tracing::trace;

/// Characters that open a bracket group
pub const OPEN_BRACKETS: [char; 2] = ['(', '（'];
/// Characters that close a bracket group
pub const CLOSE_BRACKETS: [char; 2] = [')', '）'];
/// Characters separating items of a list
pub const ITEM_SEPARATORS: [char; 3] = [',', '、', '，'];
/// Characters separating the main-ingredient section from the additive section
pub const SECTION_SEPARATORS: [char; 2] = ['/', '／'];

lazy_static! {
    static ref CATEGORY_GROUP: Regex =
        Regex::new(r"^(.+?)[(（](.+?)[)）]$").expect("Invalid category group regex pattern");
}

/// Split `text` into trimmed top-level items.
///
/// A separator only splits when no bracket group is open. The depth counter is
/// never clamped: a stray closing bracket drives it negative and the rest of the
/// text stays in one token, which is the accepted degradation for malformed input.
/// Empty items are not returned.
///
/// # Examples
/// ```
/// use food_labeler::text_processing::split_top_level;
///
/// let tokens = split_top_level("カラメル色素、甘味料(ステビア、甘草)、保存料");
/// assert_eq!(tokens, vec!["カラメル色素", "甘味料(ステビア、甘草)", "保存料"]);
/// assert!(split_top_level("").is_empty());
/// ```
pub fn split_top_level(text: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut depth: i32 = 0;

    for c in text.chars() {
        if OPEN_BRACKETS.contains(&c) {
            depth += 1;
            current.push(c);
        } else if CLOSE_BRACKETS.contains(&c) {
            depth -= 1;
            current.push(c);
        } else if ITEM_SEPARATORS.contains(&c) && depth == 0 {
            push_token(&mut tokens, &current);
            current.clear();
        } else {
            current.push(c);
        }
    }
    push_token(&mut tokens, &current);

    if depth != 0 {
        trace!(depth, text = %text, "Unbalanced brackets in composition text");
    }

    tokens
}

fn push_token(tokens: &mut Vec<String>, raw: &str) {
    let trimmed = raw.trim();
    if !trimmed.is_empty() {
        tokens.push(trimmed.to_string());
    }
}

/// Split a flat list on item separators, ignoring brackets.
pub fn split_items(text: &str) -> Vec<String> {
    text.split(|c: char| ITEM_SEPARATORS.contains(&c))
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

/// Parse a `category(contents)` token.
///
/// The category runs up to the first opening bracket and the contents run to a
/// closing bracket that must be the last character. Returns `None` when the token
/// has no such shape.
pub fn parse_category_group(token: &str) -> Option<(&str, &str)> {
    let captures = CATEGORY_GROUP.captures(token)?;
    let category = captures.get(1)?.as_str().trim();
    let contents = captures.get(2)?.as_str();
    if category.is_empty() {
        return None;
    }
    Some((category, contents))
}

/// The two sections of a compound ingredient's detail text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CompositionSections<'a> {
    /// Sub-ingredients, before the slash
    pub main: Option<&'a str>,
    /// Additives, after the slash
    pub additives: Option<&'a str>,
}

/// Split detail text on the first section separator.
///
/// Only the first two sections are meaningful; anything after a second slash is
/// ignored.
pub fn split_composition(detail: &str) -> CompositionSections<'_> {
    let mut sections = detail
        .split(|c: char| SECTION_SEPARATORS.contains(&c))
        .map(str::trim);

    let main = sections.next().filter(|s| !s.is_empty());
    let additives = sections.next().filter(|s| !s.is_empty());

    CompositionSections { main, additives }
}

/// Normalize text for case-insensitive comparison against reference terms.
///
/// Applied once to reference data at load time and to every input before matching.
pub fn normalize_for_matching(text: &str) -> String {
    text.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nested_groups_stay_together() {
        let tokens = split_top_level("a(b(c、d)、e)、f");
        assert_eq!(tokens, vec!["a(b(c、d)、e)", "f"]);
    }

    #[test]
    fn test_unbalanced_close_swallows_remainder() {
        let tokens = split_top_level("a)、b、c");
        assert_eq!(tokens, vec!["a)、b、c"]);
    }

    #[test]
    fn test_parse_category_group_variants() {
        assert_eq!(parse_category_group("甘味料(ステビア)"), Some(("甘味料", "ステビア")));
        assert_eq!(parse_category_group("保存料（ソルビン酸）"), Some(("保存料", "ソルビン酸")));
        assert_eq!(parse_category_group("pH調整剤"), None);
        assert_eq!(parse_category_group("(ステビア)"), None);
        assert_eq!(parse_category_group("甘味料(ステビア)入り"), None);
    }

    #[test]
    fn test_split_composition_sections() {
        let sections = split_composition("小麦、食塩／カラメル色素");
        assert_eq!(sections.main, Some("小麦、食塩"));
        assert_eq!(sections.additives, Some("カラメル色素"));

        let sections = split_composition("もち米、米こうじ");
        assert_eq!(sections.main, Some("もち米、米こうじ"));
        assert_eq!(sections.additives, None);

        let sections = split_composition("a/b/c");
        assert_eq!(sections.main, Some("a"));
        assert_eq!(sections.additives, Some("b"));
    }

    #[test]
    fn test_normalize_for_matching() {
        assert_eq!(normalize_for_matching("  Soy Sauce "), "soy sauce");
        assert_eq!(normalize_for_matching("醤油"), "醤油");
    }
}
