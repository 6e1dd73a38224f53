//! English inflection for turning type names into directory and file names.
//!
//! Covers the rules needed to derive table names the way web frameworks do:
//! `Person` -> `people`, `BlogPost` -> `blog_posts`, `Category` -> `categories`.

use once_cell::sync::Lazy;
use regex::Regex;

// Later entries win, so the most specific rules sit at the bottom.
static PLURAL_RULES: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    [
        (r"$", "s"),
        (r"(?i)s$", "s"),
        (r"(?i)^(ax|test)is$", "${1}es"),
        (r"(?i)(octop|vir)us$", "${1}i"),
        (r"(?i)(alias|status)$", "${1}es"),
        (r"(?i)(bu)s$", "${1}ses"),
        (r"(?i)(buffal|tomat)o$", "${1}oes"),
        (r"(?i)([ti])um$", "${1}a"),
        (r"(?i)sis$", "ses"),
        (r"(?i)(?:([^f])fe|([lr])f)$", "${1}${2}ves"),
        (r"(?i)(hive)$", "${1}s"),
        (r"(?i)([^aeiouy]|qu)y$", "${1}ies"),
        (r"(?i)(x|ch|ss|sh)$", "${1}es"),
        (r"(?i)(matr|vert|ind)(?:ix|ex)$", "${1}ices"),
        (r"(?i)^(m|l)ouse$", "${1}ice"),
        (r"(?i)^(ox)$", "${1}en"),
        (r"(?i)^(quiz)$", "${1}zes"),
    ]
    .into_iter()
    .map(|(pattern, replacement)| (Regex::new(pattern).unwrap(), replacement))
    .collect()
});

static IRREGULARS: &[(&str, &str)] = &[
    ("person", "people"),
    ("man", "men"),
    ("child", "children"),
    ("sex", "sexes"),
    ("move", "moves"),
    ("zombie", "zombies"),
];

static UNCOUNTABLE: &[&str] = &[
    "equipment",
    "information",
    "rice",
    "money",
    "species",
    "series",
    "fish",
    "sheep",
    "jeans",
    "police",
];

static ACRONYM_BOUNDARY: Lazy<Regex> = Lazy::new(|| Regex::new(r"([A-Z\d]+)([A-Z][a-z])").unwrap());
static WORD_BOUNDARY: Lazy<Regex> = Lazy::new(|| Regex::new(r"([a-z\d])([A-Z])").unwrap());

/// Pluralize a lowercase, underscored word.
///
/// Irregular and uncountable words are matched against the last
/// underscore-separated segment, so `sales_person` becomes `sales_people`.
pub fn pluralize(word: &str) -> String {
    if word.is_empty() {
        return String::new();
    }

    let (prefix, last) = match word.rfind('_') {
        Some(idx) => word.split_at(idx + 1),
        None => ("", word),
    };
    let last_lower = last.to_lowercase();

    if UNCOUNTABLE.contains(&last_lower.as_str()) {
        return word.to_string();
    }

    if let Some((_, plural)) = IRREGULARS.iter().find(|(singular, _)| *singular == last_lower) {
        return format!("{}{}", prefix, plural);
    }

    for (rule, replacement) in PLURAL_RULES.iter().rev() {
        if rule.is_match(word) {
            return rule.replace(word, *replacement).into_owned();
        }
    }

    word.to_string()
}

/// Convert a CamelCase name into lowercase snake_case.
pub fn underscore(name: &str) -> String {
    let name = name.replace("::", "_");
    let name = ACRONYM_BOUNDARY.replace_all(&name, "${1}_${2}");
    let name = WORD_BOUNDARY.replace_all(&name, "${1}_${2}");
    name.replace('-', "_").to_lowercase()
}

/// Derive the table (directory) name for a type name.
pub fn tableize(name: &str) -> String {
    pluralize(&underscore(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tableize_irregular() {
        assert_eq!(tableize("Person"), "people");
        assert_eq!(tableize("SalesPerson"), "sales_people");
        assert_eq!(tableize("Child"), "children");
    }

    #[test]
    fn test_tableize_regular_rules() {
        assert_eq!(tableize("BlogPost"), "blog_posts");
        assert_eq!(tableize("Category"), "categories");
        assert_eq!(tableize("Address"), "addresses");
        assert_eq!(tableize("Box"), "boxes");
        assert_eq!(tableize("Wife"), "wives");
        assert_eq!(tableize("Matrix"), "matrices");
        assert_eq!(tableize("Status"), "statuses");
        assert_eq!(tableize("Day"), "days");
    }

    #[test]
    fn test_uncountable() {
        assert_eq!(tableize("Equipment"), "equipment");
        assert_eq!(tableize("Sheep"), "sheep");
    }

    #[test]
    fn test_underscore() {
        assert_eq!(underscore("Person"), "person");
        assert_eq!(underscore("BlogPost"), "blog_post");
        assert_eq!(underscore("HTTPRequest"), "http_request");
        assert_eq!(underscore("Admin::User"), "admin_user");
    }

    #[test]
    fn test_pluralize_empty() {
        assert_eq!(pluralize(""), "");
    }
}
