//! File-name conventions shared by photos, gallery images and projects.
//!
//! The filesystem is the only source of identity, so everything the indexer
//! knows about an entry before reading sidecars comes from its name:
//!
//! - **Id**: the file name with its last extension stripped
//!   (`nature_02.jpg` → `nature_02`).
//! - **Display title**: the id or slug with `-` and `_` turned into spaces
//!   (`brand-film_2024` → `brand film 2024`).
//! - **Order**: case-insensitive and numeric-aware, so `img2` sorts before
//!   `img10`.
//! - **Category prefix**: the leading alphabetic run of an id, when it ends
//!   at the end of the id, a digit, `_` or `-` (`nature1` and `nature_02`
//!   are both `nature`; `national` is its own prefix).

use std::cmp::Ordering;
use std::path::Path;

/// Split a file name into `(id, extension)`. The extension is returned
/// as written; callers lowercase it when classifying.
///
/// - `"dawn.jpg"` → `("dawn", Some("jpg"))`
/// - `"archive.tar.gz"` → `("archive.tar", Some("gz"))`
/// - `"README"` → `("README", None)`
/// - `".hidden"` → `(".hidden", None)`
pub fn split_file_name(file_name: &str) -> (&str, Option<&str>) {
    match file_name.rfind('.') {
        Some(0) | None => (file_name, None),
        Some(pos) => (&file_name[..pos], Some(&file_name[pos + 1..])),
    }
}

/// File id of a path: its file name without the extension.
pub fn file_id(path: &Path) -> String {
    path.file_name()
        .map(|n| split_file_name(&n.to_string_lossy()).0.to_string())
        .unwrap_or_default()
}

/// Human-readable title for an id or slug: separators become spaces.
pub fn display_title(id: &str) -> String {
    id.replace(['-', '_'], " ")
}

/// Compare two names case-insensitively, treating digit runs as numbers.
///
/// Names that compare equal under that rule (`img01` vs `img1`, `A` vs `a`)
/// fall back to a plain byte comparison so the order is total and stable
/// across runs.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    natural_cmp_folded(a, b).then_with(|| a.cmp(b))
}

fn natural_cmp_folded(a: &str, b: &str) -> Ordering {
    let mut left = a.chars().peekable();
    let mut right = b.chars().peekable();

    loop {
        match (left.peek().copied(), right.peek().copied()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(l), Some(r)) if l.is_ascii_digit() && r.is_ascii_digit() => {
                let l_run = take_digits(&mut left);
                let r_run = take_digits(&mut right);
                let ord = compare_digit_runs(&l_run, &r_run);
                if ord != Ordering::Equal {
                    return ord;
                }
            }
            (Some(l), Some(r)) => {
                let ord = l.to_lowercase().cmp(r.to_lowercase());
                if ord != Ordering::Equal {
                    return ord;
                }
                left.next();
                right.next();
            }
        }
    }
}

fn take_digits(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) -> String {
    let mut run = String::new();
    while let Some(c) = chars.peek().copied().filter(char::is_ascii_digit) {
        run.push(c);
        chars.next();
    }
    run
}

/// Numeric comparison of two digit strings of any length.
fn compare_digit_runs(a: &str, b: &str) -> Ordering {
    let a = a.trim_start_matches('0');
    let b = b.trim_start_matches('0');
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

/// The category prefix of a file id, lowercased.
///
/// Returns `None` when the id does not start with a letter, or when the
/// alphabetic run is followed by something other than a digit, `_`, `-` or
/// the end of the id.
///
/// - `"nature1"` → `Some("nature")`
/// - `"Nature_02"` → `Some("nature")`
/// - `"national"` → `Some("national")`
/// - `"001"` → `None`
/// - `"city.night"` → `None`
pub fn category_prefix(id: &str) -> Option<String> {
    let end = id
        .find(|c: char| !c.is_ascii_alphabetic())
        .unwrap_or(id.len());
    if end == 0 {
        return None;
    }
    if is_prefix_boundary(&id[end..]) {
        Some(id[..end].to_ascii_lowercase())
    } else {
        None
    }
}

/// Whether `id` belongs to the category named by `filter` via its prefix.
///
/// The id (lowercased) must start with the filter, and the filter must end
/// at a boundary: end of id, a digit, `_` or `-`. So `nature` matches
/// `nature1` and `nature_02` but not `national` or `naturescape`.
pub fn matches_category_prefix(id: &str, filter: &str) -> bool {
    let id = id.to_lowercase();
    let filter = filter.to_lowercase();
    if filter.is_empty() {
        return false;
    }
    match id.strip_prefix(&filter) {
        Some(rest) => is_prefix_boundary(rest),
        None => false,
    }
}

fn is_prefix_boundary(rest: &str) -> bool {
    match rest.chars().next() {
        None => true,
        Some(c) => c.is_ascii_digit() || c == '_' || c == '-',
    }
}

/// Uppercase the first character; used for prefix-derived category names.
pub fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Whether a directory entry name should be ignored (dotfiles).
pub fn is_hidden(name: &str) -> bool {
    name.starts_with('.')
}

#[cfg(test)]
mod tests {
    use super::*;

    // =========================================================================
    // split_file_name / display_title
    // =========================================================================

    #[test]
    fn split_simple_name() {
        assert_eq!(split_file_name("dawn.jpg"), ("dawn", Some("jpg")));
    }

    #[test]
    fn split_keeps_inner_dots_in_id() {
        assert_eq!(split_file_name("archive.tar.gz"), ("archive.tar", Some("gz")));
    }

    #[test]
    fn split_without_extension() {
        assert_eq!(split_file_name("README"), ("README", None));
        assert_eq!(split_file_name(".hidden"), (".hidden", None));
    }

    #[test]
    fn file_id_from_path() {
        assert_eq!(file_id(Path::new("photos/travel/rome-01.JPG")), "rome-01");
    }

    #[test]
    fn display_title_replaces_separators() {
        assert_eq!(display_title("brand-film_2024"), "brand film 2024");
        assert_eq!(display_title("plain"), "plain");
    }

    // =========================================================================
    // natural_cmp
    // =========================================================================

    fn sorted(names: &[&str]) -> Vec<String> {
        let mut v: Vec<String> = names.iter().map(|s| s.to_string()).collect();
        v.sort_by(|a, b| natural_cmp(a, b));
        v
    }

    #[test]
    fn natural_numeric_runs() {
        assert_eq!(
            sorted(&["img2.jpg", "img10.jpg", "img1.jpg"]),
            vec!["img1.jpg", "img2.jpg", "img10.jpg"]
        );
    }

    #[test]
    fn natural_case_insensitive() {
        assert_eq!(
            sorted(&["beta.jpg", "Alpha.jpg", "gamma.jpg"]),
            vec!["Alpha.jpg", "beta.jpg", "gamma.jpg"]
        );
    }

    #[test]
    fn natural_leading_zeros_equal_value_is_still_total() {
        assert_ne!(natural_cmp("img01", "img1"), Ordering::Equal);
        assert_eq!(natural_cmp("img01", "img2"), Ordering::Less);
    }

    #[test]
    fn natural_very_long_digit_runs() {
        assert_eq!(
            natural_cmp("shot99999999999999999999", "shot100000000000000000000"),
            Ordering::Less
        );
    }

    #[test]
    fn natural_prefix_sorts_first() {
        assert_eq!(natural_cmp("img", "img1"), Ordering::Less);
    }

    // =========================================================================
    // category prefixes
    // =========================================================================

    #[test]
    fn prefix_from_numbered_id() {
        assert_eq!(category_prefix("nature1"), Some("nature".to_string()));
        assert_eq!(category_prefix("Nature_02"), Some("nature".to_string()));
        assert_eq!(category_prefix("city-night"), Some("city".to_string()));
    }

    #[test]
    fn prefix_whole_alphabetic_id() {
        assert_eq!(category_prefix("national"), Some("national".to_string()));
    }

    #[test]
    fn prefix_none_without_letters_or_boundary() {
        assert_eq!(category_prefix("001"), None);
        assert_eq!(category_prefix("city.night"), None);
        assert_eq!(category_prefix(""), None);
    }

    #[test]
    fn prefix_match_requires_boundary() {
        assert!(matches_category_prefix("nature1", "nature"));
        assert!(matches_category_prefix("nature_02", "nature"));
        assert!(matches_category_prefix("nature-03", "Nature"));
        assert!(matches_category_prefix("nature", "nature"));
        assert!(!matches_category_prefix("national", "nature"));
        assert!(!matches_category_prefix("national", "nat"));
        assert!(!matches_category_prefix("naturescape", "nature"));
    }

    #[test]
    fn prefix_match_empty_filter_never_matches() {
        assert!(!matches_category_prefix("nature1", ""));
    }

    #[test]
    fn capitalize_first_letter() {
        assert_eq!(capitalize("nature"), "Nature");
        assert_eq!(capitalize(""), "");
    }

    #[test]
    fn hidden_names() {
        assert!(is_hidden(".DS_Store"));
        assert!(!is_hidden("dawn.jpg"));
    }
}
