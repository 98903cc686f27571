//! Wildcard pattern compilation and matching
//!
//! Action patterns use two wildcard tokens: `*` matches zero or more
//! characters and `?` matches exactly one. Matching is always
//! case-insensitive and anchored to the whole candidate string, and
//! `\uXXXX` escapes are replaced by their code points on both sides
//! before anything is compared.

use crate::catalog::CatalogProvider;
use regex::Regex;
use std::sync::LazyLock;

static UNICODE_ESCAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\\u([0-9a-fA-F]{4})").expect("escape pattern is valid"));

/// Replace every `\uXXXX` escape in `input` with the character at that code
/// point. Escapes that do not name a valid scalar value (lone surrogates)
/// are left in place.
pub fn unescape_unicode(input: &str) -> String {
    if !input.contains("\\u") {
        return input.to_string();
    }
    UNICODE_ESCAPE
        .replace_all(input, |caps: &regex::Captures<'_>| {
            let code = u32::from_str_radix(&caps[1], 16).expect("captured four hex digits");
            match char::from_u32(code) {
                Some(c) => c.to_string(),
                None => caps[0].to_string(),
            }
        })
        .into_owned()
}

/// True when `input` is one or more `*` characters and nothing else.
///
/// Both engines treat such a run as "everything": expansion resolves it to
/// the whole catalog, inversion to the empty complement.
pub fn is_asterisk_run(input: &str) -> bool {
    !input.is_empty() && input.bytes().all(|b| b == b'*')
}

/// Split a `service:action` string into its two parts.
///
/// Returns `None` when there is no colon or more than one.
pub(crate) fn split_action(input: &str) -> Option<(&str, &str)> {
    let mut parts = input.splitn(3, ':');
    let service = parts.next()?;
    let action = parts.next()?;
    if parts.next().is_some() {
        return None;
    }
    Some((service, action))
}

/// A compiled action pattern.
///
/// Compilation cannot fail: every character that is not a wildcard token is
/// escaped, so the generated regex is always valid.
#[derive(Debug, Clone)]
pub struct WildcardPattern {
    regex: Regex,
}

impl WildcardPattern {
    /// Compile a wildcard pattern into an anchored, case-insensitive
    /// matcher. The pattern is unescaped first.
    pub fn compile(pattern: &str) -> Self {
        let pattern = unescape_unicode(pattern);
        let mut source = String::with_capacity(pattern.len() + 8);
        source.push_str("(?i)^");
        let mut literal = String::new();
        for c in pattern.chars() {
            match c {
                '*' | '?' => {
                    source.push_str(&regex::escape(&literal));
                    literal.clear();
                    source.push_str(if c == '*' { ".*" } else { "." });
                }
                other => literal.push(other),
            }
        }
        source.push_str(&regex::escape(&literal));
        source.push('$');

        let regex = Regex::new(&source).expect("every literal character is escaped");
        Self { regex }
    }

    /// Test a candidate against the pattern. The candidate is unescaped
    /// before matching, the same way the pattern was at compile time.
    pub fn matches(&self, text: &str) -> bool {
        self.regex.is_match(&unescape_unicode(text))
    }
}

/// Test a single action against a single pattern, with no catalog involved.
///
/// Both sides may carry `\uXXXX` escapes; the pattern may carry wildcards.
pub fn action_matches_pattern(action: &str, pattern: &str) -> bool {
    WildcardPattern::compile(pattern).matches(action)
}

/// Check whether `action` matches at least one catalog entry.
///
/// The action may contain wildcards in its action part. Returns false for
/// anything that is not `service:action` shaped or whose service is
/// unknown.
pub async fn matches_any_action(catalog: &dyn CatalogProvider, action: &str) -> bool {
    let Some((service, action_name)) = split_action(action) else {
        return false;
    };
    let service = service.to_lowercase();

    if !catalog.service_exists(&service).await {
        return false;
    }

    if action_name.contains('*') || action_name.contains('?') {
        let matcher = WildcardPattern::compile(action_name);
        return catalog
            .actions_for_service(&service)
            .await
            .iter()
            .any(|known| matcher.matches(known));
    }

    catalog
        .action_exists(&service, &action_name.to_lowercase())
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::InMemoryCatalog;
    use rstest::rstest;

    #[test]
    fn test_unescape_unicode() {
        assert_eq!(unescape_unicode(r"\u0042ucket"), "Bucket");
        assert_eq!(unescape_unicode(r"Get\u004Fbject"), "GetObject");
        assert_eq!(unescape_unicode(r"\u0047\u0065\u0074"), "Get");
        assert_eq!(unescape_unicode("no escapes here"), "no escapes here");
    }

    #[test]
    fn test_unescape_leaves_malformed_escapes_alone() {
        // Too few digits, and a lone surrogate
        assert_eq!(unescape_unicode(r"\u00"), r"\u00");
        assert_eq!(unescape_unicode(r"\uD800"), r"\uD800");
    }

    #[rstest]
    #[case("", false)]
    #[case("*", true)]
    #[case("***", true)]
    #[case("*a*", false)]
    #[case("s3:*", false)]
    fn test_is_asterisk_run(#[case] input: &str, #[case] expected: bool) {
        assert_eq!(is_asterisk_run(input), expected);
    }

    #[test]
    fn test_split_action() {
        assert_eq!(split_action("s3:GetObject"), Some(("s3", "GetObject")));
        assert_eq!(split_action("s3:"), Some(("s3", "")));
        assert_eq!(split_action("s3GetObject"), None);
        assert_eq!(split_action("s3:Get:Extra"), None);
    }

    #[test]
    fn test_exact_match_is_case_insensitive() {
        let matcher = WildcardPattern::compile("GetObject");
        assert!(matcher.matches("GetObject"));
        assert!(matcher.matches("getobject"));
        assert!(matcher.matches("GETOBJECT"));
        assert!(!matcher.matches("GetObjectAcl"));
    }

    #[test]
    fn test_matcher_is_anchored() {
        let matcher = WildcardPattern::compile("Get");
        assert!(!matcher.matches("GetObject"));
        assert!(!matcher.matches("ForGet"));
        assert!(matcher.matches("Get"));
    }

    #[test]
    fn test_asterisk_matches_zero_or_more() {
        let matcher = WildcardPattern::compile("Get*");
        assert!(matcher.matches("Get"));
        assert!(matcher.matches("GetObject"));
        assert!(!matcher.matches("PutObject"));

        let matcher = WildcardPattern::compile("*Object");
        assert!(matcher.matches("GetObject"));
        assert!(matcher.matches("Object"));
        assert!(!matcher.matches("GetObjectAcl"));
    }

    #[test]
    fn test_question_mark_matches_exactly_one() {
        let matcher = WildcardPattern::compile("Get??????");
        assert!(matcher.matches("GetObject"));
        assert!(matcher.matches("GetBucket"));
        assert!(!matcher.matches("GetJob"));
        assert!(!matcher.matches("GetObjectAcl"));
    }

    #[test]
    fn test_regex_metacharacters_are_literal() {
        let matcher = WildcardPattern::compile("Get.Object");
        assert!(matcher.matches("Get.Object"));
        assert!(!matcher.matches("GetXObject"));

        let matcher = WildcardPattern::compile("a+b(c)");
        assert!(matcher.matches("a+b(c)"));
    }

    #[rstest]
    #[case("s3:ListAllMyBuckets", "s3:ListAllMyBuckets", true)]
    #[case("s3:ListAllMyBuckets", "S3:LISTALLMYBUCKETS", true)]
    #[case("s3:ListAllMyBuckets", "s3:ListNoteOfMyBuckets", false)]
    #[case("s3:ListAllMyBuckets", "s3:List*", true)]
    #[case("s3:ListAllMyBuckets", "s3:List?llMyBuckets", true)]
    #[case("s3:ListAllMyBuckets", "S3:LIST*", true)]
    #[case("s3:ListAllMyBuckets", r"s3:List\u0041*", true)]
    #[case(r"s3:ListAllMyBucke\u0074s", r"s3:ListAllMy\u0042uckets", true)]
    fn test_action_matches_pattern(
        #[case] action: &str,
        #[case] pattern: &str,
        #[case] expected: bool,
    ) {
        assert_eq!(action_matches_pattern(action, pattern), expected);
    }

    fn catalog() -> InMemoryCatalog {
        InMemoryCatalog::new()
            .with_service("s3", &["ListAllMyBuckets", "GetObject", "PutObject"])
    }

    #[tokio::test]
    async fn test_matches_any_action_exact() {
        let catalog = catalog();
        assert!(matches_any_action(&catalog, "s3:ListAllMyBuckets").await);
        assert!(!matches_any_action(&catalog, "s3:UnknownAction").await);
    }

    #[tokio::test]
    async fn test_matches_any_action_unknown_service() {
        let catalog = catalog();
        assert!(!matches_any_action(&catalog, "nonexistentservice:ListAllMyBuckets").await);
    }

    #[tokio::test]
    async fn test_matches_any_action_bad_format() {
        let catalog = catalog();
        assert!(!matches_any_action(&catalog, "invalidactionstring").await);
    }

    #[tokio::test]
    async fn test_matches_any_action_wildcards() {
        let catalog = catalog();
        assert!(matches_any_action(&catalog, "s3:List*").await);
        assert!(!matches_any_action(&catalog, "s3:*ThisDoesNotExist*").await);
    }
}
