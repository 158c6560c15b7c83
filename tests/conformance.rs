//! End-to-end behavior of parsing and resolution, in the style of the
//! EditorConfig core test suite. Everything runs against in-memory trees.

use ecfg::{
    CollectingErrorHandler, EditorConfig, ErrorKind, ErrorPolicy, MemoryTree, ParseOptions,
    Resolver, ResolverConfig, Version,
};

fn resolve_in(tree: &MemoryTree, target: &str, config: ResolverConfig) -> Vec<(String, String)> {
    Resolver::new(config)
        .resolve(&tree.resource(target))
        .unwrap()
        .properties()
        .iter()
        .map(|p| (p.name().to_string(), p.value().to_string()))
        .collect()
}

/// Resolve `target` against a single `/t/.editorconfig` holding `config`
fn resolve(config: &str, target: &str) -> Vec<(String, String)> {
    let tree = MemoryTree::new().with_file("/t/.editorconfig", &format!("root = true\n{config}"));
    resolve_in(&tree, target, ResolverConfig::default())
}

fn pairs(expected: &[(&str, &str)]) -> Vec<(String, String)> {
    expected
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn matches(glob: &str, target: &str) -> bool {
    !resolve(&format!("[{glob}]\nkey = value\n"), target).is_empty()
}

// ===========================================
// Globs
// ===========================================

#[test]
fn test_glob_star() {
    assert!(matches("a*e.c", "/t/ace.c"));
    assert!(matches("a*e.c", "/t/abcde.c"));
    assert!(!matches("a*e.c", "/t/a/e.c"));
    assert!(matches("*", "/t/sub/dir/file"));
}

#[test]
fn test_glob_without_slash_matches_in_subdirectories() {
    assert!(matches("a.c", "/t/a.c"));
    assert!(matches("a.c", "/t/x/y/a.c"));
    assert!(!matches("a.c", "/t/ba.c"));
}

#[test]
fn test_glob_with_slash_is_relative_to_config_dir() {
    assert!(matches("a/b.c", "/t/a/b.c"));
    assert!(!matches("a/b.c", "/t/x/a/b.c"));
    assert!(matches("/b.c", "/t/b.c"));
    assert!(!matches("/b.c", "/t/a/b.c"));
}

#[test]
fn test_glob_double_star() {
    assert!(matches("a/**/z.c", "/t/a/z.c"));
    assert!(matches("a/**/z.c", "/t/a/b/c/d/z.c"));
    assert!(!matches("a/**/z.c", "/t/b/z.c"));
}

#[test]
fn test_glob_question_mark() {
    assert!(matches("som?.c", "/t/some.c"));
    assert!(!matches("som?.c", "/t/som.c"));
    assert!(!matches("som?.c", "/t/som/.c"));
}

#[test]
fn test_glob_brackets() {
    assert!(matches("[a-c].c", "/t/b.c"));
    assert!(!matches("[a-c].c", "/t/d.c"));
    assert!(matches("[!a-c].c", "/t/d.c"));
    assert!(!matches("[!a-c].c", "/t/b.c"));
}

#[test]
fn test_glob_braces() {
    assert!(matches("*.{c,h}", "/t/main.c"));
    assert!(matches("*.{c,h}", "/t/main.h"));
    assert!(!matches("*.{c,h}", "/t/main.o"));
    assert!(matches("{single}.b", "/t/{single}.b"));
    assert!(!matches("{single}.b", "/t/single.b"));
}

#[test]
fn test_glob_numeric_range() {
    assert!(matches("file{3..12}.txt", "/t/file3.txt"));
    assert!(matches("file{3..12}.txt", "/t/file12.txt"));
    assert!(!matches("file{3..12}.txt", "/t/file13.txt"));
    assert!(!matches("file{3..12}.txt", "/t/file05.txt"));
}

#[test]
fn test_glob_escaped_comment_characters() {
    assert!(matches("ab\\#c", "/t/ab#c"));
    assert!(matches("ab\\;c", "/t/ab;c"));
}

#[test]
fn test_invalid_glob_never_matches() {
    let long = "a".repeat(5000);
    assert!(!matches(&long, &format!("/t/{long}")));
}

// ===========================================
// Parser
// ===========================================

#[test]
fn test_whitespace_around_names_and_values() {
    let resolved = resolve("[*]\n  key1   =   value with spaces   \n\tkey2\t:\tv2\n", "/t/a");
    assert_eq!(
        resolved,
        pairs(&[("key1", "value with spaces"), ("key2", "v2")])
    );
}

#[test]
fn test_comments() {
    let resolved = resolve(
        "# comment\n; another\n[*] ; header comment\nkey = value ; inline\nother = a;b\n",
        "/t/a",
    );
    assert_eq!(resolved, pairs(&[("key", "value"), ("other", "a;b")]));
}

#[test]
fn test_bracket_in_section_name() {
    assert_eq!(
        resolve("[[ab].c]\nkey = value\n", "/t/a.c"),
        pairs(&[("key", "value")])
    );
}

fn glob_errors(text: &str) -> Vec<ErrorKind> {
    let mut errors = CollectingErrorHandler::new();
    EditorConfig::parse_str("/t", text, &ParseOptions::default(), &mut errors).unwrap();
    errors.events().iter().map(|e| e.kind).collect()
}

#[test]
fn test_unclosed_empty_header_applies_nowhere() {
    for header in ["[", "[   "] {
        let text = format!("{header}\nindent_size = 2\n");
        assert_eq!(glob_errors(&text), vec![ErrorKind::GlobNotClosed], "{header:?}");
        assert!(resolve(&text, "/t/a.c").is_empty(), "{header:?}");
    }
}

#[test]
fn test_bracket_in_trailing_comment_does_not_close_header() {
    let text = "[foo ; x]\nkey = value\n";
    assert_eq!(glob_errors(text), vec![ErrorKind::GlobNotClosed]);
    assert!(resolve(text, "/t/foo").is_empty());
    assert!(resolve(text, "/t/foo ; x").is_empty());
}

#[test]
fn test_comment_after_closed_header_may_hold_brackets() {
    assert_eq!(
        resolve("[foo] ; see [bar]\nkey = value\n", "/t/foo"),
        pairs(&[("key", "value")])
    );
}

#[test]
fn test_crlf_line_endings() {
    let resolved = resolve("[*]\r\nkey = value\r\n", "/t/a");
    assert_eq!(resolved, pairs(&[("key", "value")]));
}

#[test]
fn test_property_without_value_is_reported_and_skipped() {
    let mut errors = CollectingErrorHandler::new();
    let config = EditorConfig::parse_str(
        "/t",
        "[*]\nkey =\nother = x\n",
        &ParseOptions::default(),
        &mut errors,
    )
    .unwrap();

    assert_eq!(config.sections()[0].properties().len(), 1);
    let kinds: Vec<_> = errors.events().iter().map(|e| e.kind).collect();
    assert_eq!(kinds, vec![ErrorKind::PropertyValueMissing]);
}

#[test]
fn test_long_values_are_kept() {
    let long = "v".repeat(2000);
    let resolved = resolve(&format!("[*]\nkey = {long}\n"), "/t/a");
    assert_eq!(resolved, vec![("key".to_string(), long)]);
}

// ===========================================
// Properties
// ===========================================

#[test]
fn test_names_are_lowercased() {
    assert_eq!(
        resolve("[*]\nTestProperty = testvalue\n", "/t/a"),
        pairs(&[("testproperty", "testvalue")])
    );
}

#[test]
fn test_standard_values_are_lowercased() {
    assert_eq!(
        resolve("[*]\nend_of_line = CRLF\ncharset = UTF-8\n", "/t/a"),
        pairs(&[("end_of_line", "crlf"), ("charset", "utf-8")])
    );
}

#[test]
fn test_custom_values_keep_case() {
    assert_eq!(
        resolve("[*]\ncustom = MixedCase\n", "/t/a"),
        pairs(&[("custom", "MixedCase")])
    );
}

#[test]
fn test_indent_style_tab_implies_indent_size_tab() {
    assert_eq!(
        resolve("[*]\nindent_style = tab\n", "/t/a"),
        pairs(&[("indent_style", "tab"), ("indent_size", "tab")])
    );
}

#[test]
fn test_indent_size_implies_tab_width() {
    assert_eq!(
        resolve("[*]\nindent_size = 3\n", "/t/a"),
        pairs(&[("indent_size", "3"), ("tab_width", "3")])
    );
}

#[test]
fn test_indent_size_tab_takes_tab_width() {
    assert_eq!(
        resolve("[*]\nindent_size = tab\ntab_width = 8\n", "/t/a"),
        pairs(&[("indent_size", "8"), ("tab_width", "8")])
    );
}

#[test]
fn test_explicit_tab_width_is_kept() {
    assert_eq!(
        resolve("[*]\nindent_size = 4\ntab_width = 8\n", "/t/a"),
        pairs(&[("indent_size", "4"), ("tab_width", "8")])
    );
}

#[test]
fn test_indent_style_tab_with_old_version() {
    let tree = MemoryTree::new().with_file("/t/.editorconfig", "root = true\n[*]\nindent_style = tab\n");
    let config = ResolverConfig {
        version: Version::new(0, 9, 0),
        ..ResolverConfig::default()
    };
    assert_eq!(
        resolve_in(&tree, "/t/a", config),
        pairs(&[("indent_style", "tab")])
    );
}

#[test]
fn test_invalid_values_are_passed_through() {
    assert_eq!(
        resolve("[*]\nindent_size = lots\n", "/t/a"),
        pairs(&[("indent_size", "lots"), ("tab_width", "lots")])
    );
}

// ===========================================
// Resolution across files
// ===========================================

#[test]
fn test_nested_files_merge_closest_last() {
    let tree = MemoryTree::new()
        .with_file("/t/.editorconfig", "root = true\n[*]\na = outer\nb = outer\n")
        .with_file("/t/sub/.editorconfig", "[*]\nb = inner\nc = inner\n");

    assert_eq!(
        resolve_in(&tree, "/t/sub/f", ResolverConfig::default()),
        pairs(&[("a", "outer"), ("b", "inner"), ("c", "inner")])
    );
}

#[test]
fn test_root_in_section_does_not_stop_search() {
    let tree = MemoryTree::new()
        .with_file("/t/.editorconfig", "root = true\n[*]\nfrom_top = yes\n")
        .with_file("/t/sub/.editorconfig", "[*]\nroot = true\n");

    let resolved = resolve_in(&tree, "/t/sub/f", ResolverConfig::default());
    assert!(resolved.contains(&("from_top".to_string(), "yes".to_string())));
}

#[test]
fn test_unset_in_closer_file() {
    let tree = MemoryTree::new()
        .with_file("/t/.editorconfig", "root = true\n[*]\nindent_size = 2\ncharset = utf-8\n")
        .with_file("/t/sub/.editorconfig", "[*]\nindent_size = unset\n");

    assert_eq!(
        resolve_in(&tree, "/t/sub/f", ResolverConfig::default()),
        pairs(&[("tab_width", "2"), ("charset", "utf-8")])
    );
}

#[test]
fn test_strict_syntax_policy_rejects_broken_file() {
    let tree = MemoryTree::new().with_file("/t/.editorconfig", "root = true\n[*\n");
    let config = ResolverConfig {
        error_policy: ErrorPolicy::StrictSyntax,
        ..ResolverConfig::default()
    };

    let result = Resolver::new(config).resolve(&tree.resource("/t/a"));
    assert!(result.is_err());
}
