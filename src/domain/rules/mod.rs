// Domain rules - lexical rules for Java class and method names

use std::sync::LazyLock;

use regex::Regex;

/// A single name segment: anything non-empty that contains no `.`, `;`, `[`
/// or `/`. Unicode identifiers are allowed, the JVM is permissive here.
pub static SIMPLE_NAME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^.;\[/]+$").unwrap());

/// A fully qualified name: simple names joined by single dots.
pub static FULL_NAME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^.;\[/]+(\.[^.;\[/]+)*$").unwrap());

/// A method name: a simple name without angle brackets, or one of the two
/// special forms `<init>` and `<clinit>`.
pub static METHOD_NAME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(<init>|<clinit>|[^.;\[/<>]+)$").unwrap());

/// Check a single-segment class or field name.
pub fn is_simple_name(name: &str) -> bool {
    SIMPLE_NAME_PATTERN.is_match(name)
}

/// Check a fully qualified (dot-separated) class name.
pub fn is_full_name(name: &str) -> bool {
    FULL_NAME_PATTERN.is_match(name)
}

/// Check a method name, including the `<init>`/`<clinit>` special forms.
pub fn is_method_name(name: &str) -> bool {
    METHOD_NAME_PATTERN.is_match(name)
}
