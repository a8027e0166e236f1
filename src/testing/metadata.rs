//! # Metadata Parser
//!
//! Reads the `key: value` block that precedes a test-method declaration:
//!
//! ```text
//! /**
//!  * throws: InvalidArgumentException
//!  * message: bad value {$a}
//!  * a: get_args
//!  */
//! function testRejects($a)
//! ```
//!
//! The same block works in any comment syntax (`///`, `//`, `#`, `/* */`), and
//! the declaration may be `fn` or `function`. Keys:
//!
//! - `throws`: the class the method is expected to raise (or a subclass)
//! - `message`: template compared with the raised message; `{$name}` is
//!   replaced by the value bound to parameter `name`
//! - a parameter name: the zero-argument method that yields the values bound
//!   to that parameter, one per invocation
//!
//! Other keys are ignored. Parsing is purely textual and never fails: text
//! that does not fit the grammar is skipped.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::value::Value;

static KEY_LINE: Lazy<Regex> = Lazy::new(|| compile(r"^(\w+)\s*:\s(.*)$"));
static DECLARATION: Lazy<Regex> = Lazy::new(|| compile(r"\b(?:fn|function)\s+(\w+)\s*(?:<[^(]*>)?\s*\("));
static DOLLAR_PARAM: Lazy<Regex> = Lazy::new(|| compile(r"\$(\w+)"));
static WORD: Lazy<Regex> = Lazy::new(|| compile(r"^\w+$"));
static PLACEHOLDER: Lazy<Regex> = Lazy::new(|| compile(r"\{\$(\w+)\}"));

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).unwrap_or_else(|e| panic!("invalid metadata pattern {pattern}: {e}"))
}

/// One `parameter <- source` binding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterBinding {
    pub param: String,
    pub source: String,
}

/// Per-method configuration: expected exception, message template and
/// parameter sources.
///
/// ```rust
/// use assay::testing::metadata::TestMethodSpec;
/// let spec = TestMethodSpec::new()
///     .throws("Exception")
///     .message("{$a} was rejected")
///     .bind("a", "get_args");
/// assert_eq!(spec.source_for("a"), Some("get_args"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TestMethodSpec {
    pub expected_exception: Option<String>,
    pub message_template: Option<String>,
    pub bindings: Vec<ParameterBinding>,
}

impl TestMethodSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn throws(mut self, class: impl AsRef<str>) -> Self {
        self.expected_exception = Some(normalize_type(class.as_ref()));
        self
    }

    pub fn message(mut self, template: impl Into<String>) -> Self {
        self.message_template = Some(template.into());
        self
    }

    /// Binds `param` to the values produced by `source`. Rebinding a parameter
    /// replaces its source.
    pub fn bind(mut self, param: impl Into<String>, source: impl AsRef<str>) -> Self {
        let param = param.into();
        let source = normalize_source(source.as_ref());
        match self.bindings.iter_mut().find(|b| b.param == param) {
            Some(binding) => binding.source = source,
            None => self.bindings.push(ParameterBinding { param, source }),
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.expected_exception.is_none()
            && self.message_template.is_none()
            && self.bindings.is_empty()
    }

    pub fn source_for(&self, param: &str) -> Option<&str> {
        self.bindings
            .iter()
            .find(|b| b.param == param)
            .map(|b| b.source.as_str())
    }

    /// Fills fields missing from `self` with those of `fallback`.
    pub fn or(self, fallback: TestMethodSpec) -> TestMethodSpec {
        TestMethodSpec {
            expected_exception: self.expected_exception.or(fallback.expected_exception),
            message_template: self.message_template.or(fallback.message_template),
            bindings: if self.bindings.is_empty() {
                fallback.bindings
            } else {
                self.bindings
            },
        }
    }

    /// The message template with `{$name}` placeholders replaced by the bound
    /// values. Unbound placeholders are left as written.
    pub fn render_message(&self, bound: &[(String, Value)]) -> Option<String> {
        let template = self.message_template.as_deref()?;
        let rendered = PLACEHOLDER.replace_all(template, |caps: &Captures| {
            bound
                .iter()
                .find(|(name, _)| name == &caps[1])
                .map_or_else(|| caps[0].to_string(), |(_, value)| value.to_string())
        });
        Some(rendered.into_owned())
    }
}

/// A test-method declaration found in annotated source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodDeclaration {
    pub name: String,
    pub params: Vec<String>,
    pub spec: TestMethodSpec,
}

/// Extracts [`TestMethodSpec`]s from annotated source text.
#[derive(Debug)]
pub struct MetadataParser;

impl MetadataParser {
    /// Maps every `test*` method to its spec. Methods without a block map to
    /// an empty spec.
    pub fn parse(source: &str) -> HashMap<String, TestMethodSpec> {
        Self::declarations(source)
            .into_iter()
            .map(|decl| (decl.name, decl.spec))
            .collect()
    }

    /// Every `test*` declaration in source order, with its parameters.
    pub fn declarations(source: &str) -> Vec<MethodDeclaration> {
        let mut found = Vec::new();
        let mut pending: Vec<(String, String)> = Vec::new();
        let mut lines = source.lines();

        while let Some(line) = lines.next() {
            let trimmed = line.trim();
            if trimmed.is_empty() || is_attribute(trimmed) {
                continue;
            }

            if let Some(content) = comment_content(trimmed) {
                if let Some(caps) = KEY_LINE.captures(content) {
                    pending.push((caps[1].to_string(), caps[2].trim().to_string()));
                }
                continue;
            }

            let Some(decl) = DECLARATION.captures(trimmed) else {
                pending.clear();
                continue;
            };
            let name = decl[1].to_string();
            let mut params_text = trimmed[decl.get(0).map_or(0, |m| m.end())..].to_string();
            while !balanced(&params_text) {
                let Some(next) = lines.next() else { break };
                params_text.push(' ');
                params_text.push_str(next.trim());
            }

            if name.starts_with("test") {
                let params = parse_params(&params_text);
                let spec = build_spec(&pending, &params);
                tracing::trace!(method = %name, ?params, "parsed test declaration");
                found.push(MethodDeclaration { name, params, spec });
            }
            pending.clear();
        }
        found
    }
}

fn build_spec(pending: &[(String, String)], params: &[String]) -> TestMethodSpec {
    pending
        .iter()
        .fold(TestMethodSpec::new(), |spec, (key, value)| match key.as_str() {
            "throws" => spec.throws(value),
            "message" => spec.message(value.as_str()),
            param if params.iter().any(|p| p == param) => spec.bind(param, value),
            _ => spec,
        })
}

fn is_attribute(line: &str) -> bool {
    line.starts_with("#[") || line.starts_with("#![")
}

/// The text of a comment line without its markers, or `None` for code.
fn comment_content(line: &str) -> Option<&str> {
    const MARKERS: [&str; 7] = ["/**", "/*!", "/*", "///", "//!", "//", "#"];
    let body = if let Some(rest) = MARKERS.iter().find_map(|m| line.strip_prefix(m)) {
        rest
    } else if line.starts_with("*/") {
        ""
    } else {
        line.strip_prefix('*')?
    };
    let body = body.trim();
    Some(body.strip_suffix("*/").unwrap_or(body).trim())
}

/// True once the text after the opening `(` has its closing `)`.
fn balanced(text: &str) -> bool {
    let mut depth = 1i32;
    for c in text.chars() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return true;
                }
            }
            _ => {}
        }
    }
    false
}

/// Parameter names from the text following a declaration's `(`.
fn parse_params(text: &str) -> Vec<String> {
    let mut params = Vec::new();
    let mut depth = 0i32;
    let mut current = String::new();

    for c in text.chars() {
        match c {
            '(' | '<' | '[' | '{' => depth += 1,
            ')' if depth == 0 => break,
            ')' | '>' | ']' | '}' => depth -= 1,
            ',' if depth == 0 => {
                params.extend(param_name(&current));
                current.clear();
                continue;
            }
            _ => {}
        }
        current.push(c);
    }
    params.extend(param_name(&current));
    params
}

fn param_name(piece: &str) -> Option<String> {
    if let Some(caps) = DOLLAR_PARAM.captures(piece) {
        return Some(caps[1].to_string());
    }
    let head = piece.split(':').next()?.trim();
    let head = head.trim_start_matches('&').trim();
    let head = head.strip_prefix("mut ").unwrap_or(head).trim();
    if head.is_empty() || head == "self" || !WORD.is_match(head) {
        return None;
    }
    Some(head.to_string())
}

/// `\Exception`, `Exception::class` and `"Exception";` all become `Exception`.
fn normalize_type(raw: &str) -> String {
    let t = raw.trim().trim_end_matches(';').trim();
    let t = t.trim_matches(|c| c == '"' || c == '\'');
    let t = t.strip_suffix("::class").unwrap_or(t);
    t.trim_start_matches('\\').to_string()
}

/// `$this->getArgs()`, `self.get_args()` and `get_args` all become the bare
/// method name.
fn normalize_source(raw: &str) -> String {
    let s = raw.trim().trim_end_matches(';').trim();
    let s = ["$this->", "self.", "Self::", "this.", "$"]
        .iter()
        .find_map(|prefix| s.strip_prefix(prefix))
        .unwrap_or(s);
    let s = s.strip_suffix("()").unwrap_or(s);
    s.trim().to_string()
}
