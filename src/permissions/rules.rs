//! Durable rule matching - an ordered list of matcher forms
//!
//! Each persisted allow rule is a string of the shape `Bash(<body>)`. Four
//! body forms are recognized, evaluated first-match-wins, so new forms can be
//! added without touching the call sites that iterate rules.

/// Tool name wrapping every persisted rule
const RULE_TOOL: &str = "Bash";

/// A command decomposed into the pieces the rule forms match against
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandShape {
    /// The full trimmed command
    pub command: String,
    /// First whitespace token
    pub first_token: String,
    /// First two whitespace tokens, or the sole token
    pub prefix: String,
}

impl CommandShape {
    /// Decompose a command
    pub fn parse(command: &str) -> Self {
        let command = command.trim().to_string();
        let first_token = command
            .split_whitespace()
            .next()
            .unwrap_or_default()
            .to_string();
        let prefix = command_prefix(&command);
        Self {
            command,
            first_token,
            prefix,
        }
    }
}

/// Derive the prefix users grant durable permission for
///
/// First two whitespace tokens if at least two exist, else the sole token.
pub fn command_prefix(command: &str) -> String {
    let tokens: Vec<&str> = command.split_whitespace().take(2).collect();
    tokens.join(" ")
}

/// Build the canonical rule string written for a prefix grant
///
/// This is exactly the string the prefix matcher form accepts, so granting a
/// prefix makes the next resolution of that prefix family succeed.
pub fn durable_rule(prefix: &str) -> String {
    format!("{}(command:{} *)", RULE_TOOL, prefix)
}

/// A single rule-matching form
pub struct RuleForm {
    /// Short name reported in allow decisions and logs
    pub name: &'static str,
    matches: fn(&str, &CommandShape) -> bool,
}

/// Recognized rule forms, evaluated in order, first match wins
pub static RULE_FORMS: &[RuleForm] = &[
    RuleForm {
        name: "exact",
        matches: matches_exact,
    },
    RuleForm {
        name: "prefix",
        matches: matches_prefix,
    },
    RuleForm {
        name: "first-token",
        matches: matches_first_token,
    },
    RuleForm {
        name: "external",
        matches: matches_external,
    },
];

/// Match a persisted rule string against a command
///
/// Returns the name of the first form that accepts the rule, if any.
pub fn rule_matches(rule: &str, shape: &CommandShape) -> Option<&'static str> {
    let body = rule_body(rule)?;
    RULE_FORMS
        .iter()
        .find(|form| (form.matches)(body, shape))
        .map(|form| form.name)
}

/// Strip the `Bash(...)` wrapper, rejecting rules for other tools
fn rule_body(rule: &str) -> Option<&str> {
    rule.trim()
        .strip_prefix(RULE_TOOL)?
        .strip_prefix('(')?
        .strip_suffix(')')
}

/// `Bash(command:<command>)` - this exact command
fn matches_exact(body: &str, shape: &CommandShape) -> bool {
    body.strip_prefix("command:") == Some(shape.command.as_str())
}

/// `Bash(command:<prefix> *)` - two-token prefix plus any suffix
fn matches_prefix(body: &str, shape: &CommandShape) -> bool {
    !shape.prefix.is_empty() && body == format!("command:{} *", shape.prefix)
}

/// `Bash(command:<first-token> *)` - legacy single-token prefix
fn matches_first_token(body: &str, shape: &CommandShape) -> bool {
    !shape.first_token.is_empty() && body == format!("command:{} *", shape.first_token)
}

/// `Bash(<prefix>:*)` - externally-authored wildcard, read-compatible
///
/// Matched by prefix equality or prefix-plus-space; never written by the
/// mutation API.
fn matches_external(body: &str, shape: &CommandShape) -> bool {
    let Some(prefix) = body.strip_suffix(":*") else {
        return false;
    };
    !prefix.is_empty()
        && (shape.command == prefix || shape.command.starts_with(&format!("{} ", prefix)))
}
