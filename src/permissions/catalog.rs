//! Safe command catalog - pure data definitions
//!
//! Read-only and non-mutating operations that run without an explicit grant.
//! Matching is prefix-only: only the leading clause of a compound command is
//! inspected, later clauses past a separator are not re-checked.

/// Commands auto-allowed without consulting the persisted stores
///
/// Multi-word entries cover subcommands (e.g. `git status`) whose bare tool
/// would be too broad to allow.
pub static SAFE_COMMANDS: &[&str] = &[
    "cat",
    "date",
    "df",
    "du",
    "env",
    "file",
    "find",
    "git branch",
    "git diff",
    "git log",
    "git remote",
    "git show",
    "git status",
    "grep",
    "head",
    "hostname",
    "id",
    "ls",
    "printenv",
    "ps",
    "pwd",
    "rg",
    "stat",
    "tail",
    "tree",
    "uname",
    "uptime",
    "wc",
    "which",
    "whoami",
];

/// Check whether a command is auto-allowed by the safe catalog
///
/// A command matches an entry when it equals the entry, starts with the entry
/// plus a space, or its first whitespace token equals the entry.
pub fn is_safe(command: &str) -> bool {
    let command = command.trim();
    let first_token = command.split_whitespace().next().unwrap_or("");

    SAFE_COMMANDS.iter().any(|entry| {
        command == *entry
            || command.starts_with(&format!("{} ", entry))
            || first_token == *entry
    })
}
