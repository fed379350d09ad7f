//! Verbose tool catalog - pure data definitions
//!
//! Tools whose output volume typically warrants compression: build tools,
//! package managers, container tooling.

/// First tokens that classify a command segment as verbose
pub static VERBOSE_TOOLS: &[&str] = &[
    "apt",
    "apt-get",
    "bazel",
    "brew",
    "bun",
    "cargo",
    "cmake",
    "dnf",
    "docker",
    "gradle",
    "helm",
    "kubectl",
    "make",
    "mvn",
    "npm",
    "pip",
    "pip3",
    "pnpm",
    "terraform",
    "tsc",
    "webpack",
    "yarn",
];

/// Check whether any segment of a command starts with a verbose tool
///
/// The command is split on sequencing, pipe, and conjunction operators; each
/// segment's first token matches an entry exactly or as a hyphenated variant
/// (`docker-compose` via `docker-`).
pub fn is_verbose(command: &str) -> bool {
    command
        .split(|c| c == ';' || c == '|')
        .flat_map(|piece| piece.split("&&"))
        .filter_map(|segment| segment.split_whitespace().next())
        .any(token_is_verbose)
}

fn token_is_verbose(token: &str) -> bool {
    VERBOSE_TOOLS.iter().any(|entry| {
        token == *entry
            || token
                .strip_prefix(entry)
                .is_some_and(|rest| rest.starts_with('-'))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_token_match() {
        assert!(is_verbose("npm install lodash"));
        assert!(is_verbose("cargo build --release"));
        assert!(!is_verbose("git status"));
        assert!(!is_verbose("ls -la"));
    }

    #[test]
    fn test_hyphenated_variants() {
        assert!(is_verbose("docker-compose up -d"));
        assert!(is_verbose("pip-compile requirements.in"));
        // A plain prefix without the hyphen is a different tool
        assert!(!is_verbose("dockerd --debug"));
    }

    #[test]
    fn test_later_segments_inspected() {
        assert!(is_verbose("cd /app && npm install"));
        assert!(is_verbose("git pull; make all"));
        assert!(is_verbose("find . -name '*.rs' | cargo fmt"));
        assert!(!is_verbose("cd /app && git status"));
    }
}
