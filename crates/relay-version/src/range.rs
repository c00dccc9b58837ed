use semver::{Version, VersionReq};

use crate::error::VersionError;

const WORKSPACE_PROTOCOL: &str = "workspace:";

const NON_REGISTRY_PREFIXES: &[&str] = &[
    "file:", "link:", "portal:", "npm:", "git+", "git:", "github:", "http://", "https://",
];

/// A dependency range as declared in a package manifest.
///
/// Registry conventions apply: a bare version is an exact pin, comparators may
/// be separated by whitespace, and `||` separates alternatives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeclaredRange {
    /// Matches every version (`*`, `x`, `latest`, empty, `workspace:*`).
    Any,
    /// Points outside the registry (path, link, git, URL, alias). Never violated.
    NonRegistry,
    /// Satisfied when any alternative matches.
    Alternatives(Vec<VersionReq>),
}

impl DeclaredRange {
    /// # Errors
    ///
    /// Returns `VersionError::InvalidRange` if an alternative cannot be parsed
    /// as a set of semver comparators.
    pub fn parse(raw: &str) -> Result<Self, VersionError> {
        let trimmed = raw.trim();
        let spec = trimmed.strip_prefix(WORKSPACE_PROTOCOL).unwrap_or(trimmed).trim();

        if trimmed.starts_with(WORKSPACE_PROTOCOL) && matches!(spec, "*" | "^" | "~") {
            return Ok(Self::Any);
        }
        if is_wildcard(spec) {
            return Ok(Self::Any);
        }
        if NON_REGISTRY_PREFIXES
            .iter()
            .any(|prefix| spec.starts_with(prefix))
        {
            return Ok(Self::NonRegistry);
        }

        let mut alternatives = Vec::new();
        for alternative in spec.split("||") {
            let alternative = alternative.trim();
            if is_wildcard(alternative) {
                return Ok(Self::Any);
            }
            let normalized = normalize_alternative(alternative);
            let req = VersionReq::parse(&normalized).map_err(|source| {
                VersionError::InvalidRange {
                    range: raw.to_string(),
                    source,
                }
            })?;
            alternatives.push(req);
        }

        Ok(Self::Alternatives(alternatives))
    }

    #[must_use]
    pub fn matches(&self, version: &Version) -> bool {
        match self {
            Self::Any | Self::NonRegistry => true,
            Self::Alternatives(reqs) => reqs.iter().any(|req| req.matches(version)),
        }
    }

    /// Whether publishing `version` would leave this declaration unsatisfied.
    #[must_use]
    pub fn is_violated_by(&self, version: &Version) -> bool {
        !self.matches(version)
    }
}

fn is_wildcard(spec: &str) -> bool {
    matches!(spec, "" | "*" | "x" | "X" | "latest")
}

fn normalize_alternative(alternative: &str) -> String {
    if let Some((low, high)) = alternative.split_once(" - ") {
        return format!(">={}, <={}", strip_v(low.trim()), strip_v(high.trim()));
    }

    let mut comparators: Vec<String> = Vec::new();
    let mut pending_op: Option<&str> = None;

    for token in alternative
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|t| !t.is_empty())
    {
        if token.chars().all(|c| "<>=^~".contains(c)) {
            pending_op = Some(token);
            continue;
        }
        let comparator = match pending_op.take() {
            Some(op) => format!("{op}{}", strip_v(token)),
            None => normalize_token(token),
        };
        comparators.push(comparator);
    }

    comparators.join(", ")
}

fn normalize_token(token: &str) -> String {
    let bare = strip_v(token);
    if !bare.starts_with(|c: char| c.is_ascii_digit()) {
        return token.to_string();
    }
    let has_wildcard = bare
        .split('.')
        .any(|component| matches!(component, "*" | "x" | "X"));
    if has_wildcard {
        bare.to_string()
    } else {
        format!("={bare}")
    }
}

fn strip_v(token: &str) -> &str {
    match token.strip_prefix(['v', 'V']) {
        Some(rest) if rest.starts_with(|c: char| c.is_ascii_digit()) => rest,
        _ => token,
    }
}
