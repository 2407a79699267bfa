use std::collections::HashMap;

use super::consts;

/// Environment values captured once at startup.
///
/// Components never call `std::env::var`; they see whatever was captured
/// here and folded into [`super::Config`].
#[derive(Debug, Clone, Default)]
pub struct EnvSnapshot {
    vars: HashMap<String, String>,
}

impl EnvSnapshot {
    /// Captures the installer's variables from the current process
    pub fn from_process() -> Self {
        let vars = consts::env::ALL
            .iter()
            .filter_map(|key| std::env::var(key).ok().map(|v| (key.to_string(), v)))
            .collect();
        Self { vars }
    }

    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Returns the trimmed value, treating empty strings as unset
    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars
            .get(key)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    pub fn flag(&self, key: &str) -> bool {
        self.get(key).is_some_and(is_truthy)
    }
}

/// `0`, `false`, `no` and `off` are false; any other non-empty value is true
pub fn is_truthy(value: &str) -> bool {
    !matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "" | "0" | "false" | "no" | "off"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_values_are_unset() {
        let env = EnvSnapshot::from_pairs([("NEO4J_MCP_VERSION", "  ")]);
        assert_eq!(env.get("NEO4J_MCP_VERSION"), None);
    }

    #[test]
    fn test_values_are_trimmed() {
        let env = EnvSnapshot::from_pairs([("NEO4J_MCP_REPO", " neo4j/mcp\n")]);
        assert_eq!(env.get("NEO4J_MCP_REPO"), Some("neo4j/mcp"));
    }

    #[test]
    fn test_flag_values() {
        for value in ["1", "true", "YES", "on", "anything"] {
            let env = EnvSnapshot::from_pairs([("NEO4J_MCP_SKIP_VERIFY", value)]);
            assert!(env.flag("NEO4J_MCP_SKIP_VERIFY"), "{value} should be true");
        }
        for value in ["", "0", "false", "No", "OFF"] {
            let env = EnvSnapshot::from_pairs([("NEO4J_MCP_SKIP_VERIFY", value)]);
            assert!(!env.flag("NEO4J_MCP_SKIP_VERIFY"), "{value} should be false");
        }
    }

    #[test]
    fn test_missing_flag_is_false() {
        assert!(!EnvSnapshot::default().flag("NEO4J_MCP_SKIP_VERIFY"));
    }
}
