//! CLI command implementations

pub mod check;
pub mod completions;
pub mod edge;
pub mod history;
pub mod io;
pub mod node;
pub mod search;
pub mod version;

/// Parse a repeatable `KEY=VALUE` argument
pub fn parse_kv(raw: &str) -> anyhow::Result<(String, String)> {
    raw.split_once('=')
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .ok_or_else(|| anyhow::anyhow!("expected KEY=VALUE, got: {raw}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_kv() {
        assert_eq!(
            parse_kv("format=csv").unwrap(),
            ("format".to_string(), "csv".to_string())
        );
        assert_eq!(
            parse_kv("path=/data/a=b.csv").unwrap(),
            ("path".to_string(), "/data/a=b.csv".to_string())
        );
        assert!(parse_kv("no-separator").is_err());
    }
}
