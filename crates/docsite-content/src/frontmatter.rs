//! Frontmatter extraction from MDX sources.

use serde_json::Value;

/// Parsed frontmatter keys.
pub type Frontmatter = serde_json::Map<String, Value>;

const DELIMITER: &str = "---";

/// Frontmatter and the body that follows it.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ParsedContent {
    pub frontmatter: Frontmatter,
    pub content: String,
}

/// Split `---` delimited frontmatter from the body.
///
/// The block is parsed as YAML. When it is not a valid YAML mapping each
/// `key: value` line is read instead, with surrounding quotes stripped from
/// values. Content without a closed frontmatter block is returned unchanged.
///
/// ```
/// use docsite_content::parse_frontmatter;
///
/// let parsed = parse_frontmatter("---\ntitle: Calls\n---\n\n# Calls");
/// assert_eq!(parsed.frontmatter["title"], "Calls");
/// assert_eq!(parsed.content, "# Calls");
/// ```
#[must_use]
pub fn parse_frontmatter(source: &str) -> ParsedContent {
    let unchanged = || ParsedContent {
        frontmatter: Frontmatter::new(),
        content: source.to_owned(),
    };

    let Some(after_open) = source.strip_prefix(DELIMITER) else {
        return unchanged();
    };
    let Some(close) = after_open.find(DELIMITER) else {
        return unchanged();
    };

    let block = after_open[..close].trim();
    let content = after_open[close + DELIMITER.len()..]
        .trim_start()
        .to_owned();

    if block.is_empty() {
        return ParsedContent {
            frontmatter: Frontmatter::new(),
            content,
        };
    }

    let frontmatter = parse_yaml(block).unwrap_or_else(|| parse_lines(block));
    ParsedContent {
        frontmatter,
        content,
    }
}

fn parse_yaml(block: &str) -> Option<Frontmatter> {
    match serde_yaml::from_str::<Value>(block) {
        Ok(Value::Object(map)) => Some(map),
        Ok(_) => None,
        Err(err) => {
            tracing::debug!(error = %err, "Frontmatter is not valid YAML, reading lines");
            None
        }
    }
}

fn parse_lines(block: &str) -> Frontmatter {
    let mut frontmatter = Frontmatter::new();
    for line in block.lines().map(str::trim).filter(|l| !l.is_empty()) {
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let key = key.trim();
        if key.is_empty() {
            continue;
        }
        frontmatter.insert(key.to_owned(), Value::String(strip_quotes(value.trim()).to_owned()));
    }
    frontmatter
}

fn strip_quotes(value: &str) -> &str {
    let bytes = value.as_bytes();
    if bytes.len() >= 2
        && matches!(bytes[0], b'"' | b'\'')
        && matches!(bytes[bytes.len() - 1], b'"' | b'\'')
    {
        &value[1..value.len() - 1]
    } else {
        value
    }
}

/// Merge `source` keys into a copy of `target`.
///
/// Existing keys are kept unless `overwrite` is set.
#[must_use]
pub fn merge_frontmatter(
    target: &Frontmatter,
    source: &Frontmatter,
    overwrite: bool,
) -> Frontmatter {
    let mut merged = target.clone();
    for (key, value) in source {
        if overwrite || !merged.contains_key(key) {
            merged.insert(key.clone(), value.clone());
        }
    }
    merged
}

/// Non-empty string value of a frontmatter key.
///
/// Numbers and booleans are rendered as strings; empty strings count as missing.
#[must_use]
pub fn fm_str(frontmatter: &Frontmatter, key: &str) -> Option<String> {
    match frontmatter.get(key)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
