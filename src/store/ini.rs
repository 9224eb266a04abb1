//! Keyed-section text format used by the AWS shared credentials file
//!
//! Follows the dialect the `aws` CLI and most tooling accept:
//! - `[name]` headers, names trimmed; text after the last `]` is ignored
//! - `key = value` or `key: value`, keys lower-cased, values trimmed
//! - full-line comments starting with `#` or `;`
//! - indented lines continue the previous value
//!
//! Duplicate sections, duplicate keys within a section and keys before the
//! first header are rejected.
//!
//! Unlike Python's `configparser`, `[DEFAULT]` is an ordinary section: its
//! keys are not inherited by the other sections.

use std::collections::BTreeMap;
use thiserror::Error;

/// One `[name]` block and its key/value pairs
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Section {
    pub name: String,
    pub values: BTreeMap<String, String>,
}

impl Section {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("line {line}: {message}")]
pub struct IniError {
    pub line: usize,
    pub message: String,
}

impl IniError {
    fn new(line: usize, message: impl Into<String>) -> Self {
        Self {
            line,
            message: message.into(),
        }
    }
}

/// Parse `content` into its sections, in file order
pub fn parse(content: &str) -> Result<Vec<Section>, IniError> {
    let mut sections: Vec<Section> = Vec::new();
    // Key that indented lines would continue, with the indent of its own line
    let mut continued: Option<(String, usize)> = None;

    for (idx, raw) in content.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw.trim();
        let indent = raw.len() - raw.trim_start().len();

        if line.is_empty() {
            continued = None;
            continue;
        }

        if line.starts_with('#') || line.starts_with(';') {
            continue;
        }

        if let Some((key, key_indent)) = &continued
            && indent > *key_indent
            && let Some(section) = sections.last_mut()
            && let Some(value) = section.values.get_mut(key)
        {
            value.push('\n');
            value.push_str(line);
            continue;
        }

        if let Some(header) = line
            .strip_prefix('[')
            .and_then(|l| l.rfind(']').map(|end| &l[..end]))
        {
            let name = header.trim();
            if name.is_empty() {
                return Err(IniError::new(line_no, "section header has no name"));
            }
            if sections.iter().any(|s| s.name == name) {
                return Err(IniError::new(
                    line_no,
                    format!("section '{}' already exists", name),
                ));
            }
            sections.push(Section {
                name: name.to_string(),
                values: BTreeMap::new(),
            });
            continued = None;
            continue;
        }

        let Some(pos) = line.find(['=', ':']) else {
            return Err(IniError::new(
                line_no,
                format!("expected 'key = value' but found '{}'", line),
            ));
        };

        let key = line[..pos].trim().to_lowercase();
        let value = line[pos + 1..].trim().to_string();

        if key.is_empty() {
            return Err(IniError::new(line_no, "missing key before delimiter"));
        }

        let Some(section) = sections.last_mut() else {
            return Err(IniError::new(
                line_no,
                format!("key '{}' appears before any [section] header", key),
            ));
        };

        if section.values.contains_key(&key) {
            return Err(IniError::new(
                line_no,
                format!("key '{}' in section '{}' already exists", key, section.name),
            ));
        }

        section.values.insert(key.clone(), value);
        continued = Some((key, indent));
    }

    Ok(sections)
}

/// Whether `name` survives a render and parse as a section header unchanged
pub fn is_section_name(name: &str) -> bool {
    if name.chars().any(char::is_control) {
        return false;
    }
    match parse(&format!("[{}]", name)) {
        Ok(sections) => matches!(sections.as_slice(), [section] if section.name == name),
        Err(_) => false,
    }
}

/// Render sections as `[name]` blocks of `key = value` lines separated by a
/// blank line. Multi-line values are written back as indented continuations.
pub fn render<'a, I, E>(sections: I) -> String
where
    I: IntoIterator<Item = (&'a str, E)>,
    E: IntoIterator<Item = (&'a str, &'a str)>,
{
    let mut out = String::new();

    for (name, entries) in sections {
        out.push('[');
        out.push_str(name);
        out.push_str("]\n");
        for (key, value) in entries {
            out.push_str(key);
            out.push_str(" = ");
            out.push_str(&value.replace('\n', "\n\t"));
            out.push('\n');
        }
        out.push('\n');
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_sections_and_values() {
        let content = "\
# comment
[default]
aws_access_key_id = AKIAEXAMPLE
aws_secret_access_key=secret/with+chars=

; another comment
[dev]
AWS_SESSION_TOKEN: token:with:colons
";
        let sections = parse(content).unwrap();
        assert_eq!(sections.len(), 2);

        assert_eq!(sections[0].name, "default");
        assert_eq!(sections[0].get("aws_access_key_id"), Some("AKIAEXAMPLE"));
        assert_eq!(
            sections[0].get("aws_secret_access_key"),
            Some("secret/with+chars=")
        );

        assert_eq!(sections[1].name, "dev");
        assert_eq!(
            sections[1].get("aws_session_token"),
            Some("token:with:colons")
        );
    }

    #[test]
    fn test_parse_empty_content() {
        assert!(parse("").unwrap().is_empty());
        assert!(parse("\n# only comments\n\n").unwrap().is_empty());
    }

    #[test]
    fn test_parse_trims_section_names() {
        let sections = parse("[  spaced  ]\nk = v\n").unwrap();
        assert_eq!(sections[0].name, "spaced");
    }

    #[test]
    fn test_parse_ignores_text_after_header() {
        let sections = parse("[dev] ; work account\naws_access_key_id = X\n").unwrap();
        assert_eq!(sections[0].name, "dev");
        assert_eq!(sections[0].get("aws_access_key_id"), Some("X"));

        let sections = parse("[a]b]\n").unwrap();
        assert_eq!(sections[0].name, "a]b");
    }

    #[test]
    fn test_default_is_an_ordinary_section() {
        let sections = parse("[DEFAULT]\nk = 1\n[p]\n").unwrap();
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].name, "DEFAULT");
        assert!(sections[1].values.is_empty());
    }

    #[test]
    fn test_is_section_name() {
        assert!(is_section_name("dev"));
        assert!(is_section_name("team-a.prod"));
        assert!(!is_section_name(""));
        assert!(!is_section_name(" padded"));
        assert!(!is_section_name("a\nb"));
        assert!(!is_section_name("a\rb"));
        assert!(!is_section_name("x]\n[y"));
        assert!(!is_section_name("tab\tbed"));
    }

    #[test]
    fn test_parse_continuation_lines() {
        let sections = parse("[p]\nkey = first\n    second\nother = x\n").unwrap();
        assert_eq!(sections[0].get("key"), Some("first\nsecond"));
        assert_eq!(sections[0].get("other"), Some("x"));
    }

    #[test]
    fn test_parse_rejects_duplicate_section() {
        let err = parse("[p]\na = 1\n[p]\nb = 2\n").unwrap_err();
        assert_eq!(err.line, 3);
        assert!(err.message.contains("already exists"));
    }

    #[test]
    fn test_parse_rejects_duplicate_key() {
        let err = parse("[p]\na = 1\nA = 2\n").unwrap_err();
        assert_eq!(err.line, 3);
    }

    #[test]
    fn test_parse_rejects_key_before_header() {
        let err = parse("aws_access_key_id = x\n[p]\n").unwrap_err();
        assert_eq!(err.line, 1);
        assert!(err.message.contains("before any [section]"));
    }

    #[test]
    fn test_parse_rejects_line_without_delimiter() {
        let err = parse("[p]\njust some words\n").unwrap_err();
        assert_eq!(err.line, 2);
        assert_eq!(
            err.to_string(),
            "line 2: expected 'key = value' but found 'just some words'"
        );
    }

    #[test]
    fn test_parse_rejects_empty_header() {
        assert!(parse("[]\n").is_err());
        assert!(parse("[   ]\n").is_err());
    }

    #[test]
    fn test_render_layout() {
        let rendered = render(vec![
            ("a", vec![("k1", "v1"), ("k2", "line1\nline2")]),
            ("b", vec![]),
        ]);
        assert_eq!(rendered, "[a]\nk1 = v1\nk2 = line1\n\tline2\n\n[b]\n\n");

        let reparsed = parse(&rendered).unwrap();
        assert_eq!(reparsed[0].get("k2"), Some("line1\nline2"));
        assert!(reparsed[1].values.is_empty());
    }
}
