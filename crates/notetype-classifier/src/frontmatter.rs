//! YAML front matter editing for Markdown notes
//!
//! A note starts with front matter when its first line is `---` (after an
//! optional byte order mark); the block ends at the next line that is `---`
//! or `...`. Everything after the closing line is the body and is carried
//! through edits byte for byte.

use serde_yaml::{Mapping, Value};
use thiserror::Error;

const DELIMITER: &str = "---";
const END_DELIMITER: &str = "...";
const BOM: char = '\u{feff}';

/// Errors that can occur while reading front matter
#[derive(Error, Debug)]
pub enum FrontMatterError {
    /// The block is not valid YAML
    #[error("Invalid front matter YAML: {0}")]
    InvalidYaml(#[from] serde_yaml::Error),

    /// The block is YAML but not a key-value mapping
    #[error("Front matter is not a mapping")]
    NotAMapping,
}

/// A Markdown note split into front matter and body
#[derive(Debug, Clone, PartialEq)]
pub struct FrontMatter {
    metadata: Mapping,
    body: String,
    has_block: bool,
    bom: bool,
}

/// Byte offsets of a front matter block within a note
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct BlockSpan {
    yaml_start: usize,
    yaml_end: usize,
    body_start: usize,
}

impl FrontMatter {
    /// Split a note into its metadata and body
    ///
    /// Text without a leading `---` line, or with no closing line, has empty
    /// metadata and is all body. A leading byte order mark is kept aside and
    /// written back by [`FrontMatter::render`].
    pub fn parse(text: &str) -> Result<Self, FrontMatterError> {
        let (bom, text) = strip_bom(text);
        let Some(span) = split_block(text) else {
            return Ok(Self {
                metadata: Mapping::new(),
                body: text.to_string(),
                has_block: false,
                bom,
            });
        };

        Ok(Self {
            metadata: parse_mapping(&text[span.yaml_start..span.yaml_end])?,
            body: text[span.body_start..].to_string(),
            has_block: true,
            bom,
        })
    }

    /// Get a string field
    pub fn get(&self, key: &str) -> Option<&str> {
        self.metadata.get(key).and_then(Value::as_str)
    }

    /// Set a string field, keeping the position of an existing key
    pub fn set(&mut self, key: &str, value: &str) {
        self.metadata
            .insert(Value::String(key.to_string()), Value::String(value.to_string()));
    }

    /// Get the metadata mapping
    pub fn metadata(&self) -> &Mapping {
        &self.metadata
    }

    /// Get the body (everything after the front matter)
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Render the note back to text
    ///
    /// The whole block is re-serialized, so quoting and comments inside it
    /// are normalized. [`set_field`] avoids this for notes that already have
    /// a block.
    pub fn render(&self) -> Result<String, FrontMatterError> {
        let mut out = String::new();
        if self.bom {
            out.push(BOM);
        }

        if self.metadata.is_empty() && !self.has_block {
            out.push_str(&self.body);
            return Ok(out);
        }

        let yaml = if self.metadata.is_empty() {
            String::new()
        } else {
            serde_yaml::to_string(&self.metadata)?
        };

        out.reserve(yaml.len() + self.body.len() + 8);
        out.push_str(DELIMITER);
        out.push('\n');
        out.push_str(&yaml);
        out.push_str(DELIMITER);
        out.push('\n');
        out.push_str(&self.body);
        Ok(out)
    }
}

/// Set one field in a note's front matter and return the new text
///
/// When the note already has a block, only the field's own line is replaced
/// (or a line is appended), so every other field keeps its exact text. If
/// that edit would not produce the expected metadata, the block is rendered
/// again from the parsed mapping.
pub fn set_field(text: &str, key: &str, value: &str) -> Result<String, FrontMatterError> {
    let mut front_matter = FrontMatter::parse(text)?;
    front_matter.set(key, value);

    if let Some(spliced) = splice_field(text, key, value)? {
        match FrontMatter::parse(&spliced) {
            Ok(check) if check.metadata() == front_matter.metadata() => return Ok(spliced),
            _ => {}
        }
    }

    front_matter.render()
}

/// Rewrite the block line by line, replacing the `key:` entry or appending one
fn splice_field(text: &str, key: &str, value: &str) -> Result<Option<String>, FrontMatterError> {
    let (bom, note) = strip_bom(text);
    let Some(span) = split_block(note) else {
        return Ok(None);
    };

    let newline = if note[..span.yaml_start].ends_with("\r\n") {
        "\r\n"
    } else {
        "\n"
    };
    let entry = entry_line(key, value, newline)?;
    let yaml = &note[span.yaml_start..span.yaml_end];

    let mut block = String::with_capacity(yaml.len() + entry.len());
    let mut replaced = false;
    let mut in_old_value = false;
    for line in yaml.split_inclusive('\n') {
        if in_old_value {
            if is_value_continuation(line) {
                continue;
            }
            in_old_value = false;
        }
        if !replaced && is_key_line(line, key) {
            block.push_str(&entry);
            replaced = true;
            in_old_value = true;
            continue;
        }
        block.push_str(line);
    }
    if !replaced {
        block.push_str(&entry);
    }

    let mut out = String::with_capacity(text.len() + entry.len());
    if bom {
        out.push(BOM);
    }
    out.push_str(&note[..span.yaml_start]);
    out.push_str(&block);
    out.push_str(&note[span.yaml_end..]);
    Ok(Some(out))
}

/// One `key: value` line, quoted the way serde_yaml would
fn entry_line(key: &str, value: &str, newline: &str) -> Result<String, FrontMatterError> {
    let mut entry = Mapping::new();
    entry.insert(Value::String(key.to_string()), Value::String(value.to_string()));
    let line = serde_yaml::to_string(&entry)?;
    Ok(if newline == "\n" {
        line
    } else {
        line.replace('\n', newline)
    })
}

fn is_key_line(line: &str, key: &str) -> bool {
    line.strip_prefix(key)
        .and_then(|rest| rest.strip_prefix(':'))
        .is_some_and(|rest| rest.is_empty() || rest.starts_with(char::is_whitespace))
}

/// Indented lines and top-level sequence items belong to the previous key
fn is_value_continuation(line: &str) -> bool {
    line.starts_with([' ', '\t']) || line.starts_with("- ") || line.trim_end() == "-"
}

fn parse_mapping(yaml: &str) -> Result<Mapping, FrontMatterError> {
    if yaml.trim().is_empty() {
        return Ok(Mapping::new());
    }

    match serde_yaml::from_str::<Value>(yaml)? {
        Value::Mapping(mapping) => Ok(mapping),
        Value::Null => Ok(Mapping::new()),
        _ => Err(FrontMatterError::NotAMapping),
    }
}

fn strip_bom(text: &str) -> (bool, &str) {
    match text.strip_prefix(BOM) {
        Some(rest) => (true, rest),
        None => (false, text),
    }
}

/// Find the front matter block
fn split_block(text: &str) -> Option<BlockSpan> {
    let mut lines = text.split_inclusive('\n');
    let first = lines.next()?;
    if first.trim_end() != DELIMITER {
        return None;
    }

    let yaml_start = first.len();
    let mut offset = yaml_start;
    for line in lines {
        let trimmed = line.trim_end();
        if trimmed == DELIMITER || trimmed == END_DELIMITER {
            return Some(BlockSpan {
                yaml_start,
                yaml_end: offset,
                body_start: offset + line.len(),
            });
        }
        offset += line.len();
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_without_front_matter() {
        let fm = FrontMatter::parse("# Title\n\nBody text\n").unwrap();
        assert!(fm.metadata().is_empty());
        assert_eq!(fm.body(), "# Title\n\nBody text\n");
        assert_eq!(fm.render().unwrap(), "# Title\n\nBody text\n");
    }

    #[test]
    fn test_parse_with_front_matter() {
        let text = "---\ntitle: Trees\ntags:\n  - botany\n---\n# Trees\nThey grow.\n";
        let fm = FrontMatter::parse(text).unwrap();
        assert_eq!(fm.get("title"), Some("Trees"));
        assert_eq!(fm.metadata().len(), 2);
        assert_eq!(fm.body(), "# Trees\nThey grow.\n");
    }

    #[test]
    fn test_set_adds_field_to_plain_note() {
        let out = set_field("Just a thought\n", "noteType", "FleetingNote").unwrap();
        assert_eq!(out, "---\nnoteType: FleetingNote\n---\nJust a thought\n");
    }

    #[test]
    fn test_set_overwrites_in_place() {
        let text = "---\ntitle: Trees\nnoteType: X\ntags:\n- botany\n---\nBody\n";
        let out = set_field(text, "noteType", "PermanentNote").unwrap();

        let fm = FrontMatter::parse(&out).unwrap();
        assert_eq!(fm.get("noteType"), Some("PermanentNote"));
        assert_eq!(fm.get("title"), Some("Trees"));
        assert_eq!(fm.body(), "Body\n");

        let keys: Vec<&str> = fm.metadata().keys().filter_map(Value::as_str).collect();
        assert_eq!(keys, vec!["title", "noteType", "tags"]);
    }

    #[test]
    fn test_set_is_idempotent() {
        let text = "---\naliases: [t]\n---\nBody";
        let once = set_field(text, "noteType", "LiteratureNote").unwrap();
        let twice = set_field(&once, "noteType", "LiteratureNote").unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_empty_block() {
        let fm = FrontMatter::parse("---\n---\nBody").unwrap();
        assert!(fm.metadata().is_empty());
        assert_eq!(fm.render().unwrap(), "---\n---\nBody");
    }

    #[test]
    fn test_unclosed_block_is_body() {
        let text = "---\nnot closed\n";
        let fm = FrontMatter::parse(text).unwrap();
        assert!(fm.metadata().is_empty());
        assert_eq!(fm.body(), text);
    }

    #[test]
    fn test_dots_close_block_and_crlf() {
        let fm = FrontMatter::parse("---\r\na: 1\r\n...\r\nBody\r\n").unwrap();
        assert_eq!(fm.metadata().len(), 1);
        assert_eq!(fm.body(), "Body\r\n");
    }

    #[test]
    fn test_body_horizontal_rule_untouched() {
        let text = "---\na: b\n---\nAbove\n---\nBelow\n";
        let out = set_field(text, "noteType", "FleetingNote").unwrap();
        assert!(out.ends_with("\n---\nAbove\n---\nBelow\n"));
    }

    #[test]
    fn test_not_a_mapping() {
        let result = FrontMatter::parse("---\n- a\n- b\n---\nBody");
        assert!(matches!(result, Err(FrontMatterError::NotAMapping)));
    }

    #[test]
    fn test_byte_order_mark_before_block() {
        let text = "\u{feff}---\ntitle: T\n---\nBody\n";
        let fm = FrontMatter::parse(text).unwrap();
        assert_eq!(fm.get("title"), Some("T"));
        assert_eq!(fm.body(), "Body\n");

        let out = set_field(text, "noteType", "FleetingNote").unwrap();
        assert_eq!(out, "\u{feff}---\ntitle: T\nnoteType: FleetingNote\n---\nBody\n");

        let fm = FrontMatter::parse(&out).unwrap();
        assert_eq!(fm.get("title"), Some("T"));
        assert_eq!(fm.get("noteType"), Some("FleetingNote"));
    }

    #[test]
    fn test_byte_order_mark_without_block() {
        let fm = FrontMatter::parse("\u{feff}Body\n").unwrap();
        assert_eq!(fm.body(), "Body\n");
        assert_eq!(fm.render().unwrap(), "\u{feff}Body\n");

        let out = set_field("\u{feff}Body\n", "noteType", "PermanentNote").unwrap();
        assert_eq!(out, "\u{feff}---\nnoteType: PermanentNote\n---\nBody\n");
    }

    #[test]
    fn test_other_fields_keep_their_text() {
        let text = "---\n# reviewed\nflag: \"yes\"\nn: 1.50\nbase: &b x\nref: *b\n---\nBody\n";
        let out = set_field(text, "noteType", "LiteratureNote").unwrap();
        assert_eq!(
            out,
            "---\n# reviewed\nflag: \"yes\"\nn: 1.50\nbase: &b x\nref: *b\nnoteType: LiteratureNote\n---\nBody\n"
        );
    }

    #[test]
    fn test_replaces_only_the_field_line() {
        let text = "---\nnoteType:\n  - old\n  - values\ntags: [a, b]\n---\nBody\n";
        let out = set_field(text, "noteType", "FleetingNote").unwrap();
        assert_eq!(out, "---\nnoteType: FleetingNote\ntags: [a, b]\n---\nBody\n");
    }

    #[test]
    fn test_splice_keeps_crlf_and_closing_dots() {
        let text = "---\r\na: 1\r\n...\r\nBody\r\n";
        let out = set_field(text, "noteType", "PermanentNote").unwrap();
        assert_eq!(out, "---\r\na: 1\r\nnoteType: PermanentNote\r\n...\r\nBody\r\n");
    }

    #[test]
    fn test_flow_mapping_block_is_rendered_again() {
        let text = "---\n{a: 1}\n---\nBody\n";
        let out = set_field(text, "noteType", "FleetingNote").unwrap();

        let fm = FrontMatter::parse(&out).unwrap();
        assert_eq!(fm.get("noteType"), Some("FleetingNote"));
        assert_eq!(fm.metadata().len(), 2);
        assert_eq!(fm.body(), "Body\n");
    }

    #[test]
    fn test_invalid_yaml() {
        let result = FrontMatter::parse("---\na: [unclosed\n---\nBody");
        assert!(matches!(result, Err(FrontMatterError::InvalidYaml(_))));
    }
}
