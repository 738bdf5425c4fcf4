//! BibTeX import for research papers
//!
//! A line-oriented scanner over `.bib` text. It recognizes `@type{key,`
//! headers and `field = value` assignments, joins values that span lines
//! until their braces and quotes balance, and strips one layer of enclosing
//! braces or quotes. There is no structural validation: an entry that never
//! closes is flushed at end of input with whatever fields were read.

use serde_json::{json, Value};
use std::collections::HashMap;

use crate::error::{FolioError, Result};
use crate::models::PaperKind;
use crate::patch::Fields;

/// Entry types imported as research papers; everything else is dropped
pub const ACCEPTED_TYPES: [&str; 6] = [
    "article",
    "inproceedings",
    "conference",
    "book",
    "incollection",
    "techreport",
];

/// A paper read from a BibTeX entry, before it is given a store id
#[derive(Debug, Clone, PartialEq)]
pub struct BibEntry {
    pub entry_type: String,
    pub key: String,
    pub title: String,
    pub authors: Vec<String>,
    pub venue: String,
    pub year: String,
    pub citations: u32,
    pub abstract_text: Option<String>,
    pub url: Option<String>,
    pub doi: Option<String>,
}

impl BibEntry {
    /// Publication category implied by the entry type
    pub fn kind(&self) -> PaperKind {
        match self.entry_type.as_str() {
            "article" => PaperKind::Journal,
            "inproceedings" | "conference" => PaperKind::Conference,
            "book" => PaperKind::Book,
            "incollection" => PaperKind::Chapter,
            "techreport" => PaperKind::Report,
            _ => PaperKind::Other,
        }
    }

    /// Fields for creating a record in the research section
    pub fn into_fields(self) -> Fields {
        let kind = self.kind();
        let mut fields = Fields::new();
        fields.insert("title".to_string(), Value::String(self.title));
        fields.insert("authors".to_string(), json!(self.authors));
        fields.insert("venue".to_string(), Value::String(self.venue));
        fields.insert("year".to_string(), Value::String(self.year));
        fields.insert("citations".to_string(), json!(self.citations));
        fields.insert("kind".to_string(), json!(kind));
        fields.insert("bibKey".to_string(), Value::String(self.key));
        if let Some(abstract_text) = self.abstract_text {
            fields.insert("abstract".to_string(), Value::String(abstract_text));
        }
        if let Some(url) = self.url {
            fields.insert("url".to_string(), Value::String(url));
        }
        if let Some(doi) = self.doi {
            fields.insert("doi".to_string(), Value::String(doi));
        }
        fields
    }

    fn from_raw(raw: RawEntry) -> Self {
        let RawEntry { entry_type, key, mut fields } = raw;
        let mut take = |name: &str| fields.remove(name).filter(|v| !v.is_empty());

        let title = take("title").unwrap_or_else(|| "Untitled".to_string());
        let year = take("year").unwrap_or_else(|| "Unknown".to_string());
        let citations = take("citations").and_then(|c| c.parse().ok()).unwrap_or(0);
        let authors = take("author").map(|a| split_authors(&a)).unwrap_or_default();
        let venue = take("journal")
            .or_else(|| take("booktitle"))
            .or_else(|| take("publisher"))
            .or_else(|| take("institution"))
            .unwrap_or_default();

        Self {
            entry_type,
            key,
            title,
            authors,
            venue,
            year,
            citations,
            abstract_text: take("abstract"),
            url: take("url"),
            doi: take("doi"),
        }
    }
}

/// Parse `.bib` text into the papers it describes
///
/// Blank input yields no papers. Non-blank input without a single entry
/// header is rejected.
pub fn parse_bibtex(text: &str) -> Result<Vec<BibEntry>> {
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }

    let mut scanner = Scanner::default();
    for line in text.lines() {
        scanner.line(line);
    }
    scanner.finish_entry();

    if !scanner.saw_header {
        return Err(FolioError::BibTex {
            reason: "no @type{key, ...} entries found".to_string(),
        });
    }

    tracing::debug!(
        parsed = scanner.entries.len(),
        skipped = scanner.skipped,
        "Parsed BibTeX input"
    );

    Ok(scanner.entries)
}

#[derive(Debug)]
struct RawEntry {
    entry_type: String,
    key: String,
    fields: HashMap<String, String>,
}

#[derive(Default)]
struct Scanner {
    entries: Vec<BibEntry>,
    current: Option<RawEntry>,
    /// Assignment text whose value is still open at end of line
    pending: Option<String>,
    saw_header: bool,
    skipped: usize,
}

impl Scanner {
    fn line(&mut self, line: &str) {
        let line = line.trim();
        if line.is_empty() || line.starts_with('%') {
            return;
        }

        if let Some(header) = line.strip_prefix('@') {
            self.finish_entry();
            self.header(header);
            return;
        }

        if self.current.is_none() {
            return;
        }

        let text = match self.pending.take() {
            Some(partial) => format!("{} {}", partial, line),
            None => line.to_string(),
        };

        if text == ")" {
            self.finish_entry();
        } else {
            self.assignments(&text);
        }
    }

    fn header(&mut self, header: &str) {
        self.saw_header = true;

        let Some(open) = header.find(['{', '(']) else {
            return;
        };
        let entry_type = header[..open].trim().to_lowercase();
        let body = &header[open + 1..];

        let (key, rest) = match body.find(',') {
            Some(comma) => (body[..comma].trim(), &body[comma + 1..]),
            None => (body.trim_end_matches(['}', ')']).trim(), ""),
        };

        self.current = Some(RawEntry {
            entry_type,
            key: key.to_string(),
            fields: HashMap::new(),
        });

        if body.find(',').is_none() && body.trim_end().ends_with(['}', ')']) {
            self.finish_entry();
        } else if !rest.trim().is_empty() {
            self.assignments(rest.trim());
        }
    }

    /// Split text into top-level `name = value` segments and store them
    fn assignments(&mut self, text: &str) {
        let mut depth: i32 = 0;
        let mut in_quote = false;
        let mut escaped = false;
        let mut start = 0;
        let mut closed = false;

        for (i, c) in text.char_indices() {
            if escaped {
                escaped = false;
                continue;
            }
            match c {
                '\\' => escaped = true,
                '{' => depth += 1,
                '}' => {
                    depth -= 1;
                    if depth < 0 {
                        self.store(&text[start..i]);
                        closed = true;
                        break;
                    }
                }
                '"' if depth == 0 => in_quote = !in_quote,
                ',' if depth == 0 && !in_quote => {
                    self.store(&text[start..i]);
                    start = i + 1;
                }
                _ => {}
            }
        }

        if closed {
            self.finish_entry();
            return;
        }

        let tail = text[start..].trim();
        if tail.is_empty() {
            return;
        }
        if depth > 0 || in_quote {
            self.pending = Some(tail.to_string());
        } else {
            self.store(tail);
        }
    }

    fn store(&mut self, segment: &str) {
        let Some(entry) = self.current.as_mut() else {
            return;
        };
        let Some((name, value)) = segment.split_once('=') else {
            return;
        };
        let name = name.trim().to_lowercase();
        if name.is_empty() {
            return;
        }
        entry.fields.insert(name, clean_value(value));
    }

    fn finish_entry(&mut self) {
        if let Some(partial) = self.pending.take() {
            self.store(&close_partial(&partial));
        }
        let Some(raw) = self.current.take() else {
            return;
        };

        if ACCEPTED_TYPES.contains(&raw.entry_type.as_str()) {
            self.entries.push(BibEntry::from_raw(raw));
        } else {
            tracing::debug!(
                entry_type = %raw.entry_type,
                key = %raw.key,
                "Skipping unsupported BibTeX entry"
            );
            self.skipped += 1;
        }
    }
}

/// Append whatever braces and quote an unfinished value is missing
fn close_partial(partial: &str) -> String {
    let mut depth: i32 = 0;
    let mut in_quote = false;
    let mut escaped = false;
    for c in partial.chars() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            '{' => depth += 1,
            '}' => depth -= 1,
            '"' if depth == 0 => in_quote = !in_quote,
            _ => {}
        }
    }

    let mut closed = partial.to_string();
    for _ in 0..depth.max(0) {
        closed.push('}');
    }
    if in_quote {
        closed.push('"');
    }
    closed
}

/// Trim, drop a trailing comma, strip one layer of braces or quotes, and
/// collapse runs of whitespace
fn clean_value(value: &str) -> String {
    let value = value.trim().trim_end_matches(',').trim();
    let inner = if value.len() >= 2
        && ((value.starts_with('{') && value.ends_with('}'))
            || (value.starts_with('"') && value.ends_with('"')))
    {
        &value[1..value.len() - 1]
    } else {
        value
    };
    inner.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn split_authors(authors: &str) -> Vec<String> {
    authors
        .split(" and ")
        .map(str::trim)
        .filter(|a| !a.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const TWO_ENTRIES: &str = r#"
@article{smith2020,
  title = {Deep Learning for Things},
  author = {Smith, John and Doe, Jane},
  journal = {Journal of Things},
  year = {2020},
  citations = {42},
}

@misc{note2021,
  title = {Just a note},
  year = 2021,
}
"#;

    #[test]
    fn test_misc_entry_dropped() {
        let entries = parse_bibtex(TWO_ENTRIES).unwrap();
        assert_eq!(entries.len(), 1);

        let paper = &entries[0];
        assert_eq!(paper.key, "smith2020");
        assert_eq!(paper.title, "Deep Learning for Things");
        assert_eq!(paper.authors, vec!["Smith, John", "Doe, Jane"]);
        assert_eq!(paper.venue, "Journal of Things");
        assert_eq!(paper.year, "2020");
        assert_eq!(paper.citations, 42);
        assert_eq!(paper.kind(), PaperKind::Journal);
    }

    #[test]
    fn test_multiline_value() {
        let text = "@inproceedings{k,\n  title = {A Very\n    Long Title},\n  booktitle = \"Proc. of\n Things\",\n}\n";
        let entries = parse_bibtex(text).unwrap();
        assert_eq!(entries[0].title, "A Very Long Title");
        assert_eq!(entries[0].venue, "Proc. of Things");
        assert_eq!(entries[0].kind(), PaperKind::Conference);
    }

    #[test]
    fn test_defaults_for_missing_fields() {
        let entries = parse_bibtex("@book{b,\n publisher = {Press}\n}").unwrap();
        assert_eq!(entries[0].title, "Untitled");
        assert_eq!(entries[0].year, "Unknown");
        assert_eq!(entries[0].citations, 0);
        assert_eq!(entries[0].venue, "Press");
    }

    #[test]
    fn test_unclosed_entry_flushed_at_end() {
        let text = "@article{a,\n title = {First},\n@techreport{b,\n title = {Second\n";
        let entries = parse_bibtex(text).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].title, "First");
        assert_eq!(entries[1].title, "Second");
        assert_eq!(entries[1].kind(), PaperKind::Report);
    }

    #[test]
    fn test_single_line_entry() {
        let entries = parse_bibtex("@Article{k, title={X}, year=2019}").unwrap();
        assert_eq!(entries[0].entry_type, "article");
        assert_eq!(entries[0].title, "X");
        assert_eq!(entries[0].year, "2019");
    }

    #[test]
    fn test_strips_only_one_brace_layer() {
        let entries = parse_bibtex("@article{k,\n title = {{GPU} Kernels},\n}").unwrap();
        assert_eq!(entries[0].title, "{GPU} Kernels");
    }

    #[test]
    fn test_comments_and_closing_on_value_line() {
        let text = "% exported\n@conference{c,\n  title = {Talk},\n  year = 2022}\n";
        let entries = parse_bibtex(text).unwrap();
        assert_eq!(entries[0].year, "2022");
    }

    #[test]
    fn test_no_entries_is_error() {
        assert!(matches!(parse_bibtex("hello world"), Err(FolioError::BibTex { .. })));
        assert!(parse_bibtex("   \n").unwrap().is_empty());
    }

    #[test]
    fn test_into_fields_creates_research_record() {
        let entry = parse_bibtex(TWO_ENTRIES).unwrap().remove(0);
        let fields = entry.into_fields();
        let paper: crate::models::ResearchPaper = serde_json::from_value(Value::Object({
            let mut f = fields;
            f.insert("id".to_string(), Value::String("p".to_string()));
            f
        }))
        .unwrap();
        assert_eq!(paper.bib_key.as_deref(), Some("smith2020"));
        assert_eq!(paper.citations, 42);
    }
}
