//! JSONL (JSON Lines) instance documents.
//!
//! Each line holds one instance, tagged by category:
//! `{"entity": {...}}` or `{"relationship": {...}}`.

use std::io::{self, BufRead, Write};

use serde::{Deserialize, Serialize};

use crate::instance::{EntityDetail, Relationship};

/// One line of an instance document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum InstanceDocument {
    Entity(EntityDetail),
    Relationship(Relationship),
}

impl InstanceDocument {
    pub fn guid(&self) -> &str {
        match self {
            Self::Entity(e) => e.guid(),
            Self::Relationship(r) => r.guid(),
        }
    }
}

/// Error type for JSONL operations.
#[derive(Debug, thiserror::Error)]
pub enum JsonlError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error at line {line}: {source}")]
    Json {
        line: usize,
        source: serde_json::Error,
    },
}

/// Result alias for JSONL operations.
pub type Result<T> = std::result::Result<T, JsonlError>;

/// Writes instances as JSONL to the given writer.
pub fn write_jsonl<W: Write>(writer: &mut W, documents: &[InstanceDocument]) -> Result<()> {
    for (idx, doc) in documents.iter().enumerate() {
        serde_json::to_writer(&mut *writer, doc).map_err(|e| JsonlError::Json {
            line: idx + 1,
            source: e,
        })?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;
    Ok(())
}

/// Returns an iterator that reads instances from a JSONL reader.
///
/// Empty lines and lines starting with `#` are skipped.
pub fn read_jsonl<R: BufRead>(reader: R) -> JsonlIter<R> {
    JsonlIter {
        reader,
        line_number: 0,
    }
}

/// Iterator over JSONL-encoded instances.
pub struct JsonlIter<R> {
    reader: R,
    line_number: usize,
}

impl<R: BufRead> Iterator for JsonlIter<R> {
    type Item = Result<InstanceDocument>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut line = String::new();
        loop {
            line.clear();
            match self.reader.read_line(&mut line) {
                Ok(0) => return None,
                Ok(_) => {
                    self.line_number += 1;
                    let trimmed = line.trim();
                    if trimmed.is_empty() || trimmed.starts_with('#') {
                        continue;
                    }
                    return Some(serde_json::from_str(trimmed).map_err(|e| JsonlError::Json {
                        line: self.line_number,
                        source: e,
                    }));
                }
                Err(e) => return Some(Err(JsonlError::Io(e))),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instance::{EntityProxy, InstanceType};
    use crate::property::InstanceProperties;
    use std::io::BufReader;

    fn documents() -> Vec<InstanceDocument> {
        let todo = EntityDetail::new("todo-1", InstanceType::new("ToDo"))
            .with_properties(InstanceProperties::new().with("qualifiedName", "todo::1"));
        let rel = Relationship::new(
            "rel-1",
            InstanceType::new("ActionTarget"),
            todo.to_proxy(),
            EntityProxy::new("asset-1", InstanceType::new("Asset")),
        );
        vec![
            InstanceDocument::Entity(todo),
            InstanceDocument::Relationship(rel),
        ]
    }

    #[test]
    fn write_and_read_back() {
        let docs = documents();
        let mut buf = Vec::new();
        write_jsonl(&mut buf, &docs).unwrap();

        let read_back: Vec<InstanceDocument> = read_jsonl(BufReader::new(buf.as_slice()))
            .collect::<std::result::Result<Vec<_>, _>>()
            .unwrap();

        assert_eq!(read_back, docs);
        assert_eq!(read_back[1].guid(), "rel-1");
    }

    #[test]
    fn read_skips_blank_and_comment_lines() {
        let data = b"# fixture\n{\"entity\":{\"guid\":\"a\",\"type\":{\"typeDefName\":\"Asset\"}}}\n\n";
        let docs: Vec<InstanceDocument> = read_jsonl(BufReader::new(data.as_slice()))
            .collect::<std::result::Result<Vec<_>, _>>()
            .unwrap();
        assert_eq!(docs.len(), 1);
        assert!(matches!(&docs[0], InstanceDocument::Entity(e) if e.guid() == "a"));
    }

    #[test]
    fn read_reports_line_number_on_error() {
        let data = b"{\"entity\":{\"guid\":\"a\",\"type\":{\"typeDefName\":\"Asset\"}}}\nnot-json\n";
        let results: Vec<_> = read_jsonl(BufReader::new(data.as_slice())).collect();
        assert_eq!(results.len(), 2);
        assert!(results[0].is_ok());
        match &results[1] {
            Err(JsonlError::Json { line, .. }) => assert_eq!(*line, 2),
            other => panic!("expected JSON error, got {:?}", other),
        }
    }
}
