//! Where page records and the run summary end up.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;

use crate::error::PageError;
use crate::record::PageRecord;
use crate::totals::Totals;

pub trait RecordSink: Sync {
    /// Persist one page's record; returns where it went.
    fn write_page(&self, source: &Path, record: &PageRecord) -> Result<PathBuf, PageError>;

    /// Persist the run-wide totals. Called once, after every page.
    fn write_totals(&self, totals: Totals) -> Result<()>;
}

/// One `<stem>.json` per page under `output_dir`, plus a text summary file.
pub struct JsonDirSink {
    output_dir: PathBuf,
    summary_path: PathBuf,
    pretty: bool,
}

impl JsonDirSink {
    pub fn new(output_dir: PathBuf, summary_path: PathBuf, pretty: bool) -> Self {
        JsonDirSink {
            output_dir,
            summary_path,
            pretty,
        }
    }

    pub fn output_path(&self, source: &Path) -> PathBuf {
        let stem = source.file_stem().unwrap_or(source.as_os_str());
        let mut name = stem.to_os_string();
        name.push(".json");
        self.output_dir.join(name)
    }

    fn serialize(&self, record: &PageRecord) -> serde_json::Result<Vec<u8>> {
        if !self.pretty {
            return serde_json::to_vec(record);
        }
        let mut buf = Vec::new();
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
        record.serialize(&mut ser)?;
        Ok(buf)
    }
}

impl RecordSink for JsonDirSink {
    fn write_page(&self, source: &Path, record: &PageRecord) -> Result<PathBuf, PageError> {
        fs::create_dir_all(&self.output_dir).map_err(|source| PageError::CreateDir {
            path: self.output_dir.clone(),
            source,
        })?;
        let path = self.output_path(source);
        let bytes = self.serialize(record).map_err(|e| PageError::Serialize {
            path: path.clone(),
            source: e,
        })?;
        fs::write(&path, bytes).map_err(|e| PageError::Write {
            path: path.clone(),
            source: e,
        })?;
        Ok(path)
    }

    fn write_totals(&self, totals: Totals) -> Result<()> {
        fs::write(&self.summary_path, totals.to_string())
            .with_context(|| format!("Failed to write summary {:?}", self.summary_path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Post;

    fn record() -> PageRecord {
        PageRecord::assemble(vec![Post {
            username: Some("יעל".into()),
            has_identity: true,
            ..Post::default()
        }])
    }

    #[test]
    fn output_name_from_stem() {
        let sink = JsonDirSink::new("out".into(), "t.txt".into(), false);
        assert_eq!(sink.output_path(Path::new("html_files/t1234.html")), PathBuf::from("out/t1234.json"));
        assert_eq!(sink.output_path(Path::new("in/a.b.htm")), PathBuf::from("out/a.b.json"));
        assert_eq!(sink.output_path(Path::new("in/noext")), PathBuf::from("out/noext.json"));
    }

    #[test]
    fn writes_unescaped_json() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("json_files");
        let sink = JsonDirSink::new(out.clone(), dir.path().join("total.txt"), false);
        let path = sink.write_page(Path::new("p.html"), &record()).unwrap();
        assert_eq!(path, out.join("p.json"));
        let written = fs::read_to_string(path).unwrap();
        assert_eq!(
            written,
            r#"{"article_count":0,"comment_count":1,"posts":[{"username":"יעל"}]}"#
        );
    }

    #[test]
    fn pretty_uses_four_spaces() {
        let dir = tempfile::tempdir().unwrap();
        let sink = JsonDirSink::new(dir.path().into(), dir.path().join("total.txt"), true);
        let path = sink.write_page(Path::new("p.html"), &record()).unwrap();
        let written = fs::read_to_string(path).unwrap();
        assert!(written.starts_with("{\n    \"article_count\": 0,"));
    }

    #[test]
    fn blocked_output_dir_is_a_page_error() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("json_files");
        fs::write(&blocker, "not a directory").unwrap();
        let sink = JsonDirSink::new(blocker, dir.path().join("total.txt"), false);
        let err = sink.write_page(Path::new("p.html"), &record()).unwrap_err();
        assert!(matches!(err, PageError::CreateDir { .. }));
    }

    #[test]
    fn writes_summary() {
        let dir = tempfile::tempdir().unwrap();
        let summary = dir.path().join("total_counts.txt");
        let sink = JsonDirSink::new(dir.path().into(), summary.clone(), false);
        sink.write_totals(Totals {
            total_articles: 2,
            total_comments: 5,
        })
        .unwrap();
        assert_eq!(
            fs::read_to_string(summary).unwrap(),
            "Total Articles: 2\nTotal Comments: 5\n"
        );
    }
}
