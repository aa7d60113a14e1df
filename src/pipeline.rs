//! Map every page to a record in parallel, then reduce into run totals.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::error::PageError;
use crate::loader;
use crate::parser;
use crate::record::PageRecord;
use crate::sink::RecordSink;
use crate::totals::{RunTotals, Totals};

pub struct PageFailure {
    pub source: PathBuf,
    pub error: PageError,
}

pub struct RunReport {
    pub pages: usize,
    pub failures: Vec<PageFailure>,
    pub totals: Totals,
}

impl RunReport {
    pub fn print(&self) {
        println!(
            "Parsed {} pages ({} ok, {} failed): {} articles, {} comments.",
            self.pages,
            self.pages - self.failures.len(),
            self.failures.len(),
            self.totals.total_articles,
            self.totals.total_comments,
        );
        for f in &self.failures {
            println!("  {}: {}", f.source.display(), f.error);
        }
    }
}

/// Regular files directly inside `dir`, symlinks followed, sorted by name.
/// An entry whose target cannot be inspected is kept, so it fails as a page.
pub fn list_pages(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut pages = Vec::new();
    let entries = fs::read_dir(dir).with_context(|| format!("Failed to list {:?}", dir))?;
    for entry in entries {
        let path = entry.with_context(|| format!("Failed to list {:?}", dir))?.path();
        match fs::metadata(&path) {
            Ok(meta) if !meta.is_file() => continue,
            _ => pages.push(path),
        }
    }
    pages.sort();
    Ok(pages)
}

/// Load and parse one page, add it to the run totals, then hand it to the
/// sink. Totals count a parsed page even if its record cannot be written.
pub fn process_page(
    path: &Path,
    sink: &dyn RecordSink,
    totals: &RunTotals,
) -> Result<PageRecord, PageError> {
    let page = loader::load(path)?;
    let record = parser::parse_page(&page.text);
    totals.record(&record);
    let out = sink.write_page(&page.source, &record)?;
    debug!(
        page = %path.display(),
        out = %out.display(),
        posts = record.posts().len(),
        articles = record.article_count(),
        comments = record.comment_count(),
        "page done"
    );
    Ok(record)
}

pub fn run(pages: &[PathBuf], sink: &dyn RecordSink) -> Result<RunReport> {
    info!(pages = pages.len(), "parsing pages");

    let pb = ProgressBar::new(pages.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({per_sec})")?
            .progress_chars("#>-"),
    );

    let totals = RunTotals::new();
    let failures: Vec<PageFailure> = pages
        .par_iter()
        .filter_map(|path| {
            let outcome = process_page(path, sink, &totals);
            pb.inc(1);
            match outcome {
                Ok(_) => None,
                Err(error) => {
                    warn!(page = %path.display(), %error, "page failed");
                    Some(PageFailure {
                        source: path.clone(),
                        error,
                    })
                }
            }
        })
        .collect();
    pb.finish_and_clear();

    let totals = totals.into_totals();
    sink.write_totals(totals)?;
    info!(
        articles = totals.total_articles,
        comments = totals.total_comments,
        failed = failures.len(),
        "run complete"
    );

    Ok(RunReport {
        pages: pages.len(),
        failures,
        totals,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::JsonDirSink;
    use encoding_rs::WINDOWS_1255;
    use std::sync::Mutex;

    const ARTICLE: &str = r##"<html><body>
<table width="100%" cellpadding="3" cellspacing="0"><tr><td>
<h1 class="text16b">כותרת</h1>
<font size="2" face="Arial" color="#000099"><b>דני</b></font>
</td></tr></table>
<table width="100%" cellpadding="3" cellspacing="0"><tr><td>
<font size="2" face="Arial" color="#000099"><b>רות</b></font>
<a href="#1">הודעה 1</a>
</td></tr></table>
</body></html>"##;

    const COMMENTS: &str = r##"<html><body>
<table width="100%" cellpadding="3" cellspacing="0"><tr><td>
<font size="2" face="Arial" color="#000099"><b>א</b></font>
</td></tr></table>
<table width="100%" cellpadding="3" cellspacing="0"><tr><td>
<font size="2" face="Arial" color="#000099"><b>ב</b></font>
</td></tr></table>
</body></html>"##;

    fn setup() -> (tempfile::TempDir, Vec<PathBuf>) {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("html_files");
        fs::create_dir(&input).unwrap();
        let (legacy, _, _) = WINDOWS_1255.encode(ARTICLE);
        fs::write(input.join("t1.html"), &*legacy).unwrap();
        fs::write(input.join("t2.html"), COMMENTS).unwrap();
        fs::create_dir(input.join("nested")).unwrap();
        let pages = list_pages(&input).unwrap();
        (dir, pages)
    }

    #[test]
    fn lists_files_only() {
        let (_dir, pages) = setup();
        let names: Vec<_> = pages
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["t1.html", "t2.html"]);
    }

    #[cfg(unix)]
    #[test]
    fn follows_symlinked_pages() {
        let (dir, _) = setup();
        let input = dir.path().join("html_files");
        let elsewhere = dir.path().join("t3.html");
        fs::write(&elsewhere, COMMENTS).unwrap();
        std::os::unix::fs::symlink(&elsewhere, input.join("t3.html")).unwrap();
        std::os::unix::fs::symlink(dir.path(), input.join("linked_dir")).unwrap();
        std::os::unix::fs::symlink(dir.path().join("gone.html"), input.join("t4.html")).unwrap();

        let pages = list_pages(&input).unwrap();
        let names: Vec<_> = pages
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["t1.html", "t2.html", "t3.html", "t4.html"]);

        let sink = JsonDirSink::new(dir.path().join("json_files"), dir.path().join("total_counts.txt"), false);
        let report = run(&pages, &sink).unwrap();
        assert_eq!(report.failures.len(), 1);
        assert!(matches!(report.failures[0].error, PageError::Read { .. }));
        assert_eq!(report.totals.total_comments, 5);
    }

    #[test]
    fn end_to_end() {
        let (dir, pages) = setup();
        let out = dir.path().join("json_files");
        let summary = dir.path().join("total_counts.txt");
        let sink = JsonDirSink::new(out.clone(), summary.clone(), false);

        let report = run(&pages, &sink).unwrap();
        assert_eq!(report.pages, 2);
        assert!(report.failures.is_empty());
        assert_eq!(
            report.totals,
            Totals {
                total_articles: 1,
                total_comments: 3
            }
        );

        let t1 = fs::read_to_string(out.join("t1.json")).unwrap();
        assert!(t1.contains(r#""article_title":"כותרת""#));
        assert!(t1.contains(r#""reply_to":1"#));
        assert_eq!(
            fs::read_to_string(summary).unwrap(),
            "Total Articles: 1\nTotal Comments: 3\n"
        );
    }

    #[test]
    fn failures_are_contained() {
        let (dir, mut pages) = setup();
        pages.push(dir.path().join("html_files/missing.html"));
        let blocker = dir.path().join("json_files");
        fs::write(&blocker, "file, not dir").unwrap();
        let summary = dir.path().join("total_counts.txt");
        let sink = JsonDirSink::new(blocker, summary.clone(), false);

        let report = run(&pages, &sink).unwrap();
        assert_eq!(report.failures.len(), 3);
        assert!(report
            .failures
            .iter()
            .any(|f| matches!(f.error, PageError::Read { .. })));
        // parsed pages still count even though their records were not written
        assert_eq!(report.totals.total_articles, 1);
        assert_eq!(report.totals.total_comments, 3);
        assert!(summary.exists());
    }

    struct MemorySink {
        pages: Mutex<Vec<(PathBuf, PageRecord)>>,
        totals: Mutex<Option<Totals>>,
    }

    impl RecordSink for MemorySink {
        fn write_page(&self, source: &Path, record: &PageRecord) -> Result<PathBuf, PageError> {
            self.pages
                .lock()
                .unwrap()
                .push((source.to_path_buf(), record.clone()));
            Ok(source.to_path_buf())
        }

        fn write_totals(&self, totals: Totals) -> Result<()> {
            *self.totals.lock().unwrap() = Some(totals);
            Ok(())
        }
    }

    #[test]
    fn totals_equal_sum_of_pages() {
        let (_dir, pages) = setup();
        let sink = MemorySink {
            pages: Mutex::new(Vec::new()),
            totals: Mutex::new(None),
        };
        let report = run(&pages, &sink).unwrap();
        let written = sink.pages.lock().unwrap();
        let expected: Totals = written.iter().map(|(_, r)| Totals::from(r)).sum();
        assert_eq!(written.len(), 2);
        assert_eq!(report.totals, expected);
        assert_eq!(*sink.totals.lock().unwrap(), Some(expected));
    }
}
