use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Instant;

use insee_deces::{ArchiveFetcher, FetchError};
use zip::write::FileOptions;

/// Header of the INSEE death files
pub const INSEE_HEADER: &str =
    "nomprenom;sexe;datenaiss;lieunaiss;commnaiss;paysnaiss;datedeces;lieudeces;actedeces";

/// One line in the INSEE layout
#[must_use]
pub fn insee_row(birth: &str, death: &str, sex: &str, country: &str) -> String {
    format!("DOE*JANE/;{sex};{birth};75056;PARIS;{country};{death};75056;1")
}

/// File content with the INSEE header followed by `rows`
#[must_use]
pub fn insee_file(rows: &[String]) -> String {
    let mut content = String::from(INSEE_HEADER);
    content.push('\n');
    for row in rows {
        content.push_str(row);
        content.push('\n');
    }
    content
}

/// Write a source file under `dir`, creating parents
pub fn write_source_file(dir: &Path, name: &str, rows: &[String]) -> PathBuf {
    std::fs::create_dir_all(dir).unwrap();
    let path = dir.join(name);
    std::fs::write(&path, insee_file(rows)).unwrap();
    path
}

/// Zip archive holding `files`
#[must_use]
pub fn build_archive(files: &[(&str, String)]) -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    for (name, content) in files {
        writer.start_file(*name, FileOptions::default()).unwrap();
        writer.write_all(content.as_bytes()).unwrap();
    }
    writer.finish().unwrap().into_inner()
}

/// Serves a fixed archive per URL suffix and records every request
#[derive(Default)]
pub struct MockFetcher {
    archives: Vec<(String, Vec<u8>)>,
    requests: Mutex<Vec<String>>,
}

impl MockFetcher {
    #[must_use]
    pub fn new() -> Self {
        Self {
            archives: Vec::new(),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Serve `archive` for URLs ending in `suffix`
    #[must_use]
    pub fn serve(mut self, suffix: &str, archive: Vec<u8>) -> Self {
        self.archives.push((suffix.to_string(), archive));
        self
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

impl ArchiveFetcher for MockFetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        self.requests.lock().unwrap().push(url.to_string());
        self.archives
            .iter()
            .find(|(suffix, _)| url.ends_with(suffix.as_str()))
            .map(|(_, archive)| archive.clone())
            .ok_or_else(|| FetchError::Status {
                url: url.to_string(),
                status: 404,
            })
    }
}

/// Time a closure
pub fn timed_execution<F, T>(f: F) -> (std::time::Duration, T)
where
    F: FnOnce() -> T,
{
    let start = Instant::now();
    let result = f();
    (start.elapsed(), result)
}
