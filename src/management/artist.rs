use std::{
    fmt, io,
    path::{Path, PathBuf},
};

use crate::types::ArtistRecord;

/// Column order of the exported file.
pub const EXPORT_HEADERS: [&str; 5] = ["name", "followers", "popularity", "genres", "tracks"];

#[derive(Debug)]
pub enum ExportError {
    IoError(io::Error),
    CsvError(csv::Error),
    SerdeError(serde_json::Error),
}

impl From<io::Error> for ExportError {
    fn from(err: io::Error) -> Self {
        ExportError::IoError(err)
    }
}

impl From<csv::Error> for ExportError {
    fn from(err: csv::Error) -> Self {
        ExportError::CsvError(err)
    }
}

impl From<serde_json::Error> for ExportError {
    fn from(err: serde_json::Error) -> Self {
        ExportError::SerdeError(err)
    }
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportError::IoError(e) => write!(f, "I/O error: {}", e),
            ExportError::CsvError(e) => write!(f, "CSV error: {}", e),
            ExportError::SerdeError(e) => write!(f, "JSON error: {}", e),
        }
    }
}

impl std::error::Error for ExportError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutcome {
    Written {
        rows: usize,
        path: PathBuf,
    },
    /// No artist resolved, so no file was created.
    NothingToExport,
}

/// Accumulates artist records for one run and writes them out as CSV.
///
/// Every record becomes one row with the columns of [`EXPORT_HEADERS`]. The
/// nested `genres` and `tracks` values are JSON-encoded into a single cell
/// each, so the file stays strictly two-dimensional.
pub struct ArtistDataManager {
    artists: Vec<ArtistRecord>,
}

impl ArtistDataManager {
    pub fn new(artists: Option<Vec<ArtistRecord>>) -> Self {
        Self {
            artists: artists.unwrap_or_default(),
        }
    }

    pub fn add_artist(&mut self, artist: ArtistRecord) -> &mut Self {
        self.artists.push(artist);
        self
    }

    pub fn add_artists(&mut self, artists: Vec<ArtistRecord>) -> &mut Self {
        self.artists.extend(artists);
        self
    }

    pub fn count_artists(&self) -> usize {
        self.artists.len()
    }

    pub fn count_tracks(&self) -> usize {
        self.artists.iter().map(|a| a.tracks.len()).sum()
    }

    pub fn all(&self) -> &[ArtistRecord] {
        &self.artists
    }

    /// Renders header and rows into CSV bytes.
    pub fn to_csv(&self) -> Result<Vec<u8>, ExportError> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(EXPORT_HEADERS)?;

        for artist in &self.artists {
            writer.write_record([
                artist.name.clone(),
                artist.followers.to_string(),
                artist.popularity.to_string(),
                serde_json::to_string(&artist.genres)?,
                serde_json::to_string(&artist.tracks)?,
            ])?;
        }

        writer
            .into_inner()
            .map_err(|e| ExportError::IoError(e.into_error()))
    }

    /// Writes the CSV file to `path`, creating parent directories as needed.
    ///
    /// Nothing is written when no artist was added; the caller gets
    /// [`ExportOutcome::NothingToExport`] instead.
    pub async fn persist(&self, path: &Path) -> Result<ExportOutcome, ExportError> {
        if self.artists.is_empty() {
            return Ok(ExportOutcome::NothingToExport);
        }

        let csv = self.to_csv()?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            async_fs::create_dir_all(parent).await?;
        }
        async_fs::write(path, csv).await?;

        Ok(ExportOutcome::Written {
            rows: self.artists.len(),
            path: path.to_path_buf(),
        })
    }
}
