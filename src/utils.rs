use std::{fmt, io, path::Path, time::Duration};

use indicatif::{ProgressBar, ProgressStyle};

/// Column of the input file that holds one artist name per row.
pub const ARTIST_COLUMN: &str = "Performer 1 Name";

#[derive(Debug)]
pub enum InputError {
    IoError(io::Error),
    CsvError(csv::Error),
    MissingColumn(String),
}

impl From<io::Error> for InputError {
    fn from(err: io::Error) -> Self {
        InputError::IoError(err)
    }
}

impl From<csv::Error> for InputError {
    fn from(err: csv::Error) -> Self {
        InputError::CsvError(err)
    }
}

impl fmt::Display for InputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputError::IoError(e) => write!(f, "I/O error: {}", e),
            InputError::CsvError(e) => write!(f, "CSV error: {}", e),
            InputError::MissingColumn(column) => write!(f, "column '{}' not found", column),
        }
    }
}

impl std::error::Error for InputError {}

pub async fn read_artist_names(path: &Path, column: &str) -> Result<Vec<String>, InputError> {
    let content = async_fs::read(path).await?;
    parse_artist_names(&content, column)
}

/// Collects the non-empty values of `column`, trimmed, in file order.
///
/// Duplicates are kept; each occurrence is processed on its own.
pub fn parse_artist_names(data: &[u8], column: &str) -> Result<Vec<String>, InputError> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(data);

    let index = reader
        .headers()?
        .iter()
        .position(|h| h.trim_start_matches('\u{feff}').trim() == column)
        .ok_or_else(|| InputError::MissingColumn(column.to_string()))?;

    let mut names = Vec::new();
    for record in reader.records() {
        let record = record?;
        if let Some(value) = record.get(index).map(str::trim) {
            if !value.is_empty() {
                names.push(value.to_string());
            }
        }
    }

    Ok(names)
}

/// Whether `filename` ends in a `.csv` extension, ignoring case.
pub fn has_csv_extension(filename: &str) -> bool {
    filename
        .rsplit_once('.')
        .is_some_and(|(_, ext)| ext.eq_ignore_ascii_case("csv"))
}

pub fn spinner(message: impl Into<String>) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_message(message.into());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_style(
        ProgressStyle::with_template("{spinner:.blue} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
    );
    pb
}
