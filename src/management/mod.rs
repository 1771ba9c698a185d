mod artist;

pub use artist::ArtistDataManager;
pub use artist::EXPORT_HEADERS;
pub use artist::ExportError;
pub use artist::ExportOutcome;
