use std::path::Path;

use tabled::Table;

use crate::{
    config::Config,
    error, info,
    management::{ArtistDataManager, ExportOutcome},
    pipeline::Pipeline,
    spotify::SpotifyClient,
    success,
    types::ArtistTableRow,
    utils, warning,
};

pub async fn collect(input: &Path, output: &Path, column: &str) {
    let names = match utils::read_artist_names(input, column).await {
        Ok(names) => names,
        Err(e) => error!(
            "Cannot read artist names from {}. Err: {}",
            input.display(),
            e
        ),
    };

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => error!("Cannot load configuration. Err: {}", e),
    };

    let client = match SpotifyClient::new(config) {
        Ok(client) => client,
        Err(e) => error!("Cannot build HTTP client. Err: {}", e),
    };

    info!(
        "Processing {} artists from {}",
        names.len(),
        input.display()
    );

    let pb = utils::spinner("Authenticating with Spotify...");
    let mut pipeline = Pipeline::new(client);
    let result = pipeline
        .run_with_progress(&names, |index, total, name| {
            pb.set_message(format!(
                "Processing artist {name} ({count}/{total})",
                name = name,
                count = index + 1,
                total = total
            ));
        })
        .await;
    pb.finish_and_clear();

    let records = match result {
        Ok(records) => records,
        Err(e) => error!("Failed to obtain access token. Exiting. Err: {}", e),
    };

    let mut artist_data_mgr = ArtistDataManager::new(None);
    artist_data_mgr.add_artists(records);
    info!(
        "Resolved {} of {} artists",
        artist_data_mgr.count_artists(),
        names.len()
    );

    match artist_data_mgr.persist(output).await {
        Ok(ExportOutcome::Written { rows, path }) => {
            let table_rows: Vec<ArtistTableRow> = artist_data_mgr
                .all()
                .iter()
                .map(ArtistTableRow::from)
                .collect();
            println!("{}", Table::new(table_rows));

            success!(
                "CSV exported to {} ({} of {} artists, {} tracks).",
                path.display(),
                rows,
                names.len(),
                artist_data_mgr.count_tracks()
            );
        }
        Ok(ExportOutcome::NothingToExport) => warning!("No artist data found. Nothing exported."),
        Err(e) => error!(
            "Cannot export artist data to {}. Err: {}",
            output.display(),
            e
        ),
    }
}
