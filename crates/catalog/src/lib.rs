mod flights;
mod small_talk;

use std::path::{Path, PathBuf};

use anyhow::Result;

pub use flights::{FlightCatalog, SearchError};
pub use small_talk::SmallTalkTable;

pub const FLIGHTS_FILE: &str = "flight_data.csv";
pub const SMALL_TALK_FILE: &str = "small_talk.csv";

/// Where the two datasets live. Both default to well-known file names inside
/// a data directory.
#[derive(Debug, Clone)]
pub struct DataSources {
    pub flights: PathBuf,
    pub small_talk: PathBuf,
}

impl DataSources {
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            flights: dir.join(FLIGHTS_FILE),
            small_talk: dir.join(SMALL_TALK_FILE),
        }
    }

    pub fn load(&self) -> Result<(FlightCatalog, SmallTalkTable)> {
        let catalog = FlightCatalog::from_csv_path(&self.flights)?;
        let small_talk = SmallTalkTable::from_csv_path(&self.small_talk)?;
        Ok((catalog, small_talk))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_dir_uses_default_file_names() {
        let sources = DataSources::in_dir("data");
        assert_eq!(sources.flights, Path::new("data").join("flight_data.csv"));
        assert_eq!(sources.small_talk, Path::new("data").join("small_talk.csv"));
    }

    #[test]
    fn missing_files_are_startup_errors() {
        let sources = DataSources::in_dir("no/such/dir");
        let err = sources.load().unwrap_err();
        assert!(err.to_string().contains("flight catalog"));
    }
}
