use std::fmt::Display;
use std::path::PathBuf;

use reqwest::Client as HttpClient;
use serde::de::DeserializeOwned;

use super::DatasetSource;
use crate::{
    error::{AppError, AppResult, InputError},
    models::{Place, PlaceRecord, RatingObservation, RatingRecord},
};

/// Where a CSV table is read from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatasetLocation {
    /// Local file
    Path(PathBuf),
    /// Remote file fetched over http(s)
    Url(String),
}

impl DatasetLocation {
    /// Interprets `http://` and `https://` prefixes as URLs, anything else as a path
    pub fn parse(location: &str) -> Self {
        let trimmed = location.trim();
        if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            DatasetLocation::Url(trimmed.to_string())
        } else {
            DatasetLocation::Path(PathBuf::from(trimmed))
        }
    }
}

impl Display for DatasetLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DatasetLocation::Path(path) => write!(f, "{}", path.display()),
            DatasetLocation::Url(url) => write!(f, "{}", url),
        }
    }
}

/// Reads the catalog and ratings from CSV exports
pub struct CsvSource {
    http_client: HttpClient,
    places: DatasetLocation,
    ratings: DatasetLocation,
}

impl CsvSource {
    pub fn new(places: DatasetLocation, ratings: DatasetLocation) -> Self {
        Self {
            http_client: HttpClient::new(),
            places,
            ratings,
        }
    }

    /// Fetches the raw bytes of a table
    async fn fetch(&self, location: &DatasetLocation) -> AppResult<Vec<u8>> {
        tracing::debug!(location = %location, "Fetching dataset table");

        match location {
            DatasetLocation::Path(path) => Ok(tokio::fs::read(path).await?),
            DatasetLocation::Url(url) => {
                let response = self.http_client.get(url).send().await?;

                if !response.status().is_success() {
                    let status = response.status();
                    tracing::error!(url = %url, status = %status, "Dataset download failed");
                    return Err(AppError::Unavailable(format!(
                        "Dataset download from {} returned status {}",
                        url, status
                    )));
                }

                Ok(response.bytes().await?.to_vec())
            }
        }
    }
}

#[async_trait::async_trait]
impl DatasetSource for CsvSource {
    async fn load_places(&self) -> AppResult<Vec<Place>> {
        let bytes = self.fetch(&self.places).await?;
        let places = parse_places(&bytes)?;
        tracing::info!(source = %self.places, count = places.len(), "Loaded place catalog");
        Ok(places)
    }

    async fn load_ratings(&self) -> AppResult<Vec<RatingObservation>> {
        let bytes = self.fetch(&self.ratings).await?;
        let ratings = parse_ratings(&bytes)?;
        tracing::info!(source = %self.ratings, count = ratings.len(), "Loaded rating observations");
        Ok(ratings)
    }

    fn name(&self) -> &'static str {
        "csv"
    }
}

/// Parses the place catalog table
pub fn parse_places(bytes: &[u8]) -> Result<Vec<Place>, InputError> {
    parse_records::<PlaceRecord, _, _>(bytes, |record, line| record.into_place(line))
}

/// Parses the ratings table, keeping row order
pub fn parse_ratings(bytes: &[u8]) -> Result<Vec<RatingObservation>, InputError> {
    parse_records::<RatingRecord, _, _>(bytes, |record, line| record.into_observation(line))
}

fn parse_records<R, T, F>(bytes: &[u8], convert: F) -> Result<Vec<T>, InputError>
where
    R: DeserializeOwned,
    F: Fn(R, u64) -> Result<T, InputError>,
{
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(bytes);
    let headers = reader.headers().map_err(malformed)?.clone();

    let mut items = Vec::new();
    let mut record = csv::StringRecord::new();
    while reader.read_record(&mut record).map_err(malformed)? {
        // Header is line 1, first data row is line 2
        let line = record.position().map(|p| p.line()).unwrap_or(0);
        let raw: R = record
            .deserialize(Some(&headers))
            .map_err(|e| InputError::Malformed {
                line,
                message: e.to_string(),
            })?;
        items.push(convert(raw, line)?);
    }

    Ok(items)
}

fn malformed(e: csv::Error) -> InputError {
    InputError::Malformed {
        line: e.position().map(|p| p.line()).unwrap_or(0),
        message: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PlaceId, UserId};
    use std::io::Write;
    use tempfile::NamedTempFile;

    const PLACES_CSV: &str = "\
Place_Id,Place_Name,Description,Category,City,Price,Rating,Time_Minutes
1,Taman Pintar Yogyakarta,Wahana edukasi,Taman Hiburan,Yogyakarta,6000,4.5,
2,Keraton Yogyakarta,Istana,Budaya,Yogyakarta,15000,4.6,90
";

    const RATINGS_CSV: &str = "\
User_Id,Place_Id,Place_Ratings
1,1,3
1,2,5
2,1,4
";

    #[test]
    fn test_location_parse() {
        assert_eq!(
            DatasetLocation::parse("https://example.com/tour.csv"),
            DatasetLocation::Url("https://example.com/tour.csv".to_string())
        );
        assert_eq!(
            DatasetLocation::parse("data/tour.csv"),
            DatasetLocation::Path(PathBuf::from("data/tour.csv"))
        );
    }

    #[test]
    fn test_parse_places_ignores_extra_columns() {
        let places = parse_places(PLACES_CSV.as_bytes()).unwrap();
        assert_eq!(places.len(), 2);
        assert_eq!(places[0].place_id, PlaceId(1));
        assert_eq!(places[0].name, "Taman Pintar Yogyakarta");
        assert_eq!(places[1].category, "Budaya");
        assert_eq!(places[1].price, 15000);
    }

    #[test]
    fn test_parse_ratings_keeps_order() {
        let ratings = parse_ratings(RATINGS_CSV.as_bytes()).unwrap();
        assert_eq!(ratings.len(), 3);
        assert_eq!(ratings[1].user_id, UserId(1));
        assert_eq!(ratings[1].place_id, PlaceId(2));
        assert_eq!(ratings[1].rating, 5.0);
    }

    #[test]
    fn test_non_numeric_rating_is_malformed() {
        let data = "User_Id,Place_Id,Place_Ratings\n1,1,great\n";
        let err = parse_ratings(data.as_bytes()).unwrap_err();
        assert!(matches!(err, InputError::Malformed { .. }));
    }

    #[test]
    fn test_missing_rating_field() {
        let data = "User_Id,Place_Id,Place_Ratings\n1,1,4\n2,3,\n";
        let err = parse_ratings(data.as_bytes()).unwrap_err();
        assert_eq!(
            err,
            InputError::MissingField {
                field: "Place_Ratings",
                line: 3
            }
        );
    }

    #[test]
    fn test_zero_rating_rejected() {
        let data = "User_Id,Place_Id,Place_Ratings\n1,1,0\n";
        let err = parse_ratings(data.as_bytes()).unwrap_err();
        assert!(matches!(err, InputError::InvalidRating { .. }));
    }

    #[test]
    fn test_csv_source_reads_local_files() {
        let mut places_file = NamedTempFile::new().expect("temp file");
        write!(places_file, "{}", PLACES_CSV).expect("write places");
        let mut ratings_file = NamedTempFile::new().expect("temp file");
        write!(ratings_file, "{}", RATINGS_CSV).expect("write ratings");

        let source = CsvSource::new(
            DatasetLocation::Path(places_file.path().to_path_buf()),
            DatasetLocation::Path(ratings_file.path().to_path_buf()),
        );

        let places = tokio_test::block_on(source.load_places()).unwrap();
        let ratings = tokio_test::block_on(source.load_ratings()).unwrap();

        assert_eq!(places.len(), 2);
        assert_eq!(ratings.len(), 3);
        assert_eq!(source.name(), "csv");
    }

    #[test]
    fn test_csv_source_missing_file() {
        let source = CsvSource::new(
            DatasetLocation::Path(PathBuf::from("/nonexistent/tour.csv")),
            DatasetLocation::Path(PathBuf::from("/nonexistent/tour_rating.csv")),
        );

        let result = tokio_test::block_on(source.load_places());
        assert!(matches!(result, Err(AppError::Io(_))));
    }
}
