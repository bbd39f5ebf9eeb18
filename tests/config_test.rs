use geosort::{Config, Crs, GeoSortError};
use std::io::Write;
use tempfile::Builder;

#[test]
fn test_load_json_file() {
    let mut file = Builder::new().suffix(".json").tempfile().unwrap();
    write!(
        file,
        r#"{{ "precision": 7, "source_crs": "EPSG:32633", "keep_key": false }}"#
    )
    .unwrap();

    let config = Config::from_file(file.path()).unwrap();
    assert_eq!(config.precision, 7);
    assert_eq!(config.attribute_name, "geohash");
    assert!(!config.keep_key);
    assert_eq!(config.crs().unwrap(), Crs::Utm { zone: 33, north: true });
}

#[test]
fn test_invalid_file_contents() {
    let mut file = Builder::new().suffix(".json").tempfile().unwrap();
    write!(file, r#"{{ "precision": 40 }}"#).unwrap();
    assert!(matches!(
        Config::from_file(file.path()),
        Err(GeoSortError::Config(_))
    ));
}

#[test]
fn test_unknown_extension() {
    let file = Builder::new().suffix(".yaml").tempfile().unwrap();
    assert!(matches!(
        Config::from_file(file.path()),
        Err(GeoSortError::Config(_))
    ));
}

#[test]
fn test_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("missing.json");
    assert!(matches!(Config::from_file(missing), Err(GeoSortError::Io(_))));
}

#[cfg(feature = "toml")]
#[test]
fn test_load_toml_file() {
    let mut file = Builder::new().suffix(".toml").tempfile().unwrap();
    writeln!(file, "precision = 5").unwrap();
    writeln!(file, "attribute_name = \"cell\"").unwrap();

    let config = Config::from_file(file.path()).unwrap();
    assert_eq!(config.precision, 5);
    assert_eq!(config.attribute_name, "cell");
    assert_eq!(config.source_crs, "EPSG:4326");
}
