//! Tests for the YAML resource: loading, the reader contract, transient
//! values and the deterministic export.

use std::fs;
use std::path::PathBuf;

use propconf::{
    ConfigError, ConfigurationData, Property, PropertyMap, PropertyResource, YamlFileResource,
};
use serde_yaml::Value;
use tempfile::TempDir;

fn temp_config_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp directory")
}

fn write_config(dir: &TempDir, contents: &str) -> PathBuf {
    let path = dir.path().join("config.yml");
    fs::write(&path, contents).expect("Failed to write config file");
    path
}

#[test]
fn test_scalar_top_level_is_a_format_error() {
    let dir = temp_config_dir();
    let path = write_config(&dir, "123");

    let result = YamlFileResource::new(&path);
    match result {
        Err(error) => assert!(
            error.to_string().contains("Top-level is not a map"),
            "Unexpected error message: {error}"
        ),
        Ok(_) => panic!("Expected construction to fail"),
    }
}

#[test]
fn test_missing_and_empty_files_are_empty_mappings() {
    let dir = temp_config_dir();

    let missing = YamlFileResource::new(dir.path().join("missing.yml"))
        .expect("Failed to create resource");
    assert!(!missing.reader().contains("any.path"));

    let path = write_config(&dir, "");
    let empty = YamlFileResource::new(&path).expect("Failed to create resource");
    assert!(!empty.reader().contains("any.path"));
}

#[test]
fn test_unreadable_file_reports_io_error() {
    let dir = temp_config_dir();
    // A directory in place of the file makes the read itself fail.
    let path = dir.path().join("actually-a-dir");
    fs::create_dir(&path).expect("Failed to create dir");

    match YamlFileResource::new(&path) {
        Err(error @ ConfigError::Read { .. }) => {
            assert!(error.to_string().contains("Could not read file"));
        }
        other => panic!("Expected read error, got {:?}", other.err()),
    }
}

#[test]
fn test_reader_descends_dotted_paths() {
    let dir = temp_config_dir();
    let path = write_config(&dir, "title:\n  text: Hi\n  deep:\n    size: 5\n");
    let resource = YamlFileResource::new(&path).expect("Failed to create resource");
    let reader = resource.reader();

    assert!(reader.contains("title.text"));
    assert_eq!(reader.get_string("title.text"), Some("Hi"));
    assert_eq!(reader.get_int("title.deep.size"), Some(5));

    // A prefix resolving to a scalar makes everything below absent.
    assert!(!reader.contains("title.text.nested"));
    assert!(!reader.contains("absent"));
    assert_eq!(reader.get_object("absent.child"), None);
}

#[test]
fn test_typed_getters_use_narrow_coercions() {
    let dir = temp_config_dir();
    let path = write_config(
        &dir,
        "stats:\n  count: 22\n  ratio: 2.5\n  active: true\n  tags:\n    - a\n    - b\n",
    );
    let resource = YamlFileResource::new(&path).expect("Failed to create resource");
    let reader = resource.reader();

    // A number is not a boolean or a string, but widens to a double.
    assert_eq!(reader.get_boolean("stats.count"), None);
    assert_eq!(reader.get_string("stats.count"), None);
    assert_eq!(reader.get_double("stats.count"), Some(22.0));
    assert_eq!(reader.get_int("stats.count"), Some(22));

    assert_eq!(reader.get_int("stats.ratio"), None);
    assert_eq!(reader.get_double("stats.ratio"), Some(2.5));
    assert_eq!(reader.get_boolean("stats.active"), Some(true));
    assert_eq!(reader.get_list("stats.tags").map(<[Value]>::len), Some(2));
    assert_eq!(reader.get_list("stats.active"), None);
}

#[test]
fn test_set_value_is_transient_until_reload() {
    let dir = temp_config_dir();
    let path = write_config(&dir, "title:\n  text: Hi\n");
    let mut resource = YamlFileResource::new(&path).expect("Failed to create resource");

    resource.set_value("title.text", Value::String("staged".to_string()));
    resource.set_value("fresh.key", Value::Number(7.into()));
    assert_eq!(resource.reader().get_string("title.text"), Some("staged"));
    assert_eq!(resource.reader().get_int("fresh.key"), Some(7));

    resource.reload().expect("Failed to reload");
    assert_eq!(resource.reader().get_string("title.text"), Some("Hi"));
    assert!(!resource.reader().contains("fresh.key"));
}

fn sample_configuration() -> (ConfigurationData, Vec<(String, Value)>) {
    let host = Property::new("DataSource.host", "localhost".to_string());
    let port = Property::new("DataSource.port", 3306i32);
    let mode = Property::new("security.mode", "strict".to_string());
    let ratio = Property::new("security.ratio", 2.5f64);
    let enabled = Property::new("security.enabled", true);
    let colors = Property::new("colors", vec!["beige".to_string(), "gray".to_string()]);

    let mut map = PropertyMap::new();
    map.add(&host, &[]).expect("Failed to add property");
    map.add(&mode, &[]).expect("Failed to add property");
    map.add(&port, &[]).expect("Failed to add property");
    map.add(&ratio, &[]).expect("Failed to add property");
    map.add(&enabled, &[]).expect("Failed to add property");
    map.add(&colors, &[]).expect("Failed to add property");

    let expected = vec![
        ("DataSource.host".to_string(), host.to_export_value(host.default_value())),
        ("DataSource.port".to_string(), port.to_export_value(port.default_value())),
        ("security.mode".to_string(), mode.to_export_value(mode.default_value())),
        ("security.ratio".to_string(), ratio.to_export_value(ratio.default_value())),
        ("security.enabled".to_string(), enabled.to_export_value(enabled.default_value())),
        ("colors".to_string(), colors.to_export_value(colors.default_value())),
    ];
    (ConfigurationData::new(map), expected)
}

#[test]
fn test_export_groups_shared_prefixes_into_one_block() {
    let dir = temp_config_dir();
    let path = write_config(&dir, "");
    let mut resource = YamlFileResource::new(&path).expect("Failed to create resource");
    let (data, _) = sample_configuration();

    resource
        .export_properties(&data)
        .expect("Failed to export properties");

    let contents = fs::read_to_string(&path).expect("Failed to read config file");
    assert_eq!(
        contents,
        "DataSource:\n  host: localhost\n  port: 3306\n\
         \nsecurity:\n  mode: strict\n  ratio: 2.5\n  enabled: true\n\
         \ncolors:\n  - beige\n  - gray\n"
    );
}

#[test]
fn test_export_then_load_round_trips_every_value() {
    let dir = temp_config_dir();
    let path = write_config(&dir, "");
    let mut resource = YamlFileResource::new(&path).expect("Failed to create resource");
    let (data, expected) = sample_configuration();

    resource
        .export_properties(&data)
        .expect("Failed to export properties");

    let reloaded = YamlFileResource::new(&path).expect("Failed to create resource");
    for (property_path, value) in &expected {
        assert_eq!(
            reloaded.reader().get_object(property_path),
            Some(value),
            "Mismatch at '{property_path}'"
        );
    }
}

#[test]
fn test_consecutive_exports_are_byte_identical() {
    let dir = temp_config_dir();
    let path = write_config(&dir, "");
    let mut resource = YamlFileResource::new(&path).expect("Failed to create resource");
    let (data, _) = sample_configuration();

    resource
        .export_properties(&data)
        .expect("Failed to export properties");
    let first = fs::read_to_string(&path).expect("Failed to read config file");

    resource
        .export_properties(&data)
        .expect("Failed to export properties");
    let second = fs::read_to_string(&path).expect("Failed to read config file");

    assert_eq!(first, second);
}

#[test]
fn test_difficult_strings_survive_export_and_reload() {
    let dir = temp_config_dir();
    let path = write_config(&dir, "");
    let mut resource = YamlFileResource::new(&path).expect("Failed to create resource");

    let apostrophes = Property::new(
        "more.string1",
        "it's a text with some \\'apostrophes'".to_string(),
    );
    let control_chars = Property::new(
        "more.string2",
        "\tthis one\nhas some\nnew '' lines-test".to_string(),
    );
    let trailing_space = Property::new("more.string3", "ends with a space ".to_string());
    let mut map = PropertyMap::new();
    map.add(&apostrophes, &[]).expect("Failed to add property");
    map.add(&control_chars, &[]).expect("Failed to add property");
    map.add(&trailing_space, &[]).expect("Failed to add property");
    let data = ConfigurationData::new(map);

    resource
        .export_properties(&data)
        .expect("Failed to export properties");

    let reloaded = YamlFileResource::new(&path).expect("Failed to create resource");
    for property in [&apostrophes, &control_chars, &trailing_space] {
        assert_eq!(
            reloaded.reader().get_string(property.path()),
            Some(property.default_value().as_str()),
            "Mismatch at '{}'",
            property.path()
        );
    }
}

#[test]
fn test_export_emits_comments_above_groups_and_entries() {
    let dir = temp_config_dir();
    let path = write_config(&dir, "");
    let mut resource = YamlFileResource::new(&path).expect("Failed to create resource");

    let text = Property::new("title.text", "-Default-".to_string());
    let mut map = PropertyMap::new();
    map.add(&text, &["The text shown on screen"])
        .expect("Failed to add property");
    let mut data = ConfigurationData::new(map);
    data.set_comment(
        "title",
        vec!["This section defines the title that will be displayed".to_string()],
    );

    resource
        .export_properties(&data)
        .expect("Failed to export properties");

    let contents = fs::read_to_string(&path).expect("Failed to read config file");
    assert_eq!(
        contents,
        "# This section defines the title that will be displayed\n\
         title:\n\
         \x20 # The text shown on screen\n\
         \x20 text: '-Default-'\n"
    );
}
