use super::*;

const MINIMAL: &str = r#"{ "name": "Pikachu", "creature": "img/creature.png" }"#;

#[test]
fn minimal_manifest_uses_defaults() {
    let p = Project::from_reader(MINIMAL.as_bytes(), "/proj").unwrap();
    assert_eq!(p.name, "Pikachu");
    assert!(p.script.is_empty());
    assert!(p.gallery.is_empty());
    assert_eq!(p.fallback_script_secs(), DEFAULT_SCRIPT_SECS);
    assert_eq!(
        p.resolve(&p.creature).unwrap(),
        PathBuf::from("/proj/img/creature.png")
    );
    assert_eq!(p.output_file_name(), "Pikachu_Pokemon.mp4");
}

#[test]
fn unknown_fields_are_rejected() {
    let json = r#"{ "name": "A", "creature": "a.png", "colour": 1 }"#;
    assert!(matches!(
        Project::from_reader(json.as_bytes(), "."),
        Err(StudioError::Serde(_))
    ));
}

#[test]
fn escaping_paths_are_rejected() {
    let json = r#"{ "name": "A", "creature": "a.png", "gallery": ["../b.png"] }"#;
    assert!(matches!(
        Project::from_reader(json.as_bytes(), "."),
        Err(StudioError::Validation(_))
    ));
    let json = r#"{ "name": "A", "creature": "/etc/a.png" }"#;
    assert!(Project::from_reader(json.as_bytes(), ".").is_err());
}

#[test]
fn fallback_duration_must_be_positive() {
    let json = r#"{ "name": "A", "creature": "a.png", "script_duration_secs": 0 }"#;
    assert!(Project::from_reader(json.as_bytes(), ".").is_err());
    let json = r#"{ "name": "A", "creature": "a.png", "script_duration_secs": 12.5 }"#;
    let p = Project::from_reader(json.as_bytes(), ".").unwrap();
    assert_eq!(p.fallback_script_secs(), 12.5);
}

#[test]
fn blank_name_is_rejected() {
    let json = r#"{ "name": "  ", "creature": "a.png" }"#;
    assert!(Project::from_reader(json.as_bytes(), ".").is_err());
}

#[test]
fn normalize_strips_dots_and_backslashes() {
    assert_eq!(normalize_rel_path("./a\\b//c.png").unwrap(), "a/b/c.png");
    assert!(normalize_rel_path("").is_err());
    assert!(normalize_rel_path("./").is_err());
}

#[test]
fn file_stem_sanitizing() {
    assert_eq!(sanitize_file_stem("Mr. Mime"), "Mr. Mime");
    assert_eq!(sanitize_file_stem("Type: Null/2?"), "Type_ Null_2_");
    assert_eq!(sanitize_file_stem(" .. "), "creature");
}

#[test]
fn from_path_resolves_against_manifest_dir() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("project.json");
    std::fs::write(&path, MINIMAL).unwrap();
    let p = Project::from_path(&path).unwrap();
    assert_eq!(p.base_dir(), dir.path());
}
