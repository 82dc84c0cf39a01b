//! Tests for config functionality.

use crate::config::{Branch, Category, Config, ConfigOverrides, ExampleSelection};
use crate::error::FctError;
use tempfile::TempDir;

fn valid_config() -> Config {
    Config {
        project_slug: "my_windfarm".to_string(),
        ..Config::default()
    }
}

#[test]
fn test_default_config() {
    let config = Config::default();

    assert_eq!(config.repository, "NREL/flasc");
    assert_eq!(config.archive_base_url, "https://github.com");
    assert_eq!(config.chunk_size, 8192);
    assert_eq!(config.timeout_secs, 120);
    assert_eq!(config.scratch_dir_name, "tmp");
    assert_eq!(config.stale_workspace_minutes, 60);
    assert!(!config.prune_unpopulated);
    assert!(!config.convert_notebooks);
}

#[test]
fn test_parse_partial_yaml() {
    let yaml = r#"
project_slug: turbine_study
chunk_size: 1024
"#;
    let config = Config::from_yaml(yaml).unwrap();

    assert_eq!(config.project_slug, "turbine_study");
    assert_eq!(config.chunk_size, 1024);

    // Unspecified values should use defaults
    assert_eq!(config.repository, "NREL/flasc");
    assert_eq!(config.timeout_secs, 120);
}

#[test]
fn test_unknown_fields_are_ignored() {
    let yaml = r#"
project_slug: turbine_study
some_future_option: true
"#;
    let config = Config::from_yaml(yaml).unwrap();
    assert_eq!(config.project_slug, "turbine_study");
}

#[test]
fn test_invalid_yaml_is_config_error() {
    let err = Config::from_yaml("project_slug: [unclosed").unwrap_err();
    assert!(matches!(err, FctError::Config(_)));
}

#[test]
fn test_validate_rejects_bad_slug() {
    for slug in ["", "1abc", "my-windfarm", "a b", "pkg.sub"] {
        let config = Config {
            project_slug: slug.to_string(),
            ..Config::default()
        };
        assert!(
            matches!(config.validate(), Err(FctError::Config(_))),
            "slug {:?} should be rejected",
            slug
        );
    }
}

#[test]
fn test_validate_rejects_zero_values() {
    let mut config = valid_config();
    config.chunk_size = 0;
    assert!(config.validate().is_err());

    let mut config = valid_config();
    config.timeout_secs = 0;
    assert!(config.validate().is_err());

    let mut config = valid_config();
    config.stale_workspace_minutes = 0;
    assert!(config.validate().is_err());
}

#[test]
fn test_validate_rejects_bad_repository_and_scratch_name() {
    let mut config = valid_config();
    config.repository = "flasc".to_string();
    assert!(config.validate().is_err());

    let mut config = valid_config();
    config.scratch_dir_name = "../outside".to_string();
    assert!(config.validate().is_err());

    assert!(valid_config().validate().is_ok());
}

#[test]
fn test_load_or_default_without_file() {
    let temp = TempDir::new().unwrap();
    let config = Config::load_or_default(temp.path().join("fct.yaml")).unwrap();
    assert_eq!(config.repository, "NREL/flasc");
    assert!(config.project_slug.is_empty());
}

#[test]
fn test_load_from_file() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("fct.yaml");
    std::fs::write(&path, "project_slug: from_file\nconvert_notebooks: true\n").unwrap();

    let config = Config::load(&path).unwrap();
    assert_eq!(config.project_slug, "from_file");
    assert!(config.convert_notebooks);
}

#[test]
fn test_overrides_take_precedence() {
    let mut config = Config::from_yaml("project_slug: from_file\n").unwrap();
    config.apply_overrides(&ConfigOverrides {
        project_slug: Some("from_cli".to_string()),
        prune_unpopulated: Some(true),
        ..ConfigOverrides::default()
    });

    assert_eq!(config.project_slug, "from_cli");
    assert!(config.prune_unpopulated);
    assert!(!config.convert_notebooks);
}

#[test]
fn test_archive_url_contains_branch() {
    let config = valid_config();
    for branch in Branch::ALL {
        let url = config.archive_url(branch);
        assert!(url.contains(branch.as_str()));
    }
    assert_eq!(
        config.archive_url(Branch::Develop),
        "https://github.com/NREL/flasc/archive/refs/heads/develop.zip"
    );
}

#[test]
fn test_archive_root_name() {
    let config = valid_config();
    assert_eq!(config.archive_root_name(Branch::Main), "flasc-main");
    assert_eq!(config.archive_root_name(Branch::Develop), "flasc-develop");
}

#[test]
fn test_branch_parsing() {
    assert_eq!("main".parse::<Branch>().unwrap(), Branch::Main);
    assert_eq!("develop".parse::<Branch>().unwrap(), Branch::Develop);

    for bad in ["master", "Main", "", "feature/x"] {
        assert!(matches!(bad.parse::<Branch>(), Err(FctError::Config(_))));
    }
}

#[test]
fn test_category_parsing() {
    assert_eq!(
        "examples_artificial_data".parse::<Category>().unwrap(),
        Category::ArtificialData
    );
    assert_eq!(
        "examples_smarteole".parse::<Category>().unwrap(),
        Category::Smarteole
    );
    assert!(matches!(
        "examples_other".parse::<Category>(),
        Err(FctError::Config(_))
    ));
}

#[test]
fn test_selection_parsing() {
    assert_eq!(ExampleSelection::parse("n").unwrap(), ExampleSelection::None);
    assert_eq!(ExampleSelection::parse("").unwrap(), ExampleSelection::None);

    assert_eq!(
        ExampleSelection::parse(
            "Smarteole wake steering campaign analysis examples from the 'flasc/main' branch"
        )
        .unwrap(),
        ExampleSelection::Examples(Branch::Main, Category::Smarteole)
    );
    assert_eq!(
        ExampleSelection::parse(
            "Artificial SCADA data analysis examples from the 'flasc/develop' branch"
        )
        .unwrap(),
        ExampleSelection::Examples(Branch::Develop, Category::ArtificialData)
    );

    assert!(matches!(
        ExampleSelection::parse("y"),
        Err(FctError::Config(_))
    ));
}

#[test]
fn test_every_choice_selects_examples() {
    for choice in ExampleSelection::choices() {
        assert!(matches!(
            ExampleSelection::parse(choice).unwrap(),
            ExampleSelection::Examples(_, _)
        ));
    }
}

#[test]
fn test_unrecognized_selector_lists_choices() {
    let err = ExampleSelection::parse("everything please").unwrap_err();
    let message = err.to_string();

    assert!(message.contains("'everything please'"));
    for choice in ExampleSelection::choices() {
        assert!(message.contains(choice), "missing {choice}");
    }
}
