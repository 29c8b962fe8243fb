mod common;

use alumni_map::domain::view::ElementId;
use alumni_map::utils::validation::Validate;
use alumni_map::{
    AppConfig, ConsoleMap, FileCsvSource, HtmlPresenter, HttpCsvSource, LoadPhase, MapEngine,
    RefreshOutcome, ViewCoordinator, ViewSettings,
};
use alumni_map::domain::model::SchemaVariant;
use alumni_map::domain::ports::ConfigProvider;
use common::{ENGLISH_SHEET, LOCALIZED_SHEET};
use httpmock::prelude::*;
use std::sync::Arc;
use tempfile::TempDir;

#[tokio::test]
async fn test_end_to_end_with_published_sheet() {
    let temp_dir = TempDir::new().unwrap();
    let export_path = temp_dir.path().join("markers.geojson");
    let html_path = temp_dir.path().join("panel.html");

    let server = MockServer::start();
    let sheet_mock = server.mock(|when, then| {
        when.method(GET).path("/pub").query_param("output", "csv");
        then.status(200)
            .header("Content-Type", "text/csv; charset=utf-8")
            .body(LOCALIZED_SHEET);
    });

    let mut config = AppConfig::default();
    config.source.url = server.url("/pub?output=csv");
    assert!(config.validate().is_ok());

    let source = HttpCsvSource::from_config(&config).unwrap();
    let coordinator = ViewCoordinator::new(
        ConsoleMap::with_export(&export_path),
        HtmlPresenter::with_snapshot(&html_path),
        ViewSettings::from_config(&config),
    );
    let mut engine = MapEngine::new(Arc::new(source), coordinator, config.refresh_interval());

    let outcome = engine.refresh_once().await;
    sheet_mock.assert();
    assert_eq!(
        outcome,
        RefreshOutcome::Applied {
            schema: SchemaVariant::Localized,
            records: 2,
            dropped: 1,
        }
    );

    let coordinator = engine.into_coordinator();
    assert_eq!(coordinator.phase(), LoadPhase::Ready);
    assert_eq!(coordinator.map().markers().len(), 2);
    assert!(coordinator.map().fitted_bounds().is_some());

    let geojson: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&export_path).unwrap()).unwrap();
    assert_eq!(geojson["features"].as_array().unwrap().len(), 2);
    assert_eq!(geojson["features"][0]["properties"]["label"], "ИА");
    assert_eq!(geojson["features"][0]["properties"]["band"], "before2000");
    assert_eq!(geojson["features"][1]["properties"]["band"], "recent");

    let page = std::fs::read_to_string(&html_path).unwrap();
    assert!(page.contains("Иванова Анна Сергеевна (Петрова)"));
    assert!(page.contains("Showing: 2 graduates"));
    assert!(page.contains("1998-2021"));
}

#[tokio::test]
async fn test_server_error_leaves_loading_state() {
    let server = MockServer::start();
    let sheet_mock = server.mock(|when, then| {
        when.method(GET).path("/pub");
        then.status(500);
    });

    let mut config = AppConfig::default();
    config.source.url = server.url("/pub");

    let source = HttpCsvSource::from_config(&config).unwrap();
    let coordinator = ViewCoordinator::new(
        ConsoleMap::new(),
        HtmlPresenter::new(),
        ViewSettings::from_config(&config),
    );
    let mut engine = MapEngine::new(Arc::new(source), coordinator, config.refresh_interval());

    let outcome = engine.refresh_once().await;
    sheet_mock.assert();
    assert!(matches!(outcome, RefreshOutcome::Failed { message } if message.contains("500")));

    let coordinator = engine.coordinator();
    assert_eq!(coordinator.phase(), LoadPhase::Loading);
    assert!(coordinator.map().markers().is_empty());
    assert_eq!(
        coordinator.presenter().fragment(ElementId::StatsText),
        Some("Data load error")
    );
}

#[tokio::test]
async fn test_local_file_source_with_config_file() {
    let temp_dir = TempDir::new().unwrap();
    let sheet_path = temp_dir.path().join("alumni.csv");
    std::fs::write(&sheet_path, ENGLISH_SHEET).unwrap();

    let config_path = temp_dir.path().join("alumni-map.toml");
    std::fs::write(
        &config_path,
        format!(
            "[source]\nurl = {:?}\nschema = \"english\"\n\n[view]\nlist_limit = 1\n",
            sheet_path.to_str().unwrap()
        ),
    )
    .unwrap();

    let config = AppConfig::from_file(&config_path).unwrap();
    assert!(config.validate().is_ok());

    let coordinator = ViewCoordinator::new(
        ConsoleMap::new(),
        HtmlPresenter::new(),
        ViewSettings::from_config(&config),
    );
    let source = FileCsvSource::new(config.source());
    let mut engine = MapEngine::new(Arc::new(source), coordinator, config.refresh_interval());

    let outcome = engine.refresh_once().await;
    assert!(matches!(outcome, RefreshOutcome::Applied { records: 3, dropped: 2, .. }));

    let list = engine
        .coordinator()
        .presenter()
        .fragment(ElementId::GraduatesList)
        .unwrap()
        .to_string();
    assert_eq!(list.matches("graduate-item").count(), 1);
}
