use std::fs;

use faq_intent::dataset::{self, IngestSource, REQUIRED_COLUMNS};
use faq_intent::{evaluation, training, ArtifactStore, DatasetError, TrainingConfig, Workspace};
use tempfile::TempDir;

fn workspace() -> (TempDir, Workspace) {
    let dir = tempfile::tempdir().expect("tempdir");
    let workspace = Workspace::new(dir.path());
    (dir, workspace)
}

fn prepare(workspace: &Workspace) {
    dataset::collect(&workspace.raw_path()).unwrap();
    dataset::preprocess(&workspace.raw_path(), &workspace.processed_path()).unwrap();
}

#[test]
fn test_processed_file_exists() {
    let (_dir, workspace) = workspace();
    prepare(&workspace);
    assert!(workspace.processed_path().exists());
}

#[test]
fn test_processed_file_not_empty() -> Result<(), DatasetError> {
    let (_dir, workspace) = workspace();
    prepare(&workspace);
    let records = dataset::read_records(&workspace.processed_path())?;
    assert!(!records.is_empty());
    Ok(())
}

#[test]
fn test_processed_file_columns() -> Result<(), DatasetError> {
    let (_dir, workspace) = workspace();
    prepare(&workspace);
    let summary = dataset::validate_file(&workspace.processed_path())?;
    for column in REQUIRED_COLUMNS {
        assert!(summary.columns.iter().any(|c| c == column), "missing column {}", column);
    }
    Ok(())
}

#[test]
fn test_preprocess_cleans_text() -> Result<(), DatasetError> {
    let (_dir, workspace) = workspace();
    fs::create_dir_all(workspace.raw_path().parent().unwrap())?;
    fs::write(
        workspace.raw_path(),
        "question,intent\n  What Is The FEE?  ,fees\n,hostel\nIs there a hostel?,\nIs There A Hostel?,hostel\n",
    )?;

    let summary = dataset::preprocess(&workspace.raw_path(), &workspace.processed_path())?;
    assert_eq!((summary.read, summary.kept, summary.dropped), (4, 2, 2));

    let records = dataset::read_records(&workspace.processed_path())?;
    assert_eq!(records[0].question, "what is the fee?");
    assert_eq!(records[1].question, "is there a hostel?");
    Ok(())
}

#[test]
fn test_ingest_local_file() -> Result<(), DatasetError> {
    let (dir, workspace) = workspace();
    let source = dir.path().join("upload.csv");
    fs::write(&source, "intent,question,notes\nfees,How much is the fee?,x\n")?;

    let rows = tokio_test::block_on(dataset::ingest(
        &IngestSource::Path(source),
        &workspace.raw_path(),
    ))?;
    assert_eq!(rows, 1);
    assert_eq!(dataset::read_records(&workspace.raw_path())?[0].intent, "fees");
    Ok(())
}

#[test]
fn test_ingest_in_place_keeps_raw_file() -> Result<(), DatasetError> {
    let (_dir, workspace) = workspace();
    let raw = workspace.raw_path();
    fs::create_dir_all(raw.parent().unwrap())?;
    // Non-canonical column order and an extra column would not survive a rewrite
    let original = "intent,question,notes\nfees,How much is the fee?,x\n";
    fs::write(&raw, original)?;

    let rows = tokio_test::block_on(dataset::ingest(&IngestSource::Path(raw.clone()), &raw))?;
    assert_eq!(rows, 1);
    assert_eq!(fs::read_to_string(&raw)?, original);
    Ok(())
}

#[test]
fn test_ingest_in_place_missing_raw_file() {
    let (_dir, workspace) = workspace();
    let raw = workspace.raw_path();
    let result = tokio_test::block_on(dataset::ingest(&IngestSource::Path(raw.clone()), &raw));
    assert!(matches!(result, Err(DatasetError::MissingFile(_))));
}

#[test]
fn test_pipeline_keeps_existing_raw_file() -> Result<(), Box<dyn std::error::Error>> {
    let (_dir, workspace) = workspace();
    let raw = workspace.raw_path();
    fs::create_dir_all(raw.parent().unwrap())?;
    let original = "question,intent\nWhere is the library?,library\nIs the library open on sunday?,library\nWhat is the fee?,fees\nHow much is the tuition fee?,fees\n";
    fs::write(&raw, original)?;

    assert_eq!(dataset::collect_if_missing(&raw)?, None);
    dataset::preprocess(&raw, &workspace.processed_path())?;
    let config = TrainingConfig {
        test_size: 0.0,
        ..TrainingConfig::default()
    };
    let (_, report) = training::train_from_file(&workspace.processed_path(), &config)?;

    assert_eq!(fs::read_to_string(&raw)?, original);
    assert_eq!(report.labels, vec!["fees", "library"]);
    Ok(())
}

#[test]
fn test_ingest_rejects_bad_schema() -> Result<(), DatasetError> {
    let (dir, workspace) = workspace();
    let source = dir.path().join("upload.csv");
    fs::write(&source, "text,label\nhello,greeting\n")?;

    let result = tokio_test::block_on(dataset::ingest(
        &IngestSource::Path(source),
        &workspace.raw_path(),
    ));
    assert!(matches!(result, Err(DatasetError::InvalidSchema { .. })));
    assert!(!workspace.raw_path().exists());
    Ok(())
}

#[test]
fn test_train_save_load_evaluate() -> Result<(), Box<dyn std::error::Error>> {
    let (_dir, workspace) = workspace();
    prepare(&workspace);

    let config = TrainingConfig {
        c: 10.0,
        ..TrainingConfig::default()
    };
    let (classifier, report) = training::train_from_file(&workspace.processed_path(), &config)?;
    assert_eq!(report.labels.len(), 6);

    let store = ArtifactStore::new(workspace.artifacts_dir())?;
    store.save(&classifier)?;
    store.save_report(&report)?;
    assert!(store.verify()?);

    let loaded = store.load()?;
    assert_eq!(loaded.info(), classifier.info());
    assert_eq!(store.load_report()?, report);

    let records = dataset::read_records(&workspace.processed_path())?;
    let evaluation = evaluation::evaluate(&loaded, &records)?;
    assert_eq!(evaluation.total, records.len());
    assert!(evaluation.accuracy > 0.8);
    Ok(())
}
