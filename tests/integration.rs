//! Integration tests for activity-eda

use activity_eda::stats::{describe, duplicate_rows, value_counts};
use activity_eda::viz::{
    CLASS_DISTRIBUTION_FILE, CORRELATION_HEATMAP_FILE, FEATURE_DISTRIBUTIONS_FILE,
};
use activity_eda::{
    explore_activity_data, load_dataset, numeric_columns, ExplorationReport, ExploreOptions,
};
use std::io::Write;
use tempfile::{tempdir, NamedTempFile};

/// Create a small HAR-style CSV: two accelerometer features, subject id, label
fn create_test_csv() -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "tBodyAcc-mean-X,tBodyAcc-mean-Y,subject,Activity").unwrap();

    writeln!(file, "0.2886,-0.0203,1,STANDING").unwrap();
    writeln!(file, "0.2784,-0.0164,1,STANDING").unwrap();
    writeln!(file, "0.2797,-0.0195,1,STANDING").unwrap();
    writeln!(file, "0.2774,-0.0101,2,SITTING").unwrap();
    writeln!(file, "0.2766,-0.0127,2,SITTING").unwrap();
    writeln!(file, "0.2719,-0.0101,3,WALKING").unwrap();
    writeln!(file, "0.2703,-0.0141,3,WALKING").unwrap();
    writeln!(file, "0.2703,-0.0141,3,WALKING").unwrap();
    writeln!(file, "0.2703,-0.0141,3,WALKING").unwrap();
    writeln!(file, "0.2580,-0.0155,4,LAYING").unwrap();

    file
}

fn create_unlabelled_csv() -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "a,b,c").unwrap();
    writeln!(file, "1,2.5,x").unwrap();
    writeln!(file, "2,,y").unwrap();
    writeln!(file, "3,7.5,x").unwrap();
    file
}

fn text_only() -> ExploreOptions {
    ExploreOptions {
        output_dir: None,
        ..ExploreOptions::default()
    }
}

#[test]
fn test_reported_shape() {
    let file = create_test_csv();
    let df = load_dataset(file.path()).unwrap();
    let report = ExplorationReport::build(&df, &text_only()).unwrap();

    assert_eq!(report.shape, (10, 4));
    assert_eq!(report.columns.len(), 4);
}

#[test]
fn test_duplicates_count_repeats_only() {
    let file = create_test_csv();
    let df = load_dataset(file.path()).unwrap();

    // three identical WALKING rows: the first is kept, two are repeats
    assert_eq!(duplicate_rows(&df).unwrap(), 2);
}

#[test]
fn test_class_counts_sum_to_rows() {
    let file = create_test_csv();
    let df = load_dataset(file.path()).unwrap();
    let counts = value_counts(&df, "Activity").unwrap();

    assert_eq!(counts[0], ("WALKING".to_string(), 4));
    assert_eq!(counts.iter().map(|(_, c)| c).sum::<usize>(), df.height());

    let report = ExplorationReport::build(&df, &text_only()).unwrap();
    assert_eq!(report.labelled_rows(), df.height());
}

#[test]
fn test_missing_label_column_skips_distribution() {
    let file = create_unlabelled_csv();
    let dir = tempdir().unwrap();
    let options = ExploreOptions {
        output_dir: Some(dir.path().to_path_buf()),
        ..ExploreOptions::default()
    };

    let df = explore_activity_data(file.path(), &options).unwrap();
    let report = ExplorationReport::build(&df, &options).unwrap();

    assert!(report.class_distribution.is_none());
    assert_eq!(report.missing, vec![("b".to_string(), 1)]);
    assert!(!dir.path().join(CLASS_DISTRIBUTION_FILE).exists());
    assert!(dir.path().join(CORRELATION_HEATMAP_FILE).exists());
    assert!(dir.path().join(FEATURE_DISTRIBUTIONS_FILE).exists());
}

#[test]
fn test_returned_table_matches_source() {
    let file = create_test_csv();
    let df = explore_activity_data(file.path(), &text_only()).unwrap();

    assert_eq!(df.shape(), (10, 4));
    assert_eq!(
        df.get_column_names(),
        vec!["tBodyAcc-mean-X", "tBodyAcc-mean-Y", "subject", "Activity"]
    );

    let columns = numeric_columns(&df).unwrap();
    assert_eq!(columns[0].values[0], Some(0.2886));
    assert_eq!(columns[1].values[9], Some(-0.0155));
    assert_eq!(columns[2].values[3], Some(2.0));

    let labels: Vec<Option<&str>> = df
        .column("Activity")
        .unwrap()
        .str()
        .unwrap()
        .into_iter()
        .collect();
    assert_eq!(labels[0], Some("STANDING"));
    assert_eq!(labels[9], Some("LAYING"));
}

#[test]
fn test_summary_statistics() {
    let file = create_unlabelled_csv();
    let df = load_dataset(file.path()).unwrap();

    let a = describe(&df, "a").unwrap();
    assert_eq!(a.count, 3);
    assert!((a.mean - 2.0).abs() < 1e-12);
    assert!((a.std - 1.0).abs() < 1e-12);
    assert!((a.median - 2.0).abs() < 1e-12);

    let b = describe(&df, "b").unwrap();
    assert_eq!(b.count, 2);
    assert!((b.mean - 5.0).abs() < 1e-12);
}

#[test]
fn test_correlation_is_symmetric() {
    let file = create_test_csv();
    let df = load_dataset(file.path()).unwrap();
    let report = ExplorationReport::build(&df, &text_only()).unwrap();
    let corr = report.correlation.unwrap();

    assert_eq!(corr.len(), 3);
    for i in 0..3 {
        assert!((corr.values[[i, i]] - 1.0).abs() < 1e-12);
        for j in 0..3 {
            assert!((corr.values[[i, j]] - corr.values[[j, i]]).abs() < 1e-12);
            assert!(corr.values[[i, j]].abs() <= 1.0);
        }
    }
}

#[test]
fn test_signed_zero_rows_are_duplicates() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "x,Activity").unwrap();
    writeln!(file, "0.0,WALKING").unwrap();
    writeln!(file, "-0.0,WALKING").unwrap();
    writeln!(file, "1.5,SITTING").unwrap();
    let df = load_dataset(file.path()).unwrap();

    assert_eq!(duplicate_rows(&df).unwrap(), 1);
}

#[test]
fn test_infinite_feature_fails_plotting() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "x,y").unwrap();
    writeln!(file, "1.0,2").unwrap();
    writeln!(file, "2.0,3").unwrap();
    writeln!(file, "3.0,5").unwrap();
    writeln!(file, "inf,1").unwrap();
    let dir = tempdir().unwrap();
    let options = ExploreOptions {
        output_dir: Some(dir.path().to_path_buf()),
        ..ExploreOptions::default()
    };

    let err = explore_activity_data(file.path(), &options).unwrap_err();
    assert!(format!("{:#}", err).contains("not finite"));
}

#[test]
fn test_missing_file_fails() {
    let result = explore_activity_data("/no/such/dataset.csv", &text_only());
    assert!(result.is_err());
}
