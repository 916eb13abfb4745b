use std::path::Path;

use posefix_common::PosefixError;
use posefix_pose_model::{load_table, save_table, CoordinateTable, Point2D, DEFAULT_STORE_KEY};

fn labels(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

fn tracked_table(key: &str) -> CoordinateTable {
    let mut table = CoordinateTable::new(
        key,
        "DLC_dlcrnetms5_mouseJan1shuffle1_50000",
        labels(&["ind1", "ind2"]),
        labels(&["Nose", "betweenEars", "tailStart"]),
        4,
    )
    .unwrap();
    for frame in 0..4 {
        for (i, ind) in ["ind1", "ind2"].iter().enumerate() {
            for (b, bpt) in ["Nose", "betweenEars", "tailStart"].iter().enumerate() {
                let x = 100.0 * i as f64 + 10.0 * b as f64 + frame as f64 + 0.25;
                let y = 200.0 + x / 3.0;
                table.set(frame, ind, bpt, Point2D::new(x, y)).unwrap();
            }
        }
    }
    table.set(2, "ind2", "tailStart", Point2D::MISSING).unwrap();
    table
}

fn write(path: &Path, content: &str) {
    std::fs::write(path, content).unwrap();
}

#[test]
fn json_store_preserves_key_labels_and_missing_points() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("mouseDLC_CNN_50000.json");

    let table = tracked_table("tracks");
    save_table(&table, &path).unwrap();
    let loaded = load_table(&path).unwrap();

    assert!(loaded.same_as(&table));
    assert_eq!(loaded.key(), "tracks");
    assert!(loaded.get(2, "ind2", "tailStart").unwrap().is_missing());
}

#[test]
fn csv_store_preserves_labels_and_missing_points() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("mouse.csv");

    let table = tracked_table(DEFAULT_STORE_KEY);
    save_table(&table, &path).unwrap();

    let content = std::fs::read_to_string(&path).unwrap();
    assert!(content.starts_with("scorer,DLC_dlcrnetms5"));
    assert!(content.lines().nth(3).unwrap().starts_with("coords,x,y"));

    let loaded = load_table(&path).unwrap();
    assert!(loaded.same_as(&table));
}

#[test]
fn csv_columns_in_any_order_map_to_labels() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("swapped.csv");
    write(
        &path,
        "scorer,s,s,s,s\n\
         individuals,ind1,ind1,ind2,ind2\n\
         bodyparts,Nose,Nose,Nose,Nose\n\
         coords,y,x,x,y\n\
         0,2,1,3,4\n\
         1,,5,6,NaN\n",
    );

    let table = load_table(&path).unwrap();
    assert_eq!(table.frame_count(), 2);
    assert_eq!(table.get(0, "ind1", "Nose").unwrap(), Point2D::new(1.0, 2.0));
    assert_eq!(table.get(0, "ind2", "Nose").unwrap(), Point2D::new(3.0, 4.0));
    assert!(table.get(1, "ind1", "Nose").unwrap().y.is_nan());
    assert!(table.get(1, "ind2", "Nose").unwrap().y.is_nan());
}

#[test]
fn csv_without_scorer_row_is_missing_data() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("noscorer.csv");
    write(
        &path,
        "individuals,ind1,ind1\nbodyparts,Nose,Nose\ncoords,x,y\n0,1,2\n",
    );

    let err = load_table(&path).unwrap_err();
    assert!(matches!(err, PosefixError::MissingData { .. }), "{err}");
}

#[test]
fn csv_likelihood_columns_are_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("likelihood.csv");
    write(
        &path,
        "scorer,s,s,s\n\
         individuals,ind1,ind1,ind1\n\
         bodyparts,Nose,Nose,Nose\n\
         coords,x,y,likelihood\n\
         0,1,2,0.9\n",
    );

    let err = load_table(&path).unwrap_err();
    assert!(matches!(err, PosefixError::MalformedInput { .. }), "{err}");
}

#[test]
fn csv_individual_without_full_bodypart_set_is_missing_data() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ragged.csv");
    write(
        &path,
        "scorer,s,s,s,s,s,s\n\
         individuals,ind1,ind1,ind1,ind1,ind2,ind2\n\
         bodyparts,Nose,Nose,midHip,midHip,Nose,Nose\n\
         coords,x,y,x,y,x,y\n\
         0,1,2,3,4,5,6\n",
    );

    let err = load_table(&path).unwrap_err();
    assert!(matches!(err, PosefixError::MissingData { .. }), "{err}");
    assert!(err.to_string().contains("ind2/midHip"));
}

#[test]
fn json_without_scorer_is_missing_data() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("noscorer.json");
    write(
        &path,
        r#"{"individuals":["ind1"],"bodyparts":["Nose"],"frames":[[1.0,2.0]]}"#,
    );

    let err = load_table(&path).unwrap_err();
    assert!(matches!(err, PosefixError::MissingData { .. }), "{err}");
}

#[test]
fn missing_store_reports_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.json");

    let err = load_table(&path).unwrap_err();
    assert!(matches!(err, PosefixError::FileNotFound { .. }));
}

#[test]
fn save_replaces_previous_contents() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("store.json");

    save_table(&tracked_table("first"), &path).unwrap();
    let mut second = tracked_table("first");
    second
        .set(0, "ind1", "Nose", Point2D::new(-1.0, -1.0))
        .unwrap();
    save_table(&second, &path).unwrap();

    let loaded = load_table(&path).unwrap();
    assert_eq!(loaded.get(0, "ind1", "Nose").unwrap(), Point2D::new(-1.0, -1.0));
    let leftovers = std::fs::read_dir(dir.path()).unwrap().count();
    assert_eq!(leftovers, 1);
}
