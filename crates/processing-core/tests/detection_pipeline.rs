use proptest::prelude::*;

use posefix_common::DetectionConfig;
use posefix_pose_model::{save_table, AnomalyIndexList, CoordinateTable, Point2D};
use posefix_processing_core::features::bodypart_distance;
use posefix_processing_core::navigator::next_flagged_for_store;
use posefix_processing_core::{detect_anomalies, OutlierDetector};

const PARTS: [&str; 6] = [
    "Nose",
    "betweenEars",
    "leftMidWaist",
    "rightMidWaist",
    "midHip",
    "tailStart",
];

/// One individual with a steady pose except for a jittered tailStart-midHip distance.
fn jittered_table(jitter: &[f64]) -> CoordinateTable {
    let mut table = CoordinateTable::new(
        "df_with_missing",
        "DLC_resnet50_mouseshuffle1",
        vec!["ind1".to_string()],
        PARTS.iter().map(|s| s.to_string()).collect(),
        jitter.len(),
    )
    .unwrap();
    for (frame, j) in jitter.iter().enumerate() {
        let pose = [
            ("Nose", 160.0, 100.0),
            ("betweenEars", 150.0, 100.0),
            ("leftMidWaist", 100.0, 80.0),
            ("rightMidWaist", 100.0, 120.0),
            ("tailStart", 50.0, 100.0),
            ("midHip", 58.0 + j, 100.0),
        ];
        for (bpt, x, y) in pose {
            table.set(frame, "ind1", bpt, Point2D::new(x, y)).unwrap();
        }
    }
    table
}

fn median(values: &[f64]) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap());
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

fn expected_flags(dist: &[f64]) -> Vec<usize> {
    let mean = dist.iter().sum::<f64>() / dist.len() as f64;
    let deviations: Vec<f64> = dist.iter().map(|d| (d - mean).abs()).collect();
    let thresh = 2.75 * median(&deviations);
    let med = median(dist);
    (0..dist.len())
        .filter(|&i| dist[i] < med - thresh || dist[i] > med + thresh)
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn jittered_distance_flags_exactly_frames_outside_band(
        jitter in prop::collection::vec(-1.0f64..1.0, 5..60),
        spikes in prop::collection::vec((0usize..60, 5.0f64..40.0), 0..4),
    ) {
        let mut jitter = jitter;
        for (at, size) in spikes {
            let len = jitter.len();
            jitter[at % len] += size;
        }

        let table = jittered_table(&jitter);
        let dist = bodypart_distance(&table, "ind1", "tailStart", "midHip").unwrap();

        let report = OutlierDetector::with_defaults().detect(&table).unwrap();
        prop_assert_eq!(report.index_list().frames().to_vec(), expected_flags(&dist));
    }
}

#[test]
fn detection_writes_index_list_next_to_store() {
    posefix_common::logging::init_default_logging();

    let dir = tempfile::tempdir().unwrap();
    let store = dir.path().join("cage2_mouseDLC_CNN_resnet50_shuffle1.json");

    let mut jitter = vec![0.0; 40];
    jitter[12] = 25.0;
    jitter[31] = -7.5;
    save_table(&jittered_table(&jitter), &store).unwrap();

    let config = DetectionConfig::default();
    let (list_path, report) = detect_anomalies(&store, &config).unwrap();

    assert_eq!(
        list_path,
        dir.path().join("cage2_mouseDLC_bad_tracking.json")
    );
    let stored = AnomalyIndexList::load(&list_path).unwrap();
    assert_eq!(stored.frames(), &[12, 31]);
    assert_eq!(stored, report.index_list());

    let next = next_flagged_for_store(&store, 12, &config.model_marker)
        .unwrap()
        .unwrap();
    assert_eq!(next.frame, 31);
    assert_eq!(next.percent_complete, 50);
    assert_eq!(
        next_flagged_for_store(&store, 31, &config.model_marker).unwrap(),
        None
    );
}

#[test]
fn rerunning_detection_replaces_previous_list() {
    let dir = tempfile::tempdir().unwrap();
    let store = dir.path().join("ratCNN.json");
    let list_path = dir.path().join("ratbad_tracking.json");
    AnomalyIndexList::new(vec![1, 2, 3]).save(&list_path).unwrap();

    save_table(&jittered_table(&[0.0; 10]), &store).unwrap();
    detect_anomalies(&store, &DetectionConfig::default()).unwrap();

    assert!(AnomalyIndexList::load(&list_path).unwrap().is_empty());
}

#[test]
fn navigation_without_index_list_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let store = dir.path().join("never_detected.json");
    assert!(next_flagged_for_store(&store, 0, "CNN").is_err());
    assert!(!dir.path().join("never_detectedbad_tracking.json").exists());
}
