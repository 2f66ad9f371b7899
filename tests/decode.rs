mod common;

use plate_scan::config::MAX_DETECTIONS;
use plate_scan::plate::posts::ranked;
use plate_scan::{BoundingBox, Detection, ScanError, decode_output, select_best};

use common::raw_output;

fn det(confidence: f32) -> Detection {
    Detection::new(BoundingBox::new(0.0, 0.0, 1.0, 1.0), confidence)
}

#[test]
fn filters_at_or_below_threshold() {
    let output = raw_output(&[
        [0.1, 0.1, 0.2, 0.2, 0.5],
        [0.2, 0.2, 0.3, 0.3, 0.51],
        [0.3, 0.3, 0.4, 0.4, 0.2],
        [0.4, 0.4, 0.5, 0.5, 0.95],
    ]);
    let detections = decode_output(&output, 0.5).unwrap();
    let confidences: Vec<f32> = detections.iter().map(|d| d.confidence).collect();
    assert_eq!(confidences, vec![0.51, 0.95]);
    assert_eq!(detections[1].bbox, BoundingBox::new(0.4, 0.4, 0.5, 0.5));
    assert!(detections.iter().all(|d| d.text.is_empty()));
}

#[test]
fn count_is_capped_at_ten() {
    let records: Vec<[f32; 5]> = (0..12).map(|i| [0.0, 0.0, 1.0, 1.0, 0.6 + i as f32 * 0.01]).collect();
    let output = raw_output(&records);
    let detections = decode_output(&output, 0.5).unwrap();
    assert_eq!(detections.len(), MAX_DETECTIONS);
    // 第 11、12 条被截断
    assert!(detections.iter().all(|d| d.confidence < 0.6 + 10.0 * 0.01 - 1e-6));
}

#[test]
fn claimed_count_limits_records_read() {
    let mut output = raw_output(&[[0.0, 0.0, 1.0, 1.0, 0.9], [0.0, 0.0, 1.0, 1.0, 0.8]]);
    output[0] = 1.0;
    let detections = decode_output(&output, 0.5).unwrap();
    assert_eq!(detections.len(), 1);
    assert_eq!(detections[0].confidence, 0.9);
}

#[test]
fn zero_count_yields_nothing() {
    let output = [0.0, 0.1, 0.1, 0.2, 0.2, 0.99, 0.0];
    let detections = decode_output(&output, 0.5).unwrap();
    assert!(detections.is_empty());
    assert!(select_best(&detections).is_none());
}

#[test]
fn short_output_is_malformed() {
    let output = [2.0, 0.1, 0.1, 0.2, 0.2, 0.99, 0.0, 0.5];
    match decode_output(&output, 0.5) {
        Err(ScanError::MalformedOutput { expected, actual }) => {
            assert_eq!(expected, 13);
            assert_eq!(actual, 8);
        }
        other => panic!("unexpected result: {:?}", other),
    }
    assert!(matches!(
        decode_output(&[], 0.5),
        Err(ScanError::MalformedOutput { expected: 1, actual: 0 })
    ));
}

#[test]
fn oversized_claim_checks_only_capped_length() {
    let mut output = raw_output(&vec![[0.0, 0.0, 1.0, 1.0, 0.7]; MAX_DETECTIONS]);
    output[0] = 1000.0;
    assert_eq!(decode_output(&output, 0.5).unwrap().len(), MAX_DETECTIONS);
}

#[test]
fn best_is_strictly_highest() {
    let detections = vec![det(0.6), det(0.9), det(0.7)];
    assert_eq!(select_best(&detections).unwrap().confidence, 0.9);
}

#[test]
fn ties_keep_first_encountered() {
    let mut first = det(0.8);
    first.text = "first".to_string();
    let mut second = det(0.8);
    second.text = "second".to_string();
    let detections = vec![det(0.6), first, second];
    assert_eq!(select_best(&detections).unwrap().text, "first");
    assert_eq!(ranked(&detections)[0].text, "first");
    assert_eq!(ranked(&detections)[1].text, "second");
}
