mod common;

use plate_scan::plate::navigation_params;
use plate_scan::plate::text::PlaceholderReader;
use plate_scan::plate::{Alert, ScanState};
use plate_scan::{ImageSource, PlateDetector, ScanError, ScanOutcome, Scanner};

use common::{ScriptedBackend, raw_output, write_jpeg};

fn scanner(output: Vec<f32>) -> Scanner<ScriptedBackend, PlaceholderReader> {
    let detector = PlateDetector::new(ScriptedBackend::new(output), 64, 64).with_reader(PlaceholderReader::seeded(9));
    Scanner::new(detector)
}

#[tokio::test]
async fn successful_scan_navigates_with_plate_and_prefix() {
    let path = write_jpeg("success", 120, 80);
    let scanner = scanner(raw_output(&[[0.1, 0.1, 0.6, 0.4, 0.88]]));
    assert_eq!(scanner.state(), ScanState::Idle);

    let outcome = scanner.run(ImageSource::from(path.as_path())).await;
    match outcome {
        ScanOutcome::Plate { reading, params } => {
            assert_eq!(params["plate"], reading.plate.as_str());
            assert_eq!(params["prefix"], &reading.plate[..2]);
            assert_eq!(reading.confidence, 0.88);
        }
        ScanOutcome::Failed(alert) => panic!("unexpected alert: {:?}", alert),
    }
    assert_eq!(scanner.state(), ScanState::Idle);
    assert!(!scanner.is_busy());
}

#[tokio::test]
async fn gallery_uri_is_accepted() {
    let path = write_jpeg("gallery", 64, 64);
    let uri = url::Url::from_file_path(&path).unwrap();
    let scanner = scanner(raw_output(&[[0.1, 0.1, 0.6, 0.4, 0.7]]));
    let source = ImageSource::parse(uri.as_str()).unwrap();
    assert!(matches!(source, ImageSource::GalleryPick(_)));
    assert!(scanner.scan(source).await.is_ok());
}

#[tokio::test]
async fn no_detection_suggests_manual_entry() {
    let path = write_jpeg("empty", 64, 64);
    let scanner = scanner(vec![0.0]);
    let outcome = scanner.run(ImageSource::from(path.as_path())).await;
    assert_eq!(outcome, ScanOutcome::Failed(Alert::from_error(&ScanError::NoDetection)));
    assert_eq!(scanner.state(), ScanState::Idle);
}

#[tokio::test]
async fn missing_file_returns_to_idle() {
    let scanner = scanner(vec![0.0]);
    let source = ImageSource::parse("/nonexistent/plate-scan/shot.jpg").unwrap();
    let err = scanner.scan(source.clone()).await.unwrap_err();
    assert!(matches!(err, ScanError::Io(_)));
    assert!(!scanner.is_busy());

    match scanner.run(source).await {
        ScanOutcome::Failed(alert) => assert!(!alert.message.is_empty()),
        other => panic!("unexpected outcome: {:?}", other),
    }
}

#[tokio::test]
async fn second_scan_while_in_flight_is_rejected() {
    let path = write_jpeg("busy", 64, 64);
    let scanner = scanner(raw_output(&[[0.1, 0.1, 0.6, 0.4, 0.9]]));
    let source = ImageSource::from(path.as_path());

    let (a, b) = tokio::join!(scanner.scan(source.clone()), scanner.scan(source.clone()));
    let busy = [&a, &b].iter().filter(|r| matches!(r, Err(ScanError::Busy))).count();
    let ok = [&a, &b].iter().filter(|r| r.is_ok()).count();
    assert_eq!((busy, ok), (1, 1));

    // 结束后可以再次扫描
    assert!(scanner.scan(source).await.is_ok());
}

#[test]
fn manual_entry_params_are_cleaned() {
    let params = navigation_params("dl 3c-ab 1234");
    assert_eq!(params["plate"], "DL3CAB1234");
    assert_eq!(params["prefix"], "DL");
    assert_eq!(navigation_params("X")["prefix"], "");
}

#[test]
fn infrastructure_failures_get_generic_alert() {
    let io = ScanError::Io(std::io::Error::new(std::io::ErrorKind::NotFound, "shot.jpg"));
    let alert = Alert::from_error(&io);
    assert!(!alert.message.contains("shot.jpg"));
    assert_eq!(alert, Alert::from_error(&ScanError::ModelPoisoned));
}

#[test]
fn alerts_distinguish_no_detection_from_failures() {
    let none = Alert::from_error(&ScanError::NoDetection);
    let failed = Alert::from_error(&ScanError::MalformedOutput { expected: 7, actual: 1 });
    assert_ne!(none.title, failed.title);
    assert!(failed.message.contains('7'));
}
