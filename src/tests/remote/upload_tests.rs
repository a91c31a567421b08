use std::sync::{Arc, Mutex};

use super::*;

#[test]
fn percentage_rounds_loaded_over_total() {
    let p = |loaded, total| UploadProgress { loaded, total }.percentage();
    assert_eq!(p(50, 100), Some(50));
    assert_eq!(p(1, 3), Some(33));
    assert_eq!(p(2, 3), Some(67));
    assert_eq!(p(100, 100), Some(100));
    assert_eq!(p(5, 0), None);
}

#[test]
fn reader_reports_cumulative_progress() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink_seen = seen.clone();
    let data = vec![7u8; 10];
    let mut reader = ProgressReader::new(
        std::io::Cursor::new(data),
        10,
        Box::new(move |p| sink_seen.lock().unwrap().push(p.loaded)),
    );

    let mut buf = [0u8; 4];
    while reader.read(&mut buf).unwrap() > 0 {}

    assert_eq!(*seen.lock().unwrap(), vec![4, 8, 10]);
}
