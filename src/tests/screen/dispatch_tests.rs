use std::sync::mpsc as std_mpsc;

use super::*;

#[test]
fn completions_arrive_and_clear_pending() {
    let mut d: Dispatcher<u32> = Dispatcher::new();
    d.spawn("one", |_| 1);
    d.spawn("two", |_| 2);
    assert_eq!(d.pending(), 2);

    let mut got = vec![
        d.next_blocking(Some(Duration::from_secs(5))).unwrap(),
        d.next_blocking(Some(Duration::from_secs(5))).unwrap(),
    ];
    got.sort();
    assert_eq!(got, vec![1, 2]);
    assert_eq!(d.pending(), 0);
    assert_eq!(d.next_blocking(None), None);
}

#[test]
fn intermediate_reports_do_not_finish_the_job() {
    let mut d: Dispatcher<&'static str> = Dispatcher::new();
    d.spawn("upload", |r| {
        r.report("progress");
        "done"
    });
    assert_eq!(d.next_blocking(Some(Duration::from_secs(5))), Some("progress"));
    assert_eq!(d.pending(), 1);
    assert_eq!(d.next_blocking(Some(Duration::from_secs(5))), Some("done"));
    assert_eq!(d.pending(), 0);
}

#[test]
fn cancelled_completions_are_dropped() {
    let mut d: Dispatcher<u32> = Dispatcher::new();
    let (release_tx, release_rx) = std_mpsc::channel::<()>();
    d.spawn("slow", move |_| {
        let _ = release_rx.recv();
        7
    });
    d.cancel_all();
    release_tx.send(()).unwrap();

    d.spawn("fresh", |_| 9);
    assert_eq!(d.next_blocking(Some(Duration::from_secs(5))), Some(9));
    std::thread::sleep(Duration::from_millis(50));
    assert_eq!(d.try_next(), None);
}

#[test]
fn panicking_job_still_drains_pending() {
    let mut d: Dispatcher<u32> = Dispatcher::new();
    d.spawn("boom", |_| panic!("worker failure"));
    d.spawn("ok", |_| 3);

    let mut got = Vec::new();
    while let Some(v) = d.next_blocking(Some(Duration::from_secs(5))) {
        got.push(v);
    }
    assert_eq!(got, vec![3]);
    assert_eq!(d.pending(), 0);
    assert_eq!(d.next_blocking(None), None);
}
