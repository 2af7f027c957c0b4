use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use course_tidy::platform::open_log_file_secure_append;
use course_tidy::{Action, Report};
use tempfile::tempdir;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{fmt as tsfmt, registry};

/// Appends written bytes into a shared in-memory buffer.
#[derive(Clone)]
struct BufferWriter(Arc<Mutex<Vec<u8>>>);

impl Write for BufferWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn capture(filter: &str, f: impl FnOnce()) -> String {
    let buf = Arc::new(Mutex::new(Vec::new()));
    let make_writer = {
        let buf = buf.clone();
        move || BufferWriter(buf.clone())
    };
    let layer = tsfmt::layer().with_writer(make_writer).with_target(false).compact();
    let subscriber = registry().with(EnvFilter::new(filter)).with(layer);

    // Scoped dispatch: no global subscriber is installed.
    let dispatch = tracing::Dispatch::new(subscriber);
    tracing::dispatcher::with_default(&dispatch, f);

    let guard = buf.lock().unwrap();
    String::from_utf8_lossy(&guard[..]).to_string()
}

#[test]
fn report_entries_are_mirrored_as_log_events() {
    let contents = capture("info", || {
        let mut r = Report::new();
        r.record_move(Action::Moved, "/root/U/M/C/a.html", "/root/U/a.html");
        r.skip("/root/U/bad.zip", "not a zip file or it is corrupted");
    });
    assert!(contents.contains("moved"), "contents={contents}");
    assert!(contents.contains("/root/U/a.html"), "contents={contents}");
    assert!(contents.contains("WARN"), "contents={contents}");
    assert!(contents.contains("corrupted"), "contents={contents}");
}

#[test]
fn error_filter_hides_routine_actions() {
    let contents = capture("error", || {
        let mut r = Report::new();
        r.record(Action::Deleted, "/root/U/empty");
        r.refuse("/root/U/b.html", "Destination already exists");
    });
    assert!(!contents.contains("empty"), "contents={contents}");
    assert!(contents.contains("Destination already exists"), "contents={contents}");
}

#[test]
fn file_logging_writes_to_custom_path_and_verifies_output() {
    let td = tempdir().expect("tempdir");
    let log_path: PathBuf = td.path().join("course_tidy_test.log");

    // The production logger refuses symlinked ancestors (common for temp dirs on macOS).
    if course_tidy::path_has_symlink_ancestor(&log_path).unwrap() {
        eprintln!("Skipping file logging test: path has symlink ancestor: {}", log_path.display());
        return;
    }

    let file = open_log_file_secure_append(&log_path).expect("open_log_file_secure_append");
    let (writer, guard): (tracing_appender::non_blocking::NonBlocking, WorkerGuard) =
        tracing_appender::non_blocking(file);

    let file_layer = tsfmt::layer()
        .with_writer(move || writer.clone())
        .with_target(false)
        .with_ansi(false)
        .compact();
    let subscriber = registry().with(EnvFilter::new("info")).with(file_layer);
    let dispatch = tracing::Dispatch::new(subscriber);

    tracing::dispatcher::with_default(&dispatch, || {
        let mut r = Report::new();
        r.record(Action::Pruned, "/root/Chemistry");
    });

    // Flush the non-blocking worker.
    drop(guard);

    let contents = std::fs::read_to_string(&log_path).expect("read log file");
    assert!(contents.contains("pruned"), "log file did not contain expected text; contents={contents}");
}
