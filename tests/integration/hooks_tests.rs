//! Hook wiring tests: the reporting facility, severity suppression, and the
//! shutdown backstop. Everything here touches process-global state, so the
//! tests are serialized and restore what they change.

use std::io::{self, Write};
use std::sync::{Arc, Mutex};

use failtrap::{
    catch_all, catch_errors, catch_shutdown, on_shutdown, record_fatal, report_error,
    set_severity_filter, take_last_fatal, FailureRecord, FailureTrap, FatalCondition,
    ResponseChannel, Severity, SeverityFilter, TerminalChannel, TrapConfig, GENERIC_BODY,
};
use serial_test::serial;

#[derive(Clone, Default)]
struct SharedBuf(Arc<Mutex<Vec<u8>>>);

impl SharedBuf {
    fn as_string(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).expect("utf8 output")
    }

    fn is_empty(&self) -> bool {
        self.0.lock().unwrap().is_empty()
    }
}

impl Write for SharedBuf {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn memory_trap(config: TrapConfig) -> (Arc<FailureTrap>, SharedBuf) {
    let buf = SharedBuf::default();
    let trap = FailureTrap::with_channel(config, TerminalChannel::new(buf.clone(), false));
    (trap, buf)
}

fn reset_globals() {
    set_severity_filter(SeverityFilter::all());
    let _ = take_last_fatal();
}

#[test]
#[serial]
fn screened_report_respects_the_active_filter() {
    reset_globals();
    set_severity_filter(SeverityFilter::all().without(Severity::Notice));

    assert!(
        FailureTrap::screen_report(Severity::Notice, "minor detail", "y.rs", 3).is_none(),
        "excluded severities are silently ignored"
    );
    let record = FailureTrap::screen_report(Severity::Warning, "bad input", "x.rs", 10)
        .expect("warning stays actionable");
    assert_eq!(record.severity, Severity::Warning);

    set_severity_filter(SeverityFilter::all());
}

// Scenario: the filter excludes notices; a notice-level report produces no
// log entry, no response, and the process keeps running.
#[test]
#[serial]
fn suppressed_report_is_a_complete_no_op() {
    reset_globals();
    set_severity_filter(SeverityFilter::all().without(Severity::Notice));

    let temp = tempfile::tempdir().expect("tempdir");
    let path = temp.path().join("failures.log");
    let (trap, buf) = memory_trap(TrapConfig::with_log_file(&path));
    catch_errors(&trap);

    report_error(Severity::Notice, "minor detail", "y.rs", 3);

    let log = std::fs::read_to_string(&path).expect("probe created the file");
    assert!(log.is_empty(), "no log entry for a suppressed report");
    assert!(buf.is_empty(), "no response for a suppressed report");

    set_severity_filter(SeverityFilter::all());
}

#[test]
#[serial]
fn shutdown_is_a_no_op_without_a_recorded_fatal() {
    reset_globals();
    let (trap, buf) = memory_trap(TrapConfig::default());

    assert!(on_shutdown(&trap).is_none());
    assert!(buf.is_empty());
}

#[test]
#[serial]
fn shutdown_guard_drop_is_silent_on_the_normal_exit_path() {
    reset_globals();
    let (trap, buf) = memory_trap(TrapConfig::default());

    let guard = catch_shutdown(&trap);
    drop(guard);

    assert!(buf.is_empty(), "normal exit leaves no output");
}

#[test]
#[serial]
fn shutdown_handles_a_pending_fatal_condition() {
    reset_globals();
    let (trap, buf) = memory_trap(TrapConfig::default());

    record_fatal(FatalCondition::new(Severity::Fatal, "worker pool exhausted").at("pool.rs", 42));
    let status = on_shutdown(&trap).expect("pending fatal is handled");

    assert_eq!(status, 1);
    assert_eq!(buf.as_string(), GENERIC_BODY);
    assert!(
        on_shutdown(&trap).is_none(),
        "the condition is consumed exactly once"
    );
}

#[test]
#[serial]
fn shutdown_exposes_the_rendered_fatal_when_enabled() {
    reset_globals();
    let (trap, buf) = memory_trap(TrapConfig::default());
    trap.expose_failures();

    let fatal = FatalCondition::new(Severity::Fatal, "worker pool exhausted").at("pool.rs", 42);
    let expected = FailureRecord::from_fatal(fatal.clone()).rendered;
    record_fatal(fatal);

    let _ = on_shutdown(&trap).expect("pending fatal is handled");
    assert_eq!(buf.as_string(), expected);
}

/// Channel double recording the order of pipeline calls.
#[derive(Clone, Default)]
struct EventChannel(Arc<Mutex<Vec<String>>>);

impl EventChannel {
    fn events(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }
}

impl ResponseChannel for EventChannel {
    fn discard_buffered(&mut self) {
        self.0.lock().unwrap().push("discard".into());
    }

    fn send_failure(&mut self, body: &str) -> failtrap::Result<()> {
        self.0.lock().unwrap().push(format!("send:{body}"));
        Ok(())
    }
}

#[test]
#[serial]
fn shutdown_discards_buffered_output_before_responding() {
    reset_globals();
    let channel = EventChannel::default();
    let trap = FailureTrap::with_channel(TrapConfig::default(), channel.clone());

    record_fatal(FatalCondition::new(Severity::Fatal, "out of memory"));
    let _ = on_shutdown(&trap).expect("pending fatal is handled");

    assert_eq!(
        channel.events(),
        vec!["discard".to_owned(), format!("send:{GENERIC_BODY}")],
        "pending output is dropped before the response is written"
    );
}

#[test]
#[serial]
fn catch_all_wires_the_error_sink_and_returns_the_guard() {
    reset_globals();
    set_severity_filter(SeverityFilter::all().without(Severity::Deprecation));
    let (trap, buf) = memory_trap(TrapConfig::default());

    let guard = catch_all(&trap);
    // Unhook the panic interception immediately: a failing assertion in
    // this binary must unwind into the test harness, not exit the process.
    let _ = std::panic::take_hook();

    report_error(Severity::Deprecation, "old api", "z.rs", 5);
    assert!(buf.is_empty(), "suppressed severity stays silent");

    drop(guard);
    assert!(buf.is_empty(), "no fatal pending, guard drop is silent");

    set_severity_filter(SeverityFilter::all());
}
