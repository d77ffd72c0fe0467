use anyhow::bail;
use p4bridge_protocol::{
    Callback, CallbackSession, ClientEvents, CommandEngine, ConnectionSettings, Error, Result,
    SessionState, drive,
};
use p4bridge_record::{DecodedRecord, WireRecord};
use p4bridge_types::{Diagnostic, MergeRequest, MergeResolution, Severity};
use std::path::Path;

fn wire(pairs: &[(&str, &str)]) -> WireRecord {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn info(text: &str) -> Diagnostic {
    Diagnostic::new(Severity::Info, 1, text, [])
}

fn merge_request() -> MergeRequest {
    MergeRequest {
        base_name: "//depot/a#1".to_string(),
        your_name: "//client/a".to_string(),
        their_name: "//depot/a#2".to_string(),
        base_file: None,
        your_file: None,
        their_file: None,
        result_file: None,
        your_chunks: 1,
        their_chunks: 1,
        both_chunks: 0,
        conflict_chunks: 0,
        merge_hint: MergeResolution::AcceptMerged,
    }
}

/// Records every dispatch it receives and can be armed to fail on one
/// method name.
#[derive(Default)]
struct Probe {
    calls: Vec<String>,
    fail_on: Option<&'static str>,
    cancel: bool,
    cancel_fails: bool,
    cancel_polls: usize,
}

impl Probe {
    fn hit(&mut self, name: &str) -> anyhow::Result<()> {
        self.calls.push(name.to_string());
        if self.fail_on == Some(name) {
            bail!("{} blew up", name);
        }
        Ok(())
    }
}

impl Callback for Probe {
    fn output_record(&mut self, _record: DecodedRecord) -> anyhow::Result<()> {
        self.hit("record")
    }

    fn output_diagnostic(&mut self, _diagnostic: Diagnostic) -> anyhow::Result<()> {
        self.hit("diagnostic")
    }

    fn output_info(&mut self, _data: &str) -> anyhow::Result<()> {
        self.hit("info")
    }

    fn output_content(&mut self, _chunk: &[u8], _is_text: bool) -> anyhow::Result<()> {
        self.hit("content")
    }

    fn input_data(&mut self, buffer: &mut String) -> anyhow::Result<()> {
        self.hit("input")?;
        buffer.push_str("staged form");
        Ok(())
    }

    fn prompt(&mut self, _message: &str, response: &mut String) -> anyhow::Result<()> {
        self.hit("prompt")?;
        response.push_str("yes");
        Ok(())
    }

    fn resolve(&mut self, _merge: &MergeRequest) -> anyhow::Result<MergeResolution> {
        self.hit("resolve")?;
        Ok(MergeResolution::AcceptYours)
    }

    fn finished(&mut self) -> anyhow::Result<()> {
        self.hit("finished")
    }

    fn cancel_requested(&mut self) -> anyhow::Result<bool> {
        self.cancel_polls += 1;
        if self.cancel_fails {
            bail!("cancel predicate blew up");
        }
        Ok(self.cancel)
    }
}

#[test]
fn clean_run_walks_idle_executing_completed() {
    let mut probe = Probe::default();
    let mut session = CallbackSession::new(&mut probe);
    assert_eq!(session.state(), SessionState::Idle);

    session.diagnostic(info("opening"));
    assert_eq!(session.state(), SessionState::Executing);
    session.record(wire(&[("change", "12")]));
    session.content(b"text", true);
    assert!(session.is_alive());
    session.finished();

    assert_eq!(session.state(), SessionState::Completed);
    assert!(session.take_deferred().is_none());
    assert_eq!(
        probe.calls,
        ["diagnostic", "record", "content", "finished"]
    );
}

#[test]
fn failure_suppresses_all_further_dispatch() {
    let mut probe = Probe {
        fail_on: Some("record"),
        ..Probe::default()
    };
    let mut session = CallbackSession::new(&mut probe);

    session.diagnostic(info("fine"));
    session.record(wire(&[("change", "12")]));
    assert_eq!(session.state(), SessionState::Faulted);

    // None of these may reach user code or disturb the deferred cell.
    session.diagnostic(info("late"));
    session.content(b"late", true);
    assert_eq!(session.prompt("Continue? "), "");
    assert_eq!(session.resolve(&merge_request()), MergeResolution::Quit);
    let mut buffer = String::from("stale");
    session.input_data(&mut buffer);
    assert_eq!(buffer, "");
    session.finished();

    assert_eq!(session.state(), SessionState::Faulted);

    let deferred = session.take_deferred().expect("first failure captured");
    assert!(deferred.to_string().contains("record blew up"));
    assert_eq!(probe.calls, ["diagnostic", "record"]);
}

#[test]
fn finished_failure_is_captured_too() {
    let mut probe = Probe {
        fail_on: Some("finished"),
        ..Probe::default()
    };
    let mut session = CallbackSession::new(&mut probe);
    session.diagnostic(info("fine"));
    session.finished();

    assert_eq!(session.state(), SessionState::Faulted);
    let deferred = session.take_deferred().expect("captured");
    assert!(deferred.to_string().contains("finished blew up"));
}

#[test]
fn faulted_session_stops_polling_the_cancel_predicate() {
    let mut probe = Probe {
        fail_on: Some("record"),
        ..Probe::default()
    };
    let mut session = CallbackSession::new(&mut probe);
    assert!(session.is_alive());
    session.record(wire(&[("change", "1")]));

    assert!(!session.is_alive());
    assert!(!session.is_alive());
    // One poll from before the fault; none after.
    assert_eq!(probe.cancel_polls, 1);
}

#[test]
fn cancel_request_kills_liveness_without_faulting() {
    let mut probe = Probe {
        cancel: true,
        ..Probe::default()
    };
    let mut session = CallbackSession::new(&mut probe);
    assert!(!session.is_alive());
    session.finished();
    assert_eq!(session.state(), SessionState::Completed);
    assert!(session.take_deferred().is_none());
}

#[test]
fn failing_cancel_predicate_is_captured_and_kills_liveness() {
    let mut probe = Probe {
        cancel_fails: true,
        ..Probe::default()
    };
    let mut session = CallbackSession::new(&mut probe);
    assert!(!session.is_alive());
    assert!(!session.is_alive());

    let deferred = session.take_deferred().expect("captured");
    assert!(deferred.to_string().contains("cancel predicate blew up"));
    assert_eq!(probe.cancel_polls, 1);
}

#[test]
fn prompt_and_input_answers_flow_back() {
    let mut probe = Probe::default();
    let mut session = CallbackSession::new(&mut probe);
    assert_eq!(session.prompt("Sync? "), "yes");
    let mut buffer = String::new();
    session.input_data(&mut buffer);
    assert_eq!(buffer, "staged form");
    assert_eq!(session.resolve(&merge_request()), MergeResolution::AcceptYours);
}

#[test]
fn default_edit_request_defers_a_form_command_error() {
    // A Callback that doesn't override edit_file refuses editor requests.
    struct Plain;
    impl Callback for Plain {
        fn output_diagnostic(&mut self, _d: Diagnostic) -> anyhow::Result<()> {
            Ok(())
        }
    }

    let mut plain = Plain;
    let mut session = CallbackSession::new(&mut plain);
    session.edit_file(Path::new("/tmp/form.txt"));
    assert_eq!(session.state(), SessionState::Faulted);

    let deferred = session.take_deferred().expect("captured");
    assert!(deferred.downcast_ref::<Error>().is_some());
}

/// Minimal engine: plays a fixed event sequence, honoring liveness.
struct OneShotEngine {
    records: Vec<WireRecord>,
    dispatched: usize,
}

impl CommandEngine for OneShotEngine {
    fn open(&mut self, _settings: &ConnectionSettings) -> Result<()> {
        Ok(())
    }

    fn run(
        &mut self,
        _command: &str,
        _args: &[String],
        events: &mut dyn ClientEvents,
    ) -> Result<()> {
        for record in self.records.drain(..) {
            if !events.is_alive() {
                break;
            }
            events.record(record);
            self.dispatched += 1;
        }
        events.finished();
        Ok(())
    }

    fn close(&mut self) {}
}

#[test]
fn drive_reraises_the_first_deferred_failure() {
    let mut engine = OneShotEngine {
        records: vec![
            wire(&[("rev", "1")]),
            wire(&[("rev", "2")]),
            wire(&[("rev", "3")]),
        ],
        dispatched: 0,
    };
    let mut probe = Probe {
        fail_on: Some("record"),
        ..Probe::default()
    };

    let err = drive(&mut engine, "files", &[], &mut probe).unwrap_err();
    match err {
        Error::Callback(inner) => assert!(inner.to_string().contains("record blew up")),
        other => panic!("expected Callback error, got {:?}", other),
    }
    // The liveness poll cut the loop short after the first failure.
    assert_eq!(engine.dispatched, 1);
    assert_eq!(probe.calls, ["record"]);
}

#[test]
fn drive_returns_ok_on_clean_run() {
    let mut engine = OneShotEngine {
        records: vec![wire(&[("rev", "1")])],
        dispatched: 0,
    };
    let mut probe = Probe::default();
    drive(&mut engine, "files", &[], &mut probe).unwrap();
    assert_eq!(probe.calls, ["record", "finished"]);
}
