//! End-to-end batching scenarios over a stub transport.

use std::cell::RefCell;
use std::rc::Rc;

use serde_json::{json, Value};
use tracrpc_core::{ClientError, Session, SessionConfig, Transport, TransportRequest};

/// Replays one canned response and records what went over the wire.
struct StubTransport {
    response: Vec<u8>,
    sent: Rc<RefCell<Vec<String>>>,
}

impl StubTransport {
    fn new(response: &str) -> Self {
        Self {
            response: response.as_bytes().to_vec(),
            sent: Rc::new(RefCell::new(Vec::new())),
        }
    }

    fn log(&self) -> Rc<RefCell<Vec<String>>> {
        Rc::clone(&self.sent)
    }
}

impl Transport for StubTransport {
    fn send(&self, request: &TransportRequest<'_>) -> Result<Vec<u8>, ClientError> {
        self.sent.borrow_mut().push(request.body.to_string());
        Ok(self.response.clone())
    }
}

#[test]
fn batched_wiki_and_ticket_calls_demultiplex_onto_their_ids() {
    let response = r#"{
        "id": 3,
        "result": [
            {"id": 1, "result": "= Guide =", "error": null},
            {"id": 2, "result": {"0": "10000", "3": {"status": "closed"}}, "error": null}
        ],
        "error": null
    }"#;

    let mut session = Session::new(
        SessionConfig::new("https://trac.example.org/jsonrpc").batching(true),
        Box::new(StubTransport::new(response)),
    );

    let page = session.call("wiki.getPage", vec![json!("TracGuide")]).unwrap();
    let ticket = session.call("ticket.get", vec![json!("10000")]).unwrap();
    assert_eq!(page.id(), Some(1));
    assert_eq!(ticket.id(), Some(2));

    session.flush().unwrap();

    let store = session.results();
    assert_eq!(store.get(1), Some(&json!("= Guide =")));
    assert_eq!(store.get(2).unwrap()["3"]["status"], json!("closed"));
    assert!(store.get_error(1).is_none());
    assert!(store.get_error(2).is_none());
}

#[test]
fn flushed_batch_sends_one_multicall_request() {
    let response = r#"{
        "id": 4,
        "result": [
            {"id": 1, "result": "a", "error": null},
            {"id": 2, "result": "b", "error": null},
            {"id": 3, "result": "c", "error": null}
        ],
        "error": null
    }"#;

    let transport = StubTransport::new(response);
    let log = transport.log();
    let mut session = Session::new(
        SessionConfig::new("https://trac.example.org/jsonrpc").batching(true),
        Box::new(transport),
    );

    for name in ["A", "B", "C"] {
        session.call("wiki.getPage", vec![json!(name)]).unwrap();
    }
    session.flush().unwrap();

    // Exactly one exchange, carrying one system.multicall wrapper.
    let bodies = log.borrow();
    assert_eq!(bodies.len(), 1);
    let wire: Value = serde_json::from_str(&bodies[0]).unwrap();
    assert_eq!(wire["method"], json!("system.multicall"));
    assert_eq!(wire["params"].as_array().unwrap().len(), 3);
    assert_eq!(wire["params"][0]["params"], json!(["A"]));
    assert_eq!(wire["id"], json!(4));

    // All three ids populated, in order, exactly once.
    let many = session.results().get_many(&[1, 2, 3]);
    assert_eq!(many.keys().copied().collect::<Vec<_>>(), vec![1, 2, 3]);
    assert_eq!(session.results().len(), 3);
}

#[test]
fn batch_fault_is_isolated_to_its_id() {
    let response = r#"{
        "id": 3,
        "result": [
            {"id": 1, "result": "ok", "error": null},
            {"id": 2, "result": null, "error": {"code": 404, "message": "Ticket 99999 does not exist"}}
        ],
        "error": null
    }"#;

    let mut session = Session::new(
        SessionConfig::new("https://trac.example.org/jsonrpc").batching(true),
        Box::new(StubTransport::new(response)),
    );

    session.call("wiki.getPage", vec![json!("TracGuide")]).unwrap();
    session.call("ticket.get", vec![json!("99999")]).unwrap();
    session.flush().unwrap();

    let store = session.results();
    assert!(store.get_error(1).is_none());
    let fault = store.get_error(2).expect("fault stored for id 2");
    assert_eq!(fault["message"], json!("Ticket 99999 does not exist"));
    assert_eq!(store.get(1), Some(&json!("ok")));
    assert!(store.get(2).is_none());
}

#[test]
fn tagged_values_resolve_inside_batched_results() {
    let response = r#"{
        "id": 2,
        "result": [
            {"id": 1, "result": {
                "due": {"__jsonclass__": ["datetime", "2011-01-01T00:00:00+00:00"]},
                "name": "milestone1"
            }, "error": null}
        ],
        "error": null
    }"#;

    let mut session = Session::new(
        SessionConfig::new("https://trac.example.org/jsonrpc").batching(true),
        Box::new(StubTransport::new(response)),
    );

    session
        .call("ticket.milestone.get", vec![json!("milestone1")])
        .unwrap();
    session.flush().unwrap();

    let milestone = session.results().get(1).unwrap();
    assert_eq!(milestone["due"], json!(1_293_840_000));
    assert_eq!(milestone["name"], json!("milestone1"));
}

#[test]
fn empty_params_go_out_as_an_object() {
    let response = r#"{"id": 1, "result": ["new", "closed"], "error": null}"#;
    let transport = StubTransport::new(response);
    let log = transport.log();
    let mut session = Session::new(
        SessionConfig::new("https://trac.example.org/jsonrpc"),
        Box::new(transport),
    );

    let outcome = session.call("ticket.status.getAll", vec![]).unwrap();

    let bodies = log.borrow();
    let wire: Value = serde_json::from_str(&bodies[0]).unwrap();
    assert_eq!(wire["params"], json!({}));
    assert!(!bodies[0].contains("[]"));

    assert_eq!(outcome.into_value(), Some(json!(["new", "closed"])));
}

#[test]
fn content_type_header_value_follows_url_shape() {
    struct HeaderProbe {
        seen: Rc<RefCell<Vec<&'static str>>>,
    }
    impl Transport for HeaderProbe {
        fn send(&self, request: &TransportRequest<'_>) -> Result<Vec<u8>, ClientError> {
            self.seen.borrow_mut().push(request.content_type.as_mime());
            Ok(br#"{"id": 1, "result": "1.1.6", "error": null}"#.to_vec())
        }
    }

    let seen = Rc::new(RefCell::new(Vec::new()));
    let mut session = Session::new(
        SessionConfig::new("https://trac.example.org/xmlrpc"),
        Box::new(HeaderProbe {
            seen: Rc::clone(&seen),
        }),
    );
    session.call("system.getAPIVersion", vec![]).unwrap();
    assert_eq!(*seen.borrow(), vec!["application/xml"]);
}
