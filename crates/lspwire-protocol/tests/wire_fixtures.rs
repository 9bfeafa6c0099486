//! Wire-level tests for lspwire-protocol.
//!
//! Fixture files in `tests/testdata` are named `<Shape>-<True|False>-<case>.json`:
//! the shape the message should decode as, and whether decoding (including
//! typed params) is expected to succeed.

use std::fs;
use std::path::PathBuf;

use lspwire_core::{DispatchConfig, ErrorCode, UnknownNotificationPolicy};
use lspwire_protocol::catalog::{self, Position, Range, TextDocumentIdentifier};
use lspwire_protocol::methods::{notifications, requests};
use lspwire_protocol::{
    Completion, DecodeError, Dispatcher, Incoming, Message, MessageShape, Notification,
    NotificationParams, NullableOneOf3, PendingRequests, Request, RequestParams, Response,
    ResponseResult, StrictDecode,
};
use serde_json::{Value, json};

fn testdata_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/testdata")
}

// ============================================================================
// Fixture Tests
// ============================================================================

#[test]
fn test_fixtures_decode_as_labelled() {
    let dispatcher = Dispatcher::default();
    let mut checked = 0;

    for entry in fs::read_dir(testdata_dir()).unwrap() {
        let path = entry.unwrap().path();
        let name = path.file_name().unwrap().to_string_lossy().to_string();
        if !name.ends_with(".json") {
            continue;
        }
        let parts: Vec<&str> = name.split('-').collect();
        let shape = parts[0];
        let expected = parts[1] == "True";
        let content = fs::read(&path).unwrap();

        let outcome = dispatcher.decode(&content);
        match (expected, &outcome) {
            (true, Ok(incoming)) => {
                let actual = match incoming {
                    Incoming::Request { .. } => "Request",
                    Incoming::Notification { .. } => "Notification",
                    Incoming::Response(_) => "Response",
                    Incoming::Ignored { .. } => "Ignored",
                };
                assert_eq!(actual, shape, "fixture {name} decoded as {actual}");
            }
            (true, Err(err)) => panic!("expected pass in {name}, got error: {err}"),
            (false, Ok(incoming)) => panic!("expected fail in {name}, got {incoming:?}"),
            (false, Err(_)) => {}
        }
        checked += 1;
    }

    assert!(checked >= 20, "only {checked} fixtures found");
}

// ============================================================================
// Envelope Tests
// ============================================================================

#[test]
fn test_envelope_round_trip_keeps_params_absent() {
    let text = r#"{"jsonrpc":"2.0","id":1,"method":"shutdown"}"#;
    let message = Message::from_str(text).unwrap();
    assert_eq!(message.shape(), MessageShape::Request);
    assert_eq!(serde_json::to_string(&message).unwrap(), text);
}

#[test]
fn test_message_deserialize_uses_strict_path() {
    let result: Result<Message, _> =
        serde_json::from_str(r#"{"jsonrpc":"2.0","id":1,"method":"shutdown","x":1}"#);
    assert!(result.is_err());
}

#[test]
fn test_error_codes_for_each_failure_layer() {
    let dispatcher = Dispatcher::default();
    let cases: &[(&[u8], ErrorCode)] = &[
        (b"[1,", ErrorCode::ParseError),
        (b"42", ErrorCode::InvalidRequest),
        (br#"{"jsonrpc":"2.0","id":1}"#, ErrorCode::InvalidRequest),
        (br#"{"id":1,"method":"shutdown"}"#, ErrorCode::InvalidRequest),
        (br#"{"jsonrpc":"2.0","id":1,"method":"nope/nope"}"#, ErrorCode::MethodNotFound),
        (
            br#"{"jsonrpc":"2.0","id":1,"method":"textDocument/rename","params":{"newName":"x"}}"#,
            ErrorCode::InvalidParams,
        ),
    ];
    for (bytes, code) in cases {
        let err = dispatcher.decode(bytes).unwrap_err();
        assert_eq!(err.code(), *code, "{}", String::from_utf8_lossy(bytes));
    }
}

// ============================================================================
// Union Tests
// ============================================================================

#[test]
fn test_definition_result_alternatives() {
    let range = json!({"start": {"line": 1, "character": 0}, "end": {"line": 1, "character": 3}});
    let cases = [
        (json!(null), 0),
        (json!({"uri": "file:///a.rs", "range": range}), 1),
        (json!([]), 2),
        (json!([{"uri": "file:///a.rs", "range": range}]), 2),
        (
            json!([{"targetUri": "file:///a.rs", "targetRange": range, "targetSelectionRange": range}]),
            3,
        ),
    ];
    for (value, expected) in cases {
        let result = ResponseResult::decode("textDocument/definition", &value).unwrap();
        let ResponseResult::Definition(definition) = result else {
            panic!("wrong variant for {value}");
        };
        let actual = match definition {
            NullableOneOf3::Null => 0,
            NullableOneOf3::A(_) => 1,
            NullableOneOf3::B(_) => 2,
            NullableOneOf3::C(_) => 3,
        };
        assert_eq!(actual, expected, "{value}");
    }
}

#[test]
fn test_union_failure_lists_alternatives() {
    let err = ResponseResult::decode("textDocument/definition", &json!(true)).unwrap_err();
    match err.root_cause() {
        DecodeError::NoMatchingAlternative { attempts, .. } => {
            let shapes: Vec<&str> = attempts.iter().map(|a| a.shape.as_str()).collect();
            assert_eq!(shapes, ["Location", "Location[]", "LocationLink[]"]);
        }
        other => panic!("unexpected error: {other}"),
    }
}

// ============================================================================
// Typed Construction Tests
// ============================================================================

#[test]
fn test_typed_request_survives_the_wire() {
    let params = catalog::RenameParams {
        text_document: TextDocumentIdentifier {
            uri: "file:///lib.rs".to_string(),
        },
        position: Position::new(3, 8),
        new_name: "renamed".to_string(),
        work_done_token: None,
    };
    let request = Request::typed::<requests::Rename>(11, params.clone());
    let bytes = serde_json::to_vec(&request).unwrap();

    let incoming = Dispatcher::default().decode(&bytes).unwrap();
    assert_eq!(
        incoming,
        Incoming::Request {
            id: 11.into(),
            params: RequestParams::Rename(params),
        }
    );
}

#[test]
fn test_typed_notification_survives_the_wire() {
    let params = catalog::PublishDiagnosticsParams {
        uri: "file:///lib.rs".to_string(),
        version: None,
        diagnostics: vec![catalog::Diagnostic {
            range: Range::new(Position::new(0, 0), Position::new(0, 1)),
            severity: Some(catalog::DiagnosticSeverity::Hint),
            code: None,
            code_description: None,
            source: None,
            message: "consider this".to_string(),
            tags: None,
            related_information: None,
            data: Some(json!({"fix": 1})),
        }],
    };
    let notification = Notification::typed::<notifications::PublishDiagnostics>(params.clone());
    let value = serde_json::to_value(&notification).unwrap();
    assert!(value["params"].get("version").is_none());

    let incoming = Dispatcher::default().decode_value(&value).unwrap();
    assert_eq!(
        incoming,
        Incoming::Notification {
            params: NotificationParams::PublishDiagnostics(params),
        }
    );
}

// ============================================================================
// Round Trip Through Correlation
// ============================================================================

#[test]
fn test_outgoing_request_and_incoming_response() {
    let pending = PendingRequests::default();
    let request = pending
        .issue::<requests::ShowMessageRequest>(catalog::ShowMessageRequestParams {
            typ: catalog::MessageType::Warning,
            message: "reload?".to_string(),
            actions: Some(vec![catalog::MessageActionItem {
                title: "Yes".to_string(),
            }]),
        })
        .unwrap();
    let encoded = serde_json::to_value(&request).unwrap();
    assert_eq!(encoded["params"]["type"], json!(2));

    let reply = format!(
        r#"{{"jsonrpc":"2.0","id":{},"result":{{"title":"Yes"}}}}"#,
        request.id
    );
    let Incoming::Response(response) = Dispatcher::default().decode(reply.as_bytes()).unwrap()
    else {
        panic!("expected a response");
    };
    match pending.complete(response).unwrap() {
        Completion::Fulfilled {
            result: ResponseResult::ShowMessageRequest(Some(item)),
            ..
        } => assert_eq!(item.title, "Yes"),
        other => panic!("unexpected completion: {other:?}"),
    }
}

#[test]
fn test_reject_policy_surfaces_unknown_notifications() {
    let dispatcher = Dispatcher::new(DispatchConfig {
        unknown_notifications: UnknownNotificationPolicy::Reject,
        ..DispatchConfig::default()
    });
    let err = dispatcher
        .decode(br#"{"jsonrpc":"2.0","method":"$/custom"}"#)
        .unwrap_err();
    assert!(matches!(err.error, DecodeError::UnknownMethod(ref m) if m == "$/custom"));
}

#[test]
fn test_response_value_is_strict() {
    let value: Value = json!({"jsonrpc": "2.0", "id": 1, "result": 3, "extra": 1});
    assert!(Response::<Value>::decode_strict(&value).is_err());
}
