//! Lifecycle, window, and workspace-level payloads.

use super::{
    DocumentUri, LspAny, LspObject, MessageType, ProgressToken, TraceValue, Uri, WorkspaceEdit,
    WorkspaceFolder,
};
use crate::strict::strict_struct;
use crate::union::OneOf2;
use serde::Serialize;

// ============================================================================
// Initialize
// ============================================================================

/// Information about the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClientInfo {
    /// The client's name.
    pub name: String,
    /// The client's version.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

strict_struct!(ClientInfo {
    required { name: "name" }
    optional { version: "version" }
});

/// Information about the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServerInfo {
    /// The server's name.
    pub name: String,
    /// The server's version.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

strict_struct!(ServerInfo {
    required { name: "name" }
    optional { version: "version" }
});

/// Parameters of the `initialize` request.
///
/// `processId` and `rootUri` must be present but may be `null`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InitializeParams {
    /// Process id of the parent process, `null` if it has none.
    pub process_id: Option<i32>,
    /// Information about the client.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_info: Option<ClientInfo>,
    /// The client's UI locale.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
    /// Deprecated in favour of `rootUri`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub root_path: Option<String>,
    /// Root URI of the workspace, `null` if no folder is open.
    pub root_uri: Option<DocumentUri>,
    /// User-provided initialization options.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub initialization_options: Option<LspAny>,
    /// Capabilities provided by the client.
    pub capabilities: LspObject,
    /// The initial trace setting.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace: Option<TraceValue>,
    /// Workspace folders configured in the client.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workspace_folders: Option<Vec<WorkspaceFolder>>,
    /// Token for reporting work-done progress.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub work_done_token: Option<ProgressToken>,
}

strict_struct!(InitializeParams {
    required {
        process_id: "processId",
        root_uri: "rootUri",
        capabilities: "capabilities",
    }
    optional {
        client_info: "clientInfo",
        locale: "locale",
        root_path: "rootPath",
        initialization_options: "initializationOptions",
        trace: "trace",
        workspace_folders: "workspaceFolders",
        work_done_token: "workDoneToken",
    }
});

/// Result of the `initialize` request.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InitializeResult {
    /// Capabilities the server provides.
    pub capabilities: LspObject,
    /// Information about the server.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub server_info: Option<ServerInfo>,
}

strict_struct!(InitializeResult {
    required { capabilities: "capabilities" }
    optional { server_info: "serverInfo" }
});

/// Parameters of the `initialized` notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct InitializedParams {}

strict_struct!(InitializedParams {
    required {}
    optional {}
});

// ============================================================================
// Cancellation, progress, tracing
// ============================================================================

/// Parameters of `$/cancelRequest`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CancelParams {
    /// The request to cancel.
    pub id: OneOf2<i32, String>,
}

strict_struct!(CancelParams {
    required { id: "id" }
    optional {}
});

/// Parameters of `$/progress`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressParams {
    /// The progress token provided by the client or server.
    pub token: ProgressToken,
    /// The progress data.
    pub value: LspAny,
}

strict_struct!(ProgressParams {
    required { token: "token", value: "value" }
    optional {}
});

/// Parameters of `$/setTrace`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SetTraceParams {
    /// The new trace setting.
    pub value: TraceValue,
}

strict_struct!(SetTraceParams {
    required { value: "value" }
    optional {}
});

/// Parameters of `$/logTrace`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogTraceParams {
    /// The message to log.
    pub message: String,
    /// Extra detail, only sent when the trace value is `verbose`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verbose: Option<String>,
}

strict_struct!(LogTraceParams {
    required { message: "message" }
    optional { verbose: "verbose" }
});

/// Parameters of `window/workDoneProgress/create`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkDoneProgressCreateParams {
    /// The token to create.
    pub token: ProgressToken,
}

strict_struct!(WorkDoneProgressCreateParams {
    required { token: "token" }
    optional {}
});

/// Parameters of `window/workDoneProgress/cancel`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkDoneProgressCancelParams {
    /// The token to cancel.
    pub token: ProgressToken,
}

strict_struct!(WorkDoneProgressCancelParams {
    required { token: "token" }
    optional {}
});

// ============================================================================
// Window
// ============================================================================

/// Parameters of `window/showMessage`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShowMessageParams {
    /// The message type.
    #[serde(rename = "type")]
    pub typ: MessageType,
    /// The message.
    pub message: String,
}

strict_struct!(ShowMessageParams {
    required { typ: "type", message: "message" }
    optional {}
});

/// Parameters of `window/logMessage`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogMessageParams {
    /// The message type.
    #[serde(rename = "type")]
    pub typ: MessageType,
    /// The message.
    pub message: String,
}

strict_struct!(LogMessageParams {
    required { typ: "type", message: "message" }
    optional {}
});

/// An action offered by `window/showMessageRequest`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MessageActionItem {
    /// Short title.
    pub title: String,
}

strict_struct!(MessageActionItem {
    required { title: "title" }
    optional {}
});

/// Parameters of `window/showMessageRequest`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShowMessageRequestParams {
    /// The message type.
    #[serde(rename = "type")]
    pub typ: MessageType,
    /// The message.
    pub message: String,
    /// Actions to present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actions: Option<Vec<MessageActionItem>>,
}

strict_struct!(ShowMessageRequestParams {
    required { typ: "type", message: "message" }
    optional { actions: "actions" }
});

// ============================================================================
// Workspace
// ============================================================================

/// A capability registration.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    /// Registration id, used to unregister later.
    pub id: String,
    /// The method to register for.
    pub method: String,
    /// Options for the registration.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub register_options: Option<LspAny>,
}

strict_struct!(Registration {
    required { id: "id", method: "method" }
    optional { register_options: "registerOptions" }
});

/// Parameters of `client/registerCapability`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegistrationParams {
    /// The registrations.
    pub registrations: Vec<Registration>,
}

strict_struct!(RegistrationParams {
    required { registrations: "registrations" }
    optional {}
});

/// A capability unregistration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Unregistration {
    /// Id of the registration to remove.
    pub id: String,
    /// The method it was registered for.
    pub method: String,
}

strict_struct!(Unregistration {
    required { id: "id", method: "method" }
    optional {}
});

/// Parameters of `client/unregisterCapability`.
///
/// The wire key keeps the protocol's historical spelling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnregistrationParams {
    /// The unregistrations.
    pub unregisterations: Vec<Unregistration>,
}

strict_struct!(UnregistrationParams {
    required { unregisterations: "unregisterations" }
    optional {}
});

/// One item of a `workspace/configuration` request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigurationItem {
    /// Scope to get the configuration section for.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope_uri: Option<Uri>,
    /// The configuration section asked for.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section: Option<String>,
}

strict_struct!(ConfigurationItem {
    required {}
    optional { scope_uri: "scopeUri", section: "section" }
});

/// Parameters of `workspace/configuration`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfigurationParams {
    /// The items asked for.
    pub items: Vec<ConfigurationItem>,
}

strict_struct!(ConfigurationParams {
    required { items: "items" }
    optional {}
});

/// Parameters of `workspace/didChangeConfiguration`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DidChangeConfigurationParams {
    /// The changed settings.
    pub settings: LspAny,
}

strict_struct!(DidChangeConfigurationParams {
    required { settings: "settings" }
    optional {}
});

/// Parameters of `workspace/executeCommand`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecuteCommandParams {
    /// The command identifier.
    pub command: String,
    /// Arguments for the command.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arguments: Option<Vec<LspAny>>,
    /// Token for reporting work-done progress.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub work_done_token: Option<ProgressToken>,
}

strict_struct!(ExecuteCommandParams {
    required { command: "command" }
    optional { arguments: "arguments", work_done_token: "workDoneToken" }
});

/// Parameters of `workspace/applyEdit`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApplyWorkspaceEditParams {
    /// Label shown in the undo stack.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// The edits to apply.
    pub edit: WorkspaceEdit,
}

strict_struct!(ApplyWorkspaceEditParams {
    required { edit: "edit" }
    optional { label: "label" }
});

/// Result of `workspace/applyEdit`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplyWorkspaceEditResult {
    /// Whether the edit was applied.
    pub applied: bool,
    /// Why the edit was not applied.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure_reason: Option<String>,
    /// Index of the change that failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failed_change: Option<u32>,
}

strict_struct!(ApplyWorkspaceEditResult {
    required { applied: "applied" }
    optional { failure_reason: "failureReason", failed_change: "failedChange" }
});

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DecodeError;
    use crate::strict::decode;
    use serde_json::json;

    #[test]
    fn initialize_with_null_process_id() {
        let params: InitializeParams = decode(&json!({
            "processId": null,
            "rootUri": null,
            "capabilities": {}
        }))
        .unwrap();
        assert_eq!(params.process_id, None);
        assert_eq!(params.root_uri, None);
        assert!(params.capabilities.is_empty());

        let encoded = serde_json::to_value(&params).unwrap();
        assert_eq!(
            encoded,
            json!({"processId": null, "rootUri": null, "capabilities": {}})
        );
    }

    #[test]
    fn initialize_requires_process_id_key() {
        let err = decode::<InitializeParams>(&json!({"rootUri": null, "capabilities": {}}))
            .unwrap_err();
        match err {
            DecodeError::MissingRequiredField { shape, field } => {
                assert_eq!(shape, "InitializeParams");
                assert_eq!(field, "processId");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn initialize_full() {
        let params: InitializeParams = decode(&json!({
            "processId": 4242,
            "clientInfo": {"name": "editor", "version": "1.2"},
            "locale": "en",
            "rootUri": "file:///work",
            "capabilities": {"textDocument": {"hover": {}}},
            "trace": "messages",
            "workspaceFolders": [{"uri": "file:///work", "name": "work"}],
            "workDoneToken": "tok-1"
        }))
        .unwrap();
        assert_eq!(params.process_id, Some(4242));
        assert_eq!(params.trace, Some(TraceValue::Messages));
        assert_eq!(params.work_done_token, Some(OneOf2::B("tok-1".to_string())));
        assert_eq!(params.workspace_folders.unwrap()[0].name, "work");
    }

    #[test]
    fn initialize_rejects_bad_trace() {
        let err = decode::<InitializeParams>(&json!({
            "processId": 1, "rootUri": null, "capabilities": {}, "trace": "all"
        }))
        .unwrap_err();
        assert!(matches!(err.root_cause(), DecodeError::InvalidEnumValue { .. }));
    }

    #[test]
    fn applied_result() {
        let result: ApplyWorkspaceEditResult = decode(&json!({"applied": true})).unwrap();
        assert!(result.applied);
        assert_eq!(result.failure_reason, None);
        assert_eq!(serde_json::to_value(&result).unwrap(), json!({"applied": true}));
    }

    #[test]
    fn cancel_id_union() {
        let numeric: CancelParams = decode(&json!({"id": 12})).unwrap();
        assert_eq!(numeric.id, OneOf2::A(12));
        let text: CancelParams = decode(&json!({"id": "req-12"})).unwrap();
        assert_eq!(text.id, OneOf2::B("req-12".to_string()));
        let err = decode::<CancelParams>(&json!({"id": null})).unwrap_err();
        assert!(matches!(err.root_cause(), DecodeError::NullNotAllowed { .. }));
    }

    #[test]
    fn show_message_type_key() {
        let params: ShowMessageParams = decode(&json!({"type": 1, "message": "boom"})).unwrap();
        assert_eq!(params.typ, MessageType::Error);
        assert_eq!(
            serde_json::to_value(&params).unwrap(),
            json!({"type": 1, "message": "boom"})
        );
    }

    #[test]
    fn initialized_is_empty_object() {
        assert!(decode::<InitializedParams>(&json!({})).is_ok());
        assert!(decode::<InitializedParams>(&json!({"x": 1})).is_err());
        assert!(decode::<InitializedParams>(&json!(null)).is_err());
    }
}
