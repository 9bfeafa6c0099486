//! Text document payloads: synchronisation, navigation, diagnostics, editing.

use super::{
    DiagnosticSeverity, DiagnosticTag, DocumentHighlightKind, DocumentUri, FileChangeType,
    Location, LocationLink, LspAny, LspObject, MarkedString, MarkupContent, Position,
    ProgressToken, Range, TextDocumentIdentifier, TextDocumentItem, TextDocumentSaveReason,
    Uri, VersionedTextDocumentIdentifier,
};
use crate::strict::strict_struct;
use crate::union::{NullableOneOf3, OneOf2, OneOf3};
use serde::Serialize;

// ============================================================================
// Synchronisation
// ============================================================================

/// Parameters of `textDocument/didOpen`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DidOpenTextDocumentParams {
    /// The opened document.
    pub text_document: TextDocumentItem,
}

strict_struct!(DidOpenTextDocumentParams {
    required { text_document: "textDocument" }
    optional {}
});

/// An incremental change to a range of a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TextDocumentContentChangePartial {
    /// The replaced range.
    pub range: Range,
    /// Length of the replaced range. Deprecated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range_length: Option<u32>,
    /// The new text for the range.
    pub text: String,
}

strict_struct!(TextDocumentContentChangePartial {
    required { range: "range", text: "text" }
    optional { range_length: "rangeLength" }
});

/// A replacement of a document's whole content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextDocumentContentChangeWholeDocument {
    /// The new content.
    pub text: String,
}

strict_struct!(TextDocumentContentChangeWholeDocument {
    required { text: "text" }
    optional {}
});

/// A change to a document: a ranged edit or a full replacement.
pub type TextDocumentContentChangeEvent =
    OneOf2<TextDocumentContentChangePartial, TextDocumentContentChangeWholeDocument>;

/// Parameters of `textDocument/didChange`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DidChangeTextDocumentParams {
    /// The document that changed.
    pub text_document: VersionedTextDocumentIdentifier,
    /// The changes, applied in order.
    pub content_changes: Vec<TextDocumentContentChangeEvent>,
}

strict_struct!(DidChangeTextDocumentParams {
    required {
        text_document: "textDocument",
        content_changes: "contentChanges",
    }
    optional {}
});

/// Parameters of `textDocument/didClose`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DidCloseTextDocumentParams {
    /// The closed document.
    pub text_document: TextDocumentIdentifier,
}

strict_struct!(DidCloseTextDocumentParams {
    required { text_document: "textDocument" }
    optional {}
});

/// Parameters of `textDocument/didSave`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DidSaveTextDocumentParams {
    /// The saved document.
    pub text_document: TextDocumentIdentifier,
    /// The content, when the client was asked to include it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

strict_struct!(DidSaveTextDocumentParams {
    required { text_document: "textDocument" }
    optional { text: "text" }
});

/// Parameters of `textDocument/willSave` and `textDocument/willSaveWaitUntil`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WillSaveTextDocumentParams {
    /// The document about to be saved.
    pub text_document: TextDocumentIdentifier,
    /// Why it is being saved.
    pub reason: TextDocumentSaveReason,
}

strict_struct!(WillSaveTextDocumentParams {
    required { text_document: "textDocument", reason: "reason" }
    optional {}
});

/// A watched file change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileEvent {
    /// The file's URI.
    pub uri: DocumentUri,
    /// The change type.
    #[serde(rename = "type")]
    pub typ: FileChangeType,
}

strict_struct!(FileEvent {
    required { uri: "uri", typ: "type" }
    optional {}
});

/// Parameters of `workspace/didChangeWatchedFiles`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DidChangeWatchedFilesParams {
    /// The actual file events.
    pub changes: Vec<FileEvent>,
}

strict_struct!(DidChangeWatchedFilesParams {
    required { changes: "changes" }
    optional {}
});

// ============================================================================
// Navigation
// ============================================================================

/// Parameters of `textDocument/hover`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HoverParams {
    /// The document.
    pub text_document: TextDocumentIdentifier,
    /// The position inside the document.
    pub position: Position,
    /// Token for reporting work-done progress.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub work_done_token: Option<ProgressToken>,
}

strict_struct!(HoverParams {
    required { text_document: "textDocument", position: "position" }
    optional { work_done_token: "workDoneToken" }
});

/// The contents of a hover: markup, a marked string, or a list of marked strings.
pub type HoverContents = OneOf3<MarkupContent, MarkedString, Vec<MarkedString>>;

/// Result of `textDocument/hover`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Hover {
    /// The hover's content.
    pub contents: HoverContents,
    /// The range the hover applies to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range: Option<Range>,
}

strict_struct!(Hover {
    required { contents: "contents" }
    optional { range: "range" }
});

/// Parameters of the goto requests (`definition`, `declaration`,
/// `typeDefinition`, `implementation`) and `documentHighlight`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DefinitionParams {
    /// The document.
    pub text_document: TextDocumentIdentifier,
    /// The position inside the document.
    pub position: Position,
    /// Token for reporting work-done progress.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub work_done_token: Option<ProgressToken>,
    /// Token for streaming partial results.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub partial_result_token: Option<ProgressToken>,
}

strict_struct!(DefinitionParams {
    required { text_document: "textDocument", position: "position" }
    optional {
        work_done_token: "workDoneToken",
        partial_result_token: "partialResultToken",
    }
});

/// Result of the goto requests.
///
/// An empty array decodes as `Location[]`, the earlier alternative.
pub type DefinitionResponse = NullableOneOf3<Location, Vec<Location>, Vec<LocationLink>>;

/// Context of a `textDocument/references` request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferenceContext {
    /// Include the declaration of the symbol.
    pub include_declaration: bool,
}

strict_struct!(ReferenceContext {
    required { include_declaration: "includeDeclaration" }
    optional {}
});

/// Parameters of `textDocument/references`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferenceParams {
    /// The document.
    pub text_document: TextDocumentIdentifier,
    /// The position inside the document.
    pub position: Position,
    /// The request context.
    pub context: ReferenceContext,
    /// Token for reporting work-done progress.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub work_done_token: Option<ProgressToken>,
    /// Token for streaming partial results.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub partial_result_token: Option<ProgressToken>,
}

strict_struct!(ReferenceParams {
    required {
        text_document: "textDocument",
        position: "position",
        context: "context",
    }
    optional {
        work_done_token: "workDoneToken",
        partial_result_token: "partialResultToken",
    }
});

/// A highlighted range in a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DocumentHighlight {
    /// The highlighted range.
    pub range: Range,
    /// The highlight kind, text by default.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<DocumentHighlightKind>,
}

strict_struct!(DocumentHighlight {
    required { range: "range" }
    optional { kind: "kind" }
});

// ============================================================================
// Diagnostics
// ============================================================================

/// A link to documentation about a diagnostic code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CodeDescription {
    /// The documentation URI.
    pub href: Uri,
}

strict_struct!(CodeDescription {
    required { href: "href" }
    optional {}
});

/// A related location for a diagnostic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiagnosticRelatedInformation {
    /// The related location.
    pub location: Location,
    /// The related message.
    pub message: String,
}

strict_struct!(DiagnosticRelatedInformation {
    required { location: "location", message: "message" }
    optional {}
});

/// A compiler error, warning, or hint.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostic {
    /// The range the diagnostic applies to.
    pub range: Range,
    /// Severity; the client decides when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub severity: Option<DiagnosticSeverity>,
    /// The diagnostic's code.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<OneOf2<i32, String>>,
    /// Where to read more about the code.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code_description: Option<CodeDescription>,
    /// Who produced the diagnostic.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    /// The message.
    pub message: String,
    /// Extra rendering hints.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<DiagnosticTag>>,
    /// Related locations.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub related_information: Option<Vec<DiagnosticRelatedInformation>>,
    /// Data preserved between publish and code action requests.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<LspAny>,
}

strict_struct!(Diagnostic {
    required { range: "range", message: "message" }
    optional {
        severity: "severity",
        code: "code",
        code_description: "codeDescription",
        source: "source",
        tags: "tags",
        related_information: "relatedInformation",
        data: "data",
    }
});

/// Parameters of `textDocument/publishDiagnostics`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PublishDiagnosticsParams {
    /// The document the diagnostics belong to.
    pub uri: DocumentUri,
    /// The document version the diagnostics were computed for.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<i32>,
    /// The diagnostics.
    pub diagnostics: Vec<Diagnostic>,
}

strict_struct!(PublishDiagnosticsParams {
    required { uri: "uri", diagnostics: "diagnostics" }
    optional { version: "version" }
});

/// A previous result id for a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PreviousResultId {
    /// The document.
    pub uri: DocumentUri,
    /// The result id.
    pub value: String,
}

strict_struct!(PreviousResultId {
    required { uri: "uri", value: "value" }
    optional {}
});

/// Parameters of `workspace/diagnostic`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceDiagnosticParams {
    /// The registration identifier.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identifier: Option<String>,
    /// Result ids of previous reports.
    pub previous_result_ids: Vec<PreviousResultId>,
    /// Token for reporting work-done progress.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub work_done_token: Option<ProgressToken>,
    /// Token for streaming partial results.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub partial_result_token: Option<ProgressToken>,
}

strict_struct!(WorkspaceDiagnosticParams {
    required { previous_result_ids: "previousResultIds" }
    optional {
        identifier: "identifier",
        work_done_token: "workDoneToken",
        partial_result_token: "partialResultToken",
    }
});

/// Result of `workspace/diagnostic`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkspaceDiagnosticReport {
    /// Per-document reports.
    pub items: Vec<LspAny>,
}

strict_struct!(WorkspaceDiagnosticReport {
    required { items: "items" }
    optional {}
});

// ============================================================================
// Editing
// ============================================================================

/// Formatting options. Besides `tabSize` and `insertSpaces` arbitrary keys are allowed.
pub type FormattingOptions = LspObject;

/// Parameters of `textDocument/formatting`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentFormattingParams {
    /// The document to format.
    pub text_document: TextDocumentIdentifier,
    /// The format options.
    pub options: FormattingOptions,
    /// Token for reporting work-done progress.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub work_done_token: Option<ProgressToken>,
}

strict_struct!(DocumentFormattingParams {
    required { text_document: "textDocument", options: "options" }
    optional { work_done_token: "workDoneToken" }
});

/// Parameters of `textDocument/rename`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenameParams {
    /// The document.
    pub text_document: TextDocumentIdentifier,
    /// The position of the symbol to rename.
    pub position: Position,
    /// The new name.
    pub new_name: String,
    /// Token for reporting work-done progress.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub work_done_token: Option<ProgressToken>,
}

strict_struct!(RenameParams {
    required {
        text_document: "textDocument",
        position: "position",
        new_name: "newName",
    }
    optional { work_done_token: "workDoneToken" }
});

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DecodeError;
    use crate::strict::decode;
    use serde_json::json;

    fn range_json() -> serde_json::Value {
        json!({"start": {"line": 0, "character": 0}, "end": {"line": 0, "character": 4}})
    }

    #[test]
    fn content_change_prefers_ranged_edit() {
        let params: DidChangeTextDocumentParams = decode(&json!({
            "textDocument": {"uri": "file:///a.rs", "version": 3},
            "contentChanges": [
                {"range": range_json(), "text": "fn"},
                {"text": "whole file"}
            ]
        }))
        .unwrap();
        assert_eq!(params.content_changes.len(), 2);
        assert!(matches!(params.content_changes[0], OneOf2::A(_)));
        assert_eq!(
            params.content_changes[1],
            OneOf2::B(TextDocumentContentChangeWholeDocument {
                text: "whole file".to_string()
            })
        );
    }

    #[test]
    fn content_change_failure_names_both_shapes() {
        let err = decode::<DidChangeTextDocumentParams>(&json!({
            "textDocument": {"uri": "file:///a.rs", "version": 3},
            "contentChanges": [{"range": range_json()}]
        }))
        .unwrap_err();
        match err.root_cause() {
            DecodeError::NoMatchingAlternative { attempts, .. } => {
                assert_eq!(attempts[0].shape, "TextDocumentContentChangePartial");
                assert_eq!(attempts[1].shape, "TextDocumentContentChangeWholeDocument");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(err.to_string().starts_with(
            "DidChangeTextDocumentParams.contentChanges: [0]: expected one of"
        ));
    }

    #[test]
    fn hover_contents_alternatives() {
        let markup: Hover =
            decode(&json!({"contents": {"kind": "markdown", "value": "**x**"}})).unwrap();
        assert_eq!(markup.contents.index(), 0);

        let plain: Hover = decode(&json!({"contents": "text"})).unwrap();
        assert_eq!(plain.contents, OneOf3::B(OneOf2::A("text".to_string())));

        let list: Hover = decode(&json!({
            "contents": ["a", {"language": "rust", "value": "b"}],
            "range": range_json()
        }))
        .unwrap();
        assert_eq!(list.contents.index(), 2);
        assert!(list.range.is_some());

        assert!(decode::<Hover>(&json!({"contents": null})).is_err());
    }

    #[test]
    fn definition_empty_array_is_location_list() {
        let empty: DefinitionResponse = decode(&json!([])).unwrap();
        assert_eq!(empty, NullableOneOf3::B(Vec::new()));

        let null: DefinitionResponse = decode(&json!(null)).unwrap();
        assert!(null.is_null());

        let single: DefinitionResponse =
            decode(&json!({"uri": "file:///a.rs", "range": range_json()})).unwrap();
        assert!(matches!(single, NullableOneOf3::A(_)));

        let links: DefinitionResponse = decode(&json!([{
            "targetUri": "file:///b.rs",
            "targetRange": range_json(),
            "targetSelectionRange": range_json()
        }]))
        .unwrap();
        assert!(matches!(links, NullableOneOf3::C(ref l) if l.len() == 1));
    }

    #[test]
    fn diagnostic_code_union() {
        let numeric: Diagnostic =
            decode(&json!({"range": range_json(), "message": "m", "code": 1001})).unwrap();
        assert_eq!(numeric.code, Some(OneOf2::A(1001)));

        let text: Diagnostic = decode(&json!({
            "range": range_json(),
            "message": "m",
            "code": "E0308",
            "severity": 1,
            "tags": [2]
        }))
        .unwrap();
        assert_eq!(text.code, Some(OneOf2::B("E0308".to_string())));
        assert_eq!(text.severity, Some(DiagnosticSeverity::Error));
        assert_eq!(text.tags, Some(vec![DiagnosticTag::Deprecated]));
    }

    #[test]
    fn publish_diagnostics_round_trip() {
        let params = PublishDiagnosticsParams {
            uri: "file:///a.rs".to_string(),
            version: Some(2),
            diagnostics: vec![Diagnostic {
                range: decode(&range_json()).unwrap(),
                severity: Some(DiagnosticSeverity::Warning),
                code: None,
                code_description: None,
                source: Some("rustc".to_string()),
                message: "unused".to_string(),
                tags: Some(vec![DiagnosticTag::Unnecessary]),
                related_information: None,
                data: None,
            }],
        };
        let encoded = serde_json::to_value(&params).unwrap();
        assert_eq!(decode::<PublishDiagnosticsParams>(&encoded).unwrap(), params);
    }

    #[test]
    fn workspace_diagnostic_with_empty_previous_ids() {
        let params: WorkspaceDiagnosticParams =
            decode(&json!({"previousResultIds": []})).unwrap();
        assert!(params.previous_result_ids.is_empty());
        assert!(decode::<WorkspaceDiagnosticParams>(&json!({})).is_err());
    }

    #[test]
    fn hover_params_reject_partial_result_token() {
        let value = json!({
            "textDocument": {"uri": "file:///a.rs"},
            "position": {"line": 1, "character": 2},
            "partialResultToken": 1
        });
        assert!(decode::<HoverParams>(&value).is_err());
        assert!(decode::<DefinitionParams>(&value).is_ok());
    }
}
