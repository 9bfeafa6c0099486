//! Basic structures shared by many methods.

use super::{DocumentUri, LspAny, MarkupKind, Uri};
use crate::strict::strict_struct;
use crate::union::OneOf2;
use serde::Serialize;
use std::collections::HashMap;

/// A token reporting work-done or partial-result progress.
pub type ProgressToken = OneOf2<i32, String>;

/// Position in a text document, zero-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Position {
    /// Line position.
    pub line: u32,
    /// Character offset on the line.
    pub character: u32,
}

strict_struct!(Position {
    required { line: "line", character: "character" }
    optional {}
});

impl Position {
    /// Creates a position.
    pub fn new(line: u32, character: u32) -> Self {
        Self { line, character }
    }
}

/// A range in a text document, end exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Range {
    /// Start position.
    pub start: Position,
    /// End position.
    pub end: Position,
}

strict_struct!(Range {
    required { start: "start", end: "end" }
    optional {}
});

impl Range {
    /// Creates a range.
    pub fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }
}

/// A location inside a resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Location {
    /// The resource.
    pub uri: DocumentUri,
    /// The range inside it.
    pub range: Range,
}

strict_struct!(Location {
    required { uri: "uri", range: "range" }
    optional {}
});

/// A link between a source and a target location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationLink {
    /// Span of the origin of this link.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin_selection_range: Option<Range>,
    /// The target resource.
    pub target_uri: DocumentUri,
    /// Full target range.
    pub target_range: Range,
    /// The range to select when following the link.
    pub target_selection_range: Range,
}

strict_struct!(LocationLink {
    required {
        target_uri: "targetUri",
        target_range: "targetRange",
        target_selection_range: "targetSelectionRange",
    }
    optional { origin_selection_range: "originSelectionRange" }
});

/// Identifies a text document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct TextDocumentIdentifier {
    /// The document's URI.
    pub uri: DocumentUri,
}

strict_struct!(TextDocumentIdentifier {
    required { uri: "uri" }
    optional {}
});

/// Identifies a specific version of a text document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct VersionedTextDocumentIdentifier {
    /// The document's URI.
    pub uri: DocumentUri,
    /// The version number.
    pub version: i32,
}

strict_struct!(VersionedTextDocumentIdentifier {
    required { uri: "uri", version: "version" }
    optional {}
});

/// A text document transferred from the client to the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TextDocumentItem {
    /// The document's URI.
    pub uri: DocumentUri,
    /// The document's language identifier.
    pub language_id: String,
    /// The version number.
    pub version: i32,
    /// The content.
    pub text: String,
}

strict_struct!(TextDocumentItem {
    required {
        uri: "uri",
        language_id: "languageId",
        version: "version",
        text: "text",
    }
    optional {}
});

/// A textual edit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TextEdit {
    /// The range to replace.
    pub range: Range,
    /// The replacement text.
    pub new_text: String,
}

strict_struct!(TextEdit {
    required { range: "range", new_text: "newText" }
    optional {}
});

/// Content rendered as plain text or markdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MarkupContent {
    /// The format.
    pub kind: MarkupKind,
    /// The content.
    pub value: String,
}

strict_struct!(MarkupContent {
    required { kind: "kind", value: "value" }
    optional {}
});

/// A code block with a language, as used by [`MarkedString`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MarkedStringWithLanguage {
    /// Language identifier.
    pub language: String,
    /// The code.
    pub value: String,
}

strict_struct!(MarkedStringWithLanguage {
    required { language: "language", value: "value" }
    optional {}
});

/// Markdown text or a code block.
pub type MarkedString = OneOf2<String, MarkedStringWithLanguage>;

/// A workspace folder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkspaceFolder {
    /// The folder's URI.
    pub uri: Uri,
    /// The folder's name.
    pub name: String,
}

strict_struct!(WorkspaceFolder {
    required { uri: "uri", name: "name" }
    optional {}
});

/// Changes to many resources.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceEdit {
    /// Edits to existing documents, keyed by URI.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub changes: Option<HashMap<DocumentUri, Vec<TextEdit>>>,
    /// Versioned edits and resource operations.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document_changes: Option<Vec<LspAny>>,
    /// Change annotations, keyed by identifier.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub change_annotations: Option<HashMap<String, LspAny>>,
}

strict_struct!(WorkspaceEdit {
    required {}
    optional {
        changes: "changes",
        document_changes: "documentChanges",
        change_annotations: "changeAnnotations",
    }
});

/// A command the client can run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Command {
    /// Title shown in the UI.
    pub title: String,
    /// Command identifier.
    pub command: String,
    /// Arguments for the command.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arguments: Option<Vec<LspAny>>,
}

strict_struct!(Command {
    required { title: "title", command: "command" }
    optional { arguments: "arguments" }
});

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DecodeError;
    use crate::strict::decode;
    use serde_json::json;

    #[test]
    fn nested_errors_keep_path() {
        let err = decode::<Location>(&json!({
            "uri": "file:///a.rs",
            "range": {"start": {"line": 0, "character": 0}, "end": {"line": 1}}
        }))
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Location.range: Range.end: Position: missing required field `character`"
        );
        assert!(matches!(
            err.root_cause(),
            DecodeError::MissingRequiredField { .. }
        ));
    }

    #[test]
    fn marked_string_picks_by_shape() {
        let plain: MarkedString = decode(&json!("text")).unwrap();
        assert_eq!(plain, OneOf2::A("text".to_string()));
        let code: MarkedString = decode(&json!({"language": "rust", "value": "fn x()"})).unwrap();
        assert_eq!(code.index(), 1);
        assert!(decode::<MarkedString>(&json!({"language": "rust"})).is_err());
    }

    #[test]
    fn workspace_edit_changes_by_uri() {
        let edit: WorkspaceEdit = decode(&json!({
            "changes": {
                "file:///a.rs": [{
                    "range": {"start": {"line": 0, "character": 0}, "end": {"line": 0, "character": 3}},
                    "newText": "let"
                }]
            }
        }))
        .unwrap();
        let changes = edit.changes.as_ref().unwrap();
        assert_eq!(changes["file:///a.rs"][0].new_text, "let");
        assert!(edit.document_changes.is_none());

        let encoded = serde_json::to_value(&edit).unwrap();
        assert!(encoded.get("documentChanges").is_none());
        assert_eq!(decode::<WorkspaceEdit>(&encoded).unwrap(), edit);
    }

    #[test]
    fn empty_workspace_edit() {
        assert_eq!(decode::<WorkspaceEdit>(&json!({})).unwrap(), WorkspaceEdit::default());
    }

    #[test]
    fn location_link_camel_case() {
        let range = Range::new(Position::new(1, 2), Position::new(1, 5));
        let link = LocationLink {
            origin_selection_range: None,
            target_uri: "file:///b.rs".to_string(),
            target_range: range,
            target_selection_range: range,
        };
        let encoded = serde_json::to_value(&link).unwrap();
        assert!(encoded.get("targetUri").is_some());
        assert!(encoded.get("originSelectionRange").is_none());
        assert_eq!(decode::<LocationLink>(&encoded).unwrap(), link);
    }
}
