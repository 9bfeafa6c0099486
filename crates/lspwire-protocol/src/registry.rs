//! The method registry.
//!
//! Maps every LSP 3.17 wire method name to a [`MethodKind`] and back. The
//! table is built once, on first use, and never changes afterwards.

use lspwire_core::logging::targets;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

/// Whether a method is sent as a request or a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Sent with an `id`; answered with a response.
    Request,
    /// Sent without an `id`; never answered.
    Notification,
}

impl Direction {
    /// Lowercase name.
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Request => "request",
            Direction::Notification => "notification",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

macro_rules! method_kinds {
    (
        requests { $( $req:ident => $req_name:literal, )* }
        notifications { $( $note:ident => $note_name:literal, )* }
    ) => {
        /// A protocol method, or [`MethodKind::Unknown`] for names not in the registry.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum MethodKind {
            /// A method name the registry does not know.
            Unknown,
            $( #[doc = concat!("`", $req_name, "` (request)")] $req, )*
            $( #[doc = concat!("`", $note_name, "` (notification)")] $note, )*
        }

        impl MethodKind {
            /// Every registered request kind.
            pub const REQUESTS: &'static [MethodKind] = &[$( MethodKind::$req, )*];

            /// Every registered notification kind.
            pub const NOTIFICATIONS: &'static [MethodKind] = &[$( MethodKind::$note, )*];

            /// The wire method name. `Unknown` maps to the empty string.
            pub fn as_str(self) -> &'static str {
                match self {
                    MethodKind::Unknown => "",
                    $( MethodKind::$req => $req_name, )*
                    $( MethodKind::$note => $note_name, )*
                }
            }

            /// The registered direction, or `None` for `Unknown`.
            pub fn direction(self) -> Option<Direction> {
                match self {
                    MethodKind::Unknown => None,
                    $( MethodKind::$req => Some(Direction::Request), )*
                    $( MethodKind::$note => Some(Direction::Notification), )*
                }
            }
        }
    };
}

method_kinds! {
    requests {
        Implementation => "textDocument/implementation",
        TypeDefinition => "textDocument/typeDefinition",
        WorkspaceFolders => "workspace/workspaceFolders",
        Configuration => "workspace/configuration",
        DocumentColor => "textDocument/documentColor",
        ColorPresentation => "textDocument/colorPresentation",
        FoldingRange => "textDocument/foldingRange",
        FoldingRangeRefresh => "workspace/foldingRange/refresh",
        Declaration => "textDocument/declaration",
        SelectionRange => "textDocument/selectionRange",
        WorkDoneProgressCreate => "window/workDoneProgress/create",
        CallHierarchyPrepare => "textDocument/prepareCallHierarchy",
        CallHierarchyIncomingCalls => "callHierarchy/incomingCalls",
        CallHierarchyOutgoingCalls => "callHierarchy/outgoingCalls",
        SemanticTokensFull => "textDocument/semanticTokens/full",
        SemanticTokensFullDelta => "textDocument/semanticTokens/full/delta",
        SemanticTokensRange => "textDocument/semanticTokens/range",
        SemanticTokensRefresh => "workspace/semanticTokens/refresh",
        ShowDocument => "window/showDocument",
        LinkedEditingRange => "textDocument/linkedEditingRange",
        WillCreateFiles => "workspace/willCreateFiles",
        WillRenameFiles => "workspace/willRenameFiles",
        WillDeleteFiles => "workspace/willDeleteFiles",
        Moniker => "textDocument/moniker",
        TypeHierarchyPrepare => "textDocument/prepareTypeHierarchy",
        TypeHierarchySupertypes => "typeHierarchy/supertypes",
        TypeHierarchySubtypes => "typeHierarchy/subtypes",
        InlineValue => "textDocument/inlineValue",
        InlineValueRefresh => "workspace/inlineValue/refresh",
        InlayHint => "textDocument/inlayHint",
        InlayHintResolve => "inlayHint/resolve",
        InlayHintRefresh => "workspace/inlayHint/refresh",
        DocumentDiagnostic => "textDocument/diagnostic",
        WorkspaceDiagnostic => "workspace/diagnostic",
        DiagnosticRefresh => "workspace/diagnostic/refresh",
        InlineCompletion => "textDocument/inlineCompletion",
        TextDocumentContent => "workspace/textDocumentContent",
        TextDocumentContentRefresh => "workspace/textDocumentContent/refresh",
        Registration => "client/registerCapability",
        Unregistration => "client/unregisterCapability",
        Initialize => "initialize",
        Shutdown => "shutdown",
        ShowMessageRequest => "window/showMessageRequest",
        WillSaveTextDocumentWaitUntil => "textDocument/willSaveWaitUntil",
        Completion => "textDocument/completion",
        CompletionResolve => "completionItem/resolve",
        Hover => "textDocument/hover",
        SignatureHelp => "textDocument/signatureHelp",
        Definition => "textDocument/definition",
        References => "textDocument/references",
        DocumentHighlight => "textDocument/documentHighlight",
        DocumentSymbol => "textDocument/documentSymbol",
        CodeAction => "textDocument/codeAction",
        CodeActionResolve => "codeAction/resolve",
        WorkspaceSymbol => "workspace/symbol",
        WorkspaceSymbolResolve => "workspaceSymbol/resolve",
        CodeLens => "textDocument/codeLens",
        CodeLensResolve => "codeLens/resolve",
        CodeLensRefresh => "workspace/codeLens/refresh",
        DocumentLink => "textDocument/documentLink",
        DocumentLinkResolve => "documentLink/resolve",
        DocumentFormatting => "textDocument/formatting",
        DocumentRangeFormatting => "textDocument/rangeFormatting",
        DocumentRangesFormatting => "textDocument/rangesFormatting",
        DocumentOnTypeFormatting => "textDocument/onTypeFormatting",
        Rename => "textDocument/rename",
        PrepareRename => "textDocument/prepareRename",
        ExecuteCommand => "workspace/executeCommand",
        ApplyWorkspaceEdit => "workspace/applyEdit",
    }
    notifications {
        DidChangeWorkspaceFolders => "workspace/didChangeWorkspaceFolders",
        WorkDoneProgressCancel => "window/workDoneProgress/cancel",
        DidCreateFiles => "workspace/didCreateFiles",
        DidRenameFiles => "workspace/didRenameFiles",
        DidDeleteFiles => "workspace/didDeleteFiles",
        DidOpenNotebookDocument => "notebookDocument/didOpen",
        DidChangeNotebookDocument => "notebookDocument/didChange",
        DidSaveNotebookDocument => "notebookDocument/didSave",
        DidCloseNotebookDocument => "notebookDocument/didClose",
        Initialized => "initialized",
        Exit => "exit",
        DidChangeConfiguration => "workspace/didChangeConfiguration",
        ShowMessage => "window/showMessage",
        LogMessage => "window/logMessage",
        TelemetryEvent => "telemetry/event",
        DidOpenTextDocument => "textDocument/didOpen",
        DidChangeTextDocument => "textDocument/didChange",
        DidCloseTextDocument => "textDocument/didClose",
        DidSaveTextDocument => "textDocument/didSave",
        WillSaveTextDocument => "textDocument/willSave",
        DidChangeWatchedFiles => "workspace/didChangeWatchedFiles",
        PublishDiagnostics => "textDocument/publishDiagnostics",
        SetTrace => "$/setTrace",
        LogTrace => "$/logTrace",
        Cancel => "$/cancelRequest",
        Progress => "$/progress",
    }
}

impl MethodKind {
    /// Resolves a wire method name, falling back to [`MethodKind::Unknown`].
    pub fn resolve(name: &str) -> MethodKind {
        MethodRegistry::global().resolve(name)
    }

    /// Returns true for request methods.
    pub fn is_request(self) -> bool {
        self.direction() == Some(Direction::Request)
    }

    /// Returns true for notification methods.
    pub fn is_notification(self) -> bool {
        self.direction() == Some(Direction::Notification)
    }

    /// Returns true for the unknown-method sentinel.
    pub fn is_unknown(self) -> bool {
        self == MethodKind::Unknown
    }
}

impl fmt::Display for MethodKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MethodKind::Unknown => f.write_str("<unknown>"),
            known => f.write_str(known.as_str()),
        }
    }
}

/// One registered method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MethodEntry {
    /// Wire method name.
    pub name: &'static str,
    /// Method kind.
    #[serde(skip)]
    pub kind: MethodKind,
    /// Request or notification.
    pub direction: Direction,
}

/// Read-only map from wire method name to [`MethodEntry`].
#[derive(Debug)]
pub struct MethodRegistry {
    by_name: HashMap<&'static str, MethodEntry>,
    entries: Vec<MethodEntry>,
}

static REGISTRY: LazyLock<MethodRegistry> = LazyLock::new(MethodRegistry::build);

impl MethodRegistry {
    /// The process-wide registry.
    pub fn global() -> &'static MethodRegistry {
        &REGISTRY
    }

    fn build() -> Self {
        let entries: Vec<MethodEntry> = MethodKind::REQUESTS
            .iter()
            .chain(MethodKind::NOTIFICATIONS)
            .filter_map(|&kind| {
                kind.direction().map(|direction| MethodEntry {
                    name: kind.as_str(),
                    kind,
                    direction,
                })
            })
            .collect();
        let by_name = entries.iter().map(|entry| (entry.name, *entry)).collect();
        log::trace!(
            target: targets::REGISTRY,
            "method registry built with {} entries",
            entries.len()
        );
        Self { by_name, entries }
    }

    /// Looks up a wire method name.
    pub fn lookup(&self, name: &str) -> Option<&MethodEntry> {
        self.by_name.get(name)
    }

    /// Resolves a wire method name, falling back to [`MethodKind::Unknown`].
    pub fn resolve(&self, name: &str) -> MethodKind {
        match self.lookup(name) {
            Some(entry) => entry.kind,
            None => {
                log::trace!(target: targets::REGISTRY, "unregistered method `{name}`");
                MethodKind::Unknown
            }
        }
    }

    /// All entries, requests first, in registration order.
    pub fn entries(&self) -> &[MethodEntry] {
        &self.entries
    }

    /// Entries with the given direction.
    pub fn with_direction(&self, direction: Direction) -> impl Iterator<Item = &MethodEntry> {
        self.entries
            .iter()
            .filter(move |entry| entry.direction == direction)
    }

    /// Number of registered methods.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no methods are registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
