//! Per-method payload types.
//!
//! Each registered method has a marker type in [`requests`] or
//! [`notifications`] whose trait impl names the concrete params (and, for
//! requests, result) type. Methods without a modelled payload use
//! [`LspAny`].
//!
//! [`RequestParams`], [`ResponseResult`] and [`NotificationParams`] are the
//! runtime side of the same table: given a method name they decode the raw
//! payload into the one type that method carries.

use crate::catalog::{self, LspAny};
use crate::error::DecodeError;
use crate::jsonrpc::{Notification, Request, RequestId};
use crate::registry::MethodKind;
use crate::strict::{StrictDecode, decode};
use serde::Serialize;
use serde_json::Value;
use std::fmt;

/// A request method with known params and result types.
pub trait LspRequest {
    /// The method this marker stands for.
    const KIND: MethodKind;
    /// Params type.
    type Params: StrictDecode + Serialize + fmt::Debug + Clone + PartialEq;
    /// Result type.
    type Result: StrictDecode + Serialize + fmt::Debug + Clone + PartialEq;
}

/// A notification method with a known params type.
pub trait LspNotification {
    /// The method this marker stands for.
    const KIND: MethodKind;
    /// Params type.
    type Params: StrictDecode + Serialize + fmt::Debug + Clone + PartialEq;
}

fn wrong_direction(method: &str, expected: &str) -> DecodeError {
    DecodeError::InvalidMessageShape(format!("`{method}` is not a {expected} method"))
}

macro_rules! dispatch_table {
    (
        requests { $( $req:ident ( $rp:ty ) -> $rr:ty, )* }
        notifications { $( $note:ident ( $np:ty ), )* }
    ) => {
        /// Marker types for request methods.
        pub mod requests {
            #[allow(unused_imports)]
            use super::*;

            $(
                #[doc = concat!("Marker for the `", stringify!($req), "` request.")]
                #[derive(Debug)]
                pub enum $req {}

                impl LspRequest for $req {
                    const KIND: MethodKind = MethodKind::$req;
                    type Params = $rp;
                    type Result = $rr;
                }
            )*
        }

        /// Marker types for notification methods.
        pub mod notifications {
            #[allow(unused_imports)]
            use super::*;

            $(
                #[doc = concat!("Marker for the `", stringify!($note), "` notification.")]
                #[derive(Debug)]
                pub enum $note {}

                impl LspNotification for $note {
                    const KIND: MethodKind = MethodKind::$note;
                    type Params = $np;
                }
            )*
        }

        /// The decoded params of a request, one variant per request method.
        #[derive(Debug, Clone, PartialEq, Serialize)]
        #[serde(untagged)]
        pub enum RequestParams {
            $( #[doc = concat!("Params of `", stringify!($req), "`.")] $req($rp), )*
        }

        impl RequestParams {
            /// Decodes `params` as the params type registered for `method`.
            ///
            /// Fails with [`DecodeError::UnknownMethod`] for unregistered
            /// names and [`DecodeError::InvalidMessageShape`] for
            /// notification methods.
            pub fn decode(method: &str, params: &Value) -> Result<Self, DecodeError> {
                let wrap = |e: DecodeError| e.in_field("Request", "params");
                match MethodKind::resolve(method) {
                    $( MethodKind::$req => decode::<$rp>(params).map(Self::$req).map_err(wrap), )*
                    $( MethodKind::$note )|* => Err(wrong_direction(method, "request")),
                    MethodKind::Unknown => Err(DecodeError::UnknownMethod(method.to_string())),
                }
            }

            /// The method these params belong to.
            pub fn kind(&self) -> MethodKind {
                match self {
                    $( Self::$req(_) => MethodKind::$req, )*
                }
            }
        }

        /// The decoded result of a successful response, one variant per request method.
        #[derive(Debug, Clone, PartialEq, Serialize)]
        #[serde(untagged)]
        pub enum ResponseResult {
            $( #[doc = concat!("Result of `", stringify!($req), "`.")] $req($rr), )*
        }

        impl ResponseResult {
            /// Decodes `result` as the result type registered for `method`.
            pub fn decode(method: &str, result: &Value) -> Result<Self, DecodeError> {
                Self::decode_kind(MethodKind::resolve(method), result).map_err(|e| match e {
                    DecodeError::UnknownMethod(_) => DecodeError::UnknownMethod(method.to_string()),
                    other => other,
                })
            }

            /// Decodes `result` as the result type registered for `kind`.
            pub fn decode_kind(kind: MethodKind, result: &Value) -> Result<Self, DecodeError> {
                let wrap = |e: DecodeError| e.in_field("Response", "result");
                match kind {
                    $( MethodKind::$req => decode::<$rr>(result).map(Self::$req).map_err(wrap), )*
                    $( MethodKind::$note )|* => Err(wrong_direction(kind.as_str(), "request")),
                    MethodKind::Unknown => Err(DecodeError::UnknownMethod(String::new())),
                }
            }

            /// The method this result answers.
            pub fn kind(&self) -> MethodKind {
                match self {
                    $( Self::$req(_) => MethodKind::$req, )*
                }
            }
        }

        /// The decoded params of a notification, one variant per notification method.
        #[derive(Debug, Clone, PartialEq, Serialize)]
        #[serde(untagged)]
        pub enum NotificationParams {
            $( #[doc = concat!("Params of `", stringify!($note), "`.")] $note($np), )*
        }

        impl NotificationParams {
            /// Decodes `params` as the params type registered for `method`.
            pub fn decode(method: &str, params: &Value) -> Result<Self, DecodeError> {
                let wrap = |e: DecodeError| e.in_field("Notification", "params");
                match MethodKind::resolve(method) {
                    $( MethodKind::$note => decode::<$np>(params).map(Self::$note).map_err(wrap), )*
                    $( MethodKind::$req )|* => Err(wrong_direction(method, "notification")),
                    MethodKind::Unknown => Err(DecodeError::UnknownMethod(method.to_string())),
                }
            }

            /// The method these params belong to.
            pub fn kind(&self) -> MethodKind {
                match self {
                    $( Self::$note(_) => MethodKind::$note, )*
                }
            }
        }
    };
}

dispatch_table! {
    requests {
        Implementation(catalog::DefinitionParams) -> catalog::DefinitionResponse,
        TypeDefinition(catalog::DefinitionParams) -> catalog::DefinitionResponse,
        WorkspaceFolders(()) -> Option<Vec<catalog::WorkspaceFolder>>,
        Configuration(catalog::ConfigurationParams) -> Vec<LspAny>,
        DocumentColor(LspAny) -> LspAny,
        ColorPresentation(LspAny) -> LspAny,
        FoldingRange(LspAny) -> LspAny,
        FoldingRangeRefresh(()) -> (),
        Declaration(catalog::DefinitionParams) -> catalog::DefinitionResponse,
        SelectionRange(LspAny) -> LspAny,
        WorkDoneProgressCreate(catalog::WorkDoneProgressCreateParams) -> (),
        CallHierarchyPrepare(LspAny) -> LspAny,
        CallHierarchyIncomingCalls(LspAny) -> LspAny,
        CallHierarchyOutgoingCalls(LspAny) -> LspAny,
        SemanticTokensFull(LspAny) -> LspAny,
        SemanticTokensFullDelta(LspAny) -> LspAny,
        SemanticTokensRange(LspAny) -> LspAny,
        SemanticTokensRefresh(()) -> (),
        ShowDocument(LspAny) -> LspAny,
        LinkedEditingRange(LspAny) -> LspAny,
        WillCreateFiles(LspAny) -> LspAny,
        WillRenameFiles(LspAny) -> LspAny,
        WillDeleteFiles(LspAny) -> LspAny,
        Moniker(LspAny) -> LspAny,
        TypeHierarchyPrepare(LspAny) -> LspAny,
        TypeHierarchySupertypes(LspAny) -> LspAny,
        TypeHierarchySubtypes(LspAny) -> LspAny,
        InlineValue(LspAny) -> LspAny,
        InlineValueRefresh(()) -> (),
        InlayHint(LspAny) -> LspAny,
        InlayHintResolve(LspAny) -> LspAny,
        InlayHintRefresh(()) -> (),
        DocumentDiagnostic(LspAny) -> LspAny,
        WorkspaceDiagnostic(catalog::WorkspaceDiagnosticParams) -> catalog::WorkspaceDiagnosticReport,
        DiagnosticRefresh(()) -> (),
        InlineCompletion(LspAny) -> LspAny,
        TextDocumentContent(LspAny) -> LspAny,
        TextDocumentContentRefresh(LspAny) -> (),
        Registration(catalog::RegistrationParams) -> (),
        Unregistration(catalog::UnregistrationParams) -> (),
        Initialize(catalog::InitializeParams) -> catalog::InitializeResult,
        Shutdown(()) -> (),
        ShowMessageRequest(catalog::ShowMessageRequestParams) -> Option<catalog::MessageActionItem>,
        WillSaveTextDocumentWaitUntil(catalog::WillSaveTextDocumentParams) -> Option<Vec<catalog::TextEdit>>,
        Completion(LspAny) -> LspAny,
        CompletionResolve(LspAny) -> LspAny,
        Hover(catalog::HoverParams) -> Option<catalog::Hover>,
        SignatureHelp(LspAny) -> LspAny,
        Definition(catalog::DefinitionParams) -> catalog::DefinitionResponse,
        References(catalog::ReferenceParams) -> Option<Vec<catalog::Location>>,
        DocumentHighlight(catalog::DefinitionParams) -> Option<Vec<catalog::DocumentHighlight>>,
        DocumentSymbol(LspAny) -> LspAny,
        CodeAction(LspAny) -> LspAny,
        CodeActionResolve(LspAny) -> LspAny,
        WorkspaceSymbol(LspAny) -> LspAny,
        WorkspaceSymbolResolve(LspAny) -> LspAny,
        CodeLens(LspAny) -> LspAny,
        CodeLensResolve(LspAny) -> LspAny,
        CodeLensRefresh(()) -> (),
        DocumentLink(LspAny) -> LspAny,
        DocumentLinkResolve(LspAny) -> LspAny,
        DocumentFormatting(catalog::DocumentFormattingParams) -> Option<Vec<catalog::TextEdit>>,
        DocumentRangeFormatting(LspAny) -> LspAny,
        DocumentRangesFormatting(LspAny) -> LspAny,
        DocumentOnTypeFormatting(LspAny) -> LspAny,
        Rename(catalog::RenameParams) -> Option<catalog::WorkspaceEdit>,
        PrepareRename(LspAny) -> LspAny,
        ExecuteCommand(catalog::ExecuteCommandParams) -> LspAny,
        ApplyWorkspaceEdit(catalog::ApplyWorkspaceEditParams) -> catalog::ApplyWorkspaceEditResult,
    }
    notifications {
        DidChangeWorkspaceFolders(LspAny),
        WorkDoneProgressCancel(catalog::WorkDoneProgressCancelParams),
        DidCreateFiles(LspAny),
        DidRenameFiles(LspAny),
        DidDeleteFiles(LspAny),
        DidOpenNotebookDocument(LspAny),
        DidChangeNotebookDocument(LspAny),
        DidSaveNotebookDocument(LspAny),
        DidCloseNotebookDocument(LspAny),
        Initialized(catalog::InitializedParams),
        Exit(()),
        DidChangeConfiguration(catalog::DidChangeConfigurationParams),
        ShowMessage(catalog::ShowMessageParams),
        LogMessage(catalog::LogMessageParams),
        TelemetryEvent(LspAny),
        DidOpenTextDocument(catalog::DidOpenTextDocumentParams),
        DidChangeTextDocument(catalog::DidChangeTextDocumentParams),
        DidCloseTextDocument(catalog::DidCloseTextDocumentParams),
        DidSaveTextDocument(catalog::DidSaveTextDocumentParams),
        WillSaveTextDocument(catalog::WillSaveTextDocumentParams),
        DidChangeWatchedFiles(catalog::DidChangeWatchedFilesParams),
        PublishDiagnostics(catalog::PublishDiagnosticsParams),
        SetTrace(catalog::SetTraceParams),
        LogTrace(catalog::LogTraceParams),
        Cancel(catalog::CancelParams),
        Progress(catalog::ProgressParams),
    }
}

impl<P> Request<P> {
    /// Builds a request for the method `M`.
    pub fn typed<M: LspRequest<Params = P>>(id: impl Into<RequestId>, params: P) -> Self {
        Request::new(id, M::KIND.as_str(), params)
    }
}

impl<P> Notification<P> {
    /// Builds a notification for the method `M`.
    pub fn typed<M: LspNotification<Params = P>>(params: P) -> Self {
        Notification::new(M::KIND.as_str(), params)
    }
}
