//! Typed client for the NarrativeService API.
//!
//! [`NarrativeServiceClient`] exposes one method per remote operation and
//! delegates every wire concern to [`crate::rpc::JsonRpcCaller`]. Each
//! method wraps its parameter record as a one-element positional argument
//! list and unwraps the single result value; the payloads themselves pass
//! through untouched. Dispatch is table driven: a per-operation
//! `MethodSpec` holds the remote name and the result-arity flags, and one
//! generic `invoke` does the rest.

pub mod types;

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use log::debug;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use url::Url;

use crate::auth::AuthToken;
use crate::rpc::{JsonRpcCaller, RpcContext, RpcError};

pub use types::{
    CopyNarrativeOutput, CopyNarrativeParams, CopyObjectOutput, CopyObjectParams,
    CreateNewNarrativeOutput, CreateNewNarrativeParams, FindObjectReportOutput,
    FindObjectReportParams, ListAvailableTypesOutput, ListAvailableTypesParams,
    ListNarratorialParams, ListNarrativeParams, ListObjectsWithSetsOutput,
    ListObjectsWithSetsParams, Narratorial, NarratorialList, NarrativeEntry, NarrativeList,
    ObjectListItem, RemoveNarratorialParams, RemoveNarratorialResult, SetNarratorialParams,
    SetNarratorialResult,
};

/// Module prefix of every remote method name.
const SERVICE_MODULE: &str = "NarrativeService";

/// Per-operation dispatch entry.
#[derive(Debug, Clone, Copy)]
struct MethodSpec {
    name: &'static str,
    expect_result: bool,
    allow_absent_result: bool,
}

impl MethodSpec {
    const fn required(name: &'static str) -> Self {
        Self {
            name,
            expect_result: true,
            allow_absent_result: false,
        }
    }

    /// Some deployed service revisions answer these with an empty body.
    const fn result_optional(name: &'static str) -> Self {
        Self {
            name,
            expect_result: true,
            allow_absent_result: true,
        }
    }
}

const LIST_OBJECTS_WITH_SETS: MethodSpec = MethodSpec::required("list_objects_with_sets");
const COPY_NARRATIVE: MethodSpec = MethodSpec::required("copy_narrative");
const CREATE_NEW_NARRATIVE: MethodSpec = MethodSpec::required("create_new_narrative");
const COPY_OBJECT: MethodSpec = MethodSpec::required("copy_object");
const LIST_AVAILABLE_TYPES: MethodSpec = MethodSpec::required("list_available_types");
const LIST_NARRATORIALS: MethodSpec = MethodSpec::result_optional("list_narratorials");
const LIST_NARRATIVES: MethodSpec = MethodSpec::result_optional("list_narratives");
const SET_NARRATORIAL: MethodSpec = MethodSpec::required("set_narratorial");
const REMOVE_NARRATORIAL: MethodSpec = MethodSpec::required("remove_narratorial");
const FIND_OBJECT_REPORT: MethodSpec = MethodSpec::required("find_object_report");
const STATUS: MethodSpec = MethodSpec::result_optional("status");

/// Client for the NarrativeService API.
///
/// Wraps a [`JsonRpcCaller`] and adds the typed per-operation surface plus
/// an optional service version pin that is threaded through every call.
///
/// Calls only need `&self` and are safe to issue concurrently from multiple
/// tasks; reconfiguration (timeouts, trust policy, version pin) takes
/// `&mut self` and therefore exclusive access.
///
/// # Example
///
/// ```rust,no_run
/// use narrative_service_client::{NarrativeServiceClient, types::CopyNarrativeParams};
/// use url::Url;
///
/// # async fn example() -> Result<(), narrative_service_client::RpcError> {
/// let client = NarrativeServiceClient::new(
///     Url::parse("https://example.org/services/narrative").unwrap(),
/// );
///
/// let copied = client
///     .copy_narrative(
///         CopyNarrativeParams {
///             workspace_name: Some("my_workspace".into()),
///             narrative_id: Some(42),
///             ..Default::default()
///         },
///         None,
///     )
///     .await?;
/// println!("copy lives in narrative {}", copied.new_narrative_id);
/// # Ok(())
/// # }
/// ```
pub struct NarrativeServiceClient {
    caller: JsonRpcCaller,
    service_version: Option<String>,
}

impl NarrativeServiceClient {
    /// Creates an anonymous client for the given service URL.
    pub fn new(url: Url) -> Self {
        Self {
            caller: JsonRpcCaller::new(url),
            service_version: None,
        }
    }

    /// Creates a client that authenticates every call with the given token.
    pub fn with_token(url: Url, token: AuthToken) -> Self {
        Self {
            caller: JsonRpcCaller::with_token(url, token),
            service_version: None,
        }
    }

    /// Creates a client by exchanging a username and password for a token
    /// against the default authorization endpoint. The exchange validates
    /// the credentials up front.
    pub async fn login(url: Url, user: &str, password: &str) -> Result<Self, RpcError> {
        Ok(Self {
            caller: JsonRpcCaller::login(url, user, password).await?,
            service_version: None,
        })
    }

    /// Like [`login`](Self::login), but against a custom authorization
    /// endpoint.
    pub async fn login_with_auth_url(
        url: Url,
        user: &str,
        password: &str,
        auth_url: &Url,
    ) -> Result<Self, RpcError> {
        Ok(Self {
            caller: JsonRpcCaller::login_with_auth_url(url, user, password, auth_url).await?,
            service_version: None,
        })
    }

    /// The URL of the service this client communicates with.
    pub fn url(&self) -> &Url {
        self.caller.url()
    }

    /// The token this client authenticates with, if any.
    pub fn token(&self) -> Option<&AuthToken> {
        self.caller.token()
    }

    /// Sets the timeout between dispatching a request and receiving the
    /// response. `None` or a zero duration means no timeout.
    pub fn set_read_timeout(&mut self, timeout: Option<Duration>) {
        self.caller.set_read_timeout(timeout);
    }

    /// Whether credentials may be sent over plain `http` (vs `https`).
    pub fn is_insecure_http_allowed(&self) -> bool {
        self.caller.is_insecure_http_allowed()
    }

    /// Allows or disallows sending credentials over plain `http`.
    /// Default false.
    pub fn set_insecure_http_allowed(&mut self, allowed: bool) {
        self.caller.set_insecure_http_allowed(allowed);
    }

    #[deprecated(note = "use `is_insecure_http_allowed`")]
    pub fn is_auth_allowed_for_http(&self) -> bool {
        self.is_insecure_http_allowed()
    }

    #[deprecated(note = "use `set_insecure_http_allowed`")]
    pub fn set_auth_allowed_for_http(&mut self, allowed: bool) {
        self.set_insecure_http_allowed(allowed);
    }

    /// Whether all TLS certificates, including self-signed ones, are
    /// trusted.
    pub fn is_all_certificates_trusted(&self) -> bool {
        self.caller.is_all_certificates_trusted()
    }

    /// Trusts or distrusts all TLS certificates. Default false.
    pub fn set_all_certificates_trusted(&mut self, trust_all: bool) {
        self.caller.set_all_certificates_trusted(trust_all);
    }

    /// Whether request bodies are staged to disk and streamed in chunks.
    pub fn is_streaming_mode_on(&self) -> bool {
        self.caller.is_streaming_mode_on()
    }

    /// Switches streaming of request bodies on or off. Not every deployment
    /// supports chunked requests. Default off.
    pub fn set_streaming_mode_on(&mut self, on: bool) {
        self.caller.set_streaming_mode_on(on);
    }

    /// The pinned service revision, if any.
    pub fn service_version(&self) -> Option<&str> {
        self.service_version.as_deref()
    }

    /// Pins every subsequent call to a specific deployed service revision.
    /// `None` selects the default revision.
    pub fn set_service_version(&mut self, version: Option<String>) {
        self.service_version = version;
    }

    /// Arms a one-shot capture of the next raw response body into `path`.
    pub fn set_file_for_next_rpc_response(&self, path: impl Into<PathBuf>) {
        self.caller.set_file_for_next_rpc_response(path);
    }

    /// Lists the objects in one or more workspaces, set members included.
    pub async fn list_objects_with_sets(
        &self,
        params: ListObjectsWithSetsParams,
        context: Option<&RpcContext>,
    ) -> Result<ListObjectsWithSetsOutput, RpcError> {
        self.invoke(&LIST_OBJECTS_WITH_SETS, std::slice::from_ref(&params), context)
            .await
    }

    /// Copies a narrative, and the workspace holding it, for the calling
    /// user.
    pub async fn copy_narrative(
        &self,
        params: CopyNarrativeParams,
        context: Option<&RpcContext>,
    ) -> Result<CopyNarrativeOutput, RpcError> {
        self.invoke(&COPY_NARRATIVE, std::slice::from_ref(&params), context)
            .await
    }

    /// Creates a fresh narrative, optionally seeded with an app, markdown
    /// cell or imported data.
    pub async fn create_new_narrative(
        &self,
        params: CreateNewNarrativeParams,
        context: Option<&RpcContext>,
    ) -> Result<CreateNewNarrativeOutput, RpcError> {
        self.invoke(&CREATE_NEW_NARRATIVE, std::slice::from_ref(&params), context)
            .await
    }

    /// Copies a single object into a target workspace.
    pub async fn copy_object(
        &self,
        params: CopyObjectParams,
        context: Option<&RpcContext>,
    ) -> Result<CopyObjectOutput, RpcError> {
        self.invoke(&COPY_OBJECT, std::slice::from_ref(&params), context)
            .await
    }

    /// Counts the object types visible in the given workspaces.
    pub async fn list_available_types(
        &self,
        params: ListAvailableTypesParams,
        context: Option<&RpcContext>,
    ) -> Result<ListAvailableTypesOutput, RpcError> {
        self.invoke(&LIST_AVAILABLE_TYPES, std::slice::from_ref(&params), context)
            .await
    }

    /// Lists all narratorials.
    pub async fn list_narratorials(
        &self,
        params: ListNarratorialParams,
        context: Option<&RpcContext>,
    ) -> Result<NarratorialList, RpcError> {
        self.invoke(&LIST_NARRATORIALS, std::slice::from_ref(&params), context)
            .await
    }

    /// Lists the narratives visible to the caller, optionally filtered to
    /// `mine`, `public` or `shared`.
    pub async fn list_narratives(
        &self,
        params: ListNarrativeParams,
        context: Option<&RpcContext>,
    ) -> Result<NarrativeList, RpcError> {
        self.invoke(&LIST_NARRATIVES, std::slice::from_ref(&params), context)
            .await
    }

    /// Promotes a workspace the caller owns to a narratorial. The workspace
    /// may be named by name or by numeric id.
    pub async fn set_narratorial(
        &self,
        params: SetNarratorialParams,
        context: Option<&RpcContext>,
    ) -> Result<SetNarratorialResult, RpcError> {
        self.invoke(&SET_NARRATORIAL, std::slice::from_ref(&params), context)
            .await
    }

    /// Removes the narratorial designation from a workspace.
    pub async fn remove_narratorial(
        &self,
        params: RemoveNarratorialParams,
        context: Option<&RpcContext>,
    ) -> Result<RemoveNarratorialResult, RpcError> {
        self.invoke(&REMOVE_NARRATORIAL, std::slice::from_ref(&params), context)
            .await
    }

    /// Finds the report that references an object, walking up the reference
    /// chain. For copied objects the search continues from the copy source
    /// when it is accessible; the result then names the object the reports
    /// actually reference, or flags the source as inaccessible.
    pub async fn find_object_report(
        &self,
        params: FindObjectReportParams,
        context: Option<&RpcContext>,
    ) -> Result<FindObjectReportOutput, RpcError> {
        self.invoke(&FIND_OBJECT_REPORT, std::slice::from_ref(&params), context)
            .await
    }

    /// Probes the service. Returns whatever status mapping the deployed
    /// revision reports; older revisions answer with an empty body, which
    /// yields an empty mapping.
    pub async fn status(
        &self,
        context: Option<&RpcContext>,
    ) -> Result<HashMap<String, Value>, RpcError> {
        let no_params: [Value; 0] = [];
        self.invoke(&STATUS, &no_params, context).await
    }

    /// Dispatches one operation: qualifies the method name, forwards the
    /// positional arguments and flags, and unwraps the first element of the
    /// result sequence (or the record's default when an absent payload was
    /// tolerated).
    async fn invoke<P, R>(
        &self,
        spec: &MethodSpec,
        params: &P,
        context: Option<&RpcContext>,
    ) -> Result<R, RpcError>
    where
        P: Serialize + ?Sized,
        R: DeserializeOwned + Default,
    {
        let method = format!("{SERVICE_MODULE}.{}", spec.name);
        debug!(method = &*method; "RPC: invoking service method");
        let result: Option<Vec<R>> = self
            .caller
            .call(
                &method,
                params,
                spec.expect_result,
                spec.allow_absent_result,
                context,
                self.service_version.as_deref(),
            )
            .await?;
        match result {
            Some(values) => values.into_iter().next().ok_or_else(|| {
                RpcError::Protocol(format!("{method} returned an empty result sequence"))
            }),
            None => Ok(R::default()),
        }
    }
}
