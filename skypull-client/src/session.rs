use crate::error::{ClientError, Result};
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

/// Default PDS entry point.
pub const DEFAULT_SERVICE: &str = "https://bsky.social";

/// An authenticated XRPC session.
///
/// Created once per run and shared by reference across every call; nothing
/// mutates it after login, so concurrent collectors can borrow it freely.
#[derive(Debug, Clone)]
pub struct Session {
    http: Client,
    service: String,
    access_jwt: String,
    did: String,
    handle: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateSessionResponse {
    access_jwt: String,
    did: String,
    handle: String,
}

impl Session {
    /// Logs in against `service` with an app password and returns a live
    /// session holding the access token.
    pub async fn login(service: &str, identifier: &str, password: &str) -> Result<Self> {
        let parsed = Url::parse(service)
            .map_err(|e| ClientError::InvalidUrl(format!("service URL {service}: {e}")))?;
        let service = parsed.as_str().trim_end_matches('/').to_string();

        let http = Client::builder()
            .user_agent(concat!("skypull/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .build()?;

        let nsid = "com.atproto.server.createSession";
        let response = http
            .post(format!("{service}/xrpc/{nsid}"))
            .json(&serde_json::json!({
                "identifier": identifier,
                "password": password,
            }))
            .send()
            .await?;

        let created: CreateSessionResponse = into_json(response, nsid).await?;
        info!(did = %created.did, handle = %created.handle, "session established");

        Ok(Self {
            http,
            service,
            access_jwt: created.access_jwt,
            did: created.did,
            handle: created.handle,
        })
    }

    /// DID of the logged-in account.
    pub fn did(&self) -> &str {
        &self.did
    }

    /// Handle of the logged-in account.
    pub fn handle(&self) -> &str {
        &self.handle
    }

    /// Issues an authenticated XRPC query and returns the raw JSON body.
    /// Repeated keys in `params` become repeated query parameters.
    pub(crate) async fn get(&self, nsid: &str, params: &[(&str, &str)]) -> Result<Value> {
        debug!(nsid, "xrpc query");
        let response = self
            .http
            .get(format!("{}/xrpc/{nsid}", self.service))
            .bearer_auth(&self.access_jwt)
            .query(params)
            .send()
            .await?;

        into_json(response, nsid).await
    }
}

/// Checks the XRPC status and decodes the body, folding API-level failures
/// into a typed endpoint error with whatever message the server gave us.
async fn into_json<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
    nsid: &str,
) -> Result<T> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        let message = xrpc_error_message(&body).unwrap_or(body);
        return Err(ClientError::Endpoint {
            nsid: nsid.to_string(),
            message: format!("{status}: {message}"),
        });
    }

    Ok(response.json().await?)
}

/// XRPC failures arrive as `{"error": ..., "message": ...}`.
fn xrpc_error_message(body: &str) -> Option<String> {
    #[derive(Deserialize)]
    struct XrpcError {
        error: String,
        message: Option<String>,
    }

    let parsed: XrpcError = serde_json::from_str(body).ok()?;
    Some(match parsed.message {
        Some(message) => format!("{} ({})", message, parsed.error),
        None => parsed.error,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn mock_login(server: &MockServer) -> Session {
        Mock::given(method("POST"))
            .and(path("/xrpc/com.atproto.server.createSession"))
            .and(body_partial_json(serde_json::json!({
                "identifier": "alice.test"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "accessJwt": "jwt-abc",
                "refreshJwt": "jwt-refresh",
                "did": "did:plc:alice",
                "handle": "alice.test",
            })))
            .mount(server)
            .await;

        Session::login(&server.uri(), "alice.test", "hunter2")
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn login_captures_identity() {
        let server = MockServer::start().await;
        let session = mock_login(&server).await;

        assert_eq!(session.did(), "did:plc:alice");
        assert_eq!(session.handle(), "alice.test");
    }

    #[tokio::test]
    async fn login_failure_is_an_endpoint_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/xrpc/com.atproto.server.createSession"))
            .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
                "error": "AuthenticationRequired",
                "message": "Invalid identifier or password",
            })))
            .mount(&server)
            .await;

        let err = Session::login(&server.uri(), "alice.test", "wrong")
            .await
            .unwrap_err();

        match err {
            ClientError::Endpoint { nsid, message } => {
                assert_eq!(nsid, "com.atproto.server.createSession");
                assert!(message.contains("Invalid identifier or password"));
            }
            other => panic!("expected endpoint error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn queries_carry_the_bearer_token() {
        let server = MockServer::start().await;
        let session = mock_login(&server).await;

        Mock::given(method("GET"))
            .and(path("/xrpc/com.atproto.identity.resolveHandle"))
            .and(wiremock::matchers::header("authorization", "Bearer jwt-abc"))
            .and(wiremock::matchers::query_param("handle", "bob.test"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"did": "did:plc:bob"})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let value = session
            .get("com.atproto.identity.resolveHandle", &[("handle", "bob.test")])
            .await
            .unwrap();

        assert_eq!(value["did"], "did:plc:bob");
    }
}
