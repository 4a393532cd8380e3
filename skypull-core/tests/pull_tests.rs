// End-to-end pull: starter pack seed -> membership -> expansion

use serde_json::{Value, json};
use skypull_client::error::ClientError;
use skypull_client::session::Session;
use skypull_core::pull::{PullOptions, execute_pull};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

const PACK_URL: &str = "https://bsky.app/starter-pack/alice.test/abc123";

fn options(urls: Vec<String>) -> PullOptions {
    PullOptions {
        urls,
        concurrency: 1,
        page_limit: Some(100),
        dedup_edges: false,
        show_progress_bars: false,
    }
}

async fn login(server: &MockServer) -> Session {
    Mock::given(method("POST"))
        .and(path("/xrpc/com.atproto.server.createSession"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "accessJwt": "jwt",
            "did": "did:plc:self",
            "handle": "self.test",
        })))
        .mount(server)
        .await;

    Session::login(&server.uri(), "self.test", "pw").await.unwrap()
}

/// Hydrates whatever `actors` arrive, in request order.
struct EchoProfiles;

impl Respond for EchoProfiles {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let profiles: Vec<Value> = request
            .url
            .query_pairs()
            .filter(|(key, _)| key == "actors")
            .map(|(_, handle)| {
                let name = handle.trim_end_matches(".test");
                json!({"did": format!("did:plc:{name}"), "handle": handle})
            })
            .collect();
        ResponseTemplate::new(200).set_body_json(json!({"profiles": profiles}))
    }
}

async fn mount_scenario(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/xrpc/app.bsky.graph.getStarterPack"))
        .and(query_param(
            "starterPack",
            "at://alice.test/app.bsky.starterPack/abc123",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "starterPack": {
                "uri": "at://alice.test/app.bsky.starterPack/abc123",
                "list": {"uri": "at://did:plc:alice/app.bsky.graph.list/pack"},
            }
        })))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/xrpc/app.bsky.graph.getList"))
        .and(query_param("list", "at://did:plc:alice/app.bsky.graph.list/pack"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [
                {"subject": {"did": "did:plc:bob", "handle": "bob.test"}},
                {"subject": {"did": "did:plc:carol", "handle": "carol.test"}},
            ],
        })))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/xrpc/app.bsky.actor.getProfiles"))
        .respond_with(EchoProfiles)
        .mount(server)
        .await;

    for (actor, target) in [
        ("did:plc:bob", "did:plc:dave"),
        ("did:plc:carol", "did:plc:emma"),
    ] {
        Mock::given(method("GET"))
            .and(path("/xrpc/app.bsky.graph.getFollows"))
            .and(query_param("actor", actor))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "follows": [{"did": target, "handle": format!("{target}.handle")}],
            })))
            .mount(server)
            .await;
    }
}

#[tokio::test]
async fn starter_pack_seed_produces_both_tables() {
    let server = MockServer::start().await;
    let session = login(&server).await;
    mount_scenario(&server).await;

    let tables = execute_pull(&session, options(vec![PACK_URL.to_string()]), None)
        .await
        .unwrap();

    let handles: Vec<&str> = tables.nodes.iter().map(|n| n.handle.as_str()).collect();
    assert_eq!(handles, vec!["bob.test", "carol.test"]);

    let pairs: Vec<(&str, &str)> = tables
        .edges
        .iter()
        .map(|e| (e.source.as_str(), e.target.as_str()))
        .collect();
    assert_eq!(
        pairs,
        vec![
            ("did:plc:bob", "did:plc:dave"),
            ("did:plc:carol", "did:plc:emma"),
        ]
    );
}

#[tokio::test]
async fn list_seed_resolves_the_handle_first() {
    let server = MockServer::start().await;
    let session = login(&server).await;

    Mock::given(method("GET"))
        .and(path("/xrpc/com.atproto.identity.resolveHandle"))
        .and(query_param("handle", "alice.test"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"did": "did:plc:alice"})),
        )
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/xrpc/app.bsky.graph.getList"))
        .and(query_param("list", "at://did:plc:alice/app.bsky.graph.list/friends"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [{"subject": {"did": "did:plc:bob", "handle": "bob.test"}}],
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/xrpc/app.bsky.actor.getProfiles"))
        .respond_with(EchoProfiles)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/xrpc/app.bsky.graph.getFollows"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"follows": []})))
        .mount(&server)
        .await;

    let url = "https://bsky.app/profile/alice.test/lists/friends".to_string();
    let tables = execute_pull(&session, options(vec![url]), None).await.unwrap();

    assert_eq!(tables.nodes.len(), 1);
    assert_eq!(tables.nodes[0].did, "did:plc:bob");
    assert!(tables.edges.is_empty());
}

#[tokio::test]
async fn unrecognized_seed_aborts_the_run() {
    let server = MockServer::start().await;
    let session = login(&server).await;

    let url = "https://bsky.app/profile/alice.test".to_string();
    let err = execute_pull(&session, options(vec![url]), None)
        .await
        .unwrap_err();

    assert!(matches!(err, ClientError::InvalidUrl(_)));
}

#[tokio::test]
async fn dedup_flag_collapses_repeated_observations() {
    let server = MockServer::start().await;
    let session = login(&server).await;
    mount_scenario(&server).await;

    // the same starter pack listed twice doubles every row
    let mut opts = options(vec![PACK_URL.to_string(), PACK_URL.to_string()]);
    let tables = execute_pull(&session, opts, None).await.unwrap();
    assert_eq!(tables.nodes.len(), 4);
    assert_eq!(tables.edges.len(), 4);

    opts = options(vec![PACK_URL.to_string(), PACK_URL.to_string()]);
    opts.dedup_edges = true;
    let tables = execute_pull(&session, opts, None).await.unwrap();
    assert_eq!(tables.nodes.len(), 4, "nodes stay raw");
    assert_eq!(tables.edges.len(), 2, "edges collapse");
}
