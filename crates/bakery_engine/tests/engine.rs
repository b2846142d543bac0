use std::sync::Arc;
use std::time::{Duration, Instant};

use bakery_engine::{
    ApiCall, ApiReply, ClientSettings, EngineEvent, EngineHandle, ReqwestApiClient, ROOT_SCOPE,
};
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn engine_for(server: &MockServer) -> EngineHandle {
    let client = ReqwestApiClient::new(ClientSettings {
        base_url: server.uri(),
        ..ClientSettings::default()
    })
    .expect("valid base url");
    EngineHandle::new(Arc::new(client)).expect("runtime starts")
}

async fn next_event(engine: &EngineHandle) -> EngineEvent {
    let deadline = Instant::now() + Duration::from_secs(5);
    loop {
        if let Some(event) = engine.try_recv() {
            return event;
        }
        assert!(Instant::now() < deadline, "no engine event within 5s");
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn completed_call_reports_its_reply() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/clientes"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([{"id": 1, "nome": "Ana Souza", "idade": 31}])),
        )
        .mount(&server)
        .await;

    let engine = engine_for(&server);
    engine.submit(
        9,
        3,
        ApiCall::ListCustomers {
            token: Some("tok".to_string()),
        },
    );

    match next_event(&engine).await {
        EngineEvent::Completed {
            call_id,
            scope,
            result: Ok(ApiReply::Customers(customers)),
        } => {
            assert_eq!((call_id, scope), (9, 3));
            assert_eq!(customers.len(), 1);
            assert_eq!(customers[0].name, "Ana Souza");
        }
        other => panic!("unexpected event: {other:?}"),
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn cancelling_a_scope_abandons_its_calls() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/pedidos"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([]))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let engine = engine_for(&server);
    engine.submit(1, 4, ApiCall::ListOrders { token: None });
    tokio::time::sleep(Duration::from_millis(50)).await;
    engine.cancel_scope(4);

    assert_eq!(
        next_event(&engine).await,
        EngineEvent::Cancelled {
            call_id: 1,
            scope: 4
        }
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn root_scope_is_never_cancelled() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/pedidos"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(200)))
        .mount(&server)
        .await;

    let engine = engine_for(&server);
    engine.submit(
        2,
        ROOT_SCOPE,
        ApiCall::DeleteOrder {
            id: 5,
            token: Some("tok".to_string()),
        },
    );
    engine.cancel_scope(ROOT_SCOPE);

    assert_eq!(
        next_event(&engine).await,
        EngineEvent::Completed {
            call_id: 2,
            scope: ROOT_SCOPE,
            result: Ok(ApiReply::Done),
        }
    );
}
