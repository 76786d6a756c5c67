//! Non-blocking client integration tests

#[cfg(test)]
mod tests {
    use crate::common::assertions::{ParsedResponseAssertions, assert_entity};
    use crate::common::fixtures::{self, BatchFactory};
    use crate::common::{MockService, TOKEN};
    use odata_batch::{AsyncClient, ExecutionMode, Execute, ODataClient, ODataError, ODataRequest};
    use serde_json::json;
    use std::time::Duration;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, ResponseTemplate};

    async fn connect(service: &MockService) -> AsyncClient {
        AsyncClient::connect(&service.config()).await.unwrap()
    }

    fn entity_mock(resource: &str, object_id: &str) -> Mock {
        Mock::given(method("GET"))
            .and(path(MockService::path(resource)))
            .and(header("x-csrf-token", TOKEN))
            .respond_with(ResponseTemplate::new(200).set_body_string(fixtures::entity(object_id)))
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_pending_response_resolves() {
        let service = MockService::start().await;
        service.mount(entity_mock("AccountCollection('1')", "1")).await;

        let client = connect(&service).await;
        let pending = client.send(&ODataRequest::get("AccountCollection('1')"));
        let value = pending.await.unwrap();

        assert_eq!(value, json!({"ObjectID": "1"}));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_calls_run_concurrently() {
        let service = MockService::start().await;
        for id in ["1", "2", "3"] {
            service
                .mount(
                    Mock::given(method("GET"))
                        .and(path(MockService::path(&format!("AccountCollection('{}')", id))))
                        .respond_with(
                            ResponseTemplate::new(200)
                                .set_body_string(fixtures::entity(id))
                                .set_delay(Duration::from_millis(200)),
                        ),
                )
                .await;
        }

        let client = connect(&service).await;
        let started = std::time::Instant::now();
        let pending: Vec<_> = ["1", "2", "3"]
            .iter()
            .map(|id| {
                client
                    .send(&ODataRequest::get(format!("AccountCollection('{}')", id)))
                    .resolve()
            })
            .collect();
        let values = futures::future::try_join_all(pending).await.unwrap();

        assert_eq!(values[2], json!({"ObjectID": "3"}));
        assert!(started.elapsed() < Duration::from_millis(550));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_batch_resolves_to_tree() {
        let service = MockService::start().await;
        service
            .mount(
                Mock::given(method("POST"))
                    .and(path(MockService::path("$batch")))
                    .respond_with(ResponseTemplate::new(202).set_body_string(
                        fixtures::batch_response(&[
                            fixtures::http_part("200 OK", &fixtures::collection(&["A1"])),
                            fixtures::changeset_part(&[
                                fixtures::http_part("201 Created", &fixtures::entity("N1")),
                                fixtures::http_part("201 Created", &fixtures::entity("N2")),
                            ]),
                        ]),
                    )),
            )
            .await;

        let client = connect(&service).await;
        let mut items = BatchFactory::read_then_changeset();
        let decoded = client.send_batch(&mut items).await.unwrap();

        assert_eq!(decoded.len(), 2);
        let created = decoded[1].expect_changeset(2);
        assert_entity(created[1].expect_leaf(), 201, "N2");
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_lazy_fields_share_one_call() {
        let service = MockService::start().await;
        service
            .mount(
                Mock::given(method("GET"))
                    .and(path(MockService::path("ContactCollection('5')")))
                    .respond_with(ResponseTemplate::new(200).set_body_string(
                        r#"{"d":{"ObjectID":"5","FirstName":"Ada","LastName":"Lovelace"}}"#,
                    ))
                    .expect(1),
            )
            .await;

        let client = connect(&service).await;
        let deferred = client
            .send(&ODataRequest::get("ContactCollection('5')"))
            .deferred();
        let first = deferred.field("FirstName");
        let last = deferred.field("LastName");

        let (first, last) = tokio::task::spawn_blocking(move || {
            (first.get().unwrap(), last.get().unwrap())
        })
        .await
        .unwrap();

        assert_eq!(first, Some(json!("Ada")));
        assert_eq!(last, Some(json!("Lovelace")));
        assert!(deferred.is_resolved());
    }

    #[tokio::test]
    async fn test_lazy_fields_resolve_on_current_thread_runtime() {
        let service = MockService::start().await;
        service
            .mount(
                Mock::given(method("GET"))
                    .and(path(MockService::path("ContactCollection('6')")))
                    .respond_with(ResponseTemplate::new(200).set_body_string(
                        r#"{"d":{"ObjectID":"6","FirstName":"Grace"}}"#,
                    ))
                    .expect(1),
            )
            .await;

        let client = connect(&service).await;
        let deferred = client
            .send(&ODataRequest::get("ContactCollection('6')"))
            .deferred();

        assert_eq!(deferred.field("FirstName").resolve().await.unwrap(), Some(json!("Grace")));
        assert_eq!(deferred.field("ObjectID").get().unwrap(), Some(json!("6")));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_cancel_before_completion() {
        let service = MockService::start().await;
        service
            .mount(
                Mock::given(method("GET"))
                    .and(path(MockService::path("AccountCollection")))
                    .respond_with(
                        ResponseTemplate::new(200)
                            .set_body_string(fixtures::collection(&[]))
                            .set_delay(Duration::from_secs(10)),
                    ),
            )
            .await;

        let client = connect(&service).await;
        let pending = client.send(&ODataRequest::get("AccountCollection"));
        pending.cancel();

        let err = pending.await.unwrap_err();
        assert!(matches!(err, ODataError::Task(_)));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_resolve_timeout() {
        let service = MockService::start().await;
        service
            .mount(
                Mock::given(method("GET"))
                    .and(path(MockService::path("AccountCollection")))
                    .respond_with(
                        ResponseTemplate::new(200)
                            .set_body_string(fixtures::collection(&[]))
                            .set_delay(Duration::from_secs(10)),
                    ),
            )
            .await;

        let client = connect(&service).await;
        let err = client
            .send(&ODataRequest::get("AccountCollection"))
            .resolve_timeout(Duration::from_millis(50))
            .await
            .unwrap_err();

        assert!(matches!(err, ODataError::Timeout(_)));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_failure_surfaces_on_resolution() {
        let service = MockService::start().await;
        service
            .mount(
                Mock::given(method("GET"))
                    .and(path(MockService::path("AccountCollection")))
                    .respond_with(ResponseTemplate::new(403)),
            )
            .await;

        let client = connect(&service).await;
        let pending = client.send(&ODataRequest::get("AccountCollection"));
        let err = pending.await.unwrap_err();

        assert!(err.is_transport_error());
        assert_eq!(err.status(), Some(403));
    }

    #[test]
    fn test_owned_runtime_client_waits_from_sync_code() {
        let rt = tokio::runtime::Runtime::new().unwrap();
        let service = rt.block_on(MockService::start());
        rt.block_on(service.mount(entity_mock("AccountCollection('8')", "8")));

        let client = ODataClient::connect(&service.config_with_mode(ExecutionMode::NonBlocking)).unwrap();
        let value = client
            .send_and_wait(&ODataRequest::get("AccountCollection('8')"))
            .unwrap();
        assert_eq!(value, json!({"ObjectID": "8"}));

        let pending = client
            .as_non_blocking()
            .unwrap()
            .send(&ODataRequest::get("AccountCollection('8')"));
        assert_eq!(
            pending.wait_timeout(Duration::from_secs(5)).unwrap(),
            json!({"ObjectID": "8"})
        );
    }
}
