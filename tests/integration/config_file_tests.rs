//! Configuration file integration tests
//!
//! Configs are written to temporary files and used to connect to a local
//! mock service.

#[cfg(test)]
mod tests {
    use crate::common::service::handshake;
    use crate::common::{BlockingHarness, MockService, TOKEN};
    use odata_batch::{BatchItem, BlockingClient, ClientConfig, ExecutionMode, ODataClient};
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_connect_from_config_file() {
        let harness = BlockingHarness::start();
        let file = write_config(&format!(
            "service:\n  service_root: {}\ncredentials:\n  username: svc_user\n  password: s3cret\nsettings:\n  mode: blocking\n  timeout: 5\n",
            harness.service.root()
        ));

        let config = ClientConfig::from_file(file.path()).unwrap();
        let client = ODataClient::connect(&config).unwrap();

        assert_eq!(client.mode(), ExecutionMode::Blocking);
        assert_eq!(client.session().token(), TOKEN);
    }

    #[tokio::test]
    async fn test_invalid_config_makes_no_call() {
        let service = MockService::bare().await;
        service.mount(handshake().expect(0)).await;

        let file = write_config(&format!(
            "service:\n  service_root: {}\ncredentials:\n  username: svc_user\n  password: \"\"\n",
            service.root()
        ));
        let config = ClientConfig::from_file(file.path()).unwrap();

        let err = odata_batch::AsyncClient::connect(&config).await.unwrap_err();
        assert!(err.to_string().contains("Password"));
    }

    #[test]
    fn test_missing_service_location() {
        let file = write_config("credentials:\n  username: svc_user\n  password: s3cret\n");
        let config = ClientConfig::from_file(file.path()).unwrap();

        let err = BlockingClient::connect(&config).unwrap_err();
        assert!(err.to_string().contains("service_root"));
    }

    #[test]
    fn test_batch_items_from_yaml() {
        let yaml = r#"
- request:
    method: GET
    path: AccountCollection
    query:
      top: "1"
- changeset:
    - method: POST
      path: ContactCollection
      body: '{"FirstName":"Ada"}'
    - method: POST
      path: ContactCollection
      content_id: "7"
      body: '{"FirstName":"Grace"}'
"#;
        let items = BatchItem::list_from_yaml(yaml).unwrap();
        assert_eq!(items.len(), 2);

        let BatchItem::Changeset(changeset) = &items[1] else {
            panic!("expected a changeset");
        };
        assert_eq!(changeset.requests.len(), 2);
        assert_eq!(changeset.requests[1].content_id.as_deref(), Some("7"));
        assert_eq!(changeset.requests[0].content_type, "application/json");
    }
}
