//! # Configuration Flows
//!
//! Verifier settings loaded from a TOML file drive deadline budgeting.

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::time::Duration;

    use dht_01_record_verification::test_utils::{ScriptedDht, ScriptedPeerQuery};
    use dht_01_record_verification::{
        ConfigError, ConfigProvider, OperationContext, RecordVerificationApi, TomlConfigProvider,
        VerificationMode,
    };
    use shared_crypto::Keypair;

    use crate::fixtures::{value_record, Node};

    fn write_config(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[tokio::test(start_paused = true)]
    async fn test_file_fraction_sets_direct_peer_budget() {
        let file = write_config(
            r#"
            [verification]
            direct_peer_query_fraction = 0.5
            max_record_age_secs = 3600
            "#,
        );
        let config = TomlConfigProvider::from_file(file.path())
            .unwrap()
            .load()
            .unwrap();
        assert_eq!(config.max_record_age, Duration::from_secs(3600));

        let author = Keypair::generate_ed25519();
        let node = Node::with_config(
            ScriptedPeerQuery::new().hanging(),
            ScriptedDht::new().publishing(&author.public()),
            config,
        );

        let ctx = OperationContext::background().with_timeout(Duration::from_secs(8));
        node.service
            .verify(&ctx, &value_record(&author, "k", b"v"), VerificationMode::Online)
            .await
            .unwrap();

        assert_eq!(node.peers.observed_budgets(), vec![Some(Duration::from_secs(4))]);
        assert_eq!(node.dht.calls(), 1);
    }

    #[test]
    fn test_out_of_range_fraction_rejected() {
        let file = write_config("[verification]\ndirect_peer_query_fraction = 1.5\n");
        let result = TomlConfigProvider::from_file(file.path()).and_then(|p| p.load());
        assert_eq!(result.unwrap_err(), ConfigError::InvalidFraction(1.5));
    }

    #[test]
    fn test_missing_file_reported() {
        let dir = tempfile::tempdir().unwrap();
        let err = TomlConfigProvider::from_file(dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Load(msg) if msg.contains("absent.toml")));
    }
}
