use crystalline::core::ConfigProvider;
use crystalline::domain::model::AuditReport;
use crystalline::{AuditEngine, BatchAuditPipeline, Kernel, LocalStorage};
use tempfile::TempDir;

struct TestConfig {
    input: String,
    output: String,
}

impl ConfigProvider for TestConfig {
    fn input_path(&self) -> &str {
        &self.input
    }

    fn output_path(&self) -> &str {
        &self.output
    }
}

#[tokio::test]
async fn test_end_to_end_audit_on_disk() {
    let temp_dir = TempDir::new().unwrap();
    let output_path = temp_dir.path().to_str().unwrap().to_string();

    let requests = serde_json::json!([
        {"id": "msg-1", "payload": "hello world"},
        {"id": "msg-2", "payload": "token REVOKED"},
        {"id": "vote-1", "payload": "ballot", "action": "governance_vote", "impact_score": 20},
        {"id": "vote-2", "payload": "ballot", "action": "governance_vote", "proof": "π(root + vote)"},
        {"id": "gate-1", "payload": "data:token-9", "predicate": "token-9"}
    ]);
    std::fs::write(
        temp_dir.path().join("requests.json"),
        serde_json::to_vec(&requests).unwrap(),
    )
    .unwrap();

    let config = TestConfig {
        input: "requests.json".to_string(),
        output: output_path.clone(),
    };
    let storage = LocalStorage::new(output_path.clone());
    let pipeline = BatchAuditPipeline::new(storage, config, Kernel::default_policy());

    let report_path = AuditEngine::new(pipeline).run().await.unwrap();
    assert!(report_path.ends_with("audit_report.json"));

    let report: AuditReport =
        serde_json::from_slice(&std::fs::read(temp_dir.path().join("audit_report.json")).unwrap())
            .unwrap();
    assert_eq!(report.records.len(), 5);
    assert_eq!(report.allowed_count(), 3);
    assert_eq!(report.forbidden_count(), 1);
    assert_eq!(report.conditional_count(), 1);
    assert_eq!(report.records[2].density, 120);

    let csv_text = std::fs::read_to_string(temp_dir.path().join("audit_report.csv")).unwrap();
    assert_eq!(csv_text.lines().count(), 6);
    assert!(csv_text.contains("msg-2,forbidden,false"));
}

#[tokio::test]
async fn test_audit_missing_input_fails() {
    let temp_dir = TempDir::new().unwrap();
    let output_path = temp_dir.path().to_str().unwrap().to_string();

    let config = TestConfig {
        input: "absent.json".to_string(),
        output: output_path.clone(),
    };
    let pipeline =
        BatchAuditPipeline::new(LocalStorage::new(output_path), config, Kernel::default_policy());

    let err = AuditEngine::new(pipeline).run().await.unwrap_err();
    assert!(matches!(err, crystalline::CrystallineError::IoError(_)));
}
