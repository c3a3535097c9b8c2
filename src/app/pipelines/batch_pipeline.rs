use crate::core::kernel::Kernel;
use crate::domain::model::{AuditReport, AuditRequest};
use crate::domain::ports::{AuditPipeline, ConfigProvider, Storage};
use crate::utils::error::{CrystallineError, Result};

pub const REPORT_JSON: &str = "audit_report.json";
pub const REPORT_CSV: &str = "audit_report.csv";

/// Reads a JSON array of requests, evaluates each one and writes JSON + CSV reports.
pub struct BatchAuditPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
    kernel: Kernel,
}

impl<S: Storage, C: ConfigProvider> BatchAuditPipeline<S, C> {
    pub fn new(storage: S, config: C, kernel: Kernel) -> Self {
        Self {
            storage,
            config,
            kernel,
        }
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> AuditPipeline for BatchAuditPipeline<S, C> {
    async fn extract(&self) -> Result<Vec<AuditRequest>> {
        tracing::debug!("Reading audit requests from: {}", self.config.input_path());
        let raw = self.storage.read_file(self.config.input_path()).await?;
        let requests: Vec<AuditRequest> = serde_json::from_slice(&raw)?;
        Ok(requests)
    }

    async fn evaluate(&self, requests: Vec<AuditRequest>) -> Result<AuditReport> {
        let records = requests
            .iter()
            .map(|request| {
                let record = self.kernel.evaluate(request);
                tracing::debug!("{} -> {} ({})", record.id, record.partition, record.reason);
                record
            })
            .collect();

        Ok(AuditReport {
            kernel_version: self.kernel.version.clone(),
            generated_at: chrono::Utc::now(),
            records,
        })
    }

    async fn load(&self, report: AuditReport) -> Result<String> {
        let json = serde_json::to_vec_pretty(&report)?;
        self.storage.write_file(REPORT_JSON, &json).await?;

        let mut writer = csv::Writer::from_writer(Vec::new());
        for record in &report.records {
            writer.serialize(record)?;
        }
        let csv_data = writer
            .into_inner()
            .map_err(|e| CrystallineError::IoError(e.into_error()))?;
        self.storage.write_file(REPORT_CSV, &csv_data).await?;

        tracing::debug!("Wrote {} records to {}", report.records.len(), REPORT_CSV);
        Ok(format!("{}/{}", self.config.output_path(), REPORT_JSON))
    }
}
