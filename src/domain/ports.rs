use crate::domain::model::{AuditReport, AuditRequest};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn input_path(&self) -> &str;
    fn output_path(&self) -> &str;
}

#[async_trait]
pub trait AuditPipeline: Send + Sync {
    async fn extract(&self) -> Result<Vec<AuditRequest>>;
    async fn evaluate(&self, requests: Vec<AuditRequest>) -> Result<AuditReport>;
    async fn load(&self, report: AuditReport) -> Result<String>;
}
