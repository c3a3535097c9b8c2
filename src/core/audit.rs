use crate::domain::ports::AuditPipeline;
use crate::utils::error::Result;

pub struct AuditEngine<P: AuditPipeline> {
    pipeline: P,
}

impl<P: AuditPipeline> AuditEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub async fn run(&self) -> Result<String> {
        tracing::info!("Starting audit");

        let requests = self.pipeline.extract().await?;
        tracing::info!("Loaded {} requests", requests.len());

        let report = self.pipeline.evaluate(requests).await?;
        tracing::info!(
            "Evaluated: {} allowed, {} forbidden, {} conditional",
            report.allowed_count(),
            report.forbidden_count(),
            report.conditional_count()
        );

        let output_path = self.pipeline.load(report).await?;
        tracing::info!("Report saved to: {}", output_path);

        Ok(output_path)
    }
}
