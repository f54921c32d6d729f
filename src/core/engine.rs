use crate::core::Pipeline;
use crate::utils::error::Result;

pub struct SchedulerEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> SchedulerEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub async fn run(&self) -> Result<String> {
        tracing::info!("Starting scheduling run...");

        tracing::info!("Reading poll...");
        let matrix = self.pipeline.extract().await?;
        tracing::info!(
            "Parsed {} participants across {} slots",
            matrix.participants().len(),
            matrix.slots().len()
        );

        tracing::info!("Allocating slots...");
        let result = self.pipeline.transform(matrix).await?;
        tracing::info!(
            "Allocated {} slots, {} participants unallocated",
            result.outcome.assignments.len(),
            result.outcome.unallocated.len()
        );

        tracing::info!("Exporting schedule...");
        let output_path = self.pipeline.load(result).await?;
        tracing::info!("Output saved to: {}", output_path);

        Ok(output_path)
    }
}
