use crate::core::Pipeline;
use crate::utils::error::Result;

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    /// Run extract, transform and load in order, returning the path of the
    /// primary output file. Any error here is terminal for the run.
    pub async fn run(&self) -> Result<String> {
        let data = self.pipeline.extract().await?;
        println!("Data successfully retrieved from server.");

        let result = self.pipeline.transform(data).await?;
        println!(
            "Flattened {} rows into {} columns.",
            result.primary.row_count(),
            result.primary.columns().len()
        );

        let output_path = self.pipeline.load(result).await?;
        println!("Data is prepared and ready for further processing.");

        Ok(output_path)
    }
}
