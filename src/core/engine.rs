use crate::core::Pipeline;
use crate::domain::model::AnalysisReport;
use crate::utils::error::Result;
use crate::utils::monitor::SystemMonitor;

#[derive(Debug)]
pub struct RunOutput {
    pub report: AnalysisReport,
    /// `None` when report writing is disabled.
    pub output_path: Option<String>,
}

pub struct AnalysisEngine<P: Pipeline> {
    pipeline: P,
    monitor: SystemMonitor,
}

impl<P: Pipeline> AnalysisEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self::new_with_monitoring(pipeline, false)
    }

    pub fn new_with_monitoring(pipeline: P, monitor_enabled: bool) -> Self {
        Self {
            pipeline,
            monitor: SystemMonitor::new(monitor_enabled),
        }
    }

    pub async fn run(&self) -> Result<RunOutput> {
        tracing::info!("🚀 Starting token savings analysis");
        self.monitor.log_phase("Start");

        // Extract
        tracing::info!("📥 Loading dataset...");
        let record = self.pipeline.extract().await?;
        self.monitor.log_phase("Extract");

        // Transform
        tracing::info!("🔄 Comparing encodings...");
        let report = self.pipeline.transform(record).await?;
        tracing::info!("📊 Projected {} models", report.projections.len());
        self.monitor.log_phase("Transform");

        // Load
        let output_path = self.pipeline.load(&report).await?;
        if let Some(path) = &output_path {
            tracing::info!("📁 Report saved to: {}", path);
        }
        self.monitor.log_phase("Load");
        self.monitor.log_final_stats();

        Ok(RunOutput {
            report,
            output_path,
        })
    }
}
