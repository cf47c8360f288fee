use crate::core::{MeetingRequest, Pipeline};
use crate::utils::error::Result;
use crate::utils::monitor::SystemMonitor;
use std::sync::Arc;

#[derive(Clone)]
pub struct PrepEngine {
    pipeline: Arc<dyn Pipeline>,
    monitor: Arc<SystemMonitor>,
}

impl PrepEngine {
    pub fn new(pipeline: Arc<dyn Pipeline>) -> Self {
        Self::new_with_monitoring(pipeline, false)
    }

    pub fn new_with_monitoring(pipeline: Arc<dyn Pipeline>, monitor_enabled: bool) -> Self {
        Self {
            pipeline,
            monitor: Arc::new(SystemMonitor::new(monitor_enabled)),
        }
    }

    pub fn monitoring_enabled(&self) -> bool {
        self.monitor.is_enabled()
    }

    /// 執行 extract → transform → load，回傳簡報內容
    pub async fn run(&self, request: &MeetingRequest) -> Result<String> {
        let timer = self.monitor.start_run();
        tracing::info!(
            "🚀 Starting meeting prep #{}: {}",
            timer.run_id,
            request.objective.trim()
        );

        let research = self.pipeline.extract(request).await?;
        tracing::info!(
            "📥 Research collected: {} participants, {} search results, {} pages",
            research.participants.len(),
            research.total_results(),
            research.contents.len()
        );
        self.monitor.log_phase(&timer, "Research");

        let briefing = self.pipeline.transform(request, research).await?;
        tracing::info!(
            "🔄 Briefing assembled: {} sections, {} sources",
            briefing.sections.len(),
            briefing.sources.len()
        );
        self.monitor.log_phase(&timer, "Briefing");

        let output = self.pipeline.load(briefing).await?;
        tracing::info!(
            "✅ Meeting prep #{} completed in {:?}",
            timer.run_id,
            timer.elapsed()
        );
        self.monitor.finish_run(&timer);

        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Briefing, ResearchBundle};
    use crate::utils::error::PrepError;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingPipeline {
        phases: Mutex<Vec<&'static str>>,
        fail_extract: bool,
    }

    #[async_trait::async_trait]
    impl Pipeline for RecordingPipeline {
        async fn extract(&self, _request: &MeetingRequest) -> Result<ResearchBundle> {
            self.phases.lock().unwrap().push("extract");
            if self.fail_extract {
                return Err(PrepError::Validation {
                    message: "no participants".to_string(),
                });
            }
            Ok(ResearchBundle::default())
        }

        async fn transform(
            &self,
            request: &MeetingRequest,
            _research: ResearchBundle,
        ) -> Result<Briefing> {
            self.phases.lock().unwrap().push("transform");
            Ok(Briefing {
                objective: request.objective.clone(),
                context: request.context.clone(),
                sections: Vec::new(),
                sources: Vec::new(),
                generated_at: chrono::Utc::now(),
            })
        }

        async fn load(&self, briefing: Briefing) -> Result<String> {
            self.phases.lock().unwrap().push("load");
            Ok(format!("briefing for {}", briefing.objective))
        }
    }

    #[tokio::test]
    async fn test_run_executes_phases_in_order() {
        let pipeline = Arc::new(RecordingPipeline::default());
        let engine = PrepEngine::new(pipeline.clone());

        let output = engine
            .run(&MeetingRequest::new("Alice", "payments", "renewal"))
            .await
            .unwrap();

        assert_eq!(output, "briefing for renewal");
        assert_eq!(
            *pipeline.phases.lock().unwrap(),
            vec!["extract", "transform", "load"]
        );
        assert!(!engine.monitoring_enabled());
    }

    #[tokio::test]
    async fn test_run_stops_after_failed_extract() {
        let pipeline = Arc::new(RecordingPipeline {
            fail_extract: true,
            ..Default::default()
        });
        let engine = PrepEngine::new(pipeline.clone());

        let result = engine
            .run(&MeetingRequest::new("", "payments", "renewal"))
            .await;

        assert!(matches!(result, Err(PrepError::Validation { .. })));
        assert_eq!(*pipeline.phases.lock().unwrap(), vec!["extract"]);
    }
}
