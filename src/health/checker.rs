// src/health/checker.rs
use super::{CheckResult, Reporter};
use crate::config::WorkerConfig;
use chrono::Local;
use reqwest::Client;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Running,
    Stopped,
}

/// Probes one endpoint on a fixed delay until cancelled.
pub struct HealthCheckLoop<R> {
    config: WorkerConfig,
    client: Client,
    reporter: R,
}

impl<R: Reporter> HealthCheckLoop<R> {
    pub fn new(config: WorkerConfig, reporter: R) -> Result<Self, reqwest::Error> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            config,
            client: builder.build()?,
            reporter,
        })
    }

    /// Run until `cancel` fires. Cancellation is observed before each request,
    /// while a request is in flight, and while sleeping between probes.
    pub async fn run(&self, cancel: CancellationToken) {
        info!(
            endpoint = %self.config.endpoint,
            interval = ?self.config.interval,
            "Starting health check loop"
        );

        let mut state = LoopState::Running;
        while state == LoopState::Running {
            state = self.iterate(&cancel).await;
        }

        info!("Health check loop stopped");
    }

    async fn iterate(&self, cancel: &CancellationToken) -> LoopState {
        if cancel.is_cancelled() {
            return LoopState::Stopped;
        }

        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                debug!("Cancelled while probe was in flight");
                return LoopState::Stopped;
            }
            result = self.probe() => result,
        };

        self.reporter.report(&result, Local::now());

        tokio::select! {
            biased;
            _ = cancel.cancelled() => LoopState::Stopped,
            _ = sleep(self.config.interval) => LoopState::Running,
        }
    }

    /// Issue a single GET and classify the outcome. Never fails; transport
    /// errors become `CheckResult::Error`.
    pub async fn probe(&self) -> CheckResult {
        debug!(endpoint = %self.config.endpoint, "Probing");

        match self.client.get(self.config.endpoint.clone()).send().await {
            Ok(response) => CheckResult::classify(response.status()),
            Err(e) => CheckResult::from_error(&e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;
    use reqwest::StatusCode;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    #[derive(Default)]
    struct Recorder {
        results: Mutex<Vec<CheckResult>>,
    }

    impl Reporter for Recorder {
        fn report(&self, result: &CheckResult, _checked_at: DateTime<Local>) {
            self.results.lock().unwrap().push(result.clone());
        }
    }

    fn config(endpoint: &str, interval: Duration) -> WorkerConfig {
        WorkerConfig {
            endpoint: endpoint.parse().unwrap(),
            interval,
            request_timeout: None,
        }
    }

    #[tokio::test]
    async fn test_probe_classifies_status() {
        let mut server = mockito::Server::new_async().await;
        let ok = server
            .mock("GET", "/health")
            .with_status(200)
            .create_async()
            .await;

        let recorder = Arc::new(Recorder::default());
        let checker = HealthCheckLoop::new(
            config(&format!("{}/health", server.url()), Duration::from_secs(1)),
            recorder,
        )
        .unwrap();

        assert_eq!(
            checker.probe().await,
            CheckResult::Healthy { status: StatusCode::OK }
        );
        ok.assert_async().await;
    }

    #[tokio::test]
    async fn test_request_timeout_is_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        // Accept and hold the connection without ever answering.
        let _hold = tokio::spawn(async move {
            let (_stream, _) = listener.accept().await.unwrap();
            std::future::pending::<()>().await;
        });

        let mut cfg = config(&format!("http://{}/health", addr), Duration::from_secs(1));
        cfg.request_timeout = Some(Duration::from_secs(1));
        let checker = HealthCheckLoop::new(cfg, Recorder::default()).unwrap();

        assert!(matches!(checker.probe().await, CheckResult::Error { .. }));
    }

    #[tokio::test]
    async fn test_cancel_aborts_inflight_request() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let _hold = tokio::spawn(async move {
            let (_stream, _) = listener.accept().await.unwrap();
            std::future::pending::<()>().await;
        });

        let recorder = Arc::new(Recorder::default());
        let checker = HealthCheckLoop::new(
            config(&format!("http://{}/health", addr), Duration::from_secs(60)),
            recorder.clone(),
        )
        .unwrap();

        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        tokio::spawn(async move {
            sleep(Duration::from_millis(200)).await;
            trigger.cancel();
        });

        tokio::time::timeout(Duration::from_secs(5), checker.run(cancel))
            .await
            .expect("loop should stop once cancelled");

        assert!(recorder.results.lock().unwrap().is_empty());
    }
}
