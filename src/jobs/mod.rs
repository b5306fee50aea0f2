use crate::context::AppContext;
use crate::store::Action;
use tokio::task::JoinHandle;
use tokio::time::{interval, Duration};
use tracing::{debug, error, info};

pub mod tasks;

/// Polls the SDK until every freshly published file has reached the reflector
pub struct ReflectorWatcher {
    context: AppContext,
}

impl ReflectorWatcher {
    pub fn new(context: AppContext) -> Self {
        Self { context }
    }

    /// Start the polling loop.
    ///
    /// Returns `None` when a loop is already running; a single check pass is
    /// still made so the caller sees fresh progress.
    pub async fn start(&self) -> Option<JoinHandle<()>> {
        let started = self
            .context
            .store
            .dispatch_when(
                |s| !s.claims.checking_reflector,
                Action::ToggleCheckingReflecting(true),
            )
            .await;

        if !started {
            debug!("Reflector check already running");
            if let Err(e) = tasks::check_reflecting_files(&self.context).await {
                error!("Failed to check reflecting files: {}", e);
            }
            return None;
        }

        info!("Starting reflector check");
        let context = self.context.clone();
        Some(tokio::spawn(Self::reflector_check_job(context)))
    }

    /// Check now, then every poll interval until nothing is reflecting
    async fn reflector_check_job(context: AppContext) {
        let period = Duration::from_secs(context.config.reflector.poll_interval_secs);
        let mut interval = interval(period);

        loop {
            // First tick completes immediately
            interval.tick().await;

            match tasks::check_reflecting_files(&context).await {
                Ok(0) => {
                    info!("All published files reached the reflector");
                    break;
                }
                Ok(remaining) => debug!("{} file(s) still reflecting", remaining),
                Err(e) => error!("Failed to check reflecting files: {}", e),
            }
        }
    }
}
