// Live refresh - Re-fetch after parameter edits settle
use crate::application::query_controller::QueryController;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::Instant;

/// Watch the controller for parameter edits and issue a fetch once no edit
/// has arrived for `debounce`. Each fetch runs in its own task; overlapping
/// fetches are ordered by the controller's request sequence.
///
/// The task ends when the controller is torn down.
pub fn spawn_live_refresh(controller: Arc<QueryController>, debounce: Duration) -> JoinHandle<()> {
    let mut rx = controller.subscribe();
    tokio::spawn(async move {
        let mut fetched_revision = rx.borrow_and_update().revision;

        loop {
            if rx.changed().await.is_err() {
                return;
            }
            let (torn_down, revision) = {
                let state = rx.borrow_and_update();
                (state.torn_down, state.revision)
            };
            if torn_down {
                return;
            }
            if revision == fetched_revision {
                continue;
            }

            // Wait for a quiet period; lifecycle updates don't reset the timer
            let mut latest_revision = revision;
            let mut deadline = Instant::now() + debounce;
            loop {
                tokio::select! {
                    _ = tokio::time::sleep_until(deadline) => break,
                    changed = rx.changed() => {
                        if changed.is_err() {
                            return;
                        }
                        let state = rx.borrow_and_update();
                        if state.torn_down {
                            return;
                        }
                        if state.revision != latest_revision {
                            latest_revision = state.revision;
                            deadline = Instant::now() + debounce;
                        }
                    }
                }
            }

            fetched_revision = latest_revision;
            tracing::debug!(revision = fetched_revision, "Parameters settled, refreshing");

            let controller = controller.clone();
            tokio::spawn(async move {
                if let Err(e) = controller.fetch().await {
                    tracing::info!("Live refresh skipped: {}", e);
                }
            });
        }
    })
}
