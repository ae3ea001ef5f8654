//! Watch-driven scheduling loop
//!
//! Mirrors pods and nodes from the apiserver into a [`ClusterSnapshot`],
//! queues pending pods and runs a scheduling cycle for each. The resulting
//! ranking is logged and kept per pod, nothing is bound.

use std::sync::Arc;

use dashmap::{DashMap, DashSet};
use reqwest::Client;
use shared::api::{EventType, NodeEvent, PodEvent};
use shared::models::Pod;
use shared::utils::watch_stream;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use uuid::Uuid;

use crate::cluster::{ClusterSnapshot, ClusterStateReader};
use crate::config::{Config, ConfigError};
use crate::framework::{CycleOutcome, SchedulingCycle};
use crate::plugins::custom_scheduler::{CustomScheduler, GROUP_NAME_LABEL};

pub struct Scheduler {
    snapshot: Arc<ClusterSnapshot>,
    plugin: CustomScheduler,
    tx: mpsc::Sender<Uuid>,
    /// Pods waiting in the queue, so a pod is queued at most once
    queued: DashSet<Uuid>,
    client: Client,
    pods_uri: String,
    nodes_uri: String,
    /// Latest cycle outcome per pod
    outcomes: DashMap<Uuid, CycleOutcome>,
}

impl Scheduler {
    pub fn new(config: &Config) -> Result<(Arc<Self>, mpsc::Receiver<Uuid>), ConfigError> {
        let args = config.load_plugin_args()?;
        let snapshot = ClusterSnapshot::new();
        let plugin = CustomScheduler::new(args.as_deref(), snapshot.clone())?;
        let (tx, rx) = mpsc::channel::<Uuid>(config.queue_size);
        Ok((
            Arc::new(Self {
                snapshot,
                plugin,
                tx,
                queued: DashSet::new(),
                client: Client::new(),
                pods_uri: format!("{}/pods?watch=true", config.apiserver),
                nodes_uri: format!("{}/nodes?watch=true", config.apiserver),
                outcomes: DashMap::new(),
            }),
            rx,
        ))
    }

    pub async fn run(self: Arc<Self>, mut rx: mpsc::Receiver<Uuid>) {
        tracing::debug!("Running");
        let _ = tokio::try_join!(
            // Watch nodes
            {
                let sched = self.clone();
                tokio::spawn(async move { sched.watch_nodes().await })
            },
            // Watch pods
            {
                let sched = self.clone();
                tokio::spawn(async move { sched.watch_pods().await })
            },
            // Pull jobs and run cycles
            {
                let sched = self.clone();
                tokio::spawn(async move {
                    while let Some(pod_id) = rx.recv().await {
                        sched.schedule(pod_id);
                    }
                })
            }
        );
    }

    async fn watch_nodes(&self) {
        if let Err(error) =
            watch_stream(&self.client, &self.nodes_uri, |event| self.handle_node_event(event)).await
        {
            tracing::error!(%error, uri=%self.nodes_uri, "Node watch failed");
        }
    }

    async fn watch_pods(&self) {
        if let Err(error) =
            watch_stream(&self.client, &self.pods_uri, |event| self.handle_pod_event(event)).await
        {
            tracing::error!(%error, uri=%self.pods_uri, "Pod watch failed");
        }
    }

    pub fn outcome(&self, id: &Uuid) -> Option<CycleOutcome> {
        self.outcomes.get(id).map(|o| o.clone())
    }

    /// Runs one cycle for the pod against every ready node.
    pub fn schedule(&self, id: Uuid) -> Option<CycleOutcome> {
        self.queued.remove(&id);
        let Some(pod) = self.snapshot.pod(&id) else {
            tracing::warn!(%id, "Pod not found in snapshot");
            return None;
        };
        if !pod.is_pending() {
            tracing::debug!(pod=%pod.metadata.name, "Pod already bound, skipping");
            return None;
        }

        let candidates = self.snapshot.ready_nodes();
        let outcome = SchedulingCycle::new(&self.plugin, &pod, candidates).execute();

        match (&outcome, outcome.best()) {
            (CycleOutcome::Ranked(_), Some(best)) => {
                tracing::info!(pod=%pod.metadata.name, node=%best.name, score=best.score, "Ranked")
            }
            (CycleOutcome::Ranked(_), None) => {
                tracing::warn!(pod=%pod.metadata.name, "No nodes to rank")
            }
            (CycleOutcome::Rejected(status), _) => {
                tracing::debug!(pod=%pod.metadata.name, %status, "Pod not admitted yet")
            }
            (CycleOutcome::Failed(status), _) => {
                tracing::error!(pod=%pod.metadata.name, %status, "Scheduling cycle failed")
            }
        }

        self.outcomes.insert(id, outcome.clone());
        Some(outcome)
    }

    fn enqueue(&self, id: Uuid) {
        if !self.queued.insert(id) {
            tracing::trace!(%id, "Pod already queued");
            return;
        }
        match self.tx.try_send(id) {
            Ok(()) => {}
            Err(TrySendError::Full(id)) => match tokio::runtime::Handle::try_current() {
                // Wait for room off the watch task instead of dropping the pod
                Ok(handle) => {
                    let tx = self.tx.clone();
                    handle.spawn(async move {
                        if let Err(error) = tx.send(id).await {
                            tracing::warn!(%id, %error, "Could not queue pod");
                        }
                    });
                }
                Err(error) => {
                    self.queued.remove(&id);
                    tracing::warn!(%id, %error, "Queue full, pod not queued");
                }
            },
            Err(TrySendError::Closed(id)) => {
                self.queued.remove(&id);
                tracing::warn!(%id, "Queue closed, pod not queued");
            }
        }
    }

    fn handle_pod_event(&self, event: PodEvent) {
        self.snapshot.apply_pod_event(&event);
        match event.event_type {
            EventType::Added | EventType::Modified if event.pod.is_pending() => {
                self.enqueue(event.pod.metadata.id);
                if event.event_type == EventType::Added {
                    self.requeue_group(&event.pod);
                }
            }
            EventType::Deleted => {
                self.queued.remove(&event.pod.metadata.id);
                self.outcomes.remove(&event.pod.metadata.id);
            }
            _ => {}
        }
    }

    /// A new group member may complete the quorum of pods waiting on it.
    fn requeue_group(&self, pod: &Pod) {
        let Some(group) = pod.metadata.label(GROUP_NAME_LABEL) else {
            return;
        };
        let Ok(members) =
            self.snapshot
                .list_pods_by_label(&pod.metadata.namespace, GROUP_NAME_LABEL, group)
        else {
            return;
        };
        members
            .iter()
            .filter(|member| member.is_pending() && member.metadata.id != pod.metadata.id)
            .for_each(|member| self.enqueue(member.metadata.id));
    }

    fn handle_node_event(&self, event: NodeEvent) {
        self.snapshot.apply_node_event(&event);
        if event.event_type != EventType::Added {
            return;
        }
        // Pods created before any node existed never got a ranking
        for pod_id in self.snapshot.pending_pods() {
            self.enqueue(pod_id);
        }
    }
}
