use shared::models::Pod;

use crate::framework::{PreFilterPlugin, Status};

use super::{CustomScheduler, GROUP_NAME_LABEL, MIN_AVAILABLE_LABEL};

impl PreFilterPlugin for CustomScheduler {
    /// Admits the pod once the group it belongs to has at least
    /// `minAvailable` members visible to the scheduler.
    fn pre_filter(&self, pod: &Pod) -> Status {
        let pod_name = &pod.metadata.name;
        tracing::debug!(pod=%pod_name, "Pre-filter phase");

        let Some(group) = pod.metadata.label(GROUP_NAME_LABEL) else {
            return Status::success("no group label");
        };

        let min_available = match min_available(pod) {
            Ok(n) => n,
            Err(raw) => {
                tracing::debug!(pod=%pod_name, %raw, "Rejecting pod with malformed threshold");
                return Status::unschedulable(format!("invalid {MIN_AVAILABLE_LABEL} label: {raw}"));
            }
        };

        let members =
            match self
                .reader
                .list_pods_by_label(&pod.metadata.namespace, GROUP_NAME_LABEL, group)
            {
                Ok(pods) => pods,
                Err(error) => {
                    tracing::error!(pod=%pod_name, %group, %error, "Could not list group members");
                    return Status::error(error.to_string());
                }
            };

        let group_size = i64::try_from(members.len()).unwrap_or(i64::MAX);
        if group_size < min_available {
            tracing::debug!(pod=%pod_name, %group, group_size, min_available, "Group below quorum");
            return Status::unschedulable("not enough pods in the group");
        }
        Status::success("")
    }
}

/// Absent label means no threshold. A label that is not a decimal integer
/// is returned as the error.
fn min_available(pod: &Pod) -> Result<i64, &str> {
    match pod.metadata.label(MIN_AVAILABLE_LABEL) {
        None => Ok(0),
        Some(raw) => raw.parse().map_err(|_| raw),
    }
}

#[cfg(test)]
mod tests {

    //! - test_unlabeled_pod_is_admitted
    //!     no group label admits without touching the reader.
    //! - test_quorum_threshold
    //!     minAvailable - 1 members rejects, minAvailable members admits.
    //! - test_other_namespaces_do_not_count
    //! - test_missing_threshold_admits
    //! - test_malformed_threshold_rejects
    //! - test_reader_error_is_reported

    use std::sync::Arc;

    use super::*;
    use crate::cluster::ClusterSnapshot;
    use crate::framework::Code;
    use crate::plugins::custom_scheduler::test_reader::{FailingReader, group_pod, plugin};

    #[test]
    fn test_unlabeled_pod_is_admitted() {
        let plugin = plugin(None, Arc::new(FailingReader));
        let pod = Pod::new("default", "solo").with_label(MIN_AVAILABLE_LABEL, "5");

        let status = plugin.pre_filter(&pod);

        assert_eq!(status, Status::success("no group label"));
    }

    #[test]
    fn test_quorum_threshold() {
        let snapshot = ClusterSnapshot::new();
        let plugin = plugin(None, snapshot.clone());
        snapshot.add_pod(&group_pod("default", "g-0", "trainers", "3"));
        snapshot.add_pod(&group_pod("default", "g-1", "trainers", "3"));

        let incoming = group_pod("default", "g-2", "trainers", "3");
        let status = plugin.pre_filter(&incoming);
        assert_eq!(status, Status::unschedulable("not enough pods in the group"));

        snapshot.add_pod(&incoming);
        assert!(plugin.pre_filter(&incoming).is_success());
    }

    #[test]
    fn test_other_namespaces_do_not_count() {
        let snapshot = ClusterSnapshot::new();
        let plugin = plugin(None, snapshot.clone());
        snapshot.add_pod(&group_pod("other", "g-0", "trainers", "2"));
        snapshot.add_pod(&group_pod("other", "g-1", "trainers", "2"));
        snapshot.add_pod(&group_pod("default", "x-0", "evaluators", "2"));

        let status = plugin.pre_filter(&group_pod("default", "g-2", "trainers", "2"));

        assert!(status.is_unschedulable());
    }

    #[test]
    fn test_missing_threshold_admits() {
        let plugin = plugin(None, ClusterSnapshot::new());
        let pod = Pod::new("default", "lonely").with_label(GROUP_NAME_LABEL, "trainers");

        assert!(plugin.pre_filter(&pod).is_success());
    }

    #[test]
    fn test_malformed_threshold_rejects() {
        let snapshot = ClusterSnapshot::new();
        let plugin = plugin(None, snapshot.clone());
        let pod = group_pod("default", "g-0", "trainers", "three");
        snapshot.add_pod(&pod);

        let status = plugin.pre_filter(&pod);

        assert_eq!(
            status,
            Status::unschedulable("invalid minAvailable label: three")
        );
    }

    #[test]
    fn test_reader_error_is_reported() {
        let plugin = plugin(None, Arc::new(FailingReader));

        let status = plugin.pre_filter(&group_pod("default", "g-0", "trainers", "1"));

        assert_eq!(status.code(), Code::Error);
        assert_eq!(
            status.message(),
            "cluster state unavailable: informer not synced"
        );
    }
}
