//! In-memory adapters for the applicant pipeline, used by the demo server and tests.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use super::domain::{Applicant, ApplicantId, Notification};
use super::repository::{
    ApplicantRepository, NotificationError, NotificationPublisher, RepositoryError,
};
use super::tracker::{TaskTracker, TrackerError, TrackerList, TrackerTask};

#[derive(Default, Clone)]
pub struct InMemoryApplicantRepository {
    records: Arc<Mutex<BTreeMap<ApplicantId, Applicant>>>,
}

impl InMemoryApplicantRepository {
    pub fn len(&self) -> usize {
        self.records.lock().expect("repository mutex poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ApplicantRepository for InMemoryApplicantRepository {
    fn insert(&self, applicant: Applicant) -> Result<Applicant, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&applicant.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(applicant.id.clone(), applicant.clone());
        Ok(applicant)
    }

    fn update(&self, applicant: Applicant) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        match guard.get_mut(&applicant.id) {
            Some(existing) => {
                *existing = applicant;
                Ok(())
            }
            None => Err(RepositoryError::NotFound),
        }
    }

    fn fetch(&self, id: &ApplicantId) -> Result<Option<Applicant>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn list(&self) -> Result<Vec<Applicant>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.values().cloned().collect())
    }
}

/// Notification feed kept newest first.
#[derive(Default, Clone)]
pub struct InMemoryNotifications {
    events: Arc<Mutex<Vec<Notification>>>,
}

impl InMemoryNotifications {
    pub fn events(&self) -> Vec<Notification> {
        self.events.lock().expect("notification mutex poisoned").clone()
    }

    pub fn unread(&self) -> usize {
        self.events
            .lock()
            .expect("notification mutex poisoned")
            .iter()
            .filter(|notification| !notification.read)
            .count()
    }

    pub fn mark_all_read(&self) {
        let mut guard = self.events.lock().expect("notification mutex poisoned");
        for notification in guard.iter_mut() {
            notification.read = true;
        }
    }
}

impl NotificationPublisher for InMemoryNotifications {
    fn publish(&self, notification: Notification) -> Result<(), NotificationError> {
        self.events
            .lock()
            .expect("notification mutex poisoned")
            .insert(0, notification);
        Ok(())
    }
}

/// Tracker that records every pushed task. Lists marked offline reject pushes.
#[derive(Default, Clone)]
pub struct RecordingTracker {
    tasks: Arc<Mutex<Vec<TrackerTask>>>,
    offline: Arc<Mutex<Vec<TrackerList>>>,
}

impl RecordingTracker {
    pub fn tasks(&self) -> Vec<TrackerTask> {
        self.tasks.lock().expect("tracker mutex poisoned").clone()
    }

    pub fn tasks_for(&self, list: TrackerList) -> Vec<TrackerTask> {
        self.tasks()
            .into_iter()
            .filter(|task| task.list == list)
            .collect()
    }

    pub fn take_offline(&self, list: TrackerList) {
        self.offline
            .lock()
            .expect("tracker mutex poisoned")
            .push(list);
    }
}

impl TaskTracker for RecordingTracker {
    fn push(&self, task: TrackerTask) -> Result<(), TrackerError> {
        let offline = self.offline.lock().expect("tracker mutex poisoned");
        if offline.contains(&task.list) {
            return Err(TrackerError::Unreachable(format!("{:?} list offline", task.list)));
        }
        drop(offline);

        self.tasks.lock().expect("tracker mutex poisoned").push(task);
        Ok(())
    }
}
