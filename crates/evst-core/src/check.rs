//! Status lookup for the most recent event of a group.

use async_trait::async_trait;

use crate::clock::{Clock, SystemClock};
use crate::event::EventDescriptor;
use crate::status::EventStatus;
use crate::types::GroupId;

/// Loads the most recent event for a group.
#[async_trait]
pub trait LoadLastEventRepository: Send + Sync {
    type Error;

    /// Returns `None` when the group has no events.
    async fn load_last_event(
        &self,
        group_id: &GroupId,
    ) -> Result<Option<EventDescriptor>, Self::Error>;
}

#[async_trait]
impl<R: LoadLastEventRepository + ?Sized> LoadLastEventRepository for &R {
    type Error = R::Error;

    async fn load_last_event(
        &self,
        group_id: &GroupId,
    ) -> Result<Option<EventDescriptor>, Self::Error> {
        (**self).load_last_event(group_id).await
    }
}

/// Classifies the latest event of a group.
///
/// Every call performs exactly one fresh fetch. Repository errors are
/// returned as-is.
#[derive(Debug, Clone)]
pub struct CheckLastEventStatus<R, C = SystemClock> {
    repository: R,
    clock: C,
}

impl<R: LoadLastEventRepository> CheckLastEventStatus<R> {
    pub const fn new(repository: R) -> Self {
        Self {
            repository,
            clock: SystemClock,
        }
    }
}

impl<R: LoadLastEventRepository, C: Clock> CheckLastEventStatus<R, C> {
    pub const fn with_clock(repository: R, clock: C) -> Self {
        Self { repository, clock }
    }

    pub async fn perform(&self, group_id: &GroupId) -> Result<EventStatus, R::Error> {
        let event = self.repository.load_last_event(group_id).await?;
        Ok(EventStatus::classify(event.as_ref(), self.clock.now()))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use chrono::{DateTime, TimeDelta, TimeZone, Utc};

    use super::*;
    use crate::clock::FixedClock;

    const ONE_HOUR: f64 = 1.0;

    /// Records every call and replays a canned output.
    #[derive(Default)]
    struct LoadLastEventRepositorySpy {
        calls: Mutex<Vec<GroupId>>,
        output: Option<EventDescriptor>,
    }

    impl LoadLastEventRepositorySpy {
        fn returning(output: Option<EventDescriptor>) -> Self {
            Self {
                output,
                ..Self::default()
            }
        }

        fn calls(&self) -> Vec<GroupId> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl LoadLastEventRepository for LoadLastEventRepositorySpy {
        type Error = std::convert::Infallible;

        async fn load_last_event(
            &self,
            group_id: &GroupId,
        ) -> Result<Option<EventDescriptor>, Self::Error> {
            self.calls.lock().unwrap().push(group_id.clone());
            Ok(self.output)
        }
    }

    #[derive(Debug, PartialEq, Eq)]
    struct Unavailable(&'static str);

    struct FailingRepository;

    #[async_trait]
    impl LoadLastEventRepository for FailingRepository {
        type Error = Unavailable;

        async fn load_last_event(
            &self,
            _group_id: &GroupId,
        ) -> Result<Option<EventDescriptor>, Self::Error> {
            Err(Unavailable("connection reset"))
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 2, 10, 18, 30, 0).unwrap()
    }

    fn group_id() -> GroupId {
        GroupId::new("any_group_id").unwrap()
    }

    async fn status_for(end_date: DateTime<Utc>) -> EventStatus {
        let repository =
            LoadLastEventRepositorySpy::returning(Some(EventDescriptor::new(end_date, ONE_HOUR)));
        let sut = CheckLastEventStatus::with_clock(repository, FixedClock::new(now()));
        sut.perform(&group_id()).await.unwrap()
    }

    #[tokio::test]
    async fn loads_last_event_once_with_group_id() {
        let repository = LoadLastEventRepositorySpy::default();
        let sut = CheckLastEventStatus::with_clock(&repository, FixedClock::new(now()));

        sut.perform(&group_id()).await.unwrap();

        assert_eq!(repository.calls(), vec![group_id()]);
    }

    #[tokio::test]
    async fn fetches_again_on_every_call() {
        let repository = LoadLastEventRepositorySpy::default();
        let sut = CheckLastEventStatus::with_clock(&repository, FixedClock::new(now()));
        let other = GroupId::new("other_group").unwrap();

        sut.perform(&group_id()).await.unwrap();
        sut.perform(&other).await.unwrap();
        sut.perform(&group_id()).await.unwrap();

        assert_eq!(repository.calls(), vec![group_id(), other, group_id()]);
    }

    #[tokio::test]
    async fn done_when_group_has_no_event() {
        let sut = CheckLastEventStatus::with_clock(
            LoadLastEventRepositorySpy::returning(None),
            FixedClock::new(now()),
        );

        assert_eq!(sut.perform(&group_id()).await.unwrap(), EventStatus::Done);
    }

    #[tokio::test]
    async fn active_when_now_is_before_end_date() {
        let status = status_for(now() + TimeDelta::milliseconds(1)).await;
        assert_eq!(status, EventStatus::Active);
    }

    #[tokio::test]
    async fn active_when_now_equals_end_date() {
        assert_eq!(status_for(now()).await, EventStatus::Active);
    }

    #[tokio::test]
    async fn in_review_when_now_is_after_end_date() {
        let status = status_for(now() - TimeDelta::milliseconds(1)).await;
        assert_eq!(status, EventStatus::InReview);
    }

    #[tokio::test]
    async fn in_review_when_now_is_before_review_deadline() {
        let status = status_for(now() - TimeDelta::hours(1) + TimeDelta::milliseconds(1)).await;
        assert_eq!(status, EventStatus::InReview);
    }

    #[tokio::test]
    async fn in_review_when_now_equals_review_deadline() {
        let status = status_for(now() - TimeDelta::hours(1)).await;
        assert_eq!(status, EventStatus::InReview);
    }

    #[tokio::test]
    async fn done_when_now_is_after_review_deadline() {
        let status = status_for(now() - TimeDelta::hours(1) - TimeDelta::milliseconds(1)).await;
        assert_eq!(status, EventStatus::Done);
    }

    #[tokio::test]
    async fn repository_errors_propagate_unchanged() {
        let sut = CheckLastEventStatus::with_clock(FailingRepository, FixedClock::new(now()));

        let err = sut.perform(&group_id()).await.unwrap_err();

        assert_eq!(err, Unavailable("connection reset"));
    }

    #[tokio::test]
    async fn system_clock_by_default() {
        let end_date = Utc::now() + TimeDelta::days(1);
        let sut = CheckLastEventStatus::new(LoadLastEventRepositorySpy::returning(Some(
            EventDescriptor::new(end_date, ONE_HOUR),
        )));

        assert_eq!(sut.perform(&group_id()).await.unwrap(), EventStatus::Active);
    }
}
