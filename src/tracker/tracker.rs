use chrono::{DateTime, Utc};
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::timeout;

use super::error::TrackerError;
use super::types::{EpochQuery, LocationReport, NowReport, SpeedReport};
use crate::ephemeris::Ephemeris;
use crate::feed::{parse_oem, FeedSource, FetchError, OemHeader, OemMetadata, StateVector};
use crate::geolocation::{GeolocationError, ReverseGeocoder};
use crate::kinematics;

const MIN_REFRESH_INTERVAL: Duration = Duration::from_secs(1);

/// Holds the currently published ephemeris and answers queries against it.
///
/// Readers clone the `Arc` of the current snapshot and work on it without
/// holding any lock. `refresh` builds a complete new snapshot first and then
/// swaps the pointer, so a reader sees either the old or the new dataset.
pub struct Tracker {
    source: Arc<dyn FeedSource>,
    geocoder: Arc<dyn ReverseGeocoder>,
    current: RwLock<Option<Arc<Ephemeris>>>,
    refresh_lock: Mutex<()>,
    fetch_timeout: Duration,
    geocode_timeout: Duration,
}

impl Tracker {
    pub fn new(
        source: Arc<dyn FeedSource>,
        geocoder: Arc<dyn ReverseGeocoder>,
        fetch_timeout: Duration,
        geocode_timeout: Duration,
    ) -> Self {
        Self {
            source,
            geocoder,
            current: RwLock::new(None),
            refresh_lock: Mutex::new(()),
            fetch_timeout,
            geocode_timeout,
        }
    }

    /// Fetch, parse and publish a new dataset. On failure the previous
    /// dataset stays live. Returns the number of state vectors published.
    pub async fn refresh(&self) -> Result<usize, TrackerError> {
        let _guard = self.refresh_lock.lock().await;

        let raw = timeout(self.fetch_timeout, self.source.fetch())
            .await
            .map_err(|_| FetchError::Timeout)??;
        let ephemeris = Ephemeris::from(parse_oem(&raw)?);
        let count = ephemeris.index.len();

        self.publish(Some(Arc::new(ephemeris)));
        log::info!("published trajectory dataset with {} state vectors", count);
        Ok(count)
    }

    /// Drop the published dataset; queries fail with `EmptyDataset` until the
    /// next successful refresh.
    pub fn clear(&self) {
        self.publish(None);
        log::info!("trajectory dataset cleared");
    }

    pub fn snapshot(&self) -> Result<Arc<Ephemeris>, TrackerError> {
        let current = self
            .current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        match current {
            Some(ephemeris) if !ephemeris.index.is_empty() => Ok(ephemeris),
            _ => Err(TrackerError::EmptyDataset),
        }
    }

    fn publish(&self, ephemeris: Option<Arc<Ephemeris>>) {
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = ephemeris;
    }

    pub fn list_epochs(&self) -> Result<Vec<DateTime<Utc>>, TrackerError> {
        self.list_epochs_page(0, None)
    }

    pub fn list_epochs_page(
        &self,
        offset: usize,
        limit: Option<usize>,
    ) -> Result<Vec<DateTime<Utc>>, TrackerError> {
        let snapshot = self.snapshot()?;
        let epochs = snapshot.index.epochs().skip(offset);
        Ok(match limit {
            Some(limit) => epochs.take(limit).collect(),
            None => epochs.collect(),
        })
    }

    pub fn state_vectors(&self) -> Result<Vec<StateVector>, TrackerError> {
        Ok(self.snapshot()?.index.states().to_vec())
    }

    pub fn header(&self) -> Result<OemHeader, TrackerError> {
        Ok(self.snapshot()?.header.clone())
    }

    pub fn metadata(&self) -> Result<OemMetadata, TrackerError> {
        Ok(self.snapshot()?.metadata.clone())
    }

    pub fn comments(&self) -> Result<Vec<String>, TrackerError> {
        Ok(self.snapshot()?.comments.clone())
    }

    pub fn state_vector(&self, query: EpochQuery) -> Result<StateVector, TrackerError> {
        let snapshot = self.snapshot()?;
        let found = match query {
            EpochQuery::At(epoch) => snapshot.index.exact(epoch),
            EpochQuery::Now => snapshot.index.closest_to_now(),
        };
        Ok(*found?)
    }

    pub fn speed(&self, query: EpochQuery) -> Result<SpeedReport, TrackerError> {
        let vector = self.state_vector(query)?;
        Ok(SpeedReport {
            epoch: vector.epoch,
            speed_km_s: kinematics::speed(&vector),
        })
    }

    pub async fn location(&self, query: EpochQuery) -> Result<LocationReport, TrackerError> {
        let vector = self.state_vector(query)?;
        self.locate(&vector).await
    }

    /// Closest sample to the current clock with its speed and location.
    pub async fn now(&self) -> Result<NowReport, TrackerError> {
        let now = Utc::now();
        let vector = *self.snapshot()?.index.nearest(now)?;
        let location = self.locate(&vector).await?;
        Ok(NowReport {
            closest_epoch: vector.epoch,
            time_difference_s: (now - vector.epoch).num_milliseconds() as f64 / 1000.0,
            speed_km_s: kinematics::speed(&vector),
            location,
        })
    }

    async fn locate(&self, vector: &StateVector) -> Result<LocationReport, TrackerError> {
        let geodetic = kinematics::sub_point(vector);
        let place = timeout(
            self.geocode_timeout,
            self.geocoder
                .reverse(geodetic.latitude_deg, geodetic.longitude_deg),
        )
        .await
        .map_err(|_| GeolocationError::Timeout)??;

        Ok(LocationReport {
            epoch: vector.epoch,
            geodetic,
            place,
        })
    }

    /// Refresh every `every` in the background. The first refresh happens one
    /// interval from now. Periods shorter than a second are raised to one.
    pub fn spawn_periodic_refresh(self: Arc<Self>, every: Duration) -> JoinHandle<()> {
        let every = if every < MIN_REFRESH_INTERVAL {
            log::warn!(
                "refresh interval {:?} too short, using {:?}",
                every,
                MIN_REFRESH_INTERVAL
            );
            MIN_REFRESH_INTERVAL
        } else {
            every
        };
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            ticker.tick().await;
            loop {
                ticker.tick().await;
                if let Err(e) = self.refresh().await {
                    log::warn!("periodic refresh failed, keeping previous dataset: {}", e);
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::fixtures::{oem_xml, state_vector_xml, three_entry_feed};
    use crate::geolocation::NamedLocation;
    use crate::tracker::testing::{FakeFeed, FakeGeocoder, FeedReply, GeoReply};
    use chrono::TimeZone;

    fn tracker(feed: Arc<FakeFeed>, geo: GeoReply) -> Tracker {
        Tracker::new(
            feed,
            FakeGeocoder::new(geo),
            Duration::from_millis(200),
            Duration::from_millis(200),
        )
    }

    fn t1() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2023, 2, 27, 12, 4, 0).unwrap()
    }

    #[tokio::test]
    async fn refresh_then_exact_lookup_returns_injected_record() {
        let tracker = tracker(FakeFeed::new(FeedReply::Body(three_entry_feed())), GeoReply::Ocean);

        assert_eq!(tracker.refresh().await.unwrap(), 3);

        let vector = tracker.state_vector(EpochQuery::At(t1())).unwrap();
        assert_eq!(vector.epoch, t1());
        assert_eq!(
            vector.position_km,
            [-5638.20045289053, 358.018712889813, -3672.89018941637]
        );
        assert_eq!(
            vector.velocity_km_s,
            [-0.774587566733, -5.45458627312, 5.11706281706]
        );
    }

    #[tokio::test]
    async fn queries_before_first_refresh_report_empty_dataset() {
        let tracker = tracker(FakeFeed::new(FeedReply::Down), GeoReply::Ocean);

        assert!(matches!(tracker.list_epochs(), Err(TrackerError::EmptyDataset)));
        assert!(matches!(
            tracker.state_vector(EpochQuery::Now),
            Err(TrackerError::EmptyDataset)
        ));
        assert!(matches!(tracker.header(), Err(TrackerError::EmptyDataset)));
        assert!(matches!(tracker.now().await, Err(TrackerError::EmptyDataset)));
    }

    #[tokio::test]
    async fn empty_feed_refreshes_but_queries_fail() {
        let tracker = tracker(FakeFeed::new(FeedReply::Body(oem_xml(&[]))), GeoReply::Ocean);

        assert_eq!(tracker.refresh().await.unwrap(), 0);
        assert!(matches!(tracker.list_epochs(), Err(TrackerError::EmptyDataset)));
        assert!(matches!(
            tracker.speed(EpochQuery::Now),
            Err(TrackerError::EmptyDataset)
        ));
        assert!(matches!(
            tracker.location(EpochQuery::At(t1())).await,
            Err(TrackerError::EmptyDataset)
        ));
    }

    #[tokio::test]
    async fn malformed_feed_keeps_previous_dataset() {
        let feed = FakeFeed::new(FeedReply::Body(three_entry_feed()));
        let tracker = tracker(feed.clone(), GeoReply::Ocean);
        tracker.refresh().await.unwrap();
        let before = tracker.state_vectors().unwrap();

        feed.set(FeedReply::Body(oem_xml(&[r#"<stateVector>
  <EPOCH>2023-059T00:00:00.000Z</EPOCH>
  <X>1</X><Y>2</Y><Z>3</Z>
</stateVector>"#
            .to_string()])));
        assert!(matches!(tracker.refresh().await, Err(TrackerError::Parse(_))));

        assert_eq!(tracker.state_vectors().unwrap(), before);
        assert!(tracker.state_vector(EpochQuery::At(t1())).is_ok());
    }

    #[tokio::test]
    async fn fetch_failures_keep_previous_dataset() {
        let feed = FakeFeed::new(FeedReply::Body(three_entry_feed()));
        let tracker = tracker(feed.clone(), GeoReply::Ocean);
        tracker.refresh().await.unwrap();

        feed.set(FeedReply::Down);
        assert!(matches!(
            tracker.refresh().await,
            Err(TrackerError::Fetch(FetchError::Status(_)))
        ));

        feed.set(FeedReply::Hang);
        assert!(matches!(
            tracker.refresh().await,
            Err(TrackerError::Fetch(FetchError::Timeout))
        ));

        assert_eq!(tracker.list_epochs().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn exact_miss_is_not_found() {
        let tracker = tracker(FakeFeed::new(FeedReply::Body(three_entry_feed())), GeoReply::Ocean);
        tracker.refresh().await.unwrap();

        let missing = t1() + chrono::Duration::seconds(1);
        match tracker.state_vector(EpochQuery::At(missing)) {
            Err(TrackerError::NotFound(epoch)) => assert_eq!(epoch, missing),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[tokio::test]
    async fn geocoder_timeout_is_isolated_from_kinematics() {
        let tracker = tracker(FakeFeed::new(FeedReply::Body(three_entry_feed())), GeoReply::Hang);
        tracker.refresh().await.unwrap();
        let query = EpochQuery::At(t1());

        assert!(matches!(
            tracker.location(query).await,
            Err(TrackerError::GeolocationUnavailable(GeolocationError::Timeout))
        ));
        assert!(tracker.state_vector(query).is_ok());
        let speed = tracker.speed(query).unwrap();
        assert!((speed.speed_km_s - 7.5191).abs() < 1e-3);
    }

    #[tokio::test]
    async fn location_combines_sub_point_and_place() {
        let tracker = tracker(FakeFeed::new(FeedReply::Body(three_entry_feed())), GeoReply::Place);
        tracker.refresh().await.unwrap();

        let report = tracker.location(EpochQuery::At(t1())).await.unwrap();
        assert_eq!(report.epoch, t1());
        assert!(report.geodetic.altitude_km > 300.0 && report.geodetic.altitude_km < 500.0);
        assert!(report.geodetic.latitude_deg.abs() <= 52.0);
        match report.place {
            NamedLocation::Place { display_name, .. } => assert_eq!(
                display_name,
                Some(format!(
                    "{:.1},{:.1}",
                    report.geodetic.latitude_deg, report.geodetic.longitude_deg
                ))
            ),
            NamedLocation::Ocean => panic!("expected a place"),
        }
    }

    #[tokio::test]
    async fn ocean_is_a_successful_location() {
        let tracker = tracker(FakeFeed::new(FeedReply::Body(three_entry_feed())), GeoReply::Ocean);
        tracker.refresh().await.unwrap();

        let report = tracker.location(EpochQuery::Now).await.unwrap();
        assert_eq!(report.place, NamedLocation::Ocean);
    }

    #[tokio::test]
    async fn now_uses_closest_epoch() {
        let tracker = tracker(FakeFeed::new(FeedReply::Body(three_entry_feed())), GeoReply::Ocean);
        tracker.refresh().await.unwrap();

        // All samples lie in the past, so the latest one is closest.
        let report = tracker.now().await.unwrap();
        let last = Utc.with_ymd_and_hms(2023, 2, 27, 12, 8, 0).unwrap();
        assert_eq!(report.closest_epoch, last);
        assert!(report.time_difference_s > 0.0);
        assert_eq!(report.location.epoch, last);
        assert_eq!(
            tracker.state_vector(EpochQuery::Now).unwrap().epoch,
            last
        );
    }

    #[tokio::test]
    async fn epochs_are_paged_in_order() {
        let tracker = tracker(FakeFeed::new(FeedReply::Body(three_entry_feed())), GeoReply::Ocean);
        tracker.refresh().await.unwrap();

        let all = tracker.list_epochs().unwrap();
        assert_eq!(all.len(), 3);
        assert!(all.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(tracker.list_epochs_page(1, Some(1)).unwrap(), vec![all[1]]);
        assert_eq!(tracker.list_epochs_page(1, None).unwrap(), all[1..].to_vec());
        assert!(tracker.list_epochs_page(10, None).unwrap().is_empty());
    }

    #[tokio::test]
    async fn clear_empties_the_dataset() {
        let tracker = tracker(FakeFeed::new(FeedReply::Body(three_entry_feed())), GeoReply::Ocean);
        tracker.refresh().await.unwrap();

        tracker.clear();
        assert!(matches!(tracker.list_epochs(), Err(TrackerError::EmptyDataset)));

        tracker.refresh().await.unwrap();
        assert_eq!(tracker.list_epochs().unwrap().len(), 3);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn readers_never_see_a_mixed_dataset() {
        let small = three_entry_feed();
        let large = oem_xml(
            &(0..50)
                .map(|i| {
                    state_vector_xml(
                        &format!("2023-060T00:{:02}:00.000Z", i),
                        [6778.0, i as f64, 0.0],
                        [0.0, 7.66, 0.0],
                    )
                })
                .collect::<Vec<_>>(),
        );
        let feed = FakeFeed::new(FeedReply::Body(small.clone()));
        let tracker = Arc::new(tracker(feed.clone(), GeoReply::Ocean));
        tracker.refresh().await.unwrap();

        let readers: Vec<_> = (0..4)
            .map(|_| {
                let tracker = tracker.clone();
                tokio::spawn(async move {
                    for _ in 0..500 {
                        let snapshot = tracker.snapshot().unwrap();
                        let states = snapshot.index.states();
                        match states.len() {
                            3 => assert_eq!(snapshot.metadata.object_name.as_deref(), Some("ISS")),
                            50 => assert!(states.iter().all(|s| s.velocity_km_s[1] == 7.66)),
                            n => panic!("partial dataset with {n} entries"),
                        }
                        tokio::task::yield_now().await;
                    }
                })
            })
            .collect();

        for round in 0..20 {
            feed.set(FeedReply::Body(if round % 2 == 0 {
                large.clone()
            } else {
                small.clone()
            }));
            tracker.refresh().await.unwrap();
        }

        for reader in readers {
            reader.await.unwrap();
        }
    }

    #[tokio::test]
    async fn periodic_refresh_publishes_and_survives_zero_interval() {
        let feed = FakeFeed::new(FeedReply::Body(three_entry_feed()));
        let tracker = Arc::new(tracker(feed, GeoReply::Ocean));

        let handle = tracker.clone().spawn_periodic_refresh(Duration::ZERO);
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(!handle.is_finished());
        assert!(matches!(tracker.list_epochs(), Err(TrackerError::EmptyDataset)));

        tokio::time::sleep(Duration::from_millis(1200)).await;
        assert!(!handle.is_finished());
        assert_eq!(tracker.list_epochs().unwrap().len(), 3);
        handle.abort();
    }
}
