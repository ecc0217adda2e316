//! In-process stand-ins for the feed and the geocoder.

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex as StdMutex};
use std::time::Duration;

use crate::feed::{FeedSource, FetchError};
use crate::geolocation::{GeolocationError, NamedLocation, ReverseGeocoder};

#[derive(Clone)]
pub enum FeedReply {
    Body(String),
    Down,
    Hang,
}

pub struct FakeFeed {
    reply: StdMutex<FeedReply>,
}

impl FakeFeed {
    pub fn new(reply: FeedReply) -> Arc<Self> {
        Arc::new(Self {
            reply: StdMutex::new(reply),
        })
    }

    pub fn set(&self, reply: FeedReply) {
        *self.reply.lock().unwrap() = reply;
    }
}

#[async_trait]
impl FeedSource for FakeFeed {
    async fn fetch(&self) -> Result<String, FetchError> {
        let reply = self.reply.lock().unwrap().clone();
        match reply {
            FeedReply::Body(body) => Ok(body),
            FeedReply::Down => Err(FetchError::Status(reqwest::StatusCode::BAD_GATEWAY)),
            FeedReply::Hang => {
                tokio::time::sleep(Duration::from_secs(30)).await;
                Ok(String::new())
            }
        }
    }
}

pub enum GeoReply {
    Ocean,
    Place,
    Hang,
}

pub struct FakeGeocoder {
    reply: GeoReply,
}

impl FakeGeocoder {
    pub fn new(reply: GeoReply) -> Arc<Self> {
        Arc::new(Self { reply })
    }
}

#[async_trait]
impl ReverseGeocoder for FakeGeocoder {
    async fn reverse(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<NamedLocation, GeolocationError> {
        match self.reply {
            GeoReply::Ocean => Ok(NamedLocation::Ocean),
            GeoReply::Place => Ok(NamedLocation::Place {
                display_name: Some(format!("{latitude:.1},{longitude:.1}")),
                address: BTreeMap::from([("country".to_string(), "Nowhere".to_string())]),
            }),
            GeoReply::Hang => {
                tokio::time::sleep(Duration::from_secs(30)).await;
                Ok(NamedLocation::Ocean)
            }
        }
    }
}
