//! Paging client for the off-chain feed service.

use anyhow::{Context, Result};
use reqwest::Client;
use tracing::info;

use crate::model::{AccountId, Activity};

/// Source of raw activity pages.
pub trait ActivityFeed {
    fn load_page(
        &self,
        address: &AccountId,
        offset: u64,
        limit: u64,
    ) -> impl Future<Output = Result<Vec<Activity>>> + Send;
}

/// Which of an account's streams to page through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedKind {
    /// Activities of accounts and spaces the address follows.
    News,
    /// Activities on content the address owns.
    Notifications,
}

impl FeedKind {
    fn path_segment(self) -> &'static str {
        match self {
            FeedKind::News => "feed",
            FeedKind::Notifications => "notifications",
        }
    }
}

#[derive(Clone)]
pub struct OffchainFeed {
    client: Client,
    base_url: String,
    kind: FeedKind,
}

impl OffchainFeed {
    pub fn new(base_url: impl Into<String>, kind: FeedKind) -> OffchainFeed {
        OffchainFeed {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            kind,
        }
    }

    pub fn page_url(&self, address: &AccountId, offset: u64, limit: u64) -> String {
        format!(
            "{}/offchain/{}/{}?offset={offset}&limit={limit}",
            self.base_url,
            self.kind.path_segment(),
            address
        )
    }
}

impl ActivityFeed for OffchainFeed {
    fn load_page(
        &self,
        address: &AccountId,
        offset: u64,
        limit: u64,
    ) -> impl Future<Output = Result<Vec<Activity>>> + Send {
        let url = self.page_url(address, offset, limit);
        let client = self.client.clone();
        async move {
            info!(target: "feed", %url, "loading activity page");
            let response = client
                .get(&url)
                .header("accept", "application/json")
                .send()
                .await
                .with_context(|| format!("unable to reach {url}"))?
                .error_for_status()?;
            let records = response
                .json::<Vec<serde_json::Value>>()
                .await
                .context("unable to decode activity page")?;
            Ok(Activity::from_page(records))
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::model::AccountId;

    use super::{FeedKind, OffchainFeed};

    #[test]
    fn page_urls() {
        let address = AccountId::from("3osmnRNnrcScHsgk");
        let news = OffchainFeed::new("http://localhost:3001/", FeedKind::News);
        assert_eq!(
            news.page_url(&address, 0, 20),
            "http://localhost:3001/offchain/feed/3osmnRNnrcScHsgk?offset=0&limit=20"
        );
        let notifications = OffchainFeed::new("https://offchain.example.com", FeedKind::Notifications);
        assert_eq!(
            notifications.page_url(&address, 40, 20),
            "https://offchain.example.com/offchain/notifications/3osmnRNnrcScHsgk?offset=40&limit=20"
        );
    }
}
