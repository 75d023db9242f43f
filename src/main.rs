mod flags;

use anyhow::{Context, Result};
use tokio::task::block_in_place;
use tracing::info;
use tracing_subscriber::EnvFilter;

use subfeed::config::Config;
use subfeed::model::{AccountId, Activity};
use subfeed::notification::{Notification, NotificationResolver};
use subfeed::offchain::{ActivityFeed, FeedKind, OffchainFeed};
use subfeed::render::HtmlRenderer;
use subfeed::store::{EntityStore, KeyspaceStore, Snapshot, SnapshotFile};

use crate::flags::{Fetch, Import, Render, SubfeedCmd};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let flags = flags::Subfeed::from_env_or_exit();
    let config = Config::load(flags.config.as_deref())?;

    match flags.subcommand {
        SubfeedCmd::Import(cmd) => import(&config, cmd).await,
        SubfeedCmd::Render(cmd) => render(&config, cmd).await,
        SubfeedCmd::Fetch(cmd) => fetch(&config, cmd).await,
    }
}

async fn import(config: &Config, cmd: Import) -> Result<()> {
    let bytes = tokio::fs::read(&cmd.snapshot)
        .await
        .with_context(|| format!("unable to read {}", cmd.snapshot.display()))?;
    let file: SnapshotFile =
        serde_json::from_slice(&bytes).context("unable to parse entity snapshot")?;
    block_in_place(|| {
        let store = KeyspaceStore::open(&config.store.keyspace_dir)?;
        store.import(&file)
    })
}

async fn render(config: &Config, cmd: Render) -> Result<()> {
    let bytes = tokio::fs::read(&cmd.activities)
        .await
        .with_context(|| format!("unable to read {}", cmd.activities.display()))?;
    let records: Vec<serde_json::Value> =
        serde_json::from_slice(&bytes).context("unable to parse activities")?;
    let activities = Activity::from_page(records);
    let viewer = cmd.viewer.map(AccountId::from);
    let notifications = match &cmd.snapshot {
        Some(path) => {
            let bytes = tokio::fs::read(path)
                .await
                .with_context(|| format!("unable to read {}", path.display()))?;
            let snapshot = Snapshot::from_json(&bytes)?;
            resolve(config, &activities, &snapshot, viewer.as_ref())?
        }
        None => block_in_place(|| {
            let store = KeyspaceStore::open(&config.store.keyspace_dir)?;
            resolve(config, &activities, &store, viewer.as_ref())
        })?,
    };
    print(&notifications, cmd.html)
}

async fn fetch(config: &Config, cmd: Fetch) -> Result<()> {
    let kind = if cmd.notifications {
        FeedKind::Notifications
    } else {
        FeedKind::News
    };
    let address = AccountId::from(cmd.address);
    let feed = OffchainFeed::new(config.feed.offchain_url.clone(), kind);
    let activities = feed
        .load_page(
            &address,
            cmd.offset.unwrap_or(0),
            cmd.limit.unwrap_or(config.feed.page_size),
        )
        .await?;
    let viewer = cmd.viewer.map(AccountId::from).unwrap_or(address);
    let notifications = block_in_place(|| {
        let store = KeyspaceStore::open(&config.store.keyspace_dir)?;
        resolve(config, &activities, &store, Some(&viewer))
    })?;
    print(&notifications, cmd.html)
}

fn resolve<S: EntityStore>(
    config: &Config,
    activities: &[Activity],
    store: &S,
    viewer: Option<&AccountId>,
) -> Result<Vec<Notification>> {
    let resolver = NotificationResolver::new(&config.render, &config.messages)?;
    let notifications = resolver.resolve_batch(activities, store, viewer);
    info!(
        target: "resolve",
        received = activities.len(),
        rendered = notifications.len(),
        "resolved activities"
    );
    Ok(notifications)
}

fn print(notifications: &[Notification], html: bool) -> Result<()> {
    if html {
        let renderer = HtmlRenderer::new()?;
        for notification in notifications {
            println!("{}", renderer.notification(notification)?);
        }
        return Ok(());
    }
    for notification in notifications {
        println!("{}", serde_json::to_string(notification)?);
    }
    Ok(())
}
