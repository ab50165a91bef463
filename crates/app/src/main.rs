use std::sync::Arc;

use engine::{Engine, MemoryRepository, UserDirectory, member_shares};

mod error;
mod report;
mod settings;
mod snapshot;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let settings = settings::Settings::new()?;

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "spesa={level},engine={level}",
            level = settings.app.level
        ))
        .init();

    tracing::info!("loading snapshot from {}", settings.store.snapshot);
    let snapshot = snapshot::Snapshot::load(&settings.store.snapshot)?;
    let users = UserDirectory::new(snapshot.users);

    let repository = Arc::new(MemoryRepository::new());
    repository.seed(snapshot.groups, snapshot.expenses).await;
    let engine = Engine::builder().repository(repository).build();

    for group in engine.groups().await? {
        // Stored totals are a cache; trust the expenses.
        if let Err(err) = engine.refresh_total(group.id).await {
            tracing::error!(group_id = %group.id, "skipping group {}: {err}", group.name);
            continue;
        }
        let group = engine.group(group.id).await?;
        let balance = engine.group_balance(group.id).await?;
        let shares = member_shares(&group)?;
        println!("{}", report::group_summary(&users, &group, &balance, &shares));
    }

    println!("{}", report::overview_line(&engine.overview().await?));
    Ok(())
}
