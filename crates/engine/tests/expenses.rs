use std::sync::Arc;

use chrono::{Duration, TimeZone, Utc};

use engine::{
    Engine, EngineError, Expense, ExpenseDraft, Group, MemoryRepository, MoneyCents, UserId,
};

fn ids(raw: &[&str]) -> Vec<UserId> {
    raw.iter().copied().map(UserId::from).collect()
}

fn draft(description: &str, amount: i64, paid_by: &str, split: &[&str]) -> ExpenseDraft {
    ExpenseDraft {
        description: description.to_string(),
        amount: MoneyCents::new(amount),
        paid_by: paid_by.into(),
        split_between: ids(split),
        created_at: Utc::now(),
    }
}

async fn engine_with_repo() -> (Engine<Arc<MemoryRepository>>, Arc<MemoryRepository>) {
    let repo = Arc::new(MemoryRepository::new());
    let engine = Engine::builder().repository(repo.clone()).build();
    (engine, repo)
}

async fn weekend_trip(engine: &Engine<Arc<MemoryRepository>>) -> Group {
    engine
        .create_group("Weekend Trip", None, ids(&["1", "2", "3"]), Utc::now())
        .await
        .unwrap()
}

#[tokio::test]
async fn add_expense_refreshes_group_total() {
    let (engine, _repo) = engine_with_repo().await;
    let group = weekend_trip(&engine).await;

    engine
        .add_expense(group.id, draft("Hotel booking", 300_00, "1", &["1", "2", "3"]))
        .await
        .unwrap();
    let dinner = engine
        .add_expense(group.id, draft("Dinner", 150_75, "2", &["1", "2", "3"]))
        .await
        .unwrap();
    assert_eq!(dinner.amount_per_person, MoneyCents::new(50_25));

    let stored = engine.group(group.id).await.unwrap();
    assert_eq!(stored.total_expenses, MoneyCents::new(450_75));

    let balance = engine.group_balance(group.id).await.unwrap();
    assert_eq!(balance.total_expenses, stored.total_expenses);
    assert_eq!(balance.net_for(&"1".into()), MoneyCents::new(149_75));
    assert_eq!(balance.net_for(&"2".into()), MoneyCents::new(50));
    assert_eq!(balance.net_for(&"3".into()), MoneyCents::new(-150_25));
    assert_eq!(balance.net_sum(), MoneyCents::ZERO);
}

#[tokio::test]
async fn invalid_expense_writes_nothing() {
    let (engine, _repo) = engine_with_repo().await;
    let group = weekend_trip(&engine).await;

    let err = engine
        .add_expense(group.id, draft("Taxi", 20_00, "9", &["1", "2"]))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidExpense(_)));

    let err = engine
        .add_expense(group.id, draft("Taxi", 20_00, "1", &["1", "1"]))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::DuplicateParticipant(_)));

    let err = engine
        .add_expense(group.id, draft("  ", 20_00, "1", &["1"]))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidExpense(_)));

    assert!(engine.expenses(group.id).await.unwrap().is_empty());
    assert_eq!(
        engine.group(group.id).await.unwrap().total_expenses,
        MoneyCents::ZERO
    );
}

#[tokio::test]
async fn unknown_group_is_not_found() {
    let (engine, _repo) = engine_with_repo().await;
    let missing = uuid::Uuid::new_v4();
    let err = engine
        .add_expense(missing, draft("Taxi", 20_00, "1", &["1"]))
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::KeyNotFound(missing.to_string()));
}

#[tokio::test]
async fn unavailable_store_is_recoverable_and_commits_nothing() {
    let (engine, repo) = engine_with_repo().await;
    let group = weekend_trip(&engine).await;

    repo.set_available(false);
    let err = engine
        .add_expense(group.id, draft("Dinner", 150_75, "2", &["1", "2", "3"]))
        .await
        .unwrap_err();
    assert!(err.is_recoverable());

    repo.set_available(true);
    assert!(engine.expenses(group.id).await.unwrap().is_empty());

    engine
        .add_expense(group.id, draft("Dinner", 150_75, "2", &["1", "2", "3"]))
        .await
        .unwrap();
    assert_eq!(
        engine.group(group.id).await.unwrap().total_expenses,
        MoneyCents::new(150_75)
    );
}

#[tokio::test]
async fn refresh_total_heals_a_stale_cache() {
    let (engine, repo) = engine_with_repo().await;
    let mut group = Group::new("Office Lunch", None, ids(&["1", "4", "5"]), Utc::now()).unwrap();
    let lunch = draft("Pizza lunch", 89_50, "4", &["1", "4", "5"])
        .into_expense(&group)
        .unwrap();
    group.total_expenses = MoneyCents::new(12_00);
    repo.seed(vec![group.clone()], vec![lunch]).await;

    let total = engine.refresh_total(group.id).await.unwrap();
    assert_eq!(total, MoneyCents::new(89_50));
    assert_eq!(engine.group(group.id).await.unwrap().total_expenses, total);
}

#[tokio::test]
async fn watch_receives_new_expenses() {
    let (engine, _repo) = engine_with_repo().await;
    let group = weekend_trip(&engine).await;
    engine
        .add_expense(group.id, draft("Hotel booking", 300_00, "1", &["1", "2", "3"]))
        .await
        .unwrap();

    let mut watch = engine.watch_group(group.id).await.unwrap();
    assert_eq!(watch.cache().expenses().len(), 1);

    engine
        .add_expense(group.id, draft("Dinner", 150_75, "2", &["1", "2", "3"]))
        .await
        .unwrap();

    let cache = watch.next().await.unwrap().unwrap();
    assert_eq!(cache.expenses().len(), 2);
    assert_eq!(cache.balance().total_expenses, MoneyCents::new(450_75));
    assert_eq!(cache.balance().net_sum(), MoneyCents::ZERO);

    let cache = watch.close();
    assert_eq!(cache.expenses()[0].description, "Hotel booking");
}

#[tokio::test]
async fn watch_tolerates_duplicate_and_unordered_delivery() {
    let (engine, repo) = engine_with_repo().await;
    let group = weekend_trip(&engine).await;
    let mut watch = engine.watch_group(group.id).await.unwrap();

    let start = Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap();
    let mut hotel = draft("Hotel booking", 300_00, "1", &["1", "2", "3"]);
    hotel.created_at = start;
    let hotel = hotel.into_expense(&group).unwrap();
    let mut dinner = draft("Dinner", 150_75, "2", &["1", "2", "3"]);
    dinner.created_at = start + Duration::days(1);
    let dinner = dinner.into_expense(&group).unwrap();

    repo.deliver(group.id, vec![dinner.clone(), hotel.clone(), dinner.clone()])
        .await;

    let cache = watch.next().await.unwrap().unwrap();
    let order: Vec<&str> = cache
        .expenses()
        .iter()
        .map(|e| e.description.as_str())
        .collect();
    assert_eq!(order, ["Hotel booking", "Dinner"]);
    assert_eq!(cache.balance().total_expenses, MoneyCents::new(450_75));
}

#[tokio::test]
async fn watch_reports_inconsistent_snapshot_and_keeps_running() {
    let (engine, repo) = engine_with_repo().await;
    let group = weekend_trip(&engine).await;
    let hotel = engine
        .add_expense(group.id, draft("Hotel booking", 300_00, "1", &["1", "2", "3"]))
        .await
        .unwrap();
    let mut watch = engine.watch_group(group.id).await.unwrap();

    let mut stray: Expense = hotel.clone();
    stray.id = uuid::Uuid::new_v4();
    stray.paid_by = "9".into();
    repo.deliver(group.id, vec![hotel.clone(), stray]).await;

    let err = watch.next().await.unwrap().unwrap_err();
    assert!(matches!(err, EngineError::InconsistentData(_)));
    assert_eq!(watch.cache().expenses(), &[hotel.clone()]);

    repo.deliver(group.id, vec![hotel.clone()]).await;
    let cache = watch.next().await.unwrap().unwrap();
    assert_eq!(cache.expenses(), &[hotel]);
}

#[tokio::test]
async fn watch_reloads_group_total() {
    let (engine, _repo) = engine_with_repo().await;
    let group = weekend_trip(&engine).await;
    let mut watch = engine.watch_group(group.id).await.unwrap();
    assert!(watch.cache().total_matches_group());

    engine
        .add_expense(group.id, draft("Taxi", 10_00, "3", &["2", "3"]))
        .await
        .unwrap();

    let cache = watch.next().await.unwrap().unwrap();
    assert!(cache.total_matches_group());
    assert_eq!(cache.group().total_expenses, MoneyCents::new(10_00));
}

#[tokio::test]
async fn failed_total_write_keeps_expense_until_next_refresh() {
    let (engine, repo) = engine_with_repo().await;
    let group = weekend_trip(&engine).await;

    repo.set_total_updates_fail(true);
    let dinner = engine
        .add_expense(group.id, draft("Dinner", 150_75, "2", &["1", "2", "3"]))
        .await
        .unwrap();
    assert_eq!(engine.expenses(group.id).await.unwrap(), vec![dinner]);
    assert_eq!(
        engine.group(group.id).await.unwrap().total_expenses,
        MoneyCents::ZERO
    );
    assert!(
        engine
            .refresh_total(group.id)
            .await
            .unwrap_err()
            .is_recoverable()
    );

    repo.set_total_updates_fail(false);
    let total = engine.refresh_total(group.id).await.unwrap();
    assert_eq!(total, MoneyCents::new(150_75));
    assert_eq!(engine.group(group.id).await.unwrap().total_expenses, total);
}

#[tokio::test]
async fn expense_from_form_text() {
    let (engine, _repo) = engine_with_repo().await;
    let group = weekend_trip(&engine).await;

    let draft = ExpenseDraft::from_form(
        "Pizza lunch",
        "$89.50",
        "1".into(),
        ids(&["1", "2", "3"]),
        Utc::now(),
    )
    .unwrap();
    let lunch = engine.add_expense(group.id, draft).await.unwrap();
    assert_eq!(lunch.amount, MoneyCents::new(89_50));
    assert_eq!(lunch.amount_per_person, MoneyCents::new(29_83));
}

#[tokio::test]
async fn overview_sums_every_group() {
    let (engine, _repo) = engine_with_repo().await;
    let trip = weekend_trip(&engine).await;
    let lunch = engine
        .create_group("Office Lunch", Some("Fridays"), ids(&["1", "4", "5"]), Utc::now())
        .await
        .unwrap();
    assert_eq!(lunch.description.as_deref(), Some("Fridays"));

    engine
        .add_expense(trip.id, draft("Hotel booking", 300_00, "1", &["1", "2", "3"]))
        .await
        .unwrap();
    engine
        .add_expense(lunch.id, draft("Pizza lunch", 89_50, "4", &["1", "4", "5"]))
        .await
        .unwrap();

    let summary = engine.overview().await.unwrap();
    assert_eq!(summary.group_count, 2);
    assert_eq!(summary.total_expenses, MoneyCents::new(389_50));
    assert_eq!(summary.distinct_members, 5);
}

#[tokio::test]
async fn create_group_rejects_duplicate_members() {
    let (engine, _repo) = engine_with_repo().await;
    let err = engine
        .create_group("Trip", None, ids(&["1", "2", "1"]), Utc::now())
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::DuplicateParticipant(_)));
    assert!(engine.groups().await.unwrap().is_empty());
}
