use curexo::{bootstrap, commands, init_logging, routes::Route};

#[tokio::test]
async fn bootstrap_creates_database_and_guards_pages() {
    init_logging();
    let dir = tempfile::tempdir().unwrap();
    let data_dir = dir.path().join("nested");

    let state = bootstrap(&data_dir).unwrap();
    assert!(data_dir.join("curexo.sqlite3").exists());
    assert_eq!(state.config.path(), data_dir.join("settings.json"));

    state.start();
    let mut gate = state.gate.watch();
    gate.wait_for(|gate| !gate.is_loading).await.unwrap();

    let route = commands::navigate(&state, "/dashboard".into()).await.unwrap();
    assert_eq!(route, Route::Login);
    let route = commands::navigate(&state, "/auth/register".into()).await.unwrap();
    assert_eq!(route, Route::Register);
    assert!(commands::navigate(&state, "/nowhere".into()).await.is_err());

    state.shutdown().await;
}

#[tokio::test]
async fn settings_survive_a_restart() {
    let dir = tempfile::tempdir().unwrap();

    let first = bootstrap(dir.path()).unwrap();
    let mut latency = first.config.get().chat_latency;
    latency.assistant_ms = 250;
    first.config.update_chat_latency(latency).unwrap();
    drop(first);

    let second = bootstrap(dir.path()).unwrap();
    assert_eq!(second.config.get().chat_latency.assistant_ms, 250);
}
