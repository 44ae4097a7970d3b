use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::Arc;

use dg_cli::{OutputMode, print_report, read_ballots};
use dg_core::{GameRng, GameSession, GameSettings, MemoryNotifier, RoleCatalog, Vote};

fn demo_input() -> BufReader<File> {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("demos/input.txt");
    BufReader::new(File::open(path).unwrap())
}

#[tokio::test]
async fn test_demo_input_runs_a_session() {
    let catalog = RoleCatalog::standard();
    let ballots = read_ballots(&mut demo_input(), &mut Vec::new(), &catalog).unwrap();
    let votes: Vec<Vote> = ballots.iter().map(|(_, vote)| *vote).collect();
    assert_eq!(
        votes,
        [Vote::Entry(0), Vote::Entry(1), Vote::Random, Vote::Entry(4), Vote::Random]
    );

    let session = GameSession::start(
        catalog,
        GameSettings::default(),
        Arc::new(MemoryNotifier::new()),
        ballots,
        &mut GameRng::new(420),
    )
    .unwrap();

    let mut out = Vec::new();
    print_report(&mut out, &session.report(), OutputMode::Text).unwrap();
    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("Minjun Shin    -> Detective roles\n"));
    assert!(text.contains("Jiwoo Park     -> Random roles\n"));
    assert_eq!(text.matches("Killer: ").count(), 1);

    session.shutdown().await;
}

#[tokio::test]
async fn test_same_seed_same_roles() {
    let roles = |seed| async move {
        let catalog = RoleCatalog::standard();
        let ballots = read_ballots(&mut demo_input(), &mut Vec::new(), &catalog).unwrap();
        let session = GameSession::start(
            catalog,
            GameSettings::default(),
            Arc::new(MemoryNotifier::new()),
            ballots,
            &mut GameRng::new(seed),
        )
        .unwrap();
        let report = session.report();
        session.shutdown().await;
        (report.results, report.killers)
    };
    assert_eq!(roles(7).await, roles(7).await);
}
