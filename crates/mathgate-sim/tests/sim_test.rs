//! Plays the bundled level end to end.

use std::path::PathBuf;

use mathgate_level::load_level;
use mathgate_sim::config::SimConfig;
use mathgate_sim::player::PlayerProfile;
use mathgate_sim::simulate;

fn config(seed: u64) -> SimConfig {
    let root = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../..");
    SimConfig::from_lookup(|name| match name {
        "LEVEL_PATH" => Some(root.join("levels/canyon_run.yaml").display().to_string()),
        "SEED" => Some(seed.to_string()),
        "TICK_HZ" => Some("30".to_owned()),
        _ => None,
    })
    .unwrap()
}

#[test]
fn scripted_player_reaches_the_finish() {
    let config = config(11);
    let level = load_level(&config.level_path).unwrap();

    let report = simulate(&level, &config, PlayerProfile::default()).unwrap();

    assert!(report.finished);
    assert_eq!(report.zones, 5);
    assert_eq!(report.correct + report.incorrect + report.timed_out, 5);
    assert_eq!(
        report.totals.wrong_answers as usize,
        report.incorrect + report.timed_out
    );
    assert!(report.events >= 10);
    assert_eq!(report.seed, 11);
}

#[test]
fn perfect_player_scores_every_bonus() {
    let config = config(5);
    let level = load_level(&config.level_path).unwrap();
    let profile = PlayerProfile {
        accuracy: 1.0,
        stall_chance: 0.0,
        hint_chance: 0.0,
        ..PlayerProfile::default()
    };

    let report = simulate(&level, &config, profile).unwrap();

    assert_eq!(report.correct, 5);
    assert_eq!(report.totals.score, 500 * 4 + 1000);
    assert_eq!(report.totals.currency, 100);
}

#[test]
fn same_seed_replays_identically() {
    let config = config(23);
    let level = load_level(&config.level_path).unwrap();

    let first = simulate(&level, &config, PlayerProfile::default()).unwrap();
    let second = simulate(&level, &config, PlayerProfile::default()).unwrap();

    assert_eq!(first.totals, second.totals);
    assert_eq!(first.frames, second.frames);
}
