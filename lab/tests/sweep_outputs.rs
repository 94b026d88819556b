use anyhow::Result;
use playerbot_lab::arena::ArenaSettings;
use playerbot_lab::profiles::profile_ids;
use playerbot_lab::runner::run_profile;
use playerbot_lab::sweep::{resolve_profiles, run_sweep, SweepConfig};

#[test]
fn every_profile_runs_without_viewport_violations() -> Result<()> {
    let settings = ArenaSettings::default();
    for profile in profile_ids() {
        let metrics = run_profile(profile, 0xDEAD_BEEF, 250, &settings)?;
        assert_eq!(metrics.ticks, 250, "profile={profile}");
        assert_eq!(metrics.viewport_violations, 0, "profile={profile}");
        assert!(metrics.spawn_requests >= 1, "profile={profile}");
        let decided = metrics.pursuit_ticks
            + metrics.split_commits
            + metrics.field_ticks
            + metrics.wander_ticks
            + metrics.idle_ticks;
        assert_eq!(decided, 250, "profile={profile}");
    }
    Ok(())
}

#[test]
fn same_seed_same_metrics() -> Result<()> {
    let settings = ArenaSettings::default();
    let a = run_profile("stock", 0xC0FF_EE11, 400, &settings)?;
    let b = run_profile("stock", 0xC0FF_EE11, 400, &settings)?;
    assert_eq!(a.split_commits, b.split_commits);
    assert_eq!(a.food_eaten, b.food_eaten);
    assert_eq!(a.max_size, b.max_size);
    Ok(())
}

#[test]
fn unknown_profile_is_an_error() {
    assert!(run_profile("no-such-profile", 1, 10, &ArenaSettings::default()).is_err());
    assert!(resolve_profiles(Some(" , ")).is_err());
}

#[test]
fn sweep_smoke_outputs_expected_files() -> Result<()> {
    let tmp = tempfile::tempdir()?;
    let report = run_sweep(SweepConfig {
        profiles: resolve_profiles(Some("stock,megasplit"))?,
        seeds: vec![0xDEAD_BEEF, 0x1234_5678],
        ticks: 200,
        arena: ArenaSettings::default(),
        out_dir: tmp.path().to_path_buf(),
        jobs: Some(2),
    })?;

    assert_eq!(report.run_count, 4);
    assert_eq!(report.profile_rankings.len(), 2);
    assert!(report
        .profile_rankings
        .iter()
        .all(|profile| profile.runs == 2 && profile.viewport_violations == 0));
    assert!(tmp.path().join("summary.json").exists());
    assert!(tmp.path().join("runs.csv").exists());
    assert!(tmp.path().join("profiles.csv").exists());

    let runs_csv = std::fs::read_to_string(tmp.path().join("runs.csv"))?;
    assert_eq!(runs_csv.lines().count(), 5);
    Ok(())
}
