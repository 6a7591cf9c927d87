//! Polling loops for the two operating modes

use crate::calibration;
use crate::config::AppConfig;
use anyhow::{Context, Result};
use pokertable_core::files::{read_state, write_json_atomic, SnapshotFiles, StateRead, WinnerReport};
use pokertable_core::{FileEventSource, PlayerId, Timestamp, TurnMode};
use pokertable_cv::traits::FrameSource;
use pokertable_cv::{Aggregator, CycleReport, FileFrameSource, TableEngine};
use std::fs;
use std::path::PathBuf;
use std::thread;
use tracing::{debug, info, warn};

/// Writes each cycle's results for the display and evaluator processes.
pub struct Outputs {
    files: SnapshotFiles,
    turn_path: PathBuf,
    winner_path: PathBuf,
    announced: Option<PlayerId>,
}

impl Outputs {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            files: config.engine.snapshot_files(),
            turn_path: config.engine.turn_path(),
            winner_path: config.engine.winner_path(),
            announced: None,
        }
    }

    pub fn publish_cards(&self, report: &CycleReport) -> Result<()> {
        self.files.publish(&report.snapshot)?;
        Ok(())
    }

    pub fn publish_turn(&mut self, report: &CycleReport) -> Result<()> {
        write_json_atomic(&self.turn_path, &report.output.report())?;
        self.check_winner(report.output.mode);
        Ok(())
    }

    /// Reports the evaluator's verdict once per completed hand.
    fn check_winner(&mut self, mode: TurnMode) -> Option<PlayerId> {
        if mode != TurnMode::Complete {
            self.announced = None;
            return None;
        }
        if self.announced.is_some() {
            return self.announced;
        }

        match read_state::<WinnerReport>(&self.winner_path) {
            StateRead::Loaded(report) => {
                let winner = report.winner()?;
                let hand = report
                    .results
                    .get(&winner.to_string())
                    .map(|result| result.hand_type.clone())
                    .unwrap_or_default();
                info!(%winner, hand = %hand, "hand winner");
                self.announced = Some(winner);
                self.announced
            }
            other => {
                debug!(state = other.describe(), "winner not available yet");
                None
            }
        }
    }
}

fn prepare_data_dir(config: &AppConfig) -> Result<()> {
    let dir = &config.engine.data_dir;
    fs::create_dir_all(dir).with_context(|| format!("creating data directory at {}", dir.display()))
}

fn cycles_done(limit: Option<u64>, done: u64) -> bool {
    limit.is_some_and(|limit| done >= limit)
}

/// Full pipeline: detections in, card files and turn output out.
pub fn run(config: &AppConfig, set_zones: bool, cycles: Option<u64>) -> Result<()> {
    prepare_data_dir(config)?;
    let (players_path, board_path) = config.engine.zone_paths();
    let layout = calibration::load_or_calibrate(
        set_zones,
        config.detection.hole_cards,
        &players_path,
        &board_path,
    )?;

    let mut frames = FileFrameSource::new(config.engine.detections_path(), layout);
    let events = FileEventSource::new(config.engine.action_event_path());
    let mut engine = TableEngine::new(Aggregator::new(config.detection.clone()), events);
    let mut outputs = Outputs::new(config);

    info!(
        data_dir = %config.engine.data_dir.display(),
        interval_ms = config.engine.poll_interval_ms,
        "table engine running"
    );

    let mut done = 0;
    while !cycles_done(cycles, done) {
        let frame = frames.next_frame(Timestamp::now());
        let report = engine.tick(&frame);
        if report.aggregate.evicted > 0 {
            debug!(evicted = report.aggregate.evicted, "stale slots dropped");
        }

        if let Err(err) = outputs.publish_cards(&report) {
            warn!("publishing card files failed: {err:#}");
        }
        if let Err(err) = outputs.publish_turn(&report) {
            warn!("publishing turn failed: {err:#}");
        }

        done += 1;
        thread::sleep(config.engine.poll_interval());
    }
    Ok(())
}

/// Turn tracking only, over card files published by another process.
pub fn track(config: &AppConfig, cycles: Option<u64>) -> Result<()> {
    prepare_data_dir(config)?;
    let files = config.engine.snapshot_files();
    let events = FileEventSource::new(config.engine.action_event_path());
    let mut engine = TableEngine::new(Aggregator::new(config.detection.clone()), events);
    let mut outputs = Outputs::new(config);

    info!(data_dir = %config.engine.data_dir.display(), "turn tracker running");

    let mut done = 0;
    while !cycles_done(cycles, done) {
        let report = engine.tick_snapshot(files.load(), Timestamp::now());
        if let Err(err) = outputs.publish_turn(&report) {
            warn!("publishing turn failed: {err:#}");
        }

        done += 1;
        thread::sleep(config.engine.poll_interval());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pokertable_core::files::TurnReport;

    fn config_in(dir: &std::path::Path) -> AppConfig {
        let mut config = AppConfig::default();
        config.engine.data_dir = dir.to_path_buf();
        config.engine.poll_interval_ms = 1;
        config
    }

    fn seat_players(config: &AppConfig, ts: f64) -> Result<()> {
        let entry = format!(r#"{{"0": {{"name": "DN", "conf": 0.9, "ts": {ts}}}}}"#);
        fs::write(
            config.engine.path("player_cards.json"),
            format!(r#"{{"1": {entry}, "2": {entry}}}"#),
        )?;
        Ok(())
    }

    fn published_turn(config: &AppConfig) -> Result<TurnReport> {
        Ok(serde_json::from_str(&fs::read_to_string(config.engine.turn_path())?)?)
    }

    #[test]
    fn track_publishes_turn_from_card_files() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let config = config_in(dir.path());
        seat_players(&config, Timestamp::now().0)?;

        track(&config, Some(1))?;

        let turn = published_turn(&config)?;
        assert_eq!(turn.turn, "Player 1");
        assert_eq!(turn.instruction, "Awaiting Action from Player 1");
        Ok(())
    }

    #[test]
    fn track_ignores_stale_card_files() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let config = config_in(dir.path());
        seat_players(&config, 1.0)?;

        track(&config, Some(1))?;

        let turn = published_turn(&config)?;
        assert_eq!(turn.mode, "Idle");
        assert_eq!(turn.instruction, "WAITING FOR NEW HAND (No active players)");
        Ok(())
    }

    #[test]
    fn run_without_layout_fails_at_startup() -> Result<()> {
        let dir = tempfile::tempdir()?;
        assert!(run(&config_in(dir.path()), false, Some(1)).is_err());
        Ok(())
    }

    #[test]
    fn run_publishes_cards_from_detections() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let config = config_in(dir.path());
        let (players_path, board_path) = config.engine.zone_paths();
        fs::write(&players_path, "[[[0, 0, 50, 50]]]")?;
        fs::write(&board_path, "[[100, 0, 50, 50]]")?;
        fs::write(
            config.engine.detections_path(),
            r#"{"detections": [
                {"label": "DN", "confidence": 0.9, "bbox": [5, 5, 45, 45]},
                {"label": "QD", "confidence": 0.8, "bbox": [105, 5, 145, 45]}]}"#,
        )?;

        run(&config, false, Some(1))?;

        let board = fs::read_to_string(config.engine.path("flop_cards.json"))?;
        assert!(board.contains("\"QD\""));
        assert_eq!(published_turn(&config)?.mode, "Action");
        Ok(())
    }

    #[test]
    fn winner_is_announced_once_per_hand() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let mut outputs = Outputs::new(&config_in(dir.path()));
        assert_eq!(outputs.check_winner(TurnMode::Complete), None);

        fs::write(
            &outputs.winner_path,
            r#"{"winner_id": "2", "results": {"2": {"score": 7, "hand_type": "Flush", "is_winner": true}}}"#,
        )?;
        assert_eq!(outputs.check_winner(TurnMode::Complete), Some(PlayerId(2)));
        assert_eq!(outputs.check_winner(TurnMode::Complete), Some(PlayerId(2)));
        assert_eq!(outputs.check_winner(TurnMode::Idle), None);
        Ok(())
    }
}
