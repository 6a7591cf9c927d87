//! Interactive zone calibration
//!
//! Rectangles are typed as `x,y,w,h` in frame pixels, read off any image
//! viewer showing a captured frame.

use anyhow::{Context, Result};
use dialoguer::Input;
use pokertable_cv::{BBox, ZoneLayout};
use std::path::Path;
use tracing::info;

pub fn calibrate(hole_cards: usize, players_path: &Path, board_path: &Path) -> Result<ZoneLayout> {
    let players = prompt_count("Number of players", 2)?;
    let mut seats = Vec::with_capacity(players);
    for player in 1..=players {
        let cards = prompt_count(&format!("Card zones for player {player}"), hole_cards)?;
        let rects = (1..=cards)
            .map(|card| prompt_rect(&format!("Player {player} card {card} (x,y,w,h)")))
            .collect::<Result<Vec<_>>>()?;
        seats.push(rects);
    }

    let board_slots = prompt_count("Number of board card zones", 5)?;
    let board = (1..=board_slots)
        .map(|slot| prompt_rect(&format!("Board card {slot} (x,y,w,h)")))
        .collect::<Result<Vec<_>>>()?;

    let layout = ZoneLayout::new(seats, board);
    layout.validate()?;
    layout.save(players_path, board_path)?;
    info!(
        players = layout.player_count(),
        board = layout.board_count(),
        "zone layout saved"
    );
    Ok(layout)
}

fn prompt_count(prompt: &str, default: usize) -> Result<usize> {
    Input::new()
        .with_prompt(prompt)
        .default(default)
        .interact_text()
        .with_context(|| format!("reading answer to '{prompt}'"))
}

fn prompt_rect(prompt: &str) -> Result<BBox> {
    let text: String = Input::new()
        .with_prompt(prompt)
        .validate_with(|input: &String| -> Result<(), String> {
            input.parse::<BBox>().map(|_| ()).map_err(|err| err.to_string())
        })
        .interact_text()
        .with_context(|| format!("reading answer to '{prompt}'"))?;
    Ok(text.parse()?)
}

/// Uses the persisted layout, or calibrates when asked to.
pub fn load_or_calibrate(
    set_zones: bool,
    hole_cards: usize,
    players_path: &Path,
    board_path: &Path,
) -> Result<ZoneLayout> {
    if set_zones {
        return calibrate(hole_cards, players_path, board_path);
    }
    ZoneLayout::load(players_path, board_path).with_context(|| {
        format!(
            "no usable zone layout at {} / {} (run with --set-zones)",
            players_path.display(),
            board_path.display()
        )
    })
}
