//! Calibrated table zones: persistence, detection assignment and cropping
//!
//! Player zones are stored as one list of card rectangles per seat in
//! `p_slots.json`; board zones as one rectangle per community slot in
//! `f_slots.json`. Seats are numbered from 1 in file order.

use crate::bbox::{BBox, BBoxCollection};
use crate::error::ZoneError;
use crate::utils::ImageUtils;
use crate::Result;
use anyhow::Context;
use image::RgbImage;
use pokertable_core::files::write_json_atomic;
use pokertable_core::PlayerId;
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::Path;
use tracing::debug;

/// A region of the table that produces observations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd)]
pub enum ZoneId {
    Player(PlayerId),
    Board(u8),
}

impl fmt::Display for ZoneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ZoneId::Player(player) => write!(f, "player {player}"),
            ZoneId::Board(index) => write!(f, "board {index}"),
        }
    }
}

type PlayerRects = Vec<Vec<[f64; 4]>>;
type BoardRects = Vec<[f64; 4]>;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ZoneLayout {
    players: Vec<Vec<BBox>>,
    board: Vec<BBox>,
}

impl ZoneLayout {
    pub fn new(players: Vec<Vec<BBox>>, board: Vec<BBox>) -> Self {
        Self { players, board }
    }

    pub fn load(players_path: &Path, board_path: &Path) -> Result<Self> {
        let players: PlayerRects = load_rects(players_path)?;
        let board: BoardRects = load_rects(board_path)?;

        let layout = Self::new(
            players
                .into_iter()
                .map(|seat| seat.into_iter().map(BBox::from_rect).collect())
                .collect(),
            board.into_iter().map(BBox::from_rect).collect(),
        );
        layout.validate()?;

        debug!(
            players = layout.players.len(),
            board = layout.board.len(),
            "zone layout loaded"
        );
        Ok(layout)
    }

    pub fn save(&self, players_path: &Path, board_path: &Path) -> Result<()> {
        let players: PlayerRects = self
            .players
            .iter()
            .map(|seat| seat.iter().map(BBox::to_rect).collect())
            .collect();
        let board: BoardRects = self.board.iter().map(BBox::to_rect).collect();

        write_json_atomic(players_path, &players)?;
        write_json_atomic(board_path, &board)?;
        Ok(())
    }

    pub fn validate(&self) -> std::result::Result<(), ZoneError> {
        let has_player_zone = self.players.iter().any(|seat| !seat.is_empty());
        if !has_player_zone && self.board.is_empty() {
            return Err(ZoneError::EmptyLayout);
        }
        Ok(())
    }

    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    pub fn board_count(&self) -> usize {
        self.board.len()
    }

    /// Every zone, players first.
    pub fn zone_ids(&self) -> Vec<ZoneId> {
        let players = (1..=self.players.len() as u32).map(|id| ZoneId::Player(PlayerId(id)));
        let board = (0..self.board.len() as u8).map(ZoneId::Board);
        players.chain(board).collect()
    }

    fn rects(&self) -> impl Iterator<Item = (ZoneId, &BBox)> {
        let players = self.players.iter().enumerate().flat_map(|(seat, rects)| {
            let zone = ZoneId::Player(PlayerId(seat as u32 + 1));
            rects.iter().map(move |rect| (zone, rect))
        });
        let board = self
            .board
            .iter()
            .enumerate()
            .map(|(index, rect)| (ZoneId::Board(index as u8), rect));
        players.chain(board)
    }

    /// Zone owning a detection: among rectangles containing its centre the
    /// one it overlaps most, otherwise any rectangle it overlaps most.
    pub fn locate(&self, detection: &BBox) -> Option<ZoneId> {
        let center = detection.center();
        let best_overlap = |containing: bool| {
            self.rects()
                .filter(|(_, rect)| !containing || rect.contains(center))
                .map(|(zone, rect)| (zone, rect.iou(detection)))
                .filter(|(_, overlap)| containing || *overlap > 0.0)
                .max_by(|a, b| a.1.total_cmp(&b.1))
                .map(|(zone, _)| zone)
        };
        best_overlap(true).or_else(|| best_overlap(false))
    }

    /// Groups detections by zone. Every zone is present, possibly empty;
    /// detections outside all zones are dropped.
    pub fn assign(&self, detections: BBoxCollection) -> BTreeMap<ZoneId, Vec<BBox>> {
        let mut assigned: BTreeMap<ZoneId, Vec<BBox>> =
            self.zone_ids().into_iter().map(|zone| (zone, Vec::new())).collect();

        for detection in detections {
            match self.locate(&detection) {
                Some(zone) => assigned.entry(zone).or_default().push(detection),
                None => debug!(label = %detection.class_id, "detection outside all zones"),
            }
        }
        assigned
    }

    /// Bounding rectangle of a zone; a seat covers all of its card rectangles.
    pub fn region(&self, zone: ZoneId) -> Option<BBox> {
        match zone {
            ZoneId::Player(PlayerId(id)) => {
                let seat = self.players.get((id as usize).checked_sub(1)?)?;
                seat.iter().cloned().reduce(|acc, rect| acc.union(&rect))
            }
            ZoneId::Board(index) => self.board.get(index as usize).cloned(),
        }
    }

    pub fn crop(&self, frame: &RgbImage, zone: ZoneId) -> Option<RgbImage> {
        ImageUtils::crop(frame, &self.region(zone)?)
    }
}

fn load_rects<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read zone file: {:?}", path))?;
    serde_json::from_str(&text).with_context(|| format!("Failed to parse zone file: {:?}", path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    fn layout() -> ZoneLayout {
        ZoneLayout::new(
            vec![
                vec![BBox::new(0, 100, 40, 60, 1.0), BBox::new(40, 100, 40, 60, 1.0)],
                vec![BBox::new(200, 100, 40, 60, 1.0)],
            ],
            vec![BBox::new(100, 0, 30, 40, 1.0), BBox::new(140, 0, 30, 40, 1.0)],
        )
    }

    #[test]
    fn test_zone_ids_are_one_based_seats_then_board() {
        assert_eq!(
            layout().zone_ids(),
            vec![
                ZoneId::Player(PlayerId(1)),
                ZoneId::Player(PlayerId(2)),
                ZoneId::Board(0),
                ZoneId::Board(1),
            ]
        );
    }

    #[test]
    fn test_locate_by_center_then_overlap() {
        let layout = layout();

        let in_second_card = BBox::new(45, 110, 20, 30, 0.9);
        assert_eq!(layout.locate(&in_second_card), Some(ZoneId::Player(PlayerId(1))));

        // centre at (185, 30) lies between board zones but overlaps board 1
        let straddling = BBox::new(165, 10, 40, 40, 0.9);
        assert_eq!(layout.locate(&straddling), Some(ZoneId::Board(1)));

        // centre inside both overlapping board rects; the tighter fit wins
        let nested = ZoneLayout::new(
            vec![],
            vec![BBox::new(0, 0, 100, 100, 1.0), BBox::new(10, 10, 30, 30, 1.0)],
        );
        assert_eq!(nested.locate(&BBox::new(12, 12, 25, 25, 0.9)), Some(ZoneId::Board(1)));

        let far_away = BBox::new(500, 500, 10, 10, 0.9);
        assert_eq!(layout.locate(&far_away), None);
    }

    #[test]
    fn test_assign_keeps_empty_zones() {
        let detections: BBoxCollection = vec![
            BBox::new(205, 110, 20, 30, 0.8).with_class("KH"),
            BBox::new(900, 900, 5, 5, 0.8).with_class("2C"),
        ]
        .into_iter()
        .collect();

        let assigned = layout().assign(detections);
        assert_eq!(assigned.len(), 4);
        assert_eq!(assigned[&ZoneId::Player(PlayerId(2))].len(), 1);
        assert!(assigned[&ZoneId::Board(0)].is_empty());
    }

    #[test]
    fn test_player_region_spans_all_cards() {
        let region = layout().region(ZoneId::Player(PlayerId(1))).unwrap();
        assert_eq!((region.x, region.y, region.width, region.height), (0, 100, 80, 60));
        assert!(layout().region(ZoneId::Player(PlayerId(0))).is_none());
        assert!(layout().region(ZoneId::Board(7)).is_none());
    }

    #[test]
    fn test_crop_zone() {
        let frame = RgbImage::from_pixel(300, 200, Rgb([0, 120, 0]));
        let crop = layout().crop(&frame, ZoneId::Board(1)).unwrap();
        assert_eq!(crop.dimensions(), (30, 40));
    }

    #[test]
    fn test_save_and_load() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let players = dir.path().join("p_slots.json");
        let board = dir.path().join("f_slots.json");

        layout().save(&players, &board)?;
        assert_eq!(ZoneLayout::load(&players, &board)?, layout());
        Ok(())
    }

    #[test]
    fn test_load_rejects_empty_layout() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let players = dir.path().join("p_slots.json");
        let board = dir.path().join("f_slots.json");
        fs::write(&players, "[[]]")?;
        fs::write(&board, "[]")?;

        assert!(ZoneLayout::load(&players, &board).is_err());
        assert!(ZoneLayout::load(&dir.path().join("missing.json"), &board).is_err());
        Ok(())
    }
}
