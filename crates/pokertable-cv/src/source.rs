//! Frames read from the capture process's `detections.json`
//!
//! ```json
//! {"timestamp": 1718000000.5, "frame": "frame.png",
//!  "detections": [{"label": "AS", "confidence": 0.91, "bbox": [x1, y1, x2, y2]}]}
//! ```
//!
//! `frame` is optional and resolved next to the detections file; without it
//! zones carry no crops and only the classifier fallback can fire.

use crate::bbox::{BBox, BBoxCollection};
use crate::detection::{DetectionCandidate, FrameObservation, ZoneObservation};
use crate::traits::FrameSource;
use crate::utils::ImageUtils;
use crate::zones::ZoneLayout;
use pokertable_core::files::{read_state, StateRead};
use pokertable_core::Timestamp;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DetectionFile {
    #[serde(default)]
    pub timestamp: Option<f64>,
    #[serde(default)]
    pub frame: Option<PathBuf>,
    #[serde(default)]
    pub detections: Vec<RawDetection>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawDetection {
    pub label: String,
    pub confidence: f64,
    /// `[x1, y1, x2, y2]` in frame pixels
    pub bbox: [f64; 4],
}

impl RawDetection {
    pub fn to_bbox(&self) -> BBox {
        BBox::from_corners(self.bbox, self.confidence.clamp(0.0, 1.0)).with_class(self.label.trim())
    }
}

#[derive(Debug, Clone)]
pub struct FileFrameSource {
    path: PathBuf,
    layout: ZoneLayout,
    last_consumed: Option<f64>,
}

impl FileFrameSource {
    pub fn new(path: impl Into<PathBuf>, layout: ZoneLayout) -> Self {
        Self {
            path: path.into(),
            layout,
            last_consumed: None,
        }
    }

    pub fn layout(&self) -> &ZoneLayout {
        &self.layout
    }

    /// Splits a detection file into zone observations for the given cycle time.
    pub fn observe(&self, file: &DetectionFile, now: Timestamp) -> FrameObservation {
        let boxes: BBoxCollection = file.detections.iter().map(RawDetection::to_bbox).collect();
        debug!(detections = boxes.len(), "frame read");

        let image = file.frame.as_ref().and_then(|frame| {
            let path = self.resolve(frame);
            match ImageUtils::load_rgb(&path) {
                Ok(image) => Some(image),
                Err(err) => {
                    warn!(path = %path.display(), "frame image unavailable: {err:#}");
                    None
                }
            }
        });

        let zones = self
            .layout
            .assign(boxes)
            .into_iter()
            .map(|(zone, boxes)| {
                let candidates = boxes.iter().filter_map(DetectionCandidate::from_bbox).collect();
                let observation = ZoneObservation::new(zone, candidates);
                match image.as_ref().and_then(|image| self.layout.crop(image, zone)) {
                    Some(crop) => observation.with_crop(crop),
                    None => observation,
                }
            })
            .collect();

        FrameObservation::new(now, zones)
    }

    fn resolve(&self, frame: &Path) -> PathBuf {
        match self.path.parent() {
            Some(dir) if frame.is_relative() => dir.join(frame),
            _ => frame.to_path_buf(),
        }
    }
}

impl FrameSource for FileFrameSource {
    fn next_frame(&mut self, now: Timestamp) -> FrameObservation {
        let file = match read_state::<DetectionFile>(&self.path) {
            StateRead::Loaded(file) => file,
            other => {
                debug!(path = %self.path.display(), state = other.describe(), "no detections");
                return FrameObservation::empty(now);
            }
        };

        if let Some(stamp) = file.timestamp {
            if self.last_consumed == Some(stamp) {
                return FrameObservation::empty(now);
            }
            self.last_consumed = Some(stamp);
        }

        self.observe(&file, now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::zones::ZoneId;
    use image::{Rgb, RgbImage};
    use pokertable_core::{Card, CardIdentity, PlayerId, Rank, Suit};
    use std::fs;

    fn layout() -> ZoneLayout {
        ZoneLayout::new(
            vec![vec![BBox::new(0, 0, 50, 50, 1.0)]],
            vec![BBox::new(100, 0, 50, 50, 1.0)],
        )
    }

    fn detection(label: &str, corners: [f64; 4]) -> RawDetection {
        RawDetection {
            label: label.to_string(),
            confidence: 0.8,
            bbox: corners,
        }
    }

    #[test]
    fn test_observe_assigns_labels_to_zones() {
        let source = FileFrameSource::new("detections.json", layout());
        let file = DetectionFile {
            timestamp: Some(1.0),
            frame: None,
            detections: vec![
                detection("10h", [110.0, 10.0, 140.0, 40.0]),
                detection("DN", [5.0, 5.0, 45.0, 45.0]),
                detection("joker", [5.0, 5.0, 45.0, 45.0]),
            ],
        };

        let frame = source.observe(&file, Timestamp(9.0));
        assert_eq!(frame.captured_at, Timestamp(9.0));
        assert_eq!(frame.zones.len(), 2);

        let seat = &frame.zones[0];
        assert_eq!(seat.zone, ZoneId::Player(PlayerId(1)));
        assert_eq!(seat.candidates, vec![DetectionCandidate::new(CardIdentity::FaceDown, 0.8)]);

        let board = &frame.zones[1];
        assert_eq!(
            board.candidates[0].identity,
            CardIdentity::Face(Card::new(Rank::Ten, Suit::Hearts))
        );
        assert!(board.crop.is_none());
    }

    #[test]
    fn test_next_frame_consumes_each_timestamp_once() -> crate::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("detections.json");
        let file = DetectionFile {
            timestamp: Some(42.0),
            frame: None,
            detections: vec![detection("AS", [110.0, 10.0, 140.0, 40.0])],
        };
        fs::write(&path, serde_json::to_vec(&file)?)?;

        let mut source = FileFrameSource::new(&path, layout());
        assert_eq!(source.next_frame(Timestamp(1.0)).zones.len(), 2);
        assert!(source.next_frame(Timestamp(2.0)).zones.is_empty());
        Ok(())
    }

    #[test]
    fn test_missing_or_broken_file_is_silence() -> crate::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("detections.json");
        let mut source = FileFrameSource::new(&path, layout());
        assert!(source.next_frame(Timestamp(1.0)).zones.is_empty());

        fs::write(&path, "{\"detections\": [")?;
        assert!(source.next_frame(Timestamp(2.0)).zones.is_empty());
        Ok(())
    }

    #[test]
    fn test_frame_image_gives_crops() -> crate::Result<()> {
        let dir = tempfile::tempdir()?;
        RgbImage::from_pixel(200, 100, Rgb([53, 101, 77])).save(dir.path().join("frame.png"))?;

        let source = FileFrameSource::new(dir.path().join("detections.json"), layout());
        let file = DetectionFile {
            timestamp: None,
            frame: Some("frame.png".into()),
            detections: Vec::new(),
        };

        let frame = source.observe(&file, Timestamp(1.0));
        assert!(frame.zones.iter().all(|zone| zone.crop.is_some()));
        assert_eq!(frame.zones[1].crop.as_ref().unwrap().dimensions(), (50, 50));
        Ok(())
    }
}
