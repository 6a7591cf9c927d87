//! Bounding boxes for raw detections and calibrated table zones

use crate::error::ZoneError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Pixel coordinate in the captured frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Represents a bounding box detection with associated metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BBox {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    pub confidence: f64,
    pub class_id: String,
}

impl BBox {
    /// Create a new bounding box
    pub fn new(x: i32, y: i32, width: i32, height: i32, confidence: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
            confidence,
            class_id: String::new(),
        }
    }

    /// Create from `[x1, y1, x2, y2]` corners as emitted by the card model
    pub fn from_corners(corners: [f64; 4], confidence: f64) -> Self {
        let [x1, y1, x2, y2] = corners;
        let (left, right) = (x1.min(x2), x1.max(x2));
        let (top, bottom) = (y1.min(y2), y1.max(y2));
        Self::new(
            left.round() as i32,
            top.round() as i32,
            (right - left).round() as i32,
            (bottom - top).round() as i32,
            confidence,
        )
    }

    /// Create from a persisted `[x, y, w, h]` zone rectangle
    pub fn from_rect(rect: [f64; 4]) -> Self {
        let [x, y, w, h] = rect;
        Self::new(x.round() as i32, y.round() as i32, w.round() as i32, h.round() as i32, 1.0)
    }

    /// Convert to a persisted `[x, y, w, h]` zone rectangle
    pub fn to_rect(&self) -> [f64; 4] {
        [
            self.x as f64,
            self.y as f64,
            self.width as f64,
            self.height as f64,
        ]
    }

    /// Calculate area of the bounding box
    pub fn area(&self) -> f64 {
        (self.width.max(0) as f64) * (self.height.max(0) as f64)
    }

    /// Exclusive right edge, saturating at `i32::MAX`
    pub fn right(&self) -> i32 {
        self.x.saturating_add(self.width)
    }

    /// Exclusive bottom edge, saturating at `i32::MAX`
    pub fn bottom(&self) -> i32 {
        self.y.saturating_add(self.height)
    }

    /// Calculate center point
    pub fn center(&self) -> Point {
        Point::new(
            self.x.saturating_add(self.width / 2),
            self.y.saturating_add(self.height / 2),
        )
    }

    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x && point.x < self.right() && point.y >= self.y && point.y < self.bottom()
    }

    /// Calculate intersection over union (IoU) with another box
    pub fn iou(&self, other: &BBox) -> f64 {
        let x1 = self.x.max(other.x);
        let y1 = self.y.max(other.y);
        let x2 = self.right().min(other.right());
        let y2 = self.bottom().min(other.bottom());

        if x2 <= x1 || y2 <= y1 {
            return 0.0;
        }

        let intersection = (x2 - x1) as f64 * (y2 - y1) as f64;
        let union = self.area() + other.area() - intersection;

        intersection / union
    }

    /// Smallest box covering both
    pub fn union(&self, other: &BBox) -> BBox {
        let x1 = self.x.min(other.x);
        let y1 = self.y.min(other.y);
        let x2 = self.right().max(other.right());
        let y2 = self.bottom().max(other.bottom());
        BBox::new(
            x1,
            y1,
            x2.saturating_sub(x1),
            y2.saturating_sub(y1),
            self.confidence.max(other.confidence),
        )
    }

    /// Set class information
    pub fn with_class(mut self, class_id: impl Into<String>) -> Self {
        self.class_id = class_id.into();
        self
    }
}

/// Parses calibration input such as `"120, 640, 90, 130"`.
impl FromStr for BBox {
    type Err = ZoneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ZoneError::InvalidRect(s.to_string());
        let values: Vec<f64> = s
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|part| !part.is_empty())
            .map(|part| part.parse::<f64>().map_err(|_| invalid()))
            .collect::<Result<_, _>>()?;

        let rect: [f64; 4] = values.try_into().map_err(|_| invalid())?;
        if rect[2] <= 0.0 || rect[3] <= 0.0 {
            return Err(invalid());
        }

        let limit = i32::MAX as f64;
        let in_range = rect.iter().all(|v| v.abs() <= limit);
        if !in_range || rect[0] + rect[2] > limit || rect[1] + rect[3] > limit {
            return Err(invalid());
        }
        Ok(BBox::from_rect(rect))
    }
}

/// Raw detections of one frame
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BBoxCollection {
    boxes: Vec<BBox>,
}

impl BBoxCollection {
    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }
}

impl IntoIterator for BBoxCollection {
    type Item = BBox;
    type IntoIter = std::vec::IntoIter<BBox>;

    fn into_iter(self) -> Self::IntoIter {
        self.boxes.into_iter()
    }
}

impl FromIterator<BBox> for BBoxCollection {
    fn from_iter<T: IntoIterator<Item = BBox>>(iter: T) -> Self {
        Self {
            boxes: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bbox_iou() {
        let box1 = BBox::new(0, 0, 10, 10, 0.9);
        let box2 = BBox::new(5, 5, 10, 10, 0.8);

        let iou = box1.iou(&box2);
        assert!(iou > 0.0 && iou < 1.0);
        assert_eq!(box1.iou(&BBox::new(20, 20, 5, 5, 0.5)), 0.0);
    }

    #[test]
    fn test_from_corners_normalises_order() {
        let bbox = BBox::from_corners([110.0, 80.0, 10.0, 20.0], 0.7);
        assert_eq!((bbox.x, bbox.y, bbox.width, bbox.height), (10, 20, 100, 60));
        assert_eq!(bbox.center(), Point::new(60, 50));
    }

    #[test]
    fn test_contains_is_half_open() {
        let zone = BBox::new(0, 0, 10, 10, 1.0);
        assert!(zone.contains(Point::new(0, 0)));
        assert!(zone.contains(Point::new(9, 9)));
        assert!(!zone.contains(Point::new(10, 5)));
    }

    #[test]
    fn test_parse_calibration_rect() {
        let zone: BBox = "120, 640 90 130".parse().unwrap();
        assert_eq!(zone.to_rect(), [120.0, 640.0, 90.0, 130.0]);
        assert!("1,2,3".parse::<BBox>().is_err());
        assert!("1,2,0,4".parse::<BBox>().is_err());
        assert!("a,b,c,d".parse::<BBox>().is_err());
    }

    #[test]
    fn test_parse_rejects_edges_past_i32() {
        assert!("2147483000,0,1000,10".parse::<BBox>().is_err());
        assert!("0,2147483000,10,1000".parse::<BBox>().is_err());
        assert!("-3000000000,0,10,10".parse::<BBox>().is_err());
    }

    #[test]
    fn test_geometry_saturates_near_i32_max() {
        let edge = BBox::new(i32::MAX - 10, 0, 1000, 10, 1.0);
        assert_eq!(edge.right(), i32::MAX);
        assert!(edge.contains(Point::new(i32::MAX - 5, 5)));

        let other = BBox::new(0, 0, 10, 10, 1.0);
        assert_eq!(edge.iou(&other), 0.0);
        assert_eq!(edge.union(&other).width, i32::MAX);
    }

    #[test]
    fn test_collection_from_iterator() {
        let collection: BBoxCollection = vec![
            BBox::new(0, 0, 1, 1, 0.9).with_class("AS"),
            BBox::new(0, 0, 1, 1, 0.4).with_class("DN"),
        ]
        .into_iter()
        .collect();

        assert_eq!(collection.len(), 2);
        let labels: Vec<String> = collection.into_iter().map(|b| b.class_id).collect();
        assert_eq!(labels, vec!["AS", "DN"]);
    }
}
