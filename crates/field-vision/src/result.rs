//! Per-frame scene description and its flat report form.

use std::{fs, path::Path, time::Duration};

use field_vision_core::{Horizon, LinePoint, VisualLine};
use field_vision_lines::{LineDetection, VisualCorner};
use field_vision_objects::{Landmark, LandmarkKind, LandmarkQuad, LandmarkSet};
use serde::{Deserialize, Serialize};

use crate::VisionIoError;

/// Everything one frame produced.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameResult {
    /// Sequence number of the frame within this pipeline.
    pub frame: u64,
    /// Time spent thresholding and detecting.
    pub duration: Duration,
    pub landmarks: LandmarkSet,
    pub lines: LineDetection,
    pub horizon: Horizon,
    /// Lines expected from the configured pose hypothesis, if any.
    pub expected_lines: Option<Vec<VisualLine>>,
}

impl FrameResult {
    #[inline]
    pub fn ball(&self) -> Option<&Landmark> {
        self.landmarks.ball.as_ref()
    }

    #[inline]
    pub fn corners(&self) -> &[VisualCorner] {
        &self.lines.corners
    }

    #[inline]
    pub fn unused_points(&self) -> &[LinePoint] {
        &self.lines.unused_points
    }

    pub fn report(&self) -> FrameReport {
        FrameReport {
            frame: self.frame,
            duration_ms: self.duration.as_secs_f64() * 1e3,
            ball: self.landmarks.ball.as_ref().map(BallReport::from),
            field_objects: self
                .landmarks
                .field_objects()
                .filter_map(FieldObjectReport::from_landmark)
                .collect(),
            lines: self.lines.lines.iter().map(LineReport::from).collect(),
            unused_points: self
                .lines
                .unused_points
                .iter()
                .map(PointReport::from)
                .collect(),
            corners: self.lines.corners.iter().map(CornerReport::from).collect(),
            horizon: self.horizon,
            expected_lines: self
                .expected_lines
                .as_ref()
                .map(|lines| lines.iter().map(LineReport::from).collect()),
        }
    }
}

/// Ball as reported to collaborators.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BallReport {
    pub width: f32,
    pub height: f32,
    /// Top-left corner of the bounding box.
    pub x: i32,
    pub y: i32,
    pub center_x: f32,
    pub center_y: f32,
    pub radius: f32,
}

impl From<&Landmark> for BallReport {
    fn from(ball: &Landmark) -> Self {
        Self {
            width: ball.width,
            height: ball.height,
            x: ball.quad.top_left.x,
            y: ball.quad.top_left.y,
            center_x: ball.center.x,
            center_y: ball.center.y,
            radius: ball.radius(),
        }
    }
}

/// Goal post, crossbar or center cross with its identity code.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FieldObjectReport {
    pub code: u8,
    pub kind: LandmarkKind,
    pub quad: LandmarkQuad,
    pub width: f32,
    pub height: f32,
}

impl FieldObjectReport {
    fn from_landmark(lm: &Landmark) -> Option<Self> {
        Some(Self {
            code: lm.kind.code()?,
            kind: lm.kind,
            quad: lm.quad,
            width: lm.width,
            height: lm.height,
        })
    }
}

/// Line point with its scan direction code (0 horizontal, 1 vertical).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PointReport {
    pub x: i32,
    pub y: i32,
    pub width: f32,
    pub scan: u8,
}

impl From<&LinePoint> for PointReport {
    fn from(p: &LinePoint) -> Self {
        Self {
            x: p.x,
            y: p.y,
            width: p.line_width,
            scan: p.found_with.code(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LineReport {
    pub start: PointReport,
    pub end: PointReport,
    pub points: Vec<PointReport>,
}

impl From<&VisualLine> for LineReport {
    fn from(line: &VisualLine) -> Self {
        Self {
            start: PointReport::from(&line.start),
            end: PointReport::from(&line.end),
            points: line.points.iter().map(PointReport::from).collect(),
        }
    }
}

/// Corner at its image vertex, located on the field through `x`, `y`,
/// `dist` and `bearing` (all zero without a ground solution).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CornerReport {
    pub image_x: i32,
    pub image_y: i32,
    pub x: f32,
    pub y: f32,
    pub dist: f32,
    pub bearing: f32,
    pub shape: u8,
}

impl From<&VisualCorner> for CornerReport {
    fn from(c: &VisualCorner) -> Self {
        Self {
            image_x: c.image.x.round() as i32,
            image_y: c.image.y.round() as i32,
            x: c.estimate.x,
            y: c.estimate.y,
            dist: c.dist(),
            bearing: c.bearing(),
            shape: c.shape.code(),
        }
    }
}

/// Serializable summary of a [`FrameResult`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FrameReport {
    pub frame: u64,
    pub duration_ms: f64,
    pub ball: Option<BallReport>,
    pub field_objects: Vec<FieldObjectReport>,
    pub lines: Vec<LineReport>,
    pub unused_points: Vec<PointReport>,
    pub corners: Vec<CornerReport>,
    pub horizon: Horizon,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_lines: Option<Vec<LineReport>>,
}

impl FrameReport {
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, VisionIoError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), VisionIoError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}
