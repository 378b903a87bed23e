use field_vision_core::{Estimate, LinePoint, VisualLine};
use nalgebra::Point2;
use serde::{Deserialize, Serialize};

/// Local shape of a line intersection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CornerShape {
    /// Both arms run toward the camera from the vertex.
    InnerL,
    /// At least one arm runs away from the camera.
    OuterL,
    T,
    X,
}

impl CornerShape {
    pub fn code(self) -> u8 {
        match self {
            CornerShape::InnerL => 0,
            CornerShape::OuterL => 1,
            CornerShape::T => 2,
            CornerShape::X => 3,
        }
    }
}

/// Intersection of two detected lines with its field-relative position.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct VisualCorner {
    /// Intersection in pixels.
    pub image: Point2<f32>,
    pub estimate: Estimate,
    pub shape: CornerShape,
    /// Indices of the two lines in [`LineDetection::lines`].
    pub lines: [usize; 2],
}

impl VisualCorner {
    #[inline]
    pub fn dist(&self) -> f32 {
        self.estimate.dist
    }

    #[inline]
    pub fn bearing(&self) -> f32 {
        self.estimate.bearing
    }
}

/// Output of one line detection pass.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LineDetection {
    pub lines: Vec<VisualLine>,
    /// Line-colored points that did not join any line.
    pub unused_points: Vec<LinePoint>,
    pub corners: Vec<VisualCorner>,
    /// Every point the scans produced.
    pub scanned_points: usize,
}

impl LineDetection {
    /// Points held by lines plus unused points.
    pub fn accounted_points(&self) -> usize {
        self.lines.iter().map(|l| l.points.len()).sum::<usize>() + self.unused_points.len()
    }
}

/// Parameters for [`crate::LineDetector`].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LineParams {
    /// Pixels between neighbouring scan lines.
    pub scan_spacing: usize,
    /// Accepted run length along a scan, pixels.
    pub min_line_width: usize,
    pub max_line_width: usize,
    /// Scan lines a chain may skip before it is closed.
    pub max_scan_gap: usize,
    /// Allowed distance of a new point from the chain's predicted position.
    pub max_deviation: f32,
    /// Slope limit for the second point of a chain.
    pub max_slope: f32,
    /// Chains shorter than this become unused points.
    pub min_line_points: usize,
    /// Collinear merge limits: angle (radians), normal distance and end gap
    /// (pixels).
    pub merge_angle: f32,
    pub merge_distance: f32,
    pub merge_gap: f32,
    /// Lines meeting at a shallower angle do not form a corner.
    pub min_corner_angle: f32,
    /// How close to a line end an intersection must be to count as that end.
    pub corner_tolerance: f32,
}

impl Default for LineParams {
    fn default() -> Self {
        Self {
            scan_spacing: 4,
            min_line_width: 1,
            max_line_width: 40,
            max_scan_gap: 3,
            max_deviation: 3.0,
            max_slope: 1.5,
            min_line_points: 3,
            merge_angle: 0.1,
            merge_distance: 4.0,
            merge_gap: 32.0,
            min_corner_angle: 0.5,
            corner_tolerance: 10.0,
        }
    }
}
