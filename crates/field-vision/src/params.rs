//! Pipeline configuration and its JSON form.

use std::{fs, path::Path};

use field_vision_core::FrameGeometry;
use field_vision_lines::LineParams;
use field_vision_objects::LandmarkParams;
use field_vision_pose::{FieldLayout, FieldPose, PoseParams};
use field_vision_threshold::ThresholdParams;
use serde::{Deserialize, Serialize};

use crate::VisionIoError;

/// Everything tunable in a [`crate::Vision`] pipeline.
///
/// Missing JSON fields take their defaults.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VisionParams {
    /// Frame resolution and color table quantization.
    pub threshold: ThresholdParams,
    pub pose: PoseParams,
    pub field: FieldLayout,
    pub landmarks: LandmarkParams,
    pub lines: LineParams,
    /// Draw detections into the debug overlay and composite it into
    /// [`crate::Vision::write_classified`] output.
    pub debug_overlay: bool,
    /// When set, every frame also reports the field lines expected from
    /// this robot pose.
    pub line_hypothesis: Option<FieldPose>,
}

impl VisionParams {
    #[inline]
    pub fn geometry(&self) -> FrameGeometry {
        self.threshold.geometry
    }

    /// Load a JSON config from disk.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, VisionIoError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Write this config to disk as pretty JSON.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), VisionIoError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_round_trip_through_a_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("vision.json");

        let mut params = VisionParams {
            debug_overlay: true,
            line_hypothesis: Some(FieldPose::new(370.0, 270.0, 0.5)),
            ..VisionParams::default()
        };
        params.lines.scan_spacing = 2;
        params.landmarks.goal.min_post_height = 20;
        params.write_json(&path).expect("write");

        let loaded = VisionParams::load_json(&path).expect("load");
        assert_eq!(loaded, params);
    }

    #[test]
    fn partial_json_fills_defaults() {
        let params: VisionParams =
            serde_json::from_str(r#"{"debug_overlay": true, "lines": {"scan_spacing": 8}}"#)
                .expect("valid json");
        assert!(params.debug_overlay);
        assert_eq!(params.lines.scan_spacing, 8);
        assert_eq!(params.lines.min_line_points, LineParams::default().min_line_points);
        assert_eq!(params.geometry(), FrameGeometry::default());
        assert_eq!(params.field, FieldLayout::standard());
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = VisionParams::load_json(dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, VisionIoError::Io(_)));
    }
}
