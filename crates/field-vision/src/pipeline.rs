//! The per-frame pipeline context.

use std::time::Instant;

use field_vision_core::{
    ClassifiedMap, DebugOverlay, Estimate, FrameGeometry, Horizon, VisualLine,
};
use field_vision_lines::LineDetector;
use field_vision_objects::LandmarkDetector;
use field_vision_pose::{CameraCalibration, PoseModel, SensorState};
use field_vision_threshold::{ColorTable, Thresholder};

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::annotate::annotate;
use crate::{FrameResult, VisionError, VisionParams};

/// Owns every stage of the pipeline and the state shared between frames:
/// color table, calibration, pose and the reusable classified map.
///
/// All mutation goes through `&mut self`, so table reloads and calibration
/// changes can only happen between frames.
#[derive(Clone, Debug)]
pub struct Vision {
    params: VisionParams,
    thresholder: Thresholder,
    pose: PoseModel,
    landmarks: LandmarkDetector,
    lines: LineDetector,
    map: ClassifiedMap,
    frames: u64,
}

impl Vision {
    /// Pipeline with an all-`Undefined` color table.
    pub fn new(params: VisionParams) -> Result<Self, VisionError> {
        let thresholder = Thresholder::new(params.threshold)?;
        Ok(Self::assemble(params, thresholder))
    }

    /// Pipeline with a prepared color table. The table's quantization
    /// replaces the configured one.
    pub fn with_table(mut params: VisionParams, table: ColorTable) -> Result<Self, VisionError> {
        params.threshold.quantization = table.quantization();
        let thresholder = Thresholder::with_table(params.geometry(), table)?;
        Ok(Self::assemble(params, thresholder))
    }

    fn assemble(params: VisionParams, thresholder: Thresholder) -> Self {
        let geometry = params.geometry();
        Self {
            pose: PoseModel::new(geometry, params.pose, params.field.clone()),
            landmarks: LandmarkDetector::new(params.landmarks),
            lines: LineDetector::new(params.lines),
            map: ClassifiedMap::new(geometry.width, geometry.height),
            thresholder,
            params,
            frames: 0,
        }
    }

    #[inline]
    pub fn params(&self) -> &VisionParams {
        &self.params
    }

    #[inline]
    pub fn geometry(&self) -> FrameGeometry {
        self.params.geometry()
    }

    #[inline]
    pub fn pose(&self) -> &PoseModel {
        &self.pose
    }

    #[inline]
    pub fn thresholder(&self) -> &Thresholder {
        &self.thresholder
    }

    /// Classified map of the last accepted frame.
    #[inline]
    pub fn classified(&self) -> &ClassifiedMap {
        &self.map
    }

    #[inline]
    pub fn overlay(&self) -> &DebugOverlay {
        self.thresholder.overlay()
    }

    /// Frames processed successfully so far.
    #[inline]
    pub fn frames_processed(&self) -> u64 {
        self.frames
    }

    /// Run every stage on one frame.
    ///
    /// Sensors are loaded first, then the frame is thresholded, landmarks and
    /// lines are detected, and the horizon is reported. The frame size and
    /// sensor arity are both checked before any state changes; on error the
    /// previous pose, map and overlay are left as they were.
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "info", skip_all, fields(frame = self.frames, bytes = frame.len()))
    )]
    pub fn process_frame(
        &mut self,
        frame: &[u8],
        joints: &[f32],
        sensors: &[f32],
    ) -> Result<FrameResult, VisionError> {
        self.thresholder
            .check_frame(frame)
            .inspect_err(|e| log::warn!("frame {} rejected: {e}", self.frames))?;
        let state = SensorState::from_slices(joints, sensors)
            .inspect_err(|e| log::warn!("frame {} rejected: {e}", self.frames))?;
        self.pose.set_sensor_state(state);

        let started = Instant::now();
        self.thresholder.threshold_into(frame, &mut self.map)?;
        let horizon = self.pose.horizon();
        let landmarks = self.landmarks.detect(&self.map);
        let lines = self.lines.detect(&self.map, &horizon, &self.pose);
        if self.params.debug_overlay {
            annotate(self.thresholder.overlay_mut(), &horizon, &landmarks, &lines);
        }
        let duration = started.elapsed();

        let expected_lines = self
            .params
            .line_hypothesis
            .map(|h| self.pose.predict_visual_lines(h.x, h.y, h.heading));

        let frame = self.frames;
        self.frames += 1;
        log::debug!(
            "frame {frame}: {:.2} ms, {} landmarks, {} lines, horizon {}",
            duration.as_secs_f64() * 1e3,
            landmarks.len(),
            lines.lines.len(),
            horizon.vision_horizon
        );
        Ok(FrameResult {
            frame,
            duration,
            landmarks,
            lines,
            horizon,
            expected_lines,
        })
    }

    /// Load sensors outside of a frame, e.g. before geometry queries.
    pub fn update_sensors(&mut self, joints: &[f32], sensors: &[f32]) -> Result<(), VisionError> {
        Ok(self.pose.update_sensors(joints, sensors)?)
    }

    /// Replace the color table from a flat buffer; see [`ColorTable::reload`].
    pub fn reload_color_table(&mut self, buffer: &[u8]) -> Result<(), VisionError> {
        Ok(self.thresholder.reload_table(buffer)?)
    }

    pub fn set_color_table(&mut self, table: ColorTable) {
        self.params.threshold.quantization = table.quantization();
        self.thresholder.set_table(table);
    }

    #[inline]
    pub fn calibration(&self) -> CameraCalibration {
        self.pose.calibration()
    }

    pub fn set_calibration(&mut self, calibration: CameraCalibration) {
        self.pose.set_calibration(calibration);
    }

    /// Replace the calibration from exactly [`CameraCalibration::LEN`] values.
    pub fn set_calibration_from_slice(&mut self, values: &[f32]) -> Result<(), VisionError> {
        let calibration = CameraCalibration::from_slice(values)?;
        self.pose.set_calibration(calibration);
        Ok(())
    }

    /// Copy the calibration into the first [`CameraCalibration::LEN`] slots.
    pub fn calibration_into(&self, out: &mut [f32]) -> Result<(), VisionError> {
        Ok(self.pose.calibration().write_to(out)?)
    }

    #[inline]
    pub fn horizon(&self) -> Horizon {
        self.pose.horizon()
    }

    pub fn try_pixel_estimate(
        &self,
        x: f32,
        y: f32,
        object_height: f32,
    ) -> Result<Estimate, VisionError> {
        Ok(self.pose.try_pixel_to_estimate(x, y, object_height)?)
    }

    /// Field estimate for a pixel, [`Estimate::NULL`] when it has no ground
    /// solution.
    pub fn pixel_estimate(&self, x: f32, y: f32, object_height: f32) -> Estimate {
        self.pose.pixel_to_estimate(x, y, object_height)
    }

    /// Write `[dist, elevation, bearing, x, y]` for a pixel into `out`,
    /// which must hold exactly [`Estimate::LEN`] values.
    pub fn pixel_estimate_into(
        &self,
        x: f32,
        y: f32,
        object_height: f32,
        out: &mut [f64],
    ) -> Result<(), VisionError> {
        Ok(self.pixel_estimate(x, y, object_height).write_to(out)?)
    }

    /// Field lines expected from a hypothesised robot pose.
    pub fn expected_visual_lines(&self, x: f32, y: f32, heading: f32) -> Vec<VisualLine> {
        self.pose.predict_visual_lines(x, y, heading)
    }

    /// Copy the classified map row-major into `out` (exactly
    /// `width * height` bytes). With `debug_overlay` on, marked overlay
    /// pixels replace the classified value.
    pub fn write_classified(&self, out: &mut [u8]) -> Result<(), VisionError> {
        let overlay = self.params.debug_overlay.then(|| self.thresholder.overlay());
        Ok(self.map.composite_into(overlay, out)?)
    }
}
