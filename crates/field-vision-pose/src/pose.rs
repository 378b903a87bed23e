use field_vision_core::{Estimate, FrameGeometry, Horizon, PixelEstimator};
use nalgebra::{Isometry3, Point2, Point3, Vector3};

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::kinematics::{camera_placement, CameraPlacement};
use crate::{CameraCalibration, FieldLayout, PoseError, PoseParams, SensorState};

/// Rays closer to parallel with the target plane than this are rejected.
const MIN_RAY_SLOPE: f32 = 1e-6;

/// Explicitly owned camera pose: sensor state, calibration and the derived
/// camera placement.
///
/// Call [`PoseModel::update_sensors`] once per frame before any geometry
/// query; the placement is recomputed on every sensor or calibration change.
#[derive(Clone, Debug)]
pub struct PoseModel {
    geometry: FrameGeometry,
    params: PoseParams,
    field: FieldLayout,
    calibration: CameraCalibration,
    state: SensorState,
    placement: CameraPlacement,
    focal: f32,
    updates: u64,
}

impl PoseModel {
    pub fn new(geometry: FrameGeometry, params: PoseParams, field: FieldLayout) -> Self {
        let calibration = CameraCalibration::default();
        let state = SensorState::default();
        let placement = camera_placement(&state, &calibration, &params);
        Self {
            geometry,
            focal: params.focal_length(geometry.width),
            params,
            field,
            calibration,
            state,
            placement,
            updates: 0,
        }
    }

    #[inline]
    pub fn geometry(&self) -> FrameGeometry {
        self.geometry
    }

    #[inline]
    pub fn params(&self) -> &PoseParams {
        &self.params
    }

    #[inline]
    pub fn field(&self) -> &FieldLayout {
        &self.field
    }

    #[inline]
    pub fn sensor_state(&self) -> &SensorState {
        &self.state
    }

    /// Number of accepted sensor updates.
    #[inline]
    pub fn updates(&self) -> u64 {
        self.updates
    }

    /// Torso height over the ground for the current frame.
    #[inline]
    pub fn body_height(&self) -> f32 {
        self.placement.body_height
    }

    #[inline]
    pub fn world_from_camera(&self) -> Isometry3<f32> {
        self.placement.world_from_camera
    }

    #[inline]
    pub fn focal_length(&self) -> f32 {
        self.focal
    }

    /// Image point hit by the optical axis.
    #[inline]
    pub fn principal_point(&self) -> Point2<f32> {
        Point2::new(
            0.5 * (self.geometry.width as f32 - 1.0),
            0.5 * (self.geometry.height as f32 - 1.0),
        )
    }

    /// Load this frame's joints and sensors.
    ///
    /// Both vectors are validated before anything changes, so a rejected call
    /// keeps the previous state.
    pub fn update_sensors(&mut self, joints: &[f32], sensors: &[f32]) -> Result<(), PoseError> {
        let state = SensorState::from_slices(joints, sensors)?;
        self.set_sensor_state(state);
        Ok(())
    }

    pub fn set_sensor_state(&mut self, state: SensorState) {
        self.state = state;
        self.updates += 1;
        self.refresh();
    }

    #[inline]
    pub fn calibration(&self) -> CameraCalibration {
        self.calibration
    }

    pub fn set_calibration(&mut self, calibration: CameraCalibration) {
        log::info!("camera calibration updated: {:?}", calibration.to_array());
        self.calibration = calibration;
        self.refresh();
    }

    fn refresh(&mut self) {
        self.placement = camera_placement(&self.state, &self.calibration, &self.params);
    }

    /// Ray through a pixel in camera coordinates (x = depth).
    fn camera_ray(&self, x: f32, y: f32) -> Vector3<f32> {
        let c = self.principal_point();
        Vector3::new(self.focal, c.x - x, c.y - y)
    }

    /// Project a robot-frame point to pixels; `None` when it is behind the camera.
    pub fn project(&self, p: Point3<f32>) -> Option<Point2<f32>> {
        let pc = self.placement.world_from_camera.inverse_transform_point(&p);
        self.project_camera(&pc)
    }

    pub(crate) fn project_camera(&self, pc: &Point3<f32>) -> Option<Point2<f32>> {
        if pc.x <= f32::EPSILON {
            return None;
        }
        let c = self.principal_point();
        Some(Point2::new(
            c.x - self.focal * pc.y / pc.x,
            c.y - self.focal * pc.z / pc.x,
        ))
    }

    /// Ray parameter where the pixel ray meets the plane `z = height`
    /// (the ray's camera x component is the focal length).
    pub(crate) fn ray_to_plane(&self, x: f32, y: f32, height: f32) -> Option<(f32, Point3<f32>)> {
        let iso = &self.placement.world_from_camera;
        let dir = iso.rotation * self.camera_ray(x, y);
        if dir.z.abs() < MIN_RAY_SLOPE {
            return None;
        }
        let origin = Point3::from(iso.translation.vector);
        let t = (height - origin.z) / dir.z;
        if !t.is_finite() || t <= 0.0 {
            return None;
        }
        Some((t, origin + dir * t))
    }

    /// Field-relative estimate of the point at pixel `(x, y)` lying
    /// `object_height` cm above the ground.
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn try_pixel_to_estimate(
        &self,
        x: f32,
        y: f32,
        object_height: f32,
    ) -> Result<Estimate, PoseError> {
        let degenerate = PoseError::DegenerateProjection {
            x,
            y,
            height: object_height,
        };
        let Some((_, p)) = self.ray_to_plane(x, y, object_height) else {
            return Err(degenerate);
        };
        let cam = self.placement.world_from_camera.translation.vector;
        let dist = p.x.hypot(p.y);
        let est = Estimate {
            dist,
            elevation: (p.z - cam.z).atan2((p.x - cam.x).hypot(p.y - cam.y)),
            bearing: p.y.atan2(p.x),
            x: p.x,
            y: p.y,
        };
        if !(est.dist.is_finite() && est.elevation.is_finite() && est.bearing.is_finite()) {
            return Err(degenerate);
        }
        Ok(est)
    }

    /// Like [`PoseModel::try_pixel_to_estimate`] but yields [`Estimate::NULL`]
    /// when there is no solution.
    pub fn pixel_to_estimate(&self, x: f32, y: f32, object_height: f32) -> Estimate {
        self.try_pixel_to_estimate(x, y, object_height)
            .unwrap_or(Estimate::NULL)
    }

    /// Horizon of the ground plane for the current pose.
    pub fn horizon(&self) -> Horizon {
        let width = self.geometry.width;
        let height = self.geometry.height;
        let r = self
            .placement
            .world_from_camera
            .rotation
            .to_rotation_matrix()
            .into_inner();
        // A pixel ray is level when its world z component vanishes.
        let (r20, r21, r22) = (r[(2, 0)], r[(2, 1)], r[(2, 2)]);
        if r22.abs() < MIN_RAY_SLOPE {
            return Horizon::level(0, width, height);
        }
        let c = self.principal_point();
        let row_at = |x: f32| c.y + (r20 * self.focal + r21 * (c.x - x)) / r22;

        let right_x = width.saturating_sub(1) as i32;
        let left_y = row_at(0.0).round() as i32;
        let right_y = row_at(right_x as f32).round() as i32;
        Horizon {
            left: Point2::new(0, left_y),
            right: Point2::new(right_x, right_y),
            vision_horizon: left_y.min(right_y).clamp(0, height as i32),
        }
    }
}

impl PixelEstimator for PoseModel {
    fn estimate(&self, pixel: Point2<f32>, object_height: f32) -> Option<Estimate> {
        self.try_pixel_to_estimate(pixel.x, pixel.y, object_height)
            .ok()
    }
}
