use approx::assert_relative_eq;
use field_vision::core::BufferSizeError;
use field_vision::pose::{FieldPose, Joint, PoseError, NUM_JOINTS, NUM_SENSORS};
use field_vision::threshold::{TableQuantization, ThresholdError};
use field_vision::{
    CameraCalibration, ColorClass, ColorTable, Estimate, FrameReport, Vision, VisionError,
    VisionParams,
};

const GREEN: (u8, u8, u8) = (90, 70, 70);
const ORANGE: (u8, u8, u8) = (150, 60, 200);
const WHITE: (u8, u8, u8) = (230, 128, 128);

const W: usize = 320;
const H: usize = 240;

/// Orange on high V, white on high Y, green on low chroma.
fn table() -> ColorTable {
    ColorTable::from_fn(TableQuantization::default(), |qy, qu, qv| {
        if qv >= 90 {
            ColorClass::Orange
        } else if qy >= 100 {
            ColorClass::White
        } else if qu < 50 && qv < 50 {
            ColorClass::Green
        } else {
            ColorClass::Undefined
        }
    })
    .expect("valid quantization")
}

/// YUYV frame builder; rectangles must start and end on even columns.
struct Frame(Vec<u8>);

impl Frame {
    fn filled(color: (u8, u8, u8)) -> Self {
        let mut f = Frame(vec![0; W * H * 2]);
        f.rect(0, 0, W, H, color);
        f
    }

    fn rect(&mut self, x0: usize, y0: usize, x1: usize, y1: usize, (y, u, v): (u8, u8, u8)) {
        for row in y0..y1 {
            for x in (x0..x1).step_by(2) {
                let i = (row * W + x) * 2;
                self.0[i..i + 4].copy_from_slice(&[y, u, y, v]);
            }
        }
    }
}

fn joints(head_pitch: f32) -> [f32; NUM_JOINTS] {
    let mut j = [0.0; NUM_JOINTS];
    j[Joint::HeadPitch as usize] = head_pitch;
    j
}

const SENSORS: [f32; NUM_SENSORS] = [0.0; NUM_SENSORS];

fn vision(params: VisionParams) -> Vision {
    Vision::with_table(params, table()).expect("valid params")
}

/// Ball above the horizon, one white field line below it.
fn scene() -> Frame {
    let mut frame = Frame::filled(GREEN);
    frame.rect(100, 50, 120, 60, ORANGE);
    frame.rect(40, 180, 280, 184, WHITE);
    frame
}

#[test]
fn ball_and_line_are_reported() {
    field_vision::init_from_env(log::LevelFilter::Warn).expect("logger");
    let mut vision = vision(VisionParams::default());
    let result = vision
        .process_frame(&scene().0, &joints(0.0), &SENSORS)
        .expect("valid frame");

    let ball = result.ball().expect("ball");
    assert_relative_eq!(ball.center.x, 110.0);
    assert_relative_eq!(ball.center.y, 55.0);
    assert_relative_eq!(ball.width, 20.0);
    assert_relative_eq!(ball.height, 10.0);
    assert_eq!(result.landmarks.field_objects().count(), 0);

    assert_eq!(result.horizon.vision_horizon, 120);
    assert_eq!(result.lines.lines.len(), 1);
    let line = &result.lines.lines[0];
    assert_eq!(line.points.len(), 60);
    assert!(line.points.iter().all(|p| p.y == 182 && p.line_width == 4.0));
    assert!(result.unused_points().is_empty());
    assert!(result.corners().is_empty());
    assert!(result.expected_lines.is_none());

    assert_eq!(result.frame, 0);
    assert_eq!(vision.frames_processed(), 1);
    assert_eq!(vision.pose().updates(), 1);
    assert_eq!(vision.classified().get(110, 55), ColorClass::Orange);
    assert_eq!(vision.classified().get(5, 5), ColorClass::Green);
}

#[test]
fn undefined_table_finds_nothing() {
    let mut vision = Vision::new(VisionParams::default()).expect("valid params");
    let result = vision
        .process_frame(&scene().0, &joints(0.0), &SENSORS)
        .expect("valid frame");
    assert!(result.landmarks.is_empty());
    assert!(result.lines.lines.is_empty());
    assert_eq!(result.lines.scanned_points, 0);
    assert_eq!(vision.classified().count(ColorClass::Undefined), W * H);
}

#[test]
fn rejected_frame_leaves_state_untouched() {
    let mut vision = vision(VisionParams::default());
    vision
        .process_frame(&scene().0, &joints(0.0), &SENSORS)
        .expect("valid frame");
    let map = vision.classified().clone();

    let blank = Frame::filled(GREEN);
    let err = vision
        .process_frame(&blank.0[..blank.0.len() - 2], &joints(0.3), &SENSORS)
        .unwrap_err();
    assert_eq!(
        err,
        VisionError::Threshold(ThresholdError::InvalidFrameSize {
            expected: W * H * 2,
            got: W * H * 2 - 2,
        })
    );

    let err = vision
        .process_frame(&blank.0, &[0.0; NUM_JOINTS - 1], &SENSORS)
        .unwrap_err();
    assert!(matches!(
        err,
        VisionError::Pose(PoseError::InvalidSensorArity { got, .. }) if got == NUM_JOINTS - 1
    ));

    assert_eq!(vision.classified(), &map);
    assert_eq!(vision.frames_processed(), 1);
    assert_eq!(vision.pose().updates(), 1);
    assert_eq!(vision.pose().sensor_state().joint(Joint::HeadPitch), 0.0);
}

#[test]
fn bad_table_reload_keeps_the_old_table() {
    let mut vision = vision(VisionParams::default());
    let err = vision.reload_color_table(&[1u8; 10]).unwrap_err();
    assert_eq!(
        err,
        VisionError::Threshold(ThresholdError::InvalidTableSize {
            expected: 128 * 128 * 128,
            got: 10,
        })
    );
    let result = vision
        .process_frame(&scene().0, &joints(0.0), &SENSORS)
        .expect("valid frame");
    assert!(result.ball().is_some());

    vision
        .reload_color_table(&vec![0u8; 128 * 128 * 128])
        .expect("full table");
    let result = vision
        .process_frame(&scene().0, &joints(0.0), &SENSORS)
        .expect("valid frame");
    assert!(result.ball().is_none());
}

#[test]
fn calibration_flat_buffers() {
    let mut vision = vision(VisionParams::default());
    let values = [0.01, 0.02, 0.0, 0.5, 0.0, -0.3, 0.1, 0.0, 0.2];
    vision
        .set_calibration_from_slice(&values)
        .expect("nine values");
    assert_eq!(vision.calibration(), CameraCalibration::from_array(values));

    let mut out = [0.0f32; CameraCalibration::LEN];
    vision.calibration_into(&mut out).expect("large enough");
    assert_eq!(out, values);

    let err = vision.set_calibration_from_slice(&values[..8]).unwrap_err();
    assert_eq!(
        err,
        VisionError::Pose(PoseError::InvalidCalibrationLength {
            expected: CameraCalibration::LEN,
            got: 8,
        })
    );
    assert_eq!(vision.calibration(), CameraCalibration::from_array(values));

    let err = vision.calibration_into(&mut [0.0; 4]).unwrap_err();
    assert_eq!(
        err,
        VisionError::InvalidOutputBufferSize(BufferSizeError {
            expected: CameraCalibration::LEN,
            got: 4,
        })
    );
}

#[test]
fn pixel_estimates_follow_the_pose() {
    let mut vision = vision(VisionParams::default());
    vision
        .update_sensors(&joints(0.45), &SENSORS)
        .expect("valid arity");

    let mut out = [0.0f64; Estimate::LEN];
    vision
        .pixel_estimate_into(159.5, 200.0, 0.0, &mut out)
        .expect("five slots");
    assert!(out[0] > 0.0);
    assert!(out[1] < 0.0);
    assert_relative_eq!(out[2], 0.0, epsilon = 1e-4);

    vision
        .update_sensors(&joints(0.0), &SENSORS)
        .expect("valid arity");
    let est = vision.pixel_estimate(160.0, 10.0, 0.0);
    assert!(est.is_null());
    assert!(matches!(
        vision.try_pixel_estimate(160.0, 10.0, 0.0),
        Err(VisionError::Pose(PoseError::DegenerateProjection { .. }))
    ));

    let err = vision
        .pixel_estimate_into(160.0, 200.0, 0.0, &mut [0.0; 4])
        .unwrap_err();
    assert!(matches!(err, VisionError::InvalidOutputBufferSize(_)));
}

#[test]
fn debug_overlay_is_composited_on_request() {
    let mut plain = vision(VisionParams::default());
    let mut debug = vision(VisionParams {
        debug_overlay: true,
        ..VisionParams::default()
    });
    let frame = scene();
    plain
        .process_frame(&frame.0, &joints(0.0), &SENSORS)
        .expect("valid frame");
    debug
        .process_frame(&frame.0, &joints(0.0), &SENSORS)
        .expect("valid frame");

    let mut out = vec![0u8; W * H];
    plain.write_classified(&mut out).expect("sized");
    assert_eq!(out, plain.classified().to_bytes());
    assert!(plain.overlay().is_clear());

    debug.write_classified(&mut out).expect("sized");
    assert_eq!(out[182 * W + 40], ColorClass::Blue.code());
    assert_eq!(out[50 * W + 100], ColorClass::Red.code());
    assert_eq!(out[5 * W + 5], ColorClass::Green.code());
    // Level camera: the horizon row is drawn at 120.
    assert_eq!(out[120 * W + 10], ColorClass::Yellow.code());
    assert_eq!(out[121 * W + 10], ColorClass::Green.code());

    let err = debug.write_classified(&mut out[..W]).unwrap_err();
    assert!(matches!(err, VisionError::InvalidOutputBufferSize(_)));
}

#[test]
fn hypothesis_adds_expected_lines() {
    let mut vision = vision(VisionParams {
        line_hypothesis: Some(FieldPose::new(370.0, 270.0, 0.0)),
        ..VisionParams::default()
    });
    let result = vision
        .process_frame(&Frame::filled(GREEN).0, &joints(0.5), &SENSORS)
        .expect("valid frame");
    let expected = result.expected_lines.expect("hypothesis configured");
    assert!(!expected.is_empty());
    assert_eq!(expected, vision.expected_visual_lines(370.0, 270.0, 0.0));
}

#[test]
fn report_round_trips_through_json() {
    let mut vision = vision(VisionParams::default());
    let result = vision
        .process_frame(&scene().0, &joints(0.0), &SENSORS)
        .expect("valid frame");
    let report = result.report();
    let ball = report.ball.expect("ball");
    assert_eq!((ball.x, ball.y), (100, 50));
    assert_relative_eq!(ball.radius, 10.0);
    assert_eq!(report.lines.len(), 1);
    let line = &report.lines[0];
    assert_eq!(line.points.len(), 60);
    assert!(line.points.iter().all(|p| p.y == 182 && p.width == 4.0 && p.scan == 1));
    assert_eq!((line.start.y, line.end.y), (182, 182));
    assert!(report.unused_points.is_empty());

    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("frame.json");
    report.write_json(&path).expect("write");
    assert_eq!(FrameReport::load_json(&path).expect("load"), report);
}

#[test]
fn report_keeps_corner_pixels_and_expected_lines() {
    let mut vision = vision(VisionParams {
        line_hypothesis: Some(FieldPose::new(370.0, 270.0, 0.0)),
        ..VisionParams::default()
    });
    let mut frame = Frame::filled(GREEN);
    frame.rect(40, 150, 280, 154, WHITE);
    frame.rect(158, 130, 162, 230, WHITE);
    let result = vision
        .process_frame(&frame.0, &joints(0.3), &SENSORS)
        .expect("valid frame");
    let report = result.report();

    assert_eq!(report.corners.len(), result.corners().len());
    assert!(!report.corners.is_empty());
    for (rep, corner) in report.corners.iter().zip(result.corners()) {
        assert_eq!(rep.image_x, corner.image.x.round() as i32);
        assert_eq!(rep.image_y, corner.image.y.round() as i32);
        assert_eq!((rep.x, rep.y), (corner.estimate.x, corner.estimate.y));
        assert_eq!(rep.shape, corner.shape.code());
    }

    let expected = report.expected_lines.as_ref().expect("hypothesis configured");
    let lines = result.expected_lines.as_ref().expect("hypothesis configured");
    assert_eq!(expected.len(), lines.len());
    for (rep, line) in expected.iter().zip(lines) {
        assert_eq!((rep.start.x, rep.start.y), (line.start.x, line.start.y));
        assert_eq!(rep.start.scan, line.start.found_with.code());
    }
}
