// Per-stage and full-frame timings on a synthetic field scene.
//
//   cargo bench -p field-vision

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use field_vision::pose::{Joint, NUM_JOINTS, NUM_SENSORS};
use field_vision::threshold::TableQuantization;
use field_vision::{ColorClass, ColorTable, Vision, VisionParams};

const W: usize = 320;
const H: usize = 240;

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

/// Green carpet with a ball, two crossing lines and a penalty-box corner.
fn make_scene() -> Vec<u8> {
    let mut frame = vec![0u8; W * H * 2];
    let mut rect = |x0: usize, y0: usize, x1: usize, y1: usize, (y, u, v): (u8, u8, u8)| {
        for row in y0..y1 {
            for x in (x0..x1).step_by(2) {
                let i = (row * W + x) * 2;
                frame[i..i + 4].copy_from_slice(&[y, u, y, v]);
            }
        }
    };
    rect(0, 0, W, H, (90, 70, 70));
    rect(40, 150, 280, 154, (230, 128, 128));
    rect(158, 100, 162, 240, (230, 128, 128));
    rect(240, 150, 244, 230, (230, 128, 128));
    rect(100, 190, 112, 200, (150, 60, 200));
    frame
}

fn looking_down() -> [f32; NUM_JOINTS] {
    let mut joints = [0.0; NUM_JOINTS];
    joints[Joint::HeadPitch as usize] = 0.3;
    joints
}

fn bench_stages(c: &mut Criterion) {
    let frame = make_scene();
    let joints = looking_down();
    let sensors = [0.0f32; NUM_SENSORS];

    let mut vision = Vision::with_table(VisionParams::default(), table()).expect("valid params");
    vision
        .process_frame(&frame, &joints, &sensors)
        .expect("valid frame");

    let mut group = c.benchmark_group("stages");
    group.bench_function("threshold_320x240", |b| {
        let mut thresholder = vision.thresholder().clone();
        let mut map = vision.classified().clone();
        b.iter(|| thresholder.threshold_into(black_box(&frame), &mut map))
    });
    group.bench_function("landmarks_320x240", |b| {
        let detector = field_vision::objects::LandmarkDetector::default();
        b.iter(|| detector.detect(black_box(vision.classified())))
    });
    group.bench_function("lines_320x240", |b| {
        let detector = field_vision::lines::LineDetector::default();
        let horizon = vision.horizon();
        b.iter(|| detector.detect(black_box(vision.classified()), &horizon, vision.pose()))
    });
    group.bench_function("expected_lines", |b| {
        b.iter(|| vision.expected_visual_lines(black_box(370.0), 270.0, 0.0))
    });
    group.finish();
}

fn bench_frame(c: &mut Criterion) {
    let frame = make_scene();
    let joints = looking_down();
    let sensors = [0.0f32; NUM_SENSORS];

    let mut group = c.benchmark_group("frame");
    for (name, debug_overlay) in [("plain", false), ("debug_overlay", true)] {
        let params = VisionParams {
            debug_overlay,
            ..VisionParams::default()
        };
        let mut vision = Vision::with_table(params, table()).expect("valid params");
        group.bench_function(name, |b| {
            b.iter(|| vision.process_frame(black_box(&frame), &joints, &sensors))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_stages, bench_frame);
criterion_main!(benches);
