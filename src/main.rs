use anyhow::Result;
use chrono::prelude::*;
use rand::Rng;

use iousort::{non_max_suppression, Detection, Tracker, TrackerConfig};

const FRAMES: u32 = 60;

/// Synthetic detector output for one frame: a person crossing the scene
/// (briefly occluded), a car drifting down, an occasional duplicate box and
/// one corrupt detection to exercise the rejection path.
fn synth_frame(frame: u32, rng: &mut impl Rng) -> Vec<(f64, f64, f64, f64, f64, &'static str)> {
    let t = frame as f64;
    let mut out = Vec::new();

    if !(25..30).contains(&frame) {
        let x = 100.0 + 3.0 * t + rng.gen_range(-1.0..1.0);
        let y = 100.0 + rng.gen_range(-1.0..1.0);
        out.push((x, y, x + 40.0, y + 90.0, 0.9, "person"));
    }

    let x = 300.0 + rng.gen_range(-1.0..1.0);
    let y = 150.0 + 2.0 * t + rng.gen_range(-1.0..1.0);
    out.push((x, y, x + 120.0, y + 60.0, 0.85, "car"));
    if frame % 7 == 0 {
        // near-duplicate the suppression pass should drop
        out.push((x + 2.0, y + 2.0, x + 122.0, y + 62.0, 0.5, "car"));
    }

    if frame == 40 {
        out.push((f64::NAN, 0.0, 10.0, 10.0, 0.9, "person"));
    }

    out
}

fn main() -> Result<()> {
    env_logger::init();

    let mut tracker = Tracker::new(TrackerConfig::default())?;
    let mut rng = rand::thread_rng();

    let mut sum = 0;
    for frame in 0..FRAMES {
        let start: DateTime<Local> = Local::now();
        let m1 = start.timestamp_millis();

        let mut detections = Vec::new();
        for (x1, y1, x2, y2, confidence, label) in synth_frame(frame, &mut rng) {
            match Detection::new(x1, y1, x2, y2, confidence, label) {
                Ok(d) => detections.push(d),
                Err(e) => log::warn!("frame {}: skipping detection: {}", frame, e),
            }
        }
        let keep = non_max_suppression(&detections, 0.7);
        let detections: Vec<Detection> = keep.into_iter().map(|i| detections[i].clone()).collect();

        let tracks = tracker.update(detections)?;

        let end: DateTime<Local> = Local::now();
        let m2 = end.timestamp_millis();
        sum += m2 - m1;

        let summary: Vec<String> = tracks
            .iter()
            .map(|t| {
                format!(
                    "#{} {} ({:.0},{:.0},{:.0},{:.0})",
                    t.track_id, t.label, t.bbox.x1, t.bbox.y1, t.bbox.x2, t.bbox.y2
                )
            })
            .collect();
        println!("frame {:02}: {}", frame, summary.join("  "));
    }

    println!("processed {} frames in {} ms", FRAMES, sum);
    Ok(())
}
