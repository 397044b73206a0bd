//! Print the diagnostic line and a frame-by-frame angle table for the
//! reference TPI box gear set.

use tpi_kinematics::{
    feed_pitch, BanjoLimits, ChangeGears, Diagnostic, Gear, GearTrain, KinematicsConfig,
    KinematicsError, Leadscrew, PitchUnit, ShaftLayout, TrainTeeth,
};
use tracing::{info, warn};

/// Independent sizes of the reference set: P, I, M, N.
const REFERENCE_SET: (u32, u32, u32, u32) = (140, 127, 40, 35);

/// Spindle travel between printed frames (degrees).
const FRAME_STEP: f64 = 30.0;
const FRAMES: usize = 13;

/// Line population that turns 44.45 effective teeth into 16 tpi on a 2 mm leadscrew.
const REFERENCE_BANJO: ChangeGears = ChangeGears::Line { a: 60, c: 40, e: 56 };

fn init_logging() {
    let subscriber = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .compact()
        .finish();
    match tracing::subscriber::set_global_default(subscriber) {
        Ok(_) => info!("Logging initialised"),
        Err(e) => eprintln!("Failed to init logging. {}", e),
    }
}

fn frame_header() -> String {
    let mut header = format!("{:>8}", "drive");
    for gear in Gear::ALL {
        header.push_str(&format!("{:>11}", gear.letter()));
    }
    header.push_str(&format!("{:>11}", "O marker"));
    header
}

fn frame_row(train: &GearTrain, drive: f64) -> String {
    let mut row = format!("{:>8.1}", drive);
    for (_, angle) in train.angles(drive).iter() {
        row.push_str(&format!("{:>11.4}", angle));
    }
    row.push_str(&format!("{:>11.4}", train.marker_angle(Gear::Output, drive)));
    row
}

fn main() -> Result<(), KinematicsError> {
    init_logging();

    let config = KinematicsConfig::default();
    let (p, i, m, n) = REFERENCE_SET;
    let teeth = TrainTeeth::derive(config.spindle_teeth, p, i, m, n)?;
    let train = GearTrain::new(teeth, &config)?;

    let diagnostic = Diagnostic::new(&train);
    diagnostic.log();
    println!("{}", diagnostic);
    if !diagnostic.inch_fractional {
        warn!("effective teeth are not a whole number of 1/1024 inch steps");
    }

    let layout = ShaftLayout::from_config(&teeth, &config);
    for gear in Gear::ALL {
        let c = layout.center(gear);
        info!(%gear, x = c.x, y = c.y, pitch_radius = layout.pitch_radius(gear), "gear placed");
    }

    let worst = layout.max_center_distance_error();
    if worst > config.center_tolerance {
        warn!(worst, tolerance = config.center_tolerance, "gear set mismeshes");
    } else {
        info!(worst, "all center distances match");
    }

    println!();
    println!("{}", frame_header());
    for frame in 0..FRAMES {
        let drive = frame as f64 * FRAME_STEP;
        println!("{}", frame_row(&train, drive));
    }

    let tpi = feed_pitch(
        train.effective_teeth(),
        &REFERENCE_BANJO,
        &Leadscrew::default(),
        PitchUnit::Tpi,
    );
    println!();
    println!("{:?} cuts {:.4} tpi", REFERENCE_BANJO, tpi);
    let issues = REFERENCE_BANJO.check_fit(teeth.output, &BanjoLimits::default());
    if issues.is_empty() {
        info!("change gears fit the banjo");
    }
    for issue in issues {
        warn!(%issue, "change gears do not fit");
    }
    Ok(())
}
