//! Statistics engine: per-pair mean and variance, reference axis, offsets

use deltacal_core::{Axis, AxisStats, PassAggregate, RawSample, SessionStatus};

/// Mean and population variance of a reading pair
pub fn axis_stats(readings: [f64; 2]) -> AxisStats {
    let count = readings.len() as f64;
    let mean = readings.iter().sum::<f64>() / count;
    let variance = readings.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / count;
    AxisStats { mean, variance }
}

/// Pick the highest tower: Z unless X is strictly higher, then Y if strictly
/// higher than that
pub fn select_reference_axis(z: f64, x: f64, y: f64) -> Axis {
    let mut reference = (Axis::Z, z);
    if x > reference.1 {
        reference = (Axis::X, x);
    }
    if y > reference.1 {
        reference = (Axis::Y, y);
    }
    reference.0
}

/// Reduce one sample to its pass aggregate
///
/// The reference axis is chosen from this sample only if the session has not
/// chosen one yet; the high point always comes from this sample.
pub fn analyze(sample: &RawSample, session: &SessionStatus) -> PassAggregate {
    let z = axis_stats(sample.z);
    let x = axis_stats(sample.x);
    let y = axis_stats(sample.y);
    let c = axis_stats(sample.c);

    let reference_axis =
        session.reference_axis_or_select(|| select_reference_axis(z.mean, x.mean, y.mean));
    let high_point = match reference_axis {
        Axis::Z => z.mean,
        Axis::X => x.mean,
        Axis::Y => y.mean,
    };

    PassAggregate {
        z,
        x,
        y,
        c,
        reference_axis,
        high_point,
        c_offset: c.mean - high_point,
    }
}

/// Log the per-pass report
pub fn log_report(aggregate: &PassAggregate) {
    for (label, stats) in [
        ("Z", &aggregate.z),
        ("X", &aggregate.x),
        ("Y", &aggregate.y),
        ("C", &aggregate.c),
    ] {
        tracing::info!(
            "{}: avg {:.4}, variance {:.6}",
            label,
            stats.mean,
            stats.variance
        );
    }
    tracing::info!(
        "Reference axis {}, high point {:.4}, center offset {:.4}",
        aggregate.reference_axis,
        aggregate.high_point,
        aggregate.c_offset
    );
}
