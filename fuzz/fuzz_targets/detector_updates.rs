#![no_main]

use detection::{ChangePointDetector, DetectorConfig, SmoothingKind};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let smoothing = if data.first().copied().unwrap_or_default() % 2 == 0 {
        SmoothingKind::Double
    } else {
        SmoothingKind::Single
    };
    let config = DetectorConfig {
        smoothing,
        fit_seed: u64::from(data.get(1).copied().unwrap_or_default()),
        ..DetectorConfig::default()
    };

    let mut detector = ChangePointDetector::new(config);
    for chunk in data.get(2..).unwrap_or_default().chunks_exact(2).take(256) {
        let raw = u16::from_le_bytes([chunk[0], chunk[1]]);
        let sample = f64::from(raw) / 4096.0;
        let outcome = detector.update(sample);
        assert!(outcome.statistic.is_finite());
        assert!(outcome.statistic >= 0.0);
    }
});
