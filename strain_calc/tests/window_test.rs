use osu_schema::{Chart, Difficulty, HitObject, HitObjectKind, Metadata, StrainSeries};
use strain_calc::{aggregate, compute, decayed, StrainConfig, WindowError, WindowSpec};

const EPS: f64 = 1e-9;

fn chart_at(points: &[(f64, f64, f64)]) -> Chart {
    Chart {
        meta: Metadata::default(),
        difficulty: Difficulty {
            circle_size: 4.0,
            ..Difficulty::default()
        },
        hit_objects: points
            .iter()
            .map(|&(x, y, time)| HitObject {
                x,
                y,
                time,
                hitsound: 0,
                kind: HitObjectKind::Circle,
            })
            .collect(),
    }
}

#[test]
fn window_spec_rejects_bad_sizes() {
    assert_eq!(
        WindowSpec::new(0.0, 0.0),
        Err(WindowError::InvalidSize { size_ms: 0.0 })
    );
    assert!(WindowSpec::new(-400.0, 0.0).is_err());
    assert!(WindowSpec::new(f64::NAN, 0.0).is_err());
    assert!(matches!(
        WindowSpec::new(400.0, f64::INFINITY),
        Err(WindowError::InvalidOrigin { .. })
    ));
    let spec = WindowSpec::new(250.0, -100.0).unwrap();
    assert_eq!(spec.size_ms(), 250.0);
    assert_eq!(spec.origin_ms(), -100.0);
    assert_eq!(WindowSpec::default().size_ms(), 400.0);
}

#[test]
fn empty_chart_has_no_windows() {
    let chart = chart_at(&[]);
    let config = StrainConfig::default();
    let windows = aggregate(&chart, &StrainSeries::default(), WindowSpec::default(), &config);
    assert!(windows.is_empty());
    assert!(windows.speed.is_empty());
}

#[test]
fn one_object_per_window_keeps_strain_values() {
    // Large alternating jumps keep both series rising, so carry never wins.
    let points: Vec<_> = (0..6)
        .map(|i| ((i % 2) as f64 * 400.0, 0.0, 400.0 * (i as f64 + 1.0)))
        .collect();
    let chart = chart_at(&points);
    let config = StrainConfig::default();
    let strains = compute(&chart, &config);
    for i in 1..strains.len() {
        assert!(strains.aim[i] >= strains.aim[i - 1]);
        assert!(strains.speed[i] >= strains.speed[i - 1]);
    }

    let spec = WindowSpec::new(400.0, 0.0).unwrap();
    let windows = aggregate(&chart, &strains, spec, &config);

    assert_eq!(windows.len(), 6);
    assert_eq!(windows.len(), spec.window_count(2400.0));
    for i in 0..6 {
        assert!((windows.aim[i] - strains.aim[i]).abs() < EPS, "aim window {i}");
        assert!((windows.speed[i] - strains.speed[i]).abs() < EPS, "speed window {i}");
        assert_eq!(windows.window_end(i), 400.0 * (i as f64 + 1.0));
    }
}

#[test]
fn gap_of_three_windows_decays_carry_over() {
    let chart = chart_at(&[(0.0, 0.0, 0.0), (100.0, 0.0, 1700.0)]);
    let config = StrainConfig::default();
    let strains = compute(&chart, &config);
    let spec = WindowSpec::new(400.0, 0.0).unwrap();
    let windows = aggregate(&chart, &strains, spec, &config);

    assert_eq!(windows.len(), 5);
    assert!((windows.aim[0] - strains.aim[0]).abs() < EPS);

    for k in 1..=3 {
        let elapsed = 400.0 * k as f64;
        let aim = decayed(strains.aim[0], config.aim_decay, elapsed);
        let speed = decayed(strains.speed[0], config.speed_decay, elapsed);
        assert!((windows.aim[k] - aim).abs() < EPS, "aim window {k}");
        assert!((windows.speed[k] - speed).abs() < EPS, "speed window {k}");
        assert!(windows.aim[k] < windows.aim[k - 1]);
        assert!(windows.speed[k] < windows.speed[k - 1]);
    }

    let seeded_aim = decayed(strains.aim[0], config.aim_decay, 1600.0);
    assert!((windows.aim[4] - strains.aim[1].max(seeded_aim)).abs() < EPS);
}

#[test]
fn windows_before_first_object_stay_zero() {
    let chart = chart_at(&[(0.0, 0.0, 1000.0), (50.0, 0.0, 1100.0)]);
    let config = StrainConfig::default();
    let strains = compute(&chart, &config);
    let windows = aggregate(&chart, &strains, WindowSpec::new(400.0, 0.0).unwrap(), &config);

    assert_eq!(windows.len(), 3);
    assert_eq!(windows.aim[0], 0.0);
    assert_eq!(windows.aim[1], 0.0);
    assert_eq!(windows.speed[1], 0.0);
    assert!((windows.aim[2] - strains.aim[0].max(strains.aim[1])).abs() < EPS);
}

#[test]
fn object_on_boundary_belongs_to_earlier_window() {
    let chart = chart_at(&[(0.0, 0.0, 400.0)]);
    let config = StrainConfig::default();
    let strains = compute(&chart, &config);
    let windows = aggregate(&chart, &strains, WindowSpec::new(400.0, 0.0).unwrap(), &config);
    assert_eq!(windows.aim, vec![1.0]);
    assert_eq!(windows.speed, vec![1.0]);
}

#[test]
fn origin_shifts_the_window_grid() {
    let chart = chart_at(&[(0.0, 0.0, 1000.0), (10.0, 0.0, 1150.0), (20.0, 0.0, 1500.0)]);
    let config = StrainConfig::default();
    let strains = compute(&chart, &config);
    let spec = WindowSpec::new(200.0, 1000.0).unwrap();
    let windows = aggregate(&chart, &strains, spec, &config);

    // (1000, 1200] (1200, 1400] (1400, 1600]; the first object sits on the origin.
    assert_eq!(windows.len(), spec.window_count(1500.0));
    assert_eq!(windows.len(), 3);
    assert_eq!(windows.window_end(0), 1200.0);
    assert!((windows.aim[0] - strains.aim[0].max(strains.aim[1])).abs() < EPS);
    let carry = decayed(strains.aim[1], config.aim_decay, 50.0);
    assert!((windows.aim[1] - carry).abs() < EPS);
}

#[test]
fn aggregate_is_deterministic() {
    let points: Vec<_> = (0..40)
        .map(|i| ((i * 53 % 512) as f64, (i * 17 % 384) as f64, (i * i) as f64 * 11.0))
        .collect();
    let chart = chart_at(&points);
    let config = StrainConfig::default();
    let strains = compute(&chart, &config);
    let spec = WindowSpec::default();
    assert_eq!(
        aggregate(&chart, &strains, spec, &config),
        aggregate(&chart, &strains, spec, &config)
    );
}
