use geo::{Coord, Geometry, LineString, Point, Rect, coord, polygon};
use geosort::compute::cell::{cell_bounds, is_ancestor};
use geosort::{Crs, GeoHashCalculator, GeoSortError, common_prefix, encode};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn samples() -> Vec<Coord<f64>> {
    vec![
        coord! { x: -74.0060, y: 40.7128 },
        coord! { x: -118.2437, y: 34.0522 },
        coord! { x: 2.3522, y: 48.8566 },
        coord! { x: 13.4050, y: 52.5200 },
        coord! { x: 151.2093, y: -33.8688 },
        coord! { x: -0.1276, y: 51.5074 },
        coord! { x: 0.0, y: 0.0 },
        coord! { x: -179.9, y: -89.9 },
    ]
}

#[test]
fn test_origin_point() {
    init_logging();
    let calc = GeoHashCalculator::new(12).unwrap();
    let origin = Geometry::Point(Point::new(0.0, 0.0));
    assert_eq!(calc.compute(&origin).unwrap(), "s00000000000");
}

#[test]
fn test_whole_globe_is_single_cell() {
    init_logging();
    let calc = GeoHashCalculator::default();
    let globe = Geometry::Polygon(polygon![
        (x: -180.0, y: -90.0),
        (x: 180.0, y: 90.0),
        (x: 0.0, y: 90.0),
        (x: 0.0, y: -90.0),
        (x: -180.0, y: -90.0),
    ]);
    assert_eq!(calc.compute(&globe).unwrap(), "s");
}

#[test]
fn test_boundary_line() {
    let calc = GeoHashCalculator::default();
    let line = Geometry::LineString(LineString::from(vec![(-10.0, -10.0), (-9.0, -9.0)]));
    assert_eq!(calc.compute(&line).unwrap(), "7y");
}

#[test]
fn test_containment_implies_prefix() {
    init_logging();
    let calc = GeoHashCalculator::default();
    let area = Geometry::Polygon(polygon![
        (x: 13.08, y: 52.33),
        (x: 13.76, y: 52.33),
        (x: 13.76, y: 52.68),
        (x: 13.08, y: 52.68),
        (x: 13.08, y: 52.33),
    ]);
    let area_key = calc.compute(&area).unwrap();

    for (i, j) in [(0.0, 0.0), (0.25, 0.5), (0.5, 0.5), (0.9, 0.1), (1.0, 1.0)] {
        let inner = Geometry::Point(Point::new(13.08 + 0.68 * i, 52.33 + 0.35 * j));
        let inner_key = calc.compute(&inner).unwrap();
        assert!(
            is_ancestor(&area_key, &inner_key),
            "{} should prefix {}",
            area_key,
            inner_key
        );
    }
}

#[test]
fn test_idempotent() {
    let calc = GeoHashCalculator::new(9).unwrap();
    for c in samples() {
        let point = Geometry::Point(c.into());
        let first = calc.compute(&point).unwrap();
        let second = calc.clone().compute(&point).unwrap();
        assert_eq!(first, second);
    }
}

#[test]
fn test_point_lies_in_its_cell() {
    for c in samples() {
        let hash = encode(c, 8).unwrap();
        let bounds = cell_bounds(&hash).unwrap();
        assert!(bounds.min().x <= c.x && c.x <= bounds.max().x, "{} x", hash);
        assert!(bounds.min().y <= c.y && c.y <= bounds.max().y, "{} y", hash);
    }
}

#[test]
fn test_lower_precision_is_prefix() {
    for c in samples() {
        let full = encode(c, 12).unwrap();
        for precision in 1..12 {
            assert_eq!(encode(c, precision).unwrap(), full[..precision]);
        }
    }
}

#[test]
fn test_envelope_key_is_corner_prefix() {
    let calc = GeoHashCalculator::default();
    let envelope = Rect::new(coord! { x: 1.0, y: 1.0 }, coord! { x: 1.001, y: 1.001 });
    let key = calc.compute_envelope(envelope).unwrap();
    assert_eq!(key, "s00twy0");

    let min_hash = encode(envelope.min(), 12).unwrap();
    let max_hash = encode(envelope.max(), 12).unwrap();
    assert_eq!(key, common_prefix(&min_hash, &max_hash));
}

#[test]
fn test_utm_matches_geographic() {
    init_logging();
    let calc = GeoHashCalculator::new(9).unwrap();
    let utm = Crs::from_code("EPSG:32632").unwrap();

    let geographic = Geometry::Point(Point::new(12.0, 55.0));
    let projected = Geometry::Point(Point::new(691_875.632, 6_098_907.825));

    let expected = calc.compute(&geographic).unwrap();
    assert_eq!(expected, "u3b8ch6nh");
    assert_eq!(calc.compute_with_crs(&projected, &utm).unwrap(), expected);
}

#[test]
fn test_web_mercator_matches_geographic() {
    let calc = GeoHashCalculator::new(8).unwrap().with_crs(Crs::WebMercator);
    for c in samples().into_iter().filter(|c| c.y.abs() < 85.0) {
        let projected = Crs::WebMercator.from_geographic(c).unwrap();
        let key = calc.compute(&Geometry::Point(projected.into())).unwrap();
        let expected = encode(c, 8).unwrap();
        // Keys may only differ when the roundtrip crosses a cell edge
        assert!(
            key == expected || common_prefix(&key, &expected).len() >= 6,
            "{} vs {}",
            key,
            expected
        );
    }
}

#[test]
fn test_out_of_domain_projection_is_transform_error() {
    init_logging();
    let calc = GeoHashCalculator::default().with_crs(Crs::WebMercator);

    let beyond = Geometry::Point(Point::new(3e7, 0.0));
    assert!(matches!(calc.compute(&beyond), Err(GeoSortError::Transform(_))));

    let edge = Geometry::Point(Point::new(20_037_508.0, 0.0));
    assert!(calc.compute(&edge).unwrap().starts_with('x'));
}

#[test]
fn test_invalid_input() {
    init_logging();
    assert!(matches!(
        GeoHashCalculator::new(0),
        Err(GeoSortError::InvalidInput(_))
    ));
    assert!(GeoHashCalculator::new(13).is_err());

    let calc = GeoHashCalculator::default();
    let empty = Geometry::LineString(LineString::<f64>::new(vec![]));
    assert!(matches!(calc.compute(&empty), Err(GeoSortError::InvalidInput(_))));

    let nan = Geometry::Point(Point::new(f64::NAN, 0.0));
    assert!(calc.compute(&nan).is_err());

    let outside = Geometry::Point(Point::new(200.0, 0.0));
    assert!(calc.compute(&outside).is_err());
}
