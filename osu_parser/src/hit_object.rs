use osu_schema::{ControlPoint, HitObject, HitObjectKind};

use crate::error::{ParseWarning, WarningKind};

pub(crate) const HIT_TYPE_CIRCLE: i32 = 1;
pub(crate) const HIT_TYPE_SLIDER: i32 = 2;
pub(crate) const HIT_TYPE_SPINNER: i32 = 8;

const DEFAULT_REPEAT_COUNT: u32 = 0;
const DEFAULT_PATH_LENGTH: f64 = 1.0;

#[derive(Debug, Clone)]
pub(crate) enum HitObjectLine {
    Parsed {
        object: HitObject,
        warnings: Vec<ParseWarning>,
    },
    /// None of the known type bits were set; the line is consumed but nothing is stored.
    Unclassified(ParseWarning),
}

/// Parses one `[HitObjects]` line.
///
/// Returns `None` when the leading `x,y,time,type,hitsound` fields do not
/// parse, which ends scanning of the section.
pub(crate) fn parse_hit_object_line(line: &str, line_no: usize) -> Option<HitObjectLine> {
    let mut fields = line.split(',');
    let x = parse_finite(fields.next()?)?;
    let y = parse_finite(fields.next()?)?;
    let time = parse_finite(fields.next()?)?;
    let type_bits: i32 = fields.next()?.trim().parse().ok()?;
    let hitsound: i32 = fields.next()?.trim().parse().ok()?;

    // Slider first: it decides how many of the remaining fields belong to the object.
    if type_bits & HIT_TYPE_SLIDER != 0 {
        let curve = fields.next().filter(|c| !c.is_empty())?;
        let (kind, warnings) = parse_slider(curve, &mut fields, type_bits, line, line_no);
        return Some(HitObjectLine::Parsed {
            object: HitObject {
                x,
                y,
                time,
                hitsound,
                kind,
            },
            warnings,
        });
    }

    let kind = if type_bits & HIT_TYPE_CIRCLE != 0 {
        HitObjectKind::Circle
    } else if type_bits & HIT_TYPE_SPINNER != 0 {
        HitObjectKind::Spinner
    } else {
        return Some(HitObjectLine::Unclassified(
            ParseWarning::new(
                WarningKind::UnknownHitObjectType,
                format!("unknown hit object type {type_bits}, skipping it"),
                line_no,
            )
            .with_context(line.to_string()),
        ));
    };

    Some(HitObjectLine::Parsed {
        object: HitObject {
            x,
            y,
            time,
            hitsound,
            kind,
        },
        warnings: Vec::new(),
    })
}

/// Curve problems and tail problems are reported separately: a bad control
/// point is dropped on its own, and only a bad tail falls back to the defaults.
fn parse_slider<'a>(
    curve: &str,
    rest: &mut impl Iterator<Item = &'a str>,
    type_bits: i32,
    line: &str,
    line_no: usize,
) -> (HitObjectKind, Vec<ParseWarning>) {
    let mut warnings = Vec::new();
    let mut tokens = curve.split('|');
    let head = tokens.next().unwrap_or_default();
    let shape = head.chars().next().unwrap_or('|');

    let mut control_points = Vec::new();
    let mut bad_points = 0;
    for token in tokens {
        match parse_control_point(token) {
            Some(point) => control_points.push(point),
            None => bad_points += 1,
        }
    }
    if head.chars().count() != 1 || bad_points > 0 {
        warnings.push(
            ParseWarning::new(
                WarningKind::MalformedCurve,
                format!("malformed curve for slider({type_bits}), dropped {bad_points} control points"),
                line_no,
            )
            .with_context(line.to_string()),
        );
    }

    let (repeat_count, path_length) = match parse_slider_tail(rest.next(), rest.next()) {
        Some(tail) => tail,
        None => {
            warnings.push(
                ParseWarning::new(
                    WarningKind::MalformedSliderTail,
                    format!("failed to parse repeats and length for slider({type_bits})"),
                    line_no,
                )
                .with_context(line.to_string()),
            );
            (DEFAULT_REPEAT_COUNT, DEFAULT_PATH_LENGTH)
        }
    };

    (
        HitObjectKind::Slider {
            shape,
            repeat_count,
            path_length,
            control_points,
        },
        warnings,
    )
}

fn parse_control_point(token: &str) -> Option<ControlPoint> {
    let (x, y) = token.split_once(':')?;
    Some(ControlPoint {
        x: parse_finite(x)?,
        y: parse_finite(y)?,
    })
}

fn parse_slider_tail(repeats: Option<&str>, length: Option<&str>) -> Option<(u32, f64)> {
    let repeats = parse_finite(repeats?)?;
    let length = parse_finite(length?)?;
    if repeats < 0.0 || length < 0.0 {
        return None;
    }
    Some((repeats as u32, length))
}

fn parse_finite(field: &str) -> Option<f64> {
    let v: f64 = field.trim().parse().ok()?;
    v.is_finite().then_some(v)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parsed(line: &str) -> (HitObject, Vec<ParseWarning>) {
        match parse_hit_object_line(line, 7) {
            Some(HitObjectLine::Parsed { object, warnings }) => (object, warnings),
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[test]
    fn slider_bit_wins_over_circle_bit() {
        let (obj, warnings) = parsed("10,20,300,3,0,L|40:50,2,95.5");
        assert!(warnings.is_empty());
        match obj.kind {
            HitObjectKind::Slider {
                shape,
                repeat_count,
                path_length,
                control_points,
            } => {
                assert_eq!(shape, 'L');
                assert_eq!(repeat_count, 2);
                assert_eq!(path_length, 95.5);
                assert_eq!(control_points, vec![ControlPoint { x: 40.0, y: 50.0 }]);
            }
            other => panic!("unexpected kind {other:?}"),
        }
    }

    #[test]
    fn circle_bit_wins_over_spinner_bit() {
        let (obj, _) = parsed("0,0,0,9,0,0:0:0:0:");
        assert_eq!(obj.kind, HitObjectKind::Circle);
    }

    #[test]
    fn new_combo_and_colour_bits_are_ignored() {
        let (obj, _) = parsed("256,192,2000,12,0,3000,0:0:0:0:");
        assert_eq!(obj.kind, HitObjectKind::Spinner);
        let (obj, _) = parsed("256,192,2000,5,4");
        assert_eq!(obj.kind, HitObjectKind::Circle);
        assert_eq!(obj.hitsound, 4);
    }

    #[test]
    fn unknown_type_is_reported_not_stored() {
        match parse_hit_object_line("256,192,2000,128,0,3000:0:0:0:0:", 3) {
            Some(HitObjectLine::Unclassified(w)) => {
                assert_eq!(w.kind, WarningKind::UnknownHitObjectType);
                assert_eq!(w.line, 3);
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[test]
    fn malformed_leading_fields_end_the_section() {
        assert!(parse_hit_object_line("", 1).is_none());
        assert!(parse_hit_object_line("abc,1,2,1,0", 1).is_none());
        assert!(parse_hit_object_line("1,2,inf,1,0", 1).is_none());
        assert!(parse_hit_object_line("1,2,3,1", 1).is_none());
        assert!(parse_hit_object_line("1,2,3,2,0", 1).is_none());
    }

    #[test]
    fn slider_with_bad_tail_keeps_defaults() {
        let (obj, warnings) = parsed("1,2,3,2,0,B|4:5|6:7,x,y");
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].kind, WarningKind::MalformedSliderTail);
        match obj.kind {
            HitObjectKind::Slider {
                repeat_count,
                path_length,
                control_points,
                ..
            } => {
                assert_eq!(repeat_count, 0);
                assert_eq!(path_length, 1.0);
                assert_eq!(control_points.len(), 2);
            }
            other => panic!("unexpected kind {other:?}"),
        }
    }

    #[test]
    fn fractional_control_points_keep_the_tail() {
        let (obj, warnings) = parsed("100,100,1500,2,0,B|200.5:100|300:100,2,140");
        assert!(warnings.is_empty(), "{warnings:?}");
        match obj.kind {
            HitObjectKind::Slider {
                repeat_count,
                path_length,
                control_points,
                ..
            } => {
                assert_eq!(repeat_count, 2);
                assert_eq!(path_length, 140.0);
                assert_eq!(
                    control_points,
                    vec![
                        ControlPoint { x: 200.5, y: 100.0 },
                        ControlPoint { x: 300.0, y: 100.0 }
                    ]
                );
            }
            other => panic!("unexpected kind {other:?}"),
        }
    }

    #[test]
    fn bad_control_point_is_dropped_and_tail_kept() {
        let (obj, warnings) = parsed("1,2,3,2,0,B|4:5|oops|6:7,2,100");
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].kind, WarningKind::MalformedCurve);
        assert_eq!(warnings[0].code(), "W3004");
        match obj.kind {
            HitObjectKind::Slider {
                repeat_count,
                path_length,
                control_points,
                ..
            } => {
                assert_eq!(repeat_count, 2);
                assert_eq!(path_length, 100.0);
                assert_eq!(control_points.len(), 2);
            }
            other => panic!("unexpected kind {other:?}"),
        }
    }

    #[test]
    fn bad_curve_and_bad_tail_report_both() {
        let (obj, warnings) = parsed("1,2,3,2,0,Bez|4:5,1,-1");
        let kinds: Vec<_> = warnings.iter().map(|w| w.kind).collect();
        assert_eq!(
            kinds,
            vec![WarningKind::MalformedCurve, WarningKind::MalformedSliderTail]
        );
        match obj.kind {
            HitObjectKind::Slider {
                shape,
                repeat_count,
                path_length,
                control_points,
            } => {
                assert_eq!(shape, 'B');
                assert_eq!(repeat_count, 0);
                assert_eq!(path_length, 1.0);
                assert_eq!(control_points.len(), 1);
            }
            other => panic!("unexpected kind {other:?}"),
        }
    }

    #[test]
    fn slider_with_negative_length_keeps_defaults() {
        let (_, warnings) = parsed("1,2,3,2,0,P|4:5|6:7,1,-20");
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].kind, WarningKind::MalformedSliderTail);
    }
}
