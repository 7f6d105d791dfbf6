use super::*;
use crate::foundation::core::Canvas;
use crate::trace::model::{GenerationRecord, GenerationStatus, PopulationMember};
use crate::trace::store::TraceValidation;

fn trace_with_variances(variances: &[f64]) -> Trace {
    let generations = variances
        .iter()
        .map(|&variance| GenerationRecord {
            status: GenerationStatus {
                population_size: 1,
                temperature: 1.2,
                variance,
                best_solution: None,
                generation: None,
            },
            population: vec![PopulationMember {
                tour: vec![1, 2, 3],
                solution_value: 1.0,
            }],
        })
        .collect();
    Trace::from_generations(generations, TraceValidation::Strict).unwrap()
}

fn frame() -> PanelFrame {
    PanelFrame {
        generation_index: 0,
        total_generations: 2,
        step_index: 1,
        population_size: 2,
        current_solution: 5.0,
        best_solution: Some(5.0),
        temperature: 1.5,
        variance: 12.345,
        variance_history: vec![12.345],
    }
}

#[test]
fn stat_lines_are_one_based() {
    let lines = frame().stat_lines();
    assert_eq!(lines[0], "Generation: 1 / 2");
    assert_eq!(lines[1], "Population Member: 2 / 2");
    assert_eq!(lines[2], "Current Solution: 5");
    assert_eq!(lines[3], "Best Solution Ever: 5");

    let unknown = PanelFrame {
        best_solution: None,
        current_solution: 7.25,
        ..frame()
    };
    assert_eq!(unknown.stat_lines()[2], "Current Solution: 7.25");
    assert_eq!(unknown.stat_lines()[3], "Best Solution Ever: n/a");
}

#[test]
fn temperature_gauge_is_clamped() {
    assert_eq!(temperature_fraction(1.0), 0.0);
    assert_eq!(temperature_fraction(1.25), 0.5);
    assert_eq!(temperature_fraction(1.5), 1.0);
    assert_eq!(temperature_fraction(0.2), 0.0);
    assert_eq!(temperature_fraction(9.0), 1.0);
    assert_eq!(temperature_fraction(f64::NAN), 0.0);
}

#[test]
fn temperature_color_runs_green_to_red() {
    assert_eq!(temperature_color(0.0), Rgba8::rgb(0, 255, 0));
    assert_eq!(temperature_color(1.0), Rgba8::rgb(255, 0, 0));
    assert_eq!(temperature_color(0.5), Rgba8::rgb(255, 255, 0));
}

#[test]
fn variance_history_covers_current_plus_ten_prior() {
    let variances: Vec<f64> = (0..15).map(f64::from).collect();
    let trace = trace_with_variances(&variances);
    let h = variance_history(&trace, 12, VARIANCE_WINDOW);
    assert_eq!(h.len(), 11);
    assert_eq!(h.first(), Some(&2.0));
    assert_eq!(h.last(), Some(&12.0));
    assert_eq!(variance_history(&trace, 3, VARIANCE_WINDOW), vec![0.0, 1.0, 2.0, 3.0]);
    assert_eq!(variance_history(&trace, 20, VARIANCE_WINDOW).len(), 5);
}

#[test]
fn sparkline_points_span_the_area_and_clamp() {
    let area = Rect::new(0.0, 0.0, 100.0, 40.0);
    let pts = sparkline_points(&[0.0, 750.0, 3000.0], area);
    assert_eq!(pts[0], Point::new(0.0, 40.0));
    assert_eq!(pts[1], Point::new(50.0, 20.0));
    assert_eq!(pts[2], Point::new(100.0, 0.0));

    let single = sparkline_points(&[1500.0], area);
    assert_eq!(single, vec![Point::new(0.0, 0.0)]);
    assert!(sparkline_points(&[], area).is_empty());
}

#[test]
fn hot_gauge_is_filled_red() {
    let mut painter = Painter::new(Canvas::new(400, 400).unwrap()).unwrap();
    painter.begin_frame(Rgba8::WHITE);
    StatsPanel
        .draw(&mut painter, &ThemeState::default(), &frame())
        .unwrap();
    let out = painter.finish();
    assert_eq!(out.pixel(40, 165), Some([255, 0, 0, 255]));
    assert_eq!(out.pixel(280, 165), Some([255, 0, 0, 255]));
    assert_eq!(out.pixel(350, 350), Some([255, 255, 255, 255]));
}

#[test]
fn cold_gauge_shows_only_the_track() {
    let mut painter = Painter::new(Canvas::new(400, 400).unwrap()).unwrap();
    painter.begin_frame(Rgba8::WHITE);
    let cold = PanelFrame {
        temperature: 0.9,
        ..frame()
    };
    StatsPanel
        .draw(&mut painter, &ThemeState::default(), &cold)
        .unwrap();
    let out = painter.finish();
    assert_eq!(out.pixel(40, 165), Some([0xf0, 0xf0, 0xf0, 255]));
}
