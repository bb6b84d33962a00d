//! End-to-end: pattern source through the compiler into a running field

use flurry_core::{Field, FieldConfig, Model, Particle, PatternRng, Sibling};
use flurry_script::{CompileError, Compiler, Error, Pattern};
use flurry_syntax::{parse_program, print, PrintOptions};
use glam::DVec3;

const EPSILON: f64 = 1e-9;

fn run(source: &str, ticks: &[f64]) -> Field {
    let pattern = Pattern::compile_source(source).unwrap();
    let mut field = Field::default();
    pattern.spawn_into(&mut field);
    for &dt in ticks {
        field.update(dt);
    }
    field
}

fn sorted(mut values: Vec<f64>) -> Vec<f64> {
    values.sort_by(|a, b| a.total_cmp(b));
    values
}

fn generated_lifespans(source: &str, total: usize) -> Vec<f64> {
    let program = parse_program(source).unwrap();
    let gen = Compiler::new().compile(&program).unwrap();
    let mut rng = PatternRng::default();
    (0..total)
        .map(|index| gen.generate(Sibling::new(index, total), &mut rng).lifespan())
        .collect()
}

#[test]
fn test_each_choice_spreads_over_emitted_batch() {
    let field = run("emit 4 1 1 { hue [10 20 30] | 100 nop }", &[1.0]);
    let hues = sorted(field.iter().map(|p| p.hue).collect());
    assert_eq!(hues, vec![10.0, 10.0, 20.0, 30.0]);
}

#[test]
fn test_each_choice_wraps_by_index() {
    let lifespans = generated_lifespans("[1 2 3] nop", 4);
    assert_eq!(lifespans, vec![1.0, 2.0, 3.0, 1.0]);
}

#[test]
fn test_each_range_spreads_evenly() {
    let lifespans = generated_lifespans("[0..10] nop", 5);
    assert_eq!(lifespans, vec![0.0, 2.5, 5.0, 7.5, 10.0]);
}

#[test]
fn test_each_angle() {
    assert_eq!(generated_lifespans("[] nop", 2), vec![90.0, 270.0]);
    assert_eq!(generated_lifespans("[] nop", 4), vec![0.0, 90.0, 180.0, 270.0]);
}

#[test]
fn test_emitted_angles_fan_out() {
    let field = run("emit 4 1 1 { rotate 0 [] 0 | 100 nop }", &[1.0]);
    let forwards: Vec<DVec3> = field.iter().map(|p| p.rotation * DVec3::Z).collect();
    assert_eq!(forwards.len(), 4);
    for expected in [DVec3::Z, DVec3::X, -DVec3::Z, -DVec3::X] {
        assert!(
            forwards.iter().any(|f| (*f - expected).length() < 1e-6),
            "no particle facing {:?}",
            expected
        );
    }
}

#[test]
fn test_emit_one_child_per_slot() {
    let pattern = Pattern::compile_source("3 emit 1 3 1 100 nop").unwrap();
    let mut field = Field::default();
    pattern.spawn_into(&mut field);

    field.update(0.5);
    assert_eq!(field.len(), 1);
    field.update(1.0);
    assert_eq!(field.len(), 2);
    field.update(1.0);
    assert_eq!(field.len(), 3);
    field.update(1.0);
    // the third child arrives as the emitter itself completes
    assert_eq!(field.len(), 3);
}

#[test]
fn test_sequence_carries_leftover_time() {
    let field = run("5 speed+ 10\n5 hue+ 10\n100 nop", &[6.0]);
    let particle: Vec<(f64, f64)> = field.iter().map(|p| (p.speed, p.hue)).collect();
    assert_eq!(particle.len(), 1);
    assert!((particle[0].0 - 10.0).abs() < EPSILON);
    assert!((particle[0].1 - 2.0).abs() < EPSILON);
}

#[test]
fn test_multiply_is_tick_independent() {
    let field = run("speed 1\n10 speed* 4\n100 nop", &[0.7; 15]);
    let speed = field.iter().next().map(|p| p.speed).unwrap();
    assert!((speed - 4.0).abs() < 1e-9, "speed {}", speed);
}

#[test]
fn test_forward_motion_follows_speed() {
    let field = run("speed 2\n10 nop", &[1.0, 1.0]);
    let position = field.iter().next().map(|p| p.position).unwrap();
    assert!((position - DVec3::new(0.0, 0.0, 4.0)).length() < EPSILON);
}

#[test]
fn test_model_switch_and_close() {
    let field = run("model orb\nloop 2 close", &[2.5]);
    let particle: Vec<&Particle> = field.iter().collect();
    assert_eq!(particle.len(), 1);
    assert_eq!(particle[0].model, Model::Orb);
    assert!(particle[0].closed);
}

#[test]
fn test_zero_lifespan_combinators_apply_at_once() {
    let field = run("0 { speed 5 | hue 40 }\n0 orb opacity 0.5\n0 repeat 3 hue+ 1\n100 nop", &[1.0]);
    let particle: Vec<&Particle> = field.iter().collect();
    assert_eq!(particle.len(), 1);
    assert!((particle[0].speed - 5.0).abs() < EPSILON);
    assert!((particle[0].hue - 43.0).abs() < EPSILON);
    assert!((particle[0].opacity - 0.5).abs() < EPSILON);
    assert_eq!(particle[0].model, Model::Orb);
}

#[test]
fn test_random_choices_replay_with_seed() {
    let hues = |seed| {
        let pattern = Pattern::compile_source("emit 8 1 1 { hue <0..360> | 100 nop }").unwrap();
        let mut field = Field::new(FieldConfig { seed, capacity: 16 });
        pattern.spawn_into(&mut field);
        field.update(1.0);
        sorted(field.iter().map(|p| p.hue).collect())
    };
    let first = hues(77);
    assert_eq!(first.len(), 8);
    assert_eq!(first, hues(77));
    assert!(first.iter().all(|hue| (0.0..360.0).contains(hue)));
}

#[test]
fn test_printed_program_compiles_the_same() {
    let source = "30 emit 3 2 1 { ease-in 10 speed [1..3] | <arrow claw orb> 20 nop }";
    let program = parse_program(source).unwrap();
    for indent in [false, true] {
        for sugar in [false, true] {
            let text = print(&program, PrintOptions { indent, sugar });
            let reparsed = parse_program(&text).unwrap();
            assert_eq!(reparsed, program, "{}", text);
            assert!(Compiler::new().compile(&reparsed).is_ok());
        }
    }
}

#[test]
fn test_error_reporting() {
    match Pattern::compile_source("emit 1 1 1 {\n  speed 2\n  | hue ]\n}") {
        Err(Error::Parse(err)) => assert_eq!(err.line, 3),
        other => panic!("expected parse error, got {:?}", other.map(|_| ())),
    }

    let err = Pattern::compile_source("rotate 1 2").unwrap_err();
    assert_eq!(err.to_string(), "Compile error: `rotate` takes 3 argument(s), got 2");

    assert!(matches!(
        Pattern::compile_source("speed ease-in"),
        Err(Error::Compile(CompileError::Kind { .. }))
    ));
}
