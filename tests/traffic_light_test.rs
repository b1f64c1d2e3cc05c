//! Traffic light phase cycling tests

use traffic_simulator::simulation::{
    demo_config, ConnectionId, Engine, LightState, Location, Phase, Query, SimError, TimeInterval,
    TrafficLight, TrafficLightId, TrafficLightSystem, TrafficLightSystemId, DEMO_PHASE_DURATION,
};

fn light(id: usize) -> TrafficLight {
    TrafficLight::new(TrafficLightId::new(id), Location::new(ConnectionId::new(id), 1.0))
}

/// One light per phase, each green only during its own phase
fn rotating_system(phase_count: usize, phase_duration: f64) -> TrafficLightSystem {
    let lights = (0..phase_count).map(light).collect();
    let phases = (0..phase_count)
        .map(|id| Phase::new([TrafficLightId::new(id)]))
        .collect();
    TrafficLightSystem::new(TrafficLightSystemId::new(100), lights, phases, phase_duration).unwrap()
}

fn seconds(value: f64) -> TimeInterval {
    TimeInterval::new(value).unwrap()
}

fn states(system: &TrafficLightSystem) -> Vec<LightState> {
    system
        .all_traffic_lights()
        .iter()
        .map(|light| light.state)
        .collect()
}

#[test]
fn test_new_system_starts_in_first_phase() {
    let system = rotating_system(2, 2.0);
    assert_eq!(system.current_phase(), 0);
    assert_eq!(system.elapsed(), 0.0);
    assert_eq!(states(&system), vec![LightState::Green, LightState::Red]);
}

#[test]
fn test_phase_cycles_back_to_start() {
    let mut system = rotating_system(2, 2.0);
    let expected = [(0, 0.5), (0, 1.5), (0, 1.75), (1, 0.0), (1, 1.5), (0, 0.0)];

    for (delta, (phase, elapsed)) in [0.5, 1.0, 0.25, 0.25, 1.5, 0.5].into_iter().zip(expected) {
        system = system.advanced(seconds(delta));
        assert_eq!(system.current_phase(), phase, "after +{}s", delta);
        assert!((system.elapsed() - elapsed).abs() < 1e-12, "after +{}s", delta);
    }
    assert_eq!(states(&system), vec![LightState::Green, LightState::Red]);
}

#[test]
fn test_lights_follow_active_phase() {
    let system = rotating_system(3, 1.0).advanced(seconds(1.0));
    assert_eq!(system.current_phase(), 1);
    assert_eq!(
        states(&system),
        vec![LightState::Red, LightState::Green, LightState::Red]
    );
}

#[test]
fn test_large_interval_skips_several_phases() {
    let system = rotating_system(3, 2.0).advanced(seconds(5.0));
    assert_eq!(system.current_phase(), 2);
    assert!((system.elapsed() - 1.0).abs() < 1e-12);
    assert_eq!(
        states(&system),
        vec![LightState::Red, LightState::Red, LightState::Green]
    );
}

#[test]
fn test_huge_interval_returns_promptly() {
    let system = rotating_system(2, 1.0).advanced(seconds(1e17));
    assert_eq!(system.current_phase(), 0);
    assert_eq!(system.elapsed(), 0.0);

    let system = rotating_system(3, 3.0).advanced(seconds(1e17 + 0.5));
    assert!(system.current_phase() < 3);
    assert!((0.0..3.0).contains(&system.elapsed()));
    assert_eq!(
        system
            .all_traffic_lights()
            .iter()
            .filter(|light| light.state.is_green())
            .count(),
        1
    );
}

#[test]
fn test_repeated_small_steps_switch_on_time() {
    // 0.1 is not exactly representable; ten steps must still switch
    let mut system = rotating_system(2, 1.0);
    for _ in 0..10 {
        system = system.advanced(seconds(0.1));
    }
    assert_eq!(system.current_phase(), 1);
    assert!(system.elapsed() < 1e-6);
}

#[test]
fn test_zero_interval_keeps_phase() {
    let system = rotating_system(2, 2.0).advanced(seconds(1.0));
    let same = system.advanced(seconds(0.0));
    assert_eq!(same, system);
}

#[test]
fn test_advancing_leaves_original_untouched() {
    let system = rotating_system(2, 2.0);
    let _ = system.advanced(seconds(3.0));
    assert_eq!(system.current_phase(), 0);
    assert_eq!(system.elapsed(), 0.0);
}

#[test]
fn test_all_red_phase() {
    let system = TrafficLightSystem::new(
        TrafficLightSystemId::new(1),
        vec![light(0), light(1)],
        vec![Phase::new([TrafficLightId::new(0)]), Phase::default()],
        1.0,
    )
    .unwrap()
    .advanced(seconds(1.0));
    assert!(system.all_traffic_lights().iter().all(|light| light.state.is_red()));
}

#[test]
fn test_system_requires_phases() {
    let result = TrafficLightSystem::new(TrafficLightSystemId::new(1), vec![light(0)], vec![], 1.0);
    assert!(matches!(
        result,
        Err(SimError::InvalidTrafficLightSystem { .. })
    ));
}

#[test]
fn test_system_requires_positive_duration() {
    for duration in [0.0, -1.0, f64::NAN, f64::INFINITY] {
        let result = TrafficLightSystem::new(
            TrafficLightSystemId::new(1),
            vec![light(0)],
            vec![Phase::new([TrafficLightId::new(0)])],
            duration,
        );
        assert!(result.is_err(), "duration {} accepted", duration);
    }
}

#[test]
fn test_phase_cannot_reference_foreign_light() {
    let result = TrafficLightSystem::new(
        TrafficLightSystemId::new(1),
        vec![light(0)],
        vec![Phase::new([TrafficLightId::new(7)])],
        1.0,
    );
    assert!(matches!(
        result,
        Err(SimError::InvalidTrafficLightSystem { .. })
    ));
}

#[test]
fn test_system_rejects_duplicate_lights() {
    let result = TrafficLightSystem::new(
        TrafficLightSystemId::new(1),
        vec![light(0), light(0)],
        vec![Phase::new([TrafficLightId::new(0)])],
        1.0,
    );
    assert!(result.is_err());
}

#[test]
fn test_demo_signal_alternates() {
    let engine = Engine::new(demo_config()).unwrap();
    let state = engine.run_query(Query::Init).unwrap();
    let system = &state.traffic_light_systems()[0];
    assert_eq!(system.phase_duration(), DEMO_PHASE_DURATION);
    assert_eq!(system.phases().len(), 2);

    let greens = |system: &TrafficLightSystem| -> Vec<TrafficLightId> {
        system
            .all_traffic_lights()
            .iter()
            .filter(|light| light.state.is_green())
            .map(|light| light.id)
            .collect()
    };
    let first = greens(system);
    let second = greens(&system.advanced(seconds(DEMO_PHASE_DURATION)));
    assert_eq!(first.len(), 1);
    assert_eq!(second.len(), 1);
    assert_ne!(first, second);
}
