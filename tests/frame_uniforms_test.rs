use std::time::Duration;

use glowgate::camera::{Camera, OrbitController};
use glowgate::panel::Tweaks;
use glowgate::scene::SceneUniforms;
use glowgate::{InnerSpace, Point3};

#[test]
fn should_push_elapsed_time_into_both_materials() {
    let mut uniforms = SceneUniforms::new(1.0, [1280.0, 720.0]);

    for elapsed in [0.0f32, 0.5, 1.0] {
        uniforms.advance(elapsed);
        assert_eq!(uniforms.portal.time, elapsed);
        assert_eq!(uniforms.fireflies.time, elapsed);
    }
}

#[test]
fn should_only_touch_the_edited_uniform_on_a_colour_change() {
    let mut tweaks = Tweaks::default();
    let mut uniforms = SceneUniforms::new(1.0, [1280.0, 720.0]);
    tweaks.apply(&mut uniforms);
    uniforms.advance(0.5);
    let before = uniforms;

    tweaks.portal_color_start = [1.0, 0.0, 0.0];
    tweaks.apply(&mut uniforms);

    assert_ne!(uniforms.portal.color_start, before.portal.color_start);
    assert_eq!(uniforms.portal.color_end, before.portal.color_end);
    assert_eq!(uniforms.portal.time, before.portal.time);
    assert_eq!(uniforms.fireflies, before.fireflies);
}

#[test]
fn should_clamp_the_firefly_size_to_the_slider_range() {
    let mut tweaks = Tweaks::default();
    let mut uniforms = SceneUniforms::new(1.0, [1280.0, 720.0]);

    tweaks.firefly_size = 250.0;
    tweaks.apply(&mut uniforms);
    assert_eq!(uniforms.fireflies.size, 100.0);

    tweaks.firefly_size = -10.0;
    tweaks.apply(&mut uniforms);
    assert_eq!(uniforms.fireflies.size, 0.0);
}

#[test]
fn should_decay_orbit_velocity_toward_zero() {
    let mut camera = Camera::new((4.0, 2.0, 4.0), (0.0, 0.0, 0.0));
    let mut controller = OrbitController::new(0.02, 0.05);
    controller.sync(&camera);

    controller.handle_mouse(120.0, 40.0);
    let mut previous = controller.angular_speed();
    assert!(previous > 0.0);

    let dt = Duration::from_millis(16);
    for _ in 0..240 {
        controller.update(&mut camera, dt);
        let speed = controller.angular_speed();
        assert!(speed < previous, "velocity must decay monotonically");
        previous = speed;
    }
    assert!(previous < 1e-3, "velocity should ease out, got {previous}");

    // The orbit never changes the distance to the target on its own.
    let distance = (camera.position - Point3::new(0.0, 0.0, 0.0)).magnitude();
    assert!((distance - 6.0).abs() < 1e-3, "distance drifted to {distance}");
}
