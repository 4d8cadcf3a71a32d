use glowgate::Deg;
use glowgate::camera::Projection;
use glowgate::context::clamped_pixel_ratio;
use glowgate::scene::SceneUniforms;

#[test]
fn should_track_aspect_ratio_after_resize() {
    let mut projection = Projection::new(1280, 720, Deg(45.0), 0.1, 100.0);
    assert_eq!(projection.aspect, 1280.0 / 720.0);

    projection.resize(800, 600);
    assert_eq!(projection.aspect, 800.0 / 600.0);

    projection.resize(600, 800);
    assert_eq!(projection.aspect, 600.0 / 800.0);
}

#[test]
fn should_clamp_pixel_ratio_to_two() {
    assert_eq!(clamped_pixel_ratio(0.0), 0.0);
    assert_eq!(clamped_pixel_ratio(1.0), 1.0);
    assert_eq!(clamped_pixel_ratio(1.5), 1.5);
    assert_eq!(clamped_pixel_ratio(2.0), 2.0);
    assert_eq!(clamped_pixel_ratio(2.625), 2.0);
    assert_eq!(clamped_pixel_ratio(4.0), 2.0);
}

#[test]
fn should_propagate_the_viewport_into_the_firefly_uniform() {
    let mut uniforms = SceneUniforms::new(1.0, [1280.0, 720.0]);
    let portal_before = uniforms.portal;

    uniforms.set_viewport(clamped_pixel_ratio(3.0), [800.0, 600.0]);

    assert_eq!(uniforms.fireflies.pixel_ratio, 2.0);
    assert_eq!(uniforms.fireflies.resolution, [800.0, 600.0]);
    // A resize must not disturb the portal material.
    assert_eq!(uniforms.portal, portal_before);
}
