use rand::Rng;
use std::f32::consts::PI;

use super::Renderer3D;
use crate::theme::generator::{ACCENT_TONE, PRIMARY_TONE, SECONDARY_TONE};
use crate::theme::{ColorTriad, Hsl};

pub const RANDOM_MODEL_THEME_NAME: &str = "Random 3D Theme";

const CUBE_SPIN_PER_FRAME: f32 = 0.01;

/// Label shown on the rotate button; names the action it will take.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotateLabel {
    Pause,
    Rotate,
}

impl RotateLabel {
    pub fn text(self) -> &'static str {
        match self {
            RotateLabel::Pause => "Pause",
            RotateLabel::Rotate => "Rotate",
        }
    }
}

/// The spinning showcase cube. Faces cycle primary, secondary, accent.
#[derive(Debug, Clone)]
pub struct Showcase {
    rotating: bool,
    rotation: [f32; 2],
    faces: [String; 6],
}

fn faces_for(colors: &ColorTriad) -> [String; 6] {
    [
        colors.primary.clone(),
        colors.secondary.clone(),
        colors.accent.clone(),
        colors.primary.clone(),
        colors.secondary.clone(),
        colors.accent.clone(),
    ]
}

impl Showcase {
    pub fn new(colors: &ColorTriad) -> Self {
        Self {
            rotating: true,
            rotation: [0.0, 0.0],
            faces: faces_for(colors),
        }
    }

    pub fn is_rotating(&self) -> bool {
        self.rotating
    }

    pub fn rotation(&self) -> [f32; 2] {
        self.rotation
    }

    pub fn faces(&self) -> &[String; 6] {
        &self.faces
    }

    pub fn toggle_rotation(&mut self) -> RotateLabel {
        self.rotating = !self.rotating;
        if self.rotating {
            RotateLabel::Pause
        } else {
            RotateLabel::Rotate
        }
    }

    pub fn tick(&mut self) {
        if self.rotating {
            self.rotation[0] += CUBE_SPIN_PER_FRAME;
            self.rotation[1] += CUBE_SPIN_PER_FRAME;
        }
    }

    /// Repaints the cube with an evenly spaced triad. Does not touch the page theme.
    pub fn randomize_colors<R: Rng + ?Sized>(&mut self, rng: &mut R) -> ColorTriad {
        let hue1: u16 = rng.gen_range(0..360);
        let triad = ColorTriad::from_hsl(
            Hsl::new(hue1, PRIMARY_TONE.0, PRIMARY_TONE.1),
            Hsl::new((hue1 + 120) % 360, SECONDARY_TONE.0, SECONDARY_TONE.1),
            Hsl::new((hue1 + 240) % 360, ACCENT_TONE.0, ACCENT_TONE.1),
        );
        self.faces = faces_for(&triad);
        triad
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorSlot {
    Primary,
    Secondary,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlobePoint {
    pub position: [f32; 3],
    pub origin_y: f32,
    pub slot: ColorSlot,
    pub speed: f32,
}

/// Wireframe globe studded with points on a golden spiral.
#[derive(Debug, Clone)]
pub struct Globe {
    rotation_y: f32,
    points: Vec<GlobePoint>,
    colors: ColorTriad,
    /// Camera aspect ratio, width over height.
    aspect: f32,
}

impl Globe {
    pub const RADIUS: f32 = 2.0;
    pub const POINT_COUNT: usize = 100;
    const SPIN_PER_FRAME: f32 = 0.002;
    const BOB_AMPLITUDE: f32 = 0.1;

    pub fn new<R: Rng + ?Sized>(rng: &mut R, colors: ColorTriad) -> Self {
        let n = Self::POINT_COUNT as f32;
        let points = (0..Self::POINT_COUNT)
            .map(|i| {
                let phi = (-1.0 + 2.0 * i as f32 / n).acos();
                let theta = (n * PI).sqrt() * phi;
                let y = Self::RADIUS * phi.sin() * theta.sin();
                GlobePoint {
                    position: [
                        Self::RADIUS * phi.sin() * theta.cos(),
                        y,
                        Self::RADIUS * phi.cos(),
                    ],
                    origin_y: y,
                    slot: if i % 2 == 0 {
                        ColorSlot::Primary
                    } else {
                        ColorSlot::Secondary
                    },
                    speed: rng.gen_range(0.0..0.01),
                }
            })
            .collect();
        Self {
            rotation_y: 0.0,
            points,
            colors,
            aspect: 1.0,
        }
    }

    pub fn points(&self) -> &[GlobePoint] {
        &self.points
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    pub fn rotation_y(&self) -> f32 {
        self.rotation_y
    }

    pub fn point_color(&self, point: &GlobePoint) -> &str {
        match point.slot {
            ColorSlot::Primary => &self.colors.primary,
            ColorSlot::Secondary => &self.colors.secondary,
        }
    }

    /// Advances one frame; `now_ms` drives the per-point bob.
    pub fn tick(&mut self, now_ms: f64) {
        self.rotation_y += Self::SPIN_PER_FRAME;
        for point in &mut self.points {
            let phase = (now_ms * f64::from(point.speed)).sin() as f32;
            point.position[1] = point.origin_y + phase * Self::BOB_AMPLITUDE;
        }
    }
}

impl Renderer3D for Globe {
    fn set_colors(&mut self, colors: &ColorTriad) {
        self.colors = colors.clone();
    }

    /// A collapsed viewport keeps the last usable aspect.
    fn resize(&mut self, width: f32, height: f32) {
        if width > 0.0 && height > 0.0 {
            self.aspect = width / height;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    fn triad() -> ColorTriad {
        ColorTriad {
            primary: "#6c63ff".to_string(),
            secondary: "#ff6584".to_string(),
            accent: "#43e97b".to_string(),
        }
    }

    #[test]
    fn rotation_toggle_flips_label_and_freezes_spin() {
        let mut showcase = Showcase::new(&triad());
        showcase.tick();
        assert_eq!(showcase.toggle_rotation(), RotateLabel::Rotate);
        let frozen = showcase.rotation();
        showcase.tick();
        assert_eq!(showcase.rotation(), frozen);
        assert_eq!(showcase.toggle_rotation().text(), "Pause");
        showcase.tick();
        assert!(showcase.rotation()[0] > frozen[0]);
    }

    #[test]
    fn randomized_cube_uses_an_even_triad() {
        let mut rng = SmallRng::seed_from_u64(8);
        let mut showcase = Showcase::new(&triad());
        for _ in 0..32 {
            let colors = showcase.randomize_colors(&mut rng);
            assert_eq!(showcase.faces()[0], colors.primary);
            assert_eq!(showcase.faces()[4], colors.secondary);
            assert_eq!(showcase.faces()[5], colors.accent);
            assert!(colors.secondary.ends_with(", 80%, 60%)"));
        }
    }

    #[test]
    fn globe_points_sit_on_the_sphere() {
        let mut rng = SmallRng::seed_from_u64(2);
        let globe = Globe::new(&mut rng, triad());
        assert_eq!(globe.points().len(), Globe::POINT_COUNT);
        for point in globe.points() {
            let [x, y, z] = point.position;
            let r = (x * x + y * y + z * z).sqrt();
            assert!((r - Globe::RADIUS).abs() < 1e-3, "radius {r}");
            assert!((0.0..0.01).contains(&point.speed));
        }
        assert_eq!(globe.point_color(&globe.points()[0]), "#6c63ff");
        assert_eq!(globe.point_color(&globe.points()[1]), "#ff6584");
    }

    #[test]
    fn globe_recolors_and_bobs() {
        let mut rng = SmallRng::seed_from_u64(2);
        let mut globe = Globe::new(&mut rng, triad());
        let mut next = triad();
        next.primary = "#00f5ff".to_string();
        globe.set_colors(&next);
        assert_eq!(globe.point_color(&globe.points()[0]), "#00f5ff");

        globe.tick(12_345.0);
        assert!((globe.rotation_y() - 0.002).abs() < f32::EPSILON);
        for point in globe.points() {
            assert!((point.position[1] - point.origin_y).abs() <= 0.1 + 1e-6);
        }
    }

    #[test]
    fn globe_resize_tracks_the_viewport() {
        let mut rng = SmallRng::seed_from_u64(3);
        let mut globe = Globe::new(&mut rng, triad());
        globe.resize(1280.0, 720.0);
        assert!((globe.aspect() - 16.0 / 9.0).abs() < 1e-6);
        globe.resize(800.0, 0.0);
        assert!((globe.aspect() - 16.0 / 9.0).abs() < 1e-6);
        globe.tick(0.0);
        assert_eq!(globe.points().len(), Globe::POINT_COUNT);
    }
}
