use rand::Rng;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub x: f32,
    pub y: f32,
    pub radius: f32,
    pub speed_x: f32,
    pub speed_y: f32,
}

/// Background particles drifting across the page and wrapping at the edges.
///
/// The field only owns motion; the fill is the computed primary color at
/// draw time, so particles follow theme changes without being told.
#[derive(Debug, Clone)]
pub struct ParticleField {
    width: f32,
    height: f32,
    particles: Vec<Particle>,
}

impl ParticleField {
    pub const COUNT: usize = 30;

    pub fn new<R: Rng + ?Sized>(rng: &mut R, width: f32, height: f32) -> Self {
        Self::with_count(rng, Self::COUNT, width, height)
    }

    pub fn with_count<R: Rng + ?Sized>(rng: &mut R, count: usize, width: f32, height: f32) -> Self {
        let particles = (0..count)
            .map(|_| Particle {
                x: rng.gen_range(0.0..width.max(f32::EPSILON)),
                y: rng.gen_range(0.0..height.max(f32::EPSILON)),
                radius: rng.gen_range(1.0..4.0),
                speed_x: rng.gen_range(-0.25..0.25),
                speed_y: rng.gen_range(-0.25..0.25),
            })
            .collect();
        Self {
            width,
            height,
            particles,
        }
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn size(&self) -> (f32, f32) {
        (self.width, self.height)
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
    }

    pub fn step(&mut self) {
        let (width, height) = (self.width, self.height);
        for p in &mut self.particles {
            p.x += p.speed_x;
            p.y += p.speed_y;

            if p.x < 0.0 {
                p.x = width;
            }
            if p.x > width {
                p.x = 0.0;
            }
            if p.y < 0.0 {
                p.y = height;
            }
            if p.y > height {
                p.y = 0.0;
            }
        }
    }
}
