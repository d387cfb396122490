//! Seeded random rectangle scenes.

use clap::ValueEnum;
use glam::{Vec2, Vec3};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use quadsdf_engine::coords::{Canvas, Transform};
use quadsdf_engine::paint::Color;
use quadsdf_engine::quad::{QuadBatch, QuadVariant, RectInstance};

/// Number of alternating batches in [`Scenario::Mixed`].
const MIXED_BATCHES: usize = 8;

#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Scenario {
    /// Everything through the flat pipeline.
    Flat,
    /// Everything through the antialiased pipeline.
    #[default]
    Antialiased,
    /// Alternating flat and antialiased batches (pipeline switches).
    Mixed,
    /// Antialiased, with an animated zoom around the canvas center.
    Zoom,
}

/// Rectangles generated once, in the pixel space of the canvas they were made for.
#[derive(Debug, Clone)]
pub struct Scene {
    scenario: Scenario,
    extent: Vec2,
    instances: Vec<RectInstance>,
}

impl Scene {
    pub fn generate(canvas: Canvas, scenario: Scenario, count: usize, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let extent = canvas.size_f32();
        let max_side = (extent.min_element() / 8.0).max(4.0);

        let instances = (0..count)
            .map(|_| {
                let size = Vec2::new(rng.random_range(2.0..max_side), rng.random_range(2.0..max_side));
                let pos = Vec2::new(
                    rng.random_range(0.0..extent.x - size.x.min(extent.x - 1.0)),
                    rng.random_range(0.0..extent.y - size.y.min(extent.y - 1.0)),
                );
                let color = Color::rgba(
                    rng.random_range(0.0..1.0),
                    rng.random_range(0.0..1.0),
                    rng.random_range(0.0..1.0),
                    rng.random_range(0.5..1.0),
                );
                RectInstance::new(Vec3::new(pos.x, pos.y, 0.0), size, color)
            })
            .collect();

        Self {
            scenario,
            extent,
            instances,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.instances.len()
    }

    #[inline]
    pub fn scenario(&self) -> Scenario {
        self.scenario
    }

    /// Scene units → clip space for `canvas`; the scene stretches with the window.
    pub fn view(&self, canvas: Canvas, time: f32) -> Transform {
        let fit = Transform::pixels(canvas).scale(canvas.size_f32() / self.extent);
        match self.scenario {
            Scenario::Zoom => {
                let factor = 1.0 + 0.5 * (time * 0.8).sin();
                fit.scale_about(self.extent * 0.5, Vec2::splat(factor))
            }
            _ => fit,
        }
    }

    /// Draw batches for one frame.
    pub fn batches(&self, canvas: Canvas, time: f32) -> Vec<QuadBatch> {
        let view = self.view(canvas, time);
        let single = |variant| vec![QuadBatch::with_instances(variant, view, self.instances.clone())];

        match self.scenario {
            Scenario::Flat => single(QuadVariant::Flat),
            Scenario::Antialiased | Scenario::Zoom => single(QuadVariant::Antialiased),
            Scenario::Mixed => {
                let chunk = self.instances.len().div_ceil(MIXED_BATCHES).max(1);
                self.instances
                    .chunks(chunk)
                    .enumerate()
                    .map(|(i, part)| {
                        let variant = if i % 2 == 0 { QuadVariant::Flat } else { QuadVariant::Antialiased };
                        QuadBatch::with_instances(variant, view, part.to_vec())
                    })
                    .collect()
            }
        }
    }
}
