// Full-screen effects: point stars, nebula fog, star halos and the plain copy.
// Visual outcomes:
// - Point stars: a black frame sprinkled with single grey/white pixels.
// - Nebulae: a colored cloud layer added on top of whatever the source holds.
// - Star: one bright core with a soft colored halo added on top of the source.
// - Copy: the source, unchanged, in a new place (usually the screen).

use image::{Rgb, RgbImage};

use crate::context::{DrawCall, DrawContext, Filter, PixelFormat, Shader, TextureDesc, Uniform, Wrap};
use crate::error::Error;
use crate::random::Random;
use crate::shaders::ShaderStore;
use crate::types::{ProgramId, Rgb as Color, Size, Target, TextureId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EffectKind {
    PointStars,
    Nebulae,
    Star,
    Copy,
}

/// Read `source`, write every pixel of `destination`, hand `destination` back.
/// `source` is never modified and must not be `destination`.
pub trait Effect<P> {
    fn kind(&self) -> EffectKind;

    fn render(
        &mut self,
        ctx: &mut dyn DrawContext,
        source: Target,
        destination: Target,
        params: &P,
    ) -> Result<Target, Error>;
}

fn source_texture(source: Target) -> Result<TextureId, Error> {
    source.texture.ok_or(Error::ScreenAsSource)
}

/// Draw a full-screen quad into `destination` covering the drawable area.
fn draw_quad(
    ctx: &mut dyn DrawContext,
    program: ProgramId,
    destination: Target,
    uniforms: &[(&'static str, Uniform)],
) -> Result<(), Error> {
    let viewport = ctx.drawable_size();
    ctx.draw_fullscreen(&DrawCall { program, destination: destination.framebuffer, viewport, uniforms })
}

/* ----------------------------- copy / presentation ----------------------------- */

/// Passthrough: blits a texture into a target unchanged.
pub struct TextureRenderer {
    program: ProgramId,
}

impl TextureRenderer {
    pub fn new(shaders: &ShaderStore) -> Self {
        Self { program: shaders.program(Shader::Copy) }
    }

    pub fn copy(&self, ctx: &mut dyn DrawContext, texture: TextureId, destination: Target) -> Result<Target, Error> {
        draw_quad(ctx, self.program, destination, &[("u_source", Uniform::Sampler(texture))])?;
        Ok(destination)
    }
}

impl Effect<()> for TextureRenderer {
    fn kind(&self) -> EffectKind {
        EffectKind::Copy
    }

    fn render(&mut self, ctx: &mut dyn DrawContext, source: Target, destination: Target, _: &()) -> Result<Target, Error> {
        debug_assert_ne!(source, destination);
        self.copy(ctx, source_texture(source)?, destination)
    }
}

/* ----------------------------- point stars ----------------------------- */

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointStarOptions {
    pub brightness: f64, // scales the exponential brightness distribution
    pub density: f64,    // fraction of pixels that get a star
}

/// Scatter `round(area * density)` stars over a black RGB image.
/// Brightness is exponentially distributed, so most stars are faint.
pub fn generate_point_stars(size: Size, options: &PointStarOptions, rng: &mut Random) -> RgbImage {
    let mut image = RgbImage::new(size.width, size.height);
    let area = size.area();
    if area == 0 {
        return image;
    }
    let count = (area as f64 * options.density).round() as usize;
    for _ in 0..count {
        let idx = ((rng.random() * area as f64).floor() as usize).min(area - 1);
        let c = (255.0 * -(1.0 - rng.random()).ln() * options.brightness).round().clamp(0.0, 255.0) as u8;
        let (x, y) = (idx % size.width as usize, idx / size.width as usize);
        image.put_pixel(x as u32, y as u32, Rgb([c, c, c]));
    }
    image
}

/// Base layer. Not a filter: it ignores any source and paints a fresh
/// point-star field into its destination.
pub struct PointStarRenderer {
    options: PointStarOptions,
    rng: Random,
    copy: TextureRenderer,
    texture: Option<TextureId>,
}

impl PointStarRenderer {
    /// `rng` should be a stream of its own: the number of draws depends on
    /// the canvas area.
    pub fn new(shaders: &ShaderStore, options: PointStarOptions, rng: Random) -> Self {
        Self { options, rng, copy: TextureRenderer::new(shaders), texture: None }
    }

    pub fn kind(&self) -> EffectKind {
        EffectKind::PointStars
    }

    /// Regenerate the star texture at the drawable size, upload it once,
    /// then clear `destination` to black and copy the stars in.
    pub fn render(&mut self, ctx: &mut dyn DrawContext, destination: Target) -> Result<Target, Error> {
        let size = ctx.drawable_size();
        self.release(ctx);

        self.rng.reset();
        let image = generate_point_stars(size, &self.options, &mut self.rng);
        let desc = TextureDesc { size, format: PixelFormat::Rgb8, filter: Filter::Nearest, wrap: Wrap::ClampToEdge };
        let texture = ctx.create_texture(&desc, Some(image.as_raw()))?;
        self.texture = Some(texture);

        ctx.clear(destination.framebuffer, [0.0, 0.0, 0.0, 1.0])?;
        self.copy.copy(ctx, texture, destination)
    }

    pub fn release(&mut self, ctx: &mut dyn DrawContext) {
        if let Some(t) = self.texture.take() {
            ctx.delete_texture(t);
        }
    }
}

/* ----------------------------- nebulae ----------------------------- */

pub const NOISE_SIZE: u32 = 256;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NebulaeParams {
    pub offset: [f32; 2],
    pub scale: f32,
    pub falloff: f32,
    pub color: Color,
    pub density: f32,
}

pub struct NebulaeRenderer {
    program: ProgramId,
    noise: TextureId,
}

impl NebulaeRenderer {
    /// Builds the tiling noise texture from `rng` (one byte per draw).
    pub fn new(ctx: &mut dyn DrawContext, shaders: &ShaderStore, rng: &mut Random) -> Result<Self, Error> {
        let size = Size::new(NOISE_SIZE, NOISE_SIZE);
        let bytes: Vec<u8> = (0..size.area() * 4).map(|_| (rng.random() * 256.0) as u8).collect();
        let desc = TextureDesc { size, format: PixelFormat::Rgba8, filter: Filter::Linear, wrap: Wrap::Repeat };
        let noise = ctx.create_texture(&desc, Some(&bytes))?;
        Ok(Self { program: shaders.program(Shader::Nebulae), noise })
    }

    pub fn release(self, ctx: &mut dyn DrawContext) {
        ctx.delete_texture(self.noise);
    }
}

impl Effect<NebulaeParams> for NebulaeRenderer {
    fn kind(&self) -> EffectKind {
        EffectKind::Nebulae
    }

    fn render(
        &mut self,
        ctx: &mut dyn DrawContext,
        source: Target,
        destination: Target,
        p: &NebulaeParams,
    ) -> Result<Target, Error> {
        debug_assert_ne!(source, destination);
        let uniforms = [
            ("u_source", Uniform::Sampler(source_texture(source)?)),
            ("u_noise", Uniform::Sampler(self.noise)),
            ("u_noiseSize", Uniform::Float(NOISE_SIZE as f32)),
            ("u_offset", Uniform::Vec2(p.offset)),
            ("u_scale", Uniform::Float(p.scale)),
            ("u_falloff", Uniform::Float(p.falloff)),
            ("u_color", Uniform::Vec3(p.color)),
            ("u_density", Uniform::Float(p.density)),
        ];
        draw_quad(ctx, self.program, destination, &uniforms)?;
        Ok(destination)
    }
}

/* ----------------------------- stars / sun ----------------------------- */

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StarParams {
    pub core_color: Color,
    pub core_radius: f32,
    pub halo_color: Color,
    pub halo_falloff: f32,
    pub center: [f32; 2],     // in [0,1] of the drawable
    pub resolution: [f32; 2], // drawable size in pixels
    pub scale: f32,           // distance normaliser, max(width, height)
}

pub struct StarRenderer {
    program: ProgramId,
}

impl StarRenderer {
    pub fn new(shaders: &ShaderStore) -> Self {
        Self { program: shaders.program(Shader::Star) }
    }
}

impl Effect<StarParams> for StarRenderer {
    fn kind(&self) -> EffectKind {
        EffectKind::Star
    }

    fn render(
        &mut self,
        ctx: &mut dyn DrawContext,
        source: Target,
        destination: Target,
        p: &StarParams,
    ) -> Result<Target, Error> {
        debug_assert_ne!(source, destination);
        let uniforms = [
            ("u_source", Uniform::Sampler(source_texture(source)?)),
            ("u_coreColor", Uniform::Vec3(p.core_color)),
            ("u_coreRadius", Uniform::Float(p.core_radius)),
            ("u_haloColor", Uniform::Vec3(p.halo_color)),
            ("u_haloFalloff", Uniform::Float(p.halo_falloff)),
            ("u_center", Uniform::Vec2(p.center)),
            ("u_resolution", Uniform::Vec2(p.resolution)),
            ("u_scale", Uniform::Float(p.scale)),
        ];
        draw_quad(ctx, self.program, destination, &uniforms)?;
        Ok(destination)
    }
}
