// The starfield composer.
//
// Builds the backdrop once per drawable size from a fixed chain of passes,
// point stars, then `nebulae_count` nebula layers, then `star_count` halo
// stars, then one sun, and blits the cached result every frame.

use std::rc::Rc;

use crate::context::DrawContext;
use crate::error::Error;
use crate::fx::{
    Effect, NebulaeParams, NebulaeRenderer, PointStarOptions, PointStarRenderer, StarParams, StarRenderer,
    TextureRenderer,
};
use crate::pingpong::{pingpong, PingPong};
use crate::random::{Random, SharedRandom};
use crate::shaders::ShaderStore;
use crate::types::{Size, Target, TextureId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheState {
    /// No cached image, or it was built for a different drawable size.
    Stale,
    Fresh,
}

/* ---------- per-pass parameters, drawn in field order ---------- */

fn rgb(rng: &mut Random) -> [f32; 3] {
    [rng.random() as f32, rng.random() as f32, rng.random() as f32]
}

pub fn point_star_options(rng: &mut Random) -> PointStarOptions {
    let brightness = rng.random() * 0.2 + 0.125;
    let density = rng.random() * 0.1 + 0.005;
    PointStarOptions { brightness, density }
}

/// `scale` is `max(width, height)`: feature size stays constant in screen space.
pub fn nebula_params(rng: &mut Random, scale: f32) -> NebulaeParams {
    let offset = [rng.random() as f32 * 500.0, rng.random() as f32 * 500.0];
    let scale = (rng.random() as f32 * 0.4 + 0.1) / scale;
    let falloff = rng.random() as f32 * 6.0 + 0.5;
    let color = rgb(rng);
    let density = rng.random() as f32 * 0.25;
    NebulaeParams { offset, scale, falloff, color, density }
}

pub fn halo_params(rng: &mut Random, size: Size) -> StarParams {
    let core_radius = rng.random() as f32 * 0.01 + 0.001;
    let halo_color = rgb(rng);
    let halo_falloff = rng.random() as f32 * 512.0 + 16.0;
    let center = [rng.random() as f32, rng.random() as f32];
    StarParams {
        core_color: [1.0, 1.0, 1.0],
        core_radius,
        halo_color,
        halo_falloff,
        center,
        resolution: [size.width as f32, size.height as f32],
        scale: size.max_dim() as f32,
    }
}

/// The sun: a much larger core and a wide, slow halo.
pub fn sun_params(rng: &mut Random, size: Size) -> StarParams {
    let core_radius = rng.random() as f32 * 0.25 + 0.0125;
    let halo_color = rgb(rng);
    let halo_falloff = rng.random() as f32 * 32.0 + 8.0;
    let center = [rng.random() as f32, rng.random() as f32];
    StarParams {
        core_color: [1.0, 1.0, 1.0],
        core_radius,
        halo_color,
        halo_falloff,
        center,
        resolution: [size.width as f32, size.height as f32],
        scale: size.max_dim() as f32,
    }
}

pub struct Starfield {
    size: Size, // what `result` was built for
    buffers: Option<PingPong>,
    result: Option<TextureId>,
    nebulae_count: usize,
    star_count: usize,
    copy: TextureRenderer,
    point_stars: PointStarRenderer,
    nebulae: NebulaeRenderer,
    stars: StarRenderer,
    rng: SharedRandom,
    regenerations: u64,
}

impl Starfield {
    /// Build the effects (noise texture included). Nothing is drawn until
    /// the first [`Starfield::render`].
    pub fn new(
        ctx: &mut dyn DrawContext,
        shaders: &ShaderStore,
        nebulae_count: usize,
        star_count: usize,
        rng: SharedRandom,
    ) -> Result<Self, Error> {
        let (options, star_stream, mut noise_stream) = {
            let mut r = rng.borrow_mut();
            (point_star_options(&mut r), r.derive("pointstars"), r.derive("noise"))
        };
        let nebulae = NebulaeRenderer::new(ctx, shaders, &mut noise_stream)?;
        log::debug!("starfield: {nebulae_count} nebulae, {star_count} stars, {options:?}");

        Ok(Self {
            size: Size::default(),
            buffers: None,
            result: None,
            nebulae_count,
            star_count,
            copy: TextureRenderer::new(shaders),
            point_stars: PointStarRenderer::new(shaders, options, star_stream),
            nebulae,
            stars: StarRenderer::new(shaders),
            rng,
            regenerations: 0,
        })
    }

    pub fn state(&self, ctx: &dyn DrawContext) -> CacheState {
        match self.result {
            Some(_) if self.size == ctx.drawable_size() => CacheState::Fresh,
            _ => CacheState::Stale,
        }
    }

    /// The cached composite, if one has been built.
    pub fn result_texture(&self) -> Option<TextureId> {
        self.result
    }

    pub fn regenerations(&self) -> u64 {
        self.regenerations
    }

    pub fn nebulae_count(&self) -> usize {
        self.nebulae_count
    }

    pub fn star_count(&self) -> usize {
        self.star_count
    }

    /// Regenerate if the drawable size changed, then blit the cached image
    /// into `destination`. `_source` is ignored: the starfield makes its own
    /// content. The blit runs every frame.
    pub fn render(&mut self, ctx: &mut dyn DrawContext, _source: Target, destination: Target) -> Result<Target, Error> {
        let size = ctx.drawable_size();
        let texture = match self.result {
            Some(t) if self.size == size => t,
            _ => self.regenerate(ctx, size)?,
        };
        self.copy.copy(ctx, texture, destination)
    }

    fn regenerate(&mut self, ctx: &mut dyn DrawContext, size: Size) -> Result<TextureId, Error> {
        log::info!(
            "regenerating starfield at {size} (was {}): {} nebulae, {} stars",
            self.size,
            self.nebulae_count,
            self.star_count
        );
        self.result = None;

        let pair = match self.buffers.take() {
            Some(pair) => pair.reset_on_size_change(ctx, size)?,
            None => PingPong::allocate(ctx, size)?,
        };
        let (ping, pong) = (pair.ping(), pair.pong());
        self.buffers = Some(pair);

        let scale = size.max_dim() as f32;
        let rng = Rc::clone(&self.rng);

        self.point_stars.render(ctx, ping)?;
        log::debug!("{:?} -> {ping:?}", self.point_stars.kind());

        let nebulae = &mut self.nebulae;
        let nebulae_out = pingpong(ping, ping, pong, self.nebulae_count, |src, dst| {
            let params = nebula_params(&mut rng.borrow_mut(), scale);
            log::debug!("{:?} {src:?} -> {dst:?}", nebulae.kind());
            nebulae.render(ctx, src, dst, &params).map(drop)
        })?;

        let stars = &mut self.stars;
        let star_out = pingpong(nebulae_out, ping, pong, self.star_count, |src, dst| {
            let params = halo_params(&mut rng.borrow_mut(), size);
            log::debug!("{:?} {src:?} -> {dst:?}", stars.kind());
            stars.render(ctx, src, dst, &params).map(drop)
        })?;

        let sun_dst = if star_out == ping { pong } else { ping };
        let sun = sun_params(&mut rng.borrow_mut(), size);
        let out = self.stars.render(ctx, star_out, sun_dst, &sun)?;
        let texture = out.texture.ok_or(Error::ScreenAsSource)?;

        self.size = size;
        self.result = Some(texture);
        self.regenerations += 1;
        Ok(texture)
    }

    /// Free every GPU resource this starfield owns. Build a new one to draw again.
    pub fn release(mut self, ctx: &mut dyn DrawContext) {
        if let Some(pair) = self.buffers.take() {
            pair.release(ctx);
        }
        self.point_stars.release(ctx);
        self.nebulae.release(ctx);
    }
}
