// What you SEE:
// • A starfield backdrop: point stars, colored nebula fog, halo stars, one sun.
// • Resize the window: the backdrop is rebuilt for the new size (same seed, same look per size).
// • R picks a new seed (new sky). H toggles the HUD. ESC quits.

use std::time::{Instant, SystemTime, UNIX_EPOCH};

use anyhow::Context;
use log::info;

use starfield::config::Config;
use starfield::draw::{draw_text_5x7, Drawer};
use starfield::shaders::ShaderStore;
use starfield::stats::{FpsCounter, FrameObserver};
use starfield::{DrawContext, Random, SharedRandom, SoftContext, Starfield, Target};

/// A seed for runs without one configured. The only wall-clock entropy in
/// the program; everything downstream is derived from the seed string.
fn fresh_seed() -> String {
    let nanos = SystemTime::now().duration_since(UNIX_EPOCH).map(|d| d.subsec_nanos()).unwrap_or(0);
    format!("404{}", nanos % 404)
}

/// One seeded sky: the shared random source plus the composer drawing from it.
struct Sky {
    rng: SharedRandom,
    starfield: Starfield,
}

impl Sky {
    fn new(ctx: &mut dyn DrawContext, shaders: &ShaderStore, config: &Config, seed: &str) -> anyhow::Result<Self> {
        let rng = Random::shared(seed);
        let (nebulae, stars) = {
            let mut r = rng.borrow_mut();
            let nebulae = config.nebulae_count.map(i64::from).unwrap_or_else(|| r.rand_int(2, 5));
            let stars = config.star_count.map(i64::from).unwrap_or_else(|| r.rand_int(5, 30));
            (nebulae as usize, stars as usize)
        };
        let starfield = Starfield::new(ctx, shaders, nebulae, stars, rng.clone()).context("building starfield")?;
        rng.borrow_mut().reset();
        info!("seed {:?}: {nebulae} nebulae, {stars} stars", rng.borrow().seed());
        Ok(Self { rng, starfield })
    }

    fn hud(&self, fps: &str) -> String {
        format!(
            "SEED {} | NEBULAE {} | STARS {} | {}",
            self.rng.borrow().seed(),
            self.starfield.nebulae_count(),
            self.starfield.star_count(),
            fps
        )
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_micros()
        .init();

    let config = Config::load().context("loading configuration")?;
    info!("configuration: {config:?}");

    /* --- Window + drawing context ---
       The context starts at 0x0 so the first frame counts as a resize. */
    let mut drawer = Drawer::new(&config.window.title, config.window.width, config.window.height)?;
    let mut ctx = SoftContext::new(Default::default());
    let shaders = ShaderStore::new(&mut ctx).context("compiling shaders")?;

    let seed = config.seed.clone().unwrap_or_else(fresh_seed);
    let mut sky = Sky::new(&mut ctx, &shaders, &config, &seed)?;

    let mut fps = FpsCounter::new();
    let mut show_hud = config.show_hud;

    /* ------------------------------ Main loop ------------------------------ */
    while drawer.is_open() && !drawer.esc_pressed() {
        let size = drawer.size();
        if size.is_empty() {
            // minimised: nothing to draw into
            drawer.idle();
            continue;
        }

        /* 1) Drawable size changed: rewind the seed so the rebuilt sky
              depends only on seed and size. */
        if size != ctx.drawable_size() {
            ctx.resize(size);
            sky.rng.borrow_mut().reset();
        }

        /* 2) Inputs */
        if drawer.r_pressed_once() {
            let next = Sky::new(&mut ctx, &shaders, &config, &fresh_seed())?;
            std::mem::replace(&mut sky, next).starfield.release(&mut ctx);
        }
        if drawer.h_pressed_once() {
            show_hud = !show_hud;
        }

        /* 3) Starfield: rebuilds only if stale, blits every frame. */
        sky.starfield
            .render(&mut ctx, Target::SCREEN, Target::SCREEN)
            .context("rendering starfield")?;

        /* 4) HUD on top, then present. */
        if show_hud {
            let hud = sky.hud(fps.summary());
            draw_text_5x7(ctx.screen_mut(), 8, 8, &hud, 0x00_FF_FF_FF);
        }
        drawer.present(ctx.screen())?;
        fps.frame(Instant::now());
    }

    sky.starfield.release(&mut ctx);
    Ok(())
}
