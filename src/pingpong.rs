// Double-buffered offscreen targets and the pass scheduler that
// alternates between them.

use crate::context::{DrawContext, TextureDesc};
use crate::error::Error;
use crate::types::{Size, Target};

/// Apply `pass` `count` times, reading from one buffer and writing the other.
///
/// The first pass reads `initial`. If `initial` is `alpha`, the roles of
/// `alpha` and `beta` swap so the first write never lands on the source.
/// After the (possible) swap, an odd `count` ends on `alpha` and an even
/// one on `beta`. `count == 0` returns `initial` without calling `pass`.
pub fn pingpong<T, E, F>(initial: T, alpha: T, beta: T, count: usize, mut pass: F) -> Result<T, E>
where
    T: PartialEq + Copy + std::fmt::Debug,
    F: FnMut(T, T) -> Result<(), E>,
{
    debug_assert_ne!(alpha, beta, "pingpong needs two distinct buffers");
    if count == 0 {
        return Ok(initial);
    }

    let (alpha, beta) = if initial == alpha { (beta, alpha) } else { (alpha, beta) };

    pass(initial, alpha)?;
    let mut done = 1;
    if done == count {
        return Ok(alpha);
    }

    loop {
        pass(alpha, beta)?;
        done += 1;
        if done == count {
            return Ok(beta);
        }
        pass(beta, alpha)?;
        done += 1;
        if done == count {
            return Ok(alpha);
        }
    }
}

/// Two same-sized offscreen color targets, owned by exactly one renderer.
#[derive(Debug)]
pub struct PingPong {
    ping: Target,
    pong: Target,
    size: Size,
}

fn create_target(ctx: &mut dyn DrawContext, size: Size) -> Result<Target, Error> {
    let texture = ctx.create_texture(&TextureDesc::render_target(size), None)?;
    match ctx.create_framebuffer(texture) {
        Ok(framebuffer) => Ok(Target::offscreen(framebuffer, texture)),
        Err(e) => {
            ctx.delete_texture(texture);
            Err(e)
        }
    }
}

fn release_target(ctx: &mut dyn DrawContext, target: Target) {
    if let Some(fb) = target.framebuffer {
        ctx.delete_framebuffer(fb);
    }
    if let Some(tex) = target.texture {
        ctx.delete_texture(tex);
    }
}

impl PingPong {
    /// Allocate both targets at `size` (RGBA8, linear, clamp-to-edge).
    pub fn allocate(ctx: &mut dyn DrawContext, size: Size) -> Result<Self, Error> {
        let ping = create_target(ctx, size)?;
        let pong = match create_target(ctx, size) {
            Ok(pong) => pong,
            Err(e) => {
                release_target(ctx, ping);
                return Err(e);
            }
        };
        log::debug!("ping/pong allocated at {size}: {ping:?} {pong:?}");
        Ok(Self { ping, pong, size })
    }

    /// Free both targets. The pair is unusable afterwards.
    pub fn release(self, ctx: &mut dyn DrawContext) {
        release_target(ctx, self.ping);
        release_target(ctx, self.pong);
    }

    /// Hand back the same pair if `size` matches, otherwise release it and
    /// allocate a new one. Old contents are gone on a change; callers must
    /// redraw. On failure the old pair is already freed and nothing survives.
    pub fn reset_on_size_change(self, ctx: &mut dyn DrawContext, size: Size) -> Result<Self, Error> {
        if self.size == size {
            return Ok(self);
        }
        self.release(ctx);
        Self::allocate(ctx, size)
    }

    pub fn ping(&self) -> Target {
        self.ping
    }

    pub fn pong(&self) -> Target {
        self.pong
    }

    pub fn size(&self) -> Size {
        self.size
    }

    /// Whichever of the pair is not `target`.
    pub fn other(&self, target: Target) -> Target {
        if target == self.ping { self.pong } else { self.ping }
    }
}
