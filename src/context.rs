// The drawing capability the starfield needs from a backend.
//
// Anything that can create textures and framebuffers and run a full-screen
// fragment program over a target can host the starfield. `crate::soft`
// is the CPU implementation shipped with the crate.

use crate::error::Error;
use crate::types::{FramebufferId, ProgramId, Size, TextureId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    Rgb8,
    Rgba8,
}

impl PixelFormat {
    pub fn channels(self) -> usize {
        match self {
            PixelFormat::Rgb8 => 3,
            PixelFormat::Rgba8 => 4,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Filter {
    Nearest,
    Linear,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wrap {
    ClampToEdge,
    Repeat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextureDesc {
    pub size: Size,
    pub format: PixelFormat,
    pub filter: Filter,
    pub wrap: Wrap,
}

impl TextureDesc {
    /// What every ping/pong color attachment looks like.
    pub fn render_target(size: Size) -> Self {
        Self { size, format: PixelFormat::Rgba8, filter: Filter::Linear, wrap: Wrap::ClampToEdge }
    }
}

/// The closed set of shader programs the starfield uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shader {
    Copy,
    Nebulae,
    Star,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Uniform {
    Float(f32),
    Vec2([f32; 2]),
    Vec3([f32; 3]),
    Sampler(TextureId),
}

/// One full-screen quad draw.
#[derive(Debug, Clone, Copy)]
pub struct DrawCall<'a> {
    pub program: ProgramId,
    /// `None` draws to the screen.
    pub destination: Option<FramebufferId>,
    pub viewport: Size,
    pub uniforms: &'a [(&'static str, Uniform)],
}

impl DrawCall<'_> {
    pub fn samplers(&self) -> impl Iterator<Item = TextureId> + '_ {
        self.uniforms.iter().filter_map(|(_, u)| match u {
            Uniform::Sampler(t) => Some(*t),
            _ => None,
        })
    }
}

pub trait DrawContext {
    /// Current pixel size of the surface being rendered into.
    fn drawable_size(&self) -> Size;

    fn create_texture(&mut self, desc: &TextureDesc, pixels: Option<&[u8]>) -> Result<TextureId, Error>;
    fn delete_texture(&mut self, texture: TextureId);

    /// Attach `color` as the single color attachment of a new framebuffer.
    fn create_framebuffer(&mut self, color: TextureId) -> Result<FramebufferId, Error>;
    fn delete_framebuffer(&mut self, framebuffer: FramebufferId);

    /// Compile and link. Failure is fatal to whoever asked.
    fn create_program(&mut self, shader: Shader) -> Result<ProgramId, Error>;

    fn clear(&mut self, destination: Option<FramebufferId>, rgba: [f32; 4]) -> Result<(), Error>;

    /// Bind destination, samplers and viewport, then run the program over every pixel.
    fn draw_fullscreen(&mut self, draw: &DrawCall<'_>) -> Result<(), Error>;
}
