// Shared helpers for the integration tests.
#![allow(dead_code)]

use std::collections::HashMap;

use starfield::context::{DrawCall, DrawContext, Shader, TextureDesc, Uniform};
use starfield::shaders::ShaderStore;
use starfield::types::{FramebufferId, ProgramId, Size, TextureId};
use starfield::{Error, Random, SharedRandom, SoftContext, Starfield};

/// One recorded full-screen draw.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub shader: Shader,
    pub destination: Option<FramebufferId>,
    pub uniforms: Vec<(&'static str, Uniform)>,
}

impl Recorded {
    pub fn float(&self, name: &str) -> Option<f32> {
        self.uniforms.iter().find_map(|(n, u)| match u {
            Uniform::Float(v) if *n == name => Some(*v),
            _ => None,
        })
    }
}

/// Wraps the software context and records what the starfield asks of it.
pub struct Probe {
    pub inner: SoftContext,
    programs: HashMap<ProgramId, Shader>,
    pub draws: Vec<Recorded>,
    pub textures_created: usize,
    fail_compile: Option<Shader>,
}

impl Probe {
    pub fn new(size: Size) -> Self {
        Self {
            inner: SoftContext::new(size),
            programs: HashMap::new(),
            draws: Vec::new(),
            textures_created: 0,
            fail_compile: None,
        }
    }

    /// A context whose driver rejects `shader`.
    pub fn failing(size: Size, shader: Shader) -> Self {
        Self { fail_compile: Some(shader), ..Self::new(size) }
    }

    pub fn count(&self, shader: Shader) -> usize {
        self.draws.iter().filter(|d| d.shader == shader).count()
    }

    pub fn of(&self, shader: Shader) -> impl Iterator<Item = &Recorded> {
        self.draws.iter().filter(move |d| d.shader == shader)
    }

    /// Forget what has been recorded so far.
    pub fn reset_counts(&mut self) {
        self.draws.clear();
        self.textures_created = 0;
    }
}

impl DrawContext for Probe {
    fn drawable_size(&self) -> Size {
        self.inner.drawable_size()
    }

    fn create_texture(&mut self, desc: &TextureDesc, pixels: Option<&[u8]>) -> Result<TextureId, Error> {
        self.textures_created += 1;
        self.inner.create_texture(desc, pixels)
    }

    fn delete_texture(&mut self, texture: TextureId) {
        self.inner.delete_texture(texture)
    }

    fn create_framebuffer(&mut self, color: TextureId) -> Result<FramebufferId, Error> {
        self.inner.create_framebuffer(color)
    }

    fn delete_framebuffer(&mut self, framebuffer: FramebufferId) {
        self.inner.delete_framebuffer(framebuffer)
    }

    fn create_program(&mut self, shader: Shader) -> Result<ProgramId, Error> {
        if self.fail_compile == Some(shader) {
            return Err(Error::ShaderCompile { shader, reason: "rejected by probe".into() });
        }
        let id = self.inner.create_program(shader)?;
        self.programs.insert(id, shader);
        Ok(id)
    }

    fn clear(&mut self, destination: Option<FramebufferId>, rgba: [f32; 4]) -> Result<(), Error> {
        self.inner.clear(destination, rgba)
    }

    fn draw_fullscreen(&mut self, draw: &DrawCall<'_>) -> Result<(), Error> {
        let shader = *self.programs.get(&draw.program).ok_or(Error::UnknownProgram(draw.program))?;
        self.draws.push(Recorded { shader, destination: draw.destination, uniforms: draw.uniforms.to_vec() });
        self.inner.draw_fullscreen(draw)
    }
}

/// A probe context plus a starfield built on it from `seed`.
pub fn starfield(size: Size, nebulae: usize, stars: usize, seed: &str) -> (Probe, SharedRandom, Starfield) {
    let mut probe = Probe::new(size);
    let shaders = ShaderStore::new(&mut probe).expect("shaders compile");
    let rng = Random::shared(seed);
    let sf = Starfield::new(&mut probe, &shaders, nebulae, stars, rng.clone()).expect("starfield builds");
    (probe, rng, sf)
}
