// Software rasterizer backend.
// Textures live in RAM as RGBA images; the screen is a minifb-ready
// FrameBuffer. A draw runs the program's CPU fragment function once per
// destination pixel.

use std::collections::HashMap;

use image::{Rgba, RgbaImage};

use crate::context::{DrawCall, DrawContext, Filter, PixelFormat, Shader, TextureDesc, Wrap};
use crate::error::Error;
use crate::shaders::{fragment_program, Fragment, Sampler};
use crate::types::{FrameBuffer, FramebufferId, ProgramId, Size, TextureId};

struct SoftTexture {
    desc: TextureDesc,
    image: RgbaImage,
}

impl SoftTexture {
    /// One texel with wrapping applied, channels in [0,1].
    #[inline]
    fn texel(&self, x: i64, y: i64) -> [f32; 4] {
        let (w, h) = (self.image.width() as i64, self.image.height() as i64);
        let (x, y) = match self.desc.wrap {
            Wrap::ClampToEdge => (x.clamp(0, w - 1), y.clamp(0, h - 1)),
            Wrap::Repeat => (x.rem_euclid(w), y.rem_euclid(h)),
        };
        let p = self.image.get_pixel(x as u32, y as u32).0;
        [p[0] as f32 / 255.0, p[1] as f32 / 255.0, p[2] as f32 / 255.0, p[3] as f32 / 255.0]
    }

    fn sample(&self, uv: [f32; 2]) -> [f32; 4] {
        let (w, h) = (self.image.width() as f32, self.image.height() as f32);
        match self.desc.filter {
            Filter::Nearest => self.texel((uv[0] * w).floor() as i64, (uv[1] * h).floor() as i64),
            Filter::Linear => {
                let x = uv[0] * w - 0.5;
                let y = uv[1] * h - 0.5;
                let (x0, y0) = (x.floor(), y.floor());
                let (fx, fy) = (x - x0, y - y0);
                let (x0, y0) = (x0 as i64, y0 as i64);

                let a = self.texel(x0, y0);
                let b = self.texel(x0 + 1, y0);
                let c = self.texel(x0, y0 + 1);
                let d = self.texel(x0 + 1, y0 + 1);

                let mut out = [0.0; 4];
                for i in 0..4 {
                    let top = a[i] + (b[i] - a[i]) * fx;
                    let bottom = c[i] + (d[i] - c[i]) * fx;
                    out[i] = top + (bottom - top) * fy;
                }
                out
            }
        }
    }
}

/// Textures bound for the duration of one draw.
struct Bound<'a>(Vec<(TextureId, &'a SoftTexture)>);

impl Sampler for Bound<'_> {
    fn sample(&self, texture: TextureId, uv: [f32; 2]) -> [f32; 4] {
        match self.0.iter().find(|(id, _)| *id == texture) {
            Some((_, tex)) => tex.sample(uv),
            None => [0.0, 0.0, 0.0, 1.0],
        }
    }
}

#[inline]
fn to_u8(c: f32) -> u8 {
    (c.clamp(0.0, 1.0) * 255.0).round() as u8
}

pub struct SoftContext {
    size: Size,
    screen: FrameBuffer,
    textures: HashMap<TextureId, SoftTexture>,
    framebuffers: HashMap<FramebufferId, TextureId>,
    programs: HashMap<ProgramId, Shader>,
    next_id: u32, // shared by all handle kinds, never reused
}

impl SoftContext {
    pub fn new(size: Size) -> Self {
        Self {
            size,
            screen: FrameBuffer::new(size),
            textures: HashMap::new(),
            framebuffers: HashMap::new(),
            programs: HashMap::new(),
            next_id: 1,
        }
    }

    /// The host changed the drawable size (window resize, DPI change).
    pub fn resize(&mut self, size: Size) {
        if self.size != size {
            log::debug!("drawable resized {} -> {}", self.size, size);
            self.size = size;
            self.screen.resize(size);
        }
    }

    pub fn screen(&self) -> &FrameBuffer {
        &self.screen
    }

    /// For overlays drawn after the starfield (HUD).
    pub fn screen_mut(&mut self) -> &mut FrameBuffer {
        &mut self.screen
    }

    /// Read back a texture's pixels.
    pub fn texture_image(&self, texture: TextureId) -> Option<&RgbaImage> {
        self.textures.get(&texture).map(|t| &t.image)
    }

    pub fn live_textures(&self) -> usize {
        self.textures.len()
    }

    pub fn live_framebuffers(&self) -> usize {
        self.framebuffers.len()
    }

    fn next_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn fill(&mut self, destination: Option<FramebufferId>, px: [u8; 4]) -> Result<(), Error> {
        match destination {
            None => {
                let packed = FrameBuffer::pack(px[0], px[1], px[2]);
                self.screen.pixels.fill(packed);
            }
            Some(fb) => {
                let tex = *self.framebuffers.get(&fb).ok_or(Error::UnknownFramebuffer(fb))?;
                let tex = self.textures.get_mut(&tex).ok_or(Error::UnknownTexture(tex))?;
                for p in tex.image.pixels_mut() {
                    *p = Rgba(px);
                }
            }
        }
        Ok(())
    }
}

impl DrawContext for SoftContext {
    fn drawable_size(&self) -> Size {
        self.size
    }

    fn create_texture(&mut self, desc: &TextureDesc, pixels: Option<&[u8]>) -> Result<TextureId, Error> {
        let size = desc.size;
        if size.is_empty() {
            return Err(Error::TextureAlloc { size, reason: "zero-sized texture".into() });
        }

        let image = match pixels {
            None => RgbaImage::new(size.width, size.height),
            Some(data) => {
                let expected = size.area() * desc.format.channels();
                if data.len() != expected {
                    return Err(Error::TextureAlloc {
                        size,
                        reason: format!("expected {expected} bytes, got {}", data.len()),
                    });
                }
                let rgba = match desc.format {
                    PixelFormat::Rgba8 => data.to_vec(),
                    PixelFormat::Rgb8 => data.chunks_exact(3).flat_map(|c| [c[0], c[1], c[2], 255]).collect(),
                };
                RgbaImage::from_raw(size.width, size.height, rgba).ok_or_else(|| Error::TextureAlloc {
                    size,
                    reason: "pixel buffer does not fit".into(),
                })?
            }
        };

        let id = TextureId(self.next_id());
        self.textures.insert(id, SoftTexture { desc: *desc, image });
        log::trace!("create texture {id:?} {size}");
        Ok(id)
    }

    fn delete_texture(&mut self, texture: TextureId) {
        self.textures.remove(&texture);
    }

    fn create_framebuffer(&mut self, color: TextureId) -> Result<FramebufferId, Error> {
        if !self.textures.contains_key(&color) {
            return Err(Error::FramebufferAlloc(format!("no texture {color:?} to attach")));
        }
        let id = FramebufferId(self.next_id());
        self.framebuffers.insert(id, color);
        Ok(id)
    }

    fn delete_framebuffer(&mut self, framebuffer: FramebufferId) {
        self.framebuffers.remove(&framebuffer);
    }

    fn create_program(&mut self, shader: Shader) -> Result<ProgramId, Error> {
        let id = ProgramId(self.next_id());
        self.programs.insert(id, shader);
        Ok(id)
    }

    fn clear(&mut self, destination: Option<FramebufferId>, rgba: [f32; 4]) -> Result<(), Error> {
        self.fill(destination, rgba.map(to_u8))
    }

    fn draw_fullscreen(&mut self, draw: &DrawCall<'_>) -> Result<(), Error> {
        let shader = *self.programs.get(&draw.program).ok_or(Error::UnknownProgram(draw.program))?;
        let program = fragment_program(shader);

        let dest_tex = match draw.destination {
            Some(fb) => Some(*self.framebuffers.get(&fb).ok_or(Error::UnknownFramebuffer(fb))?),
            None => None,
        };
        if let Some(dt) = dest_tex {
            if draw.samplers().any(|t| t == dt) {
                return Err(Error::Aliasing(dt));
            }
        }

        let target_size = match dest_tex {
            Some(t) => self.textures.get(&t).ok_or(Error::UnknownTexture(t))?.desc.size,
            None => self.size,
        };
        let w = draw.viewport.width.min(target_size.width);
        let h = draw.viewport.height.min(target_size.height);
        let (vw, vh) = (draw.viewport.width as f32, draw.viewport.height as f32);

        let mut bound = Vec::new();
        for t in draw.samplers() {
            bound.push((t, self.textures.get(&t).ok_or(Error::UnknownTexture(t))?));
        }
        let bound = Bound(bound);

        let mut out = Vec::with_capacity(w as usize * h as usize);
        for y in 0..h {
            for x in 0..w {
                let coord = [x as f32 + 0.5, y as f32 + 0.5];
                let frag = Fragment {
                    coord,
                    uv: [coord[0] / vw, coord[1] / vh],
                    uniforms: draw.uniforms,
                    sampler: &bound,
                };
                out.push(program(&frag).map(to_u8));
            }
        }
        drop(bound);

        match dest_tex {
            Some(t) => {
                let tex = self.textures.get_mut(&t).ok_or(Error::UnknownTexture(t))?;
                for (i, px) in out.into_iter().enumerate() {
                    let (x, y) = (i as u32 % w, i as u32 / w);
                    tex.image.put_pixel(x, y, Rgba(px));
                }
            }
            None => {
                let stride = self.screen.width;
                for (i, px) in out.into_iter().enumerate() {
                    let (x, y) = (i % w as usize, i / w as usize);
                    self.screen.pixels[y * stride + x] = FrameBuffer::pack(px[0], px[1], px[2]);
                }
            }
        }
        log::trace!("draw {shader:?} -> {:?} ({w}x{h})", draw.destination);
        Ok(())
    }
}
