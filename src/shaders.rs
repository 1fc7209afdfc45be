// Shader programs: the store that compiles them once, and the CPU fragment
// functions the software backend runs for each of them.
//
// The fragment math is art, not contract: only the uniform names matter to
// the effects that feed them.

use crate::context::{DrawContext, Shader, Uniform};
use crate::error::Error;
use crate::types::{ProgramId, TextureId};

/// Compiled programs for every [`Shader`], built once at start-up.
pub struct ShaderStore {
    copy: ProgramId,
    nebulae: ProgramId,
    star: ProgramId,
}

impl ShaderStore {
    /// Compile and link everything. Any failure aborts construction.
    pub fn new(ctx: &mut dyn DrawContext) -> Result<Self, Error> {
        let copy = ctx.create_program(Shader::Copy)?;
        let nebulae = ctx.create_program(Shader::Nebulae)?;
        let star = ctx.create_program(Shader::Star)?;
        log::debug!("shader store ready: copy={copy:?} nebulae={nebulae:?} star={star:?}");
        Ok(Self { copy, nebulae, star })
    }

    pub fn program(&self, shader: Shader) -> ProgramId {
        match shader {
            Shader::Copy => self.copy,
            Shader::Nebulae => self.nebulae,
            Shader::Star => self.star,
        }
    }
}

/* ---------- CPU fragment programs ---------- */

/// Texture lookup as seen from inside a fragment program.
pub trait Sampler {
    fn sample(&self, texture: TextureId, uv: [f32; 2]) -> [f32; 4];
}

/// Inputs for one fragment: pixel-center coordinate, normalised uv, uniforms.
pub struct Fragment<'a> {
    pub coord: [f32; 2],
    pub uv: [f32; 2],
    pub uniforms: &'a [(&'static str, Uniform)],
    pub sampler: &'a dyn Sampler,
}

impl Fragment<'_> {
    fn get(&self, name: &str) -> Option<Uniform> {
        self.uniforms.iter().find(|(n, _)| *n == name).map(|(_, u)| *u)
    }

    // Unset uniforms read as zero.
    pub fn float(&self, name: &str) -> f32 {
        match self.get(name) {
            Some(Uniform::Float(v)) => v,
            _ => 0.0,
        }
    }

    pub fn vec2(&self, name: &str) -> [f32; 2] {
        match self.get(name) {
            Some(Uniform::Vec2(v)) => v,
            _ => [0.0; 2],
        }
    }

    pub fn vec3(&self, name: &str) -> [f32; 3] {
        match self.get(name) {
            Some(Uniform::Vec3(v)) => v,
            _ => [0.0; 3],
        }
    }

    pub fn texture(&self, name: &str, uv: [f32; 2]) -> [f32; 4] {
        match self.get(name) {
            Some(Uniform::Sampler(t)) => self.sampler.sample(t, uv),
            _ => [0.0, 0.0, 0.0, 1.0],
        }
    }
}

pub type FragmentFn = fn(&Fragment<'_>) -> [f32; 4];

pub fn fragment_program(shader: Shader) -> FragmentFn {
    match shader {
        Shader::Copy => copy,
        Shader::Nebulae => nebulae,
        Shader::Star => star,
    }
}

fn copy(f: &Fragment<'_>) -> [f32; 4] {
    f.texture("u_source", f.uv)
}

const NEBULA_OCTAVES: usize = 5;
const NEBULA_BASE_FREQ: f32 = 8.0;
const NEBULA_GAIN: f32 = 4.0;

/// Value-noise fbm; the noise texture is sampled bilinearly with wrapping.
fn fbm(f: &Fragment<'_>, p: [f32; 2], noise_size: f32) -> f32 {
    let (mut sum, mut norm) = (0.0, 0.0);
    let (mut amp, mut freq) = (0.5, NEBULA_BASE_FREQ);
    for _ in 0..NEBULA_OCTAVES {
        let uv = [p[0] * freq / noise_size, p[1] * freq / noise_size];
        sum += f.texture("u_noise", uv)[0] * amp;
        norm += amp;
        amp *= 0.5;
        freq *= 2.0;
    }
    sum / norm
}

fn nebulae(f: &Fragment<'_>) -> [f32; 4] {
    let src = f.texture("u_source", f.uv);
    let offset = f.vec2("u_offset");
    let scale = f.float("u_scale");
    let noise_size = f.float("u_noiseSize").max(1.0);

    let p = [(f.coord[0] + offset[0]) * scale, (f.coord[1] + offset[1]) * scale];
    let n = fbm(f, p, noise_size);
    let cloud = n.powf(f.float("u_falloff")) * f.float("u_density") * NEBULA_GAIN;

    let color = f.vec3("u_color");
    [src[0] + color[0] * cloud, src[1] + color[1] * cloud, src[2] + color[2] * cloud, 1.0]
}

fn star(f: &Fragment<'_>) -> [f32; 4] {
    let src = f.texture("u_source", f.uv);
    let res = f.vec2("u_resolution");
    let center = f.vec2("u_center");
    let scale = f.float("u_scale").max(1.0);

    let dx = f.coord[0] - center[0] * res[0];
    let dy = f.coord[1] - center[1] * res[1];
    let d = (dx * dx + dy * dy).sqrt() / scale;

    let radius = f.float("u_coreRadius");
    let core = if radius > 0.0 {
        let t = (1.0 - d / radius).clamp(0.0, 1.0);
        t * t * (3.0 - 2.0 * t) // smoothstep
    } else {
        0.0
    };
    let halo = (-d * f.float("u_haloFalloff")).exp();

    let cc = f.vec3("u_coreColor");
    let hc = f.vec3("u_haloColor");
    [
        src[0] + cc[0] * core + hc[0] * halo,
        src[1] + cc[1] * core + hc[1] * halo,
        src[2] + cc[2] * core + hc[2] * halo,
        1.0,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Flat(f32);

    impl Sampler for Flat {
        fn sample(&self, _texture: TextureId, _uv: [f32; 2]) -> [f32; 4] {
            [self.0, self.0, self.0, 1.0]
        }
    }

    fn run(shader: Shader, coord: [f32; 2], uniforms: &[(&'static str, Uniform)], src: f32) -> [f32; 4] {
        let sampler = Flat(src);
        let frag = Fragment { coord, uv: [0.5, 0.5], uniforms, sampler: &sampler };
        fragment_program(shader)(&frag)
    }

    #[test]
    fn copy_returns_source_texel() {
        let out = run(Shader::Copy, [0.5, 0.5], &[("u_source", Uniform::Sampler(TextureId(1)))], 0.25);
        assert_eq!(out, [0.25, 0.25, 0.25, 1.0]);
    }

    #[test]
    fn star_is_brightest_at_its_center() {
        let uniforms = [
            ("u_source", Uniform::Sampler(TextureId(1))),
            ("u_coreColor", Uniform::Vec3([1.0, 1.0, 1.0])),
            ("u_coreRadius", Uniform::Float(0.05)),
            ("u_haloColor", Uniform::Vec3([0.5, 0.2, 0.1])),
            ("u_haloFalloff", Uniform::Float(32.0)),
            ("u_center", Uniform::Vec2([0.5, 0.5])),
            ("u_resolution", Uniform::Vec2([100.0, 100.0])),
            ("u_scale", Uniform::Float(100.0)),
        ];
        let at_center = run(Shader::Star, [50.0, 50.0], &uniforms, 0.0);
        let far_away = run(Shader::Star, [0.0, 0.0], &uniforms, 0.0);
        assert!(at_center[0] > far_away[0]);
        assert!(at_center[0] >= 1.0);
    }

    #[test]
    fn zero_density_nebula_leaves_source_alone() {
        let uniforms = [
            ("u_source", Uniform::Sampler(TextureId(1))),
            ("u_noise", Uniform::Sampler(TextureId(2))),
            ("u_noiseSize", Uniform::Float(256.0)),
            ("u_scale", Uniform::Float(0.001)),
            ("u_falloff", Uniform::Float(2.0)),
            ("u_color", Uniform::Vec3([1.0, 0.0, 0.0])),
            ("u_density", Uniform::Float(0.0)),
        ];
        let out = run(Shader::Nebulae, [10.0, 10.0], &uniforms, 0.3);
        assert_eq!(out, [0.3, 0.3, 0.3, 1.0]);
    }
}
