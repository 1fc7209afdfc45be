// One error type for the whole crate.
// Every variant states *where* things went wrong. All of them are fatal:
// nothing in the render path catches and continues.
use crate::context::Shader;
use crate::types::{FramebufferId, ProgramId, Size, TextureId};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("window init error: {0}")]
    WindowInit(String), // Creating the window failed
    #[error("window update error: {0}")]
    WindowUpdate(String), // Presenting the screen buffer failed
    #[error("config error: {0}")]
    Config(String), // Config file or env override could not be parsed
    #[error("shader {shader:?} failed to compile/link: {reason}")]
    ShaderCompile { shader: Shader, reason: String },
    #[error("texture allocation failed at {size}: {reason}")]
    TextureAlloc { size: Size, reason: String },
    #[error("framebuffer allocation failed: {0}")]
    FramebufferAlloc(String),
    #[error("unknown texture {0:?}")]
    UnknownTexture(TextureId),
    #[error("unknown framebuffer {0:?}")]
    UnknownFramebuffer(FramebufferId),
    #[error("unknown program {0:?}")]
    UnknownProgram(ProgramId),
    #[error("render source has no texture; the screen cannot be sampled")]
    ScreenAsSource,
    #[error("draw reads texture {0:?} while writing it")]
    Aliasing(TextureId),
}
