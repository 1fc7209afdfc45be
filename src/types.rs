// Core value types shared by the context, the effects and the composer.

use std::fmt;

/// Pixel dimensions of a drawable surface or texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn area(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Longest edge; effects normalise feature sizes by this.
    pub fn max_dim(&self) -> u32 {
        self.width.max(self.height)
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TextureId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FramebufferId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProgramId(pub u32);

/// A render target: a framebuffer plus the color texture attached to it.
/// Both `None` means the on-screen surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Target {
    pub framebuffer: Option<FramebufferId>,
    pub texture: Option<TextureId>,
}

impl Target {
    pub const SCREEN: Target = Target { framebuffer: None, texture: None };

    pub fn offscreen(framebuffer: FramebufferId, texture: TextureId) -> Self {
        Self { framebuffer: Some(framebuffer), texture: Some(texture) }
    }
}

pub type Rgb = [f32; 3];

/// The visible surface, in the layout minifb wants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameBuffer {
    pub width: usize,      // how wide the window surface is (pixels)
    pub height: usize,     // how tall the window surface is (pixels)
    pub pixels: Vec<u32>,  // each entry is 0x00RRGGBB for minifb
}

impl FrameBuffer {
    pub fn new(size: Size) -> Self {
        Self {
            width: size.width as usize,
            height: size.height as usize,
            pixels: vec![0u32; size.area()],
        }
    }

    pub fn size(&self) -> Size {
        Size::new(self.width as u32, self.height as u32)
    }

    /// Reallocate to `size`, dropping old contents. No-op if unchanged.
    pub fn resize(&mut self, size: Size) {
        if self.size() == size {
            return;
        }
        *self = Self::new(size);
    }

    #[inline]
    pub fn pack(r: u8, g: u8, b: u8) -> u32 {
        ((r as u32) << 16) | ((g as u32) << 8) | b as u32
    }
}
