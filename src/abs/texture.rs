//! Structs and functions for handling textures.
//!
//! The module provides the [`Texture`] struct which is a CPU representation of a GPU texture.
//! Textures are decoded with the `image` crate; the channel layout uploaded to the GPU is
//! chosen from the file extension.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use glam::UVec2;
use image::{DynamicImage, GenericImageView};

use crate::abs::Gl;
use crate::error::{GlError, TextureError};

/// Channel layout of the uploaded pixel data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PixelFormat {
    Rgb,
    Rgba,
}

impl PixelFormat {
    /// Picks the format from the file extension: `.jpg`/`.jpeg` are RGB, `.png` is RGBA.
    pub fn from_path(path: &Path) -> Result<Self, TextureError> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase());

        match extension.as_deref() {
            Some("jpg") | Some("jpeg") => Ok(PixelFormat::Rgb),
            Some("png") => Ok(PixelFormat::Rgba),
            _ => Err(TextureError::UnsupportedExtension(path.to_path_buf())),
        }
    }

    pub fn channels(self) -> u8 {
        match self {
            PixelFormat::Rgb => 3,
            PixelFormat::Rgba => 4,
        }
    }

    pub fn gl_format(self) -> u32 {
        match self {
            PixelFormat::Rgb => glow::RGB,
            PixelFormat::Rgba => glow::RGBA,
        }
    }

    fn pixels(self, image: &DynamicImage) -> Vec<u8> {
        match self {
            PixelFormat::Rgb => image.to_rgb8().into_raw(),
            PixelFormat::Rgba => image.to_rgba8().into_raw(),
        }
    }
}

/// A single `glTexParameteri` setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextureParam {
    pub name: u32,
    pub value: u32,
}

impl TextureParam {
    pub fn new(name: u32, value: u32) -> Self {
        Self { name, value }
    }

    /// Repeat wrapping with trilinear minification and linear magnification.
    pub fn repeat_linear_mipmap() -> [TextureParam; 4] {
        [
            TextureParam::new(glow::TEXTURE_WRAP_S, glow::REPEAT),
            TextureParam::new(glow::TEXTURE_WRAP_T, glow::REPEAT),
            TextureParam::new(glow::TEXTURE_MIN_FILTER, glow::LINEAR_MIPMAP_LINEAR),
            TextureParam::new(glow::TEXTURE_MAG_FILTER, glow::LINEAR),
        ]
    }
}

impl From<(u32, u32)> for TextureParam {
    fn from((name, value): (u32, u32)) -> Self {
        Self { name, value }
    }
}

/// Represents a texture stored on the GPU side.
pub struct Texture {
    gl: Arc<dyn Gl>,
    id: glow::Texture,
    target: u32,
    unit: u32,
    format: PixelFormat,
    dimensions: UVec2,
}

impl Texture {
    /// Loads the image at `path` into a new texture for texture unit `unit` (an index, not a
    /// `TEXTURE0 + n` enum).
    ///
    /// Nothing is allocated on the GPU unless the image decodes successfully.
    pub fn from_file(
        gl: &Arc<dyn Gl>,
        target: u32,
        params: &[TextureParam],
        path: impl AsRef<Path>,
        unit: u32,
    ) -> Result<Self, TextureError> {
        let path = path.as_ref();
        let format = PixelFormat::from_path(path).inspect_err(|_| {
            log::error!("Invalid file format for texture {}", path.display());
        })?;

        let image = image::open(path).map_err(|source| {
            log::error!("Failed to load texture data from {}: {}", path.display(), source);
            TextureError::Decode {
                path: PathBuf::from(path),
                source,
            }
        })?;

        let texture = Self::from_image(gl, target, params, &image, format, unit)?;
        log::info!(
            "Loaded texture {} ({}x{}, {} channels)",
            path.display(),
            texture.width(),
            texture.height(),
            format.channels()
        );
        Ok(texture)
    }

    /// Creates a new texture from the given [`image::DynamicImage`], converted to `format`.
    pub fn from_image(
        gl: &Arc<dyn Gl>,
        target: u32,
        params: &[TextureParam],
        image: &DynamicImage,
        format: PixelFormat,
        unit: u32,
    ) -> Result<Self, TextureError> {
        let (width, height) = image.dimensions();
        let dimensions = UVec2::new(width, height);
        let pixels = format.pixels(image);

        let id = gl.create_texture().map_err(|reason| {
            log::error!("Failed to create texture: {}", reason);
            GlError::Create { object: "texture", reason }
        })?;

        gl.bind_texture(target, Some(id));
        for param in params {
            gl.tex_parameter(target, param.name, param.value as i32);
        }
        gl.tex_image_2d(
            target,
            dimensions.x as i32,
            dimensions.y as i32,
            format.gl_format(),
            &pixels,
        );
        gl.generate_mipmap(target);
        gl.bind_texture(target, None);

        Ok(Self {
            gl: Arc::clone(gl),
            id,
            target,
            unit,
            format,
            dimensions,
        })
    }

    /// Activates the texture's unit and binds the texture to it.
    pub fn bind(&self) {
        self.gl.active_texture(glow::TEXTURE0 + self.unit);
        self.gl.bind_texture(self.target, Some(self.id));
    }

    /// Binds the texture to a unit other than its own.
    pub fn bind_to_unit(&self, unit: u32) {
        self.gl.active_texture(glow::TEXTURE0 + unit);
        self.gl.bind_texture(self.target, Some(self.id));
    }

    /// Returns the width of the texture.
    pub fn width(&self) -> u32 {
        self.dimensions.x
    }

    /// Returns the height of the texture.
    pub fn height(&self) -> u32 {
        self.dimensions.y
    }

    pub fn dimensions(&self) -> UVec2 {
        self.dimensions
    }

    pub fn format(&self) -> PixelFormat {
        self.format
    }

    /// Index of the texture unit used by [`bind`](Self::bind).
    pub fn unit(&self) -> u32 {
        self.unit
    }

    pub fn target(&self) -> u32 {
        self.target
    }
}

impl Drop for Texture {
    fn drop(&mut self) {
        self.gl.delete_texture(self.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::abs::recording::{Call, RecordingGl};
    use image::{Rgba, RgbaImage};

    fn setup() -> (Arc<RecordingGl>, Arc<dyn Gl>) {
        let recorder = Arc::new(RecordingGl::new());
        let gl: Arc<dyn Gl> = recorder.clone();
        (recorder, gl)
    }

    fn checkerboard() -> DynamicImage {
        DynamicImage::ImageRgba8(RgbaImage::from_fn(4, 2, |x, y| {
            if (x + y) % 2 == 0 {
                Rgba([255, 255, 255, 255])
            } else {
                Rgba([0, 0, 0, 128])
            }
        }))
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(
            PixelFormat::from_path(Path::new("textures/container.jpg")).unwrap(),
            PixelFormat::Rgb
        );
        assert_eq!(
            PixelFormat::from_path(Path::new("textures/awesomeface.png")).unwrap(),
            PixelFormat::Rgba
        );
        assert_eq!(
            PixelFormat::from_path(Path::new("WALL.JPEG")).unwrap().channels(),
            3
        );
        assert_eq!(PixelFormat::Rgba.channels(), 4);
    }

    #[test]
    fn test_unknown_extension_is_an_error() {
        for path in ["skybox.bmp", "no_extension", "archive.png.gz"] {
            let err = PixelFormat::from_path(Path::new(path)).unwrap_err();
            assert!(matches!(err, TextureError::UnsupportedExtension(_)));
        }
    }

    #[test]
    fn test_unknown_extension_allocates_nothing() {
        let (recorder, gl) = setup();
        let result = Texture::from_file(
            &gl,
            glow::TEXTURE_2D,
            &TextureParam::repeat_linear_mipmap(),
            "textures/missing.tga",
            0,
        );
        assert!(matches!(result, Err(TextureError::UnsupportedExtension(_))));
        assert!(recorder.calls().is_empty());
    }

    #[test]
    fn test_missing_file_is_a_decode_error() {
        let (recorder, gl) = setup();
        let result = Texture::from_file(
            &gl,
            glow::TEXTURE_2D,
            &[],
            "textures/definitely_not_here.png",
            0,
        );
        assert!(matches!(result, Err(TextureError::Decode { .. })));
        assert!(recorder.calls().is_empty());
    }

    #[test]
    fn test_from_image_uploads_and_generates_mipmaps() {
        let (recorder, gl) = setup();
        let params = TextureParam::repeat_linear_mipmap();
        let texture = Texture::from_image(
            &gl,
            glow::TEXTURE_2D,
            &params,
            &checkerboard(),
            PixelFormat::Rgb,
            1,
        )
        .unwrap();

        assert_eq!(texture.dimensions(), UVec2::new(4, 2));
        assert_eq!(
            recorder.count(|call| matches!(call, Call::TexParameter { .. })),
            params.len()
        );
        assert!(recorder.calls().contains(&Call::TexImage2d {
            target: glow::TEXTURE_2D,
            width: 4,
            height: 2,
            format: glow::RGB,
            len: 4 * 2 * 3,
        }));
        assert!(recorder.calls().contains(&Call::GenerateMipmap(glow::TEXTURE_2D)));
    }

    #[test]
    fn test_bind_uses_assigned_unit() {
        let (recorder, gl) = setup();
        let texture = Texture::from_image(
            &gl,
            glow::TEXTURE_2D,
            &[],
            &checkerboard(),
            PixelFormat::Rgba,
            1,
        )
        .unwrap();
        recorder.clear_calls();

        texture.bind();
        texture.bind_to_unit(texture.unit());
        assert_eq!(texture.unit(), 1);
        assert_eq!(recorder.calls()[0], Call::ActiveTexture(glow::TEXTURE1));
        assert_eq!(recorder.calls()[2], Call::ActiveTexture(glow::TEXTURE1));
    }

    #[test]
    fn test_png_file_round_trip() {
        let path = std::env::temp_dir().join(format!("threedimsim-{}.png", std::process::id()));
        checkerboard().save(&path).unwrap();

        let (recorder, gl) = setup();
        let texture =
            Texture::from_file(&gl, glow::TEXTURE_2D, &[], &path, 0).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(texture.format(), PixelFormat::Rgba);
        assert_eq!((texture.width(), texture.height()), (4, 2));
        drop(texture);
        assert_eq!(recorder.count(|call| matches!(call, Call::DeleteTexture(_))), 1);
    }

    #[test]
    fn test_jpg_file_uploads_three_channels() {
        let path = std::env::temp_dir().join(format!("threedimsim-{}.jpg", std::process::id()));
        DynamicImage::ImageRgb8(checkerboard().to_rgb8())
            .save(&path)
            .unwrap();

        let (recorder, gl) = setup();
        let texture = Texture::from_file(&gl, glow::TEXTURE_2D, &[], &path, 0).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(texture.format(), PixelFormat::Rgb);
        assert!(recorder.calls().contains(&Call::TexImage2d {
            target: glow::TEXTURE_2D,
            width: 4,
            height: 2,
            format: glow::RGB,
            len: 4 * 2 * 3,
        }));
    }

    #[test]
    fn test_params_from_tuples() {
        let param: TextureParam = (glow::TEXTURE_WRAP_S, glow::CLAMP_TO_EDGE).into();
        assert_eq!(param, TextureParam::new(glow::TEXTURE_WRAP_S, glow::CLAMP_TO_EDGE));
    }
}
