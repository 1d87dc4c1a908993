use std::sync::Arc;

use pixels::{Error, Pixels, SurfaceTexture};
use winit::window::Window;

use crate::app::{Camera2D, DrawList, DrawRect, Rgba};

use super::{world_to_screen, Viewport};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ScreenRectPx {
    left: i32,
    right: i32,
    top: i32,
    bottom: i32,
}

pub struct Renderer {
    window: Arc<Window>,
    pixels: Pixels<'static>,
    viewport: Viewport,
}

impl Renderer {
    pub fn new(window: Arc<Window>) -> Result<Self, Error> {
        let size = window.inner_size();
        let pixels = Self::build_pixels(Arc::clone(&window), size.width, size.height)?;
        Ok(Self {
            window,
            pixels,
            viewport: Viewport {
                width: size.width,
                height: size.height,
            },
        })
    }

    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), Error> {
        if width == 0 || height == 0 {
            return Ok(());
        }
        self.pixels = Self::build_pixels(Arc::clone(&self.window), width, height)?;
        self.viewport = Viewport { width, height };
        Ok(())
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn build_pixels(
        window: Arc<Window>,
        width: u32,
        height: u32,
    ) -> Result<Pixels<'static>, Error> {
        let surface = SurfaceTexture::new(width, height, window);
        Pixels::new(width, height, surface)
    }

    pub(crate) fn render_draw_list(
        &mut self,
        draw_list: &DrawList,
        camera: &Camera2D,
    ) -> Result<(), Error> {
        if self.viewport.width == 0 || self.viewport.height == 0 {
            return Ok(());
        }
        let viewport = self.viewport;
        let frame = self.pixels.frame_mut();
        paint_draw_list(frame, viewport, draw_list, camera);
        self.pixels.render()
    }
}

fn paint_draw_list(frame: &mut [u8], viewport: Viewport, draw_list: &DrawList, camera: &Camera2D) {
    let clear_color = draw_list.clear_color();
    for chunk in frame.chunks_exact_mut(4) {
        chunk.copy_from_slice(&clear_color);
    }
    for rect in draw_list.rects() {
        let Some(screen) = clip_to_viewport(screen_rect(rect, camera), viewport) else {
            continue;
        };
        fill_rect(frame, viewport.width, screen, rect.color);
    }
}

fn screen_rect(rect: &DrawRect, camera: &Camera2D) -> ScreenRectPx {
    let (left, top) = world_to_screen(rect.position, camera);
    let right = left + rect.size.x.round().max(1.0) as i32;
    let bottom = top + rect.size.y.round().max(1.0) as i32;
    ScreenRectPx {
        left,
        right,
        top,
        bottom,
    }
}

/// Right and bottom edges are exclusive.
fn clip_to_viewport(rect: ScreenRectPx, viewport: Viewport) -> Option<ScreenRectPx> {
    let clipped = ScreenRectPx {
        left: rect.left.max(0),
        right: rect.right.min(viewport.width as i32),
        top: rect.top.max(0),
        bottom: rect.bottom.min(viewport.height as i32),
    };
    if clipped.left >= clipped.right || clipped.top >= clipped.bottom {
        return None;
    }
    Some(clipped)
}

fn fill_rect(frame: &mut [u8], width: u32, rect: ScreenRectPx, color: Rgba) {
    let stride = width as usize * 4;
    for y in rect.top..rect.bottom {
        let row_start = y as usize * stride;
        let start = row_start + rect.left as usize * 4;
        let end = row_start + rect.right as usize * 4;
        let Some(row) = frame.get_mut(start..end) else {
            return;
        };
        for pixel in row.chunks_exact_mut(4) {
            pixel.copy_from_slice(&color);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::Vec2;

    const RED: Rgba = [255, 0, 0, 255];
    const BLUE: Rgba = [0, 0, 255, 255];

    fn pixel_at(frame: &[u8], width: u32, x: u32, y: u32) -> Rgba {
        let offset = ((y * width + x) * 4) as usize;
        let mut pixel = [0; 4];
        pixel.copy_from_slice(&frame[offset..offset + 4]);
        pixel
    }

    #[test]
    fn renderer_type_is_non_generic() {
        let _renderer: Option<Renderer> = None;
    }

    #[test]
    fn clipping_discards_offscreen_rects() {
        let viewport = Viewport {
            width: 10,
            height: 10,
        };
        let offscreen = ScreenRectPx {
            left: 12,
            right: 20,
            top: 0,
            bottom: 4,
        };
        assert_eq!(clip_to_viewport(offscreen, viewport), None);

        let partial = ScreenRectPx {
            left: -3,
            right: 4,
            top: 8,
            bottom: 14,
        };
        assert_eq!(
            clip_to_viewport(partial, viewport),
            Some(ScreenRectPx {
                left: 0,
                right: 4,
                top: 8,
                bottom: 10,
            })
        );
    }

    #[test]
    fn draw_list_paints_clear_color_then_rects_in_order() {
        let viewport = Viewport {
            width: 8,
            height: 8,
        };
        let mut frame = vec![0; 8 * 8 * 4];
        let mut draw_list = DrawList::default();
        draw_list.set_clear_color(BLUE);
        draw_list.push_rect(12.0, 2.0, 2.0, 2.0, RED);
        draw_list.push_rect(13.0, 3.0, 2.0, 2.0, [0, 255, 0, 255]);
        let camera = Camera2D {
            position: Vec2 { x: 10.0, y: 0.0 },
        };

        paint_draw_list(&mut frame, viewport, &draw_list, &camera);

        assert_eq!(pixel_at(&frame, 8, 0, 0), BLUE);
        assert_eq!(pixel_at(&frame, 8, 2, 2), RED);
        assert_eq!(pixel_at(&frame, 8, 3, 3), [0, 255, 0, 255]);
        assert_eq!(pixel_at(&frame, 8, 4, 4), [0, 255, 0, 255]);
        assert_eq!(pixel_at(&frame, 8, 5, 5), BLUE);
    }

    #[test]
    fn thin_rects_cover_at_least_one_pixel() {
        let rect = DrawRect {
            position: Vec2 { x: 3.0, y: 3.0 },
            size: Vec2 { x: 0.2, y: 0.2 },
            color: RED,
        };
        let screen = screen_rect(&rect, &Camera2D::default());
        assert_eq!((screen.right - screen.left, screen.bottom - screen.top), (1, 1));
    }
}
