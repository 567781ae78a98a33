//! Desktop host: shows a clock in a winit window through a `pixels` frame buffer.

use std::sync::Arc;
use std::time::Instant;

use log::{debug, error, warn};
use pixels::{Pixels, SurfaceTexture};
use winit::dpi::LogicalSize;
use winit::event::{Event, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::window::{Window, WindowBuilder};

use crate::clock::ClockRenderer;
use crate::config::{ClockConfig, Color, WindowConfig};
use crate::error::{Error, Result};
use crate::geometry::Geometry;
use crate::raster::{FontBook, PixelSurface};
use crate::surface::Mount;

/// Mounts a clock into a window's pixel buffer.
pub struct WindowMount {
    window: Arc<Window>,
    pixels: Pixels<'static>,
    background: Color,
    fonts: Arc<FontBook>,
}

impl WindowMount {
    pub fn new(
        window: Arc<Window>,
        pixels: Pixels<'static>,
        background: Color,
        fonts: FontBook,
    ) -> Self {
        if fonts.is_empty() {
            warn!("no fonts registered, numerals and labels will not be drawn");
        }
        Self {
            window,
            pixels,
            background,
            fonts: Arc::new(fonts),
        }
    }

    /// Pushes the last presented frame to the screen.
    pub fn render(&mut self) -> Result<()> {
        self.pixels.render()?;
        Ok(())
    }

    pub fn resize_surface(&mut self, width: u32, height: u32) -> Result<()> {
        self.pixels.resize_surface(width, height)?;
        Ok(())
    }
}

impl Mount for WindowMount {
    type Surface = PixelSurface;

    fn attach(&mut self, width: u32, height: u32) -> PixelSurface {
        debug!("attaching {width}x{height} surface to window");
        PixelSurface::with_fonts(width, height, Arc::clone(&self.fonts))
    }

    /// Flattens the surface onto the background color and requests a redraw.
    fn present(&mut self, surface: &PixelSurface) -> Result<()> {
        let bg = self.background;
        let frame = self.pixels.frame_mut();
        for (dst, src) in frame.chunks_exact_mut(4).zip(surface.frame().chunks_exact(4)) {
            let a = src[3] as f32 / 255.0;
            let over = |s: u8, b: u8| (s as f32 * a + b as f32 * (1.0 - a)).round() as u8;
            dst.copy_from_slice(&[
                over(src[0], bg.r),
                over(src[1], bg.g),
                over(src[2], bg.b),
                0xff,
            ]);
        }
        self.window.request_redraw();
        Ok(())
    }
}

/// Fails when the clock draws numerals or a label and no font face could be found.
fn require_fonts(config: &ClockConfig, fonts: &FontBook) -> Result<()> {
    if config.draws_text() && fonts.is_empty() {
        return Err(Error::MissingFont {
            family: Geometry::new(config).font_family.to_string(),
        });
    }
    Ok(())
}

/// Opens a window and keeps the clock ticking until the window is closed.
pub fn run(renderer: ClockRenderer, window_config: WindowConfig, fonts: FontBook) -> Result<()> {
    require_fonts(renderer.config(), &fonts)?;
    // pixels cannot allocate an empty texture
    let extent = Geometry::new(renderer.config()).surface_extent().max(1);

    let event_loop = EventLoop::new()?;
    let window = WindowBuilder::new()
        .with_title(&window_config.title)
        .with_inner_size(LogicalSize::new(extent as f64, extent as f64))
        .with_resizable(window_config.resizable)
        .build(&event_loop)?;
    let window = Arc::new(window);

    let size = window.inner_size();
    let surface_texture = SurfaceTexture::new(size.width, size.height, Arc::clone(&window));
    let pixels = Pixels::new(extent, extent, surface_texture)?;

    let mount = WindowMount::new(Arc::clone(&window), pixels, window_config.background, fonts);
    let mut clock = renderer
        .with_tick_interval(window_config.tick_interval)
        .initialize(mount)?;

    event_loop.run(move |event, window_target| match event {
        Event::WindowEvent { event, .. } => match event {
            WindowEvent::CloseRequested => {
                clock.stop();
                window_target.exit();
            }
            WindowEvent::Resized(new_size) => {
                if let Err(err) = clock
                    .mount_mut()
                    .resize_surface(new_size.width, new_size.height)
                {
                    error!("failed to resize surface: {err}");
                }
            }
            WindowEvent::RedrawRequested => {
                if let Err(err) = clock.mount_mut().render() {
                    error!("failed to render frame: {err}");
                }
            }
            _ => {}
        },
        Event::AboutToWait => {
            if let Err(err) = clock.poll(Instant::now()) {
                error!("clock tick failed: {err}");
            }
            match clock.next_deadline() {
                Some(deadline) => window_target.set_control_flow(ControlFlow::WaitUntil(deadline)),
                None => window_target.exit(),
            }
        }
        _ => {}
    })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_without_fonts_fails_before_opening_a_window() {
        let fonts = FontBook::new();
        let numbers = ClockConfig::builder().size(100.0).roman(true).build();
        match require_fonts(&numbers, &fonts) {
            Err(Error::MissingFont { family }) => assert_eq!(family, "Times New Roman"),
            other => panic!("expected a missing font error, got {other:?}"),
        }

        let label = ClockConfig::builder()
            .size(100.0)
            .label("Quartz".to_string())
            .build();
        assert!(matches!(
            require_fonts(&label, &fonts),
            Err(Error::MissingFont { .. })
        ));
    }

    #[test]
    fn dots_only_clock_needs_no_fonts() {
        let config = ClockConfig::builder()
            .size(100.0)
            .minute_marks(true)
            .label(String::new())
            .build();
        assert!(require_fonts(&config, &FontBook::new()).is_ok());
    }
}
