use crate::error::Result;
use crate::scene::{DrawCommand, Scene};

/// A fixed-size 2D raster the clock draws into.
pub trait Surface: Sized {
    fn width(&self) -> u32;
    fn height(&self) -> u32;

    /// A blank surface with identical dimensions (and fonts, if the surface has any).
    fn duplicate(&self) -> Self;

    /// Resets every pixel to transparent.
    fn clear(&mut self);

    /// Composites `source` over this surface at the origin.
    fn draw_image(&mut self, source: &Self);

    fn execute(&mut self, command: &DrawCommand);

    fn render(&mut self, scene: &Scene) {
        for command in scene.commands() {
            self.execute(command);
        }
    }
}

/// Where a clock is displayed.
///
/// The mount hands out the live surface and shows it whenever a tick finishes.
pub trait Mount {
    type Surface: Surface;

    fn attach(&mut self, width: u32, height: u32) -> Self::Surface;

    fn present(&mut self, surface: &Self::Surface) -> Result<()>;
}
