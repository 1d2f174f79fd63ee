use glam::DVec2;
use grid_raycaster::{RaySample, Scene, Shape};
use rayon::{
    iter::{IndexedParallelIterator, ParallelIterator},
    slice::ParallelSliceMut,
};

const VIEWER_RADIUS: f64 = 0.3; // cells

#[inline]
pub fn pack_rgb(r: u8, g: u8, b: u8) -> u32 {
    // BGRA8 in little-endian memory
    (b as u32) | ((g as u32) << 8) | ((r as u32) << 16)
    // Alpha at 0
}

/// Maps grid units to framebuffer pixels, letterboxed to keep cells square.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapView {
    pub cell_px: f64,
}

impl MapView {
    pub fn fit(width: usize, height: usize, scene: &Scene) -> Self {
        let grid = scene.grid();
        let sx = width as f64 / grid.width().max(1) as f64;
        let sy = height as f64 / grid.height().max(1) as f64;
        Self {
            cell_px: sx.min(sy),
        }
    }

    #[inline]
    pub fn to_screen(&self, p: DVec2) -> DVec2 {
        p * self.cell_px
    }

    #[inline]
    pub fn to_grid(&self, px: f64, py: f64) -> DVec2 {
        DVec2::new(px, py) / self.cell_px
    }
}

/// Top-down view: occupants, then the sampled rays, then the viewer on top.
pub fn render_frame(buf: &mut [u32], width: usize, height: usize, scene: &Scene, samples: &[RaySample]) {
    let background = pack_rgb(0, 0, 0);
    let fallback = pack_rgb(255, 0, 0);
    let view = MapView::fit(width, height, scene);
    let grid = scene.grid();

    // Rows are independent, fill them in parallel.
    buf[..width * height]
        .par_chunks_mut(width)
        .enumerate()
        .for_each(|(y, row)| {
            for (x, px) in row.iter_mut().enumerate() {
                // Sample at the pixel centre.
                let p = view.to_grid(x as f64 + 0.5, y as f64 + 0.5);
                let (cx, cy) = (p.x.floor(), p.y.floor());
                *px = background;
                if cx < 0.0 || cy < 0.0 {
                    continue;
                }
                let Ok(Some(id)) = grid.get(cx as u32, cy as u32) else {
                    continue;
                };
                let Some(occupant) = scene.occupant(id) else {
                    continue;
                };
                *px = match occupant.appearance {
                    None => fallback,
                    Some(look) => {
                        let [r, g, b] = look.color;
                        match look.shape {
                            Shape::Rectangle => pack_rgb(r, g, b),
                            Shape::Circle => {
                                let centre = DVec2::new(cx + 0.5, cy + 0.5);
                                if p.distance_squared(centre) <= 0.25 {
                                    pack_rgb(r, g, b)
                                } else {
                                    background
                                }
                            }
                        }
                    }
                };
            }
        });

    let viewer = scene.viewer();
    let eye = view.to_screen(viewer.position);
    let ray_color = pack_rgb(0, 0, 255);
    for sample in samples {
        if let Some(hit) = sample.hit {
            draw_line(buf, width, height, eye, view.to_screen(hit.position), ray_color);
        }
    }

    fill_circle(
        buf,
        width,
        height,
        eye,
        VIEWER_RADIUS * view.cell_px,
        pack_rgb(0, 255, 0),
    );
}

fn draw_line(buf: &mut [u32], width: usize, height: usize, a: DVec2, b: DVec2, color: u32) {
    let delta = b - a;
    let steps = delta.x.abs().max(delta.y.abs()).ceil().max(1.0) as usize;
    let inc = delta / steps as f64;
    let mut p = a;
    for _ in 0..=steps {
        put_pixel(buf, width, height, p.x, p.y, color);
        p += inc;
    }
}

fn fill_circle(buf: &mut [u32], width: usize, height: usize, centre: DVec2, radius: f64, color: u32) {
    let r2 = radius * radius;
    let y0 = (centre.y - radius).floor().max(0.0) as usize;
    let y1 = ((centre.y + radius).ceil().max(0.0) as usize).min(height);
    let x0 = (centre.x - radius).floor().max(0.0) as usize;
    let x1 = ((centre.x + radius).ceil().max(0.0) as usize).min(width);
    for y in y0..y1 {
        for x in x0..x1 {
            let d = DVec2::new(x as f64 + 0.5, y as f64 + 0.5) - centre;
            if d.length_squared() <= r2 {
                buf[y * width + x] = color;
            }
        }
    }
}

#[inline]
fn put_pixel(buf: &mut [u32], width: usize, height: usize, x: f64, y: f64, color: u32) {
    if x < 0.0 || y < 0.0 {
        return;
    }
    let (x, y) = (x as usize, y as usize);
    if x < width && y < height {
        buf[y * width + x] = color;
    }
}

#[cfg(test)]
mod tests {
    use glam::UVec2;
    use grid_raycaster::{Appearance, FovSampler, Occupant, Viewer};

    use super::*;

    fn scene() -> Scene {
        let viewer = Viewer::new(DVec2::new(0.5, 0.5), 0.0, 1.0, 90.0);
        let mut scene = Scene::new("test", 4, 4, viewer);
        let wall = Occupant::new("wall", UVec2::new(3, 0))
            .with_appearance(Appearance::rectangle([10, 20, 30]));
        let ball =
            Occupant::new("ball", UVec2::new(0, 3)).with_appearance(Appearance::circle([1, 2, 3]));
        scene.spawn(wall).unwrap();
        scene.spawn(ball).unwrap();
        scene
    }

    #[test]
    fn draws_cells_rays_and_viewer() {
        let scene = scene();
        let (w, h) = (40, 40);
        let mut buf = vec![0xDEADBEEF; w * h];
        let sampler = FovSampler::new(1.0, 1).unwrap();
        let samples = sampler.sample(scene.grid(), scene.viewer().position, 0.5);
        assert!(samples[0].hit.is_some());

        render_frame(&mut buf, w, h, &scene, &samples);

        // Wall cell (3, 0) spans pixels 30..40 x 0..10.
        assert_eq!(buf[2 * w + 38], pack_rgb(10, 20, 30));
        // Ball cell corner stays background, centre is coloured.
        assert_eq!(buf[30 * w], pack_rgb(0, 0, 0));
        assert_eq!(buf[35 * w + 5], pack_rgb(1, 2, 3));
        // Viewer drawn at (5, 5).
        assert_eq!(buf[5 * w + 5], pack_rgb(0, 255, 0));
        // Ray passes along row 5 towards the wall.
        assert_eq!(buf[5 * w + 20], pack_rgb(0, 0, 255));
        // Empty space is cleared.
        assert_eq!(buf[20 * w + 20], pack_rgb(0, 0, 0));
    }

    #[test]
    fn view_keeps_cells_square() {
        let scene = scene();
        let view = MapView::fit(800, 400, &scene);
        assert_eq!(view.cell_px, 100.0);
        assert_eq!(view.to_screen(DVec2::new(1.5, 2.0)), DVec2::new(150.0, 200.0));
    }
}
