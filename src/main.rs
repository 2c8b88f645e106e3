mod viewer;

use panelgfx::bitmap::{draw_bitmap, draw_bitmap_clipped_with, Bitmap};
use panelgfx::config::{ColorDepth, PanelProfile};
use panelgfx::device::{Device, MonoBackend};
use panelgfx::geometry::{Point, Rect, Size};
use panelgfx::raster::{
    draw_arc, draw_circle, draw_ellipse, draw_filled_circle, draw_filled_triangle, draw_line,
    draw_rect, fill_rect, Arc, Circle, Ellipse, Line, Triangle,
};
use panelgfx::sim::SimPanel;
use panelgfx::transport::TransportError;
use sdl2::keyboard::Keycode;
use std::time::{Duration, Instant};
use viewer::{PanelTexture, Viewer, DEFAULT_SCALE};

type SimDevice = Device<MonoBackend<SimPanel>>;

const TRANSFER_TIMEOUT: Duration = Duration::from_millis(10);

// 8x8 smiley, one band per byte column
const SMILEY: [u8; 8] = [0x3C, 0x42, 0xA9, 0x85, 0x85, 0xA9, 0x42, 0x3C];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scene {
    Showcase,
    Bounce,
    Blit,
}

/// Static tour of every primitive.
fn render_showcase(dev: &mut SimDevice) -> Result<(), TransportError> {
    dev.clear();
    draw_rect(dev, &Rect::new(Point::new(0, 0), Point::new(127, 63)))?;
    draw_line(
        dev,
        &Line::new(Point::new(4, 59), Point::new(40, 30)),
    )?;
    draw_circle(dev, &Circle::new(Point::new(24, 18), 12))?;
    draw_filled_circle(dev, &Circle::new(Point::new(24, 18), 5))?;
    draw_ellipse(dev, &Ellipse::new(Point::new(64, 18), 20, 10))?;
    draw_arc(dev, &Arc::new(Point::new(104, 18), 12, 330, 30))?;
    draw_arc(dev, &Arc::new(Point::new(104, 18), 12, 150, 210))?;
    draw_filled_triangle(
        dev,
        &Triangle::new(Point::new(60, 58), Point::new(80, 36), Point::new(100, 58)),
    )?;
    fill_rect(dev, &Rect::new(Point::new(108, 44), Point::new(122, 58)))?;
    dev.update()
}

struct Bounce {
    x: f32,
    y: f32,
    vx: f32,
    vy: f32,
    radius: u16,
}

impl Bounce {
    fn new() -> Self {
        Self {
            x: 40.0,
            y: 24.0,
            vx: 34.0,
            vy: 22.0,
            radius: 7,
        }
    }

    fn update(&mut self, dt: f32) {
        let r = f32::from(self.radius);
        self.x += self.vx * dt;
        self.y += self.vy * dt;
        if self.x - r < 1.0 || self.x + r > 126.0 {
            self.vx = -self.vx;
            self.x = self.x.clamp(1.0 + r, 126.0 - r);
        }
        if self.y - r < 1.0 || self.y + r > 62.0 {
            self.vy = -self.vy;
            self.y = self.y.clamp(1.0 + r, 62.0 - r);
        }
    }

    fn render(&self, dev: &mut SimDevice) -> Result<(), TransportError> {
        dev.clear();
        draw_rect(dev, &Rect::new(Point::new(0, 0), Point::new(127, 63)))?;
        draw_filled_circle(
            dev,
            &Circle::new(Point::new(self.x as u16, self.y as u16), self.radius),
        )?;
        dev.update()
    }
}

/// Scrolls a bitmap through a fixed viewport to exercise the clipped blit.
struct Blit {
    offset: f32,
    staging_capacity: usize,
}

impl Blit {
    fn new(staging_capacity: usize) -> Self {
        Self {
            offset: 0.0,
            staging_capacity,
        }
    }

    fn update(&mut self, dt: f32) {
        self.offset = (self.offset + 24.0 * dt) % 160.0;
    }

    fn render(&self, dev: &mut SimDevice) -> Result<(), TransportError> {
        dev.clear();
        // static glyph row along the top
        for i in 0..8u16 {
            let bmp = Bitmap::new(Point::new(4 + i * 15, 4), Size::new(8, 8), &SMILEY);
            draw_bitmap(dev, &bmp)?;
        }
        // one glyph sliding through a bordered viewport
        let viewport = Rect::new(Point::new(30, 24), Point::new(98, 56));
        draw_rect(
            dev,
            &Rect::new(Point::new(29, 23), Point::new(98, 56)),
        )?;
        let x = (self.offset as i32 - 16).clamp(-16, 140);
        let bmp = Bitmap::new(
            Point::new(x.max(0) as u16, 35),
            Size::new(8, 8),
            &SMILEY,
        );
        draw_bitmap_clipped_with(dev, &bmp, &viewport, self.staging_capacity)?;
        dev.update()
    }
}

/// Parse command line arguments and return (profile path, scale)
fn parse_args() -> (Option<String>, u32) {
    let args: Vec<String> = std::env::args().collect();
    let mut profile = None;
    let mut scale = DEFAULT_SCALE;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--profile" | "-p" => {
                if i + 1 < args.len() {
                    profile = Some(args[i + 1].clone());
                    i += 1;
                }
            },
            "--scale" | "-s" => {
                if i + 1 < args.len() {
                    if let Ok(s) = args[i + 1].parse::<u32>() {
                        scale = s.max(1);
                    }
                    i += 1;
                }
            },
            "--help" => {
                println!("Usage: panelsim [OPTIONS]");
                println!();
                println!("Options:");
                println!("  --profile F, -p F  Load a panel profile JSON (default: built-in 128x64 mono)");
                println!(
                    "  --scale N, -s N    Window pixels per panel pixel (default: {})",
                    DEFAULT_SCALE
                );
                println!("  --help             Show this help message");
                std::process::exit(0);
            },
            _ => {},
        }
        i += 1;
    }

    (profile, scale)
}

/// The simulator only decodes the monochrome command stream.
fn check_profile(profile: &PanelProfile) -> Result<(), String> {
    match profile.depth {
        ColorDepth::Mono => Ok(()),
        ColorDepth::Grey4 => Err(format!(
            "profile '{}' is a greyscale panel; panelsim only simulates mono",
            profile.name
        )),
    }
}

fn main() -> Result<(), String> {
    let (profile_path, scale) = parse_args();

    let profile = match profile_path {
        Some(path) => PanelProfile::load(&path)?,
        None => PanelProfile::mono_128x64(),
    };
    check_profile(&profile)?;

    let (mut display, texture_creator) = Viewer::new(
        "panelsim",
        u32::from(profile.width),
        u32::from(profile.height),
        scale,
    )?;
    let mut target = PanelTexture::new(
        &texture_creator,
        u32::from(profile.width),
        u32::from(profile.height),
    )?;

    let sim = SimPanel::new(profile.width, profile.height);
    let mut dev = Device::bind(MonoBackend::new(
        sim,
        profile.width,
        profile.height,
        profile.address,
        TRANSFER_TIMEOUT,
    ));
    dev.open().map_err(|e| e.to_string())?;

    println!("=== panelsim ===");
    println!(
        "Panel: {} ({}x{})",
        profile.name, profile.width, profile.height
    );
    println!("Controls:");
    println!("  1      - Primitives showcase");
    println!("  2      - Bouncing ball");
    println!("  3      - Clipped bitmap blit");
    println!("  Escape - Quit");

    let mut scene = Scene::Showcase;
    let mut bounce = Bounce::new();
    let mut blit = Blit::new(profile.staging_capacity);
    let mut last_frame = Instant::now();

    render_showcase(&mut dev).map_err(|e| e.to_string())?;

    'main: loop {
        let dt = last_frame.elapsed().as_secs_f32();
        last_frame = Instant::now();

        for event in display.poll_events() {
            match event {
                viewer::ViewerEvent::Quit => break 'main,
                viewer::ViewerEvent::KeyDown(key) => match key {
                    Keycode::Escape => break 'main,
                    Keycode::Num1 => {
                        scene = Scene::Showcase;
                        render_showcase(&mut dev).map_err(|e| e.to_string())?;
                    },
                    Keycode::Num2 => scene = Scene::Bounce,
                    Keycode::Num3 => scene = Scene::Blit,
                    _ => {},
                },
            }
        }

        match scene {
            Scene::Showcase => {},
            Scene::Bounce => {
                bounce.update(dt);
                bounce.render(&mut dev).map_err(|e| e.to_string())?;
            },
            Scene::Blit => {
                blit.update(dt);
                blit.render(&mut dev).map_err(|e| e.to_string())?;
            },
        }

        display.present(&mut target, dev.backend().transport())?;
    }

    dev.close().map_err(|e| e.to_string())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sim_device() -> SimDevice {
        let sim = SimPanel::new(128, 64);
        Device::bind(MonoBackend::new(sim, 128, 64, 0x3C, TRANSFER_TIMEOUT))
    }

    #[test]
    fn test_greyscale_profiles_are_rejected() {
        assert!(check_profile(&PanelProfile::mono_128x64()).is_ok());
        assert!(check_profile(&PanelProfile::grey_128x96()).is_err());
    }

    #[test]
    fn test_blit_scene_renders_the_same_at_any_staging_capacity() {
        // offset chosen so the glyph straddles the viewport's right edge
        let mut tiny = Blit::new(1);
        let mut wide = Blit::new(256);
        tiny.offset = 110.0;
        wide.offset = 110.0;

        let mut a = sim_device();
        tiny.render(&mut a).unwrap();
        let mut b = sim_device();
        wide.render(&mut b).unwrap();

        assert!(a.backend().lit_pixels() > 0);
        assert_eq!(a.backend().buffer(), b.backend().buffer());
    }
}
