//! SDL2 window glue for the panel simulator.
//!
//! Shows the simulated panel RAM scaled up in a desktop window. Lit pixels
//! render in the washed-blue tint of the real modules, unlit pixels near
//! black, so what you see is what the panel would show.

use panelgfx::sim::SimPanel;
use sdl2::event::Event;
use sdl2::keyboard::Keycode;
use sdl2::pixels::PixelFormatEnum;
use sdl2::render::{Canvas, Texture, TextureCreator};
use sdl2::video::{Window, WindowContext};
use sdl2::EventPump;

pub const DEFAULT_SCALE: u32 = 6;

const LIT: [u8; 4] = [0xFF, 0xE8, 0xD8, 0x9A];
const UNLIT: [u8; 4] = [0xFF, 0x10, 0x0C, 0x04];

pub struct Viewer {
    canvas: Canvas<Window>,
    event_pump: EventPump,
}

pub struct PanelTexture<'a> {
    texture: Texture<'a>,
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

#[derive(Debug, Clone, Copy)]
pub enum ViewerEvent {
    Quit,
    KeyDown(Keycode),
}

impl Viewer {
    /// Open a window sized `panel * scale`, VSync on.
    pub fn new(
        title: &str,
        panel_width: u32,
        panel_height: u32,
        scale: u32,
    ) -> Result<(Self, TextureCreator<WindowContext>), String> {
        let sdl_context = sdl2::init()?;
        let video_subsystem = sdl_context.video()?;

        let window = video_subsystem
            .window(title, panel_width * scale, panel_height * scale)
            .position_centered()
            .build()
            .map_err(|e| e.to_string())?;

        let canvas = window
            .into_canvas()
            .accelerated()
            .present_vsync()
            .build()
            .map_err(|e| e.to_string())?;

        let texture_creator = canvas.texture_creator();
        let event_pump = sdl_context.event_pump()?;

        Ok((
            Self { canvas, event_pump },
            texture_creator,
        ))
    }

    /// Rebuild the texture from the panel RAM and present it scaled to the
    /// window.
    pub fn present(&mut self, target: &mut PanelTexture, panel: &SimPanel) -> Result<(), String> {
        for y in 0..target.height {
            for x in 0..target.width {
                let color = if panel.pixel(x as u16, y as u16) {
                    LIT
                } else {
                    UNLIT
                };
                let i = ((y * target.width + x) * 4) as usize;
                target.pixels[i..i + 4].copy_from_slice(&color);
            }
        }
        target
            .texture
            .update(None, &target.pixels, (target.width * 4) as usize)
            .map_err(|e| e.to_string())?;

        self.canvas.copy(&target.texture, None, None)?;
        self.canvas.present();
        Ok(())
    }

    pub fn poll_events(&mut self) -> Vec<ViewerEvent> {
        let mut events = Vec::new();
        for event in self.event_pump.poll_iter() {
            match event {
                Event::Quit { .. } => events.push(ViewerEvent::Quit),
                Event::KeyDown {
                    keycode: Some(k), ..
                } => events.push(ViewerEvent::KeyDown(k)),
                _ => {},
            }
        }
        events
    }
}

impl<'a> PanelTexture<'a> {
    pub fn new(
        texture_creator: &'a TextureCreator<WindowContext>,
        width: u32,
        height: u32,
    ) -> Result<Self, String> {
        let texture = texture_creator
            .create_texture_streaming(PixelFormatEnum::RGBA8888, width, height)
            .map_err(|e| e.to_string())?;
        Ok(Self {
            texture,
            width,
            height,
            pixels: vec![0; (width * height * 4) as usize],
        })
    }
}
