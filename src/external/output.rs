use chip8_engine::consts;
use sdl2::pixels::Color;
use sdl2::rect::Rect;
use sdl2::render::Canvas;
use sdl2::video::Window;

const OFF_COLOR: Color = Color::RGB(0, 0, 0);
const ON_COLOR: Color = Color::RGB(0, 255, 0);

pub struct DisplayDriver {
    screen: Canvas<Window>,
    scale: u32,
}

impl DisplayDriver {
    pub fn new(context: &sdl2::Sdl, scale: u32) -> anyhow::Result<Self> {
        let video_subsystem = context
            .video()
            .map_err(|e| anyhow::anyhow!("could not obtain video context: {}", e))?;
        let window = video_subsystem
            .window(
                "CHIP-8",
                consts::CHIP8_WIDTH as u32 * scale,
                consts::CHIP8_HEIGHT as u32 * scale,
            )
            .position_centered()
            .build()?;
        let mut canvas = window.into_canvas().present_vsync().build()?;

        canvas.set_draw_color(OFF_COLOR);
        canvas.clear();
        canvas.present();

        Ok(DisplayDriver {
            screen: canvas,
            scale,
        })
    }

    pub fn draw(&mut self, framebuffer: &[u8; consts::DISPLAY_CELLS]) -> anyhow::Result<()> {
        self.screen.set_draw_color(OFF_COLOR);
        self.screen.clear();
        self.screen.set_draw_color(ON_COLOR);
        for (i, _) in framebuffer.iter().enumerate().filter(|(_, cell)| **cell == 1) {
            let x = (i % consts::CHIP8_WIDTH) as u32 * self.scale;
            let y = (i / consts::CHIP8_WIDTH) as u32 * self.scale;
            self.screen
                .fill_rect(Rect::new(x as i32, y as i32, self.scale, self.scale))
                .map_err(anyhow::Error::msg)?;
        }
        self.screen.present();
        Ok(())
    }

    pub fn set_sound_indicator(&mut self, active: bool) -> anyhow::Result<()> {
        let title = if active { "CHIP-8 (beep)" } else { "CHIP-8" };
        self.screen.window_mut().set_title(title)?;
        Ok(())
    }
}
