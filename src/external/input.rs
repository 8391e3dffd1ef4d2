use chip8_engine::consts;
use sdl2::event::Event;
use sdl2::keyboard::Keycode;

pub struct KeyboardDriver {
    events: sdl2::EventPump,
}

impl KeyboardDriver {
    pub fn new(context: &sdl2::Sdl) -> anyhow::Result<Self> {
        let events = context
            .event_pump()
            .map_err(|e| anyhow::anyhow!("could not obtain event context: {}", e))?;
        Ok(KeyboardDriver { events })
    }

    /// Snapshot of the 16-key pad, or `None` once the user asked to quit.
    pub fn poll(&mut self) -> Option<[bool; consts::KEYBOARD_SIZE]> {
        for event in self.events.poll_iter() {
            match event {
                Event::Quit { .. }
                | Event::KeyDown {
                    keycode: Some(Keycode::Escape),
                    ..
                } => return None,
                _ => continue,
            }
        }

        let mut keys = [false; consts::KEYBOARD_SIZE];
        for key in self
            .events
            .keyboard_state()
            .pressed_scancodes()
            .filter_map(Keycode::from_scancode)
        {
            if let Some(i) = keypad_index(key) {
                keys[i] = true;
            }
        }
        Some(keys)
    }
}

fn keypad_index(key: Keycode) -> Option<usize> {
    match key {
        Keycode::Num1 => Some(0x1),
        Keycode::Num2 => Some(0x2),
        Keycode::Num3 => Some(0x3),
        Keycode::Num4 => Some(0xC),
        Keycode::Q => Some(0x4),
        Keycode::W => Some(0x5),
        Keycode::E => Some(0x6),
        Keycode::R => Some(0xD),
        Keycode::A => Some(0x7),
        Keycode::S => Some(0x8),
        Keycode::D => Some(0x9),
        Keycode::F => Some(0xE),
        Keycode::Z => Some(0xA),
        Keycode::X => Some(0x0),
        Keycode::C => Some(0xB),
        Keycode::V => Some(0xF),
        _ => None,
    }
}
