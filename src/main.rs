mod external;

use std::path::PathBuf;
use std::thread;
use std::time::{Duration, Instant};

use chip8_engine::{CycleStatus, EngineError, Processor, Rom};
use clap::Parser;
use external::input::KeyboardDriver;
use external::output::DisplayDriver;
use log::{info, warn};

#[derive(Parser, Debug)]
#[command(version, about = "CHIP-8 interpreter", long_about = None)]
struct Args {
    /// Path to the ROM file to run
    rom_path: PathBuf,

    #[arg(short, long, default_value_t = 10, help = "Size of one CHIP-8 pixel on screen")]
    scale: u32,

    #[arg(short, long, default_value_t = 1, help = "Instructions executed per frame; timers tick once per instruction")]
    cycles_per_frame: u32,

    #[arg(short, long, default_value_t = 60, help = "Frames per second")]
    fps: u32,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let rom = Rom::from_path(&args.rom_path)?;
    info!("loaded {} ({} bytes)", args.rom_path.display(), rom.len());

    let mut chip8 = Processor::new();
    chip8.load_rom(&rom);

    let context = sdl2::init().map_err(anyhow::Error::msg)?;
    let mut display = DisplayDriver::new(&context, args.scale)?;
    let mut keyboard = KeyboardDriver::new(&context)?;

    let frame_time = Duration::from_secs(1) / args.fps.max(1);
    let mut beeping = false;
    loop {
        let frame_start = Instant::now();
        match keyboard.poll() {
            Some(keys) => chip8.set_keys(keys),
            None => break,
        }

        for _ in 0..args.cycles_per_frame {
            match chip8.step() {
                Ok(CycleStatus::Continue) => {}
                Ok(CycleStatus::Waiting) => break,
                Ok(CycleStatus::SoundEvent) => info!("beep"),
                Err(EngineError::UnknownOpcode(word)) => {
                    warn!("skipping unknown opcode {:#06X} at {:#05X}", word, chip8.pc());
                    chip8.skip_instruction();
                }
                Err(e) => return Err(e.into()),
            }
        }

        if chip8.take_redraw() {
            display.draw(chip8.framebuffer())?;
        }
        if chip8.sound_active() != beeping {
            beeping = chip8.sound_active();
            display.set_sound_indicator(beeping)?;
        }

        if let Some(rest) = frame_time.checked_sub(frame_start.elapsed()) {
            thread::sleep(rest);
        }
    }
    info!("exiting");
    Ok(())
}
