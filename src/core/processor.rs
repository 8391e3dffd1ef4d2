use crate::consts;
use crate::core::error::EngineError;
use crate::core::instruction::Instruction;
use crate::core::ram;
use crate::core::rom::{check_size, Rom};
use log::{debug, trace};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Outcome of one successful call to [`Processor::step`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleStatus {
    Continue,
    /// FX0A saw no key held; pc still points at it and timers did not tick.
    Waiting,
    /// The sound timer reached zero on this cycle's tick.
    SoundEvent,
}

#[derive(Debug)]
pub struct Processor {
    stack: [u16; consts::STACK_SIZE],
    registers: [u8; consts::REG_COUNT],
    idx_register: u16,
    pc: u16,
    stack_pointer: u8,
    delay_timer: u8,
    sound_timer: u8,
    ram: ram::Ram,
    display_buffer: ram::DisplayBuffer,
    keyboard_buffer: ram::KeyboardBuffer,
    rng: StdRng,
}

impl Default for Processor {
    fn default() -> Self {
        Processor::new()
    }
}

impl Processor {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// Same as [`Processor::new`] but with a reproducible CXNN sequence.
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        let mut proc = Processor {
            stack: [0; consts::STACK_SIZE],
            registers: [0; consts::REG_COUNT],
            idx_register: 0,
            pc: 0,
            stack_pointer: 0,
            delay_timer: 0,
            sound_timer: 0,
            ram: ram::Ram::default(),
            display_buffer: ram::DisplayBuffer::default(),
            keyboard_buffer: ram::KeyboardBuffer::default(),
            rng,
        };
        proc.init_state(&[]);
        proc
    }

    /// Zeroes the machine, installs the font set and copies `rom` to 0x200.
    ///
    /// An oversized ROM is rejected before any state is touched.
    pub fn reset(&mut self, rom: &[u8]) -> Result<(), EngineError> {
        check_size(rom.len())?;
        self.init_state(rom);
        Ok(())
    }

    pub fn load_rom(&mut self, rom: &Rom) {
        self.init_state(rom.bytes());
    }

    fn init_state(&mut self, rom: &[u8]) {
        self.stack = [0; consts::STACK_SIZE];
        self.registers = [0; consts::REG_COUNT];
        self.idx_register = 0;
        self.stack_pointer = 0;
        self.delay_timer = 0;
        self.sound_timer = 0;
        self.ram = ram::Ram::default();
        self.display_buffer = ram::DisplayBuffer::default();
        self.keyboard_buffer = ram::KeyboardBuffer::default();

        self.ram.buffer[0..consts::FONT_SET_SIZE].copy_from_slice(&consts::FONT_SET);
        self.ram.buffer[consts::PROG_OFFSET..consts::PROG_OFFSET + rom.len()].copy_from_slice(rom);
        self.pc = consts::PROG_OFFSET as u16;
        self.display_buffer.changed = true;
        debug!("machine reset with {} byte ROM", rom.len());
    }

    /// Runs one fetch-decode-execute cycle followed by one timer tick.
    ///
    /// An unknown opcode is reported before anything is mutated.
    pub fn step(&mut self) -> Result<CycleStatus, EngineError> {
        let instr_addr = self.pc;
        let word = self.ram.read_word(instr_addr);
        let instr = Instruction::decode(word)?;
        trace!("{:#05X}: {:04X}  {}", instr_addr, word, instr);

        if self.execute(instr_addr, instr) == CycleStatus::Waiting {
            return Ok(CycleStatus::Waiting);
        }
        Ok(self.tick_timers())
    }

    fn execute(&mut self, instr_addr: u16, instr: Instruction) -> CycleStatus {
        let keyboard = self.keyboard_buffer;
        self.pc = instr_addr.wrapping_add(consts::OP_CODE_BYTES as u16);

        match instr {
            // Halt till keyboard interrupt
            Instruction::WaitKey { x } => match keyboard.last_pressed() {
                Some(key) => self.registers[x as usize] = key,
                None => {
                    self.pc = instr_addr;
                    return CycleStatus::Waiting;
                }
            },

            // Clears screen
            Instruction::ClearScreen => self.display_buffer.clear(),

            // Draw on display
            Instruction::Draw { x, y, n } => self.draw_sprite(x, y, n),

            // Jumps
            Instruction::Jump(nnn) => self.pc = nnn,
            Instruction::JumpV0(nnn) => self.pc = nnn.wrapping_add(self.registers[0] as u16),

            // Subroutines: enter and exit
            Instruction::Call(nnn) => {
                self.stack[self.stack_pointer as usize % consts::STACK_SIZE] = instr_addr;
                self.stack_pointer = self.stack_pointer.wrapping_add(1);
                self.pc = nnn;
            }
            Instruction::Return => {
                self.stack_pointer = self.stack_pointer.wrapping_sub(1);
                let ret = self.stack[self.stack_pointer as usize % consts::STACK_SIZE];
                self.pc = ret.wrapping_add(consts::OP_CODE_BYTES as u16);
            }

            // Conditional skips
            Instruction::SkipEqImm { x, nn } => self.skip_if(self.registers[x as usize] == nn),
            Instruction::SkipNeImm { x, nn } => self.skip_if(self.registers[x as usize] != nn),
            Instruction::SkipEqReg { x, y } => {
                self.skip_if(self.registers[x as usize] == self.registers[y as usize])
            }
            Instruction::SkipNeReg { x, y } => {
                self.skip_if(self.registers[x as usize] != self.registers[y as usize])
            }

            // Set register
            Instruction::LoadImm { x, nn } => self.registers[x as usize] = nn,
            Instruction::Move { x, y } => self.registers[x as usize] = self.registers[y as usize],
            Instruction::LoadIndex(nnn) => self.idx_register = nnn,

            // Add/subtract instructions; VF is written last so it survives X == F
            Instruction::AddImm { x, nn } => {
                self.registers[x as usize] = self.registers[x as usize].wrapping_add(nn);
            }
            Instruction::AddReg { x, y } => {
                let (sum, carry) =
                    self.registers[x as usize].overflowing_add(self.registers[y as usize]);
                self.registers[x as usize] = sum;
                self.registers[consts::FLAG_REG] = carry as u8;
            }
            Instruction::SubReg { x, y } => {
                let (vx, vy) = (self.registers[x as usize], self.registers[y as usize]);
                self.registers[x as usize] = vx.wrapping_sub(vy);
                self.registers[consts::FLAG_REG] = (vy <= vx) as u8;
            }
            Instruction::SubNeg { x, y } => {
                // VF = 1 when VX > VY, compared before the subtraction.
                let (vx, vy) = (self.registers[x as usize], self.registers[y as usize]);
                self.registers[x as usize] = vy.wrapping_sub(vx);
                self.registers[consts::FLAG_REG] = (vx > vy) as u8;
            }

            // Logical instructions
            Instruction::Or { x, y } => self.registers[x as usize] |= self.registers[y as usize],
            Instruction::And { x, y } => self.registers[x as usize] &= self.registers[y as usize],
            Instruction::Xor { x, y } => self.registers[x as usize] ^= self.registers[y as usize],

            // Shifting instructions
            Instruction::ShiftRight { x, .. } => {
                let vx = self.registers[x as usize];
                self.registers[x as usize] = vx >> 1;
                self.registers[consts::FLAG_REG] = vx & 0b00000001;
            }
            Instruction::ShiftLeft { x, .. } => {
                let vx = self.registers[x as usize];
                self.registers[x as usize] = vx << 1;
                self.registers[consts::FLAG_REG] = (vx & 0b10000000) >> 7;
            }

            // Generate randomness
            Instruction::Random { x, nn } => {
                let rand_val: u8 = self.rng.gen();
                self.registers[x as usize] = nn & rand_val;
            }

            // Skip on keypress
            Instruction::SkipKeyPressed { x } => {
                self.skip_if(keyboard.is_pressed(self.registers[x as usize]))
            }
            Instruction::SkipKeyReleased { x } => {
                self.skip_if(!keyboard.is_pressed(self.registers[x as usize]))
            }

            // Change timers (delay/sound)
            Instruction::LoadDelay { x } => self.registers[x as usize] = self.delay_timer,
            Instruction::SetDelay { x } => self.delay_timer = self.registers[x as usize],
            Instruction::SetSound { x } => self.sound_timer = self.registers[x as usize],

            // Update index register
            Instruction::AddIndex { x } => {
                self.idx_register = self
                    .idx_register
                    .wrapping_add(self.registers[x as usize] as u16);
                self.registers[consts::FLAG_REG] = (self.idx_register > consts::ADDR_MASK) as u8;
            }

            // Point index to font character
            Instruction::LoadFont { x } => {
                self.idx_register = self.registers[x as usize] as u16 * consts::FONT_GLYPH_BYTES as u16;
            }

            // Binary byte to decimal digits
            Instruction::StoreBcd { x } => {
                let num = self.registers[x as usize];
                let i = self.idx_register;
                self.ram.write(i, num / 100);
                self.ram.write(i.wrapping_add(1), (num / 10) % 10);
                self.ram.write(i.wrapping_add(2), num % 10);
            }

            // Store and load memory
            Instruction::StoreRegs { x } => {
                for reg in 0..=x {
                    let addr = self.idx_register.wrapping_add(reg as u16);
                    self.ram.write(addr, self.registers[reg as usize]);
                }
                self.idx_register = self.idx_register.wrapping_add(x as u16 + 1);
            }
            Instruction::LoadRegs { x } => {
                for reg in 0..=x {
                    let addr = self.idx_register.wrapping_add(reg as u16);
                    self.registers[reg as usize] = self.ram.read(addr);
                }
                self.idx_register = self.idx_register.wrapping_add(x as u16 + 1);
            }
        }
        CycleStatus::Continue
    }

    fn skip_if(&mut self, cond: bool) {
        if cond {
            self.pc = self.pc.wrapping_add(consts::OP_CODE_BYTES as u16);
        }
    }

    /// XOR-blits an 8xN sprite from memory[I].
    ///
    /// Wrapping moves the sprite origin rather than taking each coordinate
    /// modulo the screen size: once `x + col` reaches the width the origin
    /// becomes `-col`, and likewise for rows. The resulting flat cell index is
    /// folded back into the buffer.
    fn draw_sprite(&mut self, x: u8, y: u8, n: u8) {
        let width = consts::CHIP8_WIDTH as i32;
        let height = consts::CHIP8_HEIGHT as i32;
        let mut x_coord = self.registers[x as usize] as i32;
        let mut y_coord = self.registers[y as usize] as i32;

        self.registers[consts::FLAG_REG] = 0;
        let mut collided = false;
        for row in 0..n as i32 {
            let curr_sprite_val = self.ram.read(self.idx_register.wrapping_add(row as u16));
            for shift_pos in 0..8 {
                if x_coord + shift_pos == width {
                    x_coord = -shift_pos;
                }
                if y_coord + row == height {
                    y_coord = -row;
                }
                if curr_sprite_val & (0x80 >> shift_pos) != 0 {
                    let cell = (x_coord + shift_pos) + (y_coord + row) * width;
                    let cell = cell.rem_euclid(consts::DISPLAY_CELLS as i32) as usize;
                    collided |= self.display_buffer.flip(cell);
                }
            }
        }
        self.registers[consts::FLAG_REG] = collided as u8;
        self.display_buffer.changed = true;
    }

    fn tick_timers(&mut self) -> CycleStatus {
        if self.delay_timer > 0 {
            self.delay_timer -= 1;
        }
        if self.sound_timer > 0 {
            self.sound_timer -= 1;
            if self.sound_timer == 0 {
                debug!("sound timer expired");
                return CycleStatus::SoundEvent;
            }
        }
        CycleStatus::Continue
    }

    /// Moves past the word at pc without executing it.
    pub fn skip_instruction(&mut self) {
        self.pc = self.pc.wrapping_add(consts::OP_CODE_BYTES as u16);
    }

    pub fn current_instruction(&self) -> Result<Instruction, EngineError> {
        Instruction::decode(self.ram.read_word(self.pc))
    }

    pub fn pc(&self) -> u16 {
        self.pc
    }

    pub fn set_pc(&mut self, pc: u16) {
        self.pc = pc;
    }

    pub fn index(&self) -> u16 {
        self.idx_register
    }

    pub fn set_index(&mut self, value: u16) {
        self.idx_register = value;
    }

    pub fn registers(&self) -> &[u8; consts::REG_COUNT] {
        &self.registers
    }

    pub fn register(&self, x: usize) -> u8 {
        self.registers[x & 0x0F]
    }

    pub fn set_register(&mut self, x: usize, value: u8) {
        self.registers[x & 0x0F] = value;
    }

    pub fn stack(&self) -> &[u16; consts::STACK_SIZE] {
        &self.stack
    }

    pub fn stack_pointer(&self) -> u8 {
        self.stack_pointer
    }

    pub fn delay_timer(&self) -> u8 {
        self.delay_timer
    }

    pub fn set_delay_timer(&mut self, value: u8) {
        self.delay_timer = value;
    }

    pub fn sound_timer(&self) -> u8 {
        self.sound_timer
    }

    pub fn set_sound_timer(&mut self, value: u8) {
        self.sound_timer = value;
    }

    pub fn sound_active(&self) -> bool {
        self.sound_timer > 0
    }

    pub fn memory(&self) -> &[u8; consts::RAM_BYTES] {
        &self.ram.buffer
    }

    /// Copies `bytes` into memory from `addr`, wrapping past 0xFFF.
    pub fn write_memory(&mut self, addr: u16, bytes: &[u8]) {
        for (offset, &byte) in bytes.iter().enumerate() {
            self.ram.write(addr.wrapping_add(offset as u16), byte);
        }
    }

    pub fn framebuffer(&self) -> &[u8; consts::DISPLAY_CELLS] {
        &self.display_buffer.buffer
    }

    pub fn pixel(&self, x: usize, y: usize) -> u8 {
        self.display_buffer.pixel(x, y)
    }

    pub fn display_changed(&self) -> bool {
        self.display_buffer.changed
    }

    pub fn acknowledge_display(&mut self) {
        self.display_buffer.changed = false;
    }

    /// Checks and clears the changed flag.
    pub fn take_redraw(&mut self) -> bool {
        std::mem::replace(&mut self.display_buffer.changed, false)
    }

    pub fn keys(&self) -> &[bool; consts::KEYBOARD_SIZE] {
        &self.keyboard_buffer.buffer
    }

    pub fn set_key(&mut self, key: usize, pressed: bool) {
        self.keyboard_buffer.buffer[key & 0x0F] = pressed;
    }

    pub fn set_keys(&mut self, keys: [bool; consts::KEYBOARD_SIZE]) {
        self.keyboard_buffer.buffer = keys;
    }
}
