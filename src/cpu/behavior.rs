// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! Contains implementations for each Chip-8 [Insn]

use super::{
    mem::{glyph_addr, ADDR_MASK},
    screen::{HEIGHT, WIDTH},
    *,
};
use rand::random;

impl CPU {
    /// Executes a single [Insn]
    #[rustfmt::skip]
    #[inline(always)]
    pub(super) fn execute(&mut self, state: &mut State, instruction: Insn) -> Result<()> {
        match instruction {
            Insn::cls               => self.clear_screen(state),
            Insn::ret               => self.ret(state)?,
            Insn::sys   {       A } => self.sys(A),
            Insn::jmp   {       A } => self.jump(state, A),
            Insn::call  {       A } => self.call(state, A)?,
            Insn::seb   {    x, B } => self.skip_equals_immediate(state, x, B),
            Insn::sneb  {    x, B } => self.skip_not_equals_immediate(state, x, B),
            Insn::se    { y, x    } => self.skip_equals(state, x, y),
            Insn::movb  {    x, B } => self.load_immediate(state, x, B),
            Insn::addb  {    x, B } => self.add_immediate(state, x, B),
            Insn::mov   { y, x    } => self.load(state, x, y),
            Insn::or    { y, x    } => self.or(state, x, y),
            Insn::and   { y, x    } => self.and(state, x, y),
            Insn::xor   { y, x    } => self.xor(state, x, y),
            Insn::add   { y, x    } => self.add(state, x, y),
            Insn::sub   { y, x    } => self.sub(state, x, y),
            Insn::shr   { y, x    } => self.shift_right(state, x, y),
            Insn::bsub  { y, x    } => self.backwards_sub(state, x, y),
            Insn::shl   { y, x    } => self.shift_left(state, x, y),
            Insn::sne   { y, x    } => self.skip_not_equals(state, x, y),
            Insn::movI  {       A } => self.load_i_immediate(state, A),
            Insn::jmpr  {       A } => self.jump_indexed(state, A),
            Insn::rand  {    x, B } => self.rand(state, x, B),
            Insn::draw  { y, x, n } => self.draw(state, x, y, n),
            Insn::sek   {    x    } => self.skip_key_equals(state, x),
            Insn::snek  {    x    } => self.skip_key_not_equals(state, x),
            Insn::getdt {    x    } => self.load_delay_timer(state, x),
            Insn::waitk {    x    } => self.wait_for_key(state, x),
            Insn::setdt {    x    } => self.store_delay_timer(state, x),
            Insn::movst {    x    } => self.store_sound_timer(state, x),
            Insn::addI  {    x    } => self.add_i(state, x),
            Insn::font  {    x    } => self.load_sprite(state, x),
            Insn::bcd   {    x    } => self.bcd_convert(state, x),
            Insn::dmao  {    x    } => self.store_dma(state, x),
            Insn::dmai  {    x    } => self.load_dma(state, x),
        }
        Ok(())
    }
}

/// |`0aaa`| Issues a "System call" (ML routine)
///
/// |opcode| effect                             |
/// |------|------------------------------------|
/// |`00e0`| Clear screen memory to all 0       |
/// |`00ee`| Return from subroutine             |
impl CPU {
    /// |`00e0`| Clears the screen memory to 0
    #[inline(always)]
    pub(super) fn clear_screen(&mut self, state: &mut State) {
        state.screen.clear();
    }
    /// |`00ee`| Returns from subroutine
    #[inline(always)]
    pub(super) fn ret(&mut self, state: &mut State) -> Result<()> {
        state.pc = state.pop()?;
        Ok(())
    }
    /// |`0aaa`| Machine-language routines don't exist here. Does nothing.
    #[inline(always)]
    pub(super) fn sys(&mut self, _a: Adr) {}
}

/// |`1aaa`| Sets pc to an absolute address
impl CPU {
    /// |`1aaa`| Sets the program counter to an absolute address
    #[inline(always)]
    pub(super) fn jump(&mut self, state: &mut State, a: Adr) {
        state.pc = a;
    }
}

/// |`2aaa`| Pushes pc onto the stack, then jumps to a
impl CPU {
    /// |`2aaa`| Pushes pc onto the stack, then jumps to a
    #[inline(always)]
    pub(super) fn call(&mut self, state: &mut State, a: Adr) -> Result<()> {
        state.push(state.pc)?;
        state.pc = a;
        Ok(())
    }
}

/// |`3xbb`| Skips next instruction if register X == b
impl CPU {
    /// |`3xbb`| Skips the next instruction if register X == b
    #[inline(always)]
    pub(super) fn skip_equals_immediate(&mut self, state: &mut State, x: Reg, b: u8) {
        if state.v[x] == b {
            state.pc = state.pc.wrapping_add(2);
        }
    }
}

/// |`4xbb`| Skips next instruction if register X != b
impl CPU {
    /// |`4xbb`| Skips the next instruction if register X != b
    #[inline(always)]
    pub(super) fn skip_not_equals_immediate(&mut self, state: &mut State, x: Reg, b: u8) {
        if state.v[x] != b {
            state.pc = state.pc.wrapping_add(2);
        }
    }
}

/// |`5xyn`| Performs a register-register comparison
///
/// |opcode| effect                             |
/// |------|------------------------------------|
/// |`5XY0`| Skip next instruction if vX == vY  |
impl CPU {
    /// |`5xy0`| Skips the next instruction if register X == register Y
    #[inline(always)]
    pub(super) fn skip_equals(&mut self, state: &mut State, x: Reg, y: Reg) {
        if state.v[x] == state.v[y] {
            state.pc = state.pc.wrapping_add(2);
        }
    }
}

/// |`6xbb`| Loads immediate byte b into register vX
impl CPU {
    /// |`6xbb`| Loads immediate byte b into register vX
    #[inline(always)]
    pub(super) fn load_immediate(&mut self, state: &mut State, x: Reg, b: u8) {
        state.v[x] = b;
    }
}

/// |`7xbb`| Adds immediate byte b to register vX
impl CPU {
    /// |`7xbb`| Adds immediate byte b to register vX. Does not touch vF.
    #[inline(always)]
    pub(super) fn add_immediate(&mut self, state: &mut State, x: Reg, b: u8) {
        state.v[x] = state.v[x].wrapping_add(b);
    }
}

/// |`8xyn`| Performs ALU operation
///
/// |opcode| effect                             |
/// |------|------------------------------------|
/// |`8xy0`| X = Y                              |
/// |`8xy1`| X = X | Y                          |
/// |`8xy2`| X = X & Y                          |
/// |`8xy3`| X = X ^ Y                          |
/// |`8xy4`| X = X + Y; Set vF=carry            |
/// |`8xy5`| X = X - Y; Set vF=!borrow          |
/// |`8xy6`| X = X >> 1; Set vF=shifted-out bit |
/// |`8xy7`| X = Y - X; Set vF=!borrow          |
/// |`8xyE`| X = X << 1; Set vF=shifted-out bit |
///
/// vF is always written last, so when X is F only the flag survives.
impl CPU {
    /// |`8xy0`| Loads the value of y into x
    #[inline(always)]
    pub(super) fn load(&mut self, state: &mut State, x: Reg, y: Reg) {
        state.v[x] = state.v[y];
    }
    /// |`8xy1`| Performs bitwise or of vX and vY, and stores the result in vX
    ///
    /// # Quirk
    /// The original chip-8 interpreter clobbers vF after any bitwise operation
    #[inline(always)]
    pub(super) fn or(&mut self, state: &mut State, x: Reg, y: Reg) {
        state.v[x] |= state.v[y];
        if self.flags.quirks.vf_reset {
            state.v[0xf] = 0;
        }
    }
    /// |`8xy2`| Performs bitwise and of vX and vY, and stores the result in vX
    ///
    /// # Quirk
    /// The original chip-8 interpreter clobbers vF after any bitwise operation
    #[inline(always)]
    pub(super) fn and(&mut self, state: &mut State, x: Reg, y: Reg) {
        state.v[x] &= state.v[y];
        if self.flags.quirks.vf_reset {
            state.v[0xf] = 0;
        }
    }
    /// |`8xy3`| Performs bitwise xor of vX and vY, and stores the result in vX
    ///
    /// # Quirk
    /// The original chip-8 interpreter clobbers vF after any bitwise operation
    #[inline(always)]
    pub(super) fn xor(&mut self, state: &mut State, x: Reg, y: Reg) {
        state.v[x] ^= state.v[y];
        if self.flags.quirks.vf_reset {
            state.v[0xf] = 0;
        }
    }
    /// |`8xy4`| Performs addition of vX and vY, and stores the result in vX
    #[inline(always)]
    pub(super) fn add(&mut self, state: &mut State, x: Reg, y: Reg) {
        let carry;
        (state.v[x], carry) = state.v[x].overflowing_add(state.v[y]);
        state.v[0xf] = carry.into();
    }
    /// |`8xy5`| Performs subtraction of vX and vY, and stores the result in vX
    #[inline(always)]
    pub(super) fn sub(&mut self, state: &mut State, x: Reg, y: Reg) {
        let borrow;
        (state.v[x], borrow) = state.v[x].overflowing_sub(state.v[y]);
        state.v[0xf] = (!borrow).into();
    }
    /// |`8xy6`| Performs bitwise right shift of vX
    ///
    /// # Quirk
    /// On the original chip-8 interpreter, this shifts vY and stores the result in vX
    #[inline(always)]
    pub(super) fn shift_right(&mut self, state: &mut State, x: Reg, y: Reg) {
        let src: Reg = if self.flags.quirks.shift { y } else { x };
        let shift_out = state.v[src] & 1;
        state.v[x] = state.v[src] >> 1;
        state.v[0xf] = shift_out;
    }
    /// |`8xy7`| Performs subtraction of vY and vX, and stores the result in vX
    #[inline(always)]
    pub(super) fn backwards_sub(&mut self, state: &mut State, x: Reg, y: Reg) {
        let borrow;
        (state.v[x], borrow) = state.v[y].overflowing_sub(state.v[x]);
        state.v[0xf] = (!borrow).into();
    }
    /// |`8xyE`| Performs bitwise left shift of vX
    ///
    /// # Quirk
    /// On the original chip-8 interpreter, this shifts vY and stores the result in vX
    #[inline(always)]
    pub(super) fn shift_left(&mut self, state: &mut State, x: Reg, y: Reg) {
        let src: Reg = if self.flags.quirks.shift { y } else { x };
        let shift_out: u8 = state.v[src] >> 7;
        state.v[x] = state.v[src] << 1;
        state.v[0xf] = shift_out;
    }
}

/// |`9xyn`| Performs a register-register comparison
///
/// |opcode| effect                             |
/// |------|------------------------------------|
/// |`9XY0`| Skip next instruction if vX != vY  |
impl CPU {
    /// |`9xy0`| Skip next instruction if X != y
    #[inline(always)]
    pub(super) fn skip_not_equals(&mut self, state: &mut State, x: Reg, y: Reg) {
        if state.v[x] != state.v[y] {
            state.pc = state.pc.wrapping_add(2);
        }
    }
}

/// |`Aaaa`| Load address #a into register I
impl CPU {
    /// |`Aadr`| Load address #adr into register I
    #[inline(always)]
    pub(super) fn load_i_immediate(&mut self, state: &mut State, a: Adr) {
        state.i = a;
    }
}

/// |`Baaa`| Jump to &adr + v0
impl CPU {
    /// |`Badr`| Jump to &adr + v0
    ///
    /// The target wraps at the end of memory.
    #[inline(always)]
    pub(super) fn jump_indexed(&mut self, state: &mut State, a: Adr) {
        state.pc = a.wrapping_add(state.v[0] as Adr) & ADDR_MASK;
    }
}

/// |`Cxbb`| Stores a random number & the provided byte into vX
impl CPU {
    /// |`Cxbb`| Stores a random number & the provided byte into vX
    #[inline(always)]
    pub(super) fn rand(&mut self, state: &mut State, x: Reg, b: u8) {
        state.v[x] = random::<u8>() & b;
    }
}

/// |`Dxyn`| Draws n-byte sprite to the screen at coordinates (vX, vY)
impl CPU {
    /// |`Dxyn`| Draws n-byte sprite to the screen at coordinates (vX, vY)
    ///
    /// The starting position wraps. After that, columns wrap around the right
    /// edge and rows past the bottom edge are clipped.
    #[inline(always)]
    pub(super) fn draw(&mut self, state: &mut State, x: Reg, y: Reg, n: Nib) {
        let (x, y) = (state.v[x] as usize % WIDTH, state.v[y] as usize % HEIGHT);
        let mut collided = false;
        for line in 0..(n as usize).min(HEIGHT - y) {
            let addr = (state.i as usize + line) & ADDR_MASK as usize;
            collided |= state.screen.xor_row(x, y + line, state.mem[addr]);
        }
        state.v[0xf] = collided.into();
    }
}

/// |`Exbb`| Skips instruction on value of keypress
///
/// |opcode| effect                             |
/// |------|------------------------------------|
/// |`eX9e`| Skip next instruction if key == vX |
/// |`eXa1`| Skip next instruction if key != vX |
impl CPU {
    /// |`Ex9E`| Skip next instruction if key vX is held
    #[inline(always)]
    pub(super) fn skip_key_equals(&mut self, state: &mut State, x: Reg) {
        if state.keys[state.v[x] as usize & 0xf] {
            state.pc = state.pc.wrapping_add(2);
        }
    }
    /// |`ExA1`| Skip next instruction if key vX is not held
    #[inline(always)]
    pub(super) fn skip_key_not_equals(&mut self, state: &mut State, x: Reg) {
        if !state.keys[state.v[x] as usize & 0xf] {
            state.pc = state.pc.wrapping_add(2);
        }
    }
}

/// |`Fxbb`| Performs IO
///
/// |opcode| effect                             |
/// |------|------------------------------------|
/// |`fX07`| Set vX to value in delay timer     |
/// |`fX0a`| Wait for input, store key in vX    |
/// |`fX15`| Set delay timer to the value in vX |
/// |`fX18`| Set sound timer to the value in vX |
/// |`fX1e`| Add vX to I                        |
/// |`fX29`| Load sprite for character x into I |
/// |`fX33`| BCD convert X into I[0..3]         |
/// |`fX55`| DMA Stor from I to registers 0..=X |
/// |`fX65`| DMA Load from I to registers 0..=X |
impl CPU {
    /// |`Fx07`| Get the current DT, and put it in vX
    /// ```py
    /// vX = DT
    /// ```
    #[inline(always)]
    pub(super) fn load_delay_timer(&mut self, state: &mut State, x: Reg) {
        state.v[x] = state.delay;
    }
    /// |`Fx0A`| Wait for key, then vX = K
    ///
    /// If no key is held, parks the program counter on this instruction and
    /// suspends. [CPU::step] finishes the instruction once a key is held.
    #[inline(always)]
    pub(super) fn wait_for_key(&mut self, state: &mut State, x: Reg) {
        match Self::held_key(state) {
            Some(key) => state.v[x] = key,
            None => {
                state.pc = state.pc.wrapping_sub(2);
                state.keywait = Some(x);
            }
        }
    }
    /// Re-checks the keys for a suspended |`Fx0A`|
    #[inline(always)]
    pub(super) fn resume_wait_for_key(&mut self, state: &mut State, x: Reg) {
        if let Some(key) = Self::held_key(state) {
            state.v[x] = key;
            state.pc = state.pc.wrapping_add(2);
            state.keywait = None;
        }
    }
    /// Gets the lowest-numbered key that's held, if any
    fn held_key(state: &State) -> Option<u8> {
        state.keys.iter().position(|&held| held).map(|key| key as u8)
    }
    /// |`Fx15`| Load vX into DT
    /// ```py
    /// DT = vX
    /// ```
    #[inline(always)]
    pub(super) fn store_delay_timer(&mut self, state: &mut State, x: Reg) {
        state.delay = state.v[x];
    }
    /// |`Fx18`| Load vX into ST
    /// ```py
    /// ST = vX;
    /// ```
    #[inline(always)]
    pub(super) fn store_sound_timer(&mut self, state: &mut State, x: Reg) {
        state.sound = state.v[x];
    }
    /// |`Fx1e`| Add vX to I, wrapping at the end of memory
    /// ```py
    /// I = (I + vX) % 0x1000;
    /// ```
    #[inline(always)]
    pub(super) fn add_i(&mut self, state: &mut State, x: Reg) {
        state.i = state.i.wrapping_add(state.v[x] as Adr) & ADDR_MASK;
    }
    /// |`Fx29`| Load sprite for character x into I
    /// ```py
    /// I = sprite(X);
    /// ```
    #[inline(always)]
    pub(super) fn load_sprite(&mut self, state: &mut State, x: Reg) {
        state.i = glyph_addr(state.v[x]);
    }
    /// |`Fx33`| BCD convert X into I`[0..3]`
    #[inline(always)]
    pub(super) fn bcd_convert(&mut self, state: &mut State, x: Reg) {
        let x = state.v[x];
        for (offset, digit) in [x / 100, x / 10 % 10, x % 10].into_iter().enumerate() {
            state.mem[Self::wrap(state.i, offset)] = digit;
        }
    }
    /// |`Fx55`| DMA Stor from I to registers 0..=X
    ///
    /// # Quirk
    /// The original chip-8 interpreter uses I to directly index memory,
    /// with the side effect of leaving I as I+X+1 after the transfer is done.
    #[inline(always)]
    pub(super) fn store_dma(&mut self, state: &mut State, x: Reg) {
        for reg in 0..=x {
            state.mem[Self::wrap(state.i, reg)] = state.v[reg];
        }
        if self.flags.quirks.dma_inc {
            state.i = Self::wrap(state.i, x + 1) as Adr;
        }
    }
    /// |`Fx65`| DMA Load from I to registers 0..=X
    ///
    /// # Quirk
    /// The original chip-8 interpreter uses I to directly index memory,
    /// with the side effect of leaving I as I+X+1 after the transfer is done.
    #[inline(always)]
    pub(super) fn load_dma(&mut self, state: &mut State, x: Reg) {
        for reg in 0..=x {
            state.v[reg] = state.mem[Self::wrap(state.i, reg)];
        }
        if self.flags.quirks.dma_inc {
            state.i = Self::wrap(state.i, x + 1) as Adr;
        }
    }
    /// Offsets `addr`, wrapping at the end of memory
    #[inline(always)]
    fn wrap(addr: Adr, offset: usize) -> usize {
        (addr as usize + offset) & ADDR_MASK as usize
    }
}
