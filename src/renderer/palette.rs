//! NES-style palette (`0xRRGGBB`)

pub const BLACK: u32 = 0x000000;
pub const WHITE: u32 = 0xFCFCFC;
pub const SKY: u32 = 0x5C94FC;

pub const MARIO_RED: u32 = 0xD82800;
pub const MARIO_TAN: u32 = 0xFC9838;
pub const MARIO_BROWN: u32 = 0x881400;

pub const BRICK: u32 = 0xAC5024;
pub const BRICK_DARK: u32 = 0x781400;
pub const QUESTION: u32 = 0xFC9838;
pub const QUESTION_DARK: u32 = 0xC87414;
pub const GROUND: u32 = 0xC84C0C;
pub const GROUND_DARK: u32 = 0x881400;
pub const PIPE: u32 = 0x00A800;
pub const PIPE_LIGHT: u32 = 0x00E400;
pub const PIPE_DARK: u32 = 0x006C00;
pub const CASTLE_GRAY: u32 = 0xBCBCBC;
pub const CASTLE_DARK: u32 = 0x747474;

pub const GOOMBA: u32 = 0xAC5024;
pub const KOOPA_GREEN: u32 = 0x00A800;
pub const KOOPA_RED: u32 = 0xD82800;
pub const HAMMER_BRO: u32 = 0x00A800;
pub const COIN: u32 = 0xFCBC3C;
