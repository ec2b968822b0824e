use anyhow::{anyhow, Context, Result};

/// Parses a 32-bit seed or PID, decimal or `0x`-prefixed hex.
pub fn parse_seed(seed: &str) -> Result<u32> {
    let s = seed.trim();
    if s.is_empty() {
        return Err(anyhow!("empty seed"));
    }
    if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        u32::from_str_radix(hex, 16).with_context(|| format!("invalid hex seed: {s}"))
    } else {
        s.parse::<u32>()
            .with_context(|| format!("invalid decimal seed: {s}"))
    }
}

/// Parses a 16-bit trainer ID or draw value in the same notations as [`parse_seed`].
pub fn parse_u16(value: &str) -> Result<u16> {
    let wide = parse_seed(value)?;
    u16::try_from(wide).map_err(|_| anyhow!("value out of 16-bit range: {}", value.trim()))
}

pub fn seed_to_hex(seed: u32) -> String {
    format!("0x{seed:08x}")
}
