use anyhow::{anyhow, Context, Result};
use std::fs;
use std::path::Path;

/// Accepts decimal or `0x`-prefixed hex.
pub fn parse_seed(seed: &str) -> Result<u32> {
    let s = seed.trim();
    if s.is_empty() {
        return Err(anyhow!("empty seed"));
    }
    match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => {
            let digits = hex.replace('_', "");
            u32::from_str_radix(&digits, 16).with_context(|| format!("invalid hex seed: {s}"))
        }
        None => s
            .replace('_', "")
            .parse::<u32>()
            .with_context(|| format!("invalid decimal seed: {s}")),
    }
}

pub fn seed_to_hex(seed: u32) -> String {
    format!("0x{seed:08x}")
}

pub fn parse_seed_csv(input: &str) -> Result<Vec<u32>> {
    let seeds = input
        .split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(parse_seed)
        .collect::<Result<Vec<_>>>()?;
    if seeds.is_empty() {
        return Err(anyhow!("no seeds parsed from --seeds"));
    }
    Ok(seeds)
}

/// One seed per line; blank lines and `#` comments are skipped.
pub fn parse_seed_file(path: &Path) -> Result<Vec<u32>> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("failed reading seed file {}", path.display()))?;
    let seeds = data
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(parse_seed)
        .collect::<Result<Vec<_>>>()?;
    if seeds.is_empty() {
        return Err(anyhow!("seed file {} had no seeds", path.display()));
    }
    Ok(seeds)
}

/// `count` consecutive seeds from `start`, wrapping at `u32::MAX`.
pub fn seed_range(start: u32, count: u32) -> Vec<u32> {
    (0..count).map(|offset| start.wrapping_add(offset)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_decimal_and_hex() {
        assert_eq!(parse_seed("42").unwrap(), 42);
        assert_eq!(parse_seed(" 0xDEAD_BEEF ").unwrap(), 0xDEAD_BEEF);
        assert_eq!(parse_seed("0X10").unwrap(), 16);
        assert!(parse_seed("").is_err());
        assert!(parse_seed("0xZZ").is_err());
    }

    #[test]
    fn csv_skips_blanks() {
        assert_eq!(parse_seed_csv("1, ,0x2,").unwrap(), vec![1, 2]);
        assert!(parse_seed_csv(" , ").is_err());
    }

    #[test]
    fn seed_file_skips_comments() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("seeds.txt");
        fs::write(&path, "# smoke\n7\n\n0x0a\n")?;
        assert_eq!(parse_seed_file(&path)?, vec![7, 10]);
        Ok(())
    }

    #[test]
    fn seed_range_wraps() {
        assert_eq!(seed_range(u32::MAX, 2), vec![u32::MAX, 0]);
        assert_eq!(seed_to_hex(0xab), "0x000000ab");
    }
}
