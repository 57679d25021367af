use anyhow::{anyhow, Context};

/// Accepts `U+4E2D`, `0x4e2d`, a decimal number or a single character.
pub fn parse(input: &str) -> anyhow::Result<u32> {
    let hex = input
        .strip_prefix("U+")
        .or_else(|| input.strip_prefix("u+"))
        .or_else(|| input.strip_prefix("0x"));
    if let Some(hex) = hex {
        return u32::from_str_radix(hex, 16)
            .with_context(|| format!("{} is not a hexadecimal code point", input));
    }

    let mut chars = input.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if !c.is_ascii_digit() => Ok(c as u32),
        (Some(_), _) => input
            .parse()
            .with_context(|| format!("{} is not a code point", input)),
        (None, _) => Err(anyhow!("empty code point")),
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn code_point_forms() {
        assert_eq!(parse("U+4E2D").unwrap(), 0x4E2D);
        assert_eq!(parse("0x41").unwrap(), 0x41);
        assert_eq!(parse("65").unwrap(), 65);
        assert_eq!(parse("7").unwrap(), 7);
        assert_eq!(parse("A").unwrap(), 0x41);
        assert_eq!(parse("中").unwrap(), 0x4E2D);
        assert!(parse("").is_err());
        assert!(parse("U+XYZ").is_err());
        assert!(parse("AB").is_err());
    }
}
