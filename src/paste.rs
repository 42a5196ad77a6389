use anyhow::{bail, Result};

use crate::basis::{Channel, Color, MAX_CHANNEL};

/// ゲーム画面からコピーした色の文字列を読む.
///
/// `R123 G45 B200` のようにラベル付き (大文字小文字は問わず, `:` か `=` を挟んでもよい) か,
/// `100,100,100` のように空白かカンマで区切った三つの数. 上限を超えた値は上限に丸める.
pub fn parse_color(text: &str) -> Result<Color> {
    let labeled = parse_labeled(text);
    let channels = if labeled.iter().any(Option::is_some) {
        let mut channels = [0; 3];
        for (channel, value) in Channel::ALL.iter().zip(labeled.iter()) {
            match value {
                Some(v) => channels[channel.index()] = *v,
                None => bail!("channel {:?} is missing in {:?}", channel, text),
            }
        }
        channels
    } else {
        parse_bare(text)?
    };

    Ok(Color::new(channels[0], channels[1], channels[2]))
}

fn parse_labeled(text: &str) -> [Option<u16>; 3] {
    let chars = text.chars().collect::<Vec<_>>();
    let mut found = [None; 3];

    for (start, c) in chars.iter().enumerate() {
        let channel = match c.to_ascii_uppercase() {
            'R' => Channel::R,
            'G' => Channel::G,
            'B' => Channel::B,
            _ => continue,
        };
        if found[channel.index()].is_some() {
            continue;
        }

        let mut rest = chars[start + 1..].iter().copied().peekable();
        while rest.next_if(|c| c.is_whitespace()).is_some() {}
        rest.next_if(|&c| c == ':' || c == '=');
        while rest.next_if(|c| c.is_whitespace()).is_some() {}

        let mut digits = String::new();
        while let Some(d) = rest.next_if(char::is_ascii_digit) {
            digits.push(d);
        }
        if !digits.is_empty() {
            found[channel.index()] = Some(clamp(&digits));
        }
    }

    found
}

fn parse_bare(text: &str) -> Result<[u16; 3]> {
    let tokens = text
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>();

    if tokens.len() != 3 {
        bail!("expected three values, but found {} in {:?}", tokens.len(), text);
    }

    let mut channels = [0; 3];
    for (slot, token) in channels.iter_mut().zip(tokens) {
        if !token.chars().all(|c| c.is_ascii_digit()) {
            bail!("failed to parse {:?} as a channel value", token);
        }
        *slot = clamp(token);
    }
    Ok(channels)
}

/// 数字だけの文字列を上限に丸めて読む. 桁が多すぎても上限になる.
fn clamp(digits: &str) -> u16 {
    digits
        .parse::<u64>()
        .map_or(MAX_CHANNEL, |v| v.min(MAX_CHANNEL as u64) as u16)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labeled() {
        assert_eq!(parse_color("R123 G45 B200").unwrap(), Color::new(123, 45, 200));
        assert_eq!(parse_color("r:1 g=2 b 3").unwrap(), Color::new(1, 2, 3));
        assert_eq!(parse_color("B = 9, G: 8, R7").unwrap(), Color::new(7, 8, 9));
        assert_eq!(parse_color("R999 G450 B0").unwrap(), Color::new(450, 450, 0));
    }

    #[test]
    fn test_bare() {
        assert_eq!(parse_color("100,100,100").unwrap(), Color::new(100, 100, 100));
        assert_eq!(parse_color(" 1 2  3 ").unwrap(), Color::new(1, 2, 3));
        assert_eq!(parse_color("10, 20, 99999999999999999999").unwrap(), Color::new(10, 20, 450));
    }

    #[test]
    fn test_missing_channel() {
        let err = parse_color("R10 G20").unwrap_err();
        assert!(err.to_string().contains("missing"));
        assert!(parse_color("10 20").is_err());
        assert!(parse_color("10 20 x").is_err());
        assert!(parse_color("").is_err());
    }
}
