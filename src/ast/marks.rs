use serde::{Deserialize, Serialize};

/// Numbering style of an ordered list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ListStyle {
    #[default]
    Decimal,
    LowerAlpha,
    UpperAlpha,
    LowerRoman,
    UpperRoman,
}

/// Largest ordinal written in roman numerals; anything above is decimal.
const MAX_ROMAN: usize = 3999;

impl ListStyle {
    /// Formats a 1-based ordinal. Zero falls back to decimal since the
    /// alphabetic and roman systems have no digit for it, as do ordinals
    /// above [`MAX_ROMAN`] for the roman styles.
    pub fn format(self, n: usize) -> String {
        if n == 0 {
            return "0".to_string();
        }
        match self {
            ListStyle::Decimal => n.to_string(),
            ListStyle::LowerRoman | ListStyle::UpperRoman if n > MAX_ROMAN => n.to_string(),
            ListStyle::LowerAlpha => alpha(n),
            ListStyle::UpperAlpha => alpha(n).to_ascii_uppercase(),
            ListStyle::LowerRoman => roman(n),
            ListStyle::UpperRoman => roman(n).to_ascii_uppercase(),
        }
    }
}

// bijective base-26: a..z, aa..az, ...
fn alpha(mut n: usize) -> String {
    let mut out = Vec::new();
    while n > 0 {
        n -= 1;
        out.push(b'a' + (n % 26) as u8);
        n /= 26;
    }
    out.reverse();
    String::from_utf8_lossy(&out).into_owned()
}

fn roman(mut n: usize) -> String {
    const TABLE: [(usize, &str); 13] = [
        (1000, "m"),
        (900, "cm"),
        (500, "d"),
        (400, "cd"),
        (100, "c"),
        (90, "xc"),
        (50, "l"),
        (40, "xl"),
        (10, "x"),
        (9, "ix"),
        (5, "v"),
        (4, "iv"),
        (1, "i"),
    ];
    let mut out = String::new();
    for (value, digits) in TABLE {
        while n >= value {
            out.push_str(digits);
            n -= value;
        }
    }
    out
}

/// Typographic symbols produced by the parser's smart punctuation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TypographicSymbol {
    Mdash,
    Ndash,
    Hellip,
    Laquo,
    Raquo,
    LaquoSpace,
    RaquoSpace,
}

impl TypographicSymbol {
    pub fn ascii(self) -> &'static str {
        match self {
            TypographicSymbol::Mdash => "---",
            TypographicSymbol::Ndash => "--",
            TypographicSymbol::Hellip => "...",
            TypographicSymbol::Laquo => "<<",
            TypographicSymbol::Raquo => ">>",
            TypographicSymbol::LaquoSpace => "<< ",
            TypographicSymbol::RaquoSpace => " >>",
        }
    }
}

/// Curly quotes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SmartQuote {
    Lsquo,
    Rsquo,
    Ldquo,
    Rdquo,
}

impl SmartQuote {
    pub fn ascii(self) -> &'static str {
        match self {
            SmartQuote::Lsquo | SmartQuote::Rsquo => "'",
            SmartQuote::Ldquo | SmartQuote::Rdquo => "\"",
        }
    }
}
