/// Maps the icon names a provider suggests for insights onto terminal glyphs.
///
/// Unknown names fall back to a light bulb. With glyphs disabled every
/// lookup yields a short ASCII tag instead.
#[derive(Debug, Clone, Copy)]
pub struct IconSet {
    use_glyphs: bool,
}

const GLYPHS: &[(&str, &str, &str)] = &[
    ("trendingup", "📈", "[^]"),
    ("trendingdown", "📉", "[v]"),
    ("zap", "⚡", "[!]"),
    ("globe", "🌐", "[o]"),
    ("users", "👥", "[u]"),
    ("shield", "🛡", "[s]"),
    ("target", "🎯", "[t]"),
    ("lightbulb", "💡", "[*]"),
    ("dollarsign", "💲", "[$]"),
    ("cpu", "🖥", "[c]"),
    ("leaf", "🌿", "[l]"),
    ("rocket", "🚀", "[r]"),
    ("barchart", "📊", "[#]"),
    ("building", "🏢", "[b]"),
    ("truck", "🚚", "[>]"),
    ("lock", "🔒", "[L]"),
];

const FALLBACK: (&str, &str) = ("💡", "[*]");

impl IconSet {
    pub fn new(use_glyphs: bool) -> Self {
        Self { use_glyphs }
    }

    /// Glyph for a provider icon name such as "TrendingUp" or "bar-chart-3"
    pub fn for_key(&self, key: &str) -> &'static str {
        let normalised: String = key
            .chars()
            .filter(|c| c.is_ascii_alphabetic())
            .map(|c| c.to_ascii_lowercase())
            .collect();

        let (glyph, ascii) = GLYPHS
            .iter()
            .find(|(name, _, _)| *name == normalised)
            .map(|(_, glyph, ascii)| (*glyph, *ascii))
            .unwrap_or(FALLBACK);

        if self.use_glyphs {
            glyph
        } else {
            ascii
        }
    }

    pub fn check(&self) -> &'static str {
        if self.use_glyphs {
            "✓"
        } else {
            "+"
        }
    }

    pub fn cross(&self) -> &'static str {
        if self.use_glyphs {
            "✗"
        } else {
            "x"
        }
    }

    pub fn trophy(&self) -> &'static str {
        if self.use_glyphs {
            "🏆"
        } else {
            "***"
        }
    }
}

impl Default for IconSet {
    fn default() -> Self {
        Self::new(true)
    }
}
