//! Legacy flattened strings with inline format codes.
//!
//! A color code resets all decorations, `r` resets everything, and RGB
//! colors use the `§x§r§r§g§g§b§b` form when the host supports them. Only
//! what fits inline survives encoding: tree structure and explicit `false`
//! decorations are dropped, and so is any literal marker in the content that
//! would read back as a code.

use super::{Decoration, NamedColor, RichText, Style, TextColor};

const RESET: char = 'r';
const HEX_PREFIX: char = 'x';

/// Converts [`RichText`] to and from legacy formatted strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LegacyTextCodec {
    marker: char,
    hex_colors: bool,
}

impl Default for LegacyTextCodec {
    fn default() -> Self {
        Self::section()
    }
}

/// Formatting state that can be expressed inline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
struct InlineState {
    color: Option<TextColor>,
    decorations: [bool; 5],
}

impl InlineState {
    fn from_style(style: &Style, hex_colors: bool) -> Self {
        let color = style
            .color()
            .map(|c| if hex_colors { c } else { c.downsample() });
        let mut decorations = [false; 5];
        for (slot, decoration) in decorations.iter_mut().zip(Decoration::ALL) {
            *slot = style.decoration(decoration) == Some(true);
        }
        Self { color, decorations }
    }

    fn extends(&self, previous: &InlineState) -> bool {
        self.color == previous.color
            && previous
                .decorations
                .iter()
                .zip(self.decorations)
                .all(|(before, now)| !*before || now)
    }

    fn to_style(self) -> Style {
        let mut style = Style::default();
        style.set_color(self.color);
        for (active, decoration) in self.decorations.iter().zip(Decoration::ALL) {
            if *active {
                style.set_decoration(decoration, Some(true));
            }
        }
        style
    }
}

impl LegacyTextCodec {
    /// Codec using the section sign, without RGB colors.
    pub fn section() -> Self {
        Self {
            marker: '§',
            hex_colors: false,
        }
    }

    /// Codec using `&`, the form people type in configuration files.
    pub fn ampersand() -> Self {
        Self {
            marker: '&',
            hex_colors: false,
        }
    }

    pub fn with_hex_colors(mut self, hex_colors: bool) -> Self {
        self.hex_colors = hex_colors;
        self
    }

    pub fn marker(&self) -> char {
        self.marker
    }

    pub fn serialize(&self, text: &RichText) -> String {
        let mut out = String::new();
        let mut current = InlineState::default();
        for (content, style) in text.flatten() {
            let next = InlineState::from_style(&style, self.hex_colors);
            if next != current {
                if next.extends(&current) {
                    for (index, decoration) in Decoration::ALL.iter().enumerate() {
                        if next.decorations[index] && !current.decorations[index] {
                            self.push_code(&mut out, decoration.legacy_code());
                        }
                    }
                } else {
                    match next.color {
                        Some(color) => self.push_color(&mut out, color),
                        None => self.push_code(&mut out, RESET),
                    }
                    for (index, decoration) in Decoration::ALL.iter().enumerate() {
                        if next.decorations[index] {
                            self.push_code(&mut out, decoration.legacy_code());
                        }
                    }
                }
                current = next;
            }
            self.push_content(&mut out, content);
        }
        out
    }

    /// Appends run content. Markers directly before a code character are
    /// dropped, including ones left at the end of the previous run.
    fn push_content(&self, out: &mut String, content: &str) {
        for c in content.chars() {
            if self.is_code(c) {
                while out.ends_with(self.marker) {
                    out.pop();
                }
            }
            out.push(c);
        }
    }

    fn is_code(&self, c: char) -> bool {
        let c = c.to_ascii_lowercase();
        c.is_ascii_hexdigit()
            || c == RESET
            || c == HEX_PREFIX
            || Decoration::from_legacy_code(c).is_some()
    }

    fn push_code(&self, out: &mut String, code: char) {
        out.push(self.marker);
        out.push(code);
    }

    fn push_color(&self, out: &mut String, color: TextColor) {
        match color {
            TextColor::Named(named) => self.push_code(out, named.code()),
            TextColor::Rgb(_) => {
                self.push_code(out, HEX_PREFIX);
                for digit in format!("{:06x}", color.rgb()).chars() {
                    self.push_code(out, digit);
                }
            }
        }
    }

    /// Rebuilds inline formatting. A single unformatted run comes back as a
    /// plain node; anything else becomes an empty root with one child per run.
    pub fn deserialize(&self, input: &str) -> RichText {
        let chars: Vec<char> = input.chars().collect();
        let mut runs: Vec<(String, InlineState)> = Vec::new();
        let mut buffer = String::new();
        let mut state = InlineState::default();
        let mut i = 0;

        while i < chars.len() {
            if chars[i] == self.marker && i + 1 < chars.len() {
                let code = chars[i + 1];
                let next = if let Some((color, consumed)) = self.read_hex(&chars, i) {
                    i += consumed;
                    Some(InlineState {
                        color: Some(color),
                        decorations: [false; 5],
                    })
                } else if let Some(named) = NamedColor::from_code(code) {
                    i += 2;
                    Some(InlineState {
                        color: Some(TextColor::Named(named)),
                        decorations: [false; 5],
                    })
                } else if let Some(decoration) = Decoration::from_legacy_code(code) {
                    i += 2;
                    let mut next = state;
                    next.decorations[Decoration::ALL
                        .iter()
                        .position(|d| *d == decoration)
                        .unwrap_or(0)] = true;
                    Some(next)
                } else if code.to_ascii_lowercase() == RESET {
                    i += 2;
                    Some(InlineState::default())
                } else {
                    None
                };

                if let Some(next) = next {
                    if !buffer.is_empty() {
                        runs.push((std::mem::take(&mut buffer), state));
                    }
                    state = next;
                    continue;
                }
            }
            buffer.push(chars[i]);
            i += 1;
        }
        if !buffer.is_empty() {
            runs.push((buffer, state));
        }

        match runs.len() {
            0 => RichText::empty(),
            1 if runs[0].1 == InlineState::default() => RichText::text(runs.remove(0).0),
            _ => runs.into_iter().fold(RichText::empty(), |root, (content, state)| {
                root.append(RichText::text(content).with_style(state.to_style()))
            }),
        }
    }

    /// Reads `§x§r§r§g§g§b§b` starting at `start`, returning the color and
    /// the number of chars consumed.
    fn read_hex(&self, chars: &[char], start: usize) -> Option<(TextColor, usize)> {
        const LEN: usize = 14;
        if chars.get(start + 1).map(|c| c.to_ascii_lowercase()) != Some(HEX_PREFIX) {
            return None;
        }
        if start + LEN > chars.len() {
            return None;
        }
        let mut hex = String::with_capacity(6);
        for pair in chars[start + 2..start + LEN].chunks(2) {
            if pair[0] != self.marker || !pair[1].is_ascii_hexdigit() {
                return None;
            }
            hex.push(pair[1]);
        }
        u32::from_str_radix(&hex, 16)
            .ok()
            .map(|rgb| (TextColor::Rgb(rgb), LEN))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn legacy() -> LegacyTextCodec {
        LegacyTextCodec::section()
    }

    #[test]
    fn test_serializes_color_then_decorations() {
        let text = RichText::text("Hi")
            .color(NamedColor::Red)
            .decorate(Decoration::Bold)
            .append(RichText::text("!").decorate(Decoration::Italic));
        assert_eq!(legacy().serialize(&text), "§c§lHi§o!");
    }

    #[test]
    fn test_reset_when_decoration_is_removed() {
        let text = RichText::empty()
            .append(RichText::text("a").decorate(Decoration::Bold))
            .append(RichText::text("b"));
        assert_eq!(legacy().serialize(&text), "§la§rb");
    }

    #[test]
    fn test_plain_string_decodes_to_plain_node() {
        assert_eq!(legacy().deserialize("plain"), RichText::text("plain"));
        assert_eq!(legacy().deserialize(""), RichText::empty());
    }

    #[test]
    fn test_decodes_runs_with_styles() {
        let text = legacy().deserialize("§6Gold §lbold§rplain");
        let runs = text.flatten();
        assert_eq!(runs.len(), 3);
        assert_eq!(runs[0].1.color(), Some(TextColor::Named(NamedColor::Gold)));
        assert_eq!(runs[1].1.decoration(Decoration::Bold), Some(true));
        assert_eq!(runs[2].1, Style::default());
    }

    #[test]
    fn test_unknown_codes_stay_literal() {
        assert_eq!(legacy().deserialize("§zab"), RichText::text("§zab"));
    }

    #[test]
    fn test_hex_colors_only_when_enabled() {
        let text = RichText::text("x").color(TextColor::Rgb(0xff5656));
        assert_eq!(legacy().serialize(&text), "§cx");

        let hex = legacy().with_hex_colors(true);
        let encoded = hex.serialize(&text);
        assert_eq!(encoded, "§x§f§f§5§6§5§6x");
        assert_eq!(hex.serialize(&hex.deserialize(&encoded)), encoded);
    }

    #[test]
    fn test_second_pass_is_stable() {
        let text = RichText::text("Title")
            .color(TextColor::Rgb(0x1234ee))
            .decorate(Decoration::Underlined)
            .append(RichText::text(" sub").decoration(Decoration::Underlined, Some(false)))
            .append(RichText::text(" end").color(NamedColor::Green));
        let once = legacy().serialize(&text);
        let twice = legacy().serialize(&legacy().deserialize(&once));
        assert_eq!(once, twice);
    }

    #[test]
    fn test_literal_markers_do_not_become_codes() {
        let stable = |text: RichText| {
            let once = legacy().serialize(&text);
            let twice = legacy().serialize(&legacy().deserialize(&once));
            assert_eq!(once, twice, "unstable encoding of {:?}", text);
            once
        };
        assert_eq!(stable(RichText::text("Hi§r")), "Hir");
        assert_eq!(stable(RichText::text("§rX")), "rX");
        assert_eq!(stable(RichText::text("Hi§c")), "Hic");
        assert_eq!(stable(RichText::text("a§§rb")), "arb");
        assert_eq!(
            stable(RichText::empty().append(RichText::text("x§")).append(RichText::text("l"))),
            "xl"
        );
        assert_eq!(stable(RichText::text("5 § 3 and §z")), "5 § 3 and §z");
        assert_eq!(
            stable(RichText::text("a§").append(RichText::text("b").color(NamedColor::Red))),
            "a§§cb"
        );
    }

    #[test]
    fn test_ampersand_marker() {
        let text = LegacyTextCodec::ampersand().deserialize("&aok");
        assert_eq!(LegacyTextCodec::section().serialize(&text), "§aok");
    }
}
