//! `skin.ini` reader for the `[Mania]` section.

/// Layout values read from a custom skin, in 480-high coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ManiaIni {
    pub hit_position: f32,
    pub score_position: f32,
    pub combo_position: f32,
    pub column_width: f32,
}

impl Default for ManiaIni {
    fn default() -> Self {
        Self {
            hit_position: 402.0,
            score_position: 325.0,
            combo_position: 111.0,
            column_width: 30.0,
        }
    }
}

impl ManiaIni {
    /// Parses `skin.ini` text. Unknown keys and bad values keep their defaults.
    pub fn parse(content: &str) -> Self {
        let mut ini = Self::default();
        let mut section = "";

        for line in content.lines().map(str::trim) {
            if line.is_empty() || line.starts_with("//") {
                continue;
            }
            if let Some(name) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
                section = name;
                continue;
            }
            if section != "Mania" {
                continue;
            }

            let Some((key, value)) = line.split_once(':') else {
                continue;
            };
            let value = value.trim();

            match key.trim() {
                "HitPosition" => set_number(&mut ini.hit_position, value),
                "ScorePosition" => set_number(&mut ini.score_position, value),
                "ComboPosition" => set_number(&mut ini.combo_position, value),
                // Per-column widths; only the first one is used.
                "ColumnWidth" => {
                    if let Some(first) = value.split(',').next() {
                        set_number(&mut ini.column_width, first.trim());
                    }
                }
                _ => {}
            }
        }

        ini
    }
}

fn set_number(target: &mut f32, value: &str) {
    if let Ok(n) = value.parse::<f32>() {
        *target = n;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_mania_section_only() {
        let ini = ManiaIni::parse(
            "[General]\r\nHitPosition: 10\r\n\r\n[Mania]\r\nKeys: 4\r\n// comment\r\nHitPosition: 420\r\nColumnWidth: 40,42,42,40\r\nComboPosition: bad\r\n",
        );
        assert_eq!(ini.hit_position, 420.0);
        assert_eq!(ini.column_width, 40.0);
        assert_eq!(ini.combo_position, 111.0);
        assert_eq!(ini.score_position, 325.0);
    }

    #[test]
    fn empty_file_gives_defaults() {
        assert_eq!(ManiaIni::parse(""), ManiaIni::default());
    }
}
