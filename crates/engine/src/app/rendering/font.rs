pub(crate) const GLYPH_WIDTH: i32 = 5;
pub(crate) const GLYPH_HEIGHT: i32 = 7;
const GLYPH_SPACING: i32 = 1;
const LINE_SPACING: i32 = 3;

pub(crate) const fn glyph_advance(scale: i32) -> i32 {
    (GLYPH_WIDTH + GLYPH_SPACING) * scale
}

pub(crate) const fn line_advance(scale: i32) -> i32 {
    (GLYPH_HEIGHT + LINE_SPACING) * scale
}

/// Pixel width of a single line of `text`, trailing spacing excluded.
pub(crate) fn text_width_px(text: &str, scale: i32) -> i32 {
    let count = text.chars().count() as i32;
    if count == 0 {
        return 0;
    }
    count * glyph_advance(scale) - GLYPH_SPACING * scale
}

/// Row-major 5x7 bitmap; bit 4 is the leftmost column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Glyph {
    pub rows: [u8; GLYPH_HEIGHT as usize],
}

pub(crate) const SPACE_GLYPH: Glyph = Glyph { rows: [0; 7] };
pub(crate) const MISSING_GLYPH: Glyph = Glyph {
    rows: [0x1F, 0x11, 0x11, 0x11, 0x11, 0x11, 0x1F],
};

// ' '..='~'
const ASCII_GLYPHS: [[u8; 7]; 95] = [
    [0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00],
    [0x04, 0x04, 0x04, 0x04, 0x00, 0x00, 0x04],
    [0x0A, 0x0A, 0x0A, 0x00, 0x00, 0x00, 0x00],
    [0x0A, 0x0A, 0x1F, 0x0A, 0x1F, 0x0A, 0x0A],
    [0x04, 0x0F, 0x14, 0x0E, 0x05, 0x1E, 0x04],
    [0x18, 0x19, 0x02, 0x04, 0x08, 0x13, 0x03],
    [0x0C, 0x12, 0x14, 0x08, 0x15, 0x12, 0x0D],
    [0x0C, 0x04, 0x08, 0x00, 0x00, 0x00, 0x00],
    [0x02, 0x04, 0x08, 0x08, 0x08, 0x04, 0x02],
    [0x08, 0x04, 0x02, 0x02, 0x02, 0x04, 0x08],
    [0x00, 0x04, 0x15, 0x0E, 0x15, 0x04, 0x00],
    [0x00, 0x04, 0x04, 0x1F, 0x04, 0x04, 0x00],
    [0x00, 0x00, 0x00, 0x00, 0x0C, 0x04, 0x08],
    [0x00, 0x00, 0x00, 0x1F, 0x00, 0x00, 0x00],
    [0x00, 0x00, 0x00, 0x00, 0x00, 0x0C, 0x0C],
    [0x00, 0x01, 0x02, 0x04, 0x08, 0x10, 0x00],
    [0x0E, 0x11, 0x13, 0x15, 0x19, 0x11, 0x0E],
    [0x04, 0x0C, 0x04, 0x04, 0x04, 0x04, 0x0E],
    [0x0E, 0x11, 0x01, 0x02, 0x04, 0x08, 0x1F],
    [0x1F, 0x02, 0x04, 0x02, 0x01, 0x11, 0x0E],
    [0x02, 0x06, 0x0A, 0x12, 0x1F, 0x02, 0x02],
    [0x1F, 0x10, 0x1E, 0x01, 0x01, 0x11, 0x0E],
    [0x06, 0x08, 0x10, 0x1E, 0x11, 0x11, 0x0E],
    [0x1F, 0x01, 0x02, 0x04, 0x08, 0x08, 0x08],
    [0x0E, 0x11, 0x11, 0x0E, 0x11, 0x11, 0x0E],
    [0x0E, 0x11, 0x11, 0x0F, 0x01, 0x02, 0x0C],
    [0x00, 0x0C, 0x0C, 0x00, 0x0C, 0x0C, 0x00],
    [0x00, 0x0C, 0x0C, 0x00, 0x0C, 0x04, 0x08],
    [0x02, 0x04, 0x08, 0x10, 0x08, 0x04, 0x02],
    [0x00, 0x00, 0x1F, 0x00, 0x1F, 0x00, 0x00],
    [0x08, 0x04, 0x02, 0x01, 0x02, 0x04, 0x08],
    [0x0E, 0x11, 0x01, 0x02, 0x04, 0x00, 0x04],
    [0x0E, 0x11, 0x01, 0x0D, 0x15, 0x15, 0x0E],
    [0x0E, 0x11, 0x11, 0x11, 0x1F, 0x11, 0x11],
    [0x1E, 0x11, 0x11, 0x1E, 0x11, 0x11, 0x1E],
    [0x0E, 0x11, 0x10, 0x10, 0x10, 0x11, 0x0E],
    [0x1C, 0x12, 0x11, 0x11, 0x11, 0x12, 0x1C],
    [0x1F, 0x10, 0x10, 0x1E, 0x10, 0x10, 0x1F],
    [0x1F, 0x10, 0x10, 0x1E, 0x10, 0x10, 0x10],
    [0x0E, 0x11, 0x10, 0x17, 0x11, 0x11, 0x0F],
    [0x11, 0x11, 0x11, 0x1F, 0x11, 0x11, 0x11],
    [0x0E, 0x04, 0x04, 0x04, 0x04, 0x04, 0x0E],
    [0x07, 0x02, 0x02, 0x02, 0x02, 0x12, 0x0C],
    [0x11, 0x12, 0x14, 0x18, 0x14, 0x12, 0x11],
    [0x10, 0x10, 0x10, 0x10, 0x10, 0x10, 0x1F],
    [0x11, 0x1B, 0x15, 0x15, 0x11, 0x11, 0x11],
    [0x11, 0x11, 0x19, 0x15, 0x13, 0x11, 0x11],
    [0x0E, 0x11, 0x11, 0x11, 0x11, 0x11, 0x0E],
    [0x1E, 0x11, 0x11, 0x1E, 0x10, 0x10, 0x10],
    [0x0E, 0x11, 0x11, 0x11, 0x15, 0x12, 0x0D],
    [0x1E, 0x11, 0x11, 0x1E, 0x14, 0x12, 0x11],
    [0x0F, 0x10, 0x10, 0x0E, 0x01, 0x01, 0x1E],
    [0x1F, 0x04, 0x04, 0x04, 0x04, 0x04, 0x04],
    [0x11, 0x11, 0x11, 0x11, 0x11, 0x11, 0x0E],
    [0x11, 0x11, 0x11, 0x11, 0x11, 0x0A, 0x04],
    [0x11, 0x11, 0x11, 0x15, 0x15, 0x15, 0x0A],
    [0x11, 0x11, 0x0A, 0x04, 0x0A, 0x11, 0x11],
    [0x11, 0x11, 0x11, 0x0A, 0x04, 0x04, 0x04],
    [0x1F, 0x01, 0x02, 0x04, 0x08, 0x10, 0x1F],
    [0x0E, 0x08, 0x08, 0x08, 0x08, 0x08, 0x0E],
    [0x00, 0x10, 0x08, 0x04, 0x02, 0x01, 0x00],
    [0x0E, 0x02, 0x02, 0x02, 0x02, 0x02, 0x0E],
    [0x04, 0x0A, 0x11, 0x00, 0x00, 0x00, 0x00],
    [0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x1F],
    [0x08, 0x04, 0x02, 0x00, 0x00, 0x00, 0x00],
    [0x00, 0x00, 0x0E, 0x01, 0x0F, 0x11, 0x0F],
    [0x10, 0x10, 0x16, 0x19, 0x11, 0x11, 0x1E],
    [0x00, 0x00, 0x0E, 0x10, 0x10, 0x11, 0x0E],
    [0x01, 0x01, 0x0D, 0x13, 0x11, 0x11, 0x0F],
    [0x00, 0x00, 0x0E, 0x11, 0x1F, 0x10, 0x0E],
    [0x06, 0x09, 0x08, 0x1C, 0x08, 0x08, 0x08],
    [0x00, 0x0F, 0x11, 0x11, 0x0F, 0x01, 0x0E],
    [0x10, 0x10, 0x16, 0x19, 0x11, 0x11, 0x11],
    [0x04, 0x00, 0x0C, 0x04, 0x04, 0x04, 0x0E],
    [0x02, 0x00, 0x06, 0x02, 0x02, 0x12, 0x0C],
    [0x10, 0x10, 0x12, 0x14, 0x18, 0x14, 0x12],
    [0x0C, 0x04, 0x04, 0x04, 0x04, 0x04, 0x0E],
    [0x00, 0x00, 0x1A, 0x15, 0x15, 0x11, 0x11],
    [0x00, 0x00, 0x16, 0x19, 0x11, 0x11, 0x11],
    [0x00, 0x00, 0x0E, 0x11, 0x11, 0x11, 0x0E],
    [0x00, 0x00, 0x1E, 0x11, 0x1E, 0x10, 0x10],
    [0x00, 0x00, 0x0D, 0x13, 0x0F, 0x01, 0x01],
    [0x00, 0x00, 0x16, 0x19, 0x10, 0x10, 0x10],
    [0x00, 0x00, 0x0E, 0x10, 0x0E, 0x01, 0x1E],
    [0x08, 0x08, 0x1C, 0x08, 0x08, 0x09, 0x06],
    [0x00, 0x00, 0x11, 0x11, 0x11, 0x13, 0x0D],
    [0x00, 0x00, 0x11, 0x11, 0x11, 0x0A, 0x04],
    [0x00, 0x00, 0x11, 0x11, 0x15, 0x15, 0x0A],
    [0x00, 0x00, 0x11, 0x0A, 0x04, 0x0A, 0x11],
    [0x00, 0x00, 0x11, 0x11, 0x0F, 0x01, 0x0E],
    [0x00, 0x00, 0x1F, 0x02, 0x04, 0x08, 0x1F],
    [0x02, 0x04, 0x04, 0x08, 0x04, 0x04, 0x02],
    [0x04, 0x04, 0x04, 0x04, 0x04, 0x04, 0x04],
    [0x08, 0x04, 0x04, 0x02, 0x04, 0x04, 0x08],
    [0x00, 0x00, 0x00, 0x0D, 0x12, 0x00, 0x00],
];

pub(crate) fn glyph_for(ch: char) -> Option<Glyph> {
    match ch {
        ' '..='~' => Some(ascii_glyph(ch)),
        '\u{0401}' | '\u{0410}'..='\u{044F}' | '\u{0451}' => cyrillic_glyph(ch),
        _ => None,
    }
}

fn ascii_glyph(ch: char) -> Glyph {
    let index = ch as usize - ' ' as usize;
    ASCII_GLYPHS
        .get(index)
        .map(|rows| Glyph { rows: *rows })
        .unwrap_or(SPACE_GLYPH)
}

fn cyrillic_glyph(ch: char) -> Option<Glyph> {
    if let Some(latin) = latin_lookalike(ch) {
        return Some(ascii_glyph(latin));
    }
    let rows = match ch {
        'Б' => [0x1F, 0x10, 0x10, 0x1E, 0x11, 0x11, 0x1E],
        'Г' => [0x1F, 0x10, 0x10, 0x10, 0x10, 0x10, 0x10],
        'Д' => [0x06, 0x0A, 0x0A, 0x0A, 0x0A, 0x1F, 0x11],
        'Ж' => [0x15, 0x15, 0x15, 0x0E, 0x15, 0x15, 0x15],
        'З' => [0x0E, 0x11, 0x01, 0x06, 0x01, 0x11, 0x0E],
        'И' => [0x11, 0x11, 0x13, 0x15, 0x19, 0x11, 0x11],
        'Й' => [0x0A, 0x04, 0x11, 0x13, 0x15, 0x19, 0x11],
        'Л' => [0x07, 0x09, 0x09, 0x09, 0x09, 0x09, 0x11],
        'П' => [0x1F, 0x11, 0x11, 0x11, 0x11, 0x11, 0x11],
        'У' => [0x11, 0x11, 0x11, 0x0F, 0x01, 0x11, 0x0E],
        'Ф' => [0x04, 0x0E, 0x15, 0x15, 0x15, 0x0E, 0x04],
        'Ц' => [0x12, 0x12, 0x12, 0x12, 0x12, 0x1F, 0x01],
        'Ч' => [0x11, 0x11, 0x11, 0x0F, 0x01, 0x01, 0x01],
        'Ш' => [0x15, 0x15, 0x15, 0x15, 0x15, 0x15, 0x1F],
        'Щ' => [0x15, 0x15, 0x15, 0x15, 0x15, 0x1F, 0x01],
        'Ъ' => [0x18, 0x08, 0x08, 0x0E, 0x09, 0x09, 0x0E],
        'Ы' => [0x11, 0x11, 0x11, 0x19, 0x15, 0x15, 0x19],
        'Ь' => [0x10, 0x10, 0x10, 0x1E, 0x11, 0x11, 0x1E],
        'Э' => [0x0E, 0x11, 0x01, 0x07, 0x01, 0x11, 0x0E],
        'Ю' => [0x12, 0x15, 0x15, 0x1D, 0x15, 0x15, 0x12],
        'Я' => [0x0F, 0x11, 0x11, 0x0F, 0x05, 0x09, 0x11],
        'Ё' => [0x0A, 0x1F, 0x10, 0x1E, 0x10, 0x10, 0x1F],
        'б' => [0x0F, 0x10, 0x1E, 0x11, 0x11, 0x11, 0x0E],
        'в' => [0x00, 0x00, 0x1E, 0x11, 0x1E, 0x11, 0x1E],
        'г' => [0x00, 0x00, 0x1F, 0x10, 0x10, 0x10, 0x10],
        'д' => [0x00, 0x00, 0x06, 0x0A, 0x0A, 0x1F, 0x11],
        'ж' => [0x00, 0x00, 0x15, 0x15, 0x0E, 0x15, 0x15],
        'з' => [0x00, 0x00, 0x0E, 0x01, 0x06, 0x01, 0x0E],
        'и' => [0x00, 0x00, 0x11, 0x13, 0x15, 0x19, 0x11],
        'й' => [0x0A, 0x04, 0x11, 0x13, 0x15, 0x19, 0x11],
        'к' => [0x00, 0x00, 0x11, 0x12, 0x1C, 0x12, 0x11],
        'л' => [0x00, 0x00, 0x07, 0x09, 0x09, 0x09, 0x11],
        'м' => [0x00, 0x00, 0x11, 0x1B, 0x15, 0x11, 0x11],
        'н' => [0x00, 0x00, 0x11, 0x11, 0x1F, 0x11, 0x11],
        'п' => [0x00, 0x00, 0x1F, 0x11, 0x11, 0x11, 0x11],
        'т' => [0x00, 0x00, 0x1F, 0x04, 0x04, 0x04, 0x04],
        'ф' => [0x00, 0x04, 0x0E, 0x15, 0x15, 0x0E, 0x04],
        'ц' => [0x00, 0x00, 0x12, 0x12, 0x12, 0x1F, 0x01],
        'ч' => [0x00, 0x00, 0x11, 0x11, 0x0F, 0x01, 0x01],
        'ш' => [0x00, 0x00, 0x15, 0x15, 0x15, 0x15, 0x1F],
        'щ' => [0x00, 0x00, 0x15, 0x15, 0x15, 0x1F, 0x01],
        'ъ' => [0x00, 0x00, 0x18, 0x08, 0x0E, 0x09, 0x0E],
        'ы' => [0x00, 0x00, 0x11, 0x11, 0x19, 0x15, 0x19],
        'ь' => [0x00, 0x00, 0x10, 0x10, 0x1E, 0x11, 0x1E],
        'э' => [0x00, 0x00, 0x0E, 0x01, 0x07, 0x01, 0x0E],
        'ю' => [0x00, 0x00, 0x12, 0x15, 0x1D, 0x15, 0x12],
        'я' => [0x00, 0x00, 0x0F, 0x11, 0x0F, 0x05, 0x19],
        'ё' => [0x0A, 0x00, 0x0E, 0x11, 0x1F, 0x10, 0x0E],
        _ => return None,
    };
    Some(Glyph { rows })
}

fn latin_lookalike(ch: char) -> Option<char> {
    let latin = match ch {
        'А' => 'A',
        'В' => 'B',
        'Е' => 'E',
        'К' => 'K',
        'М' => 'M',
        'Н' => 'H',
        'О' => 'O',
        'Р' => 'P',
        'С' => 'C',
        'Т' => 'T',
        'Х' => 'X',
        'а' => 'a',
        'е' => 'e',
        'о' => 'o',
        'р' => 'p',
        'с' => 'c',
        'у' => 'y',
        'х' => 'x',
        _ => return None,
    };
    Some(latin)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn glyph_lookup_covers_ascii_printable_range() {
        for code in 32u8..=126u8 {
            let ch = char::from(code);
            assert!(
                glyph_for(ch).is_some(),
                "missing glyph for ASCII code {code} ('{ch}')"
            );
        }
    }

    #[test]
    fn glyph_lookup_covers_russian_alphabet() {
        let alphabet = "АБВГДЕЁЖЗИЙКЛМНОПРСТУФХЦЧШЩЪЫЬЭЮЯабвгдеёжзийклмнопрстуфхцчшщъыьэюя";
        for ch in alphabet.chars() {
            assert!(glyph_for(ch).is_some(), "missing glyph for '{ch}'");
        }
    }

    #[test]
    fn glyph_rows_fit_in_five_columns() {
        for code in 32u8..=126u8 {
            let glyph = glyph_for(char::from(code)).expect("glyph");
            assert!(glyph.rows.iter().all(|row| *row < 0x20));
        }
    }

    #[test]
    fn unsupported_characters_have_no_glyph() {
        assert!(glyph_for('\u{7f}').is_none());
        assert!(glyph_for('\u{1f642}').is_none());
        assert!(glyph_for('é').is_none());
    }

    #[test]
    fn text_width_counts_chars_not_bytes() {
        assert_eq!(text_width_px("", 2), 0);
        assert_eq!(text_width_px("ab", 1), 11);
        assert_eq!(text_width_px("аб", 1), 11);
        assert_eq!(text_width_px("abc", 2), 34);
    }

    #[test]
    fn lookalike_letters_share_latin_bitmaps() {
        assert_eq!(glyph_for('Н'), glyph_for('H'));
        assert_eq!(glyph_for('а'), glyph_for('a'));
        assert_ne!(glyph_for('ч'), glyph_for('y'));
    }
}
