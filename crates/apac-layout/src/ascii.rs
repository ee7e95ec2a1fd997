//! ASCII folding for remittance text.
//!
//! The remittance file must never contain a byte outside 0x00-0x7F. Accented
//! Latin letters fold to their base letter; anything without a single-character
//! ASCII equivalent is dropped, so a folded field never grows.

/// Fold one character to a printable ASCII character, or drop it.
///
/// ASCII control characters are dropped as well.
pub fn fold_char(ch: char) -> Option<char> {
    if ch.is_ascii() {
        return if ch.is_ascii_control() { None } else { Some(ch) };
    }
    let folded = match ch {
        'À' | 'Á' | 'Â' | 'Ã' | 'Ä' | 'Å' => 'A',
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' | 'ª' => 'a',
        'Ç' => 'C',
        'ç' => 'c',
        'È' | 'É' | 'Ê' | 'Ë' => 'E',
        'è' | 'é' | 'ê' | 'ë' => 'e',
        'Ì' | 'Í' | 'Î' | 'Ï' => 'I',
        'ì' | 'í' | 'î' | 'ï' => 'i',
        'Ñ' => 'N',
        'ñ' => 'n',
        'Ò' | 'Ó' | 'Ô' | 'Õ' | 'Ö' | 'Ø' => 'O',
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ø' | 'º' | '°' => 'o',
        'Ù' | 'Ú' | 'Û' | 'Ü' => 'U',
        'ù' | 'ú' | 'û' | 'ü' => 'u',
        'Ý' | 'Ÿ' => 'Y',
        'ý' | 'ÿ' => 'y',
        'ß' => 's',
        '\u{00A0}' | '\u{2007}' | '\u{202F}' => ' ',
        '\u{2010}' | '\u{2011}' | '\u{2012}' | '\u{2013}' | '\u{2014}' => '-',
        '\u{2018}' | '\u{2019}' | '´' => '\'',
        '\u{201C}' | '\u{201D}' => '"',
        _ => return None,
    };
    Some(folded)
}

/// Fold a whole string to ASCII.
pub fn to_ascii(value: &str) -> String {
    value.chars().filter_map(fold_char).collect()
}
