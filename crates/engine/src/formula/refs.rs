//! Cell reference decoding.
//!
//! A reference is column letters followed by a 1-based row number ("B3").
//! Letters are bijective base-26 (A=1, ..., Z=26, AA=27), shifted to a
//! 0-based column index; the row number is shifted to a 0-based row index.

/// Decode column letters to a 0-based index: A=0, B=1, ..., Z=25, AA=26.
///
/// Exact inverse of [`crate::grid::column_label`]. Returns `None` for the
/// empty string or any non-uppercase-letter input.
pub fn parse_column_label(letters: &str) -> Option<usize> {
    if letters.is_empty() {
        return None;
    }
    let mut acc: usize = 0;
    for ch in letters.chars() {
        if !ch.is_ascii_uppercase() {
            return None;
        }
        acc = acc * 26 + (ch as usize - 'A' as usize + 1);
    }
    Some(acc - 1)
}

/// Decode a full cell reference ("B3") to 0-based (row, col).
///
/// Returns `None` unless the text is one-or-more uppercase letters followed
/// by one-or-more digits, with a row number of at least 1.
pub fn parse_cell_ref(text: &str) -> Option<(usize, usize)> {
    let split = text.find(|c: char| c.is_ascii_digit())?;
    let (letters, digits) = text.split_at(split);
    let col = parse_column_label(letters)?;
    let row = digits.parse::<usize>().ok()?.checked_sub(1)?;
    Some((row, col))
}
