//! Bead counts and grid coordinates for printed patterns.

use serde::Serialize;

use crate::quantize::Pattern;

/// One row of the materials list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MaterialLine {
    pub code: String,
    pub hex: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Materials {
    pub lines: Vec<MaterialLine>,
    pub total: usize,
}

/// Count beads per code, most used first. Equal counts keep the order in
/// which the codes first appear in the grid.
pub fn materials(pattern: &Pattern) -> Materials {
    let palette = pattern.palette_in_use();
    let mut counts = vec![0usize; palette.len()];
    let mut order = Vec::with_capacity(palette.len());

    for &idx in pattern.cell_indices() {
        if counts[idx] == 0 {
            order.push(idx);
        }
        counts[idx] += 1;
    }

    order.sort_by(|a, b| counts[*b].cmp(&counts[*a]));

    let lines: Vec<MaterialLine> = order
        .into_iter()
        .map(|idx| MaterialLine {
            code: palette[idx].code().to_owned(),
            hex: palette[idx].hex().to_owned(),
            count: counts[idx],
        })
        .collect();
    let total = lines.iter().map(|l| l.count).sum();

    Materials { lines, total }
}

/// Spreadsheet-style column label: 0 -> `A`, 25 -> `Z`, 26 -> `AA`.
pub fn column_label(index: u32) -> String {
    let mut label = Vec::new();
    let mut n = index as u64 + 1;
    while n > 0 {
        n -= 1;
        label.push(b'A' + (n % 26) as u8);
        n /= 26;
    }
    label.reverse();
    String::from_utf8_lossy(&label).into_owned()
}

/// Printed cell coordinate, column letters then 1-based row: `(1, 2)` -> `B3`.
pub fn coordinate(x: u32, y: u32) -> String {
    format!("{}{}", column_label(x), y as u64 + 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::ColorEntry;
    use crate::quantize::quantize;

    #[test]
    fn test_materials_sorted_by_count() {
        let palette = vec![
            ColorEntry::from_hex("A", "#000000"),
            ColorEntry::from_hex("B", "#FFFFFF"),
            ColorEntry::from_hex("C", "#FF0000"),
        ];
        // B once, C twice, A twice with C seen first.
        let pixels = [
            255, 255, 255, 255, //
            255, 0, 0, 255, //
            0, 0, 0, 255, //
            0, 0, 0, 255, //
            255, 0, 0, 255,
        ];
        let pattern = quantize(&pixels, 5, 1, &palette).unwrap();
        let list = materials(&pattern);

        let summary: Vec<(&str, usize)> =
            list.lines.iter().map(|l| (l.code.as_str(), l.count)).collect();
        assert_eq!(summary, [("C", 2), ("A", 2), ("B", 1)]);
        assert_eq!(list.total, 5);
        assert_eq!(list.lines[0].hex, "#FF0000");
    }

    #[test]
    fn test_column_labels() {
        assert_eq!(column_label(0), "A");
        assert_eq!(column_label(25), "Z");
        assert_eq!(column_label(26), "AA");
        assert_eq!(column_label(27), "AB");
        assert_eq!(column_label(51), "AZ");
        assert_eq!(column_label(52), "BA");
        assert_eq!(column_label(701), "ZZ");
        assert_eq!(column_label(702), "AAA");
    }

    #[test]
    fn test_coordinate() {
        assert_eq!(coordinate(0, 0), "A1");
        assert_eq!(coordinate(1, 2), "B3");
        assert_eq!(coordinate(27, 99), "AB100");
    }
}
