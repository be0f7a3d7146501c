//! Stock bookkeeping for budget writes.
//!
//! A budget line holds `quantity` units of a material out of stock. Every
//! budget write is reduced to a map `material_id -> change of stock`, which
//! the service applies inside the same transaction as the budget itself.

use std::collections::BTreeMap;

/// Units held per material by a set of lines
pub fn held_units<'a, I>(lines: I) -> BTreeMap<String, i32>
where
    I: IntoIterator<Item = (&'a str, i32)>,
{
    let mut held = BTreeMap::new();
    for (material_id, quantity) in lines {
        *held.entry(material_id.to_string()).or_insert(0) += quantity;
    }
    held
}

/// Stock change needed to move from `old` holdings to `new` holdings.
///
/// Positive values return units to stock, negative ones take units out.
/// Materials whose holding does not change are omitted.
pub fn stock_changes(
    old: &BTreeMap<String, i32>,
    new: &BTreeMap<String, i32>,
) -> BTreeMap<String, i32> {
    let mut changes = BTreeMap::new();
    for (id, qty) in old {
        *changes.entry(id.clone()).or_insert(0) += qty;
    }
    for (id, qty) in new {
        *changes.entry(id.clone()).or_insert(0) -= qty;
    }
    changes.retain(|_, delta| *delta != 0);
    changes
}

#[cfg(test)]
mod tests {
    use super::*;

    fn held(lines: &[(&str, i32)]) -> BTreeMap<String, i32> {
        held_units(lines.iter().copied())
    }

    #[test]
    fn create_takes_every_line() {
        let changes = stock_changes(&BTreeMap::new(), &held(&[("hojas", 50), ("tapas", 2)]));
        assert_eq!(changes, held(&[("hojas", -50), ("tapas", -2)]));
    }

    #[test]
    fn delete_returns_every_line() {
        let changes = stock_changes(&held(&[("hojas", 50), ("tapas", 2)]), &BTreeMap::new());
        assert_eq!(changes, held(&[("hojas", 50), ("tapas", 2)]));
    }

    #[test]
    fn edit_applies_net_difference() {
        let old = held(&[("hojas", 50), ("tapas", 2), ("resortes", 1)]);
        let new = held(&[("hojas", 80), ("tapas", 2), ("cartulina", 3)]);
        let changes = stock_changes(&old, &new);
        // tapas unchanged, resortes dropped, cartulina added
        assert_eq!(
            changes,
            held(&[("hojas", -30), ("resortes", 1), ("cartulina", -3)])
        );
    }

    #[test]
    fn repeated_material_lines_are_summed() {
        assert_eq!(held(&[("hojas", 5), ("hojas", 7)]), held(&[("hojas", 12)]));
    }
}
