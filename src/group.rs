//! Grouping of legend entries by source column
//!
//! Aesthetics mapped from the same column share one combined legend block.
//! Each aesthetic's `value -> label` dictionary is inverted to
//! `label -> value` so the combined rows can look every component up by label.
//! Labels are matched by their exact text ([`LegendKey::raw`]); rounding only
//! happens when a label is displayed.

use crate::ir::{Aesthetic, Legend, LegendKey, VisualValue};
use crate::style::{self, LineType, MarkerShape};
use log::{debug, warn};
use plotters::style::RGBAColor;
use std::collections::BTreeMap;

/// The label a row is keyed by, with the visual value mapped to it
#[derive(Debug, Clone, PartialEq)]
pub struct KeyedValue {
    pub key: LegendKey,
    pub value: VisualValue,
}

/// raw label -> value for one aesthetic
pub type InvertedMap = BTreeMap<String, KeyedValue>;

/// All aesthetics mapped from one column
#[derive(Debug, Clone, PartialEq)]
pub struct LegendGroup {
    pub column_name: String,
    pub aesthetics: BTreeMap<Aesthetic, InvertedMap>,
}

impl LegendGroup {
    fn new(column_name: &str) -> Self {
        Self {
            column_name: column_name.to_string(),
            aesthetics: BTreeMap::new(),
        }
    }

    pub fn contains(&self, aesthetic: Aesthetic) -> bool {
        self.aesthetics.contains_key(&aesthetic)
    }

    /// Aesthetics that draw something on their own (everything but alpha)
    pub fn drawable_aesthetics(&self) -> impl Iterator<Item = Aesthetic> + '_ {
        self.aesthetics
            .keys()
            .copied()
            .filter(|a| *a != Aesthetic::Alpha)
    }

    /// A group is combined when two or more drawable aesthetics share the column
    pub fn is_combined(&self) -> bool {
        self.drawable_aesthetics().count() > 1
    }

    /// Sorted labels of the group.
    ///
    /// All aesthetics of a group are assumed to share one label set, so the
    /// labels of the first drawable aesthetic are used.
    pub fn labels(&self) -> Vec<LegendKey> {
        let source = self
            .aesthetics
            .iter()
            .find(|(a, _)| **a != Aesthetic::Alpha)
            .or_else(|| self.aesthetics.iter().next())
            .map(|(_, map)| map);

        let Some(map) = source else {
            return Vec::new();
        };

        let mut keys: Vec<&KeyedValue> = map.values().collect();
        keys.sort_by(|a, b| a.key.cmp_label(&b.key));
        keys.into_iter().map(|kv| kv.key.clone()).collect()
    }

    /// Value of one aesthetic for a label; None when the aesthetic or label is absent
    pub fn lookup(&self, aesthetic: Aesthetic, label: &LegendKey) -> Option<&VisualValue> {
        self.aesthetics
            .get(&aesthetic)
            .and_then(|map| map.get(&label.raw()))
            .map(|kv| &kv.value)
    }

    /// Row color: color, else fill. Alpha in the same column sets its opacity.
    pub fn color(&self, label: &LegendKey) -> Option<RGBAColor> {
        let color = self
            .lookup(Aesthetic::Color, label)
            .or_else(|| self.lookup(Aesthetic::Fill, label))
            .and_then(VisualValue::as_color)?;

        match self.lookup(Aesthetic::Alpha, label).and_then(VisualValue::as_alpha) {
            Some(alpha) => Some(style::with_alpha(color, alpha)),
            None => Some(color),
        }
    }

    pub fn shape(&self, label: &LegendKey) -> Option<MarkerShape> {
        self.lookup(Aesthetic::Shape, label)
            .and_then(VisualValue::as_shape)
    }

    pub fn size(&self, label: &LegendKey) -> Option<f64> {
        self.lookup(Aesthetic::Size, label)
            .and_then(VisualValue::as_size)
    }

    pub fn linetype(&self, label: &LegendKey) -> Option<&LineType> {
        self.lookup(Aesthetic::Linetype, label)
            .and_then(VisualValue::as_linetype)
    }
}

/// Group legend entries by column name, inverting each dictionary.
///
/// Labels are expected to be unique per aesthetic; on a collision the last
/// value wins.
pub fn group_by_column(legend: &Legend) -> BTreeMap<String, LegendGroup> {
    let mut groups: BTreeMap<String, LegendGroup> = BTreeMap::new();

    for (aesthetic, entry) in legend.iter() {
        let mut inverted = InvertedMap::new();
        for (value, key) in &entry.dict {
            let label = key.raw();
            let previous = inverted.insert(
                label.clone(),
                KeyedValue {
                    key: key.clone(),
                    value: value.clone(),
                },
            );
            if previous.is_some() {
                warn!(
                    "duplicate label '{}' for {} in column '{}'; keeping the last value",
                    label, aesthetic, entry.column_name
                );
            }
        }

        groups
            .entry(entry.column_name.clone())
            .or_insert_with(|| LegendGroup::new(&entry.column_name))
            .aesthetics
            .insert(aesthetic, inverted);
    }

    debug!("grouped {} aesthetics into {} columns", legend.len(), groups.len());
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{LegendEntry, ScaleKind};

    fn entry(column: &str, dict: Vec<(VisualValue, &str)>) -> LegendEntry {
        LegendEntry::new(
            column,
            dict.into_iter().map(|(v, k)| (v, LegendKey::from(k))).collect(),
            ScaleKind::Discrete,
        )
    }

    fn key(label: &str) -> LegendKey {
        LegendKey::from(label)
    }

    fn red() -> RGBAColor {
        RGBAColor(255, 0, 0, 1.0)
    }

    #[test]
    fn test_groups_share_column() {
        let mut legend = Legend::new();
        legend.insert(
            Aesthetic::Shape,
            entry("species", vec![(VisualValue::Shape(MarkerShape::Square), "a")]),
        );
        legend.insert(Aesthetic::Size, entry("species", vec![(VisualValue::Size(40.0), "a")]));
        legend.insert(Aesthetic::Color, entry("region", vec![(VisualValue::Color(red()), "x")]));

        let groups = group_by_column(&legend);
        assert_eq!(groups.keys().collect::<Vec<_>>(), vec!["region", "species"]);
        assert!(groups["species"].is_combined());
        assert!(!groups["region"].is_combined());
        assert_eq!(groups["species"].shape(&key("a")), Some(MarkerShape::Square));
        assert_eq!(groups["species"].size(&key("a")), Some(40.0));
    }

    #[test]
    fn test_duplicate_labels_last_write_wins() {
        let mut legend = Legend::new();
        legend.insert(
            Aesthetic::Size,
            entry(
                "w",
                vec![(VisualValue::Size(1.0), "same"), (VisualValue::Size(2.0), "same")],
            ),
        );
        let groups = group_by_column(&legend);
        assert_eq!(groups["w"].labels(), vec![key("same")]);
        assert_eq!(groups["w"].size(&key("same")), Some(2.0));
    }

    #[test]
    fn test_labels_are_sorted() {
        let mut legend = Legend::new();
        legend.insert(
            Aesthetic::Size,
            entry(
                "w",
                vec![
                    (VisualValue::Size(15.0), "blah4"),
                    (VisualValue::Size(1.0), "blah"),
                    (VisualValue::Size(2.0), "blah2"),
                ],
            ),
        );
        let groups = group_by_column(&legend);
        assert_eq!(
            groups["w"].labels(),
            vec![key("blah"), key("blah2"), key("blah4")]
        );
    }

    #[test]
    fn test_alpha_does_not_make_a_group_combined() {
        let mut legend = Legend::new();
        legend.insert(Aesthetic::Color, entry("c", vec![(VisualValue::Color(red()), "a")]));
        legend.insert(Aesthetic::Alpha, entry("c", vec![(VisualValue::Alpha(0.5), "a")]));
        let groups = group_by_column(&legend);
        assert!(!groups["c"].is_combined());
        assert_eq!(groups["c"].color(&key("a")), Some(RGBAColor(255, 0, 0, 0.5)));
    }

    #[test]
    fn test_color_prefers_color_over_fill() {
        let blue = RGBAColor(0, 0, 255, 1.0);
        let mut legend = Legend::new();
        legend.insert(Aesthetic::Fill, entry("c", vec![(VisualValue::Color(blue), "a")]));
        legend.insert(Aesthetic::Color, entry("c", vec![(VisualValue::Color(red()), "a")]));
        let groups = group_by_column(&legend);
        assert_eq!(groups["c"].color(&key("a")), Some(red()));
    }

    #[test]
    fn test_missing_lookups_are_none() {
        let mut legend = Legend::new();
        legend.insert(Aesthetic::Shape, entry("s", vec![(VisualValue::Shape(MarkerShape::Star), "a")]));
        let groups = group_by_column(&legend);
        let group = &groups["s"];
        assert_eq!(group.color(&key("a")), None);
        assert_eq!(group.size(&key("a")), None);
        assert_eq!(group.linetype(&key("a")), None);
        assert_eq!(group.shape(&key("missing")), None);
    }

    #[test]
    fn test_close_numeric_labels_stay_distinct() {
        let mut legend = Legend::new();
        legend.insert(
            Aesthetic::Size,
            LegendEntry::new(
                "w",
                vec![
                    (VisualValue::Size(10.0), LegendKey::Number(1.001)),
                    (VisualValue::Size(20.0), LegendKey::Number(1.004)),
                ],
                ScaleKind::Continuous,
            ),
        );
        let groups = group_by_column(&legend);
        let group = &groups["w"];
        assert_eq!(
            group.labels(),
            vec![LegendKey::Number(1.001), LegendKey::Number(1.004)]
        );
        assert_eq!(group.size(&LegendKey::Number(1.001)), Some(10.0));
        assert_eq!(group.size(&LegendKey::Number(1.004)), Some(20.0));
    }
}
