use crate::error::LegendError;
use crate::parser;
use crate::style::{self, LineType, MarkerShape, TextStyle};
use plotters::style::RGBAColor;
use serde::Deserialize;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

// =============================================================================
// Phase 1: Legend documents
// =============================================================================

/// A visual channel mapped from data.
///
/// Variants are declared alphabetically so that the derived `Ord` matches
/// the order of the aesthetic names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Aesthetic {
    Alpha,
    Color,
    Fill,
    Linetype,
    Shape,
    Size,
}

impl Aesthetic {
    pub fn name(&self) -> &'static str {
        match self {
            Aesthetic::Alpha => "alpha",
            Aesthetic::Color => "color",
            Aesthetic::Fill => "fill",
            Aesthetic::Linetype => "linetype",
            Aesthetic::Shape => "shape",
            Aesthetic::Size => "size",
        }
    }
}

impl fmt::Display for Aesthetic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Aesthetic {
    type Err = LegendError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "alpha" => Ok(Aesthetic::Alpha),
            "color" => Ok(Aesthetic::Color),
            "fill" => Ok(Aesthetic::Fill),
            "linetype" => Ok(Aesthetic::Linetype),
            "shape" => Ok(Aesthetic::Shape),
            "size" => Ok(Aesthetic::Size),
            other => Err(LegendError::UnknownAesthetic(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScaleKind {
    #[default]
    Discrete,
    Continuous,
}

impl FromStr for ScaleKind {
    type Err = LegendError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "discrete" => Ok(ScaleKind::Discrete),
            "continuous" => Ok(ScaleKind::Continuous),
            other => Err(LegendError::UnsupportedScaleKind(other.to_string())),
        }
    }
}

/// What a legend row says: a discrete value, or a quantile for continuous scales
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum LegendKey {
    Number(f64),
    Text(String),
}

impl LegendKey {
    /// Text shown next to the swatch. Numbers are rounded to 2 decimals.
    pub fn display(&self) -> String {
        match self {
            LegendKey::Text(s) => s.clone(),
            LegendKey::Number(v) => format!("{}", (v * 100.0).round() / 100.0),
        }
    }

    /// Exact label text, used to match rows across aesthetics.
    /// Unlike [`display`](Self::display) it never rounds.
    pub fn raw(&self) -> String {
        match self {
            LegendKey::Text(s) => s.clone(),
            LegendKey::Number(v) => v.to_string(),
        }
    }

    /// Total order over labels: numbers first in numeric order, then text
    pub fn cmp_label(&self, other: &LegendKey) -> Ordering {
        match (self, other) {
            (LegendKey::Number(a), LegendKey::Number(b)) => a.total_cmp(b),
            (LegendKey::Number(_), LegendKey::Text(_)) => Ordering::Less,
            (LegendKey::Text(_), LegendKey::Number(_)) => Ordering::Greater,
            (LegendKey::Text(a), LegendKey::Text(b)) => a.cmp(b),
        }
    }
}

impl From<&str> for LegendKey {
    fn from(s: &str) -> Self {
        LegendKey::Text(s.to_string())
    }
}

impl From<f64> for LegendKey {
    fn from(v: f64) -> Self {
        LegendKey::Number(v)
    }
}

/// A resolved visual value, typed by the aesthetic it belongs to
#[derive(Debug, Clone, PartialEq)]
pub enum VisualValue {
    Color(RGBAColor),
    Shape(MarkerShape),
    Size(f64),
    Linetype(LineType),
    Alpha(f64),
}

impl VisualValue {
    /// Resolve a raw visual value for the given aesthetic
    pub fn parse(aesthetic: Aesthetic, raw: &str) -> Result<Self, LegendError> {
        let parsed = match aesthetic {
            Aesthetic::Color | Aesthetic::Fill => style::parse_color(raw).map(VisualValue::Color),
            Aesthetic::Shape => style::parse_shape(raw).map(VisualValue::Shape),
            Aesthetic::Linetype => style::parse_linetype(raw).map(VisualValue::Linetype),
            Aesthetic::Size => parser::parse_number(raw)
                .filter(|v| *v >= 0.0)
                .map(VisualValue::Size),
            Aesthetic::Alpha => parser::parse_number(raw)
                .filter(|v| (0.0..=1.0).contains(v))
                .map(VisualValue::Alpha),
        };
        parsed.ok_or_else(|| LegendError::InvalidVisualValue {
            aesthetic,
            value: raw.to_string(),
        })
    }

    pub fn as_color(&self) -> Option<RGBAColor> {
        match self {
            VisualValue::Color(c) => Some(*c),
            _ => None,
        }
    }

    pub fn as_shape(&self) -> Option<MarkerShape> {
        match self {
            VisualValue::Shape(s) => Some(*s),
            _ => None,
        }
    }

    pub fn as_size(&self) -> Option<f64> {
        match self {
            VisualValue::Size(s) => Some(*s),
            _ => None,
        }
    }

    pub fn as_linetype(&self) -> Option<&LineType> {
        match self {
            VisualValue::Linetype(l) => Some(l),
            _ => None,
        }
    }

    pub fn as_alpha(&self) -> Option<f64> {
        match self {
            VisualValue::Alpha(a) => Some(*a),
            _ => None,
        }
    }
}

/// Legend specification for one aesthetic
#[derive(Debug, Clone, PartialEq)]
pub struct LegendEntry {
    pub column_name: String,
    /// visual value -> label
    pub dict: Vec<(VisualValue, LegendKey)>,
    pub scale_kind: ScaleKind,
}

impl LegendEntry {
    pub fn new(column_name: &str, dict: Vec<(VisualValue, LegendKey)>, scale_kind: ScaleKind) -> Self {
        Self {
            column_name: column_name.to_string(),
            dict,
            scale_kind,
        }
    }

    /// Entries sorted by label, the order rows are drawn in
    pub fn sorted_items(&self) -> Vec<&(VisualValue, LegendKey)> {
        let mut items: Vec<_> = self.dict.iter().collect();
        items.sort_by(|a, b| a.1.cmp_label(&b.1));
        items
    }
}

/// On-the-wire shape of a legend entry
#[derive(Debug, Deserialize)]
struct RawLegendEntry {
    column_name: String,
    dict: BTreeMap<String, LegendKey>,
    #[serde(default = "default_scale_type")]
    scale_type: String,
}

fn default_scale_type() -> String {
    "discrete".to_string()
}

/// The full aesthetic -> entry mapping handed to the renderer
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Legend {
    entries: BTreeMap<Aesthetic, LegendEntry>,
}

impl Legend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a legend document
    /// Format: {"size": {"column_name": "w", "dict": {"1": "a"}, "scale_type": "discrete"}}
    pub fn from_json(input: &str) -> Result<Self, LegendError> {
        let raw: BTreeMap<String, RawLegendEntry> = serde_json::from_str(input)?;

        let mut legend = Legend::new();
        for (name, entry) in raw {
            let aesthetic: Aesthetic = name.parse()?;
            let scale_kind: ScaleKind = entry.scale_type.parse()?;
            let dict = entry
                .dict
                .into_iter()
                .map(|(raw_value, key)| Ok((VisualValue::parse(aesthetic, &raw_value)?, key)))
                .collect::<Result<Vec<_>, LegendError>>()?;
            legend.insert(aesthetic, LegendEntry::new(&entry.column_name, dict, scale_kind));
        }
        Ok(legend)
    }

    pub fn insert(&mut self, aesthetic: Aesthetic, entry: LegendEntry) -> Option<LegendEntry> {
        self.entries.insert(aesthetic, entry)
    }

    pub fn get(&self, aesthetic: Aesthetic) -> Option<&LegendEntry> {
        self.entries.get(&aesthetic)
    }

    pub fn contains(&self, aesthetic: Aesthetic) -> bool {
        self.entries.contains_key(&aesthetic)
    }

    /// Aesthetics in sorted order
    pub fn aesthetics(&self) -> impl Iterator<Item = Aesthetic> + '_ {
        self.entries.keys().copied()
    }

    /// Entries in sorted aesthetic order
    pub fn iter(&self) -> impl Iterator<Item = (Aesthetic, &LegendEntry)> {
        self.entries.iter().map(|(a, e)| (*a, e))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// =============================================================================
// Phase 2: Offset boxes (visual keys)
// =============================================================================

/// A marker drawn at every vertex of a line artist
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub shape: MarkerShape,
    /// Diameter in pixels
    pub size: f64,
}

/// Primitive drawn inside a DrawingArea, in area coordinates (origin bottom-left)
#[derive(Debug, Clone, PartialEq)]
pub enum Artist {
    Rect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        fill: RGBAColor,
    },
    Line {
        xs: Vec<f64>,
        ys: Vec<f64>,
        color: RGBAColor,
        linetype: LineType,
        marker: Option<Marker>,
    },
}

/// Fixed-size container of artists
#[derive(Debug, Clone, PartialEq)]
pub struct DrawingArea {
    pub width: f64,
    pub height: f64,
    pub artists: Vec<Artist>,
}

impl DrawingArea {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            artists: Vec::new(),
        }
    }

    pub fn add_artist(&mut self, artist: Artist) {
        self.artists.push(artist);
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextArea {
    pub text: String,
    pub style: TextStyle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
    Right,
}

/// Packs children horizontally (HPack) or vertically (VPack)
#[derive(Debug, Clone, PartialEq)]
pub struct Packer {
    pub children: Vec<OffsetBox>,
    pub align: Align,
    pub pad: f64,
    pub sep: f64,
    /// Fixed height; computed from the children when None
    pub height: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum OffsetBox {
    Text(TextArea),
    Drawing(DrawingArea),
    HPack(Packer),
    VPack(Packer),
}

impl OffsetBox {
    pub fn hpack(children: Vec<OffsetBox>, align: Align, pad: f64, sep: f64) -> Self {
        OffsetBox::HPack(Packer {
            children,
            align,
            pad,
            sep,
            height: None,
        })
    }

    pub fn vpack(children: Vec<OffsetBox>, align: Align, pad: f64, sep: f64) -> Self {
        OffsetBox::VPack(Packer {
            children,
            align,
            pad,
            sep,
            height: None,
        })
    }

    pub fn children(&self) -> &[OffsetBox] {
        match self {
            OffsetBox::HPack(p) | OffsetBox::VPack(p) => &p.children,
            _ => &[],
        }
    }

    /// Every text in the tree, depth first
    pub fn texts(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.collect_texts(&mut out);
        out
    }

    fn collect_texts<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            OffsetBox::Text(t) => out.push(&t.text),
            OffsetBox::Drawing(_) => {}
            OffsetBox::HPack(p) | OffsetBox::VPack(p) => {
                for child in &p.children {
                    child.collect_texts(out);
                }
            }
        }
    }

    /// Every artist in the tree, depth first
    pub fn artists(&self) -> Vec<&Artist> {
        match self {
            OffsetBox::Drawing(d) => d.artists.iter().collect(),
            OffsetBox::Text(_) => Vec::new(),
            OffsetBox::HPack(p) | OffsetBox::VPack(p) => {
                p.children.iter().flat_map(|c| c.artists()).collect()
            }
        }
    }
}

// =============================================================================
// Phase 3: Anchored overlays
// =============================================================================

/// Corner or edge of a box that sits on its anchor point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnchorLoc {
    UpperRight,
    UpperLeft,
    LowerLeft,
    LowerRight,
    Right,
    #[default]
    CenterLeft,
    CenterRight,
    LowerCenter,
    UpperCenter,
    Center,
}

impl AnchorLoc {
    /// Horizontal and vertical fractions of the box (0 = left/top, 1 = right/bottom)
    pub fn fractions(&self) -> (f64, f64) {
        match self {
            AnchorLoc::UpperRight => (1.0, 0.0),
            AnchorLoc::UpperLeft => (0.0, 0.0),
            AnchorLoc::LowerLeft => (0.0, 1.0),
            AnchorLoc::LowerRight => (1.0, 1.0),
            AnchorLoc::Right | AnchorLoc::CenterRight => (1.0, 0.5),
            AnchorLoc::CenterLeft => (0.0, 0.5),
            AnchorLoc::LowerCenter => (0.5, 1.0),
            AnchorLoc::UpperCenter => (0.5, 0.0),
            AnchorLoc::Center => (0.5, 0.5),
        }
    }
}

/// A legend block positioned in axes coordinates, outside the data area
#[derive(Debug, Clone, PartialEq)]
pub struct AnchoredBox {
    pub child: OffsetBox,
    pub loc: AnchorLoc,
    /// Anchor point in normalized axes coordinates (origin bottom-left)
    pub bbox_to_anchor: (f64, f64),
    /// Padding inside the box, in font-size units
    pub pad: f64,
    /// Gap between the anchor and the box, in font-size units
    pub borderpad: f64,
    pub frame_on: bool,
    pub clip_on: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aesthetic_order_is_alphabetical() {
        let mut aesthetics = vec![
            Aesthetic::Size,
            Aesthetic::Color,
            Aesthetic::Shape,
            Aesthetic::Alpha,
            Aesthetic::Linetype,
            Aesthetic::Fill,
        ];
        aesthetics.sort();
        let names: Vec<&str> = aesthetics.iter().map(|a| a.name()).collect();
        assert_eq!(names, vec!["alpha", "color", "fill", "linetype", "shape", "size"]);
    }

    #[test]
    fn test_unknown_aesthetic() {
        let err = "opacity".parse::<Aesthetic>().unwrap_err();
        assert!(matches!(err, LegendError::UnknownAesthetic(ref s) if s == "opacity"));
    }

    #[test]
    fn test_unsupported_scale_kind() {
        assert_eq!("continuous".parse::<ScaleKind>().unwrap(), ScaleKind::Continuous);
        assert!(matches!(
            "ordinal".parse::<ScaleKind>(),
            Err(LegendError::UnsupportedScaleKind(_))
        ));
    }

    #[test]
    fn test_legend_key_display_rounds_numbers() {
        assert_eq!(LegendKey::Number(1.0).display(), "1");
        assert_eq!(LegendKey::Number(0.256).display(), "0.26");
        assert_eq!(LegendKey::Number(2.5).display(), "2.5");
        assert_eq!(LegendKey::from("abc").display(), "abc");
    }

    #[test]
    fn test_legend_key_numeric_sort() {
        let mut keys = vec![LegendKey::Number(10.0), LegendKey::Number(2.0), LegendKey::Number(1.5)];
        keys.sort_by(|a, b| a.cmp_label(b));
        assert_eq!(keys, vec![LegendKey::Number(1.5), LegendKey::Number(2.0), LegendKey::Number(10.0)]);
    }

    #[test]
    fn test_mixed_labels_sort_numbers_before_text() {
        let dict: Vec<(VisualValue, LegendKey)> = (0..40)
            .map(|i| {
                let key = if i % 2 == 0 {
                    LegendKey::Number(f64::from(i))
                } else {
                    LegendKey::Text(i.to_string())
                };
                (VisualValue::Size(f64::from(i)), key)
            })
            .collect();
        let entry = LegendEntry::new("w", dict, ScaleKind::Discrete);

        let labels: Vec<String> = entry.sorted_items().iter().map(|(_, k)| k.display()).collect();
        assert_eq!(labels.len(), 40);
        assert_eq!(&labels[..3], &["0", "2", "4"]);
        assert_eq!(labels[19], "38");
        // text labels follow in string order
        assert_eq!(&labels[20..23], &["1", "11", "13"]);

        assert_eq!(LegendKey::Number(10.0).cmp_label(&LegendKey::from("5")), Ordering::Less);
        assert_eq!(LegendKey::from("5").cmp_label(&LegendKey::Number(9.0)), Ordering::Greater);
    }

    #[test]
    fn test_raw_label_keeps_precision() {
        assert_eq!(LegendKey::Number(1.001).raw(), "1.001");
        assert_eq!(LegendKey::Number(1.004).display(), "1");
        assert_eq!(LegendKey::Number(3.0).raw(), "3");
    }

    #[test]
    fn test_colour_spelling_is_not_an_alias() {
        assert!(matches!(
            "colour".parse::<Aesthetic>(),
            Err(LegendError::UnknownAesthetic(ref s)) if s == "colour"
        ));
    }

    #[test]
    fn test_visual_value_parse() {
        assert_eq!(
            VisualValue::parse(Aesthetic::Size, "40").unwrap(),
            VisualValue::Size(40.0)
        );
        assert_eq!(
            VisualValue::parse(Aesthetic::Shape, "s").unwrap(),
            VisualValue::Shape(MarkerShape::Square)
        );
        assert!(VisualValue::parse(Aesthetic::Alpha, "1.5").is_err());
        assert!(VisualValue::parse(Aesthetic::Size, "-3").is_err());
        let err = VisualValue::parse(Aesthetic::Color, "notacolor").unwrap_err();
        assert_eq!(err.to_string(), "Invalid color value 'notacolor'");
    }

    #[test]
    fn test_legend_from_json() {
        let legend = Legend::from_json(
            r#"{
                "size": {"column_name": "weight", "dict": {"1": "blah", "2": "blah2", "15": "blah4"}, "scale_type": "discrete"},
                "color": {"column_name": "cyl", "dict": {"red": 4, "blue": 6}, "scale_type": "continuous"}
            }"#,
        )
        .unwrap();

        assert_eq!(legend.len(), 2);
        assert_eq!(legend.aesthetics().collect::<Vec<_>>(), vec![Aesthetic::Color, Aesthetic::Size]);

        let color = legend.get(Aesthetic::Color).unwrap();
        assert_eq!(color.scale_kind, ScaleKind::Continuous);
        let labels: Vec<String> = color.sorted_items().iter().map(|(_, k)| k.display()).collect();
        assert_eq!(labels, vec!["4", "6"]);
    }

    #[test]
    fn test_legend_from_json_errors() {
        assert!(matches!(
            Legend::from_json(r#"{"glow": {"column_name": "x", "dict": {}}}"#),
            Err(LegendError::UnknownAesthetic(_))
        ));
        assert!(matches!(
            Legend::from_json(r#"{"size": {"column_name": "x", "dict": {}, "scale_type": "log"}}"#),
            Err(LegendError::UnsupportedScaleKind(_))
        ));
        assert!(matches!(
            Legend::from_json(r#"{"shape": {"column_name": "x", "dict": {"hexagon": "a"}}}"#),
            Err(LegendError::InvalidVisualValue { aesthetic: Aesthetic::Shape, .. })
        ));
        assert!(matches!(Legend::from_json("[1, 2]"), Err(LegendError::Json(_))));
    }

    #[test]
    fn test_offset_box_texts_depth_first() {
        let text = |s: &str| {
            OffsetBox::Text(TextArea {
                text: s.to_string(),
                style: TextStyle::default(),
            })
        };
        let tree = OffsetBox::vpack(
            vec![
                text("title"),
                OffsetBox::hpack(
                    vec![OffsetBox::Drawing(DrawingArea::new(10.0, 10.0)), text("a")],
                    Align::Center,
                    5.0,
                    0.0,
                ),
            ],
            Align::Left,
            0.0,
            5.0,
        );
        assert_eq!(tree.texts(), vec!["title", "a"]);
        assert_eq!(tree.children().len(), 2);
    }
}
