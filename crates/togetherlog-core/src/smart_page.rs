//! Smart Page rules engine.
//!
//! Maps an entry's photo count, tag names and first-photo colors onto a
//! layout, a color theme and up to a handful of sprinkle icons. Every rule is
//! a pure function; the worker in [`crate::workers`] owns fetching and
//! persisting.

use crate::types::{ColorTheme, LayoutType, Photo, SmartPage, SprinkleIcon};

/// Layouts never show more than this many photos.
pub const MAX_DISPLAYED_PHOTOS: usize = 6;

/// Sprinkles collected from tags stop at this count.
pub const MAX_TAG_SPRINKLES: usize = 3;

/// Theme groups in priority order. The first group with any member present
/// in the tag set decides the theme.
const THEME_PRIORITY: &[(&[&str], ColorTheme)] = &[
    (
        &["Romantic Moments", "In Love", "Anniversary"],
        ColorTheme::WarmRed,
    ),
    (
        &["Nature & Hiking", "Adventure / Sports"],
        ColorTheme::EarthGreen,
    ),
    (&["Lake / Beach"], ColorTheme::OceanBlue),
    (&["Nightlife"], ColorTheme::DeepPurple),
    (
        &["Food & Restaurant", "Home & Everyday Life"],
        ColorTheme::WarmEarth,
    ),
    (
        &["Travel", "Roadtrip", "City & Sightseeing"],
        ColorTheme::SoftRose,
    ),
];

/// Tags whose presence always adds a `sun` sprinkle.
const SUN_TAGS: &[&str] = &["Lake / Beach", "Nature & Hiking"];

fn sprinkle_for_tag(tag: &str) -> Option<SprinkleIcon> {
    match tag {
        "Romantic Moments" | "In Love" | "Anniversary" => Some(SprinkleIcon::Heart),
        "Nature & Hiking" | "Adventure / Sports" => Some(SprinkleIcon::Mountain),
        "Lake / Beach" => Some(SprinkleIcon::Beach),
        "Travel" | "Roadtrip" => Some(SprinkleIcon::Airplane),
        "Food & Restaurant" => Some(SprinkleIcon::Utensils),
        "Surprise / Gift" => Some(SprinkleIcon::Gift),
        "Birthday" => Some(SprinkleIcon::Balloon),
        "Happy" => Some(SprinkleIcon::Star),
        _ => None,
    }
}

// ── TagSet ────────────────────────────────────────────────────

/// Tag names with duplicates removed and first-seen order kept.
///
/// Theme selection only asks membership questions; sprinkle collection walks
/// the names in order, so both views live here.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagSet {
    names: Vec<String>,
}

impl TagSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `name` unless already present. Returns whether it was added.
    pub fn insert(&mut self, name: impl Into<String>) -> bool {
        let name = name.into();
        if self.contains(&name) {
            return false;
        }
        self.names.push(name);
        true
    }

    /// Case-sensitive exact match.
    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    pub fn contains_any(&self, names: &[&str]) -> bool {
        names.iter().any(|n| self.contains(n))
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn into_vec(self) -> Vec<String> {
        self.names
    }
}

impl<S: Into<String>> FromIterator<S> for TagSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = TagSet::new();
        for name in iter {
            set.insert(name);
        }
        set
    }
}

// ── Rules ─────────────────────────────────────────────────────

pub fn compute_layout_type(photo_count: usize) -> LayoutType {
    match photo_count {
        0 | 1 => LayoutType::SingleFull,
        2..=4 => LayoutType::Grid2x2,
        _ => LayoutType::Grid3x2,
    }
}

pub fn compute_color_theme(tags: &TagSet, photos: &[Photo]) -> ColorTheme {
    THEME_PRIORITY
        .iter()
        .find(|(group, _)| tags.contains_any(group))
        .map(|(_, theme)| *theme)
        .or_else(|| photos.first().and_then(theme_from_first_color))
        .unwrap_or(ColorTheme::Neutral)
}

/// Strict-max channel of the photo's most dominant color. Ties yield `None`.
fn theme_from_first_color(photo: &Photo) -> Option<ColorTheme> {
    let [r, g, b] = photo.first_dominant_color()?.rgb;
    if r > g && r > b {
        Some(ColorTheme::WarmRed)
    } else if g > r && g > b {
        Some(ColorTheme::EarthGreen)
    } else if b > r && b > g {
        Some(ColorTheme::OceanBlue)
    } else {
        None
    }
}

pub fn compute_sprinkles(tags: &TagSet) -> Vec<SprinkleIcon> {
    let mut sprinkles: Vec<SprinkleIcon> = Vec::with_capacity(MAX_TAG_SPRINKLES + 1);

    for icon in tags.iter().filter_map(sprinkle_for_tag) {
        if !sprinkles.contains(&icon) {
            sprinkles.push(icon);
            if sprinkles.len() >= MAX_TAG_SPRINKLES {
                break;
            }
        }
    }

    // Not capped: a fourth icon is possible here.
    if tags.contains_any(SUN_TAGS) && !sprinkles.contains(&SprinkleIcon::Sun) {
        sprinkles.push(SprinkleIcon::Sun);
    }

    sprinkles
}

pub fn compute_smart_page(photo_count: usize, tags: &TagSet, photos: &[Photo]) -> SmartPage {
    SmartPage {
        page_layout_type: compute_layout_type(photo_count),
        color_theme: compute_color_theme(tags, photos),
        sprinkles: compute_sprinkles(tags),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DominantColor;
    use uuid::Uuid;

    fn tags(names: &[&str]) -> TagSet {
        names.iter().copied().collect()
    }

    fn photo_with_rgb(rgb: [u8; 3]) -> Photo {
        let mut photo = Photo::uploaded(Uuid::new_v4(), "p.jpg");
        photo.dominant_colors = Some(vec![DominantColor {
            hex: String::new(),
            rgb,
            percentage: 60.0,
        }]);
        photo
    }

    #[test]
    fn layout_table() {
        assert_eq!(compute_layout_type(0), LayoutType::SingleFull);
        assert_eq!(compute_layout_type(1), LayoutType::SingleFull);
        assert_eq!(compute_layout_type(2), LayoutType::Grid2x2);
        assert_eq!(compute_layout_type(3), LayoutType::Grid2x2);
        assert_eq!(compute_layout_type(4), LayoutType::Grid2x2);
        assert_eq!(compute_layout_type(5), LayoutType::Grid3x2);
        assert_eq!(compute_layout_type(6), LayoutType::Grid3x2);
    }

    #[test]
    fn layout_many_photos_is_grid_3x2() {
        for count in [7, 8, 50, 10_000] {
            assert_eq!(compute_layout_type(count), LayoutType::Grid3x2);
            assert_eq!(compute_layout_type(count), LayoutType::Grid3x2);
        }
    }

    #[test]
    fn empty_inputs_give_defaults() {
        let page = compute_smart_page(0, &TagSet::new(), &[]);
        assert_eq!(page.page_layout_type, LayoutType::SingleFull);
        assert_eq!(page.color_theme, ColorTheme::Neutral);
        assert!(page.sprinkles.is_empty());
        assert_eq!(page, SmartPage::default());
    }

    #[test]
    fn theme_priority_follows_group_order() {
        let cases: &[(&[&str], ColorTheme)] = &[
            (&["Travel", "Anniversary"], ColorTheme::WarmRed),
            (&["Lake / Beach", "Adventure / Sports"], ColorTheme::EarthGreen),
            (&["Nightlife", "Lake / Beach"], ColorTheme::OceanBlue),
            (&["Home & Everyday Life", "Nightlife"], ColorTheme::DeepPurple),
            (&["City & Sightseeing", "Food & Restaurant"], ColorTheme::WarmEarth),
            (&["Roadtrip"], ColorTheme::SoftRose),
        ];
        for (names, expected) in cases {
            assert_eq!(
                compute_color_theme(&tags(names), &[]),
                *expected,
                "tags {names:?}"
            );
        }
    }

    #[test]
    fn theme_matching_is_case_sensitive() {
        assert_eq!(
            compute_color_theme(&tags(&["nightlife", "lake / beach"]), &[]),
            ColorTheme::Neutral
        );
    }

    #[test]
    fn tag_theme_beats_photo_color() {
        let photos = [photo_with_rgb([0, 0, 255])];
        assert_eq!(
            compute_color_theme(&tags(&["Nightlife"]), &photos),
            ColorTheme::DeepPurple
        );
    }

    #[test]
    fn color_fallback_uses_strict_max_channel() {
        let none = TagSet::new();
        assert_eq!(
            compute_color_theme(&none, &[photo_with_rgb([200, 10, 10])]),
            ColorTheme::WarmRed
        );
        assert_eq!(
            compute_color_theme(&none, &[photo_with_rgb([10, 200, 10])]),
            ColorTheme::EarthGreen
        );
        assert_eq!(
            compute_color_theme(&none, &[photo_with_rgb([10, 10, 200])]),
            ColorTheme::OceanBlue
        );
    }

    #[test]
    fn color_fallback_ties_are_neutral() {
        let none = TagSet::new();
        assert_eq!(
            compute_color_theme(&none, &[photo_with_rgb([120, 120, 10])]),
            ColorTheme::Neutral
        );
        assert_eq!(
            compute_color_theme(&none, &[photo_with_rgb([90, 90, 90])]),
            ColorTheme::Neutral
        );
    }

    #[test]
    fn color_fallback_only_reads_first_photo() {
        let mut first = Photo::uploaded(Uuid::new_v4(), "a.jpg");
        first.dominant_colors = None;
        let photos = [first, photo_with_rgb([255, 0, 0])];
        assert_eq!(
            compute_color_theme(&TagSet::new(), &photos),
            ColorTheme::Neutral
        );
    }

    #[test]
    fn color_fallback_empty_palette_is_neutral() {
        let mut photo = Photo::uploaded(Uuid::new_v4(), "a.jpg");
        photo.dominant_colors = Some(vec![]);
        assert_eq!(
            compute_color_theme(&TagSet::new(), &[photo]),
            ColorTheme::Neutral
        );
    }

    #[test]
    fn duplicate_icons_collapse() {
        assert_eq!(
            compute_sprinkles(&tags(&["Romantic Moments", "Anniversary"])),
            vec![SprinkleIcon::Heart]
        );
    }

    #[test]
    fn beach_adds_sun() {
        assert_eq!(
            compute_sprinkles(&tags(&["Lake / Beach"])),
            vec![SprinkleIcon::Beach, SprinkleIcon::Sun]
        );
    }

    #[test]
    fn sprinkles_keep_tag_order_and_stop_at_three() {
        let set = tags(&["Happy", "Birthday", "Travel", "Surprise / Gift", "Food & Restaurant"]);
        assert_eq!(
            compute_sprinkles(&set),
            vec![
                SprinkleIcon::Star,
                SprinkleIcon::Balloon,
                SprinkleIcon::Airplane
            ]
        );
    }

    #[test]
    fn sun_is_added_after_cap() {
        let set = tags(&["Happy", "Birthday", "Travel", "Nature & Hiking"]);
        assert_eq!(
            compute_sprinkles(&set),
            vec![
                SprinkleIcon::Star,
                SprinkleIcon::Balloon,
                SprinkleIcon::Airplane,
                SprinkleIcon::Sun
            ]
        );
    }

    #[test]
    fn tag_phase_never_exceeds_three_or_repeats() {
        let all = [
            "Romantic Moments",
            "In Love",
            "Anniversary",
            "Nature & Hiking",
            "Lake / Beach",
            "Travel",
            "Roadtrip",
            "Food & Restaurant",
            "Surprise / Gift",
            "Birthday",
            "Happy",
            "Adventure / Sports",
        ];
        for start in 0..all.len() {
            let rotated: TagSet = all[start..].iter().chain(&all[..start]).copied().collect();
            let sprinkles = compute_sprinkles(&rotated);
            let from_tags: Vec<_> = sprinkles
                .iter()
                .filter(|s| **s != SprinkleIcon::Sun)
                .collect();
            assert!(from_tags.len() <= MAX_TAG_SPRINKLES);
            let unique: std::collections::HashSet<_> = sprinkles.iter().collect();
            assert_eq!(unique.len(), sprinkles.len());
        }
    }

    #[test]
    fn unknown_tags_give_no_sprinkles() {
        assert!(compute_sprinkles(&tags(&["Nightlife", "Work"])).is_empty());
    }

    #[test]
    fn compute_is_deterministic() {
        let set = tags(&["Nature & Hiking", "Happy", "Travel"]);
        let photos = [photo_with_rgb([1, 2, 3])];
        let first = compute_smart_page(5, &set, &photos);
        for _ in 0..10 {
            assert_eq!(compute_smart_page(5, &set, &photos), first);
        }
        assert_eq!(first.page_layout_type, LayoutType::Grid3x2);
        assert_eq!(first.color_theme, ColorTheme::EarthGreen);
        assert_eq!(
            first.sprinkles,
            vec![
                SprinkleIcon::Mountain,
                SprinkleIcon::Star,
                SprinkleIcon::Airplane,
                SprinkleIcon::Sun
            ]
        );
    }

    #[test]
    fn tag_set_dedupes_and_keeps_first_position() {
        let set = tags(&["Happy", "Travel", "Happy"]);
        assert_eq!(set.len(), 2);
        assert_eq!(set.iter().collect::<Vec<_>>(), vec!["Happy", "Travel"]);
    }
}
