//! Display categories and the free-text classifier that assigns them.

use serde::{Deserialize, Serialize};

/// One of the four fixed display classes of a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Restaurant,
    Bar,
    Rooftop,
    Other,
}

impl Category {
    /// Fixed iteration order used by the legend and the KML folders.
    pub const ALL: [Category; 4] = [
        Category::Restaurant,
        Category::Bar,
        Category::Rooftop,
        Category::Other,
    ];

    /// Stable key used in the generated JavaScript and in KML style ids.
    pub fn key(&self) -> &'static str {
        match self {
            Self::Restaurant => "restaurant",
            Self::Bar => "bar",
            Self::Rooftop => "rooftop",
            Self::Other => "other",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

/// Classify a free-text type label such as "Bar + Restaurant".
///
/// Matching is case-insensitive on the trimmed text and the first rule that
/// applies wins:
/// 1. exactly "rooftop bar" is [`Category::Rooftop`]
/// 2. mentions "bar" but neither "restaurant" nor "food" is [`Category::Bar`]
/// 3. exactly "restaurant" or "lunch" is [`Category::Restaurant`]
/// 4. mentions "bar" together with "restaurant" or "food" is [`Category::Bar`]
/// 5. anything else (including the empty string) is [`Category::Other`]
pub fn classify(type_text: &str) -> Category {
    let t = type_text.trim().to_lowercase();
    let has_bar = t.contains("bar");
    let has_restaurant = t.contains("restaurant");
    let has_food = t.contains("food");

    if t == "rooftop bar" {
        return Category::Rooftop;
    }
    if has_bar && !has_restaurant && !has_food {
        return Category::Bar;
    }
    if t == "restaurant" || t == "lunch" {
        return Category::Restaurant;
    }
    if has_bar && (has_restaurant || has_food) {
        // "Bar + Restaurant", "Bar + Food", "Bar + Foodish"
        return Category::Bar;
    }
    Category::Other
}

/// How a category is drawn on the web map and in the KML document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryStyle {
    /// Legend and badge label
    pub label: String,
    /// Marker color as `#RRGGBB`
    pub color: String,
    /// Font Awesome icon name (without the `fa-` prefix)
    pub icon: String,
    /// Icon image used by the KML style
    pub kml_icon: String,
}

impl CategoryStyle {
    fn new(label: &str, color: &str, icon: &str, kml_icon: &str) -> Self {
        Self {
            label: label.to_string(),
            color: color.to_string(),
            icon: icon.to_string(),
            kml_icon: kml_icon.to_string(),
        }
    }
}

/// Category table: one style per [`Category`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Categories {
    pub restaurant: CategoryStyle,
    pub bar: CategoryStyle,
    pub rooftop: CategoryStyle,
    pub other: CategoryStyle,
}

impl Categories {
    pub fn get(&self, category: Category) -> &CategoryStyle {
        match category {
            Category::Restaurant => &self.restaurant,
            Category::Bar => &self.bar,
            Category::Rooftop => &self.rooftop,
            Category::Other => &self.other,
        }
    }

    /// Styles in [`Category::ALL`] order.
    pub fn iter(&self) -> impl Iterator<Item = (Category, &CategoryStyle)> {
        Category::ALL.into_iter().map(move |c| (c, self.get(c)))
    }
}

impl Default for Categories {
    fn default() -> Self {
        Self {
            restaurant: CategoryStyle::new(
                "Restaurant",
                "#C62828",
                "utensils",
                "https://maps.google.com/mapfiles/kml/shapes/dining.png",
            ),
            bar: CategoryStyle::new(
                "Bar",
                "#1565C0",
                "wine-glass-alt",
                "https://maps.google.com/mapfiles/kml/shapes/bars.png",
            ),
            rooftop: CategoryStyle::new(
                "Rooftop Bar",
                "#0097A7",
                "cocktail",
                "https://maps.google.com/mapfiles/kml/shapes/star.png",
            ),
            other: CategoryStyle::new(
                "Other",
                "#2E7D32",
                "store",
                "https://maps.google.com/mapfiles/kml/shapes/shopping.png",
            ),
        }
    }
}
