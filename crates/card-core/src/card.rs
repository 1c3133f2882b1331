//! Card records and the immutable card set.

use std::collections::HashSet;

use crate::error::CardError;
use crate::ids::CardId;
use serde::{Deserialize, Serialize};

/// Word limit applied to product excerpts.
pub const PRODUCT_EXCERPT_WORDS: usize = 25;

/// Word limit applied to post excerpts.
pub const POST_EXCERPT_WORDS: usize = 30;

/// Marker appended to an excerpt that was cut short.
pub const MORE_MARKER: &str = "\u{2026}";

/// What a card represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CardKind {
    /// A catalog product.
    #[default]
    Product,
    /// A blog post or article.
    Post,
}

impl CardKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CardKind::Product => "product",
            CardKind::Post => "post",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "product" => Some(CardKind::Product),
            "post" => Some(CardKind::Post),
            _ => None,
        }
    }

    /// Maximum number of excerpt words shown for this kind.
    pub fn excerpt_words(&self) -> usize {
        match self {
            CardKind::Product => PRODUCT_EXCERPT_WORDS,
            CardKind::Post => POST_EXCERPT_WORDS,
        }
    }
}

/// Badge shown over the card image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Badge {
    Sale,
    Featured,
}

impl Badge {
    pub fn label(&self) -> &'static str {
        match self {
            Badge::Sale => "Sale",
            Badge::Featured => "Featured",
        }
    }
}

/// Card image, or a placeholder when the item has none.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum CardImage {
    Url {
        src: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        alt: Option<String>,
    },
    #[default]
    Placeholder,
}

impl CardImage {
    pub fn is_placeholder(&self) -> bool {
        matches!(self, CardImage::Placeholder)
    }
}

/// Kind of call-to-action button in the card footer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CtaKind {
    /// Link to the product page.
    View,
    /// Add the product to the cart.
    AddToCart,
    /// Link to the full article.
    ReadMore,
}

/// Call-to-action link of a card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallToAction {
    pub kind: CtaKind,
    pub label: String,
    pub url: String,
}

/// A single card as supplied by the card source.
///
/// The carousel never looks inside a card; it only counts and positions
/// them. The fields are what the card source renders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    /// Unique card identifier.
    pub id: CardId,
    /// Product or post.
    pub kind: CardKind,
    /// Display title.
    pub title: String,
    /// Permalink of the underlying item.
    pub link: String,
    /// Card image.
    #[serde(default)]
    pub image: CardImage,
    /// Short text, already trimmed to the kind's word limit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,
    /// Formatted price (products only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,
    /// Formatted publication date (posts only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    /// Badges, sale first.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub badges: Vec<Badge>,
    /// Footer button.
    pub call_to_action: CallToAction,
}

impl Card {
    /// Create a product card linking to its product page.
    pub fn product(
        id: impl Into<CardId>,
        title: impl Into<String>,
        link: impl Into<String>,
    ) -> Self {
        let link = link.into();
        Self {
            id: id.into(),
            kind: CardKind::Product,
            title: title.into(),
            call_to_action: CallToAction {
                kind: CtaKind::View,
                label: "View Product".to_string(),
                url: link.clone(),
            },
            link,
            image: CardImage::Placeholder,
            excerpt: None,
            price: None,
            date: None,
            badges: Vec::new(),
        }
    }

    /// Create a post card with a "Read More" button.
    pub fn post(id: impl Into<CardId>, title: impl Into<String>, link: impl Into<String>) -> Self {
        let link = link.into();
        Self {
            id: id.into(),
            kind: CardKind::Post,
            title: title.into(),
            call_to_action: CallToAction {
                kind: CtaKind::ReadMore,
                label: "Read More".to_string(),
                url: link.clone(),
            },
            link,
            image: CardImage::Placeholder,
            excerpt: None,
            price: None,
            date: None,
            badges: Vec::new(),
        }
    }

    /// Set the card image.
    pub fn with_image(mut self, src: impl Into<String>, alt: Option<String>) -> Self {
        self.image = CardImage::Url {
            src: src.into(),
            alt,
        };
        self
    }

    /// Set the excerpt, trimmed to the word limit of the card kind.
    ///
    /// Blank text leaves the card without an excerpt.
    pub fn with_excerpt(mut self, text: &str) -> Self {
        let trimmed = trim_words(text, self.kind.excerpt_words());
        self.excerpt = (!trimmed.is_empty()).then_some(trimmed);
        self
    }

    /// Set the formatted price.
    pub fn with_price(mut self, price: impl Into<String>) -> Self {
        self.price = Some(price.into());
        self
    }

    /// Set the formatted publication date.
    pub fn with_date(mut self, date: impl Into<String>) -> Self {
        self.date = Some(date.into());
        self
    }

    /// Derive badges from the sale and featured flags.
    pub fn with_badges(mut self, on_sale: bool, featured: bool) -> Self {
        self.badges.clear();
        if on_sale {
            self.badges.push(Badge::Sale);
        }
        if featured {
            self.badges.push(Badge::Featured);
        }
        self
    }

    /// Replace the footer button with an add-to-cart action.
    pub fn with_add_to_cart(mut self, url: impl Into<String>, label: impl Into<String>) -> Self {
        self.call_to_action = CallToAction {
            kind: CtaKind::AddToCart,
            label: label.into(),
            url: url.into(),
        };
        self
    }

    /// Check the fields every rendered card needs.
    pub fn validate(&self) -> Result<(), CardError> {
        if self.title.trim().is_empty() {
            return Err(CardError::EmptyTitle(self.id.to_string()));
        }
        if self.link.trim().is_empty() {
            return Err(CardError::EmptyLink(self.id.to_string()));
        }
        Ok(())
    }
}

/// Trim `text` to at most `limit` whitespace-separated words.
///
/// Runs of whitespace collapse to a single space. When words are dropped the
/// result ends with [`MORE_MARKER`].
pub fn trim_words(text: &str, limit: usize) -> String {
    let words: Vec<&str> = text.split_whitespace().collect();
    if words.len() <= limit {
        return words.join(" ");
    }
    let mut out = words[..limit].join(" ");
    out.push_str(MORE_MARKER);
    out
}

/// Ordered, fixed-length sequence of cards.
///
/// There is no way to add, remove or reorder cards once the set exists.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardSet {
    cards: Vec<Card>,
}

impl CardSet {
    /// Wrap an ordered list of cards without validation.
    pub fn new(cards: Vec<Card>) -> Self {
        Self { cards }
    }

    /// Wrap an ordered list of cards, rejecting invalid or duplicate records.
    pub fn try_new(cards: Vec<Card>) -> Result<Self, CardError> {
        let mut seen = HashSet::new();
        for card in &cards {
            card.validate()?;
            if !seen.insert(card.id.as_str()) {
                return Err(CardError::DuplicateCard(card.id.to_string()));
            }
        }
        Ok(Self { cards })
    }

    /// Number of cards.
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Card at `position`.
    pub fn get(&self, position: usize) -> Option<&Card> {
        self.cards.get(position)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Card> {
        self.cards.iter()
    }

    pub fn as_slice(&self) -> &[Card] {
        &self.cards
    }

    /// Number of pages needed to show every card `items_per_view` at a time.
    pub fn page_count(&self, items_per_view: usize) -> usize {
        self.cards.len().div_ceil(items_per_view.max(1))
    }
}

impl FromIterator<Card> for CardSet {
    fn from_iter<I: IntoIterator<Item = Card>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a CardSet {
    type Item = &'a Card;
    type IntoIter = std::slice::Iter<'a, Card>;

    fn into_iter(self) -> Self::IntoIter {
        self.cards.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_card_defaults() {
        let card = Card::product("p-1", "Rust Mug", "/product/rust-mug");
        assert_eq!(card.kind, CardKind::Product);
        assert_eq!(card.call_to_action.kind, CtaKind::View);
        assert_eq!(card.call_to_action.label, "View Product");
        assert_eq!(card.call_to_action.url, "/product/rust-mug");
        assert!(card.image.is_placeholder());
        assert!(card.validate().is_ok());
    }

    #[test]
    fn test_post_card_defaults() {
        let card = Card::post("a-1", "Release notes", "/blog/release").with_date("May 2, 2025");
        assert_eq!(card.call_to_action.kind, CtaKind::ReadMore);
        assert_eq!(card.call_to_action.label, "Read More");
        assert_eq!(card.date.as_deref(), Some("May 2, 2025"));
    }

    #[test]
    fn test_badges_order() {
        let card = Card::product("p-1", "Mug", "/m").with_badges(true, true);
        assert_eq!(card.badges, vec![Badge::Sale, Badge::Featured]);

        let card = card.with_badges(false, true);
        assert_eq!(card.badges, vec![Badge::Featured]);
        assert_eq!(card.badges[0].label(), "Featured");
    }

    #[test]
    fn test_add_to_cart() {
        let card = Card::product("p-1", "Mug", "/m").with_add_to_cart("/?add-to-cart=1", "Add to cart");
        assert_eq!(card.call_to_action.kind, CtaKind::AddToCart);
        assert_eq!(card.call_to_action.url, "/?add-to-cart=1");
        assert_eq!(card.link, "/m");
    }

    #[test]
    fn test_trim_words() {
        assert_eq!(trim_words("  one   two three ", 5), "one two three");
        assert_eq!(trim_words("one two three", 2), "one two\u{2026}");
        assert_eq!(trim_words("", 3), "");
    }

    #[test]
    fn test_excerpt_word_limits() {
        let long = (0..40).map(|n| format!("w{n}")).collect::<Vec<_>>().join(" ");

        let product = Card::product("p-1", "Mug", "/m").with_excerpt(&long);
        let excerpt = product.excerpt.unwrap();
        assert_eq!(excerpt.split_whitespace().count(), PRODUCT_EXCERPT_WORDS);
        assert!(excerpt.ends_with(MORE_MARKER));

        let post = Card::post("a-1", "News", "/n").with_excerpt(&long);
        assert_eq!(
            post.excerpt.unwrap().split_whitespace().count(),
            POST_EXCERPT_WORDS
        );

        let blank = Card::post("a-2", "News", "/n").with_excerpt("   ");
        assert!(blank.excerpt.is_none());
    }

    #[test]
    fn test_validate_rejects_empty_fields() {
        let card = Card::product("p-1", " ", "/m");
        assert_eq!(card.validate(), Err(CardError::EmptyTitle("p-1".into())));

        let card = Card::product("p-2", "Mug", "");
        assert_eq!(card.validate(), Err(CardError::EmptyLink("p-2".into())));
    }

    #[test]
    fn test_card_set_rejects_duplicates() {
        let cards = vec![
            Card::product("p-1", "Mug", "/m"),
            Card::product("p-1", "Cup", "/c"),
        ];
        assert_eq!(
            CardSet::try_new(cards),
            Err(CardError::DuplicateCard("p-1".into()))
        );
    }

    #[test]
    fn test_card_set_order_and_pages() {
        let set: CardSet = (0..10)
            .map(|n| Card::product(format!("p-{n}"), format!("Item {n}"), format!("/p/{n}")))
            .collect();

        assert_eq!(set.len(), 10);
        assert_eq!(set.get(3).unwrap().id.as_str(), "p-3");
        assert_eq!(set.page_count(3), 4);
        assert_eq!(set.page_count(0), 10);
        assert_eq!(CardSet::default().page_count(3), 0);
    }

    #[test]
    fn test_card_kind_from_str() {
        assert_eq!(CardKind::from_str("POST"), Some(CardKind::Post));
        assert_eq!(CardKind::from_str("page"), None);
        assert_eq!(CardKind::Product.as_str(), "product");
    }

    #[test]
    fn test_card_json_shape() {
        let card = Card::product("p-1", "Mug", "/m")
            .with_image("/img/mug.jpg", None)
            .with_price("$12.00");
        let json = serde_json::to_value(&card).unwrap();
        assert_eq!(json["kind"], "product");
        assert_eq!(json["image"]["type"], "url");
        assert_eq!(json["call_to_action"]["kind"], "view");
        assert!(json.get("badges").is_none());
    }
}
