use hivecheck_engine::{DeckError, Item, Label, parse_deck};

const SAMPLE_DECK_RAW: &str =
    include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/assets/sample_deck.toml"));

/// Deck used by `play` when no `--deck` is given.
pub fn sample_deck() -> Result<Vec<Item>, DeckError> {
    parse_deck(SAMPLE_DECK_RAW)
}

/// The two tutorial slides: one healthy example, one unhealthy.
pub fn tutorial_slides() -> Vec<Item> {
    vec![
        Item::new(
            "tutorial-1",
            "https://images.unsplash.com/photo-1549625907-5f7ae0f2f6a6?w=1200",
            Label::Healthy,
        )
        .with_caption("Healthy hive: bees are active, combs look clean and consistent."),
        Item::new(
            "tutorial-2",
            "https://images.unsplash.com/photo-1517841905240-472988babdf9?w=1200",
            Label::Unhealthy,
        )
        .with_caption("Unhealthy signs: discolored combs, few bees, visible pests or mold."),
    ]
}
