/// Keyword-driven gift ideas for someone starting an empty list.
use crate::types::GiftItem;

/// Gift name and its search query, grouped by interest keyword.
type Ideas = &'static [(&'static str, &'static str)];

const CATALOGUE: &[(&str, Ideas)] = &[
    (
        "cooking",
        &[
            ("Cast Iron Skillet", "cast+iron+skillet"),
            ("Kitchen Stand Mixer", "kitchen+stand+mixer"),
            ("Chef's Knife Set", "chef+knife+set"),
            ("Cookbook Collection", "cookbook+collection"),
            ("Air Fryer", "air+fryer"),
        ],
    ),
    (
        "reading",
        &[
            ("Kindle E-Reader", "kindle+e-reader"),
            ("Book Light", "reading+book+light"),
            ("Bookends Set", "decorative+bookends"),
            ("Reading Pillow", "reading+pillow"),
            ("Book Subscription Box", "book+subscription+box"),
        ],
    ),
    (
        "gaming",
        &[
            ("Gaming Headset", "gaming+headset"),
            ("Mechanical Keyboard", "mechanical+gaming+keyboard"),
            ("Gaming Mouse", "gaming+mouse"),
            ("Game Gift Card", "gaming+gift+card"),
            ("Controller Charging Station", "controller+charging+station"),
        ],
    ),
    (
        "sports",
        &[
            ("Fitness Tracker", "fitness+tracker"),
            ("Yoga Mat", "yoga+mat"),
            ("Water Bottle", "insulated+water+bottle"),
            ("Resistance Bands", "resistance+bands"),
            ("Sports Jersey", "sports+jersey"),
        ],
    ),
    (
        "music",
        &[
            ("Bluetooth Speaker", "bluetooth+speaker"),
            ("Noise Cancelling Headphones", "noise+cancelling+headphones"),
            ("Vinyl Record Player", "vinyl+record+player"),
            ("Guitar Picks Set", "guitar+picks+set"),
            ("Music Streaming Subscription", "music+streaming+gift+card"),
        ],
    ),
];

const DEFAULT_IDEAS: Ideas = &[
    ("Cozy Blanket", "cozy+blanket"),
    ("Scented Candle Set", "scented+candle+set"),
    ("Coffee Mug", "unique+coffee+mug"),
    ("Photo Frame", "picture+frame"),
    ("Gift Card", "gift+card"),
];

/// Suggest gifts for the first category named in `interests`, else a generic set.
/// Every call returns fresh item ids.
pub fn suggest_gifts(interests: &str) -> Vec<GiftItem> {
    let interests = interests.to_lowercase();
    let ideas = CATALOGUE
        .iter()
        .find(|(keyword, _)| interests.contains(keyword))
        .map(|(_, ideas)| *ideas)
        .unwrap_or(DEFAULT_IDEAS);

    ideas
        .iter()
        .map(|(name, query)| {
            let mut item = GiftItem::new(uuid::Uuid::new_v4().to_string(), *name);
            item.link = Some(format!("https://www.google.com/search?q={query}"));
            item
        })
        .collect()
}
