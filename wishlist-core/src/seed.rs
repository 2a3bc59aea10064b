/// Starter content used when neither the cache nor the remote bucket has data.
use crate::types::{AppData, ColorTheme, GiftItem, WishList};

struct SeedItem {
    id: &'static str,
    name: &'static str,
    store: Option<&'static str>,
    price: Option<&'static str>,
    link: Option<&'static str>,
    notes: Option<&'static str>,
    seasonal_deal: bool,
}

const fn item(id: &'static str, name: &'static str) -> SeedItem {
    SeedItem {
        id,
        name,
        store: None,
        price: None,
        link: None,
        notes: None,
        seasonal_deal: false,
    }
}

impl SeedItem {
    const fn store(mut self, store: &'static str) -> Self {
        self.store = Some(store);
        self
    }

    const fn price(mut self, price: &'static str) -> Self {
        self.price = Some(price);
        self
    }

    const fn link(mut self, link: &'static str) -> Self {
        self.link = Some(link);
        self
    }

    const fn notes(mut self, notes: &'static str) -> Self {
        self.notes = Some(notes);
        self
    }

    const fn deal(mut self) -> Self {
        self.seasonal_deal = true;
        self
    }

    fn build(&self) -> GiftItem {
        let mut gift = GiftItem::new(self.id, self.name);
        gift.store = self.store.map(String::from);
        gift.price = self.price.map(String::from);
        gift.link = self.link.map(String::from);
        gift.notes = self.notes.map(String::from);
        gift.seasonal_deal = self.seasonal_deal;
        gift
    }
}

const MEGAN: &[SeedItem] = &[
    item("m1", "Cicaplast Lotion").store("Target").price("$19"),
    item("m2", "Bath Robe (Pink S/M)").store("Macys").price("$70").deal(),
    item("m3", "Vacuum filter replacements").store("Walmart").price("$17"),
    item("m4", "Mini trash cans with lids (2 of them)")
        .store("Target")
        .price("$34 for two")
        .notes("$17 each"),
    item("m5", "Plug in carbon monoxide detector").store("Target (or any)").price("$30"),
    item("m6", "Heat protector spray").store("Amazon").price("$15").deal(),
    item("m7", "[Stocking Stuffer] Baby hats/mittens").store("Target").price("$10"),
    item("m8", "[Stocking Stuffer] Baby socks").store("Target").price("$10"),
    item("m9", "[Stocking Stuffer] Pepcid").store("Target/Any").price("$15"),
    item("m10", "[Stocking Stuffer] Diaper pail refill").store("Target").price("$15"),
    item("m11", "[Stocking Stuffer] White shower liner").store("Target").price("$4"),
    item("m12", "[Stocking Stuffer] Compact mini travel umbrella")
        .store("Amazon")
        .price("$11")
        .deal(),
];

const ERIN: &[SeedItem] = &[
    item("e1", "Untitled Goose Game")
        .store("Walmart")
        .link("https://www.walmart.com/ip/Untitled-Goose-Game-SKYBOUND-Nintendo-Switch/772817774")
        .notes("Unclear if Black Friday sale or normal"),
    item("e2", "Basic picture frames")
        .notes("9x12 black (1 qty), 11x14 light gray or light wood (1 qty)"),
    item("e3", "Large drying rack")
        .store("Amazon")
        .link("https://www.amazon.com/gp/product/B07TLK6QHD")
        .deal(),
    item("e4", "Window hammock")
        .store("Amazon")
        .link("https://www.amazon.com/gp/product/B0CMT5C8XC")
        .deal(),
    item("e5", "Stainless steel trash can (10-13 gal)")
        .store("Amazon/Home Depot")
        .notes("No plastic inner liner. See links.")
        .link("https://www.amazon.com/GLD-74506-Stainless-Clorox-Protection-Kitchen/dp/B07GY9TFTY"),
];

/// The predefined starter snapshot: two members, one list each.
pub fn seed_data() -> AppData {
    AppData {
        users: vec!["Megan".to_string(), "Erin".to_string()],
        lists: vec![
            WishList {
                id: "list-megan".to_string(),
                owner: "Megan".to_string(),
                external_link: None,
                items: MEGAN.iter().map(SeedItem::build).collect(),
                color_theme: ColorTheme::Red,
            },
            WishList {
                id: "list-erin".to_string(),
                owner: "Erin".to_string(),
                external_link: None,
                items: ERIN.iter().map(SeedItem::build).collect(),
                color_theme: ColorTheme::Green,
            },
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_seed_shape() {
        let seed = seed_data();
        assert_eq!(seed.users, vec!["Megan", "Erin"]);
        assert_eq!(seed.lists[0].items.len(), 12);
        assert_eq!(seed.lists[1].items.len(), 5);
        assert!(seed.lists.iter().flat_map(|l| &l.items).all(|i| !i.is_claimed()));
    }

    #[test]
    fn test_seed_item_ids_unique() {
        let seed = seed_data();
        let ids: HashSet<_> = seed.lists.iter().flat_map(|l| &l.items).map(|i| &i.id).collect();
        assert_eq!(ids.len(), 17);
    }
}
