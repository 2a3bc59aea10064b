use serde::{Deserialize, Serialize};

/// Cosmetic tag a list is rendered with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorTheme {
    #[default]
    Red,
    Green,
    Gold,
}

impl ColorTheme {
    pub const ALL: [ColorTheme; 3] = [ColorTheme::Red, ColorTheme::Green, ColorTheme::Gold];
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GiftItem {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Seasonal-deal flag. The wire name predates the rename.
    #[serde(rename = "isBlackFriday", default, skip_serializing_if = "std::ops::Not::not")]
    pub seasonal_deal: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_time_sensitive: bool,
    /// Name of the claimant, `None` while unclaimed. Always serialized (as `null`).
    #[serde(default)]
    pub claimed_by: Option<String>,
    /// Only meaningful while `claimed_by` is set.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_purchased: bool,
}

impl GiftItem {
    /// An unclaimed item with only the required fields filled in.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            link: None,
            store: None,
            price: None,
            notes: None,
            seasonal_deal: false,
            is_time_sensitive: false,
            claimed_by: None,
            is_purchased: false,
        }
    }

    pub fn is_claimed(&self) -> bool {
        self.claimed_by.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WishList {
    pub id: String,
    /// Display identity of the owner, compared case-insensitively.
    pub owner: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_link: Option<String>,
    #[serde(default)]
    pub items: Vec<GiftItem>,
    #[serde(default)]
    pub color_theme: ColorTheme,
}

impl WishList {
    pub fn item(&self, item_id: &str) -> Option<&GiftItem> {
        self.items.iter().find(|i| i.id == item_id)
    }

    pub fn item_mut(&mut self, item_id: &str) -> Option<&mut GiftItem> {
        self.items.iter_mut().find(|i| i.id == item_id)
    }

    pub fn is_owned_by(&self, name: &str) -> bool {
        same_name(&self.owner, name)
    }
}

/// The full family snapshot: the unit of persistence and sync.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppData {
    #[serde(default)]
    pub users: Vec<String>,
    #[serde(default)]
    pub lists: Vec<WishList>,
}

impl AppData {
    pub fn is_empty(&self) -> bool {
        self.users.is_empty() && self.lists.is_empty()
    }

    pub fn list(&self, list_id: &str) -> Option<&WishList> {
        self.lists.iter().find(|l| l.id == list_id)
    }

    pub fn list_mut(&mut self, list_id: &str) -> Option<&mut WishList> {
        self.lists.iter_mut().find(|l| l.id == list_id)
    }

    /// Case-insensitive lookup of a list by owner name.
    pub fn list_for_owner(&self, name: &str) -> Option<&WishList> {
        self.lists.iter().find(|l| l.is_owned_by(name))
    }

    /// Case-insensitive lookup of a roster entry, returning the stored spelling.
    pub fn member(&self, name: &str) -> Option<&str> {
        self.users
            .iter()
            .find(|u| same_name(u, name))
            .map(String::as_str)
    }

    /// Fill an empty roster from list owners (first occurrence wins).
    /// Returns true when the roster was rebuilt.
    pub fn backfill_roster(&mut self) -> bool {
        if !self.users.is_empty() || self.lists.is_empty() {
            return false;
        }
        let mut users: Vec<String> = Vec::new();
        for list in &self.lists {
            if !users.contains(&list.owner) {
                users.push(list.owner.clone());
            }
        }
        self.users = users;
        true
    }
}

/// Names are display identities: equal when they match ignoring case.
pub fn same_name(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_wire_names() {
        let mut item = GiftItem::new("m2", "Bath Robe");
        item.seasonal_deal = true;
        item.store = Some("Macys".to_string());

        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["isBlackFriday"], true);
        assert_eq!(json["store"], "Macys");
        assert!(json["claimedBy"].is_null());
        assert!(json.get("isPurchased").is_none());
        assert!(json.get("isTimeSensitive").is_none());
    }

    #[test]
    fn test_parse_sparse_snapshot() {
        let json = r#"{
            "lists": [{
                "id": "list-erin",
                "owner": "Erin",
                "colorTheme": "green",
                "items": [{"id": "e1", "name": "Goose Game", "isTimeSensitive": true}]
            }]
        }"#;
        let data: AppData = serde_json::from_str(json).unwrap();
        assert!(data.users.is_empty());
        assert_eq!(data.lists[0].color_theme, ColorTheme::Green);
        let item = &data.lists[0].items[0];
        assert!(item.is_time_sensitive);
        assert!(!item.is_claimed());
    }

    #[test]
    fn test_backfill_roster_from_owners() {
        let mut data = AppData {
            users: vec![],
            lists: vec![
                WishList {
                    id: "a".into(),
                    owner: "Megan".into(),
                    external_link: None,
                    items: vec![],
                    color_theme: ColorTheme::Red,
                },
                WishList {
                    id: "b".into(),
                    owner: "Megan".into(),
                    external_link: None,
                    items: vec![],
                    color_theme: ColorTheme::Gold,
                },
            ],
        };
        assert!(data.backfill_roster());
        assert_eq!(data.users, vec!["Megan".to_string()]);
        assert!(!data.backfill_roster());
    }

    #[test]
    fn test_lookups_ignore_case() {
        let data = AppData {
            users: vec!["Erin".into()],
            lists: vec![WishList {
                id: "l".into(),
                owner: "Erin".into(),
                external_link: None,
                items: vec![],
                color_theme: ColorTheme::Green,
            }],
        };
        assert_eq!(data.member("erin"), Some("Erin"));
        assert_eq!(data.list_for_owner("ERIN").map(|l| l.id.as_str()), Some("l"));
        assert!(data.list_for_owner("Dan").is_none());
    }
}
