/// Mutations the UI performs on a snapshot before handing it to `save`.
///
/// Each action edits an `AppData` in place. Business-rule refusals that the
/// user should hear about are `ActionError`s; refusals that are simply no-ops
/// (claiming an item someone else holds) come back as `ClaimOutcome::Unchanged`.
use serde::{Deserialize, Serialize};

use crate::types::{same_name, AppData, ColorTheme, GiftItem, WishList};

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ActionError {
    #[error("Pick your name before claiming gifts")]
    NoActor,

    #[error("Name must not be empty")]
    EmptyName,

    #[error("List not found: {0}")]
    UnknownList(String),

    #[error("Item {item_id} not found in list {list_id}")]
    UnknownItem { list_id: String, item_id: String },
}

/// Form input for a new gift. Blank optional strings are stored as absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewGiftItem {
    pub name: String,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub store: Option<String>,
    #[serde(default)]
    pub price: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub seasonal_deal: bool,
    #[serde(default)]
    pub is_time_sensitive: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClaimOutcome {
    Claimed,
    Unclaimed,
    Unchanged,
}

/// One entry of the "my claims" view.
#[derive(Debug, Clone, PartialEq)]
pub struct ClaimedGift<'a> {
    pub list: &'a WishList,
    pub item: &'a GiftItem,
}

fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl AppData {
    /// Add a family member and give them an empty list.
    /// An existing member (any casing) is returned as stored, without changes.
    pub fn add_member(&mut self, name: &str) -> Result<String, ActionError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ActionError::EmptyName);
        }
        if let Some(existing) = self.member(name) {
            return Ok(existing.to_string());
        }

        self.users.push(name.to_string());
        if self.list_for_owner(name).is_none() {
            self.push_list(name);
        }
        Ok(name.to_string())
    }

    /// Create a list for `owner`, or return the id of the list they already have.
    pub fn create_list(&mut self, owner: &str) -> Result<String, ActionError> {
        let owner = owner.trim();
        if owner.is_empty() {
            return Err(ActionError::EmptyName);
        }
        if let Some(existing) = self.list_for_owner(owner) {
            return Ok(existing.id.clone());
        }
        if self.member(owner).is_none() {
            self.users.push(owner.to_string());
        }
        Ok(self.push_list(owner))
    }

    fn push_list(&mut self, owner: &str) -> String {
        let id = new_id();
        let color_theme = ColorTheme::ALL[self.lists.len() % ColorTheme::ALL.len()];
        self.lists.push(WishList {
            id: id.clone(),
            owner: owner.to_string(),
            external_link: None,
            items: Vec::new(),
            color_theme,
        });
        id
    }

    /// Append a new unclaimed item to a list. Returns the new item id.
    pub fn add_item(&mut self, list_id: &str, input: NewGiftItem) -> Result<String, ActionError> {
        let name = input.name.trim().to_string();
        if name.is_empty() {
            return Err(ActionError::EmptyName);
        }
        let list = self
            .list_mut(list_id)
            .ok_or_else(|| ActionError::UnknownList(list_id.to_string()))?;

        let mut item = GiftItem::new(new_id(), name);
        item.link = non_blank(input.link);
        item.store = non_blank(input.store);
        item.price = non_blank(input.price);
        item.notes = non_blank(input.notes);
        item.seasonal_deal = input.seasonal_deal;
        item.is_time_sensitive = input.is_time_sensitive;

        let id = item.id.clone();
        list.items.push(item);
        Ok(id)
    }

    /// Remove an item. Returns the removed record.
    pub fn remove_item(&mut self, list_id: &str, item_id: &str) -> Result<GiftItem, ActionError> {
        let list = self
            .list_mut(list_id)
            .ok_or_else(|| ActionError::UnknownList(list_id.to_string()))?;
        let pos = list
            .items
            .iter()
            .position(|i| i.id == item_id)
            .ok_or_else(|| ActionError::UnknownItem {
                list_id: list_id.to_string(),
                item_id: item_id.to_string(),
            })?;
        Ok(list.items.remove(pos))
    }

    fn item_mut(&mut self, list_id: &str, item_id: &str) -> Result<(&str, &mut GiftItem), ActionError> {
        let list = self
            .lists
            .iter_mut()
            .find(|l| l.id == list_id)
            .ok_or_else(|| ActionError::UnknownList(list_id.to_string()))?;
        let owner = list.owner.as_str();
        let item = list
            .items
            .iter_mut()
            .find(|i| i.id == item_id)
            .ok_or_else(|| ActionError::UnknownItem {
                list_id: list_id.to_string(),
                item_id: item_id.to_string(),
            })?;
        Ok((owner, item))
    }

    /// Claim an unclaimed item for `actor`, or release it if `actor` already holds it.
    ///
    /// Owners never claim on their own list and an item held by someone else
    /// is left alone.
    pub fn toggle_claim(
        &mut self,
        list_id: &str,
        item_id: &str,
        actor: &str,
    ) -> Result<ClaimOutcome, ActionError> {
        let actor = actor.trim();
        if actor.is_empty() {
            return Err(ActionError::NoActor);
        }
        let (owner, item) = self.item_mut(list_id, item_id)?;
        if same_name(owner, actor) {
            return Ok(ClaimOutcome::Unchanged);
        }

        let current = item.claimed_by.clone();
        match current.as_deref() {
            None => {
                item.claimed_by = Some(actor.to_string());
                Ok(ClaimOutcome::Claimed)
            }
            Some(claimant) if claimant == actor => {
                item.claimed_by = None;
                item.is_purchased = false;
                Ok(ClaimOutcome::Unclaimed)
            }
            Some(_) => Ok(ClaimOutcome::Unchanged),
        }
    }

    /// Flip the purchased flag. Only the current claimant may do this.
    /// Returns the new flag value, or `None` when `actor` is not the claimant.
    pub fn toggle_purchased(
        &mut self,
        list_id: &str,
        item_id: &str,
        actor: &str,
    ) -> Result<Option<bool>, ActionError> {
        let actor = actor.trim();
        let (_, item) = self.item_mut(list_id, item_id)?;
        if item.claimed_by.as_deref() != Some(actor) {
            return Ok(None);
        }
        item.is_purchased = !item.is_purchased;
        Ok(Some(item.is_purchased))
    }

    /// Everything `actor` has claimed, in list then item order.
    pub fn claims_of(&self, actor: &str) -> Vec<ClaimedGift<'_>> {
        let actor = actor.trim();
        self.lists
            .iter()
            .flat_map(|list| {
                list.items
                    .iter()
                    .filter(move |item| item.claimed_by.as_deref() == Some(actor))
                    .map(move |item| ClaimedGift { list, item })
            })
            .collect()
    }

    pub fn purchased_count(&self, actor: &str) -> usize {
        self.claims_of(actor)
            .iter()
            .filter(|c| c.item.is_purchased)
            .count()
    }
}
