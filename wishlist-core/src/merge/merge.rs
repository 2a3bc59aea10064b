/// Two-way, last-write-wins merge of a remote snapshot into the local one.
///
/// Inputs:
/// - remote: freshly fetched from the bucket
/// - local: the cached snapshot on this device
///
/// Merge logic:
/// - Roster: union of both sides, exact duplicates removed, remote order first
/// - List only on one side -> kept as-is
/// - List on both sides -> owner/theme/link from local, items merged below
/// - Item only on one side -> kept as-is (a local delete does not win over a
///   remote copy; the item comes back until every side has dropped it)
/// - Item on both sides -> local record wholesale
///
/// Output order is remote order, with local-only entries appended in local order.
use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::types::{AppData, GiftItem, WishList};

/// Result of a merge, with counters for logging.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MergeResult {
    pub data: AppData,
    /// Lists present on both sides.
    pub lists_merged: usize,
    /// Items present on both sides whose local record differed from the remote one.
    pub items_overridden: usize,
    /// Items carried over from only one side of a shared list.
    pub items_carried: usize,
}

/// Merge `remote` and `local` into a new snapshot. Neither input is modified.
pub fn merge_snapshots(remote: &AppData, local: &AppData) -> MergeResult {
    let mut lists_merged = 0;
    let mut items_overridden = 0;
    let mut items_carried = 0;

    let mut lists: Vec<WishList> = Vec::with_capacity(remote.lists.len() + local.lists.len());
    for remote_list in &remote.lists {
        match local.list(&remote_list.id) {
            Some(local_list) => {
                lists_merged += 1;
                let (items, overridden, carried) = merge_items(&remote_list.items, &local_list.items);
                items_overridden += overridden;
                items_carried += carried;
                lists.push(WishList {
                    id: remote_list.id.clone(),
                    owner: local_list.owner.clone(),
                    external_link: local_list.external_link.clone(),
                    items,
                    color_theme: local_list.color_theme,
                });
            }
            None => lists.push(remote_list.clone()),
        }
    }
    for local_list in &local.lists {
        if remote.list(&local_list.id).is_none() {
            lists.push(local_list.clone());
        }
    }

    MergeResult {
        data: AppData {
            users: merge_rosters(&remote.users, &local.users),
            lists,
        },
        lists_merged,
        items_overridden,
        items_carried,
    }
}

/// Convenience wrapper returning only the merged snapshot.
pub fn merge_app_data(remote: &AppData, local: &AppData) -> AppData {
    merge_snapshots(remote, local).data
}

/// Union of both rosters, first occurrence kept.
pub fn merge_rosters(remote: &[String], local: &[String]) -> Vec<String> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut users = Vec::with_capacity(remote.len() + local.len());
    for name in remote.iter().chain(local) {
        if seen.insert(name.as_str()) {
            users.push(name.clone());
        }
    }
    users
}

/// Returns (items, overridden, carried).
fn merge_items(remote: &[GiftItem], local: &[GiftItem]) -> (Vec<GiftItem>, usize, usize) {
    let mut overridden = 0;
    let mut carried = 0;
    let mut merged = Vec::with_capacity(remote.len() + local.len());

    for remote_item in remote {
        match local.iter().find(|i| i.id == remote_item.id) {
            Some(local_item) => {
                if local_item != remote_item {
                    overridden += 1;
                }
                merged.push(local_item.clone());
            }
            None => {
                carried += 1;
                merged.push(remote_item.clone());
            }
        }
    }
    for local_item in local {
        if !remote.iter().any(|i| i.id == local_item.id) {
            carried += 1;
            merged.push(local_item.clone());
        }
    }

    (merged, overridden, carried)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ColorTheme;

    fn make_item(id: &str, name: &str, claimed_by: Option<&str>) -> GiftItem {
        let mut item = GiftItem::new(id, name);
        item.claimed_by = claimed_by.map(String::from);
        item
    }

    fn make_list(id: &str, owner: &str, items: Vec<GiftItem>) -> WishList {
        WishList {
            id: id.to_string(),
            owner: owner.to_string(),
            external_link: None,
            items,
            color_theme: ColorTheme::Red,
        }
    }

    fn make_data(users: &[&str], lists: Vec<WishList>) -> AppData {
        AppData {
            users: users.iter().map(|u| u.to_string()).collect(),
            lists,
        }
    }

    #[test]
    fn test_merge_users_union() {
        let remote = make_data(&["Alice", "Bob"], vec![]);
        let local = make_data(&["Bob", "Charlie"], vec![]);

        let merged = merge_app_data(&remote, &local);
        assert_eq!(merged.users, vec!["Alice", "Bob", "Charlie"]);
    }

    #[test]
    fn test_merge_local_claim_wins() {
        let remote = make_data(
            &["Alice", "Bob"],
            vec![make_list("L1", "Charlie", vec![make_item("I1", "Gift", Some("Alice"))])],
        );
        let local = make_data(
            &["Bob", "Charlie"],
            vec![make_list("L1", "Charlie", vec![make_item("I1", "Gift", None)])],
        );

        let result = merge_snapshots(&remote, &local);
        let users: HashSet<_> = result.data.users.iter().map(String::as_str).collect();
        assert_eq!(users, HashSet::from(["Alice", "Bob", "Charlie"]));
        assert_eq!(result.data.lists[0].items[0].claimed_by, None);
        assert_eq!(result.lists_merged, 1);
        assert_eq!(result.items_overridden, 1);
    }

    #[test]
    fn test_merge_disjoint_lists_kept() {
        let l1 = make_list("L1", "Alice", vec![make_item("a", "A", None)]);
        let l2 = make_list("L2", "Bob", vec![make_item("b", "B", Some("Alice"))]);
        let remote = make_data(&["Alice"], vec![l1.clone()]);
        let local = make_data(&["Bob"], vec![l2.clone()]);

        let merged = merge_app_data(&remote, &local);
        assert_eq!(merged.lists, vec![l1, l2]);
    }

    #[test]
    fn test_merge_items_union_in_shared_list() {
        let remote = make_data(&[], vec![make_list("L1", "Charlie", vec![make_item("i1", "Alice Item", None)])]);
        let local = make_data(&[], vec![make_list("L1", "Charlie", vec![make_item("i2", "Bob Item", None)])]);

        let result = merge_snapshots(&remote, &local);
        let items = &result.data.lists[0].items;
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].name, "Alice Item");
        assert_eq!(items[1].name, "Bob Item");
        assert_eq!(result.items_carried, 2);
    }

    #[test]
    fn test_merge_local_delete_does_not_stick() {
        let remote = make_data(
            &[],
            vec![make_list("L1", "A", vec![make_item("i1", "One", None), make_item("i2", "Two", None)])],
        );
        let local = make_data(&[], vec![make_list("L1", "A", vec![make_item("i1", "One", None)])]);

        let merged = merge_app_data(&remote, &local);
        assert_eq!(merged.lists[0].items.len(), 2);
    }

    #[test]
    fn test_merge_list_scalars_from_local() {
        let remote = make_data(&[], vec![make_list("L1", "alice", vec![])]);
        let mut local_list = make_list("L1", "Alice", vec![]);
        local_list.color_theme = ColorTheme::Gold;
        local_list.external_link = Some("https://registry.example".into());
        let local = make_data(&[], vec![local_list.clone()]);

        let merged = merge_app_data(&remote, &local);
        assert_eq!(merged.lists, vec![local_list]);
    }

    #[test]
    fn test_merge_whole_item_from_local() {
        let mut remote_item = make_item("i1", "Gift", None);
        remote_item.store = Some("Amazon".into());
        remote_item.price = Some("$50".into());
        remote_item.seasonal_deal = true;
        let mut local_item = make_item("i1", "Gift Updated", Some("Bob"));
        local_item.is_purchased = true;

        let remote = make_data(&[], vec![make_list("L1", "A", vec![remote_item])]);
        let local = make_data(&[], vec![make_list("L1", "A", vec![local_item.clone()])]);

        let merged = merge_app_data(&remote, &local);
        // Record-level win: remote-only field values do not leak through.
        assert_eq!(merged.lists[0].items[0], local_item);
    }

    #[test]
    fn test_merge_is_pure_and_deterministic() {
        let remote = make_data(
            &["Alice"],
            vec![
                make_list("L1", "Alice", vec![make_item("i1", "One", Some("Bob"))]),
                make_list("L2", "Bob", vec![]),
            ],
        );
        let local = make_data(
            &["Bob", "Alice"],
            vec![
                make_list("L3", "Charlie", vec![]),
                make_list("L1", "Alice", vec![make_item("i2", "Two", None)]),
            ],
        );
        let remote_before = remote.clone();
        let local_before = local.clone();

        let first = merge_snapshots(&remote, &local);
        let second = merge_snapshots(&remote, &local);
        assert_eq!(first, second);
        assert_eq!(remote, remote_before);
        assert_eq!(local, local_before);

        let ids: Vec<_> = first.data.lists.iter().map(|l| l.id.as_str()).collect();
        assert_eq!(ids, vec!["L1", "L2", "L3"]);
        assert_eq!(first.data.lists[0].items.len(), 2);
    }

    #[test]
    fn test_merge_empty_sides() {
        let data = make_data(&["Alice"], vec![make_list("L1", "Alice", vec![])]);
        let empty = AppData::default();

        assert_eq!(merge_app_data(&empty, &data), data);
        assert_eq!(merge_app_data(&data, &empty), data);
    }
}
