use crate::models::FavoriteItem;

/// Popup list page size.
pub(crate) const POPUP_PAGE_SIZE: usize = 10;

/// Overview page size. Intentionally smaller than the popup's; group titles
/// count as entries, so a page holds a few groups worth of rows.
pub(crate) const OVERVIEW_PAGE_SIZE: usize = 5;

/// Total pages for `count` entries; an empty list still renders one page.
pub(crate) fn total_pages(count: usize, page_size: usize) -> usize {
    if count == 0 {
        1
    } else {
        count.div_ceil(page_size)
    }
}

/// Clamp a 1-based page request into `[1, total]`.
pub(crate) fn clamp_page(page: usize, total: usize) -> usize {
    page.max(1).min(total.max(1))
}

/// The window of `items` visible on 1-based `page`.
pub(crate) fn page_slice<T>(items: &[T], page: usize, page_size: usize) -> &[T] {
    let page = clamp_page(page, total_pages(items.len(), page_size));
    let start = (page - 1) * page_size;
    let end = (start + page_size).min(items.len());
    &items[start..end.max(start)]
}

/// Display order: ascending send time. Stable, so equal timestamps keep their
/// stored relative order.
pub(crate) fn sorted_by_timestamp(items: &[FavoriteItem]) -> Vec<FavoriteItem> {
    let mut sorted = items.to_vec();
    sorted.sort_by_key(|i| i.timestamp);
    sorted
}

/// Page to show after a removal left `new_count` items: the current page when
/// still valid, else the last valid page, never below 1.
pub(crate) fn page_after_removal(new_count: usize, current_page: usize, page_size: usize) -> usize {
    clamp_page(current_page, total_pages(new_count, page_size))
}

/// One row of the flattened overview stream.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum OverviewEntry {
    GroupTitle(String),
    ChatRow {
        chat_id: String,
        name: String,
        count: usize,
    },
}

/// Input to the overview flattener: one conversation with its resolved group
/// label (live roster name when resolvable, stored snapshot otherwise).
#[derive(Clone, Debug)]
pub(crate) struct OverviewRow {
    pub chat_id: String,
    pub label: String,
    pub name: String,
    pub count: usize,
}

/// Group conversations by label, order labels and member rows
/// lexicographically, and flatten into a title/row stream. Titles are
/// ordinary entries for paging purposes.
pub(crate) fn overview_entries(rows: Vec<OverviewRow>) -> Vec<OverviewEntry> {
    let mut grouped: std::collections::BTreeMap<String, Vec<OverviewRow>> =
        std::collections::BTreeMap::new();
    for row in rows {
        grouped.entry(row.label.clone()).or_default().push(row);
    }

    let mut entries = Vec::new();
    for (label, mut rows) in grouped {
        rows.sort_by(|a, b| a.name.cmp(&b.name));
        entries.push(OverviewEntry::GroupTitle(label));
        for row in rows {
            entries.push(OverviewEntry::ChatRow {
                chat_id: row.chat_id,
                name: row.name,
                count: row.count,
            });
        }
    }
    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MessageRole;

    fn item(id: &str, timestamp: i64) -> FavoriteItem {
        FavoriteItem {
            id: id.to_string(),
            message_id: id.to_string(),
            sender: "s".to_string(),
            role: MessageRole::User,
            timestamp,
            note: String::new(),
        }
    }

    #[test]
    fn twentythree_items_make_three_pages_of_ten() {
        assert_eq!(total_pages(23, 10), 3);
        let items: Vec<FavoriteItem> = (0..23).map(|i| item(&i.to_string(), i)).collect();
        assert_eq!(page_slice(&items, 3, 10).len(), 3);
        assert_eq!(page_slice(&items, 1, 10).len(), 10);
    }

    #[test]
    fn page_requests_clamp_into_range() {
        assert_eq!(clamp_page(0, 3), 1);
        assert_eq!(clamp_page(99, 3), 3);
        assert_eq!(clamp_page(2, 3), 2);
        // Empty list: single page, never page 0.
        assert_eq!(total_pages(0, 10), 1);
        assert_eq!(clamp_page(0, total_pages(0, 10)), 1);
    }

    #[test]
    fn sort_is_by_timestamp_regardless_of_insertion_order() {
        let items = vec![item("a", 50), item("b", 10), item("c", 30)];
        let sorted = sorted_by_timestamp(&items);
        let times: Vec<i64> = sorted.iter().map(|i| i.timestamp).collect();
        assert_eq!(times, vec![10, 30, 50]);
    }

    #[test]
    fn sort_is_stable_on_equal_timestamps() {
        let items = vec![item("a", 10), item("b", 10), item("c", 5)];
        let sorted = sorted_by_timestamp(&items);
        let ids: Vec<&str> = sorted.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["c", "a", "b"]);
    }

    #[test]
    fn removal_falls_back_to_last_valid_page() {
        // Viewing page 2 of 2; the 11th item goes away.
        assert_eq!(page_after_removal(10, 2, 10), 1);
        // Still enough items: stay put.
        assert_eq!(page_after_removal(11, 2, 10), 2);
        // Emptied out entirely: page 1, never 0.
        assert_eq!(page_after_removal(0, 2, 10), 1);
    }

    fn row(chat_id: &str, label: &str, count: usize) -> OverviewRow {
        OverviewRow {
            chat_id: chat_id.to_string(),
            label: label.to_string(),
            name: chat_id.to_string(),
            count,
        }
    }

    #[test]
    fn overview_groups_sort_and_flatten() {
        let entries = overview_entries(vec![
            row("zeta-1", "Brook", 2),
            row("alpha-2", "Aria", 1),
            row("alpha-1", "Aria", 3),
        ]);

        assert_eq!(
            entries,
            vec![
                OverviewEntry::GroupTitle("Aria".to_string()),
                OverviewEntry::ChatRow {
                    chat_id: "alpha-1".to_string(),
                    name: "alpha-1".to_string(),
                    count: 3,
                },
                OverviewEntry::ChatRow {
                    chat_id: "alpha-2".to_string(),
                    name: "alpha-2".to_string(),
                    count: 1,
                },
                OverviewEntry::GroupTitle("Brook".to_string()),
                OverviewEntry::ChatRow {
                    chat_id: "zeta-1".to_string(),
                    name: "zeta-1".to_string(),
                    count: 2,
                },
            ]
        );
    }

    #[test]
    fn titles_count_as_entries_when_paging_the_overview() {
        // 2 groups with 4 rows each = 10 entries = 2 overview pages of 5.
        let mut rows = Vec::new();
        for i in 0..4 {
            rows.push(row(&format!("a-{i}"), "A", 1));
            rows.push(row(&format!("b-{i}"), "B", 1));
        }
        let entries = overview_entries(rows);
        assert_eq!(entries.len(), 10);
        assert_eq!(total_pages(entries.len(), OVERVIEW_PAGE_SIZE), 2);

        let first = page_slice(&entries, 1, OVERVIEW_PAGE_SIZE);
        assert!(matches!(first[0], OverviewEntry::GroupTitle(_)));
        assert_eq!(first.len(), 5);
    }
}
