// View deriver - the filtered, sorted, paginated table of markers
//
// Order matters: filter first, then sort, then cut the page. The page index
// the caller asked for is clamped against the filtered row count, so a
// delete or a narrower search never strands the table on an empty page.

use super::model::MarkerRecord;
use super::reconciler::BlipCollection;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Rows per page
pub const PAGE_SIZE: usize = 8;

/// Columns that can be sorted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortColumn {
    Id,
    Name,
    Zone,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

/// At most one sorted column
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SortState {
    active: Option<(SortColumn, SortDirection)>,
}

impl SortState {
    pub fn unsorted() -> Self {
        Self::default()
    }

    pub fn by(column: SortColumn, direction: SortDirection) -> Self {
        Self {
            active: Some((column, direction)),
        }
    }

    pub fn active(&self) -> Option<(SortColumn, SortDirection)> {
        self.active
    }

    /// Direction shown for a column header, `None` when it is not sorted
    pub fn direction_of(&self, column: SortColumn) -> Option<SortDirection> {
        match self.active {
            Some((c, direction)) if c == column => Some(direction),
            _ => None,
        }
    }

    /// Header click: none -> asc -> desc -> none on the same column,
    /// a different column starts over at asc
    pub fn toggle(&mut self, column: SortColumn) {
        self.active = match self.active {
            Some((c, SortDirection::Asc)) if c == column => Some((column, SortDirection::Desc)),
            Some((c, SortDirection::Desc)) if c == column => None,
            _ => Some((column, SortDirection::Asc)),
        };
    }
}

/// Everything the table projection depends on besides the collection
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewQuery {
    /// Effective (already debounced) search text
    pub search_text: String,
    pub sort: SortState,
    pub page_index: usize,
}

/// One rendered page of the table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BlipView {
    pub rows: Vec<MarkerRecord>,
    pub total_pages: usize,
    /// Page actually shown, after clamping
    pub page_index: usize,
    /// Rows matching the filter across all pages
    pub total_rows: usize,
}

/// Number of pages for a row count; zero rows means zero pages
pub fn page_count(rows: usize) -> usize {
    rows.div_ceil(PAGE_SIZE)
}

/// Clamp a page index into `[0, total_pages - 1]` (or 0 when there are no pages)
pub fn clamp_page(page_index: usize, total_pages: usize) -> usize {
    page_index.min(total_pages.saturating_sub(1))
}

/// Case-insensitive substring match on name and zone; ids are not searched
pub fn matches_search(record: &MarkerRecord, needle_lower: &str) -> bool {
    if needle_lower.is_empty() {
        return true;
    }
    let name_hit = record
        .name
        .as_deref()
        .is_some_and(|name| name.to_lowercase().contains(needle_lower));
    name_hit || record.zone_label.to_lowercase().contains(needle_lower)
}

fn compare_text(a: Option<&str>, b: Option<&str>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.to_lowercase().cmp(&b.to_lowercase()).then_with(|| a.cmp(b)),
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn compare_by(column: SortColumn, a: &MarkerRecord, b: &MarkerRecord) -> Ordering {
    match column {
        SortColumn::Id => a.id.cmp(&b.id),
        SortColumn::Name => compare_text(a.name.as_deref(), b.name.as_deref()),
        SortColumn::Zone => compare_text(Some(&a.zone_label), Some(&b.zone_label)),
    }
}

/// Filter, then stable-sort, then paginate
pub fn derive(collection: &BlipCollection, query: &ViewQuery) -> BlipView {
    let needle = query.search_text.to_lowercase();
    let mut rows: Vec<&MarkerRecord> = collection
        .iter()
        .filter(|record| matches_search(record, &needle))
        .collect();

    if let Some((column, direction)) = query.sort.active() {
        // sort_by is stable, so equal keys keep collection order in both directions
        rows.sort_by(|a, b| {
            let ordering = compare_by(column, a, b);
            match direction {
                SortDirection::Asc => ordering,
                SortDirection::Desc => ordering.reverse(),
            }
        });
    }

    let total_rows = rows.len();
    let total_pages = page_count(total_rows);
    let page_index = clamp_page(query.page_index, total_pages);

    let rows = rows
        .into_iter()
        .skip(page_index * PAGE_SIZE)
        .take(PAGE_SIZE)
        .cloned()
        .collect();

    BlipView {
        rows,
        total_pages,
        page_index,
        total_rows,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: i64, name: Option<&str>, zone: &str) -> MarkerRecord {
        let mut record = MarkerRecord::new(id, zone);
        record.name = name.map(str::to_owned);
        record
    }

    fn numbered(count: i64) -> BlipCollection {
        BlipCollection::from_records(
            (0..count).map(|i| record(i, Some(&format!("Blip {}", i)), "Downtown")),
        )
    }

    fn ids(view: &BlipView) -> Vec<i64> {
        view.rows.iter().map(|r| r.id).collect()
    }

    #[test]
    fn test_search_is_case_insensitive_over_name_and_zone() {
        let collection = BlipCollection::from_records(vec![
            record(1, Some("Mission Row"), "Downtown"),
            record(2, Some("Bank"), "Pillbox"),
        ]);

        for text in ["miss", "MISS", "Miss"] {
            let query = ViewQuery {
                search_text: text.to_string(),
                ..Default::default()
            };
            assert_eq!(ids(&derive(&collection, &query)), vec![1]);
        }

        let zone_query = ViewQuery {
            search_text: "pill".to_string(),
            ..Default::default()
        };
        assert_eq!(ids(&derive(&collection, &zone_query)), vec![2]);

        assert_eq!(ids(&derive(&collection, &ViewQuery::default())), vec![1, 2]);
    }

    #[test]
    fn test_search_does_not_match_ids() {
        let collection = BlipCollection::from_records(vec![record(42, Some("Bank"), "Pillbox")]);
        let query = ViewQuery {
            search_text: "42".to_string(),
            ..Default::default()
        };
        assert!(derive(&collection, &query).rows.is_empty());
    }

    #[test]
    fn test_pagination_of_seventeen_rows() {
        let collection = numbered(17);
        let query = ViewQuery {
            page_index: 2,
            ..Default::default()
        };
        let view = derive(&collection, &query);
        assert_eq!(view.total_pages, 3);
        assert_eq!(view.page_index, 2);
        assert_eq!(ids(&view), vec![16]);

        let first = derive(&collection, &ViewQuery::default());
        assert_eq!(first.rows.len(), PAGE_SIZE);
    }

    #[test]
    fn test_out_of_range_page_is_clamped() {
        let collection = numbered(9);
        let query = ViewQuery {
            page_index: 5,
            ..Default::default()
        };
        let view = derive(&collection, &query);
        assert_eq!(view.page_index, 1);
        assert_eq!(ids(&view), vec![8]);
    }

    #[test]
    fn test_empty_collection_has_no_pages() {
        let view = derive(&BlipCollection::new(), &ViewQuery::default());
        assert_eq!(view.total_pages, 0);
        assert_eq!(view.page_index, 0);
        assert!(view.rows.is_empty());
    }

    #[test]
    fn test_sort_toggle_cycles_back_to_insertion_order() {
        let collection = BlipCollection::from_records(vec![
            record(1, Some("Charlie"), "b"),
            record(2, Some("alpha"), "c"),
            record(3, Some("Bravo"), "a"),
        ]);
        let mut query = ViewQuery::default();
        let original = ids(&derive(&collection, &query));

        query.sort.toggle(SortColumn::Name);
        assert_eq!(query.sort.direction_of(SortColumn::Name), Some(SortDirection::Asc));
        assert_eq!(ids(&derive(&collection, &query)), vec![2, 3, 1]);

        query.sort.toggle(SortColumn::Name);
        assert_eq!(ids(&derive(&collection, &query)), vec![1, 3, 2]);

        query.sort.toggle(SortColumn::Name);
        assert_eq!(query.sort.active(), None);
        assert_eq!(ids(&derive(&collection, &query)), original);
    }

    #[test]
    fn test_switching_columns_starts_ascending() {
        let mut sort = SortState::by(SortColumn::Name, SortDirection::Desc);
        sort.toggle(SortColumn::Zone);
        assert_eq!(sort.active(), Some((SortColumn::Zone, SortDirection::Asc)));
        assert_eq!(sort.direction_of(SortColumn::Name), None);
    }

    #[test]
    fn test_sort_is_stable_for_equal_keys() {
        let collection = BlipCollection::from_records(vec![
            record(5, Some("x"), "Same"),
            record(1, Some("y"), "Same"),
            record(3, Some("z"), "Same"),
        ]);
        let desc = ViewQuery {
            sort: SortState::by(SortColumn::Zone, SortDirection::Desc),
            ..Default::default()
        };
        assert_eq!(ids(&derive(&collection, &desc)), vec![5, 1, 3]);
    }

    #[test]
    fn test_missing_names_sort_first() {
        let collection = BlipCollection::from_records(vec![
            record(1, Some("Bank"), "z"),
            record(2, None, "z"),
        ]);
        let query = ViewQuery {
            sort: SortState::by(SortColumn::Name, SortDirection::Asc),
            ..Default::default()
        };
        assert_eq!(ids(&derive(&collection, &query)), vec![2, 1]);
    }

    #[test]
    fn test_sort_applies_before_pagination() {
        let collection = numbered(10);
        let query = ViewQuery {
            sort: SortState::by(SortColumn::Id, SortDirection::Desc),
            page_index: 0,
            ..Default::default()
        };
        let view = derive(&collection, &query);
        assert_eq!(ids(&view), vec![9, 8, 7, 6, 5, 4, 3, 2]);
    }
}
