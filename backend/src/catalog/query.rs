//! Catalog filtering, sorting and pagination.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::models::Medicine;

/// Medicines shown per page.
pub const PAGE_SIZE: usize = 12;

/// Page path used when building share links.
pub const SHARE_PATH: &str = "medicines.html";

/// Which fields the free-text query is matched against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchField {
    #[default]
    All,
    Name,
    Brand,
    Generic,
    Uses,
}

/// Sort keys shared by the catalog listing and the advanced filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortKey {
    Name,
    NameDesc,
    Brand,
    BrandDesc,
    Type,
    DrugClass,
}

impl SortKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Name => "name",
            SortKey::NameDesc => "name-desc",
            SortKey::Brand => "brand",
            SortKey::BrandDesc => "brand-desc",
            SortKey::Type => "type",
            SortKey::DrugClass => "drug-class",
        }
    }

    /// Parse a sort key. Unknown keys yield `None`, which keeps dataset order.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "name" => Some(SortKey::Name),
            "name-desc" => Some(SortKey::NameDesc),
            "brand" => Some(SortKey::Brand),
            "brand-desc" => Some(SortKey::BrandDesc),
            "type" => Some(SortKey::Type),
            "drug-class" => Some(SortKey::DrugClass),
            _ => None,
        }
    }

    fn compare(&self, a: &Medicine, b: &Medicine) -> Ordering {
        match self {
            SortKey::Name => compare_ci(&a.name, &b.name),
            SortKey::NameDesc => compare_ci(&b.name, &a.name),
            SortKey::Brand => compare_ci(&a.brand, &b.brand),
            SortKey::BrandDesc => compare_ci(&b.brand, &a.brand),
            SortKey::Type => compare_ci(&a.medicine_type, &b.medicine_type),
            SortKey::DrugClass => compare_ci(&a.drug_class, &b.drug_class),
        }
    }
}

fn compare_ci(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase())
}

/// Stable sort; ties keep their relative order.
pub fn sort_medicines(medicines: &mut [Medicine], key: Option<SortKey>) {
    if let Some(key) = key {
        medicines.sort_by(|a, b| key.compare(a, b));
    }
}

/// Catalog listing query.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogQuery {
    #[serde(default)]
    pub q: String,
    #[serde(default)]
    pub field: SearchField,
    /// Exact medicine type, or "all".
    #[serde(rename = "type", default)]
    pub medicine_type: Option<String>,
    #[serde(default)]
    pub sort: Option<String>,
    #[serde(default)]
    pub page: Option<usize>,
}

impl CatalogQuery {
    /// Whether a medicine passes the text and type filters.
    pub fn matches(&self, medicine: &Medicine) -> bool {
        matches_text(medicine, &self.q, self.field) && self.matches_type(medicine)
    }

    fn matches_type(&self, medicine: &Medicine) -> bool {
        match self.medicine_type.as_deref() {
            None | Some("") | Some("all") => true,
            Some(t) => medicine.medicine_type == t,
        }
    }
}

/// Case-insensitive substring match over the selected field(s).
pub fn matches_text(medicine: &Medicine, query: &str, field: SearchField) -> bool {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }
    let hit = |s: &str| s.to_lowercase().contains(&needle);
    match field {
        SearchField::Name => hit(&medicine.name),
        SearchField::Brand => hit(&medicine.brand),
        SearchField::Generic => hit(&medicine.generic),
        SearchField::Uses => hit(&medicine.uses),
        SearchField::All => {
            hit(&medicine.name)
                || hit(&medicine.brand)
                || hit(&medicine.generic)
                || hit(&medicine.uses)
        }
    }
}

/// Entry in the page-number control.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum PageLink {
    Page { number: usize, current: bool },
    Ellipsis,
}

/// One page of results.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T: Serialize> {
    pub items: Vec<T>,
    pub total: usize,
    pub page: usize,
    pub total_pages: usize,
    pub page_size: usize,
    pub showing_from: usize,
    pub showing_to: usize,
    pub has_prev: bool,
    pub has_next: bool,
    pub links: Vec<PageLink>,
}

/// Slice `items` into the requested 1-based page. Out-of-range pages clamp.
pub fn paginate<T: Clone + Serialize>(items: &[T], requested: usize) -> Page<T> {
    let total = items.len();
    let total_pages = total.div_ceil(PAGE_SIZE);
    let page = requested.clamp(1, total_pages.max(1));

    let start = ((page - 1) * PAGE_SIZE).min(total);
    let end = (start + PAGE_SIZE).min(total);

    Page {
        items: items[start..end].to_vec(),
        total,
        page,
        total_pages,
        page_size: PAGE_SIZE,
        showing_from: if total == 0 { 0 } else { start + 1 },
        showing_to: end,
        has_prev: page > 1,
        has_next: page < total_pages,
        links: page_links(page, total_pages),
    }
}

/// First page, a one-page neighborhood around `current`, and the last page,
/// with ellipses over the gaps.
pub fn page_links(current: usize, total_pages: usize) -> Vec<PageLink> {
    let mut links = Vec::new();
    if total_pages == 0 {
        return links;
    }

    let page = |number: usize| PageLink::Page {
        number,
        current: number == current,
    };

    links.push(page(1));

    let start = current.saturating_sub(1).max(2);
    let end = (current + 1).min(total_pages.saturating_sub(1));

    if start > 2 {
        links.push(PageLink::Ellipsis);
    }
    for number in start..=end {
        links.push(page(number));
    }
    if end < total_pages.saturating_sub(1) {
        links.push(PageLink::Ellipsis);
    }

    if total_pages > 1 {
        links.push(page(total_pages));
    }
    links
}

/// Shareable link that reproduces the free-text query only.
pub fn share_link(query: &str) -> String {
    let query = query.trim();
    if query.is_empty() {
        return SHARE_PATH.to_string();
    }
    let encoded = serde_urlencoded::to_string([("search", query)]).unwrap_or_default();
    format!("{}?{}", SHARE_PATH, encoded)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn med(id: i64, name: &str, brand: &str, medicine_type: &str) -> Medicine {
        Medicine {
            id,
            name: name.to_string(),
            brand: brand.to_string(),
            generic: String::new(),
            medicine_type: medicine_type.to_string(),
            drug_class: String::new(),
            form: String::new(),
            strength: String::new(),
            uses: format!("Uses of {}", name),
            dosage: String::new(),
            side_effects: String::new(),
            precautions: String::new(),
            interactions: String::new(),
            pregnancy: String::new(),
            storage: String::new(),
        }
    }

    fn numbers(links: &[PageLink]) -> Vec<String> {
        links
            .iter()
            .map(|l| match l {
                PageLink::Page { number, .. } => number.to_string(),
                PageLink::Ellipsis => "...".to_string(),
            })
            .collect()
    }

    #[test]
    fn test_paginate_27_results() {
        let items: Vec<usize> = (1..=27).collect();

        let first = paginate(&items, 1);
        assert_eq!(first.items, (1..=12).collect::<Vec<_>>());
        assert_eq!(first.total_pages, 3);
        assert!(!first.has_prev);
        assert!(first.has_next);

        let last = paginate(&items, 3);
        assert_eq!(last.items, vec![25, 26, 27]);
        assert_eq!(last.showing_from, 25);
        assert_eq!(last.showing_to, 27);
        assert!(last.has_prev);
        assert!(!last.has_next);
    }

    #[test]
    fn test_paginate_clamps_and_empty() {
        let items: Vec<usize> = (1..=5).collect();
        let page = paginate(&items, 9);
        assert_eq!(page.page, 1);
        assert_eq!(page.items.len(), 5);

        let empty: Vec<usize> = Vec::new();
        let page = paginate(&empty, 1);
        assert_eq!(page.total_pages, 0);
        assert_eq!(page.showing_from, 0);
        assert!(!page.has_next);
        assert!(page.links.is_empty());
    }

    #[test]
    fn test_page_links_window() {
        assert_eq!(numbers(&page_links(1, 1)), vec!["1"]);
        assert_eq!(numbers(&page_links(1, 3)), vec!["1", "2", "3"]);
        assert_eq!(numbers(&page_links(1, 10)), vec!["1", "2", "...", "10"]);
        assert_eq!(
            numbers(&page_links(5, 10)),
            vec!["1", "...", "4", "5", "6", "...", "10"]
        );
        assert_eq!(numbers(&page_links(10, 10)), vec!["1", "...", "9", "10"]);
    }

    #[test]
    fn test_filter_all_fields_case_insensitive() {
        let medicines = vec![
            med(1, "Paracetamol", "Panadol", "tablet"),
            med(2, "Ibuprofen", "Brufen", "tablet"),
        ];
        let query = CatalogQuery {
            q: "  PANA ".to_string(),
            ..Default::default()
        };
        let hits: Vec<i64> = medicines
            .iter()
            .filter(|m| query.matches(m))
            .map(|m| m.id)
            .collect();
        assert_eq!(hits, vec![1]);

        let by_name = CatalogQuery {
            q: "pana".to_string(),
            field: SearchField::Name,
            ..Default::default()
        };
        assert!(!by_name.matches(&medicines[0]));
    }

    #[test]
    fn test_type_filter_exact() {
        let syrup = med(1, "Cough", "", "syrup");
        let mut query = CatalogQuery {
            medicine_type: Some("syrup".to_string()),
            ..Default::default()
        };
        assert!(query.matches(&syrup));
        query.medicine_type = Some("Syrup".to_string());
        assert!(!query.matches(&syrup));
        query.medicine_type = Some("all".to_string());
        assert!(query.matches(&syrup));
    }

    #[test]
    fn test_sort_is_stable_and_case_insensitive() {
        let mut medicines = vec![
            med(1, "beta", "Same", "tablet"),
            med(2, "Alpha", "same", "capsule"),
            med(3, "alpha", "Other", "tablet"),
        ];
        sort_medicines(&mut medicines, Some(SortKey::Name));
        assert_eq!(
            medicines.iter().map(|m| m.id).collect::<Vec<_>>(),
            vec![2, 3, 1]
        );

        sort_medicines(&mut medicines, Some(SortKey::BrandDesc));
        assert_eq!(
            medicines.iter().map(|m| m.id).collect::<Vec<_>>(),
            vec![2, 1, 3]
        );

        sort_medicines(&mut medicines, SortKey::parse("bogus"));
        assert_eq!(
            medicines.iter().map(|m| m.id).collect::<Vec<_>>(),
            vec![2, 1, 3]
        );
    }

    #[test]
    fn test_share_link() {
        assert_eq!(share_link(""), "medicines.html");
        assert_eq!(
            share_link("pain relief"),
            "medicines.html?search=pain+relief"
        );
    }
}
