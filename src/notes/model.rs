use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Closed set of note categories. An unrecognized tag never leaves the
/// gateway: reads fall back to [`NoteTag::default`], writes are
/// rejected before they reach the upstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NoteTag {
    Todo,
    Work,
    Personal,
    Meeting,
    Shopping,
}

impl NoteTag {
    pub const ALL: [NoteTag; 5] = [
        NoteTag::Todo,
        NoteTag::Work,
        NoteTag::Personal,
        NoteTag::Meeting,
        NoteTag::Shopping,
    ];

    pub fn parse(raw: &str) -> Option<NoteTag> {
        let raw = raw.trim();
        Self::ALL
            .into_iter()
            .find(|tag| tag.as_str().eq_ignore_ascii_case(raw))
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            NoteTag::Todo => "Todo",
            NoteTag::Work => "Work",
            NoteTag::Personal => "Personal",
            NoteTag::Meeting => "Meeting",
            NoteTag::Shopping => "Shopping",
        }
    }
}

impl Default for NoteTag {
    fn default() -> Self {
        NoteTag::Todo
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: String,
    pub title: String,
    pub content: String,
    pub tag: NoteTag,
    /// Timestamps are opaque upstream strings; the gateway never
    /// interprets them.
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteListPage {
    pub notes: Vec<Note>,
    pub page: u32,
    pub per_page: u32,
    pub total_items: u32,
    pub total_pages: u32,
}

/// Raw listing query as it arrives from the browser. Values are kept
/// as strings so malformed numbers degrade to defaults instead of a
/// rejection.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListNotesQuery {
    pub page: Option<String>,
    pub per_page: Option<String>,
    pub search: Option<String>,
    pub tag: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ListParams {
    pub page: u32,
    pub per_page: u32,
    pub search: Option<String>,
    pub tag: Option<NoteTag>,
}

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_PER_PAGE: u32 = 12;

impl ListNotesQuery {
    pub fn normalize(&self) -> ListParams {
        ListParams {
            page: parse_positive(self.page.as_deref(), DEFAULT_PAGE),
            per_page: parse_positive(self.per_page.as_deref(), DEFAULT_PER_PAGE),
            search: self
                .search
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_owned),
            // `All` (and anything outside the closed set) means no filter
            tag: self
                .tag
                .as_deref()
                .filter(|t| !t.eq_ignore_ascii_case("All"))
                .and_then(NoteTag::parse),
        }
    }
}

fn parse_positive(raw: Option<&str>, default: u32) -> u32 {
    raw.and_then(|s| s.trim().parse::<u32>().ok())
        .filter(|v| *v >= 1)
        .unwrap_or(default)
}

impl ListParams {
    /// Query pairs forwarded to the upstream `/notes` endpoint.
    pub fn upstream_query(&self) -> Vec<(String, String)> {
        let mut query = vec![
            ("page".to_owned(), self.page.to_string()),
            ("perPage".to_owned(), self.per_page.to_string()),
        ];
        if let Some(search) = &self.search {
            query.push(("search".to_owned(), search.clone()));
        }
        if let Some(tag) = self.tag {
            query.push(("tag".to_owned(), tag.as_str().to_owned()));
        }
        query
    }
}

/// Coerces an arbitrary upstream note payload into the canonical
/// shape: missing fields become empty strings, unknown tags default,
/// snake_case date keys are accepted.
pub fn normalize_note(value: &Value) -> Note {
    Note {
        id: string_at(value, &["id"]),
        title: string_at(value, &["title"]),
        content: string_at(value, &["content"]),
        tag: value
            .get("tag")
            .and_then(Value::as_str)
            .and_then(NoteTag::parse)
            .unwrap_or_default(),
        created_at: string_at(value, &["createdAt", "created_at"]),
        updated_at: string_at(value, &["updatedAt", "updated_at"]),
    }
}

/// Upstream listing payloads come in two shapes: notes under `items`
/// or under `notes`, with optional paging totals. Both collapse into
/// the canonical page.
pub fn normalize_page(value: &Value, params: &ListParams) -> NoteListPage {
    let notes: Vec<Note> = value
        .get("items")
        .or_else(|| value.get("notes"))
        .and_then(Value::as_array)
        .map(|raw| raw.iter().map(normalize_note).collect())
        .unwrap_or_default();

    let page = u32_at(value, "page").unwrap_or(params.page);
    let per_page = u32_at(value, "perPage").unwrap_or(params.per_page);
    let total_items = u32_at(value, "totalItems").unwrap_or(notes.len() as u32);
    let total_pages = u32_at(value, "totalPages").unwrap_or_else(|| total_pages(total_items, per_page));

    NoteListPage {
        notes,
        page,
        per_page,
        total_items,
        total_pages,
    }
}

pub fn total_pages(total_items: u32, per_page: u32) -> u32 {
    total_items.div_ceil(per_page.max(1)).max(1)
}

fn string_at(value: &Value, keys: &[&str]) -> String {
    for key in keys {
        match value.get(*key) {
            Some(Value::String(s)) => return s.clone(),
            Some(Value::Number(n)) => return n.to_string(),
            _ => continue,
        }
    }
    String::new()
}

fn u32_at(value: &Value, key: &str) -> Option<u32> {
    value.get(key)?.as_u64().map(|v| v as u32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn tag_parse_is_case_insensitive() {
        assert_eq!(NoteTag::parse("shopping"), Some(NoteTag::Shopping));
        assert_eq!(NoteTag::parse(" Work "), Some(NoteTag::Work));
        assert_eq!(NoteTag::parse("Groceries"), None);
    }

    #[test]
    fn unknown_tag_defaults_on_read() {
        let note = normalize_note(&json!({
            "id": 42,
            "title": "t",
            "content": "c",
            "tag": "Groceries",
            "created_at": "2024-01-03T09:00:00.000Z"
        }));

        assert_eq!(note.tag, NoteTag::Todo);
        assert_eq!(note.id, "42");
        assert_eq!(note.created_at, "2024-01-03T09:00:00.000Z");
        assert_eq!(note.updated_at, "");
    }

    #[test]
    fn page_accepts_items_or_notes_key() {
        let params = ListNotesQuery::default().normalize();

        let page = normalize_page(&json!({ "items": [{ "id": "1" }], "totalItems": 25 }), &params);
        assert_eq!(page.notes.len(), 1);
        assert_eq!(page.total_items, 25);
        assert_eq!(page.total_pages, 3); // ceil(25 / 12)

        let page = normalize_page(&json!({ "notes": [{ "id": "1" }, { "id": "2" }] }), &params);
        assert_eq!(page.notes.len(), 2);
        assert_eq!(page.total_items, 2);
        assert_eq!(page.total_pages, 1);
    }

    #[test]
    fn query_normalization_degrades_to_defaults() {
        let query = ListNotesQuery {
            page: Some("oops".into()),
            per_page: Some("0".into()),
            search: Some("   ".into()),
            tag: Some("All".into()),
        };
        let params = query.normalize();

        assert_eq!(params.page, DEFAULT_PAGE);
        assert_eq!(params.per_page, DEFAULT_PER_PAGE);
        assert_eq!(params.search, None);
        assert_eq!(params.tag, None);
    }

    #[test]
    fn upstream_query_skips_empty_filters() {
        let query = ListNotesQuery {
            page: Some("2".into()),
            per_page: None,
            search: Some("milk".into()),
            tag: Some("shopping".into()),
        };
        let pairs = query.normalize().upstream_query();

        assert_eq!(
            pairs,
            vec![
                ("page".to_owned(), "2".to_owned()),
                ("perPage".to_owned(), "12".to_owned()),
                ("search".to_owned(), "milk".to_owned()),
                ("tag".to_owned(), "Shopping".to_owned()),
            ]
        );
    }
}
