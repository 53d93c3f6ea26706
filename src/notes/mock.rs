//! Fixed read-only dataset served when the upstream is unreachable.

use lazy_static::lazy_static;

use super::model::{total_pages, ListParams, Note, NoteListPage, NoteTag};

/// Marker header on every response built from the mock dataset, so
/// callers can detect degraded mode.
pub const MOCK_HEADER: &str = "x-notehub-mock";

fn note(id: &str, title: &str, content: &str, tag: NoteTag, created_at: &str, updated_at: &str) -> Note {
    Note {
        id: id.to_owned(),
        title: title.to_owned(),
        content: content.to_owned(),
        tag,
        created_at: created_at.to_owned(),
        updated_at: updated_at.to_owned(),
    }
}

lazy_static! {
    static ref MOCK_NOTES: Vec<Note> = vec![
        note(
            "mock-1",
            "Welcome to NoteHub",
            "This is mock data used when the NoteHub API is unreachable.",
            NoteTag::Todo,
            "2024-01-03T09:00:00.000Z",
            "2024-02-10T15:30:00.000Z",
        ),
        note(
            "mock-2",
            "Sprint planning meeting",
            "Prepare agenda and invite the core team.",
            NoteTag::Meeting,
            "2024-03-12T11:00:00.000Z",
            "2024-03-12T11:00:00.000Z",
        ),
        note(
            "mock-3",
            "Grocery list",
            "Milk, coffee beans, pasta, basil, cherry tomatoes.",
            NoteTag::Shopping,
            "2024-04-02T08:25:00.000Z",
            "2024-04-08T19:42:00.000Z",
        ),
        note(
            "mock-4",
            "Q2 product roadmap",
            "Finalize roadmap draft and share with leadership.",
            NoteTag::Work,
            "2024-02-19T10:05:00.000Z",
            "2024-02-27T16:18:00.000Z",
        ),
        note(
            "mock-5",
            "Vacation ideas",
            "Research hiking trips across the Alps and Pyrenees.",
            NoteTag::Personal,
            "2024-05-01T07:55:00.000Z",
            "2024-05-15T09:12:00.000Z",
        ),
        note(
            "mock-6",
            "Team retrospective notes",
            "Capture action items from the last sprint retrospective.",
            NoteTag::Work,
            "2024-05-21T14:30:00.000Z",
            "2024-05-21T14:30:00.000Z",
        ),
        note(
            "mock-7",
            "One-on-one topics",
            "Feedback on new onboarding flow and training sessions.",
            NoteTag::Meeting,
            "2024-05-30T13:10:00.000Z",
            "2024-05-30T13:10:00.000Z",
        ),
        note(
            "mock-8",
            "Personal reading list",
            "Finish \u{201c}Clean Architecture\u{201d} and start \u{201c}Designing Data-Intensive Applications\u{201d}.",
            NoteTag::Personal,
            "2024-06-05T18:05:00.000Z",
            "2024-06-05T18:05:00.000Z",
        ),
    ];
}

fn matches_search(note: &Note, search: Option<&str>) -> bool {
    let Some(search) = search else { return true };
    let needle = search.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }
    note.title.to_lowercase().contains(&needle) || note.content.to_lowercase().contains(&needle)
}

/// Filters and paginates the mock dataset with the same parameter
/// semantics as the upstream listing.
pub fn mock_notes(params: &ListParams) -> NoteListPage {
    let filtered: Vec<&Note> = MOCK_NOTES
        .iter()
        .filter(|note| params.tag.map_or(true, |tag| note.tag == tag))
        .filter(|note| matches_search(note, params.search.as_deref()))
        .collect();

    let total_items = filtered.len() as u32;
    let start = (params.page.saturating_sub(1) as usize).saturating_mul(params.per_page as usize);
    let notes = filtered
        .into_iter()
        .skip(start)
        .take(params.per_page as usize)
        .cloned()
        .collect();

    NoteListPage {
        notes,
        page: params.page,
        per_page: params.per_page,
        total_items,
        total_pages: total_pages(total_items, params.per_page),
    }
}

pub fn mock_note_by_id(id: &str) -> Option<Note> {
    MOCK_NOTES.iter().find(|note| note.id == id).cloned()
}
