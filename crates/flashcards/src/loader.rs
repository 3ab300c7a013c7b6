//! Page-load data fetch: remote rows to a validated card sequence.

use tracing::{info, warn};

use crate::card::{Deck, FlashcardRecord};
use crate::error::{Error, Result};
use crate::notion::{Page, PropertyValue, TableClient, CHECKBOX_PROPERTY, NAME_PROPERTY};

/// Load every row of `database_id` as a flashcard, in display order.
///
/// Display order is the reverse of the order the service returns rows in,
/// which for Notion's default sort puts the bottom row of the table last.
/// A single malformed row fails the whole load.
///
/// # Errors
///
/// Returns [`Error::MissingDatabaseId`] without contacting the service when
/// `database_id` is absent or blank, a shape error for the first row that is
/// not a flashcard, or whatever the client returns.
pub async fn load_flashcards(
    client: &dyn TableClient,
    database_id: Option<&str>,
) -> Result<Vec<FlashcardRecord>> {
    let database_id = database_id
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .ok_or(Error::MissingDatabaseId)?;

    let pages = client.query_database(database_id).await?;
    let mut records = pages
        .iter()
        .map(|page| {
            record_from_page(page).inspect_err(|e| warn!(page_id = %page.id, "rejected row: {e}"))
        })
        .collect::<Result<Vec<_>>>()?;
    records.reverse();

    info!(count = records.len(), "loaded flashcards");
    Ok(records)
}

/// Like [`load_flashcards`], wrapped in a [`Deck`].
///
/// # Errors
///
/// Everything [`load_flashcards`] returns, plus [`Error::DuplicateCard`].
pub async fn load_deck(client: &dyn TableClient, database_id: Option<&str>) -> Result<Deck> {
    Deck::new(load_flashcards(client, database_id).await?)
}

/// Validate one row and reshape it into a record.
///
/// # Errors
///
/// Returns a shape error if the property bag is missing, either expected
/// property is missing or of the wrong kind, or the title has no text run.
pub fn record_from_page(page: &Page) -> Result<FlashcardRecord> {
    let properties = page
        .properties
        .as_ref()
        .ok_or_else(|| Error::MissingProperties {
            page_id: page.id.clone(),
        })?;

    let property = |name: &'static str| {
        properties.get(name).ok_or_else(|| Error::MissingProperty {
            page_id: page.id.clone(),
            property: name,
        })
    };

    let PropertyValue::Checkbox { checkbox } = property(CHECKBOX_PROPERTY)? else {
        return Err(Error::property_kind(&page.id, CHECKBOX_PROPERTY, "checkbox"));
    };
    let PropertyValue::Title { title } = property(NAME_PROPERTY)? else {
        return Err(Error::property_kind(&page.id, NAME_PROPERTY, "title"));
    };
    let name = title.first().ok_or_else(|| Error::EmptyTitle {
        page_id: page.id.clone(),
    })?;

    Ok(FlashcardRecord::new(
        page.id.clone(),
        name.plain_text.clone(),
        *checkbox,
    ))
}
