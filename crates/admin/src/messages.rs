//! User-facing strings for the carts screens.
//!
//! Screens look text up by [`MessageKey`] through an injected [`Messages`]
//! implementation. [`DefaultMessages`] returns the built-in English text;
//! [`MessageCatalog`] overrides it from a flat JSON file of `id -> text`.

use std::borrow::Cow;
use std::collections::HashMap;
use std::path::Path;

use thiserror::Error;

/// Identifies one translatable message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKey {
    /// Heading of the cart list.
    CartListTitle,
    /// Empty state of the cart list.
    NoResults,
    /// Heading of the bulk action menu.
    Actions,
    /// Heading of the cart detail view.
    CartTitle,
    /// Label of the link back to the list.
    Back,
}

impl MessageKey {
    pub const ALL: [Self; 5] = [
        Self::CartListTitle,
        Self::NoResults,
        Self::Actions,
        Self::CartTitle,
        Self::Back,
    ];

    /// Catalog id of the message.
    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::CartListTitle => "Cart.title",
            Self::NoResults => "Cart.noResults",
            Self::Actions => "Cart.actions",
            Self::CartTitle => "cart.title",
            Self::Back => "cart.back",
        }
    }

    /// Built-in English text.
    #[must_use]
    pub const fn default_message(self) -> &'static str {
        match self {
            Self::CartListTitle => "Cart list",
            Self::NoResults => "There are no Carts available for this user",
            Self::Actions => "Actions",
            Self::CartTitle => "Cart details",
            Self::Back => "Back",
        }
    }
}

/// Message lookup capability.
pub trait Messages: Send + Sync {
    fn get(&self, key: MessageKey) -> Cow<'_, str>;
}

/// Built-in English messages.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultMessages;

impl Messages for DefaultMessages {
    fn get(&self, key: MessageKey) -> Cow<'_, str> {
        Cow::Borrowed(key.default_message())
    }
}

/// Errors loading a message catalog.
#[derive(Debug, Error)]
pub enum MessagesError {
    #[error("Failed to read message catalog: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid message catalog: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Messages from a JSON catalog, falling back to the built-in text for ids
/// the catalog does not contain.
#[derive(Debug, Clone, Default)]
pub struct MessageCatalog {
    entries: HashMap<String, String>,
}

impl MessageCatalog {
    /// Parse a catalog from JSON text such as `{"Cart.title": "Warenkörbe"}`.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not a JSON object of strings.
    pub fn from_json(json: &str) -> Result<Self, MessagesError> {
        let entries = serde_json::from_str(json)?;
        Ok(Self { entries })
    }

    /// Load a catalog file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, MessagesError> {
        let json = std::fs::read_to_string(path)?;
        let catalog = Self::from_json(&json)?;
        let unknown = catalog
            .entries
            .keys()
            .filter(|id| !MessageKey::ALL.iter().any(|key| key.id() == id.as_str()))
            .count();
        if unknown > 0 {
            tracing::debug!(path = %path.display(), unknown, "Catalog has unused message ids");
        }
        Ok(catalog)
    }
}

impl Messages for MessageCatalog {
    fn get(&self, key: MessageKey) -> Cow<'_, str> {
        self.entries
            .get(key.id())
            .map_or(Cow::Borrowed(key.default_message()), |text| {
                Cow::Borrowed(text.as_str())
            })
    }
}
