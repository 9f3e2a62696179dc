//! Page markup the analysis dialog binds to.

use std::collections::HashMap;

use color_eyre::eyre::{Result, eyre};
use serde::{Deserialize, Serialize};

use crate::dialog::primitive::{ModalDialog, ScrollLock};
use crate::dialog::regions::{ActionButton, BodyRegion, TitleRegion};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    Heading,
    Container,
    Button,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Element {
    id: String,
    kind: ElementKind,
    text: String,
}

/// A dialog surface declared on the page, not yet bound to a controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SurfaceMarkup {
    id: String,
    elements: Vec<Element>,
}

impl SurfaceMarkup {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            elements: Vec::new(),
        }
    }

    #[must_use]
    pub fn with(mut self, id: impl Into<String>, kind: ElementKind, text: impl Into<String>) -> Self {
        self.elements.push(Element {
            id: id.into(),
            kind,
            text: text.into(),
        });
        self
    }

    #[must_use]
    pub fn heading(self, id: impl Into<String>, text: impl Into<String>) -> Self {
        self.with(id, ElementKind::Heading, text)
    }

    #[must_use]
    pub fn container(self, id: impl Into<String>) -> Self {
        self.with(id, ElementKind::Container, "")
    }

    #[must_use]
    pub fn button(self, id: impl Into<String>, text: impl Into<String>) -> Self {
        self.with(id, ElementKind::Button, text)
    }

    fn find(&self, id: &str, kind: ElementKind) -> Result<&Element> {
        let element = self
            .elements
            .iter()
            .find(|e| e.id == id)
            .ok_or_else(|| eyre!("Dialog surface '{}' has no element '{id}'", self.id))?;
        if element.kind != kind {
            return Err(eyre!(
                "Element '{id}' in dialog surface '{}' is a {:?}, expected a {kind:?}",
                self.id,
                element.kind
            ));
        }
        Ok(element)
    }
}

/// Identifiers of a dialog surface and its regions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SurfaceLayout {
    pub surface_id: String,
    pub title_id: String,
    pub body_id: String,
    pub action_id: String,
}

impl Default for SurfaceLayout {
    fn default() -> Self {
        Self {
            surface_id: "analysis-dialog".to_string(),
            title_id: "title".to_string(),
            body_id: "body-area".to_string(),
            action_id: "action".to_string(),
        }
    }
}

impl SurfaceLayout {
    /// Markup matching this layout, with empty regions.
    pub fn markup(&self) -> SurfaceMarkup {
        SurfaceMarkup::new(&self.surface_id)
            .heading(&self.title_id, "")
            .container(&self.body_id)
            .button(&self.action_id, "")
    }
}

/// The page: declared dialog surfaces and the page-wide scroll lock.
#[derive(Debug, Default)]
pub struct Document {
    surfaces: HashMap<String, SurfaceMarkup>,
    scroll_lock: ScrollLock,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_surface(&mut self, surface: SurfaceMarkup) {
        self.surfaces.insert(surface.id.clone(), surface);
    }

    #[must_use]
    pub fn with_surface(mut self, surface: SurfaceMarkup) -> Self {
        self.add_surface(surface);
        self
    }

    pub fn surface(&self, id: &str) -> Option<&SurfaceMarkup> {
        self.surfaces.get(id)
    }

    pub fn scroll_lock(&self) -> ScrollLock {
        self.scroll_lock.clone()
    }

    /// Resolve `layout` and move the surface out of the page.
    ///
    /// The document is left untouched if any region is missing or has the
    /// wrong element kind.
    pub fn take_surface(&mut self, layout: &SurfaceLayout) -> Result<DialogHandle> {
        let surface = self
            .surfaces
            .get(&layout.surface_id)
            .ok_or_else(|| eyre!("No dialog surface with id '{}'", layout.surface_id))?;

        let title = surface.find(&layout.title_id, ElementKind::Heading)?;
        let body = surface.find(&layout.body_id, ElementKind::Container)?;
        let action = surface.find(&layout.action_id, ElementKind::Button)?;

        let handle = DialogHandle {
            dialog: ModalDialog::new(&layout.surface_id),
            title: TitleRegion::new(&title.text),
            body: BodyRegion::new(if body.text.is_empty() {
                Vec::new()
            } else {
                vec![body.text.clone()]
            }),
            action: ActionButton::new(&action.id, &action.text),
        };
        self.surfaces.remove(&layout.surface_id);
        Ok(handle)
    }
}

/// A dialog surface bound to its controller.
pub struct DialogHandle {
    pub dialog: ModalDialog,
    pub title: TitleRegion,
    pub body: BodyRegion,
    pub action: ActionButton,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_take_surface_moves_it_out_of_the_page() {
        let layout = SurfaceLayout::default();
        let mut document = Document::new().with_surface(
            SurfaceMarkup::new("analysis-dialog")
                .heading("title", "Analysis")
                .container("body-area")
                .button("action", "OK"),
        );

        let handle = document.take_surface(&layout).unwrap();
        assert_eq!(handle.dialog.id(), "analysis-dialog");
        assert_eq!(handle.title.text(), "Analysis");
        assert_eq!(handle.action.label(), "OK");
        assert!(!handle.dialog.is_visible());
        assert!(document.surface("analysis-dialog").is_none());

        let err = document.take_surface(&layout).err().unwrap();
        assert!(err.to_string().contains("analysis-dialog"));
    }

    #[test]
    fn test_missing_region_leaves_document_untouched() {
        let layout = SurfaceLayout::default();
        let markup = SurfaceMarkup::new("analysis-dialog")
            .heading("title", "")
            .button("action", "");
        let mut document = Document::new().with_surface(markup.clone());

        let err = document.take_surface(&layout).err().unwrap();
        assert!(err.to_string().contains("body-area"));
        assert_eq!(document.surface("analysis-dialog"), Some(&markup));
    }

    #[test]
    fn test_wrong_element_kind_is_rejected() {
        let layout = SurfaceLayout::default();
        let mut document = Document::new().with_surface(
            SurfaceMarkup::new("analysis-dialog")
                .heading("title", "")
                .container("body-area")
                .container("action"),
        );

        let err = document.take_surface(&layout).err().unwrap();
        assert!(err.to_string().contains("expected a Button"));
    }

    #[test]
    fn test_layout_markup_resolves() {
        let layout = SurfaceLayout {
            surface_id: "ecoindex-dialog".to_string(),
            ..SurfaceLayout::default()
        };
        let mut document = Document::new().with_surface(layout.markup());
        assert!(document.take_surface(&layout).is_ok());
    }
}
