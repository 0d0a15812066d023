use std::sync::Arc;

use crate::foundation::error::{StudioError, StudioResult};

/// Families tried, in order, before falling back to whatever face is installed.
pub const PREFERRED_FAMILIES: &[&str] = &[
    "DejaVu Sans",
    "Liberation Sans",
    "Arial",
    "Helvetica",
    "Noto Sans",
    "Roboto",
    "Open Sans",
];

/// Find a bold sans-serif face among the installed system fonts.
///
/// Fails with a setup error when no usable face is installed.
pub fn discover_system_font() -> StudioResult<Arc<Vec<u8>>> {
    let mut db = fontdb::Database::new();
    db.load_system_fonts();
    tracing::debug!(faces = db.len(), "system fonts loaded");
    select_bold_sans(&db)
}

/// Pick the heaviest sans face `db` offers.
///
/// Named families come first, then the generic sans-serif family, then the heaviest upright face
/// installed. Only faces at index 0 of their file are taken; the renderer addresses
/// collections by their first face.
pub(crate) fn select_bold_sans(db: &fontdb::Database) -> StudioResult<Arc<Vec<u8>>> {
    let mut families: Vec<fontdb::Family<'_>> = PREFERRED_FAMILIES
        .iter()
        .map(|name| fontdb::Family::Name(name))
        .collect();
    families.push(fontdb::Family::SansSerif);

    let queried = families.iter().find_map(|family| {
        let id = db.query(&fontdb::Query {
            families: std::slice::from_ref(family),
            weight: fontdb::Weight::BOLD,
            stretch: fontdb::Stretch::Normal,
            style: fontdb::Style::Normal,
        })?;
        db.face(id).filter(|face| face.index == 0).map(|face| face.id)
    });

    let id = queried
        .or_else(|| {
            db.faces()
                .filter(|face| face.index == 0 && face.style == fontdb::Style::Normal)
                .max_by_key(|face| face.weight.0)
                .map(|face| face.id)
        })
        .ok_or_else(|| StudioError::setup("no usable system font found; pass a font file"))?;

    if let Some(face) = db.face(id) {
        tracing::debug!(
            family = face.families.first().map(|(name, _)| name.as_str()).unwrap_or(""),
            weight = face.weight.0,
            "using system font"
        );
    }
    db.with_face_data(id, |data, _| Arc::new(data.to_vec()))
        .ok_or_else(|| StudioError::setup("system font data could not be read"))
}

#[cfg(test)]
#[path = "../../tests/unit/assets/font.rs"]
mod tests;
