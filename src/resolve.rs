//! Cross-reference resolution between collections.
//!
//! Research and software entries list publication slugs by hand, and those
//! lists can lag behind the publications collection. An unknown slug is
//! therefore never an error: it is dropped from the resolved list and logged
//! at debug level. `check` reports them via [`dangling_references`].

use crate::scan::Manifest;
use crate::schema::{Collection, Publication};
use crate::types::Entry;

/// Look up publications by slug, in the order the slugs are given.
///
/// Unknown slugs are skipped; `None` resolves to an empty list.
pub fn get_publications_by_slugs<'a>(
    slugs: Option<&[String]>,
    all_publications: &'a [Entry<Publication>],
) -> Vec<&'a Entry<Publication>> {
    let Some(slugs) = slugs else {
        return Vec::new();
    };
    slugs
        .iter()
        .filter_map(|slug| {
            let found = all_publications.iter().find(|p| &p.slug == slug);
            if found.is_none() {
                tracing::debug!("Dropping unknown publication slug '{}'", slug);
            }
            found
        })
        .collect()
}

/// A publication slug referenced from an entry that matches no publication.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DanglingReference {
    pub collection: Collection,
    /// Slug of the entry holding the reference.
    pub from: String,
    /// The unmatched publication slug.
    pub slug: String,
}

/// Every unresolved `publications` reference in research and software entries.
pub fn dangling_references(manifest: &Manifest) -> Vec<DanglingReference> {
    let known = |slug: &str| manifest.publications.iter().any(|p| p.slug == slug);

    let research = manifest
        .research
        .iter()
        .map(|e| (Collection::Research, &e.slug, e.data.publications.as_deref()));
    let software = manifest
        .software
        .iter()
        .map(|e| (Collection::Software, &e.slug, e.data.publications.as_deref()));

    research
        .chain(software)
        .flat_map(|(collection, from, slugs)| {
            slugs
                .unwrap_or_default()
                .iter()
                .filter(move |s| !known(s))
                .map(move |s| DanglingReference {
                    collection,
                    from: from.clone(),
                    slug: s.clone(),
                })
        })
        .collect()
}
