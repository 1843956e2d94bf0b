// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Page transplanting between lopdf documents.

use std::collections::HashMap;

use labelcrop_core::error::{LabelcropError, Result};
use lopdf::{Dictionary, Document, Object, ObjectId};
use tracing::warn;

/// Page attributes a page may inherit from its `/Pages` ancestors.
const INHERITABLE_KEYS: [&[u8]; 4] = [b"Resources", b"MediaBox", b"CropBox", b"Rotate"];

/// Guards against cyclic or absurdly deep page trees.
const MAX_TREE_DEPTH: usize = 32;

/// Copies pages, and every object they reference, from one source document
/// into a target document.
///
/// One copier is used per source document so objects shared between pages
/// (fonts, images, resource dictionaries) are copied once.
pub(crate) struct PageCopier<'a> {
    source: &'a Document,
    /// Source object id -> target object id.
    copied: HashMap<ObjectId, ObjectId>,
}

impl<'a> PageCopier<'a> {
    pub(crate) fn new(source: &'a Document) -> Self {
        Self {
            source,
            copied: HashMap::new(),
        }
    }

    /// Copy one page into `target` and return its new object id.
    ///
    /// The copy is not linked into the target's page tree and has no
    /// `/Parent`; the caller appends it. Inheritable attributes the page does
    /// not carry itself are resolved from its ancestors and written onto the
    /// copy. A page already copied, directly or because another copied page
    /// references it, is not copied again.
    pub(crate) fn copy_page(&mut self, target: &mut Document, page_id: ObjectId) -> Result<ObjectId> {
        if let Some(&new_id) = self.copied.get(&page_id) {
            return Ok(new_id);
        }

        let source = self.source;
        let page = source
            .get_object(page_id)
            .and_then(Object::as_dict)
            .map_err(|err| {
                LabelcropError::MalformedDocument(format!(
                    "cannot read page object {:?}: {}",
                    page_id, err
                ))
            })?;

        // Reserve the id first so back-references (annotation /P) resolve to
        // this copy instead of cloning the page again.
        let new_id = target.new_object_id();
        self.copied.insert(page_id, new_id);

        let copy = self.copy_page_dictionary(target, page);
        target.objects.insert(new_id, Object::Dictionary(copy));
        Ok(new_id)
    }

    fn copy_object(&mut self, target: &mut Document, object: &Object) -> Object {
        match object {
            Object::Dictionary(dict) => Object::Dictionary(self.copy_dictionary(target, dict)),
            Object::Array(items) => Object::Array(
                items
                    .iter()
                    .map(|item| self.copy_object(target, item))
                    .collect(),
            ),
            Object::Reference(id) => self.copy_reference(target, *id),
            Object::Stream(stream) => {
                let mut copy = stream.clone();
                copy.dict = self.copy_dictionary(target, &stream.dict);
                Object::Stream(copy)
            }
            other => other.clone(),
        }
    }

    /// On page-tree nodes `/Parent` is skipped: it would drag the whole source
    /// page tree along. Other dictionaries (a popup's parent annotation) keep it.
    fn copy_dictionary(&mut self, target: &mut Document, dict: &Dictionary) -> Dictionary {
        if dict.has_type(b"Page") {
            return self.copy_page_dictionary(target, dict);
        }
        self.copy_entries(target, dict, dict.has_type(b"Pages"))
    }

    /// A page without `/Parent`, carrying the attributes it inherits.
    fn copy_page_dictionary(&mut self, target: &mut Document, page: &Dictionary) -> Dictionary {
        let mut copy = self.copy_entries(target, page, true);
        let source = self.source;
        for key in INHERITABLE_KEYS {
            if copy.has(key) {
                continue;
            }
            if let Some(value) = inherited_attribute(source, page, key) {
                let value = self.copy_object(target, value);
                copy.set(key.to_vec(), value);
            }
        }
        copy
    }

    fn copy_entries(&mut self, target: &mut Document, dict: &Dictionary, skip_parent: bool) -> Dictionary {
        let mut copy = Dictionary::new();
        for (key, value) in dict.iter() {
            if skip_parent && key == b"Parent" {
                continue;
            }
            let value = self.copy_object(target, value);
            copy.set(key.clone(), value);
        }
        copy
    }

    fn copy_reference(&mut self, target: &mut Document, id: ObjectId) -> Object {
        if let Some(&new_id) = self.copied.get(&id) {
            return Object::Reference(new_id);
        }

        let source = self.source;
        match source.get_object(id) {
            Ok(object) => {
                let new_id = target.new_object_id();
                self.copied.insert(id, new_id);
                let copy = self.copy_object(target, object);
                target.objects.insert(new_id, copy);
                Object::Reference(new_id)
            }
            Err(err) => {
                warn!(?id, %err, "cannot resolve reference, using Null");
                Object::Null
            }
        }
    }
}

/// Look `key` up on the page's `/Pages` ancestors.
pub(crate) fn inherited_attribute<'d>(
    document: &'d Document,
    page: &'d Dictionary,
    key: &[u8],
) -> Option<&'d Object> {
    let mut node = page;
    for _ in 0..MAX_TREE_DEPTH {
        let parent_id = node.get(b"Parent").and_then(Object::as_reference).ok()?;
        node = document
            .get_object(parent_id)
            .and_then(Object::as_dict)
            .ok()?;
        if let Ok(value) = node.get(key) {
            return Some(value);
        }
    }
    None
}

/// Follow a reference to the object it names; other objects are returned as-is.
pub(crate) fn resolve<'d>(document: &'d Document, object: &'d Object) -> Result<&'d Object> {
    match object {
        Object::Reference(id) => document.get_object(*id).map_err(|err| {
            LabelcropError::MalformedDocument(format!("dangling reference {:?}: {}", id, err))
        }),
        other => Ok(other),
    }
}
