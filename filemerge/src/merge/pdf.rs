//! PDF page concatenation.
//!
//! The first document is the base. Each following document has its objects
//! renumbered past the base's highest id, is copied in, and its page tree
//! root is grafted under the base's root `Pages` node. Grafting the whole
//! subtree keeps attributes that pages inherit from their parents
//! (`MediaBox`, `Resources`, ...).

use lopdf::{Document, Object, ObjectId, dictionary};

use crate::descriptor::ResolvedFile;
use crate::error::{FileMergeError, Result};

/// Merge PDF documents, pages in input order, and serialize the result.
pub fn merge(files: &[ResolvedFile]) -> Result<Vec<u8>> {
    let (mut merged, base_name) = match files.first() {
        Some(first) => (load(first)?, first.name.as_str()),
        None => (empty_document(), "merged"),
    };

    let base_pages_id = pages_root(&merged)
        .map_err(|e| FileMergeError::invalid_pdf(base_name, e.to_string()))?;

    for file in files.iter().skip(1) {
        let doc = load(file)?;
        append_document(&mut merged, base_pages_id, doc)
            .map_err(|e| FileMergeError::invalid_pdf(&file.name, e.to_string()))?;
    }

    merged.renumber_objects();
    merged.compress();

    let mut buffer = Vec::new();
    merged
        .save_to(&mut buffer)
        .map_err(|e| FileMergeError::merge_failed(format!("Failed to serialize PDF: {e}")))?;

    tracing::debug!(
        documents = files.len(),
        pages = merged.get_pages().len(),
        size = buffer.len(),
        "merged PDF documents"
    );

    Ok(buffer)
}

fn load(file: &ResolvedFile) -> Result<Document> {
    let doc = Document::load_mem(&file.bytes)
        .map_err(|e| FileMergeError::invalid_pdf(&file.name, e.to_string()))?;

    if doc.is_encrypted() {
        return Err(FileMergeError::invalid_pdf(
            &file.name,
            "PDF is encrypted and cannot be merged",
        ));
    }

    Ok(doc)
}

/// A valid document with an empty page tree.
fn empty_document() -> Document {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.add_object(dictionary! {
        "Type" => "Pages",
        "Kids" => Vec::<Object>::new(),
        "Count" => 0,
    });
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc
}

fn pages_root(doc: &Document) -> lopdf::Result<ObjectId> {
    doc.catalog()?.get(b"Pages")?.as_reference()
}

fn append_document(merged: &mut Document, base_pages_id: ObjectId, mut doc: Document) -> Result<()> {
    // Renumber objects to avoid ID conflicts
    doc.renumber_objects_with(merged.max_id + 1);
    merged.max_id = doc.max_id;

    let page_count = doc.get_pages().len() as i64;
    let catalog_id = doc.trailer.get(b"Root")?.as_reference()?;
    let sub_pages_id = pages_root(&doc)?;

    // The source catalog would be an unreachable leftover
    doc.objects.remove(&catalog_id);
    merged.objects.extend(doc.objects);

    if let Object::Dictionary(sub_pages) = merged.get_object_mut(sub_pages_id)? {
        sub_pages.set("Parent", base_pages_id);
    } else {
        return Err(FileMergeError::merge_failed("Pages object is not a dictionary"));
    }

    let base_pages = merged.get_dictionary_mut(base_pages_id)?;
    match base_pages.get_mut(b"Kids") {
        Ok(Object::Array(kids)) => kids.push(Object::Reference(sub_pages_id)),
        Ok(_) => return Err(FileMergeError::merge_failed("Kids is not an array")),
        Err(_) => return Err(FileMergeError::merge_failed("Pages dictionary missing Kids array")),
    }

    let current_count = base_pages.get(b"Count").and_then(|c| c.as_i64()).unwrap_or(0);
    base_pages.set("Count", Object::Integer(current_count + page_count));

    Ok(())
}
