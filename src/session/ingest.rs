//! Defensive ingestion of uploaded documents
//!
//! Each file is decoded independently; a file that cannot be read or is
//! not valid UTF-8 is skipped with a recorded reason and never aborts the
//! rest of the batch.

use std::fs;

use crate::session::types::{Document, DocumentBundle, UploadedFile};

/// Read every uploaded file into a bundle, preserving upload order.
///
/// `fs::read_to_string` scopes the handle acquisition: the descriptor is
/// released on every path, including decode failure. An empty input list
/// yields an empty bundle, not an error.
pub fn ingest_documents(files: &[UploadedFile]) -> DocumentBundle {
    let mut bundle = DocumentBundle::default();

    for file in files {
        match fs::read_to_string(&file.path) {
            Ok(text) => {
                bundle.push_document(Document {
                    filename: file.display_name.clone(),
                    text,
                });
            }
            Err(err) => {
                tracing::warn!("Could not read file {}: {}", file.display_name, err);
                bundle.push_skip(file.display_name.clone(), err.to_string());
            }
        }
    }

    bundle
}
