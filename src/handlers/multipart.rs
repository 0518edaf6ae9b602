use actix_multipart::Multipart;
use futures_util::TryStreamExt;
use std::collections::HashMap;

use crate::error::AppError;

/// A file part of a multipart body.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub field: String,
    pub file_name: String,
    pub data: Vec<u8>,
}

/// A fully buffered multipart body: text fields by name plus every file part.
#[derive(Debug, Default)]
pub struct FormData {
    pub fields: HashMap<String, String>,
    pub files: Vec<UploadedFile>,
}

impl FormData {
    /// A text field, trimmed; blank values count as absent.
    pub fn text(&self, name: &str) -> Option<String> {
        self.fields
            .get(name)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    }

    /// Files sent under `field` with a non-empty file name.
    pub fn files_named<'a>(&'a self, field: &'a str) -> impl Iterator<Item = &'a UploadedFile> + 'a {
        self.files
            .iter()
            .filter(move |f| f.field == field && !f.file_name.is_empty())
    }
}

/// Drain a multipart stream into memory.
pub async fn read_form(mut payload: Multipart) -> Result<FormData, AppError> {
    let mut form = FormData::default();

    while let Some(mut field) = payload
        .try_next()
        .await
        .map_err(|e| AppError::validation(format!("Malformed multipart body: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        let file_name = field
            .content_disposition()
            .and_then(|cd| cd.get_filename())
            .map(str::to_string);

        let mut data = Vec::new();
        while let Some(chunk) = field
            .try_next()
            .await
            .map_err(|e| AppError::validation(format!("Malformed multipart body: {e}")))?
        {
            data.extend_from_slice(&chunk);
        }

        match file_name {
            Some(file_name) => form.files.push(UploadedFile {
                field: name,
                file_name,
                data,
            }),
            None => {
                let value = String::from_utf8(data).map_err(|_| {
                    AppError::validation(format!("Field {name} is not valid UTF-8"))
                })?;
                form.fields.insert(name, value);
            }
        }
    }

    Ok(form)
}
